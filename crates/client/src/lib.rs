//! Typed async client for the Akave Link bucket/file HTTP API.
//!
//! Every operation is a single HTTP round trip against the remote storage
//! node. Bucket and file names are opaque strings; the remote service is the
//! source of truth for identity (CIDs, encoded sizes, assigned names).

#[allow(clippy::module_inception)]
mod client;
mod error;
mod types;

pub use client::AkaveClient;
pub use error::ClientError;
pub use types::{Bucket, FileInfo};

/// Smallest file the remote storage node accepts, in bytes.
pub const MIN_UPLOAD_SIZE: u64 = 127;
