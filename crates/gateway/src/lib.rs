//! Dataset Gateway - thin HTTP backend for dataset uploads
//!
//! Accepts multipart uploads from a client, stages them to local disk, and
//! forwards them to a decentralized storage node through the Akave Link
//! client. Bucket and file metadata is relayed back to the caller as JSON.

pub mod config;
pub mod http_server;
pub mod state;

pub use config::Config;
pub use state::AppState;
