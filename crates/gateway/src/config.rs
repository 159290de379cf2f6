use std::net::SocketAddr;
use std::path::PathBuf;

/// Gateway configuration, assembled in `main` from CLI flags and the
/// environment. The storage credential is only ever read from the
/// environment so it never lands in shell history or source.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to
    pub listen_addr: SocketAddr,
    /// Base URL of the Akave Link node
    pub storage_url: String,
    /// Optional bearer credential for the storage node
    pub api_key: Option<String>,
    /// Bucket all datasets are uploaded into
    pub bucket: String,
    /// Directory uploads are staged in before forwarding
    pub staging_dir: PathBuf,
    /// Lowercase file extensions accepted for upload
    pub allowed_extensions: Vec<String>,
    /// Log level (error, warn, info, debug, trace)
    pub log_level: tracing::Level,
}
