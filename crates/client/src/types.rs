use serde::{Deserialize, Serialize};

/// A storage bucket as described by the remote node.
///
/// Only the name is interpreted locally; everything else the node returns is
/// carried through untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bucket {
    #[serde(rename = "Name")]
    pub name: String,
    /// Remote-reported attributes we pass through without interpreting.
    #[serde(flatten)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

/// A stored file as described by the remote node.
///
/// Identity is assigned by the remote service on upload, never locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileInfo {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "RootCID")]
    pub root_cid: String,
    #[serde(rename = "EncodedSize")]
    pub encoded_size: u64,
    #[serde(flatten)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}
