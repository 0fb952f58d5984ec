//! Catalog configuration

use std::time::Duration;

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base URL of the IPFS HTTP API (without `/api/v0`)
    pub ipfs_api_url: String,
    /// Request body limit for `/seller/upload`
    pub max_upload_bytes: usize,
    /// Per-request timeout towards the content store
    pub request_timeout: Duration,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            ipfs_api_url: "http://127.0.0.1:5001".to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            request_timeout: Duration::from_secs(60),
        }
    }
}

impl CatalogConfig {
    /// Small limit for local testing
    pub fn development() -> Self {
        Self {
            max_upload_bytes: 1024 * 1024,
            ..Default::default()
        }
    }
}
