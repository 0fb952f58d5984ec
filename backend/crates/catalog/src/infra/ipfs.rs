//! IPFS HTTP API content store
//!
//! Uses the node's RPC API (`/api/v0/add`, `/api/v0/cat`), which only
//! accepts POST.

use axum::body::Bytes;
use reqwest::StatusCode;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::application::config::CatalogConfig;
use crate::domain::content_store::{ContentStore, StoredContent};
use crate::domain::value_object::content_id::ContentId;
use crate::error::{CatalogError, CatalogResult};

pub struct IpfsContentStore {
    client: reqwest::Client,
    api_url: String,
}

impl IpfsContentStore {
    pub fn new(config: &CatalogConfig) -> CatalogResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| CatalogError::ContentStore(e.to_string()))?;

        Ok(Self {
            client,
            api_url: config.ipfs_api_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, command: &str) -> String {
        format!("{}/api/v0/{}", self.api_url, command)
    }
}

/// Reply of `/api/v0/add`
#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AddResponse {
    hash: String,
    /// Serialized as a decimal string
    size: String,
}

/// Error body of the IPFS RPC API
#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct IpfsErrorBody {
    message: String,
}

impl ContentStore for IpfsContentStore {
    async fn add(&self, file_name: &str, data: Bytes) -> CatalogResult<StoredContent> {
        let part = Part::bytes(data.to_vec()).file_name(file_name.to_string());
        let form = Form::new().part("file", part);

        let resp = self
            .client
            .post(self.endpoint("add"))
            .query(&[("pin", "true")])
            .multipart(form)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(CatalogError::ContentStore(error_message(resp).await));
        }

        let added: AddResponse = resp.json().await?;
        let size_bytes = added
            .size
            .parse::<u64>()
            .map_err(|e| CatalogError::ContentStore(format!("bad size from IPFS: {e}")))?;
        let cid = ContentId::parse(&added.hash)
            .map_err(|e| CatalogError::ContentStore(format!("bad hash from IPFS: {e}")))?;

        tracing::debug!(cid = %cid, size_bytes, "Content added to IPFS");
        Ok(StoredContent { cid, size_bytes })
    }

    async fn cat(&self, cid: &ContentId) -> CatalogResult<Bytes> {
        let resp = self
            .client
            .post(self.endpoint("cat"))
            .query(&[("arg", cid.as_str())])
            .send()
            .await?;

        match resp.status() {
            status if status.is_success() => Ok(resp.bytes().await?),
            StatusCode::NOT_FOUND => Err(CatalogError::ContentNotFound),
            _ => {
                let message = error_message(resp).await;
                if message.contains("not found") || message.contains("no link named") {
                    Err(CatalogError::ContentNotFound)
                } else {
                    Err(CatalogError::ContentStore(message))
                }
            }
        }
    }
}

async fn error_message(resp: reqwest::Response) -> String {
    let status = resp.status();
    match resp.json::<IpfsErrorBody>().await {
        Ok(body) => body.message,
        Err(_) => format!("IPFS returned HTTP {status}"),
    }
}
