//! HTTP object store client for avatar uploads.
//!
//! Speaks the Supabase-storage flavored API: authenticated `POST` to write an
//! object, unauthenticated public URL to read it back. Upload transport is
//! deliberately dumb; callers treat the store as opaque.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;

use crate::kernel::BaseObjectStore;

#[derive(Debug, Clone)]
pub struct HttpObjectStore {
    base_url: String,
    api_key: String,
    bucket: String,
    client: Client,
}

impl HttpObjectStore {
    pub fn new(base_url: String, api_key: String, bucket: String) -> Self {
        Self {
            base_url,
            api_key,
            bucket,
            client: Client::new(),
        }
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/object/public/{}/{}", self.base_url, self.bucket, key)
    }
}

#[async_trait]
impl BaseObjectStore for HttpObjectStore {
    async fn upload(&self, key: &str, bytes: Vec<u8>) -> Result<String> {
        let url = format!("{}/object/{}/{}", self.base_url, self.bucket, key);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("x-upsert", "true")
            .header("content-type", "application/octet-stream")
            .body(bytes)
            .send()
            .await
            .context("Object store request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Object store returned {}: {}", status, body);
        }

        Ok(self.public_url(key))
    }
}
