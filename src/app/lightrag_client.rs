//! HTTP access to a LightRAG server's document endpoints.

use crate::config::ServerProfile;
use crate::document::{
    BatchDeletionResult, DeletionItem, DeletionOutcome, DeletionResponse, DocStatus, DocumentRef,
};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("server returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("invalid server url '{0}'")]
    InvalidUrl(String),

    #[error("unexpected response: {0}")]
    Decode(String),
}

/// Everything the document views need from a server.
#[async_trait]
pub trait DocumentService: Send + Sync {
    async fn list_documents(&self) -> Result<Vec<DocumentRef>, ServiceError>;

    async fn delete_one(
        &self,
        document_id: &str,
        file_path: &str,
    ) -> Result<DeletionOutcome, ServiceError>;

    async fn delete_many(
        &self,
        items: &[DeletionItem],
    ) -> Result<BatchDeletionResult, ServiceError>;
}

#[derive(Deserialize, Debug)]
struct DocumentsResponse {
    /// Keyed by status group name; groups this client does not know are skipped.
    #[serde(default)]
    statuses: HashMap<String, Vec<DocumentEntry>>,
}

#[derive(Deserialize, Debug)]
struct DocumentEntry {
    id: String,
    #[serde(default)]
    file_path: Option<String>,
}

pub struct LightRagClient {
    client: reqwest::Client,
    base_url: Url,
    api_key: Option<String>,
}

impl LightRagClient {
    pub fn new(
        base_url: Url,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url, api_key })
    }

    pub fn from_profile(profile: &ServerProfile, timeout: Duration) -> Result<Self, ServiceError> {
        let base_url = profile.base_url()?;
        Self::new(base_url, profile.api_key.clone(), timeout)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ServiceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ServiceError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(path.split('/'));
        Ok(url)
    }

    fn request(&self, method: reqwest::Method, url: Url) -> reqwest::RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.api_key {
            Some(key) => builder.header("X-API-Key", key),
            None => builder,
        }
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ServiceError> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ServiceError::Api { status: status.as_u16(), body });
        }
        serde_json::from_str(&body).map_err(|e| ServiceError::Decode(e.to_string()))
    }
}

#[async_trait]
impl DocumentService for LightRagClient {
    async fn list_documents(&self) -> Result<Vec<DocumentRef>, ServiceError> {
        let url = self.endpoint("documents")?;
        let response = self.request(reqwest::Method::GET, url).send().await?;
        let parsed: DocumentsResponse = Self::parse_response(response).await?;

        let mut documents = Vec::new();
        for (group, entries) in parsed.statuses {
            let Some(status) = DocStatus::from_group(&group) else {
                tracing::warn!(
                    group = %group,
                    count = entries.len(),
                    "skipping unknown status group"
                );
                continue;
            };
            documents.extend(entries.into_iter().map(|entry| DocumentRef {
                id: entry.id,
                file_path: entry.file_path,
                status,
            }));
        }
        documents.sort_by(|a, b| {
            a.display_name().cmp(b.display_name()).then_with(|| a.id.cmp(&b.id))
        });
        tracing::debug!(count = documents.len(), "fetched documents");
        Ok(documents)
    }

    async fn delete_one(
        &self,
        document_id: &str,
        file_path: &str,
    ) -> Result<DeletionOutcome, ServiceError> {
        let url = self.endpoint("documents/delete_document")?;
        tracing::info!(doc_id = document_id, "requesting document deletion");
        let body = serde_json::json!({
            "doc_id": document_id,
            "file_name": file_path,
        });
        let response = self
            .request(reqwest::Method::DELETE, url)
            .json(&body)
            .send()
            .await?;
        let parsed: DeletionResponse = Self::parse_response(response).await?;
        Ok(parsed.into())
    }

    async fn delete_many(
        &self,
        items: &[DeletionItem],
    ) -> Result<BatchDeletionResult, ServiceError> {
        let url = self.endpoint("documents/batch")?;
        tracing::info!(count = items.len(), "requesting batch deletion");
        let body = serde_json::json!({ "documents": items });
        let response = self
            .request(reqwest::Method::DELETE, url)
            .json(&body)
            .send()
            .await?;
        Self::parse_response(response).await
    }
}
