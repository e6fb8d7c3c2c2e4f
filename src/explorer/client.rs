use crate::search::types::{SearchRequest, SearchResponse};

use anyhow::Context;
use async_trait::async_trait;

/// Where the explorer sends its searches.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> anyhow::Result<SearchResponse>;
}

/// Posts searches to a running catalog service.
#[derive(Debug, Clone)]
pub struct HttpSearchBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpSearchBackend {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl SearchBackend for HttpSearchBackend {
    async fn search(&self, request: &SearchRequest) -> anyhow::Result<SearchResponse> {
        let url = format!("{}/api/presentations/search", self.base_url);
        let resp = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .with_context(|| format!("POST {url}"))?;

        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("search returned {}", status);
        }

        resp.json::<SearchResponse>()
            .await
            .context("decoding search response")
    }
}

/// Adds a scheme when missing and strips trailing slashes.
pub fn normalize_base_url(candidate: &str) -> String {
    let trimmed = candidate.trim();
    if trimmed.is_empty() {
        return "http://127.0.0.1:3000".to_string();
    }

    let normalized = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    };

    normalized.trim_end_matches('/').to_string()
}
