//! # Backend Client Module
//!
//! ## Purpose
//! REST client for the collaborator that owns the search history: paged
//! listing, detail fetch with line items, remote full-text matching via the
//! `q` parameter, and the destructive clear-history passthrough.
//!
//! ## Input/Output Specification
//! - **Input**: Paging parameters, record ids, free-text match queries
//! - **Output**: `Page<SearchRecord>`, record details with line items,
//!   matched id sets
//! - **Transport**: JSON over HTTP (reqwest), timeout from configuration

use crate::config::BackendConfig;
use crate::dispatch::RemoteMatcher;
use crate::errors::{EngineError, Result};
use crate::{LineItem, Page, RecordId, SearchRecord};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashSet;

/// Paging and ordering parameters for history listings.
#[derive(Debug, Clone)]
pub struct HistoryQuery {
    pub limit: u32,
    pub offset: u32,
    /// Backend ordering expression; `-executed_at` is newest-first
    pub ordering: String,
    /// Free-text query forwarded to the backend's process/name index
    pub q: Option<String>,
}

impl Default for HistoryQuery {
    fn default() -> Self {
        Self {
            limit: 20,
            offset: 0,
            ordering: "-executed_at".to_string(),
            q: None,
        }
    }
}

/// Detail payload for one record: the record itself plus its publications.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordDetail {
    #[serde(rename = "search")]
    pub record: SearchRecord,
    #[serde(rename = "publicacoes", default)]
    pub items: Vec<LineItem>,
}

/// HTTP client for the history backend.
pub struct BackendClient {
    config: BackendConfig,
    http: reqwest::Client,
}

impl BackendClient {
    /// Build a client from configuration.
    pub fn new(config: BackendConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self { config, http })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Fetch one page of the search history.
    pub async fn list_history(&self, query: HistoryQuery) -> Result<Page<SearchRecord>> {
        let url = self.url("publications/history");
        let mut params: Vec<(&str, String)> = vec![
            ("limit", query.limit.to_string()),
            ("offset", query.offset.to_string()),
            ("ordering", query.ordering.clone()),
        ];
        if let Some(q) = &query.q {
            params.push(("q", q.clone()));
        }

        let response = self.http.get(&url).query(&params).send().await?;
        if !response.status().is_success() {
            return Err(EngineError::BackendStatus {
                endpoint: "publications/history".to_string(),
                status: response.status().as_u16(),
            });
        }

        Ok(response.json().await?)
    }

    /// Fetch one record with its line items.
    pub async fn history_detail(&self, record_id: RecordId) -> Result<RecordDetail> {
        let url = self.url(&format!("publications/history/{}", record_id));
        let response = self.http.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(EngineError::RecordNotFound { record_id });
        }
        if !response.status().is_success() {
            return Err(EngineError::BackendStatus {
                endpoint: "publications/history/{id}".to_string(),
                status: response.status().as_u16(),
            });
        }

        Ok(response.json().await?)
    }

    /// Delete the whole history upstream. Irreversible; callers must also
    /// invalidate any locally cached highlight state.
    pub async fn clear_history(&self) -> Result<()> {
        let url = self.url("publications/history/delete");
        let response = self.http.delete(&url).send().await?;
        if !response.status().is_success() {
            return Err(EngineError::BackendStatus {
                endpoint: "publications/history/delete".to_string(),
                status: response.status().as_u16(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteMatcher for BackendClient {
    /// Resolve a free-text query to matching record ids. Only ids are kept;
    /// one oversized page covers the whole history so the match set is
    /// complete.
    async fn match_ids(&self, query: &str) -> Result<HashSet<RecordId>> {
        let page = self
            .list_history(HistoryQuery {
                limit: self.config.remote_match_limit,
                offset: 0,
                q: Some(query.to_string()),
                ..HistoryQuery::default()
            })
            .await
            .map_err(|e| EngineError::RemoteMatchFailed {
                query: query.to_string(),
                details: e.to_string(),
            })?;

        Ok(page.results.into_iter().map(|r| r.id).collect())
    }
}
