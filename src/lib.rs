//! # Search-History Query Engine
//!
//! ## Overview
//! This library implements the query engine behind a law office's
//! search-history view: a single free-text input is classified, resolved
//! against in-memory records and/or a remote full-text matcher, and merged
//! into a stable visible list plus a highlight set.
//!
//! ## Architecture
//! The system is composed of several key modules:
//! - `normalize`: case/diacritic-insensitive string canonicalization
//! - `classify`: query intent classification (date, tribunal, remote, ...)
//! - `dates`: fuzzy matching of partial date fragments against date ranges
//! - `local`: synchronous matching over in-memory records
//! - `dispatch`: debounced, cancellable remote match requests
//! - `compose`: merging local/remote outcomes into the visible result set
//! - `highlight`: digit-substring highlighting of a record's line items
//! - `engine`: facade tying classifier, matchers and composer together
//! - `backend`: REST client for the collaborator that owns the records
//! - `api`: HTTP endpoints exposing the engine to the UI
//! - `config`: configuration management and settings
//! - `errors`: centralized error handling and types
//!
//! ## Input/Output Specification
//! - **Input**: raw query strings (one per keystroke), pages of search
//!   records fetched from the backend
//! - **Output**: `{visible_records, highlight_ids}` compositions and
//!   per-detail matching line-item ids
//! - **Stability**: the visible set never flickers while a remote match
//!   request is outstanding
//!
//! ## Usage
//! ```rust,no_run
//! use search_history_engine::{backend::BackendClient, engine::QueryEngine, Config};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config.toml")?;
//!     let backend = Arc::new(BackendClient::new(config.backend.clone())?);
//!     let engine = QueryEngine::new(backend.clone(), config.engine.clone());
//!     engine.handle_input("1234567-89");
//!     let page = backend.list_history(Default::default()).await?;
//!     let composition = engine.compose(&page.results);
//!     println!("{} visible records", composition.visible_records.len());
//!     Ok(())
//! }
//! ```

// Core modules
pub mod config;
pub mod errors;
pub mod normalize;
pub mod classify;
pub mod dates;
pub mod local;
pub mod dispatch;
pub mod compose;
pub mod highlight;
pub mod engine;
pub mod backend;
pub mod api;

// Re-exports for convenience
pub use classify::{classify, QueryClass};
pub use config::Config;
pub use engine::{QueryEngine, QueryState};
pub use errors::{EngineError, Result};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Unique identifier for a past search execution (backend primary key)
pub type RecordId = i64;

/// Unique identifier for a line item inside a record's detail
pub type ItemId = i64;

/// One executed publication search, owned by the backend and read-only here.
///
/// Wire field names follow the collaborator API (Portuguese legacy names).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRecord {
    /// Stable record identifier
    pub id: RecordId,
    /// Timestamp the search ran at
    pub executed_at: DateTime<Utc>,
    /// Inclusive start of the searched date window
    #[serde(rename = "data_inicio")]
    pub period_start: NaiveDate,
    /// Inclusive end of the searched date window
    #[serde(rename = "data_fim")]
    pub period_end: NaiveDate,
    /// Tribunal codes the search covered, e.g. "TJSP", "TRT2"
    #[serde(rename = "tribunais")]
    pub tribunals: Vec<String>,
    /// Total publications the search found
    #[serde(rename = "total_publicacoes")]
    pub total_results: u32,
    /// Publications not seen in any earlier search
    #[serde(rename = "total_novas")]
    pub total_new: u32,
    /// Wall-clock duration of the search
    pub duration_seconds: f64,
}

/// One publication belonging to a record's detail view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    /// Identifier assigned by the upstream publication API
    #[serde(rename = "id_api")]
    pub id: ItemId,
    /// CNJ-style process number, with separators ("0001234-56.2026.8.26.0100")
    #[serde(rename = "numero_processo")]
    pub process_reference: Option<String>,
    /// Issuing tribunal code
    pub tribunal: String,
    /// Leading excerpt of the publication body
    #[serde(rename = "texto_resumo")]
    pub summary: String,
}

/// Django-style page envelope returned by the backend list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<config::Config>,
    pub backend: Arc<backend::BackendClient>,
    pub engine: Arc<engine::QueryEngine<backend::BackendClient>>,
}
