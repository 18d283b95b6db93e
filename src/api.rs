//! # API Server Module
//!
//! ## Purpose
//! REST surface exposing the query engine to the web frontend: composed
//! history listings, record details with propagated highlights, statistics
//! and the clear-history passthrough.
//!
//! ## Input/Output Specification
//! - **Input**: HTTP requests with query text and paging parameters
//! - **Output**: JSON responses with visible records, highlight sets and
//!   classifications
//! - **Endpoints**: History list/detail/stats/clear, classify, health
//!
//! Remote-candidate queries return immediately with the current highlight
//! set; the debounced match resolves in the background and shows up on the
//! next request. Visible records never depend on the remote outcome.

use crate::backend::HistoryQuery;
use crate::classify::QueryClass;
use crate::compose::compose_results;
use crate::errors::{EngineError, Result};
use crate::{AppState, ItemId, RecordId, SearchRecord};
use actix_cors::Cors;
use actix_web::middleware::Condition;
use actix_web::{web, App, HttpResponse, HttpServer, Result as ActixResult};
use serde::{Deserialize, Serialize};

/// REST API server over one engine instance
pub struct ApiServer {
    app_state: AppState,
}

/// Query parameters accepted by the history list endpoint
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub q: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub ordering: Option<String>,
}

/// Query parameters accepted by the detail endpoint
#[derive(Debug, Deserialize)]
pub struct DetailParams {
    /// Overrides the engine's remembered highlight query
    pub q: Option<String>,
}

/// Composed history page returned to the UI
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub count: u64,
    pub classification: QueryClass,
    pub pending: bool,
    pub records: Vec<SearchRecord>,
    pub highlight_ids: Vec<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_error: Option<String>,
}

/// Record detail with propagated line-item highlights
#[derive(Debug, Serialize)]
pub struct DetailResponse {
    pub record: SearchRecord,
    pub items: Vec<crate::LineItem>,
    pub matching_item_ids: Vec<ItemId>,
}

/// Aggregate statistics over the whole history
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total_searches: u64,
    pub total_publications: u64,
    pub total_new_publications: u64,
    pub average_duration_seconds: f64,
}

/// Classification echo for the UI
#[derive(Debug, Serialize)]
pub struct ClassifyResponse {
    pub query: String,
    pub classification: QueryClass,
}

impl ApiServer {
    /// Create a new API server
    pub fn new(app_state: AppState) -> Self {
        Self { app_state }
    }

    /// Run the API server until the process is stopped
    pub async fn run(self) -> Result<()> {
        let app_state = self.app_state.clone();
        let config = app_state.config.clone();
        let bind_addr = format!("{}:{}", config.server.host, config.server.port);
        let enable_cors = config.server.enable_cors;

        tracing::info!("Starting API server on {}", bind_addr);

        HttpServer::new(move || {
            App::new()
                .wrap(Condition::new(enable_cors, Cors::permissive()))
                .app_data(web::Data::new(app_state.clone()))
                .route("/history", web::get().to(history_handler))
                .route("/history/stats", web::get().to(stats_handler))
                .route("/history/clear", web::delete().to(clear_handler))
                .route("/history/{id}", web::get().to(detail_handler))
                .route("/classify", web::get().to(classify_handler))
                .route("/health", web::get().to(health_handler))
                .route("/", web::get().to(index_handler))
        })
        .bind(&bind_addr)
        .map_err(|e| EngineError::Internal {
            message: format!("Failed to bind server to {}: {}", bind_addr, e),
        })?
        .run()
        .await
        .map_err(|e| EngineError::Internal {
            message: format!("Server error: {}", e),
        })?;

        Ok(())
    }
}

fn error_response(err: &EngineError) -> HttpResponse {
    let body = serde_json::json!({
        "error": err.category(),
        "message": err.to_string(),
    });
    match err {
        EngineError::RecordNotFound { .. } => HttpResponse::NotFound().json(body),
        EngineError::ValidationFailed { .. } => HttpResponse::BadRequest().json(body),
        _ => HttpResponse::BadGateway().json(body),
    }
}

/// Composed history listing. The raw input drives the engine exactly like a
/// keystroke in the UI would.
async fn history_handler(
    app_state: web::Data<AppState>,
    params: web::Query<ListParams>,
) -> ActixResult<HttpResponse> {
    let raw = params.q.clone().unwrap_or_default();
    let classification = app_state.engine.handle_input(&raw);

    let page = app_state
        .backend
        .list_history(HistoryQuery {
            limit: params
                .limit
                .unwrap_or(app_state.config.backend.default_page_limit),
            offset: params.offset.unwrap_or(0),
            ordering: params
                .ordering
                .clone()
                .unwrap_or_else(|| "-executed_at".to_string()),
            q: None,
        })
        .await;

    let page = match page {
        Ok(page) => page,
        Err(e) => {
            tracing::error!("History listing failed: {}", e);
            return Ok(error_response(&e));
        }
    };

    // One snapshot feeds both the pending flag and the composition, so a
    // resolution landing mid-request cannot produce a response that claims
    // pending while already carrying its highlight ids.
    let state = app_state.engine.query_state();
    let composition = compose_results(&page.results, &state);
    let mut highlight_ids: Vec<RecordId> = composition.highlight_ids.into_iter().collect();
    highlight_ids.sort_unstable();

    Ok(HttpResponse::Ok().json(HistoryResponse {
        count: page.count,
        classification,
        pending: state.pending,
        records: composition.visible_records,
        highlight_ids,
        remote_error: app_state.engine.last_remote_error(),
    }))
}

/// Record detail with line-item highlight propagation.
async fn detail_handler(
    app_state: web::Data<AppState>,
    path: web::Path<RecordId>,
    params: web::Query<DetailParams>,
) -> ActixResult<HttpResponse> {
    let record_id = path.into_inner();

    let detail = match app_state.backend.history_detail(record_id).await {
        Ok(detail) => detail,
        Err(e) => {
            tracing::error!("Detail fetch failed for record {}: {}", record_id, e);
            return Ok(error_response(&e));
        }
    };

    // Highlighting only applies to process-style (remote candidate)
    // queries; an explicit q overrides the engine's remembered one.
    let highlight_query = match &params.q {
        Some(q) if crate::classify(q).is_remote() => Some(q.trim().to_string()),
        Some(_) => None,
        None => app_state.engine.highlight_query(),
    };

    let matching_item_ids = highlight_query
        .map(|q| crate::highlight::propagate_highlight(&detail.items, &q))
        .unwrap_or_default();

    Ok(HttpResponse::Ok().json(DetailResponse {
        record: detail.record,
        items: detail.items,
        matching_item_ids,
    }))
}

/// Aggregate statistics over the whole history.
async fn stats_handler(app_state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    let page = app_state
        .backend
        .list_history(HistoryQuery {
            limit: app_state.config.backend.remote_match_limit,
            ..HistoryQuery::default()
        })
        .await;

    let page = match page {
        Ok(page) => page,
        Err(e) => {
            tracing::error!("Stats fetch failed: {}", e);
            return Ok(error_response(&e));
        }
    };

    let total_publications: u64 = page.results.iter().map(|r| u64::from(r.total_results)).sum();
    let total_new: u64 = page.results.iter().map(|r| u64::from(r.total_new)).sum();
    let average_duration = if page.results.is_empty() {
        0.0
    } else {
        page.results.iter().map(|r| r.duration_seconds).sum::<f64>() / page.results.len() as f64
    };

    Ok(HttpResponse::Ok().json(StatsResponse {
        total_searches: page.count,
        total_publications,
        total_new_publications: total_new,
        average_duration_seconds: average_duration,
    }))
}

/// Clear the history upstream and drop all cached highlight state.
async fn clear_handler(app_state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    if let Err(e) = app_state.backend.clear_history().await {
        tracing::error!("Clear history failed: {}", e);
        return Ok(error_response(&e));
    }

    app_state.engine.clear();
    Ok(HttpResponse::Ok().json(serde_json::json!({ "cleared": true })))
}

/// Pure classification echo, useful for frontend debugging.
async fn classify_handler(params: web::Query<DetailParams>) -> ActixResult<HttpResponse> {
    let query = params.q.clone().unwrap_or_default();
    Ok(HttpResponse::Ok().json(ClassifyResponse {
        classification: crate::classify(&query),
        query,
    }))
}

/// Health check endpoint handler
async fn health_handler(app_state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    let backend_status = match app_state
        .backend
        .list_history(HistoryQuery {
            limit: 1,
            ..HistoryQuery::default()
        })
        .await
    {
        Ok(_) => "healthy",
        Err(_) => "unhealthy",
    };

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": backend_status,
        "version": env!("CARGO_PKG_VERSION"),
        "components": {
            "backend": backend_status,
            "engine": "healthy",
        },
    })))
}

/// Index page handler
async fn index_handler() -> ActixResult<HttpResponse> {
    let html = r#"
    <!DOCTYPE html>
    <html>
    <head>
        <title>Search History Engine</title>
        <style>
            body { font-family: Arial, sans-serif; margin: 40px; }
            .header { color: #2c3e50; }
            .endpoint { margin: 20px 0; padding: 15px; background: #f8f9fa; border-radius: 5px; }
            .method { font-weight: bold; color: #27ae60; }
        </style>
    </head>
    <body>
        <h1 class="header">Search History Engine API</h1>
        <p>Query engine over past publication searches with debounced remote matching.</p>

        <h2>Available Endpoints</h2>

        <div class="endpoint">
            <span class="method">GET</span> /history?q=&amp;limit=&amp;offset=&amp;ordering=
            <p>Composed history page: visible records plus remote highlight ids.</p>
        </div>

        <div class="endpoint">
            <span class="method">GET</span> /history/{id}?q=
            <p>One record with its publications and matching item ids.</p>
        </div>

        <div class="endpoint">
            <span class="method">GET</span> /history/stats
            <p>Aggregate statistics over the whole history.</p>
        </div>

        <div class="endpoint">
            <span class="method">DELETE</span> /history/clear
            <p>Delete the history upstream and reset engine state.</p>
        </div>

        <div class="endpoint">
            <span class="method">GET</span> /classify?q=
            <p>Classification of a raw query string.</p>
        </div>

        <div class="endpoint">
            <span class="method">GET</span> /health
            <p>Health status of the engine and its backend.</p>
        </div>
    </body>
    </html>
    "#;

    Ok(HttpResponse::Ok().content_type("text/html").body(html))
}
