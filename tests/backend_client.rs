//! Backend client and end-to-end engine tests against a mock backend.

use search_history_engine::backend::{BackendClient, HistoryQuery};
use search_history_engine::config::{BackendConfig, EngineConfig};
use search_history_engine::dispatch::RemoteMatcher;
use search_history_engine::engine::QueryEngine;
use search_history_engine::errors::EngineError;
use search_history_engine::QueryClass;
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend_config(base_url: String) -> BackendConfig {
    BackendConfig {
        base_url,
        request_timeout_seconds: 5,
        remote_match_limit: 1000,
        default_page_limit: 20,
    }
}

fn record_json(id: i64, total: u32) -> serde_json::Value {
    json!({
        "id": id,
        "executed_at": "2026-02-03T09:11:00Z",
        "data_inicio": "2026-01-28",
        "data_fim": "2026-02-03",
        "tribunais": ["TJSP", "TRT2"],
        "total_publicacoes": total,
        "total_novas": 1,
        "duration_seconds": 4.2
    })
}

fn page_json(records: Vec<serde_json::Value>) -> serde_json::Value {
    json!({
        "count": records.len(),
        "next": null,
        "previous": null,
        "results": records
    })
}

#[tokio::test]
async fn list_history_deserializes_wire_names() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/publications/history"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(page_json(vec![record_json(7, 5)])),
        )
        .mount(&server)
        .await;

    let client = BackendClient::new(backend_config(server.uri())).unwrap();
    let page = client.list_history(HistoryQuery::default()).await.unwrap();

    assert_eq!(page.count, 1);
    let record = &page.results[0];
    assert_eq!(record.id, 7);
    assert_eq!(record.tribunals, vec!["TJSP", "TRT2"]);
    assert_eq!(record.total_results, 5);
    assert_eq!(record.period_start.to_string(), "2026-01-28");
}

#[tokio::test]
async fn match_ids_forwards_the_query_and_keeps_only_ids() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/publications/history"))
        .and(query_param("q", "silva"))
        .and(query_param("limit", "1000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(vec![
            record_json(1, 5),
            record_json(3, 2),
        ])))
        .mount(&server)
        .await;

    let client = BackendClient::new(backend_config(server.uri())).unwrap();
    let ids = client.match_ids("silva").await.unwrap();
    assert_eq!(ids, HashSet::from([1, 3]));
}

#[tokio::test]
async fn backend_errors_become_remote_match_failures() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/publications/history"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = BackendClient::new(backend_config(server.uri())).unwrap();
    let err = client.match_ids("silva").await.unwrap_err();
    assert!(matches!(err, EngineError::RemoteMatchFailed { .. }));
    assert!(err.is_recoverable());
}

#[tokio::test]
async fn detail_fetch_returns_items_and_maps_404() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/publications/history/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "search": record_json(7, 5),
            "publicacoes": [
                {
                    "id_api": 10,
                    "numero_processo": "0001234567-89.2026.8.26.0100",
                    "tribunal": "TJSP",
                    "texto_resumo": "Intimação"
                }
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/publications/history/99"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = BackendClient::new(backend_config(server.uri())).unwrap();

    let detail = client.history_detail(7).await.unwrap();
    assert_eq!(detail.record.id, 7);
    assert_eq!(detail.items.len(), 1);
    assert_eq!(
        detail.items[0].process_reference.as_deref(),
        Some("0001234567-89.2026.8.26.0100")
    );

    let err = client.history_detail(99).await.unwrap_err();
    assert!(matches!(err, EngineError::RecordNotFound { record_id: 99 }));
}

#[tokio::test]
async fn clear_history_hits_the_delete_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/publications/history/delete"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"deleted": 12})))
        .expect(1)
        .mount(&server)
        .await;

    let client = BackendClient::new(backend_config(server.uri())).unwrap();
    client.clear_history().await.unwrap();
}

#[tokio::test]
async fn engine_end_to_end_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/publications/history"))
        .and(query_param("q", "00012345678"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(vec![
            record_json(2, 3),
        ])))
        .mount(&server)
        .await;

    let backend = Arc::new(BackendClient::new(backend_config(server.uri())).unwrap());
    let engine = QueryEngine::new(
        backend,
        EngineConfig {
            debounce_ms: 50,
            tribunal_keywords: vec!["tjsp".into()],
        },
    );

    let records: Vec<search_history_engine::SearchRecord> = serde_json::from_value(
        json!([record_json(1, 5), record_json(2, 3), record_json(3, 0)]),
    )
    .unwrap();

    let mut updates = engine.subscribe();
    assert_eq!(engine.handle_input("00012345678"), QueryClass::RemoteCandidate);

    // Before the debounce fires: full non-zero list, nothing highlighted.
    let before = engine.compose(&records);
    assert_eq!(before.visible_records.len(), 2);
    assert!(before.highlight_ids.is_empty());

    tokio::time::timeout(Duration::from_secs(2), updates.changed())
        .await
        .expect("remote match should resolve")
        .unwrap();

    let after = engine.compose(&records);
    assert_eq!(after.visible_records.len(), 2);
    assert_eq!(after.highlight_ids, HashSet::from([2]));
}
