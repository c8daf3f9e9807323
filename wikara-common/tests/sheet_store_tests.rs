//! HTTP sheet store and reference client against an in-process stub server

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use reqwest::Client;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use wikara_common::dashboard::load_joined;
use wikara_common::reference::{reference_source, HttpReference, ReferenceSource};
use wikara_common::sheets::{AppendPayload, HttpSheetStore, SheetStore};
use wikara_common::Error;

type Received = Arc<Mutex<Vec<Value>>>;

async fn export() -> Json<Value> {
    Json(json!({
        "data": [
            ["ID SLS", "Timestamp", "Nama", "Kecamatan", "Desa", "SLS", "Jumlah Sub SLS"],
            [51020100010001_u64, "1/8/2025, 09.05.07", "Ni Made Sari", "010", "001", "0001", 2]
        ]
    }))
}

async fn reference() -> Json<Value> {
    Json(json!([{
        "id": "010",
        "name": "Selemadeg",
        "desa": [{
            "id": "001",
            "name": "Antap",
            "sls": [
                {"id": "51020100010001", "name": "Banjar Antap"},
                {"id": "51020100010002", "name": "Banjar Dukuh"}
            ]
        }]
    }]))
}

async fn append(State(received): State<Received>, Json(body): Json<Value>) -> Json<Value> {
    let rejected = body["mainData"].as_array().map_or(true, |row| row.is_empty());
    received.lock().unwrap().push(body);
    if rejected {
        Json(json!({"success": false, "message": "Baris utama kosong"}))
    } else {
        Json(json!({"success": true, "message": "ok"}))
    }
}

async fn broken() -> StatusCode {
    StatusCode::INTERNAL_SERVER_ERROR
}

/// Spawn the stub and return its base URL
async fn spawn_stub(received: Received) -> String {
    let app = Router::new()
        .route("/export", get(export))
        .route("/reference.json", get(reference))
        .route("/exec", post(append))
        .route("/broken", get(broken).post(broken))
        .with_state(received);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

#[tokio::test]
async fn test_fetch_export_reads_data_array() {
    let base = spawn_stub(Received::default()).await;
    let store = HttpSheetStore::new(Client::new(), Some(format!("{}/export", base)), None);

    let export = store.fetch_export().await.unwrap();
    assert_eq!(export.records().len(), 1);
    assert_eq!(export.header().unwrap()[0], "ID SLS");
}

#[tokio::test]
async fn test_append_posts_script_payload() {
    let received = Received::default();
    let base = spawn_stub(received.clone()).await;
    let store = HttpSheetStore::new(Client::new(), None, Some(format!("{}/exec", base)));

    let payload = AppendPayload {
        main_row: vec!["51020100010001".to_string(), "Ni Made Sari".to_string()],
        detail_rows: vec![vec!["51020100010001".to_string(), "'5102010001000101".to_string()]],
    };
    let outcome = store.append(&payload).await.unwrap();
    assert!(outcome.success);

    let bodies = received.lock().unwrap();
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["mainData"][1], "Ni Made Sari");
    assert_eq!(bodies[0]["subSLSData"][0][1], "'5102010001000101");
}

#[tokio::test]
async fn test_append_rejection_is_reported_in_outcome() {
    let base = spawn_stub(Received::default()).await;
    let store = HttpSheetStore::new(Client::new(), None, Some(format!("{}/exec", base)));

    let payload = AppendPayload {
        main_row: vec![],
        detail_rows: vec![],
    };
    let outcome = store.append(&payload).await.unwrap();
    assert!(!outcome.success);
    assert_eq!(outcome.message, "Baris utama kosong");
}

#[tokio::test]
async fn test_error_status_is_upstream_error() {
    let base = spawn_stub(Received::default()).await;
    let url = format!("{}/broken", base);
    let store = HttpSheetStore::new(Client::new(), Some(url.clone()), Some(url.clone()));

    assert!(matches!(store.fetch_export().await, Err(Error::Upstream(_))));

    let payload = AppendPayload {
        main_row: vec!["x".to_string()],
        detail_rows: vec![],
    };
    assert!(matches!(store.append(&payload).await, Err(Error::Upstream(_))));

    let reference = HttpReference::new(Client::new(), url);
    assert!(matches!(reference.load().await, Err(Error::Upstream(_))));
}

#[tokio::test]
async fn test_unreachable_endpoint_is_http_error() {
    // Bind then drop to get a port nothing listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let store = HttpSheetStore::new(Client::new(), Some(format!("http://{}/export", addr)), None);
    assert!(matches!(store.fetch_export().await, Err(Error::Http(_))));
}

#[tokio::test]
async fn test_load_joined_over_http() {
    let base = spawn_stub(Received::default()).await;
    let client = Client::new();
    let store = HttpSheetStore::new(client.clone(), Some(format!("{}/export", base)), None);
    let reference = reference_source(&format!("{}/reference.json", base), client);

    let joined = load_joined(&store, reference.as_ref()).await.unwrap();

    // Numeric id cell in the export matches the string id in the hierarchy
    assert_eq!(joined.sub_unit_count(), 2);
    assert_eq!(joined.matched_count(), 1);
    let first = &joined.regions[0].sub_regions[0].sub_units[0];
    assert_eq!(
        first.submission.as_ref().unwrap().field(joined.columns.respondent),
        Some("Ni Made Sari")
    );
}
