use axum::http::{Method, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use twinway_runtime::{error_response, ClientError, ClientRequest, HttpClient};

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct Item {
    sku: String,
    price: f64,
}

async fn spawn_server() -> String {
    let app = Router::new()
        .route("/v1/items", post(|Json(item): Json<Item>| async move { Json(item) }))
        .route(
            "/v1/missing",
            get(|| async { error_response(StatusCode::NOT_FOUND, "no such item") }),
        );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/")
}

#[test]
fn json_body_is_encoded_on_request() {
    let item = Item {
        sku: "a".into(),
        price: 1.0,
    };
    let request = ClientRequest::new(Method::POST, "/v1/items")
        .with_json(&item)
        .unwrap();
    assert_eq!(request.path, "/v1/items");
    let decoded: Item = serde_json::from_slice(request.body.as_deref().unwrap()).unwrap();
    assert_eq!(decoded, item);
}

#[tokio::test]
async fn executes_and_decodes_json() {
    let client = HttpClient::new(spawn_server().await);
    assert!(!client.base_url().ends_with('/'));

    let item = Item {
        sku: "abc".into(),
        price: 2.5,
    };
    let request = ClientRequest::new(Method::POST, "/v1/items")
        .with_json(&item)
        .unwrap();
    let echoed: Item = client.execute(request).await.unwrap();
    assert_eq!(echoed, item);
}

#[tokio::test]
async fn error_status_carries_server_message() {
    let client = HttpClient::new(spawn_server().await);
    let err = client
        .execute::<Item>(ClientRequest::new(Method::GET, "/v1/missing"))
        .await
        .unwrap_err();
    match err {
        ClientError::Status { status, message } => {
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(message, "no such item");
        }
        other => panic!("unexpected error: {other}"),
    }
}
