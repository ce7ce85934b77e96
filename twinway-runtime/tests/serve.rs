use axum::body::Body;
use axum::http::{HeaderValue, Request, StatusCode};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use http_body_util::BodyExt;
use serde::Serialize;
use tower::ServiceExt;
use twinway_runtime::{respond, swagger_router, Middlewares, ServiceDesc};

#[derive(Serialize)]
struct Greeting {
    text: String,
}

async fn collect(resp: Response) -> (StatusCode, String) {
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8_lossy(&body).to_string())
}

async fn get_path(router: Router, path: &str) -> Response {
    let req = Request::builder().uri(path).body(Body::empty()).unwrap();
    router.oneshot(req).await.unwrap()
}

// ── respond ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn successful_handlers_answer_with_json() {
    let resp = respond(Ok(tonic::Response::new(Greeting {
        text: "hi".into(),
    })));
    let (status, body) = collect(resp).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"text":"hi"}"#);
}

#[tokio::test]
async fn grpc_status_maps_to_http_error() {
    let resp = respond::<Greeting>(Err(tonic::Status::not_found("no such item")));
    let (status, body) = collect(resp).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, r#"{"error":"no such item"}"#);

    let resp = respond::<Greeting>(Err(tonic::Status::unimplemented("not implemented")));
    assert_eq!(resp.status(), StatusCode::NOT_IMPLEMENTED);
}

// ── Middlewares ─────────────────────────────────────────────────────────

async fn tag_outer(mut resp: Response) -> Response {
    resp.headers_mut()
        .append("x-order", HeaderValue::from_static("outer"));
    resp
}

async fn tag_inner(mut resp: Response) -> Response {
    resp.headers_mut()
        .append("x-order", HeaderValue::from_static("inner"));
    resp
}

#[tokio::test]
async fn first_registered_middleware_is_outermost() {
    let middlewares = Middlewares::new()
        .layer(axum::middleware::map_response(tag_outer))
        .layer(axum::middleware::map_response(tag_inner));
    assert_eq!(middlewares.len(), 2);

    let router = Router::new().route("/", middlewares.apply(get(|| async { "ok" })));
    let resp = get_path(router, "/").await;
    let order: Vec<_> = resp
        .headers()
        .get_all("x-order")
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect();
    assert_eq!(order, vec!["inner", "outer"]);
}

#[tokio::test]
async fn empty_chain_leaves_route_untouched() {
    let middlewares = Middlewares::default();
    assert!(middlewares.is_empty());
    let router = Router::new().route("/", middlewares.apply(get(|| async { "ok" })));
    let (status, body) = collect(get_path(router, "/").await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}

// ── ServiceDesc ─────────────────────────────────────────────────────────

struct EchoDesc {
    swagger: Option<&'static [u8]>,
}

impl ServiceDesc for EchoDesc {
    fn register_grpc(&self, routes: tonic::service::Routes) -> tonic::service::Routes {
        routes
    }

    fn register_http(&self, router: Router) -> Router {
        router.route("/v1/echo", get(|| async { "echo" }))
    }

    fn swagger_def(&self) -> Option<&'static [u8]> {
        self.swagger
    }
}

#[tokio::test]
async fn swagger_document_is_served_next_to_routes() {
    let desc = EchoDesc {
        swagger: Some(br#"{"swagger":"2.0"}"#),
    };
    let router = desc
        .register_http(Router::new())
        .merge(swagger_router(&desc, "/swagger.json"));

    let resp = get_path(router.clone(), "/swagger.json").await;
    assert_eq!(resp.headers()["content-type"], "application/json");
    let (status, body) = collect(resp).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"swagger":"2.0"}"#);

    let (status, body) = collect(get_path(router, "/v1/echo").await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "echo");
}

#[tokio::test]
async fn no_swagger_route_without_document() {
    let desc = EchoDesc { swagger: None };
    let resp = get_path(swagger_router(&desc, "/swagger.json"), "/swagger.json").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
