use axum::http::header::CONTENT_TYPE;
use axum::routing::get;
use axum::Router;

/// Registration surface of a generated service description.
pub trait ServiceDesc: Send + Sync {
    /// Add the tonic service.
    fn register_grpc(&self, routes: tonic::service::Routes) -> tonic::service::Routes;

    /// Add one route per HTTP binding.
    fn register_http(&self, router: Router) -> Router;

    /// Embedded API description, when one was generated.
    fn swagger_def(&self) -> Option<&'static [u8]> {
        None
    }
}

/// Router serving a description's embedded API document at `path`. Empty when
/// the description carries none.
pub fn swagger_router(desc: &dyn ServiceDesc, path: &str) -> Router {
    match desc.swagger_def() {
        Some(def) => Router::new().route(
            path,
            get(move || async move { ([(CONTENT_TYPE, "application/json")], def) }),
        ),
        None => Router::new(),
    }
}
