use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::Request;
use axum::response::IntoResponse;
use axum::routing::{MethodRouter, Route};
use tower::{Layer, Service};

type Wrap = Arc<dyn Fn(MethodRouter) -> MethodRouter + Send + Sync>;

/// Ordered chain of route wrappers applied to every generated HTTP route of a
/// service. The first registered wrapper is the outermost.
#[derive(Clone, Default)]
pub struct Middlewares {
    chain: Vec<Wrap>,
}

impl Middlewares {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push<F>(mut self, wrap: F) -> Self
    where
        F: Fn(MethodRouter) -> MethodRouter + Send + Sync + 'static,
    {
        self.chain.push(Arc::new(wrap));
        self
    }

    /// Wrap routes with a tower layer.
    pub fn layer<L>(self, layer: L) -> Self
    where
        L: Layer<Route> + Clone + Send + Sync + 'static,
        L::Service: Service<Request> + Clone + Send + Sync + 'static,
        <L::Service as Service<Request>>::Response: IntoResponse + 'static,
        <L::Service as Service<Request>>::Error: Into<Infallible> + 'static,
        <L::Service as Service<Request>>::Future: Send + 'static,
    {
        self.push(move |route| route.layer(layer.clone()))
    }

    pub fn apply(&self, route: MethodRouter) -> MethodRouter {
        self.chain.iter().rev().fold(route, |route, wrap| wrap(route))
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }
}

impl std::fmt::Debug for Middlewares {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Middlewares")
            .field("len", &self.chain.len())
            .finish()
    }
}
