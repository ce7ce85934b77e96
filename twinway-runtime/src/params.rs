use axum::body::Body;
use axum::extract::{FromRequestParts, RawPathParams};
use bytes::Bytes;
use http::request::Parts;
use http::Uri;

use crate::error::UnmarshalError;

/// Largest request payload an unmarshaler reads.
pub const MAX_BODY_BYTES: usize = 4 * 1024 * 1024;

/// Decoded query pairs in request order. Repeated keys yield one pair per
/// occurrence, so repeated fields append and scalars keep the last value.
pub fn query_params(uri: &Uri) -> Vec<(String, String)> {
    let Some(query) = uri.query() else {
        return Vec::new();
    };
    form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect()
}

/// Path parameters matched by the router, in route order.
pub async fn path_params(parts: &mut Parts) -> Result<Vec<(String, String)>, UnmarshalError> {
    let params = RawPathParams::from_request_parts(parts, &())
        .await
        .map_err(|rejection| UnmarshalError::PathParams(rejection.body_text()))?;
    Ok(params
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect())
}

pub async fn read_body(body: Body) -> Result<Bytes, UnmarshalError> {
    axum::body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|e| UnmarshalError::Body(e.to_string()))
}
