use http::header::CONTENT_TYPE;
use http::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Request built by a generated `client_*_request` function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientRequest {
    pub method: Method,
    /// Path relative to the client's base URL.
    pub path: String,
    /// Encoded query string, without the leading `?`.
    pub query: Option<String>,
    /// JSON payload.
    pub body: Option<Vec<u8>>,
}

impl ClientRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: None,
            body: None,
        }
    }

    pub fn with_json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ClientError> {
        self.body = Some(serde_json::to_vec(body).map_err(ClientError::Encode)?);
        Ok(self)
    }

    /// Send the fields of `msg` as query parameters.
    ///
    /// Nested messages become dotted keys and repeated scalars repeat their
    /// key. Fields holding their default value are left out, as are keys in
    /// `exclude` (lowercase) and everything below them.
    pub fn with_query<T: Serialize + ?Sized>(
        mut self,
        msg: &T,
        exclude: &[&str],
    ) -> Result<Self, ClientError> {
        let value = serde_json::to_value(msg).map_err(ClientError::Encode)?;
        let mut pairs = Vec::new();
        flatten_query(&value, "", exclude, &mut pairs);
        if !pairs.is_empty() {
            let mut query = form_urlencoded::Serializer::new(String::new());
            for (key, value) in &pairs {
                query.append_pair(key, value);
            }
            self.query = Some(query.finish());
        }
        Ok(self)
    }

    fn url(&self, base_url: &str) -> String {
        match &self.query {
            Some(query) => format!("{base_url}{}?{query}", self.path),
            None => format!("{base_url}{}", self.path),
        }
    }
}

/// Percent-encode a value so it stays a single path segment.
pub fn encode_path_segment(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

fn excluded(key: &str, exclude: &[&str]) -> bool {
    let key = key.to_lowercase();
    exclude.iter().any(|name| {
        key == *name
            || key
                .strip_prefix(name)
                .is_some_and(|rest| rest.starts_with('.'))
    })
}

fn flatten_query(value: &Value, prefix: &str, exclude: &[&str], pairs: &mut Vec<(String, String)>) {
    let Value::Object(fields) = value else {
        return;
    };
    for (name, field) in fields {
        let key = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{prefix}.{name}")
        };
        if excluded(&key, exclude) {
            continue;
        }
        match field {
            Value::Object(_) => flatten_query(field, &key, exclude, pairs),
            Value::Array(items) => {
                for item in items {
                    if let Some(text) = scalar_text(item) {
                        pairs.push((key.clone(), text));
                    }
                }
            }
            other => {
                if let Some(text) = scalar_text(other).filter(|_| !is_default(other)) {
                    pairs.push((key, text));
                }
            }
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn is_default(value: &Value) -> bool {
    match value {
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::Bool(b) => !b,
        _ => true,
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("couldn't encode request: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("couldn't decode response: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server responded {status}: {message}")]
    Status { status: StatusCode, message: String },
}

/// Transport shared by generated HTTP clients.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a request and decode the JSON response. Non-2xx responses become
    /// [`ClientError::Status`] carrying the server's `error` message.
    pub async fn execute<T: DeserializeOwned>(&self, request: ClientRequest) -> Result<T, ClientError> {
        let url = request.url(&self.base_url);
        tracing::debug!(method = %request.method, %url, "sending request");

        let mut builder = self.client.request(request.method, url);
        if let Some(body) = request.body {
            builder = builder.header(CONTENT_TYPE, "application/json").body(body);
        }
        let response = builder.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<serde_json::Value>(&bytes)
                .ok()
                .and_then(|v| v.get("error")?.as_str().map(str::to_owned))
                .unwrap_or_else(|| String::from_utf8_lossy(&bytes).into_owned());
            return Err(ClientError::Status { status, message });
        }
        serde_json::from_slice(&bytes).map_err(ClientError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_segments_are_percent_encoded() {
        assert_eq!(encode_path_segment("abc-1.2_x"), "abc-1.2_x");
        assert_eq!(encode_path_segment("a/b?c d+e"), "a%2Fb%3Fc%20d%2Be");
    }

    #[test]
    fn query_skips_defaults_and_excluded_keys() {
        let msg = serde_json::json!({
            "id": 7,
            "note": "",
            "limit": 0,
            "active": true,
            "tags": ["x", "y"],
            "item": {"sku": "a b", "price": 0.0},
            "body": {"text": "payload"},
        });
        let request = ClientRequest::new(Method::GET, "/v1/items/7")
            .with_query(&msg, &["id", "body"])
            .unwrap();
        assert_eq!(
            request.query.as_deref(),
            Some("active=true&item.sku=a+b&tags=x&tags=y")
        );
        assert_eq!(
            request.url("http://host"),
            "http://host/v1/items/7?active=true&item.sku=a+b&tags=x&tags=y"
        );
    }

    #[test]
    fn empty_query_is_omitted() {
        let request = ClientRequest::new(Method::GET, "/v1/items")
            .with_query(&serde_json::json!({"id": 0}), &[])
            .unwrap();
        assert_eq!(request.query, None);
        assert_eq!(request.url("http://host"), "http://host/v1/items");
    }
}
