use http::header::CONTENT_TYPE;
use http::HeaderMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::UnmarshalError;
use crate::populate::{populate_json, to_json};

/// Payload codecs understood by generated unmarshalers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marshaler {
    Json,
    Form,
}

impl Marshaler {
    pub fn content_type(&self) -> &'static str {
        match self {
            Marshaler::Json => "application/json",
            Marshaler::Form => "application/x-www-form-urlencoded",
        }
    }

    /// Decode `payload` on top of `target`.
    ///
    /// Values already present in `target` survive unless the payload sets
    /// them: objects merge recursively, anything else is replaced. An empty
    /// payload leaves `target` untouched.
    pub fn unmarshal_into<T>(&self, payload: &[u8], target: &mut T) -> Result<(), UnmarshalError>
    where
        T: Serialize + DeserializeOwned,
    {
        if payload.iter().all(u8::is_ascii_whitespace) {
            return Ok(());
        }
        let mut current = to_json(target)?;
        match self {
            Marshaler::Json => {
                let incoming: Value = serde_json::from_slice(payload)
                    .map_err(|e| UnmarshalError::Payload(e.to_string()))?;
                merge(&mut current, incoming);
            }
            Marshaler::Form => {
                for (key, value) in form_urlencoded::parse(payload) {
                    populate_json::<T>(&mut current, &key, &value)?;
                }
            }
        }
        *target =
            serde_json::from_value(current).map_err(|e| UnmarshalError::Payload(e.to_string()))?;
        Ok(())
    }
}

/// Pick the codec for a request by its `Content-Type`. Missing or unknown
/// types fall back to JSON.
pub fn marshaler_for_request(headers: &HeaderMap) -> Marshaler {
    let Some(content_type) = headers.get(CONTENT_TYPE) else {
        return Marshaler::Json;
    };
    let essence = content_type
        .to_str()
        .unwrap_or_default()
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    match essence.as_str() {
        "application/x-www-form-urlencoded" => Marshaler::Form,
        "application/json" => Marshaler::Json,
        other if other.ends_with("+json") => Marshaler::Json,
        other => {
            tracing::debug!(content_type = other, "unknown content type, decoding as JSON");
            Marshaler::Json
        }
    }
}

fn merge(target: &mut Value, incoming: Value) {
    match (target, incoming) {
        (Value::Object(existing), Value::Object(incoming)) => {
            for (key, value) in incoming {
                match existing.get_mut(&key) {
                    Some(slot) => merge(slot, value),
                    None => {
                        existing.insert(key, value);
                    }
                }
            }
        }
        (target, incoming) => *target = incoming,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    #[test]
    fn content_type_selects_marshaler() {
        let mut headers = HeaderMap::new();
        assert_eq!(marshaler_for_request(&headers), Marshaler::Json);

        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded; charset=utf-8"),
        );
        assert_eq!(marshaler_for_request(&headers), Marshaler::Form);

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        assert_eq!(marshaler_for_request(&headers), Marshaler::Json);
    }

    #[test]
    fn merge_keeps_untouched_fields() {
        let mut target = serde_json::json!({"a": 1, "b": {"c": 2, "d": 3}});
        merge(&mut target, serde_json::json!({"b": {"c": 5}, "e": true}));
        assert_eq!(
            target,
            serde_json::json!({"a": 1, "b": {"c": 5, "d": 3}, "e": true})
        );
    }
}
