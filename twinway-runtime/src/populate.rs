//! Population of message fields from textual path and query values.
//!
//! Messages are handled through their serde representation: the target is
//! serialized to JSON, the addressed field is located by dotted path, the
//! text is coerced to the kind the field currently holds, and the result is
//! deserialized back. Messages must deserialize from a partial object
//! (`#[serde(default)]`) so absent intermediate messages can be created.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Number, Value};
use tracing::debug;

use crate::error::UnmarshalError;

/// Set the field at dotted `path` of `msg` from `value`.
///
/// Repeated fields get the value appended. Field names match exactly first,
/// then ignoring ASCII case, then ignoring case and underscores (so JSON
/// style `itemId` reaches `item_id`).
pub fn populate_field_from_path<T>(msg: &mut T, path: &str, value: &str) -> Result<(), UnmarshalError>
where
    T: Serialize + DeserializeOwned,
{
    let mut current = to_json(msg)?;
    populate_json::<T>(&mut current, path, value)?;
    *msg = from_json(current, path, value)?;
    Ok(())
}

/// Set a field from a query parameter.
///
/// Keys that name no field of `msg` are skipped, so unrelated parameters
/// (tracking tags, cache busters) don't fail the request. Coercion failures
/// on known fields are still errors.
pub fn populate_query_field<T>(msg: &mut T, key: &str, value: &str) -> Result<(), UnmarshalError>
where
    T: Serialize + DeserializeOwned,
{
    match populate_field_from_path(msg, key, value) {
        Err(UnmarshalError::UnknownField(field)) => {
            debug!(%field, "ignoring query parameter without a matching field");
            Ok(())
        }
        result => result,
    }
}

pub(crate) fn to_json<T: Serialize>(msg: &T) -> Result<Value, UnmarshalError> {
    serde_json::to_value(msg).map_err(|e| UnmarshalError::Payload(e.to_string()))
}

fn from_json<T: DeserializeOwned>(json: Value, path: &str, value: &str) -> Result<T, UnmarshalError> {
    serde_json::from_value(json).map_err(|e| UnmarshalError::InvalidValue {
        field: path.to_string(),
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// Populate the JSON form of a `T`, using `T` to fill in absent messages and
/// to pick a coercion when the field's kind can't be read off its value.
pub(crate) fn populate_json<T>(current: &mut Value, path: &str, text: &str) -> Result<(), UnmarshalError>
where
    T: Serialize + DeserializeOwned,
{
    loop {
        match resolve(current, path, text)? {
            Target::Materialized => {
                let msg: T = from_json(current.take(), path, text)?;
                *current = to_json(&msg)?;
            }
            Target::Field {
                pointer,
                candidates,
                append,
            } => {
                let single = candidates.len() == 1;
                for candidate in candidates {
                    let mut trial = current.clone();
                    write(&mut trial, &pointer, candidate, append);
                    if single || serde_json::from_value::<T>(trial.clone()).is_ok() {
                        *current = trial;
                        return Ok(());
                    }
                }
                return Err(UnmarshalError::InvalidValue {
                    field: path.to_string(),
                    value: text.to_string(),
                    reason: "no matching type".to_string(),
                });
            }
        }
    }
}

enum Target {
    /// Write one of `candidates` at the JSON pointer, first acceptable wins.
    Field {
        pointer: String,
        candidates: Vec<Value>,
        append: bool,
    },
    /// A null message along the path was replaced by `{}`; the caller must
    /// round-trip through the message type and retry.
    Materialized,
}

fn resolve(root: &mut Value, path: &str, text: &str) -> Result<Target, UnmarshalError> {
    let mut pointer = String::new();
    let mut walked = String::new();
    let mut node = root;
    let mut segments = path.split('.').peekable();

    while let Some(segment) = segments.next() {
        let Value::Object(fields) = node else {
            return Err(UnmarshalError::NotAMessage(walked));
        };
        let key = field_key(fields, segment)
            .ok_or_else(|| UnmarshalError::UnknownField(path.to_string()))?;
        pointer.push('/');
        pointer.push_str(&key.replace('~', "~0").replace('/', "~1"));
        if !walked.is_empty() {
            walked.push('.');
        }
        walked.push_str(&key);

        let Some(slot) = fields.get_mut(&key) else {
            return Err(UnmarshalError::UnknownField(path.to_string()));
        };
        if segments.peek().is_none() {
            let (candidates, append) = candidates(slot, path, text)?;
            return Ok(Target::Field {
                pointer,
                candidates,
                append,
            });
        }
        if slot.is_null() {
            *slot = Value::Object(Map::new());
            return Ok(Target::Materialized);
        }
        node = slot;
    }

    Err(UnmarshalError::UnknownField(path.to_string()))
}

fn field_key(fields: &Map<String, Value>, name: &str) -> Option<String> {
    if fields.contains_key(name) {
        return Some(name.to_string());
    }
    let squash = |s: &str| -> String {
        s.chars()
            .filter(|c| *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect()
    };
    fields
        .keys()
        .find(|k| k.eq_ignore_ascii_case(name))
        .or_else(|| {
            let wanted = squash(name);
            fields.keys().find(|k| squash(k) == wanted)
        })
        .cloned()
}

fn write(root: &mut Value, pointer: &str, value: Value, append: bool) {
    let Some(slot) = root.pointer_mut(pointer) else {
        return;
    };
    match slot {
        Value::Array(items) if append => items.push(value),
        slot => *slot = value,
    }
}

/// Values the text may stand for, given the field's current value.
fn candidates(current: &Value, field: &str, text: &str) -> Result<(Vec<Value>, bool), UnmarshalError> {
    match current {
        Value::Array(items) => match items.first() {
            Some(sample) => Ok((vec![coerce_like(sample, field, text)?], true)),
            None => Ok((infer(text), true)),
        },
        Value::Null => Ok((infer(text), false)),
        other => Ok((vec![coerce_like(other, field, text)?], false)),
    }
}

fn coerce_like(kind: &Value, field: &str, text: &str) -> Result<Value, UnmarshalError> {
    let invalid = |reason: &str| UnmarshalError::InvalidValue {
        field: field.to_string(),
        value: text.to_string(),
        reason: reason.to_string(),
    };
    match kind {
        Value::Bool(_) => text
            .parse::<bool>()
            .map(Value::Bool)
            .map_err(|_| invalid("expected a boolean")),
        Value::Number(n) if n.is_f64() => text
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| invalid("expected a number")),
        Value::Number(_) => integer(text).ok_or_else(|| invalid("expected an integer")),
        Value::String(_) => Ok(Value::String(text.to_string())),
        Value::Object(_) => Err(invalid("a message can't be set from text")),
        Value::Array(_) | Value::Null => Ok(Value::String(text.to_string())),
    }
}

fn integer(text: &str) -> Option<Value> {
    text.parse::<i64>()
        .map(Value::from)
        .or_else(|_| text.parse::<u64>().map(Value::from))
        .ok()
}

/// Candidates for a field whose kind is unknown, most specific first.
fn infer(text: &str) -> Vec<Value> {
    let mut candidates = Vec::new();
    if let Some(n) = integer(text) {
        candidates.push(n);
    }
    if let Some(n) = text.parse::<f64>().ok().and_then(Number::from_f64) {
        candidates.push(Value::Number(n));
    }
    if let Ok(b) = text.parse::<bool>() {
        candidates.push(Value::Bool(b));
    }
    candidates.push(Value::String(text.to_string()));
    candidates
}
