use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("response body is not valid json: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("response envelope is not a json object")]
    NotAnEnvelope,
    #[error("field `{field}` is missing or not an object")]
    MissingObject { field: String },
    #[error("field `{field}` is not an array")]
    NotAnArray { field: String },
    #[error("field `{field}` does not match the expected shape: {source}")]
    Shape {
        field: String,
        #[source]
        source: serde_json::Error,
    },
}

fn envelope(raw: &str) -> Result<serde_json::Map<String, Value>, DecodeError> {
    let value: Value = serde_json::from_str(raw).map_err(DecodeError::Parse)?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(DecodeError::NotAnEnvelope),
    }
}

/// Extracts `field` from the response envelope and maps it into `T`. The
/// field must resolve to a JSON object.
pub fn decode_object<T: DeserializeOwned>(raw: &str, field: &str) -> Result<T, DecodeError> {
    let mut map = envelope(raw)?;
    match map.remove(field) {
        Some(value @ Value::Object(_)) => {
            serde_json::from_value(value).map_err(|source| DecodeError::Shape {
                field: field.to_string(),
                source,
            })
        }
        _ => Err(DecodeError::MissingObject {
            field: field.to_string(),
        }),
    }
}

/// Extracts `field` from the response envelope and maps each element into
/// `T`. An absent or null field decodes as an empty vector so callers never
/// have to branch on null.
pub fn decode_array<T: DeserializeOwned>(raw: &str, field: &str) -> Result<Vec<T>, DecodeError> {
    let mut map = envelope(raw)?;
    match map.remove(field) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| {
                serde_json::from_value(item).map_err(|source| DecodeError::Shape {
                    field: field.to_string(),
                    source,
                })
            })
            .collect(),
        Some(_) => Err(DecodeError::NotAnArray {
            field: field.to_string(),
        }),
    }
}
