// Response object
// The decoded API payload, validated into event records before import

use serde::Deserialize;
use serde_json::Value;

use crate::entities::event::{EventRecord, RawEventRecord};
use crate::errors::PayloadError;

/// Object keys that may wrap the event array.
const WRAPPER_KEYS: [&str; 2] = ["events", "data"];

/// Raw payload returned by the events endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseObject(Value);

impl ResponseObject {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// Validates the payload into event records.
    ///
    /// Accepts a bare array, an object wrapping the array under `events` or
    /// `data`, or a single event object. Any invalid element fails the whole
    /// payload.
    pub fn records(&self) -> Result<Vec<EventRecord>, PayloadError> {
        let elements = match &self.0 {
            Value::Array(items) => items,
            Value::Object(map) => match WRAPPER_KEYS.iter().find_map(|key| map.get(*key)) {
                Some(Value::Array(items)) => items,
                Some(other) => {
                    return Err(PayloadError::UnexpectedShape {
                        found: kind_name(other),
                    })
                }
                None if map.contains_key("id") => return Ok(vec![parse_record(0, &self.0)?]),
                None => return Err(PayloadError::MissingEvents),
            },
            other => {
                return Err(PayloadError::UnexpectedShape {
                    found: kind_name(other),
                })
            }
        };

        elements
            .iter()
            .enumerate()
            .map(|(index, value)| parse_record(index, value))
            .collect()
    }
}

impl From<Value> for ResponseObject {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

fn parse_record(index: usize, value: &Value) -> Result<EventRecord, PayloadError> {
    let raw = RawEventRecord::deserialize(value).map_err(|err| PayloadError::InvalidRecord {
        index,
        message: err.to_string(),
    })?;
    raw.into_record().map_err(|message| PayloadError::InvalidRecord { index, message })
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
