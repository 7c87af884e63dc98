// Identifier value objects

use std::fmt;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// Stable identifier assigned by the remote API. Used as the merge key when
/// reconciling fetched records with persisted entities.
///
/// JSON numbers and strings both deserialize into the same textual form, so
/// `7` and `"7"` name the same event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RemoteId(String);

impl RemoteId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RemoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RemoteId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(serde_json::Number),
        }

        let value = match RawId::deserialize(deserializer)? {
            RawId::Text(text) => text.trim().to_string(),
            RawId::Number(number) => number.to_string(),
        };
        if value.is_empty() {
            return Err(de::Error::custom("id must not be blank"));
        }
        Ok(Self(value))
    }
}
