//! HistoryEntry domain model.

use serde::{Deserialize, Deserializer, Serialize};

/// Outcome of a past run as recorded by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RunStatus {
    Pending,
    Complete,
    /// The backend marks runs slower than its 20 s budget as timed out.
    Timeout,
    #[serde(other)]
    Unknown,
}

/// A record of one past inference run.
///
/// History is fetched as an immutable snapshot and replaced wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub file_id: String,
    pub source: String,
    pub model: String,
    pub status: RunStatus,
    #[serde(default)]
    pub url: String,
    /// Elapsed milliseconds, kept as display text.
    #[serde(deserialize_with = "number_or_string")]
    pub runtime: String,
    /// ISO 8601 instant. Parsed lazily so one malformed row cannot fail the whole list.
    pub timestamp: String,
}

fn number_or_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Float(f64),
        Text(String),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Int(n) => n.to_string(),
        Raw::Float(f) => f.to_string(),
        Raw::Text(s) => s,
    })
}
