//! Serde helpers for lenient backend payloads.

use serde::{Deserialize, Deserializer};

/// An identifier the backend may send either as a JSON string or as a number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StringOrNumber {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl StringOrNumber {
    pub fn into_string(self) -> String {
        match self {
            StringOrNumber::Text(text) => text,
            StringOrNumber::Integer(n) => n.to_string(),
            StringOrNumber::Float(n) => n.to_string(),
        }
    }
}

/// Deserializes a number that may arrive as a JSON number, a numeric string or `null`.
///
/// `null` and unparsable strings become `0.0`, so a metric the backend could
/// not read renders as empty rather than failing the whole payload.
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<StringOrNumber>::deserialize(deserializer)?;
    Ok(match raw {
        None => 0.0,
        Some(StringOrNumber::Integer(n)) => n as f64,
        Some(StringOrNumber::Float(n)) => n,
        Some(StringOrNumber::Text(text)) => text.trim().parse().unwrap_or(0.0),
    })
}

/// Same as [`lenient_f64`] for unsigned counters (bytes, seconds).
pub fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = lenient_f64(deserializer)?;
    Ok(if value.is_finite() && value > 0.0 {
        value as u64
    } else {
        0
    })
}
