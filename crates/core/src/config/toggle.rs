//! Lenient boolean parsing for environment toggles.
//!
//! A toggle is on when its variable holds any non-empty value other than
//! `0`, `false`, `no` or `off` (case-insensitive).

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Raw {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Raw::deserialize(deserializer)? {
        Raw::Bool(b) => b,
        Raw::Int(n) => n != 0,
        Raw::Float(f) => f != 0.0,
        Raw::Text(s) => is_truthy(&s),
    })
}

fn is_truthy(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && !matches!(value.to_ascii_lowercase().as_str(), "0" | "false" | "no" | "off")
}
