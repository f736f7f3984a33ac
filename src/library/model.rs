use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One catalogue entry: descriptive metadata plus a reference to its audio.
///
/// Every field is optional on the wire and defaults to an empty string.
/// Non-string scalars (a numeric `tempo`, say) are kept as their JSON text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackRecord {
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(rename = "file", deserialize_with = "lenient_string")]
    pub file_ref: String,
    #[serde(deserialize_with = "lenient_string")]
    pub category: String,
    #[serde(deserialize_with = "lenient_string")]
    pub fit: String,
    #[serde(deserialize_with = "lenient_string")]
    pub mood: String,
    #[serde(deserialize_with = "lenient_string")]
    pub tempo: String,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
    })
}
