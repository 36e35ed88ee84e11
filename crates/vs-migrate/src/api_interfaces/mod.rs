pub mod cms;
pub mod openai;
pub mod wordpress;

use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::Value;

/// Accept any JSON for the field and keep it only when it has the expected shape.
///
/// WordPress ACF reports unset fields as `false`, `""` or `null`, and sometimes
/// swaps an object for an empty array. All of those become `None`.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Like [`lenient`], falling back to the type's default.
pub(crate) fn lenient_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(lenient(deserializer)?.unwrap_or_default())
}

/// Non-empty trimmed text, if any.
pub(crate) fn text(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}
