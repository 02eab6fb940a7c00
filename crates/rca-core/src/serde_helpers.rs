//! Deserializers for loosely typed upstream fields.
//!
//! Record endpoints emit epoch-millis and ids either as JSON numbers or as
//! numeric strings depending on the entity; both spellings are accepted.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(i64),
    Text(String),
}

pub mod epoch_millis {
    use super::{Deserialize, Deserializer, NumberOrString};
    use serde::de::Error as _;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match NumberOrString::deserialize(deserializer)? {
            NumberOrString::Number(value) => Ok(value),
            NumberOrString::Text(text) => text
                .trim()
                .parse::<i64>()
                .map_err(|_| D::Error::custom(format!("invalid epoch millis '{text}'"))),
        }
    }
}

pub fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(value) => Ok(value.to_string()),
        NumberOrString::Text(text) if text.is_empty() => Err(D::Error::custom("empty id")),
        NumberOrString::Text(text) => Ok(text),
    }
}

pub fn optional_id_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<NumberOrString>::deserialize(deserializer).map(|value| {
        value.map(|value| match value {
            NumberOrString::Number(value) => value.to_string(),
            NumberOrString::Text(text) => text,
        })
    })
}
