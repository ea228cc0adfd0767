//! Deserializers for config values that arrive as plain strings

use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize as _, Deserializer};

/// Parse a value through its `FromStr` implementation
pub(super) fn from_str<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    <T as FromStr>::Err: Display,
{
    let raw = String::deserialize(deserializer)?;
    T::from_str(&raw).map_err(serde::de::Error::custom)
}

/// Parse an optional value, treating a missing or blank string as unset.
///
/// Environment variables are often exported as empty strings rather than removed, and those
/// should fall back to the default instead of failing to parse.
pub(super) fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    <T as FromStr>::Err: Display,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => T::from_str(&raw)
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}
