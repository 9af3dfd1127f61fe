//! Wire types of the Bugs! mobile API.
//!
//! Vendor responses are parsed into these types once, at the boundary. Fields
//! the vendor may leave out or send as `null` are `Option`s or default to
//! empty collections.
//!
//! # Submodules
//!
//! * [`auth`] - Login and account entitlement on the account host
//! * [`catalog`] - Artists, albums, tracks and videos
//! * [`invoke`] - The `multi/invoke/map` batching envelope
//! * [`lyrics`] - Plain and timed lyrics
//! * [`search`] - Combined and per-category search
//! * [`streaming`] - Stream URL resolution

pub mod auth;
pub mod catalog;
pub mod invoke;
pub mod lyrics;
pub mod search;
pub mod streaming;

use std::fmt::Debug;

use serde::{Deserialize, Deserializer};

use crate::error::Result;

/// Parses and logs JSON responses from the Bugs! APIs.
///
/// # Logging
///
/// * Success: Logs parsed structure at TRACE level
/// * Parse Error: Logs raw JSON at TRACE level if valid JSON
/// * Invalid JSON: Logs error and raw text at ERROR level
///
/// # Errors
///
/// Returns a data loss error if the body is not valid JSON or does not
/// match `T`.
pub fn json<T>(body: &str, origin: &str) -> Result<T>
where
    T: for<'de> Deserialize<'de> + Debug,
{
    match serde_json::from_str(body) {
        Ok(result) => {
            trace!("{origin}: {result:#?}");
            Ok(result)
        }
        Err(e) => {
            if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
                trace!("{origin}: {json:#?}");
            } else {
                error!("{origin}: failed parsing response ({e:?})");
                trace!("{body}");
            }
            Err(e.into())
        }
    }
}

/// Deserializes the vendor's boolean flags.
///
/// Depending on the endpoint, flags arrive as JSON booleans, as `0`/`1` or as
/// `"Y"`/`"N"`. A missing or `null` flag is `false`.
pub(crate) fn flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Int(i64),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        None => false,
        Some(Raw::Bool(value)) => value,
        Some(Raw::Int(value)) => value != 0,
        Some(Raw::Text(value)) => {
            value.eq_ignore_ascii_case("y") || value.eq_ignore_ascii_case("true")
        }
    })
}
