//! Lyrics of a track (`GET track/{id}/lyrics`).
//!
//! # Wire Format
//!
//! ```json
//! { "result": { "time": "12.5|Hello＃13.0|World" } }
//! ```
//!
//! or
//!
//! ```json
//! { "result": { "normal": "Hello\nWorld" } }
//! ```
//!
//! `result` is `null` when the track has no lyrics.

use serde::Deserialize;

#[derive(Clone, Default, PartialEq, Eq, Deserialize, Debug)]
pub struct Response {
    #[serde(default)]
    pub result: Option<Lyrics>,
}

/// Either timed or plain lyrics, never both in practice.
#[derive(Clone, Default, PartialEq, Eq, Deserialize, Debug)]
pub struct Lyrics {
    /// Timed lyrics in the vendor's `seconds|text＃seconds|text` format.
    #[serde(default)]
    pub time: Option<String>,

    #[serde(default)]
    pub normal: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::json;

    #[test]
    fn parses_both_shapes() {
        let timed: Response = json(r#"{"result":{"time":"1.0|a"}}"#, "lyrics").unwrap();
        assert_eq!(timed.result.unwrap().time.as_deref(), Some("1.0|a"));

        let none: Response = json(r#"{"result":null}"#, "lyrics").unwrap();
        assert!(none.result.is_none());
    }
}
