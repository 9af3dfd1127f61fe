//! Stream URL resolution (`GET play/track/{id}/streaming`).
//!
//! # Wire Format
//!
//! ```json
//! {
//!     "result": {
//!         "state": "OK",
//!         "url": "https://..."
//!     }
//! }
//! ```
//!
//! Any other `state` means the requested bitrate is not available right now.

use serde::Deserialize;
use url::Url;
use veil::Redact;

/// The state of a stream that can be downloaded.
pub const STATE_OK: &str = "OK";

#[derive(Clone, Default, PartialEq, Eq, Deserialize, Debug)]
pub struct Response {
    #[serde(default)]
    pub result: Option<Stream>,
}

#[derive(Clone, Default, PartialEq, Eq, Deserialize, Redact)]
pub struct Stream {
    #[serde(default)]
    pub state: String,

    /// Signed download URL (redacted in debug output)
    #[serde(default)]
    #[redact]
    pub url: Option<Url>,
}

impl Stream {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.state == STATE_OK
    }
}
