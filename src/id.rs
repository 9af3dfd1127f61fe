use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst};

use crate::error::{Error, Result};

/// Numeric identifier of a Bugs! artist, album, track or video.
///
/// The vendor and the host both pass identifiers around as numbers in some
/// places and as strings in others. Everything is normalized into this type
/// before it reaches a request.
#[serde_as]
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize,
)]
#[serde(transparent)]
pub struct Id(#[serde_as(as = "PickFirst<(_, DisplayFromStr)>")] pub u64);

impl Id {
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for Id {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<Id> for u64 {
    fn from(id: Id) -> Self {
        id.0
    }
}

impl FromStr for Id {
    type Err = Error;

    /// Parses an identifier, ignoring surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns an invalid argument error if `s` is not a plain unsigned
    /// integer.
    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|e| Error::invalid_argument(format!("invalid id \"{s}\": {e}")))
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
