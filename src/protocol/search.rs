//! Search responses.
//!
//! The combined search is a multi-invoke block named `get_search_combine`
//! whose `result` holds one listing per entity kind:
//!
//! ```json
//! {
//!     "track":  { "list": [ ... ] },
//!     "album":  { "list": [ ... ] },
//!     "artist": { "list": [ ... ] }
//! }
//! ```
//!
//! The per-category search (`GET search/{category}`) answers with a single
//! listing at the top level.

use std::fmt;

use serde::{de::DeserializeOwned, Deserialize};
use serde_with::{serde_as, DefaultOnNull};

use super::catalog::{Album, Artist, Track};

/// Multi-invoke id of the combined search.
pub const COMBINE: &str = "get_search_combine";

#[derive(Clone, Default, PartialEq, Deserialize, Debug)]
pub struct Combined {
    #[serde(default)]
    pub track: Listing<Track>,

    #[serde(default)]
    pub album: Listing<Album>,

    #[serde(default)]
    pub artist: Listing<Artist>,
}

#[serde_as]
#[derive(Clone, PartialEq, Deserialize, Debug)]
#[serde(bound = "T: DeserializeOwned")]
pub struct Listing<T> {
    #[serde(default = "Vec::new")]
    #[serde_as(as = "DefaultOnNull")]
    pub list: Vec<T>,
}

impl<T> Default for Listing<T> {
    fn default() -> Self {
        Self { list: Vec::new() }
    }
}

/// Path segment of the per-category search.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Track,
    Album,
    Artist,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Track => "track",
            Self::Album => "album",
            Self::Artist => "artist",
        })
    }
}
