//! The `multi/invoke/map` batching envelope.
//!
//! Most catalog lookups are bundled into one request: the body is an ordered
//! list of named sub-requests and the response holds one block per
//! sub-request, in the same order.
//!
//! # Wire Format
//!
//! Request:
//! ```json
//! [
//!     { "id": "album", "args": { "album_id": 20343816, "result_type": "DETAIL" } },
//!     { "id": "album_image", "args": { "album_id": 20343816 } }
//! ]
//! ```
//!
//! Response:
//! ```json
//! {
//!     "list": [
//!         { "album": { "result": { ... } } },
//!         { "album_image": { "list": [ ... ] } }
//!     ]
//! }
//! ```
//!
//! Blocks carry either a single `result` or a `list` of items.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use serde_with::{serde_as, DefaultOnNull};

use crate::error::{Error, Result};

/// A named sub-request.
#[derive(Clone, PartialEq, Serialize, Debug)]
pub struct Call {
    pub id: &'static str,
    pub args: Value,
}

impl Call {
    #[must_use]
    pub fn new(id: &'static str, args: Value) -> Self {
        Self { id, args }
    }
}

/// Blocks of a batched response, in request order.
#[serde_as]
#[derive(Clone, Default, PartialEq, Deserialize, Debug)]
pub struct Response {
    #[serde(default)]
    #[serde_as(as = "DefaultOnNull")]
    pub list: Vec<Map<String, Value>>,
}

#[derive(Clone, PartialEq, Deserialize, Debug)]
#[serde(bound = "T: DeserializeOwned")]
struct Block<T> {
    #[serde(default = "Option::default")]
    result: Option<T>,

    #[serde(default = "Option::default")]
    list: Option<Vec<T>>,
}

impl Response {
    /// The `result` of the block at `index`, which must be named `id`.
    ///
    /// # Errors
    ///
    /// Returns a data loss error if the block is missing, has another name,
    /// carries no `result` or does not parse as `T`.
    pub fn result<T>(&self, index: usize, id: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.block::<T>(index, id)?
            .result
            .ok_or_else(|| Error::data_loss(format!("{id}: block has no result")))
    }

    /// The `list` of the block at `index`, which must be named `id`.
    ///
    /// A block without a list is an empty list.
    ///
    /// # Errors
    ///
    /// Returns a data loss error if the block is missing, has another name or
    /// its items do not parse as `T`.
    pub fn list<T>(&self, index: usize, id: &str) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        Ok(self.block::<T>(index, id)?.list.unwrap_or_default())
    }

    fn block<T>(&self, index: usize, id: &str) -> Result<Block<T>>
    where
        T: DeserializeOwned,
    {
        let value = self
            .list
            .get(index)
            .and_then(|block| block.get(id))
            .ok_or_else(|| Error::data_loss(format!("{id}: no block at position {index}")))?;

        serde_json::from_value(value.clone()).map_err(|e| Error::data_loss(format!("{id}: {e}")))
    }
}
