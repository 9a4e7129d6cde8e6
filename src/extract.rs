//! Convenience extractor for binding every captured path segment onto one
//! `Deserialize` struct in a single call, instead of resolving each segment by name.
//!
//! Ground: `typed/core.rs::TypedHandlerFor::from_handler`, which builds a
//! `serde_json::Map` from `req.path_params` and deserializes it in one
//! `serde_json::from_value` call. [`MatchResult::named_map`] plays the role
//! `req.path_params` played there; see `SPEC_FULL.md` REDESIGN FLAGS §1.

use crate::error::{Result, RouterError};
use crate::matching::MatchResult;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Deserializes every named capture in a [`MatchResult`] onto `T` in one step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Path<T>(pub T);

impl<T: DeserializeOwned> Path<T> {
    /// Build `T` from the matcher's named captures. Absent optional segments are
    /// simply missing keys; `T` should declare them `Option<_>` if it wants to accept
    /// that.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::UnresolvedParameterType`] if the captured segments do not
    /// deserialize onto `T` (a required field is missing, or a value doesn't parse into
    /// its declared type).
    pub fn from_match(matched: &MatchResult) -> Result<Self> {
        let mut map = Map::new();
        for (name, value) in matched.named_map() {
            map.insert(name.clone(), Value::String(value.clone()));
        }
        serde_json::from_value(Value::Object(map))
            .map(Path)
            .map_err(|_| RouterError::UnresolvedParameterType)
    }
}
