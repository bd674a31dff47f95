//! Error types for the engines.
//!
//! [`InvalidInputError`] is the single error type returned by reconciliation
//! and diff calls. Every variant indicates a caller bug, not a transient
//! condition: the engines never retry or swallow these, and no other failure
//! mode exists — all other computation is total over well-formed input.

use thiserror::Error;

use crate::model::types::{MatchKey, Scope};

/// Errors returned when engine inputs violate the caller contract.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InvalidInputError {
    /// The same match key appears more than once within one side of a
    /// reconciliation call (two entries targeting the same segment, or two
    /// environment defaults).
    #[error("duplicate match key `{key}` in {side} states")]
    DuplicateMatchKey {
        /// The offending key.
        key: MatchKey,
        /// Which list contained the duplicate (`"desired"` or `"current"`).
        side: &'static str,
    },

    /// Two states handed to one comparison disagree on feature/environment.
    /// Diffing across scopes is a caller logic error and is rejected rather
    /// than silently computed.
    #[error("scope mismatch: {left} vs {right}")]
    ScopeMismatch {
        /// Scope of the first (old) state.
        left: Scope,
        /// Scope of the second (new) state.
        right: Scope,
    },
}
