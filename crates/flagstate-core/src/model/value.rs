//! Typed value resolution.
//!
//! Feature values are stored as an optional raw string payload. Before any
//! comparison, both engines resolve the payload to a [`FlagValue`] through
//! one deterministic decode, so "1" in a desired state and "1" in a current
//! state always compare as the same integer, and "TRUE" and "true" compare
//! as the same boolean.
//!
//! Parse rules, applied in order:
//!
//! 1. absent or empty payload → [`FlagValue::Null`]
//! 2. `"true"` / `"false"` (case-insensitive) → [`FlagValue::Bool`]
//! 3. `-?[0-9]+` fitting an `i64` → [`FlagValue::Int`]
//! 4. anything else → [`FlagValue::Str`], unchanged

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// FlagValue
// ---------------------------------------------------------------------------

/// The typed value of a feature state.
///
/// Tagged with a `"type"` field in JSON: `{"type":"int","value":3}` etc.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FlagValue {
    /// No value set (absent or empty payload).
    Null,
    /// A boolean payload (`"true"` / `"false"`, case-insensitive).
    Bool(bool),
    /// An integer payload.
    Int(i64),
    /// Any other payload, kept verbatim.
    Str(String),
}

impl FlagValue {
    /// Resolve a raw stored payload to a typed value.
    ///
    /// This is the single resolver shared by reconciliation and diff; both
    /// engines must see identical typing for identical payloads.
    #[must_use]
    pub fn resolve(raw: Option<&str>) -> Self {
        let Some(s) = raw else {
            return Self::Null;
        };
        if s.is_empty() {
            return Self::Null;
        }
        if s.eq_ignore_ascii_case("true") {
            return Self::Bool(true);
        }
        if s.eq_ignore_ascii_case("false") {
            return Self::Bool(false);
        }
        // Integer text too large for i64 stays a string; resolution must be
        // total and never saturate.
        if is_integer_text(s)
            && let Ok(n) = s.parse::<i64>()
        {
            return Self::Int(n);
        }
        Self::Str(s.to_owned())
    }

    /// Returns `true` if this is [`FlagValue::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// Check `s` against the integer grammar `-?[0-9]+`.
fn is_integer_text(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

impl fmt::Display for FlagValue {
    /// Render the stringified typed value. `Null` renders as the empty
    /// string, matching how absent values appear in diff output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
