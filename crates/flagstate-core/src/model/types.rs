//! Identifier types for the feature-state model.
//!
//! Foundation types used throughout flagstate: feature, environment,
//! segment, and state identifiers, plus the [`MatchKey`] join key and the
//! [`Scope`] (feature + environment) every state in one engine call must
//! share.
//!
//! All identifiers are opaque: the engines compare them but never
//! interpret them.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Id newtypes
// ---------------------------------------------------------------------------

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Create from a raw `u64`.
            #[must_use]
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            /// Return the inner `u64` value.
            #[must_use]
            pub const fn as_u64(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }
    };
}

id_type! {
    /// Identifies a feature flag.
    FeatureId
}

id_type! {
    /// Identifies an environment a feature is configured in.
    EnvironmentId
}

id_type! {
    /// Identifies a segment that an override targets.
    SegmentId
}

id_type! {
    /// Identifies a persisted feature state. Absent on states that have not
    /// been created yet.
    FeatureStateId
}

id_type! {
    /// Identifies a multivariate feature option. Opaque to the engines.
    MultivariateOptionId
}

// ---------------------------------------------------------------------------
// Segment
// ---------------------------------------------------------------------------

/// A segment, as supplied by the caller for diff rendering.
///
/// Read-only input: the engines only ever use the `name` to label
/// segment-override diff rows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Segment identifier.
    pub id: SegmentId,
    /// Human-readable segment name.
    pub name: String,
}

// ---------------------------------------------------------------------------
// MatchKey
// ---------------------------------------------------------------------------

/// The join key pairing desired and current states.
///
/// A feature state is either the environment default (no segment override)
/// or an override targeting one segment. The key must be unique within each
/// list handed to [`reconcile`](crate::reconcile::reconcile); a duplicate is
/// a caller error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKey {
    /// The environment-default state (`feature_segment` is null).
    Default,
    /// A segment override keyed by its segment id.
    Segment(SegmentId),
}

impl MatchKey {
    /// Returns `true` if this is the environment-default key.
    #[must_use]
    pub const fn is_default(self) -> bool {
        matches!(self, Self::Default)
    }
}

impl fmt::Display for MatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => write!(f, "default"),
            Self::Segment(id) => write!(f, "{id}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Scope
// ---------------------------------------------------------------------------

/// The feature + environment pair a state belongs to.
///
/// Every state handed to one engine call must share one scope; comparing
/// states across scopes is a caller logic error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scope {
    /// The feature being configured.
    pub feature: FeatureId,
    /// The environment the configuration applies in.
    pub environment: EnvironmentId,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "feature {} / environment {}",
            self.feature, self.environment
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- id newtypes --

    #[test]
    fn id_round_trip_u64() {
        let id = SegmentId::new(42);
        assert_eq!(id.as_u64(), 42);
    }

    #[test]
    fn id_display() {
        assert_eq!(format!("{}", FeatureId::new(7)), "7");
    }

    #[test]
    fn id_from_u64() {
        let id: EnvironmentId = 9.into();
        assert_eq!(id.as_u64(), 9);
    }

    #[test]
    fn id_serde_is_transparent() {
        let id = FeatureStateId::new(123);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "123");
        let decoded: FeatureStateId = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, id);
    }

    #[test]
    fn id_ordering() {
        assert!(SegmentId::new(1) < SegmentId::new(2));
    }

    // -- MatchKey --

    #[test]
    fn match_key_default_display() {
        assert_eq!(format!("{}", MatchKey::Default), "default");
    }

    #[test]
    fn match_key_segment_display() {
        assert_eq!(format!("{}", MatchKey::Segment(SegmentId::new(5))), "5");
    }

    #[test]
    fn match_key_is_default() {
        assert!(MatchKey::Default.is_default());
        assert!(!MatchKey::Segment(SegmentId::new(1)).is_default());
    }

    #[test]
    fn match_key_equality() {
        assert_eq!(
            MatchKey::Segment(SegmentId::new(3)),
            MatchKey::Segment(SegmentId::new(3))
        );
        assert_ne!(MatchKey::Default, MatchKey::Segment(SegmentId::new(3)));
    }

    #[test]
    fn match_key_serde_round_trip() {
        for key in [MatchKey::Default, MatchKey::Segment(SegmentId::new(8))] {
            let json = serde_json::to_string(&key).unwrap();
            let decoded: MatchKey = serde_json::from_str(&json).unwrap();
            assert_eq!(decoded, key);
        }
    }

    // -- Segment --

    #[test]
    fn segment_serde_round_trip() {
        let seg = Segment {
            id: SegmentId::new(4),
            name: "beta-testers".to_owned(),
        };
        let json = serde_json::to_string(&seg).unwrap();
        let decoded: Segment = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, seg);
    }

    // -- Scope --

    #[test]
    fn scope_display() {
        let scope = Scope {
            feature: FeatureId::new(1),
            environment: EnvironmentId::new(2),
        };
        assert_eq!(format!("{scope}"), "feature 1 / environment 2");
    }

    #[test]
    fn scope_equality() {
        let a = Scope {
            feature: FeatureId::new(1),
            environment: EnvironmentId::new(2),
        };
        let b = Scope {
            feature: FeatureId::new(1),
            environment: EnvironmentId::new(3),
        };
        assert_ne!(a, b);
    }
}
