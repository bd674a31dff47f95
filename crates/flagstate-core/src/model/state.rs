//! Feature-state model — the records both engines operate on.
//!
//! A [`FeatureState`] is one concrete configuration point for a feature
//! within an environment: either the environment default (no
//! `feature_segment`) or an override scoped to one segment. Both engines
//! treat these as immutable snapshots supplied per call; nothing here is
//! mutated or retained.
//!
//! [`Snapshot`] is the caller-side validated container: it enforces the
//! preconditions the engines assume (one scope per list, unique match
//! keys).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::InvalidInputError;
use crate::model::types::{
    EnvironmentId, FeatureId, FeatureStateId, MatchKey, MultivariateOptionId, Scope, SegmentId,
};
use crate::model::value::FlagValue;

// ---------------------------------------------------------------------------
// MultivariateWeight
// ---------------------------------------------------------------------------

/// A multivariate weight override attached to a feature state.
///
/// Opaque to the engines: weight lists are compared for deep,
/// order-sensitive equality and never interpreted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MultivariateWeight {
    /// The multivariate option this weight applies to.
    pub multivariate_feature_option: MultivariateOptionId,
    /// Percentage of identities allocated to this option.
    pub percentage_allocation: f64,
}

// ---------------------------------------------------------------------------
// FeatureSegment
// ---------------------------------------------------------------------------

/// The segment scoping of an override state.
///
/// `priority` is a zero-based sort index used to break ties when multiple
/// segments match the same identity. Diff output converts it to a 1-based
/// ordinal for display; reconciliation keeps it zero-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSegment {
    /// The segment this override targets.
    pub segment: SegmentId,
    /// Zero-based priority among this feature's overrides.
    pub priority: u32,
}

// ---------------------------------------------------------------------------
// FeatureState
// ---------------------------------------------------------------------------

/// One concrete configuration point for a feature within an environment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureState {
    /// Persisted identifier. `None` for states that have not been created
    /// yet (e.g. a freshly drafted override).
    #[serde(default)]
    pub id: Option<FeatureStateId>,
    /// The feature this state configures.
    pub feature: FeatureId,
    /// The environment the configuration applies in.
    pub environment: EnvironmentId,
    /// Whether the feature is on for this state.
    pub enabled: bool,
    /// Raw stored value payload. Resolved through
    /// [`FlagValue::resolve`] before any comparison.
    #[serde(default)]
    pub value: Option<String>,
    /// Multivariate weight overrides. Compared for equality only.
    #[serde(default)]
    pub multivariate_weights: Vec<MultivariateWeight>,
    /// `None` for the environment default; `Some` for a segment override.
    #[serde(default)]
    pub feature_segment: Option<FeatureSegment>,
    /// Optional scheduling timestamp. Compared for equality only, never
    /// interpreted.
    #[serde(default)]
    pub live_from: Option<DateTime<Utc>>,
}

impl FeatureState {
    /// Create an environment-default state (no segment override).
    #[must_use]
    pub fn environment_default(scope: Scope, enabled: bool, value: Option<String>) -> Self {
        Self {
            id: None,
            feature: scope.feature,
            environment: scope.environment,
            enabled,
            value,
            multivariate_weights: Vec::new(),
            feature_segment: None,
            live_from: None,
        }
    }

    /// Create a segment-override state.
    #[must_use]
    pub fn segment_override(
        scope: Scope,
        segment: SegmentId,
        priority: u32,
        enabled: bool,
        value: Option<String>,
    ) -> Self {
        Self {
            id: None,
            feature: scope.feature,
            environment: scope.environment,
            enabled,
            value,
            multivariate_weights: Vec::new(),
            feature_segment: Some(FeatureSegment { segment, priority }),
            live_from: None,
        }
    }

    /// Attach a persisted id (builder-style, for fixtures and callers).
    #[must_use]
    pub const fn with_id(mut self, id: FeatureStateId) -> Self {
        self.id = Some(id);
        self
    }

    /// The join key pairing this state with its counterpart on the other
    /// side of a reconciliation or diff.
    #[must_use]
    pub fn match_key(&self) -> MatchKey {
        self.feature_segment
            .map_or(MatchKey::Default, |fs| MatchKey::Segment(fs.segment))
    }

    /// The feature/environment pair this state belongs to.
    #[must_use]
    pub const fn scope(&self) -> Scope {
        Scope {
            feature: self.feature,
            environment: self.environment,
        }
    }

    /// Resolve the raw value payload to its typed form.
    #[must_use]
    pub fn resolved_value(&self) -> FlagValue {
        FlagValue::resolve(self.value.as_deref())
    }

    /// Returns `true` if this is the environment-default state.
    #[must_use]
    pub const fn is_environment_default(&self) -> bool {
        self.feature_segment.is_none()
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// A validated list of feature states for one feature in one environment.
///
/// The engines assume their inputs share one scope and carry unique match
/// keys; `Snapshot` is where callers enforce that before invoking them.
/// Construction rejects out-of-scope states and duplicate keys.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSnapshot", into = "RawSnapshot")]
pub struct Snapshot {
    feature: FeatureId,
    environment: EnvironmentId,
    states: Vec<FeatureState>,
}

impl Snapshot {
    /// Create a snapshot, validating every state against the header scope
    /// and rejecting duplicate match keys.
    ///
    /// # Errors
    /// [`InvalidInputError::ScopeMismatch`] if a state's feature/environment
    /// differs from the snapshot's; [`InvalidInputError::DuplicateMatchKey`]
    /// if two states share a match key.
    pub fn new(
        feature: FeatureId,
        environment: EnvironmentId,
        states: Vec<FeatureState>,
    ) -> Result<Self, InvalidInputError> {
        let scope = Scope {
            feature,
            environment,
        };
        let mut seen: Vec<MatchKey> = Vec::with_capacity(states.len());
        for state in &states {
            if state.scope() != scope {
                return Err(InvalidInputError::ScopeMismatch {
                    left: scope,
                    right: state.scope(),
                });
            }
            let key = state.match_key();
            if seen.contains(&key) {
                return Err(InvalidInputError::DuplicateMatchKey {
                    key,
                    side: "snapshot",
                });
            }
            seen.push(key);
        }
        Ok(Self {
            feature,
            environment,
            states,
        })
    }

    /// The feature this snapshot covers.
    #[must_use]
    pub const fn feature(&self) -> FeatureId {
        self.feature
    }

    /// The environment this snapshot covers.
    #[must_use]
    pub const fn environment(&self) -> EnvironmentId {
        self.environment
    }

    /// The snapshot's scope.
    #[must_use]
    pub const fn scope(&self) -> Scope {
        Scope {
            feature: self.feature,
            environment: self.environment,
        }
    }

    /// The validated states, in their original order.
    #[must_use]
    pub fn states(&self) -> &[FeatureState] {
        &self.states
    }

    /// Find the state for a given match key, if present.
    #[must_use]
    pub fn state_for(&self, key: MatchKey) -> Option<&FeatureState> {
        self.states.iter().find(|s| s.match_key() == key)
    }
}

/// Wire shape for [`Snapshot`] — validation runs through `TryFrom` so
/// deserializing an invalid snapshot fails instead of producing one.
#[derive(Serialize, Deserialize)]
struct RawSnapshot {
    feature: FeatureId,
    environment: EnvironmentId,
    states: Vec<FeatureState>,
}

impl TryFrom<RawSnapshot> for Snapshot {
    type Error = InvalidInputError;
    fn try_from(raw: RawSnapshot) -> Result<Self, Self::Error> {
        Self::new(raw.feature, raw.environment, raw.states)
    }
}

impl From<Snapshot> for RawSnapshot {
    fn from(s: Snapshot) -> Self {
        Self {
            feature: s.feature,
            environment: s.environment,
            states: s.states,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn scope() -> Scope {
        Scope {
            feature: FeatureId::new(1),
            environment: EnvironmentId::new(2),
        }
    }

    // -- FeatureState --

    #[test]
    fn environment_default_has_default_key() {
        let state = FeatureState::environment_default(scope(), true, None);
        assert_eq!(state.match_key(), MatchKey::Default);
        assert!(state.is_environment_default());
        assert!(state.id.is_none());
    }

    #[test]
    fn segment_override_keyed_by_segment() {
        let state = FeatureState::segment_override(scope(), SegmentId::new(5), 0, false, None);
        assert_eq!(state.match_key(), MatchKey::Segment(SegmentId::new(5)));
        assert!(!state.is_environment_default());
    }

    #[test]
    fn with_id_attaches_id() {
        let state =
            FeatureState::environment_default(scope(), true, None).with_id(FeatureStateId::new(9));
        assert_eq!(state.id, Some(FeatureStateId::new(9)));
    }

    #[test]
    fn resolved_value_goes_through_resolver() {
        let state = FeatureState::environment_default(scope(), true, Some("10".to_owned()));
        assert_eq!(state.resolved_value(), FlagValue::Int(10));

        let state = FeatureState::environment_default(scope(), true, None);
        assert!(state.resolved_value().is_null());
    }

    #[test]
    fn scope_reflects_fields() {
        let state = FeatureState::environment_default(scope(), true, None);
        assert_eq!(state.scope(), scope());
    }

    #[test]
    fn feature_state_serde_round_trip() {
        let mut state = FeatureState::segment_override(
            scope(),
            SegmentId::new(3),
            1,
            true,
            Some("on".to_owned()),
        )
        .with_id(FeatureStateId::new(44));
        state.multivariate_weights.push(MultivariateWeight {
            multivariate_feature_option: MultivariateOptionId::new(7),
            percentage_allocation: 25.0,
        });
        let json = serde_json::to_string(&state).unwrap();
        let decoded: FeatureState = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, state);
    }

    #[test]
    fn feature_state_deserializes_with_optional_fields_absent() {
        let json = r#"{"feature":1,"environment":2,"enabled":true}"#;
        let state: FeatureState = serde_json::from_str(json).unwrap();
        assert!(state.id.is_none());
        assert!(state.value.is_none());
        assert!(state.multivariate_weights.is_empty());
        assert!(state.feature_segment.is_none());
        assert!(state.live_from.is_none());
    }

    // -- Snapshot --

    #[test]
    fn snapshot_accepts_default_plus_overrides() {
        let states = vec![
            FeatureState::environment_default(scope(), true, None),
            FeatureState::segment_override(scope(), SegmentId::new(1), 0, false, None),
            FeatureState::segment_override(scope(), SegmentId::new(2), 1, true, None),
        ];
        let snap = Snapshot::new(scope().feature, scope().environment, states).unwrap();
        assert_eq!(snap.states().len(), 3);
        assert!(snap.state_for(MatchKey::Default).is_some());
        assert!(snap.state_for(MatchKey::Segment(SegmentId::new(2))).is_some());
        assert!(snap.state_for(MatchKey::Segment(SegmentId::new(9))).is_none());
    }

    #[test]
    fn snapshot_rejects_out_of_scope_state() {
        let foreign = Scope {
            feature: FeatureId::new(99),
            environment: scope().environment,
        };
        let states = vec![FeatureState::environment_default(foreign, true, None)];
        let err = Snapshot::new(scope().feature, scope().environment, states).unwrap_err();
        assert!(matches!(err, InvalidInputError::ScopeMismatch { .. }));
    }

    #[test]
    fn snapshot_rejects_duplicate_segment() {
        let states = vec![
            FeatureState::segment_override(scope(), SegmentId::new(3), 0, true, None),
            FeatureState::segment_override(scope(), SegmentId::new(3), 1, false, None),
        ];
        let err = Snapshot::new(scope().feature, scope().environment, states).unwrap_err();
        assert_eq!(
            err,
            InvalidInputError::DuplicateMatchKey {
                key: MatchKey::Segment(SegmentId::new(3)),
                side: "snapshot",
            }
        );
    }

    #[test]
    fn snapshot_rejects_two_defaults() {
        let states = vec![
            FeatureState::environment_default(scope(), true, None),
            FeatureState::environment_default(scope(), false, None),
        ];
        let err = Snapshot::new(scope().feature, scope().environment, states).unwrap_err();
        assert!(matches!(
            err,
            InvalidInputError::DuplicateMatchKey {
                key: MatchKey::Default,
                ..
            }
        ));
    }

    #[test]
    fn snapshot_serde_round_trip() {
        let states = vec![
            FeatureState::environment_default(scope(), true, Some("a".to_owned())),
            FeatureState::segment_override(scope(), SegmentId::new(1), 0, false, None),
        ];
        let snap = Snapshot::new(scope().feature, scope().environment, states).unwrap();
        let json = serde_json::to_string(&snap).unwrap();
        let decoded: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, snap);
    }

    #[test]
    fn snapshot_deserialize_rejects_invalid() {
        // Two defaults in the wire form must fail validation on decode.
        let json = r#"{
            "feature": 1,
            "environment": 2,
            "states": [
                {"feature":1,"environment":2,"enabled":true},
                {"feature":1,"environment":2,"enabled":false}
            ]
        }"#;
        assert!(serde_json::from_str::<Snapshot>(json).is_err());
    }
}
