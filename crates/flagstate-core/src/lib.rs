//! Core domain logic for flagstate.
//!
//! Two cooperating, stateless engines over immutable feature-state
//! snapshots:
//!
//! - [`reconcile`](reconcile::reconcile) — turns a *desired* configuration
//!   of a feature across an environment and its segment overrides into the
//!   minimal [`ChangeSet`](reconcile::ChangeSet) of create/update/delete
//!   operations against the *current* configuration.
//! - [`diff_feature_state`](diff::diff_feature_state) /
//!   [`diff_segment_override`](diff::diff_segment_override) — field-level,
//!   human-reviewable difference between two snapshots of one state, used
//!   for audit logs, change requests, and version comparisons.
//!
//! Both are pure, synchronous functions: no I/O, no shared state, no
//! retained references. The only failure mode is
//! [`InvalidInputError`](error::InvalidInputError) for inputs that violate
//! the caller contract.

pub mod diff;
pub mod error;
pub mod model;
pub mod reconcile;

pub use diff::{FeatureStateDiff, SegmentOverrideDiff, diff_feature_state, diff_segment_override};
pub use error::InvalidInputError;
pub use model::{
    EnvironmentId, FeatureId, FeatureSegment, FeatureState, FeatureStateId, FlagValue, MatchKey,
    MultivariateOptionId, MultivariateWeight, Scope, Segment, SegmentId, Snapshot,
};
pub use reconcile::{ChangeSet, apply_change_set, reconcile};
