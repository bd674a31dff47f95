//! Data model: identifiers, typed values, and feature-state records.

pub mod state;
pub mod types;
pub mod value;

pub use state::{FeatureSegment, FeatureState, MultivariateWeight, Snapshot};
pub use types::{
    EnvironmentId, FeatureId, FeatureStateId, MatchKey, MultivariateOptionId, Scope, Segment,
    SegmentId,
};
pub use value::FlagValue;
