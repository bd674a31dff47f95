//! Field-level diff between two feature-state snapshots.
//!
//! Powers the before/after rows in audit logs, change requests, and
//! version comparisons. Either side of a diff may be absent ("did not
//! exist"); an absent side renders as disabled with an empty value.
//!
//! Values are compared after typed resolution (shared with
//! reconciliation), so `"TRUE"` vs `"true"` is not a change while `"1"`
//! vs `"2"` is. Segment-override diffs additionally compare priority,
//! rendered as a 1-based ordinal: the underlying sort index stays
//! zero-based, the +1 is a display transform only.

use serde::Serialize;

use crate::error::InvalidInputError;
use crate::model::state::FeatureState;

// ---------------------------------------------------------------------------
// FeatureStateDiff
// ---------------------------------------------------------------------------

/// Field-level difference between two feature states (environment-default
/// comparison).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FeatureStateDiff {
    /// Enabled flag of the old side; `false` if absent.
    pub old_enabled: bool,
    /// Enabled flag of the new side; `false` if absent.
    pub new_enabled: bool,
    /// Stringified typed value of the old side; `""` if absent.
    pub old_value: String,
    /// Stringified typed value of the new side; `""` if absent.
    pub new_value: String,
    /// Whether the enabled flag differs.
    pub enabled_changed: bool,
    /// Whether the resolved value differs.
    pub value_changed: bool,
    /// Count of changed fields.
    pub total_changes: u32,
}

// ---------------------------------------------------------------------------
// SegmentOverrideDiff
// ---------------------------------------------------------------------------

/// Field-level difference between two segment-override states, extending
/// [`FeatureStateDiff`] with segment name and display priority.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SegmentOverrideDiff {
    /// Segment name if the old side exists, else `""`.
    pub old_name: String,
    /// Segment name if the new side exists, else `""`.
    pub new_name: String,
    /// Enabled flag of the old side; `false` if absent.
    pub old_enabled: bool,
    /// Enabled flag of the new side; `false` if absent.
    pub new_enabled: bool,
    /// Stringified typed value of the old side; `""` if absent.
    pub old_value: String,
    /// Stringified typed value of the new side; `""` if absent.
    pub new_value: String,
    /// 1-based display priority of the old side; `""` without a segment.
    pub old_priority: String,
    /// 1-based display priority of the new side; `""` without a segment.
    pub new_priority: String,
    /// Whether the enabled flag differs.
    pub enabled_changed: bool,
    /// Whether the resolved value differs.
    pub value_changed: bool,
    /// Whether the display priority differs.
    pub priority_changed: bool,
    /// Count of changed fields.
    pub total_changes: u32,
}

// ---------------------------------------------------------------------------
// Diff computation
// ---------------------------------------------------------------------------

/// Ensure two present states belong to one feature/environment pair.
fn check_scope(
    old: Option<&FeatureState>,
    new: Option<&FeatureState>,
) -> Result<(), InvalidInputError> {
    if let Some(o) = old
        && let Some(n) = new
        && o.scope() != n.scope()
    {
        return Err(InvalidInputError::ScopeMismatch {
            left: o.scope(),
            right: n.scope(),
        });
    }
    Ok(())
}

fn enabled_of(state: Option<&FeatureState>) -> bool {
    state.is_some_and(|s| s.enabled)
}

fn value_of(state: Option<&FeatureState>) -> String {
    state.map_or_else(String::new, |s| s.resolved_value().to_string())
}

/// Display priority: zero-based sort index + 1, rendered as a string.
fn priority_of(state: Option<&FeatureState>) -> String {
    state
        .and_then(|s| s.feature_segment)
        .map_or_else(String::new, |fs| (fs.priority + 1).to_string())
}

/// Compute the field-level diff between two feature states.
///
/// Either side may be `None` (state did not exist on that side).
///
/// # Errors
/// [`InvalidInputError::ScopeMismatch`] if both sides are present but
/// belong to different feature/environment pairs.
pub fn diff_feature_state(
    old: Option<&FeatureState>,
    new: Option<&FeatureState>,
) -> Result<FeatureStateDiff, InvalidInputError> {
    check_scope(old, new)?;

    let old_enabled = enabled_of(old);
    let new_enabled = enabled_of(new);
    let old_value = value_of(old);
    let new_value = value_of(new);

    let enabled_changed = old_enabled != new_enabled;
    let value_changed = old_value != new_value;

    Ok(FeatureStateDiff {
        old_enabled,
        new_enabled,
        old_value,
        new_value,
        enabled_changed,
        value_changed,
        total_changes: u32::from(enabled_changed) + u32::from(value_changed),
    })
}

/// Compute the field-level diff between two segment-override states.
///
/// `segment_name` labels whichever sides exist; name resolution is the
/// caller's concern.
///
/// # Errors
/// [`InvalidInputError::ScopeMismatch`] if both sides are present but
/// belong to different feature/environment pairs.
pub fn diff_segment_override(
    old: Option<&FeatureState>,
    new: Option<&FeatureState>,
    segment_name: &str,
) -> Result<SegmentOverrideDiff, InvalidInputError> {
    let base = diff_feature_state(old, new)?;

    let old_priority = priority_of(old);
    let new_priority = priority_of(new);
    let priority_changed = old_priority != new_priority;

    Ok(SegmentOverrideDiff {
        old_name: old.map_or_else(String::new, |_| segment_name.to_owned()),
        new_name: new.map_or_else(String::new, |_| segment_name.to_owned()),
        old_enabled: base.old_enabled,
        new_enabled: base.new_enabled,
        old_value: base.old_value,
        new_value: base.new_value,
        old_priority,
        new_priority,
        enabled_changed: base.enabled_changed,
        value_changed: base.value_changed,
        priority_changed,
        total_changes: base.total_changes + u32::from(priority_changed),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
