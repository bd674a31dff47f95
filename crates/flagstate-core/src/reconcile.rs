//! Change-set computation from desired vs current feature states.
//!
//! [`reconcile`] turns a *desired* configuration of a feature across an
//! environment (one environment default plus zero or more segment
//! overrides) and the *current* configuration into the minimal
//! [`ChangeSet`] of create/update/delete operations a caller must issue to
//! make current match desired.
//!
//! # Overview
//!
//! 1. Current states are indexed by [`MatchKey`].
//! 2. Each desired state is classified: no counterpart → create;
//!    counterpart differing under the equality predicate → update (carrying
//!    the current state's id); equal → no-op.
//! 3. Each current segment override with no desired counterpart has its
//!    segment id recorded for override deletion. The environment default is
//!    never deleted: its absence from desired means "no change requested".
//!
//! The computation is pure and idempotent: applying the change set to
//! `current` and reconciling again yields an empty change set. Output order
//! mirrors input order, so results are deterministic regardless of map
//! iteration.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::InvalidInputError;
use crate::model::state::FeatureState;
use crate::model::types::{MatchKey, SegmentId};

// ---------------------------------------------------------------------------
// ChangeSet
// ---------------------------------------------------------------------------

/// The three operation collections produced by [`reconcile`], eventually
/// submitted together as one atomic change request.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeSet {
    /// Desired states with no current counterpart.
    pub to_create: Vec<FeatureState>,
    /// Desired states that differ from their current counterpart. Each
    /// carries the current state's id so the caller can address the update.
    pub to_update: Vec<FeatureState>,
    /// Segment ids of current overrides absent from the desired list.
    pub segment_ids_to_delete_overrides: Vec<SegmentId>,
}

impl ChangeSet {
    /// Returns `true` if no operation is pending — the "has pending
    /// changes" check callers run without applying anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_create.is_empty()
            && self.to_update.is_empty()
            && self.segment_ids_to_delete_overrides.is_empty()
    }

    /// Total number of pending operations across the three collections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.to_create.len() + self.to_update.len() + self.segment_ids_to_delete_overrides.len()
    }
}

// ---------------------------------------------------------------------------
// Equality predicate
// ---------------------------------------------------------------------------

/// Compare a desired state against its current counterpart on every field a
/// save can change.
///
/// Values are compared after typed resolution so `"1"` and `"1"` never
/// differ on representation, and multivariate weights are compared as
/// opaque lists (deep, order-sensitive). Priority participates only for
/// segment overrides; environment defaults have none.
fn needs_update(desired: &FeatureState, current: &FeatureState) -> bool {
    if desired.enabled != current.enabled {
        return true;
    }
    if desired.resolved_value() != current.resolved_value() {
        return true;
    }
    let desired_priority = desired.feature_segment.map(|fs| fs.priority);
    let current_priority = current.feature_segment.map(|fs| fs.priority);
    if desired_priority != current_priority {
        return true;
    }
    if desired.multivariate_weights != current.multivariate_weights {
        return true;
    }
    desired.live_from != current.live_from
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute the [`ChangeSet`] turning `current` into `desired`.
///
/// Both lists must belong to one feature/environment pair (the caller's
/// responsibility; see [`Snapshot`](crate::model::Snapshot)) and must carry
/// unique match keys, which this function verifies.
///
/// # Errors
/// [`InvalidInputError::DuplicateMatchKey`] if either list contains two
/// states with the same match key.
pub fn reconcile(
    desired: &[FeatureState],
    current: &[FeatureState],
) -> Result<ChangeSet, InvalidInputError> {
    let current_by_key = index_by_key(current, "current")?;
    let desired_by_key = index_by_key(desired, "desired")?;

    let mut change_set = ChangeSet::default();

    for d in desired {
        match current_by_key.get(&d.match_key()) {
            None => change_set.to_create.push(d.clone()),
            Some(c) if needs_update(d, c) => {
                // Desired values win on every compared field; only the id is
                // taken from the current state.
                let mut updated = d.clone();
                updated.id = c.id;
                change_set.to_update.push(updated);
            }
            Some(_) => {}
        }
    }

    for c in current {
        if let Some(fs) = c.feature_segment
            && !desired_by_key.contains_key(&c.match_key())
        {
            change_set
                .segment_ids_to_delete_overrides
                .push(fs.segment);
        }
    }

    tracing::debug!(
        create = change_set.to_create.len(),
        update = change_set.to_update.len(),
        delete = change_set.segment_ids_to_delete_overrides.len(),
        "reconciled feature states"
    );

    Ok(change_set)
}

/// Apply a [`ChangeSet`] to a current list, producing the post-save state.
///
/// Pure preview of what persisting the change set would yield: updates
/// replace their counterpart in place, deleted overrides are dropped, and
/// creates are appended in order. Reconciling the original desired list
/// against the result yields an empty change set.
#[must_use]
pub fn apply_change_set(current: &[FeatureState], change_set: &ChangeSet) -> Vec<FeatureState> {
    let mut next: Vec<FeatureState> = Vec::with_capacity(current.len() + change_set.to_create.len());

    for c in current {
        let key = c.match_key();
        if let Some(fs) = c.feature_segment
            && change_set
                .segment_ids_to_delete_overrides
                .contains(&fs.segment)
        {
            continue;
        }
        if let Some(updated) = change_set.to_update.iter().find(|u| u.match_key() == key) {
            next.push(updated.clone());
        } else {
            next.push(c.clone());
        }
    }

    next.extend(change_set.to_create.iter().cloned());
    next
}

/// Index states by match key, rejecting duplicates within the list.
fn index_by_key<'a>(
    states: &'a [FeatureState],
    side: &'static str,
) -> Result<HashMap<MatchKey, &'a FeatureState>, InvalidInputError> {
    let mut map = HashMap::with_capacity(states.len());
    for state in states {
        let key = state.match_key();
        if map.insert(key, state).is_some() {
            return Err(InvalidInputError::DuplicateMatchKey { key, side });
        }
    }
    Ok(map)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
