//! Property tests for reconciliation over generated state lists.
//!
//! Checks the three structural guarantees of change-set computation:
//! no-op stability, idempotence under apply, and partition completeness.

use proptest::prelude::*;

use flagstate_core::model::{
    EnvironmentId, FeatureId, FeatureState, FeatureStateId, MatchKey, Scope, SegmentId,
};
use flagstate_core::reconcile::{apply_change_set, reconcile};

fn scope() -> Scope {
    Scope {
        feature: FeatureId::new(1),
        environment: EnvironmentId::new(2),
    }
}

/// A raw value payload drawn from the payloads the resolver distinguishes.
fn arb_value() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some(String::new())),
        Just(Some("true".to_owned())),
        Just(Some("FALSE".to_owned())),
        Just(Some("0".to_owned())),
        Just(Some("42".to_owned())),
        Just(Some("-7".to_owned())),
        Just(Some("dark-mode".to_owned())),
        Just(Some("1.5".to_owned())),
    ]
}

/// A list of feature states for one scope with unique match keys: maybe an
/// environment default, plus overrides targeting distinct segments.
fn arb_states(with_ids: bool) -> impl Strategy<Value = Vec<FeatureState>> {
    let default = prop::option::of((any::<bool>(), arb_value()));
    let overrides = prop::collection::btree_set(1u64..30, 0..6).prop_flat_map(move |segments| {
        let segments: Vec<u64> = segments.into_iter().collect();
        let n = segments.len();
        (
            Just(segments),
            prop::collection::vec((any::<bool>(), arb_value()), n..=n),
        )
    });

    (default, overrides).prop_map(move |(default, (segments, fields))| {
        let mut states = Vec::new();
        if let Some((enabled, value)) = default {
            states.push(FeatureState::environment_default(scope(), enabled, value));
        }
        for (i, (segment, (enabled, value))) in segments.into_iter().zip(fields).enumerate() {
            #[allow(clippy::cast_possible_truncation)]
            let priority = i as u32;
            states.push(FeatureState::segment_override(
                scope(),
                SegmentId::new(segment),
                priority,
                enabled,
                value,
            ));
        }
        if with_ids {
            for (i, state) in states.iter_mut().enumerate() {
                state.id = Some(FeatureStateId::new(i as u64 + 1));
            }
        }
        states
    })
}

proptest! {
    /// `reconcile(current, current)` requests no operations.
    #[test]
    fn noop_stability(current in arb_states(true)) {
        let cs = reconcile(&current, &current).expect("unique keys by construction");
        prop_assert!(cs.is_empty(), "self-reconcile produced {cs:?}");
    }

    /// Applying a change set and reconciling again yields an empty set.
    #[test]
    fn idempotence(desired in arb_states(false), current in arb_states(true)) {
        let cs = reconcile(&desired, &current).expect("unique keys by construction");
        let applied = apply_change_set(&current, &cs);
        let again = reconcile(&desired, &applied).expect("apply preserves key uniqueness");
        prop_assert!(again.is_empty(), "second pass produced {again:?}");
    }

    /// Every desired state lands in exactly one of create/update/unchanged,
    /// and every current override absent from desired is deleted.
    #[test]
    fn partition_completeness(desired in arb_states(false), current in arb_states(true)) {
        let cs = reconcile(&desired, &current).expect("unique keys by construction");

        let desired_keys: Vec<MatchKey> = desired.iter().map(FeatureState::match_key).collect();
        let created: Vec<MatchKey> = cs.to_create.iter().map(FeatureState::match_key).collect();
        let updated: Vec<MatchKey> = cs.to_update.iter().map(FeatureState::match_key).collect();

        // Create and update are disjoint subsets of desired.
        for key in &created {
            prop_assert!(desired_keys.contains(key));
            prop_assert!(!updated.contains(key));
        }
        for key in &updated {
            prop_assert!(desired_keys.contains(key));
        }
        prop_assert!(created.len() + updated.len() <= desired.len());

        // Deletions are exactly the current override keys missing from
        // desired, in current order.
        let expected_deletes: Vec<SegmentId> = current
            .iter()
            .filter_map(|c| c.feature_segment.map(|fs| fs.segment))
            .filter(|segment| !desired_keys.contains(&MatchKey::Segment(*segment)))
            .collect();
        prop_assert_eq!(&cs.segment_ids_to_delete_overrides, &expected_deletes);
    }

    /// Updates always carry the current counterpart's id.
    #[test]
    fn updates_carry_current_ids(desired in arb_states(false), current in arb_states(true)) {
        let cs = reconcile(&desired, &current).expect("unique keys by construction");
        for updated in &cs.to_update {
            let counterpart = current
                .iter()
                .find(|c| c.match_key() == updated.match_key())
                .expect("update must have a current counterpart");
            prop_assert_eq!(updated.id, counterpart.id);
        }
    }
}
