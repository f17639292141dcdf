//! Reconciliation planning
//!
//! A pure diff of requested against existing external ids. No remote calls.

use std::collections::{BTreeMap, BTreeSet};

/// Create / update / delete buckets for one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcilePlan {
    /// Requested but not present remotely
    pub create: BTreeSet<String>,
    /// Requested and present remotely; updates resend every field
    pub update: BTreeSet<String>,
    /// Present remotely but no longer requested, when automatic delete is on
    pub delete: BTreeSet<String>,
    /// What `delete` would contain if automatic delete were on
    pub would_delete: BTreeSet<String>,
}

impl ReconcilePlan {
    /// Whether applying the plan issues any pipeline write
    pub fn has_changes(&self) -> bool {
        !(self.create.is_empty() && self.update.is_empty() && self.delete.is_empty())
    }
}

/// Diff requested against existing ids
///
/// Ids are compared by exact string equality.
pub fn plan<R, E>(
    requested: &BTreeMap<String, R>,
    existing: &BTreeMap<String, E>,
    automatic_delete: bool,
) -> ReconcilePlan {
    let (update, create): (BTreeSet<String>, BTreeSet<String>) = requested
        .keys()
        .cloned()
        .partition(|id| existing.contains_key(id));

    let orphans: BTreeSet<String> = existing
        .keys()
        .filter(|id| !requested.contains_key(*id))
        .cloned()
        .collect();

    let (delete, would_delete) = if automatic_delete {
        (orphans, BTreeSet::new())
    } else {
        (BTreeSet::new(), orphans)
    };

    ReconcilePlan {
        create,
        update,
        delete,
        would_delete,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ids(values: &[&str]) -> BTreeMap<String, ()> {
        values.iter().map(|v| (v.to_string(), ())).collect()
    }

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_update_and_delete_scenario() {
        let requested = ids(&["adf:src:001:int_events"]);
        let existing = ids(&["adf:src:001:int_events", "pi:src:002:legacy"]);

        let plan = plan(&requested, &existing, true);
        assert!(plan.create.is_empty());
        assert_eq!(plan.update, set(&["adf:src:001:int_events"]));
        assert_eq!(plan.delete, set(&["pi:src:002:legacy"]));
        assert!(plan.would_delete.is_empty());
    }

    #[test]
    fn test_disabled_delete_only_reports() {
        let requested = ids(&["a", "new"]);
        let existing = ids(&["a", "old"]);

        let plan = plan(&requested, &existing, false);
        assert_eq!(plan.create, set(&["new"]));
        assert_eq!(plan.update, set(&["a"]));
        assert!(plan.delete.is_empty());
        assert_eq!(plan.would_delete, set(&["old"]));
    }

    #[test]
    fn test_ids_match_exactly() {
        let plan = plan(&ids(&["Extpipe-1"]), &ids(&["extpipe-1", "Extpipe-1 "]), true);
        assert_eq!(plan.create, set(&["Extpipe-1"]));
        assert_eq!(plan.delete.len(), 2);
    }

    #[test]
    fn test_empty_inputs() {
        let plan = plan(&ids(&[]), &ids(&[]), true);
        assert!(!plan.has_changes());
        assert_eq!(plan, ReconcilePlan::default());
    }

    fn id_vec() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec("[a-d]{1,2}", 0..12)
    }

    fn to_map(values: &[String]) -> BTreeMap<String, ()> {
        values.iter().map(|v| (v.clone(), ())).collect()
    }

    proptest! {
        #[test]
        fn prop_buckets_are_disjoint(requested in id_vec(), existing in id_vec(), auto in any::<bool>()) {
            let plan = plan(&to_map(&requested), &to_map(&existing), auto);
            prop_assert!(plan.create.is_disjoint(&plan.update));
            prop_assert!(plan.update.is_disjoint(&plan.delete));
            prop_assert!(plan.create.is_disjoint(&plan.delete));
        }

        #[test]
        fn prop_buckets_cover_both_inputs(requested in id_vec(), existing in id_vec()) {
            let requested = to_map(&requested);
            let existing = to_map(&existing);
            let plan = plan(&requested, &existing, true);

            let requested_ids: BTreeSet<String> = requested.keys().cloned().collect();
            let existing_ids: BTreeSet<String> = existing.keys().cloned().collect();
            let planned_requested: BTreeSet<String> = plan.create.union(&plan.update).cloned().collect();
            let planned_existing: BTreeSet<String> = plan.update.union(&plan.delete).cloned().collect();

            prop_assert_eq!(planned_requested, requested_ids);
            prop_assert_eq!(planned_existing, existing_ids);
        }

        #[test]
        fn prop_disabled_delete_is_always_empty(requested in id_vec(), existing in id_vec()) {
            let plan = plan(&to_map(&requested), &to_map(&existing), false);
            prop_assert!(plan.delete.is_empty());
        }

        #[test]
        fn prop_insertion_order_does_not_matter(requested in id_vec(), existing in id_vec(), auto in any::<bool>()) {
            let forward = plan(&to_map(&requested), &to_map(&existing), auto);

            let mut requested_rev = requested.clone();
            requested_rev.reverse();
            let mut existing_rev = existing.clone();
            existing_rev.reverse();
            let backward = plan(&to_map(&requested_rev), &to_map(&existing_rev), auto);

            prop_assert_eq!(forward, backward);
        }

        #[test]
        fn prop_second_run_only_updates(requested in id_vec(), existing in id_vec(), auto in any::<bool>()) {
            let requested = to_map(&requested);
            let first = plan(&requested, &to_map(&existing), auto);

            // remote state after applying the first plan
            let mut converged: BTreeSet<String> = to_map(&existing).into_keys().collect();
            converged.retain(|id| !first.delete.contains(id));
            converged.extend(first.create.iter().cloned());
            let converged: BTreeMap<String, ()> = converged.into_iter().map(|id| (id, ())).collect();

            let second = plan(&requested, &converged, auto);
            prop_assert!(second.create.is_empty());
            prop_assert!(second.delete.is_empty());
            prop_assert_eq!(second.update.len(), requested.len());
        }
    }
}
