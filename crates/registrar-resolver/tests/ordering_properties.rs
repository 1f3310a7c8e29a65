//! Property tests: any acyclic entity graph orders with every entity after
//! its dependencies, deterministically, whatever kind filter is applied.

use proptest::prelude::*;
use registrar_resolver::{sort, Binding, ModuleMap, ResolveError, SortOptions};
use registrar_types::{EntityId, EntityKind, EntityStore};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn arb_kind() -> impl Strategy<Value = EntityKind> {
    prop_oneof![
        Just(EntityKind::Task),
        Just(EntityKind::Workflow),
        Just(EntityKind::LaunchPlan),
    ]
}

/// Kinds for `n` nodes plus, for each node, candidate edges to later nodes.
/// Edges only point forward, so the graph is acyclic.
fn arb_dag() -> impl Strategy<Value = (Vec<EntityKind>, Vec<(usize, usize)>)> {
    (1usize..30).prop_flat_map(|n| {
        (
            prop::collection::vec(arb_kind(), n),
            prop::collection::vec((0..n, 0..n), 0..n * 3),
        )
    })
}

fn build(kinds: &[EntityKind], edges: &[(usize, usize)]) -> (EntityStore, ModuleMap, Vec<EntityId>) {
    let mut store = EntityStore::new();
    let mut map = ModuleMap::new();
    let ids: Vec<EntityId> = kinds
        .iter()
        .enumerate()
        .map(|(i, kind)| {
            let id = store.define(*kind, Some("generated"));
            map.insert(id, Binding::new("generated", format!("e{}", i)));
            id
        })
        .collect();
    for &(a, b) in edges {
        if a < b {
            store.add_upstream(ids[a], ids[b]).unwrap();
        }
    }
    (store, map, ids)
}

fn arb_options() -> impl Strategy<Value = SortOptions> {
    prop_oneof![
        Just(SortOptions::new()),
        arb_kind().prop_map(|k| SortOptions::new().include([k])),
        arb_kind().prop_map(|k| SortOptions::new().exclude([k])),
    ]
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    /// Every yielded entity comes after every admitted upstream entity.
    #[test]
    fn dependencies_always_come_first(
        (kinds, edges) in arb_dag(),
        options in arb_options(),
    ) {
        let (store, map, _) = build(&kinds, &edges);
        let filter = options.filter().unwrap();
        let order: Vec<EntityId> = sort(&map, &store, &options)
            .unwrap()
            .map(|r| r.map(|r| r.id))
            .collect::<Result<_, _>>()
            .unwrap();

        let position: HashMap<EntityId, usize> =
            order.iter().enumerate().map(|(i, id)| (*id, i)).collect();

        for (i, id) in order.iter().enumerate() {
            for up in &store.get(*id).unwrap().upstream {
                if filter.admits(store.get(*up).unwrap().kind) {
                    let j = position[up];
                    prop_assert!(j < i, "{:?} yielded before its dependency {:?}", id, up);
                }
            }
        }

        let admitted = map
            .ids()
            .iter()
            .filter(|id| filter.admits(store.get(**id).unwrap().kind))
            .count();
        prop_assert_eq!(order.len(), admitted);
    }

    /// The same graph and options always give the same sequence.
    #[test]
    fn ordering_is_deterministic(
        (kinds, edges) in arb_dag(),
        options in arb_options(),
    ) {
        let (store, map, _) = build(&kinds, &edges);
        let first: Vec<_> = sort(&map, &store, &options).unwrap().collect();
        let second: Vec<_> = sort(&map, &store, &options).unwrap().collect();
        prop_assert_eq!(first, second);
    }

    /// A node depending on itself is always reported, wherever it sits.
    #[test]
    fn self_dependency_is_always_a_cycle(
        (kinds, edges) in arb_dag(),
        a in 0usize..30,
    ) {
        let n = kinds.len();
        let (mut store, map, ids) = build(&kinds, &edges);
        let from = a % n;
        store.add_upstream(ids[from], ids[from]).unwrap();

        let result: Result<Vec<_>, _> = sort(&map, &store, &SortOptions::new()).unwrap().collect();
        let is_cycle = matches!(result, Err(ResolveError::CycleDetected { .. }));
        prop_assert!(is_cycle);
    }
}
