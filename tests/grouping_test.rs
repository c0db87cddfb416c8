//! Integration tests for the grouped view

use std::collections::HashMap;

use rstest::rstest;

use cattree::domain::{build_flattened, build_groups, Characteristic, GroupedView, Node, NodeId};
use cattree::util::testing::init_test_setup;

fn nodes(links: &[(NodeId, Option<NodeId>)]) -> Vec<Node<usize>> {
    // payload is the input position so duplicate ids stay distinguishable
    links
        .iter()
        .enumerate()
        .map(|(pos, &(id, parent))| Node::new(id, parent, pos))
        .collect()
}

/// id -> position of the record the id resolves to (last write wins)
fn identity_positions(input: &[Node<usize>]) -> HashMap<NodeId, usize> {
    input.iter().map(|n| (n.id, n.payload)).collect()
}

/// Structural checks every grouped view must pass, whatever the input.
fn assert_grouping_invariants(input: &[Node<usize>], view: &GroupedView<'_, usize>) {
    let mut as_parent: HashMap<usize, usize> = HashMap::new();
    let mut as_child: HashMap<usize, usize> = HashMap::new();

    for group in view {
        if let Some(parent) = group.parent {
            *as_parent.entry(parent.payload).or_default() += 1;
        }
        for child in &group.children {
            *as_child.entry(child.payload).or_default() += 1;
        }
        let ids = group.child_ids();
        assert!(ids.windows(2).all(|w| w[0] <= w[1]), "children sorted: {ids:?}");
    }

    for node in input {
        let pos = node.payload;
        let placed = as_parent.contains_key(&pos) || as_child.contains_key(&pos);
        assert!(placed, "record at position {pos} (id {}) missing", node.id);
        if !node.is_root() && !node.is_self_parented() {
            assert_eq!(as_child.get(&pos), Some(&1), "non-root {} placed once as child", node.id);
        }
    }
    assert!(as_parent.values().all(|&n| n == 1), "no record heads two groups");

    let heads: Vec<_> = view.iter().filter_map(|g| g.parent_id()).collect();
    assert!(heads.windows(2).all(|w| w[0] < w[1]), "one group per id, ascending: {heads:?}");
    let identity = identity_positions(input);
    for parent in view.iter().filter_map(|g| g.parent) {
        assert_eq!(
            Some(&parent.payload),
            identity.get(&parent.id),
            "id {} headed by its identity record",
            parent.id
        );
    }
    let orphan_groups = view.iter().filter(|g| g.is_orphans()).count();
    assert!(orphan_groups <= 1);
    if orphan_groups == 1 {
        assert!(view.orphans().is_some(), "orphans bucket comes last");
    }
}

#[test]
fn given_two_level_catalog_when_grouping_then_root_holds_direct_children_only() {
    init_test_setup();
    let input = nodes(&[(1, None), (2, Some(1)), (3, Some(1)), (4, Some(2))]);

    let view = build_groups(&input);

    let root = view.group_of(1).expect("group for 1");
    assert_eq!(root.child_ids(), vec![2, 3]);
    assert!(!root.child_ids().contains(&4));
    assert_eq!(view.group_of(2).map(|g| g.child_ids()), Some(vec![4]));
    assert!(view.orphans().is_none());
}

#[test]
fn given_missing_parent_when_grouping_then_single_orphans_bucket() {
    init_test_setup();
    let input = nodes(&[(5, Some(99))]);

    let view = build_groups(&input);

    assert_eq!(view.outline(), vec![(None, vec![5])]);
}

#[test]
fn given_empty_input_when_grouping_then_empty_view() {
    init_test_setup();
    let input: Vec<Node<usize>> = Vec::new();

    let view = build_groups(&input);

    assert!(view.is_empty());
    assert!(view.orphans().is_none());
}

#[test]
fn given_orphans_under_several_missing_parents_when_grouping_then_merged_and_sorted() {
    init_test_setup();
    let input = nodes(&[(8, Some(70)), (1, None), (6, Some(50)), (7, Some(70))]);

    let view = build_groups(&input);

    assert_eq!(view.outline(), vec![(Some(1), vec![]), (None, vec![6, 7, 8])]);
}

#[test]
fn given_unsorted_input_when_grouping_then_parents_and_children_ascend() {
    init_test_setup();
    let input = nodes(&[(30, Some(10)), (20, None), (10, None), (11, Some(10)), (21, Some(20))]);

    let view = build_groups(&input);

    assert_eq!(
        view.outline(),
        vec![(Some(10), vec![11, 30]), (Some(20), vec![21])]
    );
}

#[test]
fn given_zero_parent_when_grouping_then_record_is_a_root() {
    init_test_setup();
    let input = nodes(&[(3, Some(0)), (4, Some(3))]);

    let view = build_groups(&input);

    assert_eq!(view.outline(), vec![(Some(3), vec![4])]);
    assert!(view.orphans().is_none());
}

#[test]
fn given_self_parented_record_when_grouping_then_not_its_own_child() {
    init_test_setup();
    let input = nodes(&[(1, Some(1)), (2, Some(1))]);

    let view = build_groups(&input);

    assert_eq!(view.group_of(1).map(|g| g.child_ids()), Some(vec![2]));
}

#[test]
fn given_duplicate_ids_when_grouping_then_every_record_is_placed() {
    init_test_setup();
    let input = nodes(&[(1, None), (1, Some(5)), (2, Some(1))]);

    let view = build_groups(&input);

    assert_grouping_invariants(&input, &view);
    let orphans = view.orphans().expect("orphans bucket");
    let positions: Vec<_> = orphans.children.iter().map(|n| n.payload).collect();
    assert_eq!(positions, vec![0, 1]);
    assert_eq!(view.group_of(1).map(|g| g.child_ids()), Some(vec![2]));
}

#[test]
fn given_duplicate_roots_when_grouping_then_id_heads_one_group() {
    init_test_setup();
    let input = nodes(&[(1, None), (1, None), (2, Some(1))]);

    let view = build_groups(&input);

    assert_eq!(view.outline(), vec![(Some(1), vec![2]), (None, vec![1])]);
    assert_eq!(view.group_of(1).and_then(|g| g.parent).map(|p| p.payload), Some(1));
    assert_eq!(view.orphans().map(|g| g.children[0].payload), Some(0));
}

#[rstest]
#[case::duplicate_roots(&[(1, None), (1, None), (2, Some(1))])]
#[case::duplicate_root_and_child(&[(1, None), (3, None), (1, Some(3)), (2, Some(1))])]
#[case::child_before_duplicate(&[(2, Some(1)), (1, None), (4, Some(2)), (1, None)])]
fn given_duplicate_ids_when_building_both_views_then_children_share_one_parent_record(
    #[case] links: &[(NodeId, Option<NodeId>)],
) {
    init_test_setup();
    let input = nodes(links);

    let view = build_groups(&input);
    let flat = build_flattened(&input);

    let mut from_groups: HashMap<usize, usize> = HashMap::new();
    for group in &view {
        if let Some(parent) = group.parent {
            for child in &group.children {
                from_groups.insert(child.payload, parent.payload);
            }
        }
    }
    let entries = flat.entries();
    let mut from_flat: HashMap<usize, usize> = HashMap::new();
    for (i, entry) in entries.iter().enumerate().filter(|(_, e)| e.level > 0) {
        let enclosing = entries[..i]
            .iter()
            .rev()
            .find(|e| e.level == entry.level - 1)
            .expect("enclosing entry");
        from_flat.insert(entry.node.payload, enclosing.node.payload);
    }
    assert_eq!(from_groups, from_flat);
}

#[rstest]
#[case::empty(&[])]
#[case::single_root(&[(1, None)])]
#[case::chain(&[(1, None), (2, Some(1)), (3, Some(2)), (4, Some(3))])]
#[case::wide(&[(1, None), (5, Some(1)), (3, Some(1)), (4, Some(1)), (2, Some(1))])]
#[case::forest(&[(1, None), (2, None), (3, Some(1)), (4, Some(2))])]
#[case::dangling(&[(1, None), (2, Some(42)), (3, Some(2)), (4, Some(43))])]
#[case::two_cycle(&[(1, Some(2)), (2, Some(1))])]
#[case::cycle_with_tail(&[(1, Some(3)), (2, Some(1)), (3, Some(2)), (4, Some(2))])]
#[case::self_parent(&[(1, Some(1)), (2, Some(1))])]
#[case::zero_parent(&[(1, Some(0)), (2, Some(1))])]
#[case::duplicates(&[(1, None), (1, Some(3)), (3, None), (2, Some(1)), (2, Some(1))])]
#[case::duplicate_roots(&[(1, None), (1, None), (2, Some(1))])]
#[case::duplicate_roots_with_cycle(&[(1, None), (2, Some(1)), (1, Some(2))])]
fn given_any_input_when_grouping_then_invariants_hold(
    #[case] links: &[(NodeId, Option<NodeId>)],
) {
    init_test_setup();
    let input = nodes(links);

    let view = build_groups(&input);

    assert_grouping_invariants(&input, &view);
}

#[test]
fn given_same_input_when_grouping_twice_then_identical() {
    init_test_setup();
    let input = nodes(&[(4, Some(2)), (1, None), (2, Some(1)), (9, Some(77)), (3, Some(1))]);

    let first = build_groups(&input).outline();
    let second = build_groups(&input).outline();

    assert_eq!(first, second);
}

#[test]
fn given_grouped_view_when_serializing_then_parent_and_children_objects() {
    init_test_setup();
    let input = vec![
        Node::root(1, Characteristic::new("Users", "users")),
        Node::new(2, Some(9), Characteristic::new("Stray", "stray")),
    ];

    let json = serde_json::to_value(build_groups(&input)).unwrap();

    assert_eq!(json[0]["parent"]["id"], 1);
    assert!(json[1]["parent"].is_null());
    assert_eq!(json[1]["children"][0]["id"], 2);
    assert_eq!(json[1]["children"][0]["technical_name"], "stray");
}
