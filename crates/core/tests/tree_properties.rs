mod common;

use common::{comment, group};
use coursesync_core::arena::Arena;
use coursesync_core::{find_by_id, latest_by_date, node_count, recursive_delete, remove_by_id, Comment, DeleteOutcome, FileGroup, NodeId};
use rstest::rstest;

/// Builds a deterministic tree: `width` roots, each node with `width` children, `depth` levels.
fn forest(width: usize, depth: usize) -> Vec<FileGroup> {
    fn build(next: &mut i64, width: usize, depth: usize) -> Vec<FileGroup> {
        (0..width)
            .map(|_| {
                *next += 1;
                let id = *next;
                let children = if depth > 1 { build(next, width, depth - 1) } else { Vec::new() };
                group(id, children)
            })
            .collect()
    }
    let mut next = 0;
    build(&mut next, width, depth)
}

fn all_ids(level: &[FileGroup], out: &mut Vec<NodeId>) {
    for g in level {
        out.push(g.id);
        all_ids(&g.file_groups, out);
    }
}

#[rstest]
#[case(1, 1)]
#[case(1, 5)]
#[case(3, 2)]
#[case(2, 4)]
fn deleting_any_present_id_removes_exactly_its_subtree(#[case] width: usize, #[case] depth: usize) {
    let tree = forest(width, depth);
    let mut ids = Vec::new();
    all_ids(&tree, &mut ids);
    for id in ids {
        let mut copy = tree.clone();
        let subtree = 1 + node_count(&find_by_id(&copy, id).unwrap().file_groups);
        assert!(recursive_delete(&mut copy, id));
        assert!(find_by_id(&copy, id).is_none());
        assert_eq!(node_count(&copy), node_count(&tree) - subtree);
    }
}

#[rstest]
#[case(0, 0)]
#[case(2, 3)]
fn deleting_an_absent_id_changes_nothing(#[case] width: usize, #[case] depth: usize) {
    let mut tree = forest(width, depth);
    let before = tree.clone();
    assert!(!recursive_delete(&mut tree, NodeId(-1)));
    assert_eq!(tree, before);
}

#[test]
fn three_way_outcome() {
    let mut empty: Vec<FileGroup> = Vec::new();
    assert_eq!(remove_by_id(&mut empty, NodeId(1)), DeleteOutcome::EmptyInput);
    let mut tree = forest(2, 2);
    assert_eq!(remove_by_id(&mut tree, NodeId(77)), DeleteOutcome::NotFound);
    match remove_by_id(&mut tree, NodeId(1)) {
        DeleteOutcome::Removed(g) => assert_eq!(g.file_groups.len(), 2),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn chain_delete_empties_parent() {
    let mut tree = vec![group(1, vec![group(2, vec![group(3, vec![])])])];
    assert!(recursive_delete(&mut tree, NodeId(2)));
    assert!(tree[0].file_groups.is_empty());
    assert_eq!(tree.len(), 1);
}

#[test]
fn nested_delete_matches_arena_remove() {
    let tree = forest(3, 3);
    let mut nested = tree.clone();
    let mut arena = Arena::from_nested(tree).unwrap();
    recursive_delete(&mut nested, NodeId(2));
    arena.remove(NodeId(2));
    assert_eq!(arena.to_nested(), nested);
}

fn thread(dates: &[i64]) -> Comment {
    // a right-leaning chain with the given dates, ids 1..
    let mut node: Option<Comment> = None;
    for (i, date) in dates.iter().enumerate().rev() {
        let replies = node.take().into_iter().collect();
        node = Some(comment(i as i64 + 1, *date, replies));
    }
    node.unwrap()
}

#[rstest]
#[case(&[5], 1)]
#[case(&[1, 2, 3, 4], 4)]
#[case(&[9, 2, 3], 1)]
#[case(&[1, 8, 3, 8], 2)]
#[case(&[4, 4, 4], 1)]
fn latest_in_a_chain(#[case] dates: &[i64], #[case] expected: i64) {
    assert_eq!(latest_by_date(&thread(dates)).id, NodeId(expected));
}

#[test]
fn latest_in_a_wide_tree_prefers_earlier_branch_on_ties() {
    let root = comment(
        1,
        0,
        vec![
            comment(2, 10, vec![comment(3, 50, vec![])]),
            comment(4, 50, vec![comment(5, 20, vec![])]),
            comment(6, 49, vec![]),
        ],
    );
    assert_eq!(latest_by_date(&root).id, NodeId(3));
}
