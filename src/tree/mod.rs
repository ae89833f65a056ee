pub mod core;
pub mod merge;
pub mod persist;
pub mod run;

pub use self::core::{ExecutionTree, FrozenTree, Preorder};
pub use self::persist::{TreeRecord, TreeRecords};
pub use self::run::Run;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ExeTreeError;
    use crate::location::Location;
    use crate::node::{EdgeId, NodeId};
    use crate::outcome::{Outcome, OutcomeState};
    use crate::value::Value;
    use std::fs;

    fn values_in_preorder(tree: &ExecutionTree) -> Vec<f64> {
        tree.preorder()
            .map(|(e, _)| tree.edge(e).unwrap().value.as_f64())
            .collect()
    }

    #[test]
    fn test_find_or_add_edge_idempotent() {
        let mut tree = ExecutionTree::new();
        let root = tree.root();
        let a = tree.find_or_add_edge(root, 123.0).unwrap();
        let b = tree.find_or_add_edge(root, 123.0).unwrap();
        assert_eq!(a, b);
        assert_eq!(tree.edge_count(), 1);
        assert!(tree.edge(a).unwrap().outcome.is_unknown());
        assert!(tree.edge(a).unwrap().child.is_none());
    }

    #[test]
    fn test_second_lookup_keeps_outcome() {
        let mut tree = ExecutionTree::new();
        let root = tree.root();
        let e = tree.find_or_add_edge(root, 4).unwrap();
        tree.mark_outcome(e, true).unwrap();
        let again = tree.find_or_add_edge(root, 4).unwrap();
        assert_eq!(tree.edge(again).unwrap().outcome.state(), OutcomeState::MayWin);
    }

    #[test]
    fn test_branching() {
        let mut tree = ExecutionTree::new();
        let root = tree.root();
        let e1 = tree.find_or_add_edge(root, 1.0).unwrap();
        tree.mark_outcome(e1, true).unwrap();
        let e2 = tree.find_or_add_edge(root, 2.0).unwrap();
        assert_ne!(e1, e2);
        assert_eq!(tree.edge_count(), 2);
        assert_eq!(tree.edge(e1).unwrap().value, Value::from(1.0));
        assert!(tree.edge(e1).unwrap().outcome.may_win());
        assert_eq!(tree.edge(e2).unwrap().value, Value::from(2.0));
        assert!(tree.edge(e2).unwrap().outcome.is_unknown());
    }

    #[test]
    fn test_child_of_is_stable() {
        let mut tree = ExecutionTree::new();
        let root = tree.root();
        let e = tree.find_or_add_edge(root, 1).unwrap();
        let c1 = tree.child_of(e).unwrap();
        let c2 = tree.child_of(e).unwrap();
        assert_eq!(c1, c2);
        assert_ne!(c1, root);
        assert_eq!(tree.node_count(), 2);
        assert!(tree.node(c1).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_handles() {
        let mut tree = ExecutionTree::new();
        assert_eq!(
            tree.find_or_add_edge(NodeId(7), 1.0),
            Err(ExeTreeError::UnknownNode(7))
        );
        let bogus = EdgeId { node: tree.root(), slot: 3 };
        assert_eq!(tree.mark_outcome(bogus, true), Err(ExeTreeError::UnknownEdge(0, 3)));
        assert_eq!(tree.child_of(bogus), Err(ExeTreeError::UnknownEdge(0, 3)));
    }

    #[test]
    fn test_replay_stability() {
        let mut tree = ExecutionTree::new();
        let run = [3.0, 1.0, 4.0, 1.0, 5.0];
        for m in 0..10 {
            tree.record_run(&run, m % 3 == 0).unwrap();
            assert_eq!(tree.edge_count(), run.len());
        }
        for (e, _) in tree.preorder() {
            assert_eq!(tree.edge(e).unwrap().outcome, Outcome { runs: 10, wins: 4 });
        }
    }

    #[test]
    fn test_run_cursor() {
        let mut tree = ExecutionTree::new();
        let mut run = tree.run();
        let a = run.choose(1).unwrap();
        let b = run.choose(2).unwrap();
        assert_eq!(run.path(), &[a, b]);
        let path = run.finish(true).unwrap();
        assert_eq!(path, vec![a, b]);
        assert!(tree.edge(a).unwrap().outcome.may_win());
        assert_eq!(tree.edge(a).unwrap().child, Some(b.node));
        // The last edge of a run gets no child.
        assert!(tree.edge(b).unwrap().child.is_none());
    }

    #[test]
    fn test_abandoned_run_marks_nothing() {
        let mut tree = ExecutionTree::new();
        {
            let mut run = tree.run();
            run.choose(9).unwrap();
        }
        assert_eq!(tree.edge_count(), 1);
        let (e, _) = tree.preorder().next().unwrap();
        assert!(tree.edge(e).unwrap().outcome.is_unknown());
    }

    #[test]
    fn test_preorder_order() {
        let mut tree = ExecutionTree::new();
        tree.record_run(&[1.0, 10.0], true).unwrap();
        tree.record_run(&[2.0], false).unwrap();
        tree.record_run(&[1.0, 11.0, 100.0], false).unwrap();
        assert_eq!(values_in_preorder(&tree), vec![1.0, 10.0, 11.0, 100.0, 2.0]);
        let depths: Vec<usize> = tree.preorder().map(|(_, d)| d).collect();
        assert_eq!(depths, vec![0, 1, 1, 2, 0]);
        assert_eq!(tree.depth(), 3);
        assert_eq!(tree.preorder().count(), tree.edge_count());
    }

    #[test]
    fn test_empty_tree() {
        let tree = ExecutionTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.preorder().count(), 0);
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn test_freeze_and_snapshot() {
        let mut tree = ExecutionTree::new();
        tree.record_run(&[1, 2], true).unwrap();
        let snap = tree.snapshot();
        tree.record_run(&[3], false).unwrap();
        assert_eq!(snap.edge_count(), 2);
        assert_eq!(tree.edge_count(), 3);

        let frozen = tree.freeze();
        let reader = frozen.clone();
        assert_eq!(reader.edge_count(), 3);
        drop(reader);
        let mut thawed = frozen.thaw();
        thawed.record_run(&[4], true).unwrap();
        assert_eq!(thawed.edge_count(), 4);
    }

    #[test]
    fn test_records_round_trip() {
        let mut tree = ExecutionTree::new();
        tree.record_run(&[5.0, 6.0, 7.0], true).unwrap();
        tree.record_run(&[5.0, 8.0], false).unwrap();
        tree.record_run(&[9.0], false).unwrap();
        let e = tree.find_or_add_edge(tree.root(), 9.0).unwrap();
        // A child that was opened but never extended survives the round trip.
        tree.child_of(e).unwrap();

        let records = tree.to_records();
        assert_eq!(records.records.len(), tree.edge_count());
        assert_eq!(records.records[0].node, 0);
        let back = ExecutionTree::from_records(&records).unwrap();
        assert_eq!(back, tree);
        assert_eq!(values_in_preorder(&back), values_in_preorder(&tree));
        assert_eq!(back.node_count(), tree.node_count());

        // Find-or-create keeps working against rehydrated nodes.
        let mut back = back;
        let root = back.root();
        let again = back.find_or_add_edge(root, 5.0).unwrap();
        assert_eq!(back.edge_count(), tree.edge_count());
        assert_eq!(back.edge(again).unwrap().outcome, Outcome { runs: 2, wins: 1 });
    }

    #[test]
    fn test_malformed_records() {
        let rec = |node, value: f64, child| TreeRecord {
            node,
            location: None,
            value: Value::from(value),
            outcome: Outcome::new(),
            child,
        };
        let dup = TreeRecords {
            records: vec![rec(0, 1.0, None), rec(0, 1.0, None)],
        };
        assert!(matches!(ExecutionTree::from_records(&dup), Err(ExeTreeError::MalformedTree(_))));

        let shared = TreeRecords {
            records: vec![rec(0, 1.0, Some(1)), rec(0, 2.0, Some(1)), rec(1, 3.0, None)],
        };
        assert!(matches!(ExecutionTree::from_records(&shared), Err(ExeTreeError::MalformedTree(_))));

        let back_to_root = TreeRecords {
            records: vec![rec(0, 1.0, Some(0))],
        };
        assert!(matches!(ExecutionTree::from_records(&back_to_root), Err(ExeTreeError::MalformedTree(_))));

        let orphan = TreeRecords {
            records: vec![rec(0, 1.0, None), rec(4, 2.0, None)],
        };
        assert!(matches!(ExecutionTree::from_records(&orphan), Err(ExeTreeError::MalformedTree(_))));

        let cycle = TreeRecords {
            records: vec![rec(0, 1.0, None), rec(1, 2.0, Some(2)), rec(2, 3.0, Some(1))],
        };
        assert!(matches!(ExecutionTree::from_records(&cycle), Err(ExeTreeError::MalformedTree(_))));

        let no_root = TreeRecords {
            records: vec![rec(3, 1.0, None)],
        };
        assert!(matches!(ExecutionTree::from_records(&no_root), Err(ExeTreeError::MalformedTree(_))));

        assert!(ExecutionTree::from_records(&TreeRecords::default()).unwrap().is_empty());

        let mut split = TreeRecords {
            records: vec![rec(0, 1.0, None), rec(0, 2.0, None)],
        };
        split.records[0].location = Some(Location(1));
        split.records[1].location = Some(Location(2));
        assert!(matches!(ExecutionTree::from_records(&split), Err(ExeTreeError::MalformedTree(_))));
    }

    #[test]
    fn test_wide_integer_values_get_their_own_edges() {
        let mut tree = ExecutionTree::new();
        let root = tree.root();
        let a = tree.find_or_add_edge(root, u64::MAX).unwrap();
        let b = tree.find_or_add_edge(root, u64::MAX - 1).unwrap();
        let c = tree.find_or_add_edge(root, (1_u64 << 53) + 1).unwrap();
        let d = tree.find_or_add_edge(root, 1_u64 << 53).unwrap();
        assert_eq!(tree.edge_count(), 4);
        assert_ne!(a, b);
        assert_ne!(c, d);
        assert_eq!(tree.find_or_add_edge(root, (1_u64 << 53) as f64).unwrap(), d);

        let back = ExecutionTree::from_json(&tree.json_dump().unwrap()).unwrap();
        assert_eq!(back, tree);
        assert_eq!(back.edge(b).unwrap().value, Value::from(u64::MAX - 1));
    }

    #[test]
    fn test_non_finite_values_round_trip() {
        let mut tree = ExecutionTree::new();
        tree.record_run(&[f64::NAN, f64::INFINITY], true).unwrap();
        tree.record_run(&[f64::NEG_INFINITY], false).unwrap();
        tree.record_run(&[f64::NAN, 1.5], false).unwrap();
        let json = tree.json_dump().unwrap();
        let back = ExecutionTree::from_json(&json).unwrap();
        assert_eq!(back, tree);
        assert_eq!(back.edge_count(), 4);
        let root = back.root();
        let nan = back.node(root).unwrap().edge(0).unwrap();
        assert!(nan.value.as_f64().is_nan());
        assert_eq!(nan.outcome, Outcome { runs: 2, wins: 1 });
        assert_eq!(back.node(root).unwrap().edge(1).unwrap().value.as_f64(), f64::NEG_INFINITY);
    }

    #[test]
    fn test_located_runs() {
        let mut tree = ExecutionTree::new();
        let mut run = tree.run();
        let a = run.choose_at(7_u64, 1).unwrap();
        run.choose_at(9_u64, 2).unwrap();
        run.finish(true).unwrap();
        assert_eq!(tree.node(tree.root()).unwrap().location(), Some(Location(7)));
        let child = tree.edge(a).unwrap().child.unwrap();
        assert_eq!(tree.node(child).unwrap().location(), Some(Location(9)));

        let root = tree.root();
        assert_eq!(
            tree.find_or_add_edge_at(root, 8_u64, 3),
            Err(ExeTreeError::LocationConflict { node: 0, held: 7, given: 8 })
        );
        assert_eq!(tree.edge_count(), 2);
        tree.record_located_run(&[(7_u64, 1), (9, 4)], false).unwrap();

        let index = tree.location_index();
        assert_eq!(index.get_index(Location(7)), 1);
        assert_eq!(index.get_index(Location(9)), 2);

        let back = ExecutionTree::from_json(&tree.json_dump().unwrap()).unwrap();
        assert_eq!(back, tree);
        assert_eq!(back.location_index(), index);
    }

    #[test]
    fn test_merge_locations() {
        let mut a = ExecutionTree::new();
        a.record_run(&[1, 2], true).unwrap();
        let mut b = ExecutionTree::new();
        b.record_located_run(&[(5_u64, 1), (6, 3)], false).unwrap();
        a.merge(&b).unwrap();
        assert_eq!(a.node(a.root()).unwrap().location(), Some(Location(5)));
        assert_eq!(a.location_index().watermark(), 3);

        let mut c = ExecutionTree::new();
        c.record_located_run(&[(4_u64, 1)], true).unwrap();
        assert!(matches!(a.merge(&c), Err(ExeTreeError::LocationConflict { .. })));
    }

    #[test]
    fn test_json_round_trip() {
        let mut tree = ExecutionTree::new();
        tree.record_run(&[0.5, -2.0], true).unwrap();
        tree.record_run(&[0.5, 3.0], false).unwrap();
        let json = tree.json_dump().unwrap();
        let back = ExecutionTree::from_json(&json).unwrap();
        assert_eq!(back, tree);
        assert!(matches!(ExecutionTree::from_json("{"), Err(ExeTreeError::UnableToRead(_))));
    }

    #[test]
    fn test_save_load_tree() {
        let mut tree = ExecutionTree::new();
        tree.record_run(&[1, 2, 3], true).unwrap();
        let path = std::env::temp_dir().join("exetree_save_load_test.json");
        let path = path.to_str().unwrap();
        tree.save_tree(path).unwrap();
        let loaded = ExecutionTree::load_tree(path).unwrap();
        fs::remove_file(path).unwrap();
        assert_eq!(loaded, tree);
        assert!(matches!(
            ExecutionTree::load_tree("/nonexistent/exetree.json"),
            Err(ExeTreeError::UnableToRead(_))
        ));
    }

    #[test]
    fn test_merge() {
        let mut a = ExecutionTree::new();
        a.record_run(&[1.0, 2.0], false).unwrap();
        a.record_run(&[3.0], false).unwrap();

        let mut b = ExecutionTree::new();
        b.record_run(&[1.0, 2.0], true).unwrap();
        b.record_run(&[1.0, 4.0, 5.0], true).unwrap();
        b.record_run(&[6.0], false).unwrap();

        a.merge(&b).unwrap();
        assert_eq!(a.edge_count(), 6);
        assert_eq!(values_in_preorder(&a), vec![1.0, 2.0, 4.0, 5.0, 3.0, 6.0]);

        let root = a.root();
        let one = a.find_or_add_edge(root, 1.0).unwrap();
        assert_eq!(a.edge(one).unwrap().outcome, Outcome { runs: 3, wins: 2 });
        let three = a.find_or_add_edge(root, 3.0).unwrap();
        assert_eq!(a.edge(three).unwrap().outcome.state(), OutcomeState::MayLose);
        assert_eq!(a.edge_count(), 6);
    }

    #[test]
    fn test_merge_into_empty_equals_source() {
        let mut src = ExecutionTree::new();
        src.record_run(&[7, 8, 9], true).unwrap();
        src.record_run(&[7, 1], false).unwrap();
        let mut dst = ExecutionTree::new();
        dst.merge(&src).unwrap();
        assert_eq!(dst, src);
    }
}
