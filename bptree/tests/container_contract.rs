use bptree::{BPlusTreeMap, Container};
use std::collections::BTreeMap;

const INSERTED: [i64; 10] = [12, 6, 17, 21, 3, 7, 9, 26, 25, 19];
const DELETED: [i64; 3] = [21, 9, 25];

/// Drive a container through the reference scenario. `check` runs after
/// every mutation.
fn run_scenario<C: Container<i64, i64>>(container: &mut C, check: impl Fn(&C)) {
    for key in INSERTED {
        assert_eq!(container.insert(key, key * 2), None);
        check(container);
    }
    assert_eq!(container.length(), 10);

    for key in DELETED {
        assert_eq!(container.delete(&key), Some(key * 2));
        check(container);
    }
    assert_eq!(container.length(), 7);

    for key in INSERTED {
        if DELETED.contains(&key) {
            assert_eq!(container.search(&key), None, "{} should be gone", key);
        } else {
            assert_eq!(container.search(&key), Some(&(key * 2)), "{} should remain", key);
        }
    }

    assert_eq!(container.insert(12, 1200), Some(24));
    assert_eq!(container.search(&12), Some(&1200));
    assert_eq!(container.length(), 7);

    assert_eq!(container.delete(&21), None);
    assert_eq!(container.length(), 7);
    check(container);
}

#[test]
fn test_scenario_on_order_four_tree() {
    let mut tree = BPlusTreeMap::new(4).unwrap();
    run_scenario(&mut tree, |tree| {
        if let Err(err) = tree.validate() {
            panic!("{}\n{}", err, tree.render());
        }
    });

    let keys: Vec<_> = tree.keys().copied().collect();
    assert_eq!(keys, vec![3, 6, 7, 12, 17, 19, 26]);
}

#[test]
fn test_scenario_on_larger_orders() {
    for order in [5, 6, 7, 16, 128] {
        let mut tree = BPlusTreeMap::new(order).unwrap();
        run_scenario(&mut tree, |tree| assert!(tree.check_invariants()));
    }
}

#[test]
fn test_scenario_on_reference_map() {
    let mut reference = BTreeMap::new();
    run_scenario(&mut reference, |_| {});
}

#[test]
fn test_delete_everything_then_reuse() {
    let mut tree = BPlusTreeMap::new(4).unwrap();
    for key in INSERTED {
        tree.insert(key, key);
    }
    for key in INSERTED {
        assert_eq!(Container::delete(&mut tree, &key), Some(key));
        assert!(tree.check_invariants());
    }
    assert_eq!(tree.length(), 0);
    assert_eq!(tree.render(), "<empty>\n");

    tree.insert(1, 1);
    assert_eq!(tree.search(&1), Some(&1));
    assert_eq!(tree.length(), 1);
}
