use super::KeyLog;
use crate::param::{NaturalOrder, NoRelease, ReverseOrder, Verbatim};
use crate::{AvlTree, Insertion};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};

// Returns the key at the root, and the keys of its direct children
fn top_three<K: Copy, V, C, D, R>(tree: &AvlTree<K, V, C, D, R>) -> (K, Option<K>, Option<K>)
where
    C: crate::Compare<K>,
    D: crate::Duplicate<K>,
    R: crate::Release<K>,
{
    let root = tree.nodes.get(tree.root.unwrap());
    let key_of = |id| tree.nodes.get(id).key;
    (root.key, root.left.map(key_of), root.right.map(key_of))
}

#[test]
fn ascending_inserts_rotate_left() {
    let mut tree: AvlTree<u32, &str> = AvlTree::new();
    assert!(tree.insert(10, "ten", false).is_new());
    assert!(tree.insert(20, "twenty", false).is_new());
    assert_eq!(top_three(&tree), (10, None, Some(20)));

    // third insert makes the root right-heavy by two
    assert!(tree.insert(30, "thirty", false).is_new());
    tree.validate();
    assert_eq!(top_three(&tree), (20, Some(10), Some(30)));
    assert_eq!(tree.height(), Some(1));
}

#[test]
fn descending_inserts_rotate_right() {
    let mut tree: AvlTree<u32, ()> = AvlTree::new();
    for k in [30, 20, 10] {
        assert!(tree.insert(k, (), false).is_new());
    }
    tree.validate();
    assert_eq!(top_three(&tree), (20, Some(10), Some(30)));
}

#[test]
fn zigzag_inserts_double_rotate() {
    let mut tree: AvlTree<u32, ()> = AvlTree::new();
    for k in [10, 30, 20] {
        assert!(tree.insert(k, (), false).is_new());
    }
    tree.validate();
    assert_eq!(top_three(&tree), (20, Some(10), Some(30)));

    let mut tree: AvlTree<u32, ()> = AvlTree::new();
    for k in [30, 10, 20] {
        assert!(tree.insert(k, (), false).is_new());
    }
    tree.validate();
    assert_eq!(top_three(&tree), (20, Some(10), Some(30)));
}

#[test]
fn erase_node_with_two_children() {
    let mut tree: AvlTree<u32, char> = AvlTree::new();
    for (k, v) in [(5, 'e'), (3, 'c'), (8, 'h'), (2, 'b'), (4, 'd'), (7, 'g'), (9, 'i')] {
        assert!(tree.insert(k, v, false).is_new());
    }
    tree.validate();
    assert_eq!(top_three(&tree), (5, Some(3), Some(8)));

    assert_eq!(tree.erase(&5), Some('e'));
    tree.validate();

    let keys: Vec<u32> = tree.keys_in_order().into_iter().copied().collect();
    assert_eq!(keys, [2, 3, 4, 7, 8, 9]);
    // successor moved up into the old root's place
    assert_eq!(top_three(&tree), (7, Some(3), Some(8)));
    assert_eq!(tree.find(&7), Some(&'g'));
    assert_eq!(tree.size(), 6);
}

#[test]
fn erase_rebalances_on_the_way_up() {
    let mut tree: AvlTree<u32, ()> = AvlTree::new();
    for k in [5, 3, 8, 2, 4, 7, 9, 1] {
        assert!(tree.insert(k, (), false).is_new());
    }
    tree.validate();

    enable_debug!();
    tree.erase(&7);
    tree.validate();
    // the root is now left-heavy by two
    tree.erase(&9);
    tree.validate();
    tree.erase(&8);
    tree.validate();
    disable_debug!();

    let keys: Vec<u32> = tree.keys_in_order().into_iter().copied().collect();
    assert_eq!(keys, [1, 2, 3, 4, 5]);
    assert_eq!(top_three(&tree).0, 3);
}

#[test]
fn round_trip() {
    let mut tree = AvlTree::new();
    assert_eq!(tree.find(&"k"), None);
    assert!(tree.insert("k", 1, false).is_new());
    assert_eq!(tree.find(&"k"), Some(&1));
    assert!(tree.contains(&"k"));

    assert_eq!(tree.erase(&"k"), Some(1));
    assert_eq!(tree.find(&"k"), None);
    assert!(!tree.contains(&"k"));
    assert!(tree.is_empty());
    assert_eq!(tree.height(), None);
}

#[test]
fn overwrite_semantics() {
    let mut tree: AvlTree<u8, char> = AvlTree::new();
    assert_eq!(tree.insert(1, 'a', false), Insertion::Inserted);

    let kept = tree.insert(1, 'b', false);
    assert!(!kept.is_stored());
    assert_eq!(kept.previous(), Some(&'a'));
    assert_eq!(kept, Insertion::Rejected { existing: &mut 'a', value: 'b' });
    assert_eq!(tree.find(&1), Some(&'a'));

    let replaced = tree.insert(1, 'c', true);
    assert!(replaced.is_stored());
    assert!(!replaced.is_new());
    assert_eq!(replaced, Insertion::Replaced('a'));
    assert_eq!(tree.find(&1), Some(&'c'));
    assert_eq!(tree.size(), 1);
}

#[test]
fn rejected_insert_gives_access_to_existing() {
    let mut tree: AvlTree<u8, Vec<u8>> = AvlTree::new();
    assert!(tree.insert(1, vec![1], false).is_new());

    if let Insertion::Rejected { existing, value } = tree.insert(1, vec![2], false) {
        existing.extend(value);
    }
    assert_eq!(tree.find(&1), Some(&vec![1, 2]));
}

#[test]
fn find_mut_updates_in_place() {
    let mut tree: AvlTree<u8, u32> = AvlTree::new();
    assert!(tree.insert(4, 0, false).is_new());
    assert!(tree.insert(2, 0, false).is_new());
    assert!(tree.insert(6, 0, false).is_new());

    for _ in 0..3 {
        *tree.find_mut(&6).unwrap() += 1;
    }
    assert!(tree.find_mut(&5).is_none());
    assert_eq!(tree.find(&6), Some(&3));
    assert_eq!(tree.find(&4), Some(&0));
}

#[test]
fn duplicate_only_runs_for_new_keys() {
    let log = KeyLog::<u32>::default();
    let mut tree = AvlTree::with_strategies(NaturalOrder, log.duplicate(), log.release());

    assert!(tree.insert(3_u32, 'a', false).is_new());
    assert!(tree.insert(1, 'b', false).is_new());
    assert_eq!(tree.insert(3, 'c', true), Insertion::Replaced('a'));
    assert!(!tree.insert(1, 'd', false).is_stored());
    assert!(tree.insert(2, 'e', false).is_new());

    assert_eq!(log.duplicated(), [3, 1, 2]);
    assert!(log.released().is_empty());
}

#[test]
fn erase_releases_exactly_the_erased_key() {
    let log = KeyLog::<u32>::default();
    let mut tree = AvlTree::with_strategies(NaturalOrder, log.duplicate(), log.release());
    for k in [5_u32, 3, 8, 2, 4, 7, 9] {
        assert!(tree.insert(k, (), false).is_new());
    }

    assert_eq!(tree.erase(&6), None);
    assert!(log.released().is_empty());

    // two children
    tree.erase(&5);
    assert_eq!(log.released(), [5]);
    // leaf
    tree.erase(&2);
    assert_eq!(log.released(), [5, 2]);
    tree.validate();
}

#[test]
fn drop_releases_each_key_once() {
    let log = KeyLog::<u32>::default();
    let mut tree = AvlTree::with_strategies(NaturalOrder, log.duplicate(), log.release());
    for k in 0_u32..100 {
        assert!(tree.insert(k, k * 2, false).is_new());
    }
    for k in (0..100).step_by(3) {
        assert_eq!(tree.erase(&k), Some(k * 2));
    }
    tree.validate();
    drop(tree);

    let mut released = log.released();
    released.sort_unstable();
    assert_eq!(released, (0..100).collect::<Vec<_>>());
    assert_eq!(log.duplicated().len(), 100);
}

#[test]
fn release_happens_children_first() {
    let log = KeyLog::<u32>::default();
    let mut tree = AvlTree::with_strategies(NaturalOrder, log.duplicate(), log.release());
    for k in [2_u32, 1, 3] {
        assert!(tree.insert(k, (), false).is_new());
    }
    tree.clear();
    assert_eq!(log.released(), [1, 3, 2]);
}

#[test]
fn clear_leaves_a_usable_tree() {
    let releases = Cell::new(0);
    let mut tree = AvlTree::with_strategies(NaturalOrder, Verbatim, |_k: u16| {
        releases.set(releases.get() + 1)
    });

    for k in 0..50 {
        assert!(tree.insert(k, (), false).is_new());
    }
    tree.clear();
    assert_eq!(releases.get(), 50);
    assert!(tree.is_empty());
    assert_eq!(tree.find(&10), None);
    tree.validate();

    assert!(tree.insert(10, (), false).is_new());
    assert!(tree.insert(11, (), false).is_new());
    tree.validate();
    assert_eq!(tree.size(), 2);
    drop(tree);
    assert_eq!(releases.get(), 52);
}

#[test]
fn panicking_release_leaves_tree_balanced() {
    let mut tree = AvlTree::with_strategies(NaturalOrder, Verbatim, |k: u32| {
        if k == 4 {
            panic!("refusing to release {k}");
        }
    });
    for k in 0..10 {
        assert!(tree.insert(k, (), false).is_new());
    }

    let result = panic::catch_unwind(AssertUnwindSafe(|| tree.erase(&4)));
    assert!(result.is_err());

    tree.validate();
    assert_eq!(tree.size(), 9);
    assert!(!tree.contains(&4));
}

#[test]
fn panicking_release_during_clear_leaves_tree_empty() {
    let released = Cell::new(0);
    let mut tree = AvlTree::with_strategies(NaturalOrder, Verbatim, |k: u32| {
        if k == 1 {
            panic!("refusing to release {k}");
        }
        released.set(released.get() + 1);
    });
    for k in 0..7 {
        assert!(tree.insert(k, k.to_string(), false).is_new());
    }

    let result = panic::catch_unwind(AssertUnwindSafe(|| tree.clear()));
    assert!(result.is_err());

    // nothing is left behind in the arena
    tree.validate();
    assert!(tree.is_empty());
    assert_eq!(tree.height(), None);
    assert_eq!(tree.find(&5), None);

    // and the tree is still usable afterwards
    let before = released.get();
    for k in [10, 11, 12] {
        assert!(tree.insert(k, k.to_string(), false).is_new());
    }
    tree.validate();
    assert_eq!(tree.erase(&11), Some("11".to_owned()));
    assert_eq!(released.get(), before + 1);
    assert_eq!(tree.size(), 2);
}

#[test]
fn try_with_capacity_reports_overflow() {
    let result = AvlTree::<u32, ()>::try_with_capacity(usize::MAX);
    let err = match result {
        Ok(_) => panic!("allocating usize::MAX nodes should fail"),
        Err(e) => e,
    };

    let msg = err.to_string();
    assert!(!msg.is_empty());
    assert!(msg.starts_with("failed to allocate tree storage"), "{msg}");
    assert!(std::error::Error::source(&err).is_some());

    let log = KeyLog::<u32>::default();
    let result = AvlTree::<u32, (), _, _, _>::try_with_capacity_and_strategies(
        usize::MAX,
        NaturalOrder,
        log.duplicate(),
        log.release(),
    );
    assert!(result.is_err());
    assert!(log.duplicated().is_empty());
    assert!(log.released().is_empty());
}

#[test]
fn try_insert_success_path() {
    let log = KeyLog::<u32>::default();
    let mut tree =
        AvlTree::try_with_capacity_and_strategies(2, NaturalOrder, log.duplicate(), log.release())
            .unwrap();

    assert_eq!(tree.try_insert(2, 'b', false), Ok(Insertion::Inserted));
    assert_eq!(tree.try_insert(1, 'a', false), Ok(Insertion::Inserted));
    // beyond the reserved capacity
    assert_eq!(tree.try_insert(3, 'c', false), Ok(Insertion::Inserted));
    assert_eq!(tree.try_insert(3, 'C', true), Ok(Insertion::Replaced('c')));
    assert_eq!(
        tree.try_insert(1, 'x', false),
        Ok(Insertion::Rejected { existing: &mut 'a', value: 'x' }),
    );
    tree.validate();

    assert_eq!(tree.size(), 3);
    assert_eq!(tree.find(&3), Some(&'C'));
    assert_eq!(log.duplicated(), [2, 1, 3]);
    assert!(log.released().is_empty());
}

#[test]
fn reverse_order_is_descending() {
    let mut tree = AvlTree::with_strategies(ReverseOrder, Verbatim, NoRelease);
    for k in [4_i32, -1, 9, 0, 2] {
        assert!(tree.insert(k, k.to_string(), false).is_new());
    }
    tree.validate();

    let keys: Vec<i32> = tree.keys_in_order().into_iter().copied().collect();
    assert_eq!(keys, [9, 4, 2, 0, -1]);
    assert_eq!(tree.find(&9).map(String::as_str), Some("9"));
}

#[test]
fn sequential_inserts_stay_logarithmic() {
    let mut tree = AvlTree::try_with_capacity(4096).unwrap();
    for k in 0..4096_u32 {
        assert!(tree.insert(k, (), false).is_new());
    }
    tree.validate();

    // A perfectly balanced tree of 4095 nodes has height 11
    let height = tree.height().unwrap();
    assert!(height >= 12, "height {height} is impossibly small");
    assert!((height as f64) < 1.45 * ((4096.0_f64 + 2.0).log2()));
}

#[test]
fn shuffled_inserts_and_erases() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut keys: Vec<u32> = (0..2000).collect();
    keys.shuffle(&mut rng);

    let mut tree = AvlTree::new();
    for (i, &k) in keys.iter().enumerate() {
        assert!(tree.insert(k, i, false).is_new());
        if i % 97 == 0 {
            tree.validate();
        }
    }
    tree.validate();
    assert_eq!(tree.size(), 2000);

    keys.shuffle(&mut rng);
    for (i, k) in keys.iter().enumerate() {
        assert!(tree.erase(k).is_some());
        if i % 89 == 0 {
            tree.validate();
        }
    }
    tree.validate();
    assert!(tree.is_empty());
}

#[test]
fn debug_shows_paths() {
    let mut tree: AvlTree<u8, char> = AvlTree::new();
    assert!(tree.insert(2, 'b', false).is_new());
    assert!(tree.insert(1, 'a', false).is_new());
    assert!(tree.insert(3, 'c', false).is_new());

    let expected = "AvlTree { size: 3, nodes: {\n    [ ]: 2 => 'b' (height 1)\n    [L]: 1 => 'a' (height 0)\n    [R]: 3 => 'c' (height 0)\n} }";
    assert_eq!(format!("{tree:?}"), expected);

    let empty: AvlTree<u8, char> = AvlTree::new();
    assert_eq!(format!("{empty:?}"), "AvlTree { size: 0, nodes: {} }");
}
