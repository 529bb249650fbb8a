use super::KeyLog;
use crate::param::{NaturalOrder, ReverseOrder, Verbatim};
use crate::{AvlTree, Insertion};
use proptest::prelude::*;
use std::collections::btree_map::{BTreeMap, Entry};

#[derive(Clone, Debug)]
enum Op {
    Insert(u16, u32, bool),
    Erase(u16),
    Find(u16),
    FindMut(u16, u32),
    Clear,
}

// A small key space, so that most operations hit existing keys
fn key_strategy() -> impl Strategy<Value = u16> + Clone {
    0_u16..256
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    let key = key_strategy();
    let op = prop_oneof![
        45 => (key.clone(), any::<u32>(), any::<bool>()).prop_map(|(k, v, o)| Op::Insert(k, v, o)),
        30 => key.clone().prop_map(Op::Erase),
        15 => key.clone().prop_map(Op::Find),
        9 => (key.clone(), any::<u32>()).prop_map(|(k, v)| Op::FindMut(k, v)),
        1 => Just(Op::Clear),
    ];
    prop::collection::vec(op, 0..=1000)
}

/// What `insert` should produce, according to `BTreeMap`
fn model_insert(
    m: &mut BTreeMap<u16, u32>,
    key: u16,
    value: u32,
    overwrite: bool,
) -> Insertion<'_, u32> {
    match m.entry(key) {
        Entry::Vacant(e) => {
            e.insert(value);
            Insertion::Inserted
        }
        Entry::Occupied(mut e) if overwrite => Insertion::Replaced(e.insert(value)),
        Entry::Occupied(e) => Insertion::Rejected {
            existing: e.into_mut(),
            value,
        },
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 10_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_matches_btree_map(ops in ops_strategy()) {
        let mut t: AvlTree<u16, u32> = AvlTree::new();
        let mut m: BTreeMap<u16, u32> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Insert(key, value, overwrite) => {
                    let got_t = t.insert(key, value, overwrite);
                    let got_m = model_insert(&mut m, key, value, overwrite);
                    prop_assert_eq!(got_t, got_m);
                }
                Op::Erase(key) => {
                    prop_assert_eq!(t.erase(&key), m.remove(&key));
                }
                Op::Find(key) => {
                    prop_assert_eq!(t.find(&key), m.get(&key));
                    prop_assert_eq!(t.contains(&key), m.contains_key(&key));
                }
                Op::FindMut(key, value) => {
                    let got_t = t.find_mut(&key).map(|v| std::mem::replace(v, value));
                    let got_m = m.get_mut(&key).map(|v| std::mem::replace(v, value));
                    prop_assert_eq!(got_t, got_m);
                }
                Op::Clear => {
                    t.clear();
                    m.clear();
                }
            }

            t.validate();
            prop_assert_eq!(t.size(), m.len());
        }

        let got: Vec<u16> = t.keys_in_order().into_iter().copied().collect();
        let expected: Vec<u16> = m.keys().copied().collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_reverse_order_mirrors(keys in prop::collection::vec(key_strategy(), 0..=300)) {
        let mut t = AvlTree::with_strategies(ReverseOrder, Verbatim, |_k: u16| {});
        for &k in &keys {
            let _ = t.insert(k, (), false);
        }
        t.validate();

        let mut expected = keys.clone();
        expected.sort_unstable_by(|a, b| b.cmp(a));
        expected.dedup();
        let got: Vec<u16> = t.keys_in_order().into_iter().copied().collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_keys_released_once(ops in ops_strategy()) {
        let log = KeyLog::<u16>::default();
        let mut t = AvlTree::with_strategies(NaturalOrder, log.duplicate(), log.release());

        for op in ops {
            match op {
                Op::Insert(key, value, overwrite) => {
                    let _ = t.insert(key, value, overwrite);
                }
                Op::Erase(key) => {
                    t.erase(&key);
                }
                Op::Find(_) | Op::FindMut(..) => (),
                Op::Clear => t.clear(),
            }

            let live = log.duplicated().len() - log.released().len();
            prop_assert_eq!(live, t.size());
        }
        drop(t);

        let mut duplicated = log.duplicated();
        let mut released = log.released();
        duplicated.sort_unstable();
        released.sort_unstable();
        prop_assert_eq!(duplicated, released);
    }

    #[test]
    fn prop_height_is_logarithmic(keys in prop::collection::vec(any::<u32>(), 1..=2000)) {
        let mut t = AvlTree::new();
        for k in keys {
            let _ = t.insert(k, (), true);
        }

        let bound = 1.45 * ((t.size() + 2) as f64).log2();
        let height = t.height().unwrap_or(0);
        prop_assert!((height as f64) < bound, "height {} for size {}", height, t.size());
    }
}
