use super::*;

use crate::validate::{in_order, init_logging, validate};
use proptest::prelude::*;
use std::collections::BTreeMap;

#[derive(Clone, Debug)]
enum Op {
    Upsert(u16, u32),
    Remove(u16),
    Unlink(u16),
    Get(u16),
}

fn key_strategy() -> impl Strategy<Value = u16> + Clone {
    // a narrow range keeps hits, overwrites and removals of live keys frequent
    0u16..512
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    let key = key_strategy();
    let op = prop_oneof![
        50 => (key.clone(), any::<u32>()).prop_map(|(k, v)| Op::Upsert(k, v)),
        25 => key.clone().prop_map(Op::Remove),
        10 => key.clone().prop_map(Op::Unlink),
        15 => key.clone().prop_map(Op::Get),
    ];
    prop::collection::vec(op, 0..=600)
}

fn new_tree() -> Ebony<PodOrd<u16>> {
    init_logging();
    Ebony::for_pod_keys(4)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence_with_btreemap(ops in ops_strategy()) {
        let mut t = new_tree();
        let mut m: BTreeMap<u16, u32> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Upsert(key, value) => {
                    let node = t.upsert(&key.to_ne_bytes(), &value.to_ne_bytes()).unwrap();
                    prop_assert_eq!(node.payload(), value.to_ne_bytes());
                    m.insert(key, value);
                }
                Op::Remove(key) => {
                    let removed_t = t.remove(&key.to_ne_bytes());
                    let removed_m = m.remove(&key);
                    match removed_m {
                        Some(_) => {
                            prop_assert_eq!(removed_t, Ok(()));
                        }
                        None => {
                            prop_assert_eq!(removed_t, Err(EbonyError::KeyNotFound));
                        }
                    }
                }
                Op::Unlink(key) => {
                    let got_t = t
                        .unlink(&key.to_ne_bytes())
                        .ok()
                        .map(|node| bytemuck::pod_read_unaligned::<u32>(node.payload()));
                    prop_assert_eq!(got_t, m.remove(&key));
                }
                Op::Get(key) => {
                    let got_t = t
                        .get_value(&key.to_ne_bytes())
                        .ok()
                        .map(|bytes| bytemuck::pod_read_unaligned::<u32>(&bytes));
                    prop_assert_eq!(got_t, m.get(&key).copied());
                }
            }

            prop_assert_eq!(t.len(), m.len());
            let stats = validate(&t);
            prop_assert!(stats.height <= 2 * stats.black_height);
        }

        let got: Vec<Vec<u8>> = in_order(&t);
        let expected: Vec<Vec<u8>> = m.keys().map(|k| k.to_ne_bytes().to_vec()).collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_any_insertion_order_sorts(keys in prop::collection::vec(any::<u16>(), 0..=400)) {
        let mut t = new_tree();
        for k in &keys {
            t.upsert(&k.to_ne_bytes(), &[0; 4]).unwrap();
        }

        let mut expected = keys.clone();
        expected.sort_unstable();
        expected.dedup();

        let stats = validate(&t);
        let got: Vec<u16> = stats
            .keys
            .iter()
            .map(|k| bytemuck::pod_read_unaligned(k))
            .collect();
        prop_assert_eq!(got, expected);
    }
}

fn for_each_permutation<T: Clone>(items: &[T], mut f: impl FnMut(Vec<T>)) {
    fn rec<T: Clone>(
        items: &[T],
        used: &mut [bool],
        out: &mut Vec<T>,
        f: &mut impl FnMut(Vec<T>),
    ) {
        if out.len() == items.len() {
            f(out.clone());
            return;
        }

        for i in 0..items.len() {
            if used[i] {
                continue;
            }
            used[i] = true;
            out.push(items[i].clone());
            rec(items, used, out, f);
            out.pop();
            used[i] = false;
        }
    }

    let mut used = vec![false; items.len()];
    let mut out = Vec::with_capacity(items.len());
    rec(items, &mut used, &mut out, &mut f);
}

#[test]
fn exhaustive_insert_order_small_set() {
    let keys: [u16; 6] = [4, 8, 15, 16, 23, 42];

    for_each_permutation(&keys, |order| {
        let mut t = new_tree();
        for k in &order {
            t.upsert(&k.to_ne_bytes(), &[1; 4]).unwrap();
            validate(&t);
        }
        assert_eq!(t.len(), keys.len());
    });
}

#[test]
fn exhaustive_remove_order_small_set() {
    let keys: [u16; 6] = [4, 8, 15, 16, 23, 42];

    for_each_permutation(&keys, |order| {
        let mut t = new_tree();
        for k in &keys {
            t.upsert(&k.to_ne_bytes(), &[1; 4]).unwrap();
        }

        for (i, k) in order.iter().enumerate() {
            t.remove(&k.to_ne_bytes()).unwrap();
            let stats = validate(&t);
            assert_eq!(stats.keys.len(), keys.len() - i - 1);
        }
        assert!(t.is_empty());
    });
}
