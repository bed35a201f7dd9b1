#![cfg(test)]

// Property tests for LinkedTable kept inside the crate so they can
// assert the internal structural invariants after every operation.

use crate::hashers::SpreadState;
use crate::{LinkedTable, Order, TableConfig};
use core::hash::BuildHasher;
use proptest::prelude::*;

// Small key domain on purpose: collisions, replacements and removals
// of absent keys all need to happen often.
#[derive(Clone, Debug)]
enum Op {
    Insert(u8, i32),
    Get(u8),
    Peek(u8),
    Remove(u8),
    PopOldest,
    Resize(u8),
    Clear,
}

fn arb_ops() -> impl Strategy<Value = Vec<Op>> {
    let op = prop_oneof![
        4 => (0u8..12, any::<i32>()).prop_map(|(k, v)| Op::Insert(k, v)),
        3 => (0u8..12).prop_map(Op::Get),
        2 => (0u8..12).prop_map(Op::Peek),
        2 => (0u8..12).prop_map(Op::Remove),
        1 => Just(Op::PopOldest),
        1 => (0u8..7).prop_map(Op::Resize),
        1 => Just(Op::Clear),
    ];
    proptest::collection::vec(op, 1..80)
}

// The model is the order list itself: a Vec of pairs, oldest first.
// Map semantics fall out of linear search over it.
fn model_find(model: &[(u8, i32)], k: u8) -> Option<usize> {
    model.iter().position(|(mk, _)| *mk == k)
}

fn run_scenario<S>(order: Order, ops: Vec<Op>, hasher: S) -> Result<(), TestCaseError>
where
    S: BuildHasher,
{
    let mut sut: LinkedTable<u8, i32, S> = LinkedTable::with_config_and_hasher(
        TableConfig {
            order,
            ..TableConfig::default()
        },
        hasher,
    );
    let mut model: Vec<(u8, i32)> = Vec::new();

    for op in ops {
        match op {
            Op::Insert(k, v) => {
                let old = sut.insert(k, v);
                match model_find(&model, k) {
                    Some(i) => {
                        prop_assert_eq!(old, Some(model[i].1), "replace must return old value");
                        model[i].1 = v;
                    }
                    None => {
                        prop_assert_eq!(old, None);
                        model.push((k, v));
                    }
                }
            }
            Op::Get(k) => {
                let got = sut.get(&k).copied();
                match model_find(&model, k) {
                    Some(i) => {
                        prop_assert_eq!(got, Some(model[i].1));
                        if order == Order::Access {
                            let pair = model.remove(i);
                            model.push(pair);
                        }
                    }
                    None => prop_assert_eq!(got, None),
                }
            }
            Op::Peek(k) => {
                let got = sut.peek(&k).copied();
                prop_assert_eq!(got, model_find(&model, k).map(|i| model[i].1));
                prop_assert_eq!(sut.contains_key(&k), got.is_some());
            }
            Op::Remove(k) => {
                let removed = sut.remove(&k);
                match model_find(&model, k) {
                    Some(i) => {
                        let (mk, mv) = model.remove(i);
                        prop_assert_eq!(removed, Some((mk, mv)));
                    }
                    None => prop_assert_eq!(removed, None),
                }
            }
            Op::PopOldest => {
                let popped = sut.pop_oldest();
                if model.is_empty() {
                    prop_assert_eq!(popped, None);
                } else {
                    prop_assert_eq!(popped, Some(model.remove(0)));
                }
            }
            Op::Resize(exp) => {
                sut.resize(1 << exp).expect("small allocation");
            }
            Op::Clear => {
                sut.clear();
                model.clear();
            }
        }

        // Structural invariants plus full model parity after every op.
        sut.assert_invariants();
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        let order_seq: Vec<(u8, i32)> = sut.iter().map(|(k, v)| (*k, *v)).collect();
        prop_assert_eq!(&order_seq, &model, "traversal order diverged from model");
        let rev_seq: Vec<(u8, i32)> = sut.iter().rev().map(|(k, v)| (*k, *v)).collect();
        let mut model_rev = model.clone();
        model_rev.reverse();
        prop_assert_eq!(&rev_seq, &model_rev, "reverse traversal diverged");
        prop_assert_eq!(sut.oldest().map(|(k, v)| (*k, *v)), model.first().copied());
        prop_assert_eq!(sut.newest().map(|(k, v)| (*k, *v)), model.last().copied());
        prop_assert_eq!(
            sut.load_factor(),
            sut.len() as f64 / sut.capacity() as f64
        );
    }
    Ok(())
}

// Property: state-machine equivalence against the ordered model, in
// insertion mode.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_insertion_order_state_machine(ops in arb_ops()) {
        run_scenario(Order::Insertion, ops, SpreadState)?;
    }

    // Property: same equivalence with access-order reordering on hits.
    #[test]
    fn prop_access_order_state_machine(ops in arb_ops()) {
        run_scenario(Order::Access, ops, SpreadState)?;
    }
}

// Property: everything above still holds when every key hashes to the
// same bucket, i.e. pure chain traversal.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;

impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}

impl core::hash::Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_single_chain_state_machine(ops in arb_ops()) {
        run_scenario(Order::Access, ops, ConstBuildHasher)?;
    }
}
