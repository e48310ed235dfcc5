// LinkedHashMap property tests over the public surface.
//
// Property 1: order equivalence against an ordered model.
//  - Model: Vec<(String, i32)> in iteration order.
//  - Operations: insert (overwrite keeps position), remove, clear.
//  - Invariant at each step: forward iteration equals the model and
//    reverse iteration is its exact mirror; len/front/back agree.
//
// Property 2: the same invariants under worst-case hash collisions
//  (constant hasher), stressing equality probing while order churns.
use linked_hashmap::LinkedHashMap;
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::hash::{BuildHasher, Hasher};

#[derive(Clone, Debug)]
enum Op {
    Insert(usize, i32),
    Remove(usize),
    Clear,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<Op>)> {
    proptest::collection::vec("[a-z]{0,4}", 1..=6).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let op = prop_oneof![
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Insert(i, v)),
            2 => idx.clone().prop_map(Op::Remove),
            1 => Just(Op::Clear),
        ];
        proptest::collection::vec(op, 1..60).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn check_order<S: BuildHasher>(
    sut: &LinkedHashMap<String, i32, S>,
    model: &[(String, i32)],
) -> Result<(), TestCaseError> {
    prop_assert_eq!(sut.len(), model.len());

    let forward: Vec<(String, i32)> = sut.iter().map(|(k, v)| (k.clone(), *v)).collect();
    prop_assert_eq!(&forward[..], model);

    let mut backward: Vec<(String, i32)> = sut.iter().rev().map(|(k, v)| (k.clone(), *v)).collect();
    backward.reverse();
    prop_assert_eq!(&backward[..], model);

    prop_assert_eq!(
        sut.front().map(|(k, _)| k.clone()),
        model.first().map(|(k, _)| k.clone())
    );
    prop_assert_eq!(
        sut.back().map(|(k, _)| k.clone()),
        model.last().map(|(k, _)| k.clone())
    );
    Ok(())
}

fn run_ops<S: BuildHasher>(
    mut sut: LinkedHashMap<String, i32, S>,
    pool: &[String],
    ops: Vec<Op>,
) -> Result<(), TestCaseError> {
    let mut model: Vec<(String, i32)> = Vec::new();

    for op in ops {
        match op {
            Op::Insert(i, v) => {
                let k = pool[i].clone();
                let old = sut.insert(k.clone(), v);
                match model.iter_mut().find(|(mk, _)| *mk == k) {
                    Some(entry) => {
                        prop_assert_eq!(old, Some(entry.1));
                        entry.1 = v;
                    }
                    None => {
                        prop_assert_eq!(old, None);
                        model.push((k, v));
                    }
                }
            }
            Op::Remove(i) => {
                let k = pool[i].clone();
                let removed = sut.remove(k.as_str());
                match model.iter().position(|(mk, _)| *mk == k) {
                    Some(p) => {
                        let (_, v) = model.remove(p);
                        prop_assert_eq!(removed, Some(v));
                    }
                    None => prop_assert_eq!(removed, None),
                }
            }
            Op::Clear => {
                sut.clear();
                model.clear();
            }
        }
        check_order(&sut, &model)?;
    }
    Ok(())
}

#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

proptest! {
    #[test]
    fn prop_order_matches_model((pool, ops) in arb_scenario()) {
        run_ops(LinkedHashMap::new(), &pool, ops)?;
    }

    #[test]
    fn prop_order_matches_model_with_collisions((pool, ops) in arb_scenario()) {
        run_ops(LinkedHashMap::with_hasher(ConstBuildHasher), &pool, ops)?;
    }
}
