#![cfg(test)]

// Property tests for LinkedHashMap kept inside the crate so they can check
// link symmetry and handle liveness alongside an ordered model.
//
// Model: a Vec<(String, i32)> in iteration order. Pool-indexed operations
// improve shrinking: indices shrink to earlier keys, pool length shrinks,
// and op lists shrink in length.

use crate::linked_hash_map::{InsertError, LinkedHashMap, NodeRef};
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::collections::HashMap;
use std::hash::{BuildHasher, Hasher};

#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i32),
    TryInsert(usize, i32),
    Remove(usize),
    Get(usize),
    MoveToFront(usize),
    MoveToBack(usize),
    MoveBefore(usize, usize),
    MoveAfter(usize, usize),
    PopFront,
    PopBack,
    Clear,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=8).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let op = prop_oneof![
            (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::TryInsert(i, v)),
            idx.clone().prop_map(OpI::Remove),
            idx.clone().prop_map(OpI::Get),
            idx.clone().prop_map(OpI::MoveToFront),
            idx.clone().prop_map(OpI::MoveToBack),
            (idx.clone(), idx.clone()).prop_map(|(i, j)| OpI::MoveBefore(i, j)),
            (idx.clone(), idx.clone()).prop_map(|(i, j)| OpI::MoveAfter(i, j)),
            Just(OpI::PopFront),
            Just(OpI::PopBack),
            Just(OpI::Clear),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn model_pos(model: &[(String, i32)], k: &str) -> Option<usize> {
    model.iter().position(|(mk, _)| mk == k)
}

// Invariants exercised across random operation sequences:
// - Overwrite keeps position and handle; new keys append at the back.
// - Duplicate try_insert fails without side effects.
// - Removal (by key and at both ends) splices correctly and stales handles.
// - Moves produce exactly the modeled permutation; no-ops report false.
// - After every op: len parity, forward order parity, reverse mirror,
//   front/back parity, node-walk parity in both directions, live handles
//   resolve, stale handles never resolve.
fn run_state_machine<S: BuildHasher>(
    mut sut: LinkedHashMap<String, i32, S>,
    pool: &[String],
    ops: Vec<OpI>,
) -> Result<(), TestCaseError> {
    let mut model: Vec<(String, i32)> = Vec::new();
    let mut live: HashMap<String, NodeRef> = HashMap::new();
    let mut stale: Vec<NodeRef> = Vec::new();

    for op in ops {
        match op {
            OpI::Insert(i, v) => {
                let k = pool[i].clone();
                let (node, old) = sut.insert_full(k.clone(), v);
                match model_pos(&model, &k) {
                    Some(p) => {
                        prop_assert_eq!(old, Some(model[p].1));
                        prop_assert_eq!(Some(&node), live.get(&k), "overwrite keeps the handle");
                        model[p].1 = v;
                    }
                    None => {
                        prop_assert_eq!(old, None);
                        live.insert(k.clone(), node);
                        model.push((k, v));
                    }
                }
            }
            OpI::TryInsert(i, v) => {
                let k = pool[i].clone();
                let already = model_pos(&model, &k).is_some();
                match sut.try_insert(k.clone(), v) {
                    Ok(node) => {
                        prop_assert!(!already, "try_insert must fail on duplicate");
                        live.insert(k.clone(), node);
                        model.push((k, v));
                    }
                    Err(InsertError::DuplicateKey) => {
                        prop_assert!(already, "duplicate error only when key exists");
                    }
                }
            }
            OpI::Remove(i) => {
                let k = pool[i].clone();
                match sut.remove_entry(k.as_str()) {
                    Some((kk, vv)) => {
                        prop_assert_eq!(&kk, &k);
                        let p = match model_pos(&model, &k) {
                            Some(p) => p,
                            None => return Err(TestCaseError::fail("removed key not in model")),
                        };
                        let (_, mv) = model.remove(p);
                        prop_assert_eq!(vv, mv);
                        if let Some(h) = live.remove(&k) {
                            stale.push(h);
                        }
                    }
                    None => prop_assert!(model_pos(&model, &k).is_none()),
                }
            }
            OpI::Get(i) => {
                let k = pool[i].clone();
                let got = sut.get(k.as_str()).copied();
                let expected = model_pos(&model, &k).map(|p| model[p].1);
                prop_assert_eq!(got, expected);
            }
            OpI::MoveToFront(i) => {
                let k = pool[i].clone();
                if let Some(p) = model_pos(&model, &k) {
                    let node = *live.get(&k).expect("live handle for modeled key");
                    let moved = sut.move_to_front(node);
                    prop_assert_eq!(moved, p != 0);
                    if moved {
                        let pair = model.remove(p);
                        model.insert(0, pair);
                    }
                }
            }
            OpI::MoveToBack(i) => {
                let k = pool[i].clone();
                if let Some(p) = model_pos(&model, &k) {
                    let node = *live.get(&k).expect("live handle for modeled key");
                    let moved = sut.move_to_back(node);
                    prop_assert_eq!(moved, p + 1 != model.len());
                    if moved {
                        let pair = model.remove(p);
                        model.push(pair);
                    }
                }
            }
            OpI::MoveBefore(i, j) => {
                let ka = pool[i].clone();
                let kb = pool[j].clone();
                if let (Some(pa), Some(pb)) = (model_pos(&model, &ka), model_pos(&model, &kb)) {
                    let a = *live.get(&ka).expect("live handle for modeled key");
                    let b = *live.get(&kb).expect("live handle for modeled key");
                    let moved = sut.move_before(a, b);
                    prop_assert_eq!(moved, !(pa == pb || pa + 1 == pb));
                    if moved {
                        let pair = model.remove(pa);
                        let dest = if pa < pb { pb - 1 } else { pb };
                        model.insert(dest, pair);
                    }
                }
            }
            OpI::MoveAfter(i, j) => {
                let ka = pool[i].clone();
                let kb = pool[j].clone();
                if let (Some(pa), Some(pb)) = (model_pos(&model, &ka), model_pos(&model, &kb)) {
                    let a = *live.get(&ka).expect("live handle for modeled key");
                    let b = *live.get(&kb).expect("live handle for modeled key");
                    let moved = sut.move_after(a, b);
                    prop_assert_eq!(moved, !(pa == pb || pa == pb + 1));
                    if moved {
                        let pair = model.remove(pa);
                        let dest = if pa < pb { pb - 1 } else { pb };
                        model.insert(dest + 1, pair);
                    }
                }
            }
            OpI::PopFront => {
                let got = sut.pop_front();
                if model.is_empty() {
                    prop_assert_eq!(got, None);
                } else {
                    let (k, v) = model.remove(0);
                    prop_assert_eq!(got, Some((k.clone(), v)));
                    if let Some(h) = live.remove(&k) {
                        stale.push(h);
                    }
                }
            }
            OpI::PopBack => {
                let got = sut.pop_back();
                match model.pop() {
                    Some((k, v)) => {
                        prop_assert_eq!(got, Some((k.clone(), v)));
                        if let Some(h) = live.remove(&k) {
                            stale.push(h);
                        }
                    }
                    None => prop_assert_eq!(got, None),
                }
            }
            OpI::Clear => {
                stale.extend(live.drain().map(|(_, h)| h));
                sut.clear();
                model.clear();
            }
        }

        // Post-conditions after each op
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());

        let forward: Vec<(String, i32)> = sut.iter().map(|(k, v)| (k.clone(), *v)).collect();
        prop_assert_eq!(&forward, &model);

        let mut backward: Vec<(String, i32)> =
            sut.iter().rev().map(|(k, v)| (k.clone(), *v)).collect();
        backward.reverse();
        prop_assert_eq!(&backward, &model);

        prop_assert_eq!(
            sut.front().map(|(k, _)| k.clone()),
            model.first().map(|(k, _)| k.clone())
        );
        prop_assert_eq!(
            sut.back().map(|(k, _)| k.clone()),
            model.last().map(|(k, _)| k.clone())
        );

        let model_keys: Vec<String> = model.iter().map(|(k, _)| k.clone()).collect();

        let mut walk = Vec::new();
        let mut at = sut.front_node();
        while let Some(node) = at {
            walk.push(sut.node_key(node).expect("walk node resolves").clone());
            at = sut.next_node(node);
        }
        prop_assert_eq!(&walk, &model_keys);

        let mut rwalk = Vec::new();
        let mut at = sut.back_node();
        while let Some(node) = at {
            rwalk.push(sut.node_key(node).expect("walk node resolves").clone());
            at = sut.prev_node(node);
        }
        rwalk.reverse();
        prop_assert_eq!(&rwalk, &model_keys);

        for (k, h) in &live {
            prop_assert_eq!(sut.node_key(*h), Some(k));
        }
        for h in &stale {
            prop_assert!(!sut.contains_node(*h));
            prop_assert!(sut.node_value(*h).is_none());
        }
    }
    Ok(())
}

// Collision variant uses a constant hasher to stress equality resolution
// and probing while the list order is churned.
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
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run_state_machine(LinkedHashMap::new(), &pool, ops)?;
    }

    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        run_state_machine(LinkedHashMap::with_hasher(ConstBuildHasher), &pool, ops)?;
    }
}
