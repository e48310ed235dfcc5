// LinkedHashMap integration test suite (consolidated).
//
// Each test documents what behavior is being verified and which
// invariants are assumed or asserted. The core invariants exercised:
// - Order: forward iteration is insertion order; reverse iteration is its
//   exact mirror at every point in time.
// - Duality: the hash index and the linked list always agree (lookups,
//   walks, and len never diverge).
// - Handles: a NodeRef survives independently of its entry and reports
//   absence from every accessor once stale, after removal and, in bulk,
//   after clear().
// - Cursors: any structural mutation or overwrite invalidates outstanding
//   cursors with an error, never a torn walk.
// - Usage errors: foreign/stale handles passed to mutation primitives
//   panic before anything is mutated.
use linked_hashmap::{CapacityError, InsertError, Invalidated, LinkedHashMap};

fn keys(map: &LinkedHashMap<String, i32>) -> Vec<String> {
    map.keys().cloned().collect()
}

// Test: the end-to-end scenario: ordered inserts, removal, relink, clear.
// Assumes: insertion links at the back; clear invalidates in bulk.
// Verifies: order after each step and handle staleness at the end.
#[test]
fn scenario_insert_remove_move_clear() {
    let mut map = LinkedHashMap::new();
    let a = map.try_insert("A".to_string(), 1).unwrap();
    map.try_insert("B".to_string(), 2).unwrap();
    map.try_insert("C".to_string(), 3).unwrap();
    assert_eq!(keys(&map), ["A", "B", "C"]);

    assert_eq!(map.remove("B"), Some(2));
    assert_eq!(keys(&map), ["A", "C"]);
    assert_eq!(map.len(), 2);

    let c = map.find("C").unwrap();
    assert!(map.move_to_front(c));
    assert_eq!(keys(&map), ["C", "A"]);

    map.clear();
    assert_eq!(map.len(), 0);
    assert!(a.key(&map).is_none());
    assert!(map.node_value(a).is_none());
    assert!(!map.contains_node(a));
}

// Test: order invariant over every prefix of an insert sequence.
// Assumes: no removals; insertion order is the only order source.
// Verifies: forward == inserted-so-far and reverse is its mirror, at each
// prefix.
#[test]
fn order_holds_for_every_prefix() {
    let inserted: Vec<String> = (0..16).map(|i| format!("k{i:02}")).collect();
    let mut map = LinkedHashMap::new();
    for (i, k) in inserted.iter().enumerate() {
        map.try_insert(k.clone(), i as i32).unwrap();

        let forward = keys(&map);
        assert_eq!(forward, inserted[..=i]);

        let mut backward: Vec<String> = map.iter().rev().map(|(k, _)| k.clone()).collect();
        backward.reverse();
        assert_eq!(backward, forward);
    }
}

// Test: duplicate add is idempotent.
// Assumes: try_insert is the strict form; Err leaves the map untouched.
// Verifies: count, order, and values are unchanged after the rejection.
#[test]
fn duplicate_add_is_idempotent() {
    let mut map = LinkedHashMap::new();
    map.try_insert("a".to_string(), 1).unwrap();
    map.try_insert("b".to_string(), 2).unwrap();

    let before: Vec<(String, i32)> = map.iter().map(|(k, v)| (k.clone(), *v)).collect();
    assert_eq!(
        map.try_insert("a".to_string(), 99),
        Err(InsertError::DuplicateKey)
    );
    let after: Vec<(String, i32)> = map.iter().map(|(k, v)| (k.clone(), *v)).collect();
    assert_eq!(before, after);
}

// Test: move_before relocates exactly one entry.
// Assumes: both handles belong to the map.
// Verifies: the moved entry sits immediately before the destination and the
// result is a permutation of the previous contents.
#[test]
fn move_preserves_total_order() {
    let mut map = LinkedHashMap::new();
    for (i, k) in ["a", "b", "c", "d", "e"].iter().enumerate() {
        map.try_insert((*k).to_string(), i as i32).unwrap();
    }
    let x = map.find("e").unwrap();
    let y = map.find("b").unwrap();

    let mut before = keys(&map);
    assert!(map.move_before(x, y));
    let after = keys(&map);

    assert_eq!(after, ["a", "e", "b", "c", "d"]);
    before.sort();
    let mut sorted_after = after.clone();
    sorted_after.sort();
    assert_eq!(before, sorted_after, "move must be a permutation");

    let pos_e = after.iter().position(|k| k == "e").unwrap();
    assert_eq!(after[pos_e + 1], "b");
}

// Test: bulk handle invalidation is not per-node cleanup.
// Assumes: clear() cuts all handles loose through one era change.
// Verifies: a handle whose entry was never touched by any other operation
// still reports absence everywhere after clear().
#[test]
fn clear_invalidates_untouched_handle() {
    let mut map = LinkedHashMap::new();
    let untouched = map.try_insert("quiet".to_string(), 0).unwrap();
    for i in 0..32 {
        map.try_insert(format!("k{i}"), i).unwrap();
    }

    map.clear();
    assert!(untouched.key(&map).is_none());
    assert!(untouched.value(&map).is_none());
    assert!(!map.contains_node(untouched));
    assert!(map.next_node(untouched).is_none());
    assert!(map.prev_node(untouched).is_none());
}

// Test: fail-fast cursors across every mutation kind.
// Assumes: cursors capture state at creation and revalidate per access.
// Verifies: each mutation makes both move_next and current fail; no-ops do
// not.
#[test]
fn cursor_fails_fast_for_each_mutation_kind() {
    let mutations: Vec<(&str, fn(&mut LinkedHashMap<String, i32>))> = vec![
        ("add", |m| {
            m.try_insert("z".to_string(), 9).unwrap();
        }),
        ("overwrite", |m| {
            m.insert("b".to_string(), 9);
        }),
        ("remove", |m| {
            m.remove("a");
        }),
        ("move", |m| {
            let b = m.find("b").unwrap();
            m.move_to_front(b);
        }),
        ("clear", |m| m.clear()),
    ];

    for (name, mutate) in mutations {
        let mut map = LinkedHashMap::new();
        map.try_insert("a".to_string(), 1).unwrap();
        map.try_insert("b".to_string(), 2).unwrap();

        let mut cur = map.cursor();
        assert!(cur.move_next(&map).unwrap());

        mutate(&mut map);
        assert_eq!(cur.move_next(&map), Err(Invalidated), "after {name}");
        assert_eq!(cur.current(&map), Err(Invalidated), "after {name}");
    }
}

// Test: reverse traversal mirrors forward traversal after churn.
// Assumes: a single order backs both directions (no separate state).
// Verifies: mirror property after a mix of inserts, removes, and moves.
#[test]
fn reverse_mirrors_forward_after_churn() {
    let mut map = LinkedHashMap::new();
    for i in 0..10 {
        map.try_insert(format!("k{i}"), i).unwrap();
    }
    map.remove("k3");
    map.remove("k7");
    let k9 = map.find("k9").unwrap();
    map.move_to_front(k9);
    let k0 = map.find("k0").unwrap();
    let k5 = map.find("k5").unwrap();
    map.move_after(k0, k5);

    let forward = keys(&map);
    let mut backward: Vec<String> = map.iter().rev().map(|(k, _)| k.clone()).collect();
    backward.reverse();
    assert_eq!(forward, backward);
    assert_eq!(forward.len(), map.len());
}

// Test: value-only updates do not disturb cursors.
// Assumes: get_mut and node_value_mut move nothing.
// Verifies: a cursor stays valid across in-place value writes.
#[test]
fn value_only_updates_keep_cursors_valid() {
    let mut map = LinkedHashMap::new();
    map.try_insert("a".to_string(), 1).unwrap();
    let b = map.try_insert("b".to_string(), 2).unwrap();

    let mut cur = map.cursor();
    assert!(cur.move_next(&map).unwrap());

    *map.get_mut("a").unwrap() += 10;
    *map.node_value_mut(b).unwrap() += 10;
    for v in map.values_mut() {
        *v += 100;
    }

    assert_eq!(cur.move_next(&map), Ok(true));
    assert_eq!(cur.current(&map).unwrap().unwrap().1, &112);
}

// Test: handle-first access patterns.
// Assumes: get_full/find mint handles; neighborhood accessors walk links.
// Verifies: handle equality across lookup paths and neighbor agreement.
#[test]
fn handles_agree_across_lookup_paths() {
    let mut map = LinkedHashMap::new();
    let a = map.try_insert("a".to_string(), 1).unwrap();
    let b = map.try_insert("b".to_string(), 2).unwrap();

    let (a2, k, v) = map.get_full("a").unwrap();
    assert_eq!(a, a2);
    assert_eq!(k, "a");
    assert_eq!(v, &1);
    assert_eq!(map.find("b"), Some(b));

    assert_eq!(map.next_node(a), Some(b));
    assert_eq!(map.prev_node(b), Some(a));
    assert_eq!(map.front_node(), Some(a));
    assert_eq!(map.back_node(), Some(b));
    assert_eq!(map.node_entry(b), Some((&"b".to_string(), &2)));
}

// Test: usage errors reject before mutating.
// Assumes: handles from another map never pass the ownership check.
// Verifies: panic on remove_node with a foreign handle.
#[test]
#[should_panic(expected = "node handle does not belong to this map")]
fn foreign_handle_is_a_usage_error() {
    let mut m1 = LinkedHashMap::new();
    let mut m2 = LinkedHashMap::new();
    let h = m1.try_insert("a".to_string(), 1).unwrap();
    m2.try_insert("a".to_string(), 1).unwrap();
    let _ = m2.remove_node(h);
}

// Test: bulk export bounds checking.
// Assumes: clone_into_slice rejects short destinations before writing.
// Verifies: error carries sizes; success fills in iteration order.
#[test]
fn bulk_export_bounds() {
    let mut map = LinkedHashMap::new();
    map.try_insert("a".to_string(), 1).unwrap();
    map.try_insert("b".to_string(), 2).unwrap();
    map.try_insert("c".to_string(), 3).unwrap();

    let mut short: [(String, i32); 2] = [(String::new(), 0), (String::new(), 0)];
    assert_eq!(
        map.clone_into_slice(&mut short),
        Err(CapacityError {
            needed: 3,
            available: 2
        })
    );

    let mut dst: [(String, i32); 3] = [
        (String::new(), 0),
        (String::new(), 0),
        (String::new(), 0),
    ];
    map.clone_into_slice(&mut dst).unwrap();
    let exported: Vec<String> = dst.iter().map(|(k, _)| k.clone()).collect();
    assert_eq!(exported, keys(&map));
}

// Test: end removal and re-linking keep the ends coherent.
// Assumes: pop_front/pop_back splice like remove.
// Verifies: alternating pops drain in the expected interleaving.
#[test]
fn alternating_pops_drain_in_order() {
    let mut map = LinkedHashMap::new();
    for i in 0..5 {
        map.try_insert(format!("k{i}"), i).unwrap();
    }

    let mut drained = Vec::new();
    loop {
        match map.pop_front() {
            Some((k, _)) => drained.push(k),
            None => break,
        }
        if let Some((k, _)) = map.pop_back() {
            drained.push(k);
        }
    }
    assert_eq!(drained, ["k0", "k4", "k1", "k3", "k2"]);
    assert!(map.is_empty());
}
