use std::collections::BTreeMap;

use proptest::prelude::*;
use shelfmark::{ColorFlips, DuplicateKey, RbTreeMap};

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 2_000;

/// Keys drawn from a range narrow enough to collide often.
fn key_strategy() -> impl Strategy<Value = i64> {
    -1_000i64..1_000i64
}

fn value_strategy() -> impl Strategy<Value = i64> {
    any::<i64>()
}

fn brute_force_nearest(map: &BTreeMap<i64, i64>, target: i64) -> Vec<i64> {
    let Some(best) = map.keys().map(|k| k.abs_diff(target)).min() else {
        return Vec::new();
    };
    map.keys().copied().filter(|k| k.abs_diff(target) == best).collect()
}

// ─── Operations enum for driving randomized tests ────────────────────────────

#[derive(Debug, Clone)]
enum MapOp {
    Insert(i64, i64),
    Remove(i64),
    Get(i64),
    ContainsKey(i64),
    GetKeyValue(i64),
    FirstKeyValue,
    LastKeyValue,
    Range(i64, i64),
    Nearest(i64),
}

fn map_op_strategy() -> impl Strategy<Value = MapOp> {
    prop_oneof![
        5 => (key_strategy(), value_strategy()).prop_map(|(k, v)| MapOp::Insert(k, v)),
        3 => key_strategy().prop_map(MapOp::Remove),
        2 => key_strategy().prop_map(MapOp::Get),
        1 => key_strategy().prop_map(MapOp::ContainsKey),
        1 => key_strategy().prop_map(MapOp::GetKeyValue),
        1 => Just(MapOp::FirstKeyValue),
        1 => Just(MapOp::LastKeyValue),
        1 => (key_strategy(), key_strategy()).prop_map(|(lo, hi)| MapOp::Range(lo, hi)),
        1 => key_strategy().prop_map(MapOp::Nearest),
    ]
}

// ─── Core operations ─────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Replays a random sequence of operations on both RbTreeMap and BTreeMap
    /// and asserts identical results at every step.
    #[test]
    fn map_ops_match_btreemap(ops in proptest::collection::vec(map_op_strategy(), TEST_SIZE)) {
        let mut rb_map: RbTreeMap<i64, i64> = RbTreeMap::new();
        let mut bt_map: BTreeMap<i64, i64> = BTreeMap::new();

        for op in &ops {
            match op {
                MapOp::Insert(k, v) => {
                    let rb_result = rb_map.insert(*k, *v);
                    if bt_map.contains_key(k) {
                        prop_assert_eq!(rb_result, Err(DuplicateKey { key: *k, value: *v }), "insert({}, {})", k, v);
                    } else {
                        bt_map.insert(*k, *v);
                        prop_assert!(rb_result.is_ok(), "insert({}, {})", k, v);
                    }
                }
                MapOp::Remove(k) => {
                    let rb_result = rb_map.remove(k).map(|(v, _)| v);
                    let bt_result = bt_map.remove(k);
                    prop_assert_eq!(rb_result, bt_result, "remove({})", k);
                }
                MapOp::Get(k) => {
                    prop_assert_eq!(rb_map.get(k), bt_map.get(k), "get({})", k);
                }
                MapOp::ContainsKey(k) => {
                    prop_assert_eq!(rb_map.contains_key(k), bt_map.contains_key(k), "contains_key({})", k);
                }
                MapOp::GetKeyValue(k) => {
                    prop_assert_eq!(rb_map.get_key_value(k), bt_map.get_key_value(k), "get_key_value({})", k);
                }
                MapOp::FirstKeyValue => {
                    prop_assert_eq!(rb_map.first_key_value(), bt_map.first_key_value(), "first_key_value");
                }
                MapOp::LastKeyValue => {
                    prop_assert_eq!(rb_map.last_key_value(), bt_map.last_key_value(), "last_key_value");
                }
                MapOp::Range(lo, hi) => {
                    let rb_result = rb_map.range(lo, hi);
                    let bt_result: Vec<_> = if lo <= hi { bt_map.range(lo..=hi).collect() } else { Vec::new() };
                    prop_assert_eq!(rb_result, bt_result, "range({}, {})", lo, hi);
                }
                MapOp::Nearest(target) => {
                    let mut rb_result: Vec<i64> = rb_map.nearest(target).into_iter().map(|(k, _)| *k).collect();
                    rb_result.sort_unstable();
                    prop_assert_eq!(rb_result, brute_force_nearest(&bt_map, *target), "nearest({})", target);
                }
            }
            prop_assert_eq!(rb_map.len(), bt_map.len(), "len mismatch after {:?}", op);
            prop_assert_eq!(rb_map.is_empty(), bt_map.is_empty(), "is_empty mismatch after {:?}", op);
        }
    }

    /// Tests that iteration order matches BTreeMap after random insertions.
    #[test]
    fn iter_matches_btreemap(entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE)) {
        let mut rb_map: RbTreeMap<i64, i64> = RbTreeMap::new();
        let mut bt_map: BTreeMap<i64, i64> = BTreeMap::new();

        for (k, v) in &entries {
            if rb_map.insert(*k, *v).is_ok() {
                bt_map.insert(*k, *v);
            }
        }

        let rb_items: Vec<_> = rb_map.iter().map(|(&k, &v)| (k, v)).collect();
        let bt_items: Vec<_> = bt_map.iter().map(|(&k, &v)| (k, v)).collect();
        prop_assert_eq!(&rb_items, &bt_items, "iter() mismatch");

        let rb_keys: Vec<_> = rb_map.keys().copied().collect();
        let bt_keys: Vec<_> = bt_map.keys().copied().collect();
        prop_assert_eq!(&rb_keys, &bt_keys, "keys() mismatch");

        let rb_values: Vec<_> = rb_map.values().copied().collect();
        let bt_values: Vec<_> = bt_map.values().copied().collect();
        prop_assert_eq!(&rb_values, &bt_values, "values() mismatch");

        prop_assert_eq!(rb_map.iter().len(), bt_map.len());
    }

    /// Tests that get_mut modifications are visible through get.
    #[test]
    fn get_mut_matches_btreemap(
        entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE),
        updates in proptest::collection::vec((key_strategy(), value_strategy()), 200),
    ) {
        let mut rb_map: RbTreeMap<i64, i64> = entries.iter().copied().collect();
        let mut bt_map: BTreeMap<i64, i64> = BTreeMap::new();
        for (k, v) in &entries {
            bt_map.entry(*k).or_insert(*v);
        }

        for (k, v) in &updates {
            if let Some(slot) = rb_map.get_mut(k) {
                *slot = *v;
            }
            if let Some(slot) = bt_map.get_mut(k) {
                *slot = *v;
            }
        }

        let rb_items: Vec<_> = rb_map.iter().map(|(&k, &v)| (k, v)).collect();
        let bt_items: Vec<_> = bt_map.into_iter().collect();
        prop_assert_eq!(rb_items, bt_items);
    }

    /// Tests that remove_entry hands back the stored key.
    #[test]
    fn remove_entry_matches_btreemap(
        entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE),
        removals in proptest::collection::vec(key_strategy(), 500),
    ) {
        let mut rb_map: RbTreeMap<i64, i64> = entries.iter().copied().collect();
        let mut bt_map: BTreeMap<i64, i64> = BTreeMap::new();
        for (k, v) in &entries {
            bt_map.entry(*k).or_insert(*v);
        }

        for k in &removals {
            let rb_result = rb_map.remove_entry(k).map(|(k, v, _)| (k, v));
            let bt_result = bt_map.remove_entry(k);
            prop_assert_eq!(rb_result, bt_result, "remove_entry({})", k);
        }
        prop_assert_eq!(rb_map.len(), bt_map.len());
    }

    /// Tests that clear empties the map and that it is reusable afterwards.
    #[test]
    fn clear_empties_map(entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE)) {
        let mut rb_map: RbTreeMap<i64, i64> = entries.into_iter().collect();
        rb_map.clear();
        prop_assert!(rb_map.is_empty());
        prop_assert_eq!(rb_map.iter().next(), None);
        prop_assert_eq!(rb_map.insert(1, 1), Ok(ColorFlips(1)));
    }
}

// ─── Color-flip accounting ───────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Every successful insert into an empty map paints exactly the new root.
    #[test]
    fn first_insert_flips_once(key in key_strategy(), value in value_strategy()) {
        let mut rb_map = RbTreeMap::new();
        prop_assert_eq!(rb_map.insert(key, value), Ok(ColorFlips(1)));
    }

    /// Rejected inserts and failed removals report nothing and change nothing.
    #[test]
    fn rejected_mutations_do_not_flip(entries in proptest::collection::vec((key_strategy(), value_strategy()), 1..200)) {
        let mut rb_map: RbTreeMap<i64, i64> = entries.iter().copied().collect();
        let before: Vec<_> = rb_map.iter().map(|(&k, &v)| (k, v)).collect();

        let (k, v) = entries[0];
        prop_assert!(rb_map.insert(k, v.wrapping_add(1)).is_err());
        prop_assert!(rb_map.remove(&1_000).is_none());

        let after: Vec<_> = rb_map.iter().map(|(&k, &v)| (k, v)).collect();
        prop_assert_eq!(before, after);
    }
}

// ─── Fixed scenarios ─────────────────────────────────────────────────────────

#[test]
fn ascending_inserts_report_fixup_toggles() {
    let mut map = RbTreeMap::new();
    let flips: Vec<u64> = (1..=4).map(|k| map.insert(k, ()).map(ColorFlips::get).unwrap()).collect();
    assert_eq!(flips, [1, 0, 2, 4]);
}

#[test]
fn range_is_inclusive_and_ordered() {
    let map: RbTreeMap<u64, &str> = [(120, "b"), (80, "a"), (200, "c")].into_iter().collect();
    assert_eq!(map.range(&50, &150), [(&80, &"a"), (&120, &"b")]);
    assert_eq!(map.range(&80, &80), [(&80, &"a")]);
    assert!(map.range(&150, &50).is_empty());
}

#[test]
fn nearest_reports_both_sides_of_a_tie() {
    let map: RbTreeMap<u64, ()> = [(10, ()), (20, ()), (30, ())].into_iter().collect();
    let mut keys: Vec<u64> = map.nearest(&25).into_iter().map(|(k, _)| *k).collect();
    keys.sort_unstable();
    assert_eq!(keys, [20, 30]);

    let empty: RbTreeMap<u64, ()> = RbTreeMap::new();
    assert!(empty.nearest(&25).is_empty());
}

#[test]
#[should_panic(expected = "no entry found for key")]
fn index_missing_key_panics() {
    let map: RbTreeMap<i64, i64> = [(1, 1)].into_iter().collect();
    let _ = map[&2];
}
