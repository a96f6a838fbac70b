// ChainedHashMap property tests.
//
// Property 1: model agreement under random insert/erase/index/clear sequences.
//  - Model: std HashMap<u8, u32>.
//  - Invariant after every step: len() == model.len(); capacity is a power of two;
//    load_factor() == len / capacity; every model key is found with its value.
//  - insert never overwrites, index_or_insert does.
//
// Property 2: iteration visits exactly len() unique entries matching the model.
//
// Property 3: a table rebuilt from iteration answers every lookup the same way.
use std::collections::HashMap;

use chainmap::{ChainedHashMap, LOWER_LOAD_FACTOR, UPPER_LOAD_FACTOR};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Insert(u8, u32),
    Erase(u8),
    Index(u8, u32),
    Clear,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => (any::<u8>(), any::<u32>()).prop_map(|(k, v)| Op::Insert(k, v)),
        4 => any::<u8>().prop_map(Op::Erase),
        2 => (any::<u8>(), any::<u32>()).prop_map(|(k, v)| Op::Index(k, v)),
        1 => Just(Op::Clear),
    ]
}

fn check_against_model(
    table: &ChainedHashMap<u8, u32>,
    model: &HashMap<u8, u32>,
) -> Result<(), TestCaseError> {
    prop_assert_eq!(table.len(), model.len());
    prop_assert!(table.capacity().is_power_of_two());
    let expected = table.len() as f64 / table.capacity() as f64;
    prop_assert!((table.load_factor() - expected).abs() < 1e-12);
    prop_assert!(table.load_factor() < UPPER_LOAD_FACTOR);
    for (key, value) in model {
        prop_assert_eq!(table.get(key), Some(value));
        prop_assert!(table.bucket_index(key).unwrap() < table.capacity());
    }
    Ok(())
}

proptest! {
    #[test]
    fn prop_matches_std_model(ops in proptest::collection::vec(op_strategy(), 1..300)) {
        let mut table = ChainedHashMap::new();
        let mut model = HashMap::new();

        for op in ops {
            match op {
                Op::Insert(k, v) => {
                    let fresh = !model.contains_key(&k);
                    prop_assert_eq!(table.insert(k, v), fresh);
                    if fresh {
                        model.insert(k, v);
                    }
                }
                Op::Erase(k) => {
                    let before = table.capacity();
                    let removed = table.erase(&k);
                    prop_assert_eq!(removed, model.remove(&k).is_some());
                    if removed && before > 1 && (table.len() as f64 / before as f64) <= LOWER_LOAD_FACTOR {
                        prop_assert_eq!(table.capacity(), before / 2);
                    } else {
                        prop_assert_eq!(table.capacity(), before);
                    }
                }
                Op::Index(k, v) => {
                    *table.index_or_insert(k) = v;
                    model.insert(k, v);
                }
                Op::Clear => {
                    let before = table.capacity();
                    table.clear();
                    model.clear();
                    prop_assert_eq!(table.capacity(), before);
                }
            }
            check_against_model(&table, &model)?;
        }
    }

    #[test]
    fn prop_insert_doubles_exactly_at_upper_bound(keys in proptest::collection::hash_set(any::<u32>(), 1..400)) {
        let mut table = ChainedHashMap::new();
        for key in keys {
            let before = table.capacity();
            prop_assert!(table.insert(key, key));
            if table.len() as f64 / before as f64 >= UPPER_LOAD_FACTOR {
                prop_assert_eq!(table.capacity(), before * 2);
            } else {
                prop_assert_eq!(table.capacity(), before);
            }
        }
    }

    #[test]
    fn prop_iteration_visits_every_entry_once(entries in proptest::collection::hash_map(any::<u16>(), any::<u16>(), 0..200)) {
        let table: ChainedHashMap<u16, u16> = entries.clone().into_iter().collect();
        let visited: Vec<(u16, u16)> = table.iter().map(|(k, v)| (*k, *v)).collect();
        prop_assert_eq!(visited.len(), table.len());

        let collected: HashMap<u16, u16> = visited.into_iter().collect();
        prop_assert_eq!(collected, entries);

        let mut cursor = table.begin();
        for _ in 0..table.len() {
            cursor.advance();
        }
        prop_assert_eq!(cursor, table.end());
    }

    #[test]
    fn prop_rebuilt_table_answers_lookups(
        keys in proptest::collection::vec(any::<u16>(), 0..200),
        erased in proptest::collection::vec(any::<u16>(), 0..200),
    ) {
        let mut table = ChainedHashMap::new();
        for key in &keys {
            table.insert(*key, u32::from(*key) * 7);
        }
        for key in &erased {
            table.erase(key);
        }

        let mut rebuilt = ChainedHashMap::new();
        for (key, value) in &table {
            prop_assert!(rebuilt.insert(*key, *value));
        }
        prop_assert_eq!(rebuilt.len(), table.len());
        for key in keys.iter().chain(erased.iter()) {
            prop_assert_eq!(rebuilt.contains_key(key), table.contains_key(key));
            prop_assert_eq!(rebuilt.get(key), table.get(key));
        }

        let cloned = table.clone();
        prop_assert_eq!(cloned.len(), table.len());
        for (key, value) in &table {
            prop_assert_eq!(cloned.get(key), Some(value));
        }
    }
}
