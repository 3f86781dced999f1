use std::collections::HashMap;

use proptest::prelude::*;

use crate::AdaptiveMap;
use crate::KeyStrategy;
use crate::MapConfig;
use crate::U16Map;
use crate::U32Map;

#[derive(Debug, Clone)]
enum Action {
    Put(u16, Option<u8>),
    Remove(u16),
    Get(u16),
    PutNull(Option<u8>),
    RemoveNull,
    Trim(usize),
}

fn action_strategy(key_range: u16) -> impl Strategy<Value = Action> {
    prop_oneof![
        4 => (0..key_range, any::<Option<u8>>()).prop_map(|(key, value)| Action::Put(key, value)),
        2 => (0..key_range).prop_map(Action::Remove),
        2 => (0..key_range).prop_map(Action::Get),
        1 => any::<Option<u8>>().prop_map(Action::PutNull),
        1 => Just(Action::RemoveNull),
        1 => (0..3000usize).prop_map(Action::Trim),
    ]
}

/// Replays `actions` against both the map and a `HashMap` model, checking every observable result.
fn check_against_model<S>(mut map: AdaptiveMap<u16, u8, S>, actions: Vec<Action>)
where
    S: KeyStrategy<u16>,
{
    let mut model: HashMap<u16, Option<u8>> = HashMap::new();
    let mut null_key: Option<Option<u8>> = None;

    for action in actions {
        match action {
            Action::Put(key, value) => {
                assert_eq!(map.insert(key, value), model.insert(key, value));
            }
            Action::Remove(key) => {
                assert_eq!(map.remove(&key), model.remove(&key));
            }
            Action::Get(key) => {
                assert_eq!(map.get_nullable(&key), model.get(&key).map(Option::as_ref));
                assert_eq!(map.contains_key(&key), model.contains_key(&key));
            }
            Action::PutNull(value) => {
                assert_eq!(map.put_null_key(value), null_key.is_none());
                null_key = Some(value);
            }
            Action::RemoveNull => {
                assert_eq!(map.remove_null_key(), null_key.take());
            }
            Action::Trim(capacity) => {
                let len = model.len() + usize::from(null_key.is_some());
                assert_eq!(map.trim(capacity).is_ok(), capacity >= len);
            }
        }
        assert_eq!(map.len(), model.len() + usize::from(null_key.is_some()));
        if let Some((lo, hi)) = map.regions() {
            assert!(lo + hi <= map.capacity());
        }
    }

    map.validate().unwrap();
    let mut walked = 0;
    for (key, value) in &map {
        walked += 1;
        match key {
            Some(key) => assert_eq!(Some(&value.copied()), model.get(key)),
            None => assert_eq!(Some(value.copied()), null_key),
        }
    }
    assert_eq!(walked, map.len());
}

proptest! {
    #[test]
    fn adaptive_u16_map_matches_model(actions in proptest::collection::vec(action_strategy(2000), 1..600)) {
        let map = U16Map::with_config(MapConfig::default().with_flat_threshold(300));
        check_against_model(map, actions);
    }

    #[test]
    fn sparse_only_map_matches_model(actions in proptest::collection::vec(action_strategy(200), 1..400)) {
        let map: AdaptiveMap<u16, u8, crate::PrimitiveStrategy> = AdaptiveMap::new();
        check_against_model(map, actions);
    }

    #[test]
    fn u32_map_survives_wide_keys(keys in proptest::collection::vec(any::<u32>(), 0..300)) {
        let mut map: U32Map<usize> = U32Map::new();
        let mut model = HashMap::new();
        for (index, key) in keys.iter().enumerate() {
            prop_assert_eq!(map.insert(*key, Some(index)), model.insert(*key, Some(index)));
        }
        for key in keys.iter().step_by(2) {
            prop_assert_eq!(map.remove(key), model.remove(key));
        }
        prop_assert_eq!(map.len(), model.len());
        map.validate().unwrap();
    }
}
