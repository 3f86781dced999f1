use std::collections::HashSet;

use crate::Error;
use crate::MapConfig;
use crate::Mode;
use crate::ObjectMap;
use crate::U8Map;
use crate::U16Set;

fn sample(config: MapConfig) -> U8Map<u32> {
    let mut map = U8Map::with_config(config);
    for key in (0..=255u8).step_by(3) {
        map.put(key, u32::from(key) * 10);
    }
    map.put_absent(1);
    map.put_null_key(Some(7));
    map
}

#[test]
fn token_walk_visits_everything_once_with_null_key_last() {
    for config in [
        MapConfig::default().never_flat(),
        MapConfig::default().always_flat(),
    ] {
        let map = sample(config);
        let mut seen = HashSet::new();
        let mut last_was_null = false;
        let mut token = map.first_token();
        while let Some(current) = token {
            assert!(!last_was_null, "null key must be last");
            match map.key(current).unwrap() {
                Some(key) => {
                    assert!(seen.insert(*key));
                    assert_eq!(map.value(current).unwrap(), map.get(key));
                }
                None => {
                    last_was_null = true;
                    assert!(map.is_key_null(current).unwrap());
                    assert_eq!(map.value(current).unwrap(), Some(&7));
                }
            }
            token = map.next_token(current).unwrap();
        }
        assert!(last_was_null);
        assert_eq!(seen.len() + 1, map.len());
    }
}

#[test]
fn any_mutation_makes_tokens_stale() {
    let mut map: ObjectMap<&str, i32> = ObjectMap::new();
    map.put("a", 1);
    let token = map.token_of(&"a").unwrap();
    assert!(map.has_value(token).unwrap());

    // replacing a value is a mutation too
    map.put("a", 2);
    assert_eq!(
        map.key(token),
        Err(Error::StaleToken {
            token_version: token.version(),
            map_version: map.version(),
        })
    );
    assert!(map.next_token(token).is_err());

    let token = map.token_of(&"a").unwrap();
    assert!(map.remove(&"missing").is_none());
    assert_eq!(map.key(token), Ok(Some(&"a")));
}

#[test]
fn null_key_token() {
    let mut map: ObjectMap<u64, ()> = ObjectMap::new();
    assert!(map.null_key_token().is_none());
    map.put_null_key(None);
    let token = map.null_key_token().unwrap();
    assert!(token.is_null_key());
    assert_eq!(map.key(token), Ok(None));
    assert_eq!(map.has_value(token), Ok(false));
    assert_eq!(map.next_token(token), Ok(None));
    assert_eq!(map.first_token(), Some(token));
}

#[test]
fn raw_cursor_walks_all_entries() {
    let map = sample(MapConfig::default());
    let mut visited = 0;
    let mut null_seen = false;
    let mut cursor = map.raw_next(None);
    while let Some(raw) = cursor {
        let (key, value) = map.raw_entry(raw).unwrap();
        if key.is_none() {
            null_seen = true;
            assert!(raw.is_null_key());
            assert_eq!(value, Some(&7));
        }
        visited += 1;
        cursor = map.raw_next(Some(raw));
    }
    assert!(null_seen);
    assert_eq!(visited, map.len());
}

#[test]
fn raw_cursor_survives_removal_without_panicking() {
    let mut map: U8Map<u8> = (0..40u8).map(|key| (key, key)).collect();
    let raw = map.raw_next(None).unwrap();
    let token = map.first_token().unwrap();
    assert_eq!(token.to_raw(), raw);
    for key in 0..40u8 {
        map.remove(&key);
    }
    assert!(map.raw_entry(raw).is_none());
    assert!(map.raw_next(Some(raw)).is_none());
}

#[test]
fn set_token_walk_across_transition() {
    let mut set: U16Set = (0..100u16).collect();
    set.insert_null();
    let before: Vec<_> = set.iter().map(|value| value.copied()).collect();
    assert_eq!(before.last(), Some(&None));
    let token = set.first_token().unwrap();

    set.ensure_capacity(60_000);
    assert_eq!(set.mode(), Mode::Flat);
    assert!(matches!(set.key(token), Err(Error::StaleToken { .. })));

    let mut walked = Vec::new();
    let mut token = set.first_token();
    while let Some(current) = token {
        walked.push(set.key(current).unwrap().copied());
        token = set.next_token(current).unwrap();
    }
    // flat storage walks keys in ascending order
    let mut expected: Vec<_> = (0..100u16).map(Some).collect();
    expected.push(None);
    assert_eq!(walked, expected);
}

#[test]
fn token_from_another_map_at_the_same_version_is_invalid() {
    let mut with_entry: U8Map<u32> = U8Map::new();
    with_entry.put(5, 50);
    let mut with_null: U8Map<u32> = U8Map::new();
    with_null.put_null_key(Some(1));
    assert_eq!(with_entry.version(), with_null.version());

    let slot = with_entry.token_of(&5).unwrap();
    assert_eq!(with_null.key(slot), Err(Error::InvalidToken));
    assert_eq!(with_null.value(slot), Err(Error::InvalidToken));

    let null = with_null.null_key_token().unwrap();
    assert_eq!(with_entry.key(null), Err(Error::InvalidToken));
    assert_eq!(with_entry.next_token(null), Err(Error::InvalidToken));
}
