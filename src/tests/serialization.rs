#[cfg(feature = "serde")]
#[test]
fn serde_round_trip_keeps_absent_values_and_null_key() {
    use crate::MapConfig;
    use crate::Mode;
    use crate::U16Map;

    let mut map: U16Map<String> = U16Map::new();
    map.put(4, "four".to_owned());
    map.put_absent(9);
    map.put_null_key(Some("null".to_owned()));

    let bytes = bincode::serialize(&map).unwrap();
    let back: U16Map<String> = bincode::deserialize(&bytes).unwrap();
    assert_eq!(back, map);
    assert_eq!(back.get_nullable(&9), Some(None));
    assert_eq!(back.null_key_value().map(String::as_str), Some("null"));
    back.validate().unwrap();

    let config = MapConfig::default().never_flat().with_collision_threshold(7);
    let bytes = bincode::serialize(&config).unwrap();
    let config_back: MapConfig = bincode::deserialize(&bytes).unwrap();
    assert_eq!(config_back, config);
    assert_eq!(U16Map::<()>::with_config(config_back).mode(), Mode::Sparse);
}

#[cfg(feature = "serde")]
#[test]
fn serde_set_round_trip() {
    use crate::ObjectSet;

    let mut set: ObjectSet<String> = ["a", "b", "c"].into_iter().map(str::to_owned).collect();
    set.insert_null();
    let bytes = bincode::serialize(&set).unwrap();
    let back: ObjectSet<String> = bincode::deserialize(&bytes).unwrap();
    assert_eq!(back, set);
    assert!(back.contains_null());
}

#[cfg(feature = "speedy")]
#[test]
fn speedy_round_trip() {
    use speedy::Readable;
    use speedy::Writable;

    use crate::I8Set;
    use crate::U8Map;

    let mut map: U8Map<u64> = (0..100u8).map(|key| (key, u64::from(key) << 40)).collect();
    map.put_absent(200);
    map.put_null_key(None);
    let bytes = map.write_to_vec().unwrap();
    assert_eq!(bytes.len(), Writable::<speedy::Endianness>::bytes_needed(&map).unwrap());
    let back = U8Map::<u64>::read_from_buffer(&bytes).unwrap();
    assert_eq!(back, map);
    assert_eq!(back.mode(), map.mode());

    let set: I8Set = (-5..5i8).collect();
    let bytes = set.write_to_vec().unwrap();
    assert_eq!(I8Set::read_from_buffer(&bytes).unwrap(), set);
}
