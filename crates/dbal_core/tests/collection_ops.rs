use dbal_core::{Collection, CollectionError, Entity, Key, Value};

#[test]
fn construction_keeps_items_in_order() {
    let collection = Collection::new(vec![1, 2, 3]);

    assert_eq!(collection.count(), 3);
    let keys: Vec<Key> = collection.keys().cloned().collect();
    assert_eq!(keys, [Key::Index(0), Key::Index(1), Key::Index(2)]);
    assert_eq!(collection.values().copied().collect::<Vec<_>>(), [1, 2, 3]);
}

#[test]
fn iteration_yields_key_item_pairs_and_is_restartable() {
    let items = vec![1, 2, 3];
    let collection = Collection::new(items.clone());

    for _ in 0..2 {
        let mut seen = 0;
        for (key, value) in &collection {
            let Key::Index(index) = key else {
                panic!("unexpected named key {key}");
            };
            assert_eq!(items[*index as usize], *value);
            seen += 1;
        }
        assert_eq!(seen, 3);
    }
}

#[test]
fn copy_and_clone_are_independent() {
    let mut collection = Collection::new(vec![1, 2, 3]);
    let mut copy = collection.copy();
    let clone = collection.clone();

    assert_eq!(collection, copy);
    assert_eq!(collection, clone);

    collection.set(0, 100);
    copy.remove(2);

    assert_eq!(copy.get(0), Ok(&1));
    assert_eq!(collection.count(), 3);
    assert_eq!(clone.values().copied().collect::<Vec<_>>(), [1, 2, 3]);
}

#[test]
fn filter_preserves_keys_and_leaves_receiver_untouched() {
    let collection: Collection<i64> = (1..=10).collect();
    let filtered = collection.filter(|value| *value > 5);

    assert_eq!(filtered.count(), 5);
    assert_eq!(collection.count(), 10);
    assert!(!filtered.contains_key(0));
    assert_eq!(filtered.get(5), Ok(&6));
    assert_eq!(filtered.get(9), Ok(&10));
    assert_eq!(
        filtered.get(0),
        Err(CollectionError::KeyNotFound(Key::Index(0)))
    );
}

#[test]
fn sort_reindexes_from_zero() {
    let collection: Collection<i64> = (1..=10).collect();
    let sorted = collection.sort(|a, b| b.cmp(a));

    assert_eq!(
        sorted.values().copied().collect::<Vec<_>>(),
        (1..=10).rev().collect::<Vec<i64>>()
    );
    assert_eq!(sorted.get(0), Ok(&10));
    assert_eq!(collection.get(0), Ok(&1));
}

#[test]
fn sort_after_filter_compacts_sparse_keys() {
    let collection = Collection::new(vec![5, 1, 4, 2, 3]);
    let sorted = collection.filter(|value| *value % 2 == 1).sort(|a, b| a.cmp(b));

    let keys: Vec<Key> = sorted.keys().cloned().collect();
    assert_eq!(keys, [Key::Index(0), Key::Index(1), Key::Index(2)]);
    assert_eq!(sorted.values().copied().collect::<Vec<_>>(), [1, 3, 5]);
}

#[test]
fn count_matches_item_count() {
    assert_eq!(Collection::new(vec![1, 2, 3, 4]).count(), 4);
    assert_eq!(Collection::<u8>::default().count(), 0);
    assert!(Collection::<u8>::default().is_empty());
}

#[test]
fn contains_key_never_fails_on_missing_keys() {
    let collection = Collection::new(vec![1, 2, 3, 4]);

    assert!(collection.contains_key(0));
    assert!(!collection.contains_key("does not exist"));
    assert!(!collection.contains_key(42));
}

#[test]
fn set_then_get_returns_written_value() {
    let mut collection = Collection::default();
    collection.set(0, 1);

    assert_eq!(collection.get(0), Ok(&1));
}

#[test]
fn remove_makes_key_absent() {
    let mut collection = Collection::new(vec![1]);
    assert_eq!(collection.remove(0), Some(1));

    assert!(!collection.contains_key(0));
    assert_eq!(
        collection.get(0).unwrap_err().to_string(),
        "undefined collection key: 0"
    );
    assert_eq!(collection.remove(0), None);
}

#[test]
fn list_serializes_as_array_and_sparse_as_object() {
    let collection = Collection::new(vec![1, 2, 3]);
    assert_eq!(serde_json::to_value(&collection).unwrap(), serde_json::json!([1, 2, 3]));

    let sparse = collection.filter(|value| *value != 2);
    assert_eq!(
        serde_json::to_value(&sparse).unwrap(),
        serde_json::json!({"0": 1, "2": 3})
    );
}

#[test]
fn entity_collections_copy_items_shallowly() {
    let mut entity = Entity::default();
    entity.set_attribute("name", "a").unwrap();
    let collection = Collection::new(vec![entity]);

    let mut copy = collection.copy();
    copy.get_mut(0).unwrap().set_attribute("name", "b").unwrap();

    assert_eq!(
        collection.get(0).unwrap().attribute("name"),
        Some(&Value::from("a"))
    );
}
