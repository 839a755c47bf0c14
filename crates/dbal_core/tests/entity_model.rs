use dbal_core::{attributes, Attributes, Entity, EntityError, Value};

#[test]
fn fill_sets_attributes() {
    let mut entity = Entity::default();
    entity.fill(attributes([("hello", "world")])).unwrap();

    assert_eq!(entity.attribute("hello"), Some(&Value::from("world")));
}

#[test]
fn construction_loads_all_attributes() {
    let initial = attributes([("a", 1), ("b", 2), ("c", 3)]);
    let entity = Entity::new(initial.clone());

    assert_eq!(entity.attributes().len(), initial.len());
    assert_eq!(entity.attributes(), &initial);
}

#[test]
fn missing_attribute_is_absent_not_null() {
    let mut entity = Entity::default();
    assert_eq!(entity.attribute("hello"), None);

    entity.set_attribute("hello", Value::Null).unwrap();
    assert_eq!(entity.attribute("hello"), Some(&Value::Null));
    assert!(entity.has_attribute("hello"));
}

#[test]
fn identifier_reads_id_field() {
    let entity = Entity::new(attributes([("id", 123)]));
    assert_eq!(entity.identifier(), Some(&Value::Integer(123)));

    let anonymous = Entity::new(attributes([("name", "x")]));
    assert_eq!(anonymous.identifier(), None);
}

#[test]
fn identifier_field_is_configurable() {
    let entity = Entity::new(attributes([("id", 1), ("uuid", 2)])).with_identifier_field("uuid");

    assert_eq!(entity.identifier_field(), "uuid");
    assert_eq!(entity.identifier(), Some(&Value::Integer(2)));
}

#[test]
fn set_attribute_overwrites() {
    let mut entity = Entity::default();
    entity.set_attribute("name", "foo").unwrap();
    entity.set_attribute("name", "bar").unwrap();

    assert_eq!(entity.attribute("name"), Some(&Value::from("bar")));
}

#[test]
fn protected_attribute_rejects_setter_and_keeps_state() {
    let mut entity = Entity::default();
    entity.set_protected_attributes(["id"]);

    let err = entity.set_attribute("id", 123).unwrap_err();
    assert_eq!(
        err,
        EntityError::ProtectedAttribute {
            key: "id".to_string()
        }
    );
    assert!(entity.attributes().is_empty());
}

#[test]
fn set_protected_attributes_replaces_previous_set() {
    let mut entity = Entity::default();
    entity.set_protected_attributes(["id"]);
    entity.set_protected_attributes(["secret"]);

    entity.set_attribute("id", 1).unwrap();
    assert!(entity.set_attribute("secret", "x").is_err());
    assert!(entity.protected_attributes().contains("secret"));
}

#[test]
fn returned_attributes_are_detached_from_entity() {
    let entity = Entity::new(attributes([("username", "Ben")]));
    let mut exported: Attributes = entity.to_attributes();
    exported.insert("username".to_string(), Value::from("Eve"));

    assert_eq!(entity.attribute("username"), Some(&Value::from("Ben")));
}

#[test]
fn serializes_as_flat_object() {
    let entity = Entity::new(attributes([
        ("username", Value::from("Ben")),
        ("age", Value::from(30)),
        ("score", Value::from(1.5)),
        ("nickname", Value::Null),
    ]));

    let json = serde_json::to_value(&entity).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"username": "Ben", "age": 30, "score": 1.5, "nickname": null})
    );
}
