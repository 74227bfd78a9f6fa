use anvil::loader::{load_sidecar_config, load_sources, resolve_inputs};
use anvil::schema::reduce_objects;
use anvil::{
    build, Advisory, Entity, FieldKind, GenerationConfig, MappingStyle, MultiDocumentMerger, NameResolver, ScalarKind,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use tempfile::TempDir;
use test_case::test_case;

fn kinds(entity: &Entity) -> Vec<(&str, FieldKind)> {
    entity
        .fields
        .iter()
        .map(|f| (f.source_key.as_str(), f.kind.clone()))
        .collect()
}

fn key_set(value: &Value) -> BTreeSet<String> {
    value.as_object().unwrap().keys().cloned().collect()
}

#[test_case(json!({"a": 1}), "Base", None ; "plain")]
#[test_case(json!({"first_name": "x", "nested": {"y": 2}}), "order_item", Some("PT") ; "prefixed snake case")]
#[test_case(json!({}), "class", Some("XY") ; "reserved base name")]
fn test_first_entity_is_resolved_base_name(document: Value, base: &str, prefix: Option<&str>) {
    let mut config = GenerationConfig::default();
    if let Some(prefix) = prefix {
        config = config.with_prefix(prefix);
    }

    let entities = build(&document, base, true, &config);
    let expected = NameResolver::new(&config).resolve_entity_name(base, prefix, true);
    assert_eq!(entities[0].name, expected);
}

#[test]
fn test_field_count_excludes_null_keys() {
    let config = GenerationConfig::default();
    let document = json!({"a": 1, "b": null, "c": "x", "d": {"e": null}, "f": []});

    let entities = build(&document, "Base", true, &config);
    assert_eq!(entities[0].fields.len(), 4);
}

#[test]
fn test_reducing_one_object_changes_nothing() {
    let object = json!({
        "id": 7,
        "gone": null,
        "author": {"name": "a", "links": [{"rel": "self"}]},
        "matrix": [[1, 2], [3]],
        "tags": []
    });
    assert_eq!(reduce_objects([&object]), object);
}

#[test]
fn test_reduced_keys_are_the_union_in_any_order() {
    let a = json!({"id": 1, "name": "a", "meta": {"x": 1}});
    let b = json!({"id": 2, "email": "e", "meta": {"y": 2}});

    let ab = reduce_objects([&a, &b]);
    let ba = reduce_objects([&b, &a]);

    let expected: BTreeSet<String> = ["id", "name", "meta", "email"].iter().map(|s| s.to_string()).collect();
    assert_eq!(key_set(&ab), expected);
    assert_eq!(key_set(&ba), expected);
    assert_eq!(key_set(&ab["meta"]), key_set(&ba["meta"]));
}

#[test]
fn test_non_null_survives_in_either_position() {
    assert_eq!(reduce_objects(&[json!({"k": "v"}), json!({"k": null})])["k"], "v");
    assert_eq!(reduce_objects(&[json!({"k": null}), json!({"k": "v"})])["k"], "v");
}

#[test]
fn test_scenario_flat_object() {
    let config = GenerationConfig::default().with_prefix("PT");
    let entities = build(&json!({"a": "x", "b": 1, "c": true}), "Base", true, &config);

    assert_eq!(entities.len(), 1);
    assert_eq!(entities[0].name, "PTBase");
    assert_eq!(
        kinds(&entities[0]),
        vec![
            ("a", FieldKind::Scalar(ScalarKind::String)),
            ("b", FieldKind::Scalar(ScalarKind::Int)),
            ("c", FieldKind::Scalar(ScalarKind::Bool)),
        ]
    );
}

#[test]
fn test_scenario_empty_array_field() {
    let config = GenerationConfig::default();
    let entities = build(&json!({"items": []}), "Base", true, &config);

    assert_eq!(entities.len(), 1);
    assert_eq!(kinds(&entities[0]), vec![("items", FieldKind::EmptyArray)]);
}

#[test]
fn test_scenario_nested_object() {
    let config = GenerationConfig::default();
    let entities = build(&json!({"child": {"x": 1}}), "Base", true, &config);

    assert_eq!(entities.len(), 2);
    let child = entities.iter().find(|e| e.name == "Child").unwrap();
    assert_eq!(kinds(child), vec![("x", FieldKind::Scalar(ScalarKind::Int))]);

    let parent = entities.iter().find(|e| e.is_top_level).unwrap();
    assert_eq!(kinds(parent), vec![("child", FieldKind::ObjectRef("Child".to_string()))]);
}

#[test]
fn test_scenario_top_level_array() {
    let config = GenerationConfig::default();
    let entities = build(&json!([{"a": 1}, {"a": 1, "b": "y"}]), "Base", true, &config);

    assert_eq!(entities.len(), 1);
    assert_eq!(
        kinds(&entities[0]),
        vec![
            ("a", FieldKind::Scalar(ScalarKind::Int)),
            ("b", FieldKind::Scalar(ScalarKind::String)),
        ]
    );
}

#[test]
fn test_scenario_documents_share_an_entity() {
    let config = GenerationConfig::default();
    let mut documents = BTreeMap::new();
    documents.insert("Dog".to_string(), json!({"name": "Rex", "pet": {"barks": true}}));
    documents.insert("Cat".to_string(), json!({"name": "Tom", "pet": {"meows": true}}));

    let generation = anvil::generate(&documents, &config).unwrap();
    let pets: Vec<&Entity> = generation.entities.iter().filter(|e| e.name == "Pet").collect();
    assert_eq!(pets.len(), 1);

    let keys: BTreeSet<&str> = pets[0].fields.iter().map(|f| f.source_key.as_str()).collect();
    assert_eq!(keys, ["barks", "meows"].into_iter().collect());
}

#[test_case(MappingStyle::Derived ; "derived")]
#[test_case(MappingStyle::Accessor ; "accessor")]
#[test_case(MappingStyle::Marshal ; "marshal")]
fn test_scenario_reserved_field_name(style: MappingStyle) {
    let config = GenerationConfig::default().with_mapping_style(style);
    let entities = build(&json!({"class": "x"}), "Base", true, &config);
    let field = &entities[0].fields[0];

    assert_ne!(field.resolved_name, "class");
    assert_eq!(field.resolved_name, "classValue");
    assert_eq!(field.source_key, "class");
}

#[test]
fn test_scenario_reserved_field_with_custom_table() {
    let config = GenerationConfig::default().with_reserved_words(vec!["class".to_string()], "Property");
    let entities = build(&json!({"class": "x"}), "Base", true, &config);
    assert_eq!(entities[0].fields[0].resolved_name, "classProperty");
}

#[test]
fn test_generation_is_deterministic() {
    let config = GenerationConfig::default();
    let mut documents = BTreeMap::new();
    for i in 0..8 {
        documents.insert(
            format!("sample_{i}"),
            json!({"id": i, "owner": {"id": i, "tags": ["t"]}, "lines": [{"qty": i}]}),
        );
    }

    let first = serde_json::to_string(&anvil::generate(&documents, &config).unwrap()).unwrap();
    let second = serde_json::to_string(&anvil::generate(&documents, &config).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_directory_end_to_end() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("Dog.json"), r#"{"pet": {"barks": true, "owner": {"id": 1}}}"#).unwrap();
    fs::write(dir.path().join("Cat.json"), r#"{"pet": {"meows": true, "owner": null}}"#).unwrap();
    fs::write(dir.path().join("Empty.json"), "[]").unwrap();
    fs::write(dir.path().join(".config.json"), r#"{"namePrefix": "Zoo"}"#).unwrap();

    let config = load_sidecar_config(dir.path()).unwrap().unwrap();
    let paths = resolve_inputs([dir.path().to_string_lossy()]).unwrap();
    let sources = load_sources(&paths).unwrap();
    assert_eq!(sources.len(), 3);

    let generation = MultiDocumentMerger::new(&config).generate_from_sources(&sources).unwrap();
    let names: Vec<&str> = generation.entities.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["ZooCat", "ZooPet", "ZooDog", "ZooOwner"]);

    let pet = generation.entity("ZooPet").unwrap();
    let owner = pet.field("owner").unwrap();
    assert_eq!(owner.kind, FieldKind::ObjectRef("ZooOwner".to_string()));
    assert!(owner.optional);

    assert_eq!(
        generation.advisories,
        vec![Advisory::EmptyTopLevelArray {
            document: "Empty".to_string()
        }]
    );
}
