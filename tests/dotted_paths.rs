use std::sync::Arc;

use tare::error::TareError;
use tare::schema::{Model, Type};
use tare::settings::Settings;
use tare::value::Value;

#[test]
fn deep_write_creates_intermediate_sections() {
    let mut settings = Settings::new();
    settings.set("a.b.c", 3).unwrap();

    assert!(settings.contains("a"));
    assert_eq!(settings.peek("a.b.c"), Some(&Value::Int(3)));
    // the intermediate node is a section holding exactly one key
    match settings.peek("a.b") {
        Some(Value::Section(section)) => {
            assert_eq!(section.len(), 1);
            assert!(section.contains("c"));
        }
        other => panic!("expected a section at a.b, got {:?}", other),
    }
}

#[test]
fn get_resolves_dotted_paths() {
    let mut settings = Settings::new();
    settings.set("beam.energy", 50.0).unwrap();
    settings.set("beam.label", "primary").unwrap();

    assert_eq!(settings.get("beam.energy").unwrap(), &Value::Real(50.0));
    assert_eq!(
        settings.get("beam.label").unwrap(),
        &Value::Str(String::from("primary"))
    );
}

#[test]
fn writing_through_a_scalar_is_a_structure_error() {
    let mut settings = Settings::new();
    settings.set("x", 1).unwrap();
    let err = settings.set("x.y", 2).unwrap_err();
    assert!(matches!(err, TareError::Structure { path } if path == "x.y"));
}

#[test]
fn empty_segments_are_rejected() {
    let mut settings = Settings::new();
    assert!(settings.set("", 1).is_err());
    assert!(settings.set("a..b", 1).is_err());
}

#[test]
fn missing_paths_fail_with_the_full_path() {
    let mut settings = Settings::new();
    settings.set("a.b", 1).unwrap();
    let err = settings.get("a.c.d").unwrap_err();
    assert!(matches!(err, TareError::KeyNotFound { path } if path == "a.c.d"));
}

#[test]
fn peek_never_mutates() {
    let settings = Settings::new();
    assert!(settings.peek("ghost.key").is_none());
    assert!(!settings.contains("ghost"));
}

#[test]
fn contains_is_single_segment_only() {
    let mut settings = Settings::new();
    settings.set("a.b", 1).unwrap();
    assert!(settings.contains("a"));
    assert!(!settings.contains("b"));
    assert!(!settings.contains("a.b"));
}

#[test]
fn clone_is_deep_for_values_and_shared_for_the_model() {
    let mut model = Model::new();
    model
        .insert("n", Type::new("A number.").with_default(7))
        .unwrap();
    let model = Arc::new(model);

    let mut original = Settings::with_model(Arc::clone(&model));
    original.set("section.x", 1).unwrap();

    let mut copy = original.clone();
    copy.set("section.x", 2).unwrap();

    // values diverged, the schema did not
    assert_eq!(original.peek("section.x"), Some(&Value::Int(1)));
    assert_eq!(copy.peek("section.x"), Some(&Value::Int(2)));
    assert!(Arc::ptr_eq(original.model().unwrap(), copy.model().unwrap()));

    // the copy still resolves defaults against the shared model
    assert_eq!(copy.get("n").unwrap(), &Value::Int(7));
}

#[test]
fn insertion_order_is_preserved() {
    let mut settings = Settings::new();
    settings.set("zeta", 1).unwrap();
    settings.set("alpha", 2).unwrap();
    settings.set("mu", 3).unwrap();
    let keys: Vec<&str> = settings.keys().collect();
    assert_eq!(keys, vec!["zeta", "alpha", "mu"]);
}
