use std::sync::Arc;

use serde_json::json;
use tare::error::TareError;
use tare::predicate::is_integer;
use tare::schema::{Model, Type, model_type};
use tare::settings::Settings;
use tare::transform::{check_settings, conforms, each_value_conforms, generate_settings, parse_to_model};
use tare::value::Value;

fn section_model() -> Arc<Model> {
    let mut model = Model::new();
    model
        .insert("p", Type::new("An integer parameter.").with_check(is_integer()))
        .unwrap();
    Arc::new(model)
}

fn outer_model() -> (Arc<Model>, Arc<Model>) {
    let inner = section_model();
    let mut outer = Model::new();
    outer
        .insert(
            "section",
            model_type(
                Arc::clone(&inner),
                "section",
                "A nested parameter block.",
                None,
                false,
            ),
        )
        .unwrap();
    (Arc::new(outer), inner)
}

#[test]
fn parsing_recurses_through_model_types() {
    let (outer, inner) = outer_model();
    let doc = json!({ "section": { "p": 1 } });

    let settings = parse_to_model(&outer, doc.as_object().unwrap()).unwrap();
    match settings.peek("section") {
        Some(Value::Section(section)) => {
            assert_eq!(section.peek("p"), Some(&Value::Int(1)));
            // the sub-settings is bound to the sub-model
            assert!(Arc::ptr_eq(section.model().unwrap(), &inner));
        }
        other => panic!("expected a section, got {:?}", other),
    }
    check_settings(&settings, &outer).unwrap();
}

#[test]
fn model_type_checks_reject_bad_sections() {
    let (outer, _) = outer_model();
    let mut settings = Settings::new();
    settings.set("section.p", "not an integer").unwrap();

    let err = check_settings(&settings, &outer).unwrap_err();
    match err {
        TareError::Validation { path, expected, .. } => {
            assert_eq!(path, "section");
            assert!(expected.contains("Model <section>"));
        }
        other => panic!("expected a validation error, got {}", other),
    }
}

#[test]
fn model_type_generation_recurses() {
    let (outer, _) = outer_model();
    let doc = json!({ "section": { "p": 7 } });
    let settings = parse_to_model(&outer, doc.as_object().unwrap()).unwrap();
    let out = generate_settings(&settings);
    assert_eq!(out["section"], json!({ "p": 7 }));
}

#[test]
fn plain_sub_models_also_recurse() {
    let inner = section_model();
    let mut outer = Model::new();
    outer.insert("block", Arc::clone(&inner)).unwrap();
    let outer = Arc::new(outer);

    let doc = json!({ "block": { "p": 3 } });
    let settings = parse_to_model(&outer, doc.as_object().unwrap()).unwrap();
    check_settings(&settings, &outer).unwrap();

    let mut bad = Settings::new();
    bad.set("block.p", "three").unwrap();
    let err = check_settings(&bad, &outer).unwrap_err();
    assert!(matches!(err, TareError::Validation { path, .. } if path == "block.p"));
}

#[test]
fn conforms_is_a_reusable_predicate() {
    let inner = section_model();
    let check = conforms(Arc::clone(&inner), "params");
    assert_eq!(check.description(), "Model <params>");

    let mut good = Settings::new();
    good.set("p", 1).unwrap();
    assert!(check.test(&Value::Section(good)));

    let mut bad = Settings::new();
    bad.set("p", "one").unwrap();
    assert!(!check.test(&Value::Section(bad)));
    assert!(!check.test(&Value::Int(1)));
}

#[test]
fn each_value_conforms_models_keyed_collections() {
    let inner = section_model();
    let check = each_value_conforms(Arc::clone(&inner), "params");
    assert_eq!(check.description(), "{key: Model <params>}");

    let mut collection = Settings::new();
    collection.set("first.p", 1).unwrap();
    collection.set("second.p", 2).unwrap();
    assert!(check.test(&Value::Section(collection.clone())));

    collection.set("third.p", "nope").unwrap();
    assert!(!check.test(&Value::Section(collection)));
}

#[test]
fn extra_checks_compose_with_conformance() {
    let inner = section_model();
    let at_most_one_key = tare::predicate::Predicate::new("AtMostOneKey", |v| match v {
        Value::Section(section) => section.len() <= 1,
        _ => false,
    });
    let leaf = model_type(
        Arc::clone(&inner),
        "section",
        "A small parameter block.",
        Some(at_most_one_key),
        false,
    );
    let check = leaf.check().unwrap();
    assert_eq!(check.description(), "Model <section> & AtMostOneKey");

    let mut small = Settings::new();
    small.set("p", 1).unwrap();
    assert!(check.test(&Value::Section(small)));
}

#[test]
fn schema_keys_are_single_segments() {
    let mut model = Model::new();
    let err = model.insert("a.b", Type::new("Dotted.")).unwrap_err();
    assert!(matches!(err, TareError::Schema(_)));
    assert!(model.insert("", Type::new("Empty.")).is_err());
}

#[test]
fn schema_documentation_renders() {
    let (outer, _) = outer_model();
    let text = outer.display("");
    assert!(text.contains("+ section"));
    assert!(text.contains("A nested parameter block."));
    assert!(text.contains("p"));
}
