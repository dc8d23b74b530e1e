use tare::predicate::{
    equals, has_unit, in_range, is_bool, is_integer, is_null, is_number, is_quantity, is_seq,
    is_seq_of, is_settings, is_string,
};
use tare::settings::Settings;
use tare::value::Value;

#[test]
fn stock_predicates_match_their_variants() {
    assert!(is_integer().test(&Value::Int(1)));
    assert!(!is_integer().test(&Value::Real(1.0)));
    assert!(is_number().test(&Value::Real(1.0)));
    assert!(is_number().test(&Value::Int(1)));
    assert!(is_string().test(&Value::Str(String::from("s"))));
    assert!(is_bool().test(&Value::Bool(true)));
    assert!(is_null().test(&Value::Null));
    assert!(is_seq().test(&Value::Seq(vec![])));
    assert!(is_settings().test(&Value::Section(Settings::new())));
    assert!(is_quantity().test(&Value::Quantity(1.0, String::from("m"))));
    assert!(!is_quantity().test(&Value::Real(1.0)));
}

#[test]
fn combinators_compose_tests_and_descriptions() {
    let non_negative_int = is_integer() & in_range(0.0, f64::INFINITY);
    assert_eq!(non_negative_int.description(), "Integer & In [0, inf>");
    assert!(non_negative_int.test(&Value::Int(0)));
    assert!(non_negative_int.test(&Value::Int(7)));
    assert!(!non_negative_int.test(&Value::Int(-1)));
    assert!(!non_negative_int.test(&Value::Real(1.0)));

    let int_or_string = is_integer() | is_string();
    assert_eq!(int_or_string.description(), "Integer | String");
    assert!(int_or_string.test(&Value::Int(1)));
    assert!(int_or_string.test(&Value::Str(String::from("s"))));
    assert!(!int_or_string.test(&Value::Bool(false)));

    let not_null = !is_null();
    assert_eq!(not_null.description(), "!None");
    assert!(not_null.test(&Value::Int(1)));
    assert!(!not_null.test(&Value::Null));
}

#[test]
fn in_range_is_half_open() {
    let range = in_range(1.0, 10.0);
    assert_eq!(range.description(), "In [1, 10>");
    assert!(range.test(&Value::Int(1)));
    assert!(range.test(&Value::Real(9.999)));
    assert!(!range.test(&Value::Int(10)));
    assert!(!range.test(&Value::Str(String::from("5"))));
}

#[test]
fn equals_compares_values() {
    let is_five = equals(Value::Int(5));
    assert_eq!(is_five.description(), "5");
    assert!(is_five.test(&Value::Int(5)));
    assert!(!is_five.test(&Value::Int(6)));
    assert!(!is_five.test(&Value::Real(5.0)));
}

#[test]
fn seq_of_checks_every_element() {
    let ints = is_seq_of(is_integer());
    assert_eq!(ints.description(), "Seq[Integer]");
    assert!(ints.test(&Value::Seq(vec![Value::Int(1), Value::Int(2)])));
    assert!(ints.test(&Value::Seq(vec![])));
    assert!(!ints.test(&Value::Seq(vec![Value::Int(1), Value::Real(2.0)])));
    assert!(!ints.test(&Value::Int(1)));
}

#[test]
fn has_unit_matches_the_unit_string_only() {
    let metres = has_unit("m");
    assert_eq!(metres.description(), "Quantity [m]");
    assert!(metres.test(&Value::Quantity(2.0, String::from("m"))));
    // "mm" is dimensionally compatible but not textually equal; unit
    // equivalence belongs to the external registry
    assert!(!metres.test(&Value::Quantity(2.0, String::from("mm"))));
    assert!(!metres.test(&Value::Real(2.0)));
}

#[test]
fn predicates_are_total_over_all_variants() {
    let everything = [
        Value::Null,
        Value::Bool(true),
        Value::Int(1),
        Value::Real(1.5),
        Value::Str(String::from("s")),
        Value::Quantity(1.0, String::from("m")),
        Value::Seq(vec![]),
        Value::Section(Settings::new()),
    ];
    for value in &everything {
        // no predicate may panic on an out-of-domain value
        let _ = is_integer().test(value);
        let _ = in_range(0.0, 1.0).test(value);
        let _ = is_seq_of(is_number()).test(value);
        let _ = has_unit("eV").test(value);
    }
}
