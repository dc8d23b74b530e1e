use tare::settings::{Lookup, Settings};
use tare::value::Value;

#[test]
fn missing_key_yields_a_temporary_entry() {
    let mut settings = Settings::new();
    let lookup = settings.lookup("x").unwrap();
    assert!(!lookup.is_found());
    assert!(lookup.found().is_none());
    // the read itself stored nothing
    assert!(!settings.contains("x"));
}

#[test]
fn chained_assignment_commits_the_whole_path() {
    let mut settings = Settings::new();
    match settings.lookup("a").unwrap() {
        Lookup::Found(_) => panic!("nothing was stored yet"),
        Lookup::Missing(entry) => {
            assert_eq!(entry.path(), "a");
            entry.key("b").key("c").assign(42).unwrap();
        }
    }
    assert!(settings.contains("a"));
    assert_eq!(settings.peek("a.b.c"), Some(&Value::Int(42)));
}

#[test]
fn abandoned_entries_leave_no_trace() {
    let mut settings = Settings::new();
    match settings.lookup("ghost").unwrap() {
        Lookup::Missing(entry) => {
            // build a path and drop it without assigning
            let _ = entry.key("deep").key("path");
        }
        Lookup::Found(_) => panic!("nothing was stored yet"),
    }
    assert!(!settings.contains("ghost"));
    assert!(settings.is_empty());
}

#[test]
fn stored_keys_are_found() {
    let mut settings = Settings::new();
    settings.set("present", "yes").unwrap();
    match settings.lookup("present").unwrap() {
        Lookup::Found(value) => assert_eq!(value, &Value::Str(String::from("yes"))),
        Lookup::Missing(_) => panic!("key is stored"),
    }
}
