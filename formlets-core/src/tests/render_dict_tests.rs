use super::submission;
use crate::*;

fn first() -> Value {
    Value::binary("first", |a, _| Ok(a))
}

#[test]
fn test_empty_dict() {
    let dict = RenderDict::empty();
    assert!(dict.is_empty());
    assert_eq!(dict.value("field0"), None);
    assert_eq!(dict.errors("field0"), None);
    assert!(std::ptr::eq(dict, RenderDict::empty()));
}

#[test]
fn test_values_come_from_submission() {
    let dict = RenderDict::new(submission(&[("field0", "x")]), &Value::plain(1)).unwrap();
    assert!(!dict.is_empty());
    assert_eq!(dict.value("field0"), Some("x"));
    assert!(dict.value_exists("field0"));
    assert!(!dict.value_exists("field1"));
    assert!(dict.all_errors().is_empty());
}

#[test]
fn test_error_recorded_under_each_origin() {
    let err = Value::error_at("mismatch", ["a", "b"]);
    let errors = RenderDict::compute_from(&err).unwrap();
    assert_eq!(errors["a"], vec!["mismatch".to_string()]);
    assert_eq!(errors["b"], vec!["mismatch".to_string()]);
}

#[test]
fn test_shared_error_reported_once() {
    let err = Value::error_at("bad", ["a"]);
    let f = first().apply(err.clone()).unwrap().apply(err).unwrap();
    let errors = RenderDict::compute_from(&f).unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors["a"], vec!["bad".to_string()]);
}

#[test]
fn test_diamond_shared_error_reported_once() {
    let err = Value::error_at("bad", ["a"]);
    let left = identity().apply(err.clone()).unwrap();
    let right = Value::unary("echo", Ok).apply(err).unwrap();
    let top = first().apply(left).unwrap().apply(right).unwrap();
    let errors = RenderDict::compute_from(&top).unwrap();
    assert_eq!(errors["a"], vec!["bad".to_string()]);
}

#[test]
fn test_argument_errors_surface_next_to_aggregate() {
    let err = Value::error_at("bad a", ["a"]);
    let f = first()
        .apply(err)
        .unwrap()
        .apply(Value::plain_from(1, ["b"]))
        .unwrap();
    let errors = RenderDict::compute_from(&f).unwrap();
    assert_eq!(
        errors["a"],
        vec![ARGUMENT_ERRORS.to_string(), "bad a".to_string()]
    );
    assert_eq!(errors["b"], vec![ARGUMENT_ERRORS.to_string()]);
}

#[test]
fn test_unsatisfied_function_arguments_are_visited() {
    let f = first().apply(Value::error_at("bad", ["a"])).unwrap();
    assert!(!f.is_satisfied());
    let errors = RenderDict::compute_from(&f).unwrap();
    assert_eq!(errors["a"], vec!["bad".to_string()]);
}

#[test]
fn test_plain_values_contribute_nothing() {
    let f = first()
        .apply(Value::plain_from(1, ["a"]))
        .unwrap()
        .apply(Value::plain_from(2, ["b"]))
        .unwrap();
    assert!(RenderDict::compute_from(&f).unwrap().is_empty());
}
