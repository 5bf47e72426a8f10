#![allow(clippy::unwrap_used, reason = "tests unwrap run results")]

use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_bindings_keep_caller_values_first() {
    let bindings = run("b = a + 1\nc = b * 2", [("a", Value::Int(1))]).unwrap();
    let names: Vec<_> = bindings.iter().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["a", "b", "c"]);
    assert_eq!(bindings.get("c"), Some(&Value::Int(4)));
    assert_eq!(bindings.get("d"), None);
    assert_eq!(bindings.len(), 3);
}

#[test]
fn test_error_kinds() {
    let err = run("x = (1", []).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Syntax);
    assert_eq!(err.line(), Some(1));

    let err = run("x ~ xs", []).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Syntax);

    let err = run("x = 1\ny = 1 / 0", []).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Runtime);
    assert_eq!(err.line(), Some(2));
    assert!(matches!(&err, Error::Eval(e) if e.root_cause().kind() == ErrorKind::ZeroDivision));
}

#[test]
fn test_program_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Program>();
    assert_send_sync::<Bindings>();
    assert_send_sync::<PartialRun>();
    assert_send_sync::<Value>();
}

#[test]
fn test_partial_run_keeps_earlier_bindings() {
    let program = Program::compile("a = x + 1\nb = a / 0\nc = 3").unwrap();
    let partial = program
        .run_partial(EvalConfig::default(), [("x", Value::Int(1))])
        .unwrap_err();
    assert_eq!(partial.error.line(), Some(2));
    assert_eq!(partial.error.root_cause().kind(), ErrorKind::ZeroDivision);
    let names: Vec<_> = partial.bindings.iter().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["x", "a"]);
    assert_eq!(partial.bindings.get("a"), Some(&Value::Int(2)));

    let bindings = program
        .run_partial(EvalConfig::default(), [("x", Value::from("s"))])
        .unwrap_err()
        .bindings;
    assert_eq!(bindings.len(), 1);
}

#[test]
fn test_init_tracing_is_idempotent() {
    init_tracing();
    init_tracing();
}
