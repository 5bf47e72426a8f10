//! Whole-program tests through the public facade.

#![allow(clippy::unwrap_used, reason = "tests unwrap run results")]

use pretty_assertions::assert_eq;
use tildec::{run, ErrorKind, EvalConfig, Program, Value};

fn floats(values: &[f64]) -> Value {
    Value::list(values.iter().copied().map(Value::Float).collect())
}

fn ints(values: &[i64]) -> Value {
    Value::list(values.iter().copied().map(Value::Int).collect())
}

#[test]
fn quad_function() {
    let bindings = run("quad(x, y) = sqrt(x**2 + y**2)\nq = quad(3, 4)", []).unwrap();
    assert_eq!(bindings.get("q"), Some(&Value::Float(5.0)));
}

#[test]
fn join_pairs_in_order() {
    let source = "
pairs = join {
    xi ~ x
    yi ~ y
}
";
    let x = floats(&[1.1, 2.2, 3.3]);
    let y = Value::list(vec![Value::from("A"), Value::from("B")]);
    let bindings = run(source, [("x", x), ("y", y)]).unwrap();

    let pairs = bindings.get("pairs").unwrap().as_list().unwrap();
    let rendered: Vec<String> = pairs
        .iter()
        .map(|row| {
            let xi = bindings.field(row, "xi").unwrap();
            let yi = bindings.field(row, "yi").unwrap();
            format!("{}{}", bindings.display(xi), bindings.display(yi))
        })
        .collect();
    assert_eq!(
        rendered,
        vec!["1.1A", "1.1B", "2.2A", "2.2B", "3.3A", "3.3B"]
    );
}

#[test]
fn join_cardinality_is_product() {
    let source = "r = join {a ~ xs; b ~ ys; c ~ zs}";
    let bindings = run(
        source,
        [
            ("xs", ints(&[1, 2])),
            ("ys", ints(&[1, 2, 3])),
            ("zs", ints(&[1, 2, 3, 4])),
        ],
    )
    .unwrap();
    assert_eq!(bindings.get("r").unwrap().as_list().unwrap().len(), 24);

    let empty = run(source, [("xs", ints(&[1])), ("ys", ints(&[])), ("zs", ints(&[1]))]).unwrap();
    assert_eq!(empty.get("r"), Some(&ints(&[])));
}

#[test]
fn join_records_have_distinct_identities() {
    let bindings = run("r = join {a ~ xs}\ns = join {a ~ xs}", [("xs", ints(&[7, 7]))]).unwrap();
    let r = bindings.get("r").unwrap().as_list().unwrap();
    let s = bindings.get("s").unwrap().as_list().unwrap();
    assert_ne!(r[0], r[1]);
    assert_ne!(r[0], s[0]);
    assert_eq!(bindings.display(&r[1]).to_string(), "pattern#0[1] { a: 7 }");
    assert_eq!(bindings.display(&s[0]).to_string(), "pattern#1[0] { a: 7 }");
}

#[test]
fn join_slices_candidates() {
    let source = "r = join {a ~ xs; b ~ xs[1:]; d = b - a}";
    let bindings = run(source, [("xs", ints(&[1, 2, 4]))]).unwrap();
    let diffs: Vec<_> = bindings
        .get("r")
        .unwrap()
        .as_list()
        .unwrap()
        .iter()
        .map(|row| bindings.field(row, "d").cloned().unwrap())
        .collect();
    assert_eq!(diffs, ints(&[1, 3, 0, 2, -2, 0]).as_list().unwrap());
}

#[test]
fn nested_join_filters_with_logic() {
    let source = "
r = join {
    a ~ xs
    big = join {b ~ xs; keep = b > a and b}
}
";
    let bindings = run(source, [("xs", ints(&[1, 2]))]).unwrap();
    let r = bindings.get("r").unwrap().as_list().unwrap();
    let keep: Vec<Vec<Value>> = r
        .iter()
        .map(|row| {
            let big = bindings.field(row, "big").unwrap().as_list().unwrap();
            big.iter()
                .map(|inner| bindings.field(inner, "keep").cloned().unwrap())
                .collect()
        })
        .collect();
    assert_eq!(
        keep,
        vec![
            vec![Value::Bool(false), Value::Int(2)],
            vec![Value::Bool(false), Value::Bool(false)],
        ]
    );
}

#[test]
fn error_line_survives_attribute_call_subscript_chain() {
    let source = "f(x) = x\n\n\nv = f(xs[9]).mass";
    let err = run(source, [("xs", ints(&[1]))]).unwrap_err();
    assert_eq!(err.line(), Some(4));
    let tildec::Error::Eval(err) = err else {
        panic!("expected an evaluation error");
    };
    assert_eq!(err.root_cause().kind(), ErrorKind::Index);
    assert_eq!(
        err.to_string(),
        "on line 4, encountered IndexError: index 9 out of range for length 1"
    );
}

#[test]
fn arity_error_reports_definition_line() {
    let source = "\nf(a, b) = a\nr = f(1)";
    let err = run(source, []).unwrap_err();
    let tildec::Error::Eval(err) = err else {
        panic!("expected an evaluation error");
    };
    assert_eq!(
        err.root_cause().to_string(),
        "on line 2, function expects 2 arguments, got 1"
    );
}

#[test]
fn redefinition_is_rejected() {
    let err = run("a = 1\na = 2", []).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Redefinition);
}

#[test]
fn program_reruns_independently() {
    let program = Program::compile("y = x * 2").unwrap();
    let first = program.run([("x", Value::Int(1))]).unwrap();
    let second = program.run([("x", Value::Int(5))]).unwrap();
    assert_eq!(first.get("y"), Some(&Value::Int(2)));
    assert_eq!(second.get("y"), Some(&Value::Int(10)));
}

#[test]
fn run_with_limits() {
    let program = Program::compile("r = join {a ~ xs; b ~ xs}").unwrap();
    let config = EvalConfig {
        max_combinations: Some(8),
        ..EvalConfig::default()
    };
    assert!(program.run_with(config, [("xs", ints(&[1, 2]))]).is_ok());
    let err = program
        .run_with(config, [("xs", ints(&[1, 2, 3]))])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Limit);
}

#[test]
fn to_source_reparses() {
    let source = "quad(x, y) = sqrt(x**2 + y**2)\nr = join {a ~ xs; b = quad(a, 1)}";
    let program = Program::compile(source).unwrap();
    let printed = program.to_source();
    let reparsed = Program::compile(&printed).unwrap();
    assert_eq!(reparsed.to_source(), printed);

    let xs = [("xs", ints(&[0]))];
    let original = program.run(xs.clone()).unwrap();
    let again = reparsed.run(xs).unwrap();
    assert_eq!(
        program.display(original.get("r").unwrap()).to_string(),
        reparsed.display(again.get("r").unwrap()).to_string()
    );
}

#[test]
fn concurrent_runs_share_one_program() {
    let program = Program::compile("r = join {a ~ xs; b ~ xs; s = a + b}").unwrap();
    let program = &program;

    std::thread::scope(|scope| {
        let handles: Vec<_> = (1..=4)
            .map(|n| {
                scope.spawn(move || {
                    let xs = ints(&(0..n).collect::<Vec<_>>());
                    let bindings = program.run([("xs", xs)]).unwrap();
                    bindings.get("r").unwrap().as_list().unwrap().len()
                })
            })
            .collect();
        let counts: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(counts, vec![1, 4, 9, 16]);
    });
}
