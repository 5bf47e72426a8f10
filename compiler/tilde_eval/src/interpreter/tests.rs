#![allow(clippy::unwrap_used, reason = "tests unwrap evaluation results")]

use super::*;
use crate::ErrorKind;
use pretty_assertions::assert_eq;
use tilde_parse::{parse, ParseOutput};

struct Fixture {
    interner: StringInterner,
    out: ParseOutput,
}

impl Fixture {
    fn new(source: &str) -> Self {
        let interner = StringInterner::new();
        let out = parse(source, &interner).unwrap();
        Fixture { interner, out }
    }

    fn builder(&self) -> InterpreterBuilder<'_> {
        InterpreterBuilder::new(&self.interner, &self.out.arena, &self.out.lines)
    }

    /// Evaluate with `globals` bound first, returning the interpreter even
    /// when evaluation fails.
    fn eval_with<'a>(
        &'a self,
        builder: InterpreterBuilder<'a>,
        globals: Vec<(&str, Value)>,
    ) -> (Interpreter<'a>, EvalResult<()>) {
        let mut interp = builder.build();
        for (name, value) in globals {
            interp.define_global(name, value).unwrap();
        }
        let result = interp.eval_module(&self.out.module);
        (interp, result)
    }

    fn run(&self) -> Interpreter<'_> {
        let (interp, result) = self.eval_with(self.builder(), Vec::new());
        result.unwrap();
        interp
    }

    fn run_err(&self) -> EvalError {
        let (_, result) = self.eval_with(self.builder(), Vec::new());
        result.unwrap_err()
    }
}

fn ints(values: &[i64]) -> Value {
    Value::list(values.iter().copied().map(Value::Int).collect())
}

fn get(interp: &Interpreter<'_>, name: &str) -> Value {
    interp.lookup_global(name).cloned().unwrap()
}

/// Field `name` of every record in the list bound to `list`.
fn column(fixture: &Fixture, interp: &Interpreter<'_>, list: &str, name: &str) -> Vec<Value> {
    get(interp, list)
        .as_list()
        .unwrap()
        .iter()
        .map(|row| {
            row.as_record()
                .unwrap()
                .get(name, &fixture.interner)
                .cloned()
                .unwrap()
        })
        .collect()
}

#[test]
fn test_arithmetic() {
    let fixture =
        Fixture::new("a = 1 + 2 * 3\nb = 7 / 2\nc = 2 ** 10\nd = 2 ** -1\ne = 10 - 2 - 3");
    let interp = fixture.run();
    assert_eq!(get(&interp, "a"), Value::Int(7));
    assert_eq!(get(&interp, "b"), Value::Float(3.5));
    assert_eq!(get(&interp, "c"), Value::Int(1024));
    assert_eq!(get(&interp, "d"), Value::Float(0.5));
    assert_eq!(get(&interp, "e"), Value::Int(5));
}

#[test]
fn test_function_definition_and_call() {
    let fixture = Fixture::new("quad(x, y) = sqrt(x**2 + y**2)\nq = quad(3, 4)");
    let interp = fixture.run();
    assert_eq!(get(&interp, "q"), Value::Float(5.0));
    assert!(matches!(get(&interp, "quad"), Value::Function(_)));
}

#[test]
fn test_closures_resolve_lexically() {
    let fixture = Fixture::new(
        "k = 10\nadd(x) = x + k\nr = add(1)\nmake(n) = (x) => x + n\nadd5 = make(5)\ns = add5(1)",
    );
    let interp = fixture.run();
    assert_eq!(get(&interp, "r"), Value::Int(11));
    assert_eq!(get(&interp, "s"), Value::Int(6));
}

#[test]
fn test_recursion() {
    let fixture = Fixture::new("fact(n) = n <= 1 and 1 or n * fact(n - 1)\nr = fact(10)");
    let interp = fixture.run();
    assert_eq!(get(&interp, "r"), Value::Int(3_628_800));
}

#[test]
fn test_parameters_and_blocks_shadow_outer_names() {
    let fixture = Fixture::new("x = 1\nf(x) = x * 2\nr = f(5)\nb = {x = 2; x + 1}\ns = x");
    let interp = fixture.run();
    assert_eq!(get(&interp, "r"), Value::Int(10));
    assert_eq!(get(&interp, "b"), Value::Int(3));
    assert_eq!(get(&interp, "s"), Value::Int(1));
}

#[test]
fn test_redefinition_keeps_earlier_bindings() {
    let fixture = Fixture::new("x = 1\ny = 2\nx = 3");
    let (interp, result) = fixture.eval_with(fixture.builder(), Vec::new());
    let err = result.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Redefinition);
    assert_eq!(err.to_string(), "name `x` is already defined in this scope");
    assert_eq!(get(&interp, "x"), Value::Int(1));
    assert_eq!(get(&interp, "y"), Value::Int(2));
}

#[test]
fn test_duplicate_parameter_is_redefinition() {
    let fixture = Fixture::new("f(a, a) = a\nr = f(1, 2)");
    let err = fixture.run_err();
    assert_eq!(err.root_cause().kind(), ErrorKind::Redefinition);
}

#[test]
fn test_undefined_name_reports_line() {
    let fixture = Fixture::new("a = 1\n\ny = z + 1");
    let err = fixture.run_err();
    assert_eq!(err.kind(), ErrorKind::Runtime);
    assert_eq!(err.line(), Some(3));
    assert_eq!(err.root_cause().kind(), ErrorKind::Name);
}

#[test]
fn test_arity_error_cites_definition_line() {
    let fixture = Fixture::new("f(a) = a\n\nr = f(1, 2)");
    let err = fixture.run_err();
    assert_eq!(err.line(), Some(3));
    let cause = err.root_cause();
    assert_eq!(cause.kind(), ErrorKind::Arity);
    assert_eq!(
        cause.to_string(),
        "on line 1, function expects 1 arguments, got 2"
    );
}

#[test]
fn test_runtime_error_message() {
    let fixture = Fixture::new("xs = 1\ny = xs[0]");
    let err = fixture.run_err();
    assert_eq!(
        err.to_string(),
        "on line 2, encountered TypeError: `int` object is not subscriptable"
    );
}

#[test]
fn test_logic_returns_deciding_operand() {
    let fixture =
        Fixture::new("a = 0 or 5\nb = 3 and 0\nc = not 0\nd = 0 and missing\ne = 2 or missing");
    let interp = fixture.run();
    assert_eq!(get(&interp, "a"), Value::Int(5));
    assert_eq!(get(&interp, "b"), Value::Int(0));
    assert_eq!(get(&interp, "c"), Value::Bool(true));
    assert_eq!(get(&interp, "d"), Value::Int(0));
    assert_eq!(get(&interp, "e"), Value::Int(2));
}

#[test]
fn test_subscripts_and_slices() {
    let fixture = Fixture::new("a = xs[-1]\nb = xs[1:3]\nc = xs[:]\nd = xs[-2:]");
    let (interp, result) = fixture.eval_with(fixture.builder(), vec![("xs", ints(&[1, 2, 3, 4]))]);
    result.unwrap();
    assert_eq!(get(&interp, "a"), Value::Int(4));
    assert_eq!(get(&interp, "b"), ints(&[2, 3]));
    assert_eq!(get(&interp, "c"), ints(&[1, 2, 3, 4]));
    assert_eq!(get(&interp, "d"), ints(&[3, 4]));
}

#[test]
fn test_index_out_of_range() {
    let fixture = Fixture::new("a = xs[5]");
    let (_, result) = fixture.eval_with(fixture.builder(), vec![("xs", ints(&[1]))]);
    let err = result.unwrap_err();
    assert_eq!(err.root_cause().kind(), ErrorKind::Index);
}

#[test]
fn test_pattern_fields_and_attributes() {
    let fixture = Fixture::new("p = {a = 1; b = a + 1}\nv = p.b");
    let interp = fixture.run();
    assert_eq!(get(&interp, "v"), Value::Int(2));
    let record = get(&interp, "p");
    assert_eq!(record.as_record().unwrap().identity().index, None);

    let err = Fixture::new("p = {a = 1}\nv = p.c").run_err();
    assert_eq!(err.root_cause().kind(), ErrorKind::Attribute);
}

#[test]
fn test_identical_patterns_are_distinct() {
    let fixture = Fixture::new("p = {a = 1}\nq = {a = 1}");
    let interp = fixture.run();
    assert_ne!(get(&interp, "p"), get(&interp, "q"));
}

#[test]
fn test_not_callable() {
    let err = Fixture::new("x = 1\ny = x(2)").run_err();
    assert_eq!(err.root_cause().kind(), ErrorKind::Type);
    assert_eq!(err.line(), Some(2));
}

#[test]
fn test_join_enumerates_in_row_major_order() {
    let fixture = Fixture::new("pairs = join {xi ~ x; yi ~ y}");
    let globals = vec![("x", ints(&[1, 2, 3])), ("y", ints(&[10, 20]))];
    let (interp, result) = fixture.eval_with(fixture.builder(), globals);
    result.unwrap();

    let xs = column(&fixture, &interp, "pairs", "xi");
    let ys = column(&fixture, &interp, "pairs", "yi");
    assert_eq!(xs, ints(&[1, 1, 2, 2, 3, 3]).as_list().unwrap());
    assert_eq!(ys, ints(&[10, 20, 10, 20, 10, 20]).as_list().unwrap());

    let indices: Vec<_> = get(&interp, "pairs")
        .as_list()
        .unwrap()
        .iter()
        .map(|row| row.as_record().unwrap().identity().index)
        .collect();
    assert_eq!(indices, (0..6).map(Some).collect::<Vec<_>>());
}

#[test]
fn test_join_body_computes_fields() {
    let fixture = Fixture::new("r = join {a ~ xs; b = a * 2}");
    let (interp, result) = fixture.eval_with(fixture.builder(), vec![("xs", ints(&[1, 2, 3]))]);
    result.unwrap();
    assert_eq!(
        column(&fixture, &interp, "r", "b"),
        ints(&[2, 4, 6]).as_list().unwrap()
    );
}

#[test]
fn test_join_with_empty_candidate_is_empty() {
    let fixture = Fixture::new("r = join {a ~ xs; b ~ ys}");
    let globals = vec![("xs", ints(&[1, 2])), ("ys", ints(&[]))];
    let (interp, result) = fixture.eval_with(fixture.builder(), globals);
    result.unwrap();
    assert_eq!(get(&interp, "r"), ints(&[]));
}

#[test]
fn test_join_without_candidates_runs_once() {
    let fixture = Fixture::new("r = join {a = 1}");
    let interp = fixture.run();
    let rows = get(&interp, "r");
    let rows = rows.as_list().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].as_record().unwrap().identity().index, Some(0));
}

#[test]
fn test_nested_join_sees_outer_placeholder() {
    let fixture = Fixture::new("r = join {a ~ xs; inner = join {b ~ ys; s = a + b}}");
    let globals = vec![("xs", ints(&[1, 2])), ("ys", ints(&[10, 20]))];
    let (interp, result) = fixture.eval_with(fixture.builder(), globals);
    result.unwrap();

    let sums: Vec<Vec<Value>> = get(&interp, "r")
        .as_list()
        .unwrap()
        .iter()
        .map(|row| {
            let inner = row
                .as_record()
                .unwrap()
                .get("inner", &fixture.interner)
                .unwrap()
                .as_list()
                .unwrap();
            inner
                .iter()
                .map(|r| r.as_record().unwrap().get("s", &fixture.interner).cloned().unwrap())
                .collect()
        })
        .collect();
    assert_eq!(
        sums,
        vec![
            vec![Value::Int(11), Value::Int(21)],
            vec![Value::Int(12), Value::Int(22)],
        ]
    );
}

#[test]
fn test_join_over_string_candidates() {
    let fixture = Fixture::new("r = join {c ~ s}");
    let (interp, result) = fixture.eval_with(fixture.builder(), vec![("s", Value::from("ab"))]);
    result.unwrap();
    assert_eq!(
        column(&fixture, &interp, "r", "c"),
        vec![Value::from("a"), Value::from("b")]
    );
}

#[test]
fn test_join_candidate_must_be_iterable() {
    let fixture = Fixture::new("n = 3\nr = join {c ~ n}");
    let err = fixture.run_err();
    assert_eq!(err.root_cause().kind(), ErrorKind::Type);
    assert_eq!(err.line(), Some(2));
}

#[test]
fn test_combination_limit() {
    let fixture = Fixture::new("r = join {a ~ xs; b ~ xs}");
    let builder = fixture.builder().max_combinations(Some(3));
    let (_, result) = fixture.eval_with(builder, vec![("xs", ints(&[1, 2]))]);
    let err = result.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Limit);
    assert_eq!(
        err.to_string(),
        "join would produce 4 combinations, over the limit of 3"
    );
}

#[test]
fn test_recursion_limit() {
    let fixture = Fixture::new("f(n) = f(n)\nr = f(1)");
    let builder = fixture.builder().max_call_depth(Some(64));
    let (interp, result) = fixture.eval_with(builder, Vec::new());
    let err = result.unwrap_err();
    assert_eq!(err.root_cause().kind(), ErrorKind::Limit);
    assert_eq!(err.line(), Some(2));
    assert_eq!(interp.depth, 0);
}

#[test]
fn test_functions_do_not_cross_sessions() {
    let first = Fixture::new("f(x) = x");
    let f = get(&first.run(), "f");

    let second = Fixture::new("r = g(1)");
    let (_, result) = second.eval_with(second.builder(), vec![("g", f)]);
    let err = result.unwrap_err();
    assert!(matches!(err.root_cause(), EvalError::ForeignFunction));
}

#[test]
fn test_bindings_in_definition_order() {
    let fixture = Fixture::new("b = 1\na = 2");
    let (interp, result) = fixture.eval_with(fixture.builder(), vec![("x", Value::Int(0))]);
    result.unwrap();
    let names: Vec<_> = interp.bindings().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["x", "b", "a"]);
}

#[test]
fn test_caller_binding_cannot_be_redefined() {
    let fixture = Fixture::new("x = 2");
    let (_, result) = fixture.eval_with(fixture.builder(), vec![("x", Value::Int(1))]);
    assert_eq!(result.unwrap_err().kind(), ErrorKind::Redefinition);
}

#[test]
fn test_placeholder_in_candidate_reports_line() {
    let fixture = Fixture::new("a = 1\nr = join {\n    z ~ {m ~ xs}\n}");
    let (_, result) = fixture.eval_with(fixture.builder(), vec![("xs", ints(&[1, 2]))]);
    let err = result.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Runtime);
    assert_eq!(err.line(), Some(3));
    assert_eq!(err.root_cause().kind(), ErrorKind::Matching);
}

#[test]
fn test_scopes_are_released_after_calls_and_joins() {
    let fixture =
        Fixture::new("f(n) = n > 0 and f(n - 1)\nr = f(500)\ns = join {a ~ xs; b = f(3)}");
    let xs: Vec<i64> = (0..10_000).collect();
    let (interp, result) = fixture.eval_with(fixture.builder(), vec![("xs", ints(&xs))]);
    result.unwrap();
    assert_eq!(get(&interp, "r"), Value::Bool(false));
    assert_eq!(get(&interp, "s").as_list().unwrap().len(), 10_000);
    // Builtins and globals.
    assert_eq!(interp.environment().scope_count(), 2);
}

#[test]
fn test_captured_scopes_survive_release() {
    let fixture = Fixture::new(
        "mk(a) = (b) => a + b\ng = mk(1)\nh = mk(10)\nx = g(2)\ny = h(3)\n\
         r = join {a ~ xs; add = (b) => a + b}\np = r[0].add(5)\nq = r[1].add(5)",
    );
    let (interp, result) = fixture.eval_with(fixture.builder(), vec![("xs", ints(&[100, 200]))]);
    result.unwrap();
    assert_eq!(get(&interp, "x"), Value::Int(3));
    assert_eq!(get(&interp, "y"), Value::Int(13));
    assert_eq!(get(&interp, "p"), Value::Int(105));
    assert_eq!(get(&interp, "q"), Value::Int(205));
}
