//! Render an AST back to source text.
//!
//! Operators come back out in infix form and always parenthesised, so the
//! output re-parses to the same tree shape without a precedence table.
//! Placeholders print as the candidate they stand for.

use crate::ast::{Assignment, ExprKind, Module};
use crate::{ExprArena, ExprId, StringLookup, StmtRange};
use std::fmt::Write;

/// Render `module` one statement per line.
pub fn print_module(arena: &ExprArena, module: &Module, names: &dyn StringLookup) -> String {
    let mut printer = Printer {
        arena,
        names,
        out: String::new(),
    };
    for stmt in arena.get_stmts(module.statements) {
        printer.assignment(stmt);
        printer.out.push('\n');
    }
    printer.out
}

/// Render a single expression.
pub fn print_expr(arena: &ExprArena, expr: ExprId, names: &dyn StringLookup) -> String {
    let mut printer = Printer {
        arena,
        names,
        out: String::new(),
    };
    printer.expr(expr, false);
    printer.out
}

struct Printer<'a> {
    arena: &'a ExprArena,
    names: &'a dyn StringLookup,
    out: String,
}

const BINARY_OPERATORS: &[&str] = &[
    "or", "and", "==", "!=", ">", ">=", "<", "<=", "+", "-", "*", "/", "**",
];

impl Printer<'_> {
    fn assignment(&mut self, stmt: &Assignment) {
        let name = self.names.lookup(stmt.name);
        let _ = write!(self.out, "{name} {} ", stmt.op);
        self.expr(stmt.value, false);
    }

    fn statements(&mut self, stmts: StmtRange) {
        let arena = self.arena;
        for (i, stmt) in arena.get_stmts(stmts).iter().enumerate() {
            if i > 0 {
                self.out.push_str("; ");
            }
            self.assignment(stmt);
        }
    }

    /// `nested` is set when the expression is an operand, where low
    /// precedence forms need parentheses.
    fn expr(&mut self, id: ExprId, nested: bool) {
        let arena = self.arena;
        match &arena.get_expr(id).kind {
            ExprKind::Int(value) => {
                let _ = write!(self.out, "{value}");
            }
            ExprKind::Float(bits) => {
                let _ = write!(self.out, "{:?}", f64::from_bits(*bits));
            }
            ExprKind::Symbol(name) => self.out.push_str(self.names.lookup(*name)),
            ExprKind::Call { func, args } => {
                let args = arena.get_expr_list(*args);
                if !self.operator_call(*func, args) {
                    self.expr(*func, true);
                    self.out.push('(');
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            self.out.push_str(", ");
                        }
                        self.expr(*arg, false);
                    }
                    self.out.push(')');
                }
            }
            ExprKind::Subscript { object, index } => {
                self.expr(*object, true);
                self.out.push('[');
                self.expr(*index, false);
                self.out.push(']');
            }
            ExprKind::Attribute { object, field } => {
                // `1.x` would lex as a float
                if let ExprKind::Int(value) = arena.get_expr(*object).kind {
                    let _ = write!(self.out, "({value})");
                } else {
                    self.expr(*object, true);
                }
                self.out.push('.');
                self.out.push_str(self.names.lookup(*field));
            }
            ExprKind::Slice { start, stop } => {
                if let Some(start) = start {
                    self.expr(*start, false);
                }
                self.out.push(':');
                if let Some(stop) = stop {
                    self.expr(*stop, false);
                }
            }
            ExprKind::Function { params, body } => {
                if nested {
                    self.out.push('(');
                }
                self.out.push('(');
                for (i, param) in arena.get_names(*params).iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.out.push_str(self.names.lookup(*param));
                }
                self.out.push_str(") => ");
                self.expr(*body, false);
                if nested {
                    self.out.push(')');
                }
            }
            ExprKind::Block { stmts, result } => {
                self.out.push('{');
                self.statements(*stmts);
                if !stmts.is_empty() {
                    self.out.push_str("; ");
                }
                self.expr(*result, false);
                self.out.push('}');
            }
            ExprKind::Pattern { assignments, .. } => {
                self.out.push('{');
                self.statements(*assignments);
                self.out.push('}');
            }
            ExprKind::Join { body, .. } => {
                if nested {
                    self.out.push('(');
                }
                self.out.push_str("join ");
                self.expr(*body, false);
                if nested {
                    self.out.push(')');
                }
            }
            ExprKind::Placeholder(placeholder) => match arena.candidate_of(*placeholder) {
                Some(candidate) => self.expr(candidate, nested),
                None => self.out.push_str("<placeholder>"),
            },
        }
    }

    /// Print `func(args)` in operator form if `func` names an operator.
    fn operator_call(&mut self, func: ExprId, args: &[ExprId]) -> bool {
        let ExprKind::Symbol(name) = self.arena.get_expr(func).kind else {
            return false;
        };
        let names = self.names;
        let op = names.lookup(name);
        match args {
            [operand] if matches!(op, "not" | "+" | "-") => {
                let sep = if op == "not" { " " } else { "" };
                let _ = write!(self.out, "({op}{sep}");
                self.expr(*operand, true);
                self.out.push(')');
                true
            }
            [lhs, rhs] if BINARY_OPERATORS.contains(&op) => {
                self.out.push('(');
                self.expr(*lhs, true);
                let _ = write!(self.out, " {op} ");
                self.expr(*rhs, true);
                self.out.push(')');
                true
            }
            _ => false,
        }
    }
}
