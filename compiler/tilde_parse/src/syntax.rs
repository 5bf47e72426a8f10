//! Concrete syntax tree.
//!
//! The grammar produces these generic nodes: a kind label plus ordered
//! children, each either a nested node or a raw token. The tree only lives
//! between parsing and AST construction.

use std::fmt::Write;
use tilde_ir::{Span, StringLookup, Token, TokenKind};

/// Operator labels. Each one names the builtin it is rewritten into.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    Or,
    And,
    Not,
    Eq,
    NotEq,
    Gt,
    GtEq,
    Lt,
    LtEq,
    Add,
    Sub,
    Mul,
    Div,
    Pos,
    Neg,
    Pow,
}

impl Operator {
    /// Builtin name this operator is applied through.
    pub const fn builtin_name(self) -> &'static str {
        match self {
            Operator::Or => "or",
            Operator::And => "and",
            Operator::Not => "not",
            Operator::Eq => "==",
            Operator::NotEq => "!=",
            Operator::Gt => ">",
            Operator::GtEq => ">=",
            Operator::Lt => "<",
            Operator::LtEq => "<=",
            Operator::Add | Operator::Pos => "+",
            Operator::Sub | Operator::Neg => "-",
            Operator::Mul => "*",
            Operator::Div => "/",
            Operator::Pow => "**",
        }
    }

    pub(crate) fn comparison(kind: TokenKind) -> Option<Operator> {
        match kind {
            TokenKind::EqEq => Some(Operator::Eq),
            TokenKind::NotEq => Some(Operator::NotEq),
            TokenKind::Gt => Some(Operator::Gt),
            TokenKind::GtEq => Some(Operator::GtEq),
            TokenKind::Lt => Some(Operator::Lt),
            TokenKind::LtEq => Some(Operator::LtEq),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SyntaxKind {
    Module,
    /// `name OP expr`
    Assignment,
    /// `name(params) = body`
    FuncAssign,
    ParamList,
    /// `params => body`
    Function,
    /// `{ stmts; expr }`
    Block,
    /// `{ assignments }`
    Pattern,
    /// `join expr`
    Join,
    /// `( expr )`, dropped during AST construction.
    Paren,
    Operator(Operator),
    Call,
    ArgList,
    Subscript,
    Slice,
    Attribute,
    Symbol,
    Int,
    Float,
}

impl SyntaxKind {
    /// Label used in tree dumps.
    pub fn label(self) -> &'static str {
        match self {
            SyntaxKind::Module => "Module",
            SyntaxKind::Assignment => "Assignment",
            SyntaxKind::FuncAssign => "FuncAssign",
            SyntaxKind::ParamList => "Params",
            SyntaxKind::Function => "Function",
            SyntaxKind::Block => "Block",
            SyntaxKind::Pattern => "Pattern",
            SyntaxKind::Join => "Join",
            SyntaxKind::Paren => "Paren",
            SyntaxKind::Operator(op) => op.builtin_name(),
            SyntaxKind::Call => "Call",
            SyntaxKind::ArgList => "Args",
            SyntaxKind::Subscript => "Subscript",
            SyntaxKind::Slice => "Slice",
            SyntaxKind::Attribute => "Attribute",
            SyntaxKind::Symbol => "Symbol",
            SyntaxKind::Int => "Int",
            SyntaxKind::Float => "Float",
        }
    }

    /// Whether an item of this kind is a statement rather than an expression.
    #[inline]
    pub fn is_statement(self) -> bool {
        matches!(self, SyntaxKind::Assignment | SyntaxKind::FuncAssign)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SyntaxElement {
    Node(SyntaxNode),
    Token(Token),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyntaxNode {
    pub kind: SyntaxKind,
    pub span: Span,
    pub children: Vec<SyntaxElement>,
}

impl SyntaxNode {
    /// Build a node whose span covers all of its children.
    pub fn new(kind: SyntaxKind, children: Vec<SyntaxElement>) -> Self {
        let span = children
            .iter()
            .map(|child| match child {
                SyntaxElement::Node(node) => node.span,
                SyntaxElement::Token(token) => token.span,
            })
            .reduce(Span::merge)
            .unwrap_or_default();
        SyntaxNode {
            kind,
            span,
            children,
        }
    }

    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn nodes(&self) -> impl Iterator<Item = &SyntaxNode> {
        self.children.iter().filter_map(|child| match child {
            SyntaxElement::Node(node) => Some(node),
            SyntaxElement::Token(_) => None,
        })
    }

    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.children.iter().filter_map(|child| match child {
            SyntaxElement::Token(token) => Some(token),
            SyntaxElement::Node(_) => None,
        })
    }

    /// S-expression dump, e.g. `(Assignment q = (Symbol x))`.
    ///
    /// Punctuation tokens are left out; operator nodes show their operator
    /// as the label.
    pub fn dump(&self, names: &dyn StringLookup) -> String {
        let mut out = String::new();
        self.dump_into(names, &mut out);
        out
    }

    fn dump_into(&self, names: &dyn StringLookup, out: &mut String) {
        out.push('(');
        out.push_str(self.kind.label());
        for child in &self.children {
            match child {
                SyntaxElement::Node(node) => {
                    out.push(' ');
                    node.dump_into(names, out);
                }
                SyntaxElement::Token(token) => {
                    let text = match token.kind {
                        TokenKind::Ident(name) => names.lookup(name).to_string(),
                        TokenKind::Int(value) => value.to_string(),
                        TokenKind::Float(bits) => format!("{:?}", f64::from_bits(bits)),
                        TokenKind::Eq => "=".to_string(),
                        TokenKind::Tilde => "~".to_string(),
                        TokenKind::TildeTilde => "~~".to_string(),
                        TokenKind::BangTilde => "!~".to_string(),
                        TokenKind::BangTildeTilde => "!~~".to_string(),
                        TokenKind::Colon => ":".to_string(),
                        _ => continue,
                    };
                    let _ = write!(out, " {text}");
                }
            }
        }
        out.push(')');
    }
}
