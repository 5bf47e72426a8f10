//! Parser and AST builder for the tilde language.
//!
//! Parsing runs in two passes:
//!
//! 1. [`parse_syntax`]: lex and parse into a concrete [`SyntaxNode`] tree.
//! 2. [`build_ast`]: lower that tree into the flat [`ExprArena`] AST,
//!    registering `~` candidates with their `join`'s matching.
//!
//! [`parse`] runs both.

mod cursor;
mod error;
mod grammar;
mod lower;
pub mod syntax;


pub use error::{ParseError, ParseErrorKind};
pub use syntax::{Operator, SyntaxElement, SyntaxKind, SyntaxNode};

use tilde_ir::{ExprArena, LineIndex, Module, StringInterner};
use tracing::debug;

/// Concrete syntax tree of one source text.
#[derive(Clone, Debug)]
pub struct SyntaxTree {
    pub root: SyntaxNode,
    pub lines: LineIndex,
    source_len: usize,
}

/// Finished AST: the module, the arena holding its nodes and matchings, and
/// the line table for diagnostics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseOutput {
    pub module: Module,
    pub arena: ExprArena,
    pub lines: LineIndex,
}

impl ParseOutput {
    /// 1-based line of a span, for diagnostics.
    #[inline]
    pub fn line_of(&self, span: tilde_ir::Span) -> u32 {
        self.lines.line_of(span)
    }
}

/// Lex and parse `source` into a concrete syntax tree.
#[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
pub fn parse_syntax(source: &str, interner: &StringInterner) -> Result<SyntaxTree, ParseError> {
    let lines = LineIndex::new(source);
    let tokens =
        tilde_lexer::lex(source, interner).map_err(|err| ParseError::from_lex(err, &lines))?;
    debug!(tokens = tokens.len(), "lexed");

    let eof = tokens.as_slice().last().map_or(0, |t| t.span.end);
    let root = grammar::Parser::new(&tokens, &lines).parse_module(eof)?;
    Ok(SyntaxTree {
        root,
        lines,
        source_len: source.len(),
    })
}

/// Lower a syntax tree into the AST.
#[tracing::instrument(level = "debug", skip_all)]
pub fn build_ast(tree: SyntaxTree, interner: &StringInterner) -> Result<ParseOutput, ParseError> {
    let builder = lower::AstBuilder::new(interner, &tree.lines, tree.source_len);
    let (module, arena) = builder.build_module(&tree.root)?;
    debug!(
        statements = module.statements.len(),
        exprs = arena.expr_count(),
        matchings = arena.matching_count(),
        "built AST"
    );
    Ok(ParseOutput {
        module,
        arena,
        lines: tree.lines,
    })
}

/// Parse `source` into an AST.
pub fn parse(source: &str, interner: &StringInterner) -> Result<ParseOutput, ParseError> {
    let tree = parse_syntax(source, interner)?;
    build_ast(tree, interner)
}
