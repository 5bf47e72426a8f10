//! AST construction from the concrete syntax tree.
//!
//! Every `build_*` method takes the current matching context: `None`
//! outside any `join`, or the matching of the innermost enclosing `join`.
//!
//! - `join expr` mints a new matching and builds `expr` under it.
//! - A `~`-family assignment builds its right-hand side, registers it with
//!   the active matching and binds the returned placeholder instead.
//!   Without an active matching it is a syntax error.
//! - Pattern blocks reuse the active matching and mint a fresh identity tag.
//! - Function bodies are built with no matching, so placeholders never leak
//!   into closures.
//! - Operator nodes become `Call(Symbol(op), operands)`.

use crate::syntax::{SyntaxElement, SyntaxKind, SyntaxNode};
use crate::{ParseError, ParseErrorKind};
use tilde_ir::{
    Assignment, BindOp, Expr, ExprArena, ExprId, ExprKind, LineIndex, MatchingId, Module, Name,
    NameRange, Span, StmtRange, StringInterner, Token, TokenKind,
};
use tilde_stack::ensure_sufficient_stack;

type BuildResult<T = ExprId> = Result<T, ParseError>;

pub(crate) struct AstBuilder<'a> {
    arena: ExprArena,
    interner: &'a StringInterner,
    lines: &'a LineIndex,
}

impl<'a> AstBuilder<'a> {
    pub(crate) fn new(
        interner: &'a StringInterner,
        lines: &'a LineIndex,
        source_len: usize,
    ) -> Self {
        AstBuilder {
            arena: ExprArena::with_capacity(source_len),
            interner,
            lines,
        }
    }

    /// Build the module and hand over the finished arena.
    pub(crate) fn build_module(mut self, root: &SyntaxNode) -> BuildResult<(Module, ExprArena)> {
        let stmts = root.nodes().collect::<Vec<_>>();
        let statements = self.build_statements(&stmts, None)?;
        let module = Module {
            statements,
            span: root.span,
        };
        Ok((module, self.arena))
    }

    #[cold]
    fn malformed(&self, what: &'static str, span: Span) -> ParseError {
        ParseError::new(ParseErrorKind::MalformedTree { what }, span, self.lines)
    }

    fn nth_node<'n>(
        &self,
        node: &'n SyntaxNode,
        n: usize,
        what: &'static str,
    ) -> BuildResult<&'n SyntaxNode> {
        node.nodes()
            .nth(n)
            .ok_or_else(|| self.malformed(what, node.span))
    }

    fn nth_token(&self, node: &SyntaxNode, n: usize, what: &'static str) -> BuildResult<Token> {
        node.tokens()
            .nth(n)
            .copied()
            .ok_or_else(|| self.malformed(what, node.span))
    }

    fn token_name(&self, token: Token, node: &SyntaxNode) -> BuildResult<Name> {
        match token.kind {
            TokenKind::Ident(name) => Ok(name),
            _ => Err(self.malformed("identifier", node.span)),
        }
    }

    #[inline]
    fn alloc(&mut self, kind: ExprKind, span: Span) -> ExprId {
        self.arena.alloc_expr(Expr::new(kind, span))
    }

    // ===== Statements =====

    /// Build a body and store it contiguously in the arena.
    fn build_statements(
        &mut self,
        nodes: &[&SyntaxNode],
        matching: Option<MatchingId>,
    ) -> BuildResult<StmtRange> {
        let mut stmts = Vec::with_capacity(nodes.len());
        for node in nodes {
            stmts.push(self.build_statement(node, matching)?);
        }
        Ok(self.arena.alloc_stmts(stmts))
    }

    fn build_statement(
        &mut self,
        node: &SyntaxNode,
        matching: Option<MatchingId>,
    ) -> BuildResult<Assignment> {
        match node.kind {
            SyntaxKind::Assignment => self.build_assignment(node, matching),
            SyntaxKind::FuncAssign => {
                let name_token = self.nth_token(node, 0, "function name")?;
                let name = self.token_name(name_token, node)?;
                let params_node = self.nth_node(node, 0, "parameter list")?;
                let body_node = self.nth_node(node, 1, "function body")?;
                let params = self.build_params(params_node);
                let body = self.build_expr(body_node, None)?;
                let value = self.alloc(ExprKind::Function { params, body }, node.span);
                Ok(Assignment {
                    name,
                    op: BindOp::Assign,
                    value,
                    span: node.span,
                })
            }
            _ => Err(ParseError::new(
                ParseErrorKind::ExpectedAssignment,
                node.span,
                self.lines,
            )),
        }
    }

    fn build_assignment(
        &mut self,
        node: &SyntaxNode,
        matching: Option<MatchingId>,
    ) -> BuildResult<Assignment> {
        let name_token = self.nth_token(node, 0, "assignment target")?;
        let name = self.token_name(name_token, node)?;
        let op_token = self.nth_token(node, 1, "assignment operator")?;
        let value_node = self.nth_node(node, 0, "assigned expression")?;

        let op = match op_token.kind {
            TokenKind::Eq => BindOp::Assign,
            TokenKind::Tilde => BindOp::Tilde,
            TokenKind::TildeTilde => BindOp::TildeTilde,
            TokenKind::BangTilde => BindOp::BangTilde,
            TokenKind::BangTildeTilde => BindOp::BangTildeTilde,
            _ => return Err(self.malformed("assignment operator", op_token.span)),
        };

        let value = if op.is_matching() {
            let Some(active) = matching else {
                return Err(ParseError::new(
                    ParseErrorKind::MatchingOutsideJoin { op },
                    op_token.span,
                    self.lines,
                ));
            };
            let candidate = self.build_expr(value_node, matching)?;
            self.arena.register_candidate(active, candidate)
        } else {
            self.build_expr(value_node, matching)?
        };

        Ok(Assignment {
            name,
            op,
            value,
            span: node.span,
        })
    }

    fn build_params(&mut self, node: &SyntaxNode) -> NameRange {
        let names: Vec<Name> = node
            .tokens()
            .filter_map(|token| match token.kind {
                TokenKind::Ident(name) => Some(name),
                _ => None,
            })
            .collect();
        self.arena.alloc_names(names)
    }

    // ===== Expressions =====

    pub(crate) fn build_expr(
        &mut self,
        node: &SyntaxNode,
        matching: Option<MatchingId>,
    ) -> BuildResult {
        ensure_sufficient_stack(|| self.build_expr_inner(node, matching))
    }

    fn build_expr_inner(
        &mut self,
        node: &SyntaxNode,
        matching: Option<MatchingId>,
    ) -> BuildResult {
        let span = node.span;
        match node.kind {
            SyntaxKind::Int => match self.nth_token(node, 0, "integer")?.kind {
                TokenKind::Int(value) => Ok(self.alloc(ExprKind::Int(value), span)),
                _ => Err(self.malformed("integer", span)),
            },
            SyntaxKind::Float => match self.nth_token(node, 0, "float")?.kind {
                TokenKind::Float(bits) => Ok(self.alloc(ExprKind::Float(bits), span)),
                _ => Err(self.malformed("float", span)),
            },
            SyntaxKind::Symbol => {
                let token = self.nth_token(node, 0, "symbol")?;
                let name = self.token_name(token, node)?;
                Ok(self.alloc(ExprKind::Symbol(name), span))
            }
            SyntaxKind::Paren => {
                let inner = self.nth_node(node, 0, "parenthesised expression")?;
                self.build_expr(inner, matching)
            }
            SyntaxKind::Operator(op) => {
                let token = self.nth_token(node, 0, "operator")?;
                let op_name = self.interner.intern(op.builtin_name());
                let func = self.alloc(ExprKind::Symbol(op_name), token.span);
                let mut operands = Vec::with_capacity(2);
                for operand in node.nodes() {
                    operands.push(self.build_expr(operand, matching)?);
                }
                let args = self.arena.alloc_expr_list(operands);
                Ok(self.alloc(ExprKind::Call { func, args }, span))
            }
            SyntaxKind::Call => {
                let callee = self.nth_node(node, 0, "callee")?;
                let arg_list = self.nth_node(node, 1, "argument list")?;
                let func = self.build_expr(callee, matching)?;
                let mut args = Vec::new();
                for arg in arg_list.nodes() {
                    args.push(self.build_expr(arg, matching)?);
                }
                let args = self.arena.alloc_expr_list(args);
                Ok(self.alloc(ExprKind::Call { func, args }, span))
            }
            SyntaxKind::Subscript => {
                let object = self.nth_node(node, 0, "subscripted expression")?;
                let index = self.nth_node(node, 1, "subscript index")?;
                let object = self.build_expr(object, matching)?;
                let index = self.build_expr(index, matching)?;
                Ok(self.alloc(ExprKind::Subscript { object, index }, span))
            }
            SyntaxKind::Slice => self.build_slice(node, matching),
            SyntaxKind::Attribute => {
                let object = self.nth_node(node, 0, "attribute target")?;
                let field_token = self.nth_token(node, 1, "attribute name")?;
                let field = self.token_name(field_token, node)?;
                let object = self.build_expr(object, matching)?;
                Ok(self.alloc(ExprKind::Attribute { object, field }, span))
            }
            SyntaxKind::Function => {
                let params = self.nth_node(node, 0, "parameter list")?;
                let body = self.nth_node(node, 1, "function body")?;
                let params = self.build_params(params);
                let body = self.build_expr(body, None)?;
                Ok(self.alloc(ExprKind::Function { params, body }, span))
            }
            SyntaxKind::Block => {
                let items: Vec<&SyntaxNode> = node.nodes().collect();
                let Some((result, stmts)) = items.split_last() else {
                    return Err(self.malformed("block result", span));
                };
                if stmts.is_empty() {
                    return self.build_expr(result, matching);
                }
                let stmts = self.build_statements(stmts, matching)?;
                let result = self.build_expr(result, matching)?;
                Ok(self.alloc(ExprKind::Block { stmts, result }, span))
            }
            SyntaxKind::Pattern => {
                let tag = self.arena.mint_pattern_tag();
                let items: Vec<&SyntaxNode> = node.nodes().collect();
                let assignments = self.build_statements(&items, matching)?;
                Ok(self.alloc(
                    ExprKind::Pattern {
                        assignments,
                        matching,
                        tag,
                    },
                    span,
                ))
            }
            SyntaxKind::Join => {
                let body = self.nth_node(node, 0, "join body")?;
                let joined = self.arena.new_matching();
                let body = self.build_expr(body, Some(joined))?;
                Ok(self.alloc(
                    ExprKind::Join {
                        body,
                        matching: joined,
                    },
                    span,
                ))
            }
            SyntaxKind::Module
            | SyntaxKind::Assignment
            | SyntaxKind::FuncAssign
            | SyntaxKind::ParamList
            | SyntaxKind::ArgList => Err(self.malformed("expression", span)),
        }
    }

    /// Children are `[start] : [stop]`; the colon token splits them.
    fn build_slice(&mut self, node: &SyntaxNode, matching: Option<MatchingId>) -> BuildResult {
        let mut start = None;
        let mut stop = None;
        let mut seen_colon = false;
        for child in &node.children {
            match child {
                SyntaxElement::Token(token) if token.kind == TokenKind::Colon => seen_colon = true,
                SyntaxElement::Token(_) => {}
                SyntaxElement::Node(bound) => {
                    let id = self.build_expr(bound, matching)?;
                    if seen_colon {
                        stop = Some(id);
                    } else {
                        start = Some(id);
                    }
                }
            }
        }
        Ok(self.alloc(ExprKind::Slice { start, stop }, node.span))
    }
}
