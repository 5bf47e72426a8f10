//! Recursive descent grammar producing the concrete syntax tree.
//!
//! Statement level lives here; the expression precedence chain is in
//! `expr`, postfix forms and atoms in `primary`.

mod expr;
mod primary;

use crate::cursor::Cursor;
use crate::syntax::{SyntaxElement, SyntaxKind, SyntaxNode};
use crate::{ParseError, ParseErrorKind};
use tilde_ir::{LineIndex, Span, Token, TokenKind, TokenList};

pub(crate) struct Parser<'a> {
    cursor: Cursor<'a>,
    lines: &'a LineIndex,
    /// Depth of open `(` / `[`; newlines are insignificant while non-zero.
    nesting: u32,
}

type ParseResult<T = SyntaxNode> = Result<T, ParseError>;

impl<'a> Parser<'a> {
    pub(crate) fn new(tokens: &'a TokenList, lines: &'a LineIndex) -> Self {
        Parser {
            cursor: Cursor::new(tokens),
            lines,
            nesting: 0,
        }
    }

    // ===== Token helpers =====

    /// Kind of the next significant token.
    fn current(&mut self) -> TokenKind {
        if self.nesting > 0 {
            self.cursor.skip_newlines();
        }
        self.cursor.current_kind()
    }

    #[inline]
    fn check(&mut self, kind: TokenKind) -> bool {
        self.current() == kind
    }

    fn advance(&mut self) -> Token {
        self.current();
        self.cursor.advance()
    }

    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> ParseResult<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn expect_ident(&mut self, expected: &'static str) -> ParseResult<Token> {
        if matches!(self.current(), TokenKind::Ident(_)) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(expected))
        }
    }

    #[cold]
    fn unexpected(&mut self, expected: &'static str) -> ParseError {
        self.current();
        let token = self.cursor.current();
        self.error(
            ParseErrorKind::UnexpectedToken {
                expected,
                found: token.kind.describe(),
            },
            token.span,
        )
    }

    #[cold]
    fn error(&self, kind: ParseErrorKind, span: Span) -> ParseError {
        ParseError::new(kind, span, self.lines)
    }

    // ===== Statements =====

    /// Parse a whole source file.
    pub(crate) fn parse_module(&mut self, source_len: u32) -> ParseResult {
        let mut children = Vec::new();
        self.cursor.skip_separators();
        while !self.cursor.is_at_end() {
            let item = self.parse_item()?;
            if !item.kind.is_statement() {
                return Err(self.error(ParseErrorKind::ExpectedAssignment, item.span));
            }
            children.push(SyntaxElement::Node(item));
            self.expect_separator()?;
            self.cursor.skip_separators();
        }
        Ok(SyntaxNode::new(SyntaxKind::Module, children).with_span(Span::new(0, source_len)))
    }

    /// After an item: a newline, `;`, closing brace or end of input.
    fn expect_separator(&mut self) -> ParseResult<()> {
        match self.cursor.current_kind() {
            kind if kind.is_separator() => Ok(()),
            TokenKind::Eof | TokenKind::RBrace => Ok(()),
            _ => Err(self.unexpected("newline or `;`")),
        }
    }

    /// One entry of a module, block or pattern: a statement or an expression.
    fn parse_item(&mut self) -> ParseResult {
        if let TokenKind::Ident(_) = self.current() {
            match self.cursor.peek_kind_at(1) {
                TokenKind::Eq
                | TokenKind::Tilde
                | TokenKind::TildeTilde
                | TokenKind::BangTilde
                | TokenKind::BangTildeTilde => return self.parse_binding(),
                TokenKind::LParen if self.cursor.paren_group_followed_by(1, TokenKind::Eq) => {
                    return self.parse_func_assign();
                }
                _ => {}
            }
        }
        self.parse_expr()
    }

    /// `name OP expr`
    fn parse_binding(&mut self) -> ParseResult {
        let name = self.advance();
        let op = self.advance();
        self.cursor.skip_newlines();
        let value = self.parse_expr()?;
        Ok(SyntaxNode::new(
            SyntaxKind::Assignment,
            vec![
                SyntaxElement::Token(name),
                SyntaxElement::Token(op),
                SyntaxElement::Node(value),
            ],
        ))
    }

    /// `name(params) = body`
    fn parse_func_assign(&mut self) -> ParseResult {
        let name = self.advance();
        let params = self.parse_param_list()?;
        let eq = self.expect(TokenKind::Eq, "`=`")?;
        self.cursor.skip_newlines();
        let body = self.parse_expr()?;
        Ok(SyntaxNode::new(
            SyntaxKind::FuncAssign,
            vec![
                SyntaxElement::Token(name),
                SyntaxElement::Node(params),
                SyntaxElement::Token(eq),
                SyntaxElement::Node(body),
            ],
        ))
    }

    /// `( name, ... )`
    fn parse_param_list(&mut self) -> ParseResult {
        let open = self.expect(TokenKind::LParen, "`(`")?;
        self.nesting += 1;
        let mut children = vec![SyntaxElement::Token(open)];
        while !self.check(TokenKind::RParen) {
            children.push(SyntaxElement::Token(self.expect_ident("parameter name")?));
            if self.check(TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        let close = self.expect(TokenKind::RParen, "`)`")?;
        self.nesting -= 1;
        children.push(SyntaxElement::Token(close));
        Ok(SyntaxNode::new(SyntaxKind::ParamList, children))
    }

    /// `{ ... }` as a block (last item is an expression) or a pattern (last
    /// item is an assignment).
    fn parse_braces(&mut self) -> ParseResult {
        let open = self.expect(TokenKind::LBrace, "`{`")?;
        let saved = std::mem::replace(&mut self.nesting, 0);
        self.cursor.skip_separators();

        let mut items: Vec<SyntaxNode> = Vec::new();
        while !self.cursor.is_at_end() && !self.check(TokenKind::RBrace) {
            items.push(self.parse_item()?);
            self.expect_separator()?;
            self.cursor.skip_separators();
        }
        let close = self.expect(TokenKind::RBrace, "`}`")?;
        self.nesting = saved;

        let span = open.span.merge(close.span);
        let Some(last) = items.last() else {
            return Err(self.error(ParseErrorKind::EmptyBraces, span));
        };
        let kind = if last.kind.is_statement() {
            SyntaxKind::Pattern
        } else {
            SyntaxKind::Block
        };
        let body_len = if kind == SyntaxKind::Block {
            items.len() - 1
        } else {
            items.len()
        };
        if let Some(stray) = items[..body_len].iter().find(|i| !i.kind.is_statement()) {
            return Err(self.error(ParseErrorKind::ExpectedAssignment, stray.span));
        }

        let children = items.into_iter().map(SyntaxElement::Node).collect();
        Ok(SyntaxNode::new(kind, children).with_span(span))
    }
}
