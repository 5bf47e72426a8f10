//! Postfix forms (call, subscript, attribute) and atoms.

use super::{ParseResult, Parser};
use crate::syntax::{SyntaxElement, SyntaxKind, SyntaxNode};
use tilde_ir::TokenKind;

impl Parser<'_> {
    pub(super) fn parse_postfix(&mut self) -> ParseResult {
        let mut expr = self.parse_atom()?;
        loop {
            expr = match self.current() {
                TokenKind::LParen => {
                    let args = self.parse_args()?;
                    SyntaxNode::new(
                        SyntaxKind::Call,
                        vec![SyntaxElement::Node(expr), SyntaxElement::Node(args)],
                    )
                }
                TokenKind::LBracket => {
                    let open = self.advance();
                    self.nesting += 1;
                    let index = self.parse_subscript_index()?;
                    let close = self.expect(TokenKind::RBracket, "`]`")?;
                    self.nesting -= 1;
                    SyntaxNode::new(
                        SyntaxKind::Subscript,
                        vec![
                            SyntaxElement::Node(expr),
                            SyntaxElement::Token(open),
                            SyntaxElement::Node(index),
                            SyntaxElement::Token(close),
                        ],
                    )
                }
                TokenKind::Dot => {
                    let dot = self.advance();
                    let field = self.expect_ident("attribute name")?;
                    SyntaxNode::new(
                        SyntaxKind::Attribute,
                        vec![
                            SyntaxElement::Node(expr),
                            SyntaxElement::Token(dot),
                            SyntaxElement::Token(field),
                        ],
                    )
                }
                _ => return Ok(expr),
            };
        }
    }

    /// `( expr, ... )`
    fn parse_args(&mut self) -> ParseResult {
        let open = self.expect(TokenKind::LParen, "`(`")?;
        self.nesting += 1;
        let mut children = vec![SyntaxElement::Token(open)];
        while !self.check(TokenKind::RParen) {
            children.push(SyntaxElement::Node(self.parse_expr()?));
            if self.check(TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        let close = self.expect(TokenKind::RParen, "`,` or `)`")?;
        self.nesting -= 1;
        children.push(SyntaxElement::Token(close));
        Ok(SyntaxNode::new(SyntaxKind::ArgList, children))
    }

    /// `expr`, `start:`, `:stop`, `start:stop` or `:`.
    fn parse_subscript_index(&mut self) -> ParseResult {
        let start = if self.check(TokenKind::Colon) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        if !self.check(TokenKind::Colon) {
            return match start {
                Some(index) => Ok(index),
                None => Err(self.unexpected("index expression")),
            };
        }

        let colon = self.advance();
        let mut children = Vec::with_capacity(3);
        if let Some(start) = start {
            children.push(SyntaxElement::Node(start));
        }
        children.push(SyntaxElement::Token(colon));
        if !self.check(TokenKind::RBracket) {
            children.push(SyntaxElement::Node(self.parse_expr()?));
        }
        Ok(SyntaxNode::new(SyntaxKind::Slice, children))
    }

    fn parse_atom(&mut self) -> ParseResult {
        let kind = match self.current() {
            TokenKind::Ident(_) => SyntaxKind::Symbol,
            TokenKind::Int(_) => SyntaxKind::Int,
            TokenKind::Float(_) => SyntaxKind::Float,
            TokenKind::LParen => return self.parse_paren(),
            TokenKind::LBrace => return self.parse_braces(),
            TokenKind::Join => return self.parse_join(),
            _ => return Err(self.unexpected("expression")),
        };
        let token = self.advance();
        Ok(SyntaxNode::new(kind, vec![SyntaxElement::Token(token)]))
    }

    fn parse_paren(&mut self) -> ParseResult {
        let open = self.advance();
        self.nesting += 1;
        let inner = self.parse_expr()?;
        let close = self.expect(TokenKind::RParen, "`)`")?;
        self.nesting -= 1;
        Ok(SyntaxNode::new(
            SyntaxKind::Paren,
            vec![
                SyntaxElement::Token(open),
                SyntaxElement::Node(inner),
                SyntaxElement::Token(close),
            ],
        ))
    }

    /// `join expr`
    fn parse_join(&mut self) -> ParseResult {
        let keyword = self.advance();
        self.cursor.skip_newlines();
        let body = self.parse_expr()?;
        Ok(SyntaxNode::new(
            SyntaxKind::Join,
            vec![SyntaxElement::Token(keyword), SyntaxElement::Node(body)],
        ))
    }
}
