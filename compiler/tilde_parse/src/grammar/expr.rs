//! Expression precedence chain.
//!
//! Lowest to highest: function literal, `or`, `and`, `not`, comparison,
//! `+ -`, `* /`, unary `+ -`, `**`, then postfix and atoms.

use super::{ParseResult, Parser};
use crate::syntax::{Operator, SyntaxElement, SyntaxKind, SyntaxNode};
use crate::ParseErrorKind;
use tilde_ir::{Token, TokenKind};
use tilde_stack::ensure_sufficient_stack;

fn binary(op: Operator, lhs: SyntaxNode, token: Token, rhs: SyntaxNode) -> SyntaxNode {
    SyntaxNode::new(
        SyntaxKind::Operator(op),
        vec![
            SyntaxElement::Node(lhs),
            SyntaxElement::Token(token),
            SyntaxElement::Node(rhs),
        ],
    )
}

fn unary(op: Operator, token: Token, operand: SyntaxNode) -> SyntaxNode {
    SyntaxNode::new(
        SyntaxKind::Operator(op),
        vec![SyntaxElement::Token(token), SyntaxElement::Node(operand)],
    )
}

impl Parser<'_> {
    /// Parse a full expression.
    pub(super) fn parse_expr(&mut self) -> ParseResult {
        ensure_sufficient_stack(|| {
            if self.at_function_literal() {
                self.parse_function()
            } else {
                self.parse_or()
            }
        })
    }

    /// `x => ...` or `(x, y) => ...`
    fn at_function_literal(&mut self) -> bool {
        match self.current() {
            TokenKind::Ident(_) => self.cursor.peek_kind_at(1) == TokenKind::FatArrow,
            TokenKind::LParen => self.cursor.paren_group_followed_by(0, TokenKind::FatArrow),
            _ => false,
        }
    }

    fn parse_function(&mut self) -> ParseResult {
        let params = if matches!(self.current(), TokenKind::Ident(_)) {
            let name = self.advance();
            SyntaxNode::new(SyntaxKind::ParamList, vec![SyntaxElement::Token(name)])
        } else {
            self.parse_param_list()?
        };
        let arrow = self.expect(TokenKind::FatArrow, "`=>`")?;
        self.cursor.skip_newlines();
        let body = self.parse_expr()?;
        Ok(SyntaxNode::new(
            SyntaxKind::Function,
            vec![
                SyntaxElement::Node(params),
                SyntaxElement::Token(arrow),
                SyntaxElement::Node(body),
            ],
        ))
    }

    fn parse_or(&mut self) -> ParseResult {
        let mut left = self.parse_and()?;
        while self.check(TokenKind::Or) {
            let op = self.advance();
            self.cursor.skip_newlines();
            let right = self.parse_and()?;
            left = binary(Operator::Or, left, op, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> ParseResult {
        let mut left = self.parse_not()?;
        while self.check(TokenKind::And) {
            let op = self.advance();
            self.cursor.skip_newlines();
            let right = self.parse_not()?;
            left = binary(Operator::And, left, op, right);
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> ParseResult {
        if self.check(TokenKind::Not) {
            let op = self.advance();
            let operand = ensure_sufficient_stack(|| self.parse_not())?;
            return Ok(unary(Operator::Not, op, operand));
        }
        self.parse_comparison()
    }

    /// A single, non-associative comparison.
    fn parse_comparison(&mut self) -> ParseResult {
        let left = self.parse_arith()?;
        let Some(op) = Operator::comparison(self.current()) else {
            return Ok(left);
        };
        let token = self.advance();
        self.cursor.skip_newlines();
        let right = self.parse_arith()?;
        let node = binary(op, left, token, right);

        if Operator::comparison(self.current()).is_some() {
            let span = self.cursor.current().span;
            return Err(self.error(ParseErrorKind::ChainedComparison, span));
        }
        Ok(node)
    }

    fn match_arith_op(&mut self) -> Option<Operator> {
        match self.current() {
            TokenKind::Plus => Some(Operator::Add),
            TokenKind::Minus => Some(Operator::Sub),
            _ => None,
        }
    }

    fn match_term_op(&mut self) -> Option<Operator> {
        match self.current() {
            TokenKind::Star => Some(Operator::Mul),
            TokenKind::Slash => Some(Operator::Div),
            _ => None,
        }
    }

    /// `+ -`, left-associative.
    fn parse_arith(&mut self) -> ParseResult {
        let mut left = self.parse_term()?;
        while let Some(op) = self.match_arith_op() {
            let token = self.advance();
            self.cursor.skip_newlines();
            let right = self.parse_term()?;
            left = binary(op, left, token, right);
        }
        Ok(left)
    }

    /// `* /`, left-associative.
    fn parse_term(&mut self) -> ParseResult {
        let mut left = self.parse_factor()?;
        while let Some(op) = self.match_term_op() {
            let token = self.advance();
            self.cursor.skip_newlines();
            let right = self.parse_factor()?;
            left = binary(op, left, token, right);
        }
        Ok(left)
    }

    /// Unary `+` and `-`.
    fn parse_factor(&mut self) -> ParseResult {
        let op = match self.current() {
            TokenKind::Plus => Operator::Pos,
            TokenKind::Minus => Operator::Neg,
            _ => return self.parse_power(),
        };
        let token = self.advance();
        let operand = ensure_sufficient_stack(|| self.parse_factor())?;
        Ok(unary(op, token, operand))
    }

    /// `base ** exponent`, right-associative; the exponent may carry a sign.
    fn parse_power(&mut self) -> ParseResult {
        let base = self.parse_postfix()?;
        if !self.check(TokenKind::StarStar) {
            return Ok(base);
        }
        let token = self.advance();
        self.cursor.skip_newlines();
        let exponent = ensure_sufficient_stack(|| self.parse_factor())?;
        Ok(binary(Operator::Pow, base, token, exponent))
    }
}
