//! Token cursor for navigating the token stream.

use tilde_ir::{Span, Token, TokenKind, TokenList};
use tracing::trace;

/// Position in a [`TokenList`].
///
/// Invariant: the list ends with `Eof` and the cursor never moves past it.
pub(crate) struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

static EOF: Token = Token::new(TokenKind::Eof, Span::DUMMY);

impl<'a> Cursor<'a> {
    pub(crate) fn new(tokens: &'a TokenList) -> Self {
        Cursor {
            tokens: tokens.as_slice(),
            pos: 0,
        }
    }

    #[inline]
    pub(crate) fn current(&self) -> &'a Token {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .unwrap_or(&EOF)
    }

    #[inline]
    pub(crate) fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    #[inline]
    pub(crate) fn is_at_end(&self) -> bool {
        self.current_kind() == TokenKind::Eof
    }

    /// Kind of the token `n` positions ahead, `Eof` past the end.
    #[inline]
    pub(crate) fn peek_kind_at(&self, n: usize) -> TokenKind {
        self.tokens
            .get(self.pos + n)
            .map_or(TokenKind::Eof, |t| t.kind)
    }

    /// Consume the current token and return it.
    pub(crate) fn advance(&mut self) -> Token {
        let token = *self.current();
        if token.kind != TokenKind::Eof {
            trace!(kind = ?token.kind, pos = self.pos, "advance");
            self.pos += 1;
        }
        token
    }

    pub(crate) fn skip_newlines(&mut self) {
        while self.current_kind() == TokenKind::Newline {
            self.pos += 1;
        }
    }

    pub(crate) fn skip_separators(&mut self) {
        while self.current_kind().is_separator() {
            self.pos += 1;
        }
    }

    /// Index of the `)` closing the `(` at `self.pos + offset`.
    fn closing_paren(&self, offset: usize) -> Option<usize> {
        let start = self.pos + offset;
        if self.tokens.get(start)?.kind != TokenKind::LParen {
            return None;
        }
        let mut depth = 0usize;
        for (i, token) in self.tokens.iter().enumerate().skip(start) {
            match token.kind {
                TokenKind::LParen => depth += 1,
                TokenKind::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                TokenKind::Eof => return None,
                _ => {}
            }
        }
        None
    }

    /// Whether the parenthesised group at `self.pos + offset` is directly
    /// followed by `kind`.
    ///
    /// Distinguishes `f(a, b) = ...` from the call `f(a, b)`, and
    /// `(a, b) => ...` from a parenthesised expression.
    pub(crate) fn paren_group_followed_by(&self, offset: usize, kind: TokenKind) -> bool {
        self.closing_paren(offset)
            .and_then(|close| self.tokens.get(close + 1))
            .is_some_and(|t| t.kind == kind)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests unwrap lexer output")]
mod tests {
    use super::*;
    use tilde_ir::StringInterner;

    fn tokens(source: &str) -> TokenList {
        tilde_lexer::lex(source, &StringInterner::new()).unwrap()
    }

    #[test]
    fn test_advance_stops_at_eof() {
        let list = tokens("x");
        let mut cursor = Cursor::new(&list);
        assert!(matches!(cursor.advance().kind, TokenKind::Ident(_)));
        assert_eq!(cursor.advance().kind, TokenKind::Eof);
        assert_eq!(cursor.advance().kind, TokenKind::Eof);
        assert!(cursor.is_at_end());
    }

    #[test]
    fn test_function_definition_lookahead() {
        let list = tokens("f(a, (b)) = a");
        let cursor = Cursor::new(&list);
        assert!(cursor.paren_group_followed_by(1, TokenKind::Eq));

        let list = tokens("f(a, b) == a");
        let cursor = Cursor::new(&list);
        assert!(!cursor.paren_group_followed_by(1, TokenKind::Eq));
    }

    #[test]
    fn test_lambda_lookahead() {
        let list = tokens("(x, y) => x");
        let cursor = Cursor::new(&list);
        assert!(cursor.paren_group_followed_by(0, TokenKind::FatArrow));

        let list = tokens("(x");
        let cursor = Cursor::new(&list);
        assert!(!cursor.paren_group_followed_by(0, TokenKind::FatArrow));
    }

    #[test]
    fn test_skip_separators() {
        let list = tokens("\n;\n x");
        let mut cursor = Cursor::new(&list);
        cursor.skip_separators();
        assert!(matches!(cursor.current_kind(), TokenKind::Ident(_)));
    }
}
