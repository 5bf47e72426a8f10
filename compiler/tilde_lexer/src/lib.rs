//! Lexer for tilde using logos with string interning.
//!
//! Identifiers are interned as they are produced. Newlines are kept as
//! tokens because they separate statements; `#` comments and horizontal
//! whitespace are dropped.

use logos::Logos;
use tilde_ir::{Span, StringInterner, Token, TokenKind, TokenList};

/// Raw token from logos (before interning).
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\f]+")]
enum RawToken {
    #[regex(r"#[^\n]*")]
    Comment,

    #[token("\n")]
    Newline,

    #[token("join")]
    Join,
    #[token("and")]
    And,
    #[token("or")]
    Or,
    #[token("not")]
    Not,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,

    #[regex(r"[0-9]+")]
    Int,

    #[regex(r"[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?")]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?")]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+")]
    Float,

    #[token("=")]
    Eq,
    #[token("~")]
    Tilde,
    #[token("~~")]
    TildeTilde,
    #[token("!~")]
    BangTilde,
    #[token("!~~")]
    BangTildeTilde,

    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token(">")]
    Gt,
    #[token(">=")]
    GtEq,
    #[token("<")]
    Lt,
    #[token("<=")]
    LtEq,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("**")]
    StarStar,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token(":")]
    Colon,
    #[token(";")]
    Semicolon,
    #[token("=>")]
    FatArrow,
}

/// Failure to tokenize source text.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    #[error("unexpected character `{text}`")]
    UnexpectedCharacter { text: String, span: Span },
    #[error("integer literal `{text}` does not fit in 64 bits")]
    IntegerOverflow { text: String, span: Span },
    #[error("float literal `{text}` is malformed")]
    MalformedFloat { text: String, span: Span },
    #[error("source text is larger than 4 GiB")]
    SourceTooLarge,
}

impl LexError {
    /// Location of the offending text.
    pub fn span(&self) -> Span {
        match self {
            LexError::UnexpectedCharacter { span, .. }
            | LexError::IntegerOverflow { span, .. }
            | LexError::MalformedFloat { span, .. } => *span,
            LexError::SourceTooLarge => Span::DUMMY,
        }
    }
}

/// Tokenize `source`, interning identifiers into `interner`.
///
/// The returned list always ends with exactly one `Eof` token.
pub fn lex(source: &str, interner: &StringInterner) -> Result<TokenList, LexError> {
    let eof = u32::try_from(source.len()).map_err(|_| LexError::SourceTooLarge)?;
    let mut tokens = TokenList::new();
    let mut logos = RawToken::lexer(source);

    while let Some(result) = logos.next() {
        let range = logos.span();
        // Bounded by `eof`, which fits in u32.
        let span = Span::new(
            u32::try_from(range.start).unwrap_or(eof),
            u32::try_from(range.end).unwrap_or(eof),
        );
        let slice = logos.slice();

        let raw = result.map_err(|()| LexError::UnexpectedCharacter {
            text: slice.to_string(),
            span,
        })?;
        if let Some(kind) = convert_token(raw, slice, span, interner)? {
            tokens.push(Token::new(kind, span));
        }
    }

    tokens.push(Token::new(TokenKind::Eof, Span::point(eof)));
    Ok(tokens)
}

/// Convert a raw token, returning `None` for trivia.
fn convert_token(
    raw: RawToken,
    slice: &str,
    span: Span,
    interner: &StringInterner,
) -> Result<Option<TokenKind>, LexError> {
    let kind = match raw {
        RawToken::Ident => TokenKind::Ident(interner.intern(slice)),
        RawToken::Int => {
            let value = slice.parse::<i64>().map_err(|_| LexError::IntegerOverflow {
                text: slice.to_string(),
                span,
            })?;
            TokenKind::Int(value)
        }
        RawToken::Float => {
            let value = slice.parse::<f64>().map_err(|_| LexError::MalformedFloat {
                text: slice.to_string(),
                span,
            })?;
            TokenKind::Float(value.to_bits())
        }

        RawToken::Join => TokenKind::Join,
        RawToken::And => TokenKind::And,
        RawToken::Or => TokenKind::Or,
        RawToken::Not => TokenKind::Not,

        RawToken::Eq => TokenKind::Eq,
        RawToken::Tilde => TokenKind::Tilde,
        RawToken::TildeTilde => TokenKind::TildeTilde,
        RawToken::BangTilde => TokenKind::BangTilde,
        RawToken::BangTildeTilde => TokenKind::BangTildeTilde,

        RawToken::EqEq => TokenKind::EqEq,
        RawToken::NotEq => TokenKind::NotEq,
        RawToken::Gt => TokenKind::Gt,
        RawToken::GtEq => TokenKind::GtEq,
        RawToken::Lt => TokenKind::Lt,
        RawToken::LtEq => TokenKind::LtEq,

        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Star => TokenKind::Star,
        RawToken::Slash => TokenKind::Slash,
        RawToken::StarStar => TokenKind::StarStar,

        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::LBracket => TokenKind::LBracket,
        RawToken::RBracket => TokenKind::RBracket,
        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Dot => TokenKind::Dot,
        RawToken::Colon => TokenKind::Colon,
        RawToken::Semicolon => TokenKind::Semicolon,
        RawToken::FatArrow => TokenKind::FatArrow,

        RawToken::Newline => TokenKind::Newline,
        RawToken::Comment => return Ok(None),
    };
    Ok(Some(kind))
}
