//! Shared parser infrastructure for token stream navigation.

use crate::diag::Diag;
use crate::lexer::token::{Token, TokenKind};

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, Diag>;

/// Token stream navigator providing lookahead and basic matching operations.
pub struct TokenStream<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> TokenStream<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Returns the current token. If past the end, returns the last token
    /// (which is always `Eof`).
    pub fn current(&self) -> &Token {
        self.tokens
            .get(self.pos)
            .unwrap_or_else(|| self.tokens.last().expect("token stream must be non-empty"))
    }

    pub fn advance(&mut self) {
        if self.pos < self.tokens.len().saturating_sub(1) {
            self.pos += 1;
        }
    }

    pub fn check(&self, kind: &TokenKind) -> bool {
        &self.current().kind == kind
    }

    pub fn consume(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Creates an error pointing at the current token.
    pub fn error_here(&self, message: impl Into<String>) -> Diag {
        Diag::error(message.into())
            .with_label(self.current().span.clone(), "here")
            .with_code("gridify::parse_error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::CmpOp;

    fn make_tokens() -> Vec<Token> {
        vec![
            Token::new(TokenKind::Ident("a".into()), 0..1),
            Token::new(TokenKind::Op(CmpOp::Eq), 1..3),
            Token::new(TokenKind::Value("1".into()), 3..4),
            Token::new(TokenKind::Eof, 4..4),
        ]
    }

    #[test]
    fn navigation_and_consume() {
        let tokens = make_tokens();
        let mut stream = TokenStream::new(&tokens);

        assert_eq!(stream.current().kind, TokenKind::Ident("a".into()));
        assert!(stream.consume(&TokenKind::Ident("a".into())));
        assert_eq!(stream.current().kind, TokenKind::Op(CmpOp::Eq));
        assert!(!stream.consume(&TokenKind::Ident("a".into())));
    }

    #[test]
    fn stays_at_eof() {
        let tokens = make_tokens();
        let mut stream = TokenStream::new(&tokens);
        for _ in 0..10 {
            stream.advance();
        }
        assert_eq!(stream.current().kind, TokenKind::Eof);
    }
}
