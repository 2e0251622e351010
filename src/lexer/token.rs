//! Token types for the filter DSL.

use crate::ast::{CmpOp, Span};
use smol_str::SmolStr;
use std::fmt;

/// The kind of a lexical token in the filter DSL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// A field name, scanned up to the next operator or delimiter.
    Ident(SmolStr),
    /// A comparison operator.
    Op(CmpOp),
    /// The right-hand-side value of a comparison, scanned up to the next
    /// `)`, `|`, or `,`.
    Value(SmolStr),
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `,` — logical AND.
    And,
    /// `|` — logical OR.
    Or,
    /// End of input.
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Ident(name) => write!(f, "{name}"),
            TokenKind::Op(op) => write!(f, "{}", op.as_str()),
            TokenKind::Value(v) => write!(f, "{v}"),
            TokenKind::LParen => write!(f, "("),
            TokenKind::RParen => write!(f, ")"),
            TokenKind::And => write!(f, ","),
            TokenKind::Or => write!(f, "|"),
            TokenKind::Eof => write!(f, "<EOF>"),
        }
    }
}

/// A lexical token with its kind and source span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}
