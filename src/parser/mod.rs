//! Recursive-descent parser for the filter DSL.
//!
//! Grammar:
//! ```text
//! expr    := or
//! or      := and ( "|" and )*
//! and     := atom ( "," atom )*
//! atom    := "(" expr ")" | compare
//! compare := IDENT OP VALUE
//! ```
//! `|` binds looser than `,`; both are left-associative and produce strictly
//! binary `Node::Or`/`Node::And` chains rather than flattened lists.

pub mod base;

use crate::ast::{CmpOp, Node};
use crate::lexer::token::TokenKind;
use base::{ParseResult, TokenStream};

/// Parses a full filter string into an expression tree.
///
/// An empty filter string (no tokens besides `Eof`) is not accepted here —
/// callers that want to treat "no filter" as "match everything" should check
/// for that before invoking the parser.
#[tracing::instrument(level = "trace", skip(source), fields(len = source.len()))]
pub fn parse(source: &str) -> ParseResult<Node> {
    let lexed = crate::lexer::tokenize(source);
    if let Some(diag) = lexed.diagnostics.into_iter().next() {
        return Err(diag);
    }

    let mut stream = TokenStream::new(&lexed.tokens);
    let node = parse_or(&mut stream)?;

    if !stream.check(&TokenKind::Eof) {
        return Err(stream.error_here(format!(
            "unexpected `{}` after end of expression",
            stream.current().kind
        )));
    }

    Ok(node)
}

fn parse_or(stream: &mut TokenStream) -> ParseResult<Node> {
    let mut left = parse_and(stream)?;

    while stream.check(&TokenKind::Or) {
        let start = left.span().start;
        stream.advance();
        let right = parse_and(stream)?;
        let end = right.span().end;
        left = Node::Or(Box::new(left), Box::new(right), start..end);
    }

    Ok(left)
}

fn parse_and(stream: &mut TokenStream) -> ParseResult<Node> {
    let mut left = parse_atom(stream)?;

    while stream.check(&TokenKind::And) {
        let start = left.span().start;
        stream.advance();
        let right = parse_atom(stream)?;
        let end = right.span().end;
        left = Node::And(Box::new(left), Box::new(right), start..end);
    }

    Ok(left)
}

fn parse_atom(stream: &mut TokenStream) -> ParseResult<Node> {
    if stream.check(&TokenKind::LParen) {
        stream.advance();
        let inner = parse_or(stream)?;
        if !stream.consume(&TokenKind::RParen) {
            return Err(stream.error_here("expected a closing `)`"));
        }
        return Ok(inner);
    }

    parse_compare(stream)
}

fn parse_compare(stream: &mut TokenStream) -> ParseResult<Node> {
    let ident_tok = stream.current().clone();
    let field = match &ident_tok.kind {
        TokenKind::Ident(name) => name.clone(),
        _ => {
            return Err(stream.error_here(format!(
                "expected a field name, found `{}`",
                ident_tok.kind
            )));
        }
    };
    stream.advance();

    let op_tok = stream.current().clone();
    let op = match op_tok.kind {
        TokenKind::Op(op) => op,
        _ => {
            return Err(
                stream.error_here(format!("expected an operator, found `{}`", op_tok.kind))
            );
        }
    };
    stream.advance();

    let value_tok = stream.current().clone();
    let rhs = match &value_tok.kind {
        TokenKind::Value(v) => v.clone(),
        _ => {
            return Err(stream.error_here(format!("expected a value, found `{}`", value_tok.kind)));
        }
    };
    stream.advance();

    Ok(Node::Compare {
        field,
        op,
        rhs,
        span: ident_tok.span.start..value_tok.span.end,
    })
}
