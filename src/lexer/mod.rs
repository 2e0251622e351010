//! Lexical analysis for the filter DSL.
//!
//! The filter grammar is small enough that the tokenizer does not
//! need a persistent "expect ident / expect value" mode: a field-name token
//! is always immediately followed by an operator and then a value, so each
//! comparison clause is scanned as one unit. Top-level structural characters
//! (`(` `)` `,` `|`) are handled directly between clauses.
//!
//! Quoting is intentionally unsupported: a value containing
//! `,`, `|`, or `)` cannot be expressed in this DSL. Callers must percent-encode
//! or substitute at a higher layer.

pub mod token;

use crate::ast::CmpOp;
use crate::diag::Diag;
use smol_str::SmolStr;
use token::{Token, TokenKind};

/// Result of lexical analysis: a token stream plus any diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexerResult {
    pub tokens: Vec<Token>,
    pub diagnostics: Vec<Diag>,
}

fn is_delimiter(c: char) -> bool {
    matches!(c, '(' | ')' | ',' | '|')
}

fn is_operator_first_char(c: char) -> bool {
    matches!(c, '=' | '!' | '>' | '<' | '*' | '^' | '$')
}

fn match_operator(two: &str) -> Option<CmpOp> {
    CmpOp::ALL.into_iter().find(|op| op.as_str() == two)
}

/// A lexical analyzer for filter DSL source text.
pub struct Lexer<'a> {
    source: &'a str,
    chars: Vec<(usize, char)>,
    pos: usize,
    tokens: Vec<Token>,
    diagnostics: Vec<Diag>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().collect(),
            pos: 0,
            tokens: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Tokenizes the source text and returns the result.
    pub fn tokenize(mut self) -> LexerResult {
        while !self.is_at_end() {
            self.scan_top_level();
        }

        let eof_pos = self.source.len();
        self.tokens
            .push(Token::new(TokenKind::Eof, eof_pos..eof_pos));

        LexerResult {
            tokens: self.tokens,
            diagnostics: self.diagnostics,
        }
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn char_at(&self, idx: usize) -> Option<char> {
        self.chars.get(idx).map(|(_, c)| *c)
    }

    /// Byte offset of the char at `idx`, or the source length if `idx` is
    /// past the end (i.e. the one-past-the-end offset).
    fn byte_at(&self, idx: usize) -> usize {
        self.chars
            .get(idx)
            .map(|(b, _)| *b)
            .unwrap_or(self.source.len())
    }

    fn byte_offset(&self) -> usize {
        self.byte_at(self.pos)
    }

    fn scan_top_level(&mut self) {
        let start = self.byte_offset();
        let c = self.char_at(self.pos).expect("checked by is_at_end");

        match c {
            '(' => {
                self.tokens
                    .push(Token::new(TokenKind::LParen, start..start + 1));
                self.pos += 1;
            }
            ')' => {
                self.tokens
                    .push(Token::new(TokenKind::RParen, start..start + 1));
                self.pos += 1;
            }
            ',' => {
                self.tokens
                    .push(Token::new(TokenKind::And, start..start + 1));
                self.pos += 1;
            }
            '|' => {
                self.tokens
                    .push(Token::new(TokenKind::Or, start..start + 1));
                self.pos += 1;
            }
            _ => self.scan_compare_clause(),
        }
    }

    /// Scans one `IDENT OP VALUE` clause starting at the current position.
    fn scan_compare_clause(&mut self) {
        let ident_start = self.byte_offset();
        let ident_start_idx = self.pos;
        while !self.is_at_end() {
            let c = self.char_at(self.pos).unwrap();
            if is_delimiter(c) || is_operator_first_char(c) {
                break;
            }
            self.pos += 1;
        }
        let ident_end = self.byte_offset();

        if self.pos == ident_start_idx {
            self.diagnostics.push(
                Diag::error("expected a field name here")
                    .with_label(ident_start..ident_start, "expected field name")
                    .with_code("gridify::parse_error"),
            );
            // Avoid looping forever on an unexpected operator-first char.
            self.pos += 1;
            return;
        }

        let ident_text = &self.source[ident_start..ident_end];
        self.tokens.push(Token::new(
            TokenKind::Ident(SmolStr::new(ident_text)),
            ident_start..ident_end,
        ));

        if self.is_at_end() || is_delimiter(self.char_at(self.pos).unwrap()) {
            self.diagnostics.push(
                Diag::error(format!("expected an operator after `{ident_text}`"))
                    .with_label(ident_end..ident_end, "expected operator here")
                    .with_code("gridify::parse_error"),
            );
            return;
        }

        let op_start = ident_end;
        let maybe_two = if self.pos + 2 <= self.chars.len() {
            Some(&self.source[op_start..self.byte_at(self.pos + 2)])
        } else {
            None
        };

        let op = maybe_two.and_then(match_operator);
        let Some(op) = op else {
            let bad_char = self.char_at(self.pos).unwrap();
            self.diagnostics.push(
                Diag::error(format!("unrecognized operator starting with `{bad_char}`"))
                    .with_label(op_start..op_start + bad_char.len_utf8(), "here")
                    .with_help("valid operators are ==, !=, >>, <<, >=, <=, =*, !*, ^=, $=")
                    .with_code("gridify::parse_error"),
            );
            self.pos += 1;
            return;
        };
        self.pos += 2;
        let op_end = self.byte_offset();
        self.tokens
            .push(Token::new(TokenKind::Op(op), op_start..op_end));

        let value_start = op_end;
        while !self.is_at_end() {
            let c = self.char_at(self.pos).unwrap();
            if matches!(c, ')' | '|' | ',') {
                break;
            }
            self.pos += 1;
        }
        let value_end = self.byte_offset();
        self.tokens.push(Token::new(
            TokenKind::Value(SmolStr::new(&self.source[value_start..value_end])),
            value_start..value_end,
        ));
    }
}

/// Tokenizes a filter string. See [`Lexer`] for the scanning rules.
#[tracing::instrument(level = "trace", skip(source), fields(len = source.len()))]
pub fn tokenize(source: &str) -> LexerResult {
    let result = Lexer::new(source).tokenize();
    tracing::trace!(tokens = result.tokens.len(), "tokenized filter string");
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(result: &LexerResult) -> Vec<TokenKind> {
        result.tokens.iter().map(|t| t.kind.clone()).collect()
    }

    #[test]
    fn tokenizes_simple_comparison() {
        let result = tokenize("name==John");
        assert!(result.diagnostics.is_empty());
        assert_eq!(
            kinds(&result),
            vec![
                TokenKind::Ident("name".into()),
                TokenKind::Op(CmpOp::Eq),
                TokenKind::Value("John".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn whitespace_inside_value_is_preserved() {
        let result = tokenize("Name==John Doe");
        assert_eq!(
            result.tokens[2].kind,
            TokenKind::Value("John Doe".into())
        );
    }

    #[test]
    fn tokenizes_and_or_and_parens() {
        let result = tokenize("(a==1,b==2)|c==3");
        assert!(result.diagnostics.is_empty());
        assert_eq!(
            kinds(&result),
            vec![
                TokenKind::LParen,
                TokenKind::Ident("a".into()),
                TokenKind::Op(CmpOp::Eq),
                TokenKind::Value("1".into()),
                TokenKind::And,
                TokenKind::Ident("b".into()),
                TokenKind::Op(CmpOp::Eq),
                TokenKind::Value("2".into()),
                TokenKind::RParen,
                TokenKind::Or,
                TokenKind::Ident("c".into()),
                TokenKind::Op(CmpOp::Eq),
                TokenKind::Value("3".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn all_ten_operators_recognized() {
        for op in CmpOp::ALL {
            let src = format!("f{}v", op.as_str());
            let result = tokenize(&src);
            assert!(result.diagnostics.is_empty(), "failed for {op:?}");
            assert_eq!(result.tokens[1].kind, TokenKind::Op(op));
        }
    }

    #[test]
    fn missing_operator_is_a_parse_error() {
        let result = tokenize("name");
        assert_eq!(result.tokens[0].kind, TokenKind::Ident("name".into()));
        assert!(!result.diagnostics.is_empty());
    }

    #[test]
    fn unrecognized_operator_is_a_parse_error() {
        let result = tokenize("name~=value");
        assert!(!result.diagnostics.is_empty());
    }

    #[test]
    fn closing_paren_never_appears_inside_a_value() {
        let result = tokenize("name==a)b==c");
        assert_eq!(result.tokens[2].kind, TokenKind::Value("a".into()));
        assert_eq!(result.tokens[3].kind, TokenKind::RParen);
    }

    #[test]
    fn empty_value_is_accepted_structurally() {
        let result = tokenize("name==");
        assert_eq!(result.tokens[2].kind, TokenKind::Value("".into()));
    }
}
