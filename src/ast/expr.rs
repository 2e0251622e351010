//! The filter expression tree produced by the parser and consumed by the
//! predicate compiler.

use crate::ast::Span;
use smol_str::SmolStr;

/// A comparison operator recognised by the filter DSL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CmpOp {
    Eq,
    NotEq,
    Gt,
    Lt,
    GtEq,
    LtEq,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
}

impl CmpOp {
    /// Returns the two-character DSL spelling of this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            CmpOp::Eq => "==",
            CmpOp::NotEq => "!=",
            CmpOp::Gt => ">>",
            CmpOp::Lt => "<<",
            CmpOp::GtEq => ">=",
            CmpOp::LtEq => "<=",
            CmpOp::Contains => "=*",
            CmpOp::NotContains => "!*",
            CmpOp::StartsWith => "^=",
            CmpOp::EndsWith => "$=",
        }
    }

    /// Every operator recognised by the tokenizer, longest-match order is
    /// irrelevant here since all DSL operators are exactly two characters.
    pub const ALL: [CmpOp; 10] = [
        CmpOp::Eq,
        CmpOp::NotEq,
        CmpOp::Gt,
        CmpOp::Lt,
        CmpOp::GtEq,
        CmpOp::LtEq,
        CmpOp::Contains,
        CmpOp::NotContains,
        CmpOp::StartsWith,
        CmpOp::EndsWith,
    ];

    /// Whether this operator is string-shaped (substring/prefix/suffix family).
    pub fn is_string_shaped(self) -> bool {
        matches!(
            self,
            CmpOp::Contains | CmpOp::NotContains | CmpOp::StartsWith | CmpOp::EndsWith
        )
    }

    /// Whether this operator requires an ordered comparison (`>>`/`<<`/`>=`/`<=`).
    pub fn is_ordered(self) -> bool {
        matches!(self, CmpOp::Gt | CmpOp::Lt | CmpOp::GtEq | CmpOp::LtEq)
    }

    /// Whether a false verdict on this operator should collapse to `true`
    /// instead, per the value-collapse duality (`NotEq`/`NotContains`).
    pub fn collapses_to_true(self) -> bool {
        matches!(self, CmpOp::NotEq | CmpOp::NotContains)
    }
}

/// A node in the filter expression tree.
///
/// `And`/`Or` are strictly binary; the parser builds left-associative chains
/// rather than storing variadic children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Compare {
        field: SmolStr,
        op: CmpOp,
        rhs: SmolStr,
        span: Span,
    },
    And(Box<Node>, Box<Node>, Span),
    Or(Box<Node>, Box<Node>, Span),
}

impl Node {
    /// Returns the span covering this node in the original filter string.
    pub fn span(&self) -> &Span {
        match self {
            Node::Compare { span, .. } => span,
            Node::And(_, _, span) => span,
            Node::Or(_, _, span) => span,
        }
    }
}
