//! Lowers an expression tree into a composable predicate over a record type.

pub mod ordering;

use crate::ast::{CmpOp, Node, Span};
use crate::diag::GridifyError;
use crate::mapper::{FieldKind, FieldMapper, FieldValue};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A compiled predicate over records of type `T`, borrowed from the
/// [`FieldMapper`] that produced it.
pub type Predicate<'a, T> = Box<dyn Fn(&T) -> bool + 'a>;

/// Compiles an expression tree into a predicate, given the field mapper that
/// resolves `Compare.field` names.
#[tracing::instrument(level = "trace", skip(node, mapper))]
pub fn compile_node<'a, T>(
    node: &Node,
    mapper: &'a FieldMapper<T>,
) -> Result<Predicate<'a, T>, GridifyError> {
    match node {
        Node::Compare {
            field, op, rhs, span,
        } => compile_compare(field, *op, rhs, span, mapper),
        Node::And(lhs, rhs, _) => {
            let lhs = compile_node(lhs, mapper)?;
            let rhs = compile_node(rhs, mapper)?;
            Ok(Box::new(move |item: &T| lhs(item) && rhs(item)))
        }
        Node::Or(lhs, rhs, _) => {
            let lhs = compile_node(lhs, mapper)?;
            let rhs = compile_node(rhs, mapper)?;
            Ok(Box::new(move |item: &T| lhs(item) || rhs(item)))
        }
    }
}

fn compile_compare<'a, T>(
    field: &str,
    op: CmpOp,
    rhs: &str,
    span: &Span,
    mapper: &'a FieldMapper<T>,
) -> Result<Predicate<'a, T>, GridifyError> {
    let entry = mapper
        .get_map(field)
        .ok_or_else(|| GridifyError::unknown_field(field, span.clone()))?;

    let kind = entry.kind();
    if op.is_string_shaped() {
        let kind_supports_op = match op {
            CmpOp::Contains | CmpOp::NotContains => {
                matches!(kind, FieldKind::Text | FieldKind::Collection)
            }
            _ => kind == FieldKind::Text,
        };
        if !kind_supports_op {
            return Err(GridifyError::unsupported_operator(op, field, span.clone()));
        }
    }
    if op.is_ordered() && kind == FieldKind::Boolean {
        return Err(GridifyError::unsupported_operator(op, field, span.clone()));
    }
    if !entry.allows(op) {
        return Err(GridifyError::unsupported_operator(op, field, span.clone()));
    }

    match parse_rhs(kind, rhs) {
        Some(target) => Ok(Box::new(move |item: &T| {
            let lhs = entry.extract(item);
            evaluate(op, &lhs, &target)
        })),
        None => {
            // Value-collapse duality: an RHS that fails to
            // parse into the mapper entry's target type compiles to a
            // constant predicate rather than a compile error.
            let collapses_to = op.collapses_to_true();
            Ok(Box::new(move |_: &T| collapses_to))
        }
    }
}

/// Parses a filter RHS literal into a [`FieldValue`] of the given `kind`.
/// Returns `None` on parse failure, triggering the value-collapse rule.
fn parse_rhs(kind: FieldKind, rhs: &str) -> Option<FieldValue> {
    match kind {
        FieldKind::Text => Some(FieldValue::Text(rhs.to_string())),
        FieldKind::Integer => rhs.trim().parse::<i64>().ok().map(FieldValue::Integer),
        FieldKind::Float => rhs.trim().parse::<f64>().ok().map(FieldValue::Float),
        FieldKind::Boolean => match rhs.trim().to_ascii_lowercase().as_str() {
            "true" => Some(FieldValue::Boolean(true)),
            "false" => Some(FieldValue::Boolean(false)),
            _ => None,
        },
        FieldKind::Uuid => parse_canonical_uuid(rhs.trim()).map(FieldValue::Uuid),
        FieldKind::DateTime => parse_iso8601(rhs.trim()).map(FieldValue::DateTime),
        // The membership target for a collection lookup is just the literal
        // element text; it is matched against each item in the collection.
        FieldKind::Collection => Some(FieldValue::Text(rhs.to_string())),
    }
}

fn parse_iso8601(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

/// Parses a UUID in canonical 8-4-4-4-12 hyphenated hexadecimal form only.
/// `uuid::Uuid::parse_str` also accepts simple (no-hyphen), braced, and
/// urn-prefixed forms; those are rejected here so a non-canonical RHS
/// triggers the value-collapse rule instead of matching.
fn parse_canonical_uuid(value: &str) -> Option<Uuid> {
    let bytes = value.as_bytes();
    if bytes.len() != 36 {
        return None;
    }
    for (i, b) in bytes.iter().enumerate() {
        let ok = match i {
            8 | 13 | 18 | 23 => *b == b'-',
            _ => b.is_ascii_hexdigit(),
        };
        if !ok {
            return None;
        }
    }
    Uuid::parse_str(value).ok()
}

/// Evaluates a single comparison. `lhs` is the accessor's (possibly
/// normalised) output; `rhs` is the parsed literal. Absence on either side
/// yields false, except `NotEq` which yields true.
fn evaluate(op: CmpOp, lhs: &FieldValue, rhs: &FieldValue) -> bool {
    if matches!(lhs, FieldValue::Missing) {
        return op.collapses_to_true();
    }

    match op {
        CmpOp::Eq => values_eq(lhs, rhs),
        CmpOp::NotEq => !values_eq(lhs, rhs),
        CmpOp::Gt => compare_ordered(lhs, rhs) == Some(std::cmp::Ordering::Greater),
        CmpOp::Lt => compare_ordered(lhs, rhs) == Some(std::cmp::Ordering::Less),
        CmpOp::GtEq => matches!(
            compare_ordered(lhs, rhs),
            Some(std::cmp::Ordering::Greater | std::cmp::Ordering::Equal)
        ),
        CmpOp::LtEq => matches!(
            compare_ordered(lhs, rhs),
            Some(std::cmp::Ordering::Less | std::cmp::Ordering::Equal)
        ),
        CmpOp::Contains => contains_relation(lhs, rhs),
        CmpOp::NotContains => !contains_relation(lhs, rhs),
        CmpOp::StartsWith => string_relation(lhs, rhs, |l, r| l.starts_with(r)),
        CmpOp::EndsWith => string_relation(lhs, rhs, |l, r| l.ends_with(r)),
    }
}

/// Value equality. Text comparison is ordinal; a caller who wants
/// case-insensitive equality supplies a normaliser that folds the
/// accessor's output (see [`crate::mapper::MapEntry::with_normalizer`]).
fn values_eq(lhs: &FieldValue, rhs: &FieldValue) -> bool {
    lhs == rhs
}

fn compare_ordered(lhs: &FieldValue, rhs: &FieldValue) -> Option<std::cmp::Ordering> {
    lhs.partial_cmp_for_ordering(rhs)
}

fn string_relation(lhs: &FieldValue, rhs: &FieldValue, f: impl Fn(&str, &str) -> bool) -> bool {
    match (lhs, rhs) {
        (FieldValue::Text(l), FieldValue::Text(r)) => f(l, r),
        _ => false,
    }
}

/// `Contains` semantics: substring search for text, element membership for
/// collections.
fn contains_relation(lhs: &FieldValue, rhs: &FieldValue) -> bool {
    match (lhs, rhs) {
        (FieldValue::Text(l), FieldValue::Text(r)) => l.contains(r.as_str()),
        (FieldValue::Collection(items), FieldValue::Text(r)) => items.iter().any(|item| item == r),
        _ => false,
    }
}
