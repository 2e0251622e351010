//! Field mapping: the bridge between filter-string field names and typed
//! accessors on a Rust struct.
//!
//! The reference implementation leans on runtime reflection to build a field
//! map automatically from a model's public properties. Rust has no such
//! reflection, so [`Mappable`] is the explicit stand-in: implementors hand
//! back a [`FieldMapper`] populated with one [`MapEntry`] per filterable
//! field, each wrapping a plain accessor closure.

use crate::ast::CmpOp;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use uuid::Uuid;

/// The runtime-typed value extracted from a field accessor, or parsed from a
/// filter RHS literal.
///
/// Comparisons between a `FieldValue` pulled off a record and one parsed from
/// a filter string are always performed kind-to-kind; a type mismatch is
/// handled by the predicate compiler rather than by this type.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Uuid(Uuid),
    DateTime(DateTime<Utc>),
    /// A collection of string elements, for `Contains`/`NotContains` membership
    /// tests (e.g. a `Vec<String>` of tags).
    Collection(Vec<String>),
    /// The accessor produced no value (e.g. an `Option<T>` field that was `None`).
    Missing,
}

/// The declared kind of a mapped field, used to pick an RHS literal parser
/// independently of any particular record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    Float,
    Boolean,
    Uuid,
    DateTime,
    /// A field whose accessor returns a collection of strings, supporting
    /// `Contains`/`NotContains` as element membership rather than substring
    /// search.
    Collection,
}

impl FieldValue {
    /// Orders two values of the same kind using ordinal (byte-wise)
    /// comparison for text, matching the host platform's default string
    /// ordering. Case-folding is never applied here; a caller who wants
    /// case-insensitive ordering supplies a normaliser that folds the
    /// accessor's output before it reaches this method.
    /// Returns `None` for kind mismatches and `Missing` operands.
    pub fn partial_cmp_for_ordering(&self, other: &Self) -> Option<std::cmp::Ordering> {
        match (self, other) {
            (FieldValue::Text(a), FieldValue::Text(b)) => Some(a.cmp(b)),
            (FieldValue::Integer(a), FieldValue::Integer(b)) => a.partial_cmp(b),
            (FieldValue::Float(a), FieldValue::Float(b)) => a.partial_cmp(b),
            (FieldValue::Boolean(a), FieldValue::Boolean(b)) => a.partial_cmp(b),
            (FieldValue::Uuid(a), FieldValue::Uuid(b)) => a.partial_cmp(b),
            (FieldValue::DateTime(a), FieldValue::DateTime(b)) => a.partial_cmp(b),
            _ => None,
        }
    }

    /// The [`FieldKind`] of this value, or `None` for `Missing`.
    pub fn kind(&self) -> Option<FieldKind> {
        match self {
            FieldValue::Text(_) => Some(FieldKind::Text),
            FieldValue::Integer(_) => Some(FieldKind::Integer),
            FieldValue::Float(_) => Some(FieldKind::Float),
            FieldValue::Boolean(_) => Some(FieldKind::Boolean),
            FieldValue::Uuid(_) => Some(FieldKind::Uuid),
            FieldValue::DateTime(_) => Some(FieldKind::DateTime),
            FieldValue::Collection(_) => Some(FieldKind::Collection),
            FieldValue::Missing => None,
        }
    }
}

/// Converts a Rust value into the [`FieldValue`] used by the predicate
/// compiler. Implemented for the handful of primitive types a mapped
/// accessor is expected to return.
pub trait IntoFieldValue {
    fn into_field_value(self) -> FieldValue;
}

macro_rules! impl_into_field_value {
    ($ty:ty, $variant:ident) => {
        impl IntoFieldValue for $ty {
            fn into_field_value(self) -> FieldValue {
                FieldValue::$variant(self.into())
            }
        }
    };
}

impl_into_field_value!(String, Text);
impl_into_field_value!(&str, Text);
impl_into_field_value!(i64, Integer);
impl_into_field_value!(i32, Integer);
impl_into_field_value!(f64, Float);
impl_into_field_value!(bool, Boolean);
impl_into_field_value!(Uuid, Uuid);
impl_into_field_value!(DateTime<Utc>, DateTime);
impl_into_field_value!(Vec<String>, Collection);

impl<T: IntoFieldValue> IntoFieldValue for Option<T> {
    fn into_field_value(self) -> FieldValue {
        match self {
            Some(v) => v.into_field_value(),
            None => FieldValue::Missing,
        }
    }
}

/// A single mapped field: an accessor closure plus optional normalizer and
/// operator restrictions.
pub struct MapEntry<T> {
    kind: FieldKind,
    accessor: Box<dyn Fn(&T) -> FieldValue + Send + Sync>,
    normalizer: Option<Box<dyn Fn(FieldValue) -> FieldValue + Send + Sync>>,
    allowed_ops: Option<Vec<CmpOp>>,
}

impl<T> MapEntry<T> {
    pub fn new<F, V>(kind: FieldKind, accessor: F) -> Self
    where
        F: Fn(&T) -> V + Send + Sync + 'static,
        V: IntoFieldValue,
    {
        Self {
            kind,
            accessor: Box::new(move |item| accessor(item).into_field_value()),
            normalizer: None,
            allowed_ops: None,
        }
    }

    /// Applies a normalizer to the accessor's output only; the filter's RHS
    /// literal is never passed through a normalizer.
    pub fn with_normalizer<F>(mut self, normalizer: F) -> Self
    where
        F: Fn(FieldValue) -> FieldValue + Send + Sync + 'static,
    {
        self.normalizer = Some(Box::new(normalizer));
        self
    }

    /// Restricts this field to a subset of operators; `None` (the default)
    /// allows every operator applicable to the field's [`FieldKind`].
    pub fn with_allowed_ops(mut self, ops: Vec<CmpOp>) -> Self {
        self.allowed_ops = Some(ops);
        self
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn extract(&self, item: &T) -> FieldValue {
        let value = (self.accessor)(item);
        match &self.normalizer {
            Some(normalize) => normalize(value),
            None => value,
        }
    }

    pub fn allows(&self, op: CmpOp) -> bool {
        match &self.allowed_ops {
            Some(ops) => ops.contains(&op),
            None => true,
        }
    }
}

/// A registry of mapped fields for a record type `T`, keyed by filter-string
/// field name.
///
/// Field names are matched case-insensitively by default, mirroring
/// how query-string parameter names are conventionally treated.
pub struct FieldMapper<T> {
    entries: HashMap<String, MapEntry<T>>,
    case_sensitive: bool,
}

impl<T> Default for FieldMapper<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FieldMapper<T> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            case_sensitive: false,
        }
    }

    /// Builds a mapper that matches field names case-sensitively.
    pub fn case_sensitive() -> Self {
        Self {
            entries: HashMap::new(),
            case_sensitive: true,
        }
    }

    fn normalize_key(&self, name: &str) -> String {
        if self.case_sensitive {
            name.to_string()
        } else {
            name.to_lowercase()
        }
    }

    /// Registers a mapped field under `name`.
    pub fn add_map(&mut self, name: impl Into<String>, entry: MapEntry<T>) -> &mut Self {
        let key = self.normalize_key(&name.into());
        self.entries.insert(key, entry);
        self
    }

    pub fn remove_map(&mut self, name: &str) -> &mut Self {
        let key = self.normalize_key(name);
        self.entries.remove(&key);
        self
    }

    pub fn has_map(&self, name: &str) -> bool {
        self.entries.contains_key(&self.normalize_key(name))
    }

    pub fn get_map(&self, name: &str) -> Option<&MapEntry<T>> {
        self.entries.get(&self.normalize_key(name))
    }
}

/// Types that can describe their own filterable fields.
///
/// This is the explicit counterpart to the reflection-based
/// `generateMappings()` step of the reference implementation: rather than
/// inspecting a type's properties at runtime, implementors list them here.
pub trait Mappable: Sized {
    /// Builds a [`FieldMapper`] describing every filterable field on `Self`.
    fn generate_mappings() -> FieldMapper<Self>;
}
