//! Resolves a `sortBy` field name into an ordering over a record type.

use crate::diag::GridifyError;
use crate::mapper::FieldMapper;
use std::cmp::Ordering;

/// A compiled ordering, borrowed from the [`FieldMapper`] that produced it.
pub struct CompiledOrdering<'a, T> {
    compare: Box<dyn Fn(&T, &T) -> Ordering + 'a>,
}

impl<'a, T> CompiledOrdering<'a, T> {
    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        (self.compare)(a, b)
    }
}

/// Compiles `sortBy`/`isSortAsc` into a [`CompiledOrdering`]. `sortBy` must already
/// be known non-empty; callers treat an empty `sortBy` as "no ordering"
/// before reaching this function.
pub fn compile_ordering<'a, T>(
    sort_by: &str,
    is_sort_asc: bool,
    mapper: &'a FieldMapper<T>,
) -> Result<CompiledOrdering<'a, T>, GridifyError> {
    let entry = mapper
        .get_map(sort_by)
        .ok_or_else(|| GridifyError::unknown_field(sort_by, 0..sort_by.len()))?;

    let compare = move |a: &T, b: &T| -> Ordering {
        let va = entry.extract(a);
        let vb = entry.extract(b);
        let ord = va
            .partial_cmp_for_ordering(&vb)
            .unwrap_or(Ordering::Equal);
        if is_sort_asc { ord } else { ord.reverse() }
    };

    Ok(CompiledOrdering {
        compare: Box::new(compare),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::{FieldKind, MapEntry, Mappable};

    struct Rec {
        name: &'static str,
        id: i64,
    }

    impl Mappable for Rec {
        fn generate_mappings() -> FieldMapper<Self> {
            let mut mapper = FieldMapper::new();
            mapper.add_map("name", MapEntry::new(FieldKind::Text, |r: &Rec| r.name.to_string()));
            mapper.add_map("id", MapEntry::new(FieldKind::Integer, |r: &Rec| r.id));
            mapper
        }
    }

    #[test]
    fn sorts_ascending_by_default() {
        let mapper = Rec::generate_mappings();
        let mut records = vec![
            Rec { name: "Rose", id: 3 },
            Rec { name: "Jack", id: 1 },
        ];
        let ordering = compile_ordering("name", true, &mapper).unwrap();
        records.sort_by(|a, b| ordering.compare(a, b));
        assert_eq!(records[0].name, "Jack");
    }

    #[test]
    fn sorts_descending_when_requested() {
        let mapper = Rec::generate_mappings();
        let mut records = vec![
            Rec { name: "Jack", id: 1 },
            Rec { name: "Rose", id: 3 },
        ];
        let ordering = compile_ordering("name", false, &mapper).unwrap();
        records.sort_by(|a, b| ordering.compare(a, b));
        assert_eq!(records[0].name, "Rose");
    }

    #[test]
    fn unknown_sort_field_errors() {
        let mapper = Rec::generate_mappings();
        assert!(compile_ordering("bogus", true, &mapper).is_err());
    }
}
