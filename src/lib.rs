//! Pure-Rust filter/order/page query compiler with rich diagnostics, for any
//! in-process query source.
//!
//! # Filter and page an in-memory collection
//!
//! ```
//! use gridify::{apply_everything, FieldKind, FieldMapper, GridifyQuery, Mappable, VecQuery, QuerySource};
//!
//! #[derive(Clone)]
//! struct Person { name: String, age: i64 }
//!
//! impl Mappable for Person {
//!     fn generate_mappings() -> FieldMapper<Self> {
//!         let mut mapper = FieldMapper::new();
//!         mapper.add_map("name", gridify::MapEntry::new(FieldKind::Text, |p: &Person| p.name.clone()));
//!         mapper.add_map("age", gridify::MapEntry::new(FieldKind::Integer, |p: &Person| p.age));
//!         mapper
//!     }
//! }
//!
//! let people = vec![
//!     Person { name: "John".into(), age: 30 },
//!     Person { name: "Jack".into(), age: 20 },
//! ];
//!
//! let gq = GridifyQuery { filter: Some("age>>25".into()), ..GridifyQuery::default() };
//! let q = apply_everything::<Person, _, FieldMapper<Person>>(VecQuery::new(people), Some(&gq), None).unwrap();
//! assert_eq!(q.to_vec().len(), 1);
//! ```

pub mod applier;
pub mod ast;
pub mod compiler;
pub mod diag;
pub mod lexer;
pub mod mapper;
pub mod parser;
pub mod query;

pub use applier::{
    apply_everything, apply_filtering, apply_ordering, apply_ordering_and_paging, apply_paging,
    default_page_size, gridify_async, gridify_queryable, set_default_page_size, GridifyQuery,
};
pub use ast::{CmpOp, Node, Span, Spanned};
pub use compiler::{compile_node, ordering::compile_ordering, Predicate};
pub use diag::{Diag, DiagLabel, DiagSeverity, GridifyError, GridifyErrorKind};
pub use lexer::token::{Token, TokenKind};
pub use lexer::{tokenize, LexerResult};
pub use mapper::{FieldKind, FieldMapper, FieldValue, IntoFieldValue, MapEntry, Mappable};
pub use parser::parse as parse_filter;
pub use query::{Paging, QuerySource, VecQuery};
