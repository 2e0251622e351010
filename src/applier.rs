//! Public entry points: compiles a [`GridifyQuery`] against a [`QuerySource`]
//! via filtering, ordering, and paging.

use crate::ast::Node;
use crate::compiler::{compile_node, ordering::compile_ordering};
use crate::diag::GridifyError;
use crate::mapper::{FieldMapper, Mappable};
use crate::parser;
use crate::query::{Paging, QuerySource};
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

/// Built-in default page size, overridable process-wide through
/// [`set_default_page_size`].
const BUILTIN_DEFAULT_PAGE_SIZE: usize = 20;

static DEFAULT_PAGE_SIZE: AtomicUsize = AtomicUsize::new(BUILTIN_DEFAULT_PAGE_SIZE);

/// Returns the current process-wide default page size.
pub fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE.load(AtomicOrdering::Relaxed)
}

/// Overrides the process-wide default page size. Changes are not observed
/// atomically by in-flight operations.
pub fn set_default_page_size(size: usize) {
    DEFAULT_PAGE_SIZE.store(size.max(1), AtomicOrdering::Relaxed);
}

/// Input value carrying filter, ordering, and paging parameters, typically
/// sourced from an HTTP query string.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GridifyQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default)]
    pub page_size: u32,
    #[serde(default)]
    pub sort_by: Option<String>,
    #[serde(default = "default_true")]
    pub is_sort_asc: bool,
    #[serde(default)]
    pub filter: Option<String>,
}

fn default_page() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

impl Default for GridifyQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 0,
            sort_by: None,
            is_sort_asc: true,
            filter: None,
        }
    }
}

impl GridifyQuery {
    fn effective_page(&self) -> u32 {
        self.page.max(1)
    }

    fn effective_page_size(&self) -> usize {
        if self.page_size > 0 {
            self.page_size as usize
        } else {
            default_page_size()
        }
    }

    fn has_filter(&self) -> bool {
        self.filter.as_deref().is_some_and(|f| !f.is_empty())
    }

    fn has_sort(&self) -> bool {
        self.sort_by.as_deref().is_some_and(|s| !s.is_empty())
    }
}

fn parsed_node(filter: &str) -> Result<Node, GridifyError> {
    parser::parse(filter).map_err(GridifyError::parse)
}

/// Applies the filter clause of `gq` to `q`. No-op when `gq` is absent or the
/// filter is empty.
#[tracing::instrument(level = "debug", skip(q, mapper))]
pub fn apply_filtering<T, Q, M>(q: Q, gq: Option<&GridifyQuery>, mapper: Option<&M>) -> Result<Q, GridifyError>
where
    T: Mappable,
    Q: QuerySource<T>,
    M: std::borrow::Borrow<FieldMapper<T>>,
{
    let Some(gq) = gq else { return Ok(q) };
    if !gq.has_filter() {
        return Ok(q);
    }

    let filter = gq.filter.as_deref().unwrap();
    tracing::debug!(filter, "compiling filter expression");
    let node = parsed_node(filter)?;

    let owned_mapper;
    let mapper_ref: &FieldMapper<T> = match mapper {
        Some(m) => m.borrow(),
        None => {
            owned_mapper = T::generate_mappings();
            &owned_mapper
        }
    };

    let predicate = compile_node(&node, mapper_ref)?;
    Ok(q.where_clause(move |item| predicate(item)))
}

/// Applies the ordering clause of `gq` to `q`. No-op when `gq` is absent or
/// `sortBy` is empty.
#[tracing::instrument(level = "debug", skip(q, mapper))]
pub fn apply_ordering<T, Q, M>(q: Q, gq: Option<&GridifyQuery>, mapper: Option<&M>) -> Result<Q, GridifyError>
where
    T: Mappable,
    Q: QuerySource<T>,
    M: std::borrow::Borrow<FieldMapper<T>>,
{
    let Some(gq) = gq else { return Ok(q) };
    if !gq.has_sort() {
        return Ok(q);
    }

    let sort_by = gq.sort_by.as_deref().unwrap();
    tracing::debug!(sort_by, is_sort_asc = gq.is_sort_asc, "compiling ordering");

    let owned_mapper;
    let mapper_ref: &FieldMapper<T> = match mapper {
        Some(m) => m.borrow(),
        None => {
            owned_mapper = T::generate_mappings();
            &owned_mapper
        }
    };

    let ordering = compile_ordering(sort_by, gq.is_sort_asc, mapper_ref)?;
    Ok(q.order_by(move |a, b| ordering.compare(a, b)))
}

/// Applies the paging window of `gq` to `q`. A `None` `gq` applies the
/// built-in defaults (page 1, [`default_page_size`] records).
#[tracing::instrument(level = "debug", skip(q))]
pub fn apply_paging<T, Q>(q: Q, gq: Option<&GridifyQuery>) -> Q
where
    Q: QuerySource<T>,
{
    let default = GridifyQuery::default();
    let gq = gq.unwrap_or(&default);
    let page_size = gq.effective_page_size();
    let skip = (gq.effective_page() as usize - 1) * page_size;
    tracing::debug!(skip, take = page_size, "applying paging window");
    q.skip(skip).take(page_size)
}

/// Composition of [`apply_ordering`] followed by [`apply_paging`].
pub fn apply_ordering_and_paging<T, Q, M>(
    q: Q,
    gq: Option<&GridifyQuery>,
    mapper: Option<&M>,
) -> Result<Q, GridifyError>
where
    T: Mappable,
    Q: QuerySource<T>,
    M: std::borrow::Borrow<FieldMapper<T>>,
{
    let q = apply_ordering(q, gq, mapper)?;
    Ok(apply_paging(q, gq))
}

/// Composition of filtering, ordering, and paging, in that order.
#[tracing::instrument(level = "debug", skip(q, mapper))]
pub fn apply_everything<T, Q, M>(q: Q, gq: Option<&GridifyQuery>, mapper: Option<&M>) -> Result<Q, GridifyError>
where
    T: Mappable,
    Q: QuerySource<T>,
    M: std::borrow::Borrow<FieldMapper<T>>,
{
    let q = apply_filtering(q, gq, mapper)?;
    let q = apply_ordering(q, gq, mapper)?;
    Ok(apply_paging(q, gq))
}

/// Applies filter + ordering, materialises `total_items` by counting the
/// filtered (pre-paging) source exactly once, then applies paging.
#[tracing::instrument(level = "debug", skip(q, mapper))]
pub fn gridify_queryable<T, Q, M>(
    q: Q,
    gq: Option<&GridifyQuery>,
    mapper: Option<&M>,
) -> Result<(Q, usize), GridifyError>
where
    T: Mappable,
    Q: QuerySource<T>,
    M: std::borrow::Borrow<FieldMapper<T>>,
{
    let q = apply_filtering(q, gq, mapper)?;
    let q = apply_ordering(q, gq, mapper)?;
    let total_items = q.count();
    tracing::debug!(total_items, "materialised pre-paging count");
    let q = apply_paging(q, gq);
    Ok((q, total_items))
}

/// As [`gridify_queryable`], but also materialises `items` through the
/// source's async materialisation capability and returns a [`Paging`].
#[tracing::instrument(level = "debug", skip(q, mapper))]
pub async fn gridify_async<T, Q, M>(
    q: Q,
    gq: Option<&GridifyQuery>,
    mapper: Option<&M>,
) -> Result<Paging<T>, GridifyError>
where
    T: Mappable + Clone + 'static,
    Q: QuerySource<T>,
    M: std::borrow::Borrow<FieldMapper<T>>,
{
    let q = apply_filtering(q, gq, mapper)?;
    let q = apply_ordering(q, gq, mapper)?;
    let total_items = q.count_async().await;
    let q = apply_paging(q, gq);
    let items = q.to_vec_async().await;
    Ok(Paging { total_items, items })
}
