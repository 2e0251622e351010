//! The query-source capability contract consumed by the public applier
//! functions, and an in-memory implementation of it.

use async_trait::async_trait;

/// The windowed result of applying filtering, ordering, and paging.
///
/// Invariant: `items.len() <= page_size`, and when `total_items > 0`, `items`
/// corresponds to the `[(page-1)*page_size, page*page_size)` window of the
/// fully ordered, filtered source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paging<T> {
    pub total_items: usize,
    pub items: Vec<T>,
}

/// Capability set required from any query source: an in-memory sequence or a
/// deferred query against a backend.
///
/// `Where`/`OrderBy`/`Skip`/`Take` each return a new `QuerySource` rather than
/// mutating in place, mirroring a deferred-query builder's chaining style. A
/// backend adapter implements this trait by translating each call into its
/// native query representation; an in-memory sequence (see [`VecQuery`])
/// implements it by eagerly cloning and re-filtering its buffer.
#[async_trait]
pub trait QuerySource<T>: Sized + Send + Sync {
    /// Restricts the source to records satisfying `predicate`.
    fn where_clause(self, predicate: impl Fn(&T) -> bool) -> Self;

    /// Orders the source using `compare`.
    fn order_by(self, compare: impl Fn(&T, &T) -> std::cmp::Ordering) -> Self;

    fn skip(self, n: usize) -> Self;

    fn take(self, n: usize) -> Self;

    /// Materialises the total record count, synchronously.
    fn count(&self) -> usize;

    /// Materialises records into a vector, synchronously.
    fn to_vec(&self) -> Vec<T>
    where
        T: Clone;

    /// Materialises the total record count. The in-memory implementation
    /// resolves immediately; a deferred backend may suspend here.
    async fn count_async(&self) -> usize {
        self.count()
    }

    /// Materialises records into a vector. The in-memory implementation
    /// resolves immediately; a deferred backend may suspend here.
    async fn to_vec_async(&self) -> Vec<T>
    where
        T: Clone + 'static,
    {
        self.to_vec()
    }
}

/// An eager, in-memory [`QuerySource`] backed by a `Vec<T>`.
///
/// Every operation executes immediately rather than building a deferred
/// expression tree; this is the reference query source used by tests and by
/// callers who already hold their records in memory.
#[derive(Debug, Clone)]
pub struct VecQuery<T> {
    items: Vec<T>,
}

impl<T> VecQuery<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }
}

impl<T> From<Vec<T>> for VecQuery<T> {
    fn from(items: Vec<T>) -> Self {
        Self::new(items)
    }
}

#[async_trait]
impl<T: Send + Sync> QuerySource<T> for VecQuery<T> {
    fn where_clause(mut self, predicate: impl Fn(&T) -> bool) -> Self {
        self.items.retain(|item| predicate(item));
        self
    }

    fn order_by(mut self, compare: impl Fn(&T, &T) -> std::cmp::Ordering) -> Self {
        self.items.sort_by(compare);
        self
    }

    fn skip(mut self, n: usize) -> Self {
        if n >= self.items.len() {
            self.items.clear();
        } else {
            self.items.drain(0..n);
        }
        self
    }

    fn take(mut self, n: usize) -> Self {
        self.items.truncate(n);
        self
    }

    fn count(&self) -> usize {
        self.items.len()
    }

    fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.items.clone()
    }
}
