//! Turns a store cursor into one bounded page of assets.
//!
//! Range scans and rich queries both hand back a [`StateQueryIterator`];
//! [`collect_page`] drains either kind the same way. The store enforces the
//! page size, so the records are never truncated here, and the bookmark is
//! passed through untouched.

use crate::assets::{Asset, Page};
use crate::error::CoreError;
use crate::state::{BoxedStateIterator, KeyValue, QueryResponseMetadata, StoreError, WorldState};

/// Owns an open state iterator and closes it exactly once on drop.
pub struct IteratorGuard<'a> {
    inner: BoxedStateIterator<'a>,
    op: &'static str,
}

impl<'a> IteratorGuard<'a> {
    pub fn new(inner: BoxedStateIterator<'a>, op: &'static str) -> Self {
        Self { inner, op }
    }

    pub fn has_next(&self) -> bool {
        self.inner.has_next()
    }

    pub fn next(&mut self) -> Result<KeyValue, StoreError> {
        self.inner.next()
    }
}

impl Drop for IteratorGuard<'_> {
    fn drop(&mut self) {
        if let Err(err) = self.inner.close() {
            tracing::warn!(op = self.op, error = %err, "Failed to release state iterator");
        }
    }
}

/// Decode every remaining item of `iter` into a [`Page`].
///
/// The iterator is released before returning on every path. A read or decode
/// failure aborts the whole page.
pub fn collect_page(
    op: &'static str,
    iter: BoxedStateIterator<'_>,
    metadata: QueryResponseMetadata,
) -> Result<Page, CoreError> {
    let mut guard = IteratorGuard::new(iter, op);
    let mut records = Vec::new();

    while guard.has_next() {
        let kv = guard
            .next()
            .map_err(|source| CoreError::StoreRead { op, source })?;
        let asset =
            Asset::from_bytes(&kv.value).map_err(|source| CoreError::Decoding { op, source })?;
        records.push(asset);
    }

    Ok(Page {
        records,
        fetched_records_count: metadata.fetched_records_count,
        bookmark: metadata.bookmark,
    })
}

/// One page of a rich query. `query` is passed to the store verbatim.
pub fn query_page<S: WorldState + ?Sized>(
    state: &S,
    query: &str,
    page_size: i32,
    bookmark: &str,
) -> Result<Page, CoreError> {
    const OP: &str = "QueryAssets";

    let (iter, metadata) = state
        .rich_query(query, page_size, bookmark)
        .map_err(|source| CoreError::StoreRead { op: OP, source })?;

    collect_page(OP, iter, metadata)
}

/// One page of a full key-order scan.
pub fn range_page<S: WorldState + ?Sized>(
    state: &S,
    page_size: i32,
    bookmark: &str,
) -> Result<Page, CoreError> {
    const OP: &str = "ReadAssets";

    let (iter, metadata) = state
        .range_scan("", "", page_size, bookmark)
        .map_err(|source| CoreError::StoreRead { op: OP, source })?;

    collect_page(OP, iter, metadata)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
