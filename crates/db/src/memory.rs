//! In-memory world state.
//!
//! Keys are kept in lexical order, so a range scan walks `cid`s in the same
//! order a LevelDB-backed ledger would. Bookmarks are the key of the last
//! record handed out; an empty page echoes the incoming bookmark back.
//! Writing an empty value deletes the key, as a ledger write set does.

use std::collections::{BTreeMap, VecDeque};
use std::ops::Bound;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chainav_core::state::{
    BoxedStateIterator, KeyValue, QueryResponseMetadata, StateQueryIterator, StoreError,
    WorldState,
};

use crate::config::StateConfig;
use crate::selector::Selector;

/// World state held in a `BTreeMap`.
#[derive(Debug, Default)]
pub struct MemoryWorldState {
    entries: BTreeMap<String, Vec<u8>>,
    config: StateConfig,
    open_iterators: Arc<AtomicUsize>,
}

impl MemoryWorldState {
    pub fn new(config: StateConfig) -> Self {
        Self {
            entries: BTreeMap::new(),
            config,
            open_iterators: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterators handed out and not yet closed.
    pub fn open_iterators(&self) -> usize {
        self.open_iterators.load(Ordering::SeqCst)
    }

    /// Run `f` as one transaction: if it fails, every write it made is undone.
    pub fn transact<T, E>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, E>,
    ) -> Result<T, E> {
        let snapshot = self.entries.clone();
        let result = f(self);
        if result.is_err() {
            let discarded = changed_keys(&snapshot, &self.entries);
            self.entries = snapshot;
            tracing::debug!(discarded, "Rolled back failed transaction");
        }
        result
    }

    fn open_page(
        &self,
        items: Vec<KeyValue>,
        bookmark: &str,
    ) -> (BoxedStateIterator<'_>, QueryResponseMetadata) {
        let metadata = QueryResponseMetadata {
            fetched_records_count: i32::try_from(items.len()).unwrap_or(i32::MAX),
            bookmark: items
                .last()
                .map_or_else(|| bookmark.to_string(), |kv| kv.key.clone()),
        };

        let open = self.open_iterators.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(
            fetched = metadata.fetched_records_count,
            open_iterators = open,
            "Opened state iterator"
        );

        let iter = MemoryIterator {
            items: items.into(),
            open_iterators: Arc::clone(&self.open_iterators),
            closed: false,
        };
        (Box::new(iter), metadata)
    }
}

/// Keys added, removed or rewritten between two versions of the map.
fn changed_keys(before: &BTreeMap<String, Vec<u8>>, after: &BTreeMap<String, Vec<u8>>) -> usize {
    let rewritten = after
        .iter()
        .filter(|(key, value)| before.get(key.as_str()) != Some(*value))
        .count();
    let removed = before.keys().filter(|key| !after.contains_key(key.as_str())).count();
    rewritten + removed
}

fn to_kv((key, value): (&String, &Vec<u8>)) -> KeyValue {
    KeyValue {
        key: key.clone(),
        value: value.clone(),
    }
}

impl WorldState for MemoryWorldState {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        if key.is_empty() {
            return Err(StoreError::EmptyKey);
        }
        if value.is_empty() {
            self.entries.remove(key);
        } else {
            self.entries.insert(key.to_string(), value);
        }
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), StoreError> {
        if key.is_empty() {
            return Err(StoreError::EmptyKey);
        }
        self.entries.remove(key);
        Ok(())
    }

    fn range_scan(
        &self,
        start_key: &str,
        end_key: &str,
        page_size: i32,
        bookmark: &str,
    ) -> Result<(BoxedStateIterator<'_>, QueryResponseMetadata), StoreError> {
        let lower = if !bookmark.is_empty() && bookmark >= start_key {
            Bound::Excluded(bookmark)
        } else {
            Bound::Included(start_key)
        };
        let upper = if end_key.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Excluded(end_key)
        };

        let items = if range_is_empty(lower, upper) {
            Vec::new()
        } else {
            self.entries
                .range::<str, _>((lower, upper))
                .take(self.config.page_bound(page_size))
                .map(to_kv)
                .collect()
        };

        Ok(self.open_page(items, bookmark))
    }

    fn rich_query(
        &self,
        query: &str,
        page_size: i32,
        bookmark: &str,
    ) -> Result<(BoxedStateIterator<'_>, QueryResponseMetadata), StoreError> {
        if !self.config.rich_query {
            return Err(StoreError::RichQueryUnsupported);
        }
        let selector = Selector::parse(query)?;

        let lower = if bookmark.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Excluded(bookmark)
        };

        let items = self
            .entries
            .range::<str, _>((lower, Bound::Unbounded))
            .filter(|(_, value)| {
                serde_json::from_slice::<serde_json::Value>(value)
                    .is_ok_and(|doc| doc.is_object() && selector.matches(&doc))
            })
            .take(self.config.page_bound(page_size))
            .map(to_kv)
            .collect();

        Ok(self.open_page(items, bookmark))
    }
}

/// `BTreeMap::range` panics on inverted bounds; treat them as empty.
fn range_is_empty(lower: Bound<&str>, upper: Bound<&str>) -> bool {
    let start = match lower {
        Bound::Included(k) | Bound::Excluded(k) => k,
        Bound::Unbounded => return false,
    };
    match upper {
        Bound::Excluded(end) => start >= end,
        Bound::Included(end) => start > end,
        Bound::Unbounded => false,
    }
}

/// Iterator over one materialized page.
struct MemoryIterator {
    items: VecDeque<KeyValue>,
    open_iterators: Arc<AtomicUsize>,
    closed: bool,
}

impl StateQueryIterator for MemoryIterator {
    fn has_next(&self) -> bool {
        !self.closed && !self.items.is_empty()
    }

    fn next(&mut self) -> Result<KeyValue, StoreError> {
        if self.closed {
            return Err(StoreError::IteratorClosed);
        }
        self.items
            .pop_front()
            .ok_or_else(|| StoreError::Backend("iterator exhausted".into()))
    }

    fn close(&mut self) -> Result<(), StoreError> {
        if !self.closed {
            self.closed = true;
            self.items.clear();
            self.open_iterators.fetch_sub(1, Ordering::SeqCst);
            tracing::debug!("Closed state iterator");
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn state_with(keys: &[&str]) -> MemoryWorldState {
        let mut state = MemoryWorldState::new(StateConfig::default());
        for key in keys {
            let doc = format!(r#"{{"cid":"{key}","type":"PDF"}}"#);
            state.put(key, doc.into_bytes()).unwrap();
        }
        state
    }

    fn drain(mut iter: BoxedStateIterator<'_>) -> Vec<String> {
        let mut keys = Vec::new();
        while iter.has_next() {
            keys.push(iter.next().unwrap().key);
        }
        iter.close().unwrap();
        keys
    }

    #[test]
    fn put_rejects_empty_key() {
        let mut state = MemoryWorldState::default();
        assert_matches!(state.put("", b"x".to_vec()), Err(StoreError::EmptyKey));
    }

    #[test]
    fn put_empty_value_removes_key() {
        let mut state = state_with(&["a", "b"]);
        state.put("a", Vec::new()).unwrap();
        state.put("z", Vec::new()).unwrap();

        assert_eq!(state.get("a").unwrap(), None);
        assert_eq!(state.get("z").unwrap(), None);
        let (iter, _) = state.range_scan("", "", 10, "").unwrap();
        assert_eq!(drain(iter), ["b"]);
    }

    #[test]
    fn delete_absent_key_is_ok() {
        let mut state = MemoryWorldState::default();
        assert!(state.delete("nothing").is_ok());
    }

    #[test]
    fn range_scan_walks_keys_in_lexical_order() {
        let state = state_with(&["b", "a", "c"]);
        let (iter, meta) = state.range_scan("", "", 10, "").unwrap();

        assert_eq!(drain(iter), ["a", "b", "c"]);
        assert_eq!(meta.fetched_records_count, 3);
        assert_eq!(meta.bookmark, "c");
    }

    #[test]
    fn range_scan_respects_bounds_and_bookmark() {
        let state = state_with(&["a", "b", "c", "d"]);

        let (iter, _) = state.range_scan("b", "d", 10, "").unwrap();
        assert_eq!(drain(iter), ["b", "c"]);

        let (iter, _) = state.range_scan("b", "d", 10, "b").unwrap();
        assert_eq!(drain(iter), ["c"]);
    }

    #[test]
    fn inverted_range_is_empty() {
        let state = state_with(&["a", "b"]);
        let (iter, meta) = state.range_scan("b", "a", 10, "").unwrap();
        assert!(drain(iter).is_empty());
        assert_eq!(meta.fetched_records_count, 0);
    }

    #[test]
    fn exhausted_scan_echoes_bookmark() {
        let state = state_with(&["a", "b"]);
        let (iter, meta) = state.range_scan("", "", 5, "b").unwrap();
        assert!(drain(iter).is_empty());
        assert_eq!(meta.fetched_records_count, 0);
        assert_eq!(meta.bookmark, "b");
    }

    #[test]
    fn page_size_is_bounded_by_total_query_limit() {
        let mut state = MemoryWorldState::new(StateConfig {
            rich_query: true,
            total_query_limit: 2,
        });
        for key in ["a", "b", "c"] {
            state.put(key, b"{}".to_vec()).unwrap();
        }

        let (iter, _) = state.range_scan("", "", 0, "").unwrap();
        assert_eq!(drain(iter), ["a", "b"]);
        let (iter, _) = state.range_scan("", "", 10, "").unwrap();
        assert_eq!(drain(iter).len(), 2);
    }

    #[test]
    fn rich_query_filters_and_skips_non_documents() {
        let mut state = state_with(&["a", "b"]);
        state.put("raw", b"not json".to_vec()).unwrap();
        state.put("arr", b"[1,2]".to_vec()).unwrap();
        state
            .put("c", br#"{"cid":"c","type":"PE"}"#.to_vec())
            .unwrap();

        let (iter, meta) = state
            .rich_query(r#"{"selector":{"type":"PDF"}}"#, 10, "")
            .unwrap();
        assert_eq!(drain(iter), ["a", "b"]);
        assert_eq!(meta.bookmark, "b");
    }

    #[test]
    fn rich_query_resumes_after_bookmark() {
        let state = state_with(&["a", "b", "c"]);
        let (iter, meta) = state
            .rich_query(r#"{"selector":{}}"#, 1, "a")
            .unwrap();
        assert_eq!(drain(iter), ["b"]);
        assert_eq!(meta.bookmark, "b");
    }

    #[test]
    fn rich_query_can_be_disabled() {
        let state = MemoryWorldState::new(StateConfig {
            rich_query: false,
            ..Default::default()
        });
        assert_matches!(
            state.rich_query(r#"{"selector":{}}"#, 1, ""),
            Err(StoreError::RichQueryUnsupported)
        );
    }

    #[test]
    fn malformed_query_opens_no_iterator() {
        let state = state_with(&["a"]);
        assert_matches!(
            state.rich_query("{", 1, ""),
            Err(StoreError::InvalidQuery(_))
        );
        assert_eq!(state.open_iterators(), 0);
    }

    #[test]
    fn iterator_accounting_and_double_close() {
        let state = state_with(&["a", "b"]);
        let (mut iter, _) = state.range_scan("", "", 10, "").unwrap();
        assert_eq!(state.open_iterators(), 1);

        iter.close().unwrap();
        iter.close().unwrap();
        assert_eq!(state.open_iterators(), 0);
        assert!(!iter.has_next());
        assert_matches!(iter.next(), Err(StoreError::IteratorClosed));
    }

    #[test]
    fn transact_rolls_back_on_error() {
        let mut state = state_with(&["a"]);

        let result: Result<(), StoreError> = state.transact(|tx| {
            tx.put("b", b"{}".to_vec())?;
            tx.delete("a")?;
            tx.put("", b"{}".to_vec())
        });

        assert_matches!(result, Err(StoreError::EmptyKey));
        assert_eq!(state.len(), 1);
        assert!(state.get("a").unwrap().is_some());
        assert!(state.get("b").unwrap().is_none());
    }

    #[test]
    fn changed_keys_counts_rewrites_and_swaps() {
        let before = state_with(&["a", "b"]).entries;

        let mut rewritten = before.clone();
        rewritten.insert("a".into(), b"{}".to_vec());
        assert_eq!(changed_keys(&before, &rewritten), 1);

        let mut swapped = before.clone();
        swapped.remove("a");
        swapped.insert("c".into(), b"{}".to_vec());
        assert_eq!(changed_keys(&before, &swapped), 2);

        assert_eq!(changed_keys(&before, &before.clone()), 0);
    }

    #[test]
    fn transact_keeps_writes_on_success() {
        let mut state = MemoryWorldState::default();
        state
            .transact(|tx| tx.put("a", b"{}".to_vec()))
            .unwrap();
        assert_eq!(state.len(), 1);
    }
}
