//! World-state capability interface.
//!
//! The contract never touches storage directly. The host hands it something
//! implementing [`WorldState`]; paginated reads come back as a
//! [`StateQueryIterator`] plus [`QueryResponseMetadata`]. Range scans and rich
//! queries share the same iterator contract so pagination is written once.

/// One key/value pair yielded by a state iterator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    pub key: String,
    pub value: Vec<u8>,
}

/// Store-reported bookkeeping for one paginated read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryResponseMetadata {
    /// Number of records the store placed in this page.
    pub fetched_records_count: i32,
    /// Opaque resumption token. Pass it back unmodified to continue.
    pub bookmark: String,
}

/// Collaborator fault raised by a world-state implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("key must not be empty")]
    EmptyKey,

    #[error("invalid query: {0}")]
    InvalidQuery(String),

    #[error("rich queries are not supported by this state database")]
    RichQueryUnsupported,

    #[error("iterator is closed")]
    IteratorClosed,

    #[error("state backend failure: {0}")]
    Backend(String),
}

/// Cursor over one page of a range scan or rich query.
///
/// The iterator owns whatever cursor resource the store opened for it.
/// Callers must call [`close`](Self::close) exactly once when done;
/// [`crate::pagination::IteratorGuard`] does this on every exit path.
pub trait StateQueryIterator {
    fn has_next(&self) -> bool;

    fn next(&mut self) -> Result<KeyValue, StoreError>;

    /// Release the underlying cursor. Closing twice must be harmless.
    fn close(&mut self) -> Result<(), StoreError>;
}

impl std::fmt::Debug for dyn StateQueryIterator + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateQueryIterator").finish_non_exhaustive()
    }
}

pub type BoxedStateIterator<'a> = Box<dyn StateQueryIterator + 'a>;

/// Key-value world state with optional rich-query support.
pub trait WorldState {
    /// Raw bytes stored under `key`, or `None` when the key is absent.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    fn put(&mut self, key: &str, value: Vec<u8>) -> Result<(), StoreError>;

    /// Remove `key`. Removing an absent key is not an error.
    fn delete(&mut self, key: &str) -> Result<(), StoreError>;

    /// Keys in `[start_key, end_key)` in key order, one page at a time.
    /// An empty `end_key` leaves the range unbounded above.
    fn range_scan(
        &self,
        start_key: &str,
        end_key: &str,
        page_size: i32,
        bookmark: &str,
    ) -> Result<(BoxedStateIterator<'_>, QueryResponseMetadata), StoreError>;

    /// Evaluate a store-native query, one page at a time.
    fn rich_query(
        &self,
        query: &str,
        page_size: i32,
        bookmark: &str,
    ) -> Result<(BoxedStateIterator<'_>, QueryResponseMetadata), StoreError>;
}
