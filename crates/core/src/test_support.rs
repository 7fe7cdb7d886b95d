//! In-crate world-state double with failure injection.

use std::cell::Cell;
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;

use crate::state::{
    BoxedStateIterator, KeyValue, QueryResponseMetadata, StateQueryIterator, StoreError,
    WorldState,
};

#[derive(Default)]
pub struct FakeState {
    pub entries: BTreeMap<String, Vec<u8>>,
    pub fail_reads: bool,
    pub fail_writes: bool,
    pub fail_queries: bool,
    /// Items every iterator yields instead of `entries`.
    pub script: Option<Vec<Result<KeyValue, StoreError>>>,
    /// Metadata reported with every iterator.
    pub metadata: QueryResponseMetadata,
    /// Number of `close` calls across all iterators handed out.
    pub closes: Rc<Cell<usize>>,
    pub puts: usize,
    pub last_page_size: Cell<Option<i32>>,
    pub last_query: std::cell::RefCell<Option<String>>,
}

impl FakeState {
    pub fn insert(&mut self, key: &str, value: &[u8]) {
        self.entries.insert(key.to_string(), value.to_vec());
    }

    fn iterator(&self, page_size: i32) -> BoxedStateIterator<'_> {
        self.last_page_size.set(Some(page_size));
        let items: VecDeque<_> = match &self.script {
            Some(script) => script.iter().cloned().collect(),
            None => self
                .entries
                .iter()
                .map(|(key, value)| {
                    Ok(KeyValue {
                        key: key.clone(),
                        value: value.clone(),
                    })
                })
                .collect(),
        };
        Box::new(FakeIterator {
            items,
            closes: Rc::clone(&self.closes),
        })
    }
}

impl WorldState for FakeState {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        if self.fail_reads {
            return Err(StoreError::Backend("read refused".into()));
        }
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Backend("write refused".into()));
        }
        self.puts += 1;
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Backend("write refused".into()));
        }
        self.entries.remove(key);
        Ok(())
    }

    fn range_scan(
        &self,
        _start_key: &str,
        _end_key: &str,
        page_size: i32,
        _bookmark: &str,
    ) -> Result<(BoxedStateIterator<'_>, QueryResponseMetadata), StoreError> {
        if self.fail_queries {
            return Err(StoreError::Backend("scan refused".into()));
        }
        Ok((self.iterator(page_size), self.metadata.clone()))
    }

    fn rich_query(
        &self,
        query: &str,
        page_size: i32,
        _bookmark: &str,
    ) -> Result<(BoxedStateIterator<'_>, QueryResponseMetadata), StoreError> {
        if self.fail_queries {
            return Err(StoreError::InvalidQuery("query refused".into()));
        }
        *self.last_query.borrow_mut() = Some(query.to_string());
        Ok((self.iterator(page_size), self.metadata.clone()))
    }
}

struct FakeIterator {
    items: VecDeque<Result<KeyValue, StoreError>>,
    closes: Rc<Cell<usize>>,
}

impl StateQueryIterator for FakeIterator {
    fn has_next(&self) -> bool {
        !self.items.is_empty()
    }

    fn next(&mut self) -> Result<KeyValue, StoreError> {
        self.items.pop_front().unwrap_or(Err(StoreError::IteratorClosed))
    }

    fn close(&mut self) -> Result<(), StoreError> {
        self.closes.set(self.closes.get() + 1);
        Ok(())
    }
}

pub fn asset_bytes(cid: &str, asset_type: &str) -> Vec<u8> {
    format!(r#"{{"cid":"{cid}","features":"[]","id":"ID_{cid}","type":"{asset_type}"}}"#)
        .into_bytes()
}
