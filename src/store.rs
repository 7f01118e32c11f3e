//! In-process page storage

use std::collections::HashMap;
use std::sync::RwLock;

use uuid::Uuid;

use crate::payload::PageRecord;

/// Storage for generated pages, keyed by page ID
pub trait PageStore: Send + Sync {
    fn get(&self, id: &str) -> Option<PageRecord>;

    /// Insert or replace the record stored under `record.id`
    fn put(&self, record: PageRecord);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Map-backed store living as long as the process. Nothing is evicted.
#[derive(Debug, Default)]
pub struct MemoryPageStore {
    pages: RwLock<HashMap<String, PageRecord>>,
}

impl MemoryPageStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PageStore for MemoryPageStore {
    fn get(&self, id: &str) -> Option<PageRecord> {
        match self.pages.read() {
            Ok(pages) => pages.get(id).cloned(),
            Err(_) => {
                tracing::warn!(id, "page store lock poisoned");
                None
            }
        }
    }

    fn put(&self, record: PageRecord) {
        match self.pages.write() {
            Ok(mut pages) => {
                pages.insert(record.id.clone(), record);
            }
            Err(_) => tracing::warn!(id = %record.id, "page store lock poisoned, record dropped"),
        }
    }

    fn len(&self) -> usize {
        self.pages.read().map(|pages| pages.len()).unwrap_or(0)
    }
}

/// Random lowercase hex ID of `len` characters, clamped to 1..=32
pub fn generate_id(len: usize) -> String {
    let len = len.clamp(1, 32);
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(len);
    id
}
