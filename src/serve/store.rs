use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::fetch::FetchResult;

/// In-memory results for the viewer, keyed by fetch second. Never evicted; last writer wins.
#[derive(Default)]
pub struct ResultStore {
    entries: RwLock<BTreeMap<String, FetchResult>>,
}

impl ResultStore {
    pub fn new() -> Self { Self::default() }

    pub fn insert(&self, key: String, result: FetchResult) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(key, result);
    }

    pub fn get(&self, key: &str) -> Option<FetchResult> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.get(key).cloned()
    }

    /// Snapshot in key order.
    pub fn list(&self) -> Vec<(String, FetchResult)> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }
}
