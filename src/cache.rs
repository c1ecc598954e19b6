use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use crate::models::SubscriptionRecord;
use crate::services::grouping::dedupe_by_name_and_amount;
use crate::services::pipeline::prepare_working_set;

struct Slot<T> {
    inner: RwLock<Option<(u64, T)>>,
}

impl<T: Clone> Slot<T> {
    fn new() -> Self {
        Self {
            inner: RwLock::new(None),
        }
    }

    fn get(&self, gen: u64) -> Option<T> {
        let guard = self.inner.read().ok()?;
        match guard.as_ref() {
            Some((stored_gen, val)) if *stored_gen == gen => Some(val.clone()),
            _ => None,
        }
    }

    fn set(&self, gen: u64, val: T) {
        if let Ok(mut guard) = self.inner.write() {
            *guard = Some((gen, val));
        }
    }
}

pub type WorkingSet = Arc<Vec<Vec<SubscriptionRecord>>>;

/// The raw dataset plus everything derived from it. Derived values are
/// rebuilt lazily after the generation moves.
pub struct DatasetCache {
    generation: AtomicU64,
    records: RwLock<Arc<Vec<SubscriptionRecord>>>,
    working_set: Slot<WorkingSet>,
    table_rows: Slot<Arc<Vec<SubscriptionRecord>>>,
}

impl Default for DatasetCache {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetCache {
    pub fn new() -> Self {
        Self {
            generation: AtomicU64::new(0),
            records: RwLock::new(Arc::new(Vec::new())),
            working_set: Slot::new(),
            table_rows: Slot::new(),
        }
    }

    /// Swap in a freshly fetched dataset.
    pub fn replace(&self, records: Vec<SubscriptionRecord>) {
        if let Ok(mut guard) = self.records.write() {
            *guard = Arc::new(records);
        }
        self.invalidate();
    }

    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    fn gen(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub fn records(&self) -> Arc<Vec<SubscriptionRecord>> {
        self.records
            .read()
            .map(|guard| Arc::clone(&*guard))
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Vendor-grouped records with zero-span contracts removed.
    pub fn working_set(&self) -> WorkingSet {
        let gen = self.gen();
        if let Some(cached) = self.working_set.get(gen) {
            return cached;
        }
        let val = Arc::new(prepare_working_set(self.records().to_vec()));
        self.working_set.set(gen, val.clone());
        val
    }

    /// Records for the subscription table and export, duplicates removed.
    pub fn table_rows(&self) -> Arc<Vec<SubscriptionRecord>> {
        let gen = self.gen();
        if let Some(cached) = self.table_rows.get(gen) {
            return cached;
        }
        let val = Arc::new(dedupe_by_name_and_amount(&self.records()));
        self.table_rows.set(gen, val.clone());
        val
    }
}
