use std::sync::{Mutex, PoisonError};

use dicelog_types::EventRecord;

use crate::error::Result;
use crate::listener::Listener;

/// Listener that keeps every received record in memory.
///
/// Handy for tests and for front-ends that want to inspect recent events.
#[derive(Default)]
pub struct MemorySink {
    records: Mutex<Vec<EventRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of all records received so far, in delivery order.
    pub fn records(&self) -> Vec<EventRecord> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Remove and return everything received so far.
    pub fn drain(&self) -> Vec<EventRecord> {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<EventRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Listener for MemorySink {
    fn name(&self) -> &str {
        "memory-sink"
    }

    fn on_event(&self, record: &EventRecord) -> Result<()> {
        self.lock().push(record.clone());
        Ok(())
    }
}
