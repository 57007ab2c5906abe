//! Target data store seam.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use carelift_model::TargetRow;

/// Batched row writer for the canonical store. A failed batch is reported
/// and skipped; it must not affect previously written batches.
pub trait RecordSink: Send + Sync {
    fn write_batch(&self, table: &str, rows: &[TargetRow]) -> anyhow::Result<()>;
}

/// In-memory sink for tests and dry runs against a real pipeline.
#[derive(Debug, Default)]
pub struct MemorySink {
    tables: Mutex<BTreeMap<String, Vec<TargetRow>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, Vec<TargetRow>>> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn table_rows(&self, table: &str) -> Vec<TargetRow> {
        self.lock().get(table).cloned().unwrap_or_default()
    }

    pub fn total_rows(&self) -> usize {
        self.lock().values().map(Vec::len).sum()
    }
}

impl RecordSink for MemorySink {
    fn write_batch(&self, table: &str, rows: &[TargetRow]) -> anyhow::Result<()> {
        self.lock()
            .entry(table.to_string())
            .or_default()
            .extend_from_slice(rows);
        Ok(())
    }
}
