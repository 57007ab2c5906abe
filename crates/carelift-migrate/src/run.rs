//! Run orchestration: execute, then feed outcomes back into the learning
//! store on committed runs.

use carelift_map::{MappingStore, apply_learning};
use carelift_model::{
    AcceptedMapping, CancelToken, ExecutionMode, MigrationReport, Result, SourceFingerprint,
    SourceTable,
};

use crate::executor::MigrationExecutor;
use crate::sink::RecordSink;

/// Execute a migration and, when committing, fold the outcomes back into
/// the learned-mapping store. Learning is off the critical path: its
/// failures are logged inside [`apply_learning`] and never change the
/// report.
#[allow(clippy::too_many_arguments)]
pub fn run_migration(
    executor: &MigrationExecutor,
    fingerprint: &SourceFingerprint,
    source: &SourceTable,
    mappings: &[AcceptedMapping],
    mode: ExecutionMode,
    sink: &dyn RecordSink,
    store: &dyn MappingStore,
    tenant: Option<&str>,
    cancel: &CancelToken,
) -> Result<MigrationReport> {
    let report = executor.execute(fingerprint, source, mappings, mode, sink, cancel)?;
    if mode == ExecutionMode::Commit {
        apply_learning(store, fingerprint, &report.results, tenant);
    }
    Ok(report)
}
