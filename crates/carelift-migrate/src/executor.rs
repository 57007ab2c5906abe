//! Migration execution.
//!
//! Suggestions are grouped by target table. Within a table every row is
//! transformed and validated; a row with any failing field is excluded
//! from that table's batch only (row-level atomicity per table, not across
//! tables). Committed rows go to the sink in fixed-size batches applied in
//! stable row order; a rejected batch is recorded with its row range and
//! later batches continue. The run always produces a structured report;
//! only structural pre-flight problems raise.

use std::collections::{BTreeMap, BTreeSet};

use chrono::Utc;

use carelift_model::{
    AcceptedMapping, BatchError, CancelToken, ExecutionMode, ExecutorSettings, MappingCorrection,
    MigrateError, MigrationReport, MigrationResult, MigrationStatus, PatternTag, Result,
    SourceFingerprint, SourceTable, TargetColumn, TargetRow, TargetSchemaCatalog, TransformKind,
};
use carelift_transform::infer_transform;

use crate::sink::RecordSink;
use crate::validate::validate_value;

pub struct MigrationExecutor {
    catalog: TargetSchemaCatalog,
    settings: ExecutorSettings,
}

struct MappingRun {
    source_column: String,
    column: TargetColumn,
    transform: Option<TransformKind>,
    accepted_as_is: bool,
    correction: Option<MappingCorrection>,
    failed: u64,
    errors: BTreeSet<String>,
    /// Source rows where this field validated and the whole row was kept.
    valid_rows: Vec<usize>,
}

struct TableGroup {
    table: String,
    runs: Vec<MappingRun>,
}

impl MigrationExecutor {
    pub fn new(catalog: TargetSchemaCatalog, settings: ExecutorSettings) -> Self {
        Self { catalog, settings }
    }

    pub fn execute(
        &self,
        fingerprint: &SourceFingerprint,
        source: &SourceTable,
        mappings: &[AcceptedMapping],
        mode: ExecutionMode,
        sink: &dyn RecordSink,
        cancel: &CancelToken,
    ) -> Result<MigrationReport> {
        if source.columns.is_empty() {
            return Err(MigrateError::EmptySource);
        }
        let mut groups = self.build_groups(fingerprint, mappings)?;
        let batch_id = format!("{}-{}", fingerprint.id, Utc::now().timestamp_millis());
        let row_count = source.row_count();
        let status = match mode {
            ExecutionMode::Commit => MigrationStatus::Migrated,
            _ => MigrationStatus::DryRun,
        };

        let mut results = Vec::new();
        let mut batch_errors = Vec::new();
        let mut rows_written = 0u64;
        let mut cancelled = false;

        for group in &mut groups {
            if cancelled || cancel.is_cancelled() {
                cancelled = true;
                break;
            }

            let mut pending: Vec<TargetRow> = Vec::new();
            for row in 0..row_count {
                let mut fields = BTreeMap::new();
                let mut row_ok = true;
                let mut field_valid = vec![false; group.runs.len()];

                for (idx, run) in group.runs.iter_mut().enumerate() {
                    let raw = source.value(&run.source_column, row);
                    let transformed = match (raw, run.transform) {
                        (Some(value), Some(kind)) => match carelift_transform::apply(kind, value) {
                            Ok(out) => Some(out),
                            Err(error) => {
                                run.errors.insert(error.to_string());
                                run.failed += 1;
                                row_ok = false;
                                continue;
                            }
                        },
                        (Some(value), None) => Some(value.to_string()),
                        (None, _) => None,
                    };
                    let value = transformed.as_deref().filter(|v| !v.trim().is_empty());
                    match validate_value(&run.column, value) {
                        Ok(()) => {
                            field_valid[idx] = true;
                            if let Some(value) = value {
                                fields.insert(run.column.name.clone(), value.to_string());
                            }
                        }
                        Err(message) => {
                            run.errors.insert(message);
                            run.failed += 1;
                            row_ok = false;
                        }
                    }
                }

                if !row_ok {
                    continue;
                }
                for (run, valid) in group.runs.iter_mut().zip(&field_valid) {
                    if *valid {
                        run.valid_rows.push(row);
                    }
                }
                if mode.assembles_batches() {
                    pending.push(TargetRow {
                        batch_id: batch_id.clone(),
                        source_system: fingerprint.origin,
                        source_row: row,
                        status,
                        fields,
                    });
                }
            }

            // Batches are applied in stable row order so error row ranges
            // stay meaningful.
            let mut written: BTreeSet<usize> = BTreeSet::new();
            if mode.writes() {
                for chunk in pending.chunks(self.settings.batch_size) {
                    if cancel.is_cancelled() {
                        cancelled = true;
                        break;
                    }
                    match sink.write_batch(&group.table, chunk) {
                        Ok(()) => {
                            written.extend(chunk.iter().map(|row| row.source_row));
                            rows_written += chunk.len() as u64;
                        }
                        Err(error) => {
                            let row_start = chunk.first().map(|r| r.source_row).unwrap_or(0);
                            let row_end = chunk.last().map(|r| r.source_row).unwrap_or(row_start);
                            tracing::warn!(
                                table = %group.table,
                                row_start,
                                row_end,
                                %error,
                                "batch write rejected; continuing with later batches"
                            );
                            batch_errors.push(BatchError {
                                target_table: group.table.clone(),
                                row_start,
                                row_end,
                                message: error.to_string(),
                            });
                        }
                    }
                }
            }

            for run in &group.runs {
                let succeeded = if mode.writes() {
                    run.valid_rows
                        .iter()
                        .filter(|row| written.contains(*row))
                        .count() as u64
                } else {
                    run.valid_rows.len() as u64
                };
                results.push(MigrationResult {
                    target_table: group.table.clone(),
                    target_column: run.column.name.clone(),
                    source_column: run.source_column.clone(),
                    transform: run.transform,
                    attempted: row_count as u64,
                    succeeded,
                    failed: run.failed,
                    errors: run.errors.clone(),
                    accepted_as_is: run.accepted_as_is,
                    correction: run.correction.clone(),
                });
            }
        }

        let report = MigrationReport {
            batch_id,
            mode,
            results,
            batch_errors,
            rows_seen: row_count as u64,
            rows_written,
            cancelled,
        };
        tracing::info!(
            batch_id = %report.batch_id,
            mode = %report.mode,
            rows_seen = report.rows_seen,
            rows_written = report.rows_written,
            failed = report.total_failed(),
            cancelled = report.cancelled,
            "migration run finished"
        );
        Ok(report)
    }

    /// Group accepted mappings by their effective target table, resolving
    /// every target against the catalog up front. Unknown targets are the
    /// executor's structural pre-flight errors.
    fn build_groups(
        &self,
        fingerprint: &SourceFingerprint,
        mappings: &[AcceptedMapping],
    ) -> Result<Vec<TableGroup>> {
        let mut groups: Vec<TableGroup> = Vec::new();
        for accepted in mappings {
            let (table_name, column_name) = accepted.target();
            let table = self
                .catalog
                .table(table_name)
                .ok_or_else(|| MigrateError::UnknownTable(table_name.to_string()))?;
            let column = table
                .column(column_name)
                .ok_or_else(|| MigrateError::UnknownColumn {
                    table: table_name.to_string(),
                    column: column_name.to_string(),
                })?;

            // A correction changes the landing column, so the original
            // suggestion's transformation no longer applies.
            let transform = match &accepted.correction {
                Some(correction) => {
                    let dominant = fingerprint
                        .column(&accepted.suggestion.normalized_name)
                        .map(|profile| profile.dominant)
                        .unwrap_or(PatternTag::Unknown);
                    infer_transform(dominant, &correction.target_column)
                }
                None => accepted.suggestion.transform,
            };

            let run = MappingRun {
                source_column: accepted.suggestion.source_column.clone(),
                column: column.clone(),
                transform,
                accepted_as_is: accepted.correction.is_none(),
                correction: accepted.correction.clone(),
                failed: 0,
                errors: BTreeSet::new(),
                valid_rows: Vec::new(),
            };
            match groups.iter().position(|group| group.table == table.name) {
                Some(idx) => groups[idx].runs.push(run),
                None => groups.push(TableGroup {
                    table: table.name.clone(),
                    runs: vec![run],
                }),
            }
        }
        Ok(groups)
    }
}
