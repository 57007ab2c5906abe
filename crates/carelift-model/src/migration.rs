//! Migration execution types: modes, row tags, per-mapping results and the
//! run-level report.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::mapping::{MappingSuggestion, TransformKind};
use crate::source::OriginSystem;

/// How far a migration run is allowed to go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionMode {
    /// Transform and validate only; no batches are assembled.
    ValidateOnly,
    /// Full pipeline including batch assembly, but the sink is never called.
    DryRun,
    /// Batches are written and the learning update runs afterwards.
    Commit,
}

impl ExecutionMode {
    pub fn writes(self) -> bool {
        matches!(self, ExecutionMode::Commit)
    }

    pub fn assembles_batches(self) -> bool {
        matches!(self, ExecutionMode::DryRun | ExecutionMode::Commit)
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExecutionMode::ValidateOnly => "VALIDATE_ONLY",
            ExecutionMode::DryRun => "DRY_RUN",
            ExecutionMode::Commit => "COMMIT",
        };
        write!(f, "{s}")
    }
}

/// Audit marker stamped onto every migrated row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MigrationStatus {
    Migrated,
    DryRun,
}

/// One canonical-schema row headed for the target store, tagged for
/// downstream auditing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetRow {
    pub batch_id: String,
    pub source_system: Option<OriginSystem>,
    /// Zero-based row index in the source, stable across batches.
    pub source_row: usize,
    pub status: MigrationStatus,
    pub fields: BTreeMap<String, String>,
}

/// A human override replacing a suggested target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingCorrection {
    pub target_table: String,
    pub target_column: String,
}

/// A suggestion the operator signed off on, possibly redirected to a
/// different target. This is the executor's unit of input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcceptedMapping {
    pub suggestion: MappingSuggestion,
    pub correction: Option<MappingCorrection>,
}

impl AcceptedMapping {
    pub fn accepted(suggestion: MappingSuggestion) -> Self {
        Self {
            suggestion,
            correction: None,
        }
    }

    pub fn corrected(
        suggestion: MappingSuggestion,
        target_table: impl Into<String>,
        target_column: impl Into<String>,
    ) -> Self {
        Self {
            suggestion,
            correction: Some(MappingCorrection {
                target_table: target_table.into(),
                target_column: target_column.into(),
            }),
        }
    }

    /// The (table, column) rows actually land in.
    pub fn target(&self) -> (&str, &str) {
        match &self.correction {
            Some(correction) => (
                correction.target_table.as_str(),
                correction.target_column.as_str(),
            ),
            None => (
                self.suggestion.target_table.as_str(),
                self.suggestion.target_column.as_str(),
            ),
        }
    }
}

/// Outcome of one mapping within one migration batch. Consumed by the
/// learning step and then discarded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationResult {
    pub target_table: String,
    pub target_column: String,
    pub source_column: String,
    /// Transformation applied during the run, if any.
    pub transform: Option<TransformKind>,
    pub attempted: u64,
    pub succeeded: u64,
    pub failed: u64,
    /// Distinct validation messages, not one entry per failing row.
    pub errors: BTreeSet<String>,
    /// False when a human corrected the suggestion before the run.
    pub accepted_as_is: bool,
    pub correction: Option<MappingCorrection>,
}

impl MigrationResult {
    /// The mapping the learning step should reinforce: the correction when
    /// present, otherwise the original suggestion.
    pub fn effective_target(&self) -> (&str, &str) {
        match &self.correction {
            Some(correction) => (
                correction.target_table.as_str(),
                correction.target_column.as_str(),
            ),
            None => (self.target_table.as_str(), self.target_column.as_str()),
        }
    }
}

/// A rejected write batch, scoped to its row range. Non-fatal; prior
/// batches stand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchError {
    pub target_table: String,
    pub row_start: usize,
    pub row_end: usize,
    pub message: String,
}

/// Structured result of a migration run. Always produced, even when every
/// row fails validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationReport {
    pub batch_id: String,
    pub mode: ExecutionMode,
    pub results: Vec<MigrationResult>,
    pub batch_errors: Vec<BatchError>,
    pub rows_seen: u64,
    pub rows_written: u64,
    /// True when the run stopped at a cancellation checkpoint.
    pub cancelled: bool,
}

impl MigrationReport {
    pub fn total_failed(&self) -> u64 {
        self.results.iter().map(|r| r.failed).sum()
    }

    pub fn distinct_errors(&self) -> BTreeSet<&str> {
        self.results
            .iter()
            .flat_map(|r| r.errors.iter().map(String::as_str))
            .collect()
    }
}
