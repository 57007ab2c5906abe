//! Source-wide analysis with bounded parallel fan-out.
//!
//! Columns are independent, so analysis fans out over a worker pool sized
//! to the available cores. Results are collected by column index; there is
//! no ordering requirement on completion. Cancellation is cooperative and
//! checked once per column.

use std::thread;

use carelift_model::{
    AnalyzerSettings, CancelToken, ColumnProfile, MigrateError, Result, SourceTable,
};

use crate::analyzer::analyze_column;

/// Analyze every column of a source.
///
/// Fails fast with [`MigrateError::EmptySource`] when there is nothing to
/// analyze; this is the one fatal pre-flight error of the analysis phase.
pub fn analyze_source(
    source: &SourceTable,
    settings: &AnalyzerSettings,
    cancel: &CancelToken,
) -> Result<Vec<ColumnProfile>> {
    if source.columns.is_empty() {
        return Err(MigrateError::EmptySource);
    }

    let count = source.columns.len();
    let workers = worker_count(count, settings);
    let profiles = if workers <= 1 {
        let mut profiles = Vec::with_capacity(count);
        for column in &source.columns {
            if cancel.is_cancelled() {
                return Err(MigrateError::Cancelled);
            }
            profiles.push(analyze_column(&column.name, &column.values, settings));
        }
        profiles
    } else {
        analyze_parallel(source, settings, cancel, workers)?
    };

    tracing::info!(
        columns = profiles.len(),
        workers,
        kind = %source.kind,
        "source analysis complete"
    );
    Ok(profiles)
}

fn worker_count(columns: usize, settings: &AnalyzerSettings) -> usize {
    if !settings.parallel {
        return 1;
    }
    thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .min(columns)
}

fn analyze_parallel(
    source: &SourceTable,
    settings: &AnalyzerSettings,
    cancel: &CancelToken,
    workers: usize,
) -> Result<Vec<ColumnProfile>> {
    let count = source.columns.len();
    let chunk_size = count.div_ceil(workers);
    let mut slots: Vec<Option<ColumnProfile>> = (0..count).map(|_| None).collect();

    thread::scope(|scope| {
        for (columns, out) in source
            .columns
            .chunks(chunk_size)
            .zip(slots.chunks_mut(chunk_size))
        {
            scope.spawn(move || {
                for (column, slot) in columns.iter().zip(out.iter_mut()) {
                    if cancel.is_cancelled() {
                        return;
                    }
                    *slot = Some(analyze_column(&column.name, &column.values, settings));
                }
            });
        }
    });

    if cancel.is_cancelled() {
        return Err(MigrateError::Cancelled);
    }
    let profiles: Vec<ColumnProfile> = slots.into_iter().flatten().collect();
    if profiles.len() != count {
        return Err(MigrateError::Cancelled);
    }
    Ok(profiles)
}
