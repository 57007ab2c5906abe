//! Learning update: fold migration outcomes back into the learned store.
//!
//! Runs off the request-critical path after a committed run. Store
//! failures are logged at warning level and never surface as migration
//! failures.

use carelift_model::{MigrationResult, SourceFingerprint, normalize_name};

use crate::store::{MappingOutcome, MappingStore};

/// Confidence multiplier applied to a mapping rejected by a human
/// correction.
pub const CORRECTION_DECAY: f64 = 0.5;

/// Upsert one learned mapping per migration result (using the corrected
/// target when present), decay rejected mappings, and persist the source
/// fingerprint for future similarity search.
pub fn apply_learning(
    store: &dyn MappingStore,
    fingerprint: &SourceFingerprint,
    results: &[MigrationResult],
    tenant: Option<&str>,
) {
    for result in results {
        let normalized = normalize_name(&result.source_column);
        let (target_table, target_column) = result.effective_target();
        let outcome = MappingOutcome {
            normalized_name: normalized.clone(),
            origin: fingerprint.origin,
            tenant: tenant.map(ToString::to_string),
            target_table: target_table.to_string(),
            target_column: target_column.to_string(),
            transform: result.transform,
            successes: result.succeeded,
            failures: result.failed,
        };
        if let Err(error) = store.upsert_mapping(&outcome) {
            tracing::warn!(
                %error,
                column = %result.source_column,
                "learned-mapping upsert failed"
            );
        }

        // A correction means the original suggestion was rejected; its
        // stored confidence must actually drop, not just go stale.
        if result.correction.is_some()
            && let Err(error) = store.decrease_confidence(
                &normalized,
                &result.target_table,
                &result.target_column,
                CORRECTION_DECAY,
            )
        {
            tracing::warn!(
                %error,
                column = %result.source_column,
                "confidence decrease failed"
            );
        }
    }

    if let Err(error) = store.store_fingerprint(fingerprint, tenant) {
        tracing::warn!(%error, id = %fingerprint.id, "fingerprint persistence failed");
    }
}
