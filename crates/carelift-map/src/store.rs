//! Narrow repository interface over the externally-owned learning store,
//! plus an in-memory implementation used by tests and local runs.
//!
//! The real store lives outside this subsystem; all the mapping engine
//! needs is best-mapping lookup, atomic upsert of outcomes, explicit
//! confidence decrease, and fingerprint persistence/retrieval.

use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::Result;
use chrono::Utc;

use carelift_model::{
    LearnedMapping, OriginSystem, SourceFingerprint, TransformKind, derive_confidence,
};

/// One migration outcome to fold into the learned store.
#[derive(Debug, Clone)]
pub struct MappingOutcome {
    pub normalized_name: String,
    pub origin: Option<OriginSystem>,
    pub tenant: Option<String>,
    pub target_table: String,
    pub target_column: String,
    pub transform: Option<TransformKind>,
    pub successes: u64,
    pub failures: u64,
}

pub trait MappingStore: Send + Sync {
    /// Best learned mapping for a normalized column name, preferring
    /// entries scoped to the given tenant and/or origin over global ones,
    /// then highest confidence.
    fn best_mapping(
        &self,
        normalized_name: &str,
        origin: Option<OriginSystem>,
        tenant: Option<&str>,
    ) -> Result<Option<LearnedMapping>>;

    /// Upsert keyed by (normalized name, origin, tenant, target), folding
    /// the outcome counts in atomically.
    fn upsert_mapping(&self, outcome: &MappingOutcome) -> Result<()>;

    /// Explicitly decay a rejected mapping's confidence so it loses
    /// ranking priority, keyed by (normalized name, table, column).
    fn decrease_confidence(
        &self,
        normalized_name: &str,
        target_table: &str,
        target_column: &str,
        factor: f64,
    ) -> Result<()>;

    fn store_fingerprint(&self, fingerprint: &SourceFingerprint, tenant: Option<&str>)
    -> Result<()>;

    /// Most recently stored fingerprints, bounded, newest first.
    fn recent_fingerprints(&self, limit: usize) -> Result<Vec<SourceFingerprint>>;
}

#[derive(Debug, Default)]
struct MemoryState {
    mappings: Vec<LearnedMapping>,
    fingerprints: Vec<(Option<String>, SourceFingerprint)>,
}

/// In-memory [`MappingStore`] with the same scoping semantics as the real
/// store. Interior mutability keeps the trait object shareable.
#[derive(Debug, Default)]
pub struct InMemoryMappingStore {
    state: Mutex<MemoryState>,
}

impl InMemoryMappingStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Test helper: fetch a stored mapping by its full target key.
    pub fn mapping(
        &self,
        normalized_name: &str,
        target_table: &str,
        target_column: &str,
    ) -> Option<LearnedMapping> {
        let state = self.lock();
        state
            .mappings
            .iter()
            .find(|m| {
                m.normalized_name == normalized_name
                    && m.target_table == target_table
                    && m.target_column == target_column
            })
            .cloned()
    }

    /// Test helper: seed a learned mapping directly.
    pub fn seed(&self, mapping: LearnedMapping) {
        let mut state = self.lock();
        state.mappings.push(mapping);
    }

    pub fn fingerprint_count(&self) -> usize {
        self.lock().fingerprints.len()
    }
}

impl MappingStore for InMemoryMappingStore {
    fn best_mapping(
        &self,
        normalized_name: &str,
        origin: Option<OriginSystem>,
        tenant: Option<&str>,
    ) -> Result<Option<LearnedMapping>> {
        let state = self.lock();
        let mut candidates: Vec<&LearnedMapping> = state
            .mappings
            .iter()
            .filter(|m| m.normalized_name == normalized_name)
            .filter(|m| m.tenant.is_none() || m.tenant.as_deref() == tenant)
            .filter(|m| m.origin.is_none() || m.origin == origin)
            .collect();
        // Scoped entries outrank global ones; confidence breaks ties.
        candidates.sort_by(|a, b| {
            let specificity = |m: &LearnedMapping| {
                (m.tenant.is_some() as u8) + (m.origin.is_some() as u8)
            };
            specificity(b)
                .cmp(&specificity(a))
                .then_with(|| b.confidence.total_cmp(&a.confidence))
        });
        Ok(candidates.first().map(|m| (*m).clone()))
    }

    fn upsert_mapping(&self, outcome: &MappingOutcome) -> Result<()> {
        let mut state = self.lock();
        let now = Utc::now();
        let existing = state.mappings.iter().position(|m| {
            m.normalized_name == outcome.normalized_name
                && m.origin == outcome.origin
                && m.tenant == outcome.tenant
                && m.target_table == outcome.target_table
                && m.target_column == outcome.target_column
        });
        match existing {
            Some(idx) => {
                let mapping = &mut state.mappings[idx];
                mapping.record_outcome(outcome.successes, outcome.failures, now);
                if mapping.transform.is_none() {
                    mapping.transform = outcome.transform;
                }
            }
            None => state.mappings.push(LearnedMapping {
                normalized_name: outcome.normalized_name.clone(),
                origin: outcome.origin,
                tenant: outcome.tenant.clone(),
                target_table: outcome.target_table.clone(),
                target_column: outcome.target_column.clone(),
                transform: outcome.transform,
                successes: outcome.successes,
                failures: outcome.failures,
                confidence: derive_confidence(outcome.successes, outcome.failures),
                last_used: now,
            }),
        }
        Ok(())
    }

    fn decrease_confidence(
        &self,
        normalized_name: &str,
        target_table: &str,
        target_column: &str,
        factor: f64,
    ) -> Result<()> {
        let mut state = self.lock();
        for mapping in state.mappings.iter_mut().filter(|m| {
            m.normalized_name == normalized_name
                && m.target_table == target_table
                && m.target_column == target_column
        }) {
            mapping.decay(factor);
        }
        Ok(())
    }

    fn store_fingerprint(
        &self,
        fingerprint: &SourceFingerprint,
        tenant: Option<&str>,
    ) -> Result<()> {
        let mut state = self.lock();
        let tenant = tenant.map(ToString::to_string);
        // Upsert by fingerprint id within the tenant scope.
        let existing = state
            .fingerprints
            .iter()
            .position(|(t, fp)| fp.id == fingerprint.id && *t == tenant);
        match existing {
            Some(idx) => state.fingerprints[idx].1 = fingerprint.clone(),
            None => state.fingerprints.push((tenant, fingerprint.clone())),
        }
        Ok(())
    }

    fn recent_fingerprints(&self, limit: usize) -> Result<Vec<SourceFingerprint>> {
        let state = self.lock();
        Ok(state
            .fingerprints
            .iter()
            .rev()
            .take(limit)
            .map(|(_, fp)| fp.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(name: &str, table: &str, column: &str) -> MappingOutcome {
        MappingOutcome {
            normalized_name: name.to_string(),
            origin: None,
            tenant: None,
            target_table: table.to_string(),
            target_column: column.to_string(),
            transform: None,
            successes: 8,
            failures: 2,
        }
    }

    #[test]
    fn upsert_creates_then_accumulates() {
        let store = InMemoryMappingStore::new();
        store
            .upsert_mapping(&outcome("dob", "patients", "date_of_birth"))
            .unwrap();
        store
            .upsert_mapping(&outcome("dob", "patients", "date_of_birth"))
            .unwrap();
        let mapping = store.mapping("dob", "patients", "date_of_birth").unwrap();
        assert_eq!(mapping.successes, 16);
        assert_eq!(mapping.failures, 4);
        assert!((mapping.confidence - 0.8).abs() < 1e-9);
    }

    #[test]
    fn scoped_entries_outrank_global() {
        let store = InMemoryMappingStore::new();
        let mut global = outcome("dob", "patients", "date_of_birth");
        global.successes = 100;
        store.upsert_mapping(&global).unwrap();

        let mut scoped = outcome("dob", "encounters", "encounter_date");
        scoped.origin = Some(OriginSystem::Epic);
        scoped.successes = 3;
        store.upsert_mapping(&scoped).unwrap();

        let best = store
            .best_mapping("dob", Some(OriginSystem::Epic), None)
            .unwrap()
            .unwrap();
        assert_eq!(best.target_table, "encounters");

        // Without the origin, only the global entry is eligible.
        let best = store.best_mapping("dob", None, None).unwrap().unwrap();
        assert_eq!(best.target_table, "patients");
    }

    #[test]
    fn decrease_confidence_decays_the_target() {
        let store = InMemoryMappingStore::new();
        store
            .upsert_mapping(&outcome("dob", "patients", "date_of_birth"))
            .unwrap();
        let before = store
            .mapping("dob", "patients", "date_of_birth")
            .unwrap()
            .confidence;
        store
            .decrease_confidence("dob", "patients", "date_of_birth", 0.5)
            .unwrap();
        let after = store
            .mapping("dob", "patients", "date_of_birth")
            .unwrap()
            .confidence;
        assert!(after < before);
    }
}
