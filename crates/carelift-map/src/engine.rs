//! Mapping engine: per-column evidence assembly and ranking.
//!
//! For every source column the engine gathers additive evidence from four
//! independent channels (learned mappings, pattern compatibility against
//! the target catalog, name similarity, synonym membership) plus the
//! raw-name substring heuristic, ranks the accumulated candidates, and
//! escalates to the injected assist scorer when the pattern-derived best
//! is weak. Columns with no candidate above the floor are reported
//! unmapped, never guessed.

use std::collections::BTreeMap;
use std::sync::Arc;

use carelift_model::{
    ColumnProfile, MapperSettings, MappingAlternative, MappingPlan, MappingSuggestion,
    SourceFingerprint, TargetSchemaCatalog, UnmappedColumn, cosine_similarity, strip_separators,
};
use carelift_transform::infer_transform;

use crate::assist::{AssistEscalator, AssistRequest, AssistScorer};
use crate::score::{
    LEARNED_BASE, NAME_SIMILARITY_MIN, NAME_WEIGHT, PATTERN_WEIGHT, SUBSTRING_WEIGHT,
    SYNONYM_WEIGHT, combine, name_similarity,
};
use crate::store::MappingStore;
use crate::synonyms::SynonymDictionary;

/// Stored fingerprints considered per similarity search.
pub const FINGERPRINT_SEARCH_LIMIT: usize = 100;

pub struct MappingIntelligence {
    catalog: TargetSchemaCatalog,
    synonyms: SynonymDictionary,
    settings: MapperSettings,
    store: Arc<dyn MappingStore>,
    assist: Option<AssistEscalator>,
}

#[derive(Debug, Clone)]
struct Candidate {
    target_table: String,
    target_column: String,
    contributions: Vec<f64>,
    reasons: Vec<String>,
    /// Learned candidates bypass the candidate floor.
    learned: bool,
}

impl Candidate {
    fn new(target_table: &str, target_column: &str) -> Self {
        Self {
            target_table: target_table.to_string(),
            target_column: target_column.to_string(),
            contributions: Vec::new(),
            reasons: Vec::new(),
            learned: false,
        }
    }

    fn score(&self) -> f64 {
        combine(&self.contributions)
    }
}

enum ColumnDecision {
    Mapped(MappingSuggestion),
    Unmapped(UnmappedColumn),
}

impl MappingIntelligence {
    pub fn new(
        catalog: TargetSchemaCatalog,
        synonyms: SynonymDictionary,
        settings: MapperSettings,
        store: Arc<dyn MappingStore>,
    ) -> Self {
        Self {
            catalog,
            synonyms,
            settings,
            store,
            assist: None,
        }
    }

    /// Attach an assist scorer; escalation happens only below the
    /// configured threshold.
    pub fn with_assist(mut self, scorer: Box<dyn AssistScorer>) -> Self {
        self.assist = Some(AssistEscalator::new(scorer));
        self
    }

    pub fn catalog(&self) -> &TargetSchemaCatalog {
        &self.catalog
    }

    /// Produce one suggestion (or unmapped entry) per fingerprint column.
    pub fn suggest(&self, fingerprint: &SourceFingerprint) -> MappingPlan {
        let mut plan = MappingPlan::default();
        for profile in &fingerprint.columns {
            match self.suggest_column(profile, fingerprint) {
                ColumnDecision::Mapped(suggestion) => {
                    tracing::debug!(
                        column = %suggestion.source_column,
                        table = %suggestion.target_table,
                        field = %suggestion.target_column,
                        confidence = suggestion.confidence,
                        "mapped column"
                    );
                    plan.suggestions.push(suggestion);
                }
                ColumnDecision::Unmapped(unmapped) => {
                    tracing::debug!(
                        column = %unmapped.source_column,
                        best_score = unmapped.best_score,
                        "column left unmapped"
                    );
                    plan.unmapped.push(unmapped);
                }
            }
        }
        tracing::info!(
            mapped = plan.suggestions.len(),
            unmapped = plan.unmapped.len(),
            "mapping plan assembled"
        );
        plan
    }

    /// Rank stored fingerprints by similarity to the given one, excluding
    /// itself. Store failures degrade to an empty result.
    pub fn find_similar(&self, fingerprint: &SourceFingerprint) -> Vec<(SourceFingerprint, f64)> {
        let stored = match self.store.recent_fingerprints(FINGERPRINT_SEARCH_LIMIT) {
            Ok(stored) => stored,
            Err(error) => {
                tracing::warn!(%error, "fingerprint similarity search failed");
                return Vec::new();
            }
        };
        let mut scored: Vec<(SourceFingerprint, f64)> = stored
            .into_iter()
            .filter(|candidate| candidate.id != fingerprint.id)
            .map(|candidate| {
                let similarity = cosine_similarity(&fingerprint.signature, &candidate.signature);
                (candidate, similarity)
            })
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored
    }

    fn suggest_column(
        &self,
        profile: &ColumnProfile,
        fingerprint: &SourceFingerprint,
    ) -> ColumnDecision {
        let mut candidates: BTreeMap<(String, String), Candidate> = BTreeMap::new();

        // Channel 1: institutional memory.
        let learned = match self.store.best_mapping(
            &profile.normalized_name,
            fingerprint.origin,
            self.settings.tenant.as_deref(),
        ) {
            Ok(found) => found,
            Err(error) => {
                tracing::warn!(%error, column = %profile.name, "learned-mapping lookup failed");
                None
            }
        };
        if let Some(mapping) = &learned {
            let key = (mapping.target_table.clone(), mapping.target_column.clone());
            let entry = candidates
                .entry(key)
                .or_insert_with(|| Candidate::new(&mapping.target_table, &mapping.target_column));
            entry.learned = true;
            entry
                .contributions
                .push(LEARNED_BASE + mapping.confidence / 2.0);
            entry.reasons.push(format!(
                "learned from {} prior outcomes at {:.0}% confidence",
                mapping.successes + mapping.failures,
                mapping.confidence * 100.0
            ));
        }

        // Channels 2-5: catalog-driven evidence, accumulated per target.
        for (table, column) in self.catalog.iter_columns() {
            let mut contributions = Vec::new();
            let mut reasons = Vec::new();

            // Generic text dominance is not evidence: half the catalog
            // accepts free text, and a column with no real signal must end
            // up unmapped rather than guessed.
            if profile.has_specific_pattern() && column.accepted.contains(&profile.dominant) {
                contributions.push(PATTERN_WEIGHT);
                reasons.push(format!(
                    "dominant pattern {} accepted by {}.{}",
                    profile.dominant, table.name, column.name
                ));
            }

            let similarity = name_similarity(&profile.normalized_name, &column.name);
            if similarity > NAME_SIMILARITY_MIN {
                contributions.push(similarity * NAME_WEIGHT);
                reasons.push(format!("name similarity {:.0}%", similarity * 100.0));
            }

            if self.synonyms.matches(&column.name, &profile.normalized_name) {
                contributions.push(SYNONYM_WEIGHT);
                reasons.push(format!(
                    "'{}' is a known synonym of {}",
                    profile.normalized_name, column.name
                ));
            }

            if strip_separators(&profile.name).contains(&strip_separators(&column.name)) {
                contributions.push(SUBSTRING_WEIGHT);
                reasons.push("source name contains the target column name".to_string());
            }

            if contributions.is_empty() {
                continue;
            }
            let key = (table.name.clone(), column.name.clone());
            let entry = candidates
                .entry(key)
                .or_insert_with(|| Candidate::new(&table.name, &column.name));
            entry.contributions.extend(contributions);
            entry.reasons.extend(reasons);
        }

        let mut ranked: Vec<Candidate> = candidates
            .into_values()
            .filter(|candidate| {
                candidate.learned || candidate.score() > self.settings.candidate_floor
            })
            .collect();
        ranked.sort_by(|a, b| b.score().total_cmp(&a.score()));
        let best_score = ranked.first().map(Candidate::score).unwrap_or(0.0);

        if best_score < self.settings.assist_threshold
            && let Some(decision) = self.escalate(profile, fingerprint, best_score, &ranked)
        {
            return decision;
        }

        if best_score <= self.settings.candidate_floor {
            return ColumnDecision::Unmapped(UnmappedColumn {
                source_column: profile.name.clone(),
                best_score,
            });
        }

        let best = ranked.remove(0);
        let confidence = best.score();
        let alternatives = alternatives_from(&ranked, self.settings.max_alternatives);
        let transform = learned
            .as_ref()
            .filter(|mapping| {
                mapping.target_table == best.target_table
                    && mapping.target_column == best.target_column
            })
            .and_then(|mapping| mapping.transform)
            .or_else(|| infer_transform(profile.dominant, &best.target_column));

        ColumnDecision::Mapped(MappingSuggestion {
            source_column: profile.name.clone(),
            normalized_name: profile.normalized_name.clone(),
            target_table: best.target_table,
            target_column: best.target_column,
            confidence,
            reasons: best.reasons,
            transform,
            alternatives,
        })
    }

    /// Consult the assist scorer; its candidate replaces the
    /// pattern-derived best only when it resolves against the catalog and
    /// scores higher.
    fn escalate(
        &self,
        profile: &ColumnProfile,
        fingerprint: &SourceFingerprint,
        best_score: f64,
        ranked: &[Candidate],
    ) -> Option<ColumnDecision> {
        let escalator = self.assist.as_ref()?;
        let request = AssistRequest {
            source_column: profile.name.clone(),
            normalized_name: profile.normalized_name.clone(),
            dominant: profile.dominant,
            samples: profile.samples.clone(),
            kind: fingerprint.kind,
            origin: fingerprint.origin,
            target_tables: self
                .catalog
                .tables
                .iter()
                .map(|table| table.name.clone())
                .collect(),
        };
        let assist = escalator.suggest(&request)?;
        let (target_table, target_column) =
            self.coerce_target(&assist.target_table, &assist.target_column)?;
        if assist.confidence <= best_score {
            return None;
        }
        Some(ColumnDecision::Mapped(MappingSuggestion {
            source_column: profile.name.clone(),
            normalized_name: profile.normalized_name.clone(),
            target_table,
            target_column: target_column.clone(),
            confidence: assist.confidence,
            reasons: vec![format!("assist: {}", assist.reasoning)],
            transform: infer_transform(profile.dominant, &target_column),
            alternatives: alternatives_from(ranked, self.settings.max_alternatives),
        }))
    }

    /// Coerce near-miss table/column names from the assist response to the
    /// nearest real catalog names by substring containment.
    fn coerce_target(&self, table: &str, column: &str) -> Option<(String, String)> {
        let table_name = self.coerce_table(table)?;
        let target_table = self.catalog.table(&table_name)?;
        if let Some(found) = target_table.column(column) {
            return Some((table_name, found.name.clone()));
        }
        let stripped = strip_separators(column);
        if stripped.is_empty() {
            return None;
        }
        target_table
            .columns
            .iter()
            .find(|candidate| {
                let candidate_stripped = strip_separators(&candidate.name);
                candidate_stripped.contains(&stripped) || stripped.contains(&candidate_stripped)
            })
            .map(|candidate| (table_name.clone(), candidate.name.clone()))
    }

    fn coerce_table(&self, name: &str) -> Option<String> {
        if let Some(table) = self.catalog.table(name) {
            return Some(table.name.clone());
        }
        let stripped = strip_separators(name);
        if stripped.is_empty() {
            return None;
        }
        self.catalog
            .tables
            .iter()
            .find(|table| {
                let table_stripped = strip_separators(&table.name);
                table_stripped.contains(&stripped) || stripped.contains(&table_stripped)
            })
            .map(|table| table.name.clone())
    }
}

fn alternatives_from(ranked: &[Candidate], cap: usize) -> Vec<MappingAlternative> {
    ranked
        .iter()
        .take(cap)
        .map(|candidate| MappingAlternative {
            target_table: candidate.target_table.clone(),
            target_column: candidate.target_column.clone(),
            confidence: candidate.score(),
        })
        .collect()
}
