//! Optional external assist scorer, consulted only when pattern-derived
//! confidence is low.
//!
//! The scorer is an injected "suggest-or-null" strategy so the core
//! scoring stays unit-testable without network access. The escalation
//! policy (threshold, caching, degradation) lives in [`AssistEscalator`],
//! a thin decorator around the strategy. Responses are strictly
//! shape-validated and fail closed to no-suggestion; scorer errors degrade
//! silently to the pattern-derived result.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use carelift_model::{OriginSystem, PatternTag, SourceKind};

/// Assist suggestions are capped here so the external scorer can never
/// override verified human-curated mappings.
pub const ASSIST_CONFIDENCE_CAP: f64 = 0.95;

/// Column profile summary plus source context, as sent to the scorer.
#[derive(Debug, Clone, Serialize)]
pub struct AssistRequest {
    pub source_column: String,
    pub normalized_name: String,
    pub dominant: PatternTag,
    pub samples: Vec<String>,
    pub kind: SourceKind,
    pub origin: Option<OriginSystem>,
    /// Target tables the scorer may choose from.
    pub target_tables: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistAlternative {
    pub target_table: String,
    pub target_column: String,
    pub confidence: f64,
}

/// A structurally valid scorer response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistSuggestion {
    pub target_table: String,
    pub target_column: String,
    pub confidence: f64,
    pub reasoning: String,
    #[serde(default)]
    pub alternatives: Vec<AssistAlternative>,
}

impl AssistSuggestion {
    /// Strict shape validation of a raw response body. Anything malformed
    /// fails closed to `None` rather than propagating partial data into
    /// mapping decisions.
    pub fn parse(body: &str) -> Option<Self> {
        let parsed: AssistSuggestion = serde_json::from_str(body).ok()?;
        if parsed.target_table.trim().is_empty() || parsed.target_column.trim().is_empty() {
            return None;
        }
        if !parsed.confidence.is_finite() || !(0.0..=1.0).contains(&parsed.confidence) {
            return None;
        }
        Some(parsed)
    }
}

/// Black-box assist strategy. Implementations own their transport and
/// timeout; a timeout surfaces here as an `Err` and degrades.
pub trait AssistScorer: Send + Sync {
    fn suggest(&self, request: &AssistRequest) -> anyhow::Result<Option<AssistSuggestion>>;
}

/// The null strategy: assist disabled.
#[derive(Debug, Default)]
pub struct NoAssist;

impl AssistScorer for NoAssist {
    fn suggest(&self, _request: &AssistRequest) -> anyhow::Result<Option<AssistSuggestion>> {
        Ok(None)
    }
}

type CacheKey = (String, String, PatternTag);

/// Escalation decorator: caches responses by (origin, normalized name,
/// dominant pattern), caps confidence, and degrades on scorer failure.
///
/// The cache lives for the escalator's lifetime and is purely an
/// optimization; it is never authoritative beyond that.
pub struct AssistEscalator {
    scorer: Box<dyn AssistScorer>,
    cache: Mutex<BTreeMap<CacheKey, Option<AssistSuggestion>>>,
}

impl AssistEscalator {
    pub fn new(scorer: Box<dyn AssistScorer>) -> Self {
        Self {
            scorer,
            cache: Mutex::new(BTreeMap::new()),
        }
    }

    fn cache_lock(&self) -> MutexGuard<'_, BTreeMap<CacheKey, Option<AssistSuggestion>>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Consult the scorer, going through the cache first. Returns `None`
    /// on scorer failure or a malformed response; never errors.
    pub fn suggest(&self, request: &AssistRequest) -> Option<AssistSuggestion> {
        let key: CacheKey = (
            request
                .origin
                .map(|origin| origin.as_str().to_string())
                .unwrap_or_default(),
            request.normalized_name.clone(),
            request.dominant,
        );
        if let Some(cached) = self.cache_lock().get(&key) {
            return cached.clone();
        }

        let response = match self.scorer.suggest(request) {
            Ok(Some(mut suggestion)) => {
                suggestion.confidence = suggestion.confidence.min(ASSIST_CONFIDENCE_CAP);
                Some(suggestion)
            }
            Ok(None) => None,
            Err(error) => {
                tracing::warn!(
                    column = %request.source_column,
                    %error,
                    "assist scorer failed; keeping pattern-derived suggestion"
                );
                None
            }
        };
        self.cache_lock().insert(key, response.clone());
        response
    }
}
