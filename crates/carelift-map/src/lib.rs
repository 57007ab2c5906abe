pub mod assist;
pub mod engine;
pub mod learn;
pub mod score;
pub mod store;
pub mod synonyms;

pub use assist::{
    ASSIST_CONFIDENCE_CAP, AssistEscalator, AssistRequest, AssistScorer, AssistSuggestion,
    NoAssist,
};
pub use engine::{FINGERPRINT_SEARCH_LIMIT, MappingIntelligence};
pub use learn::{CORRECTION_DECAY, apply_learning};
pub use score::{combine, name_similarity};
pub use store::{InMemoryMappingStore, MappingOutcome, MappingStore};
pub use synonyms::SynonymDictionary;
