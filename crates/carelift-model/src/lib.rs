pub mod cancel;
pub mod catalog;
pub mod error;
pub mod fingerprint;
pub mod mapping;
pub mod migration;
pub mod pattern;
pub mod profile;
pub mod settings;
pub mod source;
pub mod text;

pub use cancel::CancelToken;
pub use catalog::{TargetColumn, TargetSchemaCatalog, TargetTable, ValueFormat};
pub use error::{MigrateError, Result};
pub use fingerprint::{SIMILARITY_RECOGNIZED, SourceFingerprint, cosine_similarity};
pub use mapping::{
    LearnedMapping, MappingAlternative, MappingPlan, MappingSuggestion, TransformKind,
    UnmappedColumn, derive_confidence,
};
pub use migration::{
    AcceptedMapping, BatchError, ExecutionMode, MappingCorrection, MigrationReport,
    MigrationResult, MigrationStatus, TargetRow,
};
pub use pattern::PatternTag;
pub use profile::{CoarseType, ColumnProfile};
pub use settings::{AnalyzerSettings, ExecutorSettings, MapperSettings};
pub use source::{OriginSystem, SourceColumn, SourceKind, SourceTable};
pub use text::{normalize_name, strip_separators};
