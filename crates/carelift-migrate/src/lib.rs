pub mod executor;
pub mod run;
pub mod sink;
pub mod validate;

pub use executor::MigrationExecutor;
pub use run::run_migration;
pub use sink::{MemorySink, RecordSink};
pub use validate::validate_value;
