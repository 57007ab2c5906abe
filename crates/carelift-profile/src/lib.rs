pub mod analyzer;
pub mod fanout;

pub use analyzer::analyze_column;
pub use fanout::analyze_source;
