pub mod reader;

pub use reader::{from_rows, read_csv_source};
