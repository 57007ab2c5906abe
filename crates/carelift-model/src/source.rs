use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of legacy source being migrated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceKind {
    Csv,
    Spreadsheet,
    /// Flattened HL7 v2 extract.
    Hl7,
    /// FHIR-like JSON export flattened to rows.
    Fhir,
}

impl SourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SourceKind::Csv => "CSV",
            SourceKind::Spreadsheet => "SPREADSHEET",
            SourceKind::Hl7 => "HL7",
            SourceKind::Fhir => "FHIR",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// EHR vendor systems recognized by the origin heuristics.
///
/// Detection is a best-effort keyword scan over column names; an
/// undetermined origin is represented by `None` at the use sites, never by
/// an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OriginSystem {
    Epic,
    Cerner,
    Meditech,
    Athenahealth,
    Allscripts,
}

impl OriginSystem {
    pub fn as_str(self) -> &'static str {
        match self {
            OriginSystem::Epic => "EPIC",
            OriginSystem::Cerner => "CERNER",
            OriginSystem::Meditech => "MEDITECH",
            OriginSystem::Athenahealth => "ATHENAHEALTH",
            OriginSystem::Allscripts => "ALLSCRIPTS",
        }
    }
}

impl fmt::Display for OriginSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OriginSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "EPIC" => Ok(OriginSystem::Epic),
            "CERNER" => Ok(OriginSystem::Cerner),
            "MEDITECH" => Ok(OriginSystem::Meditech),
            "ATHENAHEALTH" | "ATHENA" => Ok(OriginSystem::Athenahealth),
            "ALLSCRIPTS" => Ok(OriginSystem::Allscripts),
            _ => Err(format!("Unknown origin system: {s}")),
        }
    }
}

/// One raw source column: the original header plus every cell value in row
/// order. Empty strings are treated as nulls throughout the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceColumn {
    pub name: String,
    pub values: Vec<String>,
}

impl SourceColumn {
    pub fn new(name: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// A full tabular source in column-major form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceTable {
    pub kind: SourceKind,
    pub columns: Vec<SourceColumn>,
}

impl SourceTable {
    pub fn new(kind: SourceKind, columns: Vec<SourceColumn>) -> Self {
        Self { kind, columns }
    }

    /// Number of rows, taken as the longest column.
    pub fn row_count(&self) -> usize {
        self.columns
            .iter()
            .map(|column| column.values.len())
            .max()
            .unwrap_or(0)
    }

    pub fn column(&self, name: &str) -> Option<&SourceColumn> {
        self.columns
            .iter()
            .find(|column| column.name.eq_ignore_ascii_case(name))
    }

    /// Cell value at (column name, row index); `None` for missing cells and
    /// empty strings.
    pub fn value(&self, name: &str, row: usize) -> Option<&str> {
        self.column(name)
            .and_then(|column| column.values.get(row))
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns
            .iter()
            .map(|column| column.name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_count_uses_longest_column() {
        let table = SourceTable::new(
            SourceKind::Csv,
            vec![
                SourceColumn::new("a", vec!["1".into(), "2".into()]),
                SourceColumn::new("b", vec!["x".into()]),
            ],
        );
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn blank_cells_read_as_none() {
        let table = SourceTable::new(
            SourceKind::Csv,
            vec![SourceColumn::new("a", vec!["  ".into(), "v".into()])],
        );
        assert_eq!(table.value("a", 0), None);
        assert_eq!(table.value("A", 1), Some("v"));
        assert_eq!(table.value("a", 9), None);
    }
}
