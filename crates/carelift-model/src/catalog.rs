//! Target schema catalog: the canonical relational schema migrations land in.
//!
//! The catalog is read-only configuration owned by schema management; it is
//! loaded from JSON (or built from the shipped healthcare default) and passed
//! into the mapping and execution components at construction time. Schema
//! changes require no code change here.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::pattern::PatternTag;

/// Structural validation applied to a transformed value at migration time,
/// over and above pattern acceptance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueFormat {
    /// Luhn check digit over the institutional 80840 prefix.
    NpiChecksum,
    /// Two-letter US state or territory code.
    StateCode,
    /// ISO 8601 calendar date.
    IsoDate,
    /// Minimal local-part@domain shape.
    Email,
}

/// One column of the canonical schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetColumn {
    pub name: String,
    /// Pattern families this column accepts from a source.
    pub accepted: BTreeSet<PatternTag>,
    /// Rows with a null value here are excluded from the table's batch.
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub format: Option<ValueFormat>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetTable {
    pub name: String,
    pub columns: Vec<TargetColumn>,
}

impl TargetTable {
    pub fn column(&self, name: &str) -> Option<&TargetColumn> {
        self.columns
            .iter()
            .find(|column| column.name.eq_ignore_ascii_case(name))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetSchemaCatalog {
    pub tables: Vec<TargetTable>,
}

impl TargetSchemaCatalog {
    pub fn table(&self, name: &str) -> Option<&TargetTable> {
        self.tables
            .iter()
            .find(|table| table.name.eq_ignore_ascii_case(name))
    }

    pub fn column(&self, table: &str, column: &str) -> Option<&TargetColumn> {
        self.table(table).and_then(|t| t.column(column))
    }

    /// Iterate every (table, column) pair in catalog order.
    pub fn iter_columns(&self) -> impl Iterator<Item = (&TargetTable, &TargetColumn)> {
        self.tables
            .iter()
            .flat_map(|table| table.columns.iter().map(move |column| (table, column)))
    }

    /// The canonical healthcare schema shipped for tests and local runs.
    /// Production deployments load their catalog from configuration.
    pub fn healthcare_default() -> Self {
        use PatternTag as P;
        Self {
            tables: vec![
                TargetTable {
                    name: "patients".to_string(),
                    columns: vec![
                        column("mrn", &[P::Mrn, P::Integer], true, None),
                        column("first_name", &[P::ShortText], true, None),
                        column("last_name", &[P::ShortText], true, None),
                        column(
                            "date_of_birth",
                            &[P::DateIso, P::DateUs, P::DateTime],
                            false,
                            Some(ValueFormat::IsoDate),
                        ),
                        column("gender", &[P::Gender], false, None),
                        column("ssn", &[P::Ssn], false, None),
                        column("email", &[P::Email], false, Some(ValueFormat::Email)),
                        column("phone", &[P::Phone], false, None),
                        column("address_line", &[P::ShortText, P::LongText], false, None),
                        column("city", &[P::ShortText], false, None),
                        column(
                            "state",
                            &[P::StateCode, P::ShortText],
                            false,
                            Some(ValueFormat::StateCode),
                        ),
                        column("zip_code", &[P::ZipCode], false, None),
                    ],
                },
                TargetTable {
                    name: "providers".to_string(),
                    columns: vec![
                        column("npi", &[P::Npi], true, Some(ValueFormat::NpiChecksum)),
                        column("first_name", &[P::ShortText], true, None),
                        column("last_name", &[P::ShortText], true, None),
                        column("specialty", &[P::ShortText], false, None),
                        column("phone", &[P::Phone], false, None),
                    ],
                },
                TargetTable {
                    name: "encounters".to_string(),
                    columns: vec![
                        column("patient_mrn", &[P::Mrn, P::Integer], true, None),
                        column(
                            "provider_npi",
                            &[P::Npi],
                            false,
                            Some(ValueFormat::NpiChecksum),
                        ),
                        column(
                            "encounter_date",
                            &[P::DateIso, P::DateUs, P::DateTime],
                            true,
                            Some(ValueFormat::IsoDate),
                        ),
                        column("encounter_type", &[P::ShortText], false, None),
                        column("diagnosis_code", &[P::Icd10], false, None),
                        column("procedure_code", &[P::Cpt], false, None),
                        column("notes", &[P::LongText, P::ShortText], false, None),
                    ],
                },
                TargetTable {
                    name: "medications".to_string(),
                    columns: vec![
                        column("patient_mrn", &[P::Mrn, P::Integer], true, None),
                        column("ndc_code", &[P::Ndc], false, None),
                        column("drug_name", &[P::ShortText], true, None),
                        column(
                            "start_date",
                            &[P::DateIso, P::DateUs, P::DateTime],
                            false,
                            Some(ValueFormat::IsoDate),
                        ),
                        column(
                            "end_date",
                            &[P::DateIso, P::DateUs, P::DateTime],
                            false,
                            Some(ValueFormat::IsoDate),
                        ),
                    ],
                },
                TargetTable {
                    name: "observations".to_string(),
                    columns: vec![
                        column("patient_mrn", &[P::Mrn, P::Integer], true, None),
                        column("loinc_code", &[P::Loinc], false, None),
                        column(
                            "result_value",
                            &[P::Decimal, P::Integer, P::ShortText],
                            false,
                            None,
                        ),
                        column("unit", &[P::ShortText], false, None),
                        column(
                            "observed_at",
                            &[P::DateTime, P::DateIso, P::DateUs],
                            false,
                            Some(ValueFormat::IsoDate),
                        ),
                    ],
                },
            ],
        }
    }
}

fn column(
    name: &str,
    accepted: &[PatternTag],
    required: bool,
    format: Option<ValueFormat>,
) -> TargetColumn {
    TargetColumn {
        name: name.to_string(),
        accepted: accepted.iter().copied().collect(),
        required,
        format,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_lookups_are_case_insensitive() {
        let catalog = TargetSchemaCatalog::healthcare_default();
        assert!(catalog.table("PATIENTS").is_some());
        assert!(catalog.column("providers", "NPI").is_some());
        assert!(catalog.column("providers", "nope").is_none());
    }

    #[test]
    fn npi_column_is_checksum_protected() {
        let catalog = TargetSchemaCatalog::healthcare_default();
        let npi = catalog.column("providers", "npi").unwrap();
        assert_eq!(npi.format, Some(ValueFormat::NpiChecksum));
        assert!(npi.required);
    }
}
