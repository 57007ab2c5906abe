//! Static synonym dictionary: alternate spellings keyed by canonical
//! target column name. Passed into the mapping engine at construction so
//! tests can substitute fixtures.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use carelift_model::normalize_name;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SynonymDictionary {
    entries: BTreeMap<String, Vec<String>>,
}

impl SynonymDictionary {
    pub fn new(entries: BTreeMap<String, Vec<String>>) -> Self {
        Self { entries }
    }

    /// True when the normalized source name is a known alternate spelling
    /// of the target column.
    pub fn matches(&self, target_column: &str, normalized_source: &str) -> bool {
        self.entries
            .get(target_column)
            .is_some_and(|alternates| {
                alternates
                    .iter()
                    .any(|alternate| normalize_name(alternate) == normalized_source)
            })
    }

    pub fn alternates(&self, target_column: &str) -> &[String] {
        self.entries
            .get(target_column)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Alternate spellings observed across real legacy healthcare exports.
    pub fn healthcare_default() -> Self {
        let mut entries = BTreeMap::new();
        let mut add = |canonical: &str, alternates: &[&str]| {
            entries.insert(
                canonical.to_string(),
                alternates.iter().map(|a| (*a).to_string()).collect(),
            );
        };
        add(
            "first_name",
            &["fname", "first", "given_name", "givenname", "forename"],
        );
        add(
            "last_name",
            &["lname", "last", "surname", "family_name", "familyname"],
        );
        add(
            "date_of_birth",
            &["dob", "birthdate", "birth_date", "dateofbirth", "birthday"],
        );
        add("gender", &["sex", "gender_code"]);
        add(
            "phone",
            &["phone_number", "telephone", "tel", "home_phone", "mobile", "cell"],
        );
        add("email", &["email_address", "e_mail", "mail"]);
        add(
            "ssn",
            &["social", "social_security", "social_security_number"],
        );
        add(
            "mrn",
            &["medical_record_number", "record_number", "chart_number", "patient_id"],
        );
        add(
            "patient_mrn",
            &["medical_record_number", "patient_id", "chart_number"],
        );
        add(
            "npi",
            &["npi_num", "npi_number", "provider_npi", "national_provider_identifier"],
        );
        add("provider_npi", &["npi", "npi_num", "rendering_npi"]);
        add("zip_code", &["zip", "postal_code", "postalcode", "zipcode"]);
        add("state", &["st", "province", "state_code"]);
        add("city", &["town", "municipality"]);
        add(
            "address_line",
            &["address", "street", "street_address", "addr", "address1"],
        );
        add(
            "diagnosis_code",
            &["icd", "icd10", "icd_10", "dx_code", "diag_code", "diagnosis"],
        );
        add(
            "procedure_code",
            &["cpt", "cpt_code", "proc_code", "procedure"],
        );
        add("ndc_code", &["ndc", "drug_code", "medication_code"]);
        add("loinc_code", &["loinc", "lab_code", "test_code"]);
        add(
            "drug_name",
            &["medication", "med_name", "drug", "medication_name"],
        );
        add(
            "encounter_date",
            &["visit_date", "service_date", "date_of_service", "admit_date"],
        );
        add("encounter_type", &["visit_type", "appointment_type"]);
        add("specialty", &["provider_specialty", "taxonomy", "department"]);
        add(
            "observed_at",
            &["result_date", "observation_date", "collected_at"],
        );
        add("result_value", &["result", "lab_result", "test_result"]);
        add("unit", &["units", "uom", "unit_of_measure"]);
        add("notes", &["comments", "note", "remarks", "description"]);
        Self { entries }
    }
}
