use std::sync::Arc;

use carelift_fingerprint::fingerprint;
use carelift_map::{
    AssistRequest, AssistScorer, AssistSuggestion, InMemoryMappingStore, MappingIntelligence,
    MappingStore, SynonymDictionary,
};
use carelift_model::{
    AnalyzerSettings, CancelToken, LearnedMapping, MapperSettings, MappingPlan, OriginSystem,
    SourceColumn, SourceFingerprint, SourceKind, SourceTable, TargetSchemaCatalog, TransformKind,
    derive_confidence,
};

fn source(columns: Vec<(&str, Vec<&str>)>) -> SourceTable {
    SourceTable::new(
        SourceKind::Csv,
        columns
            .into_iter()
            .map(|(name, values)| {
                SourceColumn::new(name, values.into_iter().map(String::from).collect())
            })
            .collect(),
    )
}

fn print_of(columns: Vec<(&str, Vec<&str>)>) -> SourceFingerprint {
    fingerprint(
        &source(columns),
        &AnalyzerSettings::default(),
        &CancelToken::new(),
    )
    .unwrap()
}

fn engine_with_store(store: Arc<InMemoryMappingStore>) -> MappingIntelligence {
    MappingIntelligence::new(
        TargetSchemaCatalog::healthcare_default(),
        SynonymDictionary::healthcare_default(),
        MapperSettings::default(),
        store,
    )
}

fn engine() -> MappingIntelligence {
    engine_with_store(Arc::new(InMemoryMappingStore::new()))
}

fn plan_for(columns: Vec<(&str, Vec<&str>)>) -> MappingPlan {
    engine().suggest(&print_of(columns))
}

#[test]
fn dob_maps_to_birth_date_with_normalization() {
    let plan = plan_for(vec![(
        "DOB",
        vec!["03/14/1955", "07/02/1961", "12/30/1949"],
    )]);
    let suggestion = plan.suggestion_for("DOB").expect("DOB should map");
    assert_eq!(suggestion.target_table, "patients");
    assert_eq!(suggestion.target_column, "date_of_birth");
    assert_eq!(suggestion.transform, Some(TransformKind::DateToIso));
    assert!(!suggestion.reasons.is_empty());
}

#[test]
fn npi_num_maps_to_provider_identifier_at_high_confidence() {
    let plan = plan_for(vec![("NPI_NUM", vec!["1234567893", "1111111112"])]);
    let suggestion = plan.suggestion_for("NPI_NUM").expect("NPI_NUM should map");
    assert_eq!(suggestion.target_table, "providers");
    assert_eq!(suggestion.target_column, "npi");
    // Pattern + name-substring + synonym evidence combine well above the
    // assist threshold.
    assert!(
        suggestion.confidence > 0.8,
        "confidence was {}",
        suggestion.confidence
    );
}

#[test]
fn signal_free_column_is_reported_unmapped() {
    let plan = plan_for(vec![("xq_17", vec!["@!#", "~~", "??"])]);
    assert!(plan.suggestion_for("xq_17").is_none());
    let unmapped = plan
        .unmapped
        .iter()
        .find(|u| u.source_column == "xq_17")
        .expect("column should be reported unmapped");
    assert!(unmapped.best_score <= 0.2);
}

#[test]
fn fname_outranks_unrelated_targets_via_synonyms() {
    let plan = plan_for(vec![("FNAME", vec!["Mary", "Grace", "Ada"])]);
    let suggestion = plan.suggestion_for("FNAME").expect("FNAME should map");
    assert_eq!(suggestion.target_column, "first_name");
}

#[test]
fn learned_mapping_dominates_the_ranking() {
    let store = Arc::new(InMemoryMappingStore::new());
    store.seed(LearnedMapping {
        normalized_name: "visit_dt".to_string(),
        origin: None,
        tenant: None,
        target_table: "encounters".to_string(),
        target_column: "encounter_date".to_string(),
        transform: Some(TransformKind::DateToIso),
        successes: 18,
        failures: 2,
        confidence: derive_confidence(18, 2),
        last_used: chrono::Utc::now(),
    });
    let engine = engine_with_store(store);
    let plan = engine.suggest(&print_of(vec![(
        "VISIT_DT",
        vec!["03/14/2023", "07/02/2023"],
    )]));
    let suggestion = plan.suggestion_for("VISIT_DT").expect("should map");
    assert_eq!(suggestion.target_table, "encounters");
    assert_eq!(suggestion.target_column, "encounter_date");
    // 0.5 base + half the stored confidence puts the learned channel in
    // front of every pattern-only candidate.
    assert!(suggestion.confidence > 0.9);
    assert_eq!(suggestion.transform, Some(TransformKind::DateToIso));
}

struct FixedAssist {
    response: AssistSuggestion,
}

impl AssistScorer for FixedAssist {
    fn suggest(&self, _request: &AssistRequest) -> anyhow::Result<Option<AssistSuggestion>> {
        Ok(Some(self.response.clone()))
    }
}

struct TimeoutAssist;

impl AssistScorer for TimeoutAssist {
    fn suggest(&self, _request: &AssistRequest) -> anyhow::Result<Option<AssistSuggestion>> {
        anyhow::bail!("request timed out after 5s")
    }
}

#[test]
fn weak_suggestions_escalate_and_assist_names_are_coerced() {
    // "spec_cd" has no learned history and weak name evidence; the assist
    // scorer answers with near-miss names that must coerce onto the real
    // catalog entries.
    let engine = engine().with_assist(Box::new(FixedAssist {
        response: AssistSuggestion {
            target_table: "provider".to_string(),
            target_column: "specialty_name".to_string(),
            confidence: 0.9,
            reasoning: "values look like clinical specialties".to_string(),
            alternatives: vec![],
        },
    }));
    let plan = engine.suggest(&print_of(vec![(
        "spec_cd",
        vec!["Cardiology", "Oncology"],
    )]));
    let suggestion = plan.suggestion_for("spec_cd").expect("assist should map");
    assert_eq!(suggestion.target_table, "providers");
    assert_eq!(suggestion.target_column, "specialty");
    assert!(suggestion.reasons[0].starts_with("assist:"));
}

#[test]
fn assist_failure_degrades_to_pattern_suggestion() {
    let engine = engine().with_assist(Box::new(TimeoutAssist));
    let plan = engine.suggest(&print_of(vec![(
        "DOB",
        vec!["03/14/1955", "07/02/1961"],
    )]));
    let suggestion = plan.suggestion_for("DOB").expect("pattern path should hold");
    assert_eq!(suggestion.target_column, "date_of_birth");
}

#[test]
fn assist_with_unknown_table_is_discarded() {
    let engine = engine().with_assist(Box::new(FixedAssist {
        response: AssistSuggestion {
            target_table: "warehouse_facts".to_string(),
            target_column: "dim_key".to_string(),
            confidence: 0.9,
            reasoning: "hallucinated".to_string(),
            alternatives: vec![],
        },
    }));
    let plan = engine.suggest(&print_of(vec![("xq_17", vec!["@!#", "~~"])]));
    assert!(plan.suggestion_for("xq_17").is_none());
}

#[test]
fn find_similar_recognizes_a_previously_seen_shape() {
    let store = Arc::new(InMemoryMappingStore::new());
    let engine = engine_with_store(Arc::clone(&store));

    let first = print_of(vec![
        ("DOB", vec!["03/14/1955", "07/02/1961"]),
        ("FNAME", vec!["Mary", "Grace"]),
    ]);
    store.store_fingerprint(&first, None).unwrap();

    // Same structure, different literals, so a different run of the same
    // legacy system.
    let second = print_of(vec![
        ("DOB", vec!["01/01/1990", "02/02/1992"]),
        ("FNAME", vec!["Ada", "Joan"]),
    ]);
    let similar = engine.find_similar(&second);
    // Identical structure means an identical fingerprint id, which the
    // search excludes as "self"; a near-identical shape must still rank.
    let third = print_of(vec![
        ("DOB", vec!["01/01/1990"]),
        ("FNAME", vec!["Ada"]),
        ("zip", vec!["98101"]),
    ]);
    let similar_third = engine.find_similar(&third);
    assert!(similar.is_empty());
    let (_, score) = similar_third.first().expect("one stored candidate");
    assert!(*score > carelift_model::SIMILARITY_RECOGNIZED);
}

#[test]
fn origin_scoped_learning_beats_global_entries() {
    let store = Arc::new(InMemoryMappingStore::new());
    store.seed(LearnedMapping {
        normalized_name: "pat_enc_date".to_string(),
        origin: Some(OriginSystem::Epic),
        tenant: None,
        target_table: "encounters".to_string(),
        target_column: "encounter_date".to_string(),
        transform: None,
        successes: 5,
        failures: 0,
        confidence: 1.0,
        last_used: chrono::Utc::now(),
    });
    store.seed(LearnedMapping {
        normalized_name: "pat_enc_date".to_string(),
        origin: None,
        tenant: None,
        target_table: "medications".to_string(),
        target_column: "start_date".to_string(),
        transform: None,
        successes: 50,
        failures: 0,
        confidence: 1.0,
        last_used: chrono::Utc::now(),
    });
    let engine = engine_with_store(store);
    // PAT_ENC naming marks the source as Epic, activating the scoped entry.
    let plan = engine.suggest(&print_of(vec![(
        "PAT_ENC_DATE",
        vec!["03/14/2023", "07/02/2023"],
    )]));
    let suggestion = plan.suggestion_for("PAT_ENC_DATE").expect("should map");
    assert_eq!(suggestion.target_table, "encounters");
}
