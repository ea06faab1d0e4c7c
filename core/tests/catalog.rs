//! Content and configuration loading.

use fate_core::{
    archetype::Archetype,
    catalog::Catalog,
    config::EngineConfig,
    engine::SessionEngine,
    error::MatchError,
};

fn data_dir() -> String {
    format!("{}/../data", env!("CARGO_MANIFEST_DIR"))
}

#[test]
fn builtin_catalog_covers_every_archetype() {
    let catalog = Catalog::builtin().unwrap();
    assert!(catalog.questions.len() >= 5);
    for archetype in Archetype::ALL {
        assert!(
            catalog.candidates.iter().any(|c| c.archetype == archetype),
            "no candidate for {archetype}"
        );
    }
    assert!(catalog.question("wyd-text").is_some());
}

#[test]
fn data_dir_matches_the_builtin_content() {
    let loaded = Catalog::load(&data_dir()).unwrap();
    let builtin = Catalog::builtin().unwrap();
    assert_eq!(loaded.questions, builtin.questions);
    assert_eq!(loaded.candidates, builtin.candidates);

    let config = EngineConfig::load(&data_dir()).unwrap();
    assert_eq!(config, EngineConfig::default());
}

#[test]
fn missing_engine_config_falls_back_to_defaults() {
    let config = EngineConfig::load("/definitely/not/a/data/dir").unwrap();
    assert_eq!(config, EngineConfig::default());
    assert!(Catalog::load("/definitely/not/a/data/dir").is_err());
}

#[test]
fn duplicate_question_ids_are_rejected() {
    let builtin = Catalog::builtin().unwrap();
    let mut questions = builtin.questions.clone();
    questions.push(questions[0].clone());

    match Catalog::new(questions, builtin.candidates) {
        Err(MatchError::DuplicateId { kind: "question", id }) => assert_eq!(id, "wyd-text"),
        other => panic!("expected duplicate question id, got {other:?}"),
    }
}

#[test]
fn empty_candidate_pool_is_rejected() {
    let builtin = Catalog::builtin().unwrap();
    assert!(matches!(
        Catalog::new(builtin.questions, Vec::new()),
        Err(MatchError::EmptyCandidatePool)
    ));
}

#[test]
fn session_needs_a_full_question_set() {
    let builtin = Catalog::builtin().unwrap();
    let short = Catalog::new(builtin.questions[..3].to_vec(), builtin.candidates).unwrap();

    let result = SessionEngine::build_test_with("short".into(), EngineConfig::default(), short, &[1], 0.0);
    assert!(matches!(
        result,
        Err(MatchError::BankTooSmall { available: 3, required: 5 })
    ));
}

#[test]
fn config_validation_rejects_bad_ranges() {
    let mut config = EngineConfig::default();
    config.compatibility.floor = 99.95;
    assert!(matches!(config.validate(), Err(MatchError::InvalidConfig(_))));

    let mut config = EngineConfig::default();
    config.question_count = 0;
    assert!(matches!(config.validate(), Err(MatchError::InvalidConfig(_))));

    let mut config = EngineConfig::default();
    config.journal_limit = 0;
    assert!(matches!(config.validate(), Err(MatchError::InvalidConfig(_))));

    let mut config = EngineConfig::default();
    config.compatibility.fuzz = f64::NAN;
    assert!(matches!(config.validate(), Err(MatchError::InvalidConfig(_))));

    assert!(EngineConfig::default().validate().is_ok());
}

#[test]
fn partial_engine_config_keeps_other_defaults() {
    let config: EngineConfig = serde_json::from_str(r#"{ "simulation_delay_ms": 10 }"#).unwrap();
    assert_eq!(config.simulation_delay_ms, 10);
    assert_eq!(config.answer_cooldown_ms, 450);
    assert_eq!(config.compatibility.base, 72.0);
}

#[test]
fn misspelled_weight_key_fails_to_load() {
    let builtin = Catalog::builtin().unwrap();
    let questions = serde_json::json!({
        "questions": [{
            "id": "typo",
            "prompt": "Pick one",
            "left":  { "label": "L", "image_ref": "", "commentary": "", "weights": { "blueprnt": 2 } },
            "right": { "label": "R", "image_ref": "", "commentary": "" }
        }]
    });
    let candidates = serde_json::json!({ "candidates": builtin.candidates });

    let loaded = Catalog::from_json(&questions.to_string(), &candidates.to_string());
    assert!(matches!(loaded, Err(MatchError::Serialization(_))));
}
