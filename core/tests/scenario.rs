//! End to end: a synthetic bank where one side always favors blueprint.
//! Answering that side every time must land on a blueprint couple near
//! the top of the range.

use fate_core::{
    archetype::Archetype,
    candidate,
    catalog::{AnswerOption, Catalog, Direction, MatchCandidate, Question},
    codec,
    command::SessionCommand,
    compatibility,
    config::{EngineConfig, DEFAULT_HASH_MULTIPLIERS},
    engine::SessionEngine,
    event::Phase,
    rng::{AmbientJitter, FixedSeeds},
    score::ScoreVector,
    shuffle,
};

fn option(label: &str, weights: ScoreVector) -> AnswerOption {
    AnswerOption {
        label:      label.into(),
        image_ref:  format!("/img/{label}.png"),
        commentary: format!("{label}, noted."),
        weights,
    }
}

fn synthetic_bank() -> Vec<Question> {
    (0..20)
        .map(|i| Question {
            id:     format!("q-{i:02}"),
            prompt: format!("Prompt {i}"),
            left:   option("Left", ScoreVector::zero().with(Archetype::Obsidian, 2.0)),
            right:  option("Right", ScoreVector::zero().with(Archetype::Blueprint, 4.0)),
        })
        .collect()
}

fn catalog() -> Catalog {
    let builtin = Catalog::builtin().unwrap();
    Catalog::new(synthetic_bank(), builtin.candidates).unwrap()
}

fn run_all_right(engine: &mut SessionEngine) -> u64 {
    engine.handle(0, SessionCommand::Start).unwrap();
    let mut now = 0;
    for _ in 0..5 {
        now += 500;
        engine
            .handle(now, SessionCommand::Answer { direction: Direction::Right, question_id: None })
            .unwrap();
    }
    now += 3_000;
    engine.advance_to(now).unwrap();
    now
}

#[test]
fn full_alignment_without_fuzz_scores_exactly_99() {
    let mut engine =
        SessionEngine::build_test_with("e2e-fixed".into(), EngineConfig::default(), catalog(), &[42], 0.0)
            .unwrap();
    run_all_right(&mut engine);

    assert_eq!(engine.phase(), Phase::Result);
    assert_eq!(engine.scores().blueprint, 20.0);
    assert_eq!(compatibility::max_possible(engine.questions(), Archetype::Blueprint), 20.0);

    let result = engine.result().unwrap();
    assert_eq!(result.archetype, Archetype::Blueprint);
    assert_eq!(result.compatibility.to_string(), "99.0");
}

#[test]
fn full_alignment_with_ambient_fuzz() {
    let mut engine = SessionEngine::new(
        "e2e-live".into(),
        EngineConfig::default(),
        catalog(),
        Box::new(FixedSeeds::new([42])),
        Box::new(AmbientJitter),
        0,
    )
    .unwrap();
    run_all_right(&mut engine);

    let expected_ids: Vec<String> = shuffle::select(&synthetic_bank(), 42, 5)
        .into_iter()
        .map(|q| q.id)
        .collect();
    let dealt: Vec<String> = engine.questions().iter().map(|q| q.id.clone()).collect();
    assert_eq!(dealt, expected_ids);

    let result = engine.result().unwrap().clone();
    assert_eq!(result.archetype, Archetype::Blueprint);
    assert!(
        (960..=999).contains(&result.compatibility.tenths()),
        "compatibility {} outside [96.0, 99.9]",
        result.compatibility
    );

    let pool = &engine.catalog().candidates;
    let matched = engine.catalog().candidate(&result.candidate_id).unwrap();
    assert_eq!(matched.archetype, Archetype::Blueprint);

    let expected = candidate::select(engine.scores(), Archetype::Blueprint, pool, &DEFAULT_HASH_MULTIPLIERS)
        .unwrap();
    assert_eq!(result.candidate_id, expected.id);
}

#[test]
fn result_survives_a_share_link_round_trip() {
    let mut engine =
        SessionEngine::build_test_with("e2e-link".into(), EngineConfig::default(), catalog(), &[42], 0.0)
            .unwrap();
    run_all_right(&mut engine);
    let link = engine.share_link("https://fictional-fate.app/").unwrap();

    let mut fresh =
        SessionEngine::build_test_with("e2e-open".into(), EngineConfig::default(), catalog(), &[1], 0.0)
            .unwrap();
    fresh.handle(0, SessionCommand::OpenLink { query: link }).unwrap();

    assert_eq!(fresh.phase(), Phase::Result);
    assert_eq!(fresh.result(), engine.result());
}

#[test]
fn fallback_candidate_survives_its_own_share_link() {
    let lone = MatchCandidate {
        id:        "only-obsidian".into(),
        archetype: Archetype::Obsidian,
        name:      "Lone Pair".into(),
        origin:    "Nowhere".into(),
        tagline:   "The only option.".into(),
        why_text:  "Nobody else showed up.".into(),
        image_ref: "/img/lone.png".into(),
    };
    let sparse = || Catalog::new(synthetic_bank(), vec![lone.clone()]).unwrap();

    let mut engine =
        SessionEngine::build_test_with("e2e-fallback".into(), EngineConfig::default(), sparse(), &[42], 0.0)
            .unwrap();
    run_all_right(&mut engine);

    let result = engine.result().unwrap().clone();
    assert_eq!(result.archetype, Archetype::Blueprint);
    assert_eq!(result.candidate_id, "only-obsidian");

    let link = engine.share_link("https://fictional-fate.app/").unwrap();
    assert_eq!(codec::decode(&link, engine.catalog()), Ok(result.clone()));

    let mut fresh =
        SessionEngine::build_test_with("e2e-fallback-open".into(), EngineConfig::default(), sparse(), &[1], 0.0)
            .unwrap();
    fresh.handle(0, SessionCommand::OpenLink { query: link }).unwrap();
    assert_eq!(fresh.phase(), Phase::Result);
    assert_eq!(fresh.result(), Some(&result));
}
