//! Two sessions, same seeds, same fuzz, same commands.
//! They must produce byte-identical journals.

use fate_core::{
    catalog::Direction,
    command::{SessionCommand, TimedCommand},
    engine::SessionEngine,
};

fn script() -> Vec<TimedCommand> {
    let mut commands = vec![TimedCommand { at: 0, command: SessionCommand::Start }];
    let directions = [
        Direction::Right,
        Direction::Left,
        Direction::Right,
        Direction::Right,
        Direction::Left,
    ];
    for (i, direction) in directions.into_iter().enumerate() {
        let at = 500 * (i as u64 + 1);
        commands.push(TimedCommand {
            at,
            command: SessionCommand::Answer { direction, question_id: None },
        });
        // A double-submit right behind every answer must be dropped.
        commands.push(TimedCommand {
            at: at + 10,
            command: SessionCommand::Answer { direction, question_id: None },
        });
    }
    commands.push(TimedCommand { at: 10_000, command: SessionCommand::Reset });
    commands.push(TimedCommand { at: 10_100, command: SessionCommand::Start });
    commands
}

#[test]
fn same_seeds_produce_identical_journals() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut engine_a = SessionEngine::build_test("det-a".into(), &[42, 7], 1.25).unwrap();
    let mut engine_b = SessionEngine::build_test("det-b".into(), &[42, 7], 1.25).unwrap();

    engine_a.replay(&script()).expect("engine_a replay");
    engine_b.replay(&script()).expect("engine_b replay");

    let log_a = engine_a.journal();
    let log_b = engine_b.journal();

    assert_eq!(
        log_a.len(), log_b.len(),
        "Journal lengths differ: {} vs {}",
        log_a.len(), log_b.len()
    );
    for (i, (a, b)) in log_a.iter().zip(log_b.iter()).enumerate() {
        assert_eq!(a, b, "Journal diverged at entry {i}:\n  A: {a:?}\n  B: {b:?}");
    }

    assert!(
        log_a.iter().any(|e| e.event_type == "result_computed"),
        "script should reach a result before the reset"
    );
}

#[test]
fn different_seeds_produce_different_question_orders() {
    let orders: Vec<Vec<String>> = (0..16u64)
        .map(|seed| {
            let mut engine = SessionEngine::build_test(format!("det-{seed}"), &[seed], 0.0).unwrap();
            engine.handle(0, SessionCommand::Start).unwrap();
            engine.questions().iter().map(|q| q.id.clone()).collect()
        })
        .collect();

    let first = &orders[0];
    assert!(
        orders.iter().any(|o| o != first),
        "16 different seeds produced the same question order — seed is not being used"
    );
}

#[test]
fn same_seed_same_question_order_across_sessions() {
    let ids = |name: &str| {
        let mut engine = SessionEngine::build_test(name.into(), &[1234], 0.0).unwrap();
        engine.handle(0, SessionCommand::Start).unwrap();
        engine.questions().iter().map(|q| q.id.clone()).collect::<Vec<_>>()
    };
    assert_eq!(ids("first"), ids("second"));
}
