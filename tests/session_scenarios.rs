//! End-to-end session scenarios over the public engine API

use rand::SeedableRng;
use rand_pcg::Pcg32;
use speed_math::persistence::{InMemoryScoreStore, Player, ScoreReporter, ScoreStore};
use speed_math::sim::{
    GameEngine, GameEvent, ManualTicks, MissCause, Mode, Problem, Question, SessionState,
};
use speed_math::{BestScores, Tuning};

fn wrong_choice(engine: &GameEngine) -> i32 {
    let q = engine.current_question().unwrap();
    *q.options()
        .iter()
        .find(|&&o| o != q.correct_answer())
        .unwrap()
}

fn right_choice(engine: &GameEngine) -> i32 {
    engine.current_question().unwrap().correct_answer()
}

#[test]
fn test_five_misses_end_the_session() {
    let mut engine = GameEngine::new(2024);
    engine.start(Mode::Subtraction);

    for expected_lives in (1..=4).rev() {
        let choice = wrong_choice(&engine);
        assert_eq!(
            engine.answer(choice),
            Some(GameEvent::Missed {
                cause: MissCause::WrongAnswer,
                lives: expected_lives
            })
        );
        assert_eq!(engine.state(), SessionState::Playing);
    }

    let choice = wrong_choice(&engine);
    let event = engine.answer(choice);
    let Some(GameEvent::GameOver(result)) = event else {
        panic!("expected game over, got {:?}", event);
    };
    assert_eq!(result.score, 0);
    assert!(!result.new_best);
    assert_eq!(engine.state(), SessionState::GameOver);
    assert_eq!(engine.session().unwrap().lives, 0);

    // Nothing more happens until an explicit start
    assert_eq!(engine.tick(), None);
    assert_eq!(engine.select(0), None);
    assert_eq!(engine.take_submission(), None);
}

#[test]
fn test_tick_decay_at_base_scale() {
    let mut engine = GameEngine::new(1);
    engine.start(Mode::Addition);
    for i in 1..=124 {
        assert_eq!(engine.tick(), None);
        let remaining = engine.session().unwrap().time_remaining();
        assert!((remaining - (100.0 - 0.8 * i as f64)).abs() < 1e-6);
    }
    assert_eq!(
        engine.tick(),
        Some(GameEvent::Missed {
            cause: MissCause::Timeout,
            lives: 4
        })
    );
    assert_eq!(engine.session().unwrap().time_remaining(), 100.0);
}

#[test]
fn test_pause_then_ticks_leave_time_untouched() {
    let mut engine = GameEngine::new(3);
    let mut clock = ManualTicks::new();
    engine.start(Mode::Multiplication);
    clock.push(10);
    engine.pump(&mut clock);
    let before = engine.session().unwrap().time_remaining();
    let question = engine.current_question().unwrap().clone();

    engine.pause();
    for _ in 0..1000 {
        engine.tick();
    }
    clock.push(1000);
    assert!(engine.pump(&mut clock).is_empty());
    assert_eq!(engine.session().unwrap().time_remaining(), before);
    assert_eq!(engine.current_question(), Some(&question));

    engine.resume();
    clock.push(1);
    engine.pump(&mut clock);
    assert!(engine.session().unwrap().time_remaining() < before);
}

#[test]
fn test_pump_stops_at_game_over() {
    let tuning = Tuning {
        max_lives: 1,
        ..Tuning::default()
    };
    let mut engine = GameEngine::new(4).with_tuning(tuning);
    let mut clock = ManualTicks::new();
    engine.start(Mode::Division);
    clock.push(10_000);
    let events = engine.pump(&mut clock);
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], GameEvent::GameOver(_)));
    assert_eq!(clock.pending(), 0);
}

#[test]
fn test_difficulty_speeds_up_the_clock() {
    let mut engine = GameEngine::new(5);
    engine.start(Mode::Addition);
    for _ in 0..10 {
        let choice = right_choice(&engine);
        engine.answer(choice);
    }
    let s = engine.session().unwrap();
    assert!((s.difficulty_scale() - 1.5).abs() < 1e-9);
    engine.tick();
    let remaining = engine.session().unwrap().time_remaining();
    assert!((remaining - (100.0 - 0.8 * 1.5)).abs() < 1e-9);
}

#[test]
fn test_difficulty_caps_at_three() {
    let mut engine = GameEngine::new(6);
    engine.start(Mode::Addition);
    for _ in 0..60 {
        let choice = right_choice(&engine);
        engine.answer(choice);
    }
    assert_eq!(engine.session().unwrap().difficulty_scale(), 3.0);
    assert_eq!(engine.session().unwrap().score, 60);
}

#[test]
fn test_restart_from_game_over_resets_everything() {
    let tuning = Tuning {
        max_lives: 1,
        ..Tuning::default()
    };
    let mut engine = GameEngine::new(7).with_tuning(tuning);
    engine.start(Mode::Addition);
    for _ in 0..3 {
        let choice = right_choice(&engine);
        engine.answer(choice);
    }
    let choice = wrong_choice(&engine);
    engine.answer(choice);
    assert_eq!(engine.state(), SessionState::GameOver);
    let first = engine.session_id().unwrap();
    assert!(engine.take_submission().is_some());

    engine.start(Mode::Addition);
    let s = engine.session().unwrap();
    assert_ne!(s.id, first);
    assert_eq!(s.score, 0);
    assert_eq!(s.lives, 1);
    assert_eq!(s.difficulty_scale(), 1.0);
    assert_eq!(s.best_at_start, 3);
    assert!(s.last_forwarded.is_none());
}

#[test]
fn test_score_forwarded_once_and_only_when_beaten() {
    let store = InMemoryScoreStore::new();
    let reporter = ScoreReporter::new(store.clone(), Player::new("p1", "Pat"));
    let mut best = BestScores::new();
    best.record(Mode::Addition, 2);
    let tuning = Tuning {
        max_lives: 1,
        ..Tuning::default()
    };
    let mut engine = GameEngine::new(8)
        .with_tuning(tuning)
        .with_best_scores(best);

    // Score 2 ties the best: nothing to forward
    engine.start(Mode::Addition);
    for _ in 0..2 {
        let choice = right_choice(&engine);
        engine.answer(choice);
    }
    let choice = wrong_choice(&engine);
    engine.answer(choice);
    assert_eq!(engine.take_submission(), None);

    // Score 4 beats it
    engine.start(Mode::Addition);
    for _ in 0..4 {
        let choice = right_choice(&engine);
        engine.answer(choice);
    }
    let choice = wrong_choice(&engine);
    engine.answer(choice);
    for _ in 0..3 {
        if let Some(result) = engine.take_submission() {
            reporter.report(&result);
        }
    }
    assert_eq!(store.len(), 1);
    assert_eq!(store.best_score("p1", Mode::Addition).unwrap(), 4);
    assert_eq!(engine.best_scores().get(Mode::Addition), 4);
}

#[test]
fn test_abandon_discards_session() {
    let mut engine = GameEngine::new(9);
    engine.start(Mode::Division);
    let choice = right_choice(&engine);
    engine.answer(choice);
    assert_eq!(engine.abandon(), Some(GameEvent::Abandoned));
    assert_eq!(engine.state(), SessionState::Menu);
    assert!(engine.session().is_none());
    assert_eq!(engine.tick(), None);
}

#[test]
fn test_injected_rng_is_reproducible() {
    let mut a = GameEngine::with_rng(Pcg32::seed_from_u64(77));
    let mut b = GameEngine::with_rng(Pcg32::seed_from_u64(77));
    a.start(Mode::Multiplication);
    b.start(Mode::Multiplication);
    for _ in 0..20 {
        assert_eq!(a.current_question(), b.current_question());
        let choice = right_choice(&a);
        a.answer(choice);
        b.answer(choice);
    }
}

#[test]
fn test_fixed_operand_scenarios() {
    let mut rng = Pcg32::seed_from_u64(10);
    let q = Question::from_problem(Problem::addition(45, 30).unwrap(), &mut rng);
    assert_eq!(q.correct_answer(), 75);
    assert_eq!(q.problem_text(), "45 + 30");

    let q = Question::from_problem(Problem::division(6, 7).unwrap(), &mut rng);
    assert_eq!(q.problem().a, 42);
    assert_eq!(q.problem_text(), "42 ÷ 6");
    assert_eq!(q.correct_answer(), 7);
}
