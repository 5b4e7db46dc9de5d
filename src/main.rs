//! Speed Math entry point
//!
//! Native builds run a line-based terminal drill. Wall time between inputs is
//! fed through the fixed-step clock, so a slow answer still costs lives.

#[cfg(not(target_arch = "wasm32"))]
mod terminal {
    use std::io::{self, BufRead, Write};
    use std::time::Instant;

    use speed_math::persistence::{
        DEFAULT_LEADERBOARD_SIZE, FileScoreStore, Player, ScoreReporter,
    };
    use speed_math::platform::{self, storage};
    use speed_math::sim::{FixedStepClock, GameEngine, GameEvent, MissCause, Mode, SessionState};
    use speed_math::{BestScores, Settings};

    /// Terminal input blocks, so every elapsed tick is replayed on the next line
    const TERMINAL_MAX_CATCHUP: u32 = 100_000;

    /// Game instance holding all state
    struct Game {
        engine: GameEngine,
        clock: FixedStepClock,
        last_input: Instant,
        settings: Settings,
        reporter: Option<ScoreReporter<FileScoreStore>>,
        /// Question last printed; answers only count against it
        shown_seq: Option<u64>,
    }

    impl Game {
        fn new(settings: Settings) -> Self {
            let seed = platform::now_ms() as u64;
            let path = storage::data_dir().join("speed_math_scores.json");
            let reporter = match FileScoreStore::open(path) {
                Ok(store) => Some(ScoreReporter::new(
                    store,
                    Player::new(settings.player_id.clone(), settings.player_name.clone()),
                )),
                Err(e) => {
                    log::warn!("Score store unavailable, scores stay local: {}", e);
                    None
                }
            };

            let mut best = BestScores::load();
            if let Some(reporter) = &reporter {
                best.merge(&reporter.best_scores());
            }

            let mut engine = GameEngine::new(seed)
                .with_tuning(settings.tuning)
                .with_best_scores(best);
            engine.select_mode(settings.last_mode);

            Self {
                engine,
                clock: FixedStepClock::new(settings.tuning.tick_period)
                    .with_max_catchup(TERMINAL_MAX_CATCHUP),
                last_input: Instant::now(),
                settings,
                reporter,
                shown_seq: None,
            }
        }

        /// Replay the ticks that elapsed while waiting for input
        fn catch_up(&mut self) -> Vec<GameEvent> {
            let now = Instant::now();
            self.clock
                .advance(now.duration_since(self.last_input).as_secs_f64());
            self.last_input = now;
            self.engine.pump(&mut self.clock)
        }

        fn handle(&mut self, line: &str) -> (Vec<GameEvent>, bool) {
            let mut events = self.catch_up();
            let input = line.trim().to_lowercase();

            let event = match (self.engine.state(), input.as_str()) {
                (_, "q" | "quit") => match self.engine.abandon() {
                    None => return (events, false),
                    abandoned => abandoned,
                },
                (SessionState::Playing, "1" | "2" | "3")
                    if self.shown_seq == self.engine.question_seq() =>
                {
                    let slot = input.parse::<usize>().unwrap_or(1) - 1;
                    match self.shown_seq {
                        Some(seq) => self.engine.select_for(seq, slot),
                        None => None,
                    }
                }
                // The question changed (timeout or game over) before the key landed
                (_, "1" | "2" | "3") => None,
                (SessionState::Playing | SessionState::Paused, "p" | "pause") => {
                    self.engine.toggle_pause()
                }
                (SessionState::Menu | SessionState::GameOver, "" | "s" | "start") => {
                    self.engine.restart()
                }
                (SessionState::Menu | SessionState::GameOver, "h" | "history") => {
                    self.print_history();
                    None
                }
                (SessionState::Menu | SessionState::GameOver, "l" | "leaderboard") => {
                    self.print_leaderboard();
                    None
                }
                (SessionState::Menu | SessionState::GameOver, other) => {
                    if let Some(mode) = Mode::from_str(other) {
                        if let Some(best) = self.engine.select_mode(mode) {
                            println!("Mode: {} (best {})", mode, best);
                            self.settings.last_mode = mode;
                            self.settings.save();
                        }
                    } else {
                        println!("Unknown command '{}'", other);
                    }
                    None
                }
                _ => None,
            };
            events.extend(event);
            (events, true)
        }

        fn on_events(&mut self, events: &[GameEvent]) {
            for event in events {
                match event {
                    GameEvent::Correct { score } => println!("✓ Correct! Score {}", score),
                    GameEvent::Missed { cause, lives } => match cause {
                        MissCause::WrongAnswer => println!("✗ Wrong. Lives {}", lives),
                        MissCause::Timeout => println!("⏱ Too slow. Lives {}", lives),
                    },
                    GameEvent::GameOver(result) => {
                        println!("GAME OVER - final score {}", result.score);
                        if result.new_best {
                            println!("New personal best!");
                        }
                        self.finish();
                    }
                    GameEvent::Paused => println!("Paused (p to resume)"),
                    GameEvent::Resumed => println!("Resumed"),
                    GameEvent::Abandoned => println!("Back to menu"),
                    GameEvent::Started { mode, .. } => println!("Go! Mode: {}", mode),
                }
            }
        }

        /// Persist locally and forward a new best, at most once per game over
        fn finish(&mut self) {
            self.engine.best_scores().save();
            if let Some(result) = self.engine.take_submission() {
                if let Some(reporter) = &self.reporter {
                    reporter.report(&result);
                }
            }
        }

        fn print_history(&self) {
            let Some(reporter) = &self.reporter else {
                println!("No score store");
                return;
            };
            let mode = self.engine.selected_mode();
            let history = reporter.history(mode);
            println!("History for {} ({} games):", mode, history.len());
            for (i, point) in history.iter().enumerate() {
                println!("  #{:<3} {}", i + 1, point.score);
            }
        }

        fn print_leaderboard(&self) {
            let Some(reporter) = &self.reporter else {
                println!("No score store");
                return;
            };
            let mode = self.engine.selected_mode();
            println!("Leaderboard ({}):", mode);
            for (i, entry) in reporter
                .leaderboard(Some(mode), DEFAULT_LEADERBOARD_SIZE)
                .iter()
                .enumerate()
            {
                println!("  {:>2}. {:<20} {}", i + 1, entry.display_name, entry.score);
            }
        }

        fn render(&mut self) {
            self.shown_seq = None;
            match self.engine.state() {
                SessionState::Menu | SessionState::GameOver => {
                    let mode = self.engine.selected_mode();
                    println!(
                        "[{}] best {} | enter=start, mode name to switch, h=history, l=leaderboard, q=quit",
                        mode,
                        self.engine.best_scores().get(mode)
                    );
                }
                SessionState::Paused => {}
                SessionState::Playing => {
                    let Some(session) = self.engine.session() else {
                        return;
                    };
                    self.shown_seq = Some(session.question_seq);
                    let q = &session.question;
                    let opts = q.options();
                    println!(
                        "Score {} | Lives {} | Time {:>3.0}% | {}  =  [1] {}  [2] {}  [3] {}",
                        session.score,
                        session.lives,
                        session.time_fraction() * 100.0,
                        q.problem_text(),
                        opts[0],
                        opts[1],
                        opts[2]
                    );
                }
            }
            let _ = io::stdout().flush();
        }
    }

    pub fn run() -> io::Result<()> {
        let settings = Settings::load();
        let mut game = Game::new(settings);
        println!("SPEED MATH - how fast can you calculate?");
        game.render();

        for line in io::stdin().lock().lines() {
            let (events, keep_going) = game.handle(&line?);
            game.on_events(&events);
            if !keep_going {
                break;
            }
            game.render();
        }

        game.engine.best_scores().save();
        log::info!("Speed Math exiting");
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    speed_math::platform::init_logging();
    log::info!("Speed Math (native) starting...");

    if let Err(e) = terminal::run() {
        log::error!("Terminal error: {}", e);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::wasm_start, this is just to satisfy the compiler
}
