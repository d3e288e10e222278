//! Fluffball headless runner
//!
//! Loads settings, starts a session, and lets the demo AI play it out in real
//! time at a fixed timestep, logging what happens. Rendering and input live
//! elsewhere.

mod native {
    use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

    use fluffball::Settings;
    use fluffball::consts::MAX_SUBSTEPS;
    use fluffball::sim::{GameEvent, GamePhase, GameState, TickInput, tick};

    /// Wall-clock seconds before the runner gives up on a session
    const MAX_SESSION_SECONDS: f32 = 600.0;

    /// Game instance holding all state
    pub struct Game {
        state: GameState,
        input: TickInput,
        accumulator: f32,
        sim_dt: f32,
    }

    impl Game {
        pub fn new(settings: Settings) -> Option<Self> {
            let seed = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0);
            let sim_dt = settings.frame_dt();
            match GameState::new(settings, seed) {
                Ok(state) => Some(Self {
                    state,
                    input: TickInput {
                        idle_mode: true,
                        ..Default::default()
                    },
                    accumulator: 0.0,
                    sim_dt,
                }),
                Err(err) => {
                    log::error!("Could not set up the arena: {}", err);
                    None
                }
            }
        }

        /// Run simulation ticks for `dt` seconds of wall time
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.25);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= self.sim_dt && substeps < MAX_SUBSTEPS {
                tick(&mut self.state, &self.input, self.sim_dt);
                self.accumulator -= self.sim_dt;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.pause = false;
                self.report_events();
            }
        }

        fn report_events(&mut self) {
            for event in self.state.drain_events() {
                match event {
                    GameEvent::Ate { food, at, .. } => {
                        log::info!("Mjam! {:?} at ({:.0}, {:.0})", food, at.x, -at.y)
                    }
                    GameEvent::Bumped { collisions, .. } => {
                        log::info!("Uargh, a car wheel! ({} collisions)", collisions)
                    }
                    GameEvent::Flung { companion, .. } => {
                        log::debug!("cat {} wants to play", companion)
                    }
                    GameEvent::AllEaten => log::info!("All eaten... time for a nap!"),
                    GameEvent::GameOver => log::info!("Game over"),
                }
            }
        }

        pub fn run(&mut self) {
            let frame = Duration::from_secs_f32(self.sim_dt);
            let start = Instant::now();
            let mut last = start;

            while self.state.phase != GamePhase::Over
                && start.elapsed().as_secs_f32() < MAX_SESSION_SECONDS
            {
                std::thread::sleep(frame);
                let now = Instant::now();
                self.update((now - last).as_secs_f32());
                last = now;
            }

            log::info!(
                "Finished after {:.1}s ({} ticks): {} food left, {} collisions",
                self.state.playtime,
                self.state.time_ticks,
                self.state.food_left(),
                self.state.collisions
            );
        }
    }
}

fn main() {
    use env_logger::Env;
    use fluffball::Settings;

    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    log::info!("Fluffball (headless) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load_or_default(path),
        None => Settings::default(),
    };

    match native::Game::new(settings) {
        Some(mut game) => game.run(),
        None => std::process::exit(1),
    }
}
