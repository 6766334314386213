//! Skyflap headless runner
//!
//! Plays scripted runs with an autopilot, logging every session event.
//! Rendering and audio are not part of this crate; this binary stands in for
//! them by listening to the same events a frontend would.
//!
//! Usage: skyflap [--seed N] [--config FILE] [--store FILE] [--runs N] [--ticks N]

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use skyflap::GameConfig;
    use skyflap::consts::*;
    use skyflap::persistence::{JsonFileStore, KeyValueStore, MemoryStore};
    use skyflap::sim::{
        EventKind, GameEvent, GamePhase, GameSession, ImpulseResponse, Scene, TickInput, tick,
    };

    #[derive(Debug, Default)]
    struct Args {
        seed: Option<u64>,
        config: Option<PathBuf>,
        store: Option<PathBuf>,
        runs: u32,
        ticks: u32,
    }

    /// Parse a flag's value, warning when it is missing or malformed
    fn parse_value<T: std::str::FromStr>(flag: &str, value: Option<String>) -> Option<T> {
        let Some(value) = value else {
            log::warn!("Missing value for {}", flag);
            return None;
        };
        let parsed = value.parse().ok();
        if parsed.is_none() {
            log::warn!("Invalid value {:?} for {}, keeping the default", value, flag);
        }
        parsed
    }

    fn parse_args(argv: impl IntoIterator<Item = String>) -> Args {
        let mut args = Args {
            runs: 3,
            ticks: 60 * 60,
            ..Default::default()
        };
        let mut it = argv.into_iter();
        while let Some(flag) = it.next() {
            match flag.as_str() {
                "--seed" => args.seed = parse_value(&flag, it.next()).or(args.seed),
                "--config" => args.config = parse_value(&flag, it.next()).or(args.config),
                "--store" => args.store = parse_value(&flag, it.next()).or(args.store),
                "--runs" => args.runs = parse_value(&flag, it.next()).unwrap_or(args.runs),
                "--ticks" => args.ticks = parse_value(&flag, it.next()).unwrap_or(args.ticks),
                other => log::warn!("Ignoring argument {}", other),
            }
        }
        args
    }

    /// Frame driver: variable frame time in, fixed simulation steps out
    struct Runner {
        session: GameSession,
        scene: Scene,
        accumulator: f32,
        input: TickInput,
        /// Impulses that actually flapped this run
        flaps: u32,
    }

    impl Runner {
        fn update(&mut self, frame_dt: f32) {
            let dt = frame_dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let report = tick(&mut self.session, &mut self.scene, &self.input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                self.flaps += report
                    .impulses
                    .iter()
                    .filter(|r| **r != ImpulseResponse::Ignored)
                    .count() as u32;

                // Clear one-shot inputs after processing
                self.input = TickInput::default();
            }
        }

        /// Flap when below the next gap and not already rising
        fn autopilot(&mut self) {
            let actor = &self.scene.actor;
            let target_y = self
                .scene
                .spawner
                .obstacles()
                .filter(|p| p.pos.x + 0.5 > actor.pos.x)
                .min_by(|a, b| a.pos.x.total_cmp(&b.pos.x))
                .map_or(0.0, |p| p.pos.y - 0.5);

            if !actor.started || (actor.pos.y < target_y && actor.velocity <= 0.0) {
                self.input.impulses += 1;
            }
        }
    }

    pub fn run() {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        log::info!("Skyflap (headless) starting...");

        let args = parse_args(std::env::args().skip(1));
        let mut config = args
            .config
            .as_deref()
            .map(GameConfig::load)
            .unwrap_or_default();
        if let Some(seed) = args.seed {
            config.seed = seed;
        }
        log::info!("Seed: {}", config.seed);

        let store: Box<dyn KeyValueStore> = match &args.store {
            Some(path) => Box::new(JsonFileStore::open_or_default(path)),
            None => Box::new(MemoryStore::new()),
        };

        let mut session = GameSession::new(Some(store));
        session.subscribe(EventKind::GameStarted, |_| log::info!("> Go!"));
        session.subscribe(EventKind::ScoreChanged, |e| {
            if let GameEvent::ScoreChanged { score } = e {
                log::info!("> Score: {}", score);
            }
        });
        session.subscribe(EventKind::GameOverNotified, |_| log::info!("> Crash!"));
        session.subscribe(EventKind::GameOverPanelReady, |e| {
            if let GameEvent::GameOverPanelReady {
                final_score,
                high_score,
            } = e
            {
                log::info!("> Score: {}  Best: {}", final_score, high_score);
            }
        });

        let mut runner = Runner {
            scene: Scene::new(&config),
            session,
            accumulator: 0.0,
            input: TickInput::default(),
            flaps: 0,
        };

        for run in 1..=args.runs {
            log::info!("Run {}/{}", run, args.runs);
            let mut frames = 0;
            while frames < args.ticks {
                if runner.session.phase() != GamePhase::GameOver {
                    runner.autopilot();
                }
                runner.update(SIM_DT);
                frames += 1;

                // Give the panel notification time to fire, then restart
                if runner.session.phase() == GamePhase::GameOver && !runner.session.panel_pending()
                {
                    break;
                }
            }
            log::info!(
                "Run {} finished: score {}, {} flaps",
                run,
                runner.session.score(),
                runner.flaps
            );
            runner.flaps = 0;
            runner.input.restart = true;
            runner.update(SIM_DT);
        }

        log::info!("Done. Best score: {}", runner.session.high_score());
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn argv(args: &[&str]) -> Vec<String> {
            args.iter().map(|a| a.to_string()).collect()
        }

        #[test]
        fn test_defaults() {
            let args = parse_args(Vec::new());
            assert_eq!(args.seed, None);
            assert_eq!((args.runs, args.ticks), (3, 3600));
        }

        #[test]
        fn test_unknown_flag_does_not_swallow_next() {
            let args = parse_args(argv(&["--verbose", "--seed", "3", "--runs", "5"]));
            assert_eq!(args.seed, Some(3));
            assert_eq!(args.runs, 5);
        }

        #[test]
        fn test_bad_values_keep_defaults() {
            let args = parse_args(argv(&["--seed", "abc", "--runs", "x", "--ticks", "-1"]));
            assert_eq!(args.seed, None);
            assert_eq!((args.runs, args.ticks), (3, 3600));

            let args = parse_args(argv(&["--seed", "7", "--seed", "oops"]));
            assert_eq!(args.seed, Some(7));
        }

        #[test]
        fn test_paths_and_missing_value() {
            let args = parse_args(argv(&["--store", "best.json", "--config"]));
            assert_eq!(args.store, Some(PathBuf::from("best.json")));
            assert_eq!(args.config, None);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The wasm build is used as a library by a web frontend
}
