//! Headless kiss-cam: an autopilot plays the game and every signal gets logged.
//!
//! Usage: `kisscam [--config FILE] [--seed N] [--games N] [--skill P]`

use std::{path::PathBuf, process};

use clap::Parser;
use rand::{rngs::SmallRng, Rng, SeedableRng};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use kisscam::{Config, Direction, GameSession, Hold, Host, Intent, Phase, Response, Runner, Signal};

#[derive(Parser, Debug)]
#[command(name = "kisscam", version)]
#[command(about = "Let an autopilot run the kiss cam and log what happens")]
struct Args {
    /// YAML config file; anything it leaves out keeps its default
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for the game (and the autopilot), overriding the config
    #[arg(long)]
    seed: Option<u64>,

    /// How many games to play before quitting
    #[arg(short, long, default_value = "1")]
    games: u32,

    /// Chance the autopilot bothers chasing any given task
    #[arg(long, default_value = "0.8")]
    skill: f64,
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,kisscam=debug")))
        .init();
}

/// Pans until a fan the task wants sits in the middle of the completion band, then pushes.
struct Autopilot {
    rng: SmallRng,
    skill: f64,
    games_left: u32,
    /// The task being worked on, and whether it's being chased at all.
    task: Option<(u32, bool)>,
}

impl Autopilot {
    /// Where the viewfinder should sit to put the nearest wanted fan at the centre of the completion band.
    fn aim(session: &GameSession) -> Option<f64> {
        let task = session.active_task()?;
        let vf = session.viewfinder();
        let band = session.config().completion_band;
        let centre = vf.width() * (band.start + band.end) / 2.0;
        session
            .audience()
            .iter()
            .filter(|m| task.accepts(&m.sprite_type))
            .map(|m| (m.x - centre).clamp(0.0, vf.max_right_distance()))
            .min_by(|a, b| (a - vf.position()).abs().total_cmp(&(b - vf.position()).abs()))
    }
}

impl Host for Autopilot {
    fn intents(&mut self, session: &GameSession, into: &mut Vec<Intent>) {
        if session.is_pushing() || *session.phase() != Phase::Playing {
            return;
        }
        let id = match session.active_task() {
            Some(t) => t.id,
            None => return,
        };
        let chasing = match self.task {
            Some((current, chasing)) if current == id => chasing,
            _ => {
                let chasing = self.rng.gen_bool(self.skill);
                tracing::debug!(task = id, chasing, "autopilot picked up a task");
                self.task = Some((id, chasing));
                chasing
            }
        };
        if !chasing {
            return;
        }
        let target = match Self::aim(session) {
            Some(t) => t,
            None => return,
        };
        let position = session.viewfinder().position();
        let step = session.config().move_speed;
        if (target - position).abs() <= step {
            into.push(Intent::Push);
        } else {
            let direction = if target > position { Direction::Right } else { Direction::Left };
            if session.held_direction() != Some(direction) {
                into.push(Intent::Move(direction.opposite(), Hold::Stop));
                into.push(Intent::Move(direction, Hold::Start));
            }
        }
    }

    fn signal(&mut self, signal: &Signal, _session: &GameSession) -> Response {
        match signal {
            Signal::Frame(_) => (),
            Signal::Broadcast(b) => info!(position = b.position, reacting = b.reacting.len(), "on the big screen"),
            Signal::BroadcastEnded => (),
            Signal::TaskChanged { name, time_left, .. } => info!(%name, time_left, "new task"),
            Signal::Countdown { time_left } => tracing::debug!(time_left, "tick"),
            Signal::TaskCompleted { score } => info!(score, "got it"),
            Signal::TaskFailed => info!("out of time"),
            Signal::GameOver(summary) => {
                info!(
                    score = summary.final_score,
                    title = %summary.title,
                    avg_time = format_args!("{:.2}s", summary.avg_time),
                    "game over"
                );
                self.games_left = self.games_left.saturating_sub(1);
                if self.games_left == 0 {
                    return Response::Quit;
                }
            }
            Signal::Reset => self.task = None,
            other => tracing::debug!(?other, "unhandled signal"),
        }
        Response::Nothing
    }
}

/// Queues a restart after each game that isn't the last.
struct Replay(Autopilot);

impl Host for Replay {
    fn intents(&mut self, session: &GameSession, into: &mut Vec<Intent>) {
        if matches!(session.phase(), Phase::Over(_)) {
            into.push(Intent::Restart);
        } else {
            self.0.intents(session, into);
        }
    }

    fn signal(&mut self, signal: &Signal, session: &GameSession) -> Response {
        self.0.signal(signal, session)
    }
}

fn main() {
    init_logging();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => match Config::load(path) {
            Ok(c) => c,
            Err(e) => {
                error!("{}: {}", path.display(), e);
                process::exit(1);
            }
        },
        None => Config::default(),
    };
    if let Some(seed) = args.seed {
        config = config.seed(seed);
    }
    if !(0.0..=1.0).contains(&args.skill) {
        error!("--skill must be between 0 and 1, got {}", args.skill);
        process::exit(2);
    }

    let rng = match config.seed {
        Some(seed) => SmallRng::seed_from_u64(seed.wrapping_add(1)),
        None => SmallRng::from_entropy(),
    };
    let session = match GameSession::new(config) {
        Ok(s) => s,
        Err(e) => {
            error!("couldn't set up the game: {}", e);
            process::exit(1);
        }
    };

    info!(games = args.games, skill = args.skill, "rolling");
    let mut host = Replay(Autopilot {
        rng,
        skill: args.skill,
        games_left: args.games.max(1),
        task: None,
    });
    let session = Runner::new(session).run(&mut host);
    info!(score = session.score(), "done");
}
