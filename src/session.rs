//! The whole game, as one value the host owns and pokes.
//!
//! A [`GameSession`] never looks at a clock on its own: the host feeds it [`Intent`]s as they happen and calls
//! [`GameSession::update`] once a frame. Everything time-based (the countdown, the push dwell, the gap between tasks,
//! the pause before the summary) is a deadline that `update` fires once it's passed, oldest first. Nothing the player
//! does during play is an error; anything that doesn't make sense right now is ignored and logged.

use rand::{rngs::SmallRng, SeedableRng};

use crate::{
    catalog::Task,
    config::Config,
    error::Result,
    layout::{self, AudienceMember, MemberId},
    scoring::Summary,
    signal::{Broadcast, Frame, Hold, Intent, MemberSnapshot, Outbox, Signal},
    targeting::TargetDetector,
    task::{TaskEvent, TaskSession, TaskState},
    timing::{Delay, Instant},
    viewfinder::{Direction, Motion, ViewfinderTracker},
};

/// Where the game as a whole is.
#[derive(Clone, PartialEq, Debug)]
pub enum Phase {
    /// Set up, waiting for [`GameSession::start`].
    Ready,
    /// Tasks are being drawn and played.
    Playing,
    /// A task ran out; the summary is on its way.
    Failing,
    /// Done. Only [`GameSession::restart`] leaves this.
    Over(Summary),
}

/// A shot on the big screen, waiting out its dwell.
#[derive(Clone, Debug)]
struct PendingPush {
    dwell: Delay,
    /// Whether the shot completed the task, decided when it was pushed.
    success: bool,
    reacting: Vec<MemberId>,
}

/// The timers `update` knows how to fire. Declaration order breaks ties between equal deadlines.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
enum Due {
    Dwell,
    Task,
    Linger,
}

pub struct GameSession {
    config: Config,
    rng: SmallRng,
    detector: TargetDetector,

    audience: Vec<AudienceMember>,
    viewfinder: ViewfinderTracker,
    motion: Motion,
    tasks: TaskSession,
    highlighted: Vec<MemberId>,

    score: u32,
    phase: Phase,
    push: Option<PendingPush>,
    linger: Option<Delay>,

    outbox: Outbox,
    /// Whether a [`Signal::Frame`] is owed at the end of the next update.
    tainted: bool,
}

impl GameSession {
    /// Validate the config and lay out the first crowd. The game doesn't begin until [`Self::start`].
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let mut rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        let audience = layout::generate(
            config.audience_count,
            config.couple_count,
            config.scroll_range(),
            &config.catalog.solo,
            &config.catalog.couples,
            &mut rng,
        )?;
        let tasks = TaskSession::new(
            config.catalog.tasks.clone(),
            config.task_duration_secs,
            config.next_task_delay(),
        )?;
        tracing::debug!(seed = ?config.seed, members = audience.len(), "session built");
        Ok(Self {
            detector: TargetDetector::new(config.highlight_band, config.completion_band),
            viewfinder: ViewfinderTracker::new(config.viewfinder_width, config.scroll_range()),
            config,
            rng,
            audience,
            motion: Motion::default(),
            tasks,
            highlighted: vec![],
            score: 0,
            phase: Phase::Ready,
            push: None,
            linger: None,
            outbox: Outbox::default(),
            tainted: true,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn audience(&self) -> &[AudienceMember] {
        &self.audience
    }

    pub fn viewfinder(&self) -> &ViewfinderTracker {
        &self.viewfinder
    }

    pub fn held_direction(&self) -> Option<Direction> {
        self.motion.held()
    }

    /// The most recent task, even if it's already been completed or run out.
    pub fn current_task(&self) -> Option<&Task> {
        self.tasks.current()
    }

    /// The task a push could complete right now.
    pub fn active_task(&self) -> Option<&Task> {
        self.tasks.active()
    }

    pub fn task_state(&self) -> TaskState {
        self.tasks.state()
    }

    pub fn time_left(&self) -> u32 {
        self.tasks.time_left()
    }

    /// Whether a shot is on the big screen, locking out movement and further pushes.
    pub fn is_pushing(&self) -> bool {
        self.push.is_some()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Fans currently lit up by the highlight band.
    pub fn highlighted(&self) -> &[MemberId] {
        &self.highlighted
    }

    /// Take every signal queued since the last drain.
    pub fn drain_signals(&mut self) -> Vec<Signal> {
        self.outbox.drain()
    }

    /// Like [`Self::drain_signals`], but into an existing buffer.
    pub fn drain_signals_into(&mut self, into: &mut Vec<Signal>) {
        self.outbox.drain_into(into)
    }

    /// Begin the first task. Only does anything while [`Phase::Ready`].
    pub fn start(&mut self) {
        if self.phase != Phase::Ready {
            tracing::trace!(phase = ?self.phase, "start ignored, game already underway");
            return;
        }
        self.phase = Phase::Playing;
        let task = self.tasks.start(&mut self.rng).clone();
        tracing::info!(task = task.id, name = %task.name, "game started");
        self.outbox.queue(Signal::TaskChanged {
            id: task.id,
            name: task.name,
            time_left: self.tasks.time_left(),
        });
        self.refresh_highlight();
    }

    /// Apply one player intent.
    pub fn intent(&mut self, intent: Intent) {
        match intent {
            Intent::Move(direction, Hold::Start) => self.move_start(direction),
            Intent::Move(_, Hold::Stop) => self.move_stop(),
            Intent::Push => self.push(),
            Intent::Swipe(direction) => self.swipe(direction),
            Intent::Resize(width) => self.resize(width),
            Intent::Restart => self.restart(),
        }
    }

    /// Whether the camera can be panned: only during play, and never with a shot on the big screen.
    fn can_pan(&self) -> bool {
        self.phase == Phase::Playing && !self.is_pushing()
    }

    /// Start panning continuously. Ignored outside of play, while pushing, or while the other direction is held.
    pub fn move_start(&mut self, direction: Direction) {
        if !self.can_pan() {
            tracing::trace!(?direction, phase = ?self.phase, pushing = self.is_pushing(), "move ignored");
            return;
        }
        if !self.motion.start(direction) {
            tracing::trace!(?direction, "move ignored, opposite direction held");
        }
    }

    /// Stop panning, whichever way it was going.
    pub fn move_stop(&mut self) {
        self.motion.stop();
    }

    /// One swipe-sized pan. Ignored outside of play or while pushing.
    pub fn swipe(&mut self, direction: Direction) {
        if !self.can_pan() {
            tracing::trace!(?direction, phase = ?self.phase, pushing = self.is_pushing(), "swipe ignored");
            return;
        }
        self.viewfinder.nudge(direction, self.config.swipe_step);
        self.refresh_highlight();
        self.tainted = true;
    }

    /// The viewfinder was measured at a new width.
    pub fn resize(&mut self, width: f64) {
        if !width.is_finite() {
            tracing::debug!(width, "resize to a non-finite width ignored");
            return;
        }
        self.viewfinder.resize(width);
        tracing::debug!(width = self.viewfinder.width(), position = self.viewfinder.position(), "viewfinder resized");
        self.refresh_highlight();
        self.tainted = true;
    }

    /// Put the current shot on the big screen.
    ///
    /// Whether it completes the task is decided right now, against the completion band; the score only lands once
    /// the dwell runs out. Couples inside the visible window react for the length of the dwell.
    pub fn push(&mut self) {
        if self.is_pushing() {
            tracing::trace!("push ignored, already pushing");
            return;
        }
        if self.phase != Phase::Playing {
            tracing::trace!(phase = ?self.phase, "push ignored outside of play");
            return;
        }
        self.motion.stop();

        let window = self.viewfinder.visible_window();
        let mut reacting = vec![];
        for m in self.audience.iter_mut().filter(|m| m.is_couple && window.contains(m.x)) {
            m.is_reacting = true;
            reacting.push(m.id);
        }

        let broadcast = Broadcast {
            position: self.viewfinder.position(),
            width: self.viewfinder.width(),
            members: self.audience.iter().map(MemberSnapshot::from).collect(),
            reacting: reacting.clone(),
        };

        let success = self
            .detector
            .is_complete(self.tasks.active(), &self.audience, &self.viewfinder);
        tracing::debug!(success, position = self.viewfinder.position(), reacting = reacting.len(), "pushed");

        self.push = Some(PendingPush {
            dwell: Delay::after(self.config.push_dwell()),
            success,
            reacting,
        });
        self.outbox.queue(Signal::Broadcast(broadcast));
        self.tainted = true;
    }

    /// Throw everything away: new crowd, score zero, no task, every timer cancelled. Back to [`Phase::Ready`].
    pub fn restart(&mut self) {
        self.push = None;
        self.linger = None;
        self.motion.stop();
        self.tasks.reset();

        match layout::generate(
            self.config.audience_count,
            self.config.couple_count,
            self.config.scroll_range(),
            &self.config.catalog.solo,
            &self.config.catalog.couples,
            &mut self.rng,
        ) {
            Ok(audience) => self.audience = audience,
            Err(e) => {
                tracing::warn!(error = %e, "couldn't lay out a new crowd, keeping the old one");
                for m in &mut self.audience {
                    m.is_reacting = false;
                    m.is_highlighted = false;
                }
            }
        }
        self.viewfinder = ViewfinderTracker::new(self.viewfinder.width(), self.config.scroll_range());
        self.highlighted.clear();
        self.score = 0;
        self.phase = Phase::Ready;
        tracing::info!("game reset");
        self.outbox.queue(Signal::Reset);
        self.tainted = true;
    }

    /// Run one frame: pan if a direction is held, fire everything that's come due, and queue a
    /// [`Signal::Frame`] if anything visible changed.
    pub fn update(&mut self) {
        if self.can_pan() && self.motion.step(&mut self.viewfinder, self.config.move_speed) {
            self.refresh_highlight();
            self.tainted = true;
        }

        while let Some(due) = self.next_due() {
            match due {
                Due::Dwell => self.end_push(),
                Due::Task => self.fire_task(),
                Due::Linger => self.finish(),
            }
        }

        if self.tainted {
            self.tainted = false;
            self.outbox.queue(Signal::Frame(Frame {
                position: self.viewfinder.position(),
                highlighted: self.highlighted.clone(),
                is_pushing: self.is_pushing(),
            }));
        }
    }

    /// The earliest timer that's already passed, if any.
    fn next_due(&self) -> Option<Due> {
        let now = Instant::now();
        [
            self.push.as_ref().map(|p| (p.dwell.when(), Due::Dwell)),
            self.tasks.deadline().map(|d| (d, Due::Task)),
            self.linger.map(|l| (l.when(), Due::Linger)),
        ]
        .into_iter()
        .flatten()
        .filter(|(when, _)| *when <= now)
        .min()
        .map(|(_, due)| due)
    }

    fn fire_task(&mut self) {
        if self.is_pushing() && self.tasks.is_final_tick() {
            self.tasks.hold_expiry();
            return;
        }
        match self.tasks.fire(&mut self.rng) {
            Some(TaskEvent::Ticked { time_left }) => {
                self.outbox.queue(Signal::Countdown { time_left });
            }
            Some(TaskEvent::Expired) => self.fail(),
            Some(TaskEvent::Started { task, time_left }) => {
                tracing::debug!(task = task.id, "next task up");
                self.outbox.queue(Signal::TaskChanged {
                    id: task.id,
                    name: task.name,
                    time_left,
                });
                self.refresh_highlight();
            }
            None => (),
        }
    }

    fn end_push(&mut self) {
        let push = match self.push.take() {
            Some(p) => p,
            None => return,
        };
        for m in self.audience.iter_mut().filter(|m| push.reacting.contains(&m.id)) {
            m.is_reacting = false;
        }
        self.outbox.queue(Signal::BroadcastEnded);
        self.tainted = true;

        if push.success && self.tasks.complete() {
            self.score += 1;
            tracing::info!(score = self.score, "task completed");
            self.outbox.queue(Signal::TaskCompleted { score: self.score });
            self.tasks.next();
            self.refresh_highlight();
        } else if self.tasks.is_expiry_held() && self.tasks.release_expiry() == TaskState::Expired {
            self.fail();
        }
    }

    fn fail(&mut self) {
        tracing::info!(score = self.score, "task failed");
        self.outbox.queue(Signal::Countdown { time_left: 0 });
        self.outbox.queue(Signal::TaskFailed);
        self.phase = Phase::Failing;
        self.linger = Some(Delay::after(self.config.fail_linger()));
        self.motion.stop();
        self.refresh_highlight();
    }

    fn finish(&mut self) {
        self.linger = None;
        let summary = Summary::new(self.score, self.config.task_duration_secs, &self.config.titles);
        tracing::info!(
            score = summary.final_score,
            title = %summary.title,
            avg_time = summary.avg_time,
            "game over"
        );
        self.phase = Phase::Over(summary.clone());
        self.outbox.queue(Signal::GameOver(summary));
    }

    fn refresh_highlight(&mut self) {
        let lit = self
            .detector
            .highlight(self.tasks.active(), &mut self.audience, &self.viewfinder);
        if lit != self.highlighted {
            self.highlighted = lit;
            self.tainted = true;
        }
    }
}
