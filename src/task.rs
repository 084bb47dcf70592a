//! The director's current request, and the clock running down on it.
//!
//! A [`TaskSession`] goes `Idle → Active → Completed → (delay) → Active → ...` for as long as the player keeps
//! succeeding, and ends in `Expired` the first time the countdown runs out. It owns at most one live timer at a time:
//! either the countdown (while Active) or the pending restart (while Completed), never both.

use std::time::Duration;

use rand::Rng;

use crate::{
    catalog::Task,
    error::{Error, Result},
    timing::{Delay, Instant, Timer},
};

/// Where the current task is in its life.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TaskState {
    /// Nothing has been started yet.
    Idle,
    /// The countdown is running.
    Active,
    /// The player got it; the next task is on its way.
    Completed,
    /// Time ran out. Terminal: only an explicit [`TaskSession::start`] leaves it.
    Expired,
}

/// Something that happened when a [`TaskSession`] timer fired.
#[derive(Clone, PartialEq, Debug)]
pub enum TaskEvent {
    /// The countdown ticked down and there's still time.
    Ticked { time_left: u32 },
    /// The countdown hit zero.
    Expired,
    /// A new task was drawn after the post-completion delay.
    Started { task: Task, time_left: u32 },
}

/// Holds the active task and its countdown, and picks new tasks from the pool.
#[derive(Clone, Debug)]
pub struct TaskSession {
    pool: Vec<Task>,
    duration_secs: u32,
    next_delay: Duration,

    state: TaskState,
    current: Option<Task>,
    time_left: u32,
    /// The countdown, while Active.
    countdown: Option<Timer>,
    /// The pending [`Self::start`], while Completed.
    pending_start: Option<Delay>,
    /// The final tick arrived while it wasn't allowed to land yet; see [`Self::hold_expiry`].
    expiry_held: bool,
}

impl TaskSession {
    /// A session drawing from `pool`, giving `duration_secs` per task and waiting `next_delay` between them.
    ///
    /// An empty pool is a setup error.
    pub fn new(pool: Vec<Task>, duration_secs: u32, next_delay: Duration) -> Result<Self> {
        if pool.is_empty() {
            return Err(Error::EmptyTaskPool);
        }
        Ok(Self {
            pool,
            duration_secs,
            next_delay,
            state: TaskState::Idle,
            current: None,
            time_left: duration_secs,
            countdown: None,
            pending_start: None,
            expiry_held: false,
        })
    }

    pub fn state(&self) -> TaskState {
        self.state
    }

    /// Whether the countdown is live.
    pub fn is_running(&self) -> bool {
        self.countdown.is_some()
    }

    /// The most recently drawn task, whatever state it's in.
    pub fn current(&self) -> Option<&Task> {
        self.current.as_ref()
    }

    /// The task that can still be completed right now, if any.
    pub fn active(&self) -> Option<&Task> {
        match self.state {
            TaskState::Active => self.current.as_ref(),
            _ => None,
        }
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    /// Whether a held final tick is waiting to be [released](Self::release_expiry).
    pub fn is_expiry_held(&self) -> bool {
        self.expiry_held
    }

    /// Whether the next tick would run the clock out.
    pub fn is_final_tick(&self) -> bool {
        self.state == TaskState::Active && self.time_left <= 1
    }

    /// Draw a new task and start its countdown.
    ///
    /// Picks uniformly from the pool, re-drawing if it picked the task that just ran (unless that's the only task).
    /// Any timer still pending from before is dropped.
    pub fn start<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &Task {
        let previous = self.current.as_ref().map(|t| t.id);
        let task = loop {
            let pick = &self.pool[rng.gen_range(0..self.pool.len())];
            if self.pool.len() == 1 || Some(pick.id) != previous {
                break pick.clone();
            }
        };

        if self.countdown.is_some() || self.pending_start.is_some() {
            tracing::debug!("start replaced a pending task timer");
        }
        self.pending_start = None;
        self.expiry_held = false;
        self.time_left = self.duration_secs;
        self.countdown = Some(Timer::delayed(Duration::from_secs(1)));
        self.state = TaskState::Active;
        tracing::debug!(task = task.id, name = %task.name, time_left = self.time_left, "task started");
        self.current.insert(task)
    }

    /// Take one second off the clock. Only meaningful while Active; otherwise it's ignored.
    pub fn tick(&mut self) -> TaskState {
        if self.state != TaskState::Active {
            tracing::trace!(state = ?self.state, "tick outside an active task ignored");
            return self.state;
        }
        self.time_left = self.time_left.saturating_sub(1);
        if let Some(timer) = self.countdown.as_mut() {
            timer.advance();
        }
        if self.time_left == 0 {
            self.countdown = None;
            self.expiry_held = false;
            self.state = TaskState::Expired;
            tracing::debug!(task = ?self.current.as_ref().map(|t| t.id), "task expired");
        }
        self.state
    }

    /// The player got it. Only meaningful while Active; returns whether it took effect.
    pub fn complete(&mut self) -> bool {
        if self.state != TaskState::Active {
            tracing::trace!(state = ?self.state, "complete outside an active task ignored");
            return false;
        }
        self.countdown = None;
        self.expiry_held = false;
        self.state = TaskState::Completed;
        tracing::debug!(task = ?self.current.as_ref().map(|t| t.id), time_left = self.time_left, "task completed");
        true
    }

    /// Queue up the next task to [start](Self::start) after the configured delay. Only meaningful once Completed.
    pub fn next(&mut self) -> bool {
        if self.state != TaskState::Completed {
            tracing::trace!(state = ?self.state, "next outside a completed task ignored");
            return false;
        }
        self.pending_start = Some(Delay::after(self.next_delay));
        true
    }

    /// The final tick is due but can't land yet (a push is in flight). Park it: the countdown stops at 1 and nothing
    /// fires until [`Self::release_expiry`] or [`Self::complete`].
    pub fn hold_expiry(&mut self) {
        if !self.is_final_tick() {
            return;
        }
        self.countdown = None;
        self.expiry_held = true;
        tracing::debug!("final tick held until the push resolves");
    }

    /// Let a held final tick land. Returns the resulting state.
    pub fn release_expiry(&mut self) -> TaskState {
        if !self.expiry_held {
            return self.state;
        }
        self.expiry_held = false;
        self.tick()
    }

    /// Back to Idle with nothing drawn and every timer dropped.
    pub fn reset(&mut self) {
        self.state = TaskState::Idle;
        self.current = None;
        self.time_left = self.duration_secs;
        self.countdown = None;
        self.pending_start = None;
        self.expiry_held = false;
    }

    /// When the next timer fires, if one is live.
    pub fn deadline(&self) -> Option<Instant> {
        match (&self.countdown, &self.pending_start) {
            (Some(t), _) => Some(t.deadline()),
            (None, Some(d)) => Some(d.when()),
            (None, None) => None,
        }
    }

    /// Fire whichever timer is live, if it's due.
    pub fn fire<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<TaskEvent> {
        if self.countdown.as_ref().map_or(false, Timer::is_due) {
            return Some(match self.tick() {
                TaskState::Expired => TaskEvent::Expired,
                _ => TaskEvent::Ticked {
                    time_left: self.time_left,
                },
            });
        }
        if self.pending_start.map_or(false, |d| d.is_ready()) {
            let task = self.start(rng).clone();
            return Some(TaskEvent::Started {
                task,
                time_left: self.time_left,
            });
        }
        None
    }
}

#[cfg(test)]
mod task_test {
    use std::collections::BTreeMap;

    use mock_instant::MockClock;
    use rand::{rngs::SmallRng, SeedableRng};

    use super::*;
    use crate::catalog::Catalog;

    fn session() -> TaskSession {
        TaskSession::new(Catalog::standard().tasks, 15, Duration::from_secs(2)).expect("pool isn't empty")
    }

    fn single(id: u32) -> Vec<Task> {
        let mut t = Catalog::standard().tasks;
        t.retain(|t| t.id == id);
        t
    }

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(0xC0FFEE)
    }

    #[test]
    fn empty_pool_rejected() {
        assert!(matches!(
            TaskSession::new(vec![], 15, Duration::from_secs(2)),
            Err(Error::EmptyTaskPool)
        ));
    }

    #[test]
    fn starts_idle() {
        let ts = session();
        assert_eq!(ts.state(), TaskState::Idle);
        assert!(ts.current().is_none());
        assert!(ts.deadline().is_none());
        assert!(!ts.is_running());
    }

    #[test]
    fn start_activates_with_full_clock() {
        let mut ts = session();
        ts.start(&mut rng());
        assert_eq!(ts.state(), TaskState::Active);
        assert_eq!(ts.time_left(), 15);
        assert!(ts.is_running());
        assert!(ts.active().is_some());
    }

    #[test]
    fn fifteen_ticks_expire_exactly_once() {
        let mut ts = session();
        ts.start(&mut rng());
        for left in (1..15).rev() {
            assert_eq!(ts.tick(), TaskState::Active);
            assert_eq!(ts.time_left(), left);
        }
        assert_eq!(ts.tick(), TaskState::Expired);
        assert_eq!(ts.time_left(), 0);
        assert!(!ts.is_running());
        // further ticks change nothing
        for _ in 0..5 {
            assert_eq!(ts.tick(), TaskState::Expired);
            assert_eq!(ts.time_left(), 0);
        }
        assert!(!ts.complete());
        assert!(!ts.next());
        assert_eq!(ts.state(), TaskState::Expired);
        assert!(ts.active().is_none());
    }

    #[test]
    fn countdown_fires_once_per_second() {
        let mut ts = session();
        let mut rng = rng();
        ts.start(&mut rng);
        assert_eq!(ts.fire(&mut rng), None);
        MockClock::advance(Duration::from_millis(999));
        assert_eq!(ts.fire(&mut rng), None);
        MockClock::advance(Duration::from_millis(1));
        assert_eq!(ts.fire(&mut rng), Some(TaskEvent::Ticked { time_left: 14 }));
        assert_eq!(ts.fire(&mut rng), None);
    }

    #[test]
    fn stalled_host_gets_every_tick() {
        let mut ts = session();
        let mut rng = rng();
        ts.start(&mut rng);
        MockClock::advance(Duration::from_secs(20));
        let mut events = vec![];
        while let Some(ev) = ts.fire(&mut rng) {
            events.push(ev);
        }
        assert_eq!(events.len(), 15);
        assert_eq!(events.last(), Some(&TaskEvent::Expired));
        assert_eq!(events.iter().filter(|e| **e == TaskEvent::Expired).count(), 1);
    }

    #[test]
    fn complete_stops_clock_and_next_restarts() {
        let mut ts = session();
        let mut rng = rng();
        let first = ts.start(&mut rng).id;
        assert!(ts.complete());
        assert_eq!(ts.state(), TaskState::Completed);
        assert!(ts.active().is_none());
        assert!(ts.deadline().is_none());
        assert!(ts.next());
        MockClock::advance(Duration::from_millis(1999));
        assert_eq!(ts.fire(&mut rng), None);
        MockClock::advance(Duration::from_millis(1));
        match ts.fire(&mut rng) {
            Some(TaskEvent::Started { task, time_left }) => {
                assert_ne!(task.id, first);
                assert_eq!(time_left, 15);
            }
            other => panic!("expected a new task, got {:?}", other),
        }
        assert_eq!(ts.state(), TaskState::Active);
    }

    #[test]
    fn complete_only_from_active() {
        let mut ts = session();
        assert!(!ts.complete());
        assert_eq!(ts.state(), TaskState::Idle);
        assert!(!ts.next());
    }

    #[test]
    fn never_repeats_back_to_back() {
        let mut ts = session();
        let mut rng = rng();
        let mut last = ts.start(&mut rng).id;
        for _ in 0..500 {
            let id = ts.start(&mut rng).id;
            assert_ne!(id, last);
            last = id;
        }
    }

    #[test]
    fn roughly_uniform_over_the_others() {
        let mut ts = session();
        let mut rng = rng();
        ts.start(&mut rng);
        let mut counts = BTreeMap::new();
        for _ in 0..11_000 {
            *counts.entry(ts.start(&mut rng).id).or_insert(0u32) += 1;
        }
        assert_eq!(counts.len(), 11);
        for (id, n) in counts {
            assert!(n > 700 && n < 1300, "task {} drawn {} times", id, n);
        }
    }

    #[test]
    fn single_task_pool_repeats() {
        let mut ts = TaskSession::new(single(4), 15, Duration::from_secs(2)).unwrap();
        let mut rng = rng();
        assert_eq!(ts.start(&mut rng).id, 4);
        assert_eq!(ts.start(&mut rng).id, 4);
    }

    #[test]
    fn restart_replaces_pending_timers() {
        let mut ts = session();
        let mut rng = rng();
        ts.start(&mut rng);
        ts.complete();
        ts.next();
        // starting directly cancels the pending delayed start
        ts.start(&mut rng);
        MockClock::advance(Duration::from_millis(2500));
        // only the countdown remains: two ticks, no surprise Started
        assert_eq!(ts.fire(&mut rng), Some(TaskEvent::Ticked { time_left: 14 }));
        assert_eq!(ts.fire(&mut rng), Some(TaskEvent::Ticked { time_left: 13 }));
        assert_eq!(ts.fire(&mut rng), None);
    }

    #[test]
    fn held_expiry_waits_for_release() {
        let mut ts = TaskSession::new(single(1), 2, Duration::from_secs(2)).unwrap();
        let mut rng = rng();
        ts.start(&mut rng);
        assert_eq!(ts.tick(), TaskState::Active);
        assert!(ts.is_final_tick());
        ts.hold_expiry();
        assert!(ts.is_expiry_held());
        assert!(ts.deadline().is_none());
        MockClock::advance(Duration::from_secs(5));
        assert_eq!(ts.fire(&mut rng), None);
        assert_eq!(ts.state(), TaskState::Active);
        assert_eq!(ts.release_expiry(), TaskState::Expired);
        assert!(!ts.is_expiry_held());
    }

    #[test]
    fn completing_drops_held_expiry() {
        let mut ts = TaskSession::new(single(1), 1, Duration::from_secs(2)).unwrap();
        let mut rng = rng();
        ts.start(&mut rng);
        ts.hold_expiry();
        assert!(ts.complete());
        assert!(!ts.is_expiry_held());
        assert_eq!(ts.release_expiry(), TaskState::Completed);
    }

    #[test]
    fn hold_ignored_with_time_to_spare() {
        let mut ts = session();
        ts.start(&mut rng());
        ts.hold_expiry();
        assert!(!ts.is_expiry_held());
        assert!(ts.is_running());
    }

    #[test]
    fn reset_drops_everything() {
        let mut ts = session();
        let mut rng = rng();
        ts.start(&mut rng);
        ts.complete();
        ts.next();
        ts.reset();
        assert_eq!(ts.state(), TaskState::Idle);
        assert!(ts.current().is_none());
        assert!(ts.deadline().is_none());
        assert_eq!(ts.time_left(), 15);
        MockClock::advance(Duration::from_secs(3));
        assert_eq!(ts.fire(&mut rng), None);
    }
}
