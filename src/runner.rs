//! Contains the "main loop": gather input, step the session, hand the results to whoever's hosting it.

use std::{thread, time::Duration};

use crate::{
    constants::host::FRAME_RATE,
    session::{GameSession, Phase},
    signal::{Intent, Signal},
    timing::Timer,
    util::setters,
};

/// What the host wants the runner to do after seeing a signal.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Response {
    /// Keep going.
    Nothing,
    /// Stop running and hand back the session.
    Quit,
}

/// Whatever sits between the session and the outside world: reads input, draws output.
pub trait Host {
    /// Everything the player did since the last frame. Gets to look at the session to decide.
    fn intents(&mut self, session: &GameSession, into: &mut Vec<Intent>);

    /// React to one thing the session did.
    fn signal(&mut self, signal: &Signal, session: &GameSession) -> Response;
}

/// Handles starting up and running a [`GameSession`].
#[must_use]
pub struct Runner {
    session: GameSession,
    frame_rate: f64,
    autostart: bool,
    intents: Vec<Intent>,
    signals: Vec<Signal>,
}

impl Runner {
    /// Prepare a session to be run, at the frame rate it was configured with.
    pub fn new(session: GameSession) -> Self {
        Self {
            frame_rate: session.config().frame_rate,
            session,
            autostart: true,
            intents: vec![],
            signals: vec![],
        }
    }

    setters! {
        frame_rate(fps: f64) => frame_rate = fps,
        manual_start => autostart = false,
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    fn frame_period(&self) -> Duration {
        Duration::try_from_secs_f64(1.0 / self.frame_rate).unwrap_or_else(|_| {
            tracing::warn!(fps = self.frame_rate, "unusable frame rate, falling back to default");
            Duration::from_secs_f64(1.0 / FRAME_RATE)
        })
    }

    /// Run exactly one frame.
    ///
    /// Returns whether a stop was requested.
    pub fn step(&mut self, host: &mut impl Host) -> bool {
        if self.autostart && *self.session.phase() == Phase::Ready {
            self.session.start();
        }
        self.intents.clear();
        host.intents(&self.session, &mut self.intents);
        for intent in self.intents.drain(..) {
            self.session.intent(intent);
        }
        self.session.update();

        self.session.drain_signals_into(&mut self.signals);
        for signal in &self.signals {
            if host.signal(signal, &self.session) == Response::Quit {
                tracing::debug!("host asked to quit");
                return true;
            }
        }
        false
    }

    /// Run frames until the host asks to quit, sleeping in between to hold the frame rate.
    ///
    /// Returns the session, primarily for testing purposes.
    pub fn run(mut self, host: &mut impl Host) -> GameSession {
        let mut frame_timer = Timer::new(self.frame_period());
        loop {
            if self.step(host) {
                break;
            }
            while !frame_timer.tick_ready() {
                thread::sleep(frame_timer.remaining().min(Duration::from_millis(2)));
            }
        }
        self.session
    }
}
