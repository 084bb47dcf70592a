//! Miscellaneous helper types around controlling the timing of events.
//!
//! Everything here reads the clock through [`Instant`], which is swapped for `mock_instant`'s under test so the
//! countdown and delays can be driven with `MockClock::advance`.

use std::time::Duration;

#[cfg(test)]
pub(crate) use mock_instant::Instant;
#[cfg(not(test))]
pub(crate) use std::time::Instant;

/// Keeps track of time between relatively steady pulses.
#[derive(Clone, Debug)]
pub struct Timer {
    next: Instant,
    period: Duration,
}

impl Timer {
    /// Create a new timer with the given period. The first tick is right now.
    pub fn new(period: Duration) -> Self {
        Self {
            next: Instant::now(),
            period,
        }
    }

    /// Create a new timer with the given period. The first tick is one period from now.
    pub fn delayed(period: Duration) -> Self {
        Self {
            next: Instant::now() + period,
            period,
        }
    }

    /// When the timer next ticks over.
    pub fn deadline(&self) -> Instant {
        self.next
    }

    /// How much time is left before the timer ticks over. Minimum 0.0.
    pub fn remaining(&self) -> Duration {
        self.next
            .checked_duration_since(Instant::now())
            .unwrap_or(Duration::ZERO)
    }

    /// Whether the next tick is due.
    pub fn is_due(&self) -> bool {
        Instant::now() >= self.next
    }

    /// Reset the timer, loosely.
    ///
    /// Ticks try to stay lined up with the original tick, but if this is called more than half a period late, the
    /// next tick will be reset relative to the current time instead. If called early it will always advance by
    /// exactly one tick. Good for frame pacing, where dropping a frame is better than rushing to catch up.
    pub fn tick(&mut self) {
        let now = Instant::now();
        if now < self.next + self.period / 2 {
            self.next += self.period;
        } else {
            self.next = now + self.period;
        }
    }

    /// Reset the timer, strictly: always advance by exactly one period, no matter how late.
    ///
    /// Good for countdowns, where every elapsed period has to be counted even if the host stalled.
    pub fn advance(&mut self) {
        self.next += self.period;
    }

    /// Check whether we've ticked yet; if so, [`Self::tick`]. Useful for ratelimiting.
    pub fn tick_ready(&mut self) -> bool {
        if self.is_due() {
            self.tick();
            true
        } else {
            false
        }
    }
}

/// A single moment something should happen, once.
///
/// Cancelling is just dropping it: whoever owns the `Delay` owns the pending callback.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Delay(Instant);

impl Delay {
    /// Fire after the given duration.
    pub fn after(amt: Duration) -> Self {
        Self(Instant::now() + amt)
    }

    /// When this fires.
    pub fn when(&self) -> Instant {
        self.0
    }

    /// Whether the moment has come.
    pub fn is_ready(&self) -> bool {
        Instant::now() >= self.0
    }
}
