//! Decides whether the right fan is in the right part of the shot.
//!
//! There are two bands, both measured as fractions of the viewfinder width from its left edge:
//!
//! - the **highlight** band (30%–70% by default), which lights up matching fans while the player pans, and
//! - the **completion** band (10%–50% by default), which is what actually counts when the shot is pushed.
//!
//! Each is configured on its own.

use serde::{Deserialize, Serialize};

use crate::{
    catalog::Task,
    error::{Error, Result},
    layout::{AudienceMember, MemberId},
    viewfinder::{ViewfinderTracker, Window},
};

/// A fractional sub-range of the viewfinder window.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct Band {
    pub start: f64,
    pub end: f64,
}

impl Band {
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Ensure `0 <= start <= end <= 1`.
    pub fn validate(&self, name: &'static str) -> Result<()> {
        let ok = (0.0..=1.0).contains(&self.start) && (0.0..=1.0).contains(&self.end) && self.start <= self.end;
        if ok {
            Ok(())
        } else {
            Err(Error::InvalidBand {
                name,
                start: self.start,
                end: self.end,
            })
        }
    }

    /// Where this band lands in scroll-space for the given window.
    pub fn over(&self, window: Window) -> Span {
        let width = window.width();
        Span {
            lo: window.start + width * self.start,
            hi: window.start + width * self.end,
        }
    }
}

/// An absolute range of scroll-space, inclusive on both ends.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Span {
    pub lo: f64,
    pub hi: f64,
}

impl Span {
    pub fn contains(&self, x: f64) -> bool {
        x >= self.lo && x <= self.hi
    }
}

/// Whether any fan the task accepts is standing inside `span`. Stops at the first match.
pub fn is_target_present(task: &Task, audience: &[AudienceMember], span: Span) -> bool {
    audience
        .iter()
        .any(|m| task.accepts(&m.sprite_type) && span.contains(m.x))
}

/// Holds the two bands and applies them to the live viewfinder.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct TargetDetector {
    highlight: Band,
    completion: Band,
}

impl TargetDetector {
    pub fn new(highlight: Band, completion: Band) -> Self {
        Self { highlight, completion }
    }

    pub fn highlight_band(&self) -> Band {
        self.highlight
    }

    pub fn completion_band(&self) -> Band {
        self.completion
    }

    /// The highlight band over the current window, or `None` if the viewfinder hasn't been measured yet.
    pub fn highlight_span(&self, viewfinder: &ViewfinderTracker) -> Option<Span> {
        viewfinder
            .is_measured()
            .then(|| self.highlight.over(viewfinder.visible_window()))
    }

    /// The completion band over the current window, or `None` if the viewfinder hasn't been measured yet.
    pub fn completion_span(&self, viewfinder: &ViewfinderTracker) -> Option<Span> {
        viewfinder
            .is_measured()
            .then(|| self.completion.over(viewfinder.visible_window()))
    }

    /// Re-light the crowd: exactly the fans the task accepts that stand in the highlight band get flagged.
    ///
    /// Returns the ids that ended up highlighted. Never decides completion.
    pub fn highlight(
        &self,
        task: Option<&Task>,
        audience: &mut [AudienceMember],
        viewfinder: &ViewfinderTracker,
    ) -> Vec<MemberId> {
        let span = self.highlight_span(viewfinder);
        let mut lit = vec![];
        for m in audience.iter_mut() {
            m.is_highlighted = match (task, span) {
                (Some(task), Some(span)) => task.accepts(&m.sprite_type) && span.contains(m.x),
                _ => false,
            };
            if m.is_highlighted {
                lit.push(m.id);
            }
        }
        lit
    }

    /// Whether pushing right now would complete `task`.
    ///
    /// With no task, or no usable viewfinder, this is just `false`: not completable yet, try again later.
    pub fn is_complete(&self, task: Option<&Task>, audience: &[AudienceMember], viewfinder: &ViewfinderTracker) -> bool {
        let task = match task {
            Some(t) => t,
            None => {
                tracing::trace!("no active task, capture can't complete");
                return false;
            }
        };
        let span = match self.completion_span(viewfinder) {
            Some(s) => s,
            None => {
                tracing::debug!("viewfinder not measured, capture can't complete");
                return false;
            }
        };
        let hit = is_target_present(task, audience, span);
        tracing::debug!(task = task.id, lo = span.lo, hi = span.hi, hit, "completion checked");
        hit
    }
}
