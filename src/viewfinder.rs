//! Where the camera is pointed, and which way it's being panned.

use crate::constants::geometry::MAX_RIGHT_WINDOWS;

/// Which way to pan.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// `-1.0` for left, `1.0` for right.
    pub fn sign(self) -> f64 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// The slice of scroll-space currently visible through the viewfinder.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Window {
    pub start: f64,
    pub end: f64,
}

impl Window {
    pub fn width(&self) -> f64 {
        self.end - self.start
    }

    /// Inclusive on both ends.
    pub fn contains(&self, x: f64) -> bool {
        x >= self.start && x <= self.end
    }
}

/// What happened when the viewfinder was asked to move.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveOutcome {
    /// Moved freely.
    Moved,
    /// Ran into the bound in the direction of travel; any continued motion that way should stop.
    HitBound,
}

/// Owns the scroll offset and keeps it inside `[0, width * 3]`.
#[derive(Clone, PartialEq, Debug)]
pub struct ViewfinderTracker {
    position: f64,
    width: f64,
    max_scroll: f64,
}

impl ViewfinderTracker {
    /// A viewfinder of the given width over a scene `max_scroll` wide, starting centred on the scene.
    pub fn new(width: f64, max_scroll: f64) -> Self {
        let mut vf = Self {
            position: 0.0,
            width: width.max(0.0),
            max_scroll,
        };
        vf.position = vf.clamp(max_scroll / 2.0);
        vf
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    /// The configured scroll range of the scene. Fixed for the session.
    pub fn max_scroll(&self) -> f64 {
        self.max_scroll
    }

    /// The furthest right the viewfinder can go: a fixed number of window-widths, regardless of the scene.
    pub fn max_right_distance(&self) -> f64 {
        self.width * MAX_RIGHT_WINDOWS
    }

    fn clamp(&self, position: f64) -> f64 {
        position.clamp(0.0, self.max_right_distance())
    }

    /// `[position, position + width]`.
    pub fn visible_window(&self) -> Window {
        Window {
            start: self.position,
            end: self.position + self.width,
        }
    }

    /// Whether the viewfinder has been given a usable width yet.
    pub fn is_measured(&self) -> bool {
        self.width > 0.0
    }

    /// Pan by `speed` in `direction`, stopping at the bounds.
    pub fn move_by(&mut self, direction: Direction, speed: f64) -> MoveOutcome {
        let wanted = self.position + direction.sign() * speed;
        self.position = self.clamp(wanted);
        let at_bound = match direction {
            Direction::Left => self.position <= 0.0,
            Direction::Right => self.position >= self.max_right_distance(),
        };
        if at_bound {
            MoveOutcome::HitBound
        } else {
            MoveOutcome::Moved
        }
    }

    /// One swipe-sized jump. Same clamping as [`Self::move_by`], but nothing keeps going afterwards.
    pub fn nudge(&mut self, direction: Direction, step: f64) -> MoveOutcome {
        self.move_by(direction, step)
    }

    /// Jump directly to a position, clamped.
    pub fn set_position(&mut self, position: f64) {
        self.position = self.clamp(position);
    }

    /// The window was resized; keep the position valid under the new bounds.
    pub fn resize(&mut self, width: f64) {
        self.width = width.max(0.0);
        self.position = self.clamp(self.position);
    }
}

/// The direction currently being held, if any. Re-checked every frame, since a bound or an opposing input can clear
/// it between frames.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Motion {
    held: Option<Direction>,
}

impl Motion {
    pub fn held(&self) -> Option<Direction> {
        self.held
    }

    /// Start holding `direction`. Refused (returning `false`) if the other direction is already held.
    pub fn start(&mut self, direction: Direction) -> bool {
        match self.held {
            Some(d) if d == direction.opposite() => false,
            _ => {
                self.held = Some(direction);
                true
            }
        }
    }

    /// Let go of everything.
    pub fn stop(&mut self) {
        self.held = None;
    }

    /// Advance one frame: move the viewfinder if something is held, and let go if it hit the bound.
    ///
    /// Returns whether the viewfinder moved.
    pub fn step(&mut self, viewfinder: &mut ViewfinderTracker, speed: f64) -> bool {
        let direction = match self.held {
            Some(d) => d,
            None => return false,
        };
        let before = viewfinder.position();
        if viewfinder.move_by(direction, speed) == MoveOutcome::HitBound {
            self.held = None;
        }
        viewfinder.position() != before
    }
}
