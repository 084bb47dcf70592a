//! Various constants, for use in various places. Most of them are only defaults; see [`crate::config::Config`].

/// Constants with gameplay implications.
pub mod gameplay {
    /// How long the player has to complete each task, in seconds.
    pub const TASK_DURATION_SECS: u32 = 15;
    /// How long a push stays on the big screen before the camera unlocks, in milliseconds.
    pub const PUSH_DWELL_MS: u64 = 3000;
    /// Pause between finishing one task and the next being drawn, in milliseconds.
    pub const NEXT_TASK_DELAY_MS: u64 = 2000;
    /// How long the "try again" notice lingers before the summary, in milliseconds.
    pub const FAIL_LINGER_MS: u64 = 2000;
    /// How far the viewfinder pans per frame while a direction is held.
    pub const MOVE_SPEED: f64 = 10.0;
    /// How far one swipe gesture pans the viewfinder.
    pub const SWIPE_STEP: f64 = 100.0;
    /// Solo fans in the crowd.
    pub const AUDIENCE_COUNT: usize = 11;
    /// Couples in the crowd.
    pub const COUPLE_COUNT: usize = 3;
}

/// Constants describing the shape of the scene.
pub mod geometry {
    /// Width of the visible viewfinder window.
    pub const VIEWFINDER_WIDTH: f64 = 560.0;
    /// The viewfinder can pan right this many window-widths at most.
    pub const MAX_RIGHT_WINDOWS: f64 = 3.0;
    /// Width of the stage the scroll range is measured against.
    pub const STAGE_WIDTH: f64 = 720.0;
    /// The crowd is spread across this many stage-widths.
    pub const SCROLL_RANGE_MULTIPLIER: f64 = 2.5;
    /// No fan is placed closer than this to the left edge of the scroll range.
    pub const LEFT_MARGIN: f64 = 100.0;
    /// No fan is placed closer than this to the right edge of the scroll range.
    pub const RIGHT_MARGIN: f64 = 200.0;
    /// How far each fan may drift from even spacing, as a fraction of that spacing (each way).
    pub const JITTER: f64 = 0.15;
    /// Live feedback band, as fractions of the viewfinder width.
    pub const HIGHLIGHT_BAND: (f64, f64) = (0.30, 0.70);
    /// Capture band, as fractions of the viewfinder width.
    pub const COMPLETION_BAND: (f64, f64) = (0.10, 0.50);
}

/// Constants for the host loop.
pub mod host {
    /// Target frames per second for continuous panning.
    pub const FRAME_RATE: f64 = 60.0;
}
