//! Everything tunable about a session. Every field has a default, so a config file only needs what it changes:
//!
//! ```yaml
//! task_duration_secs: 20
//! seed: 42
//! completion_band: { start: 0.2, end: 0.6 }
//! ```

use std::{fs, path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{
    catalog::{Catalog, Category},
    constants::{gameplay, geometry, host},
    error::{Error, Result},
    scoring::TitleTable,
    targeting::Band,
    util::setters,
};

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Width of the visible viewfinder window. Can change later through [`crate::Intent::Resize`].
    pub viewfinder_width: f64,
    pub stage_width: f64,
    /// The crowd is spread over `stage_width * scroll_range_multiplier`.
    pub scroll_range_multiplier: f64,
    /// Pan distance per frame while a direction is held.
    pub move_speed: f64,
    /// Pan distance per swipe.
    pub swipe_step: f64,

    pub task_duration_secs: u32,
    pub push_dwell_ms: u64,
    pub next_task_delay_ms: u64,
    pub fail_linger_ms: u64,

    pub highlight_band: Band,
    pub completion_band: Band,

    /// Solo fans in the crowd.
    pub audience_count: usize,
    /// Couples in the crowd, on top of `audience_count`.
    pub couple_count: usize,
    /// Fix the RNG for a reproducible game. Unset draws from entropy.
    pub seed: Option<u64>,
    /// How often the host runs [`crate::GameSession::update`].
    pub frame_rate: f64,

    pub titles: TitleTable,
    pub catalog: Catalog,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            viewfinder_width: geometry::VIEWFINDER_WIDTH,
            stage_width: geometry::STAGE_WIDTH,
            scroll_range_multiplier: geometry::SCROLL_RANGE_MULTIPLIER,
            move_speed: gameplay::MOVE_SPEED,
            swipe_step: gameplay::SWIPE_STEP,
            task_duration_secs: gameplay::TASK_DURATION_SECS,
            push_dwell_ms: gameplay::PUSH_DWELL_MS,
            next_task_delay_ms: gameplay::NEXT_TASK_DELAY_MS,
            fail_linger_ms: gameplay::FAIL_LINGER_MS,
            highlight_band: Band::new(geometry::HIGHLIGHT_BAND.0, geometry::HIGHLIGHT_BAND.1),
            completion_band: Band::new(geometry::COMPLETION_BAND.0, geometry::COMPLETION_BAND.1),
            audience_count: gameplay::AUDIENCE_COUNT,
            couple_count: gameplay::COUPLE_COUNT,
            seed: None,
            frame_rate: host::FRAME_RATE,
            titles: TitleTable::default(),
            catalog: Catalog::standard(),
        }
    }
}

fn require(ok: bool, msg: impl FnOnce() -> String) -> Result<()> {
    if ok {
        Ok(())
    } else {
        Err(Error::InvalidConfig(msg()))
    }
}

impl Config {
    setters! {
        viewfinder_width(width: f64) => viewfinder_width = width,
        stage_width(width: f64) => stage_width = width,
        scroll_range_multiplier(mult: f64) => scroll_range_multiplier = mult,
        move_speed(speed: f64) => move_speed = speed,
        swipe_step(step: f64) => swipe_step = step,
        task_duration_secs(secs: u32) => task_duration_secs = secs,
        push_dwell_ms(ms: u64) => push_dwell_ms = ms,
        next_task_delay_ms(ms: u64) => next_task_delay_ms = ms,
        fail_linger_ms(ms: u64) => fail_linger_ms = ms,
        highlight_band(band: Band) => highlight_band = band,
        completion_band(band: Band) => completion_band = band,
        seed(seed: u64) => seed = Some(seed),
        unseeded => seed = None,
        frame_rate(fps: f64) => frame_rate = fps,
        titles(titles: TitleTable) => titles = titles,
        catalog(catalog: Catalog) => catalog = catalog,
    }

    /// Set the crowd size: `solo` single fans plus `couples` couples.
    pub fn audience(mut self, solo: usize, couples: usize) -> Self {
        self.audience_count = solo;
        self.couple_count = couples;
        self
    }

    /// How wide the crowd is spread.
    pub fn scroll_range(&self) -> f64 {
        self.stage_width * self.scroll_range_multiplier
    }

    pub fn push_dwell(&self) -> Duration {
        Duration::from_millis(self.push_dwell_ms)
    }

    pub fn next_task_delay(&self) -> Duration {
        Duration::from_millis(self.next_task_delay_ms)
    }

    pub fn fail_linger(&self) -> Duration {
        Duration::from_millis(self.fail_linger_ms)
    }

    /// Parse a config out of YAML, then [validate](Self::validate) it.
    pub fn from_yaml(text: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a YAML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let config = Self::from_yaml(&text)?;
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Check everything a session needs before one gets built. Title bands check themselves on construction.
    pub fn validate(&self) -> Result<()> {
        self.highlight_band.validate("highlight")?;
        self.completion_band.validate("completion")?;
        self.catalog.validate()?;

        if self.audience_count + self.couple_count == 0 {
            return Err(Error::EmptyAudience);
        }
        if self.audience_count > 0 && self.catalog.solo.is_empty() {
            return Err(Error::NoSpriteTypes {
                category: Category::Solo,
                count: self.audience_count,
            });
        }
        if self.couple_count > 0 && self.catalog.couples.is_empty() {
            return Err(Error::NoSpriteTypes {
                category: Category::Couple,
                count: self.couple_count,
            });
        }
        require(self.stage_width.is_finite() && self.scroll_range_multiplier.is_finite(), || {
            format!(
                "stage_width ({}) and scroll_range_multiplier ({}) must be finite",
                self.stage_width, self.scroll_range_multiplier
            )
        })?;
        let range = self.scroll_range();
        require(range.is_finite(), || format!("scroll range must be finite, got {}", range))?;
        if range < geometry::LEFT_MARGIN + geometry::RIGHT_MARGIN {
            return Err(Error::ScrollRangeTooSmall(range));
        }

        require(self.viewfinder_width.is_finite() && self.viewfinder_width >= 0.0, || {
            format!("viewfinder_width must be a non-negative number, got {}", self.viewfinder_width)
        })?;
        require(self.move_speed.is_finite() && self.move_speed > 0.0, || {
            format!("move_speed must be positive, got {}", self.move_speed)
        })?;
        require(self.swipe_step.is_finite() && self.swipe_step >= 0.0, || {
            format!("swipe_step must be non-negative, got {}", self.swipe_step)
        })?;
        require(self.frame_rate.is_finite() && self.frame_rate > 0.0, || {
            format!("frame_rate must be positive, got {}", self.frame_rate)
        })?;
        require(self.task_duration_secs > 0, || "task_duration_secs must be at least 1".into())?;
        Ok(())
    }
}
