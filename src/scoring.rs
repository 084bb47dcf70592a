//! What the player gets called at the end, and the numbers that go with it.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One rung of the title ladder: scores in `min..=max` earn `title`. The top rung has no `max`.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct TitleBand {
    pub min: u32,
    #[serde(default)]
    pub max: Option<u32>,
    pub title: String,
}

impl TitleBand {
    fn new(min: u32, max: Option<u32>, title: &str) -> Self {
        Self {
            min,
            max,
            title: title.into(),
        }
    }

    pub fn contains(&self, score: u32) -> bool {
        score >= self.min && self.max.map_or(true, |max| score <= max)
    }
}

/// The full title ladder. Checked on construction to cover every score exactly once, starting from zero.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(try_from = "Vec<TitleBand>", into = "Vec<TitleBand>")]
pub struct TitleTable(Vec<TitleBand>);

impl Default for TitleTable {
    fn default() -> Self {
        Self(vec![
            TitleBand::new(0, Some(1), "Rookie Camera Operator"),
            TitleBand::new(2, Some(3), "Amateur Camera Operator"),
            TitleBand::new(4, Some(5), "Seasoned Camera Operator"),
            TitleBand::new(6, Some(8), "Professional Camera Operator"),
            TitleBand::new(9, Some(12), "Star Camera Operator"),
            TitleBand::new(13, Some(15), "Legendary Camera Operator"),
            TitleBand::new(16, Some(20), "Elite Camera Operator"),
            TitleBand::new(21, None, "Master of the Kiss Cam"),
        ])
    }
}

impl TryFrom<Vec<TitleBand>> for TitleTable {
    type Error = Error;

    fn try_from(bands: Vec<TitleBand>) -> Result<Self> {
        Self::new(bands)
    }
}

impl From<TitleTable> for Vec<TitleBand> {
    fn from(table: TitleTable) -> Self {
        table.0
    }
}

impl TitleTable {
    /// Build a ladder, ensuring the bands are ordered, contiguous from 0, and end in an open-ended band.
    pub fn new(bands: Vec<TitleBand>) -> Result<Self> {
        let mut expect = 0u32;
        let last = bands.len().checked_sub(1).ok_or_else(|| Error::InvalidTitles("no bands".into()))?;
        for (i, band) in bands.iter().enumerate() {
            if band.min != expect {
                return Err(Error::InvalidTitles(format!(
                    "band {:?} starts at {}, expected {}",
                    band.title, band.min, expect
                )));
            }
            match band.max {
                Some(max) if i == last => {
                    return Err(Error::InvalidTitles(format!(
                        "top band {:?} must be open-ended, not capped at {}",
                        band.title, max
                    )))
                }
                Some(max) if max < band.min => {
                    return Err(Error::InvalidTitles(format!(
                        "band {:?} ends ({}) before it starts ({})",
                        band.title, max, band.min
                    )))
                }
                Some(max) => expect = max.saturating_add(1),
                None if i != last => {
                    return Err(Error::InvalidTitles(format!(
                        "band {:?} is open-ended but isn't the last band",
                        band.title
                    )))
                }
                None => (),
            }
        }
        Ok(Self(bands))
    }

    /// The first band containing `score`.
    pub fn title_for(&self, score: u32) -> &str {
        self.0
            .iter()
            .find(|b| b.contains(score))
            .or_else(|| self.0.first())
            .map_or("", |b| b.title.as_str())
    }

    pub fn bands(&self) -> &[TitleBand] {
        &self.0
    }
}

/// The end-of-game report.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Summary {
    pub final_score: u32,
    pub title: String,
    pub completed_tasks: u32,
    /// Rough seconds per task, estimated from the score: one second faster per two tasks, never under a second.
    pub avg_time: f64,
}

impl Summary {
    /// Summarize a game that ended at `score`.
    pub fn new(score: u32, task_duration_secs: u32, titles: &TitleTable) -> Self {
        Self {
            final_score: score,
            title: titles.title_for(score).to_owned(),
            completed_tasks: score,
            avg_time: (task_duration_secs as f64 - score as f64 * 0.5).max(1.0),
        }
    }
}
