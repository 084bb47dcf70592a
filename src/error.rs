//! Setup errors. Nothing that happens during play is an error; see [`crate::session`] for how those are absorbed.

use thiserror::Error;

use crate::catalog::Category;

/// Crate result type
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can stop a session from being built.
#[derive(Debug, Error)]
pub enum Error {
    #[error("the task pool is empty")]
    EmptyTaskPool,

    #[error("the audience would have no members")]
    EmptyAudience,

    #[error("{count} {category} members requested but the catalog has no {category} sprites")]
    NoSpriteTypes { category: Category, count: usize },

    #[error("task {task} accepts unknown sprite {sprite:?}")]
    UnknownSprite { task: u32, sprite: String },

    #[error("scroll range {0} must be a finite width with room between the edge margins")]
    ScrollRangeTooSmall(f64),

    #[error("invalid {name} band: [{start}, {end}] must satisfy 0 <= start <= end <= 1")]
    InvalidBand { name: &'static str, start: f64, end: f64 },

    #[error("invalid title bands: {0}")]
    InvalidTitles(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("could not read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
