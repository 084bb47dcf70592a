//! The core of a stadium kiss-cam minigame.
//!
//! A crowd of fans is spread across a wide stand. The player pans a camera viewfinder over them and, when they think
//! the fan the director asked for is in shot, pushes the shot to the big screen. If a matching fan was in the middle
//! of the frame, the task is done and the next one comes up; if the countdown runs out first, the game's over.
//!
//! This crate is only the rules. Rendering and raw input belong to whoever hosts a [`GameSession`]: they turn key
//! presses into [`Intent`]s, call [`GameSession::update`] once a frame, and draw whatever [`Signal`]s come out. The
//! [`Runner`] does the frame loop for any [`Host`].

pub mod catalog;
pub mod config;
pub mod constants;
pub mod error;
pub mod layout;
pub mod runner;
pub mod scoring;
pub mod session;
pub mod signal;
pub mod targeting;
pub mod task;
pub mod timing;
pub mod viewfinder;
mod util;

pub use catalog::{Catalog, Category, SpriteType, Task};
pub use config::Config;
pub use error::{Error, Result};
pub use layout::{AudienceMember, MemberId};
pub use runner::{Host, Response, Runner};
pub use scoring::{Summary, TitleBand, TitleTable};
pub use session::{GameSession, Phase};
pub use signal::{Broadcast, Frame, Hold, Intent, MemberSnapshot, Signal};
pub use targeting::{Band, TargetDetector};
pub use task::{TaskSession, TaskState};
pub use viewfinder::{Direction, ViewfinderTracker};
