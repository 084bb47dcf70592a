//! Everything that crosses the line between the game core and whoever is hosting it: [`Intent`]s come in from the
//! input layer, [`Signal`]s go out to the renderer.

use std::{fmt, mem};

use crate::{
    catalog::SpriteType,
    layout::{AudienceMember, MemberId},
    scoring::Summary,
    viewfinder::Direction,
};

/// Whether a held control was pressed or let go.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Hold {
    Start,
    Stop,
}

/// What the player is trying to do, already boiled down from raw keys/buttons/touches.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Intent {
    /// Start or stop panning in a direction.
    Move(Direction, Hold),
    /// Put the current shot up on the big screen.
    Push,
    /// A swipe gesture: one fixed-size pan.
    Swipe(Direction),
    /// The viewfinder was (re)measured at a new width.
    Resize(f64),
    /// Throw the game away and set up a fresh one.
    Restart,
}

impl Intent {
    pub fn move_left(hold: Hold) -> Self {
        Self::Move(Direction::Left, hold)
    }

    pub fn move_right(hold: Hold) -> Self {
        Self::Move(Direction::Right, hold)
    }
}

/// One fan as they appeared at the moment of a push.
#[derive(Clone, PartialEq, Debug)]
pub struct MemberSnapshot {
    pub id: MemberId,
    pub x: f64,
    pub sprite: SpriteType,
    pub is_couple: bool,
    pub is_reacting: bool,
}

impl From<&AudienceMember> for MemberSnapshot {
    fn from(m: &AudienceMember) -> Self {
        Self {
            id: m.id,
            x: m.x,
            sprite: m.shown_sprite(),
            is_couple: m.is_couple,
            is_reacting: m.is_reacting,
        }
    }
}

/// A frozen copy of the scene, for the big screen. Changing it never changes the game.
#[derive(Clone, PartialEq, Debug)]
pub struct Broadcast {
    pub position: f64,
    pub width: f64,
    pub members: Vec<MemberSnapshot>,
    pub reacting: Vec<MemberId>,
}

/// The per-frame view of the camera.
#[derive(Clone, PartialEq, Debug)]
pub struct Frame {
    pub position: f64,
    pub highlighted: Vec<MemberId>,
    pub is_pushing: bool,
}

/// Something the renderer should know about.
#[derive(Clone, PartialEq, Debug)]
#[non_exhaustive]
pub enum Signal {
    /// The camera moved, the highlights changed, or the push lock flipped.
    Frame(Frame),
    /// A shot was pushed to the big screen.
    Broadcast(Broadcast),
    /// The big screen went back to idle after a push.
    BroadcastEnded,
    /// A new task is up.
    TaskChanged { id: u32, name: String, time_left: u32 },
    /// The countdown ticked.
    Countdown { time_left: u32 },
    /// A push completed the task.
    TaskCompleted { score: u32 },
    /// Time ran out on the task; the game is ending.
    TaskFailed,
    /// The game is over.
    GameOver(Summary),
    /// Everything was reset by a restart.
    Reset,
}

/// Where the session queues up [`Signal`]s until the host collects them.
#[derive(Clone, Default)]
pub struct Outbox {
    signals: Vec<Signal>,
}

impl fmt::Debug for Outbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(std::any::type_name::<Self>())
            .field("signals", &self.signals.len())
            .finish()
    }
}

impl Outbox {
    pub fn queue(&mut self, signal: Signal) -> &mut Self {
        self.signals.push(signal);
        self
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    /// Take everything queued, leaving it empty.
    pub fn drain(&mut self) -> Vec<Signal> {
        mem::take(&mut self.signals)
    }

    /// Take everything queued into `into`, reusing its allocation.
    pub fn drain_into(&mut self, into: &mut Vec<Signal>) {
        into.clear();
        mem::swap(&mut self.signals, into);
    }
}

#[cfg(test)]
mod outbox_test {
    use super::*;

    #[test]
    fn drain_empties() {
        let mut ob = Outbox::default();
        ob.queue(Signal::TaskFailed).queue(Signal::Reset);
        assert_eq!(ob.len(), 2);
        assert_eq!(ob.drain(), vec![Signal::TaskFailed, Signal::Reset]);
        assert!(ob.is_empty());
    }

    #[test]
    fn drain_into_reuses() {
        let mut ob = Outbox::default();
        ob.queue(Signal::BroadcastEnded).queue(Signal::Countdown { time_left: 3 });
        let mut buf = vec![Signal::Reset];
        ob.drain_into(&mut buf);
        assert_eq!(buf, vec![Signal::BroadcastEnded, Signal::Countdown { time_left: 3 }]);
        assert!(ob.is_empty());
    }

    #[test]
    fn snapshot_shows_reaction_art() {
        let mut m = AudienceMember {
            id: MemberId(4),
            x: 321.0,
            sprite_type: "cp3".into(),
            is_couple: true,
            is_reacting: true,
            is_highlighted: false,
        };
        let snap = MemberSnapshot::from(&m);
        assert_eq!(snap.sprite.as_str(), "cp3_react");
        assert!(snap.is_reacting);
        // the snapshot is a copy; later changes don't leak into it
        m.is_reacting = false;
        assert!(snap.is_reacting);
    }
}
