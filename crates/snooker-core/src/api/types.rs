use bytemuck::{Pod, Zeroable};

/// Stable identity of a ball, independent of where it sits on the table
/// and of whether it currently has a physics body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BallId(pub u32);

/// A game event communicated from Rust to the browser.
/// Generic container: `kind` identifies the event, `a/b/c` carry payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct GameEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl GameEvent {
    pub const FLOATS: usize = 4;
}

/// Wire codes for `GameEvent::kind`. Must stay in sync with the page script.
pub mod event_kinds {
    /// a = ball id, b = points scored, c = ball kind code.
    pub const POTTED: f32 = 1.0;
    /// a = ball id, b/c = new position.
    pub const RESPOTTED: f32 = 2.0;
    /// a = ball id.
    pub const LEFT_OFF_TABLE: f32 = 3.0;
    pub const CUE_BALL_POTTED: f32 = 4.0;
    pub const FOUL: f32 = 5.0;
    /// a = contact code (0 red, 1 colour, 2 cushion).
    pub const CUE_CONTACT: f32 = 6.0;
    /// a = final score.
    pub const ALL_REDS_CLEARED: f32 = 7.0;
}
