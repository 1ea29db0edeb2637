use glam::Vec2;

use crate::api::types::{event_kinds, BallId, GameEvent};
use crate::components::ball::BallKind;
use crate::rules::contact::CueContact;

/// Something the page may want to react to (sound, HUD flash, ...).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SnookerEvent {
    Potted { id: BallId, kind: BallKind, points: u32 },
    Respotted { id: BallId, position: Vec2 },
    /// A potted colour that found no free position anywhere.
    LeftOffTable { id: BallId },
    CueBallPotted,
    Foul,
    CueContact(CueContact),
    AllRedsCleared { score: u32 },
}

impl SnookerEvent {
    /// Flatten into the 4-float wire record.
    pub fn to_wire(&self) -> GameEvent {
        let (kind, a, b, c) = match *self {
            SnookerEvent::Potted { id, kind, points } => {
                (event_kinds::POTTED, id.0 as f32, points as f32, kind.code() as f32)
            }
            SnookerEvent::Respotted { id, position } => {
                (event_kinds::RESPOTTED, id.0 as f32, position.x, position.y)
            }
            SnookerEvent::LeftOffTable { id } => (event_kinds::LEFT_OFF_TABLE, id.0 as f32, 0.0, 0.0),
            SnookerEvent::CueBallPotted => (event_kinds::CUE_BALL_POTTED, 0.0, 0.0, 0.0),
            SnookerEvent::Foul => (event_kinds::FOUL, 0.0, 0.0, 0.0),
            SnookerEvent::CueContact(contact) => {
                (event_kinds::CUE_CONTACT, contact.code() as f32, 0.0, 0.0)
            }
            SnookerEvent::AllRedsCleared { score } => {
                (event_kinds::ALL_REDS_CLEARED, score as f32, 0.0, 0.0)
            }
        };
        GameEvent { kind, a, b, c }
    }
}
