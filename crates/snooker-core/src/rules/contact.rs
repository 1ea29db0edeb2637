//! What the cue ball touched, and the short-lived HUD message about it.

use crate::api::types::BallId;
use crate::components::ball::{BallKind, BallSet};
use crate::core::physics::{BodyLabel, CollisionPair};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CueContact {
    Red,
    Colour,
    /// Cushions and anything else that is not a ball.
    Cushion,
}

impl CueContact {
    /// Classify the body the cue ball ran into.
    pub fn classify(other: BodyLabel, balls: &BallSet) -> Self {
        match other.ball().and_then(|id| balls.kind(id)) {
            Some(BallKind::Red) => CueContact::Red,
            Some(BallKind::Colour(_)) | Some(BallKind::Cue) => CueContact::Colour,
            None => CueContact::Cushion,
        }
    }

    /// First contacts made by `cue` among `pairs`, in event order.
    pub fn from_collisions(cue: BallId, pairs: &[CollisionPair], balls: &BallSet) -> Vec<Self> {
        pairs
            .iter()
            .filter(|pair| pair.started)
            .filter_map(|pair| pair.other(BodyLabel::Ball(cue)))
            .map(|other| Self::classify(other, balls))
            .collect()
    }

    pub fn label(self) -> &'static str {
        match self {
            CueContact::Red => "cue-red",
            CueContact::Colour => "cue-colour",
            CueContact::Cushion => "cue-cushion",
        }
    }

    pub fn code(self) -> u32 {
        match self {
            CueContact::Red => 0,
            CueContact::Colour => 1,
            CueContact::Cushion => 2,
        }
    }
}

/// A HUD line that fades out over a fixed number of ticks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactMessage {
    text: String,
    ticks_left: u32,
}

impl ContactMessage {
    pub fn show(&mut self, text: impl Into<String>, ticks: u32) {
        self.text = text.into();
        self.ticks_left = ticks;
    }

    pub fn show_contact(&mut self, contact: CueContact, ticks: u32) {
        self.show(format!("Hit: {}", contact.label()), ticks);
    }

    /// Count one tick down, clearing the text when it runs out.
    pub fn tick(&mut self) {
        if self.ticks_left > 0 {
            self.ticks_left -= 1;
            if self.ticks_left == 0 {
                self.text.clear();
            }
        }
    }

    /// Current text, or `None` once it has faded.
    pub fn text(&self) -> Option<&str> {
        (self.ticks_left > 0).then_some(self.text.as_str())
    }

    /// Opacity in 0..=255, fading over the last 128 ticks.
    pub fn alpha(&self) -> u8 {
        self.ticks_left.saturating_mul(2).min(255) as u8
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
