use crate::components::ball::BallKind;

/// Which layout the current session was started from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameMode {
    #[default]
    None,
    StartingPositions,
    RandomReds,
    AllRandom,
}

impl GameMode {
    /// HUD label for the mode.
    pub fn text(self) -> &'static str {
        match self {
            GameMode::None => "Press 1, 2, or 3 to start",
            GameMode::StartingPositions => "Standard Setup",
            GameMode::RandomReds => "Random Reds",
            GameMode::AllRandom => "All Random",
        }
    }

    /// Wire code for the page script.
    pub fn code(self) -> u32 {
        match self {
            GameMode::None => 0,
            GameMode::StartingPositions => 1,
            GameMode::RandomReds => 2,
            GameMode::AllRandom => 3,
        }
    }
}

/// Running score for the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scoreboard {
    points: u32,
    fouls: u32,
}

impl Scoreboard {
    /// Credit a pot and return the points it earned. The cue ball earns nothing.
    pub fn pot(&mut self, kind: BallKind) -> u32 {
        let earned = match kind {
            BallKind::Cue => 0,
            other => other.value(),
        };
        self.points += earned;
        earned
    }

    /// Count a foul. Fouls never change the points total.
    pub fn foul(&mut self) {
        self.fouls += 1;
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    pub fn fouls(&self) -> u32 {
        self.fouls
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
