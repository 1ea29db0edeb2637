//! Two colours potted in a row, with no red in between, is a foul.

use crate::components::ball::BallKind;

/// Consecutive colours needed to call a foul.
pub const FOUL_STREAK: u32 = 2;

/// Tracks the last potted ball and the current run of colour pots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FoulTracker {
    last: Option<BallKind>,
    streak: u32,
}

impl FoulTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a pot. Returns `true` when this pot completes a foul streak,
    /// after which the streak starts over from zero.
    ///
    /// Reds and the cue ball both break a streak.
    pub fn record(&mut self, kind: BallKind) -> bool {
        let mut foul = false;
        if kind.is_colour() {
            if self.last.is_some_and(BallKind::is_colour) {
                self.streak += 1;
                if self.streak >= FOUL_STREAK {
                    foul = true;
                    self.streak = 0;
                }
            } else {
                self.streak = 1;
            }
        } else {
            self.streak = 0;
        }
        self.last = Some(kind);
        foul
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::ball::Colour;

    const PINK: BallKind = BallKind::Colour(Colour::Pink);
    const BLUE: BallKind = BallKind::Colour(Colour::Blue);

    #[test]
    fn second_colour_in_a_row_fouls_once() {
        let mut t = FoulTracker::new();
        assert!(!t.record(PINK));
        assert_eq!(t.streak(), 1);
        assert!(t.record(BLUE));
        assert_eq!(t.streak(), 0);
    }

    #[test]
    fn red_breaks_the_streak() {
        let mut t = FoulTracker::new();
        t.record(PINK);
        assert!(!t.record(BallKind::Red));
        assert_eq!(t.streak(), 0);
        assert!(!t.record(BLUE));
        assert_eq!(t.streak(), 1);
    }

    #[test]
    fn cue_behaves_like_red() {
        let mut t = FoulTracker::new();
        t.record(PINK);
        assert!(!t.record(BallKind::Cue));
        assert!(!t.record(PINK));
    }

    #[test]
    fn streak_restarts_after_a_foul() {
        let mut t = FoulTracker::new();
        let fouls: Vec<bool> = [PINK, BLUE, PINK, BLUE].iter().map(|k| t.record(*k)).collect();
        // Third pot follows a colour, so it counts as the first of a new pair.
        assert_eq!(fouls, vec![false, true, false, true]);
    }

    #[test]
    fn reset_forgets_everything() {
        let mut t = FoulTracker::new();
        t.record(PINK);
        t.reset();
        assert_eq!(t, FoulTracker::new());
        assert!(!t.record(BLUE));
    }
}
