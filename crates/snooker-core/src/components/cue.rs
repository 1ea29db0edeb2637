use glam::Vec2;

use crate::api::config::CueTuning;
use crate::table::geometry::Table;

/// The cue stick: where it points, how hard it will hit, and whether the
/// player is currently drawing it back.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CueStick {
    pub visible: bool,
    pub aiming: bool,
    /// Tip end, at the cue ball centre.
    pub start: Vec2,
    /// Butt end, behind the ball opposite the pointer.
    pub end: Vec2,
    /// Radians, from the ball toward the pointer.
    pub angle: f32,
    pub power: f32,
}

impl CueStick {
    pub fn direction(&self) -> Vec2 {
        Vec2::from_angle(self.angle)
    }

    /// Point the cue from `ball` toward `pointer`. Power grows with the
    /// pointer's distance from the ball, up to the tuning's maximum.
    pub fn aim(&mut self, ball: Vec2, pointer: Vec2, tuning: &CueTuning) {
        let offset = pointer - ball;
        self.angle = offset.y.atan2(offset.x);
        self.power = (offset.length() / tuning.power_divisor).min(tuning.max_power);
        self.start = ball;
        self.end = ball - self.direction() * (tuning.base_length + self.power);
        self.visible = true;
    }

    /// Release the cue. Returns the impulse for the cue ball when the shot
    /// is strong enough; either way aiming ends.
    pub fn release(&mut self, tuning: &CueTuning) -> Option<Vec2> {
        if !self.aiming {
            return None;
        }
        self.aiming = false;
        if self.power <= tuning.min_shot_power {
            return None;
        }
        self.visible = false;
        Some(self.direction() * self.power * tuning.impulse_per_power)
    }

    /// Power as a fraction of the maximum, for the power bar.
    pub fn power_ratio(&self, tuning: &CueTuning) -> f32 {
        if tuning.max_power > 0.0 {
            self.power / tuning.max_power
        } else {
            0.0
        }
    }

    /// Aim-assist dots along the shot line, skipping any off the table.
    pub fn aim_assist_dots(&self, table: &Table, tuning: &CueTuning) -> Vec<Vec2> {
        if !self.visible || tuning.aim_assist_dot_spacing <= 0.0 {
            return Vec::new();
        }
        let dir = self.direction();
        let origin = table.origin();
        let far = origin + Vec2::new(table.width(), table.height());
        let mut dots = Vec::new();
        let mut along = table.ball_diameter();
        while along < tuning.aim_assist_length {
            let p = self.start + dir * along;
            if p.x > origin.x && p.x < far.x && p.y > origin.y && p.y < far.y {
                dots.push(p);
            }
            along += tuning.aim_assist_dot_spacing;
        }
        dots
    }

    pub fn hide(&mut self) {
        self.visible = false;
        self.aiming = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tuning() -> CueTuning {
        CueTuning::default()
    }

    #[test]
    fn aim_sets_power_and_stick_ends() {
        let mut cue = CueStick::default();
        let ball = Vec2::new(100.0, 100.0);
        cue.aim(ball, Vec2::new(200.0, 100.0), &tuning());
        assert!((cue.power - 20.0).abs() < 1e-3);
        assert!(cue.angle.abs() < 1e-6);
        assert_eq!(cue.start, ball);
        assert!(cue.end.distance(Vec2::new(-20.0, 100.0)) < 1e-3);
        assert!(cue.visible);
    }

    #[test]
    fn power_is_capped() {
        let mut cue = CueStick::default();
        cue.aim(Vec2::ZERO, Vec2::new(0.0, 1000.0), &tuning());
        assert_eq!(cue.power, 35.0);
        assert!((cue.power_ratio(&tuning()) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn weak_release_does_not_shoot() {
        let mut cue = CueStick::default();
        cue.aim(Vec2::ZERO, Vec2::new(20.0, 0.0), &tuning());
        cue.aiming = true;
        assert_eq!(cue.release(&tuning()), None);
        assert!(!cue.aiming);
        assert!(cue.visible);
    }

    #[test]
    fn strong_release_fires_toward_pointer() {
        let t = tuning();
        let mut cue = CueStick::default();
        cue.aim(Vec2::ZERO, Vec2::new(0.0, 100.0), &t);
        cue.aiming = true;
        let impulse = cue.release(&t).unwrap();
        assert!(impulse.x.abs() < 1e-3);
        assert!((impulse.y - 20.0 * t.impulse_per_power).abs() < 1e-1);
        assert!(!cue.visible);
        assert_eq!(cue.release(&t), None);
    }

    #[test]
    fn aim_assist_stays_on_table() {
        let table = Table::centered(1000.0, 600.0, 800.0);
        let t = tuning();
        let mut cue = CueStick::default();
        let ball = table.origin() + Vec2::new(15.0, 200.0);
        cue.aim(ball, ball - Vec2::new(100.0, 0.0), &t);
        // Pointing at the near cushion: the line leaves the table at once.
        assert!(cue.aim_assist_dots(&table, &t).is_empty());

        cue.aim(ball, ball + Vec2::new(100.0, 0.0), &t);
        let dots = cue.aim_assist_dots(&table, &t);
        assert!(!dots.is_empty());
        assert!(dots[0].distance(ball + Vec2::new(table.ball_diameter(), 0.0)) < 1e-3);
        assert!(dots.iter().all(|d| d.distance(ball) < t.aim_assist_length));
    }
}
