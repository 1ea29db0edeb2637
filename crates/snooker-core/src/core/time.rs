/// Most ticks a single frame may trigger. Anything beyond is dropped so a
/// stalled tab never replays seconds of simulation at once.
pub const MAX_TICKS_PER_FRAME: u32 = 10;

/// Fixed timestep accumulator.
/// Turns variable browser frame times into whole simulation ticks.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    dt: f32,
    accumulator: f32,
}

impl FixedTimestep {
    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
        }
    }

    /// Add frame time and return how many ticks to run now.
    /// Negative or non-finite frame times are ignored.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        if frame_dt.is_finite() && frame_dt > 0.0 {
            self.accumulator += frame_dt;
        }
        self.accumulator = self.accumulator.min(self.dt * MAX_TICKS_PER_FRAME as f32);
        let ticks = (self.accumulator / self.dt) as u32;
        self.accumulator -= ticks as f32 * self.dt;
        ticks
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }
}
