use snooker_core::{
    BallBuffer, BallInstance, ConfigError, FixedTimestep, GameEvent, InputEvent, InputQueue,
    Session, SnookerConfig,
};

/// Floats in the cue snapshot: start x/y, end x/y, power ratio, visible.
pub const CUE_FLOATS: usize = 6;

/// Drives one `Session` from browser frames and keeps flat buffers the page
/// reads through raw pointers after each frame.
pub struct SessionRunner {
    session: Session,
    input: InputQueue,
    timestep: FixedTimestep,
    balls: BallBuffer,
    events: Vec<GameEvent>,
    cue: [f32; CUE_FLOATS],
    aim_dots: Vec<f32>,
}

impl SessionRunner {
    pub fn new(config: SnookerConfig) -> Self {
        let timestep = FixedTimestep::new(config.fixed_dt);
        let mut runner = Self {
            session: Session::new(config),
            input: InputQueue::new(),
            timestep,
            balls: BallBuffer::new(),
            events: Vec::with_capacity(32),
            cue: [0.0; CUE_FLOATS],
            aim_dots: Vec::new(),
        };
        runner.rebuild_buffers();
        runner
    }

    /// Build from a JSON config. An empty string means all defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config = if json.trim().is_empty() {
            SnookerConfig::default()
        } else {
            SnookerConfig::from_json(json)?
        };
        Ok(Self::new(config))
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// One browser frame: apply queued input, run whole ticks, refresh buffers.
    pub fn tick(&mut self, frame_dt: f32) {
        self.events.clear();
        for event in self.input.drain() {
            self.session.handle_input(event);
        }
        let ticks = self.timestep.accumulate(frame_dt);
        for _ in 0..ticks {
            self.session.tick();
        }
        self.rebuild_buffers();
    }

    fn rebuild_buffers(&mut self) {
        self.events
            .extend(self.session.drain_events().iter().map(|e| e.to_wire()));
        self.session.fill_ball_buffer(&mut self.balls);

        let cue = self.session.cue_stick();
        self.cue = [
            cue.start.x,
            cue.start.y,
            cue.end.x,
            cue.end.y,
            cue.power_ratio(&self.session.config().cue),
            if cue.visible { 1.0 } else { 0.0 },
        ];

        self.aim_dots.clear();
        for dot in self.session.aim_assist_dots() {
            self.aim_dots.extend([dot.x, dot.y]);
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Direct access for commands that bypass the input queue (page buttons).
    /// Buffers refresh on the next frame.
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    // ---- Pointer accessors for page reads ----

    pub fn balls_ptr(&self) -> *const f32 {
        self.balls.instances_ptr()
    }

    pub fn ball_count(&self) -> u32 {
        self.balls.instance_count() as u32
    }

    pub fn ball_floats(&self) -> u32 {
        BallInstance::FLOATS as u32
    }

    pub fn game_events_ptr(&self) -> *const f32 {
        self.events.as_ptr() as *const f32
    }

    pub fn game_events_len(&self) -> u32 {
        self.events.len() as u32
    }

    pub fn game_events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn cue_snapshot(&self) -> &[f32; CUE_FLOATS] {
        &self.cue
    }

    pub fn aim_dots(&self) -> &[f32] {
        &self.aim_dots
    }

    /// Static table geometry: origin x/y, width, height, ball diameter,
    /// pocket diameter, D centre x/y, D radius, baulk x.
    pub fn table_geometry(&self) -> Vec<f32> {
        let t = self.session.table();
        let d = t.d_zone();
        vec![
            t.origin().x,
            t.origin().y,
            t.width(),
            t.height(),
            t.ball_diameter(),
            t.pocket_diameter(),
            d.center.x,
            d.center.y,
            d.radius,
            t.baulk_x(),
        ]
    }

    /// Pocket centres as x/y pairs.
    pub fn pockets(&self) -> Vec<f32> {
        self.session
            .table()
            .pockets()
            .iter()
            .flat_map(|p| [p.x, p.y])
            .collect()
    }

    /// Colour spots as (x, y, colour code) triples.
    pub fn spots(&self) -> Vec<f32> {
        self.session
            .table()
            .spots()
            .iter()
            .flat_map(|(colour, p)| [p.x, p.y, colour.value() as f32])
            .collect()
    }

    pub fn world_width(&self) -> f32 {
        self.session.config().world_width
    }

    pub fn world_height(&self) -> f32 {
        self.session.config().world_height
    }
}
