use bytemuck::{Pod, Zeroable};

use crate::components::ball::{Ball, BallKind};

/// Per-ball draw data read by the page's canvas renderer.
/// 8 floats = 32 bytes per instance.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct BallInstance {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    /// 1.0 for the cue ball, so the page can outline it.
    pub highlight: f32,
    /// `BallKind::code` of the ball.
    pub kind: f32,
}

impl BallInstance {
    pub const FLOATS: usize = 8;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    pub fn from_ball(ball: &Ball, x: f32, y: f32, radius: f32) -> Self {
        let [r, g, b] = ball.kind.rgb();
        Self {
            x,
            y,
            radius,
            r,
            g,
            b,
            highlight: if ball.kind == BallKind::Cue { 1.0 } else { 0.0 },
            kind: ball.kind.code() as f32,
        }
    }
}

/// Draw list for one frame, rebuilt from the live ball set.
#[derive(Debug)]
pub struct BallBuffer {
    instances: Vec<BallInstance>,
}

impl BallBuffer {
    pub fn new() -> Self {
        Self::with_capacity(32)
    }

    pub fn with_capacity(max: usize) -> Self {
        Self {
            instances: Vec::with_capacity(max),
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }

    pub fn push(&mut self, instance: BallInstance) {
        self.instances.push(instance);
    }

    pub fn instances(&self) -> &[BallInstance] {
        &self.instances
    }

    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    pub fn instances_ptr(&self) -> *const f32 {
        self.instances.as_ptr() as *const f32
    }
}

impl Default for BallBuffer {
    fn default() -> Self {
        Self::new()
    }
}
