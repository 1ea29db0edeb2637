//! Layout strategies and single-ball placement.
//!
//! `Rack` is a short-lived view over the session's table, ball arena and
//! physics world. It is the only code that creates or destroys ball bodies.

use glam::Vec2;
use std::fmt;

use crate::api::config::SnookerConfig;
use crate::api::types::BallId;
use crate::components::ball::{BallKind, BallSet, Colour};
use crate::core::physics::{BodyDesc, BodyLabel, ColliderDesc, ColliderMaterial, PhysicsWorld};
use crate::core::rng::Rng;
use crate::table::geometry::{Table, RANDOM_PLACEMENT_MIN_X};
use crate::table::occupancy::{find_nearby_position, is_position_clear};

/// Why a cue ball could not go where the player asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CuePlacementError {
    OutsideDZone,
    Occupied,
}

impl fmt::Display for CuePlacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CuePlacementError::OutsideDZone => write!(f, "cue ball must be placed in the D"),
            CuePlacementError::Occupied => write!(f, "position is not clear"),
        }
    }
}

impl std::error::Error for CuePlacementError {}

pub struct Rack<'a> {
    pub table: &'a Table,
    pub balls: &'a mut BallSet,
    pub physics: &'a mut PhysicsWorld,
    pub config: &'a SnookerConfig,
}

impl<'a> Rack<'a> {
    pub fn new(
        table: &'a Table,
        balls: &'a mut BallSet,
        physics: &'a mut PhysicsWorld,
        config: &'a SnookerConfig,
    ) -> Self {
        Self {
            table,
            balls,
            physics,
            config,
        }
    }

    /// Minimum centre distance between any two balls.
    pub fn min_distance(&self) -> f32 {
        self.table.ball_diameter() * self.config.placement.clearance_multiplier
    }

    pub fn live_positions(&self) -> Vec<Vec2> {
        self.balls.live_positions(&*self.physics)
    }

    pub fn is_clear(&self, point: Vec2) -> bool {
        is_position_clear(point, &self.live_positions(), self.min_distance())
    }

    /// Give `id` a fresh body at `position`, replacing any body it had.
    /// Returns `false` when the id is not in the arena.
    pub fn create_ball_body(&mut self, id: BallId, position: Vec2) -> bool {
        if self.balls.get(id).is_none() {
            return false;
        }
        let tuning = &self.config.physics;
        let desc = BodyDesc::dynamic(ColliderDesc::Ball {
            radius: self.table.ball_radius(),
        })
        .with_position(position)
        .with_ccd(true)
        .with_linear_damping(tuning.ball_linear_damping)
        .with_angular_damping(tuning.ball_angular_damping);
        let material = ColliderMaterial {
            restitution: tuning.ball_restitution,
            friction: tuning.ball_friction,
            density: tuning.ball_density,
        };
        let body = self.physics.create_body(BodyLabel::Ball(id), &desc, material);
        if let Some(old) = self.balls.attach(id, body) {
            self.physics.remove_body(&old);
        }
        true
    }

    /// Take a ball off the table, destroying its body.
    pub fn remove_ball_body(&mut self, id: BallId) {
        if let Some(body) = self.balls.detach(id) {
            self.physics.remove_body(&body);
        }
    }

    /// Take every ball off the table and discard the cue ball entry.
    pub fn clear_all(&mut self) {
        let ids: Vec<BallId> = self.balls.iter().map(|b| b.id).collect();
        for id in ids {
            self.remove_ball_body(id);
            if self.balls.kind(id) == Some(BallKind::Cue) {
                self.balls.remove(id);
            }
        }
    }

    /// Put the remaining reds in the triangle, front row first.
    pub fn place_reds_triangle(&mut self) {
        let slots = self.table.triangle_slots();
        for (id, slot) in self.balls.red_ids().into_iter().zip(slots) {
            self.create_ball_body(id, slot);
        }
    }

    /// Scatter the remaining reds over the right of the table.
    /// Returns how many found a spot; the rest stay off-table.
    pub fn place_reds_random(&mut self, rng: &mut Rng) -> usize {
        let origin = self.table.origin();
        let (w, h) = (self.table.width(), self.table.height());
        let d = self.table.ball_diameter();
        let min_x = origin.x + w * RANDOM_PLACEMENT_MIN_X;
        let attempts = self.config.placement.random_attempts;

        let mut placed = 0;
        for id in self.balls.red_ids() {
            let mut spot = None;
            for _ in 0..attempts {
                let candidate = Vec2::new(
                    rng.range(origin.x + d, origin.x + w - d),
                    rng.range(origin.y + d, origin.y + h - d),
                );
                if candidate.x > min_x && self.is_clear(candidate) {
                    spot = Some(candidate);
                    break;
                }
            }
            match spot {
                Some(position) => {
                    self.create_ball_body(id, position);
                    placed += 1;
                }
                None => log::warn!("no room for red {:?} after {} attempts", id, attempts),
            }
        }
        placed
    }

    /// Put every colour on its spot, or as near to it as possible.
    pub fn place_colours_starting(&mut self) {
        for colour in Colour::ALL {
            let spot = self.table.spot(colour);
            let live = self.live_positions();
            let position = if is_position_clear(spot, &live, self.min_distance()) {
                Some(spot)
            } else {
                find_nearby_position(spot, &live, self.table.ball_diameter(), self.min_distance())
            };
            match position {
                Some(position) => {
                    self.create_ball_body(BallSet::colour_id(colour), position);
                }
                None => log::warn!("{} left off-table: spot and surroundings occupied", colour.name()),
            }
        }
    }

    /// Place a new cue ball at `point`. On failure nothing changes.
    pub fn place_cue_ball(&mut self, point: Vec2) -> Result<BallId, CuePlacementError> {
        if !self.table.d_zone().contains(point) {
            return Err(CuePlacementError::OutsideDZone);
        }
        if !self.is_clear(point) {
            return Err(CuePlacementError::Occupied);
        }
        if let Some(old) = self.balls.cue().map(|b| b.id) {
            self.remove_ball_body(old);
            self.balls.remove(old);
        }
        let id = self.balls.spawn_cue();
        self.create_ball_body(id, point);
        Ok(id)
    }
}
