use glam::Vec2;
use rapier2d::prelude::*;
use std::sync::{Mutex, PoisonError};

use crate::api::types::BallId;

// ---------------------------------------------------------------------------
// Conversion helpers (private) — glam ↔ nalgebra
// ---------------------------------------------------------------------------

fn vec2_to_na(v: Vec2) -> nalgebra::Vector2<f32> {
    nalgebra::Vector2::new(v.x, v.y)
}

fn na_to_vec2(v: &nalgebra::Vector2<f32>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Identifies what a rigid body represents on the table.
/// Packed into Rapier's `user_data` so collision events can be classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyLabel {
    Ball(BallId),
    Cushion,
    InnerCushion,
}

const LABEL_SHIFT: u32 = 64;
const LABEL_BALL: u128 = 1;
const LABEL_CUSHION: u128 = 2;
const LABEL_INNER_CUSHION: u128 = 3;

impl BodyLabel {
    fn to_user_data(self) -> u128 {
        match self {
            BodyLabel::Ball(id) => (LABEL_BALL << LABEL_SHIFT) | id.0 as u128,
            BodyLabel::Cushion => LABEL_CUSHION << LABEL_SHIFT,
            BodyLabel::InnerCushion => LABEL_INNER_CUSHION << LABEL_SHIFT,
        }
    }

    fn from_user_data(data: u128) -> Option<Self> {
        match data >> LABEL_SHIFT {
            LABEL_BALL => Some(BodyLabel::Ball(BallId(data as u32))),
            LABEL_CUSHION => Some(BodyLabel::Cushion),
            LABEL_INNER_CUSHION => Some(BodyLabel::InnerCushion),
            _ => None,
        }
    }

    /// The ball this label refers to, if any.
    pub fn ball(self) -> Option<BallId> {
        match self {
            BodyLabel::Ball(id) => Some(id),
            _ => None,
        }
    }
}

/// The kind of rigid body. Balls are dynamic, cushions are fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyType {
    Dynamic,
    Fixed,
}

impl BodyType {
    fn to_rapier(self) -> RigidBodyType {
        match self {
            BodyType::Dynamic => RigidBodyType::Dynamic,
            BodyType::Fixed => RigidBodyType::Fixed,
        }
    }
}

/// Shape description for a collider.
#[derive(Debug, Clone, PartialEq)]
pub enum ColliderDesc {
    Ball { radius: f32 },
    Cuboid { half_width: f32, half_height: f32 },
    /// Convex polygon; points are relative to the body position.
    ConvexPolygon { points: Vec<Vec2> },
}

impl ColliderDesc {
    fn build_collider(&self) -> Option<ColliderBuilder> {
        match self {
            ColliderDesc::Ball { radius } => Some(ColliderBuilder::ball(*radius)),
            ColliderDesc::Cuboid { half_width, half_height } => {
                Some(ColliderBuilder::cuboid(*half_width, *half_height))
            }
            ColliderDesc::ConvexPolygon { points } => {
                let hull: Vec<Point<f32>> =
                    points.iter().map(|p| Point::new(p.x, p.y)).collect();
                ColliderBuilder::convex_hull(&hull)
            }
        }
    }
}

/// Physical material properties for a collider.
#[derive(Debug, Clone, Copy)]
pub struct ColliderMaterial {
    pub restitution: f32,
    pub friction: f32,
    pub density: f32,
}

impl Default for ColliderMaterial {
    fn default() -> Self {
        Self {
            restitution: 0.8,
            friction: 0.01,
            density: 1.0,
        }
    }
}

/// Builder for describing a rigid body before creation.
#[derive(Debug, Clone)]
pub struct BodyDesc {
    pub body_type: BodyType,
    pub position: Vec2,
    pub ccd: bool,
    pub collider: ColliderDesc,
    pub linear_damping: f32,
    pub angular_damping: f32,
}

impl BodyDesc {
    /// Create a dynamic body description with the given collider shape.
    pub fn dynamic(collider: ColliderDesc) -> Self {
        Self {
            body_type: BodyType::Dynamic,
            position: Vec2::ZERO,
            ccd: false,
            collider,
            linear_damping: 0.0,
            angular_damping: 0.0,
        }
    }

    /// Create a fixed (static) body description with the given collider shape.
    pub fn fixed(collider: ColliderDesc) -> Self {
        Self {
            body_type: BodyType::Fixed,
            position: Vec2::ZERO,
            ccd: false,
            collider,
            linear_damping: 0.0,
            angular_damping: 0.0,
        }
    }

    pub fn with_position(mut self, pos: Vec2) -> Self {
        self.position = pos;
        self
    }

    pub fn with_ccd(mut self, enabled: bool) -> Self {
        self.ccd = enabled;
        self
    }

    /// Velocity decay standing in for felt drag.
    pub fn with_linear_damping(mut self, damping: f32) -> Self {
        self.linear_damping = damping;
        self
    }

    pub fn with_angular_damping(mut self, damping: f32) -> Self {
        self.angular_damping = damping;
        self
    }
}

/// Handle pair owned by a ball (or cushion), referencing Rapier internals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsBody {
    pub body_handle: RigidBodyHandle,
    pub collider_handle: ColliderHandle,
}

/// A collision event between two labelled bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionPair {
    pub a: BodyLabel,
    pub b: BodyLabel,
    /// `true` when the collision just started, `false` when it ended.
    pub started: bool,
}

impl CollisionPair {
    /// If one side is `label`, return the other side.
    pub fn other(&self, label: BodyLabel) -> Option<BodyLabel> {
        if self.a == label {
            Some(self.b)
        } else if self.b == label {
            Some(self.a)
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// WASM-safe event collector (no crossbeam)
// ---------------------------------------------------------------------------

struct DirectEventCollector {
    collisions: Mutex<Vec<CollisionEvent>>,
}

impl DirectEventCollector {
    fn new() -> Self {
        Self {
            collisions: Mutex::new(Vec::new()),
        }
    }

    fn drain_collisions(&self) -> Vec<CollisionEvent> {
        let mut guard = self.collisions.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *guard)
    }
}

impl EventHandler for DirectEventCollector {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        self.collisions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }

    fn handle_contact_force_event(
        &self,
        _dt: f32,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: f32,
    ) {
    }
}

// ---------------------------------------------------------------------------
// PhysicsWorld
// ---------------------------------------------------------------------------

/// Owns the Rapier2D simulation the table lives in.
///
/// The rules engine only adds and removes whole bodies and reads their
/// state back; positions and velocities are advanced by `step_into` alone.
pub struct PhysicsWorld {
    gravity: nalgebra::Vector2<f32>,
    integration_parameters: IntegrationParameters,
    substeps: u32,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    event_collector: DirectEventCollector,
}

impl PhysicsWorld {
    /// Create a top-down world (zero gravity) stepping at `dt` seconds.
    pub fn new(dt: f32) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = dt;
        Self {
            gravity: vec2_to_na(Vec2::ZERO),
            integration_parameters,
            substeps: 1,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            event_collector: DirectEventCollector::new(),
        }
    }

    /// Split every tick into `substeps` solver steps of `dt / substeps`.
    pub fn set_substeps(&mut self, dt: f32, substeps: u32) {
        self.substeps = substeps.max(1);
        self.integration_parameters.dt = dt / self.substeps as f32;
    }

    /// Create a rigid body + collider and return handles.
    /// The label is stored in the body's `user_data` for collision lookups.
    ///
    /// A degenerate convex polygon falls back to a tiny ball collider so a
    /// bad cushion description can never abort table construction.
    pub fn create_body(
        &mut self,
        label: BodyLabel,
        desc: &BodyDesc,
        material: ColliderMaterial,
    ) -> PhysicsBody {
        let rb = RigidBodyBuilder::new(desc.body_type.to_rapier())
            .translation(vec2_to_na(desc.position))
            .ccd_enabled(desc.ccd)
            .linear_damping(desc.linear_damping)
            .angular_damping(desc.angular_damping)
            .user_data(label.to_user_data())
            .build();

        let body_handle = self.bodies.insert(rb);

        let builder = desc.collider.build_collider().unwrap_or_else(|| {
            log::warn!("degenerate collider for {:?}, using a point ball", label);
            ColliderBuilder::ball(0.5)
        });
        let collider = builder
            .restitution(material.restitution)
            .friction(material.friction)
            .density(material.density)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();

        let collider_handle =
            self.colliders
                .insert_with_parent(collider, body_handle, &mut self.bodies);

        PhysicsBody {
            body_handle,
            collider_handle,
        }
    }

    /// Remove a body and all its colliders from the simulation.
    pub fn remove_body(&mut self, body: &PhysicsBody) {
        self.bodies.remove(
            body.body_handle,
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    /// Advance the simulation one tick and append the labelled collision
    /// events it produced.
    pub fn step_into(&mut self, collision_events: &mut Vec<CollisionPair>) {
        for _ in 0..self.substeps {
            self.physics_pipeline.step(
                &self.gravity,
                &self.integration_parameters,
                &mut self.island_manager,
                &mut self.broad_phase,
                &mut self.narrow_phase,
                &mut self.bodies,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                &mut self.ccd_solver,
                Some(&mut self.query_pipeline),
                &(),
                &self.event_collector,
            );
        }

        for event in self.event_collector.drain_collisions() {
            let (h1, h2, started) = match event {
                CollisionEvent::Started(h1, h2, _) => (h1, h2, true),
                CollisionEvent::Stopped(h1, h2, _) => (h1, h2, false),
            };

            // Collider handles → body handles → labels
            let a = self.collider_label(h1);
            let b = self.collider_label(h2);

            if let (Some(a), Some(b)) = (a, b) {
                collision_events.push(CollisionPair { a, b, started });
            }
        }
    }

    /// Apply an instantaneous impulse to a body.
    pub fn apply_impulse(&mut self, body: &PhysicsBody, impulse: Vec2) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.apply_impulse(vec2_to_na(impulse), true);
        }
    }

    /// Get the current linear velocity of a body.
    pub fn velocity(&self, body: &PhysicsBody) -> Vec2 {
        self.bodies
            .get(body.body_handle)
            .map(|rb| na_to_vec2(rb.linvel()))
            .unwrap_or(Vec2::ZERO)
    }

    /// Get the current centre of a body.
    pub fn body_position(&self, body: &PhysicsBody) -> Vec2 {
        self.bodies
            .get(body.body_handle)
            .map(|rb| na_to_vec2(rb.translation()))
            .unwrap_or(Vec2::ZERO)
    }

    /// Teleport a body and stop it. Table rules never move bodies, they
    /// replace them.
    #[cfg(any(test, feature = "tooling"))]
    pub fn set_position(&mut self, body: &PhysicsBody, pos: Vec2) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.set_translation(vec2_to_na(pos), true);
            rb.set_linvel(vec2_to_na(Vec2::ZERO), true);
        }
    }

    /// Number of rigid bodies in the simulation.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// The label a body was created with.
    pub fn label(&self, body: &PhysicsBody) -> Option<BodyLabel> {
        self.bodies
            .get(body.body_handle)
            .and_then(|rb| BodyLabel::from_user_data(rb.user_data))
    }

    // -- private helpers --

    fn collider_label(&self, collider_handle: ColliderHandle) -> Option<BodyLabel> {
        let collider = self.colliders.get(collider_handle)?;
        let body_handle = collider.parent()?;
        let body = self.bodies.get(body_handle)?;
        BodyLabel::from_user_data(body.user_data)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn ball_desc(pos: Vec2) -> BodyDesc {
        BodyDesc::dynamic(ColliderDesc::Ball { radius: 10.0 }).with_position(pos)
    }

    /// Mass of a `ball_desc` body at the default density of 1.
    fn ball_mass() -> f32 {
        std::f32::consts::PI * 10.0 * 10.0
    }

    #[test]
    fn create_and_remove_body() {
        let mut world = PhysicsWorld::new(DT);
        let body = world.create_body(
            BodyLabel::Ball(BallId(1)),
            &ball_desc(Vec2::ZERO),
            ColliderMaterial::default(),
        );
        assert_eq!(world.body_count(), 1);
        assert_eq!(world.label(&body), Some(BodyLabel::Ball(BallId(1))));
        world.remove_body(&body);
        assert_eq!(world.body_count(), 0);
        assert_eq!(world.label(&body), None);
    }

    #[test]
    fn labels_round_trip_through_user_data() {
        for label in [
            BodyLabel::Ball(BallId(0)),
            BodyLabel::Ball(BallId(u32::MAX)),
            BodyLabel::Cushion,
            BodyLabel::InnerCushion,
        ] {
            assert_eq!(BodyLabel::from_user_data(label.to_user_data()), Some(label));
        }
        assert_eq!(BodyLabel::from_user_data(0), None);
    }

    #[test]
    fn zero_gravity_body_stays_put() {
        let mut world = PhysicsWorld::new(DT);
        let body = world.create_body(
            BodyLabel::Ball(BallId(1)),
            &ball_desc(Vec2::new(100.0, 200.0)),
            ColliderMaterial::default(),
        );
        let mut events = Vec::new();
        for _ in 0..10 {
            world.step_into(&mut events);
        }
        let pos = world.body_position(&body);
        assert!((pos.x - 100.0).abs() < 0.001);
        assert!((pos.y - 200.0).abs() < 0.001);
    }

    #[test]
    fn impulse_changes_velocity() {
        let mut world = PhysicsWorld::new(DT);
        let body = world.create_body(
            BodyLabel::Ball(BallId(1)),
            &ball_desc(Vec2::ZERO),
            ColliderMaterial::default(),
        );

        assert_eq!(world.velocity(&body), Vec2::ZERO);
        world.apply_impulse(&body, Vec2::new(100.0, 0.0));

        let mut events = Vec::new();
        world.step_into(&mut events);
        let vel = world.velocity(&body);
        assert!(vel.x > 0.0, "Velocity should be positive X: {:?}", vel);
    }

    #[test]
    fn set_position_teleports_and_stops() {
        let mut world = PhysicsWorld::new(DT);
        let body = world.create_body(
            BodyLabel::Ball(BallId(1)),
            &ball_desc(Vec2::ZERO),
            ColliderMaterial::default(),
        );
        world.apply_impulse(&body, Vec2::new(500.0, 0.0));
        world.step_into(&mut Vec::new());
        assert!(world.velocity(&body).x > 0.0);
        world.set_position(&body, Vec2::new(300.0, 40.0));
        assert_eq!(world.body_position(&body), Vec2::new(300.0, 40.0));
        assert_eq!(world.velocity(&body), Vec2::ZERO);
    }

    #[test]
    fn collision_events_carry_labels() {
        let mut world = PhysicsWorld::new(DT);

        let ball = world.create_body(
            BodyLabel::Ball(BallId(1)),
            &ball_desc(Vec2::new(0.0, 0.0)),
            ColliderMaterial::default(),
        );
        world.apply_impulse(&ball, Vec2::new(200.0 * ball_mass(), 0.0));
        world.create_body(
            BodyLabel::Cushion,
            &BodyDesc::fixed(ColliderDesc::Cuboid {
                half_width: 5.0,
                half_height: 50.0,
            })
            .with_position(Vec2::new(40.0, 0.0)),
            ColliderMaterial::default(),
        );

        let mut all_events = Vec::new();
        for _ in 0..60 {
            world.step_into(&mut all_events);
        }

        let started: Vec<_> = all_events.iter().filter(|e| e.started).collect();
        assert!(!started.is_empty(), "Should have at least one collision start event");
        let first = started[0];
        assert_eq!(first.other(BodyLabel::Ball(BallId(1))), Some(BodyLabel::Cushion));
        assert_eq!(first.other(BodyLabel::Cushion), Some(BodyLabel::Ball(BallId(1))));
    }

    #[test]
    fn convex_polygon_body_is_created() {
        let mut world = PhysicsWorld::new(DT);
        let quad = ColliderDesc::ConvexPolygon {
            points: vec![
                Vec2::new(-20.0, -5.0),
                Vec2::new(20.0, -5.0),
                Vec2::new(15.0, 5.0),
                Vec2::new(-15.0, 5.0),
            ],
        };
        let body = world.create_body(
            BodyLabel::InnerCushion,
            &BodyDesc::fixed(quad).with_position(Vec2::new(10.0, 10.0)),
            ColliderMaterial::default(),
        );
        assert_eq!(world.label(&body), Some(BodyLabel::InnerCushion));
        assert_eq!(world.body_count(), 1);
    }

    #[test]
    fn substeps_keep_tick_length() {
        let travel = |substeps: u32| {
            let mut world = PhysicsWorld::new(DT);
            world.set_substeps(DT, substeps);
            let body = world.create_body(
                BodyLabel::Ball(BallId(1)),
                &ball_desc(Vec2::ZERO),
                ColliderMaterial::default(),
            );
            world.apply_impulse(&body, Vec2::new(60.0 * ball_mass(), 0.0));
            world.step_into(&mut Vec::new());
            world.body_position(&body).x
        };
        // One tick at 60 units/s moves about one unit regardless of substeps.
        let (single, split) = (travel(1), travel(4));
        assert!((single - 1.0).abs() < 0.05, "x={}", single);
        assert!((split - single).abs() < 0.05, "x={} vs {}", split, single);
    }

    #[test]
    fn builder_pattern() {
        let desc = BodyDesc::dynamic(ColliderDesc::Ball { radius: 5.0 })
            .with_position(Vec2::new(10.0, 20.0))
            .with_linear_damping(1.5)
            .with_ccd(true);

        assert_eq!(desc.body_type, BodyType::Dynamic);
        assert_eq!(desc.position, Vec2::new(10.0, 20.0));
        assert!((desc.linear_damping - 1.5).abs() < 0.001);
        assert!(desc.ccd);
    }
}
