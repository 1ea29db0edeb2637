use std::collections::BTreeMap;

use glam::Vec2;

use crate::api::types::BallId;
use crate::core::physics::{PhysicsBody, PhysicsWorld};

/// Number of reds in a full rack.
pub const RED_COUNT: u32 = 15;

const FIRST_COLOUR_ID: u32 = RED_COUNT + 1;
const FIRST_CUE_ID: u32 = FIRST_COLOUR_ID + Colour::ALL.len() as u32;

/// The six named colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Colour {
    Yellow,
    Green,
    Brown,
    Blue,
    Pink,
    Black,
}

impl Colour {
    /// Creation order, lowest value first.
    pub const ALL: [Colour; 6] = [
        Colour::Yellow,
        Colour::Green,
        Colour::Brown,
        Colour::Blue,
        Colour::Pink,
        Colour::Black,
    ];

    /// Re-spot priority chain, highest value first.
    pub const BY_VALUE_DESC: [Colour; 6] = [
        Colour::Black,
        Colour::Pink,
        Colour::Blue,
        Colour::Brown,
        Colour::Green,
        Colour::Yellow,
    ];

    pub fn value(self) -> u32 {
        match self {
            Colour::Yellow => 2,
            Colour::Green => 3,
            Colour::Brown => 4,
            Colour::Blue => 5,
            Colour::Pink => 6,
            Colour::Black => 7,
        }
    }

    /// Position in `BY_VALUE_DESC` (0 = black).
    pub fn rank(self) -> usize {
        7 - self.value() as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Colour::Yellow => "yellow",
            Colour::Green => "green",
            Colour::Brown => "brown",
            Colour::Blue => "blue",
            Colour::Pink => "pink",
            Colour::Black => "black",
        }
    }

    fn index(self) -> u32 {
        self.value() - 2
    }
}

/// Closed set of ball categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BallKind {
    Cue,
    Red,
    Colour(Colour),
}

impl BallKind {
    /// Points scored for potting this ball (the cue ball carries 1 but never scores).
    pub fn value(self) -> u32 {
        match self {
            BallKind::Cue | BallKind::Red => 1,
            BallKind::Colour(colour) => colour.value(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BallKind::Cue => "cue",
            BallKind::Red => "red",
            BallKind::Colour(colour) => colour.name(),
        }
    }

    /// Display colour as linear RGB.
    pub fn rgb(self) -> [f32; 3] {
        match self {
            BallKind::Cue => [1.0, 1.0, 1.0],
            BallKind::Red => [0.8, 0.0, 0.0],
            BallKind::Colour(Colour::Yellow) => [1.0, 1.0, 0.0],
            BallKind::Colour(Colour::Green) => [0.0, 0.667, 0.0],
            BallKind::Colour(Colour::Brown) => [0.545, 0.271, 0.075],
            BallKind::Colour(Colour::Blue) => [0.0, 0.0, 1.0],
            BallKind::Colour(Colour::Pink) => [1.0, 0.412, 0.706],
            BallKind::Colour(Colour::Black) => [0.0, 0.0, 0.0],
        }
    }

    /// Numeric code used on the wire: 0 cue, 1 red, 2..=7 colours by value.
    pub fn code(self) -> u32 {
        match self {
            BallKind::Cue => 0,
            BallKind::Red => 1,
            BallKind::Colour(colour) => colour.value(),
        }
    }

    pub fn is_colour(self) -> bool {
        matches!(self, BallKind::Colour(_))
    }
}

/// A snooker ball. Off-table whenever it has no physics body.
#[derive(Debug, Clone)]
pub struct Ball {
    pub id: BallId,
    pub kind: BallKind,
    body: Option<PhysicsBody>,
}

impl Ball {
    fn new(id: BallId, kind: BallKind) -> Self {
        Self { id, kind, body: None }
    }

    pub fn body(&self) -> Option<&PhysicsBody> {
        self.body.as_ref()
    }

    pub fn is_on_table(&self) -> bool {
        self.body.is_some()
    }
}

/// Arena of every ball in the session, keyed by stable id.
///
/// Removing a ball never disturbs the ids or iteration order of the rest.
/// Iteration is ascending id: reds, then colours, then the cue ball.
#[derive(Debug, Clone)]
pub struct BallSet {
    balls: BTreeMap<BallId, Ball>,
    next_cue_id: u32,
}

impl BallSet {
    /// Full complement: 15 reds and the six colours, none on the table yet.
    pub fn new() -> Self {
        let mut balls = BTreeMap::new();
        for n in 0..RED_COUNT {
            let id = BallId(1 + n);
            balls.insert(id, Ball::new(id, BallKind::Red));
        }
        for colour in Colour::ALL {
            let id = Self::colour_id(colour);
            balls.insert(id, Ball::new(id, BallKind::Colour(colour)));
        }
        Self {
            balls,
            next_cue_id: FIRST_CUE_ID,
        }
    }

    /// The fixed id of a colour.
    pub fn colour_id(colour: Colour) -> BallId {
        BallId(FIRST_COLOUR_ID + colour.index())
    }

    pub fn get(&self, id: BallId) -> Option<&Ball> {
        self.balls.get(&id)
    }

    pub fn kind(&self, id: BallId) -> Option<BallKind> {
        self.balls.get(&id).map(|b| b.kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ball> {
        self.balls.values()
    }

    /// Ids of the reds still in play, ascending.
    pub fn red_ids(&self) -> Vec<BallId> {
        self.balls
            .values()
            .filter(|b| b.kind == BallKind::Red)
            .map(|b| b.id)
            .collect()
    }

    pub fn reds_remaining(&self) -> usize {
        self.balls.values().filter(|b| b.kind == BallKind::Red).count()
    }

    /// The current cue ball entry, if one has been placed.
    pub fn cue(&self) -> Option<&Ball> {
        self.balls.values().find(|b| b.kind == BallKind::Cue)
    }

    /// Balls that currently have a body.
    pub fn live(&self) -> impl Iterator<Item = (&Ball, &PhysicsBody)> {
        self.balls
            .values()
            .filter_map(|b| b.body.as_ref().map(|body| (b, body)))
    }

    pub fn live_count(&self) -> usize {
        self.live().count()
    }

    /// Centres of every live ball, read fresh from the physics world.
    pub fn live_positions(&self, physics: &PhysicsWorld) -> Vec<Vec2> {
        self.live()
            .map(|(_, body)| physics.body_position(body))
            .collect()
    }

    /// Current centre of a ball, or `None` when it is off-table.
    pub fn position(&self, id: BallId, physics: &PhysicsWorld) -> Option<Vec2> {
        self.balls
            .get(&id)
            .and_then(|b| b.body.as_ref())
            .map(|body| physics.body_position(body))
    }

    /// Mint a new cue ball entry (off-table until a body is attached).
    pub fn spawn_cue(&mut self) -> BallId {
        let id = BallId(self.next_cue_id);
        self.next_cue_id += 1;
        self.balls.insert(id, Ball::new(id, BallKind::Cue));
        id
    }

    /// Give a ball its body. Returns the body it replaced, if any.
    pub fn attach(&mut self, id: BallId, body: PhysicsBody) -> Option<PhysicsBody> {
        self.balls.get_mut(&id).and_then(|b| b.body.replace(body))
    }

    /// Take a ball off the table, returning its body for removal.
    pub fn detach(&mut self, id: BallId) -> Option<PhysicsBody> {
        self.balls.get_mut(&id).and_then(|b| b.body.take())
    }

    /// Drop a ball from the session entirely (potted reds, discarded cue balls).
    pub fn remove(&mut self, id: BallId) -> Option<Ball> {
        self.balls.remove(&id)
    }
}

impl Default for BallSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::physics::{BodyDesc, BodyLabel, ColliderDesc, ColliderMaterial};

    fn body_at(physics: &mut PhysicsWorld, id: BallId, pos: Vec2) -> PhysicsBody {
        physics.create_body(
            BodyLabel::Ball(id),
            &BodyDesc::dynamic(ColliderDesc::Ball { radius: 5.0 }).with_position(pos),
            ColliderMaterial::default(),
        )
    }

    #[test]
    fn new_set_has_reds_and_colours_off_table() {
        let balls = BallSet::new();
        assert_eq!(balls.reds_remaining(), 15);
        assert_eq!(balls.iter().count(), 21);
        assert_eq!(balls.live_count(), 0);
        assert!(balls.cue().is_none());
    }

    #[test]
    fn colour_ids_follow_reds() {
        assert_eq!(BallSet::colour_id(Colour::Yellow), BallId(16));
        assert_eq!(BallSet::colour_id(Colour::Black), BallId(21));
        let balls = BallSet::new();
        assert_eq!(
            balls.kind(BallId(19)),
            Some(BallKind::Colour(Colour::Blue))
        );
    }

    #[test]
    fn values_and_rank() {
        assert_eq!(BallKind::Red.value(), 1);
        assert_eq!(BallKind::Colour(Colour::Pink).value(), 6);
        for (rank, colour) in Colour::BY_VALUE_DESC.iter().enumerate() {
            assert_eq!(colour.rank(), rank);
        }
    }

    #[test]
    fn cue_ids_are_fresh_each_time() {
        let mut balls = BallSet::new();
        let first = balls.spawn_cue();
        balls.remove(first);
        let second = balls.spawn_cue();
        assert_ne!(first, second);
        assert_eq!(balls.cue().map(|b| b.id), Some(second));
    }

    #[test]
    fn removing_a_red_keeps_other_ids() {
        let mut balls = BallSet::new();
        balls.remove(BallId(3));
        assert_eq!(balls.reds_remaining(), 14);
        assert_eq!(balls.kind(BallId(4)), Some(BallKind::Red));
        assert!(balls.get(BallId(3)).is_none());
        assert_eq!(balls.red_ids()[2], BallId(4));
    }

    #[test]
    fn attach_detach_controls_liveness() {
        let mut physics = PhysicsWorld::new(1.0 / 60.0);
        let mut balls = BallSet::new();
        let id = BallId(1);
        let body = body_at(&mut physics, id, Vec2::new(50.0, 60.0));
        assert!(balls.attach(id, body).is_none());
        assert_eq!(balls.live_count(), 1);
        assert_eq!(balls.position(id, &physics), Some(Vec2::new(50.0, 60.0)));
        assert_eq!(balls.live_positions(&physics), vec![Vec2::new(50.0, 60.0)]);

        assert_eq!(balls.detach(id), Some(body));
        assert_eq!(balls.live_count(), 0);
        assert_eq!(balls.position(id, &physics), None);
    }
}
