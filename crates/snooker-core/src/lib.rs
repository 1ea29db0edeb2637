pub mod api;
pub mod core;
pub mod components;
pub mod table;
pub mod rules;
pub mod input;
pub mod renderer;

// Re-export key types at crate root for convenience
pub use api::config::{ConfigError, CueTuning, PhysicsTuning, PlacementTuning, SnookerConfig};
pub use api::events::SnookerEvent;
pub use api::session::Session;
pub use api::types::{event_kinds, BallId, GameEvent};
pub use components::ball::{Ball, BallKind, BallSet, Colour};
pub use components::cue::CueStick;
pub use core::physics::{
    BodyDesc, BodyLabel, BodyType, ColliderDesc, ColliderMaterial, CollisionPair, PhysicsBody,
    PhysicsWorld,
};
pub use core::time::FixedTimestep;
pub use input::queue::{InputEvent, InputQueue, KeyAction};
pub use renderer::ball_instance::{BallBuffer, BallInstance};
pub use rules::contact::{ContactMessage, CueContact};
pub use rules::foul::FoulTracker;
pub use rules::score::{GameMode, Scoreboard};
pub use table::geometry::{DZone, Table};
pub use table::occupancy::{find_nearby_position, is_position_clear};
pub use table::placement::{CuePlacementError, Rack};
pub use table::pockets::{find_respot_position, is_ball_in_pocket, Pot, Respot, RespotSite};
