//! The session context: one table, its balls and physics, and the game
//! state layered on top. Everything the page can do goes through here.

use glam::Vec2;

use crate::api::config::{ConfigError, SnookerConfig};
use crate::api::events::SnookerEvent;
use crate::api::types::BallId;
use crate::components::ball::{BallKind, BallSet};
use crate::components::cue::CueStick;
use crate::core::physics::{
    BodyDesc, BodyLabel, ColliderDesc, ColliderMaterial, CollisionPair, PhysicsBody, PhysicsWorld,
};
use crate::core::rng::Rng;
use crate::input::queue::{InputEvent, KeyAction};
use crate::renderer::ball_instance::{BallBuffer, BallInstance};
use crate::rules::contact::{ContactMessage, CueContact};
use crate::rules::foul::FoulTracker;
use crate::rules::score::{GameMode, Scoreboard};
use crate::table::geometry::Table;
use crate::table::placement::{CuePlacementError, Rack};
use crate::table::pockets::Pot;

const FOUL_MESSAGE: &str = "FOUL: Two consecutive colours!";

pub struct Session {
    config: SnookerConfig,
    table: Table,
    physics: PhysicsWorld,
    cushions: Vec<PhysicsBody>,
    balls: BallSet,
    cue: CueStick,
    aim_assist: bool,
    mode: GameMode,
    score: Scoreboard,
    fouls: FoulTracker,
    message: ContactMessage,
    rng: Rng,
    events: Vec<SnookerEvent>,
    collision_events: Vec<CollisionPair>,
    reds_cleared_reported: bool,
}

impl Session {
    /// An empty table (no layout chosen yet) with its cushions in place.
    pub fn new(config: SnookerConfig) -> Self {
        let table = Table::centered(config.world_width, config.world_height, config.table_width);
        let mut physics = PhysicsWorld::new(config.fixed_dt);
        physics.set_substeps(config.fixed_dt, config.physics_substeps);
        let rng = Rng::new(config.seed);
        let mut session = Self {
            config,
            table,
            physics,
            cushions: Vec::new(),
            balls: BallSet::new(),
            cue: CueStick::default(),
            aim_assist: false,
            mode: GameMode::None,
            score: Scoreboard::default(),
            fouls: FoulTracker::new(),
            message: ContactMessage::default(),
            rng,
            events: Vec::new(),
            collision_events: Vec::new(),
            reds_cleared_reported: false,
        };
        session.build_cushions();
        log::info!(
            "snooker session ready: table {}x{} at {}",
            session.table.width(),
            session.table.height(),
            session.table.origin()
        );
        session
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(Self::new(SnookerConfig::from_json(json)?))
    }

    fn build_cushions(&mut self) {
        let tuning = &self.config.physics;
        let outer = ColliderMaterial {
            restitution: tuning.cushion_restitution,
            friction: tuning.ball_friction,
            density: 1.0,
        };
        for block in self.table.outer_cushions(tuning.cushion_thickness) {
            let desc = BodyDesc::fixed(ColliderDesc::Cuboid {
                half_width: block.half_width,
                half_height: block.half_height,
            })
            .with_position(block.center);
            self.cushions
                .push(self.physics.create_body(BodyLabel::Cushion, &desc, outer));
        }

        let inner = ColliderMaterial {
            restitution: tuning.inner_cushion_restitution,
            ..outer
        };
        for face in self.table.inner_cushions(tuning.inner_cushion_height) {
            let desc = BodyDesc::fixed(ColliderDesc::ConvexPolygon { points: face.points })
                .with_position(face.center);
            self.cushions
                .push(self.physics.create_body(BodyLabel::InnerCushion, &desc, inner));
        }
    }

    fn rack(&mut self) -> Rack<'_> {
        Rack::new(&self.table, &mut self.balls, &mut self.physics, &self.config)
    }

    // -- Layout commands --

    fn begin_layout(&mut self, mode: GameMode) {
        self.rack().clear_all();
        self.cue.hide();
        self.mode = mode;
        // Only a layout that still has reds can have them cleared again.
        self.reds_cleared_reported = self.balls.reds_remaining() == 0;
    }

    /// Reds in the triangle, colours on their spots.
    pub fn set_standard(&mut self) {
        self.begin_layout(GameMode::StartingPositions);
        let mut rack = self.rack();
        rack.place_reds_triangle();
        rack.place_colours_starting();
        log::info!("standard layout set");
    }

    /// Reds scattered at random; colours stay off the table.
    pub fn set_random_reds(&mut self) {
        self.begin_layout(GameMode::RandomReds);
        let placed = Rack::new(&self.table, &mut self.balls, &mut self.physics, &self.config)
            .place_reds_random(&mut self.rng);
        log::info!("random reds set ({} placed)", placed);
    }

    /// Reds scattered at random, then colours on (or near) their spots.
    pub fn set_all_random(&mut self) {
        self.begin_layout(GameMode::AllRandom);
        let mut rack = Rack::new(&self.table, &mut self.balls, &mut self.physics, &self.config);
        let placed = rack.place_reds_random(&mut self.rng);
        rack.place_colours_starting();
        log::info!("all-random layout set ({} reds placed)", placed);
    }

    /// Back to the empty table: every ball off, full red complement restored,
    /// score and foul streak cleared.
    pub fn reset(&mut self) {
        self.begin_layout(GameMode::None);
        self.balls = BallSet::new();
        self.reds_cleared_reported = false;
        self.score.reset();
        self.fouls.reset();
        self.message.clear();
        self.events.clear();
        log::info!("game reset");
    }

    // -- Cue ball --

    pub fn try_place_cue_ball(&mut self, point: Vec2) -> Result<BallId, CuePlacementError> {
        let result = self.rack().place_cue_ball(point);
        match result {
            Ok(_) => log::info!("cue ball placed at {}", point),
            Err(err) => log::debug!("cue ball rejected at {}: {}", point, err),
        }
        result
    }

    /// Place the cue ball at (x, y). `false` means nothing changed.
    pub fn place_cue_ball(&mut self, x: f32, y: f32) -> bool {
        self.try_place_cue_ball(Vec2::new(x, y)).is_ok()
    }

    pub fn cue_ball_placed(&self) -> bool {
        self.cue_ball().is_some()
    }

    fn cue_ball(&self) -> Option<(BallId, PhysicsBody)> {
        self.balls
            .cue()
            .and_then(|ball| ball.body().map(|body| (ball.id, *body)))
    }

    // -- Input --

    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::KeyDown { key_code } => {
                if let Some(action) = KeyAction::from_key_code(key_code) {
                    self.apply_key(action);
                }
            }
            InputEvent::KeyUp { .. } => {}
            InputEvent::PointerDown { x, y } => {
                let pointer = Vec2::new(x, y);
                if self.cue_ball_placed() {
                    self.cue.aiming = true;
                    self.aim_at(pointer);
                } else {
                    // A miss is routine while the player hunts for the D.
                    let _ = self.try_place_cue_ball(pointer);
                }
            }
            InputEvent::PointerMove { x, y, held } => {
                if !self.cue_ball_placed() {
                    return;
                }
                if held {
                    self.aim_at(Vec2::new(x, y));
                    self.cue.aiming = true;
                } else if !self.cue.aiming {
                    self.aim_at(Vec2::new(x, y));
                }
            }
            InputEvent::PointerUp { .. } => self.shoot(),
        }
    }

    pub fn apply_key(&mut self, action: KeyAction) {
        match action {
            KeyAction::StandardLayout => self.set_standard(),
            KeyAction::RandomReds => self.set_random_reds(),
            KeyAction::AllRandom => self.set_all_random(),
            KeyAction::ToggleAimAssist => {
                self.aim_assist = !self.aim_assist;
                log::info!("aim assist {}", if self.aim_assist { "on" } else { "off" });
            }
            KeyAction::Reset => self.reset(),
        }
    }

    fn aim_at(&mut self, pointer: Vec2) {
        if let Some((_, body)) = self.cue_ball() {
            let ball = self.physics.body_position(&body);
            self.cue.aim(ball, pointer, &self.config.cue);
        }
    }

    fn shoot(&mut self) {
        let Some((_, body)) = self.cue_ball() else {
            self.cue.aiming = false;
            return;
        };
        if let Some(impulse) = self.cue.release(&self.config.cue) {
            self.physics.apply_impulse(&body, impulse);
            log::info!("shot fired with power {:.1}", self.cue.power);
        }
    }

    // -- Simulation --

    /// One fixed step: physics, cue contacts, pockets, message fade.
    pub fn tick(&mut self) {
        self.collision_events.clear();
        self.physics.step_into(&mut self.collision_events);

        if let Some((cue, _)) = self.cue_ball() {
            let contacts = CueContact::from_collisions(cue, &self.collision_events, &self.balls);
            for contact in contacts {
                log::debug!("cue ball collision: {}", contact.label());
                self.message
                    .show_contact(contact, self.config.contact_message_ticks);
                self.events.push(SnookerEvent::CueContact(contact));
            }
        }

        self.check_pockets();
        self.message.tick();
    }

    /// Pocket pass over every live ball, then scoring and fouls.
    pub fn check_pockets(&mut self) {
        let pots = self.rack().check_pockets();
        for pot in pots {
            self.resolve_pot(pot);
        }

        if self.is_game_over() && !self.reds_cleared_reported {
            self.reds_cleared_reported = true;
            log::info!("all red balls cleared, final score {}", self.score.points());
            self.events.push(SnookerEvent::AllRedsCleared {
                score: self.score.points(),
            });
        }
    }

    fn resolve_pot(&mut self, pot: Pot) {
        if pot.kind == BallKind::Cue {
            self.cue.hide();
            self.events.push(SnookerEvent::CueBallPotted);
            return;
        }

        if self.fouls.record(pot.kind) {
            log::info!("foul: two consecutive colours potted");
            self.score.foul();
            self.message
                .show(FOUL_MESSAGE, self.config.contact_message_ticks);
            self.events.push(SnookerEvent::Foul);
        }

        let points = self.score.pot(pot.kind);
        log::info!("{} potted for {} (score {})", pot.kind.name(), points, self.score.points());
        self.events.push(SnookerEvent::Potted {
            id: pot.id,
            kind: pot.kind,
            points,
        });

        if pot.kind.is_colour() {
            self.events.push(match pot.respot {
                Some(respot) => SnookerEvent::Respotted {
                    id: pot.id,
                    position: respot.position,
                },
                None => SnookerEvent::LeftOffTable { id: pot.id },
            });
        }
    }

    // -- Queries --

    pub fn config(&self) -> &SnookerConfig {
        &self.config
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn balls(&self) -> &BallSet {
        &self.balls
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    /// The fixed cushion bodies, outer blocks first.
    pub fn cushions(&self) -> &[PhysicsBody] {
        &self.cushions
    }

    pub fn ball_position(&self, id: BallId) -> Option<Vec2> {
        self.balls.position(id, &self.physics)
    }

    pub fn score(&self) -> u32 {
        self.score.points()
    }

    pub fn foul_count(&self) -> u32 {
        self.score.fouls()
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn mode_text(&self) -> &'static str {
        self.mode.text()
    }

    pub fn reds_remaining(&self) -> usize {
        self.balls.reds_remaining()
    }

    /// Every red gone from a layout that was actually started.
    pub fn is_game_over(&self) -> bool {
        self.mode != GameMode::None && self.balls.reds_remaining() == 0
    }

    /// Whether every live ball is slower than the rest speed.
    pub fn all_balls_stopped(&self) -> bool {
        self.balls
            .live()
            .all(|(_, body)| self.physics.velocity(body).length() < self.config.rest_speed)
    }

    pub fn cue_stick(&self) -> &CueStick {
        &self.cue
    }

    pub fn aim_assist(&self) -> bool {
        self.aim_assist
    }

    /// Aim-assist dots, empty unless assist is on and the cue is showing.
    pub fn aim_assist_dots(&self) -> Vec<Vec2> {
        if !self.aim_assist {
            return Vec::new();
        }
        self.cue.aim_assist_dots(&self.table, &self.config.cue)
    }

    pub fn message(&self) -> &ContactMessage {
        &self.message
    }

    pub fn events(&self) -> &[SnookerEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<SnookerEvent> {
        std::mem::take(&mut self.events)
    }

    /// Rebuild the draw list from the live balls.
    pub fn fill_ball_buffer(&self, buffer: &mut BallBuffer) {
        buffer.clear();
        let radius = self.table.ball_radius();
        for (ball, body) in self.balls.live() {
            let p = self.physics.body_position(body);
            buffer.push(BallInstance::from_ball(ball, p.x, p.y, radius));
        }
    }

    /// Move a live ball without going through the rules. Lets tests and
    /// demos drop a ball straight into a pocket.
    #[cfg(any(test, feature = "tooling"))]
    pub fn teleport_ball(&mut self, id: BallId, to: Vec2) -> bool {
        match self.balls.get(id).and_then(|b| b.body()) {
            Some(body) => {
                self.physics.set_position(body, to);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::ball::Colour;

    fn standard_with_cue() -> (Session, BallId) {
        let mut s = Session::new(SnookerConfig::default());
        s.set_standard();
        let d = s.table().d_zone();
        let cue = s
            .try_place_cue_ball(d.center - Vec2::new(d.radius * 0.8, 0.0))
            .unwrap();
        s.drain_events();
        (s, cue)
    }

    fn pot(s: &mut Session, id: BallId) {
        let pocket = s.table().pockets()[0];
        assert!(s.teleport_ball(id, pocket));
        s.check_pockets();
    }

    #[test]
    fn new_session_has_only_cushions() {
        let s = Session::new(SnookerConfig::default());
        assert_eq!(s.physics().body_count(), 12);
        assert_eq!(s.cushions().len(), 12);
        assert_eq!(s.physics().label(&s.cushions()[0]), Some(BodyLabel::Cushion));
        assert_eq!(s.physics().label(&s.cushions()[11]), Some(BodyLabel::InnerCushion));
        assert_eq!(s.mode(), GameMode::None);
        assert_eq!(s.mode_text(), "Press 1, 2, or 3 to start");
        assert!(!s.cue_ball_placed());
        assert!(!s.is_game_over());
    }

    #[test]
    fn potted_pink_respots_on_own_spot_and_scores_six() {
        let (mut s, _) = standard_with_cue();
        assert_eq!(s.balls().live_count(), 22);
        let pink = BallSet::colour_id(Colour::Pink);
        let pocket = s.table().pockets()[0];
        s.teleport_ball(pink, pocket);
        s.tick();

        let pos = s.ball_position(pink).unwrap();
        assert!(pos.distance(s.table().spot(Colour::Pink)) < 1e-2);
        assert_eq!(s.score(), 6);
        let events = s.drain_events();
        assert!(events.contains(&SnookerEvent::Potted {
            id: pink,
            kind: BallKind::Colour(Colour::Pink),
            points: 6
        }));
        assert!(events
            .iter()
            .any(|e| matches!(e, SnookerEvent::Respotted { id, .. } if *id == pink)));
        assert!(!events.contains(&SnookerEvent::Foul));
    }

    #[test]
    fn second_colour_in_a_row_is_a_foul() {
        let (mut s, _) = standard_with_cue();
        pot(&mut s, BallSet::colour_id(Colour::Pink));
        pot(&mut s, BallSet::colour_id(Colour::Blue));
        let events = s.drain_events();
        assert_eq!(events.iter().filter(|e| **e == SnookerEvent::Foul).count(), 1);
        assert_eq!(s.score(), 11);
        assert_eq!(s.foul_count(), 1);
        assert_eq!(s.message().text(), Some(FOUL_MESSAGE));
    }

    #[test]
    fn red_between_colours_avoids_the_foul() {
        let (mut s, _) = standard_with_cue();
        pot(&mut s, BallSet::colour_id(Colour::Pink));
        pot(&mut s, BallId(1));
        pot(&mut s, BallSet::colour_id(Colour::Blue));
        assert!(!s.drain_events().contains(&SnookerEvent::Foul));
        assert_eq!(s.score(), 12);
        assert_eq!(s.reds_remaining(), 14);
    }

    #[test]
    fn potted_cue_must_be_placed_again() {
        let (mut s, cue) = standard_with_cue();
        pot(&mut s, cue);
        assert!(!s.cue_ball_placed());
        assert_eq!(s.score(), 0);
        assert!(s.drain_events().contains(&SnookerEvent::CueBallPotted));

        let d = s.table().d_zone();
        s.handle_input(InputEvent::PointerDown {
            x: d.center.x - 40.0,
            y: d.center.y,
        });
        assert!(s.cue_ball_placed());
    }

    #[test]
    fn cue_placement_outside_d_changes_nothing() {
        let (mut s, cue) = standard_with_cue();
        let bodies = s.physics().body_count();
        let far = s.table().origin() + Vec2::new(s.table().width(), s.table().height());
        assert!(!s.place_cue_ball(far.x, far.y));
        assert_eq!(s.physics().body_count(), bodies);
        assert_eq!(s.balls().cue().map(|b| b.id), Some(cue));
    }

    #[test]
    fn clearing_every_red_is_reported_once() {
        let mut s = Session::new(SnookerConfig::default());
        s.set_random_reds();
        assert_eq!(s.mode_text(), "Random Reds");
        for id in s.balls().red_ids() {
            if s.balls().get(id).map_or(false, |b| b.is_on_table()) {
                pot(&mut s, id);
            } else {
                // Reds that never found room stay in the count; drop them
                // the same way a pot would.
                s.balls.remove(id);
            }
        }
        s.check_pockets();
        assert!(s.is_game_over());
        let cleared = s
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, SnookerEvent::AllRedsCleared { .. }))
            .count();
        assert_eq!(cleared, 1);
    }

    fn count_cleared(events: &[SnookerEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, SnookerEvent::AllRedsCleared { .. }))
            .count()
    }

    #[test]
    fn new_layout_without_reds_is_not_cleared_again() {
        let (mut s, _) = standard_with_cue();
        for id in s.balls().red_ids() {
            pot(&mut s, id);
        }
        assert_eq!(count_cleared(&s.drain_events()), 1);

        s.set_standard();
        s.tick();
        assert_eq!(s.reds_remaining(), 0);
        assert!(s.is_game_over());
        assert_eq!(count_cleared(&s.drain_events()), 0);

        // A full rack after reset can be cleared again.
        s.reset();
        s.set_standard();
        for id in s.balls().red_ids() {
            pot(&mut s, id);
        }
        assert_eq!(count_cleared(&s.drain_events()), 1);
    }

    #[test]
    fn colour_with_nowhere_to_go_is_left_off_table() {
        let mut config = SnookerConfig::default();
        // Any live ball now blocks the whole table.
        config.placement.clearance_multiplier = 100.0;
        let mut s = Session::new(config);
        s.set_standard();
        // The colours could not get past the triangle either.
        assert_eq!(s.balls().live_count(), 15);

        let pink = BallSet::colour_id(Colour::Pink);
        let pocket = s.table().pockets()[0];
        assert!(s.rack().create_ball_body(pink, pocket));
        s.check_pockets();

        assert!(s.ball_position(pink).is_none());
        assert!(s.balls().get(pink).is_some());
        assert_eq!(s.physics().body_count(), 12 + 15);
        assert_eq!(s.score(), 6);
        let events = s.drain_events();
        assert!(events.contains(&SnookerEvent::LeftOffTable { id: pink }));
        assert!(!events
            .iter()
            .any(|e| matches!(e, SnookerEvent::Respotted { .. })));
    }

    #[test]
    fn layout_keys_switch_modes() {
        let mut s = Session::new(SnookerConfig::default());
        s.handle_input(InputEvent::KeyDown { key_code: '1' as u32 });
        assert_eq!(s.mode(), GameMode::StartingPositions);
        assert_eq!(s.balls().live_count(), 21);

        s.handle_input(InputEvent::KeyDown { key_code: '2' as u32 });
        assert_eq!(s.mode(), GameMode::RandomReds);
        assert!(s.balls().live().all(|(b, _)| b.kind == BallKind::Red));

        s.handle_input(InputEvent::KeyDown { key_code: '3' as u32 });
        assert_eq!(s.mode(), GameMode::AllRandom);
        for colour in Colour::ALL {
            assert!(s.ball_position(BallSet::colour_id(colour)).is_some());
        }
        assert_eq!(
            s.physics().body_count(),
            12 + s.balls().live_count()
        );
    }

    #[test]
    fn reset_restores_a_full_empty_table() {
        let (mut s, _) = standard_with_cue();
        pot(&mut s, BallId(2));
        pot(&mut s, BallSet::colour_id(Colour::Black));
        s.handle_input(InputEvent::KeyDown { key_code: 'r' as u32 });
        assert_eq!(s.mode(), GameMode::None);
        assert_eq!(s.score(), 0);
        assert_eq!(s.reds_remaining(), 15);
        assert_eq!(s.balls().live_count(), 0);
        assert_eq!(s.physics().body_count(), 12);
        assert!(s.events().is_empty());
    }

    #[test]
    fn drag_and_release_shoots_the_cue_ball() {
        let (mut s, cue) = standard_with_cue();
        let ball = s.ball_position(cue).unwrap();
        assert!(s.all_balls_stopped());
        s.handle_input(InputEvent::PointerDown { x: ball.x, y: ball.y });
        s.handle_input(InputEvent::PointerMove {
            x: ball.x,
            y: ball.y + 150.0,
            held: true,
        });
        assert!((s.cue_stick().power - 30.0).abs() < 1e-3);
        s.handle_input(InputEvent::PointerUp { x: ball.x, y: ball.y + 150.0 });
        assert!(!s.cue_stick().visible);
        s.tick();
        assert!(!s.all_balls_stopped());
        let moved = s.ball_position(cue).unwrap();
        assert!(moved.y > ball.y);
    }

    #[test]
    fn aim_assist_toggles() {
        let (mut s, cue) = standard_with_cue();
        let ball = s.ball_position(cue).unwrap();
        s.handle_input(InputEvent::PointerMove { x: ball.x, y: ball.y + 80.0, held: false });
        assert!(s.aim_assist_dots().is_empty());
        s.handle_input(InputEvent::KeyDown { key_code: 'A' as u32 });
        assert!(s.aim_assist());
        assert!(!s.aim_assist_dots().is_empty());
    }

    #[test]
    fn ball_buffer_mirrors_live_balls() {
        let (s, _) = standard_with_cue();
        let mut buf = BallBuffer::new();
        s.fill_ball_buffer(&mut buf);
        assert_eq!(buf.instance_count(), 22);
        let cue_instances = buf.instances().iter().filter(|i| i.highlight == 1.0).count();
        assert_eq!(cue_instances, 1);
    }

    #[test]
    fn config_errors_surface_from_json() {
        assert!(Session::from_json(r#"{ "fixed_dt": 0 }"#).is_err());
        assert!(Session::from_json("{}").is_ok());
    }
}
