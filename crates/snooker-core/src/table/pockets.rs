//! Pocket detection and re-spotting of potted colours.

use glam::Vec2;

use crate::api::types::BallId;
use crate::components::ball::{BallKind, Colour};
use crate::table::geometry::Table;
use crate::table::occupancy::{is_position_clear, ring_candidates};
use crate::table::placement::Rack;

/// Index of the pocket whose mouth contains `position`, if any.
pub fn pocket_index(table: &Table, position: Vec2) -> Option<usize> {
    let mouth = table.pocket_diameter() / 2.0;
    table
        .pockets()
        .iter()
        .position(|pocket| pocket.distance(position) < mouth)
}

pub fn is_ball_in_pocket(table: &Table, position: Vec2) -> bool {
    pocket_index(table, position).is_some()
}

/// Which stage of the search produced a respot position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RespotSite {
    /// A colour spot: the ball's own, or a higher-value one.
    Spot(Colour),
    /// On the line from the own spot toward the top cushion.
    TowardCushion,
    /// On a ring around the own spot.
    Radial,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Respot {
    pub position: Vec2,
    pub site: RespotSite,
}

/// Where a potted ball of `kind` goes back on the table.
///
/// Own spot, then each higher-value spot up to black; then straight toward
/// the top cushion from the own spot in quarter-diameter steps; then rings
/// around the own spot kept inside the table. Reds and the cue ball are
/// never re-spotted and always get `None`.
pub fn find_respot_position(
    kind: BallKind,
    table: &Table,
    live: &[Vec2],
    min_distance: f32,
) -> Option<Respot> {
    let colour = match kind {
        BallKind::Colour(colour) => colour,
        BallKind::Cue | BallKind::Red => return None,
    };

    for candidate in Colour::BY_VALUE_DESC[..=colour.rank()].iter().rev() {
        let position = table.spot(*candidate);
        if is_position_clear(position, live, min_distance) {
            return Some(Respot {
                position,
                site: RespotSite::Spot(*candidate),
            });
        }
    }

    let own = table.spot(colour);
    toward_top_cushion(own, table, live, min_distance)
        .map(|position| Respot {
            position,
            site: RespotSite::TowardCushion,
        })
        .or_else(|| {
            radial_near(own, table, live, min_distance).map(|position| Respot {
                position,
                site: RespotSite::Radial,
            })
        })
}

fn toward_top_cushion(from: Vec2, table: &Table, live: &[Vec2], min_distance: f32) -> Option<Vec2> {
    let d = table.ball_diameter();
    let step = d / 4.0;
    let limit = table.origin().y + d;
    let max_steps = ((from.y - limit) / step).floor().max(0.0) as u32;
    (1..=max_steps)
        .map(|n| Vec2::new(from.x, from.y - n as f32 * step))
        .take_while(|p| p.y >= limit)
        .find(|p| is_position_clear(*p, live, min_distance))
}

fn radial_near(from: Vec2, table: &Table, live: &[Vec2], min_distance: f32) -> Option<Vec2> {
    let d = table.ball_diameter();
    let max_radius = table.width().min(table.height()) / 4.0;
    ring_candidates(from, d, max_radius, d / 2.0)
        .filter(|p| table.is_within_margin(*p, d))
        .find(|p| is_position_clear(*p, live, min_distance))
}

/// What happened to one potted ball.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pot {
    pub id: BallId,
    pub kind: BallKind,
    pub pocket: usize,
    /// Set only for colours that found their way back onto the table.
    pub respot: Option<Respot>,
}

impl<'a> Rack<'a> {
    /// Live balls currently inside a pocket mouth, ascending id.
    pub fn potted_balls(&self) -> Vec<(BallId, usize)> {
        self.balls
            .live()
            .filter_map(|(ball, body)| {
                pocket_index(self.table, self.physics.body_position(body)).map(|p| (ball.id, p))
            })
            .collect()
    }

    /// Resolve a single pot: reds leave the game, colours are re-spotted
    /// (or left off-table when nowhere is free), the cue ball is discarded.
    pub fn pot(&mut self, id: BallId, pocket: usize) -> Option<Pot> {
        let kind = self.balls.kind(id)?;
        self.remove_ball_body(id);
        let mut respot = None;
        match kind {
            BallKind::Red => {
                self.balls.remove(id);
                log::info!("red {:?} potted in pocket {}", id, pocket);
            }
            BallKind::Cue => {
                self.balls.remove(id);
                log::info!("cue ball potted, place it back in the D");
            }
            BallKind::Colour(colour) => {
                respot = find_respot_position(kind, self.table, &self.live_positions(), self.min_distance());
                match respot {
                    Some(r) => {
                        self.create_ball_body(id, r.position);
                        log::debug!("{} respotted via {:?} at {}", colour.name(), r.site, r.position);
                    }
                    None => log::warn!("{} potted with nowhere to respot; left off-table", colour.name()),
                }
            }
        }
        Some(Pot {
            id,
            kind,
            pocket,
            respot,
        })
    }

    /// One pocket pass over every live ball.
    pub fn check_pockets(&mut self) -> Vec<Pot> {
        self.potted_balls()
            .into_iter()
            .filter_map(|(id, pocket)| self.pot(id, pocket))
            .collect()
    }
}
