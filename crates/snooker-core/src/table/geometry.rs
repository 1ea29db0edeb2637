//! Table geometry derived from a single width parameter.
//!
//! Every quantity here is a pure function of the table origin and width,
//! so the same parameters always reproduce the same pockets, spots and
//! cushions bit for bit.

use glam::Vec2;

use crate::components::ball::Colour;

/// Table width divided by ball diameter.
pub const BALL_DIAMETER_RATIO: f32 = 36.0;
/// Pocket diameter in ball diameters.
pub const POCKET_SIZE_MULTIPLIER: f32 = 1.5;
/// D-zone centre, as a fraction of table width from the left edge.
pub const D_ZONE_X: f32 = 0.2;
/// Table height divided by D-zone radius.
pub const D_ZONE_RADIUS_DIVISOR: f32 = 6.25;
/// Red triangle apex, as a fraction of table width.
pub const TRIANGLE_START_X: f32 = 0.75;
/// Gap between triangle rows along the long axis, in ball diameters.
pub const TRIANGLE_ROW_SPACING: f32 = 0.9;
/// Gap between balls within a triangle row, in ball diameters.
pub const TRIANGLE_BALL_SPACING: f32 = 1.1;
/// Number of triangle rows (1 + 2 + 3 + 4 + 5 = 15 reds).
pub const TRIANGLE_ROWS: usize = 5;
/// Random reds stay right of this fraction of table width.
pub const RANDOM_PLACEMENT_MIN_X: f32 = 0.3;
/// Pink sits this many ball diameters in front of the triangle apex.
pub const PINK_APEX_GAP: f32 = 1.2;
/// Black sits this many ball diameters behind the triangle apex.
pub const BLACK_APEX_GAP: f32 = 5.5;
/// How far the inner cushion lip sits inside the table edge.
const INNER_CUSHION_LIP: f32 = 5.0;

/// The cue ball placement region: the half disc left of its centre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DZone {
    pub center: Vec2,
    pub radius: f32,
    /// Left edge of the table; the zone never extends past it.
    pub left: f32,
}

impl DZone {
    pub fn contains(&self, point: Vec2) -> bool {
        point.distance(self.center) <= self.radius
            && point.x >= self.left
            && point.x <= self.center.x
    }
}

/// A fixed rectangular cushion outside the playing area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CushionBlock {
    pub center: Vec2,
    pub half_width: f32,
    pub half_height: f32,
}

/// An angled cushion face just inside the playing area.
#[derive(Debug, Clone, PartialEq)]
pub struct CushionFace {
    /// Centroid of `points`; the body is created here.
    pub center: Vec2,
    /// Outline relative to `center`.
    pub points: Vec<Vec2>,
}

impl CushionFace {
    fn from_world_points(points: [Vec2; 4]) -> Self {
        let center = points.iter().copied().sum::<Vec2>() / points.len() as f32;
        Self {
            center,
            points: points.iter().map(|p| *p - center).collect(),
        }
    }
}

/// Playing-area dimensions and everything derived from them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Table {
    origin: Vec2,
    width: f32,
    height: f32,
    ball_diameter: f32,
    pocket_diameter: f32,
}

impl Table {
    /// A table whose top-left corner is `origin`. Height is half the width.
    pub fn new(origin: Vec2, width: f32) -> Self {
        let mut table = Self {
            origin,
            width: 0.0,
            height: 0.0,
            ball_diameter: 0.0,
            pocket_diameter: 0.0,
        };
        table.set_width(width);
        table
    }

    /// A table of `width` centred in a `world_width` × `world_height` canvas.
    pub fn centered(world_width: f32, world_height: f32, width: f32) -> Self {
        let height = width / 2.0;
        let origin = Vec2::new((world_width - width) / 2.0, (world_height - height) / 2.0);
        Self::new(origin, width)
    }

    /// Resize, recomputing every derived quantity together.
    pub fn set_width(&mut self, width: f32) {
        self.width = width;
        self.height = width / 2.0;
        self.ball_diameter = width / BALL_DIAMETER_RATIO;
        self.pocket_diameter = self.ball_diameter * POCKET_SIZE_MULTIPLIER;
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn ball_diameter(&self) -> f32 {
        self.ball_diameter
    }

    pub fn ball_radius(&self) -> f32 {
        self.ball_diameter / 2.0
    }

    pub fn pocket_diameter(&self) -> f32 {
        self.pocket_diameter
    }

    pub fn center(&self) -> Vec2 {
        self.origin + Vec2::new(self.width, self.height) / 2.0
    }

    /// Absolute point for a position given as fractions of width and height.
    pub fn at_ratio(&self, x: f32, y: f32) -> Vec2 {
        self.origin + Vec2::new(x * self.width, y * self.height)
    }

    /// Four corners, then the two long-side middles (top, bottom).
    pub fn pockets(&self) -> [Vec2; 6] {
        let Vec2 { x, y } = self.origin;
        let (w, h) = (self.width, self.height);
        [
            Vec2::new(x, y),
            Vec2::new(x + w, y),
            Vec2::new(x, y + h),
            Vec2::new(x + w, y + h),
            Vec2::new(x + w / 2.0, y),
            Vec2::new(x + w / 2.0, y + h),
        ]
    }

    pub fn d_zone(&self) -> DZone {
        DZone {
            center: self.at_ratio(D_ZONE_X, 0.5),
            radius: self.height / D_ZONE_RADIUS_DIVISOR,
            left: self.origin.x,
        }
    }

    /// X coordinate of the baulk line (one fifth of the way along).
    pub fn baulk_x(&self) -> f32 {
        self.origin.x + self.width / 5.0
    }

    /// Where the front red of the triangle sits.
    pub fn triangle_apex(&self) -> Vec2 {
        self.at_ratio(TRIANGLE_START_X, 0.5)
    }

    /// The fifteen triangle slots, front row first, each row top to bottom.
    pub fn triangle_slots(&self) -> Vec<Vec2> {
        let apex = self.triangle_apex();
        let d = self.ball_diameter;
        let mut slots = Vec::with_capacity(15);
        for row in 0..TRIANGLE_ROWS {
            let in_row = row + 1;
            for col in 0..in_row {
                let x = apex.x + row as f32 * d * TRIANGLE_ROW_SPACING;
                let y = apex.y + (col as f32 - (in_row as f32 - 1.0) / 2.0) * d * TRIANGLE_BALL_SPACING;
                slots.push(Vec2::new(x, y));
            }
        }
        slots
    }

    /// Canonical spot of a colour. This is both its starting position and
    /// the point it is re-spotted on.
    ///
    /// Pink and black hang off the triangle apex rather than sitting at
    /// fixed table ratios, so a potted pink returns exactly where it
    /// started. Keep the two in step with `triangle_apex`.
    pub fn spot(&self, colour: Colour) -> Vec2 {
        let apex = self.triangle_apex();
        let d = self.ball_diameter;
        match colour {
            Colour::Yellow => self.at_ratio(D_ZONE_X, 0.75),
            Colour::Green => self.at_ratio(D_ZONE_X, 0.25),
            Colour::Brown => self.at_ratio(D_ZONE_X, 0.5),
            Colour::Blue => self.at_ratio(0.5, 0.5),
            Colour::Pink => Vec2::new(apex.x - d * PINK_APEX_GAP, apex.y),
            Colour::Black => Vec2::new(apex.x + d * BLACK_APEX_GAP, apex.y),
        }
    }

    /// All six spots in creation order, for drawing markers.
    pub fn spots(&self) -> [(Colour, Vec2); 6] {
        Colour::ALL.map(|colour| (colour, self.spot(colour)))
    }

    /// Strictly inside the playing area shrunk by `margin` on every side.
    pub fn is_within_margin(&self, point: Vec2, margin: f32) -> bool {
        point.x > self.origin.x + margin
            && point.x < self.origin.x + self.width - margin
            && point.y > self.origin.y + margin
            && point.y < self.origin.y + self.height - margin
    }

    /// The six outer cushions: two on each long side split by the middle
    /// pocket, one on each short side, all shortened to leave pockets open.
    pub fn outer_cushions(&self, thickness: f32) -> [CushionBlock; 6] {
        let Vec2 { x, y } = self.origin;
        let (w, h) = (self.width, self.height);
        let long = CushionBlock {
            center: Vec2::ZERO,
            half_width: (w / 2.0 - self.pocket_diameter) / 2.0,
            half_height: thickness / 2.0,
        };
        let short = CushionBlock {
            center: Vec2::ZERO,
            half_width: thickness / 2.0,
            half_height: (h - self.pocket_diameter) / 2.0,
        };
        [
            CushionBlock { center: Vec2::new(x + w / 4.0, y - thickness / 2.0), ..long },
            CushionBlock { center: Vec2::new(x + 3.0 * w / 4.0, y - thickness / 2.0), ..long },
            CushionBlock { center: Vec2::new(x + w / 4.0, y + h + thickness / 2.0), ..long },
            CushionBlock { center: Vec2::new(x + 3.0 * w / 4.0, y + h + thickness / 2.0), ..long },
            CushionBlock { center: Vec2::new(x - thickness / 2.0, y + h / 2.0), ..short },
            CushionBlock { center: Vec2::new(x + w + thickness / 2.0, y + h / 2.0), ..short },
        ]
    }

    /// The six inner cushion faces, with ends cut back from the pockets.
    pub fn inner_cushions(&self, depth: f32) -> Vec<CushionFace> {
        let Vec2 { x, y } = self.origin;
        let (w, h) = (self.width, self.height);
        let r = self.pocket_diameter / 2.0;
        let lip = INNER_CUSHION_LIP;
        let p = Vec2::new;
        vec![
            // top left
            CushionFace::from_world_points([
                p(x + r * 1.5, y + lip),
                p(x + w / 2.0 - r * 1.5, y + lip),
                p(x + w / 2.0 - r, y + depth),
                p(x + r * 2.0, y + depth),
            ]),
            // top right
            CushionFace::from_world_points([
                p(x + w / 2.0 + r, y + lip),
                p(x + w - r * 1.5, y + lip),
                p(x + w - r * 2.0, y + depth),
                p(x + w / 2.0 + r * 1.5, y + depth),
            ]),
            // bottom left
            CushionFace::from_world_points([
                p(x + r * 2.0, y + h - depth),
                p(x + w / 2.0 - r, y + h - depth),
                p(x + w / 2.0 - r * 1.5, y + h - lip),
                p(x + r * 1.5, y + h - lip),
            ]),
            // bottom right
            CushionFace::from_world_points([
                p(x + w / 2.0 + r * 1.5, y + h - depth),
                p(x + w - r * 2.0, y + h - depth),
                p(x + w - r * 1.5, y + h - lip),
                p(x + w / 2.0 + r, y + h - lip),
            ]),
            // left
            CushionFace::from_world_points([
                p(x + lip, y + r * 1.5),
                p(x + depth, y + r * 2.0),
                p(x + depth, y + h - r * 2.0),
                p(x + lip, y + h - r * 1.5),
            ]),
            // right
            CushionFace::from_world_points([
                p(x + w - depth, y + r * 2.0),
                p(x + w - lip, y + r * 1.5),
                p(x + w - lip, y + h - r * 1.5),
                p(x + w - depth, y + h - r * 2.0),
            ]),
        ]
    }
}
