pub mod geometry;
pub mod occupancy;
pub mod placement;
pub mod pockets;
