pub mod ball;
pub mod cue;
