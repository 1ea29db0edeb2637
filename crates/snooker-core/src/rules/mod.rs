pub mod contact;
pub mod foul;
pub mod score;
