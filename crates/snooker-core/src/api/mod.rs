pub mod config;
pub mod events;
pub mod session;
pub mod types;
