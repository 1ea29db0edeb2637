pub mod ball_instance;
