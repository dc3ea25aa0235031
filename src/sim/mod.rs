pub mod event;
pub mod highscore;
pub mod input;
pub mod lifecycle;
pub mod step;
pub mod world;
