//! A terminal LED sign: text scrolling across the screen or flickering like a neon tube.

pub mod animation;
pub mod color;
pub mod config;
pub mod metrics;
pub mod player;
pub mod render;
pub mod report;
