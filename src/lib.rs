//! Hungry Games - day-by-day battle royale simulation engine

pub mod core;
pub mod events;
pub mod game;
pub mod simulation;
