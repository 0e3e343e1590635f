//! # Filament Simulation
//!
//! Deterministic fixed-step solver for grids of spring-damper filaments
//! pinned to a moving anchor, built on double-buffered position,
//! velocity and basis grids.

pub mod simulation;
pub mod state;

pub use simulation::*;
pub use state::*;
