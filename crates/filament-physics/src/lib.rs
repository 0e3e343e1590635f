//! # Filament Physics
//!
//! Core data model and integration kernels for spring-damper filament
//! (hair strand) simulation: configuration, anchor pose math, templates
//! baked from source meshes, and the pure per-segment kernel functions.

pub mod anchor;
pub mod config;
pub mod kernels;
pub mod random;
pub mod template;

pub use anchor::*;
pub use config::*;
pub use kernels::*;
pub use random::*;
pub use template::*;
