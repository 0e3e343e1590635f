//! # Filament Render
//!
//! Strand template meshes and CPU skinning against simulation
//! snapshots, producing GPU-uploadable vertex arrays.

pub mod mesh;
pub mod skin;

pub use mesh::*;
pub use skin::*;
