//! Startup and shutdown of the whole mesh.

pub mod mesh_system;

pub use mesh_system::*;
