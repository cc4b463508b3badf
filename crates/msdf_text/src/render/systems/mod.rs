//! Active rendering systems
//!
//! Text mesh generation and the billboard solver that places text meshes
//! in front of the camera every frame.

pub mod text;
pub mod billboard;
