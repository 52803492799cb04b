//! Tessera studio: sketch or import a polygon, triangulate it through an
//! external collaborator and inspect the mesh in a second viewport.

pub mod app;
pub mod config;
pub mod events;
pub mod import;
pub mod session;
pub mod triangulate;
