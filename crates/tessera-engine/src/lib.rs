//! Tessera engine crate.
//!
//! Owns the platform + GPU runtime pieces and the 2D primitive renderer used
//! by the studio: coordinate normalization, affine view transforms, shader
//! programs, draw recording, and per-viewport pan/zoom control.

pub mod core;
pub mod device;
pub mod input;
pub mod window;

pub mod coords;
pub mod geometry;
pub mod logging;
pub mod paint;
pub mod render;
pub mod scene;
pub mod shader;
pub mod view;
