//! Bundled WGSL for the two primitive families.

pub const LINE_VERTEX: &str = include_str!("wgsl/line.vert.wgsl");
pub const LINE_FRAGMENT: &str = include_str!("wgsl/line.frag.wgsl");
pub const TRIANGLE_VERTEX: &str = include_str!("wgsl/triangle.vert.wgsl");
pub const TRIANGLE_FRAGMENT: &str = include_str!("wgsl/triangle.frag.wgsl");
