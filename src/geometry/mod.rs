// geometry/mod.rs
// Pixel-space coverage math and coordinate transforms
pub mod interpolation;
pub mod transform;
