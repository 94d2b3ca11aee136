//! Software rasterization pipeline.
//!
//! Triangle and thick-line lists run through three programmable stages (a
//! vertex shader, a fragment shader and a blending shader) into a
//! [`FrameBuffer`](core::FrameBuffer), which converts to RGBA bytes for
//! saving. The bundled [`shading`] programs implement Blinn-Phong lighting
//! with a depth test; [`io`] loads OFF and OBJ meshes and the renderer's
//! configuration.

pub mod core;
pub mod geometry;
pub mod io;
pub mod scene;
pub mod shading;
pub mod utils;
