//! Rendering module
//!
//! The simulation draws into a [`Surface`]. On web, a recorded [`DrawList`]
//! is replayed by the WebGPU [`RenderState`] (circles) and by a 2D overlay
//! canvas (text).

pub mod pipeline;
pub mod shapes;
pub mod surface;
pub mod vertex;

pub use pipeline::RenderState;
pub use surface::{Color, DrawCommand, DrawList, Surface, TextAlign, TextStyle};
pub use vertex::colors;
