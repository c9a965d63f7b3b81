//! The frame-to-ASCII pipeline.
//!
//! 1. **Geometry** - fit a fixed column count into the container, aspect-correct
//! 2. **Sampling** - shrink the camera frame to one RGB sample per cell
//! 3. **Rendering** - luminance to glyph via a ramp, color or accent fill,
//!    emitted as draw commands
//!
//! # Ramps
//!
//! Presets are available via [`CharSet`]:
//! - `Standard` - 10-level ASCII density ramp
//! - `Blocks` - Unicode shade blocks
//! - `Minimal` - 4-level clean look
//! - `Dense` - 15-level ramp

mod color;
mod geometry;
mod ramp;
mod render;
mod sampler;

pub use color::{ParseColorError, Rgb};
pub use geometry::{GeometryUnready, GridGeometry, DEFAULT_CELL_ASPECT, DEFAULT_COLUMNS};
pub use ramp::{
    CharSet, GlyphRamp, RampError, BLOCKS_RAMP, DENSE_RAMP, MINIMAL_RAMP, STANDARD_RAMP,
};
pub use render::{paint, AsciiRenderer, DrawCommand, DrawList};
pub use sampler::{CellSample, FrameSampler, SampleFilter, SampleGrid};
