//! Pipeline control: owned render state, frame pacing, and the controller
//! that turns camera frames into painted glyphs.

mod controller;
mod error;
mod scheduler;
mod state;

pub use controller::{PipelineController, PipelineOptions};
pub use error::PipelineError;
pub use scheduler::{FrameScheduler, IntervalScheduler, ManualScheduler, DEFAULT_REFRESH_HZ};
pub use state::{RenderState, Viewport};
