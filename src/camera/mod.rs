//! Camera capture: webcam access and the frame-source seam used by the pipeline.
//!
//! - [`CameraCapture`] runs a nokhwa camera on a background thread
//! - [`CameraProvider`] / [`FrameSource`] are what the pipeline depends on
//! - [`StreamConstraints`] describes the requested stream

mod capture;
mod capture_loop;
mod frame_utils;
mod source;
mod types;

pub use capture::CameraCapture;
pub use frame_utils::mirror_horizontal;
pub use source::{CameraProvider, FrameSource, NokhwaCameraProvider};
pub use types::{
    CameraError, CameraSettings, Facing, Frame, FrameFormat, Resolution, StreamConstraints,
};
