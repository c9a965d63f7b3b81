//! Seams between the pipeline and whatever produces frames.

use super::capture::CameraCapture;
use super::types::{CameraError, CameraSettings, Frame, Resolution, StreamConstraints};

/// A live stream of frames.
pub trait FrameSource {
    /// Size of the frames this source produces, once known.
    fn resolution(&self) -> Option<Resolution>;

    /// Most recent frame, or `None` if none has arrived yet.
    fn latest_frame(&mut self) -> Option<Frame>;
}

/// Grants access to a camera stream.
pub trait CameraProvider {
    /// Request a live frame source matching `constraints` as closely as the
    /// device allows.
    fn request_stream(
        &mut self,
        constraints: &StreamConstraints,
    ) -> Result<Box<dyn FrameSource>, CameraError>;
}

/// [`CameraProvider`] for the system webcam (device 0).
#[derive(Debug, Default)]
pub struct NokhwaCameraProvider;

impl NokhwaCameraProvider {
    pub fn new() -> Self {
        Self
    }
}

impl CameraProvider for NokhwaCameraProvider {
    fn request_stream(
        &mut self,
        constraints: &StreamConstraints,
    ) -> Result<Box<dyn FrameSource>, CameraError> {
        let mut camera = CameraCapture::new(CameraSettings::from(constraints));
        camera.start()?;
        Ok(Box::new(camera))
    }
}
