//! Errors surfaced by the pipeline controller.

use crate::ascii::GeometryUnready;
use crate::camera::CameraError;
use crate::export::ExportError;

/// Errors that can occur while driving the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The OS or the user refused camera access
    #[error("camera access denied")]
    CameraAccessDenied,
    /// The device is missing, busy or failed to stream
    #[error("camera unavailable: {0}")]
    CameraUnavailable(String),
    /// Container or frame size not known yet
    #[error("geometry not ready")]
    GeometryUnready,
    /// Snapshot requested before anything was rendered
    #[error("nothing has been rendered yet")]
    NothingToExport,
    #[error("snapshot failed: {0}")]
    Export(#[from] ExportError),
}

impl From<CameraError> for PipelineError {
    fn from(e: CameraError) -> Self {
        if e.is_access_denied() {
            PipelineError::CameraAccessDenied
        } else {
            PipelineError::CameraUnavailable(e.to_string())
        }
    }
}

impl From<GeometryUnready> for PipelineError {
    fn from(_: GeometryUnready) -> Self {
        PipelineError::GeometryUnready
    }
}
