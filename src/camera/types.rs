//! Camera types and data structures.

use std::time::Instant;

/// Camera resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    /// Preferred capture resolution (1280x720).
    pub const HD: Resolution = Resolution {
        width: 1280,
        height: 720,
    };

    /// Width / height, or `None` while either side is zero.
    pub fn aspect(&self) -> Option<f32> {
        if self.width == 0 || self.height == 0 {
            None
        } else {
            Some(self.width as f32 / self.height as f32)
        }
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self::HD
    }
}

/// Pixel format of a captured frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameFormat {
    /// RGB format (3 bytes per pixel)
    Rgb,
}

/// A captured camera frame.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Raw pixel data in RGB format, row-major
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: FrameFormat,
    /// When the frame was captured
    pub timestamp: Instant,
}

impl Frame {
    /// Wrap tightly packed RGB bytes.
    pub fn rgb(data: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            data,
            width,
            height,
            format: FrameFormat::Rgb,
            timestamp: Instant::now(),
        }
    }

    /// A frame filled with a single color.
    pub fn solid(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let pixels = width as usize * height as usize;
        let data = rgb.iter().copied().cycle().take(pixels * 3).collect();
        Self::rgb(data, width, height)
    }

    /// Get the number of bytes per pixel (3 for RGB).
    pub fn bytes_per_pixel(&self) -> usize {
        match self.format {
            FrameFormat::Rgb => 3,
        }
    }

    pub fn resolution(&self) -> Resolution {
        Resolution {
            width: self.width,
            height: self.height,
        }
    }

    /// True when the frame has a size and enough bytes to cover it.
    pub fn is_complete(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.data.len() >= self.width as usize * self.height as usize * self.bytes_per_pixel()
    }
}

/// Which way the requested camera faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    /// Front camera pointed at the user; frames are mirrored (selfie view).
    #[default]
    User,
    /// Rear camera; frames are shown as captured.
    Environment,
}

impl Facing {
    pub fn name(&self) -> &'static str {
        match self {
            Facing::User => "user",
            Facing::Environment => "environment",
        }
    }
}

impl std::str::FromStr for Facing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "user" | "front" => Ok(Facing::User),
            "environment" | "back" | "rear" => Ok(Facing::Environment),
            other => Err(format!("unknown camera facing '{}'", other)),
        }
    }
}

/// What the pipeline asks of the camera when it starts a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamConstraints {
    pub preferred_width: u32,
    pub preferred_height: u32,
    pub facing: Facing,
}

impl Default for StreamConstraints {
    fn default() -> Self {
        Self {
            preferred_width: Resolution::HD.width,
            preferred_height: Resolution::HD.height,
            facing: Facing::User,
        }
    }
}

/// Settings for camera capture.
#[derive(Debug, Clone)]
pub struct CameraSettings {
    /// Camera device index
    pub device_index: u32,
    /// Requested capture resolution
    pub resolution: Resolution,
    /// Target FPS (actual may vary)
    pub fps: u32,
    /// Mirror horizontally (selfie mode)
    pub mirror: bool,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            device_index: 0,
            resolution: Resolution::default(),
            fps: 30,
            mirror: true,
        }
    }
}

impl From<&StreamConstraints> for CameraSettings {
    fn from(c: &StreamConstraints) -> Self {
        Self {
            resolution: Resolution {
                width: c.preferred_width,
                height: c.preferred_height,
            },
            mirror: c.facing == Facing::User,
            ..Self::default()
        }
    }
}

/// Errors that can occur during camera operations.
#[derive(Debug, thiserror::Error)]
pub enum CameraError {
    /// No cameras found on the system
    #[error("No cameras found")]
    NoDevices,
    /// Failed to open camera
    #[error("Failed to open camera: {0}")]
    OpenFailed(String),
    /// Camera permission denied by the OS
    #[error(
        "Camera permission denied. Allow camera access for this terminal in your system privacy settings"
    )]
    PermissionDenied,
    /// Failed to start video stream
    #[error("Failed to start camera stream: {0}")]
    StreamFailed(String),
    /// Capture thread is already running
    #[error("Capture thread is already running")]
    AlreadyRunning,
}

impl CameraError {
    /// Whether the OS refused access (as opposed to the device being busy or missing).
    pub fn is_access_denied(&self) -> bool {
        matches!(self, CameraError::PermissionDenied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_default_is_hd() {
        let res = Resolution::default();
        assert_eq!(res.width, 1280);
        assert_eq!(res.height, 720);
    }

    #[test]
    fn test_resolution_aspect() {
        assert_eq!(Resolution { width: 0, height: 720 }.aspect(), None);
        let aspect = Resolution::HD.aspect().unwrap();
        assert!((aspect - 16.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn test_default_constraints() {
        let c = StreamConstraints::default();
        assert_eq!(c.preferred_width, 1280);
        assert_eq!(c.preferred_height, 720);
        assert_eq!(c.facing, Facing::User);
    }

    #[test]
    fn test_settings_from_constraints() {
        let user = CameraSettings::from(&StreamConstraints::default());
        assert!(user.mirror);
        assert_eq!(user.resolution, Resolution::HD);

        let rear = CameraSettings::from(&StreamConstraints {
            facing: Facing::Environment,
            ..StreamConstraints::default()
        });
        assert!(!rear.mirror);
    }

    #[test]
    fn test_camera_error_display() {
        assert_eq!(format!("{}", CameraError::NoDevices), "No cameras found");
        assert_eq!(
            format!("{}", CameraError::OpenFailed("test".to_string())),
            "Failed to open camera: test"
        );
        assert!(format!("{}", CameraError::PermissionDenied).contains("permission denied"));
        assert!(CameraError::PermissionDenied.is_access_denied());
        assert!(!CameraError::NoDevices.is_access_denied());
    }

    #[test]
    fn test_facing_from_str() {
        assert_eq!("user".parse::<Facing>().unwrap(), Facing::User);
        assert_eq!("Environment".parse::<Facing>().unwrap(), Facing::Environment);
        assert!("sideways".parse::<Facing>().is_err());
        assert_eq!(Facing::Environment.name(), "environment");
    }

    #[test]
    fn test_frame_helpers() {
        let frame = Frame::solid(2, 1, [1, 2, 3]);
        assert_eq!(frame.data, vec![1, 2, 3, 1, 2, 3]);
        assert_eq!(frame.bytes_per_pixel(), 3);
        assert!(frame.is_complete());

        let short = Frame::rgb(vec![0; 5], 2, 1);
        assert!(!short.is_complete());
    }
}
