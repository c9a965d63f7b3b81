//! Background capture thread.

use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{
    CameraFormat, CameraIndex, FrameFormat as NokhwaFrameFormat, RequestedFormat,
    RequestedFormatType,
};
use nokhwa::Camera;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::SyncSender;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use super::frame_utils::{convert_to_rgb, mirror_horizontal};
use super::types::{CameraError, CameraSettings, Frame, Resolution};

/// Stream parameters negotiated with the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamInfo {
    pub resolution: Resolution,
    pub fps: u32,
}

/// Open the camera, report the negotiated format on `ready`, then keep the
/// latest decoded frame in `latest` until `stop` is set.
pub fn run_capture_loop(
    settings: CameraSettings,
    latest: Arc<Mutex<Option<Frame>>>,
    stop: Arc<AtomicBool>,
    ready: SyncSender<Result<StreamInfo, CameraError>>,
) {
    let index = CameraIndex::Index(settings.device_index);

    let mut camera = match open_camera_with_fallback(&index, &settings) {
        Ok(cam) => cam,
        Err(e) => {
            let _ = ready.send(Err(e));
            return;
        }
    };

    if let Err(e) = camera.open_stream() {
        let _ = ready.send(Err(classify_error(&e.to_string(), CameraError::StreamFailed)));
        return;
    }

    let res = camera.resolution();
    let info = StreamInfo {
        resolution: Resolution {
            width: res.width(),
            height: res.height(),
        },
        fps: camera.frame_rate(),
    };
    log::info!(
        "camera stream open: {}x{} @ {} fps (requested {}x{})",
        info.resolution.width,
        info.resolution.height,
        info.fps,
        settings.resolution.width,
        settings.resolution.height
    );
    let _ = ready.send(Ok(info));

    let mut decode_failures = 0u32;
    while !stop.load(Ordering::Relaxed) {
        if let Ok(raw) = camera.frame() {
            match convert_to_rgb(&raw) {
                Some(mut frame) => {
                    if settings.mirror {
                        mirror_horizontal(&mut frame);
                    }
                    if let Ok(mut slot) = latest.lock() {
                        *slot = Some(frame);
                    }
                }
                None => {
                    decode_failures += 1;
                    if decode_failures == 1 || decode_failures % 100 == 0 {
                        log::warn!("dropped undecodable camera frame ({} so far)", decode_failures);
                    }
                }
            }
        }

        thread::sleep(Duration::from_millis(1));
    }

    let _ = camera.stop_stream();
    log::info!("camera stream closed");
}

/// Try the requested format first, then progressively looser ones.
fn open_camera_with_fallback(
    index: &CameraIndex,
    settings: &CameraSettings,
) -> Result<Camera, CameraError> {
    let closest = |format: NokhwaFrameFormat| {
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(CameraFormat::new(
            nokhwa::utils::Resolution::new(settings.resolution.width, settings.resolution.height),
            format,
            settings.fps,
        )))
    };
    let attempts = [
        closest(NokhwaFrameFormat::MJPEG),
        closest(NokhwaFrameFormat::NV12),
        closest(NokhwaFrameFormat::YUYV),
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestResolution),
    ];

    let mut last_error = String::from("no capture format accepted");
    for requested in attempts {
        match Camera::new(index.clone(), requested) {
            Ok(cam) => return Ok(cam),
            Err(e) => {
                log::debug!("camera format attempt failed: {}", e);
                last_error = e.to_string();
            }
        }
    }

    Err(classify_error(&last_error, CameraError::OpenFailed))
}

/// Sort a backend error message into access-denied, missing, or generic.
fn classify_error(message: &str, generic: fn(String) -> CameraError) -> CameraError {
    let msg = message.to_lowercase();
    if msg.contains("permission")
        || msg.contains("denied")
        || msg.contains("authorization")
        || msg.contains("not authorized")
    {
        CameraError::PermissionDenied
    } else if msg.contains("no device") || msg.contains("not found") {
        CameraError::NoDevices
    } else {
        generic(message.to_string())
    }
}
