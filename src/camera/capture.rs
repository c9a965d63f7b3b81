//! Camera capture handle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use super::capture_loop::{run_capture_loop, StreamInfo};
use super::source::FrameSource;
use super::types::{CameraError, CameraSettings, Frame, Resolution};

/// A nokhwa camera running on its own thread.
///
/// The worker owns the device and overwrites a single shared slot with each
/// decoded frame, so readers always see the newest one and never queue up.
/// Dropping the handle stops the worker and releases the device.
pub struct CameraCapture {
    settings: CameraSettings,
    latest: Arc<Mutex<Option<Frame>>>,
    stop: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
    /// What the device agreed to, once the stream is open
    stream: Option<StreamInfo>,
}

impl std::fmt::Debug for CameraCapture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraCapture")
            .field("settings", &self.settings)
            .field("stream", &self.stream)
            .field("is_running", &self.is_running())
            .finish_non_exhaustive()
    }
}

impl CameraCapture {
    /// The device is not touched until [`start`](Self::start).
    pub fn new(settings: CameraSettings) -> Self {
        Self {
            settings,
            latest: Arc::new(Mutex::new(None)),
            stop: Arc::new(AtomicBool::new(false)),
            worker: None,
            stream: None,
        }
    }

    pub fn settings(&self) -> &CameraSettings {
        &self.settings
    }

    /// Resolution the camera actually delivers; `None` before `start()`.
    pub fn actual_resolution(&self) -> Option<Resolution> {
        self.stream.map(|s| s.resolution)
    }

    pub fn actual_fps(&self) -> Option<u32> {
        self.stream.map(|s| s.fps)
    }

    /// Spawn the worker and block until it has opened the stream or failed.
    ///
    /// # Errors
    /// * `CameraError::AlreadyRunning` - capture is already running
    /// * `CameraError::PermissionDenied` - the OS refused camera access
    /// * `CameraError::NoDevices` / `OpenFailed` / `StreamFailed` - device missing or busy
    pub fn start(&mut self) -> Result<(), CameraError> {
        if self.is_running() {
            return Err(CameraError::AlreadyRunning);
        }
        self.stop.store(false, Ordering::SeqCst);

        let (ready_tx, ready_rx) = mpsc::sync_channel(1);
        let latest = Arc::clone(&self.latest);
        let stop = Arc::clone(&self.stop);
        let settings = self.settings.clone();

        let worker = std::thread::Builder::new()
            .name("camera-capture".to_string())
            .spawn(move || run_capture_loop(settings, latest, stop, ready_tx))
            .map_err(|e| CameraError::StreamFailed(e.to_string()))?;
        self.worker = Some(worker);

        let outcome = ready_rx.recv().unwrap_or_else(|_| {
            Err(CameraError::StreamFailed(
                "capture thread exited before opening the stream".to_string(),
            ))
        });
        match outcome {
            Ok(info) => {
                self.stream = Some(info);
                Ok(())
            }
            Err(e) => {
                self.stop();
                Err(e)
            }
        }
    }

    /// Stop the worker and wait for it to release the device.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::warn!("camera capture thread panicked");
            }
        }
    }

    /// Newest decoded frame, or `None` if nothing has arrived yet.
    pub fn frame(&self) -> Option<Frame> {
        self.latest.lock().ok()?.clone()
    }

    pub fn is_running(&self) -> bool {
        self.worker.as_ref().is_some_and(|w| !w.is_finished())
    }
}

impl FrameSource for CameraCapture {
    fn resolution(&self) -> Option<Resolution> {
        self.actual_resolution()
    }

    fn latest_frame(&mut self) -> Option<Frame> {
        self.frame()
    }
}

impl Drop for CameraCapture {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_handle_is_idle() {
        let camera = CameraCapture::new(CameraSettings::default());
        assert!(!camera.is_running());
        assert!(camera.actual_resolution().is_none());
        assert!(camera.actual_fps().is_none());
        assert!(camera.frame().is_none());
    }

    #[test]
    fn test_stop_without_start_is_harmless() {
        let mut camera = CameraCapture::new(CameraSettings::default());
        camera.stop();
        camera.stop();
        assert!(!camera.is_running());
    }
}
