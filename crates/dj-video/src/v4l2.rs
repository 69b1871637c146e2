use crate::{CameraConfig, CameraError, FrameSource, PixelFormat, VideoData, VideoFrame};
use dj_base::Vec2;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use v4l::buffer::Type;
use v4l::io::mmap::Stream as MmapStream;
use v4l::io::traits::CaptureStream;
use v4l::video::Capture;
use v4l::{Device, Format, FourCC};

type FrameResult = Result<VideoFrame, CameraError>;

// delay before reopening the device after a capture failure
const WAIT_BEFORE_REOPEN: Duration = Duration::from_millis(100);

/// Negotiated stream parameters.
#[derive(Clone, Copy, Debug)]
struct Negotiated {
    size: Vec2<usize>,
    format: PixelFormat,
}

/// V4L2 webcam.
///
/// The device is opened and configured in `new()`, so a missing or
/// unusable camera is reported at startup. Capture runs on a dedicated
/// thread that feeds a bounded channel; the thread stops when the camera is
/// dropped.
pub struct V4l2Camera {
    config: CameraConfig,
    negotiated: Negotiated,
    device: Option<Device>,
    receiver: Option<mpsc::Receiver<FrameResult>>,
    cancel: Arc<AtomicBool>,
    thread_handle: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for V4l2Camera {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("V4l2Camera")
            .field("config", &self.config)
            .field("negotiated", &self.negotiated)
            .field("running", &self.thread_handle.is_some())
            .finish()
    }
}

impl FrameSource for V4l2Camera {
    async fn recv(&mut self) -> Result<VideoFrame, CameraError> {
        self.ensure_started()?;

        let receiver = self
            .receiver
            .as_mut()
            .ok_or_else(|| CameraError::Channel("Receiver not initialized".to_string()))?;

        receiver
            .recv()
            .await
            .ok_or_else(|| CameraError::Channel("Channel closed".to_string()))?
    }
}

impl Drop for V4l2Camera {
    fn drop(&mut self) {
        self.cancel.store(true, Ordering::Relaxed);

        // dropping the receiver unblocks a pending send in the capture thread
        drop(self.receiver.take());

        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
        log::debug!("camera {} released", self.config.device_path());
    }
}

impl V4l2Camera {
    /// Open and configure the camera.
    ///
    /// # Errors
    ///
    /// Returns `CameraError::Device` if the device cannot be opened or
    /// accepts neither MJPEG nor YUYV.
    pub fn new(config: CameraConfig) -> Result<Self, CameraError> {
        let (device, negotiated) = Self::open_device(&config)?;
        log::info!(
            "camera {} opened: {}x{} {:?} @ {} fps",
            config.device_path(),
            negotiated.size.x,
            negotiated.size.y,
            negotiated.format,
            config.fps()
        );

        Ok(Self {
            config,
            negotiated,
            device: Some(device),
            receiver: None,
            cancel: Arc::new(AtomicBool::new(false)),
            thread_handle: None,
        })
    }

    fn open_device(config: &CameraConfig) -> Result<(Device, Negotiated), CameraError> {
        let device = Device::new(config.index())?;

        let fourcc = match config.format() {
            PixelFormat::Jpeg => FourCC::new(b"MJPG"),
            PixelFormat::Yuyv => FourCC::new(b"YUYV"),
        };
        let actual = Capture::set_format(
            &device,
            &Format::new(config.width(), config.height(), fourcc),
        )?;

        // the driver may substitute another format
        let format = match &actual.fourcc.repr {
            b"MJPG" => PixelFormat::Jpeg,
            b"YUYV" => PixelFormat::Yuyv,
            _ => {
                return Err(CameraError::Device(format!(
                    "unsupported pixel format: {}",
                    actual.fourcc
                )));
            }
        };

        let params = v4l::video::capture::Parameters::with_fps(config.fps());
        Capture::set_params(&device, &params)?;

        Ok((
            device,
            Negotiated {
                size: Vec2::new(actual.width as usize, actual.height as usize),
                format,
            },
        ))
    }

    /// Start the capture thread if not already running.
    ///
    /// Called automatically on the first `recv()`.
    fn ensure_started(&mut self) -> Result<(), CameraError> {
        if self.receiver.is_some() {
            return Ok(());
        }

        let device = self
            .device
            .take()
            .ok_or_else(|| CameraError::Device("Device already consumed".to_string()))?;

        let (tx, rx) = mpsc::channel(self.config.buffer_count() as usize);
        let config = self.config.clone();
        let negotiated = self.negotiated;
        let cancel = Arc::clone(&self.cancel);

        let handle = thread::spawn(move || Self::capture_thread(device, config, negotiated, tx, cancel));

        self.receiver = Some(rx);
        self.thread_handle = Some(handle);
        Ok(())
    }

    /// Capture until cancelled, reopening the device after stream failures.
    fn capture_thread(
        mut device: Device,
        config: CameraConfig,
        mut negotiated: Negotiated,
        tx: mpsc::Sender<FrameResult>,
        cancel: Arc<AtomicBool>,
    ) {
        while !cancel.load(Ordering::Relaxed) {
            match Self::capture_loop(&device, negotiated, config.buffer_count(), &tx, &cancel) {
                Ok(()) => return, // receiver gone or cancelled
                Err(e) => {
                    log::warn!("camera capture failed: {}", e);
                    if tx.blocking_send(Err(e)).is_err() {
                        return;
                    }
                }
            }

            // reopen the device, staying in the loop until it comes back
            while !cancel.load(Ordering::Relaxed) {
                thread::sleep(WAIT_BEFORE_REOPEN);
                log::info!("camera: reopening {}", config.device_path());
                if let Ok((new_device, new_negotiated)) = Self::open_device(&config) {
                    device = new_device;
                    negotiated = new_negotiated;
                    break;
                }
            }
        }
    }

    fn capture_loop(
        device: &Device,
        negotiated: Negotiated,
        buffer_count: u32,
        tx: &mpsc::Sender<FrameResult>,
        cancel: &AtomicBool,
    ) -> Result<(), CameraError> {
        let mut stream = MmapStream::with_buffers(device, Type::VideoCapture, buffer_count)
            .map_err(|e| CameraError::Stream(e.to_string()))?;

        while !cancel.load(Ordering::Relaxed) {
            let (buffer, _metadata) =
                CaptureStream::next(&mut stream).map_err(|e| CameraError::Stream(e.to_string()))?;

            // the buffer is only valid until the next call
            let bytes = buffer.to_vec();
            let data = match negotiated.format {
                PixelFormat::Jpeg => VideoData::Jpeg(bytes),
                PixelFormat::Yuyv => VideoData::Yuyv(bytes),
            };
            let frame = VideoFrame {
                data,
                size: negotiated.size,
                captured_at: Instant::now(),
            };

            if tx.blocking_send(Ok(frame)).is_err() {
                break;
            }
        }

        Ok(())
    }

    /// Get a reference to the configuration.
    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    /// Resolution the device actually delivers.
    pub fn size(&self) -> Vec2<usize> {
        self.negotiated.size
    }
}
