/// Pixel format requested from the device.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelFormat {
    Jpeg,
    Yuyv,
}

/// Configuration for camera capture.
#[derive(Clone, Debug)]
pub struct CameraConfig {
    index: usize,
    width: u32,
    height: u32,
    fps: u32,
    buffer_count: u32,
    format: PixelFormat,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            index: 0,
            width: 640,
            height: 480,
            fps: 30,
            buffer_count: 4,
            format: PixelFormat::Jpeg,
        }
    }
}

impl CameraConfig {
    /// Set the camera index (`/dev/video<index>` on Linux).
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    /// Set the capture width in pixels.
    pub fn with_width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    /// Set the capture height in pixels.
    pub fn with_height(mut self, height: u32) -> Self {
        self.height = height;
        self
    }

    /// Set the target frames per second.
    pub fn with_fps(mut self, fps: u32) -> Self {
        self.fps = fps;
        self
    }

    /// Set the buffer count for the capture stream.
    pub fn with_buffer_count(mut self, buffer_count: u32) -> Self {
        self.buffer_count = buffer_count;
        self
    }

    /// Set the preferred pixel format.
    pub fn with_format(mut self, format: PixelFormat) -> Self {
        self.format = format;
        self
    }

    // Getters
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn buffer_count(&self) -> u32 {
        self.buffer_count
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Device node for the configured index.
    pub fn device_path(&self) -> String {
        format!("/dev/video{}", self.index)
    }
}
