use {dj_base::Vec2, std::time::Instant};

/// Encoded pixel payload of a captured frame.
#[derive(Debug, Clone, PartialEq)]
pub enum VideoData {
    /// MJPEG frame, one complete JPEG image.
    Jpeg(Vec<u8>),
    /// Packed YUV 4:2:2, 2 bytes per pixel.
    Yuyv(Vec<u8>),
}

impl VideoData {
    /// Numeric tag used on the detector wire protocol.
    pub fn format_tag(&self) -> u32 {
        match self {
            VideoData::Jpeg(_) => 0,
            VideoData::Yuyv(_) => 1,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        match self {
            VideoData::Jpeg(data) | VideoData::Yuyv(data) => data,
        }
    }
}

/// A captured video frame.
#[derive(Debug, Clone)]
pub struct VideoFrame {
    pub data: VideoData,
    /// Width and height in pixels.
    pub size: Vec2<usize>,
    /// Monotonic capture time.
    pub captured_at: Instant,
}
