//! Camera frame type

/// Decoded RGB camera frame
#[derive(Debug, Clone)]
pub struct CameraFrame {
    /// RGB pixel data (width * height * 3)
    pub data: Vec<u8>,
    /// Frame width
    pub width: u32,
    /// Frame height
    pub height: u32,
    /// Capture timestamp (nanoseconds)
    pub timestamp_ns: u64,
    /// Frame sequence number
    pub sequence: u32,
}

impl CameraFrame {
    /// Create a frame from raw RGB data
    pub fn new(data: Vec<u8>, width: u32, height: u32, timestamp_ns: u64, sequence: u32) -> Self {
        Self {
            data,
            width,
            height,
            timestamp_ns,
            sequence,
        }
    }

    /// Whether the buffer length matches the declared dimensions
    pub fn is_well_formed(&self) -> bool {
        self.data.len() == (self.width as usize) * (self.height as usize) * 3
    }

    /// Pixel at (x, y), or `None` when out of bounds
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y * self.width + x) * 3) as usize;
        Some([self.data[idx], self.data[idx + 1], self.data[idx + 2]])
    }
}
