//! Decoded raster image.

/// A decoded image, re-encoded as PNG.
#[derive(Debug, Clone, Default)]
pub struct Image {
    pub width: u32,
    pub height: u32,
    /// Encoded PNG bytes.
    pub data: Vec<u8>,
}

impl Image {
    /// Create a new image.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        Image {
            width,
            height,
            data,
        }
    }

    /// Whether the image holds no pixel data.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        assert!(Image::default().is_empty());
        assert!(!Image::new(1, 1, vec![0x89]).is_empty());
    }
}
