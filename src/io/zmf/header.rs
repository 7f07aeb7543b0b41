//! Zoner Draw version-4/5 document header.

use crate::error::Result;
use crate::io::stream::StreamReader;

const ZMF_SIGNATURE: u32 = 0x12345678;

/// The fixed-layout document header of a drawing file.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZmfHeader {
    signature: u32,
    object_count: u32,
    start_content_offset: u32,
    start_bitmap_offset: u32,
}

impl ZmfHeader {
    /// Read the header from the start of the stream.
    ///
    /// A wrong signature leaves the remaining fields unread; it is reported
    /// by [`ZmfHeader::is_supported`], not as an error.
    pub fn load(reader: &mut StreamReader<'_>) -> Result<Self> {
        let mut header = ZmfHeader::default();

        reader.seek(8)?;
        header.signature = reader.read_u32()?;

        if !header.is_supported() {
            return Ok(header);
        }

        reader.seek(28)?;
        header.object_count = reader.read_u32()?;
        header.start_content_offset = reader.read_u32()?;
        header.start_bitmap_offset = reader.read_u32()?;

        Ok(header)
    }

    /// Whether the signature identifies a version-4/5 drawing file.
    pub fn is_supported(&self) -> bool {
        self.signature == ZMF_SIGNATURE
    }

    pub fn object_count(&self) -> u32 {
        self.object_count
    }

    /// Offset of the first content object.
    pub fn start_content_offset(&self) -> u32 {
        self.start_content_offset
    }

    /// Offset of the preview bitmap, zero when absent.
    pub fn start_bitmap_offset(&self) -> u32 {
        self.start_bitmap_offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::stream::MemoryStream;

    fn header_bytes(signature: u32) -> Vec<u8> {
        let mut data = vec![0u8; 40];
        data[8..12].copy_from_slice(&signature.to_le_bytes());
        data[28..32].copy_from_slice(&7u32.to_le_bytes());
        data[32..36].copy_from_slice(&40u32.to_le_bytes());
        data[36..40].copy_from_slice(&0u32.to_le_bytes());
        data
    }

    #[test]
    fn test_load_supported() {
        let mut stream = MemoryStream::new(header_bytes(0x12345678));
        let mut reader = StreamReader::new(&mut stream);
        let header = ZmfHeader::load(&mut reader).unwrap();
        assert!(header.is_supported());
        assert_eq!(header.object_count(), 7);
        assert_eq!(header.start_content_offset(), 40);
        assert_eq!(header.start_bitmap_offset(), 0);
    }

    #[test]
    fn test_wrong_signature_unsupported() {
        let mut stream = MemoryStream::new(header_bytes(0x87654321));
        let mut reader = StreamReader::new(&mut stream);
        let header = ZmfHeader::load(&mut reader).unwrap();
        assert!(!header.is_supported());
    }

    #[test]
    fn test_truncated_header_fails() {
        let mut stream = MemoryStream::new(vec![0u8; 10]);
        let mut reader = StreamReader::new(&mut stream);
        assert!(ZmfHeader::load(&mut reader).is_err());
    }
}
