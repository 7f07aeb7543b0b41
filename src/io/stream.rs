//! Byte stream abstraction and typed little-endian reads.
//!
//! All parsers consume an [`InputStream`] through a [`StreamReader`], which
//! provides the typed reads of the wire formats.  Reads never return partial
//! data: either the full requested size is returned or
//! [`ZmfError::EndOfStream`] is raised.

use std::io::{Cursor, Read, SeekFrom};

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{Result, ZmfError};

/// Abstraction over the byte source feeding the parsers.
///
/// Mirrors the stream contract of the host application: a flat byte
/// sequence, or a structured container exposing named sub-streams.
pub trait InputStream {
    /// Read up to `buf.len()` bytes; returns the number actually read.
    /// A short read signals end of stream.
    fn read(&mut self, buf: &mut [u8]) -> usize;

    /// Seek to a position; returns the new absolute offset.
    fn seek(&mut self, pos: SeekFrom) -> Result<u64>;

    /// Current absolute offset.
    fn tell(&self) -> u64;

    /// Whether the cursor is at (or past) the end of the data.
    fn is_end(&self) -> bool;

    /// Whether this stream is a structured container with sub-streams.
    fn is_structured(&self) -> bool {
        false
    }

    /// Whether a sub-stream with the given name exists.
    fn exists_sub_stream(&self, _name: &str) -> bool {
        false
    }

    /// Open a sub-stream by name.
    fn sub_stream_by_name(&mut self, _name: &str) -> Option<Box<dyn InputStream>> {
        None
    }
}

/// A flat in-memory stream.
#[derive(Debug, Clone)]
pub struct MemoryStream {
    cursor: Cursor<Vec<u8>>,
}

impl MemoryStream {
    /// Create a stream over the given bytes.
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            cursor: Cursor::new(data),
        }
    }

    /// Length of the underlying data.
    pub fn len(&self) -> u64 {
        self.cursor.get_ref().len() as u64
    }

    /// Whether the stream holds no data.
    pub fn is_empty(&self) -> bool {
        self.cursor.get_ref().is_empty()
    }
}

impl InputStream for MemoryStream {
    fn read(&mut self, buf: &mut [u8]) -> usize {
        self.cursor.read(buf).unwrap_or(0)
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        let len = i128::from(self.len());
        let target = match pos {
            SeekFrom::Start(p) => i128::from(p),
            SeekFrom::Current(d) => i128::from(self.cursor.position()) + i128::from(d),
            SeekFrom::End(d) => len + i128::from(d),
        };
        // A seek outside the data is a failed seek, not a clamp.
        if target < 0 || target > len {
            return Err(ZmfError::EndOfStream);
        }
        self.cursor.set_position(target as u64);
        Ok(target as u64)
    }

    fn tell(&self) -> u64 {
        self.cursor.position()
    }

    fn is_end(&self) -> bool {
        self.cursor.position() >= self.len()
    }
}

/// Typed little-endian reader over an [`InputStream`].
pub struct StreamReader<'a> {
    input: &'a mut dyn InputStream,
}

impl<'a> StreamReader<'a> {
    /// Wrap an input stream.
    pub fn new(input: &'a mut dyn InputStream) -> Self {
        Self { input }
    }

    /// Access the underlying stream.
    pub fn input(&mut self) -> &mut dyn InputStream {
        self.input
    }

    /// Read exactly `n` bytes.
    pub fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        // Guard against absurd allocations from corrupt data.
        if n > 16 * 1024 * 1024 {
            return Err(ZmfError::InvalidFormat(format!(
                "Requested byte read of {} exceeds 16 MB sanity limit",
                n
            )));
        }
        let mut buf = vec![0u8; n];
        let got = self.input.read(&mut buf);
        if got != n {
            return Err(ZmfError::EndOfStream);
        }
        Ok(buf)
    }

    /// Read a u8.
    pub fn read_u8(&mut self) -> Result<u8> {
        let mut buf = [0u8; 1];
        if self.input.read(&mut buf) != 1 {
            return Err(ZmfError::EndOfStream);
        }
        Ok(buf[0])
    }

    /// Read a little-endian u16.
    pub fn read_u16(&mut self) -> Result<u16> {
        let mut buf = [0u8; 2];
        if self.input.read(&mut buf) != 2 {
            return Err(ZmfError::EndOfStream);
        }
        Ok(LittleEndian::read_u16(&buf))
    }

    /// Read a little-endian u32.
    pub fn read_u32(&mut self) -> Result<u32> {
        let mut buf = [0u8; 4];
        if self.input.read(&mut buf) != 4 {
            return Err(ZmfError::EndOfStream);
        }
        Ok(LittleEndian::read_u32(&buf))
    }

    /// Read a little-endian u64.
    pub fn read_u64(&mut self) -> Result<u64> {
        let mut buf = [0u8; 8];
        if self.input.read(&mut buf) != 8 {
            return Err(ZmfError::EndOfStream);
        }
        Ok(LittleEndian::read_u64(&buf))
    }

    /// Read a little-endian i32.
    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(self.read_u32()? as i32)
    }

    /// Read a little-endian IEEE-754 f32 by bit reinterpretation.
    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_bits(self.read_u32()?))
    }

    /// Skip `n` bytes forward.
    pub fn skip(&mut self, n: u64) -> Result<()> {
        if self.input.is_end() && n > 0 {
            return Err(ZmfError::EndOfStream);
        }
        self.input.seek(SeekFrom::Current(n as i64))?;
        Ok(())
    }

    /// Seek to an absolute position.
    pub fn seek(&mut self, pos: u64) -> Result<()> {
        self.input.seek(SeekFrom::Start(pos))?;
        Ok(())
    }

    /// Current absolute offset.
    pub fn tell(&self) -> u64 {
        self.input.tell()
    }

    /// Whether the stream is exhausted.
    pub fn is_end(&self) -> bool {
        self.input.is_end()
    }

    /// Total stream length.
    ///
    /// Falls back to exhaustive reading when the end-seek is unsupported.
    pub fn length(&mut self) -> Result<u64> {
        let begin = self.input.tell();

        let end = match self.input.seek(SeekFrom::End(0)) {
            Ok(end) => end,
            Err(_) => {
                // End-seek not supported, use the harder way.
                let mut buf = [0u8; 4096];
                while !self.input.is_end() {
                    if self.input.read(&mut buf) == 0 {
                        break;
                    }
                }
                self.input.tell()
            }
        };

        if end < begin {
            return Err(ZmfError::EndOfStream);
        }

        self.input.seek(SeekFrom::Start(begin))?;
        Ok(end - begin)
    }
}
