//! Zoner Bitmap (BMI) file header.

use crate::error::{Result, ZmfError};
use crate::io::stream::StreamReader;

/// The 9-byte ASCII signature of a BMI file.
pub const BMI_SIGNATURE: &[u8; 9] = b"ZonerBMIa";

/// Kind of data an offset-table entry points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BmiStreamType {
    Unknown,
    Bitmap,
    EndOfFile,
}

/// One entry of the BMI offset table.
///
/// `end` is the start of the following entry; the last entry's end is
/// undefined and left at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BmiOffset {
    pub stream_type: BmiStreamType,
    pub start: u32,
    pub end: u32,
}

/// Top-level header of a BMI file.
#[derive(Debug, Clone, Default)]
pub struct BmiHeader {
    signature: Vec<u8>,
    size: u32,
    start_offset: u64,
    width: u32,
    height: u32,
    is_palette_mode: bool,
    color_depth: u32,
    offsets: Vec<BmiOffset>,
}

impl BmiHeader {
    /// Read the header at the reader's current position.
    ///
    /// Structural violations (bad color depth, bad offset count) fail with
    /// [`ZmfError::InvalidHeader`]; a wrong signature does not, and is
    /// reported by [`BmiHeader::is_supported`].
    pub fn load(reader: &mut StreamReader<'_>) -> Result<Self> {
        let start_offset = reader.tell();

        let signature = reader.read_bytes(BMI_SIGNATURE.len())?;

        let width = u32::from(reader.read_u16()?);
        let height = u32::from(reader.read_u16()?);

        let is_palette_mode = reader.read_u16()? != 0;

        let color_depth = u32::from(reader.read_u16()?);
        if !matches!(color_depth, 1 | 4 | 8 | 24) {
            return Err(ZmfError::InvalidHeader(format!(
                "invalid color depth {}",
                color_depth
            )));
        }

        reader.skip(2)?;

        let offset_count = reader.read_u16()?;
        if offset_count == 0 || offset_count > 6 {
            return Err(ZmfError::InvalidHeader(format!(
                "invalid offset count {}",
                offset_count
            )));
        }

        let mut header = BmiHeader {
            signature,
            size: 0,
            start_offset,
            width,
            height,
            is_palette_mode,
            color_depth,
            offsets: Vec::new(),
        };

        if header.is_palette_mode {
            reader.skip(4 * u64::from(header.palette_color_count()))?;
        }

        header.read_offsets(reader, offset_count)?;

        Ok(header)
    }

    /// Whether the signature matches a Zoner Bitmap file.
    pub fn is_supported(&self) -> bool {
        self.signature == BMI_SIGNATURE
    }

    /// Overall header size recorded by the END_OF_FILE offset entry.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Absolute offset the header was read at; offset-table entries are
    /// relative to it.
    pub fn start_offset(&self) -> u64 {
        self.start_offset
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_palette_mode(&self) -> bool {
        self.is_palette_mode
    }

    pub fn color_depth(&self) -> u32 {
        self.color_depth
    }

    /// Number of palette entries reserved in the header, zero unless in
    /// palette mode.
    pub fn palette_color_count(&self) -> u32 {
        if self.is_palette_mode {
            1 << self.color_depth
        } else {
            0
        }
    }

    /// The offset table, sorted by start and deduplicated.
    pub fn offsets(&self) -> &[BmiOffset] {
        &self.offsets
    }

    fn read_offsets(&mut self, reader: &mut StreamReader<'_>, offset_count: u16) -> Result<()> {
        for _ in 0..offset_count {
            let raw_type = reader.read_u16()?;
            let start = reader.read_u32()?;

            let stream_type = match raw_type {
                0x1 => BmiStreamType::Bitmap,
                0xff => {
                    self.size = start;
                    BmiStreamType::EndOfFile
                }
                _ => BmiStreamType::Unknown,
            };

            self.offsets.push(BmiOffset {
                stream_type,
                start,
                end: 0,
            });
        }

        self.offsets.sort_by_key(|off| off.start);
        self.offsets.dedup();

        for i in 0..self.offsets.len().saturating_sub(1) {
            self.offsets[i].end = self.offsets[i + 1].start;
        }

        Ok(())
    }

    /// Majority-reconcile the header width with the two bitmap widths.
    pub fn reconcile_width(&mut self, color_width: &mut u32, transparency_width: &mut u32) -> bool {
        reconcile_value(&mut self.width, color_width, transparency_width)
    }

    /// Majority-reconcile the header height with the two bitmap heights.
    pub fn reconcile_height(
        &mut self,
        color_height: &mut u32,
        transparency_height: &mut u32,
    ) -> bool {
        reconcile_value(&mut self.height, color_height, transparency_height)
    }
}

/// Resolve three values by majority: if at least two agree, the outlier is
/// overwritten.  Fails when all three differ.
fn reconcile_value(v1: &mut u32, v2: &mut u32, v3: &mut u32) -> bool {
    if v1 == v2 {
        if v2 != v3 {
            *v3 = *v1;
        }
    } else if v1 == v3 {
        *v2 = *v1;
    } else if v2 == v3 {
        *v1 = *v2;
    } else {
        return false;
    }
    true
}
