//! Zoner Bitmap (BMI) decoder.
//!
//! A BMI file stores one or two bitmaps behind an offset table: the color
//! bitmap and, optionally, a binary transparency mask.  Pixel data is
//! packed row-wise, split into zlib-compressed blocks.  The decoder
//! re-encodes the result as an 8-bit RGBA PNG.

use std::io::Read;

use tracing::debug;

use crate::error::{Result, ZmfError};
use crate::io::bmi::header::{BmiHeader, BmiOffset, BmiStreamType};
use crate::io::stream::StreamReader;
use crate::io::zmf::collector::Collector;
use crate::sink::DrawingSink;
use crate::types::{Color, Image, PageSettings, Point};

/// Convert a pixel count to inches at the format's nominal 72 dpi.
fn px2in(px: u32) -> f64 {
    f64::from(px) / 72.0
}

/// A decoded bitmap: one [`Color`] per pixel, row-major.
#[derive(Debug, Clone, Default)]
struct ColorBitmap {
    width: u32,
    height: u32,
    data: Vec<Color>,
}

/// Location and pixel layout of one bitmap inside the file.
#[derive(Debug, Clone, Copy)]
struct BitmapHeader {
    width: u32,
    height: u32,
    color_depth: u32,
    start_offset: u64,
    end_offset: u64,
}

impl BitmapHeader {
    /// Read the per-bitmap sub-header addressed by an offset-table entry.
    fn load(
        reader: &mut StreamReader<'_>,
        header: &BmiHeader,
        offset: &BmiOffset,
    ) -> Result<Self> {
        reader.seek(header.start_offset() + u64::from(offset.start))?;
        let end_offset = header.start_offset() + u64::from(offset.end);

        let width = u32::from(reader.read_u16()?);
        let height = u32::from(reader.read_u16()?);

        // The raw depth is coerced to the next supported depth.
        let raw_depth = reader.read_u16()?;
        let color_depth = if raw_depth <= 1 {
            1
        } else if raw_depth <= 4 {
            4
        } else if raw_depth <= 8 {
            8
        } else {
            24
        };

        let start_offset = reader.tell() + 10;

        Ok(BitmapHeader {
            width,
            height,
            color_depth,
            start_offset,
            end_offset,
        })
    }
}

/// Decoder for the BMI bitmap format.
pub struct BmiParser<'r, 'a> {
    reader: &'r mut StreamReader<'a>,
    header: BmiHeader,
}

impl<'r, 'a> BmiParser<'r, 'a> {
    /// Create a decoder reading from the current stream position.
    pub fn new(reader: &'r mut StreamReader<'a>) -> Self {
        Self {
            reader,
            header: BmiHeader::default(),
        }
    }

    /// The file header; meaningful after [`BmiParser::read_image`].
    pub fn header(&self) -> &BmiHeader {
        &self.header
    }

    /// Parse a standalone BMI file as a one-page, one-layer document.
    pub fn parse(&mut self, sink: &mut dyn DrawingSink) -> bool {
        let image = match self.read_image() {
            Ok(image) => image,
            Err(err) => {
                debug!("bitmap parse failed: {err}");
                return false;
            }
        };

        if image.is_empty() {
            return false;
        }

        let mut collector = Collector::new(sink);

        collector.start_document();
        collector.start_page(&PageSettings::new(8.5, 11.0, 0.0, 0.0));
        collector.start_layer();

        collector.collect_image(
            &image,
            &Point::ZERO,
            px2in(self.header.width()),
            px2in(self.header.height()),
            0.0,
            false,
            false,
        );

        collector.end_layer();
        collector.end_page();
        collector.end_document();

        true
    }

    /// Decode the bitmap at the current position into a PNG image.
    ///
    /// Soft failures (unsupported header, missing data, dimension mismatch)
    /// return an empty image; stream exhaustion propagates as an error.
    pub fn read_image(&mut self) -> Result<Image> {
        match BmiHeader::load(self.reader) {
            Ok(header) if header.is_supported() => self.header = header,
            Ok(_) => return Ok(Image::default()),
            Err(ZmfError::InvalidHeader(_)) => return Ok(Image::default()),
            Err(err) => return Err(err),
        }

        let mut bitmap_header: Option<BitmapHeader> = None;
        let mut transparency_header: Option<BitmapHeader> = None;

        for offset in self.header.offsets().to_vec() {
            if offset.stream_type == BmiStreamType::Bitmap {
                if bitmap_header.is_none() {
                    bitmap_header = Some(BitmapHeader::load(self.reader, &self.header, &offset)?);
                } else if transparency_header.is_none() {
                    transparency_header =
                        Some(BitmapHeader::load(self.reader, &self.header, &offset)?);
                }
            }
        }

        let Some(mut bitmap_header) = bitmap_header else {
            return Ok(Image::default());
        };

        if let Some(transparency_header) = transparency_header.as_mut() {
            if !self.reconcile_dimensions(&mut bitmap_header, transparency_header) {
                debug!("bitmap dimensions cannot be reconciled");
                return Ok(Image::default());
            }
        }

        let bitmap = self.read_color_bitmap(&bitmap_header)?;
        let transparency = match transparency_header {
            Some(header) => self.read_color_bitmap(&header)?,
            None => ColorBitmap::default(),
        };

        if bitmap.width == 0 || bitmap.height == 0 || bitmap.data.is_empty() {
            return Ok(Image::default());
        }

        match make_png(&bitmap, &transparency) {
            Ok(data) => Ok(Image::new(bitmap.width, bitmap.height, data)),
            Err(err) => {
                debug!("PNG encoding failed: {err}");
                Ok(Image::default())
            }
        }
    }

    /// Decode one packed bitmap into per-pixel colors.
    fn read_color_bitmap(&mut self, hdr: &BitmapHeader) -> Result<ColorBitmap> {
        let mut bitmap = ColorBitmap {
            width: hdr.width,
            height: hdr.height,
            data: Vec::new(),
        };

        self.reader.seek(hdr.start_offset)?;

        let palette = if hdr.color_depth < 24 {
            self.read_color_palette(hdr.color_depth)?
        } else {
            Vec::new()
        };

        let data = self.read_data(hdr.end_offset)?;

        // Row stride: packed bits rounded up to whole bytes, padded to a
        // multiple of 4.
        let line_bit_count = bitmap.width as usize * hdr.color_depth as usize;
        let mut line_width = line_bit_count / 8;
        if line_bit_count % 8 != 0 {
            line_width += 1;
        }
        let mut padding = 0;
        while (line_width + padding) % 4 != 0 {
            padding += 1;
        }
        line_width += padding;

        let shift = 8 - hdr.color_depth.min(8);
        let mask = (0xffu32 >> shift) << shift;

        if data.len() < bitmap.height as usize * line_width {
            return Ok(ColorBitmap::default());
        }

        bitmap
            .data
            .reserve(bitmap.width as usize * bitmap.height as usize);

        let mut i = 0;

        for _row in 0..bitmap.height {
            let mut col = 0;

            while col < bitmap.width {
                if hdr.color_depth == 24 {
                    let blue = data[i];
                    let green = data[i + 1];
                    let red = data[i + 2];
                    i += 3;

                    bitmap.data.push(Color::new(red, green, blue));

                    col += 1;
                } else {
                    let mut indexes = u32::from(data[i]);
                    i += 1;
                    for _ in 0..8 / hdr.color_depth {
                        let index = ((indexes & mask) >> shift) as usize;

                        bitmap.data.push(palette[index]);

                        indexes = (indexes << hdr.color_depth) & 0xff;

                        col += 1;
                        if col == bitmap.width {
                            break;
                        }
                    }
                }
            }

            i += padding;
        }

        Ok(bitmap)
    }

    /// Inflate the zlib block sequence between the current position and
    /// `end_offset`.
    ///
    /// Each block carries its own compression state.  A block that fails to
    /// inflate abandons the whole data.
    fn read_data(&mut self, end_offset: u64) -> Result<Vec<u8>> {
        let mut data = Vec::new();

        while self.reader.tell() < end_offset {
            let block_size = self.reader.read_u16()?;

            self.reader.skip(1)?;

            let compressed = self.reader.read_bytes(usize::from(block_size))?;

            if !inflate_block(&compressed, &mut data) {
                debug!("failed to inflate bitmap block");
                data.clear();
                break;
            }
        }

        Ok(data)
    }

    /// Read `2^depth` palette entries of 4 bytes each (BGR + reserved).
    fn read_color_palette(&mut self, color_depth: u32) -> Result<Vec<Color>> {
        let color_count = 1usize << color_depth;

        let mut colors = Vec::with_capacity(color_count);
        for _ in 0..color_count {
            let blue = self.reader.read_u8()?;
            let green = self.reader.read_u8()?;
            let red = self.reader.read_u8()?;
            self.reader.skip(1)?;
            colors.push(Color::new(red, green, blue));
        }

        Ok(colors)
    }

    fn reconcile_dimensions(
        &mut self,
        color: &mut BitmapHeader,
        transparency: &mut BitmapHeader,
    ) -> bool {
        self.header
            .reconcile_width(&mut color.width, &mut transparency.width)
            && self
                .header
                .reconcile_height(&mut color.height, &mut transparency.height)
    }
}

/// Inflate one zlib block with a fresh decompression state, appending to
/// `out`.  Returns false when the block is corrupt or inflates to nothing.
fn inflate_block(compressed: &[u8], out: &mut Vec<u8>) -> bool {
    let mut decoder = flate2::read::ZlibDecoder::new(compressed);
    let mut inflated = Vec::new();
    match decoder.read_to_end(&mut inflated) {
        Ok(n) if n > 0 => {
            out.extend_from_slice(&inflated);
            true
        }
        _ => false,
    }
}

/// Re-encode a decoded bitmap as an 8-bit RGBA, non-interlaced PNG.
///
/// A non-empty transparency bitmap supplies a binary alpha channel: alpha
/// is 0 wherever its red channel is nonzero.
fn make_png(bitmap: &ColorBitmap, transparency: &ColorBitmap) -> Result<Vec<u8>> {
    let mut output = Vec::new();

    let mut encoder = png::Encoder::new(&mut output, bitmap.width, bitmap.height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder
        .write_header()
        .map_err(|e| ZmfError::Encoding(e.to_string()))?;

    let has_transparency = !transparency.data.is_empty();

    let mut pixels = Vec::with_capacity(bitmap.data.len() * 4);
    for (i, color) in bitmap.data.iter().enumerate() {
        pixels.push(color.red);
        pixels.push(color.green);
        pixels.push(color.blue);
        let opaque =
            !has_transparency || transparency.data.get(i).map_or(true, |c| c.red == 0);
        pixels.push(if opaque { 255 } else { 0 });
    }

    writer
        .write_image_data(&pixels)
        .map_err(|e| ZmfError::Encoding(e.to_string()))?;
    writer
        .finish()
        .map_err(|e| ZmfError::Encoding(e.to_string()))?;

    Ok(output)
}
