//! Builders assembling synthetic Zoner files byte by byte.

#![allow(dead_code)]

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;

/// Id value denoting "no id" on the wire.
pub const NO_ID: u32 = 0xffffffff;

/// Micrometers per inch.
pub const UM_PER_INCH: u32 = 25400;

/// Convert inches to the format's micrometer unit.
pub fn in2um(inches: f64) -> i32 {
    (inches * f64::from(UM_PER_INCH)).round() as i32
}

/// Builder for one tagged object of a drawing file.
pub struct ZmfObject {
    tag: u8,
    id: u32,
    body: Vec<u8>,
    refs: Vec<(u32, u32)>,
}

impl ZmfObject {
    pub fn new(tag: u8) -> Self {
        Self {
            tag,
            id: NO_ID,
            body: Vec::new(),
            refs: Vec::new(),
        }
    }

    pub fn id(mut self, id: u32) -> Self {
        self.id = id;
        self
    }

    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Append an (id, tag) entry to the trailing reference list.
    pub fn reference(mut self, id: u32, tag: u32) -> Self {
        self.refs.push((id, tag));
        self
    }

    /// Serialize: 28-byte prelude, body, then the reference list (all ids
    /// first, then all tags).
    pub fn build(&self) -> Vec<u8> {
        let size = 28 + self.body.len() + 8 * self.refs.len();

        let mut out = Vec::with_capacity(size);
        out.extend_from_slice(&(size as u32).to_le_bytes());
        out.push(self.tag);
        out.extend_from_slice(&[0u8; 7]);
        out.extend_from_slice(&(self.refs.len() as u32).to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&[0u8; 4]);
        out.extend_from_slice(&self.id.to_le_bytes());
        out.extend_from_slice(&self.body);
        for (id, _) in &self.refs {
            out.extend_from_slice(&id.to_le_bytes());
        }
        for (_, tag) in &self.refs {
            out.extend_from_slice(&tag.to_le_bytes());
        }
        out
    }
}

/// Assemble a drawing file: 40-byte header followed by the given objects.
pub fn zmf_document(objects: &[Vec<u8>]) -> Vec<u8> {
    let mut data = vec![0u8; 40];
    data[8..12].copy_from_slice(&0x12345678u32.to_le_bytes());
    data[28..32].copy_from_slice(&(objects.len() as u32).to_le_bytes());
    data[32..36].copy_from_slice(&40u32.to_le_bytes()); // content start
    data[36..40].copy_from_slice(&0u32.to_le_bytes()); // no preview

    for object in objects {
        data.extend_from_slice(object);
    }

    data
}

/// Document settings object: page size and content offsets in inches,
/// background color as RGB.
pub fn doc_settings(
    width_in: f64,
    height_in: f64,
    left_in: f64,
    top_in: f64,
    color: (u8, u8, u8),
) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&[0u8; 32]);
    body.extend_from_slice(&[color.0, color.1, color.2]);
    body.extend_from_slice(&[0u8; 5]);
    body.extend_from_slice(&(in2um(width_in) as u32).to_le_bytes());
    body.extend_from_slice(&(in2um(height_in) as u32).to_le_bytes());
    body.extend_from_slice(&[0u8; 68]);
    body.extend_from_slice(&(in2um(left_in) as u32).to_le_bytes());
    body.extend_from_slice(&(in2um(top_in) as u32).to_le_bytes());

    ZmfObject::new(0x27).body(body).build()
}

/// A bounding box body: 8 reserved bytes plus 4 corner points in inches.
pub fn bbox_bytes(points_in: &[(f64, f64); 4]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&[0u8; 8]);
    for &(x, y) in points_in {
        out.extend_from_slice(&in2um(x).to_le_bytes());
        out.extend_from_slice(&in2um(y).to_le_bytes());
    }
    out
}

/// Marker object with an empty body (page/layer/group delimiters).
pub fn marker(tag: u8) -> Vec<u8> {
    ZmfObject::new(tag).build()
}

/// Rectangle object from its bounding-box corners.
pub fn rectangle(points_in: &[(f64, f64); 4]) -> Vec<u8> {
    ZmfObject::new(0x32).body(bbox_bytes(points_in)).build()
}

/// Rectangle object carrying style references.
pub fn rectangle_with_refs(points_in: &[(f64, f64); 4], refs: &[(u32, u32)]) -> Vec<u8> {
    let mut object = ZmfObject::new(0x32).body(bbox_bytes(points_in));
    for &(id, tag) in refs {
        object = object.reference(id, tag);
    }
    object.build()
}

/// Ellipse object: bounding box, begin/end angles, inverted closed byte.
pub fn ellipse(
    points_in: &[(f64, f64); 4],
    begin_angle: f32,
    end_angle: f32,
    closed_byte: u8,
) -> Vec<u8> {
    let mut body = bbox_bytes(points_in);
    body.extend_from_slice(&begin_angle.to_le_bytes());
    body.extend_from_slice(&end_angle.to_le_bytes());
    body.push(closed_byte);

    ZmfObject::new(0x33).body(body).build()
}

/// Polygon object: bounding box, peak count, and the peak curve template
/// with LINE sections.
pub fn polygon(points_in: &[(f64, f64); 4], peaks: u32, peak_points: &[(f32, f32)]) -> Vec<u8> {
    let mut body = bbox_bytes(points_in);
    body.extend_from_slice(&peaks.to_le_bytes());
    body.extend_from_slice(&(peak_points.len() as u32).to_le_bytes());
    body.extend_from_slice(&[0u8; 8]);
    for &(x, y) in peak_points {
        body.extend_from_slice(&x.to_le_bytes());
        body.extend_from_slice(&y.to_le_bytes());
    }
    for _ in 0..peak_points.len().saturating_sub(1) {
        body.extend_from_slice(&1u32.to_le_bytes());
    }
    body.extend_from_slice(&0x64u32.to_le_bytes());

    ZmfObject::new(0x34).body(body).build()
}

/// Pen object with solid dash bits (no pattern) and the given width.
pub fn pen(id: u32, width_in: f64, color: (u8, u8, u8), refs: &[(u32, u32)]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&[0u8; 12]);
    body.extend_from_slice(&0u32.to_le_bytes()); // join: miter
    body.extend_from_slice(&0u32.to_le_bytes()); // cap: butt
    body.extend_from_slice(&[0u8; 4]);
    body.extend_from_slice(&(in2um(width_in) as u32).to_le_bytes());
    body.extend_from_slice(&[0u8; 4]);
    body.extend_from_slice(&[color.0, color.1, color.2]);
    body.extend_from_slice(&[0u8; 17]);
    body.extend_from_slice(&[0xff; 6]); // all bits set: solid stroke
    body.extend_from_slice(&0u16.to_le_bytes());

    let mut object = ZmfObject::new(0xc).id(id).body(body);
    for &(ref_id, tag) in refs {
        object = object.reference(ref_id, tag);
    }
    object.build()
}

/// Text object: one paragraph per entry, each a list of spans given as
/// (font id, text).
pub fn text(id: u32, paragraphs: &[Vec<(u32, &str)>]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&[0u8; 12]);
    body.extend_from_slice(&(paragraphs.len() as u32).to_le_bytes());
    body.extend_from_slice(&[0u8; 4]);

    for spans in paragraphs {
        body.extend_from_slice(&(spans.len() as u32).to_le_bytes());
        body.extend_from_slice(&NO_ID.to_le_bytes()); // paragraph style id
        body.extend_from_slice(&[0u8; 4]);
    }

    for spans in paragraphs {
        for (font_id, content) in spans {
            let length = content.encode_utf16().count() as u32;
            body.extend_from_slice(&length.to_le_bytes());
            body.extend_from_slice(&[0u8; 4]);
            body.extend_from_slice(&font_id.to_le_bytes());
        }
    }

    for spans in paragraphs {
        for (_, content) in spans {
            for unit in content.encode_utf16() {
                body.extend_from_slice(&unit.to_le_bytes());
            }
        }
    }

    ZmfObject::new(0x12).id(id).body(body).build()
}

/// Text frame object referencing a text by id.
pub fn text_frame(points_in: &[(f64, f64); 4], flags: u8, text_id: u32) -> Vec<u8> {
    let mut body = bbox_bytes(points_in);
    body.push(flags);

    ZmfObject::new(0x3a).body(body).reference(text_id, 6).build()
}

/// zlib-compress a payload.
pub fn zlib_compress(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).expect("compression failed");
    encoder.finish().expect("compression failed")
}

/// One bitmap section of a BMI file.
pub struct BmiBitmap {
    pub width: u16,
    pub height: u16,
    pub depth: u16,
    /// Uncompressed packed pixel rows (stride padded to 4 bytes).
    pub payload: Vec<u8>,
    /// Palette entries as raw 4-byte BGR0 records, present for depth < 24.
    pub palette: Vec<u8>,
}

impl BmiBitmap {
    /// Section bytes: sub-header, palette, one compressed block.
    fn build(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&self.width.to_le_bytes());
        out.extend_from_slice(&self.height.to_le_bytes());
        out.extend_from_slice(&self.depth.to_le_bytes());
        out.extend_from_slice(&[0u8; 10]);
        out.extend_from_slice(&self.palette);

        let compressed = zlib_compress(&self.payload);
        out.extend_from_slice(&(compressed.len() as u16).to_le_bytes());
        out.push(0);
        out.extend_from_slice(&compressed);
        out
    }
}

/// Packed pixel rows for a depth-24 bitmap of a single color (BGR order,
/// stride padded to a multiple of 4).
pub fn solid_rgb_payload(width: usize, height: usize, color: (u8, u8, u8)) -> Vec<u8> {
    let stride = (width * 3).div_ceil(4) * 4;
    let mut payload = Vec::with_capacity(stride * height);
    for _ in 0..height {
        for _ in 0..width {
            payload.push(color.2);
            payload.push(color.1);
            payload.push(color.0);
        }
        payload.resize(payload.len() + (stride - width * 3), 0);
    }
    payload
}

/// Assemble a BMI file: header, offset table, bitmap sections, and the
/// END_OF_FILE entry recording the total size.
pub fn bmi_file(header_width: u16, header_height: u16, depth: u16, bitmaps: &[BmiBitmap]) -> Vec<u8> {
    let offset_table_len = 6 * (bitmaps.len() + 1);
    let sections: Vec<Vec<u8>> = bitmaps.iter().map(BmiBitmap::build).collect();

    let mut data = Vec::new();
    data.extend_from_slice(b"ZonerBMIa");
    data.extend_from_slice(&header_width.to_le_bytes());
    data.extend_from_slice(&header_height.to_le_bytes());
    data.extend_from_slice(&0u16.to_le_bytes()); // palette mode off
    data.extend_from_slice(&depth.to_le_bytes());
    data.extend_from_slice(&[0, 0]);
    data.extend_from_slice(&((bitmaps.len() + 1) as u16).to_le_bytes());

    let mut start = (data.len() + offset_table_len) as u32;
    for section in &sections {
        data.extend_from_slice(&1u16.to_le_bytes());
        data.extend_from_slice(&start.to_le_bytes());
        start += section.len() as u32;
    }
    data.extend_from_slice(&0xffu16.to_le_bytes());
    data.extend_from_slice(&start.to_le_bytes());

    for section in &sections {
        data.extend_from_slice(section);
    }

    data
}
