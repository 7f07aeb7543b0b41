//! Parser for the Zoner Draw version-4/5 drawing format.
//!
//! The format is a self-describing stream of tagged objects.  Resource
//! objects (fills, pens, fonts, ...) populate id tables; shape objects
//! resolve their style through trailing reference lists and are forwarded
//! to the [`Collector`].

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use crate::error::{Result, ZmfError};
use crate::io::bmi::BmiParser;
use crate::io::stream::{InputStream, StreamReader};
use crate::io::zmf::collector::Collector;
use crate::io::zmf::header::ZmfHeader;
use crate::io::zmf::object::{ObjectHeader, ObjectKind, ObjectRef, NO_ID};
use crate::sink::DrawingSink;
use crate::types::{
    almost_zero, um2in, Arrow, ArrowRef, BoundingBox, Cell, Color, Column, Curve, CurveType,
    Fill, Font, FontFormatFlags, Gradient, GradientStop, GradientType, HorizontalAlignment,
    Image, ImageFill, LineCapType, LineJoinType, PageSettings, Paragraph, ParagraphStyle, Pen,
    Point, Row, Shadow, Span, Style, Table, Text, TextFrameFlags, Transparency,
    VerticalAlignment,
};

/// How curve points are encoded on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PointEncoding {
    /// Signed 32-bit micrometers, converted to inches.
    Micrometers,
    /// Raw IEEE-754 f32 pairs in shape-local units.
    Unscaled,
}

/// Copy a table entry out by reference id.
fn get_by_ref_id<T: Clone>(id: u32, table: &IndexMap<u32, T>, what: &str) -> Option<T> {
    if id == NO_ID {
        return None;
    }
    match table.get(&id) {
        Some(value) => Some(value.clone()),
        None => {
            debug!("{} with id {:#x} not found", what, id);
            None
        }
    }
}

/// Parser for version-4/5 drawing documents.
pub struct ZmfParser<'a, 's> {
    reader: StreamReader<'a>,
    input_length: u64,
    collector: Collector<'s>,
    page_settings: PageSettings,
    page_number: u32,
    current_header: ObjectHeader,
    pens: IndexMap<u32, Pen>,
    fills: IndexMap<u32, Fill>,
    transparencies: IndexMap<u32, Transparency>,
    shadows: IndexMap<u32, Shadow>,
    arrows: IndexMap<u32, ArrowRef>,
    images: IndexMap<u32, Image>,
    fonts: IndexMap<u32, Font>,
    paragraph_styles: IndexMap<u32, ParagraphStyle>,
    texts: IndexMap<u32, Text>,
}

impl<'a, 's> ZmfParser<'a, 's> {
    /// Create a parser over the given input, emitting to the given sink.
    pub fn new(input: &'a mut dyn InputStream, sink: &'s mut dyn DrawingSink) -> Self {
        let mut pens = IndexMap::new();
        let mut fills = IndexMap::new();

        // Fill with id 0x3 is used by default for text (black).
        fills.insert(0x3, Fill::Solid(Color::BLACK));

        // Pen with id 0x1 is used for borders in table cells, rows, and
        // columns when they have no border.
        let mut pen = Pen::new(Color::WHITE);
        pen.is_invisible = true;
        pens.insert(0x1, pen);

        Self {
            reader: StreamReader::new(input),
            input_length: 0,
            collector: Collector::new(sink),
            page_settings: PageSettings::default(),
            page_number: 0,
            current_header: ObjectHeader::default(),
            pens,
            fills,
            transparencies: IndexMap::new(),
            shadows: IndexMap::new(),
            arrows: IndexMap::new(),
            images: IndexMap::new(),
            fonts: IndexMap::new(),
            paragraph_styles: IndexMap::new(),
            texts: IndexMap::new(),
        }
    }

    /// Parse the whole document.
    ///
    /// Returns false on any hard decode failure.  The sink always observes
    /// a well-formed (possibly empty) document: open layers, pages, and the
    /// document itself are closed before returning.
    pub fn parse(&mut self) -> bool {
        match self.parse_document() {
            Ok(()) => true,
            Err(err) => {
                debug!("drawing parse failed: {}", err);
                self.collector.end_document();
                false
            }
        }
    }

    fn parse_document(&mut self) -> Result<()> {
        self.input_length = self.reader.length()?;

        let header = ZmfHeader::load(&mut self.reader)?;
        if !header.is_supported() {
            return Err(ZmfError::InvalidHeader(
                "not a version-4/5 drawing".to_string(),
            ));
        }

        self.collector.start_document();

        if header.start_bitmap_offset() > 0 {
            self.reader.seek(u64::from(header.start_bitmap_offset()))?;
            self.read_preview_bitmap()?;
        } else {
            self.reader.seek(u64::from(header.start_content_offset()))?;
        }

        self.read_document_settings()?;

        while !self.reader.is_end() {
            self.read_page()?;
        }

        self.collector.end_document();

        Ok(())
    }

    fn read_object_header(&mut self) -> Result<ObjectHeader> {
        let start_offset = self.reader.tell();

        let size = self.reader.read_u32()?;
        let kind = ObjectKind::from_tag(self.reader.read_u8()?);

        self.reader.skip(7)?;

        let ref_obj_count = self.reader.read_u32()?;
        let ref_list_start_offset = self.reader.read_u32()?;

        if size == 0
            || u64::from(size) > self.input_length - start_offset
            || u64::from(ref_list_start_offset) >= u64::from(size)
            || u64::from(ref_obj_count) > u64::from(size - ref_list_start_offset) / 8
        {
            debug!("incorrect object header, offset {}", start_offset);
            return Err(ZmfError::Parse(format!(
                "incorrect object header at offset {}",
                start_offset
            )));
        }

        self.reader.skip(4)?;

        let id = match self.reader.read_u32()? {
            NO_ID => None,
            id => Some(id),
        };

        Ok(ObjectHeader {
            kind,
            size,
            next_object_offset: start_offset + u64::from(size),
            id,
            ref_obj_count,
            ref_list_start: if ref_list_start_offset > 0 {
                start_offset + u64::from(ref_list_start_offset)
            } else {
                0
            },
        })
    }

    /// Read the current object's trailing reference list: all ids first,
    /// then all tags.  Entries without an id are dropped.
    fn read_object_refs(&mut self) -> Result<Vec<ObjectRef>> {
        let header = self.current_header;

        let ref_count = u64::from(header.ref_obj_count);
        if ref_count == 0 {
            return Ok(Vec::new());
        }

        let list_start = if header.ref_list_start > 0 {
            header.ref_list_start
        } else {
            header.next_object_offset - 8 * ref_count
        };
        self.reader.seek(list_start)?;

        let mut ids = Vec::with_capacity(ref_count as usize);
        for _ in 0..ref_count {
            ids.push(self.reader.read_u32()?);
        }

        let mut refs = Vec::with_capacity(ref_count as usize);
        for id in ids {
            let tag = self.reader.read_u32()?;
            if id != NO_ID {
                refs.push(ObjectRef { id, tag });
            }
        }

        Ok(refs)
    }

    fn fill_by_ref_id(&self, id: u32) -> Option<Fill> {
        get_by_ref_id(id, &self.fills, "fill")
    }

    fn pen_by_ref_id(&self, id: u32) -> Option<Pen> {
        get_by_ref_id(id, &self.pens, "pen")
    }

    fn shadow_by_ref_id(&self, id: u32) -> Option<Shadow> {
        get_by_ref_id(id, &self.shadows, "shadow")
    }

    fn transparency_by_ref_id(&self, id: u32) -> Option<Transparency> {
        get_by_ref_id(id, &self.transparencies, "transparency")
    }

    fn font_by_ref_id(&self, id: u32) -> Option<Font> {
        get_by_ref_id(id, &self.fonts, "font")
    }

    fn paragraph_style_by_ref_id(&self, id: u32) -> Option<ParagraphStyle> {
        get_by_ref_id(id, &self.paragraph_styles, "paragraph style")
    }

    fn text_by_ref_id(&self, id: u32) -> Option<Text> {
        get_by_ref_id(id, &self.texts, "text")
    }

    fn image_by_ref_id(&self, id: u32) -> Option<Image> {
        get_by_ref_id(id, &self.images, "image")
    }

    fn arrow_by_ref_id(&self, id: u32) -> Option<ArrowRef> {
        get_by_ref_id(id, &self.arrows, "arrow")
    }

    /// Resolve the current object's style references: tag 1 is the fill,
    /// 2 the pen, 3 the shadow, 4 the transparency.
    fn read_style(&mut self) -> Result<Style> {
        let refs = self.read_object_refs()?;

        let mut style = Style::default();

        for r in refs {
            match r.tag {
                1 => style.fill = self.fill_by_ref_id(r.id),
                2 => style.pen = self.pen_by_ref_id(r.id),
                3 => style.shadow = self.shadow_by_ref_id(r.id),
                4 => style.transparency = self.transparency_by_ref_id(r.id),
                _ => {}
            }
        }

        Ok(style)
    }

    /// Read a point stored as signed micrometers.
    fn read_point(&mut self) -> Result<Point> {
        let x = um2in(self.reader.read_i32()?);
        let y = um2in(self.reader.read_i32()?);
        Ok(Point::new(x, y))
    }

    /// Read a point stored as raw f32 pair.
    fn read_unscaled_point(&mut self) -> Result<Point> {
        let x = f64::from(self.reader.read_f32()?);
        let y = f64::from(self.reader.read_f32()?);
        Ok(Point::new(x, y))
    }

    fn read_bounding_box(&mut self) -> Result<BoundingBox> {
        // The stored width and height are not reliable (not updated when
        // resizing objects), so only the corner points are used.
        self.reader.skip(8)?;

        let mut points = Vec::with_capacity(4);
        for _ in 0..4 {
            points.push(self.read_point()?);
        }

        BoundingBox::new(points)
    }

    /// Read the section-type stream of one curve component, up to its
    /// 0x64 end marker.
    fn read_curve_section_types(&mut self, section_types: &mut Vec<CurveType>) -> Result<()> {
        loop {
            let section_type = self.reader.read_u32()?;
            match section_type {
                1 => section_types.push(CurveType::Line),
                2 => {
                    section_types.push(CurveType::BezierCurve);
                    self.reader.skip(8)?;
                }
                0x64 => return Ok(()),
                other => {
                    debug!("unknown curve section type {}", other);
                    section_types.push(CurveType::Line);
                }
            }
        }
    }

    /// Read a curve component block: per-component preludes, then all
    /// points, then all section-type streams.
    fn read_curve_components(&mut self, encoding: PointEncoding) -> Result<Vec<Curve>> {
        let component_count = self.reader.read_u32()?;
        if component_count == 0 || component_count > 10000 {
            debug!(
                "incorrect curve component count, offset {}",
                self.reader.tell()
            );
            return Ok(Vec::new());
        }

        let mut curves = Vec::with_capacity(component_count as usize);

        for _ in 0..component_count {
            self.reader.skip(8)?;

            let point_count = self.reader.read_u32()?;
            if point_count == 0 || point_count > 10000 {
                debug!("incorrect curve point count, offset {}", self.reader.tell());
                return Ok(Vec::new());
            }

            let closed = self.reader.read_u32()? != 0;

            curves.push(Curve {
                points: vec![Point::ZERO; point_count as usize],
                section_types: Vec::new(),
                closed,
            });
        }

        for curve in &mut curves {
            for i in 0..curve.points.len() {
                curve.points[i] = match encoding {
                    PointEncoding::Micrometers => {
                        let x = um2in(self.reader.read_i32()?);
                        let y = um2in(self.reader.read_i32()?);
                        Point::new(x, y)
                    }
                    PointEncoding::Unscaled => {
                        let x = f64::from(self.reader.read_f32()?);
                        let y = f64::from(self.reader.read_f32()?);
                        Point::new(x, y)
                    }
                };
            }
        }

        for i in 0..curves.len() {
            let mut section_types = std::mem::take(&mut curves[i].section_types);
            self.read_curve_section_types(&mut section_types)?;
            curves[i].section_types = section_types;
        }

        Ok(curves)
    }

    fn read_color(&mut self) -> Result<Color> {
        let red = self.reader.read_u8()?;
        let green = self.reader.read_u8()?;
        let blue = self.reader.read_u8()?;
        Ok(Color::new(red, green, blue))
    }

    fn read_gradient(&mut self, subtype: u32) -> Result<Gradient> {
        let mut gradient = Gradient::default();

        gradient.gradient_type = match subtype {
            2 => GradientType::Linear,
            3 => GradientType::Radial,
            4 => GradientType::Conical,
            5 => GradientType::Cross,
            6 => GradientType::Rectangular,
            7 => GradientType::Flexible,
            other => {
                debug!("unknown gradient type {}", other);
                GradientType::Linear
            }
        };

        self.reader.skip(4)?;

        let stop_count = self.reader.read_u32()?;
        if self.reader.tell() + 20 + u64::from(stop_count) * 16
            > self.current_header.next_object_offset
        {
            debug!("incorrect gradient stop count, offset {}", self.reader.tell());
            return Ok(gradient);
        }

        self.reader.skip(4)?;

        gradient.center.x = f64::from(self.reader.read_f32()?);
        gradient.center.y = f64::from(self.reader.read_f32()?);

        gradient.angle = f64::from(self.reader.read_f32()?);

        self.reader.skip(4)?;

        gradient.stops.reserve(stop_count as usize);
        for _ in 0..stop_count {
            self.reader.skip(4)?;
            let color = self.read_color()?;

            self.reader.skip(5)?;
            let offset = f64::from(self.reader.read_f32()?);

            gradient.stops.push(GradientStop { color, offset });
        }

        Ok(gradient)
    }

    fn read_preview_bitmap(&mut self) -> Result<()> {
        self.reader.skip(2)?;

        let size = self.reader.read_u32()?;

        self.reader.skip(u64::from(size).saturating_sub(2 + 4))?;

        Ok(())
    }

    fn read_document_settings(&mut self) -> Result<()> {
        let header = self.read_object_header()?;

        if header.kind != ObjectKind::DocumentSettings {
            return Err(ZmfError::Parse(
                "expected document settings object".to_string(),
            ));
        }

        self.reader.skip(32)?;

        let color = self.read_color()?;

        self.reader.skip(5)?;

        let page_width = um2in(self.reader.read_u32()?);
        let page_height = um2in(self.reader.read_u32()?);

        self.reader.skip(68)?;

        let left_offset = um2in(self.reader.read_u32()?);
        let top_offset = um2in(self.reader.read_u32()?);

        self.page_settings =
            PageSettings::with_color(page_width, page_height, left_offset, top_offset, color);

        self.reader.seek(header.next_object_offset)?;

        Ok(())
    }

    fn read_page(&mut self) -> Result<()> {
        // Skip color palettes; all used colors are included in the
        // fill/pen/... resource objects.
        let mut start_page_header;
        loop {
            start_page_header = self.read_object_header()?;
            if start_page_header.kind == ObjectKind::ColorPalette {
                self.reader.seek(start_page_header.next_object_offset)?;
            } else {
                break;
            }
        }

        if start_page_header.kind != ObjectKind::PageStart {
            return Err(ZmfError::Parse("expected page start object".to_string()));
        }

        self.page_number += 1;

        // The first page is an empty master page and is never emitted.
        if self.page_number == 1 {
            loop {
                self.reader.seek(start_page_header.next_object_offset)?;
                start_page_header = self.read_object_header()?;
                if start_page_header.kind == ObjectKind::PageStart {
                    break;
                }
            }
        }

        let page_settings = self.page_settings;
        self.collector.start_page(&page_settings);

        self.reader.seek(start_page_header.next_object_offset)?;

        loop {
            let header = self.read_object_header()?;

            match header.kind {
                ObjectKind::Guidelines => {
                    self.reader.seek(header.next_object_offset)?;
                }
                ObjectKind::PageEnd => {
                    self.collector.end_page();
                    if !self.reader.is_end() {
                        self.reader.seek(header.next_object_offset)?;
                    }
                    return Ok(());
                }
                ObjectKind::LayerStart => {
                    self.read_layer(header)?;
                }
                _ => {
                    return Err(ZmfError::Parse(format!(
                        "unexpected object {:?} in page",
                        header.kind
                    )));
                }
            }
        }
    }

    fn read_layer(&mut self, layer_start_header: ObjectHeader) -> Result<()> {
        if layer_start_header.kind != ObjectKind::LayerStart {
            return Err(ZmfError::Parse("expected layer start object".to_string()));
        }

        self.collector.start_layer();

        self.reader.seek(layer_start_header.next_object_offset)?;

        loop {
            self.current_header = self.read_object_header()?;

            match self.current_header.kind {
                ObjectKind::LayerEnd => {
                    self.reader.seek(self.current_header.next_object_offset)?;
                    self.collector.end_layer();
                    return Ok(());
                }
                ObjectKind::Fill => self.read_fill()?,
                ObjectKind::Transparency => self.read_transparency()?,
                ObjectKind::Pen => self.read_pen()?,
                ObjectKind::Shadow => self.read_shadow()?,
                ObjectKind::Arrow => self.read_arrow()?,
                ObjectKind::Font => self.read_font()?,
                ObjectKind::ParagraphStyle => self.read_paragraph_style()?,
                ObjectKind::Text => self.read_text()?,
                ObjectKind::Bitmap => self.read_bitmap()?,
                ObjectKind::Rectangle => self.read_rectangle()?,
                ObjectKind::Ellipse => self.read_ellipse()?,
                ObjectKind::Polygon => self.read_polygon()?,
                ObjectKind::Curve => self.read_curve()?,
                ObjectKind::Image => self.read_image()?,
                ObjectKind::TextFrame => self.read_text_frame()?,
                ObjectKind::Table => self.read_table()?,
                ObjectKind::GroupStart => self.collector.start_group(),
                ObjectKind::GroupEnd => self.collector.end_group(),
                _ => {}
            }

            // The bitmap reader adjusts the cursor itself.
            if self.current_header.kind != ObjectKind::Bitmap {
                self.reader.seek(self.current_header.next_object_offset)?;
            }
        }
    }

    fn read_fill(&mut self) -> Result<()> {
        let Some(id) = self.current_header.id else {
            debug!("fill without id, offset {}", self.reader.tell());
            return Ok(());
        };

        self.reader.skip(8)?;

        let subtype = self.reader.read_u32()?;

        if subtype == 1 {
            self.reader.skip(8)?;

            let color = self.read_color()?;

            self.fills.insert(id, Fill::Solid(color));
        } else if (2..=7).contains(&subtype) {
            let gradient = self.read_gradient(subtype)?;

            self.fills.insert(id, Fill::Gradient(gradient));
        } else if subtype == 8 {
            self.reader.skip(4)?;

            let tile = self.reader.read_u32()? != 0;
            let tile_width = um2in(self.reader.read_u32()?);
            let tile_height = um2in(self.reader.read_u32()?);

            let refs = self.read_object_refs()?;

            let mut image = None;
            for r in refs {
                match r.tag {
                    0 => image = self.image_by_ref_id(r.id),
                    other => debug!("unknown bitmap fill ref tag {}", other),
                }
            }

            let Some(image) = image else {
                debug!("image not found for bitmap fill id {:#x}", id);
                return Ok(());
            };

            self.fills.insert(
                id,
                Fill::Image(ImageFill {
                    image,
                    tile,
                    tile_width,
                    tile_height,
                }),
            );
        } else {
            debug!("unknown fill type {}", subtype);
        }

        Ok(())
    }

    fn read_transparency(&mut self) -> Result<()> {
        let Some(id) = self.current_header.id else {
            debug!("transparency without id, offset {}", self.reader.tell());
            return Ok(());
        };

        self.reader.skip(8)?;

        let subtype = self.reader.read_u32()?;

        if subtype == 1 {
            self.reader.skip(8)?;

            let color = self.read_color()?;

            self.transparencies.insert(id, Transparency { color });
        }

        Ok(())
    }

    fn read_pen(&mut self) -> Result<()> {
        let Some(id) = self.current_header.id else {
            debug!("pen without id, offset {}", self.reader.tell());
            return Ok(());
        };

        let mut pen = Pen::default();

        self.reader.skip(12)?;

        let line_join = self.reader.read_u32()?;
        pen.line_join_type = match line_join {
            0 => LineJoinType::Miter,
            1 => LineJoinType::Round,
            2 => LineJoinType::Bevel,
            other => {
                debug!("unknown line join type {}", other);
                LineJoinType::Miter
            }
        };

        let line_cap = self.reader.read_u32()?;
        pen.line_cap_type = match line_cap {
            0 => LineCapType::Butt,
            1 => LineCapType::Flat,
            2 => LineCapType::Round,
            3 => LineCapType::Pointed,
            other => {
                debug!("unknown line cap type {}", other);
                LineCapType::Butt
            }
        };

        self.reader.skip(4)?;

        pen.width = um2in(self.reader.read_u32()?);

        self.reader.skip(4)?;

        pen.color = self.read_color()?;

        self.reader.skip(17)?;

        let dash_bytes = self.reader.read_bytes(6)?;
        let dash_length = self.reader.read_u16()?;

        let mut dash_bits = [false; 48];
        for (i, byte) in dash_bytes.iter().enumerate() {
            for j in 0..8 {
                dash_bits[i * 8 + j] = (byte >> j) & 1 == 1;
            }
        }

        if dash_bits.iter().any(|bit| !bit) {
            // Sometimes the first bit of the 4th byte is set; the sink
            // cannot express complex patterns anyway, so 3 bytes of bits
            // are enough.  Bit 0 stays skipped for wire compatibility.
            let mut cur_length = 1i32;
            let mut prev = true;
            for bit in dash_bits.iter().take(24).skip(1) {
                if *bit != prev {
                    pen.dash_pattern.push(f64::from(cur_length));
                    cur_length = 0;
                }

                cur_length += 1;
                prev = *bit;
            }

            // The dash length covers all used dots, empty or not, at 1024
            // units per dot; the remainder is the trailing gap.
            let sum: i32 = pen.dash_pattern.iter().map(|&len| len as i32).sum();
            let mut dash_distance = i32::from(dash_length / 1024) - sum;
            if dash_distance < 1 {
                dash_distance = 1;
            }
            pen.dash_distance = f64::from(dash_distance);
        }

        let refs = self.read_object_refs()?;

        for r in refs {
            match r.tag {
                0 => pen.start_arrow = self.arrow_by_ref_id(r.id),
                1 => pen.end_arrow = self.arrow_by_ref_id(r.id),
                _ => {}
            }
        }

        self.pens.insert(id, pen);

        Ok(())
    }

    fn read_shadow(&mut self) -> Result<()> {
        let Some(id) = self.current_header.id else {
            debug!("shadow without id, offset {}", self.reader.tell());
            return Ok(());
        };

        let mut shadow = Shadow::default();

        self.reader.skip(8)?;

        let subtype = self.reader.read_u32()?;

        shadow.offset = self.read_point()?;
        shadow.angle = f64::from(self.reader.read_f32()?);

        match subtype {
            // Color and soft shadows carry a color; the soft variant adds
            // an opacity (the blur that follows is consumed but unused).
            1 | 3 => {
                self.reader.skip(4)?;

                shadow.color = self.read_color()?;

                if subtype == 3 {
                    self.reader.skip(5)?;

                    shadow.opacity = 1.0 - f64::from(self.reader.read_f32()?);
                }
            }
            // Brightness and transparent shadows carry only an opacity.
            2 | 4 => {
                shadow.opacity = 1.0 - f64::from(self.reader.read_f32()?);
            }
            other => {
                debug!("unknown shadow type {}", other);
            }
        }

        self.shadows.insert(id, shadow);

        Ok(())
    }

    fn read_arrow(&mut self) -> Result<()> {
        let Some(id) = self.current_header.id else {
            debug!("arrow without id, offset {}", self.reader.tell());
            return Ok(());
        };

        let mut arrow = Arrow::default();

        self.reader.skip(4)?;

        arrow.line_end_x = f64::from(self.reader.read_f32()?);

        self.reader.skip(12)?;

        arrow.curves = self.read_curve_components(PointEncoding::Unscaled)?;

        self.arrows.insert(id, Arc::new(arrow));

        Ok(())
    }

    fn read_bitmap(&mut self) -> Result<()> {
        let Some(id) = self.current_header.id else {
            debug!("bitmap without id, offset {}", self.reader.tell());
            // The layer loop does not reposition after bitmaps.
            self.reader.seek(self.current_header.next_object_offset)?;
            return Ok(());
        };

        self.reader.skip(4)?;

        let has_data = self.reader.read_u32()? != 0;

        self.reader.seek(self.current_header.next_object_offset)?;

        if has_data {
            let mut bmi_parser = BmiParser::new(&mut self.reader);

            let image = bmi_parser.read_image()?;
            let bmi_size = bmi_parser.header().size();

            if image.is_empty() {
                debug!("failed to parse bitmap, id {:#x}", id);
            } else {
                self.images.insert(id, image);
            }

            self.reader
                .seek(self.current_header.next_object_offset + u64::from(bmi_size))?;
        }

        Ok(())
    }

    fn read_image(&mut self) -> Result<()> {
        let bbox = self.read_bounding_box()?;

        let refs = self.read_object_refs()?;

        let mut image = None;
        for r in refs {
            if r.tag == 5 {
                image = self.image_by_ref_id(r.id);
            }
        }

        if let Some(image) = image {
            let style = self.read_style()?;
            self.collector.set_style(style);

            self.collector.collect_image(
                &image,
                &bbox.top_left(),
                bbox.width(),
                bbox.height(),
                bbox.rotation(),
                bbox.mirror_horizontal(),
                bbox.mirror_vertical(),
            );
        }

        Ok(())
    }

    fn read_font(&mut self) -> Result<()> {
        let Some(id) = self.current_header.id else {
            debug!("font without id, offset {}", self.reader.tell());
            return Ok(());
        };

        self.reader.skip(4)?;

        let mut font = Font::default();

        let format_flags = FontFormatFlags::from_bits_truncate(self.reader.read_u8()?);
        font.is_bold = format_flags.contains(FontFormatFlags::BOLD);
        font.is_italic = format_flags.contains(FontFormatFlags::ITALIC);

        self.reader.skip(3)?;

        font.size = f64::from(self.reader.read_f32()?);

        self.reader.skip(4)?;

        // 32-byte name field: 31 bytes of windows-1252 text, NUL-trimmed.
        let name_bytes = self.reader.read_bytes(32)?;
        let name_end = name_bytes[..31]
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(31);
        let (name, _, _) = encoding_rs::WINDOWS_1252.decode(&name_bytes[..name_end]);
        font.name = name.into_owned();

        let style = self.read_style()?;
        font.fill = style.fill;
        font.outline = style.pen;

        self.fonts.insert(id, font);

        Ok(())
    }

    fn read_paragraph_style(&mut self) -> Result<()> {
        let Some(id) = self.current_header.id else {
            debug!("paragraph style without id, offset {}", self.reader.tell());
            return Ok(());
        };

        self.reader.skip(4)?;

        let mut paragraph_style = ParagraphStyle::default();

        let align = self.reader.read_u8()?;
        paragraph_style.alignment = match align {
            0 => HorizontalAlignment::Left,
            1 => HorizontalAlignment::Right,
            2 => HorizontalAlignment::Block,
            3 => HorizontalAlignment::Center,
            4 => HorizontalAlignment::Full,
            other => {
                debug!("unknown paragraph alignment {}", other);
                HorizontalAlignment::Left
            }
        };

        self.reader.skip(3)?;

        paragraph_style.line_spacing = f64::from(self.reader.read_f32()?);

        let refs = self.read_object_refs()?;

        for r in refs {
            match r.tag {
                1 => {
                    if let Some(font) = self.font_by_ref_id(r.id) {
                        paragraph_style.font = font;
                    }
                }
                other => debug!("unknown paragraph ref tag {}", other),
            }
        }

        self.paragraph_styles.insert(id, paragraph_style);

        Ok(())
    }

    fn read_text(&mut self) -> Result<()> {
        let Some(id) = self.current_header.id else {
            debug!("text without id, offset {}", self.reader.tell());
            return Ok(());
        };

        self.reader.skip(12)?;

        let paragraph_count = self.reader.read_u32()?;
        if paragraph_count == 0 || paragraph_count > 1000 {
            debug!("incorrect paragraph count, offset {}", self.reader.tell());
            return Ok(());
        }

        let mut text = Text::default();
        text.paragraphs
            .resize_with(paragraph_count as usize, Paragraph::default);

        self.reader.skip(4)?;

        for paragraph in &mut text.paragraphs {
            let span_count = self.reader.read_u32()?;
            if span_count > 1000 {
                debug!("incorrect span count, offset {}", self.reader.tell());
                return Ok(());
            }
            paragraph.spans.resize_with(span_count as usize, Span::default);

            let style_id = self.reader.read_u32()?;
            if let Some(style) = self.paragraph_style_by_ref_id(style_id) {
                paragraph.style = style;
            }

            self.reader.skip(4)?;
        }

        let object_size = self.current_header.size;
        for paragraph_index in 0..text.paragraphs.len() {
            for span_index in 0..text.paragraphs[paragraph_index].spans.len() {
                let length = self.reader.read_u32()?;
                if length > object_size {
                    debug!("incorrect span length, offset {}", self.reader.tell());
                    return Ok(());
                }

                self.reader.skip(4)?;

                let font_id = self.reader.read_u32()?;
                let font = match self.font_by_ref_id(font_id) {
                    Some(font) => font,
                    None => text.paragraphs[paragraph_index].style.font.clone(),
                };

                let span = &mut text.paragraphs[paragraph_index].spans[span_index];
                span.length = length;
                span.font = font;
            }
        }

        for paragraph in &mut text.paragraphs {
            for span in &mut paragraph.spans {
                let byte_count = span.length as usize * 2;
                let bytes = self.reader.read_bytes(byte_count)?;

                let (decoded, _, _) = encoding_rs::UTF_16LE.decode(&bytes);
                span.text.push_str(&decoded);
            }
        }

        self.texts.insert(id, text);

        Ok(())
    }

    fn read_text_frame(&mut self) -> Result<()> {
        let bbox = self.read_bounding_box()?;

        let flags = TextFrameFlags::from_bits_truncate(self.reader.read_u8()?);

        let alignment = if flags.contains(TextFrameFlags::MIDDLE) {
            VerticalAlignment::Middle
        } else if flags.contains(TextFrameFlags::BOTTOM) {
            VerticalAlignment::Bottom
        } else {
            VerticalAlignment::Top
        };

        let refs = self.read_object_refs()?;

        let mut text = None;
        for r in refs {
            match r.tag {
                6 => text = self.text_by_ref_id(r.id),
                other => debug!("unknown text frame ref tag {}", other),
            }
        }

        if let Some(text) = text {
            self.collector.collect_text_object(
                &text,
                &bbox.top_left(),
                bbox.width(),
                bbox.height(),
                alignment,
                bbox.rotation(),
            );
        }

        Ok(())
    }

    fn read_curve(&mut self) -> Result<()> {
        self.reader.skip(52)?;

        let curves = self.read_curve_components(PointEncoding::Micrometers)?;

        let style = self.read_style()?;
        self.collector.set_style(style);

        self.collector.collect_path_list(&curves);

        Ok(())
    }

    fn read_rectangle(&mut self) -> Result<()> {
        let bbox = self.read_bounding_box()?;

        let curve = Curve {
            section_types: vec![CurveType::Line; bbox.points().len() - 1],
            points: bbox.points().to_vec(),
            closed: true,
        };

        let style = self.read_style()?;
        self.collector.set_style(style);

        self.collector.collect_path(&curve);

        Ok(())
    }

    fn read_ellipse(&mut self) -> Result<()> {
        let bbox = self.read_bounding_box()?;

        let begin_angle = f64::from(self.reader.read_f32()?);
        let end_angle = f64::from(self.reader.read_f32()?);

        // The closed flag byte is inverted on the wire.
        let closed = self.reader.read_u8()? == 0;

        let rx = bbox.width() / 2.0;
        let ry = bbox.height() / 2.0;

        let style = self.read_style()?;
        self.collector.set_style(style);

        if almost_zero(begin_angle) && almost_zero(end_angle) {
            self.collector
                .collect_ellipse(&bbox.center(), rx, ry, bbox.rotation());
        } else {
            self.collector.collect_arc(
                &bbox.center(),
                rx,
                ry,
                begin_angle,
                end_angle,
                closed,
                bbox.rotation(),
            );
        }

        Ok(())
    }

    fn read_polygon(&mut self) -> Result<()> {
        let bbox = self.read_bounding_box()?;

        let rx = bbox.width() / 2.0;
        let ry = bbox.height() / 2.0;

        let peaks_count = self.reader.read_u32()?;
        if peaks_count == 0 || peaks_count > 99 {
            debug!("incorrect peak count, offset {}", self.reader.tell());
            return Ok(());
        }

        let points_count = self.reader.read_u32()?;
        let end_offset = if self.current_header.ref_list_start == 0 {
            self.current_header.next_object_offset
        } else {
            self.current_header.ref_list_start
        };
        if points_count == 0
            || self.reader.tell() + 8 >= end_offset
            || u64::from(points_count) > (end_offset - self.reader.tell() - 8) / 12
        {
            debug!("incorrect peak point count, offset {}", self.reader.tell());
            return Ok(());
        }

        self.reader.skip(8)?;

        let mut peak_curve = Curve::default();
        peak_curve.points.reserve(points_count as usize);

        for _ in 0..points_count {
            let point = self.read_unscaled_point()?;
            peak_curve.points.push(point);
        }

        self.read_curve_section_types(&mut peak_curve.section_types)?;

        let style = self.read_style()?;
        self.collector.set_style(style);

        self.collector.collect_polygon(
            &bbox.center(),
            rx,
            ry,
            peaks_count,
            &peak_curve,
            bbox.rotation(),
            bbox.mirror_horizontal(),
            bbox.mirror_vertical(),
        );

        Ok(())
    }

    fn read_table(&mut self) -> Result<()> {
        let mut table = Table::default();

        let bbox = self.read_bounding_box()?;

        table.width = bbox.width();
        table.height = bbox.height();
        table.top_left = bbox.top_left();

        self.reader.skip(8)?;

        let row_count = self.reader.read_u32()?;
        let col_count = self.reader.read_u32()?;

        if !(1..=100).contains(&row_count) || !(1..=100).contains(&col_count) {
            debug!("incorrect table size, offset {}", self.reader.tell());
            return Ok(());
        }

        self.reader.skip(8)?;

        table.rows.resize_with(row_count as usize, Row::default);
        table.columns.resize(col_count as usize, Column::default());

        for row_index in 0..row_count as usize {
            let mut cells = Vec::with_capacity(col_count as usize);

            for _ in 0..col_count {
                self.reader.skip(4)?;

                let fill_id = self.reader.read_u32()?;
                let text_id = self.reader.read_u32()?;
                let right_pen_id = self.reader.read_u32()?;
                let bottom_pen_id = self.reader.read_u32()?;

                let mut cell = Cell {
                    fill: self.fill_by_ref_id(fill_id),
                    right_border: self.pen_by_ref_id(right_pen_id),
                    bottom_border: self.pen_by_ref_id(bottom_pen_id),
                    ..Default::default()
                };
                if let Some(text) = self.text_by_ref_id(text_id) {
                    cell.text = text;
                }

                cells.push(cell);
            }

            table.rows[row_index].cells = cells;
        }

        for row_index in 0..row_count as usize {
            self.reader.skip(4)?;

            let left_pen_id = self.reader.read_u32()?;
            let left_border = self.pen_by_ref_id(left_pen_id);

            if let Some(left_border) = left_border {
                for cell in &mut table.rows[row_index].cells {
                    if cell.left_border.is_none() {
                        cell.left_border = Some(left_border.clone());
                    }
                }
            }

            let rel_height = f64::from(self.reader.read_f32()?) / f64::from(row_count);
            table.rows[row_index].height = table.height * rel_height;
        }

        for col_index in 0..col_count as usize {
            self.reader.skip(4)?;

            let top_pen_id = self.reader.read_u32()?;
            let top_border = self.pen_by_ref_id(top_pen_id);

            if let Some(top_border) = top_border {
                for row in &mut table.rows {
                    let cell = &mut row.cells[col_index];
                    if cell.top_border.is_none() {
                        cell.top_border = Some(top_border.clone());
                    }
                }
            }

            let rel_width = f64::from(self.reader.read_f32()?) / f64::from(col_count);
            table.columns[col_index].width = table.width * rel_width;
        }

        let table_style = self.read_style()?;

        if let Some(fill) = &table_style.fill {
            for row in &mut table.rows {
                for cell in &mut row.cells {
                    if cell.fill.is_none() {
                        cell.fill = Some(fill.clone());
                    }
                }
            }
        }

        // The table's own pen becomes the outer border.
        if let Some(pen) = &table_style.pen {
            if let Some(first_row) = table.rows.first_mut() {
                for cell in &mut first_row.cells {
                    cell.top_border = Some(pen.clone());
                }
            }
            if let Some(last_row) = table.rows.last_mut() {
                for cell in &mut last_row.cells {
                    cell.bottom_border = Some(pen.clone());
                }
            }
            for row in &mut table.rows {
                if let Some(cell) = row.cells.first_mut() {
                    cell.left_border = Some(pen.clone());
                }
                if let Some(cell) = row.cells.last_mut() {
                    cell.right_border = Some(pen.clone());
                }
            }
        }

        self.collector.collect_table(&table);

        Ok(())
    }
}
