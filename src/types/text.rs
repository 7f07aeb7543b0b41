//! Text model: fonts, spans, paragraphs, and alignment.

use bitflags::bitflags;

use crate::types::{Color, Fill, Pen};

bitflags! {
    /// Font format flag byte of the font object.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FontFormatFlags: u8 {
        const BOLD = 0x1;
        const ITALIC = 0x2;
    }
}

bitflags! {
    /// Flag byte of a text frame controlling vertical alignment.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TextFrameFlags: u8 {
        const MIDDLE = 0x10;
        const BOTTOM = 0x20;
    }
}

/// A resolved font.
#[derive(Debug, Clone)]
pub struct Font {
    pub name: String,
    /// Size in points.
    pub size: f64,
    pub is_bold: bool,
    pub is_italic: bool,
    pub fill: Option<Fill>,
    pub outline: Option<Pen>,
}

impl Default for Font {
    fn default() -> Self {
        Font {
            name: "Arial".to_string(),
            size: 24.0,
            is_bold: false,
            is_italic: false,
            fill: Some(Fill::Solid(Color::BLACK)),
            outline: None,
        }
    }
}

/// A run of text sharing one font.
#[derive(Debug, Clone, Default)]
pub struct Span {
    pub text: String,
    /// Length in UTF-16 code units as stored on the wire.
    pub length: u32,
    pub font: Font,
}

/// Paragraph-level horizontal alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HorizontalAlignment {
    #[default]
    Left,
    Right,
    Block,
    Center,
    Full,
}

/// Text frame vertical alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalAlignment {
    #[default]
    Top,
    Middle,
    Bottom,
}

/// Paragraph style: line spacing, alignment, and the default font.
#[derive(Debug, Clone)]
pub struct ParagraphStyle {
    pub line_spacing: f64,
    pub alignment: HorizontalAlignment,
    pub font: Font,
}

impl Default for ParagraphStyle {
    fn default() -> Self {
        ParagraphStyle {
            line_spacing: 1.2,
            alignment: HorizontalAlignment::Left,
            font: Font::default(),
        }
    }
}

/// One paragraph: spans plus a paragraph style.
#[derive(Debug, Clone, Default)]
pub struct Paragraph {
    pub spans: Vec<Span>,
    pub style: ParagraphStyle,
}

/// A text object: a sequence of paragraphs.
#[derive(Debug, Clone, Default)]
pub struct Text {
    pub paragraphs: Vec<Paragraph>,
}

impl Text {
    /// Whether the text holds no paragraphs.
    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }
}
