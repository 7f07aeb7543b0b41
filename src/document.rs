//! Format detection and parser dispatch.
//!
//! [`ZmfDocument`] is the public entry point: it sniffs an input stream,
//! decides which of the recognized Zoner formats it holds, and drives the
//! matching parser against an injected drawing sink.

use tracing::debug;

use crate::io::bmi::{BmiHeader, BmiParser};
use crate::io::stream::{InputStream, StreamReader};
use crate::io::zbr::{ZbrHeader, ZbrParser};
use crate::io::zmf::header::ZmfHeader;
use crate::io::zmf::parser::ZmfParser;
use crate::sink::DrawingSink;

/// Name of the drawing member inside a structured container.
const CONTENT_STREAM_NAME: &str = "content.zmf";

/// Detected file type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocType {
    #[default]
    Unknown,
    /// Zoner Draw/Callisto versions 4-5.
    Draw,
    /// Zoner Zebra (legacy vector format).
    Zebra,
    /// Zoner Bitmap.
    Bitmap,
}

/// Detected document kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocKind {
    #[default]
    Unknown,
    Draw,
    Paint,
}

fn detect_zmf(input: &mut dyn InputStream) -> bool {
    let mut reader = StreamReader::new(input);
    if reader.seek(0).is_err() {
        return false;
    }
    matches!(ZmfHeader::load(&mut reader), Ok(header) if header.is_supported())
}

fn detect_bmi(input: &mut dyn InputStream) -> bool {
    let mut reader = StreamReader::new(input);
    if reader.seek(0).is_err() {
        return false;
    }
    matches!(BmiHeader::load(&mut reader), Ok(header) if header.is_supported())
}

fn detect_zbr(input: &mut dyn InputStream) -> bool {
    let mut reader = StreamReader::new(input);
    if reader.seek(0).is_err() {
        return false;
    }
    matches!(ZbrHeader::load(&mut reader), Ok(header) if header.is_supported())
}

/// Detection result: the type/kind plus, for structured containers, the
/// extracted content stream.
struct DetectionInfo {
    doc_type: DocType,
    doc_kind: DocKind,
    content: Option<Box<dyn InputStream>>,
}

fn detect(input: &mut dyn InputStream) -> Option<DetectionInfo> {
    if input.is_structured() {
        if !input.exists_sub_stream(CONTENT_STREAM_NAME) {
            return None;
        }
        let mut content = input.sub_stream_by_name(CONTENT_STREAM_NAME)?;
        if detect_zmf(content.as_mut()) {
            return Some(DetectionInfo {
                doc_type: DocType::Draw,
                doc_kind: DocKind::Draw,
                content: Some(content),
            });
        }
        return None;
    }

    if detect_zmf(input) {
        Some(DetectionInfo {
            doc_type: DocType::Draw,
            doc_kind: DocKind::Draw,
            content: None,
        })
    } else if detect_bmi(input) {
        Some(DetectionInfo {
            doc_type: DocType::Bitmap,
            doc_kind: DocKind::Paint,
            content: None,
        })
    } else if detect_zbr(input) {
        Some(DetectionInfo {
            doc_type: DocType::Zebra,
            doc_kind: DocKind::Draw,
            content: None,
        })
    } else {
        None
    }
}

/// Static entry points for detecting and parsing Zoner graphics files.
pub struct ZmfDocument;

impl ZmfDocument {
    /// Analyze the stream and report its type and kind when recognized.
    pub fn detect(input: &mut dyn InputStream) -> Option<(DocType, DocKind)> {
        detect(input).map(|info| (info.doc_type, info.doc_kind))
    }

    /// Whether the stream holds a document this library can parse.
    pub fn is_supported(input: &mut dyn InputStream) -> bool {
        Self::detect(input).is_some()
    }

    /// Parse the stream, reproducing the document through the sink.
    ///
    /// Returns false for unrecognized input or on a hard decode failure.
    pub fn parse(input: &mut dyn InputStream, sink: &mut dyn DrawingSink) -> bool {
        let Some(mut info) = detect(input) else {
            return false;
        };

        let content: &mut dyn InputStream = match info.content.as_mut() {
            Some(content) => content.as_mut(),
            None => input,
        };

        if content.seek(std::io::SeekFrom::Start(0)).is_err() {
            return false;
        }

        match info.doc_type {
            DocType::Draw => {
                let mut parser = ZmfParser::new(content, sink);
                parser.parse()
            }
            DocType::Zebra => {
                let mut reader = StreamReader::new(content);
                let mut parser = ZbrParser::new(&mut reader, sink);
                parser.parse()
            }
            DocType::Bitmap => {
                let mut reader = StreamReader::new(content);
                let mut parser = BmiParser::new(&mut reader);
                parser.parse(sink)
            }
            DocType::Unknown => {
                debug!("detection returned an unknown type");
                false
            }
        }
    }
}
