//! # zonerust
//!
//! A pure Rust library for reading the proprietary graphics file formats of
//! the Zoner family of drawing applications: the Zoner Draw vector format
//! (versions 4 and 5), the legacy Zoner Zebra vector format, and the
//! companion Zoner Bitmap format.
//!
//! The library analyzes a byte stream, decides whether it belongs to one of
//! the recognized formats, and reproduces the contained document as a
//! sequence of semantic drawing callbacks delivered to an injected
//! [`DrawingSink`] (pages, layers, groups, styled paths, ellipses, arcs,
//! polygons, text, tables, raster images).
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use zonerust::{MemoryStream, ZmfDocument};
//!
//! let mut stream = MemoryStream::new(std::fs::read("drawing.zmf")?);
//!
//! if let Some((doc_type, kind)) = ZmfDocument::detect(&mut stream) {
//!     println!("detected {:?} ({:?})", doc_type, kind);
//! }
//!
//! let mut sink = MySink::new();
//! ZmfDocument::parse(&mut stream, &mut sink);
//! ```
//!
//! ## Architecture
//!
//! - [`io::stream`] - the byte stream abstraction and typed reads
//! - [`types`] - the document model (geometry, styles, text, tables)
//! - [`io::zmf`] - the version-4/5 drawing parser and the collector
//! - [`io::bmi`] - the bitmap decoder (zlib block data, PNG re-encoding)
//! - [`io::zbr`] - signature detection for the legacy vector format
//! - [`document`] - format sniffing and parser dispatch

#![allow(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod document;
pub mod error;
pub mod io;
pub mod sink;
pub mod types;

// Re-export commonly used types
pub use document::{DocKind, DocType, ZmfDocument};
pub use error::{Result, ZmfError};
pub use io::stream::{InputStream, MemoryStream, StreamReader};
pub use sink::{DrawingSink, PropertyList, PropertyValue, Unit};
pub use types::{
    BoundingBox, Color, Curve, CurveType, Fill, Gradient, Image, PageSettings, Pen, Point,
    Style, Text, Transparency,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_unknown_stream_is_rejected() {
        let mut stream = MemoryStream::new(vec![0u8; 16]);
        assert!(!ZmfDocument::is_supported(&mut stream));
    }
}
