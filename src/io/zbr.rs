//! Reader for the legacy Zoner Zebra vector format.
//!
//! Only the signature is recognized; the body is intentionally ignored and
//! parsing yields an empty document.

use crate::error::Result;
use crate::io::stream::StreamReader;
use crate::io::zmf::collector::Collector;
use crate::sink::DrawingSink;

const ZBR_SIGNATURE: u16 = 0x29a;

/// Header of a Zebra file.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZbrHeader {
    signature: u16,
    version: u16,
}

impl ZbrHeader {
    /// Read the header at the reader's current position.
    pub fn load(reader: &mut StreamReader<'_>) -> Result<Self> {
        let signature = reader.read_u16()?;
        let version = reader.read_u16()?;
        reader.skip(100)?;
        Ok(ZbrHeader { signature, version })
    }

    /// Whether the signature and version identify a supported Zebra file.
    pub fn is_supported(&self) -> bool {
        self.signature == ZBR_SIGNATURE && self.version < 5
    }

    pub fn version(&self) -> u16 {
        self.version
    }
}

/// Parser for the Zebra format.
pub struct ZbrParser<'r, 'a, 's> {
    reader: &'r mut StreamReader<'a>,
    sink: &'s mut dyn DrawingSink,
}

impl<'r, 'a, 's> ZbrParser<'r, 'a, 's> {
    /// Create a parser reading from the current stream position.
    pub fn new(reader: &'r mut StreamReader<'a>, sink: &'s mut dyn DrawingSink) -> Self {
        Self { reader, sink }
    }

    /// Validate the header and emit an empty document.
    pub fn parse(&mut self) -> bool {
        let header = match ZbrHeader::load(self.reader) {
            Ok(header) => header,
            Err(_) => return false,
        };
        if !header.is_supported() {
            return false;
        }

        let mut collector = Collector::new(self.sink);
        collector.start_document();
        collector.end_document();

        true
    }
}
