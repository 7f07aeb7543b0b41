//! Reader for the Zoner Draw version-4/5 drawing format.

pub mod collector;
pub mod header;
pub mod object;
pub mod parser;

pub use collector::Collector;
pub use header::ZmfHeader;
pub use object::{ObjectHeader, ObjectKind, ObjectRef};
pub use parser::ZmfParser;
