//! I/O module: the byte stream abstraction and the format readers.

pub mod bmi;
pub mod stream;
pub mod zbr;
pub mod zmf;

pub use stream::{InputStream, MemoryStream, StreamReader};
