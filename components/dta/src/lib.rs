//! Decoder for DTA data arrays, the metadata format of console song containers.
//!
//! ```text
//! (mysong
//!    (name "My Song")
//!    (artist "Some Band")
//!    (song (name "songs/mysong/mysong"))
//!    (rank (guitar 220) (bass 0)))
//! ```

mod error;
mod node;
mod parser;

pub use error::DtaError;
pub use node::{ArrayKind, DataArray, Node};
pub use parser::{from_bytes, from_reader, parse_str};
