//! HMX bitmap textures (`*.png_xbox`, `*.png_ps3`, ...) as found in console
//! song containers, decoded to RGBA and re-encoded as PNG.

mod bitmap;
mod dxt;
mod error;
mod system;

pub use bitmap::{read_bitmap, write_bitmap, Encoding, HmxBitmap, HEADER_SIZE};
pub use error::TextureError;
pub use system::{Platform, SystemInfo};
