use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TextureError {
    #[error("failed to read bitmap {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported bitmap version {0}")]
    UnsupportedVersion(u8),

    #[error("unsupported bitmap encoding {0}")]
    UnsupportedEncoding(u32),

    #[error("unsupported bit depth {bpp} for encoding {encoding}")]
    UnsupportedBitDepth { encoding: u32, bpp: u8 },

    #[error("invalid bitmap dimensions {width}x{height}")]
    InvalidDimensions { width: u16, height: u16 },

    #[error("bitmap data truncated: expected {expected} bytes, found {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("image encoding error: {0}")]
    Image(#[from] image::ImageError),
}

impl TextureError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TextureError::Io {
            path: path.into(),
            source,
        }
    }
}
