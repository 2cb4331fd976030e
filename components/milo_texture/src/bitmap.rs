use crate::dxt::{compressed_len, decode_dxt1, decode_dxt5, swap_words};
use crate::error::TextureError;
use crate::system::SystemInfo;
use image::{ImageFormat, RgbaImage};
use nom::bytes::complete::take;
use nom::number::complete::{le_u16, le_u32, le_u8};
use nom::IResult;
use std::path::Path;

/// Size of the bitmap header in bytes
pub const HEADER_SIZE: usize = 32;

/// Only bitmap version these files use
const BITMAP_VERSION: u8 = 1;

/// Reserved bytes at the end of the header
const HEADER_PADDING: usize = 19;

/// Pixel storage of a bitmap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Rgba,
    Dxt1,
    Dxt5,
    Ati2,
}

impl Encoding {
    pub fn from_u32(value: u32) -> Result<Self, TextureError> {
        match value {
            3 => Ok(Encoding::Rgba),
            8 => Ok(Encoding::Dxt1),
            24 => Ok(Encoding::Dxt5),
            32 => Ok(Encoding::Ati2),
            other => Err(TextureError::UnsupportedEncoding(other)),
        }
    }

    pub fn as_u32(&self) -> u32 {
        match self {
            Encoding::Rgba => 3,
            Encoding::Dxt1 => 8,
            Encoding::Dxt5 => 24,
            Encoding::Ati2 => 32,
        }
    }
}

struct Header {
    version: u8,
    bpp: u8,
    encoding: u32,
    mip_maps: u8,
    width: u16,
    height: u16,
    bytes_per_line: u16,
}

fn parse_header(input: &[u8]) -> IResult<&[u8], Header> {
    let (input, version) = le_u8(input)?;
    let (input, bpp) = le_u8(input)?;
    let (input, encoding) = le_u32(input)?;
    let (input, mip_maps) = le_u8(input)?;
    let (input, width) = le_u16(input)?;
    let (input, height) = le_u16(input)?;
    let (input, bytes_per_line) = le_u16(input)?;
    let (input, _) = take(HEADER_PADDING)(input)?;

    Ok((
        input,
        Header {
            version,
            bpp,
            encoding,
            mip_maps,
            width,
            height,
            bytes_per_line,
        },
    ))
}

/// Decoded HMX bitmap: header values plus the top mip level's raw data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HmxBitmap {
    pub bpp: u8,
    pub encoding: Encoding,
    pub mip_maps: u8,
    pub width: u16,
    pub height: u16,
    pub bytes_per_line: u16,
    pub data: Vec<u8>,
}

impl HmxBitmap {
    /// Uncompressed 32-bit RGBA bitmap without mip maps
    pub fn from_rgba(width: u16, height: u16, pixels: Vec<u8>) -> Result<Self, TextureError> {
        let bitmap = Self {
            bpp: 32,
            encoding: Encoding::Rgba,
            mip_maps: 0,
            width,
            height,
            bytes_per_line: width.saturating_mul(4),
            data: pixels,
        };
        let expected = bitmap.top_level_len()?;
        if bitmap.data.len() != expected {
            return Err(TextureError::Truncated {
                expected,
                actual: bitmap.data.len(),
            });
        }
        Ok(bitmap)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TextureError> {
        let (data, header) = parse_header(bytes).map_err(|_| TextureError::Truncated {
            expected: HEADER_SIZE,
            actual: bytes.len(),
        })?;

        if header.version != BITMAP_VERSION {
            return Err(TextureError::UnsupportedVersion(header.version));
        }

        let mut bitmap = Self {
            bpp: header.bpp,
            encoding: Encoding::from_u32(header.encoding)?,
            mip_maps: header.mip_maps,
            width: header.width,
            height: header.height,
            bytes_per_line: header.bytes_per_line,
            data: Vec::new(),
        };

        let expected = bitmap.top_level_len()?;
        if data.len() < expected {
            return Err(TextureError::Truncated {
                expected,
                actual: data.len(),
            });
        }
        bitmap.data = data[..expected].to_vec();
        Ok(bitmap)
    }

    /// Serialize back to the HMX layout.
    ///
    /// Only the top level is kept, so the mip map count is written as zero.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(HEADER_SIZE + self.data.len());
        bytes.push(BITMAP_VERSION);
        bytes.push(self.bpp);
        bytes.extend_from_slice(&self.encoding.as_u32().to_le_bytes());
        bytes.push(0);
        bytes.extend_from_slice(&self.width.to_le_bytes());
        bytes.extend_from_slice(&self.height.to_le_bytes());
        bytes.extend_from_slice(&self.bytes_per_line.to_le_bytes());
        bytes.extend_from_slice(&[0u8; HEADER_PADDING]);
        bytes.extend_from_slice(&self.data);
        bytes
    }

    /// Byte length of the top mip level
    fn top_level_len(&self) -> Result<usize, TextureError> {
        if self.width == 0 || self.height == 0 {
            return Err(TextureError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        let (width, height) = (self.width as usize, self.height as usize);

        match (self.encoding, self.bpp) {
            (Encoding::Rgba, 24 | 32) => Ok(width * height * self.bpp as usize / 8),
            (Encoding::Dxt1, _) => Ok(compressed_len(width, height, 8)),
            (Encoding::Dxt5 | Encoding::Ati2, _) => Ok(compressed_len(width, height, 16)),
            (encoding, bpp) => Err(TextureError::UnsupportedBitDepth {
                encoding: encoding.as_u32(),
                bpp,
            }),
        }
    }

    /// Decode to 8-bit RGBA laid out for `info`'s platform
    pub fn to_rgba(&self, info: &SystemInfo) -> Result<RgbaImage, TextureError> {
        let (width, height) = (self.width as usize, self.height as usize);

        let pixels: Vec<u8> = match self.encoding {
            Encoding::Rgba if self.bpp == 24 => self
                .data
                .chunks_exact(3)
                .flat_map(|rgb| [rgb[0], rgb[1], rgb[2], 255])
                .collect(),
            Encoding::Rgba => self.data.clone(),
            Encoding::Dxt1 | Encoding::Dxt5 => {
                let mut blocks = self.data.clone();
                if info.swaps_block_words() {
                    swap_words(&mut blocks);
                }
                if self.encoding == Encoding::Dxt1 {
                    decode_dxt1(&blocks, width, height)
                } else {
                    decode_dxt5(&blocks, width, height)
                }
            }
            Encoding::Ati2 => return Err(TextureError::UnsupportedEncoding(self.encoding.as_u32())),
        };

        let actual = pixels.len();
        RgbaImage::from_raw(self.width as u32, self.height as u32, pixels).ok_or_else(|| {
            TextureError::Truncated {
                expected: width * height * 4,
                actual,
            }
        })
    }

    /// Decode with `info` and write the result to `path` as PNG
    pub fn save_as(&self, info: &SystemInfo, path: impl AsRef<Path>) -> Result<(), TextureError> {
        let image = self.to_rgba(info)?;
        image.save_with_format(path, ImageFormat::Png)?;
        Ok(())
    }
}

/// Read and decode the bitmap file at `path`
pub fn read_bitmap(path: impl AsRef<Path>) -> Result<HmxBitmap, TextureError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| TextureError::io(path, e))?;
    HmxBitmap::from_bytes(&bytes)
}

/// Re-encode `bitmap` as a PNG at `path`
pub fn write_bitmap(
    bitmap: &HmxBitmap,
    info: &SystemInfo,
    path: impl AsRef<Path>,
) -> Result<(), TextureError> {
    bitmap.save_as(info, path)
}
