//! S3TC block decompression (DXT1 / DXT5) into RGBA8.

const BLOCK_PIXELS: usize = 16;

/// Bytes of compressed data for the given block size and dimensions
pub(crate) fn compressed_len(width: usize, height: usize, block_bytes: usize) -> usize {
    width.div_ceil(4) * height.div_ceil(4) * block_bytes
}

pub(crate) fn decode_dxt1(data: &[u8], width: usize, height: usize) -> Vec<u8> {
    decode_blocks(data, width, height, 8, |block| color_block(block, true))
}

pub(crate) fn decode_dxt5(data: &[u8], width: usize, height: usize) -> Vec<u8> {
    decode_blocks(data, width, height, 16, |block| {
        let alpha = alpha_block(&block[..8]);
        let mut pixels = color_block(&block[8..], false);
        for (pixel, a) in pixels.iter_mut().zip(alpha) {
            pixel[3] = a;
        }
        pixels
    })
}

fn decode_blocks<F>(data: &[u8], width: usize, height: usize, block_bytes: usize, decode: F) -> Vec<u8>
where
    F: Fn(&[u8]) -> [[u8; 4]; BLOCK_PIXELS],
{
    let mut out = vec![0u8; width * height * 4];
    let blocks_wide = width.div_ceil(4);

    for (index, block) in data.chunks_exact(block_bytes).enumerate() {
        let block_x = (index % blocks_wide) * 4;
        let block_y = (index / blocks_wide) * 4;
        let pixels = decode(block);

        for (i, pixel) in pixels.iter().enumerate() {
            let x = block_x + i % 4;
            let y = block_y + i / 4;
            if x < width && y < height {
                let offset = (y * width + x) * 4;
                out[offset..offset + 4].copy_from_slice(pixel);
            }
        }
    }

    out
}

fn rgb565(color: u16) -> [u8; 4] {
    let r = ((color >> 11) & 0x1f) as u8;
    let g = ((color >> 5) & 0x3f) as u8;
    let b = (color & 0x1f) as u8;
    [(r << 3) | (r >> 2), (g << 2) | (g >> 4), (b << 3) | (b >> 2), 255]
}

fn mix(a: [u8; 4], b: [u8; 4], weight_a: u16, weight_b: u16) -> [u8; 4] {
    let total = weight_a + weight_b;
    let channel = |i: usize| ((a[i] as u16 * weight_a + b[i] as u16 * weight_b) / total) as u8;
    [channel(0), channel(1), channel(2), 255]
}

/// 8-byte color block; DXT1 blocks with `c0 <= c1` use 3 colors plus transparent
fn color_block(block: &[u8], dxt1: bool) -> [[u8; 4]; BLOCK_PIXELS] {
    let c0 = u16::from_le_bytes([block[0], block[1]]);
    let c1 = u16::from_le_bytes([block[2], block[3]]);
    let (p0, p1) = (rgb565(c0), rgb565(c1));

    let palette = if c0 > c1 || !dxt1 {
        [p0, p1, mix(p0, p1, 2, 1), mix(p0, p1, 1, 2)]
    } else {
        [p0, p1, mix(p0, p1, 1, 1), [0, 0, 0, 0]]
    };

    let indices = u32::from_le_bytes([block[4], block[5], block[6], block[7]]);
    let mut pixels = [[0u8; 4]; BLOCK_PIXELS];
    for (i, pixel) in pixels.iter_mut().enumerate() {
        *pixel = palette[((indices >> (2 * i)) & 0b11) as usize];
    }
    pixels
}

/// 8-byte interpolated alpha block of DXT5
fn alpha_block(block: &[u8]) -> [u8; BLOCK_PIXELS] {
    let (a0, a1) = (block[0] as u16, block[1] as u16);
    let mut palette = [0u8; 8];
    palette[0] = a0 as u8;
    palette[1] = a1 as u8;

    if a0 > a1 {
        for i in 1..7u16 {
            palette[i as usize + 1] = (((7 - i) * a0 + i * a1) / 7) as u8;
        }
    } else {
        for i in 1..5u16 {
            palette[i as usize + 1] = (((5 - i) * a0 + i * a1) / 5) as u8;
        }
        palette[6] = 0;
        palette[7] = 255;
    }

    let bits = block[2..8]
        .iter()
        .rev()
        .fold(0u64, |acc, byte| (acc << 8) | *byte as u64);

    let mut alpha = [0u8; BLOCK_PIXELS];
    for (i, a) in alpha.iter_mut().enumerate() {
        *a = palette[((bits >> (3 * i)) & 0b111) as usize];
    }
    alpha
}

/// Swap the bytes of every 16-bit word in place
pub(crate) fn swap_words(data: &mut [u8]) {
    for pair in data.chunks_exact_mut(2) {
        pair.swap(0, 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: u16 = 0xf800;
    const BLUE: u16 = 0x001f;

    fn dxt1_block(c0: u16, c1: u16, indices: u32) -> Vec<u8> {
        let mut block = Vec::new();
        block.extend_from_slice(&c0.to_le_bytes());
        block.extend_from_slice(&c1.to_le_bytes());
        block.extend_from_slice(&indices.to_le_bytes());
        block
    }

    #[test]
    fn expands_565_colors() {
        assert_eq!(rgb565(RED), [255, 0, 0, 255]);
        assert_eq!(rgb565(BLUE), [0, 0, 255, 255]);
        assert_eq!(rgb565(0xffff), [255, 255, 255, 255]);
    }

    #[test]
    fn dxt1_endpoint_indices() {
        let red = decode_dxt1(&dxt1_block(RED, BLUE, 0), 4, 4);
        assert!(red.chunks(4).all(|p| p == [255, 0, 0, 255]));

        let blue = decode_dxt1(&dxt1_block(RED, BLUE, 0x5555_5555), 4, 4);
        assert!(blue.chunks(4).all(|p| p == [0, 0, 255, 255]));
    }

    #[test]
    fn dxt1_interpolates_four_colors() {
        // Index 2 on every pixel: two thirds red, one third blue
        let pixels = decode_dxt1(&dxt1_block(RED, BLUE, 0xaaaa_aaaa), 4, 4);
        assert_eq!(&pixels[..4], &[170, 0, 85, 255]);
    }

    #[test]
    fn dxt1_three_color_mode_has_transparency() {
        // c0 <= c1 switches to 3 colors; index 3 is transparent black
        let pixels = decode_dxt1(&dxt1_block(BLUE, RED, 0xffff_ffff), 4, 4);
        assert_eq!(&pixels[..4], &[0, 0, 0, 0]);
    }

    #[test]
    fn dxt1_pixel_order_is_row_major() {
        // Only the second pixel of the first row uses index 1
        let pixels = decode_dxt1(&dxt1_block(RED, BLUE, 0b0100), 4, 4);
        assert_eq!(&pixels[..4], &[255, 0, 0, 255]);
        assert_eq!(&pixels[4..8], &[0, 0, 255, 255]);
        assert_eq!(&pixels[16..20], &[255, 0, 0, 255]);
    }

    #[test]
    fn partial_blocks_are_clipped() {
        let pixels = decode_dxt1(&dxt1_block(RED, BLUE, 0), 2, 3);
        assert_eq!(pixels.len(), 2 * 3 * 4);
    }

    #[test]
    fn multiple_blocks_are_laid_out_left_to_right() {
        let mut data = dxt1_block(RED, BLUE, 0);
        data.extend(dxt1_block(RED, BLUE, 0x5555_5555));
        let pixels = decode_dxt1(&data, 8, 4);
        let row: Vec<_> = pixels[..8 * 4].chunks(4).collect();
        assert_eq!(row[3], &[255, 0, 0, 255]);
        assert_eq!(row[4], &[0, 0, 255, 255]);
    }

    #[test]
    fn dxt5_applies_alpha_block() {
        let mut block = vec![255u8, 0];
        // Every alpha index 1 → a1 = 0
        block.extend_from_slice(&[0b0100_1001, 0b1001_0010, 0b0010_0100, 0b0100_1001, 0b1001_0010, 0b0010_0100]);
        block.extend(dxt1_block(RED, BLUE, 0));

        let pixels = decode_dxt5(&block, 4, 4);
        assert!(pixels.chunks(4).all(|p| p == [255, 0, 0, 0]));
    }

    #[test]
    fn dxt5_six_level_alpha_has_opaque_code() {
        let mut block = vec![0u8, 255];
        // Every alpha index 7 → fully opaque in 6-level mode
        block.extend_from_slice(&[0xff; 6]);
        block.extend(dxt1_block(RED, BLUE, 0));

        let pixels = decode_dxt5(&block, 4, 4);
        assert!(pixels.chunks(4).all(|p| p[3] == 255));
    }

    #[test]
    fn swaps_word_bytes() {
        let mut data = vec![1, 2, 3, 4];
        swap_words(&mut data);
        assert_eq!(data, vec![2, 1, 4, 3]);
    }

    #[test]
    fn compressed_len_rounds_up_to_blocks() {
        assert_eq!(compressed_len(4, 4, 8), 8);
        assert_eq!(compressed_len(5, 4, 8), 16);
        assert_eq!(compressed_len(256, 256, 16), 64 * 64 * 16);
    }
}
