//! PNG encoding for rendered bitmaps.
//!
//! Supports three encoding modes:
//! - **Direct**: grayscale (color type 0), RGB (2) or RGBA (6), matching
//!   the bitmap's depth.
//! - **Indexed (color type 3)**: used by [`encode_bitmap_auto`] when the
//!   image has ≤256 unique colors, which is common for unshaded color
//!   table output.

use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

use terrain_common::{Rgba, TerrainError, TerrainResult};
use tracing::debug;

use crate::bitmap::{Bitmap, ColorDepth, PixelBuffer};

/// Maximum colors for indexed PNG (PNG8)
const MAX_PALETTE_SIZE: usize = 256;

const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Encode at the bitmap's own depth.
pub fn encode_bitmap(bitmap: &Bitmap) -> TerrainResult<Vec<u8>> {
    let color_type = match bitmap.depth() {
        ColorDepth::Gray8 => 0,
        ColorDepth::Rgb24 => 2,
        ColorDepth::Rgba32 => 6,
    };
    let (width, height) = bitmap.dimensions();
    encode_raw(
        bitmap.data(),
        width,
        height,
        color_type,
        bitmap.depth().bytes_per_pixel(),
    )
}

/// Encode as indexed PNG when the palette fits, else at the bitmap's depth.
pub fn encode_bitmap_auto(bitmap: &Bitmap) -> TerrainResult<Vec<u8>> {
    if bitmap.depth() == ColorDepth::Gray8 {
        return encode_bitmap(bitmap);
    }
    match extract_palette(bitmap) {
        Some((palette, indices)) => {
            debug!(colors = palette.len(), "Encoding indexed PNG");
            let (width, height) = bitmap.dimensions();
            encode_indexed(width, height, &palette, &indices)
        }
        None => encode_bitmap(bitmap),
    }
}

/// Encode and write to `path`.
pub fn write_png(bitmap: &Bitmap, path: impl AsRef<Path>) -> TerrainResult<()> {
    let bytes = encode_bitmap_auto(bitmap)?;
    std::fs::write(path.as_ref(), &bytes)?;
    debug!(path = %path.as_ref().display(), bytes = bytes.len(), "Wrote PNG");
    Ok(())
}

/// Pack RGBA into a u32 for faster hashing and comparison
#[inline(always)]
fn pack_color(c: Rgba) -> u32 {
    (c.r as u32) | ((c.g as u32) << 8) | ((c.b as u32) << 16) | ((c.a as u32) << 24)
}

/// Palette and per-pixel indices, or `None` past 256 colors.
fn extract_palette(bitmap: &Bitmap) -> Option<(Vec<Rgba>, Vec<u8>)> {
    let (width, height) = bitmap.dimensions();
    let mut color_to_index: HashMap<u32, u8> = HashMap::with_capacity(MAX_PALETTE_SIZE);
    let mut palette: Vec<Rgba> = Vec::with_capacity(MAX_PALETTE_SIZE);
    let mut indices: Vec<u8> = Vec::with_capacity(width * height);

    for y in 0..height {
        for x in 0..width {
            let color = bitmap.get_pixel32(x, y);
            let packed = pack_color(color);
            let index = match color_to_index.get(&packed) {
                Some(&idx) => idx,
                None => {
                    if palette.len() >= MAX_PALETTE_SIZE {
                        return None;
                    }
                    let idx = palette.len() as u8;
                    palette.push(color);
                    color_to_index.insert(packed, idx);
                    idx
                }
            };
            indices.push(index);
        }
    }

    Some((palette, indices))
}

fn write_header(png: &mut Vec<u8>, width: usize, height: usize, color_type: u8) -> TerrainResult<()> {
    let (w, h) = match (u32::try_from(width), u32::try_from(height)) {
        (Ok(w), Ok(h)) if w > 0 && h > 0 => (w, h),
        _ => {
            return Err(TerrainError::Encode(format!(
                "cannot encode a {width}x{height} image"
            )))
        }
    };

    png.extend_from_slice(&PNG_SIGNATURE);

    let mut ihdr_data = Vec::with_capacity(13);
    ihdr_data.extend_from_slice(&w.to_be_bytes());
    ihdr_data.extend_from_slice(&h.to_be_bytes());
    ihdr_data.push(8); // bit depth
    ihdr_data.push(color_type);
    ihdr_data.push(0); // compression method
    ihdr_data.push(0); // filter method
    ihdr_data.push(0); // interlace method
    write_chunk(png, b"IHDR", &ihdr_data);
    Ok(())
}

/// Encode rows of `bytes_per_pixel`-wide samples.
fn encode_raw(
    pixels: &[u8],
    width: usize,
    height: usize,
    color_type: u8,
    bytes_per_pixel: usize,
) -> TerrainResult<Vec<u8>> {
    let expected = width * height * bytes_per_pixel;
    if pixels.len() != expected {
        return Err(TerrainError::DataLength {
            expected,
            actual: pixels.len(),
        });
    }

    let mut png = Vec::new();
    write_header(&mut png, width, height, color_type)?;

    let idat_data = deflate_rows(pixels, width * bytes_per_pixel, height)?;
    write_chunk(&mut png, b"IDAT", &idat_data);
    write_chunk(&mut png, b"IEND", &[]);
    Ok(png)
}

/// Indexed PNG (color type 3) from palette and indices.
fn encode_indexed(
    width: usize,
    height: usize,
    palette: &[Rgba],
    indices: &[u8],
) -> TerrainResult<Vec<u8>> {
    let mut png = Vec::new();
    write_header(&mut png, width, height, 3)?;

    // PLTE chunk (palette)
    let plte_data: Vec<u8> = palette.iter().flat_map(|c| [c.r, c.g, c.b]).collect();
    write_chunk(&mut png, b"PLTE", &plte_data);

    // tRNS chunk - only if any color has alpha < 255
    if palette.iter().any(|c| c.a < 255) {
        let trns_data: Vec<u8> = palette.iter().map(|c| c.a).collect();
        write_chunk(&mut png, b"tRNS", &trns_data);
    }

    let idat_data = deflate_rows(indices, width, height)?;
    write_chunk(&mut png, b"IDAT", &idat_data);
    write_chunk(&mut png, b"IEND", &[]);
    Ok(png)
}

/// Write a PNG chunk
fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(chunk_type);
    png.extend_from_slice(data);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
}

/// Deflate scanlines for the IDAT chunk, each prefixed with filter type 0.
fn deflate_rows(data: &[u8], stride: usize, height: usize) -> TerrainResult<Vec<u8>> {
    let mut uncompressed = Vec::with_capacity(height * (1 + stride));
    for row in data.chunks_exact(stride).take(height) {
        uncompressed.push(0); // filter type: none
        uncompressed.extend_from_slice(row);
    }

    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::fast());
    encoder
        .write_all(&uncompressed)
        .map_err(|e| TerrainError::Encode(format!("IDAT compression failed: {e}")))?;
    encoder
        .finish()
        .map_err(|e| TerrainError::Encode(format!("IDAT compression failed: {e}")))
}
