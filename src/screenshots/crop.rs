use std::io::Cursor;

use image::{DynamicImage, ImageFormat, imageops};

use crate::error::{ExportError, ExportResult};

/// Background of dark themed dashboard screenshots
pub const DARK_BACKGROUND: [u8; 4] = [16, 24, 39, 255];

/// Exclusive right/bottom edge of the non-background content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentBounds {
    pub right: u32,
    pub bottom: u32,
}

/// Scan an RGBA buffer for pixels that are neither `background` nor fully
/// transparent and return the edge of the box that contains them.
///
/// Returns `None` when the buffer holds background only (or is malformed).
pub fn content_bounds(
    width: u32,
    height: u32,
    rgba: &[u8],
    background: [u8; 4],
) -> Option<ContentBounds> {
    if rgba.len() != (width as usize) * (height as usize) * 4 {
        return None;
    }

    let mut bounds: Option<ContentBounds> = None;

    for (index, pixel) in rgba.chunks_exact(4).enumerate() {
        if pixel == background || pixel[3] == 0 {
            continue;
        }

        let x = (index as u32 % width) + 1;
        let y = (index as u32 / width) + 1;
        bounds = Some(match bounds {
            Some(b) => ContentBounds {
                right: b.right.max(x),
                bottom: b.bottom.max(y),
            },
            None => ContentBounds {
                right: x,
                bottom: y,
            },
        });
    }

    bounds
}

/// Crop a PNG screenshot to `(0, 0, right, bottom)` of its content.
///
/// An image with no content is returned unchanged.
pub fn crop_png(png: &[u8]) -> ExportResult<Vec<u8>> {
    let decoded = image::load_from_memory_with_format(png, ImageFormat::Png)
        .map_err(|e| ExportError::Serialization(format!("Failed to decode screenshot: {}", e)))?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();

    let Some(bounds) = content_bounds(width, height, rgba.as_raw(), DARK_BACKGROUND) else {
        return Ok(png.to_vec());
    };

    let cropped = imageops::crop_imm(&rgba, 0, 0, bounds.right, bounds.bottom).to_image();

    let mut encoded = Vec::new();
    DynamicImage::ImageRgba8(cropped)
        .write_to(&mut Cursor::new(&mut encoded), ImageFormat::Png)
        .map_err(|e| ExportError::Serialization(format!("Failed to encode screenshot: {}", e)))?;

    Ok(encoded)
}
