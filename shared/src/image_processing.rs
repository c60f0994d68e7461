use image::codecs::jpeg::JpegEncoder;
use image::{imageops::FilterType, ColorType, DynamicImage};
use std::io::Cursor;

use crate::error::ResizeError;

/// Decoded output ready for the response body
#[derive(Debug)]
pub struct EncodedImage {
    pub width: u32,
    pub height: u32,
    pub bytes: Vec<u8>,
}

/// Load an image, sniffing the format from its content
pub fn decode(image_bytes: &[u8]) -> Result<DynamicImage, ResizeError> {
    image::load_from_memory(image_bytes).map_err(ResizeError::Decode)
}

/// Target size for a source image, or `None` when it should pass through.
///
/// Images never get upscaled: with a width the source passes through when it
/// is no wider than `width`; with only a height, when it is no taller than
/// `height`. Otherwise both requested dimensions are used as-is and a zero
/// dimension is derived from the source aspect ratio. A target larger than
/// `max_dimension` on either side is rejected.
pub fn target_dimensions(
    (src_width, src_height): (u32, u32),
    width: u32,
    height: u32,
    max_dimension: u32,
) -> Result<Option<(u32, u32)>, ResizeError> {
    let target = match (width, height) {
        (0, 0) => return Ok(None),
        (0, h) if src_height <= h => return Ok(None),
        (0, h) => (scale(src_width, h, src_height), h),
        (w, _) if src_width <= w => return Ok(None),
        (w, 0) => (w, scale(src_height, w, src_width)),
        (w, h) => (w, h),
    };

    if target.0 > max_dimension || target.1 > max_dimension {
        return Err(ResizeError::InvalidDimensions {
            width: i64::from(target.0),
            height: i64::from(target.1),
        });
    }
    Ok(Some(target))
}

/// `value * numerator / denominator`, rounded, never below 1
fn scale(value: u32, numerator: u32, denominator: u32) -> u32 {
    if denominator == 0 {
        return 1;
    }
    let scaled = (f64::from(value) * f64::from(numerator) / f64::from(denominator)).round();
    (scaled as u32).max(1)
}

/// Resize (if needed) with Lanczos3 and encode as JPEG
pub fn resize_to_jpeg(
    img: DynamicImage,
    width: u32,
    height: u32,
    quality: u8,
    max_dimension: u32,
) -> Result<EncodedImage, ResizeError> {
    let src = (img.width(), img.height());
    let img = match target_dimensions(src, width, height, max_dimension)? {
        Some((w, h)) => {
            tracing::debug!(
                from_width = img.width(),
                from_height = img.height(),
                to_width = w,
                to_height = h,
                "resizing"
            );
            img.resize_exact(w, h, FilterType::Lanczos3)
        }
        None => img,
    };

    let bytes = encode_jpeg(&img, quality)?;
    Ok(EncodedImage {
        width: img.width(),
        height: img.height(),
        bytes,
    })
}

/// JPEG has no alpha channel, so everything is flattened to RGB first
pub fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>, ResizeError> {
    let rgb = img.to_rgb8();
    let mut buf = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut buf, quality)
        .encode(rgb.as_raw(), rgb.width(), rgb.height(), ColorType::Rgb8)
        .map_err(ResizeError::Encode)?;
    Ok(buf.into_inner())
}
