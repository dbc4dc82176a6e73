//! Letterbox transform: fit the upload into the requested box, centre it on a
//! fixed white square canvas and re-encode as JPEG.
use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{ColorType, DynamicImage, GenericImageView, Rgba, RgbaImage};

use super::dimensions::{NormalizedDimensions, CANVAS_SIZE};
use crate::error::StudioError;

/// JPEG quality used for every generated image.
pub const JPEG_QUALITY: u8 = 90;

const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Decodes `bytes`, letterboxes them onto the canvas and encodes the result.
///
/// The source is only ever scaled down. Decoder errors surface as
/// [`StudioError::Internal`] with the decoder's message.
pub fn letterbox_jpeg(bytes: &[u8], dims: &NormalizedDimensions) -> Result<Vec<u8>, StudioError> {
    let source = image::load_from_memory(bytes)?;
    let canvas = letterbox(&source, dims);
    encode_jpeg(canvas)
}

/// Builds the `CANVAS_SIZE`² canvas with `source` fitted and centred inside
/// the target box described by `dims`.
pub fn letterbox(source: &DynamicImage, dims: &NormalizedDimensions) -> RgbaImage {
    let fitted = fit_within(source, dims.width, dims.height);
    let (fw, fh) = fitted.dimensions();

    let x = dims.pad_left + (dims.width - fw) / 2;
    let y = dims.pad_top + (dims.height - fh) / 2;

    let mut canvas = RgbaImage::from_pixel(CANVAS_SIZE, CANVAS_SIZE, BACKGROUND);
    imageops::overlay(&mut canvas, &fitted.to_rgba8(), x as i64, y as i64);
    canvas
}

/// Scales `source` down to fit `max_w`×`max_h`, preserving aspect ratio.
/// Images already inside the box are returned unchanged.
fn fit_within(source: &DynamicImage, max_w: u32, max_h: u32) -> DynamicImage {
    let (w, h) = source.dimensions();
    if w <= max_w && h <= max_h {
        return source.clone();
    }
    source.resize(max_w, max_h, FilterType::Lanczos3)
}

fn encode_jpeg(canvas: RgbaImage) -> Result<Vec<u8>, StudioError> {
    // The canvas is fully opaque, so dropping alpha loses nothing.
    let rgb = DynamicImage::ImageRgba8(canvas).into_rgb8();
    let mut out = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY).encode(
        rgb.as_raw(),
        rgb.width(),
        rgb.height(),
        ColorType::Rgb8,
    )?;
    Ok(out.into_inner())
}
