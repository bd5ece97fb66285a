//! Image file boundary.
//!
//! Converts between image files and [`PixelGrid`]s. Only lossless containers
//! (PNG, BMP, TIFF) are accepted as carriers, since recompression would
//! destroy embedded low-order bits. Stego output is always written as PNG.

use image::io::Reader as ImageReader;
use image::{
    DynamicImage, GenericImageView, GrayAlphaImage, GrayImage, ImageFormat, RgbImage, RgbaImage,
};
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;

use crate::error::StegoError;
use crate::grid::PixelGrid;

/// Errors that can occur at the image file boundary.
#[derive(Error, Debug)]
pub enum CarrierError {
    #[error("Lossy image format {0:?} cannot carry LSB data; convert the carrier to PNG first")]
    LossyFormat(ImageFormat),

    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("Image load error: {0}")]
    ImageLoadError(String),

    #[error("Image save error: {0}")]
    ImageSaveError(String),

    #[error("Invalid pixel grid: {0}")]
    Grid(#[from] StegoError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Formats whose decoded pixels survive a save/load cycle unchanged.
pub fn is_lossless(format: ImageFormat) -> bool {
    matches!(format, ImageFormat::Png | ImageFormat::Bmp | ImageFormat::Tiff)
}

fn check_format(format: Option<ImageFormat>) -> Result<(), CarrierError> {
    match format {
        Some(f) if is_lossless(f) => Ok(()),
        Some(f @ (ImageFormat::Jpeg | ImageFormat::WebP)) => Err(CarrierError::LossyFormat(f)),
        Some(f) => Err(CarrierError::UnsupportedFormat(format!("{f:?}"))),
        None => Err(CarrierError::UnsupportedFormat("unrecognized".to_string())),
    }
}

/// Loads a lossless carrier image from disk.
pub fn load<P: AsRef<Path>>(path: P) -> Result<PixelGrid, CarrierError> {
    let reader = ImageReader::open(path)?.with_guessed_format()?;
    check_format(reader.format())?;
    let image = reader
        .decode()
        .map_err(|e| CarrierError::ImageLoadError(e.to_string()))?;
    from_image(&image)
}

/// Loads a lossless carrier image from encoded bytes.
pub fn from_bytes(bytes: &[u8]) -> Result<PixelGrid, CarrierError> {
    let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    check_format(reader.format())?;
    let image = reader
        .decode()
        .map_err(|e| CarrierError::ImageLoadError(e.to_string()))?;
    from_image(&image)
}

/// Converts a decoded image into a grid, keeping its channel layout.
///
/// 16-bit and float images are narrowed to 8 bits per channel.
pub fn from_image(image: &DynamicImage) -> Result<PixelGrid, CarrierError> {
    let (width, height) = image.dimensions();
    let grid = match image {
        DynamicImage::ImageLuma8(img) => PixelGrid::new(width, height, 1, img.as_raw().clone()),
        DynamicImage::ImageLumaA8(img) => PixelGrid::new(width, height, 2, img.as_raw().clone()),
        DynamicImage::ImageRgb8(img) => PixelGrid::new(width, height, 3, img.as_raw().clone()),
        DynamicImage::ImageRgba8(img) => PixelGrid::new(width, height, 4, img.as_raw().clone()),
        other if other.color().has_alpha() => {
            PixelGrid::new(width, height, 4, other.to_rgba8().into_raw())
        }
        other => PixelGrid::new(width, height, 3, other.to_rgb8().into_raw()),
    }?;
    Ok(grid)
}

/// Converts a grid back into an image with the matching color type.
pub fn to_image(grid: &PixelGrid) -> Result<DynamicImage, CarrierError> {
    let (w, h) = (grid.width(), grid.height());
    let data = grid.as_raw().to_vec();
    let mismatch = || CarrierError::ImageSaveError("buffer does not match dimensions".to_string());
    let image = match grid.channels() {
        1 => DynamicImage::ImageLuma8(GrayImage::from_raw(w, h, data).ok_or_else(mismatch)?),
        2 => DynamicImage::ImageLumaA8(GrayAlphaImage::from_raw(w, h, data).ok_or_else(mismatch)?),
        3 => DynamicImage::ImageRgb8(RgbImage::from_raw(w, h, data).ok_or_else(mismatch)?),
        4 => DynamicImage::ImageRgba8(RgbaImage::from_raw(w, h, data).ok_or_else(mismatch)?),
        n => return Err(CarrierError::UnsupportedFormat(format!("{n} channels"))),
    };
    Ok(image)
}

/// Saves a grid as PNG, whatever the path's extension says.
pub fn save<P: AsRef<Path>>(grid: &PixelGrid, path: P) -> Result<(), CarrierError> {
    to_image(grid)?
        .save_with_format(path, ImageFormat::Png)
        .map_err(|e| CarrierError::ImageSaveError(e.to_string()))
}

/// Encodes a grid as PNG bytes.
pub fn to_png_bytes(grid: &PixelGrid) -> Result<Vec<u8>, CarrierError> {
    let mut bytes = Vec::new();
    to_image(grid)?
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| CarrierError::ImageSaveError(e.to_string()))?;
    Ok(bytes)
}
