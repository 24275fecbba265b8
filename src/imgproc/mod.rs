//! Crop, rotate, and save operations applied to staged images on disk.

use std::path::{Path, PathBuf};

use image::DynamicImage;
use thiserror::Error;

use crate::geometry::PixelRect;

pub type ImageOpResult<T> = std::result::Result<T, ImageOpError>;

#[derive(Debug, Error)]
pub enum ImageOpError {
    #[error("failed to decode image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to encode image {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Crops the staged image to `rect` and writes the result to `output`.
/// Returns the saved dimensions.
pub fn crop_to_file(staged: &Path, output: &Path, rect: PixelRect) -> ImageOpResult<(u32, u32)> {
    let image = decode(staged)?;
    let cropped = image.crop_imm(rect.x, rect.y, rect.width, rect.height);
    encode(&cropped, output)?;
    tracing::info!(
        output = %output.display(),
        width = cropped.width(),
        height = cropped.height(),
        "saved cropped image"
    );
    Ok((cropped.width(), cropped.height()))
}

/// Rotates the staged image 90 degrees clockwise and persists it in place.
/// Returns the new dimensions.
pub fn rotate_in_place(staged: &Path) -> ImageOpResult<(u32, u32)> {
    let rotated = decode(staged)?.rotate90();
    encode(&rotated, staged)?;
    tracing::info!(
        path = %staged.display(),
        width = rotated.width(),
        height = rotated.height(),
        "rotated staged image"
    );
    Ok((rotated.width(), rotated.height()))
}

fn decode(path: &Path) -> ImageOpResult<DynamicImage> {
    image::open(path).map_err(|source| ImageOpError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

fn encode(image: &DynamicImage, path: &Path) -> ImageOpResult<()> {
    image.save(path).map_err(|source| ImageOpError::Encode {
        path: path.to_path_buf(),
        source,
    })
}
