//! Staging normalization: bounded-area, losslessly re-encoded copies of the
//! raw input photos.

use std::fs;
use std::io;
use std::path::PathBuf;

use image::imageops::FilterType;
use image::DynamicImage;
use thiserror::Error;

use crate::workspace::Workspace;

pub type PrepareResult<T> = std::result::Result<T, PrepareError>;

#[derive(Debug, Error)]
pub enum PrepareError {
    #[error("failed to list input directory {path}: {source}")]
    ListInput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write staged image {path}: {source}")]
    WriteStaged {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct PrepareOptions {
    /// Staged images are resized down to at most this many pixels.
    pub max_pixel_area: u64,
    /// Re-stage files that already have a staged copy.
    pub force_restage: bool,
    pub filter: FilterType,
}

/// Per-run outcome counts, reported once at the end of the staging pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PrepareReport {
    pub staged: usize,
    pub skipped_existing: usize,
    pub unreadable: usize,
}

/// Walks the input directory and writes a normalized copy of every photo
/// into staging. Already-staged files are skipped unless `force_restage`;
/// unreadable sources are skipped with a warning so one bad file never
/// aborts the batch.
pub fn prepare_staging(workspace: &Workspace, options: PrepareOptions) -> PrepareResult<PrepareReport> {
    let listing = fs::read_dir(workspace.input_dir()).map_err(|source| PrepareError::ListInput {
        path: workspace.input_dir().to_path_buf(),
        source,
    })?;

    let mut sources = Vec::new();
    for entry in listing {
        let entry = entry.map_err(|source| PrepareError::ListInput {
            path: workspace.input_dir().to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_file() {
            sources.push(path);
        }
    }
    sources.sort();

    let mut report = PrepareReport::default();
    for source in sources {
        let staged = workspace.staged_path_for(&source);
        if !options.force_restage && staged.exists() {
            report.skipped_existing += 1;
            continue;
        }

        let image = match image::open(&source) {
            Ok(image) => image,
            Err(err) => {
                tracing::warn!(path = %source.display(), %err, "skipping unreadable source image");
                report.unreadable += 1;
                continue;
            }
        };

        let image = bound_pixel_area(image, options.max_pixel_area, options.filter);
        image
            .save(&staged)
            .map_err(|source| PrepareError::WriteStaged {
                path: staged.clone(),
                source,
            })?;
        tracing::info!(
            source = %source.display(),
            staged = %staged.display(),
            width = image.width(),
            height = image.height(),
            "staged image"
        );
        report.staged += 1;
    }

    Ok(report)
}

/// Dimensions after bounding `width x height` to `max_pixel_area`, or `None`
/// when the image already fits. Both axes shrink by the same factor
/// `sqrt(area / max_pixel_area)`, so the aspect ratio survives up to
/// integer truncation.
pub(crate) fn bounded_dimensions(width: u32, height: u32, max_pixel_area: u64) -> Option<(u32, u32)> {
    let area = u64::from(width) * u64::from(height);
    let max_pixel_area = max_pixel_area.max(1);
    if area <= max_pixel_area {
        return None;
    }

    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let factor = (area as f64 / max_pixel_area as f64).sqrt();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let bounded = (
        ((f64::from(width) / factor) as u32).max(1),
        ((f64::from(height) / factor) as u32).max(1),
    );
    Some(bounded)
}

fn bound_pixel_area(image: DynamicImage, max_pixel_area: u64, filter: FilterType) -> DynamicImage {
    match bounded_dimensions(image.width(), image.height(), max_pixel_area) {
        Some((width, height)) => image.resize_exact(width, height, filter),
        None => image,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn test_workspace(name: &str) -> Workspace {
        let root = std::env::temp_dir().join(format!("squarecrop-prepare-{name}"));
        let _ = fs::remove_dir_all(&root);
        let workspace = Workspace::under_root(&root, "input", "staging", "output");
        workspace
            .ensure_directories()
            .expect("test workspace should be creatable");
        workspace
    }

    // RGB rather than RGBA so the same helper can write JPEG sources.
    fn write_photo(dir: &Path, name: &str, width: u32, height: u32) {
        let image = image::RgbImage::from_pixel(width, height, image::Rgb([120, 80, 40]));
        image.save(dir.join(name)).expect("test photo should save");
    }

    fn options(max_pixel_area: u64) -> PrepareOptions {
        PrepareOptions {
            max_pixel_area,
            force_restage: false,
            filter: FilterType::Triangle,
        }
    }

    #[test]
    fn images_under_the_bound_are_staged_unresized() {
        let workspace = test_workspace("unresized");
        write_photo(workspace.input_dir(), "small.png", 400, 300);

        let report = prepare_staging(&workspace, options(300_000)).expect("staging should succeed");
        assert_eq!(report.staged, 1);

        let staged = image::open(workspace.staging_dir().join("small.png"))
            .expect("staged copy should decode");
        assert_eq!((staged.width(), staged.height()), (400, 300));
    }

    #[test]
    fn oversized_images_are_bounded_with_aspect_preserved() {
        let workspace = test_workspace("bounded");
        write_photo(workspace.input_dir(), "big.png", 800, 600);

        let report = prepare_staging(&workspace, options(300_000)).expect("staging should succeed");
        assert_eq!(report.staged, 1);

        let staged = image::open(workspace.staging_dir().join("big.png"))
            .expect("staged copy should decode");
        let (width, height) = (staged.width(), staged.height());
        assert!(u64::from(width) * u64::from(height) <= 300_000);

        let source_ratio = 800.0 / 600.0;
        let staged_ratio = f64::from(width) / f64::from(height);
        assert!((source_ratio - staged_ratio).abs() < 0.01);
    }

    #[test]
    fn second_run_skips_already_staged_files() {
        let workspace = test_workspace("idempotent");
        write_photo(workspace.input_dir(), "a.png", 200, 200);
        write_photo(workspace.input_dir(), "b.jpg", 200, 200);

        let first = prepare_staging(&workspace, options(300_000)).expect("first run should succeed");
        assert_eq!(first.staged, 2);

        let second =
            prepare_staging(&workspace, options(300_000)).expect("second run should succeed");
        assert_eq!(second.staged, 0);
        assert_eq!(second.skipped_existing, 2);
    }

    #[test]
    fn force_restage_rewrites_existing_staged_files() {
        let workspace = test_workspace("force");
        write_photo(workspace.input_dir(), "a.png", 200, 200);

        prepare_staging(&workspace, options(300_000)).expect("first run should succeed");
        let mut forced = options(300_000);
        forced.force_restage = true;

        let report = prepare_staging(&workspace, forced).expect("forced run should succeed");
        assert_eq!(report.staged, 1);
        assert_eq!(report.skipped_existing, 0);
    }

    #[test]
    fn unreadable_sources_are_counted_and_skipped() {
        let workspace = test_workspace("unreadable");
        write_photo(workspace.input_dir(), "good.png", 100, 100);
        fs::write(workspace.input_dir().join("broken.jpg"), b"not an image")
            .expect("broken file should be writable");

        let report = prepare_staging(&workspace, options(300_000)).expect("staging should succeed");
        assert_eq!(report.staged, 1);
        assert_eq!(report.unreadable, 1);
        assert!(!workspace.staging_dir().join("broken.png").exists());
    }

    #[test]
    fn staged_copies_always_use_the_png_extension() {
        let workspace = test_workspace("extension");
        write_photo(workspace.input_dir(), "photo.jpg", 100, 100);

        prepare_staging(&workspace, options(300_000)).expect("staging should succeed");
        assert!(workspace.staging_dir().join("photo.png").is_file());
    }

    #[test]
    fn bounded_dimensions_leave_fitting_images_alone() {
        assert_eq!(bounded_dimensions(400, 300, 300_000), None);
        assert_eq!(bounded_dimensions(547, 547, 300_000), None);
    }

    #[test]
    fn bounded_dimensions_scale_both_axes_by_the_same_factor() {
        let (width, height) =
            bounded_dimensions(800, 600, 300_000).expect("oversized image should shrink");
        // factor = sqrt(480000 / 300000) ~= 1.2649
        assert_eq!((width, height), (632, 474));
        assert!(u64::from(width) * u64::from(height) <= 300_000);
    }

    #[test]
    fn bounded_dimensions_never_collapse_to_zero() {
        let (width, height) =
            bounded_dimensions(10_000, 1, 100).expect("extreme aspect should still bound");
        assert!(width >= 1 && height >= 1);
    }
}
