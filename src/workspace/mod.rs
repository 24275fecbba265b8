use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

// Staged copies are always written losslessly so crop quality only depends
// on the original photo.
const STAGED_EXTENSION: &str = "png";

pub type WorkspaceResult<T> = std::result::Result<T, WorkspaceError>;

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("failed to create directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// The three sibling directories a cropping session works across: raw
/// photos in, normalized copies in staging, cropped squares out.
#[derive(Debug, Clone)]
pub struct Workspace {
    input_dir: PathBuf,
    staging_dir: PathBuf,
    output_dir: PathBuf,
}

impl Workspace {
    pub const fn with_dirs(input_dir: PathBuf, staging_dir: PathBuf, output_dir: PathBuf) -> Self {
        Self {
            input_dir,
            staging_dir,
            output_dir,
        }
    }

    pub fn under_root(root: &Path, input: &str, staging: &str, output: &str) -> Self {
        Self::with_dirs(root.join(input), root.join(staging), root.join(output))
    }

    /// Creates all three directories if absent. Failure here aborts startup;
    /// nothing else in the session can work without them.
    pub fn ensure_directories(&self) -> WorkspaceResult<()> {
        for path in [&self.input_dir, &self.staging_dir, &self.output_dir] {
            fs::create_dir_all(path).map_err(|source| WorkspaceError::CreateDirectory {
                path: path.clone(),
                source,
            })?;
        }
        Ok(())
    }

    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    pub fn staging_dir(&self) -> &Path {
        &self.staging_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Staging path for a raw input file: same stem, normalized extension.
    pub fn staged_path_for(&self, source: &Path) -> PathBuf {
        let mut staged = self.staging_dir.join(source.file_stem().unwrap_or_default());
        staged.set_extension(STAGED_EXTENSION);
        staged
    }

    /// Output path for a staged file: the cropped result keeps the staged
    /// file name, which is how the batch tracker recognizes finished work.
    pub fn output_path_for(&self, staged: &Path) -> PathBuf {
        self.output_dir.join(staged.file_name().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workspace() -> Workspace {
        Workspace::under_root(Path::new("/tmp/crop-root"), "input", "staging", "output")
    }

    #[test]
    fn under_root_builds_three_sibling_directories() {
        let workspace = workspace();
        assert_eq!(workspace.input_dir(), Path::new("/tmp/crop-root/input"));
        assert_eq!(workspace.staging_dir(), Path::new("/tmp/crop-root/staging"));
        assert_eq!(workspace.output_dir(), Path::new("/tmp/crop-root/output"));
    }

    #[test]
    fn staged_path_normalizes_the_extension() {
        let workspace = workspace();
        assert_eq!(
            workspace.staged_path_for(Path::new("/tmp/crop-root/input/holiday.JPG")),
            PathBuf::from("/tmp/crop-root/staging/holiday.png")
        );
        assert_eq!(
            workspace.staged_path_for(Path::new("/tmp/crop-root/input/scan")),
            PathBuf::from("/tmp/crop-root/staging/scan.png")
        );
    }

    #[test]
    fn output_path_keeps_the_staged_file_name() {
        let workspace = workspace();
        assert_eq!(
            workspace.output_path_for(Path::new("/tmp/crop-root/staging/holiday.png")),
            PathBuf::from("/tmp/crop-root/output/holiday.png")
        );
    }

    #[test]
    fn ensure_directories_creates_the_full_layout() {
        let root = std::env::temp_dir().join("squarecrop-workspace-layout");
        let _ = fs::remove_dir_all(&root);

        let workspace = Workspace::under_root(&root, "input", "staging", "output");
        workspace
            .ensure_directories()
            .expect("directory creation should succeed under temp dir");

        assert!(workspace.input_dir().is_dir());
        assert!(workspace.staging_dir().is_dir());
        assert!(workspace.output_dir().is_dir());

        // A second run over the existing layout is a no-op.
        workspace
            .ensure_directories()
            .expect("existing directories should be accepted");
    }
}
