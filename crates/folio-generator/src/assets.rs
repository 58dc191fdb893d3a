//! Static asset copying.
//!
//! Copies the static directory verbatim into the output, and copies files
//! that live next to a post (`blog/<name>/index.md`) under the post's URL
//! so relative banners, images and videos resolve.

use std::{
    fs,
    path::{Path, PathBuf},
};

use folio_core::Post;
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Asset copying errors.
#[derive(Debug, Error)]
pub enum AssetError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory traversal error.
    #[error("failed to walk asset directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// A file outside the source directory.
    #[error("invalid asset path: {0}")]
    InvalidPath(PathBuf),
}

/// Result type for asset operations.
pub type Result<T> = std::result::Result<T, AssetError>;

/// Copies asset files into the output directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssetCopier;

impl AssetCopier {
    /// Create a new asset copier.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Copy every non-hidden file under `source_dir` into `dest_dir`,
    /// keeping relative paths. Returns the number of files copied.
    pub fn copy_static(&self, source_dir: &Path, dest_dir: &Path) -> Result<usize> {
        if !source_dir.exists() {
            debug!(dir = %source_dir.display(), "static directory does not exist, skipping");
            return Ok(0);
        }

        info!(
            source = %source_dir.display(),
            dest = %dest_dir.display(),
            "copying static assets"
        );
        self.copy_tree(source_dir, dest_dir, |_| true)
    }

    /// Copy files that sit beside a bundled post into its output directory.
    ///
    /// Only posts stored as `<dir>/index.md` have bundles. Markdown files
    /// are skipped.
    pub fn copy_post_bundle(&self, post: &Post, output_dir: &Path) -> Result<usize> {
        let Some(source) = post.source_path.as_deref() else {
            return Ok(0);
        };
        if source.file_stem().is_none_or(|stem| stem != "index") {
            return Ok(0);
        }
        let Some(bundle_dir) = source.parent() else {
            return Ok(0);
        };

        let dest = output_dir.join(post.url.trim_matches('/'));
        self.copy_tree(bundle_dir, &dest, |path| {
            path.extension().is_none_or(|ext| ext != "md")
        })
    }

    fn copy_tree(&self, source_dir: &Path, dest_dir: &Path, include: impl Fn(&Path) -> bool) -> Result<usize> {
        let mut copied = 0;
        let walker = WalkDir::new(source_dir)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e.path()));

        for entry in walker {
            let entry = entry?;
            let path = entry.path();
            if !entry.file_type().is_file() || !include(path) {
                continue;
            }

            let relative = path
                .strip_prefix(source_dir)
                .map_err(|_| AssetError::InvalidPath(path.to_path_buf()))?;
            let dest_path = dest_dir.join(relative);

            if let Some(parent) = dest_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(path, &dest_path)?;
            copied += 1;

            debug!(src = %path.display(), dest = %dest_path.display(), "copied asset");
        }

        Ok(copied)
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|n| n.to_string_lossy().starts_with('.'))
}

#[cfg(test)]
mod tests {
    use folio_core::PostMeta;
    use tempfile::TempDir;

    use super::*;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn bundled_post(source: &Path) -> Post {
        let meta = PostMeta {
            title: "Stop Using GIFs".to_string(),
            ..Default::default()
        };
        Post::new(meta, String::new(), String::new(), source)
    }

    #[test]
    fn test_copy_static() {
        let source = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        write(&source.path().join("style.css"), "body { color: red; }");
        write(&source.path().join("img/logo.png"), "png");
        write(&source.path().join(".DS_Store"), "junk");

        let copied = AssetCopier::new().copy_static(source.path(), dest.path()).unwrap();

        assert_eq!(copied, 2);
        assert!(dest.path().join("style.css").exists());
        assert!(dest.path().join("img/logo.png").exists());
        assert!(!dest.path().join(".DS_Store").exists());
    }

    #[test]
    fn test_copy_static_missing_dir() {
        let dest = TempDir::new().unwrap();
        let copied = AssetCopier::new()
            .copy_static(&dest.path().join("missing"), dest.path())
            .unwrap();
        assert_eq!(copied, 0);
    }

    #[test]
    fn test_copy_post_bundle() {
        let content = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let bundle = content.path().join("blog/stop-using-gifs");
        write(&bundle.join("index.md"), "---\ntitle: x\n---\n");
        write(&bundle.join("banner.png"), "png");
        write(&bundle.join("clips/demo.webm"), "webm");

        let post = bundled_post(&bundle.join("index.md"));
        let copied = AssetCopier::new().copy_post_bundle(&post, dest.path()).unwrap();

        assert_eq!(copied, 2);
        assert!(dest.path().join("stop-using-gifs/banner.png").exists());
        assert!(dest.path().join("stop-using-gifs/clips/demo.webm").exists());
        assert!(!dest.path().join("stop-using-gifs/index.md").exists());
    }

    #[test]
    fn test_single_file_post_has_no_bundle() {
        let dest = TempDir::new().unwrap();
        let post = bundled_post(Path::new("blog/standalone.md"));
        assert_eq!(AssetCopier::new().copy_post_bundle(&post, dest.path()).unwrap(), 0);
    }
}
