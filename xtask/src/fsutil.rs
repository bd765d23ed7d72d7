//! Filesystem helpers shared by the build steps.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

/// Create `dir` and all missing parents. Existing directories are fine.
pub fn makedirs(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("Creating directory {}", dir.display()))
}

/// Fail if `link` is a real directory, which [`mklink`] would refuse to replace.
pub fn ensure_linkable(link: &Path) -> Result<()> {
    match fs::symlink_metadata(link) {
        Ok(meta) if meta.is_dir() => bail!(
            "{} is a real directory, not a link; remove it and rerun",
            link.display()
        ),
        _ => Ok(()),
    }
}

/// Point `link` at `target`, replacing whatever is at `link` already.
///
/// A real directory at `link` is left alone and reported as an error.
pub fn mklink(link: &Path, target: &Path) -> Result<()> {
    if let Ok(meta) = fs::symlink_metadata(link) {
        if meta.file_type().is_symlink() || meta.is_file() {
            fs::remove_file(link)
                .with_context(|| format!("Removing stale link {}", link.display()))?;
        } else {
            bail!(
                "Refusing to replace directory {} with a link to {}",
                link.display(),
                target.display()
            );
        }
    }
    symlink(target, link)
        .with_context(|| format!("Linking {} -> {}", link.display(), target.display()))
}

#[cfg(unix)]
fn symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_dir(target, link)
}
