//! Transient file list consumed by the packager.
//!
//! The manifest is a single line pairing the mod tree with the game's own
//! root. It is written right before the packager runs and removed right
//! after; [`ManifestGuard`] ties its lifetime to the packaging attempt.

use crate::constants::{GAME_ROOT_GLOB, MANIFEST_FILE};
use crate::error::PakResult;
use std::path::{Path, PathBuf};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Owns a written manifest and deletes it when dropped.
#[derive(Debug)]
#[must_use = "the manifest is deleted as soon as the guard is dropped"]
pub struct ManifestGuard {
    path: PathBuf,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl ManifestGuard {
    /// Path of the manifest file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl Drop for ManifestGuard {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!("Removed manifest {}", self.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("Failed to remove manifest {}: {}", self.path.display(), e),
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Manifest line for `source_dir`: `"<source_dir>\*.*" "..\..\..\*.*"`.
pub fn manifest_line(source_dir: &Path) -> String {
    format!("\"{}\\*.*\" \"{}\"", source_dir.display(), GAME_ROOT_GLOB)
}

/// Default manifest location, next to the running executable.
pub fn default_manifest_path() -> PakResult<PathBuf> {
    let exe = std::env::current_exe()?;
    let dir = exe.parent().unwrap_or_else(|| Path::new("."));
    Ok(dir.join(MANIFEST_FILE))
}

/// Write the manifest for `source_dir` to `path`, replacing any previous one.
pub fn write_manifest(path: &Path, source_dir: &Path) -> PakResult<ManifestGuard> {
    std::fs::write(path, manifest_line(source_dir))?;
    tracing::debug!("Wrote manifest {}", path.display());

    Ok(ManifestGuard {
        path: path.to_path_buf(),
    })
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_manifest_line() {
        assert_eq!(
            manifest_line(Path::new("/mods/CookieHat")),
            r#""/mods/CookieHat\*.*" "..\..\..\*.*""#
        );
        assert_eq!(
            manifest_line(Path::new(r"C:\ModFiles\CookieHat")),
            r#""C:\ModFiles\CookieHat\*.*" "..\..\..\*.*""#
        );
    }

    #[test]
    fn test_write_overwrites_and_guard_deletes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(MANIFEST_FILE);
        std::fs::write(&path, "stale content from an earlier run").unwrap();

        let guard = write_manifest(&path, Path::new("/mods/CookieHat")).unwrap();
        assert_eq!(guard.path(), path);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            r#""/mods/CookieHat\*.*" "..\..\..\*.*""#
        );

        drop(guard);
        assert!(!path.exists());
    }

    #[test]
    fn test_guard_tolerates_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(MANIFEST_FILE);
        let guard = write_manifest(&path, Path::new("/mods/Hat")).unwrap();
        std::fs::remove_file(&path).unwrap();
        drop(guard);
        assert!(!path.exists());
    }

    #[test]
    fn test_default_manifest_path_sits_beside_executable() {
        let path = default_manifest_path().unwrap();
        let exe = std::env::current_exe().unwrap();
        assert_eq!(path.parent(), exe.parent());
        assert_eq!(path.file_name().unwrap(), MANIFEST_FILE);
    }
}
