//! Filesystem plumbing for executed actions.
//!
//! Directory and file modes are fixed: directories `0777`, files `0666`.
//! Both are applied explicitly after creation so the process umask does not
//! narrow them. On non-Unix targets modes are left to the platform.

use super::error::ResourceError;
use crate::naming::is_thumbnail_of;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const DIR_MODE: u32 = 0o777;
pub const FILE_MODE: u32 = 0o666;

#[cfg(unix)]
fn apply_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn apply_mode(_path: &Path, _mode: u32) -> io::Result<()> {
    Ok(())
}

/// Make a written file world readable and writable.
///
/// Failure is logged and otherwise ignored: the file is in place and usable
/// by this process either way.
pub fn set_file_mode(path: &Path) {
    if let Err(e) = apply_mode(path, FILE_MODE) {
        tracing::warn!(path = %path.display(), error = %e, "could not set file permissions");
    }
}

/// Create `dir` and any missing ancestors.
///
/// Below `root`, every directory created gets [`DIR_MODE`]. Outside `root`
/// the directories are created with default permissions.
pub fn ensure_directories(root: &Path, dir: &Path) -> Result<(), ResourceError> {
    if dir.is_dir() {
        return Ok(());
    }

    let Ok(relative) = dir.strip_prefix(root) else {
        tracing::debug!(dir = %dir.display(), "creating directory outside the storage root");
        return fs::create_dir_all(dir)
            .map_err(|e| ResourceError::io("create directory", dir, e));
    };

    if !root.is_dir() {
        fs::create_dir_all(root).map_err(|e| ResourceError::io("create directory", root, e))?;
    }

    let mut current = root.to_path_buf();
    for component in relative.components() {
        current.push(component);
        if current.is_dir() {
            continue;
        }
        match fs::create_dir(&current) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists && current.is_dir() => continue,
            Err(e) => return Err(ResourceError::io("create directory", &current, e)),
        }
        apply_mode(&current, DIR_MODE)
            .map_err(|e| ResourceError::io("set directory permissions", &current, e))?;
    }
    Ok(())
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Move `from` to `to`, replacing whatever is at `to`.
///
/// Falls back to copy + remove when a plain rename is not possible, e.g.
/// when the upload directory sits on another filesystem.
pub fn move_file(from: &Path, to: &Path) -> Result<(), ResourceError> {
    if same_file(from, to) {
        return Ok(());
    }

    if to.is_file() {
        fs::remove_file(to).map_err(|e| ResourceError::io("remove existing file", to, e))?;
    }

    let Err(rename_err) = fs::rename(from, to) else {
        return Ok(());
    };

    tracing::debug!(
        from = %from.display(),
        to = %to.display(),
        error = %rename_err,
        "rename failed, copying instead"
    );
    fs::copy(from, to).map_err(|_| ResourceError::io("move file", to, rename_err))?;
    fs::remove_file(from).map_err(|e| ResourceError::io("remove moved file", from, e))
}

/// Remove the image at `path` together with all of its thumbnails.
///
/// Files that cannot be removed are logged and skipped. Returns the paths
/// that were removed.
pub fn remove_image_files(path: &Path) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if path.is_file() {
        candidates.push(path.to_path_buf());
    }

    let stem = path.file_stem().and_then(|s| s.to_str());
    let dir = path.parent().filter(|d| d.is_dir());
    if let (Some(stem), Some(dir)) = (stem, dir) {
        let thumbs = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| {
                entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| is_thumbnail_of(stem, name))
            })
            .map(|entry| entry.into_path());
        candidates.extend(thumbs);
    }

    let mut removed = Vec::with_capacity(candidates.len());
    for file in candidates {
        match fs::remove_file(&file) {
            Ok(()) => removed.push(file),
            Err(e) => {
                tracing::warn!(path = %file.display(), error = %e, "could not remove image file");
            }
        }
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn ensure_directories_creates_nested_under_root() {
        let root = tempfile::TempDir::new().unwrap();
        let dir = root.path().join("data/gallery/2024");

        ensure_directories(root.path(), &dir).unwrap();
        assert!(dir.is_dir());
    }

    #[cfg(unix)]
    #[test]
    fn created_directories_are_world_writable() {
        use std::os::unix::fs::PermissionsExt;

        let root = tempfile::TempDir::new().unwrap();
        let dir = root.path().join("a/b");
        ensure_directories(root.path(), &dir).unwrap();

        for created in [root.path().join("a"), dir] {
            let mode = fs::metadata(&created).unwrap().permissions().mode() & 0o777;
            assert_eq!(mode, DIR_MODE, "{}", created.display());
        }
    }

    #[test]
    fn ensure_directories_outside_root() {
        let root = tempfile::TempDir::new().unwrap();
        let other = tempfile::TempDir::new().unwrap();
        let dir = other.path().join("x/y");

        ensure_directories(root.path(), &dir).unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn ensure_directories_blocked_by_file_names_path() {
        let root = tempfile::TempDir::new().unwrap();
        touch(&root.path().join("blocker"));
        let dir = root.path().join("blocker/inner");

        let err = ensure_directories(root.path(), &dir).unwrap_err();
        assert!(
            matches!(&err, ResourceError::Io { path, .. } if path == &root.path().join("blocker")),
            "{err}"
        );
    }

    #[test]
    fn move_file_replaces_target() {
        let tmp = tempfile::TempDir::new().unwrap();
        let from = tmp.path().join("from.png");
        let to = tmp.path().join("to.png");
        fs::write(&from, b"new").unwrap();
        fs::write(&to, b"old").unwrap();

        move_file(&from, &to).unwrap();

        assert!(!from.exists());
        assert_eq!(fs::read(&to).unwrap(), b"new");
    }

    #[test]
    fn move_file_onto_itself_keeps_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let file = tmp.path().join("same.png");
        touch(&file);

        move_file(&file, &tmp.path().join("./same.png")).unwrap();
        assert!(file.exists());
    }

    #[test]
    fn move_missing_file_errors() {
        let tmp = tempfile::TempDir::new().unwrap();
        let err = move_file(&tmp.path().join("nope"), &tmp.path().join("to")).unwrap_err();
        assert!(matches!(err, ResourceError::Io { action: "move file", .. }));
    }

    #[cfg(unix)]
    #[test]
    fn set_file_mode_applies_0666() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::TempDir::new().unwrap();
        let file = tmp.path().join("f");
        touch(&file);
        set_file_mode(&file);

        let mode = fs::metadata(&file).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, FILE_MODE);
    }

    #[test]
    fn remove_image_files_takes_main_and_thumbnails_only() {
        let tmp = tempfile::TempDir::new().unwrap();
        let dir = tmp.path();
        for name in [
            "photo.jpg",
            "photo-thumb.png",
            "photo-thumb-small.png",
            "photo-2.jpg",
            "photo.gif",
            "photos-thumb.png",
        ] {
            touch(&dir.join(name));
        }

        let removed = remove_image_files(&dir.join("photo.jpg"));

        assert_eq!(
            removed,
            vec![
                dir.join("photo.jpg"),
                dir.join("photo-thumb-small.png"),
                dir.join("photo-thumb.png"),
            ]
        );
        assert!(dir.join("photo-2.jpg").exists());
        assert!(dir.join("photo.gif").exists());
        assert!(dir.join("photos-thumb.png").exists());
    }

    #[test]
    fn remove_image_files_missing_everything_is_quiet() {
        let tmp = tempfile::TempDir::new().unwrap();
        assert!(remove_image_files(&tmp.path().join("nothing/here.jpg")).is_empty());
    }
}
