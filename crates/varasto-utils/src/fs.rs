use std::{fs, path::Path};

use crate::error::{FileSystemError, FileSystemResult};

/// Creates a directory and its parents if it doesn't exist.
///
/// # Errors
///
/// * [`FileSystemError::NotADirectory`] if the path exists but is not a directory
/// * [`FileSystemError::Directory`] if the directory cannot be created
pub fn ensure_dir_exists<P: AsRef<Path>>(path: P) -> FileSystemResult<()> {
    let path = path.as_ref();

    if path.exists() {
        if !path.is_dir() {
            return Err(FileSystemError::NotADirectory {
                path: path.to_path_buf(),
            });
        }
        return Ok(());
    }

    fs::create_dir_all(path).map_err(|err| FileSystemError::Directory {
        path: path.to_path_buf(),
        action: "create",
        source: err,
    })
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_ensure_dir_exists_creates_nested() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        ensure_dir_exists(&nested).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn test_ensure_dir_exists_rejects_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("file");
        fs::write(&file, "x").unwrap();
        assert!(matches!(
            ensure_dir_exists(&file),
            Err(FileSystemError::NotADirectory { .. })
        ));
    }
}
