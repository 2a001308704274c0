//! Writing rendered output to disk.

use std::io::{self, Write};
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use tempfile::NamedTempFile;

/// Writes `contents` to `path`, replacing any existing file.
///
/// The data is written to a temporary file next to `path` and renamed into
/// place, so the destination either keeps its old contents or holds the
/// complete new output. On Unix the file is readable and writable by the
/// owner only (0o600), since it usually contains secrets.
pub fn write_output(path: &Path, contents: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(contents)?;
    file.as_file().sync_all()?;

    #[cfg(unix)]
    {
        let mut permissions = file.as_file().metadata()?.permissions();
        permissions.set_mode(0o600);
        std::fs::set_permissions(file.path(), permissions)?;
    }

    file.persist(path).map_err(|e| e.error)?;
    tracing::info!(path = %path.display(), bytes = contents.len(), "wrote output file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_writes_new_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("app.conf");

        write_output(&path, b"password = s3cr3t\n").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"password = s3cr3t\n");
    }

    #[test]
    fn test_replaces_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("app.env");
        fs::write(&path, "OLD=contents that are longer than the new ones\n").unwrap();

        write_output(&path, b"NEW=1\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "NEW=1\n");
        let leftovers: Vec<_> = fs::read_dir(temp_dir.path()).unwrap().collect();
        assert_eq!(leftovers.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_output_is_owner_only() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("secrets.env");

        write_output(&path, b"A=1").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_missing_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("does/not/exist/app.conf");

        assert!(write_output(&path, b"x").is_err());
        assert!(!path.exists());
    }
}
