use crate::error::{Result, VdToolError};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Writes `text` to `path`, replacing any existing file.
///
/// The text goes to a temporary file in the same directory first and is
/// renamed into place once flushed, so a failed write never leaves a
/// truncated output behind. The temporary file is removed on drop.
pub fn write_output(path: &Path, text: &str) -> Result<()> {
    let write_error = |source: std::io::Error| VdToolError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    // Replacing a file keeps its permissions.
    let existing = fs::metadata(path)
        .ok()
        .filter(|metadata| metadata.is_file())
        .map(|metadata| metadata.permissions());

    let mut temp = new_temp_file(dir).map_err(write_error)?;
    temp.write_all(text.as_bytes()).map_err(write_error)?;
    temp.flush().map_err(write_error)?;

    if let Some(permissions) = existing {
        temp.as_file().set_permissions(permissions).map_err(write_error)?;
    }

    temp.persist(path).map_err(|e| write_error(e.error))?;
    Ok(())
}

/// Temp files default to owner-only; new outputs get the mode a plain
/// `File::create` would, umask included.
#[cfg(unix)]
fn new_temp_file(dir: &Path) -> io::Result<NamedTempFile> {
    use std::os::unix::fs::PermissionsExt;
    tempfile::Builder::new()
        .permissions(fs::Permissions::from_mode(0o666))
        .tempfile_in(dir)
}

#[cfg(not(unix))]
fn new_temp_file(dir: &Path) -> io::Result<NamedTempFile> {
    NamedTempFile::new_in(dir)
}

/// Copies a source that failed to convert next to the outputs as
/// `<name>.<extension>`. Best effort: failures are logged and swallowed.
pub fn keep_broken_copy(source: &Path, output_dir: &Path, extension: &str) -> Option<PathBuf> {
    let name = source.file_name()?.to_string_lossy();
    let target = output_dir.join(format!("{}.{}", name, extension.trim_start_matches('.')));

    match fs::copy(source, &target) {
        Ok(_) => {
            log::debug!("kept broken input as {}", target.display());
            Some(target)
        }
        Err(e) => {
            log::warn!("could not keep broken input {}: {}", source.display(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_creates_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("icon.xml");

        write_output(&path, "<vector/>\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "<vector/>\n");
    }

    #[test]
    fn test_write_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("icon.xml");
        fs::write(&path, "old content that is longer").unwrap();

        write_output(&path, "new").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    #[cfg(unix)]
    #[test]
    fn test_new_output_gets_default_file_mode() {
        use std::os::unix::fs::PermissionsExt;
        let temp_dir = TempDir::new().unwrap();
        let reference = temp_dir.path().join("reference.xml");
        fs::write(&reference, "").unwrap();
        let path = temp_dir.path().join("icon.xml");

        write_output(&path, "<vector/>").unwrap();

        let mode = |p: &Path| fs::metadata(p).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(&path), mode(&reference));
    }

    #[cfg(unix)]
    #[test]
    fn test_overwrite_keeps_existing_permissions() {
        use std::os::unix::fs::PermissionsExt;
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("icon.xml");
        fs::write(&path, "old").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();

        write_output(&path, "new").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        assert_eq!(fs::metadata(&path).unwrap().permissions().mode() & 0o777, 0o640);
    }

    #[test]
    fn test_write_failure_leaves_no_temp_files() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join("icon.xml");

        let result = write_output(&path, "<vector/>");
        assert!(matches!(result, Err(VdToolError::Write { .. })));
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_write_into_directory_path_fails_cleanly() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("icon.xml");
        fs::create_dir(&target).unwrap();

        assert!(write_output(&target, "<vector/>").is_err());
        // Only the directory we made is left.
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_keep_broken_copy() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("b.svg");
        fs::write(&source, "<svg").unwrap();
        let out_dir = temp_dir.path().join("out");
        fs::create_dir(&out_dir).unwrap();

        let kept = keep_broken_copy(&source, &out_dir, "broken").unwrap();
        assert_eq!(kept, out_dir.join("b.svg.broken"));
        assert_eq!(fs::read_to_string(kept).unwrap(), "<svg");

        assert!(keep_broken_copy(&source, &temp_dir.path().join("nope"), "broken").is_none());
    }
}
