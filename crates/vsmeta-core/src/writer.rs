//! Sidecar output.
//!
//! The sidecar is written to a temporary file in the target directory and
//! renamed into place, so an interrupted run never leaves a truncated
//! `.vsmeta` where the consumer can see it.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::Error;

/// Atomically write `bytes` to `target`, replacing any existing file.
pub fn write_sidecar(target: &Path, bytes: &[u8]) -> Result<(), Error> {
    let dir = target.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir).map_err(Error::Write)?;
    tmp.write_all(bytes).map_err(Error::Write)?;
    tmp.persist(target).map_err(|e| Error::Write(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_write_creates_file_with_exact_bytes() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("film.mkv.vsmeta");
        write_sidecar(&target, &[0x08, 0x01, 0x12, 0x00]).unwrap();
        assert_eq!(fs::read(&target).unwrap(), vec![0x08, 0x01, 0x12, 0x00]);
    }

    #[test]
    fn test_write_replaces_existing_file() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("film.mkv.vsmeta");
        fs::write(&target, b"old").unwrap();
        write_sidecar(&target, b"new contents").unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"new contents");
    }

    #[test]
    fn test_no_stray_temp_files_left_behind() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("film.mkv.vsmeta");
        write_sidecar(&target, b"x").unwrap();
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_missing_directory_is_a_write_error() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("gone").join("film.mkv.vsmeta");
        let err = write_sidecar(&target, b"x").unwrap_err();
        assert!(matches!(err, Error::Write(_)));
    }
}
