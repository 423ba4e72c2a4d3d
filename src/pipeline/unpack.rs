//! Archive unpacking: replace the working directory with the archive's contents.
//!
//! The archive is opened and its central directory parsed *before* the
//! working directory is touched, so a corrupt or missing archive leaves the
//! previous extraction in place. Once the reset starts it is destructive and
//! not rolled back.

use crate::error::GameDataError;
use std::fs::{self, File};
use std::io;
use std::path::Path;
use tracing::{debug, info, warn};
use zip::ZipArchive;

/// What [`unpack_archive`] wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnpackSummary {
    /// Regular files extracted.
    pub files: usize,
    /// Directory entries created.
    pub dirs: usize,
    /// Entries skipped because their path would escape the working directory.
    pub skipped: usize,
}

/// Clear (or create) `work_dir` and extract the full contents of `archive` into it.
///
/// # Errors
/// - [`GameDataError::Archive`] if the archive is unreadable, corrupt, or an
///   entry cannot be written
/// - [`GameDataError::WorkDirReset`] if the directory cannot be removed or created
pub fn unpack_archive(archive: &Path, work_dir: &Path) -> Result<UnpackSummary, GameDataError> {
    let file = File::open(archive).map_err(|e| archive_error(archive, e))?;
    let mut zip = ZipArchive::new(file).map_err(|e| archive_error(archive, e))?;
    info!(
        "Unpacking {} ({} entries) into {}",
        archive.display(),
        zip.len(),
        work_dir.display()
    );

    reset_dir(work_dir)?;

    let mut summary = UnpackSummary::default();
    for i in 0..zip.len() {
        let mut entry = zip.by_index(i).map_err(|e| archive_error(archive, e))?;

        // Reject absolute paths and `..` components
        let Some(relative) = entry.enclosed_name() else {
            warn!("Skipping archive entry outside the working directory: {}", entry.name());
            summary.skipped += 1;
            continue;
        };
        let out_path = work_dir.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&out_path).map_err(|e| entry_error(archive, &out_path, e))?;
            summary.dirs += 1;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent).map_err(|e| entry_error(archive, &out_path, e))?;
        }
        let mut out_file = File::create(&out_path).map_err(|e| entry_error(archive, &out_path, e))?;
        let bytes = io::copy(&mut entry, &mut out_file)
            .map_err(|e| entry_error(archive, &out_path, e))?;
        debug!("Extracted {} ({} bytes)", out_path.display(), bytes);
        summary.files += 1;
    }

    info!(
        "Unpacked {} files, {} directories ({} skipped)",
        summary.files, summary.dirs, summary.skipped
    );
    Ok(summary)
}

/// Remove `dir` if present, then recreate it empty.
fn reset_dir(dir: &Path) -> Result<(), GameDataError> {
    match fs::remove_dir_all(dir) {
        Ok(()) => debug!("Removed previous contents of {}", dir.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(source) => {
            return Err(GameDataError::WorkDirReset {
                path: dir.to_path_buf(),
                source,
            })
        }
    }
    fs::create_dir_all(dir).map_err(|source| GameDataError::WorkDirReset {
        path: dir.to_path_buf(),
        source,
    })
}

fn archive_error(archive: &Path, e: impl std::fmt::Display) -> GameDataError {
    GameDataError::Archive {
        path: archive.to_path_buf(),
        detail: e.to_string(),
    }
}

fn entry_error(archive: &Path, out_path: &Path, e: io::Error) -> GameDataError {
    GameDataError::Archive {
        path: archive.to_path_buf(),
        detail: format!("cannot write '{}': {}", out_path.display(), e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;

    fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
        let mut writer = zip::ZipWriter::new(File::create(path).unwrap());
        let options = SimpleFileOptions::default();
        for (name, data) in entries {
            if name.ends_with('/') {
                writer.add_directory(*name, options).unwrap();
            } else {
                writer.start_file(*name, options).unwrap();
                writer.write_all(data).unwrap();
            }
        }
        writer.finish().unwrap();
    }

    #[test]
    fn unpack_extracts_nested_files() {
        let tmp = TempDir::new().unwrap();
        let archive = tmp.path().join("doc.zip");
        write_zip(
            &archive,
            &[
                ("Bitacora.html", b"<html></html>"),
                ("images/", b""),
                ("images/image1.png", b"not really a png"),
            ],
        );

        let work = tmp.path().join("work");
        let summary = unpack_archive(&archive, &work).unwrap();

        assert_eq!(summary.files, 2);
        assert_eq!(summary.dirs, 1);
        assert_eq!(
            fs::read_to_string(work.join("Bitacora.html")).unwrap(),
            "<html></html>"
        );
        assert!(work.join("images/image1.png").is_file());
    }

    #[test]
    fn unpack_replaces_previous_contents() {
        let tmp = TempDir::new().unwrap();
        let work = tmp.path().join("work");
        fs::create_dir_all(&work).unwrap();
        fs::write(work.join("stale.txt"), "old run").unwrap();

        let archive = tmp.path().join("doc.zip");
        write_zip(&archive, &[("fresh.txt", b"new run")]);
        unpack_archive(&archive, &work).unwrap();

        assert!(!work.join("stale.txt").exists());
        assert!(work.join("fresh.txt").exists());
    }

    #[test]
    fn corrupt_archive_leaves_work_dir_untouched() {
        let tmp = TempDir::new().unwrap();
        let work = tmp.path().join("work");
        fs::create_dir_all(&work).unwrap();
        fs::write(work.join("keep.txt"), "previous").unwrap();

        let archive = tmp.path().join("broken.zip");
        fs::write(&archive, b"this is not a zip file").unwrap();

        let err = unpack_archive(&archive, &work).unwrap_err();
        assert!(matches!(err, GameDataError::Archive { .. }), "got: {err}");
        assert!(work.join("keep.txt").exists());
    }

    #[test]
    fn entries_escaping_work_dir_are_skipped() {
        let tmp = TempDir::new().unwrap();
        let archive = tmp.path().join("doc.zip");
        write_zip(
            &archive,
            &[("Bitacora.html", b"<html></html>"), ("../evil.txt", b"outside")],
        );

        let work = tmp.path().join("work");
        let summary = unpack_archive(&archive, &work).unwrap();

        assert_eq!(summary.files, 1);
        assert_eq!(summary.skipped, 1);
        assert!(work.join("Bitacora.html").is_file());
        assert!(!tmp.path().join("evil.txt").exists());
        assert!(!work.join("evil.txt").exists());
    }

    #[test]
    fn work_dir_that_is_a_file_cannot_be_reset() {
        let tmp = TempDir::new().unwrap();
        let archive = tmp.path().join("doc.zip");
        write_zip(&archive, &[("Bitacora.html", b"<html></html>")]);

        let work = tmp.path().join("work");
        fs::write(&work, "not a directory").unwrap();

        let err = unpack_archive(&archive, &work).unwrap_err();
        match err {
            GameDataError::WorkDirReset { path, .. } => assert_eq!(path, work),
            other => panic!("expected WorkDirReset, got {other}"),
        }
        assert!(work.is_file());
    }

    #[test]
    fn missing_archive_is_archive_error() {
        let tmp = TempDir::new().unwrap();
        let err = unpack_archive(&tmp.path().join("nope.zip"), &tmp.path().join("work"))
            .unwrap_err();
        assert!(matches!(err, GameDataError::Archive { .. }));
    }
}
