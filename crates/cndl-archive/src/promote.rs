use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::extract::{ExtractReport, extract_tar_gz};

/// Unpack `archive` into `work_dir` and move its `top_level` directory to
/// `target`.
///
/// The parent of `target` is created first. `target` itself must not exist,
/// and neither may `work_dir/top_level`, which would otherwise be merged into
/// the install.
pub fn install_tree(
    archive: &Path,
    work_dir: &Path,
    top_level: &str,
    target: &Path,
) -> Result<ExtractReport> {
    let extracted = work_dir.join(top_level);
    if extracted.symlink_metadata().is_ok() {
        return Err(Error::StaleExtraction { path: extracted });
    }

    if let Some(parent) = target.parent() {
        create_dir_all(parent)?;
    }

    let report = extract_tar_gz(archive, work_dir)?;
    if !report.top_level.contains(top_level) {
        return Err(Error::UnexpectedArchiveLayout {
            expected: top_level.into(),
            found: report.top_level.iter().cloned().collect(),
        });
    }

    promote(&extracted, target)?;
    info!(target = %target.display(), entries = report.entry_count, "installed");
    Ok(report)
}

/// Move the directory `extracted` to `target`, copying when the two live on
/// different filesystems.
pub fn promote(extracted: &Path, target: &Path) -> Result<()> {
    if !extracted.is_dir() {
        return Err(Error::UnexpectedArchiveLayout {
            expected: extracted.to_path_buf(),
            found: Vec::new(),
        });
    }
    if let Some(parent) = target.parent() {
        create_dir_all(parent)?;
    }

    let rename_err = |source| Error::RenameFailed {
        from: extracted.to_path_buf(),
        to: target.to_path_buf(),
        source,
    };

    match fs::rename(extracted, target) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            debug!(
                from = %extracted.display(),
                to = %target.display(),
                "cross-device move, copying"
            );
            copy_dir_all(extracted, target).map_err(rename_err)?;
            fs::remove_dir_all(extracted).map_err(rename_err)
        }
        Err(e) => Err(rename_err(e)),
    }
}

fn create_dir_all(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|source| Error::DirectoryCreationFailed {
        path: path.to_path_buf(),
        source,
    })
}

fn copy_dir_all(src: &Path, dst: &Path) -> io::Result<()> {
    fs::create_dir_all(dst)?;

    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let ty = entry.file_type()?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if ty.is_dir() {
            copy_dir_all(&src_path, &dst_path)?;
        } else if ty.is_symlink() {
            copy_symlink(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

#[cfg(unix)]
fn copy_symlink(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(fs::read_link(src)?, dst)
}

#[cfg(not(unix))]
fn copy_symlink(src: &Path, dst: &Path) -> io::Result<()> {
    fs::copy(src, dst).map(|_| ())
}
