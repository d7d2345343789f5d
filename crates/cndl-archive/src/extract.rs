use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Component, Path};

use flate2::read::GzDecoder;
use tracing::{debug, trace, warn};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractReport {
    pub entry_count: usize,
    pub total_bytes: u64,
    /// Entries refused because they would land outside the destination.
    pub skipped: usize,
    /// First path component of every unpacked entry.
    pub top_level: BTreeSet<String>,
}

/// Unpack every entry of the gzip tarball at `archive` into `destination`.
pub fn extract_tar_gz(archive: &Path, destination: &Path) -> Result<ExtractReport> {
    let file = File::open(archive).map_err(|source| Error::Open {
        path: archive.to_path_buf(),
        source,
    })?;

    debug!(archive = %archive.display(), destination = %destination.display(), "extracting");
    unpack(GzDecoder::new(BufReader::new(file)), destination)
}

pub(crate) fn unpack<R: Read>(reader: R, destination: &Path) -> Result<ExtractReport> {
    fs::create_dir_all(destination).map_err(|source| Error::DirectoryCreationFailed {
        path: destination.to_path_buf(),
        source,
    })?;

    let mut archive = tar::Archive::new(reader);
    let mut report = ExtractReport::default();

    for entry in archive.entries().map_err(|source| Error::Corrupted { source })? {
        let mut entry = entry.map_err(|source| Error::Corrupted { source })?;
        let path = entry
            .path()
            .map_err(|source| Error::InvalidPath { source })?
            .into_owned();
        let size = entry.header().size().unwrap_or(0);

        // unpack_in refuses `..` and absolute escapes instead of writing them.
        let unpacked = entry
            .unpack_in(destination)
            .map_err(|source| Error::ExtractionFailed {
                path: path.clone(),
                source,
            })?;
        if !unpacked {
            warn!(entry = %path.display(), "skipped entry outside destination");
            report.skipped += 1;
            continue;
        }

        let first = path
            .components()
            .find(|c| !matches!(c, Component::CurDir));
        if let Some(Component::Normal(first)) = first {
            report.top_level.insert(first.to_string_lossy().into_owned());
        }
        report.entry_count += 1;
        report.total_bytes += size;
        trace!(entry = %path.display(), size, "unpacked");
    }

    debug!(entries = report.entry_count, bytes = report.total_bytes, "extracted");
    Ok(report)
}
