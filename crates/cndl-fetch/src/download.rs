use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use tracing::{info, warn};

use crate::error::{FetchError, Result};
use crate::stream::Chunks;
use crate::tracker::Tracker;

/// A response body and its declared length, if any.
pub struct Body<R> {
    reader: R,
    content_length: Option<u64>,
}

impl<R: Read> Body<R> {
    pub fn new(reader: R, content_length: Option<u64>) -> Self {
        Self {
            reader,
            content_length,
        }
    }

    pub fn content_length(&self) -> Option<u64> {
        self.content_length
    }

    pub fn chunks(self) -> Chunks<R> {
        Chunks::new(self.reader)
    }
}

/// Stream `body` into `dest`, stepping `tracker` by each chunk written.
///
/// `dest` is created or truncated. On failure whatever was written so far is
/// left on disk.
pub fn download_to<R, T>(body: Body<R>, dest: &Path, tracker: T) -> Result<u64>
where
    R: Read,
    T: Tracker<u64>,
{
    let io_err = |source| FetchError::Io {
        path: dest.to_path_buf(),
        source,
    };

    if body.content_length().is_none() {
        warn!(dest = %dest.display(), "content length unknown, reporting bytes only");
    }

    let mut file = BufWriter::new(File::create(dest).map_err(io_err)?);
    let mut chunks = body.chunks();

    for chunk in chunks.by_ref() {
        let chunk = chunk.map_err(FetchError::Read)?;
        file.write_all(&chunk.data).map_err(io_err)?;
        tracker.step(chunk.len() as u64);
    }
    file.flush().map_err(io_err)?;
    tracker.finish();

    let total = chunks.total();
    info!(dest = %dest.display(), bytes = total, "downloaded");
    Ok(total)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::io::{self, Cursor};

    use super::*;
    use crate::stream::CHUNK_SIZE;
    use crate::tracker::NoopTracker;

    #[derive(Default)]
    struct Counting {
        steps: Cell<usize>,
        bytes: Cell<u64>,
    }

    impl Tracker<u64> for &Counting {
        fn step(&self, step: u64) -> &Self {
            self.steps.set(self.steps.get() + 1);
            self.bytes.set(self.bytes.get() + step);
            self
        }

        fn finish(self) {}
    }

    #[test]
    fn writes_exact_body() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("code.deb");
        let data: Vec<u8> = (0..5000u32).map(|i| (i % 251) as u8).collect();

        let counting = Counting::default();
        let body = Body::new(Cursor::new(data.clone()), Some(data.len() as u64));
        let n = download_to(body, &dest, &counting).unwrap();

        assert_eq!(n, 5000);
        assert_eq!(std::fs::read(&dest).unwrap(), data);
        assert_eq!(counting.steps.get(), 5000usize.div_ceil(CHUNK_SIZE));
        assert_eq!(counting.bytes.get(), 5000);
    }

    #[test]
    fn unknown_length_still_downloads() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("blob");

        let body = Body::new(Cursor::new(b"abc".to_vec()), None);
        let n = download_to(body, &dest, NoopTracker).unwrap();
        assert_eq!(n, 3);
        assert_eq!(std::fs::read(&dest).unwrap(), b"abc");
    }

    #[test]
    fn truncates_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("code.rpm");
        std::fs::write(&dest, vec![0u8; 4096]).unwrap();

        download_to(Body::new(Cursor::new(b"new".to_vec()), Some(3)), &dest, NoopTracker).unwrap();
        assert_eq!(std::fs::read(&dest).unwrap(), b"new");
    }

    struct Broken(usize);

    impl Read for Broken {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.0 == 0 {
                return Err(io::Error::other("reset by peer"));
            }
            let n = self.0.min(buf.len());
            buf[..n].fill(b'x');
            self.0 -= n;
            Ok(n)
        }
    }

    #[test]
    fn partial_file_is_left_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("partial.bin");

        let body = Body::new(Broken(CHUNK_SIZE + 1), None);
        let err = download_to(body, &dest, NoopTracker).unwrap_err();
        assert!(matches!(err, FetchError::Read(_)));
        assert!(dest.exists());
    }

    #[test]
    fn missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("nope").join("file");

        let body = Body::new(Cursor::new(Vec::new()), None);
        let err = download_to(body, &dest, NoopTracker).unwrap_err();
        assert!(matches!(err, FetchError::Io { ref path, .. } if path == &dest));
    }
}
