use std::io::{self, Read};

pub const CHUNK_SIZE: usize = 1024;

/// One read from a body, with the running byte count including it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub data: Vec<u8>,
    pub total: u64,
}

impl Chunk {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Iterator of at most [`CHUNK_SIZE`] byte reads from `R`.
///
/// Ends after EOF or the first non-interrupt error.
pub struct Chunks<R> {
    reader: R,
    buf: Box<[u8]>,
    total: u64,
    done: bool,
}

impl<R: Read> Chunks<R> {
    pub fn new(reader: R) -> Self {
        Self::with_size(reader, CHUNK_SIZE)
    }

    pub fn with_size(reader: R, size: usize) -> Self {
        Self {
            reader,
            buf: vec![0; size.max(1)].into_boxed_slice(),
            total: 0,
            done: false,
        }
    }

    pub fn total(&self) -> u64 {
        self.total
    }
}

impl<R: Read> Iterator for Chunks<R> {
    type Item = io::Result<Chunk>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            match self.reader.read(&mut self.buf) {
                Ok(0) => {
                    self.done = true;
                    return None;
                }
                Ok(n) => {
                    self.total += n as u64;
                    return Some(Ok(Chunk {
                        data: self.buf[..n].to_vec(),
                        total: self.total,
                    }));
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}
