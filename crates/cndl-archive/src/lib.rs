//! Gzip tarball extraction and promotion into versioned install directories.
//!
//! - `extract.rs` - Unpacking a `.tar.gz` into a directory
//! - `promote.rs` - Moving the unpacked top-level directory into place

pub use error::{Error, Result};
pub use extract::{ExtractReport, extract_tar_gz};
pub use promote::{install_tree, promote};

mod error;
mod extract;
mod promote;
