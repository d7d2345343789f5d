use std::path::Path;

use crate::error::{Error, Result};
use crate::rewrite::ResolvedDownload;
use crate::server::{InstallTarget, SERVER_BUNDLE};
use crate::variant::Variant;

/// What to fetch for a variant, and what to do with it afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    /// A single file saved into the working directory.
    Artifact(ResolvedDownload),
    /// The server archive, unpacked into `target`.
    Server {
        download: ResolvedDownload,
        target: InstallTarget,
    },
}

impl Plan {
    /// Apply the variant's post-processing to a rewritten download.
    ///
    /// `home` is only consulted for [`Variant::Server`].
    pub fn for_variant(
        variant: Variant,
        download: ResolvedDownload,
        home: Option<&Path>,
    ) -> Result<Self> {
        match variant {
            Variant::Server => {
                let home = home.ok_or(Error::HomeUnavailable)?;
                let (download, target) = SERVER_BUNDLE.apply(download, home)?;
                Ok(Plan::Server { download, target })
            }
            Variant::Win32 | Variant::Win64 | Variant::Deb | Variant::Rpm | Variant::Mac => {
                Ok(Plan::Artifact(download))
            }
        }
    }

    pub fn download(&self) -> &ResolvedDownload {
        match self {
            Plan::Artifact(download) | Plan::Server { download, .. } => download,
        }
    }
}
