use std::path::{Path, PathBuf};

use tracing::debug;
use url::Url;

use crate::error::{Error, Result};
use crate::rewrite::ResolvedDownload;

/// Fixed names of the Linux x64 remote server bundle.
#[derive(Debug, Clone, Copy)]
pub struct ServerBundle {
    /// File name the bundle is published and saved under.
    pub archive: &'static str,
    /// Directory the archive unpacks to.
    pub top_level: &'static str,
    /// Per-user state directory, relative to home.
    pub state_dir: &'static str,
    /// Subdirectory of `state_dir` holding one directory per commit.
    pub bin_dir: &'static str,
}

pub const SERVER_BUNDLE: ServerBundle = ServerBundle {
    archive: "vscode-server-linux-x64.tar.gz",
    top_level: "vscode-server-linux-x64",
    state_dir: ".vscode-server",
    bin_dir: "bin",
};

/// Versioned directory a server bundle is installed into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallTarget {
    pub commit: String,
    pub path: PathBuf,
}

impl ServerBundle {
    /// Point `download` at the server archive published next to it and derive
    /// the install directory from the commit segment.
    pub fn apply(
        &self,
        download: ResolvedDownload,
        home: &Path,
    ) -> Result<(ResolvedDownload, InstallTarget)> {
        let mut url = download.url;
        let commit = commit_segment(&url)?;

        let original = url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::MalformedRedirectUrl {
                url: original,
                reason: "url has no path segments",
            })?
            .pop()
            .push(self.archive);

        let target = InstallTarget {
            path: home.join(self.state_dir).join(self.bin_dir).join(&commit),
            commit,
        };
        debug!(%url, commit = %target.commit, path = %target.path.display(), "server bundle");

        Ok((
            ResolvedDownload {
                url,
                file_name: self.archive.to_string(),
            },
            target,
        ))
    }
}

// `.../stable/<commit>/<file>`: the commit is the segment before the file.
fn commit_segment(url: &Url) -> Result<String> {
    let malformed = |reason| Error::MalformedRedirectUrl {
        url: url.clone(),
        reason,
    };

    let segments: Vec<&str> = url
        .path_segments()
        .ok_or_else(|| malformed("url has no path segments"))?
        .collect();

    let [.., commit, file] = segments.as_slice() else {
        return Err(malformed("expected a commit segment before the file name"));
    };
    if file.is_empty() {
        return Err(malformed("path has no file name"));
    }
    match *commit {
        "" | "." | ".." => Err(malformed("commit segment is not a usable directory name")),
        c if c.contains('\\') || c.contains('%') => {
            Err(malformed("commit segment is not a usable directory name"))
        }
        c => Ok(c.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn download(url: &str) -> ResolvedDownload {
        let url = Url::parse(url).unwrap();
        ResolvedDownload {
            file_name: crate::file_name(&url).unwrap(),
            url,
        }
    }

    #[test]
    fn server_bundle_rewrites_file_and_target() {
        let home = Path::new("/home/dev");
        let (dl, target) = SERVER_BUNDLE
            .apply(
                download("https://vscode.cdn.azure.cn/stable/e170252f76/code-1.2.3.rpm"),
                home,
            )
            .unwrap();

        assert_eq!(dl.file_name, "vscode-server-linux-x64.tar.gz");
        assert_eq!(
            dl.url.as_str(),
            "https://vscode.cdn.azure.cn/stable/e170252f76/vscode-server-linux-x64.tar.gz"
        );
        assert_eq!(target.commit, "e170252f76");
        assert_eq!(target.path, home.join(".vscode-server").join("bin").join("e170252f76"));
        assert!(target.path.ends_with(".vscode-server/bin/e170252f76"));
    }

    #[test]
    fn query_and_fragment_survive() {
        let (dl, _) = SERVER_BUNDLE
            .apply(download("https://m.example/a/b/c/code.rpm?k=v#f"), Path::new("/h"))
            .unwrap();
        assert_eq!(
            dl.url.as_str(),
            "https://m.example/a/b/c/vscode-server-linux-x64.tar.gz?k=v#f"
        );
    }

    #[test]
    fn single_segment_is_malformed() {
        let dl = download("https://m.example/code.rpm");
        let err = SERVER_BUNDLE.apply(dl, Path::new("/h")).unwrap_err();
        assert!(matches!(err, Error::MalformedRedirectUrl { .. }));
    }

    #[test]
    fn empty_commit_is_malformed() {
        let dl = download("https://m.example/stable//code.rpm");
        let err = SERVER_BUNDLE.apply(dl, Path::new("/h")).unwrap_err();
        assert!(matches!(err, Error::MalformedRedirectUrl { .. }));
    }

    #[test]
    fn trailing_slash_is_malformed() {
        let dl = ResolvedDownload {
            url: Url::parse("https://m.example/stable/abc/").unwrap(),
            file_name: "abc".into(),
        };
        let err = SERVER_BUNDLE.apply(dl, Path::new("/h")).unwrap_err();
        assert!(matches!(err, Error::MalformedRedirectUrl { .. }));
    }
}
