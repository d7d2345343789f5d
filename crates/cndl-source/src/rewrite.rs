use tracing::debug;
use url::Url;

use crate::error::{Error, Result};

/// Final download location and the local file it is saved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDownload {
    pub url: Url,
    pub file_name: String,
}

/// Replace the host of `url` with `mirror`, keeping every other component.
pub fn rewrite_host(url: &Url, mirror: &str) -> Result<Url> {
    if url.cannot_be_a_base() {
        return Err(Error::MalformedRedirectUrl {
            url: url.clone(),
            reason: "url has no authority to rewrite",
        });
    }

    let mut rewritten = url.clone();
    rewritten
        .set_host(Some(mirror))
        .map_err(|source| Error::InvalidMirrorHost {
            host: mirror.to_string(),
            source,
        })?;
    Ok(rewritten)
}

/// Last segment of the url path, as it appears on the wire.
pub fn file_name(url: &Url) -> Result<String> {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .ok_or_else(|| Error::MissingFileName(url.clone()))
}

/// Rewrite a redirect target onto `mirror`. The file name is taken from the
/// original target.
pub fn resolve_download(redirect: &Url, mirror: &str) -> Result<ResolvedDownload> {
    let file_name = file_name(redirect)?;
    let url = rewrite_host(redirect, mirror)?;
    debug!(from = %redirect, to = %url, %file_name, "rewrote redirect target");
    Ok(ResolvedDownload { url, file_name })
}
