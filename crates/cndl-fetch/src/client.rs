use std::io::Read;
use std::time::Duration;

use reqwest::blocking::{Client, ClientBuilder, Response};
use reqwest::header::LOCATION;
use reqwest::{Proxy, StatusCode, redirect};
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::download::Body;
use crate::error::{FetchError, Result};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Resolves a catalog URL to the target of its redirect, without following it.
///
/// Implementations issue exactly one request.
pub trait RedirectProbe {
    fn redirect_target(&self, url: &Url) -> Result<Url>;
}

/// Opens a streaming response body.
pub trait BodySource {
    type Reader: Read;

    fn open(&self, url: &Url) -> Result<Body<Self::Reader>>;
}

#[derive(Debug, Error)]
pub enum ClientSettingError {
    #[error("Invalid proxy URL {url}: {source}")]
    Proxy {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to build client: {0}")]
    Build(#[from] reqwest::Error),
}

#[derive(Debug, Clone)]
pub struct ClientSetting {
    pub proxies: Option<Vec<Url>>,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientSetting {
    fn default() -> Self {
        Self {
            proxies: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!("cndl/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientSetting {
    pub fn build(&self) -> std::result::Result<ReqwestClient, ClientSettingError> {
        let probe = self
            .builder()?
            .redirect(redirect::Policy::none())
            .build()
            .map_err(ClientSettingError::Build)?;
        let fetch = self.builder()?.build().map_err(ClientSettingError::Build)?;

        Ok(ReqwestClient { probe, fetch })
    }

    fn builder(&self) -> std::result::Result<ClientBuilder, ClientSettingError> {
        let mut cb = Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.as_str());

        if let Some(proxies) = &self.proxies {
            let (secure, insecure): (Vec<&Url>, Vec<&Url>) =
                proxies.iter().partition(|u| u.scheme() == "https");

            for u in secure {
                cb = cb.proxy(Proxy::https(u.as_str()).map_err(|source| {
                    ClientSettingError::Proxy {
                        url: u.to_string(),
                        source,
                    }
                })?);
            }

            for u in insecure {
                cb = cb.proxy(Proxy::http(u.as_str()).map_err(|source| {
                    ClientSettingError::Proxy {
                        url: u.to_string(),
                        source,
                    }
                })?);
            }
        }

        Ok(cb)
    }
}

/// Blocking reqwest client pair: one that stops at redirects and one that
/// follows them for the payload.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    probe: Client,
    fetch: Client,
}

impl ReqwestClient {
    fn send(client: &Client, url: &Url) -> Result<Response> {
        client
            .get(url.clone())
            .send()
            .map_err(|source| FetchError::Request {
                url: url.clone(),
                source,
            })
    }
}

impl RedirectProbe for ReqwestClient {
    fn redirect_target(&self, url: &Url) -> Result<Url> {
        let res = Self::send(&self.probe, url)?;
        let status = res.status();

        // Header bytes outside visible ASCII are rejected, never re-encoded.
        let location = match res.headers().get(LOCATION) {
            Some(value) if status.is_redirection() => {
                Some(value.to_str().map_err(|source| FetchError::InvalidLocationHeader {
                    url: url.clone(),
                    status,
                    source,
                })?)
            }
            _ => None,
        };

        follow_location(url, status, location)
    }
}

impl BodySource for ReqwestClient {
    type Reader = Response;

    fn open(&self, url: &Url) -> Result<Body<Response>> {
        let res = Self::send(&self.fetch, url)?;
        let status = res.status();
        if !status.is_success() {
            return Err(FetchError::UpstreamRequestFailed {
                url: url.clone(),
                status,
            });
        }

        let len = res.content_length();
        debug!(%url, %status, len, "opened body");
        Ok(Body::new(res, len))
    }
}

/// Interpret a response to a non-following request.
///
/// Only a 3xx response with a location counts; a relative location is joined
/// onto the request url.
pub fn follow_location(url: &Url, status: StatusCode, location: Option<&str>) -> Result<Url> {
    if !status.is_redirection() {
        return Err(FetchError::UpstreamRequestFailed {
            url: url.clone(),
            status,
        });
    }

    let location = location.ok_or_else(|| FetchError::MissingRedirectTarget {
        url: url.clone(),
        status,
    })?;

    let target = url
        .join(location)
        .map_err(|source| FetchError::InvalidLocation {
            url: url.clone(),
            location: location.to_string(),
            source,
        })?;
    debug!(from = %url, %status, to = %target, "redirect");
    Ok(target)
}
