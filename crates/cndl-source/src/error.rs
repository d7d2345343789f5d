use url::Url;

use crate::variant::Variant;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown variant: {0}")]
    UnknownVariant(String),

    #[error("catalog entry for {variant} is not a valid url: {source}")]
    InvalidCatalogUrl {
        variant: Variant,
        #[source]
        source: url::ParseError,
    },

    #[error("malformed redirect url '{url}': {reason}")]
    MalformedRedirectUrl { url: Url, reason: &'static str },

    #[error("redirect url '{0}' has no file name in its path")]
    MissingFileName(Url),

    #[error("invalid mirror host '{host}': {source}")]
    InvalidMirrorHost {
        host: String,
        #[source]
        source: url::ParseError,
    },

    #[error("cannot locate home directory for the server install target")]
    HomeUnavailable,
}

pub type Result<T> = std::result::Result<T, Error>;
