use std::collections::BTreeMap;

use once_cell::sync::OnceCell;
use url::Url;

use crate::error::{Error, Result};
use crate::variant::Variant;

const UPSTREAM: &str = "https://update.code.visualstudio.com/latest";

static CATALOG: OnceCell<Catalog> = OnceCell::new();

/// Immutable mapping from [`Variant`] to its upstream "latest stable" URL.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: BTreeMap<Variant, Url>,
}

impl Catalog {
    /// The built-in catalog, initialised on first use.
    ///
    /// Every variant gets an entry or the whole table is rejected.
    pub fn global() -> Result<&'static Catalog> {
        CATALOG.get_or_try_init(Catalog::builtin)
    }

    pub fn resolve(&self, variant: Variant) -> Result<&Url> {
        self.entries
            .get(&variant)
            .ok_or_else(|| Error::UnknownVariant(variant.to_string()))
    }

    fn builtin() -> Result<Self> {
        Variant::all()
            .map(|variant| {
                Url::parse(&format!("{UPSTREAM}/{}/stable", platform(variant)))
                    .map(|url| (variant, url))
                    .map_err(|source| Error::InvalidCatalogUrl { variant, source })
            })
            .collect()
    }
}

impl FromIterator<(Variant, Url)> for Catalog {
    fn from_iter<I: IntoIterator<Item = (Variant, Url)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

// The server bundle has no "latest" endpoint of its own; the rpm redirect
// carries the commit the bundle is published under.
fn platform(variant: Variant) -> &'static str {
    match variant {
        Variant::Win32 => "win32",
        Variant::Win64 => "win32-x64",
        Variant::Deb => "linux-deb-x64",
        Variant::Rpm | Variant::Server => "linux-rpm-x64",
        Variant::Mac => "darwin",
    }
}
