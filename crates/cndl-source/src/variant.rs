use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Distribution target a user may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum Variant {
    /// Windows 32-bit user installer.
    #[cfg_attr(feature = "clap", value(name = "win32"))]
    Win32,
    /// Windows 64-bit user installer.
    #[cfg_attr(feature = "clap", value(name = "win64"))]
    Win64,
    /// Debian package.
    #[cfg_attr(feature = "clap", value(name = "deb"))]
    Deb,
    /// RPM package.
    #[cfg_attr(feature = "clap", value(name = "rpm"))]
    Rpm,
    /// macOS archive.
    #[cfg_attr(feature = "clap", value(name = "mac"))]
    Mac,
    /// Linux x64 remote server bundle, unpacked into `~/.vscode-server`.
    #[cfg_attr(feature = "clap", value(name = "server"))]
    Server,
}

impl Variant {
    const ALL: [Variant; 6] = [
        Variant::Win32,
        Variant::Win64,
        Variant::Deb,
        Variant::Rpm,
        Variant::Mac,
        Variant::Server,
    ];

    pub fn all() -> impl Iterator<Item = Variant> {
        Self::ALL.into_iter()
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Variant::Win32 => "win32",
            Variant::Win64 => "win64",
            Variant::Deb => "deb",
            Variant::Rpm => "rpm",
            Variant::Mac => "mac",
            Variant::Server => "server",
        }
    }

    pub fn is_server(self) -> bool {
        matches!(self, Variant::Server)
    }
}

impl FromStr for Variant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .find(|v| v.keyword() == s)
            .ok_or_else(|| Error::UnknownVariant(s.to_string()))
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}
