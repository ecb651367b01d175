// src/version.rs
//! Product version descriptor shown on the landing page

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionInfo {
    pub version: String,
    pub hash: String,
}

impl VersionInfo {
    pub fn new(version: impl Into<String>, hash: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            hash: hash.into(),
        }
    }

    /// Version of this package plus the `OVERVIEWER_BUILD_HASH` set at compile time
    pub fn from_build_env() -> Self {
        Self::new(
            env!("CARGO_PKG_VERSION"),
            option_env!("OVERVIEWER_BUILD_HASH").unwrap_or("unknown"),
        )
    }

    pub fn short_hash(&self) -> &str {
        match self.hash.char_indices().nth(7) {
            Some((idx, _)) => &self.hash[..idx],
            None => &self.hash,
        }
    }
}

impl fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.version, self.short_hash())
    }
}
