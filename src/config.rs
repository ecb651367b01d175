// src/config.rs v2
//! Build configuration with explicit defaults

use crate::error::{MapGenError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Map orientation as understood by the viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NorthDirection {
    #[default]
    LowerLeft,
    UpperLeft,
    UpperRight,
    LowerRight,
}

impl NorthDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            NorthDirection::LowerLeft => "lower-left",
            NorthDirection::UpperLeft => "upper-left",
            NorthDirection::UpperRight => "upper-right",
            NorthDirection::LowerRight => "lower-right",
        }
    }
}

impl fmt::Display for NorthDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NorthDirection {
    type Err = MapGenError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "lower-left" => Ok(NorthDirection::LowerLeft),
            "upper-left" => Ok(NorthDirection::UpperLeft),
            "upper-right" => Ok(NorthDirection::UpperRight),
            "lower-right" => Ok(NorthDirection::LowerRight),
            other => Err(MapGenError::config(format!(
                "unknown north direction {:?}",
                other
            ))),
        }
    }
}

/// Background color given as `#RRGGBB`.
///
/// The spelling as written is kept so the viewer config echoes exactly what the
/// user wrote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BgColor {
    raw: String,
    rgb: [u8; 3],
}

impl BgColor {
    pub fn rgb(&self) -> [u8; 3] {
        self.rgb
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl Default for BgColor {
    fn default() -> Self {
        Self {
            raw: "#1a1a1a".to_string(),
            rgb: [0x1a, 0x1a, 0x1a],
        }
    }
}

impl FromStr for BgColor {
    type Err = MapGenError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || MapGenError::config(format!("bg_color must look like #RRGGBB, got {:?}", s));

        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self {
            raw: s.to_string(),
            rgb: [channel(0)?, channel(2)?, channel(4)?],
        })
    }
}

impl TryFrom<String> for BgColor {
    type Error = MapGenError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<BgColor> for String {
    fn from(color: BgColor) -> Self {
        color.raw
    }
}

impl fmt::Display for BgColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Options for one viewer build. Constructed once, never mutated by the generator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Skip writing markers.js / regions.js
    pub skip_js: bool,
    /// Leave sign markers out of markers.js (they stay persisted)
    pub no_signs: bool,
    /// Local asset tree copied over the global one
    pub web_assets_path: Option<PathBuf>,
    pub bg_color: BgColor,
    pub north_direction: NorthDirection,
}

impl BuildConfig {
    /// Load configuration from a JSON file, falling back to defaults when absent
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| MapGenError::file(path, e))?;

        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| MapGenError::Other(format!("Failed to parse config file: {}", e)))?;

        Ok(config)
    }

    /// Save configuration as pretty JSON
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| MapGenError::file(parent, e))?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents).map_err(|e| MapGenError::file(path, e))?;

        Ok(())
    }
}
