// src/world/quadtree.rs
//! Descriptors for rendered tile sets

use crate::error::{MapGenError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Image format of the rendered tiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileFormat {
    #[default]
    Png,
    #[serde(alias = "jpeg")]
    Jpg,
}

impl TileFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            TileFormat::Png => "png",
            TileFormat::Jpg => "jpg",
        }
    }

    pub fn image_format(&self) -> image::ImageFormat {
        match self {
            TileFormat::Png => image::ImageFormat::Png,
            TileFormat::Jpg => image::ImageFormat::Jpeg,
        }
    }
}

impl fmt::Display for TileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for TileFormat {
    type Err = MapGenError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(TileFormat::Png),
            "jpg" | "jpeg" => Ok(TileFormat::Jpg),
            other => Err(MapGenError::config(format!("unsupported image format {:?}", other))),
        }
    }
}

/// One independently tiled rendering of a world, as handed over by the renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quadtree {
    /// Output root shared by every quadtree of a build
    pub destdir: PathBuf,
    /// Source world directory, identifies the world the tiles came from
    pub world: PathBuf,
    /// Tile subdirectory under `destdir`
    pub tiledir: String,
    pub imgformat: TileFormat,
    pub rendermode: String,
    /// Depth of the tile pyramid
    pub depth: u32,
}

impl Quadtree {
    pub fn tile_path(&self) -> PathBuf {
        self.destdir.join(&self.tiledir)
    }

    pub fn blank_tile_path(&self) -> PathBuf {
        self.tile_path().join(format!("blank.{}", self.imgformat.extension()))
    }

    pub fn belongs_to(&self, destdir: &Path, world: &Path) -> bool {
        self.destdir == destdir && self.world == world
    }
}
