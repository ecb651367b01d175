// src/lib.rs
//! Overviewer web viewer generator
//!
//! Turns a set of rendered tile quadtrees into a self-contained static web
//! viewer: copies the viewer assets, fills in the templated configuration,
//! keeps points of interest alive across incremental runs and writes the
//! marker and region data the viewer loads.

pub mod config;
pub mod error;
pub mod mapgen;
pub mod version;
pub mod web;
pub mod world;

// Re-export main types for convenience
pub use config::{BgColor, BuildConfig, NorthDirection};
pub use error::{MapGenError, Result};
pub use mapgen::MapGen;
pub use version::VersionInfo;
pub use world::{Poi, Quadtree, TileFormat, World};
