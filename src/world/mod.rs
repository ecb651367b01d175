// src/world/mod.rs
//! World handle, tile set descriptors and persisted points of interest

pub mod persistent;
pub mod poi;
pub mod quadtree;
pub mod render_modes;

pub use persistent::{merge_poi, PersistentData};
pub use poi::Poi;
pub use quadtree::{Quadtree, TileFormat};
pub use render_modes::{BuiltinRenderModes, RenderModes};

use crate::config::NorthDirection;
use crate::error::Result;
use std::path::PathBuf;
use tracing::{info, warn};

/// The source dataset as seen by the generator.
///
/// `poi` holds what the renderer discovered in chunks it (re)processed this
/// run; `persistent` is what earlier runs left behind.
#[derive(Debug, Clone)]
pub struct World {
    pub dir: PathBuf,
    pub name: String,
    pub spawn: [i64; 3],
    pub north_direction: NorthDirection,
    pub poi: Vec<Poi>,
    pub persistent: PersistentData,
    pub persistent_path: PathBuf,
}

impl World {
    /// Build a world handle and load its persistent store
    pub fn open(
        dir: PathBuf,
        name: String,
        spawn: [i64; 3],
        north_direction: NorthDirection,
        persistent_path: PathBuf,
    ) -> Result<Self> {
        let existed = persistent_path.exists();
        let persistent = PersistentData::load(&persistent_path)?;

        if existed && persistent.north_direction != north_direction {
            warn!(
                previous = %persistent.north_direction,
                requested = %north_direction,
                "north direction changed since the last run; existing tiles will not match"
            );
        }

        Ok(Self {
            dir,
            name,
            spawn,
            north_direction,
            poi: Vec::new(),
            persistent,
            persistent_path,
        })
    }

    /// Merge this run's POIs with the persisted ones and write the store back.
    ///
    /// Afterwards `poi` and `persistent.poi` both hold the merged list.
    pub fn merge_and_persist(&mut self, exclude_spawn: bool) -> Result<&[Poi]> {
        let fresh = self.poi.len();
        let merged = merge_poi(&self.poi, &self.persistent.poi, exclude_spawn);
        info!(
            fresh,
            carried_over = merged.len() - fresh,
            total = merged.len(),
            "merged points of interest"
        );

        // nothing in memory changes unless the store was written
        let staged = PersistentData {
            poi: merged.clone(),
            north_direction: self.north_direction,
            version: self.persistent.version,
        };
        staged.save(&self.persistent_path)?;
        self.persistent = staged;
        self.poi = merged;

        Ok(&self.poi)
    }
}
