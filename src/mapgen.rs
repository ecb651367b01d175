// src/mapgen.rs v2
//! Viewer generation: asset/config build phase and marker finalize phase

use crate::{
    config::BuildConfig,
    error::{MapGenError, Result},
    version::VersionInfo,
    web::{
        mirror_dir, output, render_file,
        template::{config_placeholders, index_placeholders},
        write_blank_tiles, MapTypeData,
    },
    world::{BuiltinRenderModes, Quadtree, RenderModes, World},
};
use chrono::Local;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::info;

pub const CONFIG_FILE: &str = "overviewerConfig.js";
pub const INDEX_FILE: &str = "index.html";

/// Called after assets are in place when JS generation is skipped
pub type WebAssetsHook = Box<dyn Fn(&MapGen) -> Result<()>>;

/// Generates the static viewer for a set of quadtrees sharing one output
/// directory and one world.
pub struct MapGen {
    config: BuildConfig,
    quadtrees: Vec<Quadtree>,
    destdir: PathBuf,
    world_dir: PathBuf,
    assets_root: PathBuf,
    version: VersionInfo,
    render_modes: Box<dyn RenderModes>,
    web_assets_hook: Option<WebAssetsHook>,
}

impl MapGen {
    /// Validate the quadtree set; nothing is written here.
    ///
    /// `assets_root` is the global web asset tree copied into every build.
    pub fn new(
        quadtrees: Vec<Quadtree>,
        config: BuildConfig,
        assets_root: PathBuf,
        version: VersionInfo,
    ) -> Result<Self> {
        let first = quadtrees
            .first()
            .ok_or_else(|| MapGenError::config("there must be at least one quadtree to work on"))?;
        let destdir = first.destdir.clone();
        let world_dir = first.world.clone();

        if !quadtrees.iter().all(|q| q.belongs_to(&destdir, &world_dir)) {
            return Err(MapGenError::config(
                "all the given quadtrees must have the same destdir and world",
            ));
        }

        let mut seen = HashSet::new();
        for q in &quadtrees {
            if !seen.insert(q.tiledir.as_str()) {
                return Err(MapGenError::config(format!(
                    "tile directory {:?} is used by more than one quadtree",
                    q.tiledir
                )));
            }
        }

        Ok(Self {
            config,
            quadtrees,
            destdir,
            world_dir,
            assets_root,
            version,
            render_modes: Box::new(BuiltinRenderModes::default()),
            web_assets_hook: None,
        })
    }

    pub fn with_render_modes(mut self, render_modes: Box<dyn RenderModes>) -> Self {
        self.render_modes = render_modes;
        self
    }

    pub fn with_web_assets_hook(mut self, hook: WebAssetsHook) -> Self {
        self.web_assets_hook = Some(hook);
        self
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    pub fn quadtrees(&self) -> &[Quadtree] {
        &self.quadtrees
    }

    pub fn destdir(&self) -> &Path {
        &self.destdir
    }

    /// Deepest tile pyramid across all quadtrees
    pub fn max_zoom(&self) -> u32 {
        self.quadtrees.iter().map(|q| q.depth).max().unwrap_or(0)
    }

    /// Build phase: blank tiles, assets, templated config and landing page
    pub fn go(&self, world: &World) -> Result<()> {
        self.check_world(world)?;
        info!(destdir = %self.destdir.display(), quadtrees = self.quadtrees.len(), "building web viewer");

        write_blank_tiles(&self.quadtrees, &self.config.bg_color)?;

        info!(src = %self.assets_root.display(), "copying web assets");
        mirror_dir(&self.assets_root, &self.destdir, None)?;
        if let Some(ref local) = self.config.web_assets_path {
            info!(src = %local.display(), "copying local web assets");
            mirror_dir(local, &self.destdir, None)?;
        }

        let maptypes: Vec<MapTypeData> = self
            .quadtrees
            .iter()
            .map(|q| MapTypeData::for_quadtree(q, self.render_modes.as_ref(), &self.config.bg_color))
            .collect();
        let placeholders = config_placeholders(
            self.max_zoom(),
            self.config.north_direction,
            world.spawn,
            &maptypes,
        )?;
        let config_path = self.destdir.join(CONFIG_FILE);
        render_file(&config_path, &config_path, &placeholders)?;

        let placeholders = index_placeholders(&world.name, &Local::now(), &self.version);
        let index_path = self.destdir.join(INDEX_FILE);
        render_file(&index_path, &index_path, &placeholders)?;

        if self.config.skip_js {
            if let Some(ref hook) = self.web_assets_hook {
                info!("running web assets hook");
                hook(self)?;
            }
        }

        Ok(())
    }

    /// Finalize phase, run once tile rendering is done: merge and persist
    /// POIs, then write markers.js and regions.js.
    pub fn finalize(&self, world: &mut World) -> Result<()> {
        self.check_world(world)?;

        let markers = world.merge_and_persist(true)?;

        if self.config.skip_js {
            return Ok(());
        }

        output::write_markers(
            &self.destdir.join(output::MARKERS_FILE),
            markers,
            self.config.no_signs,
        )?;
        output::write_regions(&self.destdir.join(output::REGIONS_FILE))?;

        info!(destdir = %self.destdir.display(), "web viewer finalized");
        Ok(())
    }

    fn check_world(&self, world: &World) -> Result<()> {
        if world.dir != self.world_dir {
            return Err(MapGenError::config(format!(
                "world {} does not match the quadtrees' world {}",
                world.dir.display(),
                self.world_dir.display()
            )));
        }
        Ok(())
    }
}
