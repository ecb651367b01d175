// src/main.rs v3
//! overviewer-web - build the static viewer for a rendered map

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use overviewer_web::{BuildConfig, MapGen, NorthDirection, Poi, Quadtree, TileFormat, VersionInfo, World};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Phase {
    /// Copy assets and render config/index templates
    Build,
    /// Merge POIs and write markers/regions
    Finalize,
    /// Build then finalize
    All,
}

#[derive(Debug, Parser)]
#[command(name = "overviewer-web", version, about = "Generate the static web viewer for rendered map tiles")]
struct Args {
    /// Render manifest written by the tile renderer (JSON)
    manifest: PathBuf,

    /// Build configuration file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Global web asset tree [default: web_assets next to the executable]
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Local asset tree copied over the global one
    #[arg(long)]
    web_assets: Option<PathBuf>,

    /// Don't write markers.js / regions.js
    #[arg(long)]
    skip_js: bool,

    /// Leave sign markers out of markers.js
    #[arg(long)]
    no_signs: bool,

    #[arg(long, value_enum, default_value_t = Phase::All)]
    phase: Phase,
}

#[derive(Debug, Deserialize)]
struct ManifestWorld {
    dir: PathBuf,
    name: String,
    spawn: [i64; 3],
    #[serde(default)]
    north_direction: NorthDirection,
    persistent_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct ManifestQuadtree {
    tiledir: String,
    #[serde(default)]
    imgformat: TileFormat,
    rendermode: String,
    depth: u32,
}

/// What the renderer hands over after (or while) rendering tiles
#[derive(Debug, Deserialize)]
struct RenderManifest {
    destdir: PathBuf,
    world: ManifestWorld,
    quadtrees: Vec<ManifestQuadtree>,
    /// POIs discovered in chunks rendered this run
    #[serde(default)]
    poi: Vec<Poi>,
}

impl RenderManifest {
    fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse manifest {}", path.display()))
    }
}

fn default_assets_root() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("cannot locate executable")?;
    let dir = exe.parent().map(Path::to_path_buf).unwrap_or_default();
    Ok(dir.join("web_assets"))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut config = match args.config {
        Some(ref path) => BuildConfig::load_from(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => BuildConfig::default(),
    };
    config.skip_js |= args.skip_js;
    config.no_signs |= args.no_signs;
    if args.web_assets.is_some() {
        config.web_assets_path = args.web_assets.clone();
    }

    let manifest = RenderManifest::load(&args.manifest)?;
    let persistent_path = manifest
        .world
        .persistent_path
        .clone()
        .unwrap_or_else(|| manifest.destdir.join("overviewer.dat"));

    let mut world = World::open(
        manifest.world.dir.clone(),
        manifest.world.name.clone(),
        manifest.world.spawn,
        manifest.world.north_direction,
        persistent_path,
    )?;
    world.poi = manifest.poi;

    let quadtrees = manifest
        .quadtrees
        .into_iter()
        .map(|q| Quadtree {
            destdir: manifest.destdir.clone(),
            world: manifest.world.dir.clone(),
            tiledir: q.tiledir,
            imgformat: q.imgformat,
            rendermode: q.rendermode,
            depth: q.depth,
        })
        .collect();

    let assets_root = match args.assets {
        Some(path) => path,
        None => default_assets_root()?,
    };

    let generator = MapGen::new(quadtrees, config, assets_root, VersionInfo::from_build_env())?;

    if matches!(args.phase, Phase::Build | Phase::All) {
        generator.go(&world)?;
    }
    if matches!(args.phase, Phase::Finalize | Phase::All) {
        generator.finalize(&mut world)?;
    }

    info!(destdir = %generator.destdir().display(), "done");
    Ok(())
}
