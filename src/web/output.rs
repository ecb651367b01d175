// src/web/output.rs
//! Marker, region and blank-tile files read by the viewer

use crate::config::BgColor;
use crate::error::{MapGenError, Result};
use crate::web::json::to_script_string;
use crate::world::{Poi, Quadtree, TileFormat};
use image::{DynamicImage, Rgba, RgbaImage};
use std::path::Path;
use tracing::debug;

pub const MARKERS_FILE: &str = "markers.js";
pub const REGIONS_FILE: &str = "regions.js";

const MARKERS_OPEN: &str = "overviewer.collections.markerDatas.push([\n";
const CLOSE: &str = "]);\n";

/// Empty region table with a commented example of the region shape
pub const REGIONS_JS: &str = r##"overviewer.collections.regionDatas.push([
  // {"color": "#FFAA00", "opacity": 0.5, "closed": true, "path": [
  //   {"x": 0, "y": 0, "z": 0},
  //   {"x": 0, "y": 10, "z": 0},
  //   {"x": 0, "y": 0, "z": 10}
  // ]},
]);"##;

/// Marker list wrapped in the viewer's registration call
pub fn markers_js<'a, I>(markers: I) -> Result<String>
where
    I: IntoIterator<Item = &'a Poi>,
{
    let mut out = String::from(MARKERS_OPEN);
    let mut first = true;
    for marker in markers {
        if !first {
            out.push_str(",\n");
        }
        out.push_str(&to_script_string(marker)?);
        first = false;
    }
    if !first {
        out.push('\n');
    }
    out.push_str(CLOSE);
    Ok(out)
}

/// Write markers.js, leaving signs out when `no_signs` is set
pub fn write_markers(path: &Path, markers: &[Poi], no_signs: bool) -> Result<()> {
    let shown = markers.iter().filter(|m| !(no_signs && m.is_sign()));
    let contents = markers_js(shown)?;
    std::fs::write(path, contents).map_err(|e| MapGenError::file(path, e))?;
    debug!(path = %path.display(), "wrote markers");
    Ok(())
}

pub fn write_regions(path: &Path) -> Result<()> {
    std::fs::write(path, REGIONS_JS).map_err(|e| MapGenError::file(path, e))?;
    debug!(path = %path.display(), "wrote regions");
    Ok(())
}

/// 1x1 transparent pixel in the background color
pub fn blank_tile(color: &BgColor) -> RgbaImage {
    let [r, g, b] = color.rgb();
    RgbaImage::from_pixel(1, 1, Rgba([r, g, b, 0]))
}

/// Write `blank.<format>` into every quadtree's tile directory
pub fn write_blank_tiles(quadtrees: &[Quadtree], color: &BgColor) -> Result<()> {
    let blank = blank_tile(color);

    for quadtree in quadtrees {
        let tile_dir = quadtree.tile_path();
        std::fs::create_dir_all(&tile_dir).map_err(|e| MapGenError::file(&tile_dir, e))?;

        let path = quadtree.blank_tile_path();
        match quadtree.imgformat {
            TileFormat::Png => blank.save_with_format(&path, quadtree.imgformat.image_format())?,
            // JPEG has no alpha channel
            TileFormat::Jpg => DynamicImage::ImageRgba8(blank.clone())
                .to_rgb8()
                .save_with_format(&path, quadtree.imgformat.image_format())?,
        }
        debug!(path = %path.display(), "wrote blank tile");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_single_marker() {
        let spawn = Poi::spawn([0, 64, 0]);
        assert_eq!(
            markers_js([&spawn]).unwrap(),
            "overviewer.collections.markerDatas.push([\n\
             {\"type\": \"spawn\", \"x\": 0, \"y\": 64, \"z\": 0, \"msg\": \"Spawn\"}\n\
             ]);\n"
        );
    }

    #[test]
    fn test_no_trailing_comma() {
        let a = Poi::new("a");
        let b = Poi::new("b");
        let c = Poi::new("c");
        assert_eq!(
            markers_js([&a, &b, &c]).unwrap(),
            "overviewer.collections.markerDatas.push([\n\
             {\"type\": \"a\"},\n{\"type\": \"b\"},\n{\"type\": \"c\"}\n\
             ]);\n"
        );
    }

    #[test]
    fn test_identical_markers_keep_separators() {
        let a = Poi::new("a");
        assert_eq!(
            markers_js([&a, &a]).unwrap(),
            "overviewer.collections.markerDatas.push([\n{\"type\": \"a\"},\n{\"type\": \"a\"}\n]);\n"
        );
    }

    #[test]
    fn test_empty_markers() {
        let none: [&Poi; 0] = [];
        assert_eq!(
            markers_js(none).unwrap(),
            "overviewer.collections.markerDatas.push([\n]);\n"
        );
    }

    #[test]
    fn test_write_markers_drops_signs() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(MARKERS_FILE);
        let markers = vec![Poi::spawn([0, 64, 0]), Poi::sign(1, 2, 3, "hidden")];

        write_markers(&path, &markers, true).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("\"spawn\""));
        assert!(!written.contains("hidden"));

        write_markers(&path, &markers, false).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("hidden"));
    }

    #[test]
    fn test_regions_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(REGIONS_FILE);
        write_regions(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("overviewer.collections.regionDatas.push([\n"));
        assert!(written.contains("\"opacity\": 0.5"));
        assert!(written.ends_with("]);"));
    }

    #[test]
    fn test_blank_tiles() {
        let temp_dir = TempDir::new().unwrap();
        let quadtree = |tiledir: &str, imgformat| Quadtree {
            destdir: temp_dir.path().to_path_buf(),
            world: PathBuf::from("/worlds/alpha"),
            tiledir: tiledir.to_string(),
            imgformat,
            rendermode: "normal".to_string(),
            depth: 4,
        };
        let quadtrees = vec![quadtree("day", TileFormat::Png), quadtree("night", TileFormat::Jpg)];
        let bg: BgColor = "#FFFFFF".parse().unwrap();

        write_blank_tiles(&quadtrees, &bg).unwrap();

        let png = image::open(temp_dir.path().join("day/blank.png")).unwrap();
        assert_eq!((png.width(), png.height()), (1, 1));
        assert_eq!(png.color(), image::ColorType::Rgba8);
        assert_eq!(png.to_rgba8().get_pixel(0, 0), &Rgba([255, 255, 255, 0]));

        let jpg = image::open(temp_dir.path().join("night/blank.jpg")).unwrap();
        assert_eq!((jpg.width(), jpg.height()), (1, 1));
    }
}
