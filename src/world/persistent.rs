// src/world/persistent.rs
//! Cross-run storage of points of interest and map settings

use crate::config::NorthDirection;
use crate::error::{MapGenError, Result};
use crate::world::poi::Poi;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Bump when the on-disk layout changes incompatibly
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistentData {
    pub version: u32,
    #[serde(rename = "POI", default)]
    pub poi: Vec<Poi>,
    #[serde(default)]
    pub north_direction: NorthDirection,
}

impl Default for PersistentData {
    fn default() -> Self {
        Self {
            version: FORMAT_VERSION,
            poi: Vec::new(),
            north_direction: NorthDirection::default(),
        }
    }
}

impl PersistentData {
    /// Read the store; a missing file is an empty store
    pub fn load(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no persistent data yet");
                return Ok(Self::default());
            }
            Err(e) => return Err(MapGenError::file(path, e)),
        };

        let data: Self = serde_json::from_str(&contents)?;
        if data.version != FORMAT_VERSION {
            return Err(MapGenError::UnsupportedVersion {
                path: path.to_path_buf(),
                found: data.version,
                expected: FORMAT_VERSION,
            });
        }

        Ok(data)
    }

    /// Write to a sibling temp file, fsync, then rename over the old store,
    /// so an interrupted save leaves the previous version intact.
    ///
    /// The temp file is removed again when any step fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        let parent = path.parent().filter(|p| !p.as_os_str().is_empty());
        if let Some(parent) = parent {
            std::fs::create_dir_all(parent).map_err(|e| MapGenError::file(parent, e))?;
        }

        let tmp_path = temp_path(path);
        let written = self.write_synced(&tmp_path).and_then(|()| {
            std::fs::rename(&tmp_path, path).map_err(|e| MapGenError::file(path, e))
        });
        if let Err(e) = written {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(e);
        }

        // make the rename itself durable
        if let Some(parent) = parent {
            sync_dir(parent);
        }

        debug!(path = %path.display(), pois = self.poi.len(), "persistent data saved");
        Ok(())
    }

    fn write_synced(&self, tmp_path: &Path) -> Result<()> {
        let file = File::create(tmp_path).map_err(|e| MapGenError::file(tmp_path, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush().map_err(|e| MapGenError::file(tmp_path, e))?;
        let file = writer
            .into_inner()
            .map_err(|e| MapGenError::file(tmp_path, e.into_error()))?;
        file.sync_all().map_err(|e| MapGenError::file(tmp_path, e))
    }
}

#[cfg(unix)]
fn sync_dir(dir: &Path) {
    if let Err(e) = File::open(dir).and_then(|d| d.sync_all()) {
        debug!(dir = %dir.display(), error = %e, "directory fsync failed");
    }
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) {}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Combine this run's POIs with the ones persisted by earlier runs.
///
/// The current list is kept as-is; persisted entries are appended unless they
/// are already present. Chunks that were not rescanned this run only show up in
/// the persisted list, so this is what keeps their markers alive. Spawn is
/// recomputed every run and is dropped from the carried-over set when
/// `exclude_spawn` is set.
pub fn merge_poi(current: &[Poi], persisted: &[Poi], exclude_spawn: bool) -> Vec<Poi> {
    let mut seen: HashSet<String> = current.iter().map(merge_key).collect();
    let mut merged = current.to_vec();
    for poi in persisted {
        if exclude_spawn && poi.is_spawn() {
            continue;
        }
        if seen.insert(merge_key(poi)) {
            merged.push(poi.clone());
        }
    }
    merged
}

/// Identity of a record for merging: equal records give equal keys whatever
/// order their attributes were inserted in.
fn merge_key(poi: &Poi) -> String {
    let mut key = String::new();
    push_canonical(&mut key, &Value::String(poi.kind.clone()));
    key.push('|');
    push_object(&mut key, &poi.attributes);
    key
}

fn push_canonical(out: &mut String, value: &Value) {
    match value {
        Value::Object(map) => push_object(out, map),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                push_canonical(out, item);
            }
            out.push(']');
        }
        // scalars print unambiguously (strings quoted and escaped)
        scalar => out.push_str(&scalar.to_string()),
    }
}

fn push_object(out: &mut String, map: &Map<String, Value>) {
    let mut entries: Vec<(&String, &Value)> = map.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    out.push('{');
    for (i, (k, v)) in entries.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        push_canonical(out, &Value::String(k.clone()));
        out.push(':');
        push_canonical(out, v);
    }
    out.push('}');
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_merge_law() {
        let a = Poi::new("structure").with("x", 1);
        let b = Poi::new("structure").with("x", 2);
        let c = Poi::sign(3, 64, 3, "old sign");
        let spawn = Poi::spawn([0, 64, 0]);

        let merged = merge_poi(&[a.clone(), b.clone()], &[a.clone(), c.clone(), spawn], true);
        assert_eq!(merged, vec![a, b, c]);
    }

    #[test]
    fn test_merge_keeps_spawn_when_not_excluded() {
        let spawn = Poi::spawn([0, 64, 0]);
        let merged = merge_poi(&[], &[spawn.clone()], false);
        assert_eq!(merged, vec![spawn]);
    }

    #[test]
    fn test_merge_keeps_current_spawn() {
        let fresh = Poi::spawn([10, 70, 10]);
        let stale = Poi::spawn([0, 64, 0]);
        let merged = merge_poi(&[fresh.clone()], &[stale], true);
        assert_eq!(merged, vec![fresh]);
    }

    #[test]
    fn test_merge_does_not_duplicate_persisted_repeats() {
        let c = Poi::sign(3, 64, 3, "dup");
        let merged = merge_poi(&[], &[c.clone(), c.clone()], true);
        assert_eq!(merged, vec![c]);
    }

    #[test]
    fn test_merge_ignores_attribute_order() {
        let current = Poi::new("chest").with("x", 1).with("items", 4);
        let persisted = Poi::new("chest").with("items", 4).with("x", 1);
        let merged = merge_poi(&[current.clone()], &[persisted], true);
        assert_eq!(merged, vec![current]);
    }

    #[test]
    fn test_merge_large_marker_sets() {
        // two overlapping halves of a big world: 0..30000 fresh, 10000..40000 stored
        let current: Vec<Poi> = (0..30_000)
            .map(|i| Poi::sign(i, 64, -i, format!("sign {}", i)))
            .collect();
        let persisted: Vec<Poi> = (10_000..40_000)
            .map(|i| Poi::sign(i, 64, -i, format!("sign {}", i)))
            .collect();

        let started = std::time::Instant::now();
        let merged = merge_poi(&current, &persisted, true);
        assert!(
            started.elapsed() < std::time::Duration::from_secs(5),
            "merge took {:?}",
            started.elapsed()
        );

        assert_eq!(merged.len(), 40_000);
        assert_eq!(&merged[..30_000], &current[..]);
        assert_eq!(merged[30_000], Poi::sign(30_000, 64, -30_000, "sign 30000"));
        assert_eq!(merged[39_999], Poi::sign(39_999, 64, -39_999, "sign 39999"));
    }

    #[test]
    fn test_missing_store_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let data = PersistentData::load(&temp_dir.path().join("overviewer.dat")).unwrap();
        assert_eq!(data, PersistentData::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("overviewer.dat");

        let data = PersistentData {
            poi: vec![Poi::sign(1, 2, 3, "Grüße"), Poi::new("chest").with("items", 4)],
            north_direction: NorthDirection::UpperRight,
            ..Default::default()
        };
        data.save(&path).unwrap();

        assert!(!temp_dir.path().join("overviewer.dat.tmp").exists());
        assert_eq!(PersistentData::load(&path).unwrap(), data);
    }

    #[test]
    fn test_unknown_version_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("overviewer.dat");
        std::fs::write(&path, r#"{"version": 99, "POI": []}"#).unwrap();

        match PersistentData::load(&path) {
            Err(MapGenError::UnsupportedVersion { found, expected, .. }) => {
                assert_eq!(found, 99);
                assert_eq!(expected, FORMAT_VERSION);
            }
            other => panic!("expected version error, got {:?}", other),
        }
    }

    #[test]
    fn test_failed_save_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        // a directory where the store should go makes the final rename fail
        let path = temp_dir.path().join("overviewer.dat");
        std::fs::create_dir_all(path.join("occupied")).unwrap();

        let data = PersistentData {
            poi: vec![Poi::sign(1, 2, 3, "lost")],
            ..Default::default()
        };
        assert!(matches!(data.save(&path), Err(MapGenError::File { .. })));

        assert!(!temp_dir.path().join("overviewer.dat.tmp").exists());
        assert!(path.join("occupied").is_dir());
    }
}
