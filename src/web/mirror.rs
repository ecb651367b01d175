// src/web/mirror.rs v2
//! Recursive copy of viewer asset trees

use crate::error::{MapGenError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, warn};

/// Files generated by desktop environments, never copied
pub const SKIP_FILES: &[&str] = &["Thumbs.db", ".DS_Store"];

/// Copy everything in `src` into `dst`, creating `dst` if needed.
///
/// `entities` restricts which top-level entries are copied; subdirectories are
/// always copied whole. Entries in [`SKIP_FILES`] are never copied.
pub fn mirror_dir(src: &Path, dst: &Path, entities: Option<&[&str]>) -> Result<()> {
    if !dst.is_dir() {
        fs::create_dir_all(dst).map_err(|e| MapGenError::file(dst, e))?;
    }

    let entries = fs::read_dir(src).map_err(|e| MapGenError::file(src, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| MapGenError::file(src, e))?;
        let name = entry.file_name();
        let name_str = name.to_string_lossy();
        let name_str: &str = &name_str;

        if SKIP_FILES.contains(&name_str) {
            continue;
        }
        if let Some(allowed) = entities {
            if !allowed.contains(&name_str) {
                continue;
            }
        }

        let src_path = entry.path();
        let dst_path = dst.join(&name);

        if src_path.is_dir() {
            mirror_dir(&src_path, &dst_path, None)?;
        } else if src_path.is_file() {
            copy_file(&src_path, &dst_path)?;
        }
    }

    debug!(src = %src.display(), dst = %dst.display(), "mirrored directory");
    Ok(())
}

/// Copy one file; on a permission error, loosen permissions once and retry
fn copy_file(src: &Path, dst: &Path) -> Result<()> {
    match fs::copy(src, dst) {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == ErrorKind::PermissionDenied => {
            warn!(
                src = %src.display(),
                dst = %dst.display(),
                "permission denied while copying, repairing permissions and retrying"
            );
            // the retry reports the real failure if this doesn't help
            let _ = grant_read(src);
            if dst.exists() {
                let _ = grant_write(dst);
            }
            fs::copy(src, dst)
                .map(|_| ())
                .map_err(|e| MapGenError::file(dst, e))
        }
        Err(e) => Err(MapGenError::file(dst, e)),
    }
}

#[cfg(unix)]
fn grant_read(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(perms.mode() | 0o400);
    fs::set_permissions(path, perms)
}

#[cfg(not(unix))]
fn grant_read(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

#[cfg(unix)]
fn grant_write(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(perms.mode() | 0o200);
    fs::set_permissions(path, perms)
}

#[cfg(not(unix))]
fn grant_write(path: &Path) -> std::io::Result<()> {
    let mut perms = fs::metadata(path)?.permissions();
    perms.set_readonly(false);
    fs::set_permissions(path, perms)
}
