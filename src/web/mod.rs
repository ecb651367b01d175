// src/web/mod.rs v1
//! Files that make up the static viewer

pub mod json;
pub mod mirror;
pub mod output;
pub mod template;

pub use mirror::mirror_dir;
pub use output::{write_blank_tiles, write_markers, write_regions};
pub use template::{render_file, substitute, MapTypeData, Placeholders};
