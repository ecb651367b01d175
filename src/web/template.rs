// src/web/template.rs
//! `{name}` placeholder substitution for the viewer's config and landing page

use crate::config::{BgColor, NorthDirection};
use crate::error::{MapGenError, Result};
use crate::version::VersionInfo;
use crate::web::json::to_script_string;
use crate::world::render_modes::{display_label, is_overlay, RenderModes};
use crate::world::{Quadtree, TileFormat};
use chrono::{DateTime, TimeZone};
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// Caption appended to the world name in the page title
pub const PRODUCT_CAPTION: &str = "Minecraft Overviewer";

/// Format of the `{time}` placeholder
pub const TIME_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %Z";

/// Ordered placeholder name -> replacement text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Placeholders {
    values: Vec<(String, String)>,
}

impl Placeholders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name` (without braces), replacing any earlier value
    pub fn insert(&mut self, name: &str, value: impl ToString) -> &mut Self {
        let value = value.to_string();
        match self.values.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = value,
            None => self.values.push((name.to_string(), value)),
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Replace every known `{name}` token in one left-to-right pass.
///
/// Unknown tokens and stray braces are copied through untouched, and
/// replacement text is never scanned again.
pub fn substitute(template: &str, placeholders: &Placeholders) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        if let Some(close) = after.find(['{', '}']) {
            if after[close..].starts_with('}') {
                if let Some(value) = placeholders.get(&after[..close]) {
                    out.push_str(value);
                    rest = &after[close + 1..];
                    continue;
                }
            }
        }

        out.push('{');
        rest = after;
    }

    out.push_str(rest);
    out
}

/// Render the template at `src` and write the result to `dst` (may be the same file)
pub fn render_file(src: &Path, dst: &Path, placeholders: &Placeholders) -> Result<()> {
    let template = std::fs::read_to_string(src).map_err(|e| MapGenError::file(src, e))?;
    let rendered = substitute(&template, placeholders);
    std::fs::write(dst, rendered).map_err(|e| MapGenError::file(dst, e))?;
    Ok(())
}

/// One entry of the viewer's map-type list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapTypeData {
    pub label: String,
    pub shortname: String,
    pub path: String,
    pub bg_color: String,
    pub overlay: bool,
    pub imgformat: TileFormat,
}

impl MapTypeData {
    pub fn for_quadtree(quadtree: &Quadtree, modes: &dyn RenderModes, bg_color: &BgColor) -> Self {
        Self {
            label: display_label(modes, &quadtree.rendermode),
            shortname: quadtree.rendermode.clone(),
            path: quadtree.tiledir.clone(),
            bg_color: bg_color.to_string(),
            overlay: is_overlay(modes, &quadtree.rendermode),
            imgformat: quadtree.imgformat,
        }
    }
}

/// Values for overviewerConfig.js
pub fn config_placeholders(
    max_zoom: u32,
    north_direction: NorthDirection,
    spawn: [i64; 3],
    maptypes: &[MapTypeData],
) -> Result<Placeholders> {
    let mut placeholders = Placeholders::new();
    placeholders
        .insert("minzoom", 0)
        .insert("maxzoom", max_zoom)
        .insert("zoomlevels", max_zoom)
        .insert("north_direction", north_direction)
        .insert("spawn_coords", to_script_string(&spawn)?)
        .insert("maptypedata", to_script_string(maptypes)?);
    Ok(placeholders)
}

/// Values for index.html
pub fn index_placeholders<Tz>(
    world_name: &str,
    time: &DateTime<Tz>,
    version: &VersionInfo,
) -> Placeholders
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let mut placeholders = Placeholders::new();
    placeholders
        .insert("title", format!("{} &mdash; {}", world_name, PRODUCT_CAPTION))
        .insert("time", time.format(TIME_FORMAT))
        .insert("version", version);
    placeholders
}
