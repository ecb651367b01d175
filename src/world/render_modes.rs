// src/world/render_modes.rs
//! Render-mode metadata used to describe map types to the viewer

use std::collections::HashMap;

/// Lookup of per-mode metadata supplied by the renderer
pub trait RenderModes {
    /// Explicit human-readable label, if the mode declares one
    fn label(&self, mode: &str) -> Option<String>;

    /// The mode followed by every mode it inherits from, nearest first
    fn inheritance(&self, mode: &str) -> Vec<String>;
}

/// Label for the viewer's map-type control: explicit label, else the capitalized id
pub fn display_label(modes: &dyn RenderModes, mode: &str) -> String {
    modes.label(mode).unwrap_or_else(|| capitalize(mode))
}

pub fn is_overlay(modes: &dyn RenderModes, mode: &str) -> bool {
    modes.inheritance(mode).iter().any(|m| m == "overlay")
}

/// First character upper-cased, the rest lower-cased
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[derive(Debug, Clone)]
struct ModeInfo {
    label: Option<String>,
    parent: Option<String>,
}

/// Table-backed registry, pre-filled with the stock render modes
#[derive(Debug, Clone)]
pub struct BuiltinRenderModes {
    modes: HashMap<String, ModeInfo>,
}

impl BuiltinRenderModes {
    pub fn empty() -> Self {
        Self {
            modes: HashMap::new(),
        }
    }

    pub fn register(&mut self, mode: &str, label: Option<&str>, parent: Option<&str>) {
        self.modes.insert(
            mode.to_string(),
            ModeInfo {
                label: label.map(str::to_string),
                parent: parent.map(str::to_string),
            },
        );
    }
}

impl Default for BuiltinRenderModes {
    fn default() -> Self {
        let mut modes = Self::empty();
        modes.register("normal", None, None);
        modes.register("lighting", None, Some("normal"));
        modes.register("smooth-lighting", Some("Smooth Lighting"), Some("lighting"));
        modes.register("night", None, Some("lighting"));
        modes.register("cave", None, Some("normal"));
        modes.register("overlay", None, None);
        modes.register("spawn", Some("Spawn Overlay"), Some("overlay"));
        modes.register("mineral", Some("Mineral Overlay"), Some("overlay"));
        modes
    }
}

impl RenderModes for BuiltinRenderModes {
    fn label(&self, mode: &str) -> Option<String> {
        self.modes.get(mode).and_then(|info| info.label.clone())
    }

    fn inheritance(&self, mode: &str) -> Vec<String> {
        let mut chain = Vec::new();
        let mut current = Some(mode.to_string());
        while let Some(name) = current {
            // cycle guard
            if chain.contains(&name) {
                break;
            }
            current = self.modes.get(&name).and_then(|info| info.parent.clone());
            chain.push(name);
        }
        chain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("night"), "Night");
        assert_eq!(capitalize("smooth-Lighting"), "Smooth-lighting");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_display_label() {
        let modes = BuiltinRenderModes::default();
        assert_eq!(display_label(&modes, "lighting"), "Lighting");
        assert_eq!(display_label(&modes, "spawn"), "Spawn Overlay");
        assert_eq!(display_label(&modes, "custom"), "Custom");
    }

    #[test]
    fn test_inheritance_chain() {
        let modes = BuiltinRenderModes::default();
        assert_eq!(
            modes.inheritance("night"),
            vec!["night".to_string(), "lighting".to_string(), "normal".to_string()]
        );
        assert!(is_overlay(&modes, "spawn"));
        assert!(is_overlay(&modes, "overlay"));
        assert!(!is_overlay(&modes, "night"));
    }

    #[test]
    fn test_cycle_terminates() {
        let mut modes = BuiltinRenderModes::empty();
        modes.register("a", None, Some("b"));
        modes.register("b", None, Some("a"));
        assert_eq!(modes.inheritance("a"), vec!["a".to_string(), "b".to_string()]);
    }
}
