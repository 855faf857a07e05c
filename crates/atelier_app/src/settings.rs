//! Settings file handling
//!
//! An optional TOML file supplies the initial part colors, the swatch
//! palette, and viewport/orbit tuning. Every field has a default, so
//! the file can be partial or absent.

use anyhow::{Context, Result};
use atelier_core::{Color, Part, PartColors};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Settings loaded from `atelier.toml`
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// Initial color per part, `part name -> "#rrggbb"`
    ///
    /// Part names are validated during deserialization, so a typo in
    /// the file surfaces at startup.
    #[serde(default)]
    pub colors: HashMap<Part, String>,

    /// Swatch palette bound to the Q/W/E/R keys
    #[serde(default = "default_palette")]
    pub palette: Vec<String>,

    /// Share of the window width given to the 3D viewport
    #[serde(default = "default_width_fraction")]
    pub width_fraction: f32,

    /// Closest the camera may orbit
    #[serde(default = "default_min_distance")]
    pub min_distance: f32,

    /// Farthest the camera may orbit
    #[serde(default = "default_max_distance")]
    pub max_distance: f32,
}

fn default_palette() -> Vec<String> {
    vec![
        "#ffffff".to_string(),
        "#000000".to_string(),
        "#0000ff".to_string(),
        "#ff0000".to_string(),
    ]
}

fn default_width_fraction() -> f32 {
    0.5
}

fn default_min_distance() -> f32 {
    1.5
}

fn default_max_distance() -> f32 {
    15.0
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            colors: HashMap::new(),
            palette: default_palette(),
            width_fraction: default_width_fraction(),
            min_distance: default_min_distance(),
            max_distance: default_max_distance(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file {}", path.display()))?;
        let settings: Settings = toml::from_str(&content)
            .with_context(|| format!("failed to parse settings file {}", path.display()))?;
        Ok(settings)
    }

    /// Initial configuration snapshot, white for unnamed parts
    ///
    /// Malformed colors are rejected so a typo in the file surfaces
    /// at startup instead of silently rendering the default.
    pub fn initial_colors(&self) -> Result<PartColors> {
        let mut colors = PartColors::uniform(Color::WHITE);
        for (&part, value) in &self.colors {
            let color = Color::parse(value)
                .with_context(|| format!("settings [colors]: bad color {value:?} for {part}"))?;
            colors.set(part, color);
        }
        Ok(colors)
    }

    /// Palette colors for the swatch keys
    pub fn palette_colors(&self) -> Result<Vec<Color>> {
        self.palette
            .iter()
            .map(|value| {
                Color::parse(value).with_context(|| format!("settings palette: bad color {value:?}"))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_cover_missing_fields() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings.width_fraction, 0.5);
        assert_eq!(settings.palette.len(), 4);
        assert_eq!(
            settings.initial_colors().unwrap().get(Part::Base),
            Color::WHITE
        );
    }

    #[test]
    fn partial_file_overrides_only_named_parts() {
        let settings: Settings = toml::from_str(
            r##"
            width_fraction = 0.6

            [colors]
            cushion = "#ff0000"
            "##,
        )
        .unwrap();
        assert_eq!(settings.width_fraction, 0.6);
        let colors = settings.initial_colors().unwrap();
        assert_eq!(colors.get(Part::Cushion), Color::RED);
        assert_eq!(colors.get(Part::Wood), Color::WHITE);
    }

    #[test]
    fn unknown_part_name_is_rejected_at_parse() {
        let result = toml::from_str::<Settings>(
            r##"
            [colors]
            armrest = "#ff0000"
            "##,
        );
        assert!(result.is_err());
    }

    #[test]
    fn malformed_part_color_is_an_error() {
        let settings: Settings = toml::from_str(
            r#"
            [colors]
            cushion = "red"
            "#,
        )
        .unwrap();
        assert!(settings.initial_colors().is_err());
    }

    #[test]
    fn malformed_palette_color_is_an_error() {
        let settings: Settings = toml::from_str(r##"palette = ["#ggg"]"##).unwrap();
        assert!(settings.palette_colors().is_err());
    }

    #[test]
    fn loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("atelier.toml");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "min_distance = 2.0").unwrap();
        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.min_distance, 2.0);
        assert!(Settings::load(&dir.path().join("missing.toml")).is_err());
    }
}
