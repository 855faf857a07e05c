//! Configurable product parts

use crate::{Color, ConfigError};
use std::fmt;
use std::str::FromStr;

/// A configurable surface of the product model
///
/// The set of parts is fixed at build time and mirrors the asset
/// contract: each part corresponds to one sub-mesh of the loaded
/// model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Part {
    /// Sofa base frame
    Base,
    /// Wooden legs and trim
    Wood,
    /// Backrest
    Back,
    /// Seat cushions
    Cushion,
}

impl Part {
    /// All parts, in declaration order
    pub const ALL: [Part; 4] = [Part::Base, Part::Wood, Part::Back, Part::Cushion];

    /// Number of parts
    pub const COUNT: usize = Self::ALL.len();

    /// Stable lowercase name, matching the configuration keys
    pub fn as_str(&self) -> &'static str {
        match self {
            Part::Base => "base",
            Part::Wood => "wood",
            Part::Back => "back",
            Part::Cushion => "cushion",
        }
    }

    /// Dense index into per-part arrays
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Part {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "base" => Ok(Part::Base),
            "wood" => Ok(Part::Wood),
            "back" => Ok(Part::Back),
            "cushion" => Ok(Part::Cushion),
            other => Err(ConfigError::UnknownPart(other.to_string())),
        }
    }
}

/// One color per part — the configuration snapshot
///
/// Every part always has a value; the default is white for all parts.
/// The type is `Copy`, so a snapshot handed to subscribers is an
/// immutable copy of the store state at notification time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PartColors([Color; Part::COUNT]);

impl Default for PartColors {
    fn default() -> Self {
        Self([Color::WHITE; Part::COUNT])
    }
}

impl PartColors {
    /// All parts set to the same color
    pub fn uniform(color: Color) -> Self {
        Self([color; Part::COUNT])
    }

    /// Color of a part
    pub fn get(&self, part: Part) -> Color {
        self.0[part.index()]
    }

    /// Overwrite a part's color
    pub fn set(&mut self, part: Part, color: Color) {
        self.0[part.index()] = color;
    }

    /// Iterate `(part, color)` pairs in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (Part, Color)> + '_ {
        Part::ALL.iter().map(move |&p| (p, self.get(p)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn part_names_round_trip() {
        for part in Part::ALL {
            assert_eq!(part.as_str().parse::<Part>().unwrap(), part);
        }
    }

    #[test]
    fn unknown_part_is_rejected() {
        let err = "armrest".parse::<Part>().unwrap_err();
        assert_eq!(err, ConfigError::UnknownPart("armrest".into()));
    }

    #[test]
    fn defaults_are_white() {
        let colors = PartColors::default();
        for (_, color) in colors.iter() {
            assert_eq!(color, Color::WHITE);
        }
    }

    #[test]
    fn set_touches_only_one_part() {
        let mut colors = PartColors::default();
        colors.set(Part::Base, Color::BLUE);
        assert_eq!(colors.get(Part::Base), Color::BLUE);
        assert_eq!(colors.get(Part::Wood), Color::WHITE);
        assert_eq!(colors.get(Part::Back), Color::WHITE);
        assert_eq!(colors.get(Part::Cushion), Color::WHITE);
    }
}
