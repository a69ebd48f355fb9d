//! Biome classification from temperature and moisture.

use serde::{Deserialize, Serialize};

/// Coarse climate zones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Biome {
    Polar,
    Desert,
    Tropical,
    Temperate,
}

impl Biome {
    pub const ALL: [Biome; 4] = [Biome::Polar, Biome::Desert, Biome::Tropical, Biome::Temperate];

    /// Stable numeric code: polar 0, desert 1, tropical 2, temperate 3.
    pub const fn code(self) -> u8 {
        match self {
            Biome::Polar => 0,
            Biome::Desert => 1,
            Biome::Tropical => 2,
            Biome::Temperate => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Biome::Polar => "polar",
            Biome::Desert => "desert",
            Biome::Tropical => "tropical",
            Biome::Temperate => "temperate",
        }
    }

    /// Hot zones are tropical when wet, warm zones temperate when moist
    /// enough, and everything at or below zero is polar.
    pub fn classify(temperature: f32, moisture: f32) -> Biome {
        if temperature > 0.5 {
            if moisture > 0.0 {
                Biome::Tropical
            } else {
                Biome::Desert
            }
        } else if temperature > 0.0 {
            if moisture > 0.2 {
                Biome::Temperate
            } else {
                Biome::Desert
            }
        } else {
            Biome::Polar
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_table() {
        assert_eq!(Biome::classify(0.8, 0.1), Biome::Tropical);
        assert_eq!(Biome::classify(0.8, -0.1), Biome::Desert);
        assert_eq!(Biome::classify(0.3, 0.5), Biome::Temperate);
        assert_eq!(Biome::classify(0.3, 0.1), Biome::Desert);
        assert_eq!(Biome::classify(0.0, 0.9), Biome::Polar);
        assert_eq!(Biome::classify(-0.5, 0.9), Biome::Polar);
    }

    #[test]
    fn test_boundaries_are_exclusive() {
        assert_eq!(Biome::classify(0.5, 0.5), Biome::Temperate);
        assert_eq!(Biome::classify(0.6, 0.0), Biome::Desert);
        assert_eq!(Biome::classify(0.2, 0.2), Biome::Desert);
    }

    #[test]
    fn test_codes_are_distinct() {
        let codes: Vec<u8> = Biome::ALL.iter().map(|b| b.code()).collect();
        assert_eq!(codes, vec![0, 1, 2, 3]);
    }
}
