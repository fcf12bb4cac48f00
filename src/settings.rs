//! Game settings and the product catalog
//!
//! Everything tunable lives here and is handed to [`crate::sim::Scene`]
//! when it is built. Settings can be loaded from a JSON file.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::customer::Archetype;
use crate::sim::geom::Rect;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// A product that customers can bring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSpec {
    pub name: String,
    /// Packing size in grid units
    pub footprint: Vec2,
    /// Price in cents
    pub price: u32,
    /// Must not pass the checkout
    #[serde(default)]
    pub restricted: bool,
}

impl ProductSpec {
    pub fn new(name: &str, footprint: Vec2, price: u32) -> Self {
        Self {
            name: name.to_string(),
            footprint,
            price,
            restricted: false,
        }
    }

    pub fn restricted(mut self) -> Self {
        self.restricted = true;
        self
    }
}

/// Everything on sale (and a few things that aren't)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub items: Vec<ProductSpec>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            items: vec![
                ProductSpec::new("Apple", Vec2::new(1.0, 1.0), 50),
                ProductSpec::new("Cheese", Vec2::new(1.0, 1.0), 380),
                ProductSpec::new("Milk", Vec2::new(1.0, 2.0), 120),
                ProductSpec::new("Water", Vec2::new(1.0, 2.0), 90),
                ProductSpec::new("Baguette", Vec2::new(1.0, 3.0), 250),
                ProductSpec::new("Eggs", Vec2::new(2.0, 2.0), 300),
                ProductSpec::new("Melon", Vec2::new(2.0, 2.0), 500),
                ProductSpec::new("Cereal", Vec2::new(2.0, 3.0), 450),
                ProductSpec::new("Fireworks", Vec2::new(1.0, 3.0), 999).restricted(),
                ProductSpec::new("Pills", Vec2::new(1.0, 1.0), 1500).restricted(),
            ],
        }
    }
}

/// Seconds of patience per archetype
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patience {
    pub regular: f32,
    pub bulk: f32,
    pub snacker: f32,
    pub shady: f32,
}

impl Default for Patience {
    fn default() -> Self {
        Self {
            regular: 30.0,
            bulk: 45.0,
            snacker: 20.0,
            shady: 35.0,
        }
    }
}

impl Patience {
    pub fn for_archetype(&self, archetype: Archetype) -> f32 {
        match archetype {
            Archetype::Regular => self.regular,
            Archetype::Bulk => self.bulk,
            Archetype::Snacker => self.snacker,
            Archetype::Shady => self.shady,
        }
    }
}

/// Game balance and layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Layout ===
    /// Whole playfield
    pub playfield: Rect,
    /// Height of the customer lane
    pub lane_y: f32,
    /// Where the served customer stands
    pub counter_x: f32,
    /// Center of every basket
    pub basket_center: Vec2,
    /// Slack around the packed items (pixels)
    pub basket_margin: f32,
    /// Where new products are laid out
    pub shelf: Rect,
    /// Drop restricted items here to get rid of them
    pub disposal_zone: Rect,

    // === Pacing ===
    /// Seconds between customer arrivals
    pub spawn_interval: f32,
    /// Customers allowed in line at once
    pub max_queue: usize,
    pub patience: Patience,

    // === Rules ===
    /// Strikes before game over
    pub starting_health: u32,
    /// Choices in the price menu
    pub price_options: usize,

    pub catalog: Catalog,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            playfield: Rect::new(0.0, 0.0, SCREEN_WIDTH, SCREEN_HEIGHT),
            lane_y: 60.0,
            counter_x: 480.0,
            basket_center: Vec2::new(320.0, 310.0),
            basket_margin: 8.0,
            shelf: Rect::new(16.0, 100.0, 608.0, 60.0),
            disposal_zone: Rect::new(560.0, 400.0, 64.0, 64.0),

            spawn_interval: 4.0,
            max_queue: 4,
            patience: Patience::default(),

            starting_health: 3,
            price_options: 4,

            catalog: Catalog::default(),
        }
    }
}

impl Settings {
    /// Parse settings from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("{e}; using default settings");
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.catalog.items.is_empty() {
            return Err(SettingsError::Invalid("catalog is empty".into()));
        }
        if self.catalog.items.iter().all(|p| p.restricted) {
            return Err(SettingsError::Invalid("catalog has nothing for sale".into()));
        }
        for item in &self.catalog.items {
            let Vec2 { x, y } = item.footprint;
            if x < 1.0 || y < 1.0 || x.fract() != 0.0 || y.fract() != 0.0 {
                return Err(SettingsError::Invalid(format!(
                    "{} has footprint {}x{}; expected whole grid units",
                    item.name, x, y
                )));
            }
        }
        if !(2..=8).contains(&self.price_options) {
            return Err(SettingsError::Invalid(format!(
                "price_options must be 2..=8, got {}",
                self.price_options
            )));
        }
        if self.spawn_interval <= 0.0 {
            return Err(SettingsError::Invalid("spawn_interval must be positive".into()));
        }
        if self.starting_health == 0 || self.max_queue == 0 {
            return Err(SettingsError::Invalid(
                "starting_health and max_queue must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Where customers enter the lane
    pub fn spawn_point(&self) -> Vec2 {
        Vec2::new(self.playfield.x + CUSTOMER_WIDTH / 2.0, self.lane_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = Settings::from_json(r#"{ "starting_health": 5, "price_options": 3 }"#).unwrap();
        assert_eq!(settings.starting_health, 5);
        assert_eq!(settings.price_options, 3);
        assert_eq!(settings.catalog, Catalog::default());
    }

    #[test]
    fn test_json_roundtrip() {
        let settings = Settings::default();
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_rejects_bad_catalog() {
        let err = Settings::from_json(r#"{ "catalog": { "items": [] } }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));

        let json = r#"{ "catalog": { "items": [
            { "name": "Half", "footprint": [0.5, 1.0], "price": 10 }
        ] } }"#;
        assert!(matches!(Settings::from_json(json), Err(SettingsError::Invalid(_))));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(Settings::from_json("{"), Err(SettingsError::Parse(_))));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let settings = Settings::load_or_default("/nonexistent/checkout-rush.json");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_patience_lookup() {
        let patience = Patience::default();
        assert_eq!(patience.for_archetype(Archetype::Bulk), 45.0);
        assert_eq!(patience.for_archetype(Archetype::Snacker), 20.0);
    }
}
