//! Checkout Rush - A cashier checkout arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (packing, placement, customer sessions)
//! - `settings`: Data-driven game balance and the product catalog
//! - `autoplay`: Idle/demo bot driving the scene through its input API
//!
//! Rendering, audio and text layout live outside this crate. They read the
//! simulation state and feed pointer/key input back into [`sim::Scene`].

pub mod autoplay;
pub mod settings;
pub mod sim;

pub use settings::{Catalog, ProductSpec, Settings, SettingsError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Playfield dimensions (pixels)
    pub const SCREEN_WIDTH: f32 = 640.0;
    pub const SCREEN_HEIGHT: f32 = 480.0;

    /// Pixels per footprint grid unit
    pub const GRID_UNIT: f32 = 32.0;
    /// Scale of a product that is not in the basket (sitting on the shelf)
    pub const SHELF_SCALE: f32 = 0.5;

    /// Customer body size (pixels)
    pub const CUSTOMER_WIDTH: f32 = 32.0;
    pub const CUSTOMER_HEIGHT: f32 = 48.0;
    /// Customer walking speed (pixels per tick)
    pub const WALK_SPEED: f32 = 2.0;
    /// Extra gap kept between queued customers (pixels)
    pub const PERSONAL_SPACE: f32 = 8.0;
    /// How close to the counter a customer must be to start a session (pixels)
    pub const COUNTER_REACH: f32 = 4.0;

    /// Maximum pointer travel that still counts as a click (pixels)
    pub const CLICK_SLOP: f32 = 3.0;
}
