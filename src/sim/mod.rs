//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only advances through `Scene::tick`
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod board;
pub mod customer;
pub mod entity;
pub mod geom;
pub mod layer;
pub mod pricing;
pub mod product;
pub mod scene;

pub use board::{Board, Placement};
pub use customer::{Archetype, Customer, SessionState};
pub use entity::{Entity, EntityId, EntityKind, MoveContext, Step};
pub use geom::Rect;
pub use layer::{Layer, resolve_move};
pub use pricing::{PriceMenu, PriceOption};
pub use product::{Product, move_product, rotate_product};
pub use scene::{GameEvent, GamePhase, Key, Outcome, PointerButton, Scene};
