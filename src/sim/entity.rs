//! Simulated objects and their per-kind behavior
//!
//! Behavior that differs between products and customers (fences, walking,
//! personal space) dispatches on [`EntityKind`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::customer::{Customer, SessionState};
use super::geom::Rect;
use super::product::Product;
use crate::consts::PERSONAL_SPACE;

/// Stable handle to an entity in a [`super::Layer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Why an entity is being moved; entities may fence each case differently
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveContext {
    /// Pointer drag
    Drag,
    /// Self-propelled walking during a tick
    Walk,
}

/// What an entity wants to do this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    Idle,
    Walk(Vec2),
    /// Leave the layer
    Stop,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EntityKind {
    Product(Product),
    Customer(Customer),
}

/// An object owned by a layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    /// Anchor point (collider is relative to it)
    pub pos: Vec2,
    /// Rotation in radians about the collider center
    pub rotation: f32,
    /// Local-space collider; `None` while not collidable
    pub collider: Option<Rect>,
    /// Set once the entity leaves the layer
    pub stopped: bool,
    pub kind: EntityKind,
}

impl Entity {
    pub fn new(id: EntityId, pos: Vec2, kind: EntityKind) -> Self {
        let mut entity = Self {
            id,
            pos,
            rotation: 0.0,
            collider: None,
            stopped: false,
            kind,
        };
        entity.sync_collider();
        entity
    }

    /// Recompute the collider from the kind's current shape
    pub fn sync_collider(&mut self) {
        self.collider = match &self.kind {
            EntityKind::Product(product) => product.collider(),
            EntityKind::Customer(customer) => Some(customer.collider()),
        };
    }

    /// Collider in world space (rotation applied as a bounding box)
    pub fn world_collider(&self) -> Option<Rect> {
        self.collider
            .map(|c| c.aabb_rotated(self.rotation).translate(self.pos))
    }

    /// Area that movement must keep fenced: the collider, or the bare anchor
    pub fn range(&self) -> Rect {
        self.world_collider()
            .unwrap_or_else(|| Rect::new(self.pos.x, self.pos.y, 0.0, 0.0))
    }

    /// Regions `range` must stay inside after moving by `v`.
    /// An empty list leaves the move unconstrained.
    pub fn fences_for(&self, _range: &Rect, _v: Vec2, context: MoveContext, bounds: &Rect) -> Vec<Rect> {
        match (&self.kind, context) {
            (EntityKind::Product(_), _) => vec![*bounds],
            (EntityKind::Customer(_), MoveContext::Walk) => Vec::new(),
            (EntityKind::Customer(_), MoveContext::Drag) => vec![self.range()],
        }
    }

    /// Per-tick behavior
    pub fn update(&mut self, _t: f32, bounds: &Rect) -> Step {
        match &self.kind {
            EntityKind::Product(_) => Step::Idle,
            EntityKind::Customer(customer) => customer.step(self.pos, bounds),
        }
    }

    /// Space that must be clear of walkers before moving by `v`
    pub fn personal_space(&self, v: Vec2) -> Option<Rect> {
        match &self.kind {
            EntityKind::Customer(customer) if customer.state == SessionState::Approaching => self
                .world_collider()
                .map(|c| c.translate(v).inflate(PERSONAL_SPACE, 0.0)),
            _ => None,
        }
    }

    /// Whether walkers have to keep their distance from this entity
    pub fn blocks_walkers(&self) -> bool {
        matches!(self.kind, EntityKind::Customer(_)) && !self.stopped
    }

    pub fn as_product(&self) -> Option<&Product> {
        match &self.kind {
            EntityKind::Product(product) => Some(product),
            _ => None,
        }
    }

    pub fn as_product_mut(&mut self) -> Option<&mut Product> {
        match &mut self.kind {
            EntityKind::Product(product) => Some(product),
            _ => None,
        }
    }

    pub fn as_customer(&self) -> Option<&Customer> {
        match &self.kind {
            EntityKind::Customer(customer) => Some(customer),
            _ => None,
        }
    }

    pub fn as_customer_mut(&mut self) -> Option<&mut Customer> {
        match &mut self.kind {
            EntityKind::Customer(customer) => Some(customer),
            _ => None,
        }
    }
}
