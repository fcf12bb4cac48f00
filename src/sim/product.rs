//! Products: the draggable goods a customer brings to the counter

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{EntityId, MoveContext};
use super::geom::Rect;
use super::layer::Layer;
use crate::consts::{GRID_UNIT, SHELF_SCALE};
use crate::settings::ProductSpec;

/// One item in a customer's basket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Customer this product belongs to
    pub owner: EntityId,
    pub name: String,
    /// Packing size in grid units
    pub footprint: Vec2,
    /// Price in cents
    pub price: u32,
    /// Not allowed through the checkout
    pub restricted: bool,
    /// Turned sideways
    pub rot90: bool,
    /// Anchor is inside the basket
    pub in_basket: bool,
    /// Inside the basket and clear of every sibling (set by the scene)
    pub acceptable: bool,
    /// Picked up by the pointer; not collidable while held
    pub held: bool,
    /// Owner's basket for the current session
    pub basket: Rect,
    /// Where the packer put this item (world pixels)
    pub slot: Rect,
}

impl Product {
    pub fn new(owner: EntityId, spec: &ProductSpec, basket: Rect, slot: Rect, rotated: bool) -> Self {
        Self {
            owner,
            name: spec.name.clone(),
            footprint: spec.footprint,
            price: spec.price,
            restricted: spec.restricted,
            rot90: rotated,
            in_basket: false,
            acceptable: false,
            held: false,
            basket,
            slot,
        }
    }

    /// Size in the basket, with rotation applied (pixels)
    pub fn full_size(&self) -> Vec2 {
        let size = self.footprint * GRID_UNIT;
        if self.rot90 { Vec2::new(size.y, size.x) } else { size }
    }

    /// Current drawn size: full in the basket, shrunk on the shelf
    pub fn display_size(&self) -> Vec2 {
        if self.in_basket {
            self.full_size()
        } else {
            self.full_size() * SHELF_SCALE
        }
    }

    /// Local collider centered on the anchor
    pub fn collider(&self) -> Option<Rect> {
        if self.held {
            None
        } else {
            Some(Rect::centered(Vec2::ZERO, self.display_size()))
        }
    }

    /// Re-derive `in_basket` from the anchor position
    pub fn relocate(&mut self, anchor: Vec2) {
        self.in_basket = self.basket.contains_pt(anchor);
    }

    pub fn rotate(&mut self) {
        self.rot90 = !self.rot90;
    }

    /// Orientation matches the packed slot
    pub fn matches_slot(&self) -> bool {
        self.full_size() == self.slot.size()
    }
}

/// Drag a product by `v`, then refresh its basket status and collider.
/// Returns the translation actually applied.
pub fn move_product(layer: &mut Layer, id: EntityId, v: Vec2) -> Vec2 {
    let applied = layer.move_if_possible(id, v, MoveContext::Drag);
    refresh_product(layer, id);
    applied
}

/// Turn a product sideways about its anchor
pub fn rotate_product(layer: &mut Layer, id: EntityId) {
    if let Some(product) = layer.get_mut(id).and_then(|e| e.as_product_mut()) {
        product.rotate();
    }
    refresh_product(layer, id);
}

/// Pick up or put down a product
pub fn hold_product(layer: &mut Layer, id: EntityId, held: bool) {
    if let Some(product) = layer.get_mut(id).and_then(|e| e.as_product_mut()) {
        product.held = held;
    }
    refresh_product(layer, id);
}

/// Recompute `in_basket` and the collider after a position or shape change
pub fn refresh_product(layer: &mut Layer, id: EntityId) {
    let Some(entity) = layer.get_mut(id) else {
        return;
    };
    let anchor = entity.pos;
    if let Some(product) = entity.as_product_mut() {
        product.relocate(anchor);
    }
    entity.sync_collider();
}
