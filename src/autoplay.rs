//! Idle/demo mode - a bot that plays through the public input API
//!
//! Each call performs at most one action: rotate or drag a single product,
//! or press one key in the price menu. It drops restricted goods in the
//! disposal zone, packs everything else into its packed slot and then
//! picks the right total.

use glam::Vec2;

use crate::sim::{EntityId, GamePhase, Key, PointerButton, Scene};

/// What the bot did this step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Idle,
    Rotated(EntityId),
    Placed(EntityId),
    Disposed(EntityId),
    MenuKey(Key),
}

/// Take one action
pub fn step(scene: &mut Scene) -> Action {
    match scene.phase {
        GamePhase::GameOver => Action::Idle,
        GamePhase::Pricing => {
            let Some(menu) = scene.menu.as_ref() else {
                return Action::Idle;
            };
            let key = if menu.selected == menu.correct {
                Key::Enter
            } else {
                Key::Right
            };
            scene.key_down(key);
            Action::MenuKey(key)
        }
        GamePhase::Playing => handle_next_product(scene),
    }
}

fn handle_next_product(scene: &mut Scene) -> Action {
    for id in scene.session_products() {
        let (Some(product), Some(entity)) = (scene.product(id), scene.layer.get(id)) else {
            continue;
        };
        let pos = entity.pos;

        if product.restricted {
            let bin = scene.settings.disposal_zone.center();
            return if drag(scene, id, pos, bin) {
                Action::Disposed(id)
            } else {
                Action::Idle
            };
        }

        if !product.matches_slot() {
            scene.pointer_down(pos, PointerButton::Primary);
            let hit = scene.focus == Some(id);
            scene.pointer_up(pos, PointerButton::Primary);
            return if hit { Action::Rotated(id) } else { Action::Idle };
        }

        let slot = product.slot;
        let placed = product.in_basket && pos.distance(slot.center()) < 0.5;
        if !placed {
            return if drag(scene, id, pos, slot.center()) {
                Action::Placed(id)
            } else {
                Action::Idle
            };
        }
    }
    Action::Idle
}

fn drag(scene: &mut Scene, id: EntityId, from: Vec2, to: Vec2) -> bool {
    scene.pointer_down(from, PointerButton::Primary);
    if scene.focus != Some(id) {
        scene.pointer_up(from, PointerButton::Primary);
        return false;
    }
    scene.pointer_move(to);
    scene.pointer_up(to, PointerButton::Primary);
    true
}
