//! Entity container with spatial queries and fenced movement
//!
//! Entities are kept in registration order (ascending id), which is also the
//! update order and the order every query reports.

use glam::Vec2;

use super::entity::{Entity, EntityId, EntityKind, MoveContext, Step};
use super::geom::Rect;

#[derive(Debug, Clone)]
pub struct Layer {
    /// Playfield; entities fence against it
    pub bounds: Rect,
    /// Time of the last tick
    pub time: f32,
    entities: Vec<Entity>,
    next_id: u32,
}

impl Layer {
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            time: 0.0,
            entities: Vec::new(),
            next_id: 1,
        }
    }

    /// Register a new entity at `pos`
    pub fn add(&mut self, pos: Vec2, kind: EntityKind) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.entities.push(Entity::new(id, pos, kind));
        id
    }

    /// Take an entity out of the layer. It receives no further updates.
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let index = self.index_of(id)?;
        let mut entity = self.entities.remove(index);
        entity.stopped = true;
        Some(entity)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.index_of(id).map(|i| &self.entities[i])
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        let index = self.index_of(id)?;
        Some(&mut self.entities[index])
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    fn index_of(&self, id: EntityId) -> Option<usize> {
        self.entities.binary_search_by_key(&id, |e| e.id).ok()
    }

    /// Ids of all entities matching `pred`. The entity doing the asking is
    /// not excluded unless `pred` says so.
    pub fn find_entities(&self, pred: impl Fn(&Entity) -> bool) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|e| !e.stopped && pred(*e))
            .map(|e| e.id)
            .collect()
    }

    /// Ids of all entities whose collider contains `p`
    pub fn find_entities_by_pt(&self, p: Vec2) -> Vec<EntityId> {
        self.find_entities(|e| e.world_collider().is_some_and(|c| c.contains_pt(p)))
    }

    /// Call `f` once per unordered pair of distinct collidable entities.
    /// The earlier-registered entity is always passed first.
    pub fn check_entity_pairs(&mut self, mut f: impl FnMut(&mut Entity, &mut Entity)) {
        for j in 1..self.entities.len() {
            let (head, tail) = self.entities.split_at_mut(j);
            let b = &mut tail[0];
            if b.stopped || b.collider.is_none() {
                continue;
            }
            for a in head.iter_mut() {
                if a.stopped || a.collider.is_none() {
                    continue;
                }
                f(a, b);
            }
        }
    }

    /// Move an entity by `v` as far as its fences allow. Returns the
    /// translation actually applied.
    pub fn move_if_possible(&mut self, id: EntityId, v: Vec2, context: MoveContext) -> Vec2 {
        let bounds = self.bounds;
        let Some(entity) = self.get_mut(id) else {
            return Vec2::ZERO;
        };
        let range = entity.range();
        let fences = entity.fences_for(&range, v, context, &bounds);
        let applied = resolve_move(&range, v, &fences);
        entity.pos += applied;
        applied
    }

    /// Advance every entity once, in registration order
    pub fn tick(&mut self, t: f32) {
        self.time = t;
        let bounds = self.bounds;
        for i in 0..self.entities.len() {
            if self.entities[i].stopped {
                continue;
            }
            match self.entities[i].update(t, &bounds) {
                Step::Idle => {}
                Step::Stop => {
                    self.entities[i].stopped = true;
                    log::debug!("{:?} left the playfield", self.entities[i].id);
                }
                Step::Walk(v) => {
                    if !self.is_crowded(i, v) {
                        let id = self.entities[i].id;
                        self.move_if_possible(id, v, MoveContext::Walk);
                    }
                }
            }
        }
        self.entities.retain(|e| !e.stopped);
    }

    /// Someone ahead of entity `index` is inside its personal space
    fn is_crowded(&self, index: usize, v: Vec2) -> bool {
        let me = &self.entities[index];
        let Some(space) = me.personal_space(v) else {
            return false;
        };
        let (id, pos) = (me.id, me.pos);
        !self
            .find_entities(|e| {
                e.id != id
                    && e.blocks_walkers()
                    && (e.pos - pos).dot(v) > 0.0
                    && e.world_collider().is_some_and(|c| c.overlaps_rect(&space))
            })
            .is_empty()
    }
}

/// Clamp `v` so that `range` ends inside one of `fences`.
///
/// No fences: unconstrained. If the full move lands inside a fence it is
/// taken as is. Otherwise each fence already containing `range` offers the
/// nearest contained position and the longest such move wins, first fence
/// on ties. If no fence contains `range` the move is rejected.
pub fn resolve_move(range: &Rect, v: Vec2, fences: &[Rect]) -> Vec2 {
    if fences.is_empty() {
        return v;
    }
    let target = range.translate(v);
    if fences.iter().any(|f| f.contains_rect(&target)) {
        return v;
    }
    let mut best: Option<Vec2> = None;
    for fence in fences.iter().filter(|f| f.contains_rect(range)) {
        if let Some(clamped) = range.clamp_move(v, fence) {
            if best.is_none_or(|b| clamped.length_squared() > b.length_squared()) {
                best = Some(clamped);
            }
        }
    }
    best.unwrap_or(Vec2::ZERO)
}
