//! Checkout scene: the per-frame driver
//!
//! Owns the customer line, runs the head customer's session, checks basket
//! placement and hands out strikes. Pointer and key input arrive between
//! ticks and mutate the state directly.

use std::collections::VecDeque;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::board::Board;
use super::customer::{Archetype, Customer, SessionState};
use super::entity::{EntityId, EntityKind};
use super::geom::Rect;
use super::layer::Layer;
use super::pricing::PriceMenu;
use super::product::{Product, hold_product, move_product, refresh_product, rotate_product};
use crate::consts::*;
use crate::settings::Settings;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Customers arrive, products get packed
    Playing,
    /// Basket is accepted and the price menu is open
    Pricing,
    /// Out of health; waiting for restart
    GameOver,
}

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Timeout,
    WrongGuess,
    /// A restricted product was still in the basket at commit
    IllegalItem,
}

impl Outcome {
    pub fn is_strike(&self) -> bool {
        *self != Outcome::Success
    }
}

/// Things presentation and audio may want to react to
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    CustomerSpawned(EntityId),
    SessionStarted { customer: EntityId, products: usize },
    ProductDisposed(EntityId),
    PricingOpened { total: u32 },
    SessionEnded { customer: EntityId, outcome: Outcome },
    GameOver { score: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Enter,
    Escape,
    /// Turn the focused product
    Rotate,
    Other,
}

/// Pointer drag in progress
#[derive(Debug, Clone, Copy)]
struct Drag {
    product: EntityId,
    last: Vec2,
    travel: f32,
}

pub struct Scene {
    pub settings: Settings,
    pub layer: Layer,
    /// Customers not yet served, front is next
    pub queue: VecDeque<EntityId>,
    pub phase: GamePhase,
    pub health: u32,
    /// Sum of correctly priced baskets (cents)
    pub score: u64,
    pub served: u32,
    pub failed: u32,
    /// Time of the last tick
    pub time: f32,
    /// Every product of the current session is acceptable
    pub ready: bool,
    pub menu: Option<PriceMenu>,
    /// Product under the pointer
    pub focus: Option<EntityId>,
    drag: Option<Drag>,
    next_spawn: f32,
    seed: u64,
    rng: Pcg32,
    events: Vec<GameEvent>,
}

impl Scene {
    pub fn new(settings: Settings, seed: u64) -> Self {
        let layer = Layer::new(settings.playfield);
        let health = settings.starting_health;
        Self {
            settings,
            layer,
            queue: VecDeque::new(),
            phase: GamePhase::Playing,
            health,
            score: 0,
            served: 0,
            failed: 0,
            time: 0.0,
            ready: false,
            menu: None,
            focus: None,
            drag: None,
            next_spawn: 0.0,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
        }
    }

    /// Throw everything away and start over with a new seed
    pub fn restart(&mut self) {
        let seed = self.seed.wrapping_mul(6364136223846793005).wrapping_add(1);
        let time = self.time;
        *self = Self::new(self.settings.clone(), seed);
        self.time = time;
        self.next_spawn = time;
        log::info!("Game restarted with seed: {}", seed);
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Events since the last drain, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Customer at the front of the line
    pub fn head(&self) -> Option<EntityId> {
        self.queue.front().copied()
    }

    pub fn customer(&self, id: EntityId) -> Option<&Customer> {
        self.layer.get(id).and_then(|e| e.as_customer())
    }

    pub fn product(&self, id: EntityId) -> Option<&Product> {
        self.layer.get(id).and_then(|e| e.as_product())
    }

    /// Customer currently being served
    pub fn serving(&self) -> Option<EntityId> {
        self.head()
            .filter(|id| self.customer(*id).is_some_and(|c| c.session_start().is_some()))
    }

    /// Basket of the customer being served
    pub fn basket(&self) -> Option<Rect> {
        self.serving().and_then(|id| self.customer(id)).map(|c| c.basket)
    }

    /// Patience left for the customer being served
    pub fn time_left(&self) -> Option<f32> {
        self.serving()
            .and_then(|id| self.customer(id))
            .and_then(|c| c.time_left(self.time))
    }

    /// Products of the customer being served
    pub fn session_products(&self) -> Vec<EntityId> {
        self.serving()
            .and_then(|id| self.customer(id))
            .map(|c| c.products.clone())
            .unwrap_or_default()
    }

    /// Advance one frame
    pub fn tick(&mut self, t: f32) {
        self.time = t;
        if self.phase == GamePhase::GameOver {
            return;
        }

        if t >= self.next_spawn && self.spawn_customer() {
            self.next_spawn = t + self.settings.spawn_interval;
        }

        self.layer.tick(t);
        let layer = &self.layer;
        self.queue.retain(|id| layer.get(*id).is_some());

        self.update_session(t);
        self.ready = self.check_placement();
    }

    fn spawn_customer(&mut self) -> bool {
        if self.queue.len() >= self.settings.max_queue {
            return false;
        }
        let pos = self.settings.spawn_point();
        let door = Rect::centered(pos, Vec2::new(CUSTOMER_WIDTH, CUSTOMER_HEIGHT))
            .inflate(PERSONAL_SPACE, 0.0);
        let blocked = !self
            .layer
            .find_entities(|e| e.blocks_walkers() && e.world_collider().is_some_and(|c| c.overlaps_rect(&door)))
            .is_empty();
        if blocked {
            return false;
        }

        let archetype = Archetype::roll(&mut self.rng);
        let patience = self.settings.patience.for_archetype(archetype);
        let customer = Customer::new(archetype, patience, self.settings.counter_x);
        let id = self.layer.add(pos, EntityKind::Customer(customer));
        self.queue.push_back(id);
        self.events.push(GameEvent::CustomerSpawned(id));
        log::debug!("Customer {:?} ({:?}) joined the line", id, archetype);
        true
    }

    fn update_session(&mut self, t: f32) {
        let Some(head) = self.head() else {
            return;
        };
        let Some(entity) = self.layer.get(head) else {
            return;
        };
        let Some(customer) = entity.as_customer() else {
            return;
        };
        let arrived = customer.at_counter(entity.pos, COUNTER_REACH);
        let timed_out = customer.is_timed_out(t);
        let state = customer.state;
        match state {
            SessionState::Approaching if arrived => self.start_session(head, t),
            SessionState::InSession { .. } if timed_out => self.end_session(Outcome::Timeout),
            _ => {}
        }
    }

    fn start_session(&mut self, head: EntityId, t: f32) {
        let Some(archetype) = self.customer(head).map(|c| c.archetype) else {
            return;
        };
        let list = archetype.shopping_list(&self.settings.catalog, &mut self.rng);

        let mut board = Board::new();
        let placements: Vec<_> = list.iter().map(|spec| board.add(spec.footprint)).collect();
        let packed = board.bounds();

        let margin = self.settings.basket_margin;
        let basket = Rect::centered(self.settings.basket_center, packed.size() * GRID_UNIT)
            .inflate(margin, margin);
        let inner = basket.origin() + Vec2::splat(margin);

        let shelf = self.settings.shelf;
        let spacing = shelf.width / list.len().max(1) as f32;
        let mut products = Vec::with_capacity(list.len());
        for (i, (spec, placement)) in list.iter().zip(&placements).enumerate() {
            let offset = (placement.rect.origin() - packed.origin()) * GRID_UNIT;
            let slot = Rect::new(
                inner.x + offset.x,
                inner.y + offset.y,
                placement.rect.width * GRID_UNIT,
                placement.rect.height * GRID_UNIT,
            );
            let pos = Vec2::new(shelf.x + spacing * (i as f32 + 0.5), shelf.center().y).round();
            let product = Product::new(head, spec, basket, slot, placement.rotated);
            let id = self.layer.add(pos, EntityKind::Product(product));
            refresh_product(&mut self.layer, id);
            products.push(id);
        }

        let count = products.len();
        if let Some(customer) = self.layer.get_mut(head).and_then(|e| e.as_customer_mut()) {
            customer.begin_session(t, basket, products);
        }
        self.events.push(GameEvent::SessionStarted {
            customer: head,
            products: count,
        });
        log::info!(
            "Session started: {:?} {:?}, {} products, basket {}x{}",
            head,
            archetype,
            count,
            basket.width,
            basket.height
        );
    }

    fn end_session(&mut self, outcome: Outcome) {
        let Some(head) = self.head() else {
            return;
        };
        let total = self.basket_total();
        self.queue.pop_front();
        let products = self
            .layer
            .get_mut(head)
            .and_then(|e| e.as_customer_mut())
            .map(|c| c.leave())
            .unwrap_or_default();
        for id in products {
            self.layer.remove(id);
        }

        self.menu = None;
        self.focus = None;
        self.drag = None;
        self.ready = false;
        self.phase = GamePhase::Playing;

        if outcome.is_strike() {
            self.failed += 1;
            self.health = self.health.saturating_sub(1);
        } else {
            self.served += 1;
            self.score += u64::from(total);
        }
        self.events.push(GameEvent::SessionEnded {
            customer: head,
            outcome,
        });
        log::info!("Session ended: {:?} {:?}, health {}", head, outcome, self.health);

        if self.health == 0 {
            self.phase = GamePhase::GameOver;
            self.events.push(GameEvent::GameOver { score: self.score });
            log::info!("Game over: served {}, score {}", self.served, self.score);
        }
    }

    /// Sum of prices of the current session's products (cents)
    pub fn basket_total(&self) -> u32 {
        self.session_products()
            .iter()
            .filter_map(|id| self.product(*id))
            .map(|p| p.price)
            .sum()
    }

    /// Re-evaluate every product's `acceptable` flag. True when the session
    /// has products and all of them sit inside the basket without overlap.
    pub fn check_placement(&mut self) -> bool {
        let Some(head) = self.serving() else {
            return false;
        };
        let Some(basket) = self.basket() else {
            return false;
        };
        let ids = self.session_products();

        let mut collidable = !ids.is_empty();
        for id in &ids {
            let Some(entity) = self.layer.get_mut(*id) else {
                continue;
            };
            let world = entity.world_collider();
            if let Some(product) = entity.as_product_mut() {
                product.acceptable = match world {
                    Some(c) => basket.contains_rect(&c),
                    None => {
                        collidable = false;
                        false
                    }
                };
            }
        }

        self.layer.check_entity_pairs(|a, b| {
            let (Some(ca), Some(cb)) = (a.world_collider(), b.world_collider()) else {
                return;
            };
            if !ca.overlaps_rect(&cb) {
                return;
            }
            let siblings = a.as_product().is_some_and(|p| p.owner == head)
                && b.as_product().is_some_and(|p| p.owner == head);
            if siblings {
                for entity in [a, b] {
                    if let Some(product) = entity.as_product_mut() {
                        product.acceptable = false;
                    }
                }
            }
        });

        collidable
            && ids
                .iter()
                .all(|id| self.product(*id).is_some_and(|p| p.acceptable))
    }

    fn open_pricing(&mut self) {
        let total = self.basket_total();
        self.menu = Some(PriceMenu::new(total, self.settings.price_options, &mut self.rng));
        self.phase = GamePhase::Pricing;
        self.events.push(GameEvent::PricingOpened { total });
    }

    /// The presentation reports the chosen option's delta from the real total
    pub fn resolve_price_choice(&mut self, delta: i64) {
        if self.phase != GamePhase::Pricing {
            return;
        }
        let illegal = self
            .session_products()
            .iter()
            .any(|id| self.product(*id).is_some_and(|p| p.restricted));
        let outcome = if illegal {
            Outcome::IllegalItem
        } else if delta == 0 {
            Outcome::Success
        } else {
            Outcome::WrongGuess
        };
        self.end_session(outcome);
    }

    fn update_focus(&mut self, p: Vec2) {
        let owner = self.serving();
        let layer = &self.layer;
        self.focus = layer
            .find_entities_by_pt(p)
            .into_iter()
            .find(|id| {
                layer
                    .get(*id)
                    .and_then(|e| e.as_product())
                    .is_some_and(|pr| Some(pr.owner) == owner)
            });
    }

    pub fn pointer_down(&mut self, p: Vec2, button: PointerButton) {
        if self.phase != GamePhase::Playing {
            return;
        }
        self.update_focus(p);
        let Some(id) = self.focus else {
            return;
        };
        match button {
            PointerButton::Primary => {
                hold_product(&mut self.layer, id, true);
                self.drag = Some(Drag {
                    product: id,
                    last: p,
                    travel: 0.0,
                });
            }
            PointerButton::Secondary => rotate_product(&mut self.layer, id),
            PointerButton::Other => {}
        }
    }

    pub fn pointer_move(&mut self, p: Vec2) {
        match self.drag.as_mut() {
            Some(drag) => {
                let v = p - drag.last;
                drag.last = p;
                drag.travel += v.length();
                let id = drag.product;
                move_product(&mut self.layer, id, v);
            }
            None if self.phase == GamePhase::Playing => self.update_focus(p),
            None => {}
        }
    }

    pub fn pointer_up(&mut self, p: Vec2, button: PointerButton) {
        if button == PointerButton::Primary {
            if let Some(drag) = self.drag.take() {
                self.drop_product(drag);
            }
        }
        if self.phase != GamePhase::Playing {
            return;
        }
        self.update_focus(p);
        self.ready = self.check_placement();
        if self.ready {
            self.open_pricing();
        }
    }

    fn drop_product(&mut self, drag: Drag) {
        let id = drag.product;
        hold_product(&mut self.layer, id, false);
        if drag.travel <= CLICK_SLOP {
            rotate_product(&mut self.layer, id);
        }
        let Some(entity) = self.layer.get(id) else {
            return;
        };
        let in_disposal = self.settings.disposal_zone.contains_pt(entity.pos);
        let restricted = entity.as_product().is_some_and(|p| p.restricted);
        if in_disposal && restricted {
            self.dispose(id);
        }
    }

    fn dispose(&mut self, id: EntityId) {
        let owner = self.product(id).map(|p| p.owner);
        if let Some(customer) = owner.and_then(|o| self.layer.get_mut(o)).and_then(|e| e.as_customer_mut()) {
            customer.products.retain(|p| *p != id);
        }
        self.layer.remove(id);
        if self.focus == Some(id) {
            self.focus = None;
        }
        self.events.push(GameEvent::ProductDisposed(id));
        log::debug!("Disposed of {:?}", id);
    }

    pub fn key_down(&mut self, key: Key) {
        match self.phase {
            GamePhase::GameOver => {
                if key == Key::Enter {
                    self.restart();
                }
            }
            GamePhase::Pricing => {
                let Some(menu) = self.menu.as_mut() else {
                    return;
                };
                match key {
                    Key::Left | Key::Up => menu.select_prev(),
                    Key::Right | Key::Down => menu.select_next(),
                    Key::Enter => {
                        let delta = menu.selected_delta();
                        self.resolve_price_choice(delta);
                    }
                    Key::Escape => {
                        self.menu = None;
                        self.phase = GamePhase::Playing;
                    }
                    _ => {}
                }
            }
            GamePhase::Playing => {
                if key == Key::Rotate {
                    if let Some(id) = self.focus {
                        rotate_product(&mut self.layer, id);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::ProductSpec;

    /// Run ticks until the head customer's session starts
    fn start_first_session(scene: &mut Scene) -> EntityId {
        let mut t = 0.0;
        for _ in 0..2_000 {
            scene.tick(t);
            t += SIM_DT;
            if let Some(id) = scene.serving() {
                return id;
            }
        }
        panic!("no session started");
    }

    fn add_product(scene: &mut Scene, owner: EntityId, pos: Vec2) -> EntityId {
        let spec = ProductSpec::new("Box", Vec2::new(1.0, 1.0), 100);
        let basket = scene.basket().unwrap();
        let product = Product::new(owner, &spec, basket, basket, false);
        let id = scene.layer.add(pos, EntityKind::Product(product));
        refresh_product(&mut scene.layer, id);
        id
    }

    /// Replace the session's products with hand-placed ones
    fn set_products(scene: &mut Scene, owner: EntityId, ids: Vec<EntityId>) {
        let old = scene.session_products();
        for id in old {
            scene.layer.remove(id);
        }
        scene
            .layer
            .get_mut(owner)
            .and_then(|e| e.as_customer_mut())
            .unwrap()
            .products = ids;
    }

    fn big_basket(scene: &mut Scene, owner: EntityId) {
        let customer = scene.layer.get_mut(owner).and_then(|e| e.as_customer_mut()).unwrap();
        customer.basket = Rect::new(0.0, 200.0, 200.0, 200.0);
    }

    #[test]
    fn test_session_starts_with_basket_and_products() {
        let mut scene = Scene::new(Settings::default(), 42);
        let head = start_first_session(&mut scene);
        let customer = scene.customer(head).unwrap();
        assert!(customer.session_start().is_some());
        assert!(!customer.products.is_empty());
        assert!(scene.settings.playfield.contains_rect(&customer.basket));
        for id in &customer.products {
            let product = scene.product(*id).unwrap();
            assert!(customer.basket.contains_rect(&product.slot));
            assert!(!product.in_basket);
        }
        assert!(!scene.ready);
    }

    #[test]
    fn test_overlap_vetoes_both() {
        let mut scene = Scene::new(Settings::default(), 42);
        let head = start_first_session(&mut scene);
        big_basket(&mut scene, head);
        let a = add_product(&mut scene, head, Vec2::new(20.0, 220.0));
        let b = add_product(&mut scene, head, Vec2::new(100.0, 300.0));
        for id in [a, b] {
            let basket = scene.basket().unwrap();
            scene.layer.get_mut(id).unwrap().as_product_mut().unwrap().basket = basket;
            refresh_product(&mut scene.layer, id);
        }
        set_products(&mut scene, head, vec![a, b]);

        assert!(scene.check_placement());
        assert!(scene.product(a).unwrap().acceptable);
        assert!(scene.product(b).unwrap().acceptable);

        // Overlap: both become unacceptable even though each is contained
        move_product(&mut scene.layer, b, Vec2::new(-70.0, -70.0));
        assert!(!scene.check_placement());
        assert!(!scene.product(a).unwrap().acceptable);
        assert!(!scene.product(b).unwrap().acceptable);
    }

    #[test]
    fn test_product_outside_basket_blocks_pricing() {
        let mut scene = Scene::new(Settings::default(), 42);
        start_first_session(&mut scene);
        let ids = scene.session_products();
        // Fresh products sit on the shelf
        assert!(!scene.check_placement());
        assert!(ids.iter().all(|id| !scene.product(*id).unwrap().acceptable));
    }

    #[test]
    fn test_timeout_is_a_strike() {
        let mut scene = Scene::new(Settings::default(), 7);
        let head = start_first_session(&mut scene);
        let start = scene.customer(head).unwrap().session_start().unwrap();
        let patience = scene.customer(head).unwrap().patience;

        scene.tick(start + patience - 1.0);
        assert_eq!(scene.serving(), Some(head));
        scene.tick(start + patience + 0.5);
        assert_eq!(scene.serving(), None);
        assert_eq!(scene.health, scene.settings.starting_health - 1);
        assert_eq!(scene.failed, 1);
        assert_eq!(scene.customer(head).unwrap().state, SessionState::Leaving);
        let events = scene.drain_events();
        assert!(events.contains(&GameEvent::SessionEnded {
            customer: head,
            outcome: Outcome::Timeout
        }));
    }

    #[test]
    fn test_health_exhaustion_ends_game() {
        let settings = Settings {
            starting_health: 1,
            ..Settings::default()
        };
        let mut scene = Scene::new(settings, 9);
        let head = start_first_session(&mut scene);
        let start = scene.customer(head).unwrap().session_start().unwrap();
        scene.tick(start + 1_000.0);
        assert_eq!(scene.phase, GamePhase::GameOver);

        // Frozen until restart
        let entities = scene.layer.len();
        scene.tick(start + 1_001.0);
        assert_eq!(scene.layer.len(), entities);

        scene.key_down(Key::Enter);
        assert_eq!(scene.phase, GamePhase::Playing);
        assert_eq!(scene.health, 1);
        assert!(scene.layer.is_empty());
        assert!(scene.queue.is_empty());
    }

    #[test]
    fn test_click_rotates_and_drag_moves() {
        let mut scene = Scene::new(Settings::default(), 3);
        start_first_session(&mut scene);
        let id = scene.session_products()[0];
        let pos = scene.layer.get(id).unwrap().pos;
        let rot = scene.product(id).unwrap().rot90;

        scene.pointer_down(pos, PointerButton::Primary);
        assert_eq!(scene.focus, Some(id));
        assert!(scene.layer.get(id).unwrap().collider.is_none());
        scene.pointer_up(pos, PointerButton::Primary);
        assert_eq!(scene.product(id).unwrap().rot90, !rot);

        scene.pointer_down(pos, PointerButton::Primary);
        let target = pos + Vec2::new(0.0, 60.0);
        scene.pointer_move(target);
        scene.pointer_up(target, PointerButton::Primary);
        assert_eq!(scene.layer.get(id).unwrap().pos, target);
        assert_eq!(scene.product(id).unwrap().rot90, !rot);
        assert!(scene.layer.get(id).unwrap().collider.is_some());
    }

    #[test]
    fn test_price_menu_keys() {
        let mut scene = Scene::new(Settings::default(), 5);
        let head = start_first_session(&mut scene);
        scene.phase = GamePhase::Pricing;
        scene.menu = Some(PriceMenu::new(scene.basket_total(), 4, &mut Pcg32::seed_from_u64(0)));
        scene.key_down(Key::Escape);
        assert_eq!(scene.phase, GamePhase::Playing);
        assert!(scene.menu.is_none());

        scene.open_pricing();
        let menu = scene.menu.as_ref().unwrap();
        let steps = menu.correct;
        for _ in 0..steps {
            scene.key_down(Key::Right);
        }
        let illegal = scene
            .session_products()
            .iter()
            .any(|id| scene.product(*id).unwrap().restricted);
        scene.key_down(Key::Enter);
        let expected = if illegal { Outcome::IllegalItem } else { Outcome::Success };
        assert!(scene.drain_events().contains(&GameEvent::SessionEnded {
            customer: head,
            outcome: expected
        }));
    }

    #[test]
    fn test_wrong_guess_and_illegal_item() {
        let mut scene = Scene::new(Settings::default(), 11);
        let head = start_first_session(&mut scene);
        let legal: Vec<_> = scene
            .session_products()
            .into_iter()
            .filter(|id| !scene.product(*id).unwrap().restricted)
            .collect();
        set_products_keep(&mut scene, head, legal);
        scene.open_pricing();
        scene.resolve_price_choice(30);
        assert_eq!(scene.failed, 1);
        assert_eq!(scene.served, 0);

        // Next customer carries something restricted; a right guess still fails
        let next = start_first_session_after(&mut scene, head);
        let spec = ProductSpec::new("Pills", Vec2::new(1.0, 1.0), 1500).restricted();
        let basket = scene.basket().unwrap();
        let pills = scene.layer.add(
            basket.center(),
            EntityKind::Product(Product::new(next, &spec, basket, basket, false)),
        );
        scene
            .layer
            .get_mut(next)
            .and_then(|e| e.as_customer_mut())
            .unwrap()
            .products
            .push(pills);
        scene.open_pricing();
        scene.resolve_price_choice(0);
        assert_eq!(scene.failed, 2);
        assert!(scene.drain_events().contains(&GameEvent::SessionEnded {
            customer: next,
            outcome: Outcome::IllegalItem
        }));
    }

    #[test]
    fn test_disposal_removes_restricted_only() {
        let mut scene = Scene::new(Settings::default(), 13);
        let head = start_first_session(&mut scene);
        let basket = scene.basket().unwrap();
        let spec = ProductSpec::new("Fireworks", Vec2::new(1.0, 3.0), 999).restricted();
        let bad = scene.layer.add(
            Vec2::new(100.0, 200.0),
            EntityKind::Product(Product::new(head, &spec, basket, basket, false)),
        );
        scene
            .layer
            .get_mut(head)
            .and_then(|e| e.as_customer_mut())
            .unwrap()
            .products
            .push(bad);
        let good = scene
            .session_products()
            .into_iter()
            .find(|id| !scene.product(*id).unwrap().restricted)
            .unwrap();

        let bin = scene.settings.disposal_zone.center();
        for id in [good, bad] {
            let from = scene.layer.get(id).unwrap().pos;
            scene.pointer_down(from, PointerButton::Primary);
            assert_eq!(scene.focus, Some(id));
            scene.pointer_move(bin);
            scene.pointer_up(bin, PointerButton::Primary);
        }
        assert!(scene.product(good).is_some());
        assert!(scene.product(bad).is_none());
        assert!(!scene.session_products().contains(&bad));
        assert!(scene.drain_events().contains(&GameEvent::ProductDisposed(bad)));
    }

    fn set_products_keep(scene: &mut Scene, owner: EntityId, keep: Vec<EntityId>) {
        let drop: Vec<_> = scene
            .session_products()
            .into_iter()
            .filter(|id| !keep.contains(id))
            .collect();
        for id in drop {
            scene.layer.remove(id);
        }
        scene
            .layer
            .get_mut(owner)
            .and_then(|e| e.as_customer_mut())
            .unwrap()
            .products = keep;
    }

    fn start_first_session_after(scene: &mut Scene, previous: EntityId) -> EntityId {
        let mut t = scene.time;
        for _ in 0..5_000 {
            t += SIM_DT;
            scene.tick(t);
            if let Some(id) = scene.serving().filter(|id| *id != previous) {
                return id;
            }
        }
        panic!("no second session started");
    }

    #[test]
    fn test_determinism() {
        let mut a = Scene::new(Settings::default(), 99);
        let mut b = Scene::new(Settings::default(), 99);
        let mut t = 0.0;
        for _ in 0..1_500 {
            a.tick(t);
            b.tick(t);
            t += SIM_DT;
        }
        assert_eq!(a.layer.len(), b.layer.len());
        assert_eq!(a.queue, b.queue);
        assert_eq!(a.session_products().len(), b.session_products().len());
        assert_eq!(a.basket(), b.basket());
    }
}
