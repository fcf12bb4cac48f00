//! Customers and their checkout session lifecycle
//!
//! ```text
//! Approaching --(front of queue, at counter)--> InSession
//! InSession --(timeout | price chosen | illegal item)--> Leaving
//! Leaving --(off the trailing edge)--> removed
//! ```

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::entity::{EntityId, Step};
use super::geom::Rect;
use crate::consts::{CUSTOMER_HEIGHT, CUSTOMER_WIDTH, WALK_SPEED};
use crate::settings::{Catalog, ProductSpec};

/// Session lifecycle of a customer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SessionState {
    /// Walking up to the counter (or waiting in line)
    Approaching,
    /// Being served; patience runs from `start`
    InSession { start: f32 },
    /// Walking out, whatever the outcome
    Leaving,
}

/// Kind of shopper, which decides what ends up in the basket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Archetype {
    /// A few ordinary items
    Regular,
    /// Lots of the same couple of things
    Bulk,
    /// One or two small things
    Snacker,
    /// Ordinary items plus something that must not pass the checkout
    Shady,
}

impl Archetype {
    /// Pick an archetype for a new customer
    pub fn roll<R: Rng + ?Sized>(rng: &mut R) -> Self {
        match rng.random_range(0..10) {
            0..4 => Archetype::Regular,
            4..6 => Archetype::Bulk,
            6..8 => Archetype::Snacker,
            _ => Archetype::Shady,
        }
    }

    /// Draw this customer's shopping list from the catalog
    pub fn shopping_list<R: Rng + ?Sized>(&self, catalog: &Catalog, rng: &mut R) -> Vec<ProductSpec> {
        let legal: Vec<&ProductSpec> = catalog.items.iter().filter(|p| !p.restricted).collect();
        let legal = if legal.is_empty() {
            catalog.items.iter().collect()
        } else {
            legal
        };

        let mut list = Vec::new();
        match self {
            Archetype::Regular => {
                let count = rng.random_range(2..=4);
                list.extend(pick(&legal, count, rng));
            }
            Archetype::Bulk => {
                let kinds: Vec<&ProductSpec> = legal.choose_multiple(rng, 2).copied().collect();
                let count = rng.random_range(4..=6);
                list.extend(pick(&kinds, count, rng));
            }
            Archetype::Snacker => {
                let small: Vec<&ProductSpec> = legal
                    .iter()
                    .copied()
                    .filter(|p| p.footprint.x * p.footprint.y <= 2.0)
                    .collect();
                let pool = if small.is_empty() { &legal } else { &small };
                let count = rng.random_range(1..=2);
                list.extend(pick(pool, count, rng));
            }
            Archetype::Shady => {
                let count = rng.random_range(2..=3);
                list.extend(pick(&legal, count, rng));
                let banned: Vec<&ProductSpec> = catalog.items.iter().filter(|p| p.restricted).collect();
                if let Some(item) = banned.choose(rng) {
                    let at = rng.random_range(0..=list.len());
                    list.insert(at, (*item).clone());
                }
            }
        }
        list
    }
}

fn pick<R: Rng + ?Sized>(pool: &[&ProductSpec], count: usize, rng: &mut R) -> Vec<ProductSpec> {
    (0..count)
        .filter_map(|_| pool.choose(rng).map(|p| (*p).clone()))
        .collect()
}

/// A customer walking the checkout lane
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub archetype: Archetype,
    pub state: SessionState,
    /// Seconds of patience once the session starts
    pub patience: f32,
    /// Sized when the session starts
    pub basket: Rect,
    /// Products owned for the current session
    pub products: Vec<EntityId>,
    /// Where the customer stops to be served
    pub counter_x: f32,
}

impl Customer {
    pub fn new(archetype: Archetype, patience: f32, counter_x: f32) -> Self {
        Self {
            archetype,
            state: SessionState::Approaching,
            patience,
            basket: Rect::ZERO,
            products: Vec::new(),
            counter_x,
        }
    }

    pub fn collider(&self) -> Rect {
        Rect::centered(Vec2::ZERO, Vec2::new(CUSTOMER_WIDTH, CUSTOMER_HEIGHT))
    }

    pub fn session_start(&self) -> Option<f32> {
        match self.state {
            SessionState::InSession { start } => Some(start),
            _ => None,
        }
    }

    /// Patience remaining at time `t`; negative once exceeded
    pub fn time_left(&self, t: f32) -> Option<f32> {
        self.session_start().map(|start| self.patience - (t - start))
    }

    pub fn is_timed_out(&self, t: f32) -> bool {
        self.time_left(t).is_some_and(|left| left <= 0.0)
    }

    /// Standing at the counter
    pub fn at_counter(&self, pos: Vec2, reach: f32) -> bool {
        pos.x >= self.counter_x - reach
    }

    pub fn begin_session(&mut self, t: f32, basket: Rect, products: Vec<EntityId>) {
        self.state = SessionState::InSession { start: t };
        self.basket = basket;
        self.products = products;
    }

    /// End the session and hand back the products to discard
    pub fn leave(&mut self) -> Vec<EntityId> {
        self.state = SessionState::Leaving;
        std::mem::take(&mut self.products)
    }

    /// Per-tick movement intent
    pub fn step(&self, pos: Vec2, bounds: &Rect) -> Step {
        match self.state {
            SessionState::Approaching => {
                let dx = (self.counter_x - pos.x).min(WALK_SPEED);
                if dx > 0.0 {
                    Step::Walk(Vec2::new(dx, 0.0))
                } else {
                    Step::Idle
                }
            }
            SessionState::InSession { .. } => Step::Idle,
            SessionState::Leaving => {
                if pos.x - CUSTOMER_WIDTH / 2.0 >= bounds.right() {
                    Step::Stop
                } else {
                    Step::Walk(Vec2::new(WALK_SPEED, 0.0))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_time_left_and_timeout() {
        let mut customer = Customer::new(Archetype::Regular, 10.0, 400.0);
        assert_eq!(customer.time_left(5.0), None);
        assert!(!customer.is_timed_out(100.0));

        customer.begin_session(5.0, Rect::ZERO, Vec::new());
        assert_eq!(customer.session_start(), Some(5.0));
        assert_eq!(customer.time_left(14.0), Some(1.0));
        assert!(!customer.is_timed_out(14.0));
        assert_eq!(customer.time_left(15.0), Some(0.0));
        assert!(customer.is_timed_out(15.0));
        assert!(customer.time_left(16.0).unwrap() < 0.0);
    }

    #[test]
    fn test_leave_releases_products() {
        let mut customer = Customer::new(Archetype::Regular, 10.0, 400.0);
        customer.begin_session(0.0, Rect::new(0.0, 0.0, 10.0, 10.0), vec![EntityId(3), EntityId(4)]);
        let released = customer.leave();
        assert_eq!(released, vec![EntityId(3), EntityId(4)]);
        assert!(customer.products.is_empty());
        assert_eq!(customer.state, SessionState::Leaving);
        assert_eq!(customer.session_start(), None);
    }

    #[test]
    fn test_step_toward_counter() {
        let customer = Customer::new(Archetype::Regular, 10.0, 101.0);
        let bounds = Rect::new(0.0, 0.0, 640.0, 480.0);
        assert_eq!(customer.step(Vec2::new(50.0, 0.0), &bounds), Step::Walk(Vec2::new(WALK_SPEED, 0.0)));
        assert_eq!(customer.step(Vec2::new(100.0, 0.0), &bounds), Step::Walk(Vec2::new(1.0, 0.0)));
        assert_eq!(customer.step(Vec2::new(101.0, 0.0), &bounds), Step::Idle);
    }

    #[test]
    fn test_leaving_stops_past_edge() {
        let mut customer = Customer::new(Archetype::Regular, 10.0, 100.0);
        customer.state = SessionState::Leaving;
        let bounds = Rect::new(0.0, 0.0, 640.0, 480.0);
        assert_eq!(customer.step(Vec2::new(600.0, 0.0), &bounds), Step::Walk(Vec2::new(WALK_SPEED, 0.0)));
        assert_eq!(customer.step(Vec2::new(656.0, 0.0), &bounds), Step::Stop);
    }

    #[test]
    fn test_shopping_lists_follow_archetype() {
        let catalog = Catalog::default();
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..50 {
            let regular = Archetype::Regular.shopping_list(&catalog, &mut rng);
            assert!((2..=4).contains(&regular.len()));
            assert!(regular.iter().all(|p| !p.restricted));

            let bulk = Archetype::Bulk.shopping_list(&catalog, &mut rng);
            assert!((4..=6).contains(&bulk.len()));
            let mut names: Vec<_> = bulk.iter().map(|p| p.name.as_str()).collect();
            names.sort();
            names.dedup();
            assert!(names.len() <= 2);

            let snack = Archetype::Snacker.shopping_list(&catalog, &mut rng);
            assert!((1..=2).contains(&snack.len()));
            assert!(snack.iter().all(|p| p.footprint.x * p.footprint.y <= 2.0));

            let shady = Archetype::Shady.shopping_list(&catalog, &mut rng);
            assert_eq!(shady.iter().filter(|p| p.restricted).count(), 1);
        }
    }
}
