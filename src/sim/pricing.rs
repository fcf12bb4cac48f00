//! "Guess the total" multiple-choice menu

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Spacing of wrong answers around the real total (cents)
pub const DISTRACTOR_STEP: i64 = 10;
/// Farthest a wrong answer strays from the real total, in steps
pub const DISTRACTOR_SPREAD: i64 = 20;

/// One choice in the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceOption {
    /// Displayed amount (cents)
    pub amount: i64,
    /// Signed difference from the real total; zero for the right answer
    pub delta: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceMenu {
    pub options: Vec<PriceOption>,
    /// Index of the right answer
    pub correct: usize,
    /// Highlighted option
    pub selected: usize,
}

impl PriceMenu {
    /// Build `count` options (at least two) around `total`, shuffled
    pub fn new<R: Rng + ?Sized>(total: u32, count: usize, rng: &mut R) -> Self {
        let total = i64::from(total);
        let mut deltas: Vec<i64> = (1..=DISTRACTOR_SPREAD)
            .flat_map(|k| [k * DISTRACTOR_STEP, -k * DISTRACTOR_STEP])
            .filter(|d| total + d > 0)
            .collect();
        deltas.shuffle(rng);
        deltas.truncate(count.max(2) - 1);
        deltas.push(0);
        deltas.shuffle(rng);

        let options: Vec<PriceOption> = deltas
            .into_iter()
            .map(|delta| PriceOption {
                amount: total + delta,
                delta,
            })
            .collect();
        let correct = options.iter().position(|o| o.delta == 0).unwrap_or(0);
        log::debug!("Price menu: total={} options={}", total, options.len());
        Self {
            options,
            correct,
            selected: 0,
        }
    }

    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % self.options.len();
    }

    pub fn select_prev(&mut self) {
        self.selected = (self.selected + self.options.len() - 1) % self.options.len();
    }

    /// Delta of the highlighted option
    pub fn selected_delta(&self) -> i64 {
        self.options.get(self.selected).map_or(0, |o| o.delta)
    }

    pub fn total(&self) -> i64 {
        self.options[self.correct].amount
    }
}
