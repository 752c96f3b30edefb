//! A uniform-random move picker, standing in for any real decision policy.
//!
//! Samples uniformly from whatever `list_actions()` offers; holds no model,
//! no search, no state of its own.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::state::Action;

/// Picks uniformly at random among the actions offered to it. Holds no
/// state of its own; the caller supplies both the legal set and the RNG.
pub struct RandomAgent;

impl RandomAgent {
    pub fn select_action(&self, actions: &[Action], rng: &mut impl Rng) -> Option<Action> {
        actions.choose(rng).copied()
    }
}
