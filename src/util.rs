//! Ambient helpers: error types and small cross-cutting utilities.
//!
//! The public contract rejects bad input rather than panicking, so errors
//! are structured with `thiserror` rather than hand-rolled.

use crate::card::Card;
use thiserror::Error;

/// The engine's fallible-operation error kinds.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    /// The caller supplied an action that is not in the current legal set.
    #[error("action is not in the current legal set")]
    InvalidAction,
    /// The draw and discard piles were both empty on a reshuffle attempt.
    /// Should be unreachable given the card-conservation invariant.
    #[error("draw and discard piles are both empty")]
    DeckExhausted,
    /// An action referenced a marble that does not exist at the given position.
    #[error("action referenced a marble that does not exist")]
    InternalInconsistency,
}

/// A placeholder card used to mask an opponent's hand in `player_view`.
/// Carries no suit/rank information a peeking client could use.
pub const HIDDEN_CARD: Card = Card::new(crate::card::Suit::None, crate::card::Rank::Joker);

/// Replaces every card in `hand` with a placeholder of identical length,
/// deriving a transformed read-only view without mutating the canonical
/// state.
pub fn mask_hand(hand: &[Card]) -> Vec<Card> {
    vec![HIDDEN_CARD; hand.len()]
}
