//! dog_engine: the core rules engine for Dog, a four-player partner
//! Brandi-Dog variant.
//!
//! Four colored seats share a 64-cell ring board, per-color kennels and
//! endzones, and a 110-card draw/discard deck. Partners (Blue/Green,
//! Red/Yellow) cooperate: once a player's own four marbles are all home,
//! that seat plays its cards for the partner's marbles instead. A team
//! wins when both partners have all four marbles in their endzone.
//!
//! This crate is the pure game engine only: state, move generation, action
//! application, and round scheduling. It does not render, network, or
//! search for moves beyond uniform-random sampling (`player::RandomAgent`).

pub mod board;
pub mod card;
pub mod engine;
pub mod moves;
pub mod player;
pub mod state;
pub mod util;

pub use engine::Engine;
pub use state::{Action, GamePhase, GameState};
