//! The full game state: players, marbles, and round bookkeeping.
//!
//! State is structured per-player/per-marble rather than as one flat
//! board array, because the rules keep per-color bookkeeping (hands,
//! kennels, endzones, teammates) that a flat grid would have to
//! re-derive on every query.

use serde::{Deserialize, Serialize};

use crate::board::Color;
use crate::card::{Card, Deck};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[serde(rename = "setup")]
    Setup,
    #[serde(rename = "running")]
    Running,
    #[serde(rename = "finished")]
    Finished,
}

/// A single marble. `is_safe` is true exactly while it sits on its color's
/// start cell (just unlocked) or anywhere inside its own endzone.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marble {
    pub pos: u8,
    #[serde(rename = "is_save")]
    pub is_safe: bool,
}

impl Marble {
    pub fn in_kennel(self, color: Color) -> bool {
        color.kennel().contains(&self.pos)
    }

    pub fn in_endzone(self, color: Color) -> bool {
        color.endzone().contains(&self.pos)
    }

    pub fn on_ring(self) -> bool {
        crate::board::is_ring_cell(self.pos)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub color: Color,
    pub name: String,
    pub hand: Vec<Card>,
    pub marbles: [Marble; 4],
    #[serde(rename = "teamMate")]
    pub team_mate: String,
}

impl PlayerState {
    pub fn new(color: Color) -> Self {
        let marbles = color.kennel().map(|pos| Marble { pos, is_safe: false });
        Self {
            color,
            name: format!("{color:?}"),
            hand: Vec::new(),
            marbles,
            team_mate: format!("{:?}", color.partner()),
        }
    }

    pub fn all_marbles_finished(&self) -> bool {
        self.marbles.iter().all(|m| m.in_endzone(self.color))
    }
}

/// `{card, pos_from?, pos_to?, card_swap?}`, the unit of play.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Action {
    pub card: Option<Card>,
    pub pos_from: Option<u8>,
    pub pos_to: Option<u8>,
    pub card_swap: Option<Card>,
}

impl Action {
    pub fn pass(card: Card) -> Self {
        Self {
            card: Some(card),
            pos_from: None,
            pos_to: None,
            card_swap: None,
        }
    }

    pub fn mv(card: Card, pos_from: u8, pos_to: u8) -> Self {
        Self {
            card: Some(card),
            pos_from: Some(pos_from),
            pos_to: Some(pos_to),
            card_swap: None,
        }
    }

    pub fn nominate(card: Card, card_swap: Card) -> Self {
        Self {
            card: Some(card),
            pos_from: None,
            pos_to: None,
            card_swap: Some(card_swap),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub phase: GamePhase,
    #[serde(rename = "cnt_round")]
    pub round_no: u32,
    #[serde(rename = "bool_card_exchanged")]
    pub cards_exchanged: bool,
    #[serde(rename = "idx_player_started")]
    pub starter_seat: usize,
    #[serde(rename = "idx_player_active")]
    pub active_seat: usize,
    #[serde(rename = "list_player")]
    pub players: [PlayerState; 4],
    #[serde(rename = "list_card_draw")]
    pub draw_pile: Vec<Card>,
    #[serde(rename = "list_card_discard")]
    pub discard_pile: Vec<Card>,
    #[serde(rename = "card_active")]
    pub active_card: Option<Card>,
    pub seven_remaining: u8,
    /// Rollback point for a mid-distribution split-7.
    /// Not part of the wire format; a caller never needs to serialize a
    /// half-finished 7, since the sequence completes or rolls back before
    /// control returns to the session layer.
    #[serde(skip)]
    pub pre_seven_snapshot: Option<Box<GameState>>,
    /// Number of "pass one card to partner" actions collected so far this
    /// round; resets once all four seats have exchanged.
    #[serde(skip)]
    pub exchange_count: u8,
}

impl GameState {
    pub fn deck(&self) -> Deck {
        Deck {
            draw_pile: self.draw_pile.clone(),
            discard_pile: self.discard_pile.clone(),
        }
    }

    pub fn set_deck(&mut self, deck: Deck) {
        self.draw_pile = deck.draw_pile;
        self.discard_pile = deck.discard_pile;
    }

    pub fn player(&self, color: Color) -> &PlayerState {
        self.players.iter().find(|p| p.color == color).expect("every color has a player")
    }

    pub fn player_mut(&mut self, color: Color) -> &mut PlayerState {
        self.players
            .iter_mut()
            .find(|p| p.color == color)
            .expect("every color has a player")
    }

    pub fn seat_of(&self, color: Color) -> usize {
        self.players.iter().position(|p| p.color == color).expect("every color has a player")
    }

    /// Total cards across hands, draw, discard, and the active card.
    /// Invariant target: always 110.
    pub fn card_count(&self) -> usize {
        self.draw_pile.len()
            + self.discard_pile.len()
            + self.players.iter().map(|p| p.hand.len()).sum::<usize>()
            + usize::from(self.active_card.is_some())
    }

    /// `phase = FINISHED` iff both members of some team have all four
    /// marbles in that color's endzone.
    pub fn team_has_won(&self, color: Color) -> bool {
        self.player(color).all_marbles_finished() && self.player(color.partner()).all_marbles_finished()
    }
}
