//! The action applier and round controller: the state-transition half of
//! the engine, plus the public `Engine` contract wrapping state and RNG
//! in one owner, keeping the pure state separate from the RNG-consuming
//! agent that drives it.

use rand::Rng;

use crate::board::{self, Color};
use crate::card::{Card, Deck, Rank};
use crate::moves;
use crate::state::{Action, GamePhase, GameState, Marble, PlayerState};
use crate::util::{mask_hand, EngineError};

/// Owns the canonical state plus the injected RNG, the one piece of
/// shared, non-serializable state.
pub struct Engine<R: Rng> {
    state: GameState,
    rng: R,
}

impl<R: Rng> Engine<R> {
    /// Shuffles a fresh deck, deals 6 cards to each seat, picks a starter,
    /// and enters `RUNNING` at round 1.
    pub fn new_game(mut rng: R) -> Self {
        let mut deck = Deck::new(&mut rng);
        let starter_seat = rng.gen_range(0..4);
        let mut players = board::ALL_COLORS.map(PlayerState::new);
        for player in &mut players {
            player.hand = deck
                .draw(6, &mut rng)
                .expect("a freshly shuffled 110-card deck always has 24 cards to deal");
        }
        let state = GameState {
            phase: GamePhase::Running,
            round_no: 1,
            cards_exchanged: false,
            starter_seat,
            active_seat: starter_seat,
            players,
            draw_pile: deck.draw_pile,
            discard_pile: deck.discard_pile,
            active_card: None,
            seven_remaining: 0,
            pre_seven_snapshot: None,
            exchange_count: 0,
        };
        log::debug!("new game: starter seat {starter_seat}");
        Self { state, rng }
    }

    pub fn get_state(&self) -> &GameState {
        &self.state
    }

    pub fn set_state(&mut self, state: GameState) {
        self.state = state;
    }

    /// A read-only view with every other seat's hand replaced by
    /// same-length placeholders.
    pub fn player_view(&self, seat: usize) -> GameState {
        let mut view = self.state.clone();
        for (idx, player) in view.players.iter_mut().enumerate() {
            if idx != seat {
                player.hand = mask_hand(&player.hand);
            }
        }
        view
    }

    pub fn list_actions(&self) -> Vec<Action> {
        moves::list_actions(&self.state)
    }

    /// Validates `action` against `list_actions()`, applies it, and advances
    /// turn/round state. `None` means "pass": a split-7 cancel if one is in
    /// progress, otherwise a fold.
    pub fn apply_action(&mut self, action: Option<Action>) -> Result<(), EngineError> {
        apply_action(&mut self.state, &mut self.rng, action)
    }
}

/// Free-function core of `Engine::apply_action`, split out so tests can
/// drive it directly against a hand-built `GameState`.
pub fn apply_action(state: &mut GameState, rng: &mut impl Rng, action: Option<Action>) -> Result<(), EngineError> {
    if !state.cards_exchanged {
        let a = action.ok_or(EngineError::InvalidAction)?;
        if !moves::list_actions(state).contains(&a) {
            return Err(EngineError::InvalidAction);
        }
        apply_exchange_pass(state, a);
        return Ok(());
    }

    match action {
        Some(a) => {
            if !moves::list_actions(state).contains(&a) {
                return Err(EngineError::InvalidAction);
            }
            apply_legal_card_action(state, rng, a)?;
        }
        None => {
            let mid_seven = matches!(state.active_card, Some(c) if c.rank == Rank::Seven) && state.seven_remaining > 0;
            if !mid_seven && !moves::list_actions(state).is_empty() {
                return Err(EngineError::InvalidAction);
            }
            apply_null_action(state, rng)?;
        }
    }

    update_terminal_phase(state);
    Ok(())
}

fn mover_color(state: &GameState) -> Color {
    let owner = &state.players[state.active_seat];
    if owner.all_marbles_finished() {
        owner.color.partner()
    } else {
        owner.color
    }
}

fn apply_legal_card_action(state: &mut GameState, rng: &mut impl Rng, a: Action) -> Result<(), EngineError> {
    if let Some(swap) = a.card_swap {
        let card = a.card.expect("a nomination always carries the Joker card played");
        apply_joker_nomination(state, card, swap);
        return Ok(());
    }

    let card = a.card.expect("non-pass legal actions always carry a card");
    if card.rank == Rank::Seven {
        return apply_seven_submove(state, rng, a, card);
    }

    // A nominated substitute was never actually drawn: its physical Joker
    // was already discarded at nomination time, so this resolving action
    // only clears the pending substitution rather than discarding again.
    let resolving_nomination = state.active_card == Some(card);
    apply_single_card_action(state, a, card)?;
    if resolving_nomination {
        state.active_card = None;
    } else {
        discard_from_active_hand(state, card);
    }
    advance_turn(state, rng)
}

fn apply_single_card_action(state: &mut GameState, a: Action, card: Card) -> Result<(), EngineError> {
    let color = mover_color(state);
    if card.rank == Rank::Jack {
        apply_jack_swap(state, a);
        return Ok(());
    }

    let from = a.pos_from.expect("a move action always carries pos_from");
    let to = a.pos_to.expect("a move action always carries pos_to");
    if card.is_unlock() && color.kennel().contains(&from) {
        apply_unlock(state, color, from, to)
    } else {
        apply_ring_or_endzone_move(state, color, from, to)
    }
}

fn apply_unlock(state: &mut GameState, color: Color, from: u8, to: u8) -> Result<(), EngineError> {
    capture_any_at(state, to);
    set_marble(state, color, from, to, true)
}

fn apply_ring_or_endzone_move(state: &mut GameState, color: Color, from: u8, to: u8) -> Result<(), EngineError> {
    if board::is_ring_cell(to) {
        capture_any_at(state, to);
        set_marble(state, color, from, to, false)
    } else {
        set_marble(state, color, from, to, true)
    }
}

fn apply_jack_swap(state: &mut GameState, a: Action) {
    let from = a.pos_from.expect("a swap action always carries pos_from");
    let to = a.pos_to.expect("a swap action always carries pos_to");
    let from_color = occupant_color(state, from).expect("generator guarantees a marble at pos_from");
    let to_color = occupant_color(state, to).expect("generator guarantees a marble at pos_to");
    let from_idx = state.player(from_color).marbles.iter().position(|m| m.pos == from).unwrap();
    let to_idx = state.player(to_color).marbles.iter().position(|m| m.pos == to).unwrap();
    state.player_mut(from_color).marbles[from_idx].pos = to;
    state.player_mut(to_color).marbles[to_idx].pos = from;
}

fn apply_seven_submove(state: &mut GameState, rng: &mut impl Rng, a: Action, card: Card) -> Result<(), EngineError> {
    if state.seven_remaining == 0 {
        state.pre_seven_snapshot = Some(Box::new(state.clone()));
        state.active_card = Some(card);
        state.seven_remaining = 7;
    }

    let color = mover_color(state);
    let from = a.pos_from.expect("a 7-submove always carries pos_from");
    let to = a.pos_to.expect("a 7-submove always carries pos_to");

    let steps = if board::is_ring_cell(from) {
        if board::is_ring_cell(to) {
            let steps = ((u16::from(to) + 64 - u16::from(from)) % 64) as u8;
            for cell in board::path_cells(from, steps) {
                capture_any_at(state, cell);
            }
            set_marble(state, color, from, to, false)?;
            steps
        } else {
            let index = color.endzone().iter().position(|&c| c == to).expect("to is one of color's endzone cells") as u8;
            let start = color.start_cell();
            let raw = (u16::from(start) + 64 - u16::from(from)) % 64;
            let to_start = if raw == 0 { 64 } else { raw } as u8;
            for cell in board::path_cells(from, to_start) {
                capture_any_at(state, cell);
            }
            set_marble(state, color, from, to, true)?;
            to_start + index + 1
        }
    } else {
        set_marble(state, color, from, to, true)?;
        to - from
    };

    state.seven_remaining = state.seven_remaining.saturating_sub(steps);
    if state.seven_remaining == 0 {
        discard_from_active_hand(state, card);
        state.active_card = None;
        state.pre_seven_snapshot = None;
        advance_turn(state, rng)?;
    }
    Ok(())
}

fn apply_joker_nomination(state: &mut GameState, joker: Card, substitute: Card) {
    discard_from_active_hand(state, joker);
    state.active_card = Some(substitute);
}

fn apply_null_action(state: &mut GameState, rng: &mut impl Rng) -> Result<(), EngineError> {
    let mid_seven = matches!(state.active_card, Some(c) if c.rank == Rank::Seven) && state.seven_remaining > 0;
    if mid_seven {
        if let Some(snapshot) = state.pre_seven_snapshot.take() {
            *state = *snapshot;
        }
        return Ok(());
    }

    let seat = state.active_seat;
    if state.round_no == 6 && state.players[seat].hand.len() == 6 {
        return Err(EngineError::InvalidAction);
    }
    log::warn!("seat {seat} folds with {} cards", state.players[seat].hand.len());
    let folded: Vec<Card> = state.players[seat].hand.drain(..).collect();
    state.discard_pile.extend(folded);
    advance_turn(state, rng)
}

fn apply_exchange_pass(state: &mut GameState, a: Action) {
    let card = a.card.expect("an exchange action always carries a card");
    let seat = state.active_seat;
    let partner_seat = state.seat_of(state.players[seat].color.partner());
    discard_from_hand(&mut state.players[seat].hand, card);
    state.players[partner_seat].hand.push(card);
    state.exchange_count += 1;
    if state.exchange_count == 4 {
        state.cards_exchanged = true;
        state.exchange_count = 0;
    }
    state.active_seat = (state.active_seat + 1) % 4;
}

fn advance_turn(state: &mut GameState, rng: &mut impl Rng) -> Result<(), EngineError> {
    state.active_seat = (state.active_seat + 1) % 4;
    if state.active_seat == state.starter_seat {
        end_round(state, rng)?;
    }
    Ok(())
}

fn end_round(state: &mut GameState, rng: &mut impl Rng) -> Result<(), EngineError> {
    state.round_no += 1;
    state.starter_seat = (state.starter_seat + 1) % 4;
    state.active_seat = (state.starter_seat + 1) % 4;
    state.cards_exchanged = false;
    state.exchange_count = 0;
    log::debug!("round {} begins, starter seat {}", state.round_no, state.starter_seat);
    deal_round(state, rng)
}

fn deal_round(state: &mut GameState, rng: &mut impl Rng) -> Result<(), EngineError> {
    let num_cards = 6 - ((state.round_no as usize - 1) % 5);
    let mut deck = state.deck();
    for player in &mut state.players {
        player.hand = deck.draw(num_cards, rng)?;
    }
    state.set_deck(deck);
    Ok(())
}

fn update_terminal_phase(state: &mut GameState) {
    if state.team_has_won(Color::Blue) || state.team_has_won(Color::Red) {
        state.phase = GamePhase::Finished;
    }
}

fn occupant_color(state: &GameState, cell: u8) -> Option<Color> {
    state.players.iter().find(|p| p.marbles.iter().any(|m| m.pos == cell)).map(|p| p.color)
}

/// Sends whatever marble sits at `cell`, if any, to the lowest-indexed
/// empty cell of its own kennel.
fn capture_any_at(state: &mut GameState, cell: u8) {
    let Some(color) = occupant_color(state, cell) else { return };
    let dest = color
        .kennel()
        .into_iter()
        .find(|&c| occupant_color(state, c).is_none())
        .expect("a kennel never holds more than the 4 marbles that start there");
    log::debug!("{color:?} marble at {cell} captured to {dest}");
    let idx = state.player(color).marbles.iter().position(|m| m.pos == cell).unwrap();
    let marble = &mut state.player_mut(color).marbles[idx];
    marble.pos = dest;
    marble.is_safe = false;
}

/// Moves `color`'s marble at `from` to `to`. The move generator only ever
/// offers moves for marbles that exist, so a missing marble here means the
/// action was applied against a state it was never validated against.
fn set_marble(state: &mut GameState, color: Color, from: u8, to: u8, is_safe: bool) -> Result<(), EngineError> {
    let Some(idx) = state.player(color).marbles.iter().position(|m| m.pos == from) else {
        log::error!("{color:?} has no marble at {from} to move to {to}");
        return Err(EngineError::InternalInconsistency);
    };
    state.player_mut(color).marbles[idx] = Marble { pos: to, is_safe };
    Ok(())
}

fn discard_from_active_hand(state: &mut GameState, card: Card) {
    let seat = state.active_seat;
    discard_from_hand(&mut state.players[seat].hand, card);
    state.discard_pile.push(card);
}

/// Removes one copy of `card` from `hand` if present. A no-op for a
/// Joker-nominated substitute, which was never actually in the hand.
fn discard_from_hand(hand: &mut Vec<Card>, card: Card) {
    if let Some(idx) = hand.iter().position(|&c| c == card) {
        hand.remove(idx);
    }
}
