//! The move generator: per-card action enumeration.
//!
//! One small function per movement family (unlock, ring move, endzone
//! entry, intra-endzone, Jack swap, Joker), composed by a thin dispatcher
//! rather than one large branchy function. Captures are never represented
//! in an `Action` itself (the applier derives them from board occupancy at
//! apply time), so this module only answers "where could a marble legally
//! go."

use std::collections::HashSet;

use crate::board::{self, Color, Destination};
use crate::card::{Card, Rank, NOMINATION_RANKS, SUITS};
use crate::state::{Action, GameState, PlayerState};

/// Every legal action for the current actor.
///
/// Dispatches, in order: card exchange (pre-round), partner substitution
/// (all own marbles finished), a pending Joker nomination or split-7 mid
/// distribution, then ordinary per-card enumeration.
pub fn list_actions(state: &GameState) -> Vec<Action> {
    let hand_owner = &state.players[state.active_seat];

    let mover_color = if hand_owner.all_marbles_finished() {
        hand_owner.color.partner()
    } else {
        hand_owner.color
    };

    if !state.cards_exchanged {
        return hand_owner.hand.iter().map(|&c| Action::pass(c)).collect();
    }

    let mover = state.player(mover_color);

    if let Some(active_card) = state.active_card {
        let actions = if active_card.rank == Rank::Seven {
            seven_split_actions(state, mover, active_card, state.seven_remaining)
        } else {
            card_effect_actions(state, mover, active_card)
        };
        return dedup(actions);
    }

    let mut actions = Vec::new();
    for &card in &hand_owner.hand {
        if card.rank == Rank::Seven {
            actions.extend(seven_split_actions(state, mover, card, 7));
        } else {
            actions.extend(card_effect_actions(state, mover, card));
        }
    }
    dedup(actions)
}

fn dedup(actions: Vec<Action>) -> Vec<Action> {
    let mut seen = HashSet::with_capacity(actions.len());
    actions.into_iter().filter(|a| seen.insert(*a)).collect()
}

/// All non-seven actions a single card can produce: start-unlock, ring
/// move, endzone entry, intra-endzone, Jack swap, Joker nomination, in
/// that order.
fn card_effect_actions(state: &GameState, mover: &PlayerState, card: Card) -> Vec<Action> {
    match card.rank {
        Rank::Jack => jack_swap_actions(state, mover, card),
        Rank::Joker => joker_actions(state, mover, card),
        Rank::Seven => Vec::new(),
        Rank::King | Rank::Ace => {
            let mut actions = kennel_exit_actions(state, mover, card);
            actions.extend(ring_move_and_endzone_entry_actions(state, mover, card));
            actions.extend(intra_endzone_actions(state, mover, card));
            actions
        }
        _ => {
            let mut actions = ring_move_and_endzone_entry_actions(state, mover, card);
            actions.extend(intra_endzone_actions(state, mover, card));
            actions
        }
    }
}

fn occupant_color(state: &GameState, cell: u8) -> Option<Color> {
    state
        .players
        .iter()
        .find(|p| p.marbles.iter().any(|m| m.pos == cell))
        .map(|p| p.color)
}

fn is_safe_blocked(state: &GameState, cell: u8) -> bool {
    state
        .players
        .iter()
        .any(|p| p.marbles.iter().any(|m| m.pos == cell && m.is_safe))
}

/// K/A/Joker: kennel marble onto the color's start cell, blocked only by that
/// color's own marble already sitting there.
fn kennel_exit_actions(state: &GameState, mover: &PlayerState, card: Card) -> Vec<Action> {
    if !card.is_unlock() {
        return Vec::new();
    }
    let start = mover.color.start_cell();
    if mover.marbles.iter().any(|m| m.pos == start) {
        return Vec::new();
    }
    mover
        .marbles
        .iter()
        .find(|m| m.in_kennel(mover.color))
        .map(|m| vec![Action::mv(card, m.pos, start)])
        .unwrap_or_default()
}

/// Where a marble at ring cell `from` may land after moving `steps` forward,
/// without self-capture (used by every card but the split-7).
fn forward_destinations(state: &GameState, color: Color, from: u8, steps: u8) -> Vec<Destination> {
    let mut destinations = Vec::new();
    let path = board::path_cells(from, steps);

    let landing = *path.last().expect("steps >= 1");
    if path.iter().all(|&c| !is_safe_blocked(state, c)) && occupant_color(state, landing) != Some(color) {
        destinations.push(Destination::Ring(landing));
    }

    if let Some(remaining) = board::steps_past_start(color, from, steps) {
        if (1..=4).contains(&remaining) {
            let to_start = steps - remaining;
            let pre_cells = &path[..to_start as usize];
            if pre_cells.iter().all(|&c| !is_safe_blocked(state, c)) {
                let target = color.endzone()[(remaining - 1) as usize];
                if occupant_color(state, target).is_none() {
                    destinations.push(Destination::Endzone(target));
                }
            }
        }
    }

    destinations
}

fn ring_move_and_endzone_entry_actions(state: &GameState, mover: &PlayerState, card: Card) -> Vec<Action> {
    let mut actions = Vec::new();
    for m in mover.marbles.iter().filter(|m| m.on_ring()) {
        for &steps in card.step_options() {
            for dest in forward_destinations(state, mover.color, m.pos, steps) {
                let to = match dest {
                    Destination::Ring(c) | Destination::Endzone(c) => c,
                };
                actions.push(Action::mv(card, m.pos, to));
            }
        }
    }
    actions
}

/// Forward moves for marbles already resting inside their own endzone.
fn intra_endzone_actions(state: &GameState, mover: &PlayerState, card: Card) -> Vec<Action> {
    let endzone = mover.color.endzone();
    let deepest_index = (endzone.len() - 1) as u8;
    let mut actions = Vec::new();
    for m in mover.marbles.iter().filter(|m| m.in_endzone(mover.color)) {
        let index = endzone.iter().position(|&c| c == m.pos).expect("m.in_endzone checked") as u8;
        for &steps in card.step_options() {
            let target_index = index + steps;
            if target_index <= deepest_index {
                let target = endzone[target_index as usize];
                if occupant_color(state, target).is_none() {
                    actions.push(Action::mv(card, m.pos, target));
                }
            }
        }
    }
    actions
}

/// J: swap with any other marble on the ring; falls back to own-marble swaps
/// only if no opponent swap is available.
fn jack_swap_actions(state: &GameState, mover: &PlayerState, card: Card) -> Vec<Action> {
    let swappable = |p: &PlayerState| -> Vec<u8> {
        p.marbles.iter().filter(|m| m.on_ring() && !m.is_safe).map(|m| m.pos).collect()
    };
    let own: Vec<u8> = swappable(mover);
    if own.is_empty() {
        return Vec::new();
    }

    let others: Vec<u8> = state
        .players
        .iter()
        .filter(|p| p.color != mover.color)
        .flat_map(swappable)
        .collect();

    let mut actions = Vec::new();
    if !others.is_empty() {
        for &a in &own {
            for &b in &others {
                actions.push(Action::mv(card, a, b));
                actions.push(Action::mv(card, b, a));
            }
        }
    } else {
        for i in 0..own.len() {
            for j in (i + 1)..own.len() {
                actions.push(Action::mv(card, own[i], own[j]));
                actions.push(Action::mv(card, own[j], own[i]));
            }
        }
    }
    actions
}

/// Joker: direct unlock on the very first play of the game, otherwise
/// nomination as any concrete card.
fn joker_actions(state: &GameState, mover: &PlayerState, card: Card) -> Vec<Action> {
    let mut actions = Vec::new();
    if state.discard_pile.is_empty() && state.active_card.is_none() {
        actions.extend(kennel_exit_actions(state, mover, card));
    }
    for suit in SUITS {
        for rank in NOMINATION_RANKS {
            actions.push(Action::nominate(card, Card::new(suit, rank)));
        }
    }
    actions
}

/// 7: up to `remaining` forward single-steps for one marble per action,
/// consumed incrementally. Self-capture candidates
/// are excluded whenever a non-self-capturing alternative exists.
pub fn seven_split_actions(state: &GameState, mover: &PlayerState, card: Card, remaining: u8) -> Vec<Action> {
    struct Candidate {
        from: u8,
        to: u8,
        self_capture: bool,
    }

    let mut candidates = Vec::new();

    for m in mover.marbles.iter().filter(|m| m.on_ring()) {
        for steps in 1..=remaining {
            for (dest, self_capture) in seven_destinations(state, mover.color, m.pos, steps) {
                let to = match dest {
                    Destination::Ring(c) | Destination::Endzone(c) => c,
                };
                candidates.push(Candidate { from: m.pos, to, self_capture });
            }
        }
    }

    let endzone = mover.color.endzone();
    let deepest_index = (endzone.len() - 1) as u8;
    for m in mover.marbles.iter().filter(|m| m.in_endzone(mover.color)) {
        let index = endzone.iter().position(|&c| c == m.pos).expect("m.in_endzone checked") as u8;
        for steps in 1..=remaining {
            let target_index = index + steps;
            if target_index <= deepest_index {
                let target = endzone[target_index as usize];
                if occupant_color(state, target).is_none() {
                    candidates.push(Candidate { from: m.pos, to: target, self_capture: false });
                }
            }
        }
    }

    let has_clean = candidates.iter().any(|c| !c.self_capture);
    candidates
        .into_iter()
        .filter(|c| !has_clean || !c.self_capture)
        .map(|c| Action::mv(card, c.from, c.to))
        .collect()
}

/// Like `forward_destinations`, but landing on or traversing the mover's own
/// non-safe marbles is allowed (and reported via the `self_capture` flag)
/// rather than excluded outright, so an overrun can capture one's own
/// marbles too.
fn seven_destinations(state: &GameState, color: Color, from: u8, steps: u8) -> Vec<(Destination, bool)> {
    let mut out = Vec::new();
    let path = board::path_cells(from, steps);

    if path.iter().all(|&c| !is_safe_blocked(state, c)) {
        let self_capture = path.iter().any(|&c| occupant_color(state, c) == Some(color));
        out.push((Destination::Ring(*path.last().expect("steps >= 1")), self_capture));
    }

    if let Some(remaining) = board::steps_past_start(color, from, steps) {
        if (1..=4).contains(&remaining) {
            let to_start = steps - remaining;
            let pre_cells = &path[..to_start as usize];
            if pre_cells.iter().all(|&c| !is_safe_blocked(state, c)) {
                let target = color.endzone()[(remaining - 1) as usize];
                if occupant_color(state, target).is_none() {
                    let self_capture = pre_cells.iter().any(|&c| occupant_color(state, c) == Some(color));
                    out.push((Destination::Endzone(target), self_capture));
                }
            }
        }
    }

    out
}
