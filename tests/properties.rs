//! Integration tests against the public contract: the six concrete
//! scenarios and the quantified/boundary properties of the rules above.

use dog_engine::board::Color;
use dog_engine::card::{Card, Rank, Suit};
use dog_engine::state::{Action, GamePhase, GameState, Marble, PlayerState};
use dog_engine::Engine;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn blank_running_state() -> GameState {
    GameState {
        phase: GamePhase::Running,
        round_no: 1,
        cards_exchanged: true,
        starter_seat: 0,
        active_seat: 0,
        players: dog_engine::board::ALL_COLORS.map(PlayerState::new),
        draw_pile: Vec::new(),
        discard_pile: vec![Card::new(Suit::Spades, Rank::Two)],
        active_card: None,
        seven_remaining: 0,
        pre_seven_snapshot: None,
        exchange_count: 0,
    }
}

fn rng() -> StdRng {
    StdRng::seed_from_u64(2024)
}

// Scenario 1: Unlock with K.
#[test]
fn unlock_with_king() {
    let mut engine = Engine::new_game(rng());
    let king = Card::new(Suit::Spades, Rank::King);
    let mut state = blank_running_state();
    state.players[0].hand = vec![king];
    engine.set_state(state);

    assert!(engine.list_actions().contains(&Action::mv(king, 64, 0)));
    engine.apply_action(Some(Action::mv(king, 64, 0))).unwrap();

    let blue = engine.get_state().player(Color::Blue);
    assert!(blue.marbles.iter().any(|m| m.pos == 0 && m.is_safe));
    assert_eq!(engine.get_state().draw_pile.len(), 0);
    assert!(engine.get_state().discard_pile.contains(&king));
}

// Scenario 2: Ace dual step.
#[test]
fn ace_dual_step() {
    let mut engine = Engine::new_game(rng());
    let ace = Card::new(Suit::Hearts, Rank::Ace);
    let mut state = blank_running_state();
    state.active_seat = 2;
    state.players[2].marbles[0] = Marble { pos: 32, is_safe: false };
    state.players[2].hand = vec![ace];
    engine.set_state(state);

    let actions = engine.list_actions();
    assert!(actions.contains(&Action::mv(ace, 32, 33)));
    assert!(actions.contains(&Action::mv(ace, 32, 43)));
    assert!(!actions.contains(&Action::mv(ace, 32, 32)));

    engine.apply_action(Some(Action::mv(ace, 32, 43))).unwrap();
    let red = engine.get_state().player(Color::Red);
    assert!(red.marbles.iter().any(|m| m.pos == 43 && !m.is_safe));
}

// Scenario 3: Jack swap.
#[test]
fn jack_swap() {
    let mut engine = Engine::new_game(rng());
    let jack = Card::new(Suit::Clubs, Rank::Jack);
    let mut state = blank_running_state();
    state.players[0].marbles[0] = Marble { pos: 5, is_safe: false };
    state.players[2].marbles[0] = Marble { pos: 40, is_safe: false };
    state.players[0].hand = vec![jack];
    engine.set_state(state);

    engine.apply_action(Some(Action::mv(jack, 5, 40))).unwrap();

    let state = engine.get_state();
    assert!(state.player(Color::Blue).marbles.iter().any(|m| m.pos == 40 && !m.is_safe));
    assert!(state.player(Color::Red).marbles.iter().any(|m| m.pos == 5 && !m.is_safe));
}

// Scenario 4: Capture on landing.
#[test]
fn capture_on_landing() {
    let mut engine = Engine::new_game(rng());
    let three = Card::new(Suit::Diamonds, Rank::Three);
    let mut state = blank_running_state();
    state.active_seat = 1;
    state.players[1].marbles[0] = Marble { pos: 17, is_safe: false };
    state.players[3].marbles[0] = Marble { pos: 20, is_safe: false };
    state.players[1].hand = vec![three];
    engine.set_state(state);

    engine.apply_action(Some(Action::mv(three, 17, 20))).unwrap();

    let state = engine.get_state();
    assert!(state.player(Color::Green).marbles.iter().any(|m| m.pos == 20));
    assert!(state.player(Color::Yellow).marbles.iter().any(|m| m.pos == 88 && !m.is_safe));
}

// Scenario 5: Split-7 overrun captures every traversed marble.
#[test]
fn split_seven_overrun() {
    let mut engine = Engine::new_game(rng());
    let seven = Card::new(Suit::Spades, Rank::Seven);
    let mut state = blank_running_state();
    state.players[0].marbles[0] = Marble { pos: 0, is_safe: false };
    state.players[1].marbles[0] = Marble { pos: 3, is_safe: false };
    state.players[2].marbles[0] = Marble { pos: 5, is_safe: false };
    state.players[0].hand = vec![seven];
    engine.set_state(state);

    engine.apply_action(Some(Action::mv(seven, 0, 7))).unwrap();

    let state = engine.get_state();
    assert!(state.player(Color::Blue).marbles.iter().any(|m| m.pos == 7));
    assert!(state.player(Color::Green).marbles.iter().any(|m| m.pos == 72));
    assert!(state.player(Color::Red).marbles.iter().any(|m| m.pos == 80));
    assert_eq!(state.seven_remaining, 0);
    assert_eq!(state.active_card, None);
}

// Scenario 6: End-of-round rotation.
#[test]
fn end_of_round_rotation() {
    let mut engine = Engine::new_game(rng());
    let king = Card::new(Suit::Spades, Rank::King);
    let mut state = blank_running_state();
    state.round_no = 1;
    state.starter_seat = 2;
    state.active_seat = 1;
    state.players[1].hand = vec![king];
    engine.set_state(state);

    engine.apply_action(Some(Action::mv(king, 72, 16))).unwrap();

    let state = engine.get_state();
    assert_eq!(state.round_no, 2);
    assert_eq!(state.starter_seat, 3);
    assert_eq!(state.active_seat, 0);
    assert!(!state.cards_exchanged);
    assert!(state.players.iter().all(|p| p.hand.len() == 5));
}

// Boundary: a saved marble on the start cell blocks every color, including
// moves that would only pass over (not land on) it.
#[test]
fn start_cell_blockade_stops_every_color() {
    let mut engine = Engine::new_game(rng());
    let five = Card::new(Suit::Hearts, Rank::Five);
    let mut state = blank_running_state();
    state.active_seat = 2;
    state.players[0].marbles[0] = Marble { pos: 0, is_safe: true };
    state.players[2].marbles[0] = Marble { pos: 60, is_safe: false };
    state.players[2].hand = vec![five];
    engine.set_state(state);

    assert!(engine.list_actions().is_empty());
}

// Boundary: round 6 with a full 6-card hand cannot fold.
#[test]
fn round_six_with_six_cards_cannot_fold() {
    let mut engine = Engine::new_game(rng());
    let mut state = blank_running_state();
    state.round_no = 6;
    // An unreachable card (a 7 already consumed elsewhere) keeps the hand
    // at 6 cards with no legal moves for any of them: every marble is
    // still in its kennel and the hand holds no unlock card.
    state.players[0].hand = vec![Card::new(Suit::Hearts, Rank::Two); 6];
    engine.set_state(state);

    assert!(engine.list_actions().is_empty());
    assert_eq!(engine.apply_action(None), Err(dog_engine::util::EngineError::InvalidAction));
}

// All-four-finished: generator switches to partner-marble actions.
#[test]
fn all_four_finished_plays_partners_marbles() {
    let mut engine = Engine::new_game(rng());
    let two = Card::new(Suit::Hearts, Rank::Two);
    let mut state = blank_running_state();
    for marble in &mut state.players[0].marbles {
        *marble = Marble { pos: Color::Blue.endzone()[0], is_safe: true };
    }
    state.players[1].marbles[0] = Marble { pos: 20, is_safe: false };
    state.players[0].hand = vec![two];
    engine.set_state(state);

    let actions = engine.list_actions();
    assert!(!actions.is_empty());
    assert!(actions.iter().all(|a| a.pos_from == Some(20)));

    engine.apply_action(Some(Action::mv(two, 20, 22))).unwrap();
    assert!(engine.get_state().player(Color::Green).marbles.iter().any(|m| m.pos == 22));
    assert!(engine.get_state().players[0].hand.is_empty());
}

// Card conservation + legality closure, exercised across a full random game.
#[test]
fn card_conservation_and_legality_closure_hold_across_a_random_game() {
    let mut engine = Engine::new_game(StdRng::seed_from_u64(11));
    let mut agent_rng = StdRng::seed_from_u64(12);
    use dog_engine::player::RandomAgent;
    let agent = RandomAgent;

    for _ in 0..500 {
        if engine.get_state().phase == GamePhase::Finished {
            break;
        }
        assert_eq!(engine.get_state().card_count(), 110);
        let legal = engine.list_actions();
        let chosen = agent.select_action(&legal, &mut agent_rng);
        if let Some(a) = chosen {
            assert!(legal.contains(&a));
        }
        engine.apply_action(chosen).expect("a null or list_actions()-sourced action is always legal");
    }
    assert_eq!(engine.get_state().card_count(), 110);
}

// Determinism: replaying the same seed from the same `set_state` snapshot
// reproduces the same resulting state.
#[test]
fn deterministic_with_fixed_seed() {
    let initial = blank_running_state();
    let two = Card::new(Suit::Hearts, Rank::Two);

    let mut run = |seed: u64| -> GameState {
        let mut engine = Engine::new_game(StdRng::seed_from_u64(seed));
        let mut state = initial.clone();
        state.players[0].marbles[0] = Marble { pos: 10, is_safe: false };
        state.players[0].hand = vec![two];
        engine.set_state(state);
        engine.apply_action(Some(Action::mv(two, 10, 12))).unwrap();
        engine.get_state().clone()
    };

    let a = run(55);
    let b = run(55);
    assert_eq!(a.players[0].marbles[0].pos, b.players[0].marbles[0].pos);
    assert_eq!(a.discard_pile, b.discard_pile);
}

// Masked view never reveals another seat's hand contents.
#[test]
fn player_view_masks_other_hands() {
    let mut engine = Engine::new_game(rng());
    let mut state = engine.get_state().clone();
    state.players[3].hand = vec![Card::new(Suit::Clubs, Rank::Queen)];
    engine.set_state(state);

    let view = engine.player_view(1);
    assert!(view.players[3].hand.iter().all(|c| c.suit == Suit::None));
    assert_eq!(view.players[1].hand, engine.get_state().players[1].hand);
}

// A nominated Joker resolves to the nominated rank's effect, then clears
// the pending-substitute flag and leaves the card count untouched.
#[test]
fn joker_nomination_resolves_and_clears_active_card() {
    let mut engine = Engine::new_game(rng());
    let joker = Card::new(Suit::None, Rank::Joker);
    let queen = Card::new(Suit::Hearts, Rank::Queen);
    let mut state = blank_running_state();
    state.players[0].marbles[0] = Marble { pos: 0, is_safe: false };
    state.players[0].hand = vec![joker];
    // Non-empty discard pile so `joker_actions` offers only nomination,
    // not the first-play direct unlock.
    state.discard_pile = vec![Card::new(Suit::Spades, Rank::Two)];
    engine.set_state(state);
    let count_before = engine.get_state().card_count();

    engine.apply_action(Some(Action::nominate(joker, queen))).unwrap();
    assert_eq!(engine.get_state().active_card, Some(queen));

    assert!(engine.list_actions().contains(&Action::mv(queen, 0, 12)));
    engine.apply_action(Some(Action::mv(queen, 0, 12))).unwrap();

    assert_eq!(engine.get_state().active_card, None);
    assert_eq!(engine.get_state().card_count(), count_before);
    assert!(engine.get_state().player(Color::Blue).marbles.iter().any(|m| m.pos == 12));
}

// Whole-`GameState` serde round trip preserves equality.
#[test]
fn game_state_serde_round_trip_preserves_equality() {
    let engine = Engine::new_game(rng());
    let state = engine.get_state().clone();
    let json = serde_json::to_string(&state).unwrap();
    let back: GameState = serde_json::from_str(&json).unwrap();
    assert_eq!(state, back);
}
