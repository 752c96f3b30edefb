//! Cards and the draw/discard deck.
//!
//! `Suit` and `Rank` are tagged variants rather than bare strings, so the
//! move generator dispatches on the variant instead of string comparison.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Suit {
    #[serde(rename = "♠")]
    Spades,
    #[serde(rename = "♥")]
    Hearts,
    #[serde(rename = "♦")]
    Diamonds,
    #[serde(rename = "♣")]
    Clubs,
    /// Jokers carry no suit.
    #[serde(rename = "")]
    None,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rank {
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "5")]
    Five,
    #[serde(rename = "6")]
    Six,
    #[serde(rename = "7")]
    Seven,
    #[serde(rename = "8")]
    Eight,
    #[serde(rename = "9")]
    Nine,
    #[serde(rename = "10")]
    Ten,
    #[serde(rename = "J")]
    Jack,
    #[serde(rename = "Q")]
    Queen,
    #[serde(rename = "K")]
    King,
    #[serde(rename = "A")]
    Ace,
    #[serde(rename = "JKR")]
    Joker,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub suit: Suit,
    pub rank: Rank,
}

impl Card {
    pub const fn new(suit: Suit, rank: Rank) -> Self {
        Self { suit, rank }
    }

    /// Whether this card can move a marble out of its kennel onto the start cell.
    pub fn is_unlock(self) -> bool {
        matches!(self.rank, Rank::King | Rank::Ace | Rank::Joker)
    }

    /// The forward step counts this card can apply to a single ring/endzone
    /// marble move; `7` and `A` both offer more than one option, `7`'s
    /// budget is instead consumed incrementally (see `engine::seven_split_actions`).
    pub fn step_options(self) -> &'static [u8] {
        match self.rank {
            Rank::Two => &[2],
            Rank::Three => &[3],
            Rank::Four => &[4],
            Rank::Five => &[5],
            Rank::Six => &[6],
            Rank::Eight => &[8],
            Rank::Nine => &[9],
            Rank::Ten => &[10],
            Rank::Queen => &[12],
            Rank::King => &[13],
            Rank::Ace => &[1, 11],
            Rank::Seven | Rank::Jack | Rank::Joker => &[],
        }
    }
}

/// The four real suits, excluding the Joker's `Suit::None`.
pub const SUITS: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs];

/// Every rank a Joker can be nominated as: all ranks but itself.
pub const NOMINATION_RANKS: [Rank; 13] = [
    Rank::Two,
    Rank::Three,
    Rank::Four,
    Rank::Five,
    Rank::Six,
    Rank::Seven,
    Rank::Eight,
    Rank::Nine,
    Rank::Ten,
    Rank::Jack,
    Rank::Queen,
    Rank::King,
    Rank::Ace,
];

/// Builds the literal 110-card composition: two copies of
/// (4 suits x {2..10,J,Q,K,A}) plus three jokers each.
fn full_composition() -> Vec<Card> {
    let mut half: Vec<Card> = Vec::with_capacity(55);
    for suit in SUITS {
        for rank in NOMINATION_RANKS {
            half.push(Card::new(suit, rank));
        }
    }
    for _ in 0..3 {
        half.push(Card::new(Suit::None, Rank::Joker));
    }
    debug_assert_eq!(half.len(), 55);
    let mut full = half.clone();
    full.extend(half);
    full
}

/// The draw and discard piles. Owned exclusively by the engine.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Deck {
    pub draw_pile: Vec<Card>,
    pub discard_pile: Vec<Card>,
}

impl Deck {
    /// Builds a freshly shuffled 110-card deck.
    pub fn new(rng: &mut impl Rng) -> Self {
        let mut draw_pile = full_composition();
        draw_pile.shuffle(rng);
        Self {
            draw_pile,
            discard_pile: Vec::new(),
        }
    }

    pub fn total_cards(&self, hands: impl Iterator<Item = usize>, active_card: bool) -> usize {
        self.draw_pile.len()
            + self.discard_pile.len()
            + hands.sum::<usize>()
            + usize::from(active_card)
    }

    /// Draws `n` cards from the tail of the draw pile, reshuffling the
    /// discard pile into the draw pile first if that would underflow.
    pub fn draw(&mut self, n: usize, rng: &mut impl Rng) -> Result<Vec<Card>, crate::util::EngineError> {
        if self.draw_pile.len() < n {
            self.reshuffle(rng)?;
        }
        if self.draw_pile.len() < n {
            return Err(crate::util::EngineError::DeckExhausted);
        }
        let split_at = self.draw_pile.len() - n;
        Ok(self.draw_pile.split_off(split_at))
    }

    /// Moves the discard pile back into the draw pile and shuffles it.
    fn reshuffle(&mut self, rng: &mut impl Rng) -> Result<(), crate::util::EngineError> {
        if self.discard_pile.is_empty() {
            return Err(crate::util::EngineError::DeckExhausted);
        }
        log::warn!(
            "reshuffling {} discarded cards back into the draw pile",
            self.discard_pile.len()
        );
        self.draw_pile.append(&mut self.discard_pile);
        self.draw_pile.shuffle(rng);
        Ok(())
    }

    pub fn discard(&mut self, card: Card) {
        self.discard_pile.push(card);
    }
}
