//! Board geometry: the 64-cell ring, the four kennels, and the four endzones.
//!
//! Positions are plain `u8` cells in `0..96`, partitioned into ring, kennel,
//! and endzone ranges by number rather than a sentinel "off-board" value.

use serde::{Deserialize, Serialize};

/// One of the four colors / seats.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Blue,
    Green,
    Red,
    Yellow,
}

pub const ALL_COLORS: [Color; 4] = [Color::Blue, Color::Green, Color::Red, Color::Yellow];

impl Color {
    /// Fixed team pairing: Blue <-> Green, Red <-> Yellow.
    pub fn partner(self) -> Color {
        match self {
            Color::Blue => Color::Green,
            Color::Green => Color::Blue,
            Color::Red => Color::Yellow,
            Color::Yellow => Color::Red,
        }
    }

    /// The ring cell a marble occupies the moment it leaves the kennel.
    pub fn start_cell(self) -> u8 {
        match self {
            Color::Blue => 0,
            Color::Green => 16,
            Color::Red => 32,
            Color::Yellow => 48,
        }
    }

    /// The four kennel cells for this color, in ascending (capture-priority) order.
    pub fn kennel(self) -> [u8; 4] {
        match self {
            Color::Blue => [64, 65, 66, 67],
            Color::Green => [72, 73, 74, 75],
            Color::Red => [80, 81, 82, 83],
            Color::Yellow => [88, 89, 90, 91],
        }
    }

    /// The four endzone cells for this color, ordered from shallowest to deepest.
    pub fn endzone(self) -> [u8; 4] {
        match self {
            Color::Blue => [68, 69, 70, 71],
            Color::Green => [76, 77, 78, 79],
            Color::Red => [84, 85, 86, 87],
            Color::Yellow => [92, 93, 94, 95],
        }
    }

    /// Which color owns `cell`'s kennel, if `cell` is a kennel cell.
    pub fn kennel_owner(cell: u8) -> Option<Color> {
        ALL_COLORS.into_iter().find(|&c| c.kennel().contains(&cell))
    }

    /// Which color owns `cell`'s endzone, if `cell` is an endzone cell.
    pub fn endzone_owner(cell: u8) -> Option<Color> {
        ALL_COLORS.into_iter().find(|&c| c.endzone().contains(&cell))
    }
}

/// True if `cell` is one of the 64 shared ring cells.
pub fn is_ring_cell(cell: u8) -> bool {
    cell < 64
}

/// Advances a ring cell forward by `steps`, wrapping modulo 64.
pub fn ring_forward(from: u8, steps: u8) -> u8 {
    debug_assert!(is_ring_cell(from));
    ((u16::from(from) + u16::from(steps)) % 64) as u8
}

/// The ring cells strictly between `from` (exclusive) and `from + steps`
/// (inclusive), in travel order. Used both for safe-cell blockade checks and
/// for split-7 traversal capture.
pub fn path_cells(from: u8, steps: u8) -> Vec<u8> {
    (1..=steps).map(|i| ring_forward(from, i)).collect()
}

/// A forward move's resolved destination: either it stays on the shared
/// ring, or part of its distance diverts it into its own endzone.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Destination {
    Ring(u8),
    Endzone(u8),
}

/// If moving `steps` forward from ring cell `from` would cross `color`'s
/// start cell, returns the number of steps remaining after crossing it
/// (i.e. how deep into the endzone those steps would reach). Returns
/// `None` if the move does not cross the start cell at all.
pub fn steps_past_start(color: Color, from: u8, steps: u8) -> Option<u8> {
    debug_assert!(is_ring_cell(from));
    let start = color.start_cell();
    let to_start = (u16::from(start) + 64 - u16::from(from)) % 64;
    let to_start = if to_start == 0 { 64 } else { to_start };
    if to_start <= u16::from(steps) {
        Some(steps - to_start as u8)
    } else {
        None
    }
}
