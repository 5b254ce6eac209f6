use rand::Rng;

use crate::errors::{EngineError, EngineResult};
use crate::tile::{Tile, COPIES_PER_TILE, NUM_TILES};
use crate::types::TileCounts;

/// Fisher-Yates shuffle over any `Rng`. One generator state, one wall.
pub fn fisher_yates_shuffle<T, R: Rng + ?Sized>(slice: &mut [T], rng: &mut R) {
    for i in (1..slice.len()).rev() {
        let j = rng.random_range(0..=i);
        slice.swap(i, j);
    }
}

/// The draw pile. Tiles leave from the end of `tiles` and never come back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wall {
    tiles: Vec<Tile>,
}

impl Wall {
    /// All 136 tiles; draws come out highest tile first.
    pub fn sorted() -> Self {
        let tiles = Tile::all()
            .flat_map(|t| std::iter::repeat_n(t, COPIES_PER_TILE))
            .collect();
        Self { tiles }
    }

    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut wall = Self::sorted();
        fisher_yates_shuffle(&mut wall.tiles, rng);
        wall
    }

    /// A wall whose draw order is exactly `draw_order` (first element is
    /// drawn first). No completeness check; see [`Wall::stacked`].
    pub fn from_draw_order(mut draw_order: Vec<Tile>) -> Self {
        draw_order.reverse();
        Self { tiles: draw_order }
    }

    /// A complete 136-tile wall that deals `hands[0]`..`hands[3]` (13 tiles
    /// each, dealt seat by seat) and then yields `draws` in order. Every tile
    /// not mentioned follows in tile order.
    pub fn stacked(hands: [&[Tile]; 4], draws: &[Tile]) -> EngineResult<Self> {
        let mut used = TileCounts::new();
        let mut order = Vec::with_capacity(NUM_TILES);
        for (seat, hand) in hands.iter().enumerate() {
            if hand.len() != 13 {
                return Err(EngineError::config(format!(
                    "seat {seat} hand has {} tiles, expected 13",
                    hand.len()
                )));
            }
            order.extend_from_slice(hand);
        }
        order.extend_from_slice(draws);
        for &t in &order {
            used.add(t);
            if used.count(t) as usize > COPIES_PER_TILE {
                return Err(EngineError::config(format!(
                    "more than {COPIES_PER_TILE} copies of {t} in stacked wall"
                )));
            }
        }
        for t in Tile::all() {
            let rest = COPIES_PER_TILE - used.count(t) as usize;
            order.extend(std::iter::repeat_n(t, rest));
        }
        Ok(Self::from_draw_order(order))
    }

    /// Removes and returns the next tile, or `None` once the wall is
    /// exhausted. Exhaustion ends the game; it is not an error.
    pub fn draw(&mut self) -> Option<Tile> {
        self.tiles.pop()
    }

    pub fn remaining(&self) -> usize {
        self.tiles.len()
    }

    pub fn counts(&self) -> TileCounts {
        TileCounts::from_tiles(&self.tiles)
    }
}
