use serde::{Deserialize, Serialize};

use crate::tile::{Tile, NUM_TILE_TYPES};

/// A tile multiset as a histogram over the 34 tile values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCounts {
    counts: [u8; NUM_TILE_TYPES],
}

impl TileCounts {
    pub const fn new() -> Self {
        TileCounts {
            counts: [0; NUM_TILE_TYPES],
        }
    }

    pub fn from_tiles(tiles: &[Tile]) -> Self {
        let mut counts = Self::new();
        for &t in tiles {
            counts.add(t);
        }
        counts
    }

    /// Adds one copy. Counts saturate at `u8::MAX`.
    #[inline]
    pub fn add(&mut self, t: Tile) {
        let slot = &mut self.counts[t.index()];
        *slot = slot.saturating_add(1);
    }

    /// Removes one copy. Returns false (and changes nothing) when absent.
    #[inline]
    pub fn remove(&mut self, t: Tile) -> bool {
        let slot = &mut self.counts[t.index()];
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }

    #[inline]
    pub fn count(&self, t: Tile) -> u8 {
        self.counts[t.index()]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().map(|&c| c as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    /// Present values with their counts, in tile order.
    pub fn iter(&self) -> impl Iterator<Item = (Tile, u8)> + '_ {
        Tile::all()
            .zip(self.counts.iter().copied())
            .filter(|&(_, c)| c > 0)
    }

    pub(crate) fn raw_mut(&mut self) -> &mut [u8; NUM_TILE_TYPES] {
        &mut self.counts
    }
}

impl Default for TileCounts {
    fn default() -> Self {
        Self::new()
    }
}

/// How a meld was formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeldKind {
    /// Two held copies plus a claimed discard.
    Triplet,
    /// Three held copies plus a claimed discard.
    ExposedQuad,
    /// Four held copies, no claim.
    ConcealedQuad,
    /// A claimed triplet that later received its fourth copy.
    UpgradedQuad,
}

impl MeldKind {
    #[inline]
    pub const fn tile_count(self) -> usize {
        match self {
            MeldKind::Triplet => 3,
            MeldKind::ExposedQuad | MeldKind::ConcealedQuad | MeldKind::UpgradedQuad => 4,
        }
    }

    #[inline]
    pub const fn is_quad(self) -> bool {
        !matches!(self, MeldKind::Triplet)
    }

    #[inline]
    pub const fn is_concealed(self) -> bool {
        matches!(self, MeldKind::ConcealedQuad)
    }
}

/// A formed group set aside from the concealed hand. Every meld counts as
/// one set toward a winning hand regardless of its size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meld {
    pub kind: MeldKind,
    pub tile: Tile,
    /// Seat whose discard completed the meld. `None` for concealed quads.
    pub claimed_from: Option<u8>,
}

impl Meld {
    pub fn new(kind: MeldKind, tile: Tile, claimed_from: Option<u8>) -> Self {
        Self {
            kind,
            tile,
            claimed_from,
        }
    }

    #[inline]
    pub fn tile_count(&self) -> usize {
        self.kind.tile_count()
    }

    #[inline]
    pub fn is_concealed(&self) -> bool {
        self.kind.is_concealed()
    }

    pub fn tiles(&self) -> Vec<Tile> {
        vec![self.tile; self.tile_count()]
    }
}

/// Who makes decisions for a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SeatKind {
    Human,
    #[default]
    Automated,
}
