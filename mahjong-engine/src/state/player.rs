use serde::Serialize;

use crate::errors::{EngineError, EngineResult};
use crate::tile::Tile;
use crate::types::{Meld, MeldKind, SeatKind, TileCounts};

/// Insert `tile` into a sorted hand, maintaining sort order.
#[inline]
fn sorted_insert(hand: &mut Vec<Tile>, tile: Tile) {
    let pos = hand.partition_point(|&t| t < tile);
    hand.insert(pos, tile);
}

/// One seat's tiles and score.
///
/// The meld operations only check their own preconditions; whether the
/// seat was entitled to the action is the resolver's job. A failed
/// precondition leaves the hand untouched and reports an invariant
/// violation, because a correct resolver never gets there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerState {
    pub seat: u8,
    pub kind: SeatKind,
    /// Concealed tiles, kept sorted.
    pub hand: Vec<Tile>,
    /// Formed melds in formation order.
    pub melds: Vec<Meld>,
    /// Discards still lying in front of this seat (claimed ones leave).
    pub discards: Vec<Tile>,
    pub score: i32,
}

impl PlayerState {
    pub fn new(seat: u8, kind: SeatKind, score: i32) -> Self {
        Self {
            seat,
            kind,
            hand: Vec::with_capacity(14),
            melds: Vec::with_capacity(4),
            discards: Vec::new(),
            score,
        }
    }

    pub fn is_human(&self) -> bool {
        self.kind == SeatKind::Human
    }

    pub fn count(&self, tile: Tile) -> usize {
        self.hand.iter().filter(|&&t| t == tile).count()
    }

    pub fn hand_counts(&self) -> TileCounts {
        TileCounts::from_tiles(&self.hand)
    }

    /// Adds a drawn or claimed tile to the concealed hand.
    pub fn receive(&mut self, tile: Tile) {
        sorted_insert(&mut self.hand, tile);
    }

    /// Removes one copy of `tile`. Returns false when it is not held.
    pub fn remove_tile(&mut self, tile: Tile) -> bool {
        match self.hand.binary_search(&tile) {
            Ok(idx) => {
                self.hand.remove(idx);
                true
            }
            Err(_) => false,
        }
    }

    /// Tiles this seat physically holds: hand, melds and discards.
    pub fn tile_total(&self) -> usize {
        self.hand.len()
            + self.melds.iter().map(Meld::tile_count).sum::<usize>()
            + self.discards.len()
    }

    /// Hand length with every meld counted as three tiles. 13 while
    /// waiting, 14 right after a draw or a claim.
    pub fn effective_hand_len(&self) -> usize {
        self.hand.len() + 3 * self.melds.len()
    }

    fn take_copies(&mut self, tile: Tile, n: usize, exact: bool) -> EngineResult<()> {
        let held = self.count(tile);
        if held < n || (exact && held != n) {
            return Err(EngineError::invariant(format!(
                "seat {} holds {held} of {tile}, needs {}{n}",
                self.seat,
                if exact { "exactly " } else { "" },
            )));
        }
        let start = self.hand.partition_point(|&t| t < tile);
        self.hand.drain(start..start + n);
        Ok(())
    }

    /// Two held copies plus the claimed discard become a triplet.
    pub fn claim_triplet(&mut self, tile: Tile, from: u8) -> EngineResult<()> {
        self.take_copies(tile, 2, false)?;
        self.melds.push(Meld::new(MeldKind::Triplet, tile, Some(from)));
        Ok(())
    }

    /// Three held copies plus the claimed discard become an exposed quad.
    pub fn claim_quad_exposed(&mut self, tile: Tile, from: u8) -> EngineResult<()> {
        self.take_copies(tile, 3, false)?;
        self.melds.push(Meld::new(MeldKind::ExposedQuad, tile, Some(from)));
        Ok(())
    }

    /// All four copies, held concealed, become a concealed quad.
    pub fn form_quad_concealed(&mut self, tile: Tile) -> EngineResult<()> {
        self.take_copies(tile, 4, true)?;
        self.melds.push(Meld::new(MeldKind::ConcealedQuad, tile, None));
        Ok(())
    }

    /// Moves the held fourth copy onto the matching claimed triplet.
    pub fn upgrade_triplet_to_quad(&mut self, tile: Tile) -> EngineResult<()> {
        let idx = self
            .melds
            .iter()
            .position(|m| m.kind == MeldKind::Triplet && m.tile == tile)
            .ok_or_else(|| {
                EngineError::invariant(format!(
                    "seat {} has no claimed triplet of {tile}",
                    self.seat
                ))
            })?;
        self.take_copies(tile, 1, false)?;
        self.melds[idx].kind = MeldKind::UpgradedQuad;
        Ok(())
    }

    /// Values that could be upgraded: claimed triplets whose fourth copy is held.
    pub fn upgradable_triplets(&self) -> impl Iterator<Item = Tile> + '_ {
        self.melds
            .iter()
            .filter(|m| m.kind == MeldKind::Triplet)
            .map(|m| m.tile)
            .filter(|&t| self.count(t) >= 1)
    }
}
