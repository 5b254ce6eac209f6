//! Winning-hand validation: four sets and one pair.
//!
//! Already formed melds count as one set each and are not part of the
//! multiset handed in; quads therefore need no special casing here.

use serde::Serialize;

use crate::tile::{Tile, NUM_SUIT_TILES};
use crate::types::TileCounts;

/// Sets (melds included) in a complete hand.
pub const SETS_PER_HAND: usize = 4;

/// One set found in the concealed part of a hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Set {
    /// Three identical tiles.
    Triplet(Tile),
    /// Three consecutive ranks of one numbered suit, identified by the lowest.
    Run(Tile),
}

/// A concealed multiset split into a pair plus sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decomposition {
    pub pair: Tile,
    pub sets: Vec<Set>,
}

/// True when `tile` can be the lowest tile of a run (numbered, rank 1-7).
#[inline]
fn can_start_run(tile: Tile) -> bool {
    matches!(tile.number(), Some(n) if n <= NUM_SUIT_TILES as u8 - 2)
}

/// True when the three tiles, in any order, form a legal run. Winds and
/// dragons never form runs.
pub fn is_run(tiles: [Tile; 3]) -> bool {
    let mut sorted = tiles;
    sorted.sort();
    can_start_run(sorted[0])
        && sorted[0].successor() == Some(sorted[1])
        && sorted[1].successor() == Some(sorted[2])
}

/// Strips `needed` sets from `counts`, always consuming the lowest remaining
/// tile first. Backtracks on failure and leaves `counts` as it found it.
fn extract_sets(counts: &mut TileCounts, needed: usize, sets: &mut Vec<Set>) -> bool {
    let Some((low, held)) = counts.iter().next() else {
        return needed == 0;
    };
    if needed == 0 {
        return false;
    }

    if held >= 3 {
        counts.raw_mut()[low.index()] -= 3;
        sets.push(Set::Triplet(low));
        if extract_sets(counts, needed - 1, sets) {
            return true;
        }
        sets.pop();
        counts.raw_mut()[low.index()] += 3;
    }

    if can_start_run(low) {
        let i = low.index();
        let raw = counts.raw_mut();
        if raw[i + 1] > 0 && raw[i + 2] > 0 {
            raw[i] -= 1;
            raw[i + 1] -= 1;
            raw[i + 2] -= 1;
            sets.push(Set::Run(low));
            if extract_sets(counts, needed - 1, sets) {
                return true;
            }
            sets.pop();
            let raw = counts.raw_mut();
            raw[i] += 1;
            raw[i + 1] += 1;
            raw[i + 2] += 1;
        }
    }

    false
}

/// Finds the first pair choice (in tile order) that lets the rest of the
/// multiset split into `4 - existing_melds` sets.
pub fn decompose(counts: &TileCounts, existing_melds: usize) -> Option<Decomposition> {
    let needed = SETS_PER_HAND.checked_sub(existing_melds)?;
    if counts.total() != 3 * needed + 2 {
        return None;
    }

    let mut work = *counts;
    let pair_candidates: Vec<Tile> = counts
        .iter()
        .filter(|&(_, c)| c >= 2)
        .map(|(t, _)| t)
        .collect();

    for pair in pair_candidates {
        work.raw_mut()[pair.index()] -= 2;
        let mut sets = Vec::with_capacity(needed);
        if extract_sets(&mut work, needed, &mut sets) {
            return Some(Decomposition { pair, sets });
        }
        work.raw_mut()[pair.index()] += 2;
    }
    None
}

/// Is this concealed multiset, together with `existing_melds` formed melds,
/// a complete hand of four sets and a pair?
pub fn is_winning_hand(counts: &TileCounts, existing_melds: usize) -> bool {
    decompose(counts, existing_melds).is_some()
}

/// Slice convenience for [`is_winning_hand`].
pub fn is_winning_tiles(tiles: &[Tile], existing_melds: usize) -> bool {
    is_winning_hand(&TileCounts::from_tiles(tiles), existing_melds)
}
