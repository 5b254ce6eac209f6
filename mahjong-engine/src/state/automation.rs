//! Choices made on behalf of automated seats. Pure functions of the seat's
//! own tiles, so automated play is fully reproducible from the wall.

use std::cmp::Reverse;

use crate::action::Capability;
use crate::tile::Tile;
use crate::types::TileCounts;

/// Highest-priority capability; earlier entries win ties.
pub fn best_capability(caps: &[Capability]) -> Option<Capability> {
    caps.iter()
        .copied()
        .enumerate()
        .max_by_key(|&(i, c)| (c.priority(), Reverse(i)))
        .map(|(_, c)| c)
}

/// Same-suit tiles within two ranks of `tile`, counting copies.
fn neighbours(counts: &TileCounts, tile: Tile) -> u8 {
    let Some(rank) = tile.number() else {
        return 0;
    };
    let base = tile.id() - (rank - 1);
    (1..=9u8)
        .filter(|&r| r != rank && r.abs_diff(rank) <= 2)
        .filter_map(|r| Tile::new(base + r - 1))
        .map(|t| counts.count(t))
        .sum()
}

/// Picks the tile an automated seat throws away.
///
/// Lone tiles go before anything paired. Among lone tiles, honours go first,
/// then suited tiles with the fewest close neighbours, terminals before
/// middle ranks, higher tiles before lower ones.
pub fn choose_discard(hand: &[Tile]) -> Option<Tile> {
    let counts = TileCounts::from_tiles(hand);
    counts
        .iter()
        .map(|(tile, copies)| (tile, copies, neighbours(&counts, tile)))
        .min_by_key(|&(tile, copies, near)| {
            (
                copies >= 2,
                !tile.is_honor(),
                near,
                !tile.is_terminal(),
                Reverse(tile),
            )
        })
        .map(|(tile, _, _)| tile)
}
