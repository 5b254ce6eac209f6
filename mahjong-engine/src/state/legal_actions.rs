use crate::action::Capability;
use crate::state::player::PlayerState;
use crate::tile::{Tile, COPIES_PER_TILE};
use crate::winning_hand::is_winning_hand;

/// What `player` may do with another seat's discard `tile`.
/// Ordered win, kong, pong.
pub fn claim_capabilities(player: &PlayerState, tile: Tile) -> Vec<Capability> {
    let mut caps = Vec::new();
    let held = player.count(tile);

    let mut with_discard = player.hand_counts();
    with_discard.add(tile);
    if is_winning_hand(&with_discard, player.melds.len()) {
        caps.push(Capability::Win);
    }
    if held >= 3 {
        caps.push(Capability::Kong);
    }
    if held >= 2 {
        caps.push(Capability::Pong);
    }
    caps
}

/// What `player` may do right after drawing. Ordered self-win, concealed
/// kongs by tile, upgrade kongs by tile.
pub fn self_turn_capabilities(player: &PlayerState) -> Vec<Capability> {
    let mut caps = Vec::new();
    let counts = player.hand_counts();

    if is_winning_hand(&counts, player.melds.len()) {
        caps.push(Capability::SelfWin);
    }
    caps.extend(
        counts
            .iter()
            .filter(|&(_, c)| c as usize == COPIES_PER_TILE)
            .map(|(t, _)| Capability::ConcealedKong(t)),
    );
    let mut upgrades: Vec<Tile> = player.upgradable_triplets().collect();
    upgrades.sort();
    caps.extend(upgrades.into_iter().map(Capability::UpgradeKong));
    caps
}

/// Seats other than `discarder`, nearest to its right first.
pub fn seats_after(discarder: u8) -> impl Iterator<Item = u8> {
    (1..4u8).map(move |offset| (discarder + offset) % 4)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_tiles;
    use crate::types::SeatKind;

    fn player_with(text: &str) -> PlayerState {
        let mut p = PlayerState::new(1, SeatKind::Human, 0);
        for t in parse_tiles(text).unwrap() {
            p.receive(t);
        }
        p
    }

    fn t(text: &str) -> Tile {
        text.parse().unwrap()
    }

    #[test]
    fn pong_and_kong_by_copies() {
        let p = player_with("555p1234s6789m1z");
        assert_eq!(
            claim_capabilities(&p, t("5p")),
            vec![Capability::Kong, Capability::Pong]
        );
        assert_eq!(claim_capabilities(&p, t("1z")), vec![]);

        let pair = player_with("55p12345s6789m1z2z");
        assert_eq!(claim_capabilities(&pair, t("5p")), vec![Capability::Pong]);
    }

    #[test]
    fn win_on_discard() {
        // Waiting on 3s to finish 111p 555p 999m 111z + 33s.
        let p = player_with("111p555p999m111z3s");
        assert_eq!(claim_capabilities(&p, t("3s")), vec![Capability::Win]);
        assert_eq!(claim_capabilities(&p, t("4s")), vec![]);
        // Also offered pong on 1p, and win is not.
        assert_eq!(claim_capabilities(&p, t("1p")), vec![Capability::Kong, Capability::Pong]);
    }

    #[test]
    fn win_counts_existing_melds() {
        let mut p = player_with("55p123s");
        // Pretend three melds already exist.
        for tile in ["1m", "2m", "3m"] {
            p.melds
                .push(crate::types::Meld::new(crate::types::MeldKind::Triplet, t(tile), Some(0)));
        }
        assert_eq!(p.effective_hand_len(), 14);
        let waiting = {
            let mut w = p.clone();
            w.remove_tile(t("5p"));
            w
        };
        assert_eq!(claim_capabilities(&waiting, t("5p")), vec![Capability::Win]);
    }

    #[test]
    fn self_turn_kongs_and_win() {
        let p = player_with("1111p555p999m11z33s");
        assert_eq!(
            self_turn_capabilities(&p),
            vec![Capability::ConcealedKong(t("1p"))]
        );

        let winner = player_with("111p555p999m111z33s");
        assert_eq!(self_turn_capabilities(&winner), vec![Capability::SelfWin]);
    }

    #[test]
    fn upgrade_offered_for_claimed_triplet() {
        let mut p = player_with("777s12345p6789m");
        p.claim_triplet(t("7s"), 3).unwrap();
        p.receive(t("7s"));
        assert_eq!(self_turn_capabilities(&p), vec![Capability::UpgradeKong(t("7s"))]);
    }

    #[test]
    fn seats_after_wraps() {
        assert_eq!(seats_after(0).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(seats_after(2).collect::<Vec<_>>(), vec![3, 0, 1]);
    }
}
