//! Compact tile notation.
//!
//! Digits followed by a suit letter: `p` Dot, `s` Bamboo, `m` Character and
//! `z` honours (1-4 East/South/West/North, 5-7 White/Green/Red). Whitespace
//! is ignored, so `"111p 555p 999m 111z 33s"` and `"111555p999m111z33s"`
//! describe the same tiles.

use crate::errors::{EngineError, EngineResult};
use crate::tile::{Suit, Tile, WIND_START};

fn parse_error(text: &str, message: impl Into<String>) -> EngineError {
    EngineError::Parse {
        input: text.to_string(),
        message: message.into(),
    }
}

/// Parses tile notation into tiles, in the order written.
pub fn parse_tiles(text: &str) -> EngineResult<Vec<Tile>> {
    let mut tiles = Vec::new();
    let mut pending_digits: Vec<u8> = Vec::new();

    for c in text.chars() {
        if c.is_whitespace() {
            continue;
        }
        if let Some(d) = c.to_digit(10) {
            pending_digits.push(d as u8);
            continue;
        }
        if pending_digits.is_empty() {
            return Err(parse_error(text, format!("suit '{c}' has no ranks")));
        }
        for &d in &pending_digits {
            let tile = match c {
                'p' => Tile::numbered(Suit::Dot, d),
                's' => Tile::numbered(Suit::Bamboo, d),
                'm' => Tile::numbered(Suit::Character, d),
                'z' if (1..=7).contains(&d) => Tile::new(WIND_START + d - 1),
                'z' => None,
                _ => return Err(parse_error(text, format!("unknown suit '{c}'"))),
            };
            let tile =
                tile.ok_or_else(|| parse_error(text, format!("rank {d} invalid for '{c}'")))?;
            tiles.push(tile);
        }
        pending_digits.clear();
    }

    if !pending_digits.is_empty() {
        return Err(parse_error(text, "ranks without a trailing suit"));
    }
    Ok(tiles)
}

/// Renders tiles back into compact notation, grouping consecutive tiles of
/// the same suit (`1p2p3p` becomes `123p`). Input order is preserved.
pub fn format_tiles(tiles: &[Tile]) -> String {
    let mut out = String::new();
    let mut run_letter: Option<char> = None;
    for &tile in tiles {
        let (digit, letter) = match tile.number() {
            Some(n) => (
                n,
                match tile.suit() {
                    Suit::Dot => 'p',
                    Suit::Bamboo => 's',
                    _ => 'm',
                },
            ),
            None => (tile.id() - WIND_START + 1, 'z'),
        };
        if let Some(prev) = run_letter {
            if prev != letter {
                out.push(prev);
            }
        }
        out.push(char::from(b'0' + digit));
        run_letter = Some(letter);
    }
    if let Some(last) = run_letter {
        out.push(last);
    }
    out
}
