//! Tile identity, suits and the total display/grouping order.
//!
//! A tile is one of 34 distinct values. Copies are interchangeable, so the
//! engine only ever counts values and never tracks which physical copy is
//! where.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::EngineError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Total number of distinct tile values (0-33).
pub const NUM_TILE_TYPES: usize = 34;

/// Ranks per numbered suit (1-9).
pub const NUM_SUIT_TILES: usize = 9;

/// Physical copies of each tile value.
pub const COPIES_PER_TILE: usize = 4;

/// Total physical tiles in a set.
pub const NUM_TILES: usize = NUM_TILE_TYPES * COPIES_PER_TILE;

// Suit range starts (tile id indices).
pub const DOT_START: u8 = 0;
pub const BAMBOO_START: u8 = 9;
pub const CHARACTER_START: u8 = 18;
pub const WIND_START: u8 = 27;
pub const DRAGON_START: u8 = 31;

// ---------------------------------------------------------------------------
// Suit / honour ranks
// ---------------------------------------------------------------------------

/// The five tile suits, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Suit {
    Dot = 0,
    Bamboo = 1,
    Character = 2,
    Wind = 3,
    Dragon = 4,
}

impl Suit {
    /// Returns the first tile id of this suit.
    #[inline]
    pub const fn start(self) -> u8 {
        match self {
            Suit::Dot => DOT_START,
            Suit::Bamboo => BAMBOO_START,
            Suit::Character => CHARACTER_START,
            Suit::Wind => WIND_START,
            Suit::Dragon => DRAGON_START,
        }
    }

    /// True for the suits ranked 1-9. Only these can form runs.
    #[inline]
    pub const fn is_numbered(self) -> bool {
        matches!(self, Suit::Dot | Suit::Bamboo | Suit::Character)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Wind {
    East = 0,
    South = 1,
    West = 2,
    North = 3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Dragon {
    White = 0,
    Green = 1,
    Red = 2,
}

// ---------------------------------------------------------------------------
// Tile newtype
// ---------------------------------------------------------------------------

/// A tile value in the range 0-33. Wraps a `u8` for type safety.
///
/// The id layout is Dot 1-9, Bamboo 1-9, Character 1-9, East, South, West,
/// North, White, Green, Red, so ordering by id is ordering by (suit, rank).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tile(u8);

impl Tile {
    /// Creates a `Tile` if `id` is in range 0..34.
    #[inline]
    pub const fn new(id: u8) -> Option<Self> {
        if id < NUM_TILE_TYPES as u8 {
            Some(Tile(id))
        } else {
            None
        }
    }

    /// A numbered tile. `None` for honour suits or ranks outside 1-9.
    #[inline]
    pub const fn numbered(suit: Suit, rank: u8) -> Option<Self> {
        if !suit.is_numbered() || rank < 1 || rank > NUM_SUIT_TILES as u8 {
            return None;
        }
        Some(Tile(suit.start() + rank - 1))
    }

    #[inline]
    pub const fn dot(rank: u8) -> Option<Self> {
        Self::numbered(Suit::Dot, rank)
    }

    #[inline]
    pub const fn bamboo(rank: u8) -> Option<Self> {
        Self::numbered(Suit::Bamboo, rank)
    }

    #[inline]
    pub const fn character(rank: u8) -> Option<Self> {
        Self::numbered(Suit::Character, rank)
    }

    #[inline]
    pub const fn wind(wind: Wind) -> Self {
        Tile(WIND_START + wind as u8)
    }

    #[inline]
    pub const fn dragon(dragon: Dragon) -> Self {
        Tile(DRAGON_START + dragon as u8)
    }

    /// Raw numeric id (0-33).
    #[inline]
    pub const fn id(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Which suit this tile belongs to.
    #[inline]
    pub const fn suit(self) -> Suit {
        match self.0 {
            0..9 => Suit::Dot,
            9..18 => Suit::Bamboo,
            18..27 => Suit::Character,
            27..31 => Suit::Wind,
            _ => Suit::Dragon,
        }
    }

    /// 1-based rank within a numbered suit, or `None` for honours.
    #[inline]
    pub const fn number(self) -> Option<u8> {
        if self.0 < WIND_START {
            Some((self.0 % NUM_SUIT_TILES as u8) + 1)
        } else {
            None
        }
    }

    /// True for Dot, Bamboo and Character tiles.
    #[inline]
    pub const fn is_numbered(self) -> bool {
        self.0 < WIND_START
    }

    /// True for wind or dragon tiles.
    #[inline]
    pub const fn is_honor(self) -> bool {
        self.0 >= WIND_START
    }

    /// True for 1 or 9 of a numbered suit.
    #[inline]
    pub const fn is_terminal(self) -> bool {
        matches!(self.number(), Some(1) | Some(9))
    }

    /// The next rank in the same numbered suit (`None` past 9 or for honours).
    #[inline]
    pub const fn successor(self) -> Option<Self> {
        match self.number() {
            Some(n) if n < NUM_SUIT_TILES as u8 => Some(Tile(self.0 + 1)),
            _ => None,
        }
    }

    /// Every tile value in id order.
    pub fn all() -> impl Iterator<Item = Tile> {
        (0..NUM_TILE_TYPES as u8).map(Tile)
    }
}

// ---------------------------------------------------------------------------
// Display / notation
// ---------------------------------------------------------------------------

const HONOR_NAMES: [&str; 7] = ["E", "S", "W", "N", "P", "F", "C"];

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.suit() {
            Suit::Wind | Suit::Dragon => {
                f.write_str(HONOR_NAMES[(self.0 - WIND_START) as usize])
            }
            suit => {
                let letter = match suit {
                    Suit::Dot => 'p',
                    Suit::Bamboo => 's',
                    _ => 'm',
                };
                write!(f, "{}{}", (self.0 % NUM_SUIT_TILES as u8) + 1, letter)
            }
        }
    }
}

impl fmt::Debug for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tile({self})")
    }
}

/// Accepts the display form (`5p`, `E`, `C`) and single-tile notation
/// (`1z`..`7z`).
impl FromStr for Tile {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(i) = HONOR_NAMES.iter().position(|&name| name == s) {
            return Ok(Tile(WIND_START + i as u8));
        }
        let tiles = crate::parser::parse_tiles(s)?;
        match tiles.as_slice() {
            [tile] => Ok(*tile),
            _ => Err(EngineError::Parse {
                input: s.to_string(),
                message: "expected exactly one tile".to_string(),
            }),
        }
    }
}

impl Serialize for Tile {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Tile {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
