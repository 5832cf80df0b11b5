//! Hare and Hounds game logic.
//!
//! # Board Layout
//!
//! ```text
//!         x=0   x=1   x=2   x=3   x=4
//!   y=0          .-----.-----.
//!               /|     |     |\
//!   y=1   .----.-----.-----.-----.----.
//!               \|     |     |/
//!   y=2          .-----.-----.
//! ```
//!
//! Columns 0 and 4 only hold the middle row, giving 11 playable cells.
//! Cell indices (used by the fingerprint encoding), ordered by column then row:
//!
//! ```text
//!   (0,1)=0
//!   (1,0)=1  (1,1)=2  (1,2)=3
//!   (2,0)=4  (2,1)=5  (2,2)=6
//!   (3,0)=7  (3,1)=8  (3,2)=9
//!   (4,1)=10
//! ```
//!
//! # Fingerprint Encoding (64-bit)
//!
//! ```text
//! Bits 0-10:  Hound occupancy mask (bit i set = a hound on cell index i)
//! Bits 11-14: Hare cell index (0-10)
//! Bits 15-63: Unused (zero)
//! ```
//!
//! Hounds are interchangeable in the mask, so two placements that differ only
//! in which hound stands where share a fingerprint.

pub mod error;
pub mod evaluate;
pub mod game;
pub mod rules;
pub mod topology;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use error::{GameError, IllegalMove, InconsistentMatch, ParsePieceKindError, PlacementError};
pub use evaluate::evaluate;
pub use game::{Match, MatchId, Phase, Player, PlayerId};
pub use rules::{legal_moves, validate};
pub use topology::{is_valid_cell, neighbors};

/// Number of hounds in every match.
pub const HOUND_COUNT: usize = 3;

/// Piece kind. Also identifies which side a player controls.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PieceKind {
    Hound,
    Hare,
}

impl PieceKind {
    /// Get the other side.
    #[inline]
    pub fn opponent(self) -> PieceKind {
        match self {
            PieceKind::Hound => PieceKind::Hare,
            PieceKind::Hare => PieceKind::Hound,
        }
    }

    /// Wire name ("HOUND" or "HARE").
    pub fn as_str(self) -> &'static str {
        match self {
            PieceKind::Hound => "HOUND",
            PieceKind::Hare => "HARE",
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PieceKind {
    type Err = ParsePieceKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HOUND" => Ok(PieceKind::Hound),
            "HARE" => Ok(PieceKind::Hare),
            other => Err(ParsePieceKindError(other.to_string())),
        }
    }
}

/// A board coordinate. Not every coordinate is playable; see [`is_valid_cell`].
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    /// Create a cell from coordinates. The result may be off the board.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Cell {
        Cell { x, y }
    }

    /// Check whether this cell is one of the 11 playable cells.
    #[inline]
    pub fn is_valid(self) -> bool {
        topology::is_valid_cell(self)
    }

    /// Index of this cell in the fingerprint layout, or None if off the board.
    pub fn index(self) -> Option<u8> {
        topology::VALID_CELLS
            .iter()
            .position(|&c| c == self)
            .map(|i| i as u8)
    }

    /// Iterate over all playable cells.
    pub fn all() -> impl Iterator<Item = Cell> {
        topology::VALID_CELLS.into_iter()
    }

    #[inline]
    pub(crate) const fn offset(self, dx: i32, dy: i32) -> Cell {
        Cell::new(self.x + dx, self.y + dy)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Identity of a single piece: one of the three hounds, or the hare.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub enum PieceId {
    Hound(u8),
    Hare,
}

impl PieceId {
    #[inline]
    pub fn kind(self) -> PieceKind {
        match self {
            PieceId::Hound(_) => PieceKind::Hound,
            PieceId::Hare => PieceKind::Hare,
        }
    }

    /// Hound index (0-2), None for the hare.
    #[inline]
    pub fn hound_index(self) -> Option<u8> {
        match self {
            PieceId::Hound(i) => Some(i),
            PieceId::Hare => None,
        }
    }
}

/// A piece together with the cell it stands on.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct Piece {
    pub id: PieceId,
    pub cell: Cell,
}

impl Piece {
    #[inline]
    pub fn kind(&self) -> PieceKind {
        self.id.kind()
    }
}

/// A single step of one piece.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from: Cell,
    pub to: Cell,
}

/// Canonical encoding of a placement, used for repetition detection.
///
/// See module documentation for the bit layout.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(pub u64);

impl Fingerprint {
    /// Bit position of the hare's cell index.
    const HARE_SHIFT: u32 = 11;
}

// ============================================================================
// PLACEMENT
// ============================================================================

/// Positions of all four pieces.
///
/// Always holds exactly three hounds and one hare on distinct playable cells;
/// the constructor and deserializer both reject anything else.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[serde(try_from = "PlacementRepr", into = "PlacementRepr")]
pub struct Placement {
    hounds: [Cell; HOUND_COUNT],
    hare: Cell,
}

#[derive(Serialize, Deserialize)]
struct PlacementRepr {
    hounds: [Cell; HOUND_COUNT],
    hare: Cell,
}

impl TryFrom<PlacementRepr> for Placement {
    type Error = PlacementError;

    fn try_from(repr: PlacementRepr) -> Result<Self, Self::Error> {
        Placement::new(repr.hounds, repr.hare)
    }
}

impl From<Placement> for PlacementRepr {
    fn from(p: Placement) -> Self {
        PlacementRepr {
            hounds: p.hounds,
            hare: p.hare,
        }
    }
}

impl Placement {
    const INITIAL_HOUNDS: [Cell; HOUND_COUNT] = [Cell::new(1, 0), Cell::new(0, 1), Cell::new(1, 2)];
    const INITIAL_HARE: Cell = Cell::new(4, 1);

    /// Build a placement, checking that all cells are playable and distinct.
    pub fn new(hounds: [Cell; HOUND_COUNT], hare: Cell) -> Result<Placement, PlacementError> {
        let cells = [hounds[0], hounds[1], hounds[2], hare];
        for (i, &cell) in cells.iter().enumerate() {
            if !cell.is_valid() {
                return Err(PlacementError::InvalidCell(cell));
            }
            if cells[..i].contains(&cell) {
                return Err(PlacementError::Overlap(cell));
            }
        }
        Ok(Placement { hounds, hare })
    }

    /// Starting layout: hounds on the left edge, hare on the rightmost cell.
    pub fn initial() -> Placement {
        Placement {
            hounds: Self::INITIAL_HOUNDS,
            hare: Self::INITIAL_HARE,
        }
    }

    #[inline]
    pub fn hounds(&self) -> [Cell; HOUND_COUNT] {
        self.hounds
    }

    #[inline]
    pub fn hare(&self) -> Cell {
        self.hare
    }

    /// All four pieces, hounds first in index order.
    pub fn pieces(&self) -> [Piece; 4] {
        [
            Piece { id: PieceId::Hound(0), cell: self.hounds[0] },
            Piece { id: PieceId::Hound(1), cell: self.hounds[1] },
            Piece { id: PieceId::Hound(2), cell: self.hounds[2] },
            Piece { id: PieceId::Hare, cell: self.hare },
        ]
    }

    /// Get the piece standing on a cell, if any.
    pub fn occupant(&self, cell: Cell) -> Option<PieceId> {
        if self.hare == cell {
            return Some(PieceId::Hare);
        }
        self.hounds
            .iter()
            .position(|&c| c == cell)
            .map(|i| PieceId::Hound(i as u8))
    }

    #[inline]
    pub fn is_occupied(&self, cell: Cell) -> bool {
        self.occupant(cell).is_some()
    }

    /// Move whatever piece stands on `from` to `to`.
    ///
    /// Callers validate first; an empty `from` leaves the placement unchanged.
    pub(crate) fn with_step(&self, from: Cell, to: Cell) -> Placement {
        let mut next = *self;
        match self.occupant(from) {
            Some(PieceId::Hare) => next.hare = to,
            Some(PieceId::Hound(i)) => next.hounds[i as usize] = to,
            None => {}
        }
        next
    }

    /// Canonical fingerprint, independent of hound ordering.
    pub fn fingerprint(&self) -> Fingerprint {
        let mut bits = 0u64;
        for cell in self.hounds {
            // Placement cells are always valid, so index() is Some.
            if let Some(idx) = cell.index() {
                bits |= 1 << idx;
            }
        }
        if let Some(idx) = self.hare.index() {
            bits |= (idx as u64) << Fingerprint::HARE_SHIFT;
        }
        Fingerprint(bits)
    }
}

impl Default for Placement {
    fn default() -> Self {
        Placement::initial()
    }
}
