//! Fixed board graph.
//!
//! The board is a 5×3 box whose left and right columns only contain the
//! middle row. Pieces step to an adjacent cell; diagonal links exist
//! everywhere except from the two hubs and the two flanks:
//!
//! - Hubs (1,1) and (3,1): orthogonal steps only. A hound gets up, down and
//!   right; a hare additionally gets left.
//! - Flanks (2,0) and (2,2): a hound may step right or toward the middle row;
//!   a hare may also step left.
//!
//! Hounds never step toward lower x.

use crate::{Cell, PieceKind};

pub const BOARD_WIDTH: i32 = 5;
pub const BOARD_HEIGHT: i32 = 3;

/// Cells with orthogonal-only connectivity on the middle row.
pub const HUBS: [Cell; 2] = [Cell::new(1, 1), Cell::new(3, 1)];

/// Top and bottom cells of the centre column.
pub const FLANKS: [Cell; 2] = [Cell::new(2, 0), Cell::new(2, 2)];

/// All playable cells, in fingerprint index order.
pub const VALID_CELLS: [Cell; 11] = [
    Cell::new(0, 1),
    Cell::new(1, 0),
    Cell::new(1, 1),
    Cell::new(1, 2),
    Cell::new(2, 0),
    Cell::new(2, 1),
    Cell::new(2, 2),
    Cell::new(3, 0),
    Cell::new(3, 1),
    Cell::new(3, 2),
    Cell::new(4, 1),
];

/// Hound steps: up, down, right, then the two forward diagonals.
const HOUND_STEPS: [(i32, i32); 5] = [(0, -1), (0, 1), (1, 0), (1, -1), (1, 1)];

/// Hare steps: up, down, right, left, then all four diagonals.
const HARE_STEPS: [(i32, i32); 8] = [
    (0, -1),
    (0, 1),
    (1, 0),
    (-1, 0),
    (1, -1),
    (1, 1),
    (-1, -1),
    (-1, 1),
];

/// Number of leading steps usable from a hub (the orthogonal ones).
const HUB_HOUND_STEPS: usize = 3;
const HUB_HARE_STEPS: usize = 4;

/// Check if a cell is one of the 11 playable cells.
#[inline]
pub fn is_valid_cell(cell: Cell) -> bool {
    if cell.x < 0 || cell.x >= BOARD_WIDTH || cell.y < 0 || cell.y >= BOARD_HEIGHT {
        return false;
    }
    // Edge columns only have the middle row.
    if cell.x == 0 || cell.x == BOARD_WIDTH - 1 {
        return cell.y == 1;
    }
    true
}

/// Cells a piece of `kind` could step to from `cell`, ignoring occupancy.
///
/// Off-board origins have no neighbors.
pub fn neighbors(kind: PieceKind, cell: Cell) -> Vec<Cell> {
    if !is_valid_cell(cell) {
        return Vec::new();
    }

    if FLANKS.contains(&cell) {
        // Step toward the middle row.
        let inward = if cell.y == 0 { 1 } else { -1 };
        let mut out = vec![cell.offset(1, 0), cell.offset(0, inward)];
        if kind == PieceKind::Hare {
            out.push(cell.offset(-1, 0));
        }
        return out;
    }

    let steps: &[(i32, i32)] = match (kind, HUBS.contains(&cell)) {
        (PieceKind::Hound, true) => &HOUND_STEPS[..HUB_HOUND_STEPS],
        (PieceKind::Hound, false) => &HOUND_STEPS,
        (PieceKind::Hare, true) => &HARE_STEPS[..HUB_HARE_STEPS],
        (PieceKind::Hare, false) => &HARE_STEPS,
    };

    steps
        .iter()
        .map(|&(dx, dy)| cell.offset(dx, dy))
        .filter(|&c| is_valid_cell(c))
        .collect()
}
