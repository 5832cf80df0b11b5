//! Move legality on a placement.
//!
//! Turn order is not checked here; see [`crate::game::Match::submit_move`].

use crate::error::IllegalMove;
use crate::topology::neighbors;
use crate::{Cell, Move, PieceKind, Placement};

/// Check whether a piece of `kind` may step from `from` to `to`.
///
/// Checks run in a fixed order and the first failure is reported.
pub fn validate(placement: &Placement, kind: PieceKind, from: Cell, to: Cell) -> Result<(), IllegalMove> {
    if from == to {
        return Err(IllegalMove::NullMove);
    }
    match placement.occupant(from) {
        Some(id) if id.kind() == kind => {}
        _ => return Err(IllegalMove::WrongPieceForOrigin),
    }
    if placement.is_occupied(to) {
        return Err(IllegalMove::DestinationOccupied);
    }
    if !neighbors(kind, from).contains(&to) {
        return Err(IllegalMove::DestinationUnreachable);
    }
    Ok(())
}

/// All legal moves for every piece of `kind`.
pub fn legal_moves(placement: &Placement, kind: PieceKind) -> Vec<Move> {
    let origins: Vec<Cell> = match kind {
        PieceKind::Hound => placement.hounds().to_vec(),
        PieceKind::Hare => vec![placement.hare()],
    };

    let mut moves = Vec::new();
    for from in origins {
        for to in neighbors(kind, from) {
            if !placement.is_occupied(to) {
                moves.push(Move { from, to });
            }
        }
    }
    moves
}
