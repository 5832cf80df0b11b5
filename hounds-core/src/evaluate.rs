//! Game-end detection after a move.

use crate::game::Phase;
use crate::topology::neighbors;
use crate::{Fingerprint, PieceKind, Placement};

/// Prior occurrences of a placement that make the next one a stalling win.
pub const STALLING_REPETITIONS: usize = 2;

/// Decide the phase that follows a move.
///
/// `placement` is the position after the move, `history` holds the
/// fingerprints of every earlier position (not including this one), and
/// `before` is the phase in which the move was made. Non-turn phases are
/// returned unchanged.
///
/// Rules, first match wins:
/// 1. Third occurrence of the same placement: hare wins by stalling.
/// 2. Hare is left of every hound: hare wins by escape.
/// 3. After a hound move, the hare has no free step: hounds win.
/// 4. Otherwise the turn passes to the other side.
pub fn evaluate(placement: &Placement, history: &[Fingerprint], before: Phase) -> Phase {
    if !before.is_turn() {
        return before;
    }

    if occurrences(placement.fingerprint(), history) >= STALLING_REPETITIONS {
        return Phase::HareWinsByStalling;
    }

    if hare_escaped(placement) {
        return Phase::HareWinsByEscape;
    }

    match before {
        Phase::HoundTurn => {
            // The hare inherits this placement; it must have somewhere to go.
            if hare_trapped(placement) {
                Phase::HoundWins
            } else {
                Phase::HareTurn
            }
        }
        _ => Phase::HoundTurn,
    }
}

/// Count how often a fingerprint appears in history.
pub fn occurrences(fingerprint: Fingerprint, history: &[Fingerprint]) -> usize {
    history.iter().filter(|&&fp| fp == fingerprint).count()
}

/// True when no hound stands at or left of the hare's column.
///
/// Only x is compared: a hare anywhere in a column left of all hounds counts.
pub fn hare_escaped(placement: &Placement) -> bool {
    let hare_x = placement.hare().x;
    placement.hounds().iter().all(|h| h.x > hare_x)
}

/// True when every hare step from its current cell is blocked.
pub fn hare_trapped(placement: &Placement) -> bool {
    neighbors(PieceKind::Hare, placement.hare())
        .into_iter()
        .all(|cell| placement.is_occupied(cell))
}
