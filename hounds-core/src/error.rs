//! Error types for the rules engine.

use thiserror::Error;

use crate::{Cell, Phase};

/// Why a single candidate move is not legal on the current placement.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Error)]
pub enum IllegalMove {
    #[error("origin and destination are the same cell")]
    NullMove,
    #[error("no piece of the moving kind stands on the origin")]
    WrongPieceForOrigin,
    #[error("destination is occupied")]
    DestinationOccupied,
    #[error("destination is not reachable in one step")]
    DestinationUnreachable,
}

/// Rejection of a match transition. Match state is unchanged when returned.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Error)]
pub enum GameError {
    #[error("match already has two players")]
    MatchFull,
    #[error("player is not part of this match")]
    UnknownPlayer,
    #[error("not this player's turn")]
    WrongTurn,
    #[error("illegal move: {0}")]
    IllegalMove(#[from] IllegalMove),
    #[error("match already finished")]
    MatchFinished,
}

/// A placement that breaks the four-pieces-on-distinct-cells rule.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Error)]
pub enum PlacementError {
    #[error("cell {0} is not on the board")]
    InvalidCell(Cell),
    #[error("more than one piece on cell {0}")]
    Overlap(Cell),
}

/// Persisted match parts that cannot form a valid match.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Error)]
pub enum InconsistentMatch {
    #[error("phase {phase} does not fit {bound} bound player slot(s)")]
    PhaseSlots { phase: Phase, bound: usize },
    #[error("both players are bound to the same piece kind")]
    DuplicateKind,
    #[error("history is empty for a started match")]
    MissingHistory,
    #[error("match awaiting its second player already has history")]
    UnexpectedHistory,
    #[error("latest history entry does not match the placement")]
    StaleHistory,
}

#[derive(Clone, PartialEq, Eq, Debug, Error)]
#[error("unknown piece type: {0:?}")]
pub struct ParsePieceKindError(pub String);

#[derive(Clone, PartialEq, Eq, Debug, Error)]
#[error("unknown phase: {0:?}")]
pub struct ParsePhaseError(pub String);
