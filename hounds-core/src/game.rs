//! Match state machine.
//!
//! ```text
//! WAITING_FOR_SECOND_PLAYER --join--> TURN_HOUND <--move--> TURN_HARE
//!                                          |                    |
//!                                          +---> WIN_HOUND <----+
//!                                          +---> WIN_HARE_BY_ESCAPE
//!                                          +---> WIN_HARE_BY_STALLING
//! ```
//!
//! Every transition either fully applies or returns an error with the
//! match untouched.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{GameError, IllegalMove, InconsistentMatch, ParsePhaseError};
use crate::evaluate::evaluate;
use crate::rules::{legal_moves, validate};
use crate::{Cell, Fingerprint, Move, Piece, PieceKind, Placement};

/// Unique identifier for a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchId(Uuid);

impl MatchId {
    /// Create a new random match ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MatchId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MatchId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Opaque identifier handed to a player when they create or join a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(Uuid);

impl PlayerId {
    /// Create a new random player ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PlayerId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A bound player slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub kind: PieceKind,
}

/// Current phase of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    #[serde(rename = "WAITING_FOR_SECOND_PLAYER")]
    AwaitingSecondPlayer,
    #[serde(rename = "TURN_HOUND")]
    HoundTurn,
    #[serde(rename = "TURN_HARE")]
    HareTurn,
    #[serde(rename = "WIN_HOUND")]
    HoundWins,
    #[serde(rename = "WIN_HARE_BY_ESCAPE")]
    HareWinsByEscape,
    #[serde(rename = "WIN_HARE_BY_STALLING")]
    HareWinsByStalling,
}

impl Phase {
    const ALL: [Phase; 6] = [
        Phase::AwaitingSecondPlayer,
        Phase::HoundTurn,
        Phase::HareTurn,
        Phase::HoundWins,
        Phase::HareWinsByEscape,
        Phase::HareWinsByStalling,
    ];

    /// Side expected to move, if the match is in a turn phase.
    #[must_use]
    pub const fn mover(self) -> Option<PieceKind> {
        match self {
            Phase::HoundTurn => Some(PieceKind::Hound),
            Phase::HareTurn => Some(PieceKind::Hare),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_turn(self) -> bool {
        self.mover().is_some()
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            Phase::HoundWins | Phase::HareWinsByEscape | Phase::HareWinsByStalling
        )
    }

    /// Winning side for terminal phases.
    #[must_use]
    pub const fn winner(self) -> Option<PieceKind> {
        match self {
            Phase::HoundWins => Some(PieceKind::Hound),
            Phase::HareWinsByEscape | Phase::HareWinsByStalling => Some(PieceKind::Hare),
            _ => None,
        }
    }

    /// Wire name, e.g. "TURN_HOUND".
    pub const fn as_str(self) -> &'static str {
        match self {
            Phase::AwaitingSecondPlayer => "WAITING_FOR_SECOND_PLAYER",
            Phase::HoundTurn => "TURN_HOUND",
            Phase::HareTurn => "TURN_HARE",
            Phase::HoundWins => "WIN_HOUND",
            Phase::HareWinsByEscape => "WIN_HARE_BY_ESCAPE",
            Phase::HareWinsByStalling => "WIN_HARE_BY_STALLING",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Phase {
    type Err = ParsePhaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Phase::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ParsePhaseError(s.to_string()))
    }
}

/// Authoritative state of one match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    id: MatchId,
    phase: Phase,
    creator: Player,
    second: Option<Player>,
    placement: Placement,
    /// Fingerprints of every placement since the match started, oldest first.
    history: Vec<Fingerprint>,
}

impl Match {
    /// Open a match with the creator bound to `kind`.
    pub fn create(kind: PieceKind) -> Match {
        Match {
            id: MatchId::new(),
            phase: Phase::AwaitingSecondPlayer,
            creator: Player {
                id: PlayerId::new(),
                kind,
            },
            second: None,
            placement: Placement::initial(),
            history: Vec::new(),
        }
    }

    /// Reassemble a match from stored parts, checking its invariants.
    pub fn from_parts(
        id: MatchId,
        phase: Phase,
        creator: Player,
        second: Option<Player>,
        placement: Placement,
        history: Vec<Fingerprint>,
    ) -> Result<Match, InconsistentMatch> {
        let bound = 1 + usize::from(second.is_some());
        if (phase == Phase::AwaitingSecondPlayer) != (bound == 1) {
            return Err(InconsistentMatch::PhaseSlots { phase, bound });
        }
        if let Some(second) = second {
            if second.kind == creator.kind {
                return Err(InconsistentMatch::DuplicateKind);
            }
            match history.last() {
                None => return Err(InconsistentMatch::MissingHistory),
                Some(&last) if last != placement.fingerprint() => {
                    return Err(InconsistentMatch::StaleHistory);
                }
                Some(_) => {}
            }
        } else if !history.is_empty() {
            return Err(InconsistentMatch::UnexpectedHistory);
        }
        Ok(Match {
            id,
            phase,
            creator,
            second,
            placement,
            history,
        })
    }

    #[inline]
    pub fn id(&self) -> MatchId {
        self.id
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn creator(&self) -> Player {
        self.creator
    }

    #[inline]
    pub fn second(&self) -> Option<Player> {
        self.second
    }

    #[inline]
    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    #[inline]
    pub fn history(&self) -> &[Fingerprint] {
        &self.history
    }

    /// Current pieces, hounds first in index order.
    pub fn board(&self) -> [Piece; 4] {
        self.placement.pieces()
    }

    /// Find the bound slot for a player id.
    pub fn player(&self, id: PlayerId) -> Option<Player> {
        std::iter::once(self.creator)
            .chain(self.second)
            .find(|p| p.id == id)
    }

    /// Bind the second player to the remaining piece kind. Hounds move first.
    pub fn join(&mut self) -> Result<Player, GameError> {
        if self.phase.is_terminal() {
            return Err(GameError::MatchFinished);
        }
        if self.second.is_some() {
            return Err(GameError::MatchFull);
        }

        let player = Player {
            id: PlayerId::new(),
            kind: self.creator.kind.opponent(),
        };
        self.second = Some(player);
        self.history.push(self.placement.fingerprint());
        self.phase = Phase::HoundTurn;
        Ok(player)
    }

    /// Side to move, or why no move can be made right now.
    ///
    /// These are the checks `submit_move` runs before looking at who is moving.
    pub fn expect_move(&self) -> Result<PieceKind, GameError> {
        if self.phase.is_terminal() {
            return Err(GameError::MatchFinished);
        }
        self.phase.mover().ok_or(GameError::WrongTurn)
    }

    /// Apply one move on behalf of `player_id`.
    ///
    /// `kind` is the kind of piece the player claims to move; it must match
    /// the player's own side.
    pub fn submit_move(
        &mut self,
        player_id: PlayerId,
        kind: PieceKind,
        from: Cell,
        to: Cell,
    ) -> Result<Player, GameError> {
        let mover = self.expect_move()?;
        let player = self.player(player_id).ok_or(GameError::UnknownPlayer)?;
        if player.kind != mover {
            return Err(GameError::WrongTurn);
        }
        if kind != player.kind {
            return Err(IllegalMove::WrongPieceForOrigin.into());
        }
        validate(&self.placement, kind, from, to)?;

        // Nothing below can fail, so the match is never left half-updated.
        let next = self.placement.with_step(from, to);
        let phase = evaluate(&next, &self.history, self.phase);
        self.history.push(next.fingerprint());
        self.placement = next;
        self.phase = phase;
        Ok(player)
    }

    /// Legal moves for the side to move. Empty outside turn phases.
    pub fn legal_moves(&self) -> Vec<Move> {
        match self.phase.mover() {
            Some(kind) => legal_moves(&self.placement, kind),
            None => Vec::new(),
        }
    }
}
