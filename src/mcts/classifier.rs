//! Archetype classification of positions.
//!
//! Decides, from cheap structural signals, whether sampling-based search is
//! likely to pay off for the side to move. The numeric cutoffs below are
//! empirically tuned values, not invariants; treat them as parameters when
//! retuning the gate.

use shakmaty::{Chess, Color, Position, Role};

/// Strategic archetypes recognized by the gate, checked in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Archetype {
    /// Piece-rich maneuvering position with a healthy pawn structure.
    ManeuveringHigh,
    /// Mid-sized maneuvering position.
    ManeuveringMid,
    /// Wide-open position with at least one king under fire.
    SharpTactical,
    /// Simplified position with little mobility and both kings safe.
    SimplifiedQuiet,
}

/// Structural metrics collected for the side to move.
#[derive(Debug, Clone, Copy)]
pub struct PositionMetrics {
    pub total_pieces: usize,
    pub pawns: usize,
    /// Total pieces minus pawns minus the two kings.
    pub major_minor_pieces: usize,
    /// Legal move count, used as a mobility proxy.
    pub mobility: usize,
    pub us_king_danger: bool,
    pub them_king_danger: bool,
}

/// Weighted attacker score against a king's square. Declares danger the
/// moment the running score reaches 6, otherwise on a final score of 4+.
/// The mid-accumulation exit is part of the tuned behavior; do not fold it
/// into a final-sum check.
pub fn king_in_danger(pos: &Chess, color: Color) -> bool {
    let board = pos.board();
    let ksq = match board.king_of(color) {
        Some(sq) => sq,
        None => return false,
    };

    let attackers = board.attacks_to(ksq, !color, board.occupied());
    if attackers.is_empty() {
        return false;
    }

    let mut danger = 0;
    for sq in attackers {
        danger += match board.role_at(sq) {
            Some(Role::Queen) | Some(Role::Rook) => 3,
            Some(Role::Bishop) | Some(Role::Knight) => 2,
            _ => 1,
        };
        if danger >= 6 {
            return true;
        }
    }

    danger >= 4
}

/// Collects the metric vector for `us` in the given position.
pub fn collect_metrics(pos: &Chess, us: Color) -> PositionMetrics {
    let board = pos.board();
    let total_pieces = board.occupied().count();
    let pawns = board.pawns().count();
    PositionMetrics {
        total_pieces,
        pawns,
        major_minor_pieces: total_pieces - pawns - 2,
        mobility: pos.legal_moves().len(),
        us_king_danger: king_in_danger(pos, us),
        them_king_danger: king_in_danger(pos, !us),
    }
}

impl PositionMetrics {
    fn is_maneuvering_high(&self) -> bool {
        self.major_minor_pieces >= 8
            && self.mobility <= 40
            && self.mobility >= 12
            && self.pawns >= 6
            && !self.us_king_danger
    }

    fn is_maneuvering_mid(&self) -> bool {
        self.major_minor_pieces >= 6
            && self.major_minor_pieces <= 10
            && self.mobility >= 10
            && self.mobility <= 36
            && !self.us_king_danger
    }

    fn is_sharp_tactical(&self) -> bool {
        self.mobility >= 34 && (self.us_king_danger || self.them_king_danger)
    }

    fn is_simplified_quiet(&self) -> bool {
        self.mobility <= 18
            && !self.us_king_danger
            && !self.them_king_danger
            && self.major_minor_pieces >= 5
    }

    /// Returns the first matching archetype, maneuvering shapes first.
    pub fn classify(&self) -> Option<Archetype> {
        if self.is_maneuvering_high() {
            Some(Archetype::ManeuveringHigh)
        } else if self.is_maneuvering_mid() {
            Some(Archetype::ManeuveringMid)
        } else if self.is_sharp_tactical() {
            Some(Archetype::SharpTactical)
        } else if self.is_simplified_quiet() {
            Some(Archetype::SimplifiedQuiet)
        } else {
            None
        }
    }
}
