//! Static evaluation used at the playout depth cutoff.
//!
//! A plain material count stands in for the primary engine's evaluator here;
//! playouts only need a rough signal to seed the logistic reward once the
//! depth cutoff is reached.

use shakmaty::{Board, Chess, Color, Position};

const PAWN_VALUE: i32 = 100;
const KNIGHT_VALUE: i32 = 320;
const BISHOP_VALUE: i32 = 330;
const ROOK_VALUE: i32 = 500;
const QUEEN_VALUE: i32 = 900;

/// Divisor for the logistic reward transform. Tuned so that roughly a
/// two-pawn advantage maps to a ~0.7 win probability.
const EVAL_SCALE: f64 = 220.0;

fn material(board: &Board, color: Color) -> i32 {
    let us = board.by_color(color);
    (board.pawns() & us).count() as i32 * PAWN_VALUE
        + (board.knights() & us).count() as i32 * KNIGHT_VALUE
        + (board.bishops() & us).count() as i32 * BISHOP_VALUE
        + (board.rooks() & us).count() as i32 * ROOK_VALUE
        + (board.queens() & us).count() as i32 * QUEEN_VALUE
}

/// Material balance in centipawns from the side to move's perspective.
pub fn simple_eval(pos: &Chess) -> i32 {
    let board = pos.board();
    material(board, pos.turn()) - material(board, !pos.turn())
}

/// Converts a signed centipawn score into a win probability in (0, 1),
/// centered at 0.5 for a balanced position.
pub fn win_probability(eval: i32) -> f64 {
    1.0 / (1.0 + (-f64::from(eval) / EVAL_SCALE).exp())
}
