//! Integration tests for the archetype classifier and the entry gate.

use harrier::mcts::{collect_metrics, king_in_danger, should_use_mcts, Archetype, MctsConfig};
use shakmaty::fen::Fen;
use shakmaty::{CastlingMode, Chess, Color, Position};

fn position(fen: &str) -> Chess {
    fen.parse::<Fen>()
        .expect("valid FEN")
        .into_position(CastlingMode::Standard)
        .expect("legal position")
}

// Black has exactly one legal move: Rxe8, capturing the checking rook.
const SINGLE_REPLY: &str = "r3R1k1/5ppp/8/8/8/8/8/6K1 b - - 0 1";

// Rook endgame that the primary engine would flag as a likely draw.
const ROOK_ENDGAME: &str = "k6r/8/8/8/8/8/8/K6R w - - 0 1";

// Cramped all-minor position: 17 legal moves, five non-pawn pieces, both
// kings untouched. Classifies as simplified-quiet.
const QUIET_BOX: &str = "k7/8/8/8/8/2P5/PP1P4/KNRNB1N1 w - - 0 1";

#[test]
fn single_legal_move_gates_off() {
    let pos = position(SINGLE_REPLY);
    let legal = pos.legal_moves().len();
    assert_eq!(legal, 1);

    let cfg = MctsConfig {
        explore: true,
        ..MctsConfig::default()
    };
    assert!(!should_use_mcts(&pos, &cfg, false, legal, Color::Black));
}

#[test]
fn likely_draw_gates_off_regardless_of_metrics() {
    let pos = position(ROOK_ENDGAME);
    let legal = pos.legal_moves().len();
    assert!(legal > 1);

    let cfg = MctsConfig {
        explore: true,
        ..MctsConfig::default()
    };
    assert!(!should_use_mcts(&pos, &cfg, true, legal, Color::White));
}

#[test]
fn start_position_is_maneuvering() {
    let pos = Chess::default();
    let metrics = collect_metrics(&pos, Color::White);

    assert_eq!(metrics.total_pieces, 32);
    assert_eq!(metrics.pawns, 16);
    assert_eq!(metrics.major_minor_pieces, 14);
    assert_eq!(metrics.mobility, 20);
    assert!(!metrics.us_king_danger);
    assert!(!metrics.them_king_danger);
    assert_eq!(metrics.classify(), Some(Archetype::ManeuveringHigh));

    // Maneuvering archetypes are sampled even with exploration off.
    let cfg = MctsConfig::default();
    assert!(should_use_mcts(&pos, &cfg, false, metrics.mobility, Color::White));
}

#[test]
fn quiet_archetype_requires_explore_flag() {
    let pos = position(QUIET_BOX);
    let metrics = collect_metrics(&pos, Color::White);

    assert_eq!(metrics.mobility, 17);
    assert_eq!(metrics.major_minor_pieces, 5);
    assert_eq!(metrics.classify(), Some(Archetype::SimplifiedQuiet));

    let mut cfg = MctsConfig::default();
    assert!(!should_use_mcts(&pos, &cfg, false, metrics.mobility, Color::White));

    cfg.explore = true;
    assert!(should_use_mcts(&pos, &cfg, false, metrics.mobility, Color::White));
}

#[test]
fn king_danger_weights_attackers() {
    // Queen and rook both check the black king: 3 + 3 hits the early exit.
    let double_heavy = position("4k3/3Q4/8/8/8/8/8/4R1K1 b - - 0 1");
    assert!(king_in_danger(&double_heavy, Color::Black));
    assert!(!king_in_danger(&double_heavy, Color::White));

    // A lone knight scores 2: no danger.
    let knight_check = position("4k3/8/3N4/8/8/8/8/6K1 b - - 0 1");
    assert!(!king_in_danger(&knight_check, Color::Black));

    // A lone rook scores 3, still below the final threshold of 4.
    let rook_check = position("4k3/8/8/8/8/8/8/4R1K1 b - - 0 1");
    assert!(!king_in_danger(&rook_check, Color::Black));

    // Discovered rook plus knight sums to 5: danger on the final check.
    let rook_and_knight = position("4k3/8/3N4/8/8/8/8/4R1K1 b - - 0 1");
    assert!(king_in_danger(&rook_and_knight, Color::Black));
}

#[test]
fn untouched_kings_are_safe() {
    let pos = Chess::default();
    assert!(!king_in_danger(&pos, Color::White));
    assert!(!king_in_danger(&pos, Color::Black));
}
