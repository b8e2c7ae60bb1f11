//! Heuristic move ordering for alpha-beta search.
//!
//! Captures are scored most-valuable-victim / least-valuable-attacker,
//! promotions add the promoted piece's value, and walking into an enemy
//! pawn's attack costs the mover its own value. Better-scored moves sort
//! first so beta cutoffs arrive early.

use crate::game_state::game_state::GameState;
use crate::moves::chess_move::{ChessMove, MoveFlag};
use crate::search::evaluation::material_value;

const CAPTURE_VICTIM_MULTIPLIER: i32 = 10;

pub fn score_move(state: &GameState, mv: ChessMove) -> i32 {
    let mover = state.side_to_move();
    let Some((_, moving_piece)) = state.piece_on_square(mv.origin()) else {
        return 0;
    };
    let mut score = 0;

    let victim = match mv.flag() {
        MoveFlag::EnPassant => Some(crate::game_state::chess_types::PieceKind::Pawn),
        _ => state.piece_on_square(mv.destination()).map(|(_, kind)| kind),
    };
    if let Some(victim) = victim {
        score +=
            CAPTURE_VICTIM_MULTIPLIER * material_value(victim) - material_value(moving_piece);
    }

    if let Some(promotion) = mv.promotion_piece() {
        score += material_value(promotion);
    }

    if state.is_attacked_by_pawn(mv.destination(), mover.opposite()) {
        score -= material_value(moving_piece);
    }

    score
}

/// Sorts moves best-first in place.
pub fn order_moves(state: &GameState, moves: &mut [ChessMove]) {
    moves.sort_unstable_by_key(|&mv| -score_move(state, mv));
}
