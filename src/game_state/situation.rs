//! Game-outcome classification for a position.

use crate::game_state::chess_rules::MAX_QUIET_PLIES;
use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_generator::generate_legal_moves;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameSituation {
    InProgress,
    Check,
    Checkmate,
    Stalemate,
    DrawByFiftyMoveRule,
    DrawByInsufficientMaterial,
    DrawByThreefoldRepetition,
}

impl GameSituation {
    pub fn is_game_over(self) -> bool {
        !matches!(self, GameSituation::InProgress | GameSituation::Check)
    }
}

/// Classifies the position for the side to move. Draw rules are checked
/// before mate detection, so a fifty-move or material draw wins over a
/// position that would also be stalemate.
pub fn situation_of(state: &GameState) -> GameSituation {
    if state.halfmove_clock() >= MAX_QUIET_PLIES {
        return GameSituation::DrawByFiftyMoveRule;
    }
    if state.insufficient_material() {
        return GameSituation::DrawByInsufficientMaterial;
    }
    if state.repetitions.is_threefold() {
        return GameSituation::DrawByThreefoldRepetition;
    }
    let (moves, in_check) = generate_legal_moves(state, false, false);
    if moves.is_empty() {
        return if in_check {
            GameSituation::Checkmate
        } else {
            GameSituation::Stalemate
        };
    }
    if in_check {
        GameSituation::Check
    } else {
        GameSituation::InProgress
    }
}
