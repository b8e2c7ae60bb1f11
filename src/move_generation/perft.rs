//! Perft: exhaustive move-path counting for validating move generation.

use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_generator::generate_legal_moves;
use crate::moves::chess_move::MoveFlag;

/// Leaf-move classification tallied by [`perft_counts`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: u64,
    pub captures: u64,
    pub en_passants: u64,
    pub castles: u64,
    pub promotions: u64,
}

/// Number of legal move sequences of length `depth` from this position.
pub fn perft(state: &mut GameState, depth: u32) -> Result<u64, String> {
    if depth == 0 {
        return Ok(1);
    }
    let (moves, _) = generate_legal_moves(state, false, false);
    if depth == 1 {
        return Ok(moves.len() as u64);
    }
    let mut nodes = 0;
    for mv in moves {
        state.make_move(mv, true)?;
        nodes += perft(state, depth - 1)?;
        state.undo_move()?;
    }
    Ok(nodes)
}

/// Like [`perft`] but classifies the moves at the final ply.
pub fn perft_counts(state: &mut GameState, depth: u32) -> Result<PerftCounts, String> {
    let mut counts = PerftCounts::default();
    if depth == 0 {
        counts.nodes = 1;
        return Ok(counts);
    }
    let (moves, _) = generate_legal_moves(state, false, false);
    for mv in moves {
        if depth == 1 {
            counts.nodes += 1;
            let is_capture = mv.flag() == MoveFlag::EnPassant
                || state.piece_on_square(mv.destination()).is_some();
            if is_capture {
                counts.captures += 1;
            }
            match mv.flag() {
                MoveFlag::EnPassant => counts.en_passants += 1,
                MoveFlag::Castle => counts.castles += 1,
                _ => {}
            }
            if mv.is_promotion() {
                counts.promotions += 1;
            }
        } else {
            state.make_move(mv, true)?;
            let below = perft_counts(state, depth - 1)?;
            state.undo_move()?;
            counts.nodes += below.nodes;
            counts.captures += below.captures;
            counts.en_passants += below.en_passants;
            counts.castles += below.castles;
            counts.promotions += below.promotions;
        }
    }
    Ok(counts)
}
