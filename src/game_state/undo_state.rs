//! Snapshot of the irreversible parts of a position, taken before a move is
//! applied so the move can be rewound exactly.

use crate::game_state::chess_types::{CastlingRights, PieceKind, Square};
use crate::moves::chess_move::ChessMove;

#[derive(Debug, Clone, Copy)]
pub struct UndoState {
    pub mv: ChessMove,
    pub moved_piece: PieceKind,
    /// Kind of the captured piece, if any. The en-passant victim counts too.
    pub captured_piece: Option<PieceKind>,
    pub prev_castling_rights: CastlingRights,
    pub prev_en_passant_square: Option<Square>,
    pub prev_halfmove_clock: u16,
    pub prev_zobrist_key: u64,
}
