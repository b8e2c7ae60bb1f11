//! Forsyth-Edwards Notation serialization.

use crate::game_state::chess_types::{
    Color, PieceKind, CASTLE_DARK_KINGSIDE, CASTLE_DARK_QUEENSIDE, CASTLE_LIGHT_KINGSIDE,
    CASTLE_LIGHT_QUEENSIDE,
};
use crate::game_state::game_state::GameState;
use crate::utils::algebraic::square_to_algebraic;

/// Serializes a position to FEN. With `include_en_passant` false the
/// en-passant field is always `-`, which opening-book keys use to match
/// positions regardless of double-push history.
pub fn generate_fen(state: &GameState, include_en_passant: bool) -> String {
    let mut fen = String::new();

    for rank in (0..8u8).rev() {
        let mut empty_run = 0;
        for file in 0..8u8 {
            let square = rank * 8 + file;
            match state.piece_on_square(square) {
                Some((color, kind)) => {
                    if empty_run > 0 {
                        fen.push(char::from_digit(empty_run, 10).unwrap_or('8'));
                        empty_run = 0;
                    }
                    fen.push(piece_symbol(color, kind));
                }
                None => empty_run += 1,
            }
        }
        if empty_run > 0 {
            fen.push(char::from_digit(empty_run, 10).unwrap_or('8'));
        }
        if rank > 0 {
            fen.push('/');
        }
    }

    fen.push(' ');
    fen.push(match state.side_to_move() {
        Color::Light => 'w',
        Color::Dark => 'b',
    });

    fen.push(' ');
    let rights = state.castling_rights();
    if rights == 0 {
        fen.push('-');
    } else {
        if rights & CASTLE_LIGHT_KINGSIDE != 0 {
            fen.push('K');
        }
        if rights & CASTLE_LIGHT_QUEENSIDE != 0 {
            fen.push('Q');
        }
        if rights & CASTLE_DARK_KINGSIDE != 0 {
            fen.push('k');
        }
        if rights & CASTLE_DARK_QUEENSIDE != 0 {
            fen.push('q');
        }
    }

    fen.push(' ');
    match state.en_passant_square().filter(|_| include_en_passant) {
        // Stored square is the pawn's landing square; FEN prints the square
        // it skipped over.
        Some(landing) => {
            let skipped = if landing / 8 == 3 {
                landing - 8
            } else {
                landing + 8
            };
            fen.push_str(&square_to_algebraic(skipped));
        }
        None => fen.push('-'),
    }

    fen.push_str(&format!(
        " {} {}",
        state.halfmove_clock(),
        state.fullmove_number()
    ));
    fen
}

fn piece_symbol(color: Color, kind: PieceKind) -> char {
    let symbol = match kind {
        PieceKind::Pawn => 'p',
        PieceKind::Knight => 'n',
        PieceKind::Bishop => 'b',
        PieceKind::Rook => 'r',
        PieceKind::Queen => 'q',
        PieceKind::King => 'k',
    };
    match color {
        Color::Light => symbol.to_ascii_uppercase(),
        Color::Dark => symbol,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;

    #[test]
    fn starting_position_serializes_exactly() {
        let state = GameState::new_game();
        assert_eq!(generate_fen(&state, true), STARTING_POSITION_FEN);
    }

    #[test]
    fn en_passant_field_can_be_suppressed() {
        let state = GameState::from_fen("4k3/8/8/8/4P3/8/8/4K3 b - e3 0 1")
            .expect("position should parse");
        assert_eq!(generate_fen(&state, true), "4k3/8/8/8/4P3/8/8/4K3 b - e3 0 1");
        assert_eq!(generate_fen(&state, false), "4k3/8/8/8/4P3/8/8/4K3 b - - 0 1");
    }

    #[test]
    fn empty_runs_are_merged() {
        let state = GameState::from_fen("4k3/8/8/3p1p2/8/8/8/4K3 w - - 3 20")
            .expect("position should parse");
        assert_eq!(generate_fen(&state, true), "4k3/8/8/3p1p2/8/8/8/4K3 w - - 3 20");
    }
}
