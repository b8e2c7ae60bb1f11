//! Piece-square tables.
//!
//! Tables are written board-top-first, so they read directly for dark pieces
//! and rank-flipped for light pieces. Kings and pawns carry separate opening
//! and endgame tables blended by the opponent's endgame factor; the other
//! pieces use a single static table.

use crate::game_state::chess_types::{square_file, square_rank, Color, PieceKind, Square};

#[rustfmt::skip]
const PAWNS: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
    50, 50, 50, 50, 50, 50, 50, 50,
    10, 10, 20, 30, 30, 20, 10, 10,
     5,  5, 10, 25, 25, 10,  5,  5,
     0,  0,  0, 20, 20,  0,  0,  0,
     5, -5,-10,  0,  0,-10, -5,  5,
     5, 10, 10,-20,-20, 10, 10,  5,
     0,  0,  0,  0,  0,  0,  0,  0,
];

#[rustfmt::skip]
const PAWNS_ENDGAME: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
    80, 80, 80, 80, 80, 80, 80, 80,
    50, 50, 50, 50, 50, 50, 50, 50,
    30, 30, 30, 30, 30, 30, 30, 30,
    20, 20, 20, 20, 20, 20, 20, 20,
    10, 10, 10, 10, 10, 10, 10, 10,
    10, 10, 10, 10, 10, 10, 10, 10,
     0,  0,  0,  0,  0,  0,  0,  0,
];

#[rustfmt::skip]
const KNIGHTS: [i32; 64] = [
    -50,-40,-30,-30,-30,-30,-40,-50,
    -40,-20,  0,  0,  0,  0,-20,-40,
    -30,  0, 10, 15, 15, 10,  0,-30,
    -30,  5, 15, 20, 20, 15,  5,-30,
    -30,  0, 15, 20, 20, 15,  0,-30,
    -30,  5, 10, 15, 15, 10,  5,-30,
    -40,-20,  0,  5,  5,  0,-20,-40,
    -50,-40,-30,-30,-30,-30,-40,-50,
];

#[rustfmt::skip]
const BISHOPS: [i32; 64] = [
    -20,-10,-10,-10,-10,-10,-10,-20,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -10,  0,  5, 10, 10,  5,  0,-10,
    -10,  5,  5, 10, 10,  5,  5,-10,
    -10,  0, 10, 10, 10, 10,  0,-10,
    -10, 10, 10, 10, 10, 10, 10,-10,
    -10,  5,  0,  0,  0,  0,  5,-10,
    -20,-10,-10,-10,-10,-10,-10,-20,
];

#[rustfmt::skip]
const ROOKS: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
     5, 10, 10, 10, 10, 10, 10,  5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
     0,  0,  0,  5,  5,  0,  0,  0,
];

#[rustfmt::skip]
const QUEENS: [i32; 64] = [
    -20,-10,-10, -5, -5,-10,-10,-20,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -10,  0,  5,  5,  5,  5,  0,-10,
     -5,  0,  5,  5,  5,  5,  0, -5,
      0,  0,  5,  5,  5,  5,  0, -5,
    -10,  5,  5,  5,  5,  5,  0,-10,
    -10,  0,  5,  0,  0,  0,  0,-10,
    -20,-10,-10, -5, -5,-10,-10,-20,
];

#[rustfmt::skip]
const KING: [i32; 64] = [
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -20,-30,-30,-40,-40,-30,-30,-20,
    -10,-20,-20,-20,-20,-20,-20,-10,
     20, 20,  0,  0,  0,  0, 20, 20,
     20, 30, 10,  0,  0, 10, 30, 20,
];

#[rustfmt::skip]
const KING_ENDGAME: [i32; 64] = [
    -50,-40,-30,-20,-20,-30,-40,-50,
    -30,-20,-10,  0,  0,-10,-20,-30,
    -30,-10, 20, 30, 30, 20,-10,-30,
    -30,-10, 30, 40, 40, 30,-10,-30,
    -30,-10, 30, 40, 40, 30,-10,-30,
    -30,-10, 20, 30, 30, 20,-10,-30,
    -30,-30,  0,  0,  0,  0,-30,-30,
    -50,-30,-30,-30,-30,-30,-30,-50,
];

#[inline]
fn table_index(color: Color, square: Square) -> usize {
    match color {
        Color::Light => ((7 - square_rank(square)) * 8 + square_file(square)) as usize,
        Color::Dark => square as usize,
    }
}

/// Positional value of a piece on its square. `opponent_endgame_factor` in
/// [0, 1] blends the king and pawn tables toward their endgame variants.
pub fn piece_map_value(
    kind: PieceKind,
    color: Color,
    square: Square,
    opponent_endgame_factor: f32,
) -> i32 {
    let index = table_index(color, square);
    match kind {
        PieceKind::Pawn => blend(PAWNS[index], PAWNS_ENDGAME[index], opponent_endgame_factor),
        PieceKind::Knight => KNIGHTS[index],
        PieceKind::Bishop => BISHOPS[index],
        PieceKind::Rook => ROOKS[index],
        PieceKind::Queen => QUEENS[index],
        PieceKind::King => blend(KING[index], KING_ENDGAME[index], opponent_endgame_factor),
    }
}

#[inline]
fn blend(opening: i32, endgame: i32, factor: f32) -> i32 {
    (opening as f32 * (1.0 - factor) + endgame as f32 * factor) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::algebraic::algebraic_to_square;

    fn sq(name: &str) -> Square {
        algebraic_to_square(name).expect("square should parse")
    }

    #[test]
    fn pawn_values_mirror_between_colors() {
        let light = piece_map_value(PieceKind::Pawn, Color::Light, sq("e2"), 0.0);
        let dark = piece_map_value(PieceKind::Pawn, Color::Dark, sq("e7"), 0.0);
        assert_eq!(light, -20);
        assert_eq!(light, dark);
    }

    #[test]
    fn knights_are_penalized_in_corners() {
        assert_eq!(piece_map_value(PieceKind::Knight, Color::Light, sq("a1"), 0.0), -50);
        assert_eq!(piece_map_value(PieceKind::Knight, Color::Light, sq("d4"), 0.0), 20);
    }

    #[test]
    fn king_table_shifts_toward_center_in_endgame() {
        let opening = piece_map_value(PieceKind::King, Color::Light, sq("e1"), 0.0);
        let endgame = piece_map_value(PieceKind::King, Color::Light, sq("e1"), 1.0);
        assert_eq!(opening, 0);
        assert_eq!(endgame, -30);

        let central_endgame = piece_map_value(PieceKind::King, Color::Light, sq("d4"), 1.0);
        assert_eq!(central_endgame, 40);
    }

    #[test]
    fn interpolation_is_linear() {
        let halfway = piece_map_value(PieceKind::Pawn, Color::Light, sq("e7"), 0.5);
        // Opening 50, endgame 80.
        assert_eq!(halfway, 65);
    }
}
