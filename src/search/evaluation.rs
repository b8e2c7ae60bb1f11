//! Static position evaluation.
//!
//! Material plus piece-square tables, with two endgame refinements: king and
//! pawn tables are blended toward endgame variants as the opponent's material
//! fades, and a mop-up bonus rewards driving a lone enemy king to the edge
//! when clearly ahead. The score is from the mover's perspective, positive
//! meaning good for the side to move.

use crate::game_state::chess_types::{
    square_file, square_rank, Color, PieceKind, Square, ALL_PIECE_KINDS,
};
use crate::game_state::game_state::GameState;
use crate::search::piece_maps::piece_map_value;

pub const PAWN_VALUE: i32 = 100;
pub const KNIGHT_VALUE: i32 = 300;
pub const BISHOP_VALUE: i32 = 300;
pub const ROOK_VALUE: i32 = 500;
pub const QUEEN_VALUE: i32 = 900;

// Endgame weights: a side with fewer than two rooks, two bishops, two
// knights and a queen worth of this weight is proportionally "in the
// endgame".
const QUEEN_ENDGAME_WEIGHT: f32 = 45.0;
const ROOK_ENDGAME_WEIGHT: f32 = 20.0;
const MINOR_ENDGAME_WEIGHT: f32 = 10.0;
const ENDGAME_WEIGHT_LIMIT: f32 = 125.0;

/// Exchange value of a piece, used by both evaluation and move ordering.
/// Kings never enter material sums.
pub fn material_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn => PAWN_VALUE,
        PieceKind::Knight => KNIGHT_VALUE,
        PieceKind::Bishop => BISHOP_VALUE,
        PieceKind::Rook => ROOK_VALUE,
        PieceKind::Queen => QUEEN_VALUE,
        PieceKind::King => 0,
    }
}

pub fn evaluate(state: &GameState) -> i32 {
    let material = [side_material(state, Color::Light), side_material(state, Color::Dark)];
    let endgame = [
        endgame_factor(state, Color::Light),
        endgame_factor(state, Color::Dark),
    ];

    let mut totals = [0i32; 2];
    for color in [Color::Light, Color::Dark] {
        let opponent = color.opposite();
        let mut total = material[color.index()];

        for kind in ALL_PIECE_KINDS {
            let mut pieces = state.pieces_of(color, kind);
            while pieces != 0 {
                let square = pieces.trailing_zeros() as Square;
                pieces &= pieces - 1;
                total += piece_map_value(kind, color, square, endgame[opponent.index()]);
            }
        }

        if material[color.index()] > material[opponent.index()] + 2 * PAWN_VALUE
            && endgame[opponent.index()] > 0.0
        {
            total += mop_up_bonus(state, color, endgame[opponent.index()]);
        }

        totals[color.index()] = total;
    }

    let score = totals[Color::Light.index()] - totals[Color::Dark.index()];
    match state.side_to_move() {
        Color::Light => score,
        Color::Dark => -score,
    }
}

fn side_material(state: &GameState, color: Color) -> i32 {
    let mut material = 0;
    for kind in ALL_PIECE_KINDS {
        material += material_value(kind) * state.pieces_of(color, kind).count_ones() as i32;
    }
    material
}

/// 0 with full material, rising to 1 as the side's heavy pieces disappear.
fn endgame_factor(state: &GameState, color: Color) -> f32 {
    let weight = QUEEN_ENDGAME_WEIGHT
        * state.pieces_of(color, PieceKind::Queen).count_ones() as f32
        + ROOK_ENDGAME_WEIGHT * state.pieces_of(color, PieceKind::Rook).count_ones() as f32
        + MINOR_ENDGAME_WEIGHT * state.pieces_of(color, PieceKind::Bishop).count_ones() as f32
        + MINOR_ENDGAME_WEIGHT * state.pieces_of(color, PieceKind::Knight).count_ones() as f32;
    1.0 - (weight / ENDGAME_WEIGHT_LIMIT).min(1.0)
}

/// Rewards walking the own king toward a beaten enemy king and pushing that
/// king away from the center, which converts won endgames into mates the
/// search horizon alone would miss.
fn mop_up_bonus(state: &GameState, color: Color, opponent_endgame_factor: f32) -> i32 {
    let (Some(own_king), Some(enemy_king)) =
        (state.king_square(color), state.king_square(color.opposite()))
    else {
        return 0;
    };
    let approach = (14 - manhattan_distance(own_king, enemy_king)) * 4;
    let centralization = center_distance(enemy_king) * 10;
    ((approach + centralization) as f32 * opponent_endgame_factor) as i32
}

fn manhattan_distance(a: Square, b: Square) -> i32 {
    let rank_delta = (square_rank(a) as i32 - square_rank(b) as i32).abs();
    let file_delta = (square_file(a) as i32 - square_file(b) as i32).abs();
    rank_delta + file_delta
}

fn center_distance(square: Square) -> i32 {
    let rank = square_rank(square) as i32;
    let file = square_file(square) as i32;
    (3 - file).max(file - 4) + (3 - rank).max(rank - 4)
}
