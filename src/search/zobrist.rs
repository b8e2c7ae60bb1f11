//! Zobrist hashing keys.
//!
//! One random 64-bit key per (color, piece, square), one per castling-rights
//! combination, one per en-passant file, and one for dark-to-move. Positions
//! hash to the XOR of the applicable keys, so moves update the hash
//! incrementally with a handful of XORs.

use std::sync::OnceLock;

use crate::game_state::chess_types::{CastlingRights, Color, PieceKind, Square};

struct ZobristKeys {
    piece_square: [[u64; 64]; 12],
    castling: [u64; 16],
    en_passant_file: [u64; 8],
    dark_to_move: u64,
}

static ZOBRIST_KEYS: OnceLock<ZobristKeys> = OnceLock::new();

// Fixed seed keeps hashes stable across runs, which transposition-table and
// opening-book persistence both rely on.
const ZOBRIST_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn keys() -> &'static ZobristKeys {
    ZOBRIST_KEYS.get_or_init(|| {
        let mut state = ZOBRIST_SEED;
        let mut piece_square = [[0u64; 64]; 12];
        for table in piece_square.iter_mut() {
            for key in table.iter_mut() {
                *key = splitmix64(&mut state);
            }
        }
        let mut castling = [0u64; 16];
        for key in castling.iter_mut() {
            *key = splitmix64(&mut state);
        }
        let mut en_passant_file = [0u64; 8];
        for key in en_passant_file.iter_mut() {
            *key = splitmix64(&mut state);
        }
        let dark_to_move = splitmix64(&mut state);
        ZobristKeys {
            piece_square,
            castling,
            en_passant_file,
            dark_to_move,
        }
    })
}

/// Key for a piece of `color` and `kind` standing on `square`.
#[inline]
pub fn piece_square_key(color: Color, kind: PieceKind, square: Square) -> u64 {
    keys().piece_square[color.index() * 6 + kind.index()][square as usize]
}

/// Key for a full castling-rights combination.
#[inline]
pub fn castling_key(rights: CastlingRights) -> u64 {
    keys().castling[(rights & 0x0F) as usize]
}

/// Key for the file of the en-passant-vulnerable pawn.
#[inline]
pub fn en_passant_file_key(file: u8) -> u64 {
    keys().en_passant_file[(file & 7) as usize]
}

/// Key XORed in whenever the dark side is to move.
#[inline]
pub fn side_to_move_key() -> u64 {
    keys().dark_to_move
}
