//! Precomputed attack tables and bitboard primitives.
//!
//! Lazily builds knight/king/pawn attack masks and the between-squares matrix
//! used by check detection, pin detection, and sliding move generation.

use std::sync::OnceLock;

use crate::game_state::chess_types::{square_file, square_rank, Color, Square};

struct AttackTables {
    knight: [u64; 64],
    king: [u64; 64],
    // [color][target]: squares from which a pawn of that color attacks target.
    pawn_sources: [[u64; 64]; 2],
    between: [[u64; 64]; 64],
}

static ATTACK_TABLES: OnceLock<AttackTables> = OnceLock::new();

fn tables() -> &'static AttackTables {
    ATTACK_TABLES.get_or_init(build_tables)
}

fn build_tables() -> AttackTables {
    let mut knight = [0u64; 64];
    let mut king = [0u64; 64];
    let mut pawn_sources = [[0u64; 64]; 2];
    let mut between = [[0u64; 64]; 64];

    for sq in 0..64usize {
        let rank = (sq / 8) as i8;
        let file = (sq % 8) as i8;

        for (dr, df) in [
            (-2i8, -1i8),
            (-2, 1),
            (-1, -2),
            (-1, 2),
            (1, -2),
            (1, 2),
            (2, -1),
            (2, 1),
        ] {
            if let Some(target) = offset_square(rank, file, dr, df) {
                knight[sq] |= 1u64 << target;
            }
        }

        for dr in -1i8..=1 {
            for df in -1i8..=1 {
                if dr == 0 && df == 0 {
                    continue;
                }
                if let Some(target) = offset_square(rank, file, dr, df) {
                    king[sq] |= 1u64 << target;
                }
            }
        }

        // A light pawn attacks upward, so its source squares sit one rank below.
        for df in [-1i8, 1] {
            if let Some(source) = offset_square(rank, file, -1, df) {
                pawn_sources[Color::Light.index()][sq] |= 1u64 << source;
            }
            if let Some(source) = offset_square(rank, file, 1, df) {
                pawn_sources[Color::Dark.index()][sq] |= 1u64 << source;
            }
        }
    }

    for from in 0..64usize {
        for to in 0..64usize {
            between[from][to] = compute_between(from as i8, to as i8);
        }
    }

    AttackTables {
        knight,
        king,
        pawn_sources,
        between,
    }
}

fn offset_square(rank: i8, file: i8, d_rank: i8, d_file: i8) -> Option<u8> {
    let r = rank + d_rank;
    let f = file + d_file;
    if (0..8).contains(&r) && (0..8).contains(&f) {
        Some((r * 8 + f) as u8)
    } else {
        None
    }
}

fn compute_between(from: i8, to: i8) -> u64 {
    let (from_rank, from_file) = (from / 8, from % 8);
    let (to_rank, to_file) = (to / 8, to % 8);

    let d_rank = (to_rank - from_rank).signum();
    let d_file = (to_file - from_file).signum();
    if d_rank == 0 && d_file == 0 {
        return 0;
    }

    let aligned = from_rank == to_rank
        || from_file == to_file
        || (to_rank - from_rank).abs() == (to_file - from_file).abs();
    if !aligned {
        return 0;
    }

    let mut ray = 0u64;
    let (mut r, mut f) = (from_rank + d_rank, from_file + d_file);
    while r != to_rank || f != to_file {
        ray |= 1u64 << (r * 8 + f);
        r += d_rank;
        f += d_file;
    }
    ray
}

/// One-hot bitboard for a square.
#[inline]
pub fn single_bit(square: Square) -> u64 {
    1u64 << square
}

#[inline]
pub fn is_set(bitboard: u64, square: Square) -> bool {
    (bitboard & single_bit(square)) != 0
}

#[inline]
pub fn more_than_one_bit(bitboard: u64) -> bool {
    (bitboard & bitboard.wrapping_sub(1)) != 0
}

#[inline]
pub fn is_single_bit(bitboard: u64) -> bool {
    bitboard != 0 && !more_than_one_bit(bitboard)
}

/// True if every set bit lies on squares of one color.
#[inline]
pub fn bishops_share_square_color(bishops: u64) -> bool {
    const LIGHT_SQUARES: u64 = 0x55AA_55AA_55AA_55AA;
    const DARK_SQUARES: u64 = 0xAA55_AA55_AA55_AA55;
    (bishops & LIGHT_SQUARES) == 0 || (bishops & DARK_SQUARES) == 0
}

#[inline]
pub fn knight_attacks(square: Square) -> u64 {
    tables().knight[square as usize]
}

#[inline]
pub fn king_attacks(square: Square) -> u64 {
    tables().king[square as usize]
}

/// Squares from which a pawn of `color` attacks `square`.
#[inline]
pub fn pawn_attack_sources(color: Color, square: Square) -> u64 {
    tables().pawn_sources[color.index()][square as usize]
}

/// Squares strictly between two aligned squares, zero when unaligned.
#[inline]
pub fn between_squares(from: Square, to: Square) -> u64 {
    tables().between[from as usize][to as usize]
}

pub fn rook_attacks(occupied: u64, square: Square) -> u64 {
    ray_attacks(occupied, square, &[(1, 0), (-1, 0), (0, 1), (0, -1)])
}

pub fn bishop_attacks(occupied: u64, square: Square) -> u64 {
    ray_attacks(occupied, square, &[(1, 1), (1, -1), (-1, 1), (-1, -1)])
}

fn ray_attacks(occupied: u64, square: Square, directions: &[(i8, i8)]) -> u64 {
    let rank = square_rank(square) as i8;
    let file = square_file(square) as i8;
    let mut attacks = 0u64;

    for &(d_rank, d_file) in directions {
        let (mut r, mut f) = (rank + d_rank, file + d_file);
        while (0..8).contains(&r) && (0..8).contains(&f) {
            let sq = (r * 8 + f) as u8;
            attacks |= single_bit(sq);
            if is_set(occupied, sq) {
                break;
            }
            r += d_rank;
            f += d_file;
        }
    }

    attacks
}

/// Rook attacks continuing through the first layer of `blockers`.
pub fn xray_rook_attacks(occupied: u64, blockers: u64, square: Square) -> u64 {
    let attacks = rook_attacks(occupied, square);
    let masked = blockers & attacks;
    attacks ^ rook_attacks(occupied ^ masked, square)
}

/// Bishop attacks continuing through the first layer of `blockers`.
pub fn xray_bishop_attacks(occupied: u64, blockers: u64, square: Square) -> u64 {
    let attacks = bishop_attacks(occupied, square);
    let masked = blockers & attacks;
    attacks ^ bishop_attacks(occupied ^ masked, square)
}

/// Union of enemy slider attacks with the defending king removed from the
/// occupancy, so squares behind the king along a check ray stay covered.
pub fn slider_attacks_ignoring_king(
    occupied: u64,
    rooks: u64,
    bishops: u64,
    queens: u64,
    defending_king: u64,
) -> u64 {
    let occupied_without_king = occupied & !defending_king;
    let mut attacks = 0u64;

    let mut orthogonal = rooks | queens;
    while orthogonal != 0 {
        let sq = orthogonal.trailing_zeros() as Square;
        orthogonal &= orthogonal - 1;
        attacks |= rook_attacks(occupied_without_king, sq);
    }

    let mut diagonal = bishops | queens;
    while diagonal != 0 {
        let sq = diagonal.trailing_zeros() as Square;
        diagonal &= diagonal - 1;
        attacks |= bishop_attacks(occupied_without_king, sq);
    }

    attacks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::algebraic::algebraic_to_square;

    fn sq(name: &str) -> Square {
        algebraic_to_square(name).expect("square should parse")
    }

    #[test]
    fn knight_attack_counts_at_corner_and_center() {
        assert_eq!(knight_attacks(sq("a1")).count_ones(), 2);
        assert_eq!(knight_attacks(sq("d4")).count_ones(), 8);
    }

    #[test]
    fn king_attack_counts_at_corner_edge_and_center() {
        assert_eq!(king_attacks(sq("a1")).count_ones(), 3);
        assert_eq!(king_attacks(sq("a4")).count_ones(), 5);
        assert_eq!(king_attacks(sq("e5")).count_ones(), 8);
    }

    #[test]
    fn pawn_attack_sources_by_color() {
        // A light pawn on d4 or f4 attacks e5.
        let light = pawn_attack_sources(Color::Light, sq("e5"));
        assert_eq!(light, single_bit(sq("d4")) | single_bit(sq("f4")));

        // A dark pawn on d6 or f6 attacks e5.
        let dark = pawn_attack_sources(Color::Dark, sq("e5"));
        assert_eq!(dark, single_bit(sq("d6")) | single_bit(sq("f6")));
    }

    #[test]
    fn between_squares_aligned_and_unaligned() {
        let ray = between_squares(sq("a1"), sq("a4"));
        assert_eq!(ray, single_bit(sq("a2")) | single_bit(sq("a3")));

        let diagonal = between_squares(sq("c1"), sq("f4"));
        assert_eq!(diagonal, single_bit(sq("d2")) | single_bit(sq("e3")));

        assert_eq!(between_squares(sq("a1"), sq("b3")), 0);
        assert_eq!(between_squares(sq("d4"), sq("d4")), 0);
    }

    #[test]
    fn rook_attacks_stop_at_blockers() {
        let occupied = single_bit(sq("d6")) | single_bit(sq("f4"));
        let attacks = rook_attacks(occupied, sq("d4"));

        assert!(is_set(attacks, sq("d6")));
        assert!(!is_set(attacks, sq("d7")));
        assert!(is_set(attacks, sq("f4")));
        assert!(!is_set(attacks, sq("g4")));
        assert!(is_set(attacks, sq("d1")));
        assert!(is_set(attacks, sq("a4")));
    }

    #[test]
    fn xray_rook_sees_through_single_blocker() {
        let blocker = single_bit(sq("d5"));
        let behind = single_bit(sq("d7"));
        let occupied = blocker | behind | single_bit(sq("d4"));

        let xray = xray_rook_attacks(occupied, blocker, sq("d4"));
        assert!(is_set(xray, sq("d6")));
        assert!(is_set(xray, sq("d7")));
        assert!(!is_set(xray, sq("d5")));
    }

    #[test]
    fn slider_attacks_cover_squares_behind_defending_king() {
        // Rook on a8, defending king on a4: a3..a1 must still be covered.
        let rook = single_bit(sq("a8"));
        let king = single_bit(sq("a4"));
        let attacks = slider_attacks_ignoring_king(rook | king, rook, 0, 0, king);

        assert!(is_set(attacks, sq("a3")));
        assert!(is_set(attacks, sq("a1")));
    }
}
