//! Legal move generation.
//!
//! Legality is enforced up front instead of by make/undo filtering: the
//! generator computes the checker set on the mover's king and the absolutely
//! pinned pieces, then restricts each piece's destinations to an admissible
//! mask. In check by one slider the mask is the checker plus the squares
//! between it and the king; in double check only the king may move; a pinned
//! piece is confined to its pin ray while not in check and frozen while in
//! check. King destinations are screened against an enemy attack map computed
//! with the king removed from the occupancy, so the king cannot step along
//! the ray of the slider checking it.

use crate::game_state::chess_rules::MAX_QUIET_PLIES;
use crate::game_state::chess_types::{
    square_rank, Color, PieceKind, Square, CASTLE_DARK_KINGSIDE, CASTLE_DARK_QUEENSIDE,
    CASTLE_LIGHT_KINGSIDE, CASTLE_LIGHT_QUEENSIDE,
};
use crate::game_state::game_state::GameState;
use crate::move_generation::attack_tables::{
    between_squares, bishop_attacks, is_set, king_attacks, knight_attacks, more_than_one_bit,
    pawn_attack_sources, rook_attacks, single_bit, slider_attacks_ignoring_king,
    xray_bishop_attacks, xray_rook_attacks,
};
use crate::moves::chess_move::{ChessMove, MoveFlag};

const FILE_A: u64 = 0x0101_0101_0101_0101;
const FILE_H: u64 = 0x8080_8080_8080_8080;

const PROMOTION_FLAGS: [MoveFlag; 4] = [
    MoveFlag::PromoteQueen,
    MoveFlag::PromoteKnight,
    MoveFlag::PromoteRook,
    MoveFlag::PromoteBishop,
];

/// Generates all legal moves for the side to move, returning them together
/// with whether that side is currently in check.
///
/// With `shorten_generation`, a position already drawn by the fifty-move
/// rule, insufficient material, or threefold repetition returns an empty
/// list immediately so search branches terminate early; callers must check
/// those draw conditions themselves before reading an empty list as mate or
/// stalemate. With `only_captures` the list is restricted to captures
/// (including en passant and capture-promotions) for quiescence search.
pub fn generate_legal_moves(
    state: &GameState,
    shorten_generation: bool,
    only_captures: bool,
) -> (Vec<ChessMove>, bool) {
    let mover = state.side_to_move();
    let enemy = mover.opposite();
    let Some(king_square) = state.king_square(mover) else {
        return (Vec::new(), false);
    };

    let checkers = state.attackers_of_square(king_square, enemy);
    let in_check = checkers != 0;

    if shorten_generation
        && (state.halfmove_clock() >= MAX_QUIET_PLIES
            || state.insufficient_material()
            || state.repetitions.is_threefold())
    {
        return (Vec::new(), in_check);
    }

    let occupied = state.all_occupied();
    let own = state.occupancy_of(mover);
    let enemy_occupancy = state.occupancy_of(enemy);
    let (pinned, pin_masks) = compute_pins(state, mover, king_square, occupied);

    // Admissible destinations for non-king pieces while in check.
    let check_mask = if !in_check {
        u64::MAX
    } else if more_than_one_bit(checkers) {
        0
    } else {
        let checker_square = checkers.trailing_zeros() as Square;
        let slider = state
            .piece_on_square(checker_square)
            .map(|(_, kind)| kind.is_slider())
            .unwrap_or(false);
        if slider {
            checkers | between_squares(king_square, checker_square)
        } else {
            checkers
        }
    };

    let mut moves = Vec::with_capacity(48);

    // King steps, screened against the king-removed attack map.
    let danger = enemy_attack_map(state, enemy, single_bit(king_square));
    let mut king_targets = king_attacks(king_square) & !own & !danger;
    if only_captures {
        king_targets &= enemy_occupancy;
    }
    while king_targets != 0 {
        let destination = king_targets.trailing_zeros() as Square;
        king_targets &= king_targets - 1;
        moves.push(ChessMove::new(king_square, destination, MoveFlag::None));
    }

    if !in_check && !only_captures {
        emit_castles(state, mover, enemy, occupied, &mut moves);
    }

    for_each_square(
        state.pieces_of(mover, PieceKind::Knight),
        |origin| {
            let mask = piece_mask(origin, pinned, &pin_masks, in_check, check_mask);
            let mut targets = knight_attacks(origin) & !own & mask;
            if only_captures {
                targets &= enemy_occupancy;
            }
            emit_plain(origin, targets, &mut moves);
        },
    );

    let diagonal_sliders =
        state.pieces_of(mover, PieceKind::Bishop) | state.pieces_of(mover, PieceKind::Queen);
    for_each_square(diagonal_sliders, |origin| {
        let mask = piece_mask(origin, pinned, &pin_masks, in_check, check_mask);
        let mut targets = bishop_attacks(occupied, origin) & !own & mask;
        if only_captures {
            targets &= enemy_occupancy;
        }
        emit_plain(origin, targets, &mut moves);
    });

    let orthogonal_sliders =
        state.pieces_of(mover, PieceKind::Rook) | state.pieces_of(mover, PieceKind::Queen);
    for_each_square(orthogonal_sliders, |origin| {
        let mask = piece_mask(origin, pinned, &pin_masks, in_check, check_mask);
        let mut targets = rook_attacks(occupied, origin) & !own & mask;
        if only_captures {
            targets &= enemy_occupancy;
        }
        emit_plain(origin, targets, &mut moves);
    });

    let (push_offset, home_rank, promotion_rank) = match mover {
        Color::Light => (8i8, 1u8, 7u8),
        Color::Dark => (-8i8, 6u8, 0u8),
    };
    for_each_square(state.pieces_of(mover, PieceKind::Pawn), |origin| {
        let mask = piece_mask(origin, pinned, &pin_masks, in_check, check_mask);
        if mask == 0 {
            return;
        }

        if !only_captures {
            let push = (origin as i8 + push_offset) as Square;
            if !is_set(occupied, push) {
                if is_set(mask, push) {
                    if square_rank(push) == promotion_rank {
                        for flag in PROMOTION_FLAGS {
                            moves.push(ChessMove::new(origin, push, flag));
                        }
                    } else {
                        moves.push(ChessMove::new(origin, push, MoveFlag::None));
                    }
                }
                if square_rank(origin) == home_rank {
                    let double = (origin as i8 + 2 * push_offset) as Square;
                    if !is_set(occupied, double) && is_set(mask, double) {
                        moves.push(ChessMove::new(origin, double, MoveFlag::DoublePawnPush));
                    }
                }
            }
        }

        // A pawn's attack squares mirror the enemy's attack sources.
        let mut captures = pawn_attack_sources(enemy, origin) & enemy_occupancy & mask;
        while captures != 0 {
            let destination = captures.trailing_zeros() as Square;
            captures &= captures - 1;
            if square_rank(destination) == promotion_rank {
                for flag in PROMOTION_FLAGS {
                    moves.push(ChessMove::new(origin, destination, flag));
                }
            } else {
                moves.push(ChessMove::new(origin, destination, MoveFlag::None));
            }
        }

        if let Some(vulnerable) = state.en_passant_square() {
            let same_rank = square_rank(vulnerable) == square_rank(origin);
            let adjacent = vulnerable.abs_diff(origin) == 1;
            // Legality is judged on the vulnerable pawn's square, so
            // capturing the checking double-pushed pawn stays available.
            if same_rank && adjacent && is_set(mask, vulnerable) {
                let destination = (vulnerable as i8 + push_offset) as Square;
                if !en_passant_exposes_king(state, mover, king_square, origin, vulnerable) {
                    moves.push(ChessMove::new(origin, destination, MoveFlag::EnPassant));
                }
            }
        }
    });

    (moves, in_check)
}

#[inline]
fn piece_mask(
    origin: Square,
    pinned: u64,
    pin_masks: &[u64; 64],
    in_check: bool,
    check_mask: u64,
) -> u64 {
    if is_set(pinned, origin) {
        if in_check {
            0
        } else {
            pin_masks[origin as usize]
        }
    } else {
        check_mask
    }
}

fn for_each_square(mut bitboard: u64, mut visit: impl FnMut(Square)) {
    while bitboard != 0 {
        let square = bitboard.trailing_zeros() as Square;
        bitboard &= bitboard - 1;
        visit(square);
    }
}

fn emit_plain(origin: Square, mut targets: u64, moves: &mut Vec<ChessMove>) {
    while targets != 0 {
        let destination = targets.trailing_zeros() as Square;
        targets &= targets - 1;
        moves.push(ChessMove::new(origin, destination, MoveFlag::None));
    }
}

/// Absolutely pinned pieces and, per pinned piece, its admissible ray
/// (squares between king and pinner, plus the pinner itself).
fn compute_pins(
    state: &GameState,
    mover: Color,
    king_square: Square,
    occupied: u64,
) -> (u64, [u64; 64]) {
    let enemy = mover.opposite();
    let own = state.occupancy_of(mover) & occupied;
    let mut pinned = 0u64;
    let mut pin_masks = [u64::MAX; 64];

    let orthogonal =
        state.pieces_of(enemy, PieceKind::Rook) | state.pieces_of(enemy, PieceKind::Queen);
    let mut pinners = xray_rook_attacks(occupied, own, king_square) & orthogonal;
    let diagonal =
        state.pieces_of(enemy, PieceKind::Bishop) | state.pieces_of(enemy, PieceKind::Queen);
    pinners |= xray_bishop_attacks(occupied, own, king_square) & diagonal;

    while pinners != 0 {
        let pinner = pinners.trailing_zeros() as Square;
        pinners &= pinners - 1;
        let ray = between_squares(king_square, pinner);
        let blocker = ray & own;
        if blocker != 0 {
            let blocker_square = blocker.trailing_zeros() as Square;
            pinned |= blocker;
            pin_masks[blocker_square as usize] = ray | single_bit(pinner);
        }
    }

    (pinned, pin_masks)
}

/// Every square the enemy attacks with `removed` (the defending king)
/// lifted out of the occupancy.
fn enemy_attack_map(state: &GameState, enemy: Color, removed: u64) -> u64 {
    let pawns = state.pieces_of(enemy, PieceKind::Pawn);
    let mut attacks = match enemy {
        Color::Light => ((pawns & !FILE_A) << 7) | ((pawns & !FILE_H) << 9),
        Color::Dark => ((pawns & !FILE_A) >> 9) | ((pawns & !FILE_H) >> 7),
    };
    for_each_square(state.pieces_of(enemy, PieceKind::Knight), |square| {
        attacks |= knight_attacks(square);
    });
    for_each_square(state.pieces_of(enemy, PieceKind::King), |square| {
        attacks |= king_attacks(square);
    });
    attacks |= slider_attacks_ignoring_king(
        state.all_occupied(),
        state.pieces_of(enemy, PieceKind::Rook),
        state.pieces_of(enemy, PieceKind::Bishop),
        state.pieces_of(enemy, PieceKind::Queen),
        removed,
    );
    attacks
}

/// Removing both pawns of an en-passant capture can uncover a rank attack on
/// the king that the per-piece pin logic never sees. Re-derive the pins with
/// the vulnerable pawn lifted off the board and reject the capture if the
/// capturing pawn turns out pinned.
fn en_passant_exposes_king(
    state: &GameState,
    mover: Color,
    king_square: Square,
    origin: Square,
    vulnerable: Square,
) -> bool {
    let occupied = state.all_occupied() & !single_bit(vulnerable);
    let (pinned, _) = compute_pins(state, mover, king_square, occupied);
    is_set(pinned, origin)
}

fn emit_castles(
    state: &GameState,
    mover: Color,
    enemy: Color,
    occupied: u64,
    moves: &mut Vec<ChessMove>,
) {
    struct CastleGate {
        right: u8,
        king_from: Square,
        king_to: Square,
        empty: &'static [Square],
        safe: &'static [Square],
    }

    let gates: [CastleGate; 2] = match mover {
        Color::Light => [
            CastleGate {
                right: CASTLE_LIGHT_KINGSIDE,
                king_from: 4,
                king_to: 6,
                empty: &[5, 6],
                safe: &[5, 6],
            },
            CastleGate {
                right: CASTLE_LIGHT_QUEENSIDE,
                king_from: 4,
                king_to: 2,
                empty: &[1, 2, 3],
                safe: &[2, 3],
            },
        ],
        Color::Dark => [
            CastleGate {
                right: CASTLE_DARK_KINGSIDE,
                king_from: 60,
                king_to: 62,
                empty: &[61, 62],
                safe: &[61, 62],
            },
            CastleGate {
                right: CASTLE_DARK_QUEENSIDE,
                king_from: 60,
                king_to: 58,
                empty: &[57, 58, 59],
                safe: &[58, 59],
            },
        ],
    };

    for gate in gates {
        if state.castling_rights() & gate.right == 0 {
            continue;
        }
        if gate.empty.iter().any(|&square| is_set(occupied, square)) {
            continue;
        }
        if gate
            .safe
            .iter()
            .any(|&square| state.is_square_attacked(square, enemy))
        {
            continue;
        }
        moves.push(ChessMove::new(gate.king_from, gate.king_to, MoveFlag::Castle));
    }
}
