//! Bitboard position model with reversible move application.
//!
//! The position is twelve piece bitboards plus packed counters (side to move,
//! castling rights, en-passant square, halfmove clock, fullmove number) and an
//! incrementally maintained Zobrist hash. `make_move` pushes a snapshot of the
//! irreversible state so `undo_move` can rewind exactly, which the search
//! relies on for its make/recurse/undo discipline.
//!
//! The en-passant square stored here is the LANDING square of the pawn that
//! just double-pushed (the vulnerable pawn), not the skipped-over square that
//! FEN prints. The FEN boundary converts between the two conventions.

use crate::game_state::chess_rules::MAX_QUIET_PLIES;
use crate::game_state::chess_types::{
    square_file, CastlingRights, Color, PieceKind, Square, ALL_PIECE_KINDS, CASTLE_DARK_KINGSIDE,
    CASTLE_DARK_QUEENSIDE, CASTLE_LIGHT_KINGSIDE, CASTLE_LIGHT_QUEENSIDE,
};
use crate::game_state::repetition::RepetitionStack;
use crate::game_state::undo_state::UndoState;
use crate::move_generation::attack_tables::{
    bishop_attacks, bishops_share_square_color, is_set, king_attacks, knight_attacks,
    pawn_attack_sources, rook_attacks, single_bit,
};
use crate::moves::chess_move::{ChessMove, MoveFlag};
use crate::search::zobrist::{
    castling_key, en_passant_file_key, piece_square_key, side_to_move_key,
};

#[derive(Debug, Clone)]
pub struct GameState {
    pieces: [[u64; 6]; 2],
    occupancy: [u64; 2],
    side_to_move: Color,
    castling_rights: CastlingRights,
    en_passant_square: Option<Square>,
    halfmove_clock: u16,
    fullmove_number: u16,
    zobrist_key: u64,
    undo_stack: Vec<UndoState>,
    pub repetitions: RepetitionStack,
}

impl GameState {
    /// Standard starting position.
    pub fn new_game() -> GameState {
        let light = [
            0x0000_0000_0000_FF00, // pawns
            0x0000_0000_0000_0042, // knights
            0x0000_0000_0000_0024, // bishops
            0x0000_0000_0000_0081, // rooks
            0x0000_0000_0000_0008, // queen on d1
            0x0000_0000_0000_0010, // king on e1
        ];
        let dark = [
            0x00FF_0000_0000_0000,
            0x4200_0000_0000_0000,
            0x2400_0000_0000_0000,
            0x8100_0000_0000_0000,
            0x0800_0000_0000_0000,
            0x1000_0000_0000_0000,
        ];
        let all_rights = CASTLE_LIGHT_KINGSIDE
            | CASTLE_LIGHT_QUEENSIDE
            | CASTLE_DARK_KINGSIDE
            | CASTLE_DARK_QUEENSIDE;
        GameState::from_parts([light, dark], Color::Light, all_rights, None, 0, 1)
    }

    /// Assembles a position from already-validated parts, recomputing the
    /// occupancy caches and Zobrist hash and seeding the repetition history.
    pub(crate) fn from_parts(
        pieces: [[u64; 6]; 2],
        side_to_move: Color,
        castling_rights: CastlingRights,
        en_passant_square: Option<Square>,
        halfmove_clock: u16,
        fullmove_number: u16,
    ) -> GameState {
        let mut occupancy = [0u64; 2];
        for color in [Color::Light, Color::Dark] {
            for kind in ALL_PIECE_KINDS {
                occupancy[color.index()] |= pieces[color.index()][kind.index()];
            }
        }
        let mut state = GameState {
            pieces,
            occupancy,
            side_to_move,
            castling_rights,
            en_passant_square,
            halfmove_clock,
            fullmove_number,
            zobrist_key: 0,
            undo_stack: Vec::new(),
            repetitions: RepetitionStack::new(),
        };
        state.zobrist_key = state.compute_zobrist_key();
        state.repetitions.push(state.zobrist_key, true);
        state
    }

    /// Parses a FEN string into a position.
    pub fn from_fen(fen: &str) -> Result<GameState, String> {
        crate::utils::fen_parser::parse_fen(fen)
    }

    /// Serializes the position to FEN, including the en-passant field.
    pub fn to_fen(&self) -> String {
        crate::utils::fen_generator::generate_fen(self, true)
    }

    #[inline]
    pub fn pieces_of(&self, color: Color, kind: PieceKind) -> u64 {
        self.pieces[color.index()][kind.index()]
    }

    #[inline]
    pub fn occupancy_of(&self, color: Color) -> u64 {
        self.occupancy[color.index()]
    }

    #[inline]
    pub fn all_occupied(&self) -> u64 {
        self.occupancy[0] | self.occupancy[1]
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    /// Landing square of the pawn vulnerable to en-passant capture, if any.
    #[inline]
    pub fn en_passant_square(&self) -> Option<Square> {
        self.en_passant_square
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u16 {
        self.fullmove_number
    }

    #[inline]
    pub fn zobrist_key(&self) -> u64 {
        self.zobrist_key
    }

    pub fn piece_on_square(&self, square: Square) -> Option<(Color, PieceKind)> {
        for color in [Color::Light, Color::Dark] {
            if !is_set(self.occupancy[color.index()], square) {
                continue;
            }
            for kind in ALL_PIECE_KINDS {
                if is_set(self.pieces[color.index()][kind.index()], square) {
                    return Some((color, kind));
                }
            }
        }
        None
    }

    /// Square of the given side's king, `None` for degenerate positions.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        let king = self.pieces_of(color, PieceKind::King);
        if king == 0 {
            None
        } else {
            Some(king.trailing_zeros() as Square)
        }
    }

    /// Bitboard of all `by` pieces attacking `square`.
    pub fn attackers_of_square(&self, square: Square, by: Color) -> u64 {
        let occupied = self.all_occupied();
        let mut attackers =
            pawn_attack_sources(by, square) & self.pieces_of(by, PieceKind::Pawn);
        attackers |= knight_attacks(square) & self.pieces_of(by, PieceKind::Knight);
        attackers |= king_attacks(square) & self.pieces_of(by, PieceKind::King);
        let diagonal =
            self.pieces_of(by, PieceKind::Bishop) | self.pieces_of(by, PieceKind::Queen);
        attackers |= bishop_attacks(occupied, square) & diagonal;
        let orthogonal =
            self.pieces_of(by, PieceKind::Rook) | self.pieces_of(by, PieceKind::Queen);
        attackers |= rook_attacks(occupied, square) & orthogonal;
        attackers
    }

    pub fn is_square_attacked(&self, square: Square, by: Color) -> bool {
        self.attackers_of_square(square, by) != 0
    }

    /// True if a pawn of `by` attacks `square`. Cheaper than the full
    /// attacker query, used by move ordering.
    pub fn is_attacked_by_pawn(&self, square: Square, by: Color) -> bool {
        pawn_attack_sources(by, square) & self.pieces_of(by, PieceKind::Pawn) != 0
    }

    /// True when the side to move's king is attacked.
    pub fn is_in_check(&self) -> bool {
        match self.king_square(self.side_to_move) {
            Some(king) => self.is_square_attacked(king, self.side_to_move.opposite()),
            None => false,
        }
    }

    /// Neither side can force mate: bare kings, a lone minor piece, or
    /// bishops all standing on squares of one color.
    pub fn insufficient_material(&self) -> bool {
        for color in [Color::Light, Color::Dark] {
            let heavy = self.pieces_of(color, PieceKind::Pawn)
                | self.pieces_of(color, PieceKind::Rook)
                | self.pieces_of(color, PieceKind::Queen);
            if heavy != 0 {
                return false;
            }
        }
        let knights = self.pieces_of(Color::Light, PieceKind::Knight)
            | self.pieces_of(Color::Dark, PieceKind::Knight);
        let bishops = self.pieces_of(Color::Light, PieceKind::Bishop)
            | self.pieces_of(Color::Dark, PieceKind::Bishop);
        if knights == 0 && bishops == 0 {
            return true;
        }
        if bishops == 0 && knights.count_ones() == 1 {
            return true;
        }
        if knights == 0 && bishops_share_square_color(bishops) {
            return true;
        }
        false
    }

    /// Full hash recomputation, used at setup and to validate the
    /// incremental updates in tests.
    pub fn compute_zobrist_key(&self) -> u64 {
        let mut key = 0u64;
        for color in [Color::Light, Color::Dark] {
            for kind in ALL_PIECE_KINDS {
                let mut bitboard = self.pieces_of(color, kind);
                while bitboard != 0 {
                    let square = bitboard.trailing_zeros() as Square;
                    bitboard &= bitboard - 1;
                    key ^= piece_square_key(color, kind, square);
                }
            }
        }
        key ^= castling_key(self.castling_rights);
        if let Some(ep) = self.en_passant_square {
            key ^= en_passant_file_key(square_file(ep));
        }
        if self.side_to_move == Color::Dark {
            key ^= side_to_move_key();
        }
        key
    }

    #[inline]
    fn place(&mut self, color: Color, kind: PieceKind, square: Square) {
        let bit = single_bit(square);
        self.pieces[color.index()][kind.index()] |= bit;
        self.occupancy[color.index()] |= bit;
    }

    #[inline]
    fn lift(&mut self, color: Color, kind: PieceKind, square: Square) {
        let bit = single_bit(square);
        self.pieces[color.index()][kind.index()] &= !bit;
        self.occupancy[color.index()] &= !bit;
    }

    /// Applies a legal move. `in_search` controls repetition-history handling
    /// on irreversible moves: the search marks a segment boundary where game
    /// play wipes the history entirely.
    pub fn make_move(&mut self, mv: ChessMove, in_search: bool) -> Result<(), String> {
        let mover = self.side_to_move;
        let enemy = mover.opposite();
        let origin = mv.origin();
        let destination = mv.destination();

        let Some((piece_color, moved_piece)) = self.piece_on_square(origin) else {
            return Err(format!(
                "No piece on origin square {origin} for move {:#06x}",
                mv.raw()
            ));
        };
        if piece_color != mover {
            return Err(format!(
                "Piece on origin square {origin} does not belong to the side to move"
            ));
        }

        let captured_piece = if mv.flag() == MoveFlag::EnPassant {
            Some(PieceKind::Pawn)
        } else {
            self.piece_on_square(destination).map(|(_, kind)| kind)
        };

        self.undo_stack.push(UndoState {
            mv,
            moved_piece,
            captured_piece,
            prev_castling_rights: self.castling_rights,
            prev_en_passant_square: self.en_passant_square,
            prev_halfmove_clock: self.halfmove_clock,
            prev_zobrist_key: self.zobrist_key,
        });

        // Remove the captured piece first so the destination bit is free.
        if let Some(captured) = captured_piece {
            let capture_square = if mv.flag() == MoveFlag::EnPassant {
                match self.en_passant_square {
                    Some(ep) => ep,
                    None => {
                        self.undo_stack.pop();
                        return Err("En-passant move with no vulnerable pawn".to_string());
                    }
                }
            } else {
                destination
            };
            self.lift(enemy, captured, capture_square);
            self.zobrist_key ^= piece_square_key(enemy, captured, capture_square);
        }

        self.lift(mover, moved_piece, origin);
        self.zobrist_key ^= piece_square_key(mover, moved_piece, origin);
        let landed_piece = mv.promotion_piece().unwrap_or(moved_piece);
        self.place(mover, landed_piece, destination);
        self.zobrist_key ^= piece_square_key(mover, landed_piece, destination);

        if mv.flag() == MoveFlag::Castle {
            let (rook_from, rook_to) = castle_rook_squares(destination);
            self.lift(mover, PieceKind::Rook, rook_from);
            self.zobrist_key ^= piece_square_key(mover, PieceKind::Rook, rook_from);
            self.place(mover, PieceKind::Rook, rook_to);
            self.zobrist_key ^= piece_square_key(mover, PieceKind::Rook, rook_to);
        }

        let new_rights = updated_castling_rights(
            self.castling_rights,
            mover,
            moved_piece,
            origin,
            destination,
            captured_piece,
        );
        if new_rights != self.castling_rights {
            self.zobrist_key ^= castling_key(self.castling_rights);
            self.zobrist_key ^= castling_key(new_rights);
            self.castling_rights = new_rights;
        }

        // The en-passant window lasts exactly one ply.
        if let Some(ep) = self.en_passant_square.take() {
            self.zobrist_key ^= en_passant_file_key(square_file(ep));
        }
        if mv.flag() == MoveFlag::DoublePawnPush {
            self.en_passant_square = Some(destination);
            self.zobrist_key ^= en_passant_file_key(square_file(destination));
        }

        let irreversible = moved_piece == PieceKind::Pawn || captured_piece.is_some();
        if irreversible {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = (self.halfmove_clock + 1).min(MAX_QUIET_PLIES);
        }
        if mover == Color::Dark {
            self.fullmove_number += 1;
        }

        self.side_to_move = enemy;
        self.zobrist_key ^= side_to_move_key();

        if irreversible {
            if in_search {
                self.repetitions.push(self.zobrist_key, true);
            } else {
                self.repetitions.clear();
            }
        } else {
            self.repetitions.push(self.zobrist_key, false);
        }

        Ok(())
    }

    /// Rewinds the most recent `make_move`.
    pub fn undo_move(&mut self) -> Result<(), String> {
        let Some(undo) = self.undo_stack.pop() else {
            return Err("No move to undo".to_string());
        };
        let mv = undo.mv;
        let mover = self.side_to_move.opposite();
        let enemy = self.side_to_move;
        let origin = mv.origin();
        let destination = mv.destination();

        let landed_piece = mv.promotion_piece().unwrap_or(undo.moved_piece);
        self.lift(mover, landed_piece, destination);
        self.place(mover, undo.moved_piece, origin);

        if let Some(captured) = undo.captured_piece {
            let capture_square = if mv.flag() == MoveFlag::EnPassant {
                match undo.prev_en_passant_square {
                    Some(ep) => ep,
                    None => return Err("En-passant undo with no vulnerable pawn".to_string()),
                }
            } else {
                destination
            };
            self.place(enemy, captured, capture_square);
        }

        if mv.flag() == MoveFlag::Castle {
            let (rook_from, rook_to) = castle_rook_squares(destination);
            self.lift(mover, PieceKind::Rook, rook_to);
            self.place(mover, PieceKind::Rook, rook_from);
        }

        if mover == Color::Dark {
            self.fullmove_number -= 1;
        }
        self.side_to_move = mover;
        self.castling_rights = undo.prev_castling_rights;
        self.en_passant_square = undo.prev_en_passant_square;
        self.halfmove_clock = undo.prev_halfmove_clock;
        self.zobrist_key = undo.prev_zobrist_key;
        self.repetitions.pop();
        Ok(())
    }
}

/// Rook relocation for a castling king landing on `king_destination`.
fn castle_rook_squares(king_destination: Square) -> (Square, Square) {
    match king_destination {
        2 => (0, 3),
        6 => (7, 5),
        58 => (56, 59),
        _ => (63, 61),
    }
}

fn updated_castling_rights(
    rights: CastlingRights,
    mover: Color,
    moved_piece: PieceKind,
    origin: Square,
    destination: Square,
    captured_piece: Option<PieceKind>,
) -> CastlingRights {
    let mut rights = rights;
    if moved_piece == PieceKind::King {
        rights &= match mover {
            Color::Light => !(CASTLE_LIGHT_KINGSIDE | CASTLE_LIGHT_QUEENSIDE),
            Color::Dark => !(CASTLE_DARK_KINGSIDE | CASTLE_DARK_QUEENSIDE),
        };
    }
    if moved_piece == PieceKind::Rook {
        rights &= !rook_home_right(origin);
    }
    if captured_piece == Some(PieceKind::Rook) {
        rights &= !rook_home_right(destination);
    }
    rights
}

fn rook_home_right(square: Square) -> CastlingRights {
    match square {
        0 => CASTLE_LIGHT_QUEENSIDE,
        7 => CASTLE_LIGHT_KINGSIDE,
        56 => CASTLE_DARK_QUEENSIDE,
        63 => CASTLE_DARK_KINGSIDE,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::algebraic::algebraic_to_square;

    fn sq(name: &str) -> Square {
        algebraic_to_square(name).expect("square should parse")
    }

    fn push(state: &mut GameState, from: &str, to: &str, flag: MoveFlag) {
        let mv = ChessMove::new(sq(from), sq(to), flag);
        state.make_move(mv, false).expect("move should apply");
    }

    #[test]
    fn new_game_matches_starting_fen() {
        let state = GameState::new_game();
        assert_eq!(
            state.to_fen(),
            crate::game_state::chess_rules::STARTING_POSITION_FEN
        );
        assert_eq!(state.zobrist_key(), state.compute_zobrist_key());
    }

    #[test]
    fn make_then_undo_restores_everything() {
        let mut state = GameState::new_game();
        let before_fen = state.to_fen();
        let before_key = state.zobrist_key();

        push(&mut state, "e2", "e4", MoveFlag::DoublePawnPush);
        assert_ne!(state.zobrist_key(), before_key);
        state.undo_move().expect("undo should succeed");

        assert_eq!(state.to_fen(), before_fen);
        assert_eq!(state.zobrist_key(), before_key);
        assert_eq!(state.side_to_move(), Color::Light);
    }

    #[test]
    fn incremental_hash_matches_recomputation() {
        let mut state = GameState::new_game();
        push(&mut state, "e2", "e4", MoveFlag::DoublePawnPush);
        push(&mut state, "b8", "c6", MoveFlag::None);
        push(&mut state, "g1", "f3", MoveFlag::None);
        push(&mut state, "d7", "d5", MoveFlag::DoublePawnPush);
        push(&mut state, "e4", "d5", MoveFlag::None);
        assert_eq!(state.zobrist_key(), state.compute_zobrist_key());
    }

    #[test]
    fn double_push_opens_a_one_ply_en_passant_window() {
        let mut state = GameState::new_game();
        push(&mut state, "e2", "e4", MoveFlag::DoublePawnPush);
        assert_eq!(state.en_passant_square(), Some(sq("e4")));
        push(&mut state, "g8", "f6", MoveFlag::None);
        assert_eq!(state.en_passant_square(), None);
        assert_eq!(state.zobrist_key(), state.compute_zobrist_key());
    }

    #[test]
    fn en_passant_capture_removes_the_vulnerable_pawn() {
        let mut state = GameState::from_fen("4k3/8/8/8/4p3/8/3P4/4K3 w - - 0 1")
            .expect("position should parse");
        push(&mut state, "d2", "d4", MoveFlag::DoublePawnPush);
        push(&mut state, "e4", "d3", MoveFlag::EnPassant);

        assert_eq!(state.piece_on_square(sq("d4")), None);
        assert_eq!(
            state.piece_on_square(sq("d3")),
            Some((Color::Dark, PieceKind::Pawn))
        );
        assert_eq!(state.zobrist_key(), state.compute_zobrist_key());

        state.undo_move().expect("undo should succeed");
        assert_eq!(
            state.piece_on_square(sq("d4")),
            Some((Color::Light, PieceKind::Pawn))
        );
        assert_eq!(
            state.piece_on_square(sq("e4")),
            Some((Color::Dark, PieceKind::Pawn))
        );
    }

    #[test]
    fn castling_moves_rook_and_clears_rights() {
        let mut state = GameState::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1")
            .expect("position should parse");
        push(&mut state, "e1", "g1", MoveFlag::Castle);

        assert_eq!(
            state.piece_on_square(sq("f1")),
            Some((Color::Light, PieceKind::Rook))
        );
        assert_eq!(state.piece_on_square(sq("h1")), None);
        assert_eq!(
            state.castling_rights() & (CASTLE_LIGHT_KINGSIDE | CASTLE_LIGHT_QUEENSIDE),
            0
        );
        assert_eq!(state.zobrist_key(), state.compute_zobrist_key());

        state.undo_move().expect("undo should succeed");
        assert_eq!(
            state.piece_on_square(sq("h1")),
            Some((Color::Light, PieceKind::Rook))
        );
        assert_ne!(state.castling_rights() & CASTLE_LIGHT_KINGSIDE, 0);
    }

    #[test]
    fn capturing_a_home_rook_strips_the_right() {
        let mut state = GameState::from_fen("r3k2r/8/8/8/8/8/6q1/R3K2R b KQkq - 0 1")
            .expect("position should parse");
        push(&mut state, "g2", "h1", MoveFlag::None);
        assert_eq!(state.castling_rights() & CASTLE_LIGHT_KINGSIDE, 0);
        assert_ne!(state.castling_rights() & CASTLE_LIGHT_QUEENSIDE, 0);
    }

    #[test]
    fn promotion_swaps_pawn_for_chosen_piece() {
        let mut state =
            GameState::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").expect("position should parse");
        push(&mut state, "a7", "a8", MoveFlag::PromoteQueen);
        assert_eq!(
            state.piece_on_square(sq("a8")),
            Some((Color::Light, PieceKind::Queen))
        );
        assert_eq!(state.pieces_of(Color::Light, PieceKind::Pawn), 0);

        state.undo_move().expect("undo should succeed");
        assert_eq!(
            state.piece_on_square(sq("a7")),
            Some((Color::Light, PieceKind::Pawn))
        );
        assert_eq!(state.pieces_of(Color::Light, PieceKind::Queen), 0);
    }

    #[test]
    fn halfmove_and_fullmove_counters() {
        let mut state = GameState::new_game();
        push(&mut state, "g1", "f3", MoveFlag::None);
        assert_eq!(state.halfmove_clock(), 1);
        assert_eq!(state.fullmove_number(), 1);
        push(&mut state, "b8", "c6", MoveFlag::None);
        assert_eq!(state.halfmove_clock(), 2);
        assert_eq!(state.fullmove_number(), 2);
        push(&mut state, "e2", "e4", MoveFlag::DoublePawnPush);
        assert_eq!(state.halfmove_clock(), 0);
    }

    #[test]
    fn insufficient_material_cases() {
        let bare_kings =
            GameState::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").expect("position should parse");
        assert!(bare_kings.insufficient_material());

        let lone_knight =
            GameState::from_fen("4k3/8/8/8/8/8/8/2N1K3 w - - 0 1").expect("position should parse");
        assert!(lone_knight.insufficient_material());

        let lone_bishop =
            GameState::from_fen("4k3/8/8/8/8/8/8/2B1K3 w - - 0 1").expect("position should parse");
        assert!(lone_bishop.insufficient_material());

        // Bishops on c1 and f8 both stand on dark squares.
        let same_color_bishops = GameState::from_fen("4kb2/8/8/8/8/8/8/2B1K3 w - - 0 1")
            .expect("position should parse");
        assert!(same_color_bishops.insufficient_material());

        let opposite_bishops = GameState::from_fen("4k1b1/8/8/8/8/8/8/2B1K3 w - - 0 1")
            .expect("position should parse");
        assert!(!opposite_bishops.insufficient_material());

        let with_pawn =
            GameState::from_fen("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1").expect("position should parse");
        assert!(!with_pawn.insufficient_material());
    }

    #[test]
    fn moving_a_wrong_color_piece_is_rejected() {
        let mut state = GameState::new_game();
        let mv = ChessMove::new(sq("e7"), sq("e5"), MoveFlag::DoublePawnPush);
        assert!(state.make_move(mv, false).is_err());
    }
}
