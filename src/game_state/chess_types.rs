//! Fundamental chess domain types shared across the crate.
//!
//! Squares are indexed rank-major with `0 == a1` and `63 == h8`.

/// Board square index in `0..=63`.
pub type Square = u8;

/// Castling rights packed as four independent bits.
pub type CastlingRights = u8;

pub const CASTLE_LIGHT_KINGSIDE: CastlingRights = 0b0001;
pub const CASTLE_LIGHT_QUEENSIDE: CastlingRights = 0b0010;
pub const CASTLE_DARK_KINGSIDE: CastlingRights = 0b0100;
pub const CASTLE_DARK_QUEENSIDE: CastlingRights = 0b1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Light,
    Dark,
}

impl Color {
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Color::Light => 0,
            Color::Dark => 1,
        }
    }

    #[inline]
    pub const fn opposite(self) -> Color {
        match self {
            Color::Light => Color::Dark,
            Color::Dark => Color::Light,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            PieceKind::Pawn => 0,
            PieceKind::Knight => 1,
            PieceKind::Bishop => 2,
            PieceKind::Rook => 3,
            PieceKind::Queen => 4,
            PieceKind::King => 5,
        }
    }

    /// Queen, rook, and bishop attack along rays.
    #[inline]
    pub const fn is_slider(self) -> bool {
        matches!(self, PieceKind::Queen | PieceKind::Rook | PieceKind::Bishop)
    }
}

/// All piece kinds in bitboard index order.
pub const ALL_PIECE_KINDS: [PieceKind; 6] = [
    PieceKind::Pawn,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Rook,
    PieceKind::Queen,
    PieceKind::King,
];

#[inline]
pub const fn square_rank(square: Square) -> u8 {
    square / 8
}

#[inline]
pub const fn square_file(square: Square) -> u8 {
    square % 8
}
