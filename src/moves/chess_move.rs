//! Compact 16-bit move encoding.
//!
//! Layout, least significant bits first: six bits origin square, six bits
//! destination square, four bits move flag. The all-zero value doubles as the
//! null move and never describes a real move.

use crate::game_state::chess_types::{PieceKind, Square};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveFlag {
    None,
    EnPassant,
    Castle,
    DoublePawnPush,
    PromoteQueen,
    PromoteKnight,
    PromoteRook,
    PromoteBishop,
}

impl MoveFlag {
    #[inline]
    const fn bits(self) -> u16 {
        match self {
            MoveFlag::None => 0,
            MoveFlag::EnPassant => 1,
            MoveFlag::Castle => 2,
            MoveFlag::DoublePawnPush => 3,
            MoveFlag::PromoteQueen => 4,
            MoveFlag::PromoteKnight => 5,
            MoveFlag::PromoteRook => 6,
            MoveFlag::PromoteBishop => 7,
        }
    }

    #[inline]
    const fn from_bits(bits: u16) -> MoveFlag {
        match bits {
            1 => MoveFlag::EnPassant,
            2 => MoveFlag::Castle,
            3 => MoveFlag::DoublePawnPush,
            4 => MoveFlag::PromoteQueen,
            5 => MoveFlag::PromoteKnight,
            6 => MoveFlag::PromoteRook,
            7 => MoveFlag::PromoteBishop,
            _ => MoveFlag::None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChessMove(u16);

impl ChessMove {
    /// Sentinel move used before a search has found anything.
    pub const NULL: ChessMove = ChessMove(0);

    #[inline]
    pub const fn new(origin: Square, destination: Square, flag: MoveFlag) -> ChessMove {
        ChessMove((origin as u16) | ((destination as u16) << 6) | (flag.bits() << 12))
    }

    #[inline]
    pub const fn origin(self) -> Square {
        (self.0 & 0x3F) as Square
    }

    #[inline]
    pub const fn destination(self) -> Square {
        ((self.0 >> 6) & 0x3F) as Square
    }

    #[inline]
    pub const fn flag(self) -> MoveFlag {
        MoveFlag::from_bits(self.0 >> 12)
    }

    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_promotion(self) -> bool {
        (self.0 >> 12) >= 4
    }

    /// Piece the pawn becomes, for promotion moves only.
    #[inline]
    pub const fn promotion_piece(self) -> Option<PieceKind> {
        match self.flag() {
            MoveFlag::PromoteQueen => Some(PieceKind::Queen),
            MoveFlag::PromoteKnight => Some(PieceKind::Knight),
            MoveFlag::PromoteRook => Some(PieceKind::Rook),
            MoveFlag::PromoteBishop => Some(PieceKind::Bishop),
            _ => None,
        }
    }

    /// Raw encoded value, exposed for move ordering and hashing.
    #[inline]
    pub const fn raw(self) -> u16 {
        self.0
    }
}
