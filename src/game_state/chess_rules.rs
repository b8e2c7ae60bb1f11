//! Canonical chess-rule constants.

/// Standard chess starting position in Forsyth-Edwards Notation (FEN).
pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Halfmove-clock ceiling at which the fifty-move rule applies. The clock is
/// clamped to this value, it never counts past it.
pub const MAX_QUIET_PLIES: u16 = 50;
