//! Long Algebraic Notation (LAN), e.g. `e2e4` or `a7a8q`.
//!
//! A LAN string carries no move flag, so parsing infers it from the board:
//! a pawn moving two ranks is a double push, a pawn stepping diagonally onto
//! an empty square is an en-passant capture, and a king crossing more than
//! one file is castling.

use crate::game_state::chess_types::{square_file, square_rank, PieceKind};
use crate::game_state::game_state::GameState;
use crate::moves::chess_move::{ChessMove, MoveFlag};
use crate::utils::algebraic::{algebraic_to_square, square_to_algebraic};

pub fn parse_lan(state: &GameState, lan: &str) -> Result<ChessMove, String> {
    if lan.len() != 4 && lan.len() != 5 {
        return Err(format!(
            "LAN move must be 4 or 5 characters, got '{lan}'"
        ));
    }
    let origin = algebraic_to_square(&lan[0..2])
        .map_err(|err| format!("Invalid origin in '{lan}': {err}"))?;
    let destination = algebraic_to_square(&lan[2..4])
        .map_err(|err| format!("Invalid destination in '{lan}': {err}"))?;

    let Some((color, piece)) = state.piece_on_square(origin) else {
        return Err(format!("No piece on origin square of '{lan}'"));
    };
    if color != state.side_to_move() {
        return Err(format!(
            "Piece on origin square of '{lan}' does not belong to the side to move"
        ));
    }

    let flag = if lan.len() == 5 {
        match &lan[4..5] {
            "q" => MoveFlag::PromoteQueen,
            "n" => MoveFlag::PromoteKnight,
            "r" => MoveFlag::PromoteRook,
            "b" => MoveFlag::PromoteBishop,
            suffix => {
                return Err(format!("Unrecognized promotion suffix '{suffix}' in '{lan}'"))
            }
        }
    } else if piece == PieceKind::Pawn
        && square_rank(origin).abs_diff(square_rank(destination)) == 2
    {
        MoveFlag::DoublePawnPush
    } else if piece == PieceKind::Pawn
        && square_file(origin) != square_file(destination)
        && state.piece_on_square(destination).is_none()
    {
        MoveFlag::EnPassant
    } else if piece == PieceKind::King
        && square_file(origin).abs_diff(square_file(destination)) > 1
    {
        MoveFlag::Castle
    } else {
        MoveFlag::None
    };

    Ok(ChessMove::new(origin, destination, flag))
}

pub fn move_to_lan(mv: ChessMove) -> String {
    let mut lan = format!(
        "{}{}",
        square_to_algebraic(mv.origin()),
        square_to_algebraic(mv.destination())
    );
    if let Some(promotion) = mv.promotion_piece() {
        lan.push(match promotion {
            PieceKind::Queen => 'q',
            PieceKind::Knight => 'n',
            PieceKind::Rook => 'r',
            _ => 'b',
        });
    }
    lan
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_from(fen: &str) -> GameState {
        GameState::from_fen(fen).expect("position should parse")
    }

    #[test]
    fn double_push_is_inferred_from_rank_delta() {
        let state = GameState::new_game();
        let mv = parse_lan(&state, "e2e4").expect("move should parse");
        assert_eq!(mv.flag(), MoveFlag::DoublePawnPush);
        assert_eq!(move_to_lan(mv), "e2e4");
    }

    #[test]
    fn en_passant_is_inferred_from_an_empty_diagonal() {
        let state = state_from("4k3/8/8/8/4Pp2/8/8/4K3 b - e3 0 1");
        let mv = parse_lan(&state, "f4e3").expect("move should parse");
        assert_eq!(mv.flag(), MoveFlag::EnPassant);
    }

    #[test]
    fn castling_is_inferred_from_the_king_file_jump() {
        let state = state_from("4k3/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        let short = parse_lan(&state, "e1g1").expect("move should parse");
        assert_eq!(short.flag(), MoveFlag::Castle);
        let long = parse_lan(&state, "e1c1").expect("move should parse");
        assert_eq!(long.flag(), MoveFlag::Castle);
        let step = parse_lan(&state, "e1d1").expect("move should parse");
        assert_eq!(step.flag(), MoveFlag::None);
    }

    #[test]
    fn promotion_suffix_round_trips() {
        let state = state_from("4k3/P7/8/8/8/8/8/4K3 w - - 0 1");
        let mv = parse_lan(&state, "a7a8n").expect("move should parse");
        assert_eq!(mv.flag(), MoveFlag::PromoteKnight);
        assert_eq!(move_to_lan(mv), "a7a8n");
    }

    #[test]
    fn malformed_lan_is_rejected() {
        let state = GameState::new_game();
        assert!(parse_lan(&state, "e2").is_err());
        assert!(parse_lan(&state, "e2e4qq").is_err());
        assert!(parse_lan(&state, "e2e4x").is_err());
        // Empty origin and wrong-color origin.
        assert!(parse_lan(&state, "e4e5").is_err());
        assert!(parse_lan(&state, "e7e5").is_err());
    }
}
