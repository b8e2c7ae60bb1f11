//! Standard Algebraic Notation rendering.
//!
//! Disambiguation and the check/mate suffix both work from real move
//! generation: the move is applied, the opponent's replies are generated to
//! classify '+' versus '#', and the move is undone again.

use crate::game_state::chess_types::{square_file, square_rank, PieceKind};
use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_generator::generate_legal_moves;
use crate::moves::chess_move::{ChessMove, MoveFlag};
use crate::utils::algebraic::square_to_algebraic;

pub fn move_to_san(state: &mut GameState, mv: ChessMove) -> Result<String, String> {
    let origin = mv.origin();
    let destination = mv.destination();
    let Some((_, piece)) = state.piece_on_square(origin) else {
        return Err(format!(
            "No piece on origin square {origin} to render as SAN"
        ));
    };

    let is_capture =
        mv.flag() == MoveFlag::EnPassant || state.piece_on_square(destination).is_some();

    let mut san = if mv.flag() == MoveFlag::Castle {
        if square_file(destination) == 6 {
            "O-O".to_string()
        } else {
            "O-O-O".to_string()
        }
    } else if piece == PieceKind::Pawn {
        let mut text = String::new();
        if is_capture {
            text.push((b'a' + square_file(origin)) as char);
            text.push('x');
        }
        text.push_str(&square_to_algebraic(destination));
        if let Some(promotion) = mv.promotion_piece() {
            text.push('=');
            text.push(piece_letter(promotion));
        }
        text
    } else {
        let mut text = String::new();
        text.push(piece_letter(piece));
        text.push_str(&disambiguator(state, mv, piece));
        if is_capture {
            text.push('x');
        }
        text.push_str(&square_to_algebraic(destination));
        text
    };

    // Apply the move to classify check against mate, then rewind.
    state.make_move(mv, true)?;
    let (replies, opponent_in_check) = generate_legal_moves(state, false, false);
    state.undo_move()?;
    if opponent_in_check {
        san.push(if replies.is_empty() { '#' } else { '+' });
    }

    Ok(san)
}

fn piece_letter(piece: PieceKind) -> char {
    match piece {
        PieceKind::Knight => 'N',
        PieceKind::Bishop => 'B',
        PieceKind::Rook => 'R',
        PieceKind::Queen => 'Q',
        PieceKind::King => 'K',
        PieceKind::Pawn => 'P',
    }
}

/// File and/or rank prefix separating this move from other legal moves of
/// the same piece type to the same destination.
fn disambiguator(state: &GameState, mv: ChessMove, piece: PieceKind) -> String {
    let (legal, _) = generate_legal_moves(state, false, false);
    let rivals: Vec<ChessMove> = legal
        .into_iter()
        .filter(|other| {
            other.destination() == mv.destination()
                && other.origin() != mv.origin()
                && state
                    .piece_on_square(other.origin())
                    .map(|(_, kind)| kind)
                    == Some(piece)
        })
        .collect();
    if rivals.is_empty() {
        return String::new();
    }

    let origin = mv.origin();
    let file_shared = rivals
        .iter()
        .any(|other| square_file(other.origin()) == square_file(origin));
    let rank_shared = rivals
        .iter()
        .any(|other| square_rank(other.origin()) == square_rank(origin));

    let file_char = (b'a' + square_file(origin)) as char;
    let rank_char = (b'1' + square_rank(origin)) as char;
    if !file_shared {
        file_char.to_string()
    } else if !rank_shared {
        rank_char.to_string()
    } else {
        format!("{file_char}{rank_char}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::long_algebraic::parse_lan;

    fn state_from(fen: &str) -> GameState {
        GameState::from_fen(fen).expect("position should parse")
    }

    fn san_of(state: &mut GameState, lan: &str) -> String {
        let mv = parse_lan(state, lan).expect("move should parse");
        move_to_san(state, mv).expect("SAN should render")
    }

    #[test]
    fn quiet_pawn_and_piece_moves() {
        let mut state = GameState::new_game();
        assert_eq!(san_of(&mut state, "e2e4"), "e4");
        assert_eq!(san_of(&mut state, "g1f3"), "Nf3");
    }

    #[test]
    fn pawn_captures_carry_the_origin_file() {
        let mut state = state_from("4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1");
        assert_eq!(san_of(&mut state, "e4d5"), "exd5");
    }

    #[test]
    fn en_passant_renders_as_a_capture() {
        let mut state = state_from("4k3/8/8/8/4Pp2/8/8/4K3 b - e3 0 1");
        assert_eq!(san_of(&mut state, "f4e3"), "fxe3");
    }

    #[test]
    fn file_disambiguation_between_knights() {
        let mut state = state_from("4k3/8/8/8/8/2N1N3/8/4K3 w - - 0 1");
        assert_eq!(san_of(&mut state, "c3d5"), "Ncd5");
    }

    #[test]
    fn rank_disambiguation_between_rooks_on_one_file() {
        let mut state = state_from("4k3/8/8/R7/8/8/8/R3K3 w - - 0 1");
        assert_eq!(san_of(&mut state, "a1a3"), "R1a3");
    }

    #[test]
    fn castling_and_checks() {
        let mut state = state_from("4k3/8/8/8/8/8/8/4K2R w K - 0 1");
        assert_eq!(san_of(&mut state, "e1g1"), "O-O");

        let mut check = state_from("4k3/8/8/8/8/8/8/R3K3 w - - 0 1");
        assert_eq!(san_of(&mut check, "a1a8"), "Ra8+");
    }

    #[test]
    fn promotion_with_mate_suffix() {
        // The promoted queen delivers mate on the back rank.
        let mut state = state_from("k7/6P1/1K6/8/8/8/8/8 w - - 0 1");
        assert_eq!(san_of(&mut state, "g7g8q"), "g8=Q#");
    }

    #[test]
    fn fools_mate_final_move() {
        let mut state =
            state_from("rnbqkbnr/pppp1ppp/8/4p3/6P1/5P2/PPPPP2P/RNBQKBNR b KQkq g3 0 2");
        assert_eq!(san_of(&mut state, "d8h4"), "Qh4#");
    }
}
