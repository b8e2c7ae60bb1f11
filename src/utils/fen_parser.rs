//! Forsyth-Edwards Notation parsing.
//!
//! Validates all six FEN fields and assembles a `GameState`. The en-passant
//! field names the skipped-over square; internally the position stores the
//! double-pushed pawn's landing square, so rank 3 maps up a rank and rank 6
//! maps down a rank.

use crate::game_state::chess_types::{
    CastlingRights, Color, PieceKind, CASTLE_DARK_KINGSIDE, CASTLE_DARK_QUEENSIDE,
    CASTLE_LIGHT_KINGSIDE, CASTLE_LIGHT_QUEENSIDE,
};
use crate::game_state::game_state::GameState;
use crate::utils::algebraic::algebraic_to_square;

pub fn parse_fen(fen: &str) -> Result<GameState, String> {
    let fields: Vec<&str> = fen.split_whitespace().collect();
    if fields.len() != 6 {
        return Err(format!(
            "FEN must have exactly 6 fields, got {}: '{fen}'",
            fields.len()
        ));
    }

    let pieces = parse_placement(fields[0])?;
    let side_to_move = parse_side(fields[1])?;
    let castling_rights = parse_castling(fields[2])?;
    let en_passant_square = parse_en_passant(fields[3])?;
    let halfmove_clock: u16 = fields[4]
        .parse()
        .map_err(|_| format!("Invalid halfmove clock '{}'", fields[4]))?;
    let fullmove_number: u16 = fields[5]
        .parse()
        .map_err(|_| format!("Invalid fullmove number '{}'", fields[5]))?;

    Ok(GameState::from_parts(
        pieces,
        side_to_move,
        castling_rights,
        en_passant_square,
        halfmove_clock,
        fullmove_number,
    ))
}

fn parse_placement(placement: &str) -> Result<[[u64; 6]; 2], String> {
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(format!(
            "Piece placement must have 8 ranks, got {}",
            ranks.len()
        ));
    }

    let mut pieces = [[0u64; 6]; 2];
    for (row, rank_text) in ranks.iter().enumerate() {
        let rank = 7 - row as u8;
        let mut file = 0u8;
        for symbol in rank_text.chars() {
            if let Some(skip) = symbol.to_digit(10) {
                if skip == 0 || skip > 8 {
                    return Err(format!("Invalid empty-square count '{symbol}'"));
                }
                file += skip as u8;
                continue;
            }
            if file >= 8 {
                return Err(format!("Rank '{rank_text}' overflows 8 files"));
            }
            let (color, kind) = piece_from_symbol(symbol)?;
            pieces[color.index()][kind.index()] |= 1u64 << (rank * 8 + file);
            file += 1;
        }
        if file != 8 {
            return Err(format!("Rank '{rank_text}' covers {file} files, expected 8"));
        }
    }
    Ok(pieces)
}

fn piece_from_symbol(symbol: char) -> Result<(Color, PieceKind), String> {
    let color = if symbol.is_ascii_uppercase() {
        Color::Light
    } else {
        Color::Dark
    };
    let kind = match symbol.to_ascii_lowercase() {
        'p' => PieceKind::Pawn,
        'n' => PieceKind::Knight,
        'b' => PieceKind::Bishop,
        'r' => PieceKind::Rook,
        'q' => PieceKind::Queen,
        'k' => PieceKind::King,
        _ => return Err(format!("Invalid piece symbol '{symbol}'")),
    };
    Ok((color, kind))
}

fn parse_side(field: &str) -> Result<Color, String> {
    match field {
        "w" => Ok(Color::Light),
        "b" => Ok(Color::Dark),
        _ => Err(format!("Invalid side-to-move field '{field}'")),
    }
}

fn parse_castling(field: &str) -> Result<CastlingRights, String> {
    if field == "-" {
        return Ok(0);
    }
    let mut rights = 0;
    for symbol in field.chars() {
        rights |= match symbol {
            'K' => CASTLE_LIGHT_KINGSIDE,
            'Q' => CASTLE_LIGHT_QUEENSIDE,
            'k' => CASTLE_DARK_KINGSIDE,
            'q' => CASTLE_DARK_QUEENSIDE,
            _ => return Err(format!("Invalid castling symbol '{symbol}'")),
        };
    }
    Ok(rights)
}

fn parse_en_passant(field: &str) -> Result<Option<u8>, String> {
    if field == "-" {
        return Ok(None);
    }
    let skipped = algebraic_to_square(field)
        .map_err(|err| format!("Invalid en-passant field '{field}': {err}"))?;
    // The field names the skipped square; store the pawn's landing square.
    match skipped / 8 {
        2 => Ok(Some(skipped + 8)),
        5 => Ok(Some(skipped - 8)),
        _ => Err(format!(
            "En-passant square '{field}' must be on rank 3 or rank 6"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::utils::algebraic::algebraic_to_square;

    #[test]
    fn starting_position_round_trips() {
        let state = parse_fen(STARTING_POSITION_FEN).expect("starting FEN should parse");
        assert_eq!(state.to_fen(), STARTING_POSITION_FEN);
        assert_eq!(state.side_to_move(), Color::Light);
        assert_eq!(state.castling_rights(), 0b1111);
        assert_eq!(state.halfmove_clock(), 0);
        assert_eq!(state.fullmove_number(), 1);
    }

    #[test]
    fn complex_position_round_trips() {
        let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
        let state = parse_fen(fen).expect("position should parse");
        assert_eq!(state.to_fen(), fen);
    }

    #[test]
    fn en_passant_field_maps_to_landing_square() {
        let after_light_push = parse_fen("4k3/8/8/8/4P3/8/8/4K3 b - e3 0 1")
            .expect("position should parse");
        assert_eq!(
            after_light_push.en_passant_square(),
            Some(algebraic_to_square("e4").expect("e4 should parse"))
        );
        assert_eq!(after_light_push.to_fen(), "4k3/8/8/8/4P3/8/8/4K3 b - e3 0 1");

        let after_dark_push = parse_fen("4k3/8/8/2p5/8/8/8/4K3 w - c6 0 2")
            .expect("position should parse");
        assert_eq!(
            after_dark_push.en_passant_square(),
            Some(algebraic_to_square("c5").expect("c5 should parse"))
        );
        assert_eq!(after_dark_push.to_fen(), "4k3/8/8/2p5/8/8/8/4K3 w - c6 0 2");
    }

    #[test]
    fn parsed_hash_seeds_repetition_history() {
        let state = parse_fen(STARTING_POSITION_FEN).expect("starting FEN should parse");
        assert_eq!(state.repetitions.len(), 1);
        assert!(!state.repetitions.is_threefold());
    }

    #[test]
    fn malformed_fens_are_rejected() {
        // Wrong field count.
        assert!(parse_fen("8/8/8/8/8/8/8/8 w - -").is_err());
        // Seven ranks.
        assert!(parse_fen("8/8/8/8/8/8/8 w - - 0 1").is_err());
        // Rank not summing to eight files.
        assert!(parse_fen("9/8/8/8/8/8/8/8 w - - 0 1").is_err());
        assert!(parse_fen("pppp/8/8/8/8/8/8/8 w - - 0 1").is_err());
        // Bad piece, side, castling, en-passant, numeric fields.
        assert!(parse_fen("7x/8/8/8/8/8/8/8 w - - 0 1").is_err());
        assert!(parse_fen("8/8/8/8/8/8/8/8 x - - 0 1").is_err());
        assert!(parse_fen("8/8/8/8/8/8/8/8 w KZ - 0 1").is_err());
        assert!(parse_fen("8/8/8/8/8/8/8/8 w - e4 0 1").is_err());
        assert!(parse_fen("8/8/8/8/8/8/8/8 w - - x 1").is_err());
        assert!(parse_fen("8/8/8/8/8/8/8/8 w - - 0 x").is_err());
    }
}
