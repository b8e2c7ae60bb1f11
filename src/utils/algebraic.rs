//! Conversion between square indices and algebraic coordinates like `e4`.

use crate::game_state::chess_types::{square_file, square_rank, Square};

/// Parses a two-character coordinate (`a1`..`h8`) into a square index.
pub fn algebraic_to_square(text: &str) -> Result<Square, String> {
    let mut chars = text.chars();
    let (Some(file_char), Some(rank_char), None) = (chars.next(), chars.next(), chars.next())
    else {
        return Err(format!(
            "Algebraic square must be exactly two characters, got '{text}'"
        ));
    };
    if !('a'..='h').contains(&file_char) {
        return Err(format!("Invalid file '{file_char}' in square '{text}'"));
    }
    if !('1'..='8').contains(&rank_char) {
        return Err(format!("Invalid rank '{rank_char}' in square '{text}'"));
    }
    let file = file_char as u8 - b'a';
    let rank = rank_char as u8 - b'1';
    Ok(rank * 8 + file)
}

/// Renders a square index as its two-character coordinate.
pub fn square_to_algebraic(square: Square) -> String {
    let file = (b'a' + square_file(square)) as char;
    let rank = (b'1' + square_rank(square)) as char;
    format!("{file}{rank}")
}
