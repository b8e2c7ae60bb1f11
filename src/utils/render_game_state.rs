//! Plain-text board rendering for logs and debugging.

use crate::game_state::chess_types::{Color, PieceKind};
use crate::game_state::game_state::GameState;

/// Renders the board from the light side's point of view, rank 8 on top,
/// with a side-to-move footer.
pub fn render_game_state(state: &GameState) -> String {
    let mut output = String::new();
    for rank in (0..8u8).rev() {
        output.push((b'1' + rank) as char);
        output.push(' ');
        for file in 0..8u8 {
            let square = rank * 8 + file;
            let symbol = match state.piece_on_square(square) {
                Some((color, kind)) => piece_symbol(color, kind),
                None => '.',
            };
            output.push(symbol);
            if file < 7 {
                output.push(' ');
            }
        }
        output.push('\n');
    }
    output.push_str("  a b c d e f g h\n");
    output.push_str(match state.side_to_move() {
        Color::Light => "White to move\n",
        Color::Dark => "Black to move\n",
    });
    output
}

fn piece_symbol(color: Color, kind: PieceKind) -> char {
    let symbol = match kind {
        PieceKind::Pawn => 'p',
        PieceKind::Knight => 'n',
        PieceKind::Bishop => 'b',
        PieceKind::Rook => 'r',
        PieceKind::Queen => 'q',
        PieceKind::King => 'k',
    };
    match color {
        Color::Light => symbol.to_ascii_uppercase(),
        Color::Dark => symbol,
    }
}
