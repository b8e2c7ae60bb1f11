//! PGN export and movetext import.
//!
//! Export renders the seven standard tags (with `SetUp`/`FEN` added for
//! non-standard starting positions) followed by SAN movetext. Import strips
//! comments, variations, numbering, and annotations, then matches each token
//! against the legal moves of the running position by SAN or LAN.

use std::collections::BTreeMap;

use chrono::Local;

use crate::game_state::chess_rules::STARTING_POSITION_FEN;
use crate::game_state::game_state::GameState;
use crate::moves::chess_move::ChessMove;
use crate::utils::long_algebraic::move_to_lan;
use crate::utils::san::move_to_san;

const RESULT_TOKENS: [&str; 4] = ["1-0", "0-1", "1/2-1/2", "*"];

/// Renders a full PGN game. `headers` override the defaults; the `Date` tag
/// defaults to today and `Result` to the `result` argument.
pub fn render_pgn(
    start: &GameState,
    moves: &[ChessMove],
    headers: &BTreeMap<String, String>,
    result: &str,
) -> Result<String, String> {
    let mut tags: BTreeMap<String, String> = BTreeMap::new();
    for (name, default) in [
        ("Event", "?"),
        ("Site", "?"),
        ("Round", "?"),
        ("White", "?"),
        ("Black", "?"),
    ] {
        tags.insert(name.to_string(), default.to_string());
    }
    tags.insert(
        "Date".to_string(),
        Local::now().format("%Y.%m.%d").to_string(),
    );
    tags.insert("Result".to_string(), result.to_string());
    for (name, value) in headers {
        tags.insert(name.clone(), value.clone());
    }

    let start_fen = start.to_fen();
    if start_fen != STARTING_POSITION_FEN {
        tags.insert("SetUp".to_string(), "1".to_string());
        tags.insert("FEN".to_string(), start_fen);
    }

    let mut pgn = String::new();
    for (name, value) in &tags {
        pgn.push_str(&format!("[{name} \"{value}\"]\n"));
    }
    pgn.push('\n');

    let mut state = start.clone();
    let mut tokens: Vec<String> = Vec::new();
    for &mv in moves {
        if state.side_to_move() == crate::game_state::chess_types::Color::Light {
            tokens.push(format!("{}.", state.fullmove_number()));
        } else if tokens.is_empty() {
            tokens.push(format!("{}...", state.fullmove_number()));
        }
        tokens.push(move_to_san(&mut state, mv)?);
        state.make_move(mv, false)?;
    }
    tokens.push(result.to_string());
    pgn.push_str(&tokens.join(" "));
    pgn.push('\n');
    Ok(pgn)
}

/// Parses movetext against `state`, applying each move as it is recognized
/// and returning the moves in order. `state` is left at the final position.
pub fn parse_movetext(state: &mut GameState, movetext: &str) -> Result<Vec<ChessMove>, String> {
    let cleaned = strip_comments_and_variations(movetext);
    let mut moves = Vec::new();

    for token in cleaned.split_whitespace() {
        if RESULT_TOKENS.contains(&token) || is_move_number(token) {
            continue;
        }
        let bare = token.trim_end_matches(['+', '#', '!', '?']);
        if bare.is_empty() {
            continue;
        }
        let mv = match_token(state, bare)
            .ok_or_else(|| format!("Movetext token '{token}' matches no legal move"))?;
        state.make_move(mv, false)?;
        moves.push(mv);
    }
    Ok(moves)
}

fn strip_comments_and_variations(movetext: &str) -> String {
    let mut cleaned = String::with_capacity(movetext.len());
    let mut brace_depth = 0usize;
    let mut paren_depth = 0usize;
    for symbol in movetext.chars() {
        match symbol {
            '{' => brace_depth += 1,
            '}' => brace_depth = brace_depth.saturating_sub(1),
            '(' if brace_depth == 0 => paren_depth += 1,
            ')' if brace_depth == 0 => paren_depth = paren_depth.saturating_sub(1),
            _ if brace_depth == 0 && paren_depth == 0 => cleaned.push(symbol),
            _ => {}
        }
    }
    cleaned
}

fn is_move_number(token: &str) -> bool {
    token.chars().all(|symbol| symbol.is_ascii_digit() || symbol == '.')
        && token.chars().any(|symbol| symbol.is_ascii_digit())
}

fn match_token(state: &mut GameState, token: &str) -> Option<ChessMove> {
    let (legal, _) =
        crate::move_generation::legal_move_generator::generate_legal_moves(state, false, false);
    for mv in legal {
        if move_to_lan(mv) == token {
            return Some(mv);
        }
        if let Ok(san) = move_to_san(state, mv) {
            if san.trim_end_matches(['+', '#']) == token {
                return Some(mv);
            }
        }
    }
    None
}
