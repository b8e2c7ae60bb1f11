//! Weighted opening book.
//!
//! Book files are plain text: a `pos` delimiter line, then a line with the
//! position's FEN stripped of the halfmove/fullmove counters, then one
//! `<LAN> <count>` line per book move with the number of games it appeared
//! in. Selection is
//! weighted by `count` raised to a configurable power, so 1.0 follows game
//! frequency, 0.0 plays all book moves uniformly, and the 0.5 default sits
//! in between.

use std::collections::HashMap;

use rand::Rng;

use crate::game_state::game_state::GameState;
use crate::moves::chess_move::ChessMove;
use crate::utils::fen_generator::generate_fen;
use crate::utils::long_algebraic::parse_lan;

pub const DEFAULT_WEIGHT_POWER: f64 = 0.5;

#[derive(Debug, Clone)]
struct BookMove {
    lan: String,
    count: u64,
}

#[derive(Debug, Default)]
pub struct OpeningBook {
    positions: HashMap<String, Vec<BookMove>>,
}

impl OpeningBook {
    pub fn parse(text: &str) -> Result<OpeningBook, String> {
        let mut positions: HashMap<String, Vec<BookMove>> = HashMap::new();
        let mut current_key: Option<String> = None;
        let mut expecting_key = false;

        for (line_number, raw_line) in text.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() {
                continue;
            }
            if line == "pos" {
                expecting_key = true;
                continue;
            }
            if expecting_key {
                let key = line.to_string();
                positions.entry(key.clone()).or_default();
                current_key = Some(key);
                expecting_key = false;
                continue;
            }
            let Some(key) = &current_key else {
                return Err(format!(
                    "Line {} holds a move before any 'pos' header: '{line}'",
                    line_number + 1
                ));
            };
            let mut parts = line.split_whitespace();
            let (Some(lan), Some(count_text), None) =
                (parts.next(), parts.next(), parts.next())
            else {
                return Err(format!(
                    "Line {} is not '<move> <count>': '{line}'",
                    line_number + 1
                ));
            };
            let count: u64 = count_text
                .parse()
                .map_err(|_| format!("Invalid move count '{count_text}' on line {}", line_number + 1))?;
            if let Some(moves) = positions.get_mut(key) {
                moves.push(BookMove {
                    lan: lan.to_string(),
                    count,
                });
            }
        }

        Ok(OpeningBook { positions })
    }

    pub fn load(path: &str) -> Result<OpeningBook, String> {
        let text = std::fs::read_to_string(path)
            .map_err(|err| format!("Cannot read opening book '{path}': {err}"))?;
        OpeningBook::parse(&text)
    }

    pub fn position_count(&self) -> usize {
        self.positions.len()
    }

    // Book keys suppress the en-passant field so a position reached through
    // a double push still matches its recorded entry.
    fn key_for(state: &GameState) -> String {
        let fen = generate_fen(state, false);
        fen.split_whitespace()
            .take(4)
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn has_position(&self, state: &GameState) -> bool {
        self.positions
            .get(&Self::key_for(state))
            .is_some_and(|moves| !moves.is_empty())
    }

    /// Samples a book move for the position, or `None` when the position is
    /// out of book or no recorded move is legal here.
    pub fn pick_move<R: Rng>(
        &self,
        state: &GameState,
        rng: &mut R,
        weight_power: f64,
    ) -> Option<ChessMove> {
        let candidates = self.positions.get(&Self::key_for(state))?;
        let playable: Vec<(ChessMove, f64)> = candidates
            .iter()
            .filter_map(|book_move| {
                let mv = parse_lan(state, &book_move.lan).ok()?;
                let weight = (book_move.count as f64).powf(weight_power).ceil();
                Some((mv, weight))
            })
            .collect();
        let total: f64 = playable.iter().map(|(_, weight)| weight).sum();
        if total <= 0.0 {
            return None;
        }

        let mut threshold = rng.random_range(0.0..total);
        for (mv, weight) in &playable {
            threshold -= weight;
            if threshold < 0.0 {
                return Some(*mv);
            }
        }
        playable.last().map(|(mv, _)| *mv)
    }
}
