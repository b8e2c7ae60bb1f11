//! Crate root module declarations for the Quince Chess engine core.
//!
//! This file exposes the board/game-state model, move generation, search,
//! and notation utilities so binaries, tests, and embedding applications can
//! import stable module paths.

pub mod game_state {
    pub mod chess_rules;
    pub mod chess_types;
    pub mod game_state;
    pub mod repetition;
    pub mod situation;
    pub mod undo_state;
}

pub mod moves {
    pub mod chess_move;
}

pub mod move_generation {
    pub mod attack_tables;
    pub mod legal_move_generator;
    pub mod perft;
}

pub mod search {
    pub mod evaluation;
    pub mod iterative_deepening;
    pub mod move_ordering;
    pub mod piece_maps;
    pub mod time_management;
    pub mod transposition_table;
    pub mod zobrist;
}

pub mod tables {
    pub mod opening_book;
}

pub mod utils {
    pub mod algebraic;
    pub mod fen_generator;
    pub mod fen_parser;
    pub mod long_algebraic;
    pub mod pgn;
    pub mod render_game_state;
    pub mod san;
}
