//! Fixed-size transposition table.
//!
//! Slots are indexed by Zobrist hash modulo capacity and overwritten
//! unconditionally on store. Mate scores are ply-corrected so an entry
//! written deep in one line reads back with the right mate distance when
//! probed from another.

use crate::moves::chess_move::ChessMove;
use crate::search::iterative_deepening::MATE_SCORE;

const MATE_THRESHOLD: i32 = MATE_SCORE - 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Exact,
    LowerBound,
    UpperBound,
}

#[derive(Debug, Clone, Copy)]
struct TableEntry {
    key: u64,
    value: i32,
    depth: u32,
    bound: Bound,
    best_move: ChessMove,
}

const EMPTY_ENTRY: TableEntry = TableEntry {
    key: 0,
    value: 0,
    depth: 0,
    bound: Bound::Exact,
    best_move: ChessMove::NULL,
};

pub struct TranspositionTable {
    entries: Vec<TableEntry>,
    used: usize,
}

impl TranspositionTable {
    /// Sizes the table to fit in `megabytes` of entry storage.
    pub fn new_with_mb(megabytes: usize) -> Result<TranspositionTable, String> {
        let capacity = megabytes * 1024 * 1024 / std::mem::size_of::<TableEntry>();
        if capacity == 0 {
            return Err(format!(
                "Transposition table budget of {megabytes} MB holds no entries"
            ));
        }
        Ok(TranspositionTable {
            entries: vec![EMPTY_ENTRY; capacity],
            used: 0,
        })
    }

    pub fn clear(&mut self) {
        self.entries.fill(EMPTY_ENTRY);
        self.used = 0;
    }

    /// Fraction of slots holding an entry, in percent.
    pub fn occupancy_percent(&self) -> f32 {
        self.used as f32 * 100.0 / self.entries.len() as f32
    }

    /// Returns a usable value for this position, or `None` on miss. A hit
    /// requires the exact key, enough stored depth, and a bound compatible
    /// with the caller's window.
    pub fn probe(
        &self,
        hash: u64,
        depth_remaining: u32,
        ply_from_root: i32,
        alpha: i32,
        beta: i32,
    ) -> Option<i32> {
        let entry = &self.entries[(hash % self.entries.len() as u64) as usize];
        if entry.key != hash || entry.depth < depth_remaining {
            return None;
        }
        let value = from_stored(entry.value, ply_from_root);
        match entry.bound {
            Bound::Exact => Some(value),
            Bound::UpperBound if value <= alpha => Some(value),
            Bound::LowerBound if value >= beta => Some(value),
            _ => None,
        }
    }

    /// Best move recorded for this position, if the slot still holds it.
    pub fn stored_move(&self, hash: u64) -> Option<ChessMove> {
        let entry = &self.entries[(hash % self.entries.len() as u64) as usize];
        if entry.key == hash && !entry.best_move.is_null() {
            Some(entry.best_move)
        } else {
            None
        }
    }

    pub fn store(
        &mut self,
        hash: u64,
        depth: u32,
        ply_from_root: i32,
        value: i32,
        bound: Bound,
        best_move: ChessMove,
    ) {
        let index = (hash % self.entries.len() as u64) as usize;
        if self.entries[index].key == 0 {
            self.used += 1;
        }
        self.entries[index] = TableEntry {
            key: hash,
            value: to_stored(value, ply_from_root),
            depth,
            bound,
            best_move,
        };
    }
}

// Mate scores are stored relative to the entry's node and converted back to
// root-relative on probe, preserving sign.
fn to_stored(value: i32, ply_from_root: i32) -> i32 {
    if value > MATE_THRESHOLD {
        value + ply_from_root
    } else if value < -MATE_THRESHOLD {
        value - ply_from_root
    } else {
        value
    }
}

fn from_stored(value: i32, ply_from_root: i32) -> i32 {
    if value > MATE_THRESHOLD {
        value - ply_from_root
    } else if value < -MATE_THRESHOLD {
        value + ply_from_root
    } else {
        value
    }
}
