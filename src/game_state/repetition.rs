//! Bounded position-hash history for threefold-repetition detection.
//!
//! Hashes are segmented at irreversible moves (pawn moves and captures): a
//! position can only repeat within the segment after the last irreversible
//! move, so the threefold scan never crosses a segment boundary.

/// Maximum number of recorded positions. Pushes past this are counted but not
/// stored, which only matters for pathologically long reversible sequences.
pub const REPETITION_CAPACITY: usize = 128;

#[derive(Debug, Clone)]
pub struct RepetitionStack {
    hashes: [u64; REPETITION_CAPACITY],
    // segment_starts[i] is the index of the segment holding entry i - 1.
    segment_starts: [usize; REPETITION_CAPACITY + 1],
    count: usize,
}

impl Default for RepetitionStack {
    fn default() -> RepetitionStack {
        RepetitionStack::new()
    }
}

impl RepetitionStack {
    pub fn new() -> RepetitionStack {
        RepetitionStack {
            hashes: [0; REPETITION_CAPACITY],
            segment_starts: [0; REPETITION_CAPACITY + 1],
            count: 0,
        }
    }

    /// Records the position reached after a move. `irreversible` marks pawn
    /// moves and captures, which open a fresh repetition segment.
    pub fn push(&mut self, hash: u64, irreversible: bool) {
        if self.count < REPETITION_CAPACITY {
            self.hashes[self.count] = hash;
            self.segment_starts[self.count + 1] = if irreversible {
                self.count
            } else {
                self.segment_starts[self.count]
            };
        }
        self.count += 1;
    }

    pub fn pop(&mut self) {
        if self.count > 0 {
            self.count -= 1;
        }
    }

    pub fn clear(&mut self) {
        self.count = 0;
        self.segment_starts[0] = 0;
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// True when the most recently pushed hash already occurred twice within
    /// the current irreversible segment.
    pub fn is_threefold(&self) -> bool {
        if self.count == 0 || self.count > REPETITION_CAPACITY {
            return false;
        }
        let current = self.hashes[self.count - 1];
        let segment_start = self.segment_starts[self.count];
        let mut prior_matches = 0;
        for index in segment_start..self.count - 1 {
            if self.hashes[index] == current {
                prior_matches += 1;
                if prior_matches >= 2 {
                    return true;
                }
            }
        }
        false
    }
}
