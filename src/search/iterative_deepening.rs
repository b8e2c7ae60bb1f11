//! Alpha-beta search with iterative deepening and quiescence.
//!
//! The search is cooperatively cancellable: an `Arc<AtomicBool>` stop flag is
//! polled at the top of every node, and time or node budgets trip the same
//! flag from inside the search. Every recursive call pairs its `make_move`
//! with an `undo_move` before any cancellation return, so an aborted search
//! leaves the position untouched. A cancelled deepening iteration is
//! discarded whole; only fully completed depths update the visible best
//! move.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_generator::generate_legal_moves;
use crate::moves::chess_move::ChessMove;
use crate::search::evaluation::evaluate;
use crate::search::move_ordering::order_moves;
use crate::search::transposition_table::{Bound, TranspositionTable};

pub const MATE_SCORE: i32 = 100_000;
pub const INFINITY_SCORE: i32 = 9_999_999;
pub const MAX_SEARCH_DEPTH: u32 = 256;

/// Search termination condition.
#[derive(Debug, Clone, Copy)]
pub enum SearchKind {
    /// Single search to exactly this depth.
    FixedDepth(u32),
    /// Deepen until the wall-clock budget is spent.
    MoveTime(Duration),
    /// Deepen until this many nodes have been visited.
    NodeCount(u64),
}

/// Read-only snapshot of the last completed search.
#[derive(Debug, Clone, Copy)]
pub struct SearchDiagnostics {
    pub best_move: ChessMove,
    pub best_evaluation: i32,
    pub depth_reached: u32,
    pub elapsed: Duration,
    pub nodes_visited: u64,
    pub table_occupancy_percent: f32,
}

pub struct Search {
    table: TranspositionTable,
    stop: Arc<AtomicBool>,
    deadline: Option<Instant>,
    node_limit: Option<u64>,
    nodes_visited: u64,
    iteration_best_move: ChessMove,
    iteration_best_evaluation: i32,
    best_move: ChessMove,
    best_evaluation: i32,
}

impl Search {
    pub fn new(table_megabytes: usize) -> Result<Search, String> {
        Ok(Search {
            table: TranspositionTable::new_with_mb(table_megabytes)?,
            stop: Arc::new(AtomicBool::new(false)),
            deadline: None,
            node_limit: None,
            nodes_visited: 0,
            iteration_best_move: ChessMove::NULL,
            iteration_best_evaluation: 0,
            best_move: ChessMove::NULL,
            best_evaluation: 0,
        })
    }

    /// Shared flag for external cancellation, e.g. from a GUI thread or a
    /// timer. Setting it true stops the search at the next node boundary.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    pub fn cancel(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    /// Runs a search and returns the chosen move with diagnostics. The root
    /// iterates exactly the `seed_moves` list, so a caller can restrict the
    /// search to a subset of the legal moves; `None` uses all of them. If no
    /// move improves alpha the first seed move is the defined tie-break.
    pub fn start_search(
        &mut self,
        state: &mut GameState,
        kind: SearchKind,
        seed_moves: Option<Vec<ChessMove>>,
    ) -> Result<(ChessMove, SearchDiagnostics), String> {
        let started = Instant::now();
        self.stop.store(false, Ordering::Relaxed);
        self.deadline = None;
        self.node_limit = None;
        self.nodes_visited = 0;
        self.best_move = ChessMove::NULL;
        self.best_evaluation = 0;

        let seeds = match seed_moves {
            Some(moves) => moves,
            None => generate_legal_moves(state, true, false).0,
        };
        if seeds.is_empty() {
            return Err("Cannot search a position with no moves".to_string());
        }

        let depth_reached = match kind {
            SearchKind::FixedDepth(depth) => {
                self.root_search(state, depth, &seeds)?;
                self.best_move = self.iteration_best_move;
                self.best_evaluation = self.iteration_best_evaluation;
                depth
            }
            SearchKind::MoveTime(budget) => {
                self.deadline = Some(started + budget);
                self.deepen(state, &seeds)?
            }
            SearchKind::NodeCount(limit) => {
                self.node_limit = Some(limit.max(1));
                self.deepen(state, &seeds)?
            }
        };

        if self.best_move.is_null() {
            self.best_move = seeds[0];
        }

        let diagnostics = SearchDiagnostics {
            best_move: self.best_move,
            best_evaluation: self.best_evaluation,
            depth_reached,
            elapsed: started.elapsed(),
            nodes_visited: self.nodes_visited,
            table_occupancy_percent: self.table.occupancy_percent(),
        };
        Ok((self.best_move, diagnostics))
    }

    /// Iterative deepening loop; returns the last fully completed depth.
    fn deepen(&mut self, state: &mut GameState, seeds: &[ChessMove]) -> Result<u32, String> {
        let mut depth_reached = 0;
        for depth in 1..=MAX_SEARCH_DEPTH {
            self.root_search(state, depth, seeds)?;
            if self.aborted() {
                break;
            }
            self.best_move = self.iteration_best_move;
            self.best_evaluation = self.iteration_best_evaluation;
            depth_reached = depth;
        }
        Ok(depth_reached)
    }

    fn root_search(
        &mut self,
        state: &mut GameState,
        depth: u32,
        seeds: &[ChessMove],
    ) -> Result<i32, String> {
        let mut alpha = -INFINITY_SCORE;
        let beta = INFINITY_SCORE;
        self.iteration_best_move = ChessMove::NULL;
        self.iteration_best_evaluation = -INFINITY_SCORE;

        if let Some(value) = self.table.probe(state.zobrist_key(), depth, 0, alpha, beta) {
            if let Some(mv) = self.table.stored_move(state.zobrist_key()) {
                // A stored move outside the seed list must not escape a
                // restricted root.
                if seeds.contains(&mv) {
                    self.iteration_best_move = mv;
                    self.iteration_best_evaluation = value;
                    return Ok(value);
                }
            }
        }

        let mut moves = seeds.to_vec();
        order_moves(state, &mut moves);

        for mv in moves {
            state.make_move(mv, true)?;
            let value = -self.negamax(state, depth.saturating_sub(1), 1, -beta, -alpha)?;
            state.undo_move()?;
            if self.aborted() {
                return Ok(0);
            }
            if value > alpha {
                alpha = value;
                self.iteration_best_move = mv;
                self.iteration_best_evaluation = value;
            }
        }

        self.table.store(
            state.zobrist_key(),
            depth,
            0,
            alpha,
            Bound::Exact,
            self.iteration_best_move,
        );
        Ok(alpha)
    }

    fn negamax(
        &mut self,
        state: &mut GameState,
        depth_remaining: u32,
        ply_from_root: i32,
        mut alpha: i32,
        beta: i32,
    ) -> Result<i32, String> {
        self.nodes_visited += 1;
        if self.aborted() {
            return Ok(0);
        }

        if let Some(value) =
            self.table
                .probe(state.zobrist_key(), depth_remaining, ply_from_root, alpha, beta)
        {
            return Ok(value);
        }

        if depth_remaining == 0 {
            return self.quiescence(state, ply_from_root, alpha, beta);
        }

        let (mut moves, in_check) = generate_legal_moves(state, true, false);
        if moves.is_empty() {
            // Shallower mates score higher; stalemates and shortened draw
            // branches are dead even.
            return Ok(if in_check { -MATE_SCORE + ply_from_root } else { 0 });
        }
        order_moves(state, &mut moves);

        let mut bound = Bound::UpperBound;
        let mut best_move = ChessMove::NULL;
        for mv in moves {
            state.make_move(mv, true)?;
            let value =
                -self.negamax(state, depth_remaining - 1, ply_from_root + 1, -beta, -alpha)?;
            state.undo_move()?;
            if self.aborted() {
                return Ok(0);
            }
            if value >= beta {
                self.table.store(
                    state.zobrist_key(),
                    depth_remaining,
                    ply_from_root,
                    beta,
                    Bound::LowerBound,
                    mv,
                );
                return Ok(beta);
            }
            if value > alpha {
                alpha = value;
                bound = Bound::Exact;
                best_move = mv;
            }
        }

        self.table.store(
            state.zobrist_key(),
            depth_remaining,
            ply_from_root,
            alpha,
            bound,
            best_move,
        );
        Ok(alpha)
    }

    /// Captures-only extension at the horizon so the static evaluation is
    /// never read in the middle of an exchange.
    fn quiescence(
        &mut self,
        state: &mut GameState,
        ply_from_root: i32,
        mut alpha: i32,
        beta: i32,
    ) -> Result<i32, String> {
        self.nodes_visited += 1;
        if self.aborted() {
            return Ok(0);
        }

        let stand_pat = evaluate(state);
        if stand_pat >= beta {
            return Ok(beta);
        }
        if stand_pat > alpha {
            alpha = stand_pat;
        }

        let (mut captures, _) = generate_legal_moves(state, true, true);
        order_moves(state, &mut captures);
        for mv in captures {
            state.make_move(mv, true)?;
            let value = -self.quiescence(state, ply_from_root + 1, -beta, -alpha)?;
            state.undo_move()?;
            if self.aborted() {
                return Ok(0);
            }
            if value >= beta {
                return Ok(beta);
            }
            if value > alpha {
                alpha = value;
            }
        }
        Ok(alpha)
    }

    fn aborted(&self) -> bool {
        if self.stop.load(Ordering::Relaxed) {
            return true;
        }
        if let Some(limit) = self.node_limit {
            if self.nodes_visited >= limit {
                self.stop.store(true, Ordering::Relaxed);
                return true;
            }
        }
        if let Some(deadline) = self.deadline {
            // Clock reads are amortized over a batch of nodes.
            if self.nodes_visited & 0x3FF == 0 && Instant::now() >= deadline {
                self.stop.store(true, Ordering::Relaxed);
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::algebraic::algebraic_to_square;

    fn sq(name: &str) -> u8 {
        algebraic_to_square(name).expect("square should parse")
    }

    fn state_from(fen: &str) -> GameState {
        GameState::from_fen(fen).expect("position should parse")
    }

    #[test]
    fn finds_a_back_rank_mate_in_one() {
        let mut state = state_from("6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1");
        let mut search = Search::new(4).expect("search should allocate");
        let (best, diagnostics) = search
            .start_search(&mut state, SearchKind::FixedDepth(3), None)
            .expect("search should run");
        assert_eq!(best.origin(), sq("a1"));
        assert_eq!(best.destination(), sq("a8"));
        assert_eq!(diagnostics.best_evaluation, MATE_SCORE - 1);
    }

    #[test]
    fn root_searches_only_the_seed_moves() {
        use crate::moves::chess_move::MoveFlag;
        // Ra8 mates, but the seed list withholds it; the root must stay
        // inside the list it was given.
        let mut state = state_from("6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1");
        let only = ChessMove::new(sq("a1"), sq("a2"), MoveFlag::None);
        let mut search = Search::new(4).expect("search should allocate");
        let (best, _) = search
            .start_search(&mut state, SearchKind::FixedDepth(3), Some(vec![only]))
            .expect("search should run");
        assert_eq!(best, only);
    }

    #[test]
    fn quiescence_avoids_capturing_a_defended_pawn() {
        // Qxd4 wins a pawn but loses the queen to cxd4.
        let mut state = state_from("7k/8/8/2p5/3p4/8/8/Q6K w - - 0 1");
        let mut search = Search::new(4).expect("search should allocate");
        let (best, _) = search
            .start_search(&mut state, SearchKind::FixedDepth(1), None)
            .expect("search should run");
        assert!(!(best.origin() == sq("a1") && best.destination() == sq("d4")));
    }

    #[test]
    fn fixed_depth_search_is_deterministic() {
        let fen = "r1bqkbnr/pppp1ppp/2n5/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4";
        let mut first_state = state_from(fen);
        let mut first_search = Search::new(4).expect("search should allocate");
        let (first_move, first_diag) = first_search
            .start_search(&mut first_state, SearchKind::FixedDepth(3), None)
            .expect("search should run");

        let mut second_state = state_from(fen);
        let mut second_search = Search::new(4).expect("search should allocate");
        let (second_move, second_diag) = second_search
            .start_search(&mut second_state, SearchKind::FixedDepth(3), None)
            .expect("search should run");

        assert_eq!(first_move, second_move);
        assert_eq!(first_diag.best_evaluation, second_diag.best_evaluation);
    }

    #[test]
    fn search_leaves_the_position_unchanged() {
        let mut state = GameState::new_game();
        let fen_before = state.to_fen();
        let key_before = state.zobrist_key();
        let mut search = Search::new(4).expect("search should allocate");
        search
            .start_search(&mut state, SearchKind::FixedDepth(3), None)
            .expect("search should run");
        assert_eq!(state.to_fen(), fen_before);
        assert_eq!(state.zobrist_key(), key_before);
    }

    #[test]
    fn node_budget_stops_the_search_and_still_moves() {
        let mut state = GameState::new_game();
        let mut search = Search::new(4).expect("search should allocate");
        let (best, diagnostics) = search
            .start_search(&mut state, SearchKind::NodeCount(2_000), None)
            .expect("search should run");
        let (legal, _) = generate_legal_moves(&state, false, false);
        assert!(legal.contains(&best));
        assert!(diagnostics.nodes_visited >= 2_000);
    }

    #[test]
    fn move_time_budget_terminates() {
        let mut state = GameState::new_game();
        let mut search = Search::new(4).expect("search should allocate");
        let (best, diagnostics) = search
            .start_search(
                &mut state,
                SearchKind::MoveTime(Duration::from_millis(150)),
                None,
            )
            .expect("search should run");
        let (legal, _) = generate_legal_moves(&state, false, false);
        assert!(legal.contains(&best));
        assert!(diagnostics.elapsed < Duration::from_secs(10));
        assert!(diagnostics.depth_reached >= 1);
    }

    #[test]
    fn cancelled_search_falls_back_to_a_seed_move() {
        let mut state = GameState::new_game();
        let mut search = Search::new(4).expect("search should allocate");
        search.cancel();
        // The flag is rearmed at search start, so cancel again through the
        // shared handle after it is cleared: simplest is a zero-time budget.
        let (best, _) = search
            .start_search(&mut state, SearchKind::MoveTime(Duration::ZERO), None)
            .expect("search should run");
        let (legal, _) = generate_legal_moves(&state, false, false);
        assert!(legal.contains(&best));
    }
}
