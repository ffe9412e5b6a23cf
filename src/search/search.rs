//! Main search engine implementation
//!
//! Iterative deepening negamax with alpha-beta, aspiration windows after the
//! first few plies, a transposition table and a captures-only quiescence
//! search. The deadline is soft: it is polled at the top of every node and
//! every made move is unmade on the way out.

use std::time::Instant;

use super::params::SearchParams;
use super::stats::{IterationReport, SearchStats};
use super::tt::{Bound, TranspositionTable};
use crate::board::{Board, Move};
use crate::eval::evaluate;

/// Score bound; a mated side to move scores `-INFINITY`.
pub const INFINITY: i32 = i32::MAX / 2;

/// Repetition count at which a position scores as a draw.
const REPETITION_DRAW: u8 = 3;

/// Main search engine
pub struct Search {
    /// The current board position (mutated and restored during search)
    board: Board,

    /// Transposition table for caching
    tt: TranspositionTable,

    params: SearchParams,

    stats: SearchStats,

    deadline: Option<Instant>,

    /// Principal variation of the last completed iteration
    pv: Vec<Move>,

    iterations: Vec<IterationReport>,
}

impl Search {
    /// Create a search over `board` with a table of `1 << params.tt_bits`
    /// entries
    pub fn new(board: Board, params: SearchParams) -> Self {
        Self {
            board,
            tt: TranspositionTable::new(params.tt_bits),
            params,
            stats: SearchStats::new(),
            deadline: None,
            pv: Vec::new(),
            iterations: Vec::new(),
        }
    }

    /// Replace the position. The transposition table is cleared.
    pub fn set_board(&mut self, board: Board) {
        self.board = board;
        self.tt.clear();
        self.pv.clear();
    }

    /// Get current board position
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Mutable access for position setup between searches
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    /// Resize the transposition table (contents are dropped)
    pub fn resize_tt(&mut self, bits: u32) {
        self.params = self.params.clone().tt_bits(bits);
        self.tt = TranspositionTable::new(self.params.tt_bits);
    }

    pub fn clear_tt(&mut self) {
        self.tt.clear();
    }

    pub fn tt(&self) -> &TranspositionTable {
        &self.tt
    }

    /// Get search statistics of the last search
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    pub fn set_deadline(&mut self, deadline: Instant) {
        self.deadline = Some(deadline);
    }

    pub fn clear_deadline(&mut self) {
        self.deadline = None;
    }

    /// Principal variation of the last completed iteration, root move first
    pub fn principal_variation(&self) -> &[Move] {
        &self.pv
    }

    /// Reports of every iteration of the last search, in depth order
    pub fn iterations(&self) -> &[IterationReport] {
        &self.iterations
    }

    #[inline(always)]
    fn timed_out(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }

    /// Iterative deepening up to `max_depth` plies or the deadline.
    ///
    /// Returns the score and move of the deepest iteration that finished
    /// before the deadline. If none did, the best ordered legal move is
    /// returned with score 0; a position without legal moves yields
    /// `Move::NULL`.
    pub fn best_move(&mut self, max_depth: u8) -> (i32, Move) {
        let started = Instant::now();
        self.stats.reset();
        self.iterations.clear();
        self.pv.clear();

        let mut last_score = 0;
        let mut best = Move::NULL;

        for depth in 1..=max_depth {
            if self.timed_out() {
                break;
            }
            let nodes_before = self.stats.nodes;
            let mut pv = Vec::new();

            let (score, mv) = if depth <= self.params.full_window_depth {
                self.negamax(depth as i32, -INFINITY, INFINITY, &mut pv)
            } else {
                self.aspiration(depth, last_score, &mut pv)
            };

            let completed = !self.timed_out();
            let report = IterationReport {
                depth,
                score,
                nodes: self.stats.nodes - nodes_before,
                tt_hits: self.stats.tt_hits,
                elapsed: started.elapsed(),
                pv: pv.clone(),
                completed,
            };
            tracing::info!(
                depth,
                score,
                nodes = report.nodes,
                tt_hits = report.tt_hits,
                elapsed_ms = report.elapsed.as_millis() as u64,
                completed,
                pv = %mv,
                "iteration finished"
            );
            self.iterations.push(report);

            if completed {
                last_score = score;
                best = mv;
                self.pv = pv;
            }

            if score == INFINITY {
                break;
            }
        }

        if best.is_null() {
            if let Some(&first) = self.board.order_moves(self.board.legal_moves(), Move::NULL).first() {
                tracing::debug!(mv = %first, "no iteration completed, using first ordered move");
                best = first;
            }
        }

        (last_score, best)
    }

    /// Re-search with a widening window until the score falls inside it.
    fn aspiration(&mut self, depth: u8, center: i32, pv: &mut Vec<Move>) -> (i32, Move) {
        let mut window = self.params.aspiration_window;
        let mut alpha = center.saturating_sub(window);
        let mut beta = center.saturating_add(window);
        let mut result = self.negamax(depth as i32, alpha, beta, pv);

        while (result.0 <= alpha || result.0 >= beta) && !self.timed_out() {
            if result.0 <= alpha {
                alpha = alpha.saturating_sub(window);
            } else {
                beta = beta.saturating_add(window);
            }
            tracing::debug!(depth, alpha, beta, score = result.0, "aspiration re-search");
            pv.clear();
            result = self.negamax(depth as i32, alpha, beta, pv);
            window = window.saturating_mul(2);
        }
        result
    }

    /// Alpha-beta negamax. Returns the node score and its best move and
    /// fills `pv` with the line below this node.
    fn negamax(&mut self, depth: i32, mut alpha: i32, beta: i32, pv: &mut Vec<Move>) -> (i32, Move) {
        let mut best = self.board.legal_moves().first().copied().unwrap_or(Move::NULL);
        self.stats.nodes += 1;

        if self.timed_out() {
            return (beta, best);
        }
        if depth <= 0 {
            return (self.quiescence(alpha, beta), best);
        }

        let key = self.board.zobrist_hash();
        let mut tt_move = Move::NULL;
        if let Some(entry) = self.tt.probe(key) {
            tt_move = entry.best_move;
            if entry.depth as i32 >= depth {
                self.stats.tt_hits += 1;
                match entry.bound {
                    Bound::Exact => return (entry.score, entry.best_move),
                    Bound::Lower if entry.score <= alpha => return (alpha, entry.best_move),
                    Bound::Upper if entry.score >= beta => return (beta, entry.best_move),
                    _ => {}
                }
            }
        }

        let ordered = self.board.order_moves(self.board.legal_moves(), tt_move);
        let mut max = -INFINITY;
        let mut bound = Bound::Lower;
        let mut line = Vec::new();
        let mut child = Vec::new();

        for &mv in &ordered {
            self.board.make_move(mv);
            child.clear();
            let (mut score, _) = self.negamax(depth - 1, -beta, -alpha, &mut child);
            if self.board.repetitions() >= REPETITION_DRAW {
                score = 0;
            }
            self.board.unmake_move(mv);
            let score = -score;

            if score > max {
                max = score;
                best = mv;
                std::mem::swap(&mut line, &mut child);
                if score > alpha {
                    alpha = score;
                    bound = Bound::Exact;
                }
            }

            if alpha >= beta {
                bound = Bound::Upper;
                self.stats.cutoffs += 1;
                break;
            }
        }

        if ordered.is_empty() {
            max = if self.board.in_check() { -INFINITY } else { 0 };
        }

        pv.clear();
        if !best.is_null() {
            pv.push(best);
            pv.extend_from_slice(&line);
        }

        if !self.timed_out() {
            self.tt.store(key, max, depth as u8, bound, best);
        }

        (max, best)
    }

    /// Captures-only search from a stand-pat score.
    fn quiescence(&mut self, mut alpha: i32, beta: i32) -> i32 {
        self.stats.qsearch_nodes += 1;

        let stand_pat = evaluate(&self.board);
        if stand_pat >= beta {
            return beta;
        }
        if alpha < stand_pat {
            alpha = stand_pat;
        }
        if self.timed_out() {
            return alpha;
        }

        let captures: Vec<Move> = self
            .board
            .legal_moves()
            .iter()
            .copied()
            .filter(|m| m.is_capture())
            .collect();
        let ordered = self.board.order_moves(&captures, Move::NULL);

        for mv in ordered {
            self.board.make_move(mv);
            let score = -self.quiescence(-beta, -alpha);
            self.board.unmake_move(mv);

            if score >= beta {
                return beta;
            }
            if score > alpha {
                alpha = score;
            }
        }
        alpha
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn search_for(fen: &str) -> Search {
        let board = Board::from_fen(fen).unwrap();
        Search::new(board, SearchParams::new().tt_bits(16))
    }

    #[test]
    fn test_finds_mate_in_one() {
        let mut search = search_for("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1");
        let (score, mv) = search.best_move(6);
        assert_eq!(mv.to_string(), "a1a8");
        assert_eq!(score, INFINITY);
        // Mate found at depth 2 stops the deepening
        assert_eq!(search.iterations().len(), 2);
    }

    #[test]
    fn test_wins_hanging_queen() {
        let mut search = search_for("4k3/8/8/3q4/4P3/8/8/4K3 w - - 0 1");
        let (score, mv) = search.best_move(4);
        assert_eq!(mv.to_string(), "e4d5");
        assert!(score > 0);
    }

    #[test]
    fn test_terminal_positions() {
        let mut stalemate = search_for("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
        assert_eq!(stalemate.best_move(3), (0, Move::NULL));

        let mut mated = search_for("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1");
        assert_eq!(mated.best_move(3), (-INFINITY, Move::NULL));
    }

    #[test]
    fn test_board_restored_after_search() {
        let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
        let mut search = search_for(fen);
        let hash = search.board().zobrist_hash();
        let moves = search.board().legal_moves().to_vec();
        search.best_move(4);
        assert_eq!(search.board().to_fen(), fen);
        assert_eq!(search.board().zobrist_hash(), hash);
        assert_eq!(search.board().history_len(), 1);
        assert_eq!(search.board().legal_moves(), moves.as_slice());
    }

    #[test]
    fn test_pv_starts_with_best_move() {
        let mut search = search_for("4k3/8/8/3q4/4P3/8/8/4K3 w - - 0 1");
        let (_, mv) = search.best_move(3);
        let pv = search.principal_variation();
        assert!(!pv.is_empty());
        assert_eq!(pv[0], mv);
        assert!(search.iterations().iter().all(|it| it.completed));
        assert_eq!(search.iterations().last().map(|it| it.depth), Some(3));
    }

    #[test]
    fn test_expired_deadline_still_returns_a_move() {
        let mut search = search_for("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        search.set_deadline(Instant::now() - Duration::from_millis(1));
        let (_, mv) = search.best_move(10);
        assert!(search.board().legal_moves().contains(&mv));
        assert!(search.iterations().is_empty());

        search.clear_deadline();
        let (_, mv) = search.best_move(2);
        assert!(search.board().legal_moves().contains(&mv));
        assert_eq!(search.iterations().len(), 2);
    }

    #[test]
    fn test_set_board_clears_table() {
        let mut search = search_for("4k3/8/8/3q4/4P3/8/8/4K3 w - - 0 1");
        search.best_move(3);
        assert!(search.tt().probe(search.board().zobrist_hash()).is_some());
        search.set_board(Board::startpos());
        assert!(search.tt().probe(search.board().zobrist_hash()).is_none());
        assert!(search.principal_variation().is_empty());
    }

    #[test]
    fn test_repetition_scores_as_draw() {
        // White is a queen down. After the knight/king shuffle, Nf3 reaches
        // its position for the third time and scores as a draw.
        let mut board = Board::from_fen("k7/2q5/8/8/8/8/8/6NK w - - 0 1").unwrap();
        for _ in 0..2 {
            for text in ["g1f3", "a8b8", "f3g1", "b8a8"] {
                let mv = board.parse_move(text).unwrap();
                board.make_move(mv);
            }
        }
        let mut search = Search::new(board, SearchParams::new().tt_bits(16));
        let (score, mv) = search.best_move(1);
        assert_eq!(mv.to_string(), "g1f3");
        assert_eq!(score, 0);
    }
}
