//! Search statistics and per-iteration reports

use std::time::Duration;

use crate::board::Move;

/// Counters for one `best_move` call
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SearchStats {
    /// Negamax nodes
    pub nodes: u64,

    /// Quiescence nodes
    pub qsearch_nodes: u64,

    /// Probes that found an entry deep enough to use
    pub tt_hits: u64,

    /// Beta cutoffs in negamax
    pub cutoffs: u64,
}

impl SearchStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Nodes per second over `elapsed`
    pub fn nps(&self, elapsed: Duration) -> u64 {
        let ms = elapsed.as_millis() as u64;
        if ms == 0 {
            0
        } else {
            (self.nodes + self.qsearch_nodes) * 1000 / ms
        }
    }
}

/// Result of one iterative-deepening iteration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IterationReport {
    pub depth: u8,
    pub score: i32,
    /// Negamax nodes of this iteration
    pub nodes: u64,
    /// Cumulative TT hits of the search so far
    pub tt_hits: u64,
    /// Time since the search started
    pub elapsed: Duration,
    pub pv: Vec<Move>,
    /// False when the deadline passed during the iteration; its result was
    /// discarded.
    pub completed: bool,
}

impl IterationReport {
    /// UCI `info` line
    pub fn to_uci(&self) -> String {
        let pv: Vec<String> = self.pv.iter().map(|m| m.to_string()).collect();
        format!(
            "info depth {} score cp {} nodes {} time {} hits {} pv {}",
            self.depth,
            self.score,
            self.nodes,
            self.elapsed.as_millis(),
            self.tt_hits,
            pv.join(" ")
        )
    }
}
