//! Time management helper

use std::time::Duration;

use crate::board::Color;

/// Clock information of a `go` command, all in milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Limits {
    pub wtime: Option<u64>,
    pub btime: Option<u64>,
    pub winc: Option<u64>,
    pub binc: Option<u64>,
    pub movestogo: Option<u64>,
    pub movetime: Option<u64>,
}

pub struct TimeManager {
    /// Used when neither `movetime` nor the mover's clock is given
    pub default_move_time_ms: u64,
}

impl TimeManager {
    pub fn new(default_move_time_ms: u64) -> Self {
        Self { default_move_time_ms }
    }

    /// Time budget for the next move of `side`
    pub fn allocate_time(&self, limits: &Limits, side: Color) -> Duration {
        if let Some(mt) = limits.movetime {
            return Duration::from_millis(mt);
        }

        let (remaining, increment) = match side {
            Color::White => (limits.wtime, limits.winc),
            Color::Black => (limits.btime, limits.binc),
        };
        let Some(remaining) = remaining else {
            return Duration::from_millis(self.default_move_time_ms);
        };

        // Default 40, min 2 to avoid huge time alloc
        let moves_to_go = limits.movestogo.unwrap_or(40).max(2);
        let base_time = (remaining / moves_to_go).max(10);
        let increment_bonus = increment.map(|inc| inc * 8 / 10).unwrap_or(0);
        Duration::from_millis(base_time + increment_bonus)
    }
}
