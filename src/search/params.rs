//! Search parameters and configuration
//!
//! Controls iterative deepening limits, the aspiration window and the
//! transposition table size.

/// Search parameters for the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    /// Maximum search depth in plies
    pub max_depth: u8,

    /// Transposition table size as a power of two (entries = 1 << tt_bits)
    pub tt_bits: u32,

    /// Initial half-width of the aspiration window in centipawns
    pub aspiration_window: i32,

    /// Depths up to this one are searched with a full window
    pub full_window_depth: u8,

    /// Move time used when the caller gives no clock information
    pub default_move_time_ms: u64,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            max_depth: 15,
            tt_bits: 20,
            aspiration_window: 20,
            full_window_depth: 4,
            default_move_time_ms: 5000,
        }
    }
}

impl SearchParams {
    /// Create new search params with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum depth in plies
    pub fn max_depth(mut self, depth: u8) -> Self {
        self.max_depth = depth;
        self
    }

    /// Set the transposition table size in bits, clamped to `10..=30`
    pub fn tt_bits(mut self, bits: u32) -> Self {
        self.tt_bits = bits.clamp(10, 30);
        self
    }

    /// Set aspiration window size in centipawns
    pub fn aspiration_window(mut self, window: i32) -> Self {
        self.aspiration_window = window.max(1);
        self
    }

    pub fn full_window_depth(mut self, depth: u8) -> Self {
        self.full_window_depth = depth;
        self
    }

    /// Set the fallback move time in milliseconds
    pub fn default_move_time(mut self, ms: u64) -> Self {
        self.default_move_time_ms = ms;
        self
    }
}
