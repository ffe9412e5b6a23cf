pub mod board;
pub mod error;
pub mod eval;
pub mod magic;
pub mod perft;
pub mod search;
pub mod time;
pub mod uci;
pub mod utils;
pub mod zobrist;

/// Build the attack, hash and evaluation tables now instead of on first use.
pub fn init() {
    magic::tables();
    eval::phase_tables();
}
