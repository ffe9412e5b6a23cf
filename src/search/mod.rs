//! Search engine for the Leone chess engine

pub mod params;
pub mod search;
pub mod stats;
pub mod tt;

pub use self::params::SearchParams;
pub use self::search::{Search, INFINITY};
pub use self::stats::{IterationReport, SearchStats};
pub use self::tt::{Bound, TTEntry, TranspositionTable};
pub use crate::board::Move;
