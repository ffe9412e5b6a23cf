//! Fixed-size transposition table
//!
//! One entry per slot, indexed by the low bits of the Zobrist key. Stores
//! always overwrite the slot; the full key is kept to reject collisions on
//! probe.

use crate::board::Move;

/// Bound type of a stored score.
///
/// Naming follows the engine's cutoff convention: a node that failed high
/// (beta cutoff) stores `Upper`, a node that never raised alpha stores
/// `Lower`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// Score is exact.
    Exact = 0,
    /// No move improved alpha; the score is at most the stored value.
    Lower = 1,
    /// Beta cutoff; the score is at least the stored value.
    Upper = 2,
}

/// Single TT entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TTEntry {
    pub key: u64,
    /// Store counter at write time.
    pub age: u32,
    pub depth: u8,
    pub score: i32,
    pub best_move: Move,
    pub bound: Bound,
}

impl TTEntry {
    pub const EMPTY: TTEntry = TTEntry {
        key: 0,
        age: 0,
        depth: 0,
        score: 0,
        best_move: Move::NULL,
        bound: Bound::Exact,
    };

    pub fn is_empty(&self) -> bool {
        self.age == 0
    }
}

/// Transposition table owned by one search
pub struct TranspositionTable {
    entries: Vec<TTEntry>,
    mask: u64,
    age: u32,
}

impl TranspositionTable {
    /// Create a table with `1 << bits` entries
    pub fn new(bits: u32) -> Self {
        let size = 1usize << bits;
        tracing::debug!(
            entries = size,
            bytes = size * std::mem::size_of::<TTEntry>(),
            "transposition table allocated"
        );
        Self {
            entries: vec![TTEntry::EMPTY; size],
            mask: (size - 1) as u64,
            age: 0,
        }
    }

    #[inline(always)]
    fn index(&self, key: u64) -> usize {
        (key & self.mask) as usize
    }

    /// Entry stored for exactly this key, if any
    pub fn probe(&self, key: u64) -> Option<TTEntry> {
        let entry = self.entries[self.index(key)];
        (!entry.is_empty() && entry.key == key).then_some(entry)
    }

    /// Overwrite the slot of `key`
    pub fn store(&mut self, key: u64, score: i32, depth: u8, bound: Bound, best_move: Move) {
        self.age = self.age.wrapping_add(1).max(1);
        let index = self.index(key);
        self.entries[index] = TTEntry {
            key,
            age: self.age,
            depth,
            score,
            best_move,
            bound,
        };
    }

    pub fn clear(&mut self) {
        self.entries.fill(TTEntry::EMPTY);
        self.age = 0;
    }

    /// Number of slots
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Occupied slots per thousand, sampled over the first 1000 slots
    pub fn fill_permille(&self) -> usize {
        let sample = self.entries.len().min(1000);
        let used = self.entries[..sample].iter().filter(|e| !e.is_empty()).count();
        used * 1000 / sample
    }
}

impl Default for TranspositionTable {
    fn default() -> Self {
        Self::new(16)
    }
}
