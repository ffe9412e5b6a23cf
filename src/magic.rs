//! Precomputed attack tables and magic bitboards
//!
//! Everything the move generator treats as ground truth lives in one
//! immutable [`Magics`] value: leaper attacks, pawn pushes and captures,
//! directional rays with edge sentinels, square-pair line and segment masks,
//! the Zobrist constants and the magic-hashed bishop/rook attack tables.
//!
//! The magic multipliers are not hard-coded. They are searched for at
//! startup from a fixed seed, so the tables are identical on every run.
//! Use [`tables()`] to get the shared instance.

use std::sync::OnceLock;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::utils::{bit, bit_scan, bit_scan_rev, iter_bits, north, shift, south, step_attacks, FILE_A};
use crate::zobrist::ZobristKeys;

// ============================================================================
// DIRECTIONS
// ============================================================================

pub const NW: usize = 0;
pub const NE: usize = 1;
pub const SW: usize = 2;
pub const SE: usize = 3;
pub const N: usize = 4;
pub const E: usize = 5;
pub const S: usize = 6;
pub const W: usize = 7;

/// (file delta, rank delta) per direction, indexed by the constants above.
const DIRECTION_STEPS: [(i32, i32); 8] = [
    (-1, 1),
    (1, 1),
    (-1, -1),
    (1, -1),
    (0, 1),
    (1, 0),
    (0, -1),
    (-1, 0),
];

pub const DIAGONALS: [usize; 4] = [NW, NE, SW, SE];
pub const ORTHOGONALS: [usize; 4] = [N, E, S, W];

/// Directions running toward higher square indices.
#[inline]
pub const fn is_positive(dir: usize) -> bool {
    matches!(dir, NW | NE | N | E)
}

#[inline]
pub const fn opposite(dir: usize) -> usize {
    match dir {
        NW => SE,
        NE => SW,
        SW => NE,
        SE => NW,
        N => S,
        E => W,
        S => N,
        _ => E,
    }
}

const KNIGHT_OFFSETS: [(i32, i32); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const KING_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

// ============================================================================
// MAGIC PARAMETERS
// ============================================================================

const MAGIC_SEED: u64 = 11_111_113;

const BISHOP_BITS: u32 = 9;
const ROOK_BITS: u32 = 12;
const BISHOP_SHIFT: u32 = 64 - BISHOP_BITS;
const ROOK_SHIFT: u32 = 64 - ROOK_BITS;
const BISHOP_SLOTS: usize = 1 << BISHOP_BITS;
const ROOK_SLOTS: usize = 1 << ROOK_BITS;

/// Magic entry for a single square
#[derive(Clone, Copy, Debug, Default)]
struct MagicEntry {
    mask: u64,  // Relevant occupancy mask (ray squares minus each ray's last square)
    magic: u64, // Multiplier mapping every mask subset to a collision-free slot
}

impl MagicEntry {
    #[inline(always)]
    fn index(&self, occ: u64, shift: u32) -> usize {
        ((occ & self.mask).wrapping_mul(self.magic) >> shift) as usize
    }
}

// ============================================================================
// TABLES
// ============================================================================

pub struct Magics {
    pub king: [u64; 64],
    pub knight: [u64; 64],
    /// Single-step push target, indexed by color then square.
    pub pawn_push: [[u64; 64]; 2],
    /// Squares a pawn of the given color attacks from the given square.
    pub pawn_attacks: [[u64; 64]; 2],
    pub rays: [[u64; 64]; 8],
    /// Sentinel bit at the far end of every ray in the direction.
    pub ray_bit: [u64; 8],
    /// Files strictly left of the square's file.
    pub left_half: [u64; 64],
    /// Files strictly right of the square's file.
    pub right_half: [u64; 64],
    line: Vec<[u64; 64]>,
    between: Vec<[u64; 64]>,
    bishop_entries: [MagicEntry; 64],
    rook_entries: [MagicEntry; 64],
    bishop_table: Vec<u64>,
    rook_table: Vec<u64>,
    pub zobrist: ZobristKeys,
}

static TABLES: OnceLock<Magics> = OnceLock::new();

/// Shared attack tables, built on first use.
#[inline]
pub fn tables() -> &'static Magics {
    TABLES.get_or_init(Magics::new)
}

impl Magics {
    pub fn new() -> Self {
        let started = Instant::now();
        let mut rng = StdRng::seed_from_u64(MAGIC_SEED);
        let zobrist = ZobristKeys::generate(&mut rng);

        let mut tables = Magics {
            king: [0; 64],
            knight: [0; 64],
            pawn_push: [[0; 64]; 2],
            pawn_attacks: [[0; 64]; 2],
            rays: [[0; 64]; 8],
            ray_bit: [0; 8],
            left_half: [0; 64],
            right_half: [0; 64],
            line: vec![[0; 64]; 64],
            between: vec![[0; 64]; 64],
            bishop_entries: [MagicEntry::default(); 64],
            rook_entries: [MagicEntry::default(); 64],
            bishop_table: vec![0; 64 * BISHOP_SLOTS],
            rook_table: vec![0; 64 * ROOK_SLOTS],
            zobrist,
        };

        tables.init_leapers();
        tables.init_rays();
        tables.init_lines();
        tables.init_sliders(&mut rng);

        tracing::debug!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            "attack tables built"
        );
        tables
    }

    fn init_leapers(&mut self) {
        for sq in 0..64 {
            self.king[sq] = step_attacks(sq, &KING_OFFSETS);
            self.knight[sq] = step_attacks(sq, &KNIGHT_OFFSETS);
            self.pawn_push[0][sq] = north(sq).map_or(0, bit);
            self.pawn_push[1][sq] = south(sq).map_or(0, bit);
            self.pawn_attacks[0][sq] = step_attacks(sq, &[(-1, 1), (1, 1)]);
            self.pawn_attacks[1][sq] = step_attacks(sq, &[(-1, -1), (1, -1)]);

            let file = sq % 8;
            for f in 0..8 {
                let file_mask = FILE_A << f;
                if f < file {
                    self.left_half[sq] |= file_mask;
                } else if f > file {
                    self.right_half[sq] |= file_mask;
                }
            }
        }
    }

    fn init_rays(&mut self) {
        for (dir, &(dx, dy)) in DIRECTION_STEPS.iter().enumerate() {
            self.ray_bit[dir] = if is_positive(dir) { bit(63) } else { bit(0) };
            for sq in 0..64 {
                let mut ray = 0u64;
                let mut cur = sq;
                while let Some(next) = shift(cur, dx, dy) {
                    ray |= bit(next);
                    cur = next;
                }
                self.rays[dir][sq] = ray;
            }
        }
    }

    fn init_lines(&mut self) {
        for from in 0..64 {
            for dir in 0..8 {
                let back = opposite(dir);
                let full = self.rays[dir][from] | self.rays[back][from] | bit(from);
                for to in iter_bits(self.rays[dir][from]) {
                    self.line[from][to] = full;
                    self.between[from][to] = self.rays[dir][from] & self.rays[back][to];
                }
            }
        }
    }

    fn init_sliders(&mut self, rng: &mut StdRng) {
        for sq in 0..64 {
            let mask = self.relevant_mask(sq, &DIAGONALS);
            let magic = find_magic(
                rng,
                mask,
                BISHOP_SHIFT,
                &mut self.bishop_table[sq * BISHOP_SLOTS..(sq + 1) * BISHOP_SLOTS],
                |occ| slow_slider_attacks(&self.rays, &self.ray_bit, sq, occ, &DIAGONALS),
            );
            self.bishop_entries[sq] = MagicEntry { mask, magic };

            let mask = self.relevant_mask(sq, &ORTHOGONALS);
            let magic = find_magic(
                rng,
                mask,
                ROOK_SHIFT,
                &mut self.rook_table[sq * ROOK_SLOTS..(sq + 1) * ROOK_SLOTS],
                |occ| slow_slider_attacks(&self.rays, &self.ray_bit, sq, occ, &ORTHOGONALS),
            );
            self.rook_entries[sq] = MagicEntry { mask, magic };
        }
    }

    /// Ray squares whose occupancy can change the attack set: each ray minus
    /// its final square on the board edge.
    fn relevant_mask(&self, sq: usize, dirs: &[usize]) -> u64 {
        dirs.iter().fold(0u64, |mask, &dir| {
            let ray = self.rays[dir][sq];
            if ray == 0 {
                return mask;
            }
            let last = if is_positive(dir) {
                bit_scan_rev(ray)
            } else {
                bit_scan(ray)
            };
            mask | (ray & !bit(last))
        })
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    #[inline(always)]
    pub fn line(&self, a: usize, b: usize) -> u64 {
        self.line[a][b]
    }

    #[inline(always)]
    pub fn between(&self, a: usize, b: usize) -> u64 {
        self.between[a][b]
    }

    /// Attacks along a ray toward higher indices, stopping at (and including)
    /// the first occupied square.
    #[inline(always)]
    pub fn positive_ray_attacks(&self, sq: usize, dir: usize, occ: u64) -> u64 {
        let attacks = self.rays[dir][sq];
        let blocker = bit_scan((attacks & occ) | self.ray_bit[dir]);
        attacks ^ self.rays[dir][blocker]
    }

    /// Attacks along a ray toward lower indices, stopping at (and including)
    /// the first occupied square.
    #[inline(always)]
    pub fn negative_ray_attacks(&self, sq: usize, dir: usize, occ: u64) -> u64 {
        let attacks = self.rays[dir][sq];
        let blocker = bit_scan_rev((attacks & occ) | self.ray_bit[dir]);
        attacks ^ self.rays[dir][blocker]
    }

    #[inline(always)]
    pub fn ray_attacks(&self, sq: usize, dir: usize, occ: u64) -> u64 {
        if is_positive(dir) {
            self.positive_ray_attacks(sq, dir, occ)
        } else {
            self.negative_ray_attacks(sq, dir, occ)
        }
    }

    #[inline(always)]
    pub fn bishop_attacks(&self, sq: usize, occ: u64) -> u64 {
        let entry = &self.bishop_entries[sq];
        self.bishop_table[sq * BISHOP_SLOTS + entry.index(occ, BISHOP_SHIFT)]
    }

    #[inline(always)]
    pub fn rook_attacks(&self, sq: usize, occ: u64) -> u64 {
        let entry = &self.rook_entries[sq];
        self.rook_table[sq * ROOK_SLOTS + entry.index(occ, ROOK_SHIFT)]
    }

    #[inline(always)]
    pub fn queen_attacks(&self, sq: usize, occ: u64) -> u64 {
        self.bishop_attacks(sq, occ) | self.rook_attacks(sq, occ)
    }

    /// Bishop attacks that see through the first `blockers` piece on each ray.
    #[inline]
    pub fn xray_bishop_attacks(&self, sq: usize, occ: u64, blockers: u64) -> u64 {
        let attacks = self.bishop_attacks(sq, occ);
        let blockers = blockers & attacks;
        attacks ^ self.bishop_attacks(sq, occ ^ blockers)
    }

    /// Rook attacks that see through the first `blockers` piece on each ray.
    #[inline]
    pub fn xray_rook_attacks(&self, sq: usize, occ: u64, blockers: u64) -> u64 {
        let attacks = self.rook_attacks(sq, occ);
        let blockers = blockers & attacks;
        attacks ^ self.rook_attacks(sq, occ ^ blockers)
    }
}

impl Default for Magics {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TABLE CONSTRUCTION
// ============================================================================

/// Sliding attacks from the ray tables, used as the reference while the
/// magic tables are being filled.
fn slow_slider_attacks(rays: &[[u64; 64]; 8], ray_bit: &[u64; 8], sq: usize, occ: u64, dirs: &[usize]) -> u64 {
    dirs.iter().fold(0u64, |acc, &dir| {
        let ray = rays[dir][sq];
        let blocked = (ray & occ) | ray_bit[dir];
        let blocker = if is_positive(dir) {
            bit_scan(blocked)
        } else {
            bit_scan_rev(blocked)
        };
        acc | (ray ^ rays[dir][blocker])
    })
}

/// Every subset of `mask`, starting with the empty set (carry-rippler).
fn enumerate_subsets(mask: u64) -> Vec<u64> {
    let mut subsets = Vec::with_capacity(1 << mask.count_ones());
    let mut subset = 0u64;
    loop {
        subsets.push(subset);
        subset = subset.wrapping_sub(mask) & mask;
        if subset == 0 {
            break;
        }
    }
    subsets
}

/// Search for a multiplier that sends every occupancy subset of `mask` to a
/// slot of `table` without two different attack sets sharing a slot. On
/// success the slots are filled and the multiplier returned.
fn find_magic<F>(rng: &mut StdRng, mask: u64, shift: u32, table: &mut [u64], attacks_for: F) -> u64
where
    F: Fn(u64) -> u64,
{
    let subsets = enumerate_subsets(mask);
    let attacks: Vec<u64> = subsets.iter().map(|&occ| attacks_for(occ)).collect();
    // Slot ownership is tracked per attempt so the table never needs clearing.
    let mut epoch = vec![0u32; table.len()];
    let mut attempt = 0u32;

    loop {
        let magic = rng.random::<u64>() & rng.random::<u64>() & rng.random::<u64>();
        if (mask.wrapping_mul(magic) & 0xFF00_0000_0000_0000).count_ones() < 6 {
            continue;
        }
        attempt += 1;

        let collision = subsets.iter().zip(&attacks).any(|(&occ, &set)| {
            let slot = (occ.wrapping_mul(magic) >> shift) as usize;
            if epoch[slot] != attempt {
                epoch[slot] = attempt;
                table[slot] = set;
                false
            } else {
                table[slot] != set
            }
        });

        if !collision {
            return magic;
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
