// Bitboard masks, bit scans, square stepping and algebraic helpers

// File masks (A is column 0, H column 7)
pub const FILE_A: u64 = 0x0101010101010101;
pub const FILE_H: u64 = 0x8080808080808080;

pub const NOT_FILE_A: u64 = !FILE_A;
pub const NOT_FILE_H: u64 = !FILE_H;

// Rank masks (A1 is square 0)
pub const RANK_2: u64 = 0x000000000000FF00;
pub const RANK_4: u64 = 0x00000000FF000000;
pub const RANK_5: u64 = 0x000000FF00000000;
pub const RANK_7: u64 = 0x00FF000000000000;

pub const FULL: u64 = u64::MAX;

// Bit operations

/// Index of the lowest set bit. `bb` must be non-zero.
#[inline]
pub fn bit_scan(bb: u64) -> usize {
    debug_assert!(bb != 0);
    bb.trailing_zeros() as usize
}

/// Index of the highest set bit. `bb` must be non-zero.
#[inline]
pub fn bit_scan_rev(bb: u64) -> usize {
    debug_assert!(bb != 0);
    63 - bb.leading_zeros() as usize
}

#[inline]
pub fn pop_count(bb: u64) -> u32 {
    bb.count_ones()
}

#[inline]
pub fn pop_lsb(bb: &mut u64) -> Option<usize> {
    if *bb == 0 {
        return None;
    }
    let lsb = bb.trailing_zeros() as usize;
    *bb &= *bb - 1;
    Some(lsb)
}

pub struct BitIter {
    bb: u64,
}

impl Iterator for BitIter {
    type Item = usize;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        pop_lsb(&mut self.bb)
    }
}

#[inline]
pub fn iter_bits(bb: u64) -> BitIter {
    BitIter { bb }
}

#[inline]
pub fn bit(sq: usize) -> u64 {
    1u64 << sq
}

// Square stepping. `None` means the step left the board.

#[inline]
pub fn shift(sq: usize, dx: i32, dy: i32) -> Option<usize> {
    let file = (sq % 8) as i32 + dx;
    let rank = (sq / 8) as i32 + dy;
    if (0..8).contains(&file) && (0..8).contains(&rank) {
        Some((rank * 8 + file) as usize)
    } else {
        None
    }
}

#[inline]
pub fn north(sq: usize) -> Option<usize> {
    shift(sq, 0, 1)
}

#[inline]
pub fn south(sq: usize) -> Option<usize> {
    shift(sq, 0, -1)
}

/// Mirror a square vertically (a1 <-> a8).
#[inline]
pub fn flip(sq: usize) -> usize {
    sq ^ 56
}

/// Union of the squares reached from `sq` by each single step in `offsets`.
pub fn step_attacks(sq: usize, offsets: &[(i32, i32)]) -> u64 {
    offsets
        .iter()
        .filter_map(|&(dx, dy)| shift(sq, dx, dy))
        .fold(0u64, |acc, to| acc | bit(to))
}

pub fn to_algebraic(sq: usize) -> String {
    let file = (b'a' + (sq % 8) as u8) as char;
    let rank = (b'1' + (sq / 8) as u8) as char;
    format!("{}{}", file, rank)
}

pub fn from_algebraic(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    if bytes.len() != 2 {
        return None;
    }
    let file = bytes[0].wrapping_sub(b'a');
    let rank = bytes[1].wrapping_sub(b'1');
    if file < 8 && rank < 8 {
        Some(rank as usize * 8 + file as usize)
    } else {
        None
    }
}
