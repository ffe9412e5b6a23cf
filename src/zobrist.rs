// Zobrist hashing constants and full-board recomputation
use rand::Rng;

use crate::board::{Board, BoardState, Color, Piece};
use crate::utils::iter_bits;

/// Random keys for every hashed feature of a position.
#[derive(Clone, Debug)]
pub struct ZobristKeys {
    /// Indexed by color, piece kind, square.
    pub pieces: [[[u64; 64]; 6]; 2],
    /// Indexed by the KQkq castling nibble.
    pub castling: [u64; 16],
    pub ep_file: [u64; 8],
    pub black: u64,
}

impl ZobristKeys {
    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        let mut keys = ZobristKeys {
            pieces: [[[0; 64]; 6]; 2],
            castling: [0; 16],
            ep_file: [0; 8],
            black: 0,
        };
        for color in keys.pieces.iter_mut() {
            for kind in color.iter_mut() {
                for key in kind.iter_mut() {
                    *key = rng.random::<u64>();
                }
            }
        }
        for key in keys.castling.iter_mut() {
            *key = rng.random::<u64>();
        }
        for key in keys.ep_file.iter_mut() {
            *key = rng.random::<u64>();
        }
        keys.black = rng.random::<u64>();
        keys
    }

    #[inline(always)]
    pub fn piece(&self, piece: Piece, sq: usize) -> u64 {
        self.pieces[piece.color as usize][piece.kind as usize][sq]
    }

    /// Hash of the per-ply part of a position: side, castling rights and
    /// en-passant file.
    #[inline]
    pub fn state(&self, state: &BoardState) -> u64 {
        let mut h = self.castling[state.castling as usize];
        if let Some(ep) = state.ep_square {
            h ^= self.ep_file[ep % 8];
        }
        if state.side == Color::Black {
            h ^= self.black;
        }
        h
    }

    /// Hash computed from scratch by scanning the board. The incrementally
    /// maintained hash must always equal this.
    pub fn hash_position(&self, board: &Board) -> u64 {
        let mut h = 0u64;
        for color in [Color::White, Color::Black] {
            for (kind, keys) in self.pieces[color as usize].iter().enumerate() {
                for sq in iter_bits(board.pieces_raw(color, kind)) {
                    h ^= keys[sq];
                }
            }
        }
        h ^ self.state(board.state())
    }
}
