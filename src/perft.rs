//! Perft: count leaf nodes of the legal move tree
//!
//! The generator is legal by construction, so depth 1 returns the length of
//! the move list without making the moves (bulk counting).

use crate::board::{Board, Move};

pub fn perft(board: &mut Board, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    if depth == 1 {
        return board.legal_moves().len() as u64;
    }

    let moves = board.legal_moves().to_vec();
    let mut nodes = 0;
    for mv in moves {
        board.make_move(mv);
        nodes += perft(board, depth - 1);
        board.unmake_move(mv);
    }
    nodes
}

/// Leaf counts per root move, in generation order
pub fn perft_divide(board: &mut Board, depth: u32) -> Vec<(Move, u64)> {
    if depth == 0 {
        return Vec::new();
    }
    let moves = board.legal_moves().to_vec();
    let mut divide = Vec::with_capacity(moves.len());
    for mv in moves {
        board.make_move(mv);
        let nodes = perft(board, depth - 1);
        board.unmake_move(mv);
        divide.push((mv, nodes));
    }
    divide
}
