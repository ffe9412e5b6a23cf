//! Bitboard position with incremental make/unmake
//!
//! Squares: A1=0, B1=1, ..., H8=63. The board keeps four views of the piece
//! placement in sync (per-piece bitboards, per-color occupancy, the full
//! board and a square-indexed mailbox), a stack of per-ply [`BoardState`]
//! records, the incrementally updated Zobrist hash and an approximate
//! repetition counter. Every [`Board::make_move`] regenerates the legal move
//! list for the side to move; [`Board::unmake_move`] brings back the list of
//! the ply it returns to.

use std::fmt;

use crate::magic::{tables, Magics};
use crate::utils::{bit, bit_scan, iter_bits, to_algebraic};

mod fen;
pub mod movegen;
pub mod moves;

pub use fen::START_FEN;
pub use movegen::GenFrame;
pub use moves::*;

/// Low hash bits used to index the repetition counter.
pub const REPETITION_BITS: u32 = 20;
const REPETITION_MASK: u64 = (1 << REPETITION_BITS) - 1;

// Castling nibble: K=8, Q=4, k=2, q=1
pub const WHITE_KINGSIDE: u8 = 0b1000;
pub const WHITE_QUEENSIDE: u8 = 0b0100;
pub const BLACK_KINGSIDE: u8 = 0b0010;
pub const BLACK_QUEENSIDE: u8 = 0b0001;

/// Rights that survive a move touching the square (from or to).
const CASTLING_KEEP: [u8; 64] = {
    let mut keep = [0b1111u8; 64];
    keep[0] = !WHITE_QUEENSIDE & 0b1111;
    keep[4] = !(WHITE_KINGSIDE | WHITE_QUEENSIDE) & 0b1111;
    keep[7] = !WHITE_KINGSIDE & 0b1111;
    keep[56] = !BLACK_QUEENSIDE & 0b1111;
    keep[60] = !(BLACK_KINGSIDE | BLACK_QUEENSIDE) & 0b1111;
    keep[63] = !BLACK_KINGSIDE & 0b1111;
    keep
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    #[inline(always)]
    pub fn opposite(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl std::ops::Not for Color {
    type Output = Color;

    #[inline(always)]
    fn not(self) -> Color {
        self.opposite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PieceKind {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
}

impl Piece {
    #[inline(always)]
    pub const fn new(kind: PieceKind, color: Color) -> Self {
        Piece { kind, color }
    }

    pub fn to_char(self) -> char {
        let c = match self.kind {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };
        match self.color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        let kind = match c.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => return None,
        };
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Some(Piece::new(kind, color))
    }
}

/// Per-ply state. Pushed by every make, popped by every unmake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardState {
    pub side: Color,
    pub castling: u8,
    /// Piece taken on the destination square by the move that produced this
    /// state.
    pub captured: Option<Piece>,
    /// Pawn removed by an en-passant capture.
    pub ep_captured: Option<Piece>,
    /// Square of a pawn that just advanced two ranks.
    pub double_push: Option<usize>,
    /// Square skipped by that pawn.
    pub ep_square: Option<usize>,
    pub halfmove: u32,
    pub fullmove: u32,
    pub last_move: Move,
}

impl Default for BoardState {
    fn default() -> Self {
        BoardState {
            side: Color::White,
            castling: 0,
            captured: None,
            ep_captured: None,
            double_push: None,
            ep_square: None,
            halfmove: 0,
            fullmove: 1,
            last_move: Move::NULL,
        }
    }
}

#[derive(Clone)]
pub struct Board {
    tables: &'static Magics,
    pieces: [[u64; 6]; 2],
    occupancy: [u64; 2],
    fullboard: u64,
    mailbox: [Option<Piece>; 64],
    history: Vec<BoardState>,
    /// Generator output per ply; `frames[history.len() - 1]` is current.
    frames: Vec<GenFrame>,
    zobrist: u64,
    repetitions: Vec<u8>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Empty board, white to move, no legal moves generated.
    pub fn new() -> Self {
        Self::with_tables(tables())
    }

    pub fn with_tables(tables: &'static Magics) -> Self {
        let state = BoardState::default();
        Board {
            tables,
            pieces: [[0; 6]; 2],
            occupancy: [0; 2],
            fullboard: 0,
            mailbox: [None; 64],
            history: vec![state],
            frames: vec![GenFrame::default()],
            zobrist: tables.zobrist.state(&state),
            repetitions: vec![0; 1 << REPETITION_BITS],
        }
    }

    pub fn startpos() -> Self {
        match Self::from_fen(START_FEN) {
            Ok(board) => board,
            Err(e) => unreachable!("start position must parse: {}", e),
        }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    #[inline(always)]
    pub fn tables(&self) -> &'static Magics {
        self.tables
    }

    #[inline(always)]
    pub fn state(&self) -> &BoardState {
        // The history is never empty: construction pushes the root state and
        // unmake refuses to pop it.
        &self.history[self.history.len() - 1]
    }

    #[inline(always)]
    pub fn side_to_move(&self) -> Color {
        self.state().side
    }

    #[inline(always)]
    pub fn zobrist_hash(&self) -> u64 {
        self.zobrist
    }

    #[inline(always)]
    pub fn pieces(&self, color: Color, kind: PieceKind) -> u64 {
        self.pieces[color as usize][kind as usize]
    }

    #[inline(always)]
    pub(crate) fn pieces_raw(&self, color: Color, kind: usize) -> u64 {
        self.pieces[color as usize][kind]
    }

    #[inline(always)]
    pub fn occupancy(&self, color: Color) -> u64 {
        self.occupancy[color as usize]
    }

    #[inline(always)]
    pub fn fullboard(&self) -> u64 {
        self.fullboard
    }

    #[inline(always)]
    pub fn piece_at(&self, sq: usize) -> Option<Piece> {
        self.mailbox[sq]
    }

    #[inline(always)]
    pub fn king_square(&self, color: Color) -> usize {
        bit_scan(self.pieces(color, PieceKind::King))
    }

    pub fn castling(&self) -> u8 {
        self.state().castling
    }

    pub fn ep_square(&self) -> Option<usize> {
        self.state().ep_square
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.state().halfmove
    }

    pub fn fullmove_number(&self) -> u32 {
        self.state().fullmove
    }

    /// Number of per-ply states, including the root.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Approximate count of how often the current position (by low hash
    /// bits) was reached through make.
    #[inline(always)]
    pub fn repetitions(&self) -> u8 {
        self.repetitions[(self.zobrist & REPETITION_MASK) as usize]
    }

    #[inline(always)]
    fn frame(&self) -> &GenFrame {
        &self.frames[self.history.len() - 1]
    }

    /// Legal moves for the side to move, in generation order.
    #[inline(always)]
    pub fn legal_moves(&self) -> &[Move] {
        &self.frame().moves
    }

    /// Union of squares attacked by the side not to move (sliders see through
    /// the mover's king).
    #[inline(always)]
    pub fn enemy_attacks(&self) -> u64 {
        self.frame().attacks
    }

    #[inline(always)]
    pub fn checkmask(&self) -> u64 {
        self.frame().checkmask
    }

    /// (orthogonal pins, diagonal pins) of the side to move.
    #[inline(always)]
    pub fn pins(&self) -> (u64, u64) {
        (self.frame().pins_hv, self.frame().pins_d12)
    }

    #[inline(always)]
    pub fn in_check(&self) -> bool {
        self.frame().attacks & self.pieces(self.side_to_move(), PieceKind::King) != 0
    }

    /// Hash recomputed from the board, ignoring the incremental value.
    pub fn recompute_hash(&self) -> u64 {
        self.tables.zobrist.hash_position(self)
    }

    /// Whether `by` attacks `sq` with the current occupancy.
    pub fn is_square_attacked(&self, sq: usize, by: Color) -> bool {
        let t = self.tables;
        let occ = self.fullboard;
        let queens = self.pieces(by, PieceKind::Queen);
        t.pawn_attacks[(!by) as usize][sq] & self.pieces(by, PieceKind::Pawn) != 0
            || t.knight[sq] & self.pieces(by, PieceKind::Knight) != 0
            || t.king[sq] & self.pieces(by, PieceKind::King) != 0
            || t.bishop_attacks(sq, occ) & (self.pieces(by, PieceKind::Bishop) | queens) != 0
            || t.rook_attacks(sq, occ) & (self.pieces(by, PieceKind::Rook) | queens) != 0
    }

    // ========================================================================
    // PIECE PLACEMENT
    // ========================================================================

    /// Place a piece on an empty square. Does not regenerate moves.
    #[inline(always)]
    pub fn put_piece(&mut self, piece: Piece, sq: usize) {
        debug_assert!(self.mailbox[sq].is_none(), "square {} occupied", to_algebraic(sq));
        let b = bit(sq);
        self.pieces[piece.color as usize][piece.kind as usize] |= b;
        self.occupancy[piece.color as usize] |= b;
        self.fullboard |= b;
        self.mailbox[sq] = Some(piece);
        self.zobrist ^= self.tables.zobrist.piece(piece, sq);
    }

    /// Remove and return the piece on `sq`. Does not regenerate moves.
    #[inline(always)]
    pub fn remove_piece(&mut self, sq: usize) -> Piece {
        let piece = match self.mailbox[sq].take() {
            Some(piece) => piece,
            None => panic!("no piece on {}", to_algebraic(sq)),
        };
        let b = bit(sq);
        self.pieces[piece.color as usize][piece.kind as usize] ^= b;
        self.occupancy[piece.color as usize] ^= b;
        self.fullboard ^= b;
        self.zobrist ^= self.tables.zobrist.piece(piece, sq);
        piece
    }

    // ========================================================================
    // MAKE / UNMAKE
    // ========================================================================

    /// Play a legal move and regenerate the move list for the new side.
    pub fn make_move(&mut self, mv: Move) {
        let prev = *self.state();
        let mover = prev.side;
        let (from, to) = (mv.from(), mv.to());
        let moving = match self.mailbox[from] {
            Some(piece) => piece,
            None => panic!("make_move {}: empty start square", mv),
        };

        let mut next = BoardState {
            side: !mover,
            castling: prev.castling & CASTLING_KEEP[from] & CASTLING_KEEP[to],
            captured: None,
            ep_captured: None,
            double_push: None,
            ep_square: None,
            halfmove: prev.halfmove + 1,
            fullmove: prev.fullmove + (mover == Color::Black) as u32,
            last_move: mv,
        };

        if mv.is_castling() {
            let (rook_from, rook_to) = castling_rook_squares(to, mv.is_kingside());
            let rook = self.remove_piece(rook_from);
            self.put_piece(rook, rook_to);
        }

        if mv.is_double_push() {
            next.double_push = Some(to);
            next.ep_square = Some(en_passant_victim(to, mover));
        }

        if mv.is_en_passant() {
            next.ep_captured = Some(self.remove_piece(en_passant_victim(to, mover)));
        } else if self.mailbox[to].is_some() {
            next.captured = Some(self.remove_piece(to));
        }

        let placed = match mv.promotion() {
            Some(kind) => Piece::new(kind, mover),
            None => moving,
        };
        self.remove_piece(from);
        self.put_piece(placed, to);

        if moving.kind == PieceKind::Pawn || next.captured.is_some() {
            next.halfmove = 0;
        }

        let keys = &self.tables.zobrist;
        self.zobrist ^= keys.state(&prev) ^ keys.state(&next);
        self.history.push(next);

        let slot = (self.zobrist & REPETITION_MASK) as usize;
        self.repetitions[slot] = self.repetitions[slot].wrapping_add(1);

        if self.frames.len() < self.history.len() {
            self.frames.push(GenFrame::default());
        }
        self.fill_moves();
    }

    /// Take back `mv`, which must be the last move made.
    pub fn unmake_move(&mut self, mv: Move) {
        debug_assert!(self.history.len() > 1, "unmake_move with no move made");
        debug_assert_eq!(self.state().last_move, mv, "unmake out of order");

        let slot = (self.zobrist & REPETITION_MASK) as usize;
        self.repetitions[slot] = self.repetitions[slot].wrapping_sub(1);

        let Some(state) = self.history.pop() else {
            return;
        };
        let prev = *self.state();
        let keys = &self.tables.zobrist;
        self.zobrist ^= keys.state(&state) ^ keys.state(&prev);

        let mover = prev.side;
        let (from, to) = (mv.from(), mv.to());

        let placed = self.remove_piece(to);
        let original = if mv.is_promotion() {
            Piece::new(PieceKind::Pawn, mover)
        } else {
            placed
        };
        self.put_piece(original, from);

        if let Some(captured) = state.captured {
            self.put_piece(captured, to);
        }
        if let Some(pawn) = state.ep_captured {
            self.put_piece(pawn, en_passant_victim(to, mover));
        }

        if mv.is_castling() {
            let (rook_from, rook_to) = castling_rook_squares(to, mv.is_kingside());
            let rook = self.remove_piece(rook_to);
            self.put_piece(rook, rook_from);
        }
    }

    /// Reset to an empty board: pieces, history, hash and repetition counts.
    fn clear(&mut self) {
        self.pieces = [[0; 6]; 2];
        self.occupancy = [0; 2];
        self.fullboard = 0;
        self.mailbox = [None; 64];
        self.history.clear();
        self.history.push(BoardState::default());
        self.zobrist = self.tables.zobrist.state(self.state());
        self.repetitions.fill(0);
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  +-----------------+")?;
        for rank in (0..8).rev() {
            write!(f, "{} | ", rank + 1)?;
            for file in 0..8 {
                let c = self.mailbox[rank * 8 + file].map_or('.', Piece::to_char);
                write!(f, "{} ", c)?;
            }
            writeln!(f, "|")?;
        }
        writeln!(f, "  +-----------------+")?;
        writeln!(f, "    a b c d e f g h")?;
        writeln!(f)?;
        writeln!(f, "Fen: {}", self.to_fen())?;
        write!(f, "Key: {:016X}", self.zobrist)
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({})", self.to_fen())
    }
}

/// Iterate the squares of every piece of `color`, in kind order.
pub fn piece_squares(board: &Board, color: Color) -> impl Iterator<Item = (PieceKind, usize)> + '_ {
    PieceKind::ALL
        .into_iter()
        .flat_map(move |kind| iter_bits(board.pieces(color, kind)).map(move |sq| (kind, sq)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Snapshot {
        pieces: [[u64; 6]; 2],
        occupancy: [u64; 2],
        fullboard: u64,
        mailbox: [Option<Piece>; 64],
        state: BoardState,
        history: usize,
        zobrist: u64,
        moves: Vec<Move>,
    }

    fn snapshot(board: &Board) -> Snapshot {
        Snapshot {
            pieces: board.pieces,
            occupancy: board.occupancy,
            fullboard: board.fullboard,
            mailbox: board.mailbox,
            state: *board.state(),
            history: board.history.len(),
            zobrist: board.zobrist,
            moves: board.legal_moves().to_vec(),
        }
    }

    fn assert_consistent(board: &Board) {
        let mut full = 0;
        for color in [Color::White, Color::Black] {
            let mut occ = 0;
            for kind in PieceKind::ALL {
                let bb = board.pieces(color, kind);
                assert_eq!(occ & bb, 0, "overlapping piece sets");
                occ |= bb;
                for sq in iter_bits(bb) {
                    assert_eq!(board.piece_at(sq), Some(Piece::new(kind, color)));
                }
            }
            assert_eq!(occ, board.occupancy(color));
            full |= occ;
        }
        assert_eq!(full, board.fullboard());
        assert_eq!(board.mailbox.iter().filter(|p| p.is_some()).count() as u32, full.count_ones());
        assert_eq!(board.zobrist_hash(), board.recompute_hash());
    }

    #[test]
    fn test_make_unmake_zobrist_invariant() {
        let mut board = Board::startpos();
        let original_hash = board.zobrist_hash();
        for mv in board.legal_moves().to_vec() {
            board.make_move(mv);
            assert_consistent(&board);
            board.unmake_move(mv);
            assert_eq!(board.zobrist_hash(), original_hash, "hash mismatch after {}", mv);
        }
    }

    #[test]
    fn test_round_trip_special_moves() {
        // Castling both ways, en passant, promotions with and without capture
        let fens = [
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3",
            "n1n5/PPPk4/8/8/8/8/4Kppp/5N1N b - - 0 1",
            "r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1",
        ];
        for fen in fens {
            let mut board = Board::from_fen(fen).unwrap();
            let before = snapshot(&board);
            for mv in board.legal_moves().to_vec() {
                board.make_move(mv);
                assert_consistent(&board);
                board.unmake_move(mv);
                assert_eq!(snapshot(&board), before, "{} on {}", mv, fen);
            }
        }
    }

    #[test]
    fn test_castling_moves_rook_and_clears_rights() {
        let mut board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let mv = board.parse_move("e1g1").unwrap();
        board.make_move(mv);
        assert_eq!(board.piece_at(5), Some(Piece::new(PieceKind::Rook, Color::White)));
        assert_eq!(board.piece_at(7), None);
        assert_eq!(board.castling(), BLACK_KINGSIDE | BLACK_QUEENSIDE);

        let mv = board.parse_move("a8a1").unwrap();
        board.make_move(mv);
        assert_eq!(board.castling(), BLACK_KINGSIDE);
    }

    #[test]
    fn test_en_passant_removes_pawn() {
        let mut board =
            Board::from_fen("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3").unwrap();
        let mv = board.parse_move("e5f6").unwrap();
        assert!(board.legal_moves().contains(&mv));
        board.make_move(mv);
        assert_eq!(board.piece_at(37), None);
        assert_eq!(board.state().ep_captured, Some(Piece::new(PieceKind::Pawn, Color::Black)));
        assert_eq!(board.halfmove_clock(), 0);
    }

    #[test]
    fn test_ep_square_is_behind_pushed_pawn() {
        let mut board = Board::startpos();
        board.set_position(START_FEN, &["c2c3", "d7d5"]).unwrap();
        assert_eq!(board.ep_square(), Some(43));
        assert!(board.legal_moves().iter().all(|m| !m.is_en_passant()));

        // b4xa3 becomes available right after a2-a4
        let kiwipete = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
        board.set_position(kiwipete, &["a2a4"]).unwrap();
        assert_eq!(board.ep_square(), Some(16));
        let ep = board.parse_move("b4a3").unwrap();
        assert!(ep.is_en_passant());
        assert!(board.legal_moves().contains(&ep));
        board.make_move(ep);
        assert_eq!(board.piece_at(24), None);
        assert_eq!(board.zobrist_hash(), board.recompute_hash());
        board.unmake_move(ep);
        assert_eq!(board.piece_at(24).map(|p| p.kind), Some(PieceKind::Pawn));
    }

    #[test]
    fn test_double_push_sets_ep_square() {
        let mut board = Board::startpos();
        let mv = board.parse_move("e2e4").unwrap();
        board.make_move(mv);
        assert_eq!(board.ep_square(), Some(20));
        assert_eq!(board.state().double_push, Some(28));
        let mv = board.parse_move("g8f6").unwrap();
        board.make_move(mv);
        assert_eq!(board.ep_square(), None);
        assert_eq!(board.fullmove_number(), 2);
        assert_eq!(board.halfmove_clock(), 1);
    }

    #[test]
    fn test_repetition_counter() {
        let mut board = Board::startpos();
        let shuffle = ["g1f3", "g8f6", "f3g1", "f6g8"];
        let mut played = Vec::new();
        for _ in 0..2 {
            for text in shuffle {
                let mv = board.parse_move(text).unwrap();
                board.make_move(mv);
                played.push(mv);
            }
        }
        // Start position reached twice through make
        assert_eq!(board.repetitions(), 2);
        while let Some(mv) = played.pop() {
            board.unmake_move(mv);
        }
        assert_eq!(board.repetitions(), 0);
        assert_eq!(board.history_len(), 1);
    }

    #[test]
    fn test_display_contains_fen() {
        let board = Board::startpos();
        let text = board.to_string();
        assert!(text.contains(START_FEN));
        assert!(text.contains("r n b q k b n r"));
    }
}
