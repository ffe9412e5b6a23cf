//! Legal move generation
//!
//! Moves are generated legal by construction. For every ply the generator
//! first derives three masks for the side to move:
//!
//! - the enemy attack set, with sliders looking through the mover's king so
//!   the king cannot step back along a checking ray;
//! - the check mask: all squares when not in check, the checker plus the
//!   squares between it and the king under a single check, empty under a
//!   double check;
//! - the pin masks, one for orthogonal and one for diagonal pins, holding the
//!   pinned pieces themselves.
//!
//! Every non-king move is intersected with the check mask and restricted by
//! the pins; king moves avoid the attack set.

use super::moves::{
    en_passant_victim, FLAG_CAPTURE, FLAG_CASTLING, FLAG_DOUBLE_PUSH, FLAG_EN_PASSANT,
    FLAG_KINGSIDE, FLAG_QUEENSIDE, PROMOTIONS,
};
use super::{Board, Color, Move, Piece, PieceKind};
use crate::magic::{is_positive, opposite, DIAGONALS, NE, NW, ORTHOGONALS, SE, SW};
use crate::utils::{
    bit, bit_scan, bit_scan_rev, iter_bits, pop_count, FULL, NOT_FILE_A, NOT_FILE_H, RANK_2,
    RANK_4, RANK_5, RANK_7,
};

/// Generator output for one ply.
#[derive(Clone, Debug, Default)]
pub struct GenFrame {
    pub(crate) moves: Vec<Move>,
    pub(crate) attacks: u64,
    pub(crate) checkmask: u64,
    pub(crate) pins_hv: u64,
    pub(crate) pins_d12: u64,
}

/// Piece values used for move ordering only.
pub const ORDER_VALUES: [i32; 6] = [100, 300, 300, 500, 900, 0];

#[inline(always)]
fn shift_by(bb: u64, offset: i32) -> u64 {
    if offset > 0 {
        bb << offset
    } else {
        bb >> -offset
    }
}

impl Board {
    /// Recompute the masks and the legal move list of the current ply.
    pub(crate) fn fill_moves(&mut self) {
        let ply = self.history.len() - 1;
        let mut frame = std::mem::take(&mut self.frames[ply]);
        frame.moves.clear();

        let us = self.side_to_move();
        frame.attacks = self.attack_mask(!us);
        frame.checkmask = self.check_mask();
        (frame.pins_hv, frame.pins_d12) = self.pin_masks();

        if frame.checkmask != 0 {
            self.rook_moves(&mut frame);
            self.bishop_moves(&mut frame);
            self.queen_moves(&mut frame);
            self.knight_moves(&mut frame);
            self.pawn_moves::<false>(&mut frame);
            self.pawn_moves::<true>(&mut frame);
            self.en_passant_moves(&mut frame);
        }
        self.king_moves(&mut frame);

        self.frames[ply] = frame;
    }

    /// Squares attacked by `enemy`, with the other side's king removed from
    /// the occupancy.
    fn attack_mask(&self, enemy: Color) -> u64 {
        let t = self.tables;
        let occ = self.fullboard ^ self.pieces(!enemy, PieceKind::King);
        let pawns = self.pieces(enemy, PieceKind::Pawn);
        let mut attacks = match enemy {
            Color::White => ((pawns & NOT_FILE_A) << 7) | ((pawns & NOT_FILE_H) << 9),
            Color::Black => ((pawns & NOT_FILE_A) >> 9) | ((pawns & NOT_FILE_H) >> 7),
        };

        for sq in iter_bits(self.pieces(enemy, PieceKind::Knight)) {
            attacks |= t.knight[sq];
        }
        let queens = self.pieces(enemy, PieceKind::Queen);
        for sq in iter_bits(self.pieces(enemy, PieceKind::Bishop) | queens) {
            attacks |= t.bishop_attacks(sq, occ);
        }
        for sq in iter_bits(self.pieces(enemy, PieceKind::Rook) | queens) {
            attacks |= t.rook_attacks(sq, occ);
        }
        attacks | t.king[self.king_square(enemy)]
    }

    fn check_mask(&self) -> u64 {
        let t = self.tables;
        let us = self.side_to_move();
        let them = !us;
        let king = self.king_square(us);
        let king_bit = bit(king);
        let queens = self.pieces(them, PieceKind::Queen);
        let diagonal = self.pieces(them, PieceKind::Bishop) | queens;
        let orthogonal = self.pieces(them, PieceKind::Rook) | queens;

        let mut checks = 0u64;
        for (dirs, sliders) in [(DIAGONALS, diagonal), (ORTHOGONALS, orthogonal)] {
            for dir in dirs {
                let ray = t.ray_attacks(king, dir, self.fullboard);
                // The farthest square of the truncated ray is its blocker
                let blocker = if is_positive(dir) {
                    bit_scan_rev(ray | king_bit)
                } else {
                    bit_scan(ray | king_bit)
                };
                if sliders & bit(blocker) != 0 {
                    checks |= ray;
                }
            }
        }
        checks |= t.knight[king] & self.pieces(them, PieceKind::Knight);
        checks |= t.pawn_attacks[us as usize][king] & self.pieces(them, PieceKind::Pawn);

        if checks == 0 {
            FULL
        } else if pop_count(checks & self.fullboard) > 1 {
            0
        } else {
            checks
        }
    }

    fn pin_masks(&self) -> (u64, u64) {
        let t = self.tables;
        let us = self.side_to_move();
        let them = !us;
        let king = self.king_square(us);
        let own = self.occupancy(us);
        let queens = self.pieces(them, PieceKind::Queen);

        let mut pins_hv = 0u64;
        let rook_pinners = t.xray_rook_attacks(king, self.fullboard, own)
            & (self.pieces(them, PieceKind::Rook) | queens);
        for pinner in iter_bits(rook_pinners) {
            pins_hv |= t.between(king, pinner) & self.fullboard;
        }

        let mut pins_d12 = 0u64;
        let bishop_pinners = t.xray_bishop_attacks(king, self.fullboard, own)
            & (self.pieces(them, PieceKind::Bishop) | queens);
        for pinner in iter_bits(bishop_pinners) {
            pins_d12 |= t.between(king, pinner) & self.fullboard;
        }

        (pins_hv, pins_d12)
    }

    #[inline(always)]
    fn push_targets(&self, frame: &mut GenFrame, from: usize, targets: u64) {
        let enemy = self.occupancy(!self.side_to_move());
        for to in iter_bits(targets) {
            let flags = if enemy & bit(to) != 0 { FLAG_CAPTURE } else { 0 };
            frame.moves.push(Move::new(from, to, flags));
        }
    }

    // ========================================================================
    // SLIDERS AND KNIGHTS
    // ========================================================================

    fn rook_moves(&self, frame: &mut GenFrame) {
        let us = self.side_to_move();
        for sq in iter_bits(self.pieces(us, PieceKind::Rook) & !frame.pins_d12) {
            self.single_rook_moves(frame, sq);
        }
    }

    fn bishop_moves(&self, frame: &mut GenFrame) {
        let us = self.side_to_move();
        for sq in iter_bits(self.pieces(us, PieceKind::Bishop) & !frame.pins_hv) {
            self.single_bishop_moves(frame, sq);
        }
    }

    fn queen_moves(&self, frame: &mut GenFrame) {
        let us = self.side_to_move();
        for sq in iter_bits(self.pieces(us, PieceKind::Queen)) {
            if frame.pins_hv & bit(sq) == 0 {
                self.single_bishop_moves(frame, sq);
            }
            if frame.pins_d12 & bit(sq) == 0 {
                self.single_rook_moves(frame, sq);
            }
        }
    }

    fn single_rook_moves(&self, frame: &mut GenFrame, sq: usize) {
        let us = self.side_to_move();
        let mut targets =
            self.tables.rook_attacks(sq, self.fullboard) & !self.occupancy(us) & frame.checkmask;
        if frame.pins_hv & bit(sq) != 0 {
            targets &= self.tables.line(sq, self.king_square(us));
        }
        self.push_targets(frame, sq, targets);
    }

    fn single_bishop_moves(&self, frame: &mut GenFrame, sq: usize) {
        let us = self.side_to_move();
        let mut targets =
            self.tables.bishop_attacks(sq, self.fullboard) & !self.occupancy(us) & frame.checkmask;
        if frame.pins_d12 & bit(sq) != 0 {
            targets &= self.tables.line(sq, self.king_square(us));
        }
        self.push_targets(frame, sq, targets);
    }

    fn knight_moves(&self, frame: &mut GenFrame) {
        let us = self.side_to_move();
        let free = self.pieces(us, PieceKind::Knight) & !(frame.pins_hv | frame.pins_d12);
        for sq in iter_bits(free) {
            let targets = self.tables.knight[sq] & !self.occupancy(us) & frame.checkmask;
            self.push_targets(frame, sq, targets);
        }
    }

    // ========================================================================
    // PAWNS
    // ========================================================================

    /// Pushes and captures of the pawns that are (`PROMOTION`) or are not
    /// about to promote.
    fn pawn_moves<const PROMOTION: bool>(&self, frame: &mut GenFrame) {
        let t = self.tables;
        let us = self.side_to_move();
        let king = self.king_square(us);
        let enemy = self.occupancy(!us);
        let empty = !self.fullboard;

        let (last_rank, double_rank, up, left, right, left_dir, right_dir) = match us {
            Color::White => (RANK_7, RANK_4, 8, 7, 9, NW, NE),
            Color::Black => (RANK_2, RANK_5, -8, -9, -7, SW, SE),
        };
        let pawns = self.pieces(us, PieceKind::Pawn)
            & if PROMOTION { last_rank } else { !last_rank };
        if pawns == 0 {
            return;
        }

        // Orthogonally pinned pawns may only push along the king's file
        let pushable = pawns
            & !frame.pins_d12
            & !(frame.pins_hv & (t.left_half[king] | t.right_half[king]));
        // Diagonally pinned pawns may only capture along their pin diagonal
        let left_axis = t.rays[left_dir][king] | t.rays[opposite(left_dir)][king];
        let right_axis = t.rays[right_dir][king] | t.rays[opposite(right_dir)][king];
        let left_capturers =
            pawns & NOT_FILE_A & !frame.pins_hv & !(frame.pins_d12 & !left_axis);
        let right_capturers =
            pawns & NOT_FILE_H & !frame.pins_hv & !(frame.pins_d12 & !right_axis);

        let single = shift_by(pushable, up) & empty;
        self.add_pawn_moves::<PROMOTION>(frame, single & frame.checkmask, up, 0);

        if !PROMOTION {
            let double = shift_by(single, up) & empty & double_rank & frame.checkmask;
            for to in iter_bits(double) {
                let from = (to as i32 - 2 * up) as usize;
                frame.moves.push(Move::new(from, to, FLAG_DOUBLE_PUSH));
            }
        }

        let left_targets = shift_by(left_capturers, left) & enemy & frame.checkmask;
        self.add_pawn_moves::<PROMOTION>(frame, left_targets, left, FLAG_CAPTURE);
        let right_targets = shift_by(right_capturers, right) & enemy & frame.checkmask;
        self.add_pawn_moves::<PROMOTION>(frame, right_targets, right, FLAG_CAPTURE);
    }

    #[inline(always)]
    fn add_pawn_moves<const PROMOTION: bool>(
        &self,
        frame: &mut GenFrame,
        targets: u64,
        offset: i32,
        flags: u32,
    ) {
        for to in iter_bits(targets) {
            let from = (to as i32 - offset) as usize;
            if PROMOTION {
                for promotion in PROMOTIONS {
                    frame.moves.push(Move::new(from, to, flags | promotion));
                }
            } else {
                frame.moves.push(Move::new(from, to, flags));
            }
        }
    }

    fn en_passant_moves(&self, frame: &mut GenFrame) {
        let Some(ep) = self.state().ep_square else {
            return;
        };
        let t = self.tables;
        let us = self.side_to_move();
        let them = !us;
        let king = self.king_square(us);
        let victim = en_passant_victim(ep, us);

        // Under check the capture must take the checking pawn or block on ep
        if frame.checkmask & (bit(victim) | bit(ep)) == 0 {
            return;
        }

        let queens = self.pieces(them, PieceKind::Queen);
        let orthogonal = self.pieces(them, PieceKind::Rook) | queens;
        let diagonal = self.pieces(them, PieceKind::Bishop) | queens;
        let candidates =
            t.pawn_attacks[them as usize][ep] & self.pieces(us, PieceKind::Pawn) & !frame.pins_hv;

        for from in iter_bits(candidates) {
            if frame.pins_d12 & bit(from) != 0 && t.line(from, king) & bit(ep) == 0 {
                continue;
            }
            // Both pawns leave their squares at once, which can open a rank
            // the ordinary pin masks never saw.
            let occ = (self.fullboard ^ bit(from) ^ bit(victim)) | bit(ep);
            if t.rook_attacks(king, occ) & orthogonal != 0
                || t.bishop_attacks(king, occ) & diagonal != 0
            {
                continue;
            }
            frame
                .moves
                .push(Move::new(from, ep, FLAG_EN_PASSANT | FLAG_CAPTURE));
        }
    }

    // ========================================================================
    // KING
    // ========================================================================

    fn king_moves(&self, frame: &mut GenFrame) {
        let us = self.side_to_move();
        let king = self.king_square(us);
        let targets = self.tables.king[king] & !self.occupancy(us) & !frame.attacks;
        self.push_targets(frame, king, targets);

        if frame.attacks & bit(king) != 0 {
            return;
        }

        let (home, rights) = match us {
            Color::White => (4, self.state().castling >> 2),
            Color::Black => (60, self.state().castling & 0b11),
        };
        if king != home {
            return;
        }
        let rook = Some(Piece::new(PieceKind::Rook, us));

        if rights & 0b10 != 0 {
            let rook_sq = home + 3;
            if self.mailbox[rook_sq] == rook
                && self.tables.between(home, rook_sq) & self.fullboard == 0
                && self.tables.between(home, home + 3) & frame.attacks == 0
            {
                frame
                    .moves
                    .push(Move::new(home, home + 2, FLAG_CASTLING | FLAG_KINGSIDE));
            }
        }
        if rights & 0b01 != 0 {
            let rook_sq = home - 4;
            if self.mailbox[rook_sq] == rook
                && self.tables.between(home, rook_sq) & self.fullboard == 0
                && self.tables.between(home, home - 3) & frame.attacks == 0
            {
                frame
                    .moves
                    .push(Move::new(home, home - 2, FLAG_CASTLING | FLAG_QUEENSIDE));
            }
        }
    }

    // ========================================================================
    // ORDERING
    // ========================================================================

    /// Ordering score: transposition move first, then captures by
    /// victim/attacker value, then promotions by promoted piece.
    pub fn move_order_score(&self, mv: Move, tt_move: Move) -> i32 {
        let mut score = 0;
        if mv == tt_move {
            score += 10_000;
        }
        if let (Some(victim), Some(attacker)) = (self.piece_at(mv.to()), self.piece_at(mv.from())) {
            score += 10 * ORDER_VALUES[victim.kind as usize] - ORDER_VALUES[attacker.kind as usize];
        }
        if let Some(kind) = mv.promotion() {
            score += match kind {
                PieceKind::Queen => 900,
                PieceKind::Rook => 500,
                _ => 300,
            } - 100;
        }
        score
    }

    /// Sorted copy of `moves`, best first. Ties keep generation order.
    pub fn order_moves(&self, moves: &[Move], tt_move: Move) -> Vec<Move> {
        let mut scored: Vec<(i32, Move)> = moves
            .iter()
            .map(|&mv| (self.move_order_score(mv, tt_move), mv))
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.into_iter().map(|(_, mv)| mv).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::from_algebraic;

    fn sq(name: &str) -> usize {
        from_algebraic(name).unwrap()
    }

    fn uci_moves(board: &Board) -> Vec<String> {
        let mut moves: Vec<String> = board.legal_moves().iter().map(|m| m.to_string()).collect();
        moves.sort();
        moves
    }

    fn has(board: &Board, text: &str) -> bool {
        board.legal_moves().iter().any(|m| m.to_string() == text)
    }

    /// Walk the tree and check that no generated move leaves the mover's king
    /// attacked.
    fn assert_all_legal(board: &mut Board, depth: u32) {
        if depth == 0 {
            return;
        }
        for mv in board.legal_moves().to_vec() {
            let mover = board.side_to_move();
            board.make_move(mv);
            let king = board.king_square(mover);
            assert!(
                !board.is_square_attacked(king, !mover),
                "{} leaves king en prise in {:?}",
                mv,
                board
            );
            assert_all_legal(board, depth - 1);
            board.unmake_move(mv);
        }
    }

    #[test]
    fn test_generated_moves_are_legal() {
        let fens = [
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
            "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
        ];
        for fen in fens {
            let mut board = Board::from_fen(fen).unwrap();
            assert_all_legal(&mut board, 3);
        }
    }

    #[test]
    fn test_double_check_only_king_moves() {
        // Rook e8 and bishop b4 both check the king on e1
        let board = Board::from_fen("4r1k1/8/8/8/1b6/8/8/4K1N1 w - - 0 1").unwrap();
        assert_eq!(board.checkmask(), 0);
        assert!(!board.legal_moves().is_empty());
        for mv in board.legal_moves() {
            assert_eq!(mv.from(), sq("e1"), "non-king move {} under double check", mv);
        }
    }

    #[test]
    fn test_single_check_mask_is_segment() {
        let board = Board::from_fen("4r1k1/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
        let expected = (1..=7).fold(0u64, |m, r| m | bit(sq("e1") + 8 * r)) & !bit(sq("e1"));
        assert_eq!(board.checkmask(), expected);
        // Ra1 cannot reach the e-file
        assert!(board.legal_moves().iter().all(|m| m.from() == sq("e1")));
        assert!(!has(&board, "e1e2"), "king may not retreat along the checking ray");
    }

    #[test]
    fn test_knight_check_must_capture_or_move_king() {
        let board = Board::from_fen("4k3/8/8/8/8/3n4/8/R3K2R w KQ - 0 1").unwrap();
        assert_eq!(board.checkmask(), bit(sq("d3")));
        assert!(!has(&board, "e1g1") && !has(&board, "e1c1"));
        for mv in board.legal_moves() {
            assert!(mv.from() == sq("e1") || mv.to() == sq("d3"));
        }
    }

    #[test]
    fn test_pinned_pieces() {
        // Bishop d2 pinned by rook d8 (orthogonal), knight f2 pinned by queen h4
        let board = Board::from_fen("3r2k1/8/8/8/7q/8/3B1N2/3K4 w - - 0 1").unwrap();
        let (hv, d12) = board.pins();
        assert_eq!(hv, bit(sq("d2")));
        assert_eq!(d12, 0);
        assert!(board.legal_moves().iter().all(|m| m.from() != sq("d2")));

        let board = Board::from_fen("6k1/8/8/8/7q/8/5N2/4K3 w - - 0 1").unwrap();
        assert_eq!(board.pins().1, bit(sq("f2")));
        assert!(board.legal_moves().iter().all(|m| m.from() != sq("f2")));
    }

    #[test]
    fn test_pinned_slider_moves_along_pin() {
        let board = Board::from_fen("4r1k1/8/8/8/8/8/4R3/4K3 w - - 0 1").unwrap();
        let rook: Vec<String> = uci_moves(&board).into_iter().filter(|m| m.starts_with("e2")).collect();
        assert_eq!(rook, vec!["e2e3", "e2e4", "e2e5", "e2e6", "e2e7", "e2e8"]);
    }

    #[test]
    fn test_pinned_pawn_rules() {
        // Pawn e2 pinned on the file may push but not capture
        let board = Board::from_fen("4r1k1/8/8/8/8/3p1p2/4P3/4K3 w - - 0 1").unwrap();
        assert!(has(&board, "e2e3") && has(&board, "e2e4"));
        assert!(!has(&board, "e2d3") && !has(&board, "e2f3"));

        // Pawn d2 pinned on the a5-e1 diagonal may only take the pinner's way
        let board = Board::from_fen("6k1/8/8/8/8/2b1p3/3P4/4K3 w - - 0 1").unwrap();
        assert!(has(&board, "d2c3"));
        assert!(!has(&board, "d2e3") && !has(&board, "d2d3") && !has(&board, "d2d4"));

        // Pawn pinned along the rank cannot move at all
        let board = Board::from_fen("6k1/8/8/8/8/8/r2PK3/8 w - - 0 1").unwrap();
        assert!(board.legal_moves().iter().all(|m| m.from() != sq("d2")));
    }

    #[test]
    fn test_en_passant_horizontal_discovered_check() {
        // Taking d5xe6 would remove both pawns from the fifth rank and expose
        // the king on a5 to the rook on h5
        let board = Board::from_fen("8/8/8/K2Pp2r/8/8/8/7k w - e6 0 1").unwrap();
        assert!(has(&board, "d5d6"));
        assert!(!has(&board, "d5e6"));

        let board = Board::from_fen("8/8/8/K2Pp3/8/8/8/7k w - e6 0 1").unwrap();
        assert!(has(&board, "d5e6"));
    }

    #[test]
    fn test_en_passant_resolves_pawn_check() {
        // Black pawn d5 just double-pushed and checks the king on e4
        let board = Board::from_fen("8/8/8/3pP3/4K3/8/8/7k w - d6 0 1").unwrap();
        assert!(board.in_check());
        assert!(has(&board, "e5d6"));
    }

    #[test]
    fn test_castling_rules() {
        let open = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        assert!(has(&open, "e1g1") && has(&open, "e1c1"));

        // Rights cleared
        let no_rights = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w kq - 0 1").unwrap();
        assert!(!has(&no_rights, "e1g1") && !has(&no_rights, "e1c1"));

        // Transit square f1 attacked by the rook on f8
        let attacked = Board::from_fen("r3kr2/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        assert!(!has(&attacked, "e1g1") && has(&attacked, "e1c1"));

        // Destination c1 attacked; b1 attacked alone does not matter
        let dest = Board::from_fen("2r1k3/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        assert!(!has(&dest, "e1c1") && has(&dest, "e1g1"));
        let b_file = Board::from_fen("1r2k3/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        assert!(has(&b_file, "e1c1"));

        // Piece between king and rook
        let blocked = Board::from_fen("4k3/8/8/8/8/8/8/RN2K1NR w KQ - 0 1").unwrap();
        assert!(!has(&blocked, "e1g1") && !has(&blocked, "e1c1"));

        // In check
        let checked = Board::from_fen("4r1k1/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        assert!(!has(&checked, "e1g1") && !has(&checked, "e1c1"));
    }

    #[test]
    fn test_promotions_generate_four_moves() {
        let board = Board::from_fen("3r3k/4P3/8/8/8/8/8/K7 w - - 0 1").unwrap();
        let promos: Vec<String> = uci_moves(&board).into_iter().filter(|m| m.len() == 5).collect();
        assert_eq!(
            promos,
            vec!["e7d8b", "e7d8n", "e7d8q", "e7d8r", "e7e8b", "e7e8n", "e7e8q", "e7e8r"]
        );
        assert!(board
            .legal_moves()
            .iter()
            .filter(|m| m.to() == sq("d8"))
            .all(|m| m.is_capture()));
    }

    #[test]
    fn test_king_cannot_walk_into_attack() {
        let board = Board::from_fen("8/8/8/8/8/5k2/8/4K3 w - - 0 1").unwrap();
        assert_eq!(uci_moves(&board), vec!["e1d1", "e1d2", "e1f1"]);
    }

    #[test]
    fn test_checkmate_and_stalemate_have_no_moves() {
        let mate = Board::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3").unwrap();
        assert!(mate.legal_moves().is_empty());
        assert!(mate.in_check());

        let stale = Board::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert!(stale.legal_moves().is_empty());
        assert!(!stale.in_check());
    }

    #[test]
    fn test_order_moves_puts_tt_move_and_captures_first() {
        let board = Board::from_fen("4k3/8/8/3q4/4P3/8/8/4K2R w K - 0 1").unwrap();
        let capture = board.parse_move("e4d5").unwrap();
        let tt_move = board.parse_move("h1h8").unwrap();
        let ordered = board.order_moves(board.legal_moves(), tt_move);
        assert_eq!(ordered[0], tt_move);
        assert_eq!(ordered[1], capture);
        assert_eq!(board.move_order_score(capture, Move::NULL), 10 * 900 - 100);
        assert_eq!(ordered.len(), board.legal_moves().len());
    }
}
