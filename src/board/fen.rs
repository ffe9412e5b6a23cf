// FEN parsing/setter su Board
use super::{
    Board, BoardState, Color, Piece, PieceKind, BLACK_KINGSIDE, BLACK_QUEENSIDE, WHITE_KINGSIDE,
    WHITE_QUEENSIDE,
};
use super::moves::en_passant_victim;
use crate::error::{FenError, LeoneResult};
use crate::utils::{from_algebraic, to_algebraic};

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

impl Board {
    pub fn from_fen(fen: &str) -> Result<Board, FenError> {
        let mut board = Board::new();
        board.set_fen(fen)?;
        Ok(board)
    }

    /// Set up a FEN position and replay `moves` (UCI text) on top of it.
    /// Clears the repetition counts.
    pub fn set_position<S: AsRef<str>>(&mut self, fen: &str, moves: &[S]) -> LeoneResult<()> {
        self.set_fen(fen)?;
        for text in moves {
            let mv = self.parse_move(text.as_ref())?;
            self.make_move(mv);
        }
        tracing::trace!(fen, moves = moves.len(), hash = self.zobrist, "position set");
        Ok(())
    }

    /// Parse the six FEN fields. Trailing fields may be omitted and default
    /// to `w - - 0 1`.
    pub fn set_fen(&mut self, fen: &str) -> Result<(), FenError> {
        let mut parts = fen.split_whitespace();
        let placement = parts.next().ok_or(FenError::MissingBoard)?;
        let side_part = parts.next().unwrap_or("w");
        let castle_part = parts.next().unwrap_or("-");
        let ep_part = parts.next().unwrap_or("-");
        let halfmove_part = parts.next().unwrap_or("0");
        let fullmove_part = parts.next().unwrap_or("1");

        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::RankCount(ranks.len()));
        }
        // Validate before touching the board
        let mut placed = Vec::with_capacity(32);
        for (i, rank_part) in ranks.iter().enumerate() {
            let rank = 7 - i;
            let mut file = 0usize;
            for ch in rank_part.chars() {
                if let Some(run) = ch.to_digit(10) {
                    file += run as usize;
                } else {
                    let piece = Piece::from_char(ch).ok_or(FenError::InvalidPiece(ch))?;
                    if file < 8 {
                        placed.push((piece, rank * 8 + file));
                    }
                    file += 1;
                }
            }
            if file != 8 {
                return Err(FenError::RankLength { rank: rank + 1, files: file });
            }
        }

        for (color, name) in [(Color::White, "white"), (Color::Black, "black")] {
            let count = placed
                .iter()
                .filter(|(p, _)| p.color == color && p.kind == PieceKind::King)
                .count() as u32;
            if count != 1 {
                return Err(FenError::KingCount { color: name, count });
            }
        }

        let side = match side_part {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::InvalidSide(other.to_string())),
        };

        let mut castling = 0u8;
        for ch in castle_part.chars() {
            castling |= match ch {
                'K' => WHITE_KINGSIDE,
                'Q' => WHITE_QUEENSIDE,
                'k' => BLACK_KINGSIDE,
                'q' => BLACK_QUEENSIDE,
                '-' => 0,
                other => return Err(FenError::InvalidCastling(other)),
            };
        }

        let ep_square = match ep_part {
            "-" => None,
            text => match from_algebraic(text) {
                // The target lies behind a pawn the opponent just pushed
                Some(sq) if side == Color::White && sq / 8 == 5 => Some(sq),
                Some(sq) if side == Color::Black && sq / 8 == 2 => Some(sq),
                _ => return Err(FenError::InvalidEnPassant(text.to_string())),
            },
        };
        let double_push = ep_square.map(|ep| en_passant_victim(ep, side));

        let halfmove = halfmove_part
            .parse()
            .map_err(|_| FenError::InvalidCounter(halfmove_part.to_string()))?;
        let fullmove = fullmove_part
            .parse()
            .map_err(|_| FenError::InvalidCounter(fullmove_part.to_string()))?;

        self.clear();
        for (piece, sq) in placed {
            self.put_piece(piece, sq);
        }

        let root = BoardState {
            side,
            castling,
            double_push,
            ep_square,
            halfmove,
            fullmove,
            ..BoardState::default()
        };
        let keys = &self.tables.zobrist;
        self.zobrist ^= keys.state(self.state()) ^ keys.state(&root);
        self.history[0] = root;
        self.fill_moves();
        Ok(())
    }

    pub fn to_fen(&self) -> String {
        let mut fen = String::with_capacity(90);
        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                match self.piece_at(rank * 8 + file) {
                    Some(piece) => {
                        if empty > 0 {
                            fen.push(char::from(b'0' + empty));
                            empty = 0;
                        }
                        fen.push(piece.to_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                fen.push(char::from(b'0' + empty));
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        let state = self.state();
        fen.push(' ');
        fen.push(if state.side == Color::White { 'w' } else { 'b' });
        fen.push(' ');
        if state.castling == 0 {
            fen.push('-');
        } else {
            for (flag, c) in [
                (WHITE_KINGSIDE, 'K'),
                (WHITE_QUEENSIDE, 'Q'),
                (BLACK_KINGSIDE, 'k'),
                (BLACK_QUEENSIDE, 'q'),
            ] {
                if state.castling & flag != 0 {
                    fen.push(c);
                }
            }
        }
        fen.push(' ');
        match state.ep_square {
            Some(sq) => fen.push_str(&to_algebraic(sq)),
            None => fen.push('-'),
        }
        fen.push_str(&format!(" {} {}", state.halfmove, state.fullmove));
        fen
    }
}
