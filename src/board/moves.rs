// Packed move encoding and UCI text conversion
use std::fmt;

use super::{Board, Color, PieceKind};
use crate::error::MoveParseError;
use crate::utils::{from_algebraic, to_algebraic};

// Codifica mosse: 32-bit layout
// Bits 0-5: from (0-63)
// Bits 6-11: to (0-63)
// Bits 16-31: flags
pub const FLAG_CAPTURE: u32 = 0x8000;
/// Reserved tag, never set by the generator.
pub const FLAG_CHECK: u32 = 0x4000;
pub const FLAG_PROMOTION: u32 = 0x2000;
pub const FLAG_TO_QUEEN: u32 = 0x1000;
pub const FLAG_TO_ROOK: u32 = 0x0800;
pub const FLAG_TO_BISHOP: u32 = 0x0400;
pub const FLAG_TO_KNIGHT: u32 = 0x0200;
pub const FLAG_EN_PASSANT: u32 = 0x0100;
pub const FLAG_CASTLING: u32 = 0x0080;
pub const FLAG_QUEENSIDE: u32 = 0x0040;
pub const FLAG_KINGSIDE: u32 = 0x0020;
pub const FLAG_DOUBLE_PUSH: u32 = 0x0001;

/// Promotion flag sets in generation order.
pub const PROMOTIONS: [u32; 4] = [
    FLAG_PROMOTION | FLAG_TO_QUEEN,
    FLAG_PROMOTION | FLAG_TO_ROOK,
    FLAG_PROMOTION | FLAG_TO_BISHOP,
    FLAG_PROMOTION | FLAG_TO_KNIGHT,
];

#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Move(u32);

impl Move {
    pub const NULL: Move = Move(0);

    #[inline(always)]
    pub const fn new(from: usize, to: usize, flags: u32) -> Self {
        Move(from as u32 | (to as u32) << 6 | flags << 16)
    }

    #[inline(always)]
    pub const fn from(self) -> usize {
        (self.0 & 0x3F) as usize
    }

    #[inline(always)]
    pub const fn to(self) -> usize {
        ((self.0 >> 6) & 0x3F) as usize
    }

    #[inline(always)]
    pub const fn flags(self) -> u32 {
        self.0 >> 16
    }

    #[inline(always)]
    pub const fn has(self, flag: u32) -> bool {
        self.flags() & flag != 0
    }

    #[inline(always)]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline(always)]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    #[inline(always)]
    pub const fn is_capture(self) -> bool {
        self.has(FLAG_CAPTURE)
    }

    #[inline(always)]
    pub const fn is_promotion(self) -> bool {
        self.has(FLAG_PROMOTION)
    }

    #[inline(always)]
    pub const fn is_en_passant(self) -> bool {
        self.has(FLAG_EN_PASSANT)
    }

    #[inline(always)]
    pub const fn is_castling(self) -> bool {
        self.has(FLAG_CASTLING)
    }

    #[inline(always)]
    pub const fn is_kingside(self) -> bool {
        self.has(FLAG_KINGSIDE)
    }

    #[inline(always)]
    pub const fn is_double_push(self) -> bool {
        self.has(FLAG_DOUBLE_PUSH)
    }

    pub fn promotion(self) -> Option<PieceKind> {
        if !self.is_promotion() {
            None
        } else if self.has(FLAG_TO_QUEEN) {
            Some(PieceKind::Queen)
        } else if self.has(FLAG_TO_ROOK) {
            Some(PieceKind::Rook)
        } else if self.has(FLAG_TO_BISHOP) {
            Some(PieceKind::Bishop)
        } else {
            Some(PieceKind::Knight)
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return f.write_str("0000");
        }
        write!(f, "{}{}", to_algebraic(self.from()), to_algebraic(self.to()))?;
        match self.promotion() {
            Some(PieceKind::Queen) => f.write_str("q"),
            Some(PieceKind::Rook) => f.write_str("r"),
            Some(PieceKind::Bishop) => f.write_str("b"),
            Some(_) => f.write_str("n"),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({} flags={:#06x})", self, self.flags())
    }
}

impl Board {
    /// Build a move from UCI text, inferring its flags from the current
    /// position. The move itself is trusted to be legal.
    pub fn parse_move(&self, text: &str) -> Result<Move, MoveParseError> {
        if !(4..=5).contains(&text.len()) || !text.is_ascii() {
            return Err(MoveParseError::Length(text.to_string()));
        }
        let from = from_algebraic(&text[0..2]).ok_or_else(|| MoveParseError::Square(text.to_string()))?;
        let to = from_algebraic(&text[2..4]).ok_or_else(|| MoveParseError::Square(text.to_string()))?;
        let piece = self.piece_at(from).ok_or_else(|| MoveParseError::EmptySquare(text.to_string()))?;

        let mut flags = match text.as_bytes().get(4) {
            None => 0,
            Some(b'q') => PROMOTIONS[0],
            Some(b'r') => PROMOTIONS[1],
            Some(b'b') => PROMOTIONS[2],
            Some(b'n') => PROMOTIONS[3],
            Some(_) => return Err(MoveParseError::Promotion(text.to_string())),
        };

        if self.piece_at(to).is_some() {
            flags |= FLAG_CAPTURE;
        }

        match piece.kind {
            PieceKind::King if from.abs_diff(to) == 2 => {
                flags |= FLAG_CASTLING;
                flags |= if to > from { FLAG_KINGSIDE } else { FLAG_QUEENSIDE };
            }
            PieceKind::Pawn => {
                if from % 8 != to % 8 && self.piece_at(to).is_none() {
                    flags |= FLAG_EN_PASSANT | FLAG_CAPTURE;
                }
                if from.abs_diff(to) == 16 {
                    flags |= FLAG_DOUBLE_PUSH;
                }
            }
            _ => {}
        }

        Ok(Move::new(from, to, flags))
    }
}

/// Square of the pawn removed by an en-passant capture landing on `to`.
#[inline(always)]
pub(crate) fn en_passant_victim(to: usize, mover: Color) -> usize {
    match mover {
        Color::White => to - 8,
        Color::Black => to + 8,
    }
}

/// Rook (from, to) squares for a castling move whose king lands on `to`.
#[inline(always)]
pub(crate) fn castling_rook_squares(to: usize, kingside: bool) -> (usize, usize) {
    if kingside {
        (to + 1, to - 1)
    } else {
        (to - 2, to + 1)
    }
}
