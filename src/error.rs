//! Error types for position setup
//!
//! The engine core trusts the legality of the moves it is given; these
//! errors only cover text that cannot be read at all.

/// A FEN string that could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FenError {
    #[error("missing piece placement field")]
    MissingBoard,

    #[error("expected 8 ranks, found {0}")]
    RankCount(usize),

    #[error("rank {rank} describes {files} files")]
    RankLength { rank: usize, files: usize },

    #[error("invalid piece character '{0}'")]
    InvalidPiece(char),

    #[error("invalid side to move '{0}'")]
    InvalidSide(String),

    #[error("invalid castling character '{0}'")]
    InvalidCastling(char),

    #[error("invalid en-passant square '{0}'")]
    InvalidEnPassant(String),

    #[error("invalid move counter '{0}'")]
    InvalidCounter(String),

    #[error("{color} has {count} kings")]
    KingCount { color: &'static str, count: u32 },
}

/// A UCI move string that could not be read against the current position
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveParseError {
    #[error("move '{0}' has the wrong length")]
    Length(String),

    #[error("invalid square in move '{0}'")]
    Square(String),

    #[error("invalid promotion piece in move '{0}'")]
    Promotion(String),

    #[error("no piece on the start square of move '{0}'")]
    EmptySquare(String),
}

/// Any error raised while setting a position
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LeoneError {
    #[error("FEN parse error: {0}")]
    Fen(#[from] FenError),

    #[error("invalid move: {0}")]
    Move(#[from] MoveParseError),
}

/// Result type alias for position setup
pub type LeoneResult<T> = Result<T, LeoneError>;
