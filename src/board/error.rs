//! Error types for engine operations.

use std::fmt;

use super::types::{PieceType, Square};

/// Error type for FEN parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    /// FEN string has too few fields (needs at least 4)
    TooFewFields { found: usize },
    /// Placement does not have exactly 12 rank groups
    BadRankCount { found: usize },
    /// Invalid piece character in the placement
    InvalidPiece { char: char, rank: usize },
    /// A rank's files do not sum to exactly 11
    BadRankWidth { rank: usize, files: usize },
    /// `(` without `)`, `)` without `(`, or nested parens
    UnmatchedParen { rank: usize },
    /// A digit appeared inside a stack group
    DigitInStack { rank: usize },
    /// A stack group with fewer than two pieces
    StackTooSmall { rank: usize },
    /// `+` not followed by a piece letter
    HeroicWithoutPiece { rank: usize },
    /// Invalid side to move (must be 'r' or 'b')
    InvalidSideToMove { found: String },
    /// Invalid castling or en-passant placeholder (must be '-')
    InvalidPlaceholder { found: String },
    /// Invalid half-move clock or move number
    InvalidCounter { found: String },
    /// Malformed deploy tail
    BadDeployTail { token: String },
    /// Deploy origin square holds no stack
    DeployOriginEmpty { origin: Square },
    /// A deploy move names a piece that is not in the stack
    DeployPieceMissing { token: String },
    /// A parsed piece or stack cannot legally stand where the FEN puts it
    InvalidPlacement { rank: usize, reason: String },
}

impl fmt::Display for FenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FenError::TooFewFields { found } => {
                write!(f, "FEN must have at least 4 fields, found {found}")
            }
            FenError::BadRankCount { found } => {
                write!(f, "FEN placement must have 12 ranks, found {found}")
            }
            FenError::InvalidPiece { char, rank } => {
                write!(f, "invalid piece character '{char}' in rank {rank}")
            }
            FenError::BadRankWidth { rank, files } => {
                write!(f, "rank {rank} covers {files} files, expected 11")
            }
            FenError::UnmatchedParen { rank } => {
                write!(f, "unmatched or nested parenthesis in rank {rank}")
            }
            FenError::DigitInStack { rank } => {
                write!(f, "digit inside a stack group in rank {rank}")
            }
            FenError::StackTooSmall { rank } => {
                write!(f, "stack group needs at least two pieces in rank {rank}")
            }
            FenError::HeroicWithoutPiece { rank } => {
                write!(f, "'+' without a following piece in rank {rank}")
            }
            FenError::InvalidSideToMove { found } => {
                write!(f, "invalid side to move '{found}', expected 'r' or 'b'")
            }
            FenError::InvalidPlaceholder { found } => {
                write!(f, "expected '-' placeholder, found '{found}'")
            }
            FenError::InvalidCounter { found } => {
                write!(f, "invalid move counter '{found}'")
            }
            FenError::BadDeployTail { token } => {
                write!(f, "malformed deploy tail at '{token}'")
            }
            FenError::DeployOriginEmpty { origin } => {
                write!(f, "deploy origin {origin} holds no stack")
            }
            FenError::DeployPieceMissing { token } => {
                write!(f, "deploy move '{token}' names a piece not in the stack")
            }
            FenError::InvalidPlacement { rank, reason } => {
                write!(f, "invalid placement in rank {rank}: {reason}")
            }
        }
    }
}

impl std::error::Error for FenError {}

/// Error type for square parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SquareError {
    /// Invalid algebraic notation (files a..k, ranks 1..12)
    InvalidNotation { notation: String },
}

impl fmt::Display for SquareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SquareError::InvalidNotation { notation } => {
                write!(f, "invalid square notation '{notation}'")
            }
        }
    }
}

impl std::error::Error for SquareError {}

/// Error type for SAN parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SanError {
    /// Empty SAN string
    Empty,
    /// Invalid piece character
    InvalidPiece { char: char },
    /// Invalid square in SAN
    InvalidSquare { notation: String },
    /// Multiple legal moves match
    AmbiguousMove { san: String },
    /// No legal move matches
    NoMatchingMove { san: String },
}

impl fmt::Display for SanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SanError::Empty => write!(f, "empty SAN string"),
            SanError::InvalidPiece { char } => {
                write!(f, "invalid piece character '{char}' in SAN")
            }
            SanError::InvalidSquare { notation } => {
                write!(f, "invalid square in SAN '{notation}'")
            }
            SanError::AmbiguousMove { san } => write!(f, "ambiguous move '{san}'"),
            SanError::NoMatchingMove { san } => {
                write!(f, "no legal move matches '{san}'")
            }
        }
    }
}

impl std::error::Error for SanError {}

/// Error type for stack composition and stack-map operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackError {
    /// A stack already exists on the square
    AlreadyExists { square: Square },
    /// No stack exists on the square
    NoStack { square: Square },
    /// Carrier and cargo are not all one color
    MixedColors,
    /// Carrier plus cargo exceeds four pieces
    TooLarge { size: usize },
    /// More than one commander in the stack
    DuplicateCommander,
    /// More than one headquarter in the stack
    DuplicateHeadquarter,
    /// A carried piece is itself carrying
    NestedCarrier,
    /// The carrier kind cannot transport this cargo
    InvalidComposition {
        carrier: PieceType,
        cargo: Vec<PieceType>,
    },
}

impl fmt::Display for StackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StackError::AlreadyExists { square } => {
                write!(f, "a stack already exists on {square}")
            }
            StackError::NoStack { square } => write!(f, "no stack on {square}"),
            StackError::MixedColors => write!(f, "stack pieces must share one color"),
            StackError::TooLarge { size } => {
                write!(f, "stack of {size} pieces exceeds the limit of 4")
            }
            StackError::DuplicateCommander => {
                write!(f, "a stack may hold at most one commander")
            }
            StackError::DuplicateHeadquarter => {
                write!(f, "a stack may hold at most one headquarter")
            }
            StackError::NestedCarrier => {
                write!(f, "a carried piece may not itself carry")
            }
            StackError::InvalidComposition { carrier, cargo } => {
                write!(f, "{carrier:?} cannot transport {cargo:?}")
            }
        }
    }
}

impl std::error::Error for StackError {}

/// Error type for invalid mutating operations on the position or the
/// deploy session. Queries never produce these; they return nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpError {
    /// A deploy session is already active
    SessionActive,
    /// No deploy session is active
    SessionInactive,
    /// Commit requested while pieces remain to deploy
    CommitIncomplete { remaining: usize },
    /// The deployed piece is not among the session's remaining pieces
    PieceNotRemaining { kind: PieceType },
    /// Placing a second commander of one color
    SecondCommander { color: super::types::Color },
    /// Target square already occupied and combining not requested
    SquareOccupied { square: Square },
    /// Piece kind cannot stand on the square's terrain
    TerrainMismatch { kind: PieceType, square: Square },
    /// Stack policy violation
    Stack(StackError),
}

impl fmt::Display for OpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpError::SessionActive => write!(f, "a deploy session is already active"),
            OpError::SessionInactive => write!(f, "no deploy session is active"),
            OpError::CommitIncomplete { remaining } => {
                write!(f, "cannot commit: {remaining} pieces not yet deployed")
            }
            OpError::PieceNotRemaining { kind } => {
                write!(f, "{kind:?} is not among the remaining deploy pieces")
            }
            OpError::SecondCommander { color } => {
                write!(f, "{color} already has a commander")
            }
            OpError::SquareOccupied { square } => {
                write!(f, "square {square} is already occupied")
            }
            OpError::TerrainMismatch { kind, square } => {
                write!(f, "{kind:?} cannot stand on {square}")
            }
            OpError::Stack(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for OpError {}

impl From<StackError> for OpError {
    fn from(err: StackError) -> Self {
        OpError::Stack(err)
    }
}
