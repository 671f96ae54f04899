//! Error types for contour generation.
//!
//! Validation errors are raised before any cell is classified, so a failed call
//! never returns partial output. The internal variants signal a broken case table
//! or tracer invariant rather than bad data.

use thiserror::Error;

/// Errors returned by field construction and the contouring entry points.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ContourError {
    /// The field has fewer than two rows of grid points.
    #[error("field must have at least 2 rows, got {0}")]
    TooFewRows(usize),

    /// The field has fewer than two columns of grid points.
    #[error("field must have at least 2 columns, got {0}")]
    TooFewColumns(usize),

    /// A row differs in length from the first row.
    #[error("row {row} has {found} values, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A flat buffer does not hold `width * height` values.
    #[error("flat buffer holds {found} values, expected {expected} ({width}x{height})")]
    FlatLength {
        width: usize,
        height: usize,
        expected: usize,
        found: usize,
    },

    /// A threshold, lower bound or band width is NaN or infinite.
    #[error("{name}[{index}] must be a finite number, got {value}")]
    NonFinite {
        name: &'static str,
        index: usize,
        value: f64,
    },

    /// Band widths must match the lower bounds one to one, or be a single value.
    #[error("{widths} band widths given for {lowers} lower bounds")]
    LengthMismatch { lowers: usize, widths: usize },

    /// An options document could not be parsed.
    #[error("invalid options: {0}")]
    InvalidOptions(String),

    /// A cell code with no entry in the case table.
    #[error("cell code {0} has no case table entry")]
    UnknownCellCode(u8),

    /// The saddle resolver was handed a code that is not a saddle.
    #[error("cell code {0} is not a saddle configuration")]
    NotASaddle(u8),

    /// Frame walking turned more often than a full lap allows.
    #[error("frame walk starting at cell ({x}, {y}) exceeded {turns} turns")]
    FrameWalkOverflow { x: usize, y: usize, turns: u8 },

    /// A path moved into a cell that has no pending edge at the entry port.
    #[error("no pending edge at port {port} of cell ({x}, {y})")]
    MissingEdge { x: usize, y: usize, port: &'static str },
}

impl ContourError {
    /// Create a NonFinite error.
    pub fn non_finite(name: &'static str, index: usize, value: f64) -> Self {
        Self::NonFinite { name, index, value }
    }

    /// True for errors caused by the caller's input rather than an internal
    /// consistency failure.
    pub fn is_input_error(&self) -> bool {
        !matches!(
            self,
            Self::UnknownCellCode(_)
                | Self::NotASaddle(_)
                | Self::FrameWalkOverflow { .. }
                | Self::MissingEdge { .. }
        )
    }
}

/// Result type for contouring operations.
pub type Result<T> = std::result::Result<T, ContourError>;
