//! Error taxonomy for the bipersistence pipeline.
//!
//! Every variant is an invariant violation: malformed input matrices or a
//! broken algorithmic precondition. None of them is retried. Numeric
//! near-ties are resolved by exact comparison and never surface here.

use thiserror::Error;

/// Errors raised by the Betti engine, the arrangement builder, the barcode
/// engine and the bifiltration builder.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("multigrade ({x}, {y}) out of range for a {width}x{height} grade grid")]
    GradeOutOfRange {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    #[error("dimension mismatch in {context}: expected {expected}, found {found}")]
    DimensionMismatch {
        context: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("index matrix is not monotone at multigrade ({x}, {y})")]
    InvalidIndexMatrix { x: usize, y: usize },

    #[error("support point ({x}, {y}) is out of order or repeated")]
    UnorderedSupport { x: usize, y: usize },

    #[error("face {face:?} of simplex {simplex:?} would be born after the simplex")]
    InvalidFiltration {
        simplex: Vec<usize>,
        face: Vec<usize>,
    },

    #[error(
        "spliced column {source_col} cannot reduce column {target_col}: low rows {source_low:?} and {target_low:?} differ"
    )]
    SpliceLowMismatch {
        source_col: usize,
        target_col: usize,
        source_low: Option<usize>,
        target_low: Option<usize>,
    },

    #[error(
        "crossing of anchors {lower} and {upper} at non-consecutive curve positions {lower_position} and {upper_position}"
    )]
    NonAdjacentCrossing {
        lower: usize,
        upper: usize,
        lower_position: usize,
        upper_position: usize,
    },

    #[error("anchors {lower} and {upper} are out of order on the sweep line")]
    InvertedCrossing { lower: usize, upper: usize },

    #[error("DCEL pointer structure broken at {element} {index}")]
    InconsistentDcel { element: &'static str, index: usize },

    #[error("negative Betti number at multigrade ({x}, {y})")]
    NegativeBetti { x: usize, y: usize },

    #[error("incremental barcode of face {face} differs from full re-reduction")]
    BarcodeMismatch { face: usize },

    #[error("computation worker failed: {0}")]
    Worker(String),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_carry_indices() {
        let err = Error::NonAdjacentCrossing {
            lower: 3,
            upper: 7,
            lower_position: 1,
            upper_position: 4,
        };
        let msg = err.to_string();
        assert!(msg.contains('3') && msg.contains('7'));
        assert!(msg.contains("non-consecutive"));

        let err = Error::GradeOutOfRange { x: 5, y: 1, width: 4, height: 2 };
        assert_eq!(
            err.to_string(),
            "multigrade (5, 1) out of range for a 4x2 grade grid"
        );
    }
}
