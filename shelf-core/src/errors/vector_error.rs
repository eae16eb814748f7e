/// Vector arithmetic errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum VectorError {
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("weighted average requires at least one vector")]
    EmptyInput,

    #[error("invalid decay base: {value} (must be finite and > 0)")]
    InvalidDecayBase { value: f64 },
}
