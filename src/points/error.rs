/// Errors raised by point buffer operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PointsError {
    /// A caller supplied an argument the buffer cannot accept
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The resulting buffer would violate its sort invariant
    #[error("Invalid state: {0}")]
    InvalidState(String),
}
