use thiserror::Error;

/// Recoverable failures from grid construction and rebuilds.
///
/// Precondition violations (non-positive radius, zero workers, use of a
/// coordinate outside the encodable range) are programming errors and
/// panic instead of appearing here.
#[derive(Debug, Error)]
pub enum GridError {
    /// The fixed-size worker pool could not be created.
    #[error("failed to build worker thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// An entity reported a NaN or infinite position during a rebuild.
    #[error("entity {index} has a non-finite position")]
    InvalidPosition { index: usize },
}
