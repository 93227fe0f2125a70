use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The caller's geometry or configuration can't be evaluated.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("failed to allocate {bytes} bytes aligned to {align}")]
    Allocation { bytes: usize, align: usize },

    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, Error>;
