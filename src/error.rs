use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("{file}: missing column '{column}'")]
    MissingColumn { file: String, column: &'static str },

    /// Parameters that leave a result undefined, e.g. zero diameter probes.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("graph has no nodes")]
    EmptyGraph,

    #[error("power iteration did not converge in {iterations} iterations")]
    ConvergenceFailed { iterations: usize },

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
