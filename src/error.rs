use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("shape mismatch: {documents} training documents but {labels} labels")]
    ShapeMismatch { documents: usize, labels: usize },

    /// Logarithm of a non-positive value. Parameter validation should make this unreachable.
    #[error("math domain error: ln({0}) is undefined")]
    MathDomain(f64),

    #[error("invalid label {0}, expected 0 or 1")]
    InvalidLabel(i64),

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] json::Error),
}

pub type Result<T> = std::result::Result<T, ClassifierError>;
