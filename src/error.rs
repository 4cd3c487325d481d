//! Error types for configuring and running the attack
use ndarray::ShapeError;
use ndarray_stats::errors::EmptyInput;
use thiserror::Error;

/// Configuration problems, detected before any classifier query is issued.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("The number of iterations must be a positive integer.")]
    NonPositiveMaxIter,

    #[error("The number of trials per iteration must be a positive integer.")]
    NonPositiveSampleSize,

    #[error("The number of initialization trials must be a positive integer.")]
    NonPositiveInitSize,

    #[error("The initial step size for the orthogonal step must be positive, got {0}.")]
    NonPositiveDelta(f64),

    #[error("The initial step size for the step towards the target must be positive, got {0}.")]
    NonPositiveEpsilon(f64),

    #[error("The step towards the target is a fraction of the distance and cannot exceed 1, got {0}.")]
    EpsilonAboveOne(f64),

    #[error("The adaptation factor must be in the range (0, 1), got {0}.")]
    StepAdaptOutOfRange(f64),

    #[error("Target labels need to be provided for a targeted attack.")]
    MissingTargetLabels,

    #[error("Expected {expected} target labels, one per example, got {found}.")]
    TargetLabelCount { expected: usize, found: usize },
}

#[derive(Error, Debug)]
pub enum AttackError {
    #[error("invalid configuration: {0}")]
    Configuration(#[from] ConfigError),

    #[error("invalid clip values ({min}, {max}): min must be below max and the range finite")]
    InvalidClipValues { min: f64, max: f64 },

    #[error("a batch needs a leading example axis, got an array of rank {0}")]
    InvalidBatchRank(usize),

    #[error("sample shape {found:?} does not match the original's shape {expected:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    #[error("classifier failed: {0}")]
    Oracle(String),

    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error("classifier scores have no comparable maximum: {0}")]
    Scores(#[from] EmptyInput),
}

impl AttackError {
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}
