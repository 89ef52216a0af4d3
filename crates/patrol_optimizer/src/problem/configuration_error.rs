use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("{name} must be positive, got {value}")]
    NonPositiveCount { name: &'static str, value: usize },

    #[error("{name} must be a positive finite duration, got {value}")]
    NonPositiveDuration { name: &'static str, value: f64 },

    #[error("{name} must be a non-negative finite duration, got {value}")]
    NegativeDuration { name: &'static str, value: f64 },

    #[error("{name} of {value} seconds does not fit in a duration")]
    DurationOutOfRange { name: &'static str, value: f64 },

    #[error("{name} must be within [0, 1], got {value}")]
    ProbabilityOutOfRange { name: &'static str, value: f64 },

    #[error("expected {expected} shift lengths, got {actual}")]
    ShiftLengthsMismatch { expected: usize, actual: usize },

    #[error("no travel network configured")]
    MissingNetwork,

    #[error("invalid travel time matrix: {0}")]
    MalformedMatrix(String),

    #[error("failed to build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

pub(crate) fn ensure_positive_count(
    name: &'static str,
    value: usize,
) -> Result<usize, ConfigurationError> {
    if value == 0 {
        return Err(ConfigurationError::NonPositiveCount { name, value });
    }
    Ok(value)
}

pub(crate) fn ensure_positive_duration(
    name: &'static str,
    value: f64,
) -> Result<f64, ConfigurationError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigurationError::NonPositiveDuration { name, value });
    }
    Ok(value)
}

pub(crate) fn ensure_non_negative_duration(
    name: &'static str,
    value: f64,
) -> Result<f64, ConfigurationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigurationError::NegativeDuration { name, value });
    }
    Ok(value)
}

pub(crate) fn ensure_probability(name: &'static str, value: f64) -> Result<f64, ConfigurationError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigurationError::ProbabilityOutOfRange { name, value });
    }
    Ok(value)
}
