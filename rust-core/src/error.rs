//! Error types for the spectral-energy pipeline

use thiserror::Error;

/// Coarse classification of a [`SpectrumError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input is not a readable view of 16-bit samples
    Shape,
    /// Input has the wrong number of samples
    Length,
    /// Unrecognized window selector or undersized plan arena
    Configuration,
    /// Transform plan could not be constructed
    Initialization,
}

#[derive(Error, Debug)]
pub enum SpectrumError {
    #[error("expected a view of 16-bit samples: {0}")]
    Shape(String),

    #[error("array length must be {expected} (got {actual})")]
    Length { expected: usize, actual: usize },

    #[error("unknown window: {0:?} (expected \"hann\" or \"hamming\")")]
    UnknownWindow(String),

    #[error("fft plan arena too small: {required} bytes required, {available} available")]
    ArenaTooSmall { required: usize, available: usize },

    #[error("fft plan construction failed: {0}")]
    InitFailed(String),

    #[error("fft processing failed: {0}")]
    Transform(#[from] realfft::FftError),
}

impl SpectrumError {
    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            SpectrumError::Shape(_) => ErrorKind::Shape,
            SpectrumError::Length { .. } => ErrorKind::Length,
            SpectrumError::UnknownWindow(_) | SpectrumError::ArenaTooSmall { .. } => {
                ErrorKind::Configuration
            }
            SpectrumError::InitFailed(_) | SpectrumError::Transform(_) => ErrorKind::Initialization,
        }
    }
}
