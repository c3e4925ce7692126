//! fastfft - Fixed-Size Spectral Energy Core
//!
//! Computes a 256-bin integer energy spectrum from a block of 512 signed
//! 16-bit samples, for constrained targets embedding an interpreter. All
//! working memory lives in one [`SpectrumContext`]; calls never allocate.

// Suppress PyO3 non-local impl warnings (harmless macro-generated code)
#![allow(non_local_definitions)]

pub mod error;
pub mod spectrum;

#[cfg(feature = "python")]
pub mod python_bindings;

pub use error::{ErrorKind, SpectrumError};
pub use spectrum::{
    SpectrumConfig, SpectrumContext, WindowKind, WindowSelector, FFT_SIZE, OUTPUT_BINS,
};
