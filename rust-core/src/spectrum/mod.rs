//! Fixed-size windowed real-FFT energy spectrum

pub mod analysis;
pub mod fft;
pub mod source;
pub mod windowing;

/// Transform length in samples
pub const FFT_SIZE: usize = 512;

/// Bins produced by the real transform, DC through Nyquist
pub const NUM_BINS: usize = FFT_SIZE / 2 + 1;

/// Energies returned per call (Nyquist dropped)
pub const OUTPUT_BINS: usize = FFT_SIZE / 2;

/// Size of a sample block as a byte view
pub const INPUT_BYTES: usize = FFT_SIZE * std::mem::size_of::<i16>();

pub use analysis::{
    check_length, normalization, quantize_energy, sanitize_energy, SpectrumConfig, SpectrumContext,
};
pub use fft::{FftEngine, PLAN_ARENA_BYTES, PLAN_BASE_BYTES};
pub use source::{NativeBytes, SampleSource};
pub use windowing::{WindowCache, WindowKind, WindowSelector, WindowTable};
