//! Spectral energy pipeline
//!
//! Turns a block of `FFT_SIZE` 16-bit samples into `OUTPUT_BINS` bounded
//! integer energies: optional windowing, forward real FFT, DC suppression,
//! fault clamping, normalization and saturating quantization.
//!
//! Normalization is `1/N²` without a window and `1/(N·Σw²)` with one. Neither
//! constant applies the usual factor-of-two single-sided correction to
//! non-DC bins, so outputs are a relative energy scale rather than calibrated
//! amplitudes.

use super::fft::{new_arena, FftEngine, PlanArena, PLAN_ARENA_BYTES};
use super::source::SampleSource;
use super::windowing::{WindowCache, WindowKind, WindowSelector, WindowTable};
use super::{FFT_SIZE, OUTPUT_BINS};
use crate::error::SpectrumError;

/// Spectrum context configuration
#[derive(Debug, Clone)]
pub struct SpectrumConfig {
    /// Working-memory budget for the FFT plan, at most `PLAN_ARENA_BYTES`
    pub arena_bytes: usize,

    /// Window used by [`SpectrumContext::compute_default`]
    pub default_window: WindowKind,
}

impl Default for SpectrumConfig {
    fn default() -> Self {
        Self {
            arena_bytes: PLAN_ARENA_BYTES,
            default_window: WindowKind::None,
        }
    }
}

/// Owned state for the spectral pipeline
///
/// Holds every buffer the pipeline touches, so a call never allocates. The
/// FFT plan and window tables are built lazily on first use and then kept
/// for the lifetime of the context.
///
/// Lazy initialization of the FFT plan and window tables is not guarded by
/// any mutual-exclusion mechanism; concurrent first-calls from multiple
/// logical threads constitute a data race and are an explicitly unsupported
/// usage. The context is `Send` but not `Sync`.
pub struct SpectrumContext {
    config: SpectrumConfig,

    /// Converted (and possibly windowed) samples; clobbered by the transform
    input: [f32; FFT_SIZE],

    /// Energies returned to the caller
    output: [i32; OUTPUT_BINS],

    /// Half spectrum and transform scratch
    arena: PlanArena,
    fft: Option<FftEngine>,
    windows: WindowCache,
}

impl SpectrumContext {
    /// Create a context; no transform work happens until the first call
    ///
    /// # Errors
    /// `ArenaTooSmall` if the configured budget exceeds the arena capacity.
    pub fn new(config: SpectrumConfig) -> Result<Self, SpectrumError> {
        if config.arena_bytes > PLAN_ARENA_BYTES {
            return Err(SpectrumError::ArenaTooSmall {
                required: config.arena_bytes,
                available: PLAN_ARENA_BYTES,
            });
        }

        Ok(Self {
            config,
            input: [0.0; FFT_SIZE],
            output: [0; OUTPUT_BINS],
            arena: new_arena(),
            fft: None,
            windows: WindowCache::new(),
        })
    }

    /// Compute the energy spectrum of `source`
    ///
    /// # Arguments
    /// * `source` - Exactly `FFT_SIZE` samples
    /// * `window` - Window applied before the transform
    ///
    /// # Returns
    /// A view of `OUTPUT_BINS` energies, valid until the next call. Index 0
    /// (DC) is always 0; the Nyquist bin is not included.
    ///
    /// # Errors
    /// Any error leaves the previous output untouched.
    pub fn compute<S: SampleSource + ?Sized>(
        &mut self,
        source: &S,
        window: WindowKind,
    ) -> Result<&[i32; OUTPUT_BINS], SpectrumError> {
        check_length(source)?;

        for (i, x) in self.input.iter_mut().enumerate() {
            *x = source.sample_at(i) as f32;
        }

        let table = self.windows.get(window);
        if let Some(table) = table {
            table.apply(&mut self.input);
        }
        let norm = normalization(table);

        if self.fft.is_none() {
            self.fft = Some(FftEngine::plan(self.config.arena_bytes)?);
        }
        let Some(fft) = self.fft.as_ref() else {
            return Err(SpectrumError::InitFailed("plan missing after construction".into()));
        };

        let bins = fft.transform(&mut self.input, &mut self.arena)?;

        // DC carries no useful information here
        self.output[0] = 0;

        for (out, bin) in self.output[1..].iter_mut().zip(&bins[1..OUTPUT_BINS]) {
            *out = quantize_energy(sanitize_energy(bin.re, bin.im), norm);
        }

        Ok(&self.output)
    }

    /// Like [`compute`](Self::compute), but returns an owned copy
    pub fn compute_owned<S: SampleSource + ?Sized>(
        &mut self,
        source: &S,
        window: WindowKind,
    ) -> Result<[i32; OUTPUT_BINS], SpectrumError> {
        self.compute(source, window).map(|view| *view)
    }

    /// Compute with a host window argument
    ///
    /// Length is checked before the selector, and both before any work.
    pub fn compute_with_selector<S: SampleSource + ?Sized>(
        &mut self,
        source: &S,
        selector: WindowSelector<'_>,
    ) -> Result<&[i32; OUTPUT_BINS], SpectrumError> {
        check_length(source)?;

        let window = WindowKind::from_selector(selector)?;
        self.compute(source, window)
    }

    /// Compute with the configured default window
    pub fn compute_default<S: SampleSource + ?Sized>(
        &mut self,
        source: &S,
    ) -> Result<&[i32; OUTPUT_BINS], SpectrumError> {
        let window = self.config.default_window;
        self.compute(source, window)
    }

    /// Result of the last successful call (all zeros before the first)
    pub fn output(&self) -> &[i32; OUTPUT_BINS] {
        &self.output
    }

    /// Whether the FFT plan has been built
    pub fn is_planned(&self) -> bool {
        self.fft.is_some()
    }

    /// Number of window tables built so far
    pub fn cached_windows(&self) -> usize {
        self.windows.cached_count()
    }

    /// Cached window table for `kind`, building it if needed
    pub fn window_table(&self, kind: WindowKind) -> Option<&WindowTable> {
        self.windows.get(kind)
    }

    /// Configuration the context was built with
    pub fn config(&self) -> &SpectrumConfig {
        &self.config
    }
}

/// Reject a source that does not hold exactly `FFT_SIZE` samples
pub fn check_length<S: SampleSource + ?Sized>(source: &S) -> Result<(), SpectrumError> {
    let actual = source.sample_count();
    if actual != FFT_SIZE {
        return Err(SpectrumError::Length {
            expected: FFT_SIZE,
            actual,
        });
    }
    Ok(())
}

/// Squared magnitude of a bin, or 0 if it is not a usable energy
///
/// Non-finite components, a non-finite sum, or a non-positive sum all
/// clamp to 0. Faults are never reported to the caller.
pub fn sanitize_energy(re: f32, im: f32) -> f32 {
    if !re.is_finite() || !im.is_finite() {
        return 0.0;
    }

    let energy = re * re + im * im;
    if !energy.is_finite() || energy <= 0.0 {
        return 0.0;
    }

    energy
}

/// Normalize an energy and round it half-up to an `i32`
///
/// Saturates at `i32::MAX` instead of wrapping.
pub fn quantize_energy(energy: f32, norm: f32) -> i32 {
    let scaled = energy * norm;

    if scaled.is_nan() || scaled <= 0.0 {
        0
    } else if scaled >= i32::MAX as f32 {
        i32::MAX
    } else {
        (scaled + 0.5) as i32
    }
}

/// Normalization constant for an optional window
pub fn normalization(window: Option<&WindowTable>) -> f32 {
    let n = FFT_SIZE as f32;
    match window {
        None => 1.0 / (n * n),
        Some(table) => 1.0 / (n * table.sum_squares()),
    }
}
