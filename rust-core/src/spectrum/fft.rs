//! FFT engine using realfft for real-valued signals
//!
//! The plan is built once; each transform runs against a caller-owned
//! fixed arena so the hot path never allocates.
//!
//! Arena layout, in complex slots:
//!
//! | slots | use |
//! |---|---|
//! | `0..NUM_BINS` | half spectrum written by the transform |
//! | `NUM_BINS..NUM_BINS + scratch` | scratch the plan asks for |
//!
//! The budget also counts the plan's twiddle tables (`FFT_SIZE/2` for the
//! inner complex FFT, `FFT_SIZE/4` for the real post-processing pass).
//! realfft stores those in its own one-time allocation at plan time.

use num_complex::Complex;
use realfft::{RealFftPlanner, RealToComplex};
use std::mem::size_of;
use std::sync::Arc;

use super::{FFT_SIZE, NUM_BINS};
use crate::error::SpectrumError;

/// Capacity of the plan arena in bytes
pub const PLAN_ARENA_BYTES: usize = 16384;

/// Capacity of the plan arena in complex slots
pub const PLAN_ARENA_SLOTS: usize = PLAN_ARENA_BYTES / size_of::<Complex<f32>>();

/// Twiddle factors held by a `FFT_SIZE`-point real plan
const TWIDDLE_SLOTS: usize = FFT_SIZE / 2 + FFT_SIZE / 4;

/// Working memory of the plan before any scratch it requests
pub const PLAN_BASE_BYTES: usize = (TWIDDLE_SLOTS + NUM_BINS) * size_of::<Complex<f32>>();

const _: () = assert!(PLAN_BASE_BYTES <= PLAN_ARENA_BYTES, "plan arena too small for FFT_SIZE");

/// Fixed working memory for the transform
pub type PlanArena = [Complex<f32>; PLAN_ARENA_SLOTS];

/// Forward real FFT for `FFT_SIZE` samples
pub struct FftEngine {
    /// Real FFT processor
    r2c: Arc<dyn RealToComplex<f32>>,

    /// Scratch slots requested by the plan
    scratch_len: usize,
}

impl FftEngine {
    /// Plan the forward transform
    ///
    /// # Arguments
    /// * `arena_bytes` - Working-memory budget the plan must fit in
    ///
    /// # Errors
    /// `ArenaTooSmall` if the plan needs more working memory than the
    /// budget allows; `InitFailed` if the planner returns a plan of the
    /// wrong size.
    pub fn plan(arena_bytes: usize) -> Result<Self, SpectrumError> {
        let mut planner = RealFftPlanner::<f32>::new();
        let r2c = planner.plan_fft_forward(FFT_SIZE);

        if r2c.len() != FFT_SIZE {
            return Err(SpectrumError::InitFailed(format!(
                "planner returned a {}-point transform, wanted {}",
                r2c.len(),
                FFT_SIZE
            )));
        }

        let scratch_len = r2c.get_scratch_len();
        let required = Self::required_bytes(scratch_len);
        let available = arena_bytes.min(PLAN_ARENA_BYTES);

        if required > available {
            log::warn!(
                "FFT plan rejected: needs {} arena bytes, {} available",
                required,
                available
            );
            return Err(SpectrumError::ArenaTooSmall { required, available });
        }

        log::debug!(
            "Planned {}-point real FFT ({} of {} arena bytes, {} scratch slots)",
            FFT_SIZE,
            required,
            available,
            scratch_len
        );

        Ok(Self { r2c, scratch_len })
    }

    fn required_bytes(scratch_len: usize) -> usize {
        PLAN_BASE_BYTES + scratch_len * size_of::<Complex<f32>>()
    }

    /// Run the forward transform
    ///
    /// `input` is used as scratch and holds garbage afterwards. The half
    /// spectrum is written to the front of `arena` and returned.
    pub fn transform<'a>(
        &self,
        input: &mut [f32; FFT_SIZE],
        arena: &'a mut PlanArena,
    ) -> Result<&'a [Complex<f32>], SpectrumError> {
        let (spectrum, rest) = arena.split_at_mut(NUM_BINS);
        self.r2c
            .process_with_scratch(input, spectrum, &mut rest[..self.scratch_len])?;
        Ok(spectrum)
    }

    /// Arena bytes this plan accounts for
    pub fn arena_bytes(&self) -> usize {
        Self::required_bytes(self.scratch_len)
    }

    /// Center frequency of `bin` in Hz
    pub fn bin_frequency(bin: usize, sample_rate: f32) -> f32 {
        bin as f32 * sample_rate / FFT_SIZE as f32
    }
}

/// A zeroed arena
pub fn new_arena() -> PlanArena {
    [Complex::new(0.0, 0.0); PLAN_ARENA_SLOTS]
}
