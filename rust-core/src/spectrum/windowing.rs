//! Window tables for spectral analysis
//!
//! Tables are built once per kind on first use and cached for the lifetime
//! of the owning context. Coefficients depend only on `FFT_SIZE`, so a built
//! table is never invalidated.

use std::cell::OnceCell;
use std::f64::consts::PI;
use std::str::FromStr;

use super::FFT_SIZE;
use crate::error::SpectrumError;

/// Window function applied before the transform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowKind {
    /// No windowing (rectangular)
    #[default]
    None,

    /// Hann window: w[n] = 0.5*(1 - cos(2πn/(N-1)))
    Hann,

    /// Hamming window: w[n] = 0.54 - 0.46*cos(2πn/(N-1))
    Hamming,
}

/// Window argument as presented by the host, before interpretation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowSelector<'a> {
    /// Argument not supplied
    Unset,
    /// The host's null value
    Null,
    /// A boolean; `true` selects Hann
    Bool(bool),
    /// A window name, matched exactly
    Name(&'a str),
}

impl WindowKind {
    /// Interpret a host window argument
    ///
    /// `true` and `"hann"` are equivalent. Names are case-sensitive.
    pub fn from_selector(selector: WindowSelector<'_>) -> Result<Self, SpectrumError> {
        match selector {
            WindowSelector::Unset | WindowSelector::Null | WindowSelector::Bool(false) => {
                Ok(WindowKind::None)
            }
            WindowSelector::Bool(true) => Ok(WindowKind::Hann),
            WindowSelector::Name(name) => name.parse(),
        }
    }

    fn coefficient(self, n: usize) -> f64 {
        let angle = 2.0 * PI * n as f64 / (FFT_SIZE as f64 - 1.0);
        match self {
            WindowKind::None => 1.0,
            WindowKind::Hann => 0.5 * (1.0 - angle.cos()),
            WindowKind::Hamming => 0.54 - 0.46 * angle.cos(),
        }
    }
}

impl FromStr for WindowKind {
    type Err = SpectrumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hann" => Ok(WindowKind::Hann),
            "hamming" => Ok(WindowKind::Hamming),
            other => Err(SpectrumError::UnknownWindow(other.to_string())),
        }
    }
}

/// Precomputed window coefficients and their energy
#[derive(Debug, Clone, PartialEq)]
pub struct WindowTable {
    coefficients: [f32; FFT_SIZE],
    sum_squares: f32,
}

impl WindowTable {
    /// Build the table for `kind`, accumulating Σw[n]² in the same pass
    pub fn build(kind: WindowKind) -> Self {
        let mut coefficients = [0.0f32; FFT_SIZE];
        let mut sum_squares = 0.0f64;

        for (n, w) in coefficients.iter_mut().enumerate() {
            *w = kind.coefficient(n) as f32;
            sum_squares += (*w as f64) * (*w as f64);
        }

        Self {
            coefficients,
            sum_squares: sum_squares as f32,
        }
    }

    /// The `FFT_SIZE` window coefficients
    pub fn coefficients(&self) -> &[f32; FFT_SIZE] {
        &self.coefficients
    }

    /// Σ w[n]² over the table
    pub fn sum_squares(&self) -> f32 {
        self.sum_squares
    }

    /// Multiply `signal` by the window in place
    pub fn apply(&self, signal: &mut [f32; FFT_SIZE]) {
        for (s, w) in signal.iter_mut().zip(self.coefficients.iter()) {
            *s *= w;
        }
    }
}

/// Lazily-built window tables, one slot per kind
///
/// Not `Sync`: concurrent first use from several threads is unsupported.
#[derive(Debug, Default)]
pub struct WindowCache {
    hann: OnceCell<WindowTable>,
    hamming: OnceCell<WindowTable>,
}

impl WindowCache {
    /// An empty cache; no table is built until requested
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the table for `kind`, building it on first request
    ///
    /// Returns `None` for [`WindowKind::None`].
    pub fn get(&self, kind: WindowKind) -> Option<&WindowTable> {
        let slot = match kind {
            WindowKind::None => return None,
            WindowKind::Hann => &self.hann,
            WindowKind::Hamming => &self.hamming,
        };

        Some(slot.get_or_init(|| {
            log::debug!("Building {:?} window table ({} points)", kind, FFT_SIZE);
            WindowTable::build(kind)
        }))
    }

    /// Number of tables built so far
    pub fn cached_count(&self) -> usize {
        [&self.hann, &self.hamming]
            .iter()
            .filter(|slot| slot.get().is_some())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_parsing() {
        assert_eq!(WindowKind::from_selector(WindowSelector::Unset).unwrap(), WindowKind::None);
        assert_eq!(WindowKind::from_selector(WindowSelector::Null).unwrap(), WindowKind::None);
        assert_eq!(
            WindowKind::from_selector(WindowSelector::Bool(false)).unwrap(),
            WindowKind::None
        );
        assert_eq!(
            WindowKind::from_selector(WindowSelector::Bool(true)).unwrap(),
            WindowKind::from_selector(WindowSelector::Name("hann")).unwrap()
        );
        assert_eq!(
            WindowKind::from_selector(WindowSelector::Name("hamming")).unwrap(),
            WindowKind::Hamming
        );
    }

    #[test]
    fn test_selector_is_case_sensitive() {
        for name in ["Hann", "HAMMING", "hann ", "", "blackman", "none"] {
            let err = WindowKind::from_selector(WindowSelector::Name(name)).unwrap_err();
            assert!(matches!(err, SpectrumError::UnknownWindow(_)), "{name:?}");
        }
    }

    #[test]
    fn test_window_shape() {
        let hann = WindowTable::build(WindowKind::Hann);
        let hamming = WindowTable::build(WindowKind::Hamming);
        let c = hann.coefficients();
        let h = hamming.coefficients();

        // Symmetric
        assert!((c[0] - c[FFT_SIZE - 1]).abs() < 1e-6);
        assert!((h[0] - h[FFT_SIZE - 1]).abs() < 1e-6);

        // Hann touches zero at the edges, Hamming sits at 0.08
        assert!(c[0].abs() < 1e-7);
        assert!((h[0] - 0.08).abs() < 1e-6);

        // Near 1.0 in the middle (even length, so the peak falls between samples)
        assert!(c[FFT_SIZE / 2] > 0.99);
        assert!(h[FFT_SIZE / 2] > 0.99);
    }

    #[test]
    fn test_sum_squares() {
        let hann = WindowTable::build(WindowKind::Hann);
        let expected: f64 = hann.coefficients().iter().map(|&w| (w as f64) * (w as f64)).sum();
        assert!((hann.sum_squares() as f64 - expected).abs() < 1e-3);

        // Σ hann² ≈ 3(N-1)/8
        let approx = 3.0 * (FFT_SIZE as f32 - 1.0) / 8.0;
        assert!((hann.sum_squares() - approx).abs() < 1.0);
    }

    #[test]
    fn test_cache_returns_identical_tables() {
        let cache = WindowCache::new();
        assert_eq!(cache.cached_count(), 0);
        assert!(cache.get(WindowKind::None).is_none());
        assert_eq!(cache.cached_count(), 0);

        let first = cache.get(WindowKind::Hann).unwrap() as *const WindowTable;
        let first_bits: Vec<u32> = cache
            .get(WindowKind::Hann)
            .unwrap()
            .coefficients()
            .iter()
            .map(|w| w.to_bits())
            .collect();
        let second = cache.get(WindowKind::Hann).unwrap();

        assert!(std::ptr::eq(first, second));
        assert_eq!(
            first_bits,
            second.coefficients().iter().map(|w| w.to_bits()).collect::<Vec<_>>()
        );
        assert_eq!(
            WindowTable::build(WindowKind::Hann).sum_squares().to_bits(),
            second.sum_squares().to_bits()
        );
        assert_eq!(cache.cached_count(), 1);

        assert!(cache.get(WindowKind::Hamming).is_some());
        assert_eq!(cache.cached_count(), 2);
    }

    #[test]
    fn test_apply_window() {
        let table = WindowTable::build(WindowKind::Hamming);
        let mut signal = [2.0f32; FFT_SIZE];
        table.apply(&mut signal);

        for (s, w) in signal.iter().zip(table.coefficients()) {
            assert_eq!(*s, 2.0 * w);
        }
    }
}
