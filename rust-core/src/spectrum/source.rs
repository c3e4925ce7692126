//! Read-only views of 16-bit sample blocks
//!
//! The pipeline only needs to know how many samples a view holds and how to
//! read one. Host layers adapt their native buffer types to [`SampleSource`].

use crate::error::SpectrumError;

/// A readable view of signed 16-bit samples
pub trait SampleSource {
    /// Number of samples in the view
    fn sample_count(&self) -> usize;

    /// Sample at `index`, which is always `< sample_count()`
    fn sample_at(&self, index: usize) -> i16;
}

impl SampleSource for [i16] {
    fn sample_count(&self) -> usize {
        self.len()
    }

    fn sample_at(&self, index: usize) -> i16 {
        self[index]
    }
}

impl<const N: usize> SampleSource for [i16; N] {
    fn sample_count(&self) -> usize {
        N
    }

    fn sample_at(&self, index: usize) -> i16 {
        self[index]
    }
}

impl SampleSource for Vec<i16> {
    fn sample_count(&self) -> usize {
        self.len()
    }

    fn sample_at(&self, index: usize) -> i16 {
        self[index]
    }
}

/// Raw bytes holding host-endian `i16` samples
#[derive(Debug, Clone, Copy)]
pub struct NativeBytes<'a> {
    bytes: &'a [u8],
}

impl<'a> NativeBytes<'a> {
    /// Wrap a byte view
    ///
    /// # Errors
    /// `Shape` if the byte count is not a whole number of samples.
    pub fn new(bytes: &'a [u8]) -> Result<Self, SpectrumError> {
        if bytes.len() % 2 != 0 {
            return Err(SpectrumError::Shape(format!(
                "{} bytes is not a whole number of 16-bit samples",
                bytes.len()
            )));
        }
        Ok(Self { bytes })
    }
}

impl SampleSource for NativeBytes<'_> {
    fn sample_count(&self) -> usize {
        self.bytes.len() / 2
    }

    fn sample_at(&self, index: usize) -> i16 {
        i16::from_ne_bytes([self.bytes[2 * index], self.bytes[2 * index + 1]])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_and_array_views() {
        let samples = [1i16, -2, 3, i16::MIN, i16::MAX];
        assert_eq!(samples.sample_count(), 5);
        assert_eq!(samples[..].sample_count(), 5);
        assert_eq!(samples.to_vec().sample_at(3), i16::MIN);
        assert_eq!(samples[..].sample_at(4), i16::MAX);
    }

    #[test]
    fn test_native_bytes() {
        let samples = [0x1234i16, -1, 7];
        let bytes: Vec<u8> = samples.iter().flat_map(|s| s.to_ne_bytes()).collect();

        let view = NativeBytes::new(&bytes).unwrap();
        assert_eq!(view.sample_count(), 3);
        for (i, &s) in samples.iter().enumerate() {
            assert_eq!(view.sample_at(i), s);
        }
    }

    #[test]
    fn test_native_bytes_rejects_odd_length() {
        let err = NativeBytes::new(&[0u8; 1023]).unwrap_err();
        assert!(matches!(err, SpectrumError::Shape(_)));
    }
}
