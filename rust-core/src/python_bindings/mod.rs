//! PyO3 bindings for Python integration

use pyo3::prelude::*;

mod spectrum_bindings;

/// Python module definition
#[pymodule]
fn fastfft(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(spectrum_bindings::rfft, m)?)?;
    m.add_class::<spectrum_bindings::PyFastFft>()?;

    m.add("FFT_SIZE", crate::spectrum::FFT_SIZE)?;
    m.add("OUTPUT_BINS", crate::spectrum::OUTPUT_BINS)?;

    Ok(())
}
