//! Python bindings for the spectral energy pipeline

use std::cell::RefCell;

use numpy::PyArray1;
use pyo3::buffer::{PyBuffer, ReadOnlyCell};
use pyo3::exceptions::{PyRuntimeError, PyTypeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyBool, PyString};

use crate::error::{ErrorKind, SpectrumError};
use crate::spectrum::{check_length, SampleSource, SpectrumConfig, SpectrumContext, WindowSelector};

thread_local! {
    /// Context behind the module-level `rfft`
    static CONTEXT: RefCell<Option<Box<SpectrumContext>>> = RefCell::new(None);
}

impl From<SpectrumError> for PyErr {
    fn from(err: SpectrumError) -> Self {
        match err.kind() {
            ErrorKind::Shape => PyErr::new::<PyTypeError, _>(err.to_string()),
            ErrorKind::Length | ErrorKind::Configuration => {
                PyErr::new::<PyValueError, _>(err.to_string())
            }
            ErrorKind::Initialization => PyErr::new::<PyRuntimeError, _>(err.to_string()),
        }
    }
}

/// Contiguous `'h'` buffer exported by the interpreter
struct CellSamples<'a>(&'a [ReadOnlyCell<i16>]);

impl SampleSource for CellSamples<'_> {
    fn sample_count(&self) -> usize {
        self.0.len()
    }

    fn sample_at(&self, index: usize) -> i16 {
        self.0[index].get()
    }
}

fn window_selector(window: Option<&PyAny>) -> PyResult<WindowSelector<'_>> {
    let Some(obj) = window else {
        return Ok(WindowSelector::Unset);
    };

    if obj.is_none() {
        Ok(WindowSelector::Null)
    } else if let Ok(flag) = obj.downcast::<PyBool>() {
        Ok(WindowSelector::Bool(flag.is_true()))
    } else if let Ok(name) = obj.downcast::<PyString>() {
        Ok(WindowSelector::Name(name.to_str()?))
    } else {
        let type_name = obj.get_type().name()?;
        Err(SpectrumError::UnknownWindow(format!("<{type_name} object>")).into())
    }
}

fn run<'py>(
    ctx: &mut SpectrumContext,
    py: Python<'py>,
    samples: &PyAny,
    window: Option<&PyAny>,
) -> PyResult<&'py PyArray1<i32>> {
    let buffer = PyBuffer::<i16>::get(samples)
        .map_err(|_| PyErr::new::<PyTypeError, _>("expected array('h')"))?;
    let cells = buffer
        .as_slice(py)
        .ok_or_else(|| PyErr::new::<PyTypeError, _>("expected contiguous array('h')"))?;

    let samples = CellSamples(cells);
    check_length(&samples)?;

    let selector = window_selector(window)?;
    let energies = ctx.compute_with_selector(&samples, selector)?;

    Ok(PyArray1::from_slice(py, energies))
}

/// Energy spectrum of 512 int16 samples
///
/// Args:
///     samples: array('h') (or any int16 buffer) of length 512
///     window: None/False, True or "hann", or "hamming"
///
/// Returns:
///     256 int32 energies as a numpy array; index 0 (DC) is always 0
#[pyfunction]
#[pyo3(signature = (samples, window=None))]
pub fn rfft<'py>(
    py: Python<'py>,
    samples: &PyAny,
    window: Option<&PyAny>,
) -> PyResult<&'py PyArray1<i32>> {
    CONTEXT.with(|cell| {
        // A window object whose type lookup calls back into rfft lands here
        let mut slot = cell
            .try_borrow_mut()
            .map_err(|_| PyErr::new::<PyRuntimeError, _>("rfft is not re-entrant"))?;
        if slot.is_none() {
            *slot = Some(Box::new(SpectrumContext::new(SpectrumConfig::default())?));
        }
        match slot.as_deref_mut() {
            Some(ctx) => run(ctx, py, samples, window),
            None => Err(PyErr::new::<PyRuntimeError, _>("spectrum context unavailable")),
        }
    })
}

/// Spectrum engine with its own buffers and plan
#[pyclass(name = "FastFft", unsendable)]
pub struct PyFastFft {
    ctx: Box<SpectrumContext>,
}

#[pymethods]
impl PyFastFft {
    /// Create a new engine
    ///
    /// Args:
    ///     arena_bytes: Working-memory budget for the FFT plan
    #[new]
    #[pyo3(signature = (arena_bytes=crate::spectrum::PLAN_ARENA_BYTES))]
    fn new(arena_bytes: usize) -> PyResult<Self> {
        let config = SpectrumConfig {
            arena_bytes,
            ..Default::default()
        };

        Ok(Self {
            ctx: Box::new(SpectrumContext::new(config)?),
        })
    }

    /// Energy spectrum of 512 int16 samples
    ///
    /// Args:
    ///     samples: array('h') of length 512
    ///     window: None/False, True or "hann", or "hamming"
    ///
    /// Returns:
    ///     256 int32 energies as a numpy array
    #[pyo3(signature = (samples, window=None))]
    fn rfft<'py>(
        &mut self,
        py: Python<'py>,
        samples: &PyAny,
        window: Option<&PyAny>,
    ) -> PyResult<&'py PyArray1<i32>> {
        run(&mut self.ctx, py, samples, window)
    }

    /// Whether the FFT plan has been built
    fn is_planned(&self) -> bool {
        self.ctx.is_planned()
    }
}
