use ndarray::Array1;
use numpy::{IntoPyArray, PyArray1, PyReadonlyArray1};
use pyo3::create_exception;
use pyo3::exceptions::{PyRuntimeError, PyTypeError, PyValueError};
use pyo3::prelude::*;
use quant_engine_core::{
    Engine, EngineConfig, EngineError, FracDiffParams, DEFAULT_MAX_WEIGHT_TERMS,
};
use thiserror::Error;

create_exception!(quant_engine, NonConvergentWeightsError, PyRuntimeError);

/// Error wrapper for Python
#[derive(Error, Debug)]
enum PyEngineError {
    #[error("{0}")]
    Engine(#[from] EngineError),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl From<PyEngineError> for PyErr {
    fn from(e: PyEngineError) -> PyErr {
        match &e {
            PyEngineError::Engine(EngineError::NonConvergentWeights { .. }) => {
                NonConvergentWeightsError::new_err(e.to_string())
            }
            PyEngineError::Engine(EngineError::WorkerPool(_)) => PyRuntimeError::new_err(e.to_string()),
            PyEngineError::InvalidInput(_) => PyTypeError::new_err(e.to_string()),
            PyEngineError::Engine(EngineError::InvalidParameter { .. }) => {
                PyValueError::new_err(e.to_string())
            }
        }
    }
}

/// A 1-D float64 series, borrowed from numpy when contiguous, copied otherwise.
enum Series<'py> {
    Borrowed(PyReadonlyArray1<'py, f64>),
    Owned(Vec<f64>),
}

impl<'py> Series<'py> {
    fn extract(raw: &'py PyAny) -> Result<Self, PyEngineError> {
        if let Ok(arr) = raw.extract::<PyReadonlyArray1<'py, f64>>() {
            if arr.as_slice().is_ok() {
                return Ok(Series::Borrowed(arr));
            }
            return Ok(Series::Owned(arr.as_array().to_vec()));
        }
        let values: Vec<f64> = raw.extract().map_err(|_| {
            PyEngineError::InvalidInput(
                "series must be a 1-D float64 numpy array or a sequence of floats".to_string(),
            )
        })?;
        Ok(Series::Owned(values))
    }

    fn as_slice(&self) -> PyResult<&[f64]> {
        match self {
            Series::Borrowed(arr) => arr
                .as_slice()
                .map_err(|e| PyValueError::new_err(e.to_string())),
            Series::Owned(values) => Ok(values.as_slice()),
        }
    }
}

fn window_arg(window: i64) -> Result<usize, PyEngineError> {
    usize::try_from(window).map_err(|_| {
        PyEngineError::Engine(EngineError::InvalidParameter {
            name: "window",
            reason: format!("must be >= 1, got {}", window),
        })
    })
}

fn frac_params(d: f64, threshold: f64, max_terms: Option<usize>) -> FracDiffParams {
    FracDiffParams::new(d, threshold).with_max_terms(max_terms.unwrap_or(DEFAULT_MAX_WEIGHT_TERMS))
}

// The GIL is released for the whole computation and reacquired by
// `allow_threads` on return, including when the closure errors.

fn volatility_on<'py>(
    py: Python<'py>,
    engine: &Engine,
    series: &'py PyAny,
    window: i64,
) -> PyResult<&'py PyArray1<f64>> {
    let window = window_arg(window)?;
    let series = Series::extract(series)?;
    let data = series.as_slice()?;
    let out = py
        .allow_threads(|| engine.rolling_volatility(data, window))
        .map_err(PyEngineError::from)?;
    Ok(Array1::from_vec(out).into_pyarray(py))
}

fn frac_diff_on<'py>(
    py: Python<'py>,
    engine: &Engine,
    series: &'py PyAny,
    params: FracDiffParams,
) -> PyResult<&'py PyArray1<f64>> {
    let series = Series::extract(series)?;
    let data = series.as_slice()?;
    let out = py
        .allow_threads(|| engine.fractional_diff(data, &params))
        .map_err(PyEngineError::from)?;
    Ok(Array1::from_vec(out).into_pyarray(py))
}

fn weights_on<'py>(
    py: Python<'py>,
    engine: &Engine,
    params: FracDiffParams,
) -> PyResult<&'py PyArray1<f64>> {
    let w = py
        .allow_threads(|| engine.ffd_weights(&params))
        .map_err(PyEngineError::from)?;
    Ok(Array1::from_vec(w).into_pyarray(py))
}

/// calculate_volatility(series, window) -> numpy.ndarray
/// Rolling population standard deviation. The first window-1 values are 0.0;
/// returns an empty array when len(series) < window.
#[pyfunction]
#[pyo3(signature = (series, window))]
fn calculate_volatility<'py>(py: Python<'py>, series: &'py PyAny, window: i64) -> PyResult<&'py PyArray1<f64>> {
    volatility_on(py, &Engine::default(), series, window)
}

/// fractional_diff(series, d, threshold=1e-3, max_terms=None) -> numpy.ndarray
/// Fixed-width fractional differencing. Positions without a full weight span are NaN.
/// Weight generation is capped at max_terms steps (1,000,000 by default) and raises
/// NonConvergentWeightsError past it; slow pairs such as d=0.05, threshold=1e-8 need more.
#[pyfunction]
#[pyo3(signature = (series, d, threshold = 1e-3, max_terms = None))]
fn fractional_diff<'py>(
    py: Python<'py>,
    series: &'py PyAny,
    d: f64,
    threshold: f64,
    max_terms: Option<usize>,
) -> PyResult<&'py PyArray1<f64>> {
    frac_diff_on(py, &Engine::default(), series, frac_params(d, threshold, max_terms))
}

/// get_weights_ffd(d, threshold=1e-3, max_terms=None) -> numpy.ndarray
/// FFD weights, oldest lag first; the last element is 1.0.
/// Same max_terms cap and NonConvergentWeightsError as fractional_diff.
#[pyfunction]
#[pyo3(signature = (d, threshold = 1e-3, max_terms = None))]
fn get_weights_ffd<'py>(
    py: Python<'py>,
    d: f64,
    threshold: f64,
    max_terms: Option<usize>,
) -> PyResult<&'py PyArray1<f64>> {
    weights_on(py, &Engine::default(), frac_params(d, threshold, max_terms))
}

/// Engine with a dedicated worker pool.
#[pyclass(name = "QuantEngine")]
struct PyQuantEngine {
    inner: Engine,
}

#[pymethods]
impl PyQuantEngine {
    /// QuantEngine(workers: Optional[int] = None)
    /// None uses one worker per hardware thread.
    #[new]
    #[pyo3(signature = (workers = None))]
    fn new(workers: Option<usize>) -> PyResult<Self> {
        let inner = Engine::new(EngineConfig { workers }).map_err(PyEngineError::from)?;
        Ok(PyQuantEngine { inner })
    }

    #[getter]
    fn workers(&self) -> usize {
        self.inner.workers()
    }

    #[pyo3(signature = (series, window))]
    fn calculate_volatility<'py>(&self, py: Python<'py>, series: &'py PyAny, window: i64) -> PyResult<&'py PyArray1<f64>> {
        volatility_on(py, &self.inner, series, window)
    }

    #[pyo3(signature = (series, d, threshold = 1e-3, max_terms = None))]
    fn fractional_diff<'py>(
        &self,
        py: Python<'py>,
        series: &'py PyAny,
        d: f64,
        threshold: f64,
        max_terms: Option<usize>,
    ) -> PyResult<&'py PyArray1<f64>> {
        frac_diff_on(py, &self.inner, series, frac_params(d, threshold, max_terms))
    }

    #[pyo3(signature = (d, threshold = 1e-3, max_terms = None))]
    fn get_weights_ffd<'py>(
        &self,
        py: Python<'py>,
        d: f64,
        threshold: f64,
        max_terms: Option<usize>,
    ) -> PyResult<&'py PyArray1<f64>> {
        weights_on(py, &self.inner, frac_params(d, threshold, max_terms))
    }

    fn __repr__(&self) -> String {
        format!("QuantEngine(workers={})", self.inner.workers())
    }
}

/// Python module
#[pymodule]
fn quant_engine(py: Python, m: &PyModule) -> PyResult<()> {
    let _ = env_logger::try_init();
    m.add("NonConvergentWeightsError", py.get_type::<NonConvergentWeightsError>())?;
    m.add_class::<PyQuantEngine>()?;
    m.add_function(wrap_pyfunction!(calculate_volatility, m)?)?;
    m.add_function(wrap_pyfunction!(fractional_diff, m)?)?;
    m.add_function(wrap_pyfunction!(get_weights_ffd, m)?)?;
    Ok(())
}
