use pyo3::prelude::*;

use tensorbridge_fmt::{self as fmt, FormatError, PrintOptions, SciMode};

use crate::{error::format_err, tensor::PyTensor};

#[pyclass(name = "PrintOptions", module = "tensorbridge_rs", get_all, set_all)]
#[derive(Clone)]
pub struct PyPrintOptions {
    pub precision: u32,
    pub threshold: i64,
    pub edgeitems: i64,
    pub linewidth: i64,
    pub sci_mode: u8,
}

impl From<PrintOptions> for PyPrintOptions {
    fn from(opts: PrintOptions) -> Self {
        Self {
            precision: opts.precision,
            threshold: opts.threshold,
            edgeitems: opts.edgeitems,
            linewidth: opts.linewidth,
            sci_mode: opts.sci_mode.into(),
        }
    }
}

impl TryFrom<&PyPrintOptions> for PrintOptions {
    type Error = FormatError;

    fn try_from(opts: &PyPrintOptions) -> Result<Self, Self::Error> {
        Ok(PrintOptions {
            precision: opts.precision,
            threshold: opts.threshold,
            edgeitems: opts.edgeitems,
            linewidth: opts.linewidth,
            sci_mode: SciMode::try_from(opts.sci_mode)?,
        })
    }
}

#[pymethods]
impl PyPrintOptions {
    #[new]
    #[pyo3(signature = (precision=4, threshold=1000, edgeitems=3, linewidth=80, sci_mode=0))]
    pub fn new(precision: u32, threshold: i64, edgeitems: i64, linewidth: i64, sci_mode: u8) -> Self {
        Self {
            precision,
            threshold,
            edgeitems,
            linewidth,
            sci_mode,
        }
    }

    /// One of the named presets `default`, `short` or `full`.
    #[staticmethod]
    pub fn profile(name: &str) -> PyResult<Self> {
        Ok(PrintOptions::profile(name).map_err(format_err)?.into())
    }
}

#[pyfunction]
#[pyo3(signature = (t, options=None, indent=0))]
/// Renders `t` as text.
pub fn repr(t: &PyTensor, options: Option<PyRef<'_, PyPrintOptions>>, indent: usize) -> PyResult<String> {
    let opts = match options {
        Some(o) => PrintOptions::try_from(&*o).map_err(format_err)?,
        None => PrintOptions::default(),
    };
    fmt::render(&t.inner, indent, &opts).map_err(format_err)
}
