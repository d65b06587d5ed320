mod error;
mod index;
mod options;
mod tensor;

use crate::index::PyIndexDescriptor;
use crate::options::PyPrintOptions;
use crate::tensor::PyTensor;
use pyo3::prelude::*;

pub fn get_version() -> String {
    let version = env!("CARGO_PKG_VERSION").to_string();
    // cargo uses "1.0-alpha1" etc. while python uses "1.0.0a1"
    version.replace("-alpha", "a").replace("-beta", "b")
}

#[pymodule]
pub fn tensorbridge_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add("__version__", get_version())?;
    m.add_function(wrap_pyfunction!(tensor::tensor, m)?)?;
    m.add_function(wrap_pyfunction!(tensor::to_list, m)?)?;
    m.add_function(wrap_pyfunction!(tensor::item, m)?)?;
    m.add_function(wrap_pyfunction!(tensor::neg, m)?)?;
    m.add_function(wrap_pyfunction!(tensor::conj, m)?)?;
    m.add_function(wrap_pyfunction!(tensor::zeros, m)?)?;
    m.add_function(wrap_pyfunction!(index::index, m)?)?;
    m.add_function(wrap_pyfunction!(options::repr, m)?)?;
    m.add_class::<PyTensor>()?;
    m.add_class::<PyPrintOptions>()?;
    m.add_class::<PyIndexDescriptor>()?;
    Ok(())
}
