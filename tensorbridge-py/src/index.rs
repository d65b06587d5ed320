use pyo3::prelude::*;

use tensorbridge_codec::{self as codec, IndexDescriptor, RawIndexDescriptor, RawSlice};

use crate::{error::codec_err, tensor::PyTensor};

#[pyclass(name = "IndexDescriptor", module = "tensorbridge_rs")]
pub struct PyIndexDescriptor {
    #[pyo3(get, set)]
    pub discriminant: u8,
    #[pyo3(get, set)]
    pub integer: i64,
    #[pyo3(get, set)]
    pub boolean: bool,
    #[pyo3(get, set)]
    pub enc: u8,
    #[pyo3(get, set)]
    pub start: i64,
    #[pyo3(get, set)]
    pub stop: i64,
    #[pyo3(get, set)]
    pub step: i64,
    tensor: Option<tensorbridge_tensor::Tensor>,
}

#[pymethods]
impl PyIndexDescriptor {
    #[new]
    #[pyo3(signature = (discriminant, integer=0, boolean=false, enc=0, start=0, stop=0, step=0, tensor=None))]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        discriminant: u8,
        integer: i64,
        boolean: bool,
        enc: u8,
        start: i64,
        stop: i64,
        step: i64,
        tensor: Option<PyRef<'_, PyTensor>>,
    ) -> Self {
        Self {
            discriminant,
            integer,
            boolean,
            enc,
            start,
            stop,
            step,
            tensor: tensor.map(|t| t.inner.clone()),
        }
    }

    #[getter]
    pub fn tensor(&self) -> Option<PyTensor> {
        self.tensor.clone().map(PyTensor::from)
    }

    #[setter]
    pub fn set_tensor(&mut self, tensor: Option<PyRef<'_, PyTensor>>) {
        self.tensor = tensor.map(|t| t.inner.clone());
    }
}

impl PyIndexDescriptor {
    fn to_raw(&self) -> RawIndexDescriptor {
        RawIndexDescriptor {
            discriminant: self.discriminant,
            integer: self.integer,
            boolean: self.boolean,
            slice: RawSlice {
                enc: self.enc,
                start: self.start,
                stop: self.stop,
                step: self.step,
            },
            tensor: self.tensor.clone(),
        }
    }
}

#[pyfunction]
/// Applies the index descriptors to `t`, in order.
pub fn index(t: &PyTensor, descriptors: Vec<PyRef<'_, PyIndexDescriptor>>) -> PyResult<PyTensor> {
    let descriptors = descriptors
        .iter()
        .map(|d| IndexDescriptor::try_from(d.to_raw()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(codec_err)?;
    let out = codec::index(&t.inner, &descriptors).map_err(codec_err)?;
    Ok(out.into())
}
