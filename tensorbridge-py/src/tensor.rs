use pyo3::prelude::*;
use pyo3::types::PyBytes;

use tensorbridge_codec::{
    self as codec, RawTaggedScalar, ScalarKind, TaggedScalar, TaggedScalarList,
};
use tensorbridge_fmt::{repr, PrintOptions};
use tensorbridge_tensor::{checked_numel, Tensor, TensorError};

use crate::error::{codec_err, format_err, tensor_err};

/// A tagged scalar as seen from Python: the kind name and the little-endian bytes.
pub type PyTaggedScalar<'py> = (&'static str, Bound<'py, PyBytes>);

#[pyclass(name = "Tensor", module = "tensorbridge_rs", frozen)]
pub struct PyTensor {
    pub(crate) inner: Tensor,
}

impl From<Tensor> for PyTensor {
    fn from(inner: Tensor) -> Self {
        Self { inner }
    }
}

#[pymethods]
impl PyTensor {
    pub fn size(&self) -> Vec<usize> {
        self.inner.shape().to_vec()
    }

    #[getter]
    pub fn dtype(&self) -> &'static str {
        ScalarKind::from(self.inner.dtype()).name()
    }

    pub fn numel(&self) -> usize {
        self.inner.numel()
    }

    pub fn dim(&self) -> usize {
        self.inner.dim()
    }

    pub fn is_complex(&self) -> bool {
        self.inner.is_complex()
    }

    pub fn is_floating_point(&self) -> bool {
        self.inner.is_floating_point()
    }

    pub fn is_conj(&self) -> bool {
        self.inner.is_conj()
    }

    pub fn is_neg(&self) -> bool {
        self.inner.is_neg()
    }

    pub fn __repr__(&self) -> PyResult<String> {
        repr(&self.inner, &PrintOptions::default()).map_err(format_err)
    }
}

fn to_py_scalar(py: Python<'_>, scalar: &TaggedScalar) -> PyTaggedScalar<'_> {
    (scalar.kind().name(), PyBytes::new(py, scalar.bytes()))
}

#[pyfunction]
#[pyo3(signature = (values, shape, dtype=None))]
/// Builds a tensor from a list of `(kind, bytes)` pairs and a shape.
///
/// `dtype` converts the literal to another kind, by canonical or alias name.
pub fn tensor(
    values: Vec<(String, Vec<u8>)>,
    shape: Vec<i64>,
    dtype: Option<&str>,
) -> PyResult<PyTensor> {
    let values = values
        .into_iter()
        .map(|(kind, bytes)| TaggedScalar::try_from(RawTaggedScalar { kind, bytes }))
        .collect::<Result<Vec<_>, _>>()
        .map_err(codec_err)?;
    let kind = dtype
        .map(str::parse::<ScalarKind>)
        .transpose()
        .map_err(codec_err)?;
    let list = TaggedScalarList { values, shape };
    let t = codec::tensor_from_list(&list, kind).map_err(codec_err)?;
    Ok(t.into())
}

#[pyfunction]
/// Extracts every element of `t` as `(kind, bytes)` pairs, along with the shape.
pub fn to_list<'py>(
    py: Python<'py>,
    t: &PyTensor,
) -> PyResult<(Vec<PyTaggedScalar<'py>>, Vec<i64>)> {
    let list = codec::tensor_to_list(&t.inner).map_err(codec_err)?;
    let values = list.values.iter().map(|s| to_py_scalar(py, s)).collect();
    Ok((values, list.shape))
}

#[pyfunction]
/// The single element of `t` as a `(kind, bytes)` pair.
pub fn item<'py>(py: Python<'py>, t: &PyTensor) -> PyResult<PyTaggedScalar<'py>> {
    let scalar = codec::item(&t.inner).map_err(codec_err)?;
    Ok(to_py_scalar(py, &scalar))
}

#[pyfunction]
pub fn neg(t: &PyTensor) -> PyResult<PyTensor> {
    Ok(t.inner.neg().map_err(tensor_err)?.into())
}

#[pyfunction]
pub fn conj(t: &PyTensor) -> PyTensor {
    t.inner.conj().into()
}

#[pyfunction]
#[pyo3(signature = (shape, dtype="float32"))]
pub fn zeros(shape: Vec<usize>, dtype: &str) -> PyResult<PyTensor> {
    let kind = dtype.parse::<ScalarKind>().map_err(codec_err)?;
    if checked_numel(&shape).is_none() {
        return Err(tensor_err(TensorError::ShapeOverflow(shape)));
    }
    Ok(Tensor::zeros(shape, kind.dtype()).into())
}
