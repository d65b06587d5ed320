use tensorbridge_tensor::{Tensor, TensorIndex};

use crate::error::CodecError;

/// Optional bounds of a slice, each present or absent independently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SliceSpec {
    /// First position.
    pub start: Option<i64>,
    /// One past the last position.
    pub stop: Option<i64>,
    /// Distance between positions.
    pub step: Option<i64>,
}

impl SliceSpec {
    const START: u8 = 1;
    const STOP: u8 = 1 << 1;
    const STEP: u8 = 1 << 2;

    /// Builds a slice from a presence mask: bit 0 start, bit 1 stop, bit 2 step.
    ///
    /// Values whose bit is clear are ignored, as are the higher bits.
    pub fn from_mask(enc: u8, start: i64, stop: i64, step: i64) -> Self {
        Self {
            start: (enc & Self::START != 0).then_some(start),
            stop: (enc & Self::STOP != 0).then_some(stop),
            step: (enc & Self::STEP != 0).then_some(step),
        }
    }

    /// The presence mask of this slice.
    pub fn mask(&self) -> u8 {
        let mut enc = 0;
        if self.start.is_some() {
            enc |= Self::START;
        }
        if self.stop.is_some() {
            enc |= Self::STOP;
        }
        if self.step.is_some() {
            enc |= Self::STEP;
        }
        enc
    }
}

/// One per-axis index operation described by the host.
#[derive(Debug, Clone)]
pub enum IndexDescriptor {
    /// Insert a new axis.
    None,
    /// Expand over the unaddressed axes.
    Ellipsis,
    /// Select one position.
    Integer(i64),
    /// Boolean scalar mask.
    Boolean(bool),
    /// Strided range.
    Slice(SliceSpec),
    /// Advanced index by a tensor.
    Tensor(Tensor),
}

/// Discriminant of an [`IndexDescriptor`] on the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum IndexKind {
    /// `0`
    None = 0,
    /// `1`
    Ellipsis = 1,
    /// `2`
    Integer = 2,
    /// `3`
    Boolean = 3,
    /// `4`
    Slice = 4,
    /// `5`
    Tensor = 5,
}

impl TryFrom<u8> for IndexKind {
    type Error = CodecError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => IndexKind::None,
            1 => IndexKind::Ellipsis,
            2 => IndexKind::Integer,
            3 => IndexKind::Boolean,
            4 => IndexKind::Slice,
            5 => IndexKind::Tensor,
            other => return Err(CodecError::UnknownDiscriminant(other)),
        })
    }
}

/// Slice fields of a [`RawIndexDescriptor`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawSlice {
    /// Presence mask, see [`SliceSpec::from_mask`].
    pub enc: u8,
    /// Start value, meaningful when bit 0 is set.
    pub start: i64,
    /// Stop value, meaningful when bit 1 is set.
    pub stop: i64,
    /// Step value, meaningful when bit 2 is set.
    pub step: i64,
}

/// The flat shape of an index descriptor received from the host.
///
/// Only the fields selected by `discriminant` are read; the others are ignored.
#[derive(Debug, Clone, Default)]
pub struct RawIndexDescriptor {
    /// Which kind of index this is, see [`IndexKind`].
    pub discriminant: u8,
    /// Position for [`IndexKind::Integer`].
    pub integer: i64,
    /// Value for [`IndexKind::Boolean`].
    pub boolean: bool,
    /// Bounds for [`IndexKind::Slice`].
    pub slice: RawSlice,
    /// Operand for [`IndexKind::Tensor`].
    pub tensor: Option<Tensor>,
}

impl TryFrom<RawIndexDescriptor> for IndexDescriptor {
    type Error = CodecError;

    fn try_from(raw: RawIndexDescriptor) -> Result<Self, Self::Error> {
        Ok(match IndexKind::try_from(raw.discriminant)? {
            IndexKind::None => IndexDescriptor::None,
            IndexKind::Ellipsis => IndexDescriptor::Ellipsis,
            IndexKind::Integer => IndexDescriptor::Integer(raw.integer),
            IndexKind::Boolean => IndexDescriptor::Boolean(raw.boolean),
            IndexKind::Slice => IndexDescriptor::Slice(SliceSpec::from_mask(
                raw.slice.enc,
                raw.slice.start,
                raw.slice.stop,
                raw.slice.step,
            )),
            IndexKind::Tensor => {
                IndexDescriptor::Tensor(raw.tensor.ok_or(CodecError::MissingTensorOperand)?)
            }
        })
    }
}

impl IndexDescriptor {
    /// The boundary discriminant.
    pub fn kind(&self) -> IndexKind {
        match self {
            IndexDescriptor::None => IndexKind::None,
            IndexDescriptor::Ellipsis => IndexKind::Ellipsis,
            IndexDescriptor::Integer(_) => IndexKind::Integer,
            IndexDescriptor::Boolean(_) => IndexKind::Boolean,
            IndexDescriptor::Slice(_) => IndexKind::Slice,
            IndexDescriptor::Tensor(_) => IndexKind::Tensor,
        }
    }
}

/// Maps descriptors one to one onto native index operations, keeping their order.
///
/// # Errors
///
/// Returns [`CodecError::ZeroStep`] for a slice whose step is present and zero.
pub fn translate(descriptors: &[IndexDescriptor]) -> Result<Vec<TensorIndex>, CodecError> {
    descriptors
        .iter()
        .enumerate()
        .map(|(position, descriptor)| {
            Ok(match descriptor {
                IndexDescriptor::None => TensorIndex::None,
                IndexDescriptor::Ellipsis => TensorIndex::Ellipsis,
                IndexDescriptor::Integer(i) => TensorIndex::Select(*i),
                IndexDescriptor::Boolean(b) => TensorIndex::Bool(*b),
                IndexDescriptor::Slice(spec) => {
                    if spec.step == Some(0) {
                        return Err(CodecError::ZeroStep { position });
                    }
                    TensorIndex::Slice {
                        start: spec.start,
                        stop: spec.stop,
                        step: spec.step,
                    }
                }
                IndexDescriptor::Tensor(t) => TensorIndex::Tensor(t.clone()),
            })
        })
        .collect()
}

/// Translates `descriptors` and applies them to `tensor`.
///
/// Errors of the tensor library are returned unchanged as [`CodecError::Tensor`].
pub fn index(tensor: &Tensor, descriptors: &[IndexDescriptor]) -> Result<Tensor, CodecError> {
    let ops = translate(descriptors)?;
    log::trace!("translated {} index descriptors", ops.len());
    Ok(tensor.index(&ops)?)
}
