use half::f16;
use num_complex::Complex;
use tensorbridge_tensor::{ScalarValue, Tensor};

use crate::{error::CodecError, kind::ScalarKind};

/// One scalar as it crosses the boundary: a kind tag and a fixed-width payload.
///
/// The payload is little-endian. Floats are stored as their IEEE bits (binary16
/// included, so every kind round trips exactly) and all complex kinds store two
/// binary64 lanes, real first.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaggedScalar {
    kind: ScalarKind,
    bytes: Vec<u8>,
}

/// The untyped shape of a [`TaggedScalar`] received from the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTaggedScalar {
    /// Kind name, canonical or alias.
    pub kind: String,
    /// Payload bytes.
    pub bytes: Vec<u8>,
}

impl TaggedScalar {
    /// Creates a tagged scalar, validating the payload.
    ///
    /// # Errors
    ///
    /// The payload length must equal [`ScalarKind::width`] and a bool payload must be
    /// `0` or `1`.
    pub fn new(kind: ScalarKind, bytes: Vec<u8>) -> Result<Self, CodecError> {
        if bytes.len() != kind.width() {
            return Err(CodecError::ByteLength {
                kind,
                expected: kind.width(),
                actual: bytes.len(),
            });
        }
        if kind == ScalarKind::Bool && bytes[0] > 1 {
            return Err(CodecError::InvalidBool(bytes[0]));
        }
        Ok(Self { kind, bytes })
    }

    /// The kind tag.
    pub fn kind(&self) -> ScalarKind {
        self.kind
    }

    /// The payload.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Splits into kind and payload.
    pub fn into_parts(self) -> (ScalarKind, Vec<u8>) {
        (self.kind, self.bytes)
    }

    /// Encodes a native value under its own kind.
    pub fn encode(value: &ScalarValue) -> Self {
        let kind = ScalarKind::from_dtype(value.dtype());
        let bytes = match *value {
            ScalarValue::Bool(v) => vec![u8::from(v)],
            ScalarValue::Int8(v) => v.to_le_bytes().to_vec(),
            ScalarValue::Int16(v) => v.to_le_bytes().to_vec(),
            ScalarValue::Int32(v) => v.to_le_bytes().to_vec(),
            ScalarValue::Int64(v) => v.to_le_bytes().to_vec(),
            ScalarValue::UInt8(v) => vec![v],
            ScalarValue::Float16(v) => v.to_bits().to_le_bytes().to_vec(),
            ScalarValue::Float32(v) => v.to_le_bytes().to_vec(),
            ScalarValue::Float64(v) => v.to_le_bytes().to_vec(),
            ScalarValue::Complex32(_) | ScalarValue::Complex64(_) | ScalarValue::Complex128(_) => {
                let c = value.to_complex128();
                let mut bytes = c.re.to_le_bytes().to_vec();
                bytes.extend_from_slice(&c.im.to_le_bytes());
                bytes
            }
        };
        Self { kind, bytes }
    }

    /// Encodes a native value after converting it to `kind`.
    pub fn encode_as(value: &ScalarValue, kind: ScalarKind) -> Self {
        Self::encode(&value.cast(kind.dtype()))
    }

    /// Decodes the payload into a native value of the tagged kind.
    pub fn decode(&self) -> Result<ScalarValue, CodecError> {
        decode_bytes(self.kind, &self.bytes)
    }
}

impl TryFrom<RawTaggedScalar> for TaggedScalar {
    type Error = CodecError;

    fn try_from(raw: RawTaggedScalar) -> Result<Self, Self::Error> {
        let kind = raw.kind.parse::<ScalarKind>()?;
        TaggedScalar::new(kind, raw.bytes)
    }
}

impl From<TaggedScalar> for RawTaggedScalar {
    fn from(scalar: TaggedScalar) -> Self {
        RawTaggedScalar {
            kind: scalar.kind.name().to_string(),
            bytes: scalar.bytes,
        }
    }
}

fn array<const N: usize>(kind: ScalarKind, bytes: &[u8]) -> Result<[u8; N], CodecError> {
    bytes.try_into().map_err(|_| CodecError::ByteLength {
        kind,
        expected: N,
        actual: bytes.len(),
    })
}

/// Decodes a payload of `kind`.
pub(crate) fn decode_bytes(kind: ScalarKind, bytes: &[u8]) -> Result<ScalarValue, CodecError> {
    let value = match kind {
        ScalarKind::Bool => match array::<1>(kind, bytes)? {
            [0] => ScalarValue::Bool(false),
            [1] => ScalarValue::Bool(true),
            [b] => return Err(CodecError::InvalidBool(b)),
        },
        ScalarKind::Int8 => ScalarValue::Int8(i8::from_le_bytes(array(kind, bytes)?)),
        ScalarKind::Int16 => ScalarValue::Int16(i16::from_le_bytes(array(kind, bytes)?)),
        ScalarKind::Int32 => ScalarValue::Int32(i32::from_le_bytes(array(kind, bytes)?)),
        ScalarKind::Int64 => ScalarValue::Int64(i64::from_le_bytes(array(kind, bytes)?)),
        ScalarKind::UInt8 => ScalarValue::UInt8(u8::from_le_bytes(array(kind, bytes)?)),
        ScalarKind::Float16 => {
            ScalarValue::Float16(f16::from_bits(u16::from_le_bytes(array(kind, bytes)?)))
        }
        ScalarKind::Float32 => ScalarValue::Float32(f32::from_le_bytes(array(kind, bytes)?)),
        ScalarKind::Float64 => ScalarValue::Float64(f64::from_le_bytes(array(kind, bytes)?)),
        ScalarKind::Complex32 | ScalarKind::Complex64 | ScalarKind::Complex128 => {
            let lanes = array::<16>(kind, bytes)?;
            let (re, im) = lanes.split_at(8);
            let re = f64::from_le_bytes(array(kind, re)?);
            let im = f64::from_le_bytes(array(kind, im)?);
            ScalarValue::Complex128(Complex::new(re, im)).cast(kind.dtype())
        }
    };
    Ok(value)
}

/// Reads the single element of a tensor as a tagged scalar.
///
/// # Errors
///
/// Returns [`CodecError::NotAScalar`] unless the tensor has exactly one element.
pub fn item(tensor: &Tensor) -> Result<TaggedScalar, CodecError> {
    if tensor.numel() != 1 {
        return Err(CodecError::NotAScalar(tensor.numel()));
    }
    Ok(TaggedScalar::encode(&tensor.item()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tensorbridge_tensor::DType;

    fn round_trip(value: ScalarValue) -> Result<ScalarValue, CodecError> {
        let encoded = TaggedScalar::encode(&value);
        assert_eq!(encoded.bytes().len(), encoded.kind().width());
        TaggedScalar::new(encoded.kind(), encoded.bytes().to_vec())?.decode()
    }

    fn same_bits(a: ScalarValue, b: ScalarValue) -> bool {
        TaggedScalar::encode(&a) == TaggedScalar::encode(&b)
    }

    #[test]
    fn integers_round_trip() -> Result<(), CodecError> {
        let values = [
            ScalarValue::Bool(false),
            ScalarValue::Bool(true),
            ScalarValue::Int8(i8::MIN),
            ScalarValue::Int8(-1),
            ScalarValue::Int16(i16::MAX),
            ScalarValue::Int32(-123_456),
            ScalarValue::Int64(i64::MIN),
            ScalarValue::Int64(0),
            ScalarValue::UInt8(u8::MAX),
        ];
        for v in values {
            assert_eq!(round_trip(v)?, v);
        }
        Ok(())
    }

    #[test]
    fn floats_round_trip_bit_exact() -> Result<(), CodecError> {
        let values = [
            ScalarValue::Float16(f16::MAX),
            ScalarValue::Float16(f16::from_f32(-0.333)),
            ScalarValue::Float16(f16::NAN),
            ScalarValue::Float32(f32::MIN_POSITIVE),
            ScalarValue::Float32(f32::NEG_INFINITY),
            ScalarValue::Float32(f32::NAN),
            ScalarValue::Float64(-0.0),
            ScalarValue::Float64(f64::MAX),
            ScalarValue::Float64(f64::INFINITY),
        ];
        for v in values {
            assert!(same_bits(round_trip(v)?, v), "{v:?}");
        }
        Ok(())
    }

    #[test]
    fn extremes_round_trip() -> Result<(), CodecError> {
        let extremes = [
            (ScalarValue::Bool(false), ScalarValue::Bool(true)),
            (ScalarValue::Int8(i8::MIN), ScalarValue::Int8(i8::MAX)),
            (ScalarValue::Int16(i16::MIN), ScalarValue::Int16(i16::MAX)),
            (ScalarValue::Int32(i32::MIN), ScalarValue::Int32(i32::MAX)),
            (ScalarValue::Int64(i64::MIN), ScalarValue::Int64(i64::MAX)),
            (ScalarValue::UInt8(u8::MIN), ScalarValue::UInt8(u8::MAX)),
            (ScalarValue::Float16(f16::MIN), ScalarValue::Float16(f16::MAX)),
            (ScalarValue::Float32(f32::MIN), ScalarValue::Float32(f32::MAX)),
            (ScalarValue::Float64(f64::MIN), ScalarValue::Float64(f64::MAX)),
            (
                ScalarValue::Complex32(Complex::new(f16::MIN, f16::MIN)),
                ScalarValue::Complex32(Complex::new(f16::MAX, f16::MAX)),
            ),
            (
                ScalarValue::Complex64(Complex::new(f32::MIN, f32::MIN)),
                ScalarValue::Complex64(Complex::new(f32::MAX, f32::MAX)),
            ),
            (
                ScalarValue::Complex128(Complex::new(f64::MIN, f64::MIN)),
                ScalarValue::Complex128(Complex::new(f64::MAX, f64::MAX)),
            ),
        ];
        let mut kinds = Vec::new();
        for (min, max) in extremes {
            assert_eq!(round_trip(min)?, min);
            assert_eq!(round_trip(max)?, max);
            kinds.push(TaggedScalar::encode(&min).kind());
        }
        assert_eq!(kinds, ScalarKind::ALL.to_vec());
        Ok(())
    }

    #[test]
    fn complex_lanes_are_doubles() -> Result<(), CodecError> {
        let v = ScalarValue::Complex64(Complex::new(1.5f32, -2.0));
        let encoded = TaggedScalar::encode(&v);
        assert_eq!(encoded.kind(), ScalarKind::Complex64);
        assert_eq!(&encoded.bytes()[..8], &1.5f64.to_le_bytes());
        assert_eq!(&encoded.bytes()[8..], &(-2.0f64).to_le_bytes());
        assert_eq!(encoded.decode()?, v);

        let h = ScalarValue::Complex32(Complex::new(f16::from_f32(0.5), f16::MIN));
        assert_eq!(round_trip(h)?, h);
        let d = ScalarValue::Complex128(Complex::new(f64::MIN, f64::NAN));
        assert!(same_bits(round_trip(d)?, d));
        Ok(())
    }

    #[test]
    fn invalid_payloads() {
        assert_eq!(
            TaggedScalar::new(ScalarKind::Int32, vec![0; 3]),
            Err(CodecError::ByteLength {
                kind: ScalarKind::Int32,
                expected: 4,
                actual: 3
            })
        );
        assert_eq!(
            TaggedScalar::new(ScalarKind::Bool, vec![2]),
            Err(CodecError::InvalidBool(2))
        );
    }

    #[test]
    fn raw_scalars() -> Result<(), CodecError> {
        let raw = RawTaggedScalar {
            kind: "long".to_string(),
            bytes: 42i64.to_le_bytes().to_vec(),
        };
        let scalar = TaggedScalar::try_from(raw)?;
        assert_eq!(scalar.decode()?, ScalarValue::Int64(42));
        assert_eq!(RawTaggedScalar::from(scalar).kind, "int64");

        let unknown = RawTaggedScalar {
            kind: "bfloat16".to_string(),
            bytes: vec![0, 0],
        };
        assert!(matches!(
            TaggedScalar::try_from(unknown),
            Err(CodecError::UnsupportedKind(_))
        ));
        Ok(())
    }

    #[test]
    fn encode_as_casts() -> Result<(), CodecError> {
        let scalar = TaggedScalar::encode_as(&ScalarValue::Float64(3.0), ScalarKind::Int16);
        assert_eq!(scalar.decode()?, ScalarValue::Int16(3));
        Ok(())
    }

    #[test]
    fn item_of_single_element_tensor() -> Result<(), CodecError> {
        let t = Tensor::from_shape_vec(vec![1, 1], vec![7u8])?;
        assert_eq!(item(&t)?.decode()?, ScalarValue::UInt8(7));
        let neg = Tensor::scalar(ScalarValue::Float32(2.0)).neg()?;
        assert_eq!(item(&neg)?.decode()?, ScalarValue::Float32(-2.0));
        let many = Tensor::zeros(vec![2], DType::Int32);
        assert_eq!(item(&many), Err(CodecError::NotAScalar(2)));
        Ok(())
    }
}
