//! Operands with element types determined at runtime
//!
//! Integer operands are accumulated in `i64`, and floating point operands in `f64`.
//! When all operands share an element type, the result is cast back into it;
//! otherwise the result is left in `f64`. This is not a full promotion lattice,
//! e.g. `i32` and `i64` operands give an `f64` result.

use crate::{
    error::{Error, Result},
    executor::Contracted,
    Einsum,
};
use ndarray::ArrayD;
use num_traits::{NumCast, ToPrimitive};
use std::fmt;

/// Element type of [DynArray]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    F32,
    F64,
    I32,
    I64,
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DType::F32 => "f32",
            DType::F64 => "f64",
            DType::I32 => "i32",
            DType::I64 => "i64",
        };
        write!(f, "{}", name)
    }
}

/// Array with an element type determined at runtime
#[derive(Debug, Clone, PartialEq)]
pub enum DynArray {
    F32(ArrayD<f32>),
    F64(ArrayD<f64>),
    I32(ArrayD<i32>),
    I64(ArrayD<i64>),
}

/// Scalar with an element type determined at runtime
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DynScalar {
    F32(f32),
    F64(f64),
    I32(i32),
    I64(i64),
}

macro_rules! impl_dyn {
    ($($ty:ty => $variant:ident),*) => {
        $(
        impl From<ArrayD<$ty>> for DynArray {
            fn from(array: ArrayD<$ty>) -> Self {
                DynArray::$variant(array)
            }
        }

        impl From<$ty> for DynScalar {
            fn from(value: $ty) -> Self {
                DynScalar::$variant(value)
            }
        }
        )*
    };
}

impl_dyn!(f32 => F32, f64 => F64, i32 => I32, i64 => I64);

impl DynArray {
    pub fn dtype(&self) -> DType {
        match self {
            DynArray::F32(_) => DType::F32,
            DynArray::F64(_) => DType::F64,
            DynArray::I32(_) => DType::I32,
            DynArray::I64(_) => DType::I64,
        }
    }

    pub fn shape(&self) -> &[usize] {
        match self {
            DynArray::F32(a) => a.shape(),
            DynArray::F64(a) => a.shape(),
            DynArray::I32(a) => a.shape(),
            DynArray::I64(a) => a.shape(),
        }
    }

    /// Promote into the floating point accumulation type
    pub fn to_f64(&self) -> ArrayD<f64> {
        match self {
            DynArray::F32(a) => a.mapv(Into::into),
            DynArray::F64(a) => a.clone(),
            DynArray::I32(a) => a.mapv(Into::into),
            DynArray::I64(a) => a.mapv(|x| x as f64),
        }
    }

    /// Widen into the integer accumulation type, `None` for floating point arrays
    pub fn to_i64(&self) -> Option<ArrayD<i64>> {
        match self {
            DynArray::I32(a) => Some(a.mapv(Into::into)),
            DynArray::I64(a) => Some(a.clone()),
            DynArray::F32(_) | DynArray::F64(_) => None,
        }
    }
}

impl DynScalar {
    pub fn dtype(&self) -> DType {
        match self {
            DynScalar::F32(_) => DType::F32,
            DynScalar::F64(_) => DType::F64,
            DynScalar::I32(_) => DType::I32,
            DynScalar::I64(_) => DType::I64,
        }
    }
}

/// Result of [einsum_dyn]
#[derive(Debug, Clone, PartialEq)]
pub enum DynContracted {
    Scalar(DynScalar),
    Array(DynArray),
}

impl DynContracted {
    pub fn dtype(&self) -> DType {
        match self {
            DynContracted::Scalar(value) => value.dtype(),
            DynContracted::Array(array) => array.dtype(),
        }
    }
}

/// Element type shared by all operands, `None` if they differ or there is no operand
pub fn common_dtype(operands: &[DynArray]) -> Option<DType> {
    let (first, rest) = operands.split_first()?;
    let dtype = first.dtype();
    rest.iter().all(|op| op.dtype() == dtype).then_some(dtype)
}

fn cast<A: ToPrimitive + Copy, T: NumCast>(value: A, dtype: DType) -> Result<T> {
    <T as NumCast>::from(value).ok_or_else(|| Error::Cast {
        value: value.to_f64().unwrap_or(f64::NAN),
        dtype,
    })
}

fn cast_array<A: ToPrimitive + Copy, T: NumCast>(
    array: &ArrayD<A>,
    dtype: DType,
) -> Result<ArrayD<T>> {
    let values = array
        .iter()
        .map(|&value| cast(value, dtype))
        .collect::<Result<Vec<T>>>()?;
    Ok(ArrayD::from_shape_vec(array.raw_dim(), values)?)
}

/// Cast the accumulated result into `dtype`
pub fn cast_contracted<A: ToPrimitive + Copy>(
    result: Contracted<A>,
    dtype: DType,
) -> Result<DynContracted> {
    Ok(match result {
        Contracted::Scalar(value) => DynContracted::Scalar(match dtype {
            DType::F32 => DynScalar::F32(cast(value, dtype)?),
            DType::F64 => DynScalar::F64(cast(value, dtype)?),
            DType::I32 => DynScalar::I32(cast(value, dtype)?),
            DType::I64 => DynScalar::I64(cast(value, dtype)?),
        }),
        Contracted::Array(array) => DynContracted::Array(match dtype {
            DType::F32 => DynArray::F32(cast_array(&array, dtype)?),
            DType::F64 => DynArray::F64(cast_array(&array, dtype)?),
            DType::I32 => DynArray::I32(cast_array(&array, dtype)?),
            DType::I64 => DynArray::I64(cast_array(&array, dtype)?),
        }),
    })
}

impl Einsum {
    /// Contract operands of possibly different element types
    pub fn run_dyn(&self, operands: &[DynArray]) -> Result<DynContracted> {
        let dtype = common_dtype(operands).unwrap_or(DType::F64);
        log::debug!("Execute {} into {}", self.subscripts(), dtype);
        match dtype {
            DType::I32 | DType::I64 => {
                // every operand is an integer array here
                let widened: Vec<ArrayD<i64>> =
                    operands.iter().filter_map(DynArray::to_i64).collect();
                let views: Vec<_> = widened.iter().map(|op| op.view()).collect();
                cast_contracted(self.run(&views)?, dtype)
            }
            DType::F32 | DType::F64 => {
                let promoted: Vec<ArrayD<f64>> = operands.iter().map(DynArray::to_f64).collect();
                let views: Vec<_> = promoted.iter().map(|op| op.view()).collect();
                cast_contracted(self.run(&views)?, dtype)
            }
        }
    }
}

/// Einsum for operands of runtime element types
///
/// ```
/// use ndarray::array;
/// use einsum_runtime::dtype::*;
///
/// let a: DynArray = array![[1i32, 2], [3, 4]].into_dyn().into();
/// let b: DynArray = array![[1i32, 0], [0, 1]].into_dyn().into();
///
/// // Same element type
/// let c = einsum_dyn("ij,jk->ik", &[a.clone(), b]).unwrap();
/// assert_eq!(c, DynContracted::Array(array![[1i32, 2], [3, 4]].into_dyn().into()));
///
/// // Mixed element types fall back to f64
/// let half: DynArray = array![0.5f32, 0.5].into_dyn().into();
/// let c = einsum_dyn("ij,j->i", &[a, half]).unwrap();
/// assert_eq!(c.dtype(), DType::F64);
/// ```
pub fn einsum_dyn(subscripts: &str, operands: &[DynArray]) -> Result<DynContracted> {
    Einsum::new(subscripts)?.run_dyn(operands)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn f32s() -> DynArray {
        array![[1.5f32, 2.0], [3.0, 4.0]].into_dyn().into()
    }

    fn i64s() -> DynArray {
        array![[1i64, 2], [3, 4]].into_dyn().into()
    }

    #[test]
    fn common() {
        assert_eq!(common_dtype(&[f32s(), f32s()]), Some(DType::F32));
        assert_eq!(common_dtype(&[f32s(), i64s()]), None);
        assert_eq!(common_dtype(&[]), None);
    }

    #[test]
    fn keep_common_dtype() -> anyhow::Result<()> {
        let c = einsum_dyn("ij->", &[f32s()])?;
        assert_eq!(c, DynContracted::Scalar(DynScalar::F32(10.5)));

        let c = einsum_dyn("ij->ji", &[i64s()])?;
        assert_eq!(
            c,
            DynContracted::Array(array![[1i64, 3], [2, 4]].into_dyn().into())
        );
        Ok(())
    }

    #[test]
    fn mixed_falls_back_to_f64() -> anyhow::Result<()> {
        let c = einsum_dyn("ij,ij->", &[f32s(), i64s()])?;
        assert_eq!(c, DynContracted::Scalar(DynScalar::F64(30.5)));
        Ok(())
    }

    #[test]
    fn cast_overflow() {
        let big: DynArray = array![i32::MAX, i32::MAX].into_dyn().into();
        let err = einsum_dyn("i->", &[big]).unwrap_err();
        assert_eq!(
            err,
            Error::Cast {
                value: 2.0 * i32::MAX as f64,
                dtype: DType::I32
            }
        );
        assert_eq!(err.to_string(), "Cannot cast 4294967294 into i32");
    }

    #[test]
    fn large_i64_is_exact() -> anyhow::Result<()> {
        let n = (1i64 << 53) + 1;
        let big: DynArray = array![n, 0].into_dyn().into();
        let c = einsum_dyn("i->", &[big.clone()])?;
        assert_eq!(c, DynContracted::Scalar(DynScalar::I64(n)));

        let typed = crate::einsum("i->", &[array![n, 0].into_dyn().view()])?;
        assert_eq!(typed, Contracted::Scalar(n));

        let ones: DynArray = array![1i64, 1].into_dyn().into();
        let c = einsum_dyn("i,i->i", &[big, ones])?;
        assert_eq!(c, DynContracted::Array(array![n, 0].into_dyn().into()));
        Ok(())
    }

    #[test]
    fn i32_accumulates_in_i64() -> anyhow::Result<()> {
        // partial sums exceed i32, the total does not
        let a: DynArray = array![i32::MAX, i32::MAX, -i32::MAX].into_dyn().into();
        let c = einsum_dyn("i->", &[a])?;
        assert_eq!(c, DynContracted::Scalar(DynScalar::I32(i32::MAX)));
        Ok(())
    }

    #[test]
    fn integer_cast_truncates() -> anyhow::Result<()> {
        let c = cast_contracted(Contracted::Scalar(2.75), DType::I64)?;
        assert_eq!(c, DynContracted::Scalar(DynScalar::I64(2)));
        Ok(())
    }
}
