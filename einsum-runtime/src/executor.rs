//! Execute a relation map on ndarray operands

use crate::error::Result;
use einsum_relation::relation::{Relation, RelationMap, Term};
use ndarray::{ArrayD, ArrayViewD, IxDyn, LinalgScalar};

/// Result of einsum, a scalar if the output subscript is empty
#[derive(Debug, Clone, PartialEq)]
pub enum Contracted<T> {
    Scalar(T),
    Array(ArrayD<T>),
}

impl<T> Contracted<T> {
    pub fn as_scalar(&self) -> Option<&T> {
        match self {
            Contracted::Scalar(value) => Some(value),
            Contracted::Array(_) => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayD<T>> {
        match self {
            Contracted::Scalar(_) => None,
            Contracted::Array(array) => Some(array),
        }
    }

    /// Convert into an array, a scalar becomes a 0-dimensional array
    pub fn into_array(self) -> ArrayD<T> {
        match self {
            Contracted::Scalar(value) => ndarray::arr0(value).into_dyn(),
            Contracted::Array(array) => array,
        }
    }
}

/// Sum up the product of operand elements for each term
fn sum_terms<T: LinalgScalar>(terms: &[Term], operands: &[ArrayViewD<T>]) -> T {
    terms.iter().fold(T::zero(), |acc, term| {
        let prod = term
            .iter()
            .zip(operands)
            .fold(T::one(), |prod, (coord, operand)| {
                prod * operand[coord.as_slice()]
            });
        acc + prod
    })
}

/// Execute the relation map
///
/// Output coordinates are enumerated in the same order as the map was built.
///
/// ```
/// use ndarray::array;
/// use einsum_relation::relation_map;
/// use einsum_runtime::executor::{execute, Contracted};
///
/// let a = array![[1.0, 2.0], [3.0, 4.0]].into_dyn();
/// let map = relation_map("ij->j", &[a.shape()]).unwrap();
/// let c = execute(&map, &[a.view()]).unwrap();
/// assert_eq!(c, Contracted::Array(array![4.0, 6.0].into_dyn()));
/// ```
pub fn execute<T: LinalgScalar>(
    map: &RelationMap,
    operands: &[ArrayViewD<T>],
) -> Result<Contracted<T>> {
    let shapes: Vec<&[usize]> = operands.iter().map(|op| op.shape()).collect();
    map.validate_shapes(&shapes)?;

    match map.relation() {
        Relation::Scalar(terms) => {
            log::trace!("scalar <- {} terms", terms.len());
            Ok(Contracted::Scalar(sum_terms(terms, operands)))
        }
        Relation::Array(_) => {
            let mut out = ArrayD::zeros(IxDyn(&map.output_shape()));
            for free_coord in map.free_coordinates()? {
                let terms = map.terms(&free_coord).unwrap_or_default();
                log::trace!("{:?} <- {} terms", free_coord, terms.len());
                out[free_coord.as_slice()] = sum_terms(terms, operands);
            }
            Ok(Contracted::Array(out))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use einsum_relation::{relation_map, Error};
    use ndarray::{arr0, array};

    #[test]
    fn matmul() -> anyhow::Result<()> {
        let a = array![[1.0, 2.0], [3.0, 4.0]].into_dyn();
        let b = array![[1.0, 2.0], [3.0, 4.0]].into_dyn();
        let map = relation_map("ij,jk->ik", &[a.shape(), b.shape()])?;
        let c = execute(&map, &[a.view(), b.view()])?;
        assert_eq!(
            c.as_array(),
            Some(&array![[7.0, 10.0], [15.0, 22.0]].into_dyn())
        );
        Ok(())
    }

    #[test]
    fn scalar() -> anyhow::Result<()> {
        let v = array![1, 2, 3].into_dyn();
        let map = relation_map("i,i->", &[v.shape(), v.shape()])?;
        let c = execute(&map, &[v.view(), v.view()])?;
        assert_eq!(c, Contracted::Scalar(14));
        assert_eq!(c.into_array(), arr0(14).into_dyn());
        Ok(())
    }

    #[test]
    fn empty_summation() -> anyhow::Result<()> {
        let a = ArrayD::<f64>::zeros(IxDyn(&[2, 0]));
        let map = relation_map("ij->i", &[a.shape()])?;
        let c = execute(&map, &[a.view()])?;
        assert_eq!(c, Contracted::Array(array![0.0, 0.0].into_dyn()));
        Ok(())
    }

    #[test]
    fn operands_must_match_map() -> anyhow::Result<()> {
        let a = array![[1.0, 2.0], [3.0, 4.0]].into_dyn();
        let b = array![[1.0, 2.0, 3.0]].into_dyn();
        let map = relation_map("ij->i", &[a.shape()])?;
        assert_eq!(
            execute(&map, &[b.view()]),
            Err(Error::ExtentConflict {
                label: 'i',
                expected: 2,
                actual: 1
            }
            .into())
        );
        assert_eq!(
            execute(&map, &[a.view(), a.view()]),
            Err(Error::OperandCountMismatch {
                expected: 1,
                actual: 2
            }
            .into())
        );
        Ok(())
    }
}
