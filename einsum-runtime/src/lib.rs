//! Relation-map based einsum for [ndarray](https://crates.io/crates/ndarray)
//!
//! ```
//! use ndarray::array;
//! use einsum_runtime::{einsum, Contracted};
//!
//! let a = array![
//!   [1.0, 2.0],
//!   [3.0, 4.0]
//! ];
//! let b = array![
//!   [1.0, 2.0],
//!   [3.0, 4.0]
//! ];
//! let c = einsum!("ij,jk->ik", a, b).unwrap();
//! assert_eq!(c, Contracted::Array(array![
//!   [7.0, 10.0],
//!   [15.0, 22.0]
//! ].into_dyn()));
//!
//! // Without `->`, every index is summed up into a scalar
//! let s = einsum!("ij,jk", a, b).unwrap();
//! assert_eq!(s, Contracted::Scalar(54.0));
//! ```
//!
//! The subscripts are parsed, the extent of each label is resolved from operand shapes,
//! and a [relation map](einsum_relation::relation::RelationMap) listing every product to be
//! summed up is built and executed. See [einsum_relation] for details.
//! No contraction order optimization is done, and the cost is proportional to the
//! product of the extents of all labels.

pub mod dtype;
pub mod error;
pub mod executor;
pub mod fused;

pub use dtype::{einsum_dyn, DType, DynArray, DynContracted, DynScalar};
pub use error::{Error, Result};
pub use executor::Contracted;

use einsum_relation::{relation::RelationMap, subscripts::Subscripts};
use ndarray::{ArrayViewD, LinalgScalar};
use std::str::FromStr;

/// How to execute the contraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Strategy {
    /// Build the whole relation map, and then execute it
    #[default]
    RelationMap,
    /// Sum up terms while enumerating them without storing the relation map
    Fused,
}

/// Parsed einsum subscripts with execution settings
///
/// ```
/// use ndarray::array;
/// use einsum_runtime::{Einsum, Strategy, Contracted};
///
/// let a = array![[1, 2], [3, 4]].into_dyn();
/// let trace = Einsum::new("ii->").unwrap().strategy(Strategy::Fused);
/// assert_eq!(trace.run(&[a.view()]).unwrap(), Contracted::Scalar(5));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Einsum {
    subscripts: Subscripts,
    strategy: Strategy,
}

impl Einsum {
    pub fn new(subscripts: &str) -> Result<Self> {
        let subscripts = Subscripts::from_str(subscripts)?;
        log::debug!("Parsed subscripts: {}", subscripts);
        Ok(Einsum {
            subscripts,
            strategy: Strategy::default(),
        })
    }

    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn subscripts(&self) -> &Subscripts {
        &self.subscripts
    }

    /// Relation map for operands of the given shapes
    pub fn relation_map(&self, shapes: &[&[usize]]) -> Result<RelationMap> {
        Ok(RelationMap::from_shapes(&self.subscripts, shapes)?)
    }

    pub fn run<T: LinalgScalar>(&self, operands: &[ArrayViewD<T>]) -> Result<Contracted<T>> {
        log::debug!("Execute {} with {:?} strategy", self.subscripts, self.strategy);
        match self.strategy {
            Strategy::RelationMap => {
                let shapes: Vec<&[usize]> = operands.iter().map(|op| op.shape()).collect();
                let map = self.relation_map(&shapes)?;
                executor::execute(&map, operands)
            }
            Strategy::Fused => fused::execute_fused(&self.subscripts, operands),
        }
    }
}

impl FromStr for Einsum {
    type Err = Error;
    fn from_str(subscripts: &str) -> Result<Self> {
        Self::new(subscripts)
    }
}

/// Einsum for operands of the same element type
///
/// ```
/// use ndarray::array;
/// use einsum_runtime::{einsum, Contracted};
///
/// let v = array![1.0, 2.0, 3.0].into_dyn();
/// let w = array![4.0, 5.0, 6.0].into_dyn();
/// assert_eq!(einsum("i,i->", &[v.view(), w.view()]).unwrap(), Contracted::Scalar(32.0));
/// ```
pub fn einsum<T: LinalgScalar>(
    subscripts: &str,
    operands: &[ArrayViewD<T>],
) -> Result<Contracted<T>> {
    Einsum::new(subscripts)?.run(operands)
}

/// Einsum taking arrays of any dimension and storage
///
/// ```
/// use ndarray::array;
/// use einsum_runtime::{einsum, Contracted};
///
/// let a = array![[1.0, 2.0], [3.0, 4.0]];
/// let d = einsum!("ii->i", a).unwrap();
/// assert_eq!(d, Contracted::Array(array![1.0, 4.0].into_dyn()));
///
/// // The number of operands is checked at runtime
/// assert!(einsum!("ij,jk->ik", a).is_err());
/// ```
#[macro_export]
macro_rules! einsum {
    ($subscripts:expr $(, $operand:expr)* $(,)?) => {
        $crate::einsum($subscripts, &[$($operand.view().into_dyn()),*])
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn strategies_agree() -> anyhow::Result<()> {
        let a = array![[1, 2, 3], [4, 5, 6]].into_dyn();
        let b = array![[1, 0], [0, 1], [1, 1]].into_dyn();
        for subscripts in ["ij,jk->ik", "ij,jk->ki", "ij,jk", "ij,jk->j"] {
            let relation = Einsum::new(subscripts)?.run(&[a.view(), b.view()])?;
            let fused = Einsum::new(subscripts)?
                .strategy(Strategy::Fused)
                .run(&[a.view(), b.view()])?;
            assert_eq!(relation, fused);
        }
        Ok(())
    }

    #[test]
    fn relation_map_of_einsum() -> anyhow::Result<()> {
        let e: Einsum = "i,i".parse()?;
        let map = e.relation_map(&[&[2], &[2]])?;
        insta::assert_snapshot!(map.to_string(), @"[] = [0]*[0] + [1]*[1]");
        Ok(())
    }

    #[test]
    fn parse_error() {
        assert!(matches!(
            Einsum::new("ij->i,j"),
            Err(Error::Relation(einsum_relation::Error::MultipleOutputs { count: 2 }))
        ));
    }
}
