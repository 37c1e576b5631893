use crate::dtype::DType;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Relation(#[from] einsum_relation::Error),

    /// Contracted value does not fit into the common element type of operands
    #[error("Cannot cast {value} into {dtype}")]
    Cast { value: f64, dtype: DType },

    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),
}
