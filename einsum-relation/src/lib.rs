#![cfg_attr(
    all(doc, not(doctest)),
    feature(prelude_import, custom_inner_attributes, proc_macro_hygiene)
)]
#![cfg_attr(all(doc, not(doctest)), katexit::katexit)]
//! Index algebra of einsum based on relation maps
//!
//! Introduction to einsum
//! -----------------------
//! The Einstein summation rule is a rule for abbreviating tensor operations.
//! The inner product of two vectors $x, y \in \mathbb{R}^n$ is
//! $$
//! (x, y) = \sum_{i \in I} x_i y_i
//! $$
//! where $I = \\{0, 1, \ldots, n-1 \\}$, and the product of two matrices is
//! $$
//! c_{ik} = \sum_{j \in J} a_{ij} b_{jk}.
//! $$
//! These are represented by subscripts `i,i->` and `ij,jk->ik`,
//! where `,` separates the labels of each input, and labels after `->`
//! are the labels of the output. Labels are single characters.
//! Labels appearing in inputs but not in the output are summed up,
//! and if `->` is omitted, all labels are summed up to a scalar.
//!
//! Relation map
//! -------------
//! This crate does not reorder or factorize the summation.
//! Instead, it writes down every product explicitly:
//!
//! 1. Parse subscripts into the input subscripts and the output subscript
//!    ([parser], [subscripts]).
//! 2. Resolve the extent of each label from the operand shapes ([shape]).
//!    A label shared by several axes must have a consistent extent.
//! 3. Split labels into "free" labels, which are the labels of the output,
//!    and "summation" labels, all other labels.
//! 4. For each output coordinate, enumerate all coordinates over summation labels
//!    ([enumerate]), and project the combined coordinate onto each operand.
//!    The list of projected coordinates for all summation coordinates is stored
//!    in a [relation::RelationMap].
//!
//! For `ij,jk->ik` with $\\#I = \\#J = \\#K = 2$, the relation map is
//!
//! ```text
//! [0, 0] = [0, 0]*[0, 0] + [0, 1]*[1, 0]
//! [0, 1] = [0, 0]*[0, 1] + [0, 1]*[1, 1]
//! [1, 0] = [1, 0]*[0, 0] + [1, 1]*[1, 0]
//! [1, 1] = [1, 0]*[0, 1] + [1, 1]*[1, 1]
//! ```
//!
//! where `[i, j]*[j, k]` denotes $a_{ij} b_{jk}$.
//! Executing the map on actual arrays is left to the runtime crate.
//! The same contraction can also be written down as nested loops by [loops].
//!

pub mod container;
pub mod enumerate;
pub mod error;
pub mod loops;
pub mod parser;
pub mod relation;
pub mod shape;
pub mod subscripts;

pub use error::{Error, Result};

use relation::RelationMap;
use std::str::FromStr;
use subscripts::Subscripts;

/// Parse subscripts and build the relation map for operands of the given shapes
///
/// ```
/// let map = einsum_relation::relation_map("ij->", &[&[2, 3]]).unwrap();
/// assert_eq!(map.num_terms(), 6);
/// ```
pub fn relation_map(subscripts: &str, shapes: &[&[usize]]) -> Result<RelationMap> {
    let subscripts = Subscripts::from_str(subscripts)?;
    RelationMap::from_shapes(&subscripts, shapes)
}
