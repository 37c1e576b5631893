//! Render a contraction as naive nested loops in Python
//!
//! The loops enumerate free labels outermost, and summation labels inside of them,
//! in the same order as the [relation map](crate::relation::RelationMap) is built:
//!
//! ```python
//! R = zeros(shape=(2, 4))
//! for i in range(2):
//!     for k in range(4):
//!         total = 0
//!         for j in range(3):
//!             total += A[i,j] * B[j,k]
//!         R[i,k] = total
//! ```

use crate::{
    error::{Error, Result},
    shape::LabelExtents,
    subscripts::Subscripts,
};

const INDENT: &str = "    ";

/// `A[i,j]`, or `A` for a rank-0 operand
fn indexed(name: &str, labels: &[char]) -> String {
    if labels.is_empty() {
        return name.to_string();
    }
    let labels: Vec<String> = labels.iter().map(char::to_string).collect();
    format!("{}[{}]", name, labels.join(","))
}

fn for_loops(
    code: &mut String,
    indent: &mut String,
    labels: &[char],
    extents: &LabelExtents,
) -> Result<()> {
    for &label in labels {
        let n = extents.extent(label)?;
        code.push_str(&format!("{}for {} in range({}):\n", indent, label, n));
        indent.push_str(INDENT);
    }
    Ok(())
}

/// Python code computing the contraction into `R`, where operands are named by `names`
///
/// ```
/// use einsum_relation::{loops::python_loops, shape::LabelExtents, subscripts::Subscripts};
/// use std::str::FromStr;
///
/// let subscripts = Subscripts::from_str("ij->").unwrap();
/// let extents = LabelExtents::resolve(&subscripts, &[&[2, 3]]).unwrap();
/// let code = python_loops(&subscripts, &extents, &["A"]).unwrap();
/// assert_eq!(
///     code,
///     "R = 0\ntotal = 0\nfor i in range(2):\n    for j in range(3):\n        total += A[i,j]\nR = total"
/// );
/// ```
pub fn python_loops(
    subscripts: &Subscripts,
    extents: &LabelExtents,
    names: &[&str],
) -> Result<String> {
    if names.len() != subscripts.num_inputs() {
        return Err(Error::OperandCountMismatch {
            expected: subscripts.num_inputs(),
            actual: names.len(),
        });
    }
    let free = subscripts.free_indices();
    let summation: Vec<char> = subscripts.contraction_indices().into_iter().collect();

    let mut code = if free.is_empty() {
        "R = 0\n".to_string()
    } else {
        let shape: Vec<String> = extents
            .extents_of(free)?
            .iter()
            .map(ToString::to_string)
            .collect();
        format!("R = zeros(shape=({}))\n", shape.join(", "))
    };

    let mut indent = String::new();
    for_loops(&mut code, &mut indent, free, extents)?;
    code.push_str(&format!("{}total = 0\n", indent));

    let mut inner = indent.clone();
    for_loops(&mut code, &mut inner, &summation, extents)?;
    let product: Vec<String> = names
        .iter()
        .zip(&subscripts.inputs)
        .map(|(name, input)| indexed(name, input.labels()))
        .collect();
    code.push_str(&format!("{}total += {}\n", inner, product.join(" * ")));

    code.push_str(&format!("{}{} = total", indent, indexed("R", free)));
    Ok(code)
}
