//! Build and execute the relation in a single pass
//!
//! This computes the same value as [crate::executor::execute] on a
//! [RelationMap](einsum_relation::relation::RelationMap), but each output element is
//! summed up as soon as its terms are enumerated, and no terms are stored.

use crate::{error::Result, executor::Contracted};
use einsum_relation::{
    enumerate::Coordinates, relation::Projection, shape::LabelExtents, subscripts::Subscripts,
};
use ndarray::{ArrayD, ArrayViewD, IxDyn, LinalgScalar};

pub fn execute_fused<T: LinalgScalar>(
    subscripts: &Subscripts,
    operands: &[ArrayViewD<T>],
) -> Result<Contracted<T>> {
    let shapes: Vec<&[usize]> = operands.iter().map(|op| op.shape()).collect();
    let extents = LabelExtents::resolve(subscripts, &shapes)?;
    let projections = Projection::for_inputs(subscripts)?;

    let free = subscripts.free_indices();
    let summation: Vec<char> = subscripts.contraction_indices().into_iter().collect();
    let summation_extents = extents.extents_of(&summation)?;

    let mut combined = vec![0; free.len() + summation.len()];
    let mut locals: Vec<Vec<usize>> = projections
        .iter()
        .map(|p| vec![0; p.positions().len()])
        .collect();

    let mut value_at = |free_coord: &[usize]| -> T {
        combined[..free.len()].copy_from_slice(free_coord);
        let mut acc = T::zero();
        for summation_coord in Coordinates::new(summation_extents.clone()) {
            combined[free.len()..].copy_from_slice(&summation_coord);
            let mut prod = T::one();
            for ((projection, local), operand) in
                projections.iter().zip(locals.iter_mut()).zip(operands)
            {
                projection.project_into(&combined, local);
                prod = prod * operand[local.as_slice()];
            }
            acc = acc + prod;
        }
        acc
    };

    if subscripts.is_scalar() {
        return Ok(Contracted::Scalar(value_at(&[])));
    }

    let shape = extents.extents_of(free)?;
    let mut out = ArrayD::zeros(IxDyn(&shape));
    for free_coord in Coordinates::new(shape) {
        log::trace!("{:?}", free_coord);
        out[free_coord.as_slice()] = value_at(&free_coord);
    }
    Ok(Contracted::Array(out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::execute;
    use einsum_relation::relation::RelationMap;
    use ndarray::{Array, IxDyn};
    use std::str::FromStr;

    // Compare with the relation map on integer arrays, where the summation order
    // does not matter
    fn check(subscripts: &str, shapes: &[&[usize]]) -> anyhow::Result<()> {
        let subscripts = Subscripts::from_str(subscripts)?;
        let operands: Vec<ArrayD<i64>> = shapes
            .iter()
            .enumerate()
            .map(|(n, shape)| {
                let len: usize = shape.iter().product();
                Array::from_shape_vec(
                    IxDyn(shape),
                    (0..len as i64).map(|x| x * (n as i64 + 1) - 3).collect(),
                )
            })
            .collect::<std::result::Result<_, _>>()?;
        let views: Vec<_> = operands.iter().map(|op| op.view()).collect();

        let map = RelationMap::from_shapes(&subscripts, shapes)?;
        assert_eq!(execute_fused(&subscripts, &views)?, execute(&map, &views)?);
        Ok(())
    }

    #[test]
    fn agrees_with_relation_map() -> anyhow::Result<()> {
        check("ij,jk->ik", &[&[2, 3], &[3, 4]])?;
        check("ij,jk,kl->li", &[&[2, 3], &[3, 4], &[4, 2]])?;
        check("ii->i", &[&[3, 3]])?;
        check("ii", &[&[3, 3]])?;
        check("ijk->kji", &[&[2, 3, 4]])?;
        check("i,j->ij", &[&[2], &[3]])?;
        check(",i->i", &[&[], &[3]])?;
        check("ij,ij->", &[&[2, 0], &[2, 0]])?;
        Ok(())
    }

    #[test]
    fn errors() {
        let subscripts = Subscripts::from_str("ij,jk->ik").unwrap();
        let a = ArrayD::<f64>::zeros(IxDyn(&[2, 3]));
        let b = ArrayD::<f64>::zeros(IxDyn(&[2, 3]));
        assert!(execute_fused(&subscripts, &[a.view(), b.view()]).is_err());
    }
}
