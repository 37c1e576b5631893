use einsum_runtime::{einsum, Contracted};
use ndarray::*;

#[test]
fn trace() {
    let a = Array2::from_shape_fn((4, 4), |(i, j)| (3 * i + j) as f64);
    let expected = a.diag().sum();
    assert_eq!(einsum!("ii->", a).unwrap(), Contracted::Scalar(expected));
    // implicit scalar output
    assert_eq!(einsum!("ii", a).unwrap(), Contracted::Scalar(expected));
}

#[test]
fn trace_of_product() {
    let a = array![[1, 2], [3, 4]];
    let b = array![[5, 6], [7, 8]];
    // Tr(AB) = 1*5 + 2*7 + 3*6 + 4*8
    assert_eq!(einsum!("ij,ji->", a, b).unwrap(), Contracted::Scalar(69));
}
