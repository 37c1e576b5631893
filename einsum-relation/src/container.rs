//! Dense N-dimensional container addressed by coordinates

use std::ops::{Index, IndexMut};

/// Compute row-major strides from shape
///
/// ```
/// use einsum_relation::container::row_major_strides;
///
/// assert_eq!(row_major_strides(&[3, 4, 5]), vec![20, 5, 1]);
/// assert_eq!(row_major_strides(&[2]), vec![1]);
/// assert_eq!(row_major_strides(&[]), Vec::<usize>::new());
/// ```
pub fn row_major_strides(shape: &[usize]) -> Vec<usize> {
    let mut strides = vec![0; shape.len()];
    let mut stride = 1;
    for (s, &n) in strides.iter_mut().zip(shape).rev() {
        *s = stride;
        stride *= n;
    }
    strides
}

/// Fully materialized N-dimensional container
///
/// Elements are stored in a flat buffer in row-major order,
/// and every coordinate within the shape is addressable.
/// A rank-0 container holds exactly one element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiDim<T> {
    shape: Vec<usize>,
    strides: Vec<usize>,
    data: Vec<T>,
}

impl<T: Clone> MultiDim<T> {
    pub fn from_elem(shape: &[usize], elem: T) -> Self {
        let len = shape.iter().product();
        MultiDim {
            shape: shape.to_vec(),
            strides: row_major_strides(shape),
            data: vec![elem; len],
        }
    }
}

impl<T> MultiDim<T> {
    /// Create a container by evaluating `f` at each coordinate in row-major order
    pub fn from_fn(shape: &[usize], mut f: impl FnMut(&[usize]) -> T) -> Self {
        let data = crate::enumerate::Coordinates::new(shape.to_vec())
            .map(|coord| f(&coord))
            .collect();
        MultiDim {
            shape: shape.to_vec(),
            strides: row_major_strides(shape),
            data,
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Offset of the coordinate in the flat buffer
    ///
    /// Returns `None` if the coordinate has a wrong length or is out of bounds.
    pub fn offset(&self, coord: &[usize]) -> Option<usize> {
        if coord.len() != self.shape.len() {
            return None;
        }
        let mut offset = 0;
        for ((&i, &n), &stride) in coord.iter().zip(&self.shape).zip(&self.strides) {
            if i >= n {
                return None;
            }
            offset += i * stride;
        }
        Some(offset)
    }

    pub fn get(&self, coord: &[usize]) -> Option<&T> {
        let offset = self.offset(coord)?;
        self.data.get(offset)
    }

    pub fn get_mut(&mut self, coord: &[usize]) -> Option<&mut T> {
        let offset = self.offset(coord)?;
        self.data.get_mut(offset)
    }

    /// Replace the element at the coordinate, and return the previous one
    pub fn set(&mut self, coord: &[usize], value: T) -> Option<T> {
        self.get_mut(coord)
            .map(|elem| std::mem::replace(elem, value))
    }

    /// Elements in row-major order
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

impl<T> Index<&[usize]> for MultiDim<T> {
    type Output = T;
    fn index(&self, coord: &[usize]) -> &T {
        match self.get(coord) {
            Some(elem) => elem,
            None => panic!(
                "Coordinate {:?} is out of bounds for shape {:?}",
                coord, self.shape
            ),
        }
    }
}

impl<T> IndexMut<&[usize]> for MultiDim<T> {
    fn index_mut(&mut self, coord: &[usize]) -> &mut T {
        let offset = match self.offset(coord) {
            Some(offset) => offset,
            None => panic!(
                "Coordinate {:?} is out of bounds for shape {:?}",
                coord, self.shape
            ),
        };
        &mut self.data[offset]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strides() {
        assert_eq!(row_major_strides(&[3, 4, 5]), vec![20, 5, 1]);
        assert_eq!(row_major_strides(&[2]), vec![1]);
        assert_eq!(row_major_strides(&[]), Vec::<usize>::new());
    }

    #[test]
    fn get_set() {
        let mut c = MultiDim::from_elem(&[2, 3], 0);
        assert_eq!(c.len(), 6);
        assert_eq!(c.ndim(), 2);
        assert_eq!(c.set(&[1, 2], 5), Some(0));
        assert_eq!(c.get(&[1, 2]), Some(&5));
        c[&[0usize, 1][..]] = 7;
        assert_eq!(c[&[0usize, 1][..]], 7);
        assert_eq!(c.into_vec(), vec![0, 7, 0, 0, 0, 5]);
    }

    #[test]
    fn out_of_bounds() {
        let mut c = MultiDim::from_elem(&[2, 3], 0);
        assert_eq!(c.get(&[2, 0]), None);
        assert_eq!(c.get(&[0, 3]), None);
        assert_eq!(c.get(&[0]), None);
        assert_eq!(c.set(&[0, 0, 0], 1), None);
    }

    #[test]
    #[should_panic]
    fn index_panics() {
        let c = MultiDim::from_elem(&[2], 0);
        let coord: &[usize] = &[2];
        let _elem = c[coord];
    }

    #[test]
    fn from_fn_row_major() {
        let c = MultiDim::from_fn(&[2, 2], |coord| coord[0] * 10 + coord[1]);
        assert_eq!(c.iter().cloned().collect::<Vec<_>>(), vec![0, 1, 10, 11]);
        assert_eq!(c[&[1usize, 0][..]], 10);
    }

    #[test]
    fn rank0() {
        let mut c = MultiDim::from_elem(&[], 1.5);
        assert_eq!(c.len(), 1);
        assert_eq!(c.offset(&[]), Some(0));
        let origin: &[usize] = &[];
        c[origin] = 2.5;
        assert_eq!(c.get(&[]), Some(&2.5));
    }

    #[test]
    fn zero_extent() {
        let c = MultiDim::from_elem(&[0, 3], 0);
        assert!(c.is_empty());
        assert_eq!(c.get(&[0, 0]), None);
    }
}
