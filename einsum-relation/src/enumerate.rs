//! Enumerate all coordinates over a set of labels

use crate::{error::Result, shape::LabelExtents};

/// Row-major iterator over the Cartesian product of extents
///
/// The first axis varies slowest. An empty set of extents yields exactly one
/// empty coordinate, which corresponds to the single term of a scalar.
///
/// ```
/// use einsum_relation::enumerate::Coordinates;
///
/// let coords: Vec<_> = Coordinates::new(vec![2, 3]).collect();
/// assert_eq!(coords, vec![
///     vec![0, 0], vec![0, 1], vec![0, 2],
///     vec![1, 0], vec![1, 1], vec![1, 2],
/// ]);
///
/// let coords: Vec<_> = Coordinates::new(vec![]).collect();
/// assert_eq!(coords, vec![Vec::<usize>::new()]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coordinates {
    extents: Vec<usize>,
    next: Option<Vec<usize>>,
    remaining: usize,
}

impl Coordinates {
    pub fn new(extents: Vec<usize>) -> Self {
        let remaining = extents.iter().product();
        let next = if remaining > 0 {
            Some(vec![0; extents.len()])
        } else {
            None
        };
        Coordinates {
            extents,
            next,
            remaining,
        }
    }

    /// Enumerate coordinates over labels, e.g. all `(i, k)` for `ik`
    pub fn over(labels: &[char], extents: &LabelExtents) -> Result<Self> {
        Ok(Self::new(extents.extents_of(labels)?))
    }

    pub fn extents(&self) -> &[usize] {
        &self.extents
    }
}

impl Iterator for Coordinates {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        let current = self.next.take()?;
        self.remaining -= 1;

        let mut succ = current.clone();
        for axis in (0..succ.len()).rev() {
            succ[axis] += 1;
            if succ[axis] < self.extents[axis] {
                self.next = Some(succ);
                return Some(current);
            }
            succ[axis] = 0;
        }
        // every axis wrapped around
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Coordinates {}
