//! Resolve the extent of each label from operand shapes

use crate::{
    error::{Error, Result},
    subscripts::Subscripts,
};
use std::collections::{btree_map::Entry, BTreeMap};

/// Mapping from each label to its extent
///
/// This is populated once from the operand shapes by [LabelExtents::resolve],
/// and never modified afterward.
///
/// ```
/// use std::str::FromStr;
/// use maplit::btreemap;
/// use einsum_relation::{shape::LabelExtents, subscripts::Subscripts};
///
/// let subscripts = Subscripts::from_str("ij,jk->ik").unwrap();
/// let extents = LabelExtents::resolve(&subscripts, &[&[2, 3], &[3, 4]]).unwrap();
/// assert_eq!(extents.as_map(), &btreemap!{ 'i' => 2, 'j' => 3, 'k' => 4 });
/// assert_eq!(extents.extents_of(&['k', 'i']).unwrap(), vec![4, 2]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelExtents(BTreeMap<char, usize>);

impl LabelExtents {
    /// Walk each operand shape along its subscript
    ///
    /// A label shared by several axes must have the same extent on all of them,
    /// and every output label must be bound to some axis of the inputs.
    pub fn resolve(subscripts: &Subscripts, shapes: &[&[usize]]) -> Result<Self> {
        if subscripts.num_inputs() != shapes.len() {
            return Err(Error::OperandCountMismatch {
                expected: subscripts.num_inputs(),
                actual: shapes.len(),
            });
        }

        let mut extents = BTreeMap::new();
        for (operand, (input, shape)) in subscripts.inputs.iter().zip(shapes).enumerate() {
            if input.len() != shape.len() {
                return Err(Error::RankMismatch {
                    operand,
                    subscript: input.to_string(),
                    expected: input.len(),
                    actual: shape.len(),
                });
            }
            for (&label, &n) in input.iter().zip(shape.iter()) {
                match extents.entry(label) {
                    Entry::Vacant(entry) => {
                        entry.insert(n);
                    }
                    Entry::Occupied(entry) => {
                        if *entry.get() != n {
                            return Err(Error::ExtentConflict {
                                label,
                                expected: *entry.get(),
                                actual: n,
                            });
                        }
                    }
                }
            }
        }

        let extents = LabelExtents(extents);
        for &label in subscripts.output.iter() {
            extents.extent(label)?;
        }
        log::debug!("Resolved extents of {}: {:?}", subscripts, extents.0);
        Ok(extents)
    }

    pub fn extent(&self, label: char) -> Result<usize> {
        self.0
            .get(&label)
            .copied()
            .ok_or(Error::UndefinedLabel(label))
    }

    /// Extents of labels in the given order
    pub fn extents_of(&self, labels: &[char]) -> Result<Vec<usize>> {
        labels.iter().map(|&label| self.extent(label)).collect()
    }

    pub fn as_map(&self) -> &BTreeMap<char, usize> {
        &self.0
    }
}

impl From<BTreeMap<char, usize>> for LabelExtents {
    fn from(extents: BTreeMap<char, usize>) -> Self {
        LabelExtents(extents)
    }
}
