//! Relation map from output coordinates to the input elements to be multiplied

use crate::{
    container::MultiDim,
    enumerate::Coordinates,
    error::{Error, Result},
    loops,
    shape::LabelExtents,
    subscripts::Subscripts,
};
use std::{fmt, ops::Deref};

/// Coordinate of an operand or of the output
pub type Coordinate = Vec<usize>;

/// Positions of operand labels in the combined coordinate
///
/// The combined coordinate is indexed by [Subscripts::dim_order],
/// i.e. free labels followed by summation labels.
/// Projecting it onto an operand reads the positions of the operand labels
/// in the operand order. This allows any reordering, repeated labels,
/// and any subset of the combined labels.
///
/// ```
/// use einsum_relation::relation::Projection;
///
/// // combined coordinate over `ikj`, operand `jk`
/// let p = Projection::new(&['j', 'k'], &['i', 'k', 'j']).unwrap();
/// assert_eq!(p.project(&[5, 6, 7]), vec![7, 6]);
///
/// // diagonal `ii`
/// let p = Projection::new(&['i', 'i'], &['i']).unwrap();
/// assert_eq!(p.project(&[3]), vec![3, 3]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection(Vec<usize>);

impl Projection {
    pub fn new(subscript: &[char], dim_order: &[char]) -> Result<Self> {
        subscript
            .iter()
            .map(|&label| {
                dim_order
                    .iter()
                    .position(|&c| c == label)
                    .ok_or(Error::UndefinedLabel(label))
            })
            .collect::<Result<Vec<usize>>>()
            .map(Projection)
    }

    /// Projections for all inputs of the subscripts
    pub fn for_inputs(subscripts: &Subscripts) -> Result<Vec<Self>> {
        let dim_order = subscripts.dim_order();
        subscripts
            .inputs
            .iter()
            .map(|input| Self::new(input, &dim_order))
            .collect()
    }

    pub fn positions(&self) -> &[usize] {
        &self.0
    }

    pub fn project(&self, combined: &[usize]) -> Coordinate {
        self.0.iter().map(|&pos| combined[pos]).collect()
    }

    /// Same as [Projection::project], but writes into an existing buffer
    pub fn project_into(&self, combined: &[usize], local: &mut [usize]) {
        for (i, &pos) in local.iter_mut().zip(&self.0) {
            *i = combined[pos];
        }
    }
}

/// One summation term, a coordinate for each operand
///
/// Its value is the product of the operand elements at these coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term(Vec<Coordinate>);

impl Term {
    pub fn new(coordinates: Vec<Coordinate>) -> Self {
        Term(coordinates)
    }
}

impl Deref for Term {
    type Target = [Coordinate];
    fn deref(&self) -> &[Coordinate] {
        &self.0
    }
}

// `[0, 1]*[1, 0]` format
impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (n, coord) in self.0.iter().enumerate() {
            if n > 0 {
                write!(f, "*")?;
            }
            write!(f, "{:?}", coord)?;
        }
        Ok(())
    }
}

/// Summation terms keyed by output coordinates
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Relation {
    /// Output is a scalar, and there is only one list of terms
    Scalar(Vec<Term>),
    /// Terms for each output coordinate
    Array(MultiDim<Vec<Term>>),
}

#[cfg_attr(doc, katexit::katexit)]
/// Table from each output coordinate to the terms to be summed up
///
/// For `ij,jk->ik`, the entry for $(i, k)$ lists
/// $((i, j), (j, k))$ for every $j \in J$, and the output is
/// $$
/// c_{ik} = \sum_{j \in J} a_{ij} b_{jk}
/// $$
///
/// ```
/// use std::str::FromStr;
/// use einsum_relation::{relation::RelationMap, shape::LabelExtents, subscripts::Subscripts};
///
/// let subscripts = Subscripts::from_str("ij,jk->ik").unwrap();
/// let extents = LabelExtents::resolve(&subscripts, &[&[2, 3], &[3, 4]]).unwrap();
/// let map = RelationMap::build(&subscripts, extents).unwrap();
///
/// assert_eq!(map.output_shape(), vec![2, 4]);
/// let terms = map.terms(&[1, 2]).unwrap();
/// assert_eq!(terms.len(), 3);
/// assert_eq!(&terms[2][..], &[vec![1, 2], vec![2, 2]]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationMap {
    subscripts: Subscripts,
    free: Vec<char>,
    summation: Vec<char>,
    extents: LabelExtents,
    relation: Relation,
}

impl RelationMap {
    pub fn build(subscripts: &Subscripts, extents: LabelExtents) -> Result<Self> {
        let free = subscripts.free_indices().to_vec();
        let summation: Vec<char> = subscripts.contraction_indices().into_iter().collect();
        let projections = Projection::for_inputs(subscripts)?;
        let summation_extents = extents.extents_of(&summation)?;

        let terms_at = |free_coord: &[usize]| -> Vec<Term> {
            Coordinates::new(summation_extents.clone())
                .map(|summation_coord| {
                    let combined: Coordinate = free_coord
                        .iter()
                        .chain(summation_coord.iter())
                        .cloned()
                        .collect();
                    Term(projections.iter().map(|p| p.project(&combined)).collect())
                })
                .collect()
        };

        let relation = if free.is_empty() {
            Relation::Scalar(terms_at(&[]))
        } else {
            let mut table = MultiDim::from_elem(&extents.extents_of(&free)?, Vec::new());
            for free_coord in Coordinates::over(&free, &extents)? {
                table[free_coord.as_slice()] = terms_at(&free_coord);
            }
            Relation::Array(table)
        };

        let map = RelationMap {
            subscripts: subscripts.clone(),
            free,
            summation,
            extents,
            relation,
        };
        log::debug!(
            "Built relation map for {}: free {:?}, summation {:?}, {} terms",
            subscripts,
            map.free,
            map.summation,
            map.num_terms()
        );
        Ok(map)
    }

    /// Nested Python loops computing the same contraction, see [crate::loops]
    pub fn python_loops(&self, names: &[&str]) -> Result<String> {
        loops::python_loops(&self.subscripts, &self.extents, names)
    }

    /// Resolve extents from operand shapes and build the map
    pub fn from_shapes(subscripts: &Subscripts, shapes: &[&[usize]]) -> Result<Self> {
        let extents = LabelExtents::resolve(subscripts, shapes)?;
        Self::build(subscripts, extents)
    }

    /// Check that operands of the given shapes can be read with this map
    pub fn validate_shapes(&self, shapes: &[&[usize]]) -> Result<()> {
        let extents = LabelExtents::resolve(&self.subscripts, shapes)?;
        for (&label, &actual) in extents.as_map() {
            let expected = self.extents.extent(label)?;
            if expected != actual {
                return Err(Error::ExtentConflict {
                    label,
                    expected,
                    actual,
                });
            }
        }
        Ok(())
    }

    pub fn subscripts(&self) -> &Subscripts {
        &self.subscripts
    }

    /// Free labels, in output order
    pub fn free(&self) -> &[char] {
        &self.free
    }

    /// Summation labels, in the order used for enumeration
    pub fn summation(&self) -> &[char] {
        &self.summation
    }

    pub fn extents(&self) -> &LabelExtents {
        &self.extents
    }

    pub fn relation(&self) -> &Relation {
        &self.relation
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self.relation, Relation::Scalar(_))
    }

    /// Shape of output, empty for a scalar
    pub fn output_shape(&self) -> Vec<usize> {
        match &self.relation {
            Relation::Scalar(_) => Vec::new(),
            Relation::Array(table) => table.shape().to_vec(),
        }
    }

    /// Terms for an output coordinate. The scalar output has only the empty coordinate.
    pub fn terms(&self, free_coord: &[usize]) -> Option<&[Term]> {
        match &self.relation {
            Relation::Scalar(terms) if free_coord.is_empty() => Some(terms),
            Relation::Scalar(_) => None,
            Relation::Array(table) => table.get(free_coord).map(|terms| terms.as_slice()),
        }
    }

    /// Total number of terms over all output coordinates
    pub fn num_terms(&self) -> usize {
        match &self.relation {
            Relation::Scalar(terms) => terms.len(),
            Relation::Array(table) => table.iter().map(|terms| terms.len()).sum(),
        }
    }

    /// Enumerate output coordinates in the same order as used while building
    pub fn free_coordinates(&self) -> Result<Coordinates> {
        Coordinates::over(&self.free, &self.extents)
    }
}

// One line for each output coordinate, e.g. `[0, 1] = [0, 0]*[0, 1] + [0, 1]*[1, 1]`
impl fmt::Display for RelationMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let coords = self.free_coordinates().map_err(|_| fmt::Error)?;
        for (n, coord) in coords.enumerate() {
            if n > 0 {
                writeln!(f)?;
            }
            write!(f, "{:?} =", coord)?;
            let terms = self.terms(&coord).unwrap_or_default();
            if terms.is_empty() {
                write!(f, " 0")?;
            }
            for (m, term) in terms.iter().enumerate() {
                if m > 0 {
                    write!(f, " +")?;
                }
                write!(f, " {}", term)?;
            }
        }
        Ok(())
    }
}
