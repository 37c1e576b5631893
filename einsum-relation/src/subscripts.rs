//! Einsum subscripts, e.g. `ij,jk->ik`
use crate::{
    error::{Error, Result},
    parser::RawSubscripts,
};
use std::{collections::BTreeSet, fmt, ops::Deref, str::FromStr};

/// Ordered labels of one operand or of the output, e.g. `ij`
///
/// The order of labels is the axis order of the corresponding array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Subscript(Vec<char>);

impl Subscript {
    pub fn new(labels: Vec<char>) -> Self {
        Subscript(labels)
    }

    pub fn labels(&self) -> &[char] {
        &self.0
    }
}

impl Deref for Subscript {
    type Target = [char];
    fn deref(&self) -> &[char] {
        &self.0
    }
}

impl FromIterator<char> for Subscript {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        Subscript(iter.into_iter().collect())
    }
}

impl fmt::Display for Subscript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in &self.0 {
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

#[cfg_attr(doc, katexit::katexit)]
/// Validated einsum subscripts
///
/// Labels of the output are "free" labels, and the other labels appearing in inputs
/// are "summation" labels. For `ij,jk->ik`, the free labels are $i, k$
/// and the summation label is $j$:
/// $$
/// c_{ik} = \sum_{j \in J} a_{ij} b_{jk}
/// $$
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscripts {
    /// Input subscript, `ij` and `jk`
    pub inputs: Vec<Subscript>,
    /// Output subscript, `ik`. Empty for a scalar output.
    pub output: Subscript,
}

impl Subscripts {
    /// Validate raw subscripts
    ///
    /// The output subscript must not contain the same label twice.
    pub fn from_raw(raw: RawSubscripts) -> Result<Self> {
        let mut seen = BTreeSet::new();
        for &c in raw.output.iter() {
            if !seen.insert(c) {
                return Err(Error::DuplicateOutputLabel(c));
            }
        }
        Ok(Subscripts {
            inputs: raw.inputs,
            output: raw.output,
        })
    }

    pub fn num_inputs(&self) -> usize {
        self.inputs.len()
    }

    /// `true` if the contraction results in a scalar
    pub fn is_scalar(&self) -> bool {
        self.output.is_empty()
    }

    /// Labels kept in the output, in output order
    pub fn free_indices(&self) -> &[char] {
        &self.output
    }

    /// Labels to be summed up
    ///
    /// ```
    /// use std::str::FromStr;
    /// use maplit::btreeset;
    /// use einsum_relation::subscripts::Subscripts;
    ///
    /// // Matrix multiplication AB
    /// let subscripts = Subscripts::from_str("ij,jk->ik").unwrap();
    /// assert_eq!(subscripts.contraction_indices(), btreeset!{'j'});
    ///
    /// // Reduce all Tr(AB)
    /// let subscripts = Subscripts::from_str("ij,ji->").unwrap();
    /// assert_eq!(subscripts.contraction_indices(), btreeset!{'i', 'j'});
    ///
    /// // Sum along rows, even if `j` appears only once
    /// let subscripts = Subscripts::from_str("ij->i").unwrap();
    /// assert_eq!(subscripts.contraction_indices(), btreeset!{'j'});
    ///
    /// // Take diagonal elements
    /// let subscripts = Subscripts::from_str("ii->i").unwrap();
    /// assert_eq!(subscripts.contraction_indices(), btreeset!{});
    /// ```
    pub fn contraction_indices(&self) -> BTreeSet<char> {
        self.inputs
            .iter()
            .flat_map(|input| input.iter().cloned())
            .filter(|c| !self.output.contains(c))
            .collect()
    }

    /// Free labels followed by summation labels
    ///
    /// This fixes the position of each label in a combined coordinate.
    ///
    /// ```
    /// use std::str::FromStr;
    /// use einsum_relation::subscripts::Subscripts;
    ///
    /// let subscripts = Subscripts::from_str("ij,jk,kl->li").unwrap();
    /// assert_eq!(subscripts.dim_order(), vec!['l', 'i', 'j', 'k']);
    /// ```
    pub fn dim_order(&self) -> Vec<char> {
        self.output
            .iter()
            .cloned()
            .chain(self.contraction_indices())
            .collect()
    }
}

impl FromStr for Subscripts {
    type Err = Error;
    fn from_str(input: &str) -> Result<Self> {
        Self::from_raw(RawSubscripts::from_str(input)?)
    }
}

// `ij,jk->ik` format
impl fmt::Display for Subscripts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (n, input) in self.inputs.iter().enumerate() {
            write!(f, "{}", input)?;
            if n < self.inputs.len() - 1 {
                write!(f, ",")?;
            }
        }
        write!(f, "->{}", self.output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        let subscripts = Subscripts::from_str("ij,jk->ik").unwrap();
        assert_eq!(subscripts.to_string(), "ij,jk->ik");

        // spaces are dropped
        let subscripts = Subscripts::from_str(" i j , j k -> i k").unwrap();
        assert_eq!(subscripts.to_string(), "ij,jk->ik");

        // implicit scalar output
        let subscripts = Subscripts::from_str("i,i").unwrap();
        assert_eq!(subscripts.to_string(), "i,i->");
        assert!(subscripts.is_scalar());
    }

    #[test]
    fn free_and_contraction() {
        let subscripts = Subscripts::from_str("ijk,kl->li").unwrap();
        assert_eq!(subscripts.free_indices(), &['l', 'i']);
        assert_eq!(
            subscripts.contraction_indices(),
            maplit::btreeset! {'j', 'k'}
        );
        assert_eq!(subscripts.dim_order(), vec!['l', 'i', 'j', 'k']);
        assert_eq!(subscripts.num_inputs(), 2);
    }

    #[test]
    fn contraction_cases() {
        let contraction = |s: &str| Subscripts::from_str(s).unwrap().contraction_indices();
        assert_eq!(contraction("ij,jk->ik"), maplit::btreeset! {'j'});
        assert_eq!(contraction("ij,ji->"), maplit::btreeset! {'i', 'j'});
        assert_eq!(contraction("ij->i"), maplit::btreeset! {'j'});
        assert_eq!(contraction("ii->i"), BTreeSet::new());
    }

    #[test]
    fn scalar_dim_order() {
        let subscripts = Subscripts::from_str("ji,ij").unwrap();
        assert_eq!(subscripts.dim_order(), vec!['i', 'j']);
    }

    #[test]
    fn duplicate_output() {
        assert_eq!(
            Subscripts::from_str("ii->ii"),
            Err(Error::DuplicateOutputLabel('i'))
        );
    }
}
