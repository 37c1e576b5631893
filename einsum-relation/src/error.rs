use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("Invalid subscripts: {0}")]
    InvalidSubscripts(String),

    /// More than one subscript after `->`, e.g. `ij->i,j`
    #[error("Malformed equation: expected one output subscript, found {count}")]
    MultipleOutputs { count: usize },

    #[error("Output label '{0}' appears more than once")]
    DuplicateOutputLabel(char),

    #[error("Operand number mismatch: subscripts ({expected}), operands ({actual})")]
    OperandCountMismatch { expected: usize, actual: usize },

    /// Length of an input subscript differs from the rank of its operand
    #[error("Rank mismatch for operand {operand}: subscript '{subscript}' has {expected} labels, operand has rank {actual}")]
    RankMismatch {
        operand: usize,
        subscript: String,
        expected: usize,
        actual: usize,
    },

    #[error("Label '{0}' is not bound to any operand dimension")]
    UndefinedLabel(char),

    #[error("Extent conflict for label '{label}': bound to {expected}, found {actual}")]
    ExtentConflict {
        label: char,
        expected: usize,
        actual: usize,
    },
}
