//! Parse einsum subscripts
//!
//! These parsers are implemented using [nom](https://github.com/Geal/nom),
//! and corresponding EBNF-like schema are written in each document page.
//!

use crate::{
    error::{Error, Result},
    subscripts::Subscript,
};
use nom::{
    branch::*, bytes::complete::*, character::complete::*, combinator::*, multi::*,
    sequence::*, Finish, IResult, Parser,
};

/// label = any character except whitespace, `,`, `-`, `>` and `.`;
pub fn label(input: &str) -> IResult<&str, char> {
    satisfy(|c| !c.is_whitespace() && !matches!(c, ',' | '-' | '>' | '.')).parse(input)
}

/// subscript = { [label] | whitespace };
pub fn subscript(input: &str) -> IResult<&str, Subscript> {
    many0(alt((label.map(Some), multispace1.map(|_| None))))
        .map(|labels| labels.into_iter().flatten().collect())
        .parse(input)
}

/// subscripts = [subscript] {`,` [subscript]} \[ `->` [subscript] {`,` [subscript]} \]
///
/// Output subscripts are kept as a list here so that a malformed equation
/// like `ij->i,j` can be reported instead of failing to parse.
pub fn subscripts(input: &str) -> IResult<&str, (Vec<Subscript>, Option<Vec<Subscript>>)> {
    let (input, inputs) = separated_list1(char(','), subscript)(input)?;
    let (input, outputs) = opt(preceded(
        tag("->"),
        separated_list1(char(','), subscript),
    ))(input)?;
    Ok((input, (inputs, outputs)))
}

/// Einsum subscripts, e.g. `ij,jk->ik`
#[derive(Debug, PartialEq, Eq)]
pub struct RawSubscripts {
    /// Input subscript, `ij` and `jk`
    pub inputs: Vec<Subscript>,
    /// Output subscript. Empty when `->` is omitted, i.e. everything is summed up.
    pub output: Subscript,
}

impl std::str::FromStr for RawSubscripts {
    type Err = Error;
    fn from_str(input: &str) -> Result<Self> {
        let (inputs, outputs) = match all_consuming(subscripts)(input).finish() {
            Ok((_, parsed)) => parsed,
            Err(_) => return Err(Error::InvalidSubscripts(input.to_string())),
        };
        let output = match outputs {
            None => Subscript::default(),
            Some(outputs) => {
                let count = outputs.len();
                match (outputs.into_iter().next(), count) {
                    (Some(output), 1) => output,
                    _ => return Err(Error::MultipleOutputs { count }),
                }
            }
        };
        Ok(RawSubscripts { inputs, output })
    }
}
