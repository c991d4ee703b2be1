/*!
A `nom` parser for the set literal grammar of SPEC_FULL.md §6
*/

use super::Set;
use nom::branch::alt;
use nom::character::complete::{char, digit1, multispace0};
use nom::combinator::{all_consuming, map, map_res};
use nom::multi::separated_list0;
use nom::sequence::{delimited, pair, preceded};
use nom::IResult;
use std::fmt;

/// An invalid set literal: the full input text and the column of the failure
#[derive(Clone, PartialEq, Eq)]
pub struct SetParseError {
    text: String,
    column: usize,
}

impl SetParseError {
    fn at(text: &str, remaining: &str) -> SetParseError {
        SetParseError {
            text: text.to_string(),
            column: text.len() - remaining.len(),
        }
    }
}

impl fmt::Display for SetParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Invalid expression :")?;
        writeln!(f, "{}", self.text)?;
        write!(f, "{}^", " ".repeat(self.column))
    }
}

crate::debug_from_display!(SetParseError);

impl Set {
    /// Parse a single set literal. The entire input must be consumed: trailing garbage is an
    /// error, tightening the reference parser, which silently ignored anything after the first
    /// parsed atom.
    pub fn parse(text: &str) -> Result<Set, SetParseError> {
        match all_consuming(delimited(multispace0, atom, multispace0))(text) {
            Ok((_, set)) => Ok(set),
            Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
                Err(SetParseError::at(text, e.input))
            }
            Err(nom::Err::Incomplete(_)) => Err(SetParseError::at(text, "")),
        }
    }
}

fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

fn ordinal(input: &str) -> IResult<&str, Set> {
    map(
        map_res(digit1, |s: &str| s.parse::<usize>()),
        Set::generate_ordinal,
    )(input)
}

fn value_element(input: &str) -> IResult<&str, Set> {
    map(
        delimited(
            char('<'),
            map_res(digit1, |s: &str| s.parse::<u64>()),
            char('>'),
        ),
        Set::generate,
    )(input)
}

fn element(input: &str) -> IResult<&str, Set> {
    alt((ordinal, value_element))(input)
}

fn group(input: &str) -> IResult<&str, Set> {
    map(
        delimited(
            ws(char('{')),
            separated_list0(ws(char(',')), atom),
            ws(char('}')),
        ),
        Set::new,
    )(input)
}

fn tuple(input: &str) -> IResult<&str, Set> {
    map(
        delimited(
            ws(char('(')),
            pair(atom, preceded(ws(char(',')), expr)),
            ws(char(')')),
        ),
        |(first, mut rest)| {
            let mut elements = vec![first];
            elements.append(&mut rest);
            Set::generate_tuple(&elements)
        },
    )(input)
}

fn atom(input: &str) -> IResult<&str, Set> {
    ws(alt((element, group, tuple)))(input)
}

fn expr(input: &str) -> IResult<&str, Vec<Set>> {
    separated_list0(ws(char(',')), atom)(input)
}
