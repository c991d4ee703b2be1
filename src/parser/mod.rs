/*!
Primitive syntax and macro library for term text, grounded on
`original_source/src/zerkel/interpreter/parser.py`.

Two kinds of macro live here. Most ("successor", "union", "is ordinal", ...) expand to a fixed
literal primitive-syntax string that is recursively reparsed. A handful ("map", "filter", "op",
"iop", "all", "any", decimal constants) build their expansion text at parse time, interpolating a
computed arity or a sub-term's own [`Display`](std::fmt::Display) rendering, and then recursively
reparse that generated text — exactly the architecture the original parser uses.
*/

pub mod error;

pub use error::ParseError;

use crate::term::Node;
use nom::branch::alt;
use nom::bytes::complete::{tag, take_while1};
use nom::character::complete::{char, digit1, multispace0, multispace1};
use nom::combinator::{map, map_res, opt, recognize};
use nom::multi::many1;
use nom::sequence::pair;
use nom::IResult;

/// Parse a complete term. The whole input must be consumed by a single top-level expression.
pub fn parse(text: &str) -> Result<Node, ParseError> {
    let (remaining, _) = multispace0::<_, nom::error::Error<&str>>(text).unwrap();
    match expression(remaining) {
        Ok((rest, node)) => {
            let (rest, _) = multispace0::<_, nom::error::Error<&str>>(rest).unwrap();
            if rest.is_empty() {
                Ok(node)
            } else {
                Err(ParseError::at(text, rest))
            }
        }
        Err(_) => Err(ParseError::at(text, remaining)),
    }
}

/// Parses a template string authored as part of this module and expected to always succeed.
fn expand(template: &str) -> Node {
    parse(template).unwrap_or_else(|e| panic!("internal macro template {:?} failed: {}", template, e))
}

type PResult<'a, O> = IResult<&'a str, O>;

fn expression(input: &str) -> PResult<Node> {
    let (input, _) = multispace0(input)?;
    let parsers: [fn(&str) -> PResult<Node>; 49] = [
        log_omega,
        get_first,
        get_second,
        is_transitive,
        is_ordinal,
        is_limit,
        is_omega,
        extract_omega,
        macro_all,
        macro_any,
        is_singleton,
        is_pair,
        biadd,
        not_equal,
        macro_not,
        macro_and,
        macro_or,
        macro_in,
        subset,
        equal,
        discard,
        add,
        sub,
        mult,
        div,
        power,
        log_macro,
        constant,
        couple,
        pair,
        singleton,
        successor,
        predecessor,
        rank,
        op,
        iop,
        macro_map,
        macro_filter,
        select,
        union,
        inter,
        recursion_primitive,
        composition_primitive,
        projection_primitive,
        in_primitive,
        if_then_else_primitive,
        union_plus_primitive,
        identity_primitive,
        empty_set_primitive,
    ];
    for candidate in parsers.iter() {
        if let Ok(result) = candidate(input) {
            return Ok(result);
        }
    }
    Err(nom::Err::Error(nom::error::Error::new(
        input,
        nom::error::ErrorKind::Alt,
    )))
}

/// Matches a literal word with a trailing word-boundary check, mirroring pyparsing's `Keyword`
/// (as opposed to `Literal`, which the single-character primitive tokens use).
fn keyword<'a>(word: &'static str) -> impl Fn(&'a str) -> PResult<'a, &'a str> {
    move |input: &'a str| {
        let (rest, matched) = tag(word)(input)?;
        match rest.chars().next() {
            Some(c) if c.is_alphanumeric() => Err(nom::Err::Error(nom::error::Error::new(
                input,
                nom::error::ErrorKind::Tag,
            ))),
            _ => Ok((rest, matched)),
        }
    }
}

fn token<'a, O>(inner: impl Fn(&'a str) -> PResult<'a, O>) -> impl Fn(&'a str) -> PResult<'a, O> {
    move |input: &'a str| {
        let (input, _) = multispace0(input)?;
        let (input, value) = inner(input)?;
        Ok((input, value))
    }
}

fn signed_integer(input: &str) -> PResult<i64> {
    map_res(recognize(pair(opt(char('-')), digit1)), |s: &str| {
        s.parse::<i64>()
    })(input)
}

macro_rules! fixed_macro {
    ($name:ident, $word:expr, $template:expr) => {
        fn $name(input: &str) -> PResult<Node> {
            map(keyword($word), |_| expand($template))(input)
        }
    };
}

fixed_macro!(successor, "successor", "o+II");
fixed_macro!(singleton, "singleton", "o+<EI");
fixed_macro!(pair, "pair", "o+> singleton <I");
fixed_macro!(couple, "couple", "o pair > singleton pair");
fixed_macro!(union, "union", "oRo?<>I>>I<>I<<III");
fixed_macro!(inter, "inter", "o filter o o and map o in <I>I <I>I union I");
fixed_macro!(macro_not, "not", "o?<E<1<EI");
fixed_macro!(macro_and, "and", "o?<Eo?<1<E<1I<EI");
fixed_macro!(macro_or, "or", "o?<1<E<1I");
fixed_macro!(macro_in, "in", "o?<<1<<E>I<I");
fixed_macro!(subset, "subset", "o and map in");
fixed_macro!(equal, "equal", "o?<<1<<0>I+");
fixed_macro!(not_equal, "not equal", "oR?<<1>I+");
fixed_macro!(discard, "discard", "o union filter not equal");
fixed_macro!(
    is_singleton,
    "is singleton",
    "o and o map o and o map equal <I>I II"
);
fixed_macro!(
    is_pair,
    "is pair",
    "o and o map oo and map o?<<<1 oo and map o or o pair o equal >>I<>I o equal >>I<<I<>I<<I>>I<<<E o equal >>I<<I<>I<<I>>I III"
);
fixed_macro!(is_transitive, "is transitive", "o all all in II");
fixed_macro!(is_ordinal, "is ordinal", "R o and o pair >I < is transitive");
fixed_macro!(
    is_limit,
    "is limit",
    "o and o pair o not equal I <E o all o not equal > successor <I II"
);
fixed_macro!(
    is_omega,
    "is omega",
    "o and o pair all o not is limit is limit"
);
fixed_macro!(extract_omega, "extract omega", "o union filter is omega");
fixed_macro!(
    log_omega,
    "log omega",
    "oo? o log >I<I <<E<<E<I I extract omega"
);
fixed_macro!(add, "add", "op successor << singleton");
fixed_macro!(biadd, "&", "o?<o?<1<E<EI<<E<<E>I");
fixed_macro!(sub, "sub", "iop add");
fixed_macro!(mult, "mult", "op add <<<o successor E");
fixed_macro!(div, "div", "iop mult");
fixed_macro!(power, "power", "op mult <<<oo singleton successor E");
fixed_macro!(log_macro, "log", "iop power");
fixed_macro!(predecessor, "predecessor", "Ro?>R+>I>R+<I");
fixed_macro!(rank, "rank", "o predecessor R>R+");
fixed_macro!(get_first, "get first", "o union o union filter is singleton");
fixed_macro!(
    get_second,
    "get second",
    "oo?<Io discard > union <I<<E> is singleton I get first"
);

fn constant(input: &str) -> PResult<Node> {
    map(map_res(digit1, |s: &str| s.parse::<u32>()), |n| {
        let text = format!("{}E", "o successor ".repeat(n as usize));
        expand(&text)
    })(input)
}

fn macro_all(input: &str) -> PResult<Node> {
    let (input, _) = keyword("all")(input)?;
    let (input, _) = multispace1(input)?;
    let (input, f) = expression(input)?;
    Ok((input, expand(&format!("o and map {}", f))))
}

fn macro_any(input: &str) -> PResult<Node> {
    let (input, _) = keyword("any")(input)?;
    let (input, _) = multispace1(input)?;
    let (input, f) = expression(input)?;
    Ok((input, expand(&format!("o or map {}", f))))
}

fn macro_map(input: &str) -> PResult<Node> {
    let (input, _) = keyword("map")(input)?;
    let (input, _) = multispace1(input)?;
    let (input, f) = expression(input)?;
    let n = f.arity();
    let n2 = n + 2;
    let text = format!(
        "select 0 0 ... among {n} for Ro? select 1 3 ... among {n2} for o singleton {f} \
         select 0 among {n2} for I select 1 among {n2} for I select 2 among {n2} for I",
        n = n,
        n2 = n2,
        f = f
    );
    Ok((input, expand(&text)))
}

fn macro_filter(input: &str) -> PResult<Node> {
    let (input, _) = keyword("filter")(input)?;
    let (input, _) = multispace1(input)?;
    let (input, f) = expression(input)?;
    let n = f.arity();
    let n2 = n + 2;
    let text = format!(
        "select 0 0 ... among {n} for Ro? select 1 3 ... among {n2} for o ? select 0 among {n} \
         for singleton select none among {n} select none among {n} {f} select 0 among {n2} for I \
         select 1 among {n2} for I select 2 among {n2} for I",
        n = n,
        n2 = n2,
        f = f
    );
    Ok((input, expand(&text)))
}

fn op(input: &str) -> PResult<Node> {
    let (input, _) = keyword("op")(input)?;
    let (input, _) = multispace1(input)?;
    let (input, f1) = expression(input)?;
    let (input, f2) = expression(input)?;
    let text = format!(
        "o union oRo? select 0 2 among 3 for o singleton o union map {} {} <<<E<>I<I>I",
        f1, f2
    );
    Ok((input, expand(&text)))
}

fn iop(input: &str) -> PResult<Node> {
    let (input, _) = keyword("iop")(input)?;
    let (input, _) = multispace1(input)?;
    let (input, f) = expression(input)?;
    let text = format!(
        "oo union o filter o?>> successor >>>Eo {} <<I>>I<>I>I>I<I> successor <I",
        f
    );
    Ok((input, expand(&text)))
}

#[derive(Clone, Copy, Debug)]
enum Selection {
    Position(i64),
    Slice(i64, Option<i64>),
}

fn selection(input: &str) -> PResult<Selection> {
    alt((slice_selection, map(signed_integer, Selection::Position)))(input)
}

fn slice_selection(input: &str) -> PResult<Selection> {
    let (input, start) = opt(signed_integer)(input)?;
    let start = start.unwrap_or(0);
    let (input, _) = token(tag("..."))(input)?;
    let (input, end) = opt(token(signed_integer))(input)?;
    Ok((input, Selection::Slice(start, end)))
}

fn selections(input: &str) -> PResult<Vec<Selection>> {
    many1(token(selection))(input)
}

fn select(input: &str) -> PResult<Node> {
    let (input, _) = keyword("select")(input)?;
    let (input, _) = multispace1(input)?;
    alt((select_none, select_positions))(input)
}

fn select_none(input: &str) -> PResult<Node> {
    let (input, _) = keyword("none")(input)?;
    let (input, _) = token(keyword("among"))(input)?;
    let (input, n) = token(signed_integer)(input)?;
    let (input, f) = opt(|i| {
        let (i, _) = token(keyword("for"))(i)?;
        expression(i)
    })(input)?;
    let f = f.unwrap_or_else(Node::empty_set);
    Ok((input, Node::projection(f, n.max(0) as usize, 0)))
}

fn select_positions(input: &str) -> PResult<Node> {
    let (input, positions) = selections(input)?;
    let (input, _) = token(keyword("among"))(input)?;
    let (input, n) = token(signed_integer)(input)?;
    let (input, _) = token(keyword("for"))(input)?;
    let (input, f) = expression(input)?;
    Ok((input, build_select(&positions, n, f)))
}

fn build_select(positions: &[Selection], n: i64, f: Node) -> Node {
    if f.arity() == 1 {
        if let Some(Selection::Position(p)) = positions.first() {
            return select_position(*p, n, Some(f));
        }
    }
    let mut compounds = Vec::new();
    for selection in positions {
        match selection {
            Selection::Position(p) => {
                if *p < n {
                    compounds.push(select_position(*p, n, None));
                }
            }
            Selection::Slice(start, end) => {
                for i in slice_range(*start, *end, n) {
                    compounds.push(select_position(i, n, None));
                }
            }
        }
    }
    Node::composition(f, compounds)
}

/// Ported verbatim from `_select_position` in `parser.py`, including the arithmetic for negative
/// positions, which is preserved exactly rather than reinterpreted. See DESIGN.md.
fn select_position(position: i64, arity: i64, p: Option<Node>) -> Node {
    let p = p.unwrap_or_else(Node::identity);
    if arity == 1 {
        return p;
    }
    let (l, r) = if position >= 0 {
        (position, arity - position - 1)
    } else {
        (arity + position - 1, position + 1)
    };
    Node::projection(p, l.max(0) as usize, r.max(0) as usize)
}

/// A simplified stand-in for Python's `slice(start, end).indices(n)` / `slice(start, end,
/// -1).indices(n)`, covering the ascending and descending ranges the macro templates actually
/// generate. See DESIGN.md.
fn slice_range(start: i64, end: Option<i64>, n: i64) -> Vec<i64> {
    let normalize = |v: i64| if v < 0 { (v + n).max(0) } else { v.min(n) };
    match end {
        Some(e) if e < start => {
            let hi = normalize(start).min(n - 1);
            let lo = normalize(e);
            let mut out = Vec::new();
            let mut i = hi;
            while i > lo {
                if i >= 0 && i < n {
                    out.push(i);
                }
                i -= 1;
            }
            out
        }
        Some(e) => {
            let s = normalize(start);
            let e = normalize(e);
            (s..e).collect()
        }
        None => {
            let s = normalize(start);
            (s..n).collect()
        }
    }
}

fn recursion_primitive(input: &str) -> PResult<Node> {
    let (input, _) = tag("R")(input)?;
    let (input, g) = expression(input)?;
    Ok((input, Node::recursion(g)))
}

fn composition_primitive(input: &str) -> PResult<Node> {
    let (input, _) = tag("o")(input)?;
    let (input, f) = expression(input)?;
    if f.arity() == 0 {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Verify,
        )));
    }
    let mut compounds = Vec::with_capacity(f.arity());
    let mut cursor = input;
    for _ in 0..f.arity() {
        let (next, g) = expression(cursor)?;
        compounds.push(g);
        cursor = next;
    }
    Ok((cursor, Node::composition(f, compounds)))
}

fn projection_primitive(input: &str) -> PResult<Node> {
    let (input, run) = take_while1(|c| c == '<' || c == '>')(input)?;
    let l = run.chars().filter(|&c| c == '<').count();
    let r = run.chars().filter(|&c| c == '>').count();
    let (input, f) = expression(input)?;
    Ok((input, Node::projection(f, l, r)))
}

fn in_primitive(input: &str) -> PResult<Node> {
    let (input, _) = tag("!")(input)?;
    let (input, f) = expression(input)?;
    let (input, g) = expression(input)?;
    Ok((input, Node::in_operator(f, g)))
}

fn if_then_else_primitive(input: &str) -> PResult<Node> {
    map(tag("?"), |_| Node::if_then_else())(input)
}

fn union_plus_primitive(input: &str) -> PResult<Node> {
    map(tag("+"), |_| Node::union_plus())(input)
}

fn identity_primitive(input: &str) -> PResult<Node> {
    map(tag("I"), |_| Node::identity())(input)
}

fn empty_set_primitive(input: &str) -> PResult<Node> {
    map(tag("E"), |_| Node::empty_set())(input)
}
