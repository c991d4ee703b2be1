/*!
`zerkel` is an interpreter and program enumerator for a minimal functional language over
hereditarily finite sets: every value is a finite, well-founded set, and every program is a term
built from eight primitive combinators (`E`, `I`, `+`, `?`, `!`, projection, composition,
recursion). It provides hash-consed sets and terms, a textual parser with a macro library layered
over the primitive syntax, a lazy stack-based evaluator, and an enumerator over the space of
well-formed terms.
*/
#![forbid(unsafe_code, missing_debug_implementations)]

pub mod util;

pub mod set;

pub mod term;

pub mod parser;

pub mod eval;

pub mod enumerate;
