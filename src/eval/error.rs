/*!
Errors raised at the evaluator's boundary: argument coercion and arity checking
*/

use crate::debug_from_display;
use crate::set::SetParseError;
use std::fmt;

/// A failure at the boundary between a caller and the evaluator
#[derive(Clone, PartialEq, Eq)]
pub enum EvalError {
    /// `interpret` was called with a number of arguments that disagrees with the program's arity
    MismatchedNumberOfArguments {
        /// the program's arity
        expected: usize,
        /// the number of arguments actually supplied
        actual: usize,
    },
    /// A string argument failed to parse as a set literal
    InvalidArgument(SetParseError),
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EvalError::MismatchedNumberOfArguments { expected, actual } => write!(
                f,
                "MismatchedNumberOfArguments: expected {} but got {}",
                expected, actual
            ),
            EvalError::InvalidArgument(e) => write!(f, "invalid argument: {}", e),
        }
    }
}

debug_from_display!(EvalError);

impl std::error::Error for EvalError {}

impl From<SetParseError> for EvalError {
    fn from(e: SetParseError) -> EvalError {
        EvalError::InvalidArgument(e)
    }
}
