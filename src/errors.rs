//! Error types for the hyperexpr crate.
//!
//! This module defines the error types that can occur while parsing token streams,
//! evaluating expression trees and differentiating them. The main error types are:
//!
//! - `ParseError`: Malformed token streams handed to the two-stack parser
//! - `EvalError`: Failures while computing the numeric value of a tree
//! - `DiffError`: Failures while building a derivative tree
//! - `EquationError`: High-level errors when working with an `Equation`
//!
//! Each error type implements the standard Error trait and provides detailed error messages.

use thiserror::Error;

/// Errors that can occur while reducing a token stream into an expression tree.
///
/// The parser never guesses: every malformed stream (unbalanced parentheses,
/// operators without enough operands, leftover operands) is reported instead of
/// producing a partial tree.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// A closing parenthesis was found while no operator was pending
    #[error("closing parenthesis at token {position} has no pending operator")]
    UnmatchedClose { position: usize },
    /// An operator was reduced with fewer operands than its arity requires
    #[error(
        "operator `{operator}` at token {position} needs {expected} operand(s), found {found}"
    )]
    StackUnderflow {
        operator: &'static str,
        position: usize,
        expected: usize,
        found: usize,
    },
    /// The token stream ended while an operator was still waiting for its `)`
    #[error("operator `{operator}` is never closed")]
    UnclosedOperator { operator: &'static str },
    /// The token stream produced no operand at all
    #[error("empty expression")]
    EmptyExpression,
    /// More than one operand was left on the stack after the last token
    #[error("expected a single expression, found {count} dangling operands")]
    DanglingOperands { count: usize },
}

/// Errors that can occur while computing the value of an expression tree.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// A variable was referenced that is absent from the supplied bindings
    #[error("variable `{0}` is not bound")]
    UndefinedVariable(String),
    /// The denominator of a division evaluated to exactly zero
    #[error("division by zero")]
    DivisionByZero,
    /// A function produced a non-finite value at the given argument
    #[error("{function} is not defined at {argument}")]
    DomainError {
        function: &'static str,
        argument: f64,
    },
    /// The quadrature step is not a positive finite number
    #[error("invalid quadrature step: {0}")]
    InvalidStep(f64),
    /// The quadrature step vanishes next to the magnitude of the sample point
    #[error("quadrature step {step} is below the float resolution at {point}")]
    StepLost { point: f64, step: f64 },
}

/// Errors that can occur while building a derivative tree.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DiffError {
    /// The node kind has no differentiation rule
    #[error("differentiation is not implemented for {0}")]
    NotImplemented(String),
    /// A rule needed the numeric value of a sub-expression and computing it failed
    #[error("failed to evaluate during differentiation")]
    Evaluation(#[from] EvalError),
}

/// High-level errors that can occur when working with equations.
///
/// This enum wraps the lower-level parser, evaluator and differentiator errors
/// so that callers of `Equation` deal with a single error type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EquationError {
    /// Error when reducing the token stream into a tree
    #[error("Failed to parse expression")]
    Parse(#[from] ParseError),
    /// Error when computing the value of the tree
    #[error("Failed to evaluate expression")]
    Eval(#[from] EvalError),
    /// Error when differentiating the tree
    #[error("Failed to differentiate expression")]
    Diff(#[from] DiffError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = ParseError::StackUnderflow {
            operator: "Int",
            position: 4,
            expected: 3,
            found: 2,
        };
        assert_eq!(
            err.to_string(),
            "operator `Int` at token 4 needs 3 operand(s), found 2"
        );
        assert_eq!(
            EvalError::UndefinedVariable("x".to_string()).to_string(),
            "variable `x` is not bound"
        );
    }

    #[test]
    fn test_conversions() {
        let err: DiffError = EvalError::DivisionByZero.into();
        assert_eq!(err, DiffError::Evaluation(EvalError::DivisionByZero));

        let err: EquationError = err.into();
        assert!(matches!(
            err,
            EquationError::Diff(DiffError::Evaluation(EvalError::DivisionByZero))
        ));
    }
}
