//! Expression trees over arithmetic and hyperbolic functions.
//!
//! This crate parses fully parenthesized postfix token streams into immutable
//! expression trees, evaluates them, differentiates them symbolically and
//! integrates them numerically with a fixed-step Riemann sum.
//!
//! # Features
//!
//! - Two-stack parser without precedence rules
//! - Hyperbolic functions `Sh`, `Ch`, `Th`, `Cth`
//! - Symbolic differentiation producing new, structurally shared trees
//! - Definite integrals as ordinary tree nodes
//! - Parallel evaluation over many binding sets
//!
//! # Example
//!
//! ```rust
//! use hyperexpr::Equation;
//!
//! // ch(x) * 2
//! let eq = Equation::new("( 2 ( x Ch ) * )").unwrap();
//!
//! // Evaluate at x = 0
//! let result = eq.eval(&("x", 0.0)).unwrap(); // Returns 2.0
//! assert_eq!(result, 2.0);
//!
//! // Differentiate with respect to x at x = 0
//! let slope = eq.derivative_at("x", &("x", 0.0)).unwrap();
//! assert_eq!(slope, 0.0);
//! ```

pub use equation::Equation;
pub use errors::{DiffError, EquationError, EvalError, ParseError};
pub use expr::Expr;
pub use parse::parse;
pub use types::{Bindings, VariableMap};

pub mod prelude {
    pub use crate::equation::Equation;
    pub use crate::expr::Expr;
    pub use crate::parse::parse;
    pub use crate::quadrature::LeftRiemann;
    pub use crate::types::{Bindings, VariableMap};
}

/// Symbolic differentiation rules
mod derivative;
/// High-level equation handling
pub mod equation;
/// Error types for the various failure modes
pub mod errors;
/// Recursive evaluation of expression trees
mod eval;
/// Expression tree representation
pub mod expr;
/// Token stream parser
pub mod parse;
/// Fixed-step numeric integration
pub mod quadrature;
/// Variable bindings
pub mod types;
