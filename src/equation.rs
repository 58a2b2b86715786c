//! Mathematical equation evaluation, differentiation and integration.
//!
//! This module provides the `Equation` type, the handle a front end keeps around
//! after the user has entered a function. It owns the parsed expression tree and
//! exposes everything one does with it:
//!
//! - Evaluating it for a set of variable bindings, or for many sets in parallel
//! - Differentiating it with respect to a variable at a point
//! - Integrating it between two bounds
//!
//! # Example
//!
//! ```
//! use hyperexpr::Equation;
//!
//! let eq = Equation::new("( ( x 2 * ) ( x Sh ) + )").unwrap();
//! let value = eq.eval(&("x", 0.0)).unwrap(); // sh(0) + 2 * 0
//! assert_eq!(value, 0.0);
//!
//! let area = eq.integrate(0.0, 1.0).unwrap();
//! assert!((area - (1.0_f64.cosh() - 1.0 + 1.0)).abs() < 1e-2);
//! ```
//!
//! # Token Format
//!
//! `Equation::new` splits its input on whitespace, so every parenthesis, operator
//! and operand must be separated by spaces. See `parse` for the grammar.

use std::sync::Arc;

use colored::Colorize;
use itertools::Itertools;
use log::debug;
use rayon::prelude::*;

use crate::errors::EquationError;
use crate::expr::Expr;
use crate::parse::parse;
use crate::types::Bindings;

/// Represents a mathematical equation that can be evaluated, differentiated and integrated.
///
/// The equation holds the expression tree and the list of its variables in
/// first-seen order. Both are fixed at construction; every operation returns a
/// value or a new `Equation`.
#[derive(Clone)]
pub struct Equation {
    ast: Arc<Expr>,
    variables: Vec<String>,
}

impl std::fmt::Debug for Equation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{{")?;
        writeln!(f, "    {}: {}", "Equation".cyan(), self.ast)?;
        writeln!(f, "    {}: {:?}", "Variables".cyan(), self.variables)?;
        writeln!(f, "    {}: {}", "Constant".cyan(), self.is_constant())?;
        writeln!(f, "    {}: {}", "Polynomial".cyan(), self.is_polynomial())?;
        writeln!(f, "}}")?;
        Ok(())
    }
}

impl std::fmt::Display for Equation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.ast)
    }
}

impl Equation {
    /// Creates a new `Equation` from a whitespace separated token string.
    ///
    /// # Arguments
    /// * `source` - The expression, e.g. `"( x Ch )"`
    ///
    /// # Returns
    /// * `Result<Self, EquationError>` - The equation or a parse error
    ///
    /// # Example
    /// ```
    /// # use hyperexpr::Equation;
    /// let eq = Equation::new("( 4 2 / )").unwrap();
    /// assert_eq!(eq.eval(&()).unwrap(), 0.5);
    /// ```
    pub fn new(source: &str) -> Result<Self, EquationError> {
        let tokens = source.split_whitespace().collect_vec();
        Self::from_tokens(&tokens)
    }

    /// Creates a new `Equation` from already split tokens.
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Result<Self, EquationError> {
        let ast = parse(tokens)?;
        debug!("parsed {} tokens into {ast}", tokens.len());
        Ok(Self::from_ast(ast))
    }

    /// Wraps an existing expression tree.
    pub fn from_ast(ast: Arc<Expr>) -> Self {
        let variables = ast.variables();
        Self { ast, variables }
    }

    /// Evaluates the equation for the given bindings.
    ///
    /// # Errors
    /// Returns `EquationError::Eval` if a variable is unbound, a denominator is
    /// zero or `Cth` is evaluated outside its domain.
    pub fn eval<B: Bindings + ?Sized>(&self, bindings: &B) -> Result<f64, EquationError> {
        Ok(self.ast.compute(bindings)?)
    }

    /// Evaluates the equation for many binding sets in parallel.
    ///
    /// Results are returned in the order of `binding_sets`. The first failure
    /// encountered is returned instead.
    ///
    /// # Example
    /// ```
    /// # use hyperexpr::Equation;
    /// let eq = Equation::new("( x x * )").unwrap();
    /// let points = vec![("x", 1.0), ("x", 2.0), ("x", 3.0)];
    /// assert_eq!(eq.eval_parallel(&points).unwrap(), vec![1.0, 4.0, 9.0]);
    /// ```
    pub fn eval_parallel<B: Bindings + Sync>(
        &self,
        binding_sets: &[B],
    ) -> Result<Vec<f64>, EquationError> {
        let num_threads = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(8);
        let chunk_size = (binding_sets.len() / (num_threads * 4)).max(1);

        binding_sets
            .par_iter()
            .with_min_len(chunk_size)
            .map(|bindings| self.eval(bindings))
            .collect()
    }

    /// Differentiates the equation with respect to `variable`.
    ///
    /// The bindings are needed because the derivative of `variable` itself is
    /// its bound value.
    ///
    /// # Errors
    /// Returns `EquationError::Diff` if the tree contains an integral or
    /// `variable` occurs in it without a binding.
    pub fn derivative<B: Bindings + ?Sized>(
        &self,
        variable: &str,
        bindings: &B,
    ) -> Result<Equation, EquationError> {
        let derivative = self.ast.derivative(variable, bindings)?;
        debug!("d/d{variable} {} = {derivative}", self.ast);
        Ok(Self::from_ast(derivative))
    }

    /// Differentiates the equation and evaluates the derivative with the same bindings.
    ///
    /// # Example
    /// ```
    /// # use hyperexpr::Equation;
    /// let eq = Equation::new("( x Sh )").unwrap();
    /// // x' is the bound value 1, so this is 1 * ch(1)
    /// let slope = eq.derivative_at("x", &("x", 1.0)).unwrap();
    /// assert!((slope - 1.0_f64.cosh()).abs() < 1e-12);
    /// ```
    pub fn derivative_at<B: Bindings + ?Sized>(
        &self,
        variable: &str,
        bindings: &B,
    ) -> Result<f64, EquationError> {
        self.derivative(variable, bindings)?.eval(bindings)
    }

    /// Wraps the equation in a definite integral with constant bounds.
    pub fn integral(&self, lower: f64, upper: f64) -> Equation {
        Self::from_ast(Arc::new(Expr::Integral {
            integrand: self.ast.clone(),
            lower: Arc::new(Expr::Const(lower)),
            upper: Arc::new(Expr::Const(upper)),
        }))
    }

    /// Integrates the equation from `lower` to `upper`.
    ///
    /// The integration variable is the first variable of the equation; no other
    /// variable may appear in it.
    pub fn integrate(&self, lower: f64, upper: f64) -> Result<f64, EquationError> {
        self.integral(lower, upper).eval(&())
    }

    /// Returns the variables of the equation that `bindings` does not cover.
    pub fn missing_variables<B: Bindings + ?Sized>(&self, bindings: &B) -> Vec<String> {
        self.variables
            .iter()
            .filter(|name| bindings.value_of(name).is_none())
            .cloned()
            .collect()
    }

    /// Returns the expression tree.
    pub fn ast(&self) -> &Arc<Expr> {
        &self.ast
    }

    /// Returns the variables in first-seen order.
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Returns true if no variable occurs in the equation.
    pub fn is_constant(&self) -> bool {
        self.ast.is_constant()
    }

    /// Returns true if the equation passes the polynomial test of `Expr::is_polynomial`.
    pub fn is_polynomial(&self) -> bool {
        self.ast.is_polynomial()
    }
}
