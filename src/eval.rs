//! Recursive evaluation of expression trees.
//!
//! Evaluation is a post-order walk: operands are computed first and combined at
//! their parent. The walk is pure; it reads the caller's bindings and never
//! touches shared state, so one tree can be evaluated from many threads at once.

use crate::{errors::EvalError, expr::Expr, quadrature::LeftRiemann, types::Bindings};

impl Expr {
    /// Computes the numeric value of the expression.
    ///
    /// # Arguments
    /// * `bindings` - Values for the variables of the expression
    ///
    /// # Returns
    /// * `Result<f64, EvalError>` - The value, or the first failure met during the walk
    ///
    /// # Errors
    /// - `UndefinedVariable` if a variable has no binding
    /// - `DivisionByZero` if a denominator evaluates to exactly zero
    /// - `DomainError` if `Cth` produces a non-finite value
    ///
    /// # Example
    /// ```
    /// # use std::sync::Arc;
    /// # use hyperexpr::expr::Expr;
    /// let expr = Expr::Mul(
    ///     Arc::new(Expr::Var("x".to_string())),
    ///     Arc::new(Expr::Const(3.0)),
    /// );
    /// assert_eq!(expr.compute(&("x", 2.0)).unwrap(), 6.0);
    /// ```
    pub fn compute<B: Bindings + ?Sized>(&self, bindings: &B) -> Result<f64, EvalError> {
        match self {
            Expr::Const(value) => Ok(*value),
            Expr::Var(name) => bindings
                .value_of(name)
                .ok_or_else(|| EvalError::UndefinedVariable(name.clone())),
            Expr::Neg(expr) => Ok(-expr.compute(bindings)?),
            Expr::Add(left, right) => Ok(left.compute(bindings)? + right.compute(bindings)?),
            Expr::Mul(left, right) => Ok(left.compute(bindings)? * right.compute(bindings)?),
            Expr::Div(left, right) => {
                let denominator = right.compute(bindings)?;
                if denominator == 0.0 {
                    return Err(EvalError::DivisionByZero);
                }
                Ok(left.compute(bindings)? / denominator)
            }
            Expr::Sinh(expr) => Ok(expr.compute(bindings)?.sinh()),
            Expr::Cosh(expr) => Ok(expr.compute(bindings)?.cosh()),
            Expr::Tanh(expr) => Ok(expr.compute(bindings)?.tanh()),
            Expr::Coth(expr) => {
                let argument = expr.compute(bindings)?;
                let value = 1.0 / argument.tanh();
                if value.is_finite() {
                    Ok(value)
                } else {
                    Err(EvalError::DomainError {
                        function: "Cth",
                        argument,
                    })
                }
            }
            Expr::Integral {
                integrand,
                lower,
                upper,
            } => {
                let lower = lower.compute(bindings)?;
                let upper = upper.compute(bindings)?;
                LeftRiemann::default().integrate(integrand, lower, upper)
            }
        }
    }
}
