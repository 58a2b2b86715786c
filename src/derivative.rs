//! Symbolic differentiation of expression trees.
//!
//! The derivative is built as a brand-new tree. Operand subtrees of the input are
//! shared into the result through their `Arc`s instead of being copied.
//!
//! Two rules differ from textbook calculus:
//! - the derivative of the target variable is its *bound value*, not `1`
//! - the quotient rule is `a'*b + (-b' * a) / (b*b)`, the first term is neither
//!   divided by `b*b` nor subtracted
//!
//! No simplification is performed on the result.

use std::sync::Arc;

use crate::{
    errors::{DiffError, EvalError},
    expr::Expr,
    types::Bindings,
};

impl Expr {
    /// Computes the symbolic derivative of this expression with respect to a variable.
    ///
    /// Recursively applies the rules below to build a new expression tree:
    /// - d/dx(c) = 0 for constants
    /// - d/dx(x) = value bound to `x`; d/dx(y) = 0 for other variables
    /// - Sum rule: d/dx(f + g) = df/dx + dg/dx
    /// - Product rule: d/dx(f * g) = df/dx * g + dg/dx * f
    /// - Quotient: d/dx(f / g) = df/dx * g + (-dg/dx * f) / (g * g)
    /// - Negation: d/dx(-f) = -(df/dx)
    /// - d/dx(sh f) = df/dx * ch f
    /// - d/dx(ch f) = df/dx * sh f
    /// - d/dx(th f) = df/dx / (ch f * ch f)
    /// - d/dx(cth f) = -(df/dx) / (sh f * sh f)
    ///
    /// # Arguments
    /// * `with_respect_to` - The name of the variable to differentiate with respect to
    /// * `bindings` - Values consulted by the variable rule
    ///
    /// # Returns
    /// A new expression tree representing the derivative
    ///
    /// # Errors
    /// - `DiffError::NotImplemented` for any tree containing an integral node
    /// - `DiffError::Evaluation` if `with_respect_to` occurs in the tree but is not bound
    ///
    /// # Example
    /// ```
    /// # use hyperexpr::expr::Expr;
    /// let x = Expr::Var("x".to_string());
    /// assert_eq!(*x.derivative("x", &("x", 7.0)).unwrap(), Expr::Const(7.0));
    /// assert_eq!(*x.derivative("y", &()).unwrap(), Expr::Const(0.0));
    /// ```
    pub fn derivative<B: Bindings + ?Sized>(
        &self,
        with_respect_to: &str,
        bindings: &B,
    ) -> Result<Arc<Expr>, DiffError> {
        let d = |expr: &Arc<Expr>| expr.derivative(with_respect_to, bindings);

        let derivative = match self {
            Expr::Const(_) => Expr::Const(0.0),

            Expr::Var(name) => {
                if name == with_respect_to {
                    let value = bindings
                        .value_of(name)
                        .ok_or_else(|| EvalError::UndefinedVariable(name.clone()))?;
                    Expr::Const(value)
                } else {
                    Expr::Const(0.0)
                }
            }

            // d/dx(f + g) = df/dx + dg/dx
            Expr::Add(left, right) => Expr::Add(d(left)?, d(right)?),

            // d/dx(f * g) = df/dx * g + dg/dx * f
            Expr::Mul(left, right) => Expr::Add(
                Arc::new(Expr::Mul(d(left)?, right.clone())),
                Arc::new(Expr::Mul(d(right)?, left.clone())),
            ),

            // d/dx(f / g) = df/dx * g + (-dg/dx * f) / (g * g)
            Expr::Div(left, right) => Expr::Add(
                Arc::new(Expr::Mul(d(left)?, right.clone())),
                Arc::new(Expr::Div(
                    Arc::new(Expr::Mul(Arc::new(Expr::Neg(d(right)?)), left.clone())),
                    Arc::new(Expr::Mul(right.clone(), right.clone())),
                )),
            ),

            // d/dx(-f) = -(df/dx)
            Expr::Neg(expr) => Expr::Neg(d(expr)?),

            Expr::Sinh(expr) => Expr::Mul(d(expr)?, Arc::new(Expr::Cosh(expr.clone()))),

            Expr::Cosh(expr) => Expr::Mul(d(expr)?, Arc::new(Expr::Sinh(expr.clone()))),

            Expr::Tanh(expr) => {
                let cosh = Arc::new(Expr::Cosh(expr.clone()));
                Expr::Div(d(expr)?, Arc::new(Expr::Mul(cosh.clone(), cosh)))
            }

            Expr::Coth(expr) => {
                let sinh = Arc::new(Expr::Sinh(expr.clone()));
                Expr::Div(
                    Arc::new(Expr::Neg(d(expr)?)),
                    Arc::new(Expr::Mul(sinh.clone(), sinh)),
                )
            }

            Expr::Integral { .. } => {
                return Err(DiffError::NotImplemented(format!(
                    "definite integral {self}"
                )))
            }
        };

        Ok(Arc::new(derivative))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::VariableMap;

    fn var(name: &str) -> Arc<Expr> {
        Arc::new(Expr::Var(name.to_string()))
    }

    fn num(value: f64) -> Arc<Expr> {
        Arc::new(Expr::Const(value))
    }

    #[test]
    fn test_leaves() {
        // Test constant derivative
        assert_eq!(*Expr::Const(5.0).derivative("x", &()).unwrap(), Expr::Const(0.0));

        // The target variable yields its bound value, other variables yield 0
        assert_eq!(*var("x").derivative("x", &("x", 7.0)).unwrap(), Expr::Const(7.0));
        assert_eq!(*var("y").derivative("x", &("x", 7.0)).unwrap(), Expr::Const(0.0));
    }

    #[test]
    fn test_unbound_target() {
        assert_eq!(
            var("x").derivative("x", &()),
            Err(DiffError::Evaluation(EvalError::UndefinedVariable(
                "x".to_string()
            )))
        );
        // Other variables are never looked up
        assert!(var("y").derivative("x", &()).is_ok());
    }

    #[test]
    fn test_sum_and_product() {
        let at = ("x", 2.0);

        // Test sum rule (u+v)' = u' + v'
        let sum = Expr::Add(var("x"), var("y"));
        assert_eq!(
            *sum.derivative("x", &at).unwrap(),
            Expr::Add(num(2.0), num(0.0))
        );

        // Test product rule (u*v)' = u'*v + v'*u
        let product = Expr::Mul(var("x"), var("y"));
        assert_eq!(
            *product.derivative("x", &at).unwrap(),
            Expr::Add(
                Arc::new(Expr::Mul(num(2.0), var("y"))),
                Arc::new(Expr::Mul(num(0.0), var("x")))
            )
        );
    }

    #[test]
    fn test_quotient() {
        let quotient = Expr::Div(var("x"), var("y"));
        let mut vars = VariableMap::new();
        vars.insert("x".to_string(), 3.0);
        vars.insert("y".to_string(), 2.0);

        let derivative = quotient.derivative("y", &vars).unwrap();
        assert_eq!(
            *derivative,
            Expr::Add(
                Arc::new(Expr::Mul(num(0.0), var("y"))),
                Arc::new(Expr::Div(
                    Arc::new(Expr::Mul(Arc::new(Expr::Neg(num(2.0))), var("x"))),
                    Arc::new(Expr::Mul(var("y"), var("y"))),
                )),
            )
        );
        // 0 * 2 + (-2 * 3) / (2 * 2)
        assert_eq!(derivative.compute(&vars).unwrap(), -1.5);

        // The first term is added undivided: d/dx (x / y) at x=3, y=2 is 3 * 2 + 0
        let derivative = quotient.derivative("x", &vars).unwrap();
        assert_eq!(derivative.compute(&vars).unwrap(), 6.0);
    }

    #[test]
    fn test_negation() {
        assert_eq!(
            *Expr::Neg(var("x")).derivative("x", &("x", 1.0)).unwrap(),
            Expr::Neg(num(1.0))
        );
    }

    #[test]
    fn test_hyperbolic() {
        let at = ("x", 1.0);
        assert_eq!(
            *Expr::Sinh(var("x")).derivative("x", &at).unwrap(),
            Expr::Mul(num(1.0), Arc::new(Expr::Cosh(var("x"))))
        );
        assert_eq!(
            *Expr::Cosh(var("x")).derivative("x", &at).unwrap(),
            Expr::Mul(num(1.0), Arc::new(Expr::Sinh(var("x"))))
        );
        let cosh = Arc::new(Expr::Cosh(var("x")));
        assert_eq!(
            *Expr::Tanh(var("x")).derivative("x", &at).unwrap(),
            Expr::Div(num(1.0), Arc::new(Expr::Mul(cosh.clone(), cosh)))
        );
        let sinh = Arc::new(Expr::Sinh(var("x")));
        assert_eq!(
            *Expr::Coth(var("x")).derivative("x", &at).unwrap(),
            Expr::Div(
                Arc::new(Expr::Neg(num(1.0))),
                Arc::new(Expr::Mul(sinh.clone(), sinh))
            )
        );
    }

    #[test]
    fn test_hyperbolic_values() {
        // With x bound to 1 the variable rule yields 1, so these match calculus
        let at = ("x", 1.0_f64);
        let x = 1.0_f64;
        let th = Expr::Tanh(var("x")).derivative("x", &at).unwrap();
        assert!((th.compute(&at).unwrap() - 1.0 / (x.cosh() * x.cosh())).abs() < 1e-12);
        let cth = Expr::Coth(var("x")).derivative("x", &at).unwrap();
        assert!((cth.compute(&at).unwrap() + 1.0 / (x.sinh() * x.sinh())).abs() < 1e-12);
    }

    #[test]
    fn test_shares_operands() {
        let left = var("x");
        let right = Arc::new(Expr::Sinh(var("x")));
        let product = Expr::Mul(left.clone(), right.clone());

        let derivative = product.derivative("x", &("x", 1.0)).unwrap();
        let Expr::Add(first, second) = &*derivative else {
            panic!("expected a sum, got {derivative}");
        };
        let (Expr::Mul(_, shared_right), Expr::Mul(_, shared_left)) = (&**first, &**second) else {
            panic!("expected two products, got {derivative}");
        };
        assert!(Arc::ptr_eq(shared_right, &right));
        assert!(Arc::ptr_eq(shared_left, &left));
    }

    #[test]
    fn test_integral_not_implemented() {
        let integral = Expr::Integral {
            integrand: var("x"),
            lower: num(0.0),
            upper: num(1.0),
        };
        assert!(matches!(
            integral.derivative("x", &("x", 1.0)),
            Err(DiffError::NotImplemented(_))
        ));
        assert!(matches!(
            integral.derivative("z", &()),
            Err(DiffError::NotImplemented(_))
        ));

        // Nested integrals fail as well
        let nested = Expr::Add(var("x"), Arc::new(integral));
        assert!(matches!(
            nested.derivative("x", &("x", 1.0)),
            Err(DiffError::NotImplemented(_))
        ));
    }

    #[test]
    fn test_input_untouched() {
        let expr = Expr::Mul(var("x"), Arc::new(Expr::Tanh(var("x"))));
        let before = expr.clone();
        let _ = expr.derivative("x", &("x", 0.5)).unwrap();
        assert_eq!(expr, before);
    }
}
