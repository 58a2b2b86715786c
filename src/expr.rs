//! Expression module for representing mathematical expressions.
//!
//! This module defines the core expression type, `Expr`, an immutable tree whose
//! nodes are constants, variables, arithmetic operators, the hyperbolic functions
//! and a definite integral. The tree can be:
//! - Evaluated against a set of variable bindings (see `eval`)
//! - Symbolically differentiated into a new tree (see `derivative`)
//! - Integrated numerically through its `Integral` node (see `quadrature`)
//! - Rendered back into fully parenthesized text
//!
//! # Expression Tree Structure
//! The expression tree is built recursively with each node being one of:
//! - Leaf nodes: Constants and Variables
//! - Unary operations: Neg, Sinh, Cosh, Tanh, Coth
//! - Binary operations: Add, Mul, Div
//! - Special nodes: Integral (integrand, lower bound, upper bound)
//!
//! Children are held through `Arc<Expr>`. Nothing ever mutates a node after it is
//! built, so subtrees can be shared between trees (the derivative of `a * b`
//! points at the very same `a` and `b` as the original) without ever forming a
//! cycle.

use std::sync::Arc;

use itertools::Itertools;

/// An expression tree node representing mathematical operations.
///
/// The tree is immutable. Every query on it (`variables`, `is_constant`,
/// `is_polynomial`) is computed structurally, nothing is cached in the nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A constant floating point value
    Const(f64),
    /// A reference to a variable by name
    Var(String),
    /// Negation of an expression
    Neg(Arc<Expr>),
    /// Addition of two expressions
    Add(Arc<Expr>, Arc<Expr>),
    /// Multiplication of two expressions
    Mul(Arc<Expr>, Arc<Expr>),
    /// Division of the first expression by the second
    Div(Arc<Expr>, Arc<Expr>),
    /// Hyperbolic sine of an expression
    Sinh(Arc<Expr>),
    /// Hyperbolic cosine of an expression
    Cosh(Arc<Expr>),
    /// Hyperbolic tangent of an expression
    Tanh(Arc<Expr>),
    /// Hyperbolic cotangent of an expression
    Coth(Arc<Expr>),
    /// Definite integral of `integrand` between two bound expressions
    Integral {
        integrand: Arc<Expr>,
        lower: Arc<Expr>,
        upper: Arc<Expr>,
    },
}

impl Expr {
    /// Returns the distinct variable names of the expression in first-seen order.
    ///
    /// Left operands are visited before right operands. An `Integral` reports the
    /// variables of its integrand only; its bounds do not contribute.
    ///
    /// # Example
    /// ```
    /// # use std::sync::Arc;
    /// # use hyperexpr::expr::Expr;
    /// let x = Arc::new(Expr::Var("x".to_string()));
    /// let y = Arc::new(Expr::Var("y".to_string()));
    /// let expr = Expr::Add(Arc::new(Expr::Mul(y.clone(), x.clone())), x);
    /// assert_eq!(expr.variables(), vec!["y", "x"]);
    /// ```
    pub fn variables(&self) -> Vec<String> {
        let mut names = Vec::new();
        self.collect_variables(&mut names);
        names.into_iter().unique().collect()
    }

    fn collect_variables(&self, names: &mut Vec<String>) {
        match self {
            Expr::Const(_) => {}
            Expr::Var(name) => names.push(name.clone()),
            Expr::Neg(expr)
            | Expr::Sinh(expr)
            | Expr::Cosh(expr)
            | Expr::Tanh(expr)
            | Expr::Coth(expr) => expr.collect_variables(names),
            Expr::Add(left, right) | Expr::Mul(left, right) | Expr::Div(left, right) => {
                left.collect_variables(names);
                right.collect_variables(names);
            }
            Expr::Integral { integrand, .. } => integrand.collect_variables(names),
        }
    }

    /// Returns true if no variable is reachable from this node.
    ///
    /// A bound integral produces a number rather than a function of its
    /// integration variable, so `Integral` is always constant.
    pub fn is_constant(&self) -> bool {
        match self {
            Expr::Const(_) => true,
            Expr::Var(_) => false,
            Expr::Neg(expr)
            | Expr::Sinh(expr)
            | Expr::Cosh(expr)
            | Expr::Tanh(expr)
            | Expr::Coth(expr) => expr.is_constant(),
            Expr::Add(left, right) | Expr::Mul(left, right) | Expr::Div(left, right) => {
                left.is_constant() && right.is_constant()
            }
            Expr::Integral { .. } => true,
        }
    }

    /// Crude polynomial test.
    ///
    /// Arithmetic nodes are polynomial when their operands are. A hyperbolic
    /// function is polynomial exactly when its own operand is constant; the rule
    /// is applied locally at each function node, it does not look at ancestors.
    pub fn is_polynomial(&self) -> bool {
        match self {
            Expr::Const(_) | Expr::Var(_) => true,
            Expr::Neg(expr) => expr.is_polynomial(),
            Expr::Add(left, right) | Expr::Mul(left, right) | Expr::Div(left, right) => {
                left.is_polynomial() && right.is_polynomial()
            }
            Expr::Sinh(expr) | Expr::Cosh(expr) | Expr::Tanh(expr) | Expr::Coth(expr) => {
                expr.is_constant()
            }
            Expr::Integral { .. } => true,
        }
    }

    /// Number of nodes in the tree, counting shared subtrees once per reference.
    pub fn size(&self) -> usize {
        match self {
            Expr::Const(_) | Expr::Var(_) => 1,
            Expr::Neg(expr)
            | Expr::Sinh(expr)
            | Expr::Cosh(expr)
            | Expr::Tanh(expr)
            | Expr::Coth(expr) => 1 + expr.size(),
            Expr::Add(left, right) | Expr::Mul(left, right) | Expr::Div(left, right) => {
                1 + left.size() + right.size()
            }
            Expr::Integral {
                integrand,
                lower,
                upper,
            } => 1 + integrand.size() + lower.size() + upper.size(),
        }
    }
}

/// Implements string formatting for expressions.
///
/// Every non-leaf node is wrapped in parentheses and every symbol is separated by
/// a single space:
/// - Binary operations render as `( a + b )`, `( a * b )`, `( a / b )`
/// - Negation renders as `( - a )`
/// - Functions render as `( Sh ( a ) )`, `( Ch ( a ) )`, `( Th ( a ) )`, `( Cth ( a ) )`
/// - Integrals render as `( Int ( f , lower , upper ) )`
///
/// The output is meant for display. It is infix, so it does not parse back
/// through the postfix token grammar.
impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Const(val) => write!(f, "{val}"),
            Expr::Var(name) => write!(f, "{name}"),
            Expr::Neg(expr) => write!(f, "( - {expr} )"),
            Expr::Add(left, right) => write!(f, "( {left} + {right} )"),
            Expr::Mul(left, right) => write!(f, "( {left} * {right} )"),
            Expr::Div(left, right) => write!(f, "( {left} / {right} )"),
            Expr::Sinh(expr) => write!(f, "( Sh ( {expr} ) )"),
            Expr::Cosh(expr) => write!(f, "( Ch ( {expr} ) )"),
            Expr::Tanh(expr) => write!(f, "( Th ( {expr} ) )"),
            Expr::Coth(expr) => write!(f, "( Cth ( {expr} ) )"),
            Expr::Integral {
                integrand,
                lower,
                upper,
            } => write!(f, "( Int ( {integrand} , {lower} , {upper} ) )"),
        }
    }
}
