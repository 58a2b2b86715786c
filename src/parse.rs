//! Two-stack parser for fully parenthesized token streams.
//!
//! The input is a sequence of already split tokens. Operands (numbers and
//! variable names) go onto an operand stack, operator keywords go onto a keyword
//! stack, and every `)` reduces the most recent keyword with its operands into a
//! single node. `(` is accepted for readability but carries no meaning, and there
//! is no precedence to resolve since every reduction is explicit.
//!
//! Operands are assigned to slots in pop order, not in reading order. For
//! `( 4 2 / )` the `2` is popped first and becomes the numerator, so the
//! expression evaluates to `0.5`. Likewise the operand written right before `Int`
//! is the integrand, the one before it the lower bound and the first one the
//! upper bound.

use std::sync::Arc;

use log::trace;

use crate::{errors::ParseError, expr::Expr};

/// Operator keywords recognised in a token stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `+`
    Add,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `-` (unary)
    Neg,
    /// `Sh`
    Sinh,
    /// `Ch`
    Cosh,
    /// `Th`
    Tanh,
    /// `Cth`
    Coth,
    /// `Int`
    Integral,
}

impl Operator {
    /// Recognises an operator keyword. Matching is case sensitive.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "+" => Some(Operator::Add),
            "*" => Some(Operator::Mul),
            "/" => Some(Operator::Div),
            "-" => Some(Operator::Neg),
            "Sh" => Some(Operator::Sinh),
            "Ch" => Some(Operator::Cosh),
            "Th" => Some(Operator::Tanh),
            "Cth" => Some(Operator::Coth),
            "Int" => Some(Operator::Integral),
            _ => None,
        }
    }

    /// The keyword as written in a token stream.
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Mul => "*",
            Operator::Div => "/",
            Operator::Neg => "-",
            Operator::Sinh => "Sh",
            Operator::Cosh => "Ch",
            Operator::Tanh => "Th",
            Operator::Coth => "Cth",
            Operator::Integral => "Int",
        }
    }

    /// Number of operands consumed by a reduction.
    pub fn arity(self) -> usize {
        match self {
            Operator::Neg | Operator::Sinh | Operator::Cosh | Operator::Tanh | Operator::Coth => 1,
            Operator::Add | Operator::Mul | Operator::Div => 2,
            Operator::Integral => 3,
        }
    }

    /// Builds the node for this operator from operands in pop order.
    fn build(self, mut popped: impl Iterator<Item = Arc<Expr>>) -> Option<Expr> {
        let x = popped.next()?;
        let expr = match self {
            Operator::Neg => Expr::Neg(x),
            Operator::Sinh => Expr::Sinh(x),
            Operator::Cosh => Expr::Cosh(x),
            Operator::Tanh => Expr::Tanh(x),
            Operator::Coth => Expr::Coth(x),
            Operator::Add => Expr::Add(x, popped.next()?),
            Operator::Mul => Expr::Mul(x, popped.next()?),
            Operator::Div => Expr::Div(x, popped.next()?),
            Operator::Integral => {
                let lower = popped.next()?;
                let upper = popped.next()?;
                Expr::Integral {
                    integrand: x,
                    lower,
                    upper,
                }
            }
        };
        Some(expr)
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reduces a token sequence into a single expression tree.
///
/// # Arguments
/// * `tokens` - The whitespace-split tokens, e.g. `["(", "x", "Sh", ")"]`
///
/// # Returns
/// * `Result<Arc<Expr>, ParseError>` - The root of the tree or the reason the stream is malformed
///
/// # Example
/// ```
/// # use hyperexpr::parse::parse;
/// let expr = parse(&["(", "2", "3", "+", ")"]).unwrap();
/// assert_eq!(expr.compute(&()).unwrap(), 5.0);
///
/// // The operand nearest to `/` is the numerator
/// let expr = parse(&["(", "4", "2", "/", ")"]).unwrap();
/// assert_eq!(expr.compute(&()).unwrap(), 0.5);
/// ```
pub fn parse<S: AsRef<str>>(tokens: &[S]) -> Result<Arc<Expr>, ParseError> {
    let mut operands: Vec<Arc<Expr>> = Vec::with_capacity(tokens.len());
    let mut operators: Vec<Operator> = Vec::new();

    for (position, token) in tokens.iter().enumerate() {
        let token = token.as_ref();
        match token {
            "(" => {}
            ")" => {
                let operator = operators
                    .pop()
                    .ok_or(ParseError::UnmatchedClose { position })?;
                let expected = operator.arity();
                let found = operands.len();
                let underflow = || ParseError::StackUnderflow {
                    operator: operator.as_str(),
                    position,
                    expected,
                    found,
                };
                if found < expected {
                    return Err(underflow());
                }
                let popped = operands.drain(found - expected..).rev().collect::<Vec<_>>();
                let node = operator.build(popped.into_iter()).ok_or_else(underflow)?;
                trace!("reduced `{operator}` at token {position} into {node}");
                operands.push(Arc::new(node));
            }
            _ => {
                if let Some(operator) = Operator::from_token(token) {
                    operators.push(operator);
                } else if let Ok(value) = token.parse::<f64>() {
                    operands.push(Arc::new(Expr::Const(value)));
                } else {
                    operands.push(Arc::new(Expr::Var(token.to_string())));
                }
            }
        }
    }

    if let Some(operator) = operators.pop() {
        return Err(ParseError::UnclosedOperator {
            operator: operator.as_str(),
        });
    }

    match operands.len() {
        0 => Err(ParseError::EmptyExpression),
        1 => operands.pop().ok_or(ParseError::EmptyExpression),
        count => Err(ParseError::DanglingOperands { count }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str) -> Arc<Expr> {
        Arc::new(Expr::Var(name.to_string()))
    }

    fn num(value: f64) -> Arc<Expr> {
        Arc::new(Expr::Const(value))
    }

    fn tokens(source: &str) -> Vec<&str> {
        source.split_whitespace().collect()
    }

    #[test]
    fn test_leaves() {
        assert_eq!(*parse(&["3.5"]).unwrap(), Expr::Const(3.5));
        assert_eq!(*parse(&["-2"]).unwrap(), Expr::Const(-2.0));
        assert_eq!(*parse(&["x"]).unwrap(), Expr::Var("x".to_string()));
        // Parentheses alone change nothing
        assert_eq!(*parse(&["(", "y"]).unwrap(), Expr::Var("y".to_string()));
    }

    #[test]
    fn test_operand_slots() {
        // First popped operand goes to the first slot
        assert_eq!(
            *parse(&tokens("( x y + )")).unwrap(),
            Expr::Add(var("y"), var("x"))
        );
        assert_eq!(
            *parse(&tokens("( 4 2 / )")).unwrap(),
            Expr::Div(num(2.0), num(4.0))
        );
        assert_eq!(
            *parse(&tokens("( b a t Int )")).unwrap(),
            Expr::Integral {
                integrand: var("t"),
                lower: var("a"),
                upper: var("b"),
            }
        );
    }

    #[test]
    fn test_unary() {
        assert_eq!(*parse(&tokens("( x - )")).unwrap(), Expr::Neg(var("x")));
        assert_eq!(*parse(&tokens("( x Sh )")).unwrap(), Expr::Sinh(var("x")));
        assert_eq!(*parse(&tokens("( x Ch )")).unwrap(), Expr::Cosh(var("x")));
        assert_eq!(*parse(&tokens("( x Th )")).unwrap(), Expr::Tanh(var("x")));
        assert_eq!(*parse(&tokens("( x Cth )")).unwrap(), Expr::Coth(var("x")));
    }

    #[test]
    fn test_nested() {
        // sh(x) * (x + 1)
        let expr = parse(&tokens("( ( x 1 + ) ( x Sh ) * )")).unwrap();
        assert_eq!(
            *expr,
            Expr::Mul(
                Arc::new(Expr::Sinh(var("x"))),
                Arc::new(Expr::Add(num(1.0), var("x")))
            )
        );
        assert_eq!(expr.variables(), vec!["x"]);
    }

    #[test]
    fn test_accepts_owned_tokens() {
        let owned: Vec<String> = vec!["(".into(), "0".into(), "Ch".into(), ")".into()];
        assert_eq!(*parse(&owned).unwrap(), Expr::Cosh(num(0.0)));
    }

    #[test]
    fn test_unmatched_close() {
        assert_eq!(
            parse(&tokens("( 1 2 + ) )")),
            Err(ParseError::UnmatchedClose { position: 5 })
        );
    }

    #[test]
    fn test_stack_underflow() {
        assert_eq!(
            parse(&tokens("( 1 + )")),
            Err(ParseError::StackUnderflow {
                operator: "+",
                position: 3,
                expected: 2,
                found: 1,
            })
        );
        assert!(matches!(
            parse(&tokens("( 0 1 Int )")),
            Err(ParseError::StackUnderflow { operator: "Int", .. })
        ));
        assert!(matches!(
            parse(&tokens("( Sh )")),
            Err(ParseError::StackUnderflow { found: 0, .. })
        ));
    }

    #[test]
    fn test_unclosed_and_leftovers() {
        assert_eq!(
            parse(&tokens("( 1 2 +")),
            Err(ParseError::UnclosedOperator { operator: "+" })
        );
        assert_eq!(
            parse(&tokens("1 2")),
            Err(ParseError::DanglingOperands { count: 2 })
        );
        assert_eq!(parse::<&str>(&[]), Err(ParseError::EmptyExpression));
        assert_eq!(parse(&["(", ")"]), Err(ParseError::UnmatchedClose { position: 1 }));
    }
}
