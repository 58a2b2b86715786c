//! Fixed-step numeric integration.
//!
//! The integral node of an expression tree delegates here. The rule is a plain
//! left Riemann sum with a constant step and no error estimate, so its cost
//! grows linearly with the width of the interval.
//!
//! The integrand is evaluated against a binding that holds the integration
//! variable and nothing else. Any other variable it mentions is reported as
//! undefined, even if the caller had bound it for the enclosing expression.

use log::debug;

use crate::{errors::EvalError, expr::Expr};

/// Step used by integral nodes.
pub const DEFAULT_STEP: f64 = 0.001;

/// Left Riemann sum with a fixed step.
///
/// # Example
/// ```
/// # use hyperexpr::{expr::Expr, quadrature::LeftRiemann};
/// let integrand = Expr::Var("x".to_string());
/// let area = LeftRiemann::new(0.01).unwrap().integrate(&integrand, 0.0, 2.0).unwrap();
/// assert!((area - 2.0).abs() < 0.05);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeftRiemann {
    step: f64,
}

impl Default for LeftRiemann {
    fn default() -> Self {
        Self { step: DEFAULT_STEP }
    }
}

impl LeftRiemann {
    /// Creates a rule with the given step.
    ///
    /// # Errors
    /// Returns `EvalError::InvalidStep` unless `step` is positive and finite.
    pub fn new(step: f64) -> Result<Self, EvalError> {
        if step.is_finite() && step > 0.0 {
            Ok(Self { step })
        } else {
            Err(EvalError::InvalidStep(step))
        }
    }

    /// Returns the step width.
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Integrates `integrand` from `lower` to `upper`.
    ///
    /// The integration variable is the first variable of the integrand. Starting
    /// at `lower`, the integrand is sampled at the left edge of each step while
    /// the sample point stays below `upper - step`. An integrand without any
    /// variable is integrated as a constant function rather than rejected, so
    /// `Int` over a constant `c` yields about `c * (upper - lower)`. When `upper`
    /// does not exceed `lower` no sample is taken and the result is zero.
    ///
    /// # Errors
    /// Returns `EvalError::StepLost` if adding the step no longer moves the
    /// sample point, which happens once the bounds are large enough for the
    /// step to fall below one ulp. Evaluation errors of the integrand are
    /// returned as they occur.
    pub fn integrate(&self, integrand: &Expr, lower: f64, upper: f64) -> Result<f64, EvalError> {
        let step = self.step;
        let variables = integrand.variables();
        let Some(variable) = variables.first() else {
            debug!("integrating constant {integrand} over [{lower}, {upper}]");
            let value = integrand.compute(&())?;
            return self.sum(lower, upper, |_| Ok(value));
        };

        debug!(
            "integrating {integrand} d{variable} over [{lower}, {upper}], step {step}, ~{} samples",
            ((upper - lower) / step).max(0.0).ceil()
        );
        self.sum(lower, upper, |point| {
            integrand.compute(&(variable.as_str(), point))
        })
    }

    fn sum<F>(&self, lower: f64, upper: f64, mut sample: F) -> Result<f64, EvalError>
    where
        F: FnMut(f64) -> Result<f64, EvalError>,
    {
        let step = self.step;
        let mut total = 0.0;
        let mut point = lower;
        while point < upper - step {
            total += sample(point)? * step;
            let next = point + step;
            if next <= point {
                return Err(EvalError::StepLost { point, step });
            }
            point = next;
        }
        Ok(total)
    }
}
