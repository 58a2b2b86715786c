use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// Type alias for the owned binding map most callers build.
///
/// This represents a mapping that:
/// - Associates variable names with their real values
/// - Is supplied per call and never stored in an expression tree
pub type VariableMap = HashMap<String, f64>;

/// Read-only source of variable values used during evaluation.
///
/// The evaluator only ever asks for one name at a time, so anything that can
/// answer "what is the value of `name`?" can act as a binding: owned maps, a
/// single `(name, value)` pair, a slice of pairs, or `()` for no bindings at all.
///
/// # Examples
///
/// ```rust
/// use hyperexpr::types::{Bindings, VariableMap};
///
/// let mut vars = VariableMap::new();
/// vars.insert("x".to_string(), 2.0);
/// assert_eq!(vars.value_of("x"), Some(2.0));
///
/// assert_eq!(("t", 0.5_f64).value_of("t"), Some(0.5));
/// assert_eq!(().value_of("t"), None);
/// ```
pub trait Bindings {
    /// Returns the value bound to `name`, if any.
    fn value_of(&self, name: &str) -> Option<f64>;
}

impl<S: BuildHasher> Bindings for HashMap<String, f64, S> {
    fn value_of(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}

impl Bindings for BTreeMap<String, f64> {
    fn value_of(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}

/// A single binding, used by the quadrature operator for its integration variable.
impl Bindings for (&str, f64) {
    fn value_of(&self, name: &str) -> Option<f64> {
        (self.0 == name).then_some(self.1)
    }
}

/// Later entries shadow earlier ones.
impl Bindings for [(&str, f64)] {
    fn value_of(&self, name: &str) -> Option<f64> {
        self.iter().rev().find(|(n, _)| *n == name).map(|(_, v)| *v)
    }
}

impl Bindings for () {
    fn value_of(&self, _name: &str) -> Option<f64> {
        None
    }
}

impl<B: Bindings + ?Sized> Bindings for &B {
    fn value_of(&self, name: &str) -> Option<f64> {
        (**self).value_of(name)
    }
}
