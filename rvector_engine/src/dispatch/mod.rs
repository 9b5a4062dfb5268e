//! Class-based method dispatch.
//!
//! A generic call resolves against the class tags of its dispatch
//! argument, in tag order, before falling back to the default
//! implementation. Methods are keyed by `(builtin name, class tag)`,
//! mirroring the `<generic>.<class>` naming scheme.

use std::collections::HashMap;

use crate::builtins::{self, CallArgs};
use crate::error::{Conditions, RError, RResult};
use crate::value::Value;

/// One method body. Methods receive the untouched call arguments and
/// usually delegate to the default path after unwrapping the receiver.
pub type MethodImpl = fn(&CallArgs, &mut Conditions) -> RResult<Value>;

/// The method table: `(builtin, class tag)` → implementation.
#[derive(Debug, Default)]
pub struct MethodRegistry {
    methods: HashMap<(String, String), MethodImpl>,
}

impl MethodRegistry {
    pub fn new() -> Self {
        MethodRegistry::default()
    }

    /// A registry preloaded with the built-in class methods (factor,
    /// Date, ts).
    pub fn with_defaults() -> Self {
        let mut registry = MethodRegistry::new();
        crate::classes::register_default_methods(&mut registry);
        registry
    }

    pub fn register(&mut self, builtin: &str, class: &str, method: MethodImpl) {
        self.methods
            .insert((builtin.to_string(), class.to_string()), method);
    }

    pub fn lookup(&self, builtin: &str, class: &str) -> Option<MethodImpl> {
        self.methods
            .get(&(builtin.to_string(), class.to_string()))
            .copied()
    }
}

/// The class tags a call dispatches on. Operators consider both
/// operands (first argument first), everything else only the first.
fn dispatch_tags(name: &str, args: &CallArgs) -> Vec<String> {
    let operator = !name.chars().next().is_some_and(char::is_alphanumeric);
    let mut tags = Vec::new();
    let arity = if operator { 2 } else { 1 };
    for value in args.positional.iter().take(arity) {
        if let Value::Vector(v) = value {
            for tag in v.class_tags() {
                if !tags.contains(&tag) {
                    tags.push(tag);
                }
            }
        }
    }
    tags
}

/// Resolve and run one builtin call: class methods in tag order, then
/// the default implementation.
pub fn dispatch(
    registry: &MethodRegistry,
    name: &str,
    args: &CallArgs,
    conds: &mut Conditions,
) -> RResult<Value> {
    let Some(id) = builtins::lookup(name) else {
        return Err(RError::UnknownBuiltin(name.to_string()));
    };
    for tag in dispatch_tags(name, args) {
        if let Some(method) = registry.lookup(name, &tag) {
            return method(args, conds);
        }
    }
    builtins::call_default(id, args, conds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::RVector;

    fn tagged(tags: Vec<&str>) -> Value {
        let mut v = RVector::integer(vec![1]);
        v.set_attr("class", Some(RVector::strings(tags))).unwrap();
        Value::Vector(v)
    }

    fn stub(_args: &CallArgs, _conds: &mut Conditions) -> RResult<Value> {
        Ok(Value::Vector(RVector::scalar_string("method")))
    }

    #[test]
    fn test_dispatch_prefers_earlier_tag() {
        let mut registry = MethodRegistry::new();
        registry.register("unique", "factor", stub);
        let mut conds = Conditions::new();
        // c("ordered", "factor") still reaches the factor method.
        let args = CallArgs::positional(vec![tagged(vec!["ordered", "factor"])]);
        let out = dispatch(&registry, "unique", &args, &mut conds).unwrap();
        assert_eq!(out, Value::Vector(RVector::scalar_string("method")));
    }

    #[test]
    fn test_dispatch_falls_back_to_default() {
        let registry = MethodRegistry::new();
        let mut conds = Conditions::new();
        let args = CallArgs::positional(vec![tagged(vec!["mystery"])]);
        // No method registered for "mystery": default length applies.
        let out = dispatch(&registry, "length", &args, &mut conds).unwrap();
        assert_eq!(out, Value::Vector(RVector::scalar_integer(1)));
    }

    #[test]
    fn test_unknown_builtin() {
        let registry = MethodRegistry::new();
        let mut conds = Conditions::new();
        let args = CallArgs::positional(vec![]);
        let err = dispatch(&registry, "frobnicate", &args, &mut conds).unwrap_err();
        assert!(matches!(err, RError::UnknownBuiltin(_)));
    }

    #[test]
    fn test_operator_dispatches_on_second_operand() {
        let mut registry = MethodRegistry::new();
        registry.register("+", "Date", stub);
        let mut conds = Conditions::new();
        let args = CallArgs::positional(vec![
            Value::Vector(RVector::scalar_integer(5)),
            tagged(vec!["Date"]),
        ]);
        let out = dispatch(&registry, "+", &args, &mut conds).unwrap();
        assert_eq!(out, Value::Vector(RVector::scalar_string("method")));
    }
}
