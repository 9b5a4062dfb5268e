//! The embedding surface: an [`Engine`] owns the method table and
//! evaluates builtin calls, returning the result value together with
//! the non-fatal conditions the call raised.

use crate::builtins::CallArgs;
use crate::dispatch::{self, MethodImpl, MethodRegistry};
use crate::error::{Conditions, RResult};
use crate::value::Value;

/// A completed call: the value plus every warning-level condition
/// accumulated while computing it.
#[derive(Debug)]
pub struct Evaluated {
    pub value: Value,
    pub conditions: Conditions,
}

/// The evaluation engine. Construction installs the bundled class
/// methods; callers may register further methods before invoking.
#[derive(Debug)]
pub struct Engine {
    registry: MethodRegistry,
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new()
    }
}

impl Engine {
    pub fn new() -> Self {
        Engine {
            registry: MethodRegistry::with_defaults(),
        }
    }

    /// Register a method for `builtin` specialized to `class`.
    pub fn register_method(&mut self, builtin: &str, class: &str, method: MethodImpl) {
        self.registry.register(builtin, class, method);
    }

    /// Evaluate one builtin call by name.
    pub fn invoke(
        &self,
        name: &str,
        positional: Vec<Value>,
        named: Vec<(String, Value)>,
    ) -> RResult<Evaluated> {
        self.invoke_args(name, &CallArgs::new(positional, named))
    }

    pub fn invoke_args(&self, name: &str, args: &CallArgs) -> RResult<Evaluated> {
        let mut conditions = Conditions::new();
        let value = dispatch::dispatch(&self.registry, name, args, &mut conditions)?;
        Ok(Evaluated { value, conditions })
    }
}
