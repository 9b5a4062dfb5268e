//! A vectorized value model with R semantics: typed vectors carrying
//! NA sentinels and attributes, a coercion lattice, recycling
//! elementwise operators, a builtin library, and class-based method
//! dispatch over it.
//!
//! The entry point is [`Engine`], which evaluates builtin calls by
//! their R-level names:
//!
//! ```
//! use rvector_engine::{Engine, RVector, Value};
//!
//! let engine = Engine::new();
//! let out = engine
//!     .invoke("sum", vec![Value::Vector(RVector::integer(vec![1, 2, 3]))], vec![])
//!     .unwrap();
//! assert_eq!(out.value, Value::Vector(RVector::scalar_integer(6)));
//! ```

pub mod api;
pub mod builtins;
pub mod classes;
pub mod coerce;
pub mod dispatch;
pub mod error;
pub mod ops;
pub mod recycle;
pub mod scalar;
pub mod value;

pub use api::{Engine, Evaluated};
pub use builtins::{BuiltinId, CallArgs};
pub use dispatch::{MethodImpl, MethodRegistry};
pub use error::{Condition, Conditions, RError, RResult};
pub use scalar::{Complex, ScalarKind};
pub use value::{RVector, Value, VectorData};
