//! The bundled vector classes (factor, Date, ts) and their method
//! registrations.

use crate::dispatch::MethodRegistry;

pub mod date;
pub mod factor;
pub mod ts;

/// Install the methods for the bundled classes into a registry.
pub fn register_default_methods(registry: &mut MethodRegistry) {
    registry.register("==", "factor", factor::compare_eq);
    registry.register("!=", "factor", factor::compare_ne);
    registry.register("<", "factor", factor::compare_lt);
    registry.register("<=", "factor", factor::compare_le);
    registry.register(">", "factor", factor::compare_gt);
    registry.register(">=", "factor", factor::compare_ge);
    registry.register("unique", "factor", factor::unique);
    registry.register("sort", "factor", factor::sort);
    registry.register("as.character", "factor", factor::as_character);

    registry.register("+", "Date", date::add);
    registry.register("-", "Date", date::sub);
    registry.register("as.character", "Date", date::as_character);

    registry.register("+", "ts", ts::add);
    registry.register("-", "ts", ts::sub);
    registry.register("*", "ts", ts::mul);
    registry.register("/", "ts", ts::div);
}
