//! Pluggable schema validation.
//!
//! A schema is an opaque, caller-defined value of type `S`. Crumb never looks
//! inside it; it only hands the parsed body and the schema to a
//! [`SchemaValidator`] and acts on the boolean answer.

use std::sync::Arc;

use serde_json::Value;

/// Decides whether parsed body data conforms to a schema.
///
/// Any `Fn(&Value, &S) -> bool` closure is a validator.
///
/// # Example
///
/// ```rust
/// use crumb_core::SchemaValidator;
/// use serde_json::{json, Value};
///
/// // Every key in the schema must be present with a value of the same JSON type.
/// let same_types = |data: &Value, schema: &Value| {
///     schema.as_object().is_some_and(|fields| {
///         fields.iter().all(|(key, expected)| {
///             data.get(key).is_some_and(|v| std::mem::discriminant(v) == std::mem::discriminant(expected))
///         })
///     })
/// };
///
/// let schema = json!({"price": 100});
/// assert!(same_types.validate(&json!({"price": 7}), &schema));
/// assert!(!same_types.validate(&json!({"price": "7"}), &schema));
/// ```
pub trait SchemaValidator<S>: Send + Sync {
    /// Returns true if `data` matches `schema`.
    fn validate(&self, data: &Value, schema: &S) -> bool;
}

impl<S, F> SchemaValidator<S> for F
where
    F: Fn(&Value, &S) -> bool + Send + Sync,
{
    fn validate(&self, data: &Value, schema: &S) -> bool {
        self(data, schema)
    }
}

/// A shared, type-erased validator.
pub type SharedValidator<S = Value> = Arc<dyn SchemaValidator<S>>;

/// Wraps a validator for sharing across routes.
pub fn shared_validator<S, V>(validator: V) -> SharedValidator<S>
where
    V: SchemaValidator<S> + 'static,
{
    Arc::new(validator)
}
