//! The body handler.
//!
//! [`handle_body`] turns the raw request body into a [`serde_json::Value`]
//! according to the negotiated [`ContentType`], then runs the optional schema
//! validator. Every failure is a classified [`CrumbError`]:
//!
//! | Situation | Status |
//! |---|---|
//! | Content type other than JSON or text | 415, body never read |
//! | Malformed or empty JSON | 400 with the parser's message |
//! | Text that is not UTF-8 | 400 |
//! | Validator returned false | 400 `Request does not match schema` |

use crumb_core::{CrumbError, HostRequest, SchemaValidator};
use serde_json::Value;

use crate::ContentType;

/// Parses and optionally validates a request body.
///
/// Validation runs only when both `schema` and `validator` are present; a
/// schema without a validator is inert. A text body reaches the validator as
/// a JSON string.
///
/// # Example
///
/// ```rust
/// use crumb_core::HostRequest;
/// use crumb_extract::{handle_body, ContentType};
/// use serde_json::{json, Value};
///
/// # tokio_test::block_on(async {
/// let request = HostRequest::builder().body(r#"{"price":100}"#).build();
/// let schema = json!({"price": 100});
/// let validator = |data: &Value, schema: &Value| data["price"].is_number() == schema["price"].is_number();
///
/// let body = handle_body(&request, &ContentType::Json, Some(&schema), Some(&validator))
///     .await
///     .unwrap();
/// assert_eq!(body, json!({"price": 100}));
/// # });
/// ```
pub async fn handle_body<S>(
    request: &HostRequest,
    content_type: &ContentType,
    schema: Option<&S>,
    validator: Option<&dyn SchemaValidator<S>>,
) -> Result<Value, CrumbError> {
    let data = match content_type {
        ContentType::Json => request.json().await?,
        ContentType::Text => Value::String(request.text().await?),
        ContentType::Unsupported(raw) => {
            return Err(CrumbError::unsupported_media_type(raw.clone()));
        }
    };

    if let (Some(schema), Some(validator)) = (schema, validator) {
        if !validator.validate(&data, schema) {
            return Err(CrumbError::schema_mismatch());
        }
    }

    Ok(data)
}
