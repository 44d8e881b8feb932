use std::borrow::Cow;
use std::ops::Deref;

use serde::Serialize;
use utoipa::ToSchema;
use validator::{Validate, ValidationError, ValidationErrors};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A request that passed its validation rules. Only [`validate_request`] can
/// build one, so a handler taking `Validated<R>` cannot see an invalid request.
#[derive(Debug)]
pub struct Validated<R>(R);

impl<R> Validated<R> {
    pub fn into_inner(self) -> R {
        self.0
    }
}

impl<R> Deref for Validated<R> {
    type Target = R;

    fn deref(&self) -> &R {
        &self.0
    }
}

/// Runs every rule declared on the request and collects all violations.
pub fn validate_request<R: Validate>(request: R) -> Result<Validated<R>, Vec<FieldError>> {
    match request.validate() {
        Ok(()) => Ok(Validated(request)),
        Err(errors) => Err(field_errors(&errors)),
    }
}

/// Flattens `validator`'s error map into a list ordered by field name.
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| err.code.to_string());
                FieldError::new(field.to_string(), message)
            })
        })
        .collect()
}

/// Builds a `ValidationError` for custom rule functions.
pub fn rule_violation(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}
