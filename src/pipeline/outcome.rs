use super::validation::FieldError;

/// Tagged result of a handled request.
///
/// Each variant corresponds to exactly one transport status; the mapping lives
/// in the transport layer (see `crate::response`), never here.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Ok(T),
    Created(T),
    NoContent,
    NotFound,
    BadRequest(Vec<FieldError>),
    InternalError,
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Ok(_) | Outcome::Created(_) | Outcome::NoContent)
    }
}
