use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use validator::Validate;

use super::{validate_request, Cancellation, Outcome, Validated};
use crate::error::{AppError, Result};

/// A typed operation the dispatcher can route.
pub trait Request: Validate + Send + 'static {
    type Response: Send + 'static;

    /// Operation name used in logs and configuration errors.
    const NAME: &'static str;

    /// Id of the entity the request targets, when it carries one.
    fn subject_id(&self) -> Option<i64> {
        None
    }
}

#[async_trait]
pub trait RequestHandler<R: Request>: Send + Sync {
    async fn handle(
        &self,
        request: Validated<R>,
        cancel: &Cancellation,
    ) -> Result<Outcome<R::Response>>;
}

/// Routes each request type to its single registered handler.
#[derive(Default)]
pub struct Dispatcher {
    handlers: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the handler for `R`, replacing any earlier registration.
    pub fn register<R, H>(mut self, handler: H) -> Self
    where
        R: Request,
        H: RequestHandler<R> + 'static,
    {
        let handler: Arc<dyn RequestHandler<R>> = Arc::new(handler);
        self.handlers.insert(TypeId::of::<R>(), Box::new(handler));
        self
    }

    pub fn ensure_registered<R: Request>(&self) -> Result<()> {
        self.handler::<R>().map(|_| ())
    }

    fn handler<R: Request>(&self) -> Result<&Arc<dyn RequestHandler<R>>> {
        self.handlers
            .get(&TypeId::of::<R>())
            .and_then(|handler| handler.downcast_ref::<Arc<dyn RequestHandler<R>>>())
            .ok_or(AppError::HandlerNotRegistered(R::NAME))
    }

    /// Validates `request` and hands it to its handler.
    ///
    /// Rule violations short-circuit into `BadRequest` before the handler runs.
    /// Persistence failures are logged here and become `InternalError`; a
    /// missing handler or a cancelled request is returned as an error.
    pub async fn dispatch<R: Request>(
        &self,
        request: R,
        cancel: &Cancellation,
    ) -> Result<Outcome<R::Response>> {
        let handler = self.handler::<R>()?;
        let subject_id = request.subject_id();

        let validated = match validate_request(request) {
            Ok(validated) => validated,
            Err(errors) => {
                tracing::debug!(
                    operation = R::NAME,
                    violations = errors.len(),
                    "request rejected by validation"
                );
                return Ok(Outcome::BadRequest(errors));
            }
        };

        let outcome = match handler.handle(validated, cancel).await {
            Err(AppError::Persistence(err)) => {
                tracing::error!(
                    operation = R::NAME,
                    notice_id = ?subject_id,
                    error = %err,
                    "persistence failure while handling request"
                );
                Outcome::InternalError
            }
            other => other?,
        };

        tracing::debug!(
            operation = R::NAME,
            success = outcome.is_success(),
            "request handled"
        );
        Ok(outcome)
    }
}
