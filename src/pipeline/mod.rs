//! Request pipeline shared by every operation: validation gate, dispatch to a
//! single handler, cancellation checkpoints and the result envelope handed
//! back to the transport.

pub mod cancellation;
pub mod dispatcher;
pub mod outcome;
pub mod validation;

pub use cancellation::{CancelOnDrop, Cancellation};
pub use dispatcher::{Dispatcher, Request, RequestHandler};
pub use outcome::Outcome;
pub use validation::{validate_request, FieldError, Validated};
