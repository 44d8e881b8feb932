//! Notice board service: CRUD over notices through a validate → dispatch →
//! handle pipeline, exposed over HTTP with axum.

pub mod db;
pub mod error;
pub mod notice;
pub mod pipeline;
pub mod response;
pub mod routes;
pub mod state;

pub use error::{AppError, Result};
pub use notice::{notice_dispatcher, InMemoryNoticeStore, NoticeStore, PgNoticeStore};
pub use pipeline::{Cancellation, Dispatcher, Outcome};
pub use routes::create_router;
pub use state::{AppState, Config, StorageBackend};
