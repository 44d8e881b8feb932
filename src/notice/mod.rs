pub mod notice_commands;
pub mod notice_dto;
pub mod notice_handlers;
pub mod notice_memory;
pub mod notice_models;
pub mod notice_queries;
pub mod notice_repository;

pub use notice_commands::{CreateNoticeHandler, DeleteNoticeHandler, UpdateNoticeHandler};
pub use notice_dto::{
    CreateNoticeRequest, CreateNoticeResponse, DeleteNoticeRequest, GetNoticeRequest,
    ListNoticesRequest, NoticeResponse, UpdateNoticeBody, UpdateNoticeRequest,
};
pub use notice_handlers::{create_notice, delete_notice, get_notice, list_notices, update_notice};
pub use notice_memory::InMemoryNoticeStore;
pub use notice_models::{NewNotice, Notice};
pub use notice_queries::{GetNoticeHandler, ListNoticesHandler};
pub use notice_repository::{
    NoticeRepository, NoticeStore, PersistenceError, PgNoticeStore, TrackingMode,
};

use std::sync::Arc;

use crate::error::Result;
use crate::pipeline::Dispatcher;

/// Builds the dispatcher for every notice operation, each handler sharing
/// `store`. Fails if any operation is left without a handler.
pub fn notice_dispatcher(store: Arc<dyn NoticeStore>) -> Result<Dispatcher> {
    let dispatcher = Dispatcher::new()
        .register::<GetNoticeRequest, _>(GetNoticeHandler::new(store.clone()))
        .register::<ListNoticesRequest, _>(ListNoticesHandler::new(store.clone()))
        .register::<CreateNoticeRequest, _>(CreateNoticeHandler::new(store.clone()))
        .register::<UpdateNoticeRequest, _>(UpdateNoticeHandler::new(store.clone()))
        .register::<DeleteNoticeRequest, _>(DeleteNoticeHandler::new(store));

    dispatcher.ensure_registered::<GetNoticeRequest>()?;
    dispatcher.ensure_registered::<ListNoticesRequest>()?;
    dispatcher.ensure_registered::<CreateNoticeRequest>()?;
    dispatcher.ensure_registered::<UpdateNoticeRequest>()?;
    dispatcher.ensure_registered::<DeleteNoticeRequest>()?;

    Ok(dispatcher)
}
