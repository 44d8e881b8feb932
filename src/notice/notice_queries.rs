use std::sync::Arc;

use async_trait::async_trait;

use super::notice_dto::{GetNoticeRequest, ListNoticesRequest, NoticeResponse};
use super::notice_repository::{NoticeStore, TrackingMode};
use crate::error::Result;
use crate::pipeline::{Cancellation, Outcome, RequestHandler, Validated};

#[derive(Clone)]
pub struct GetNoticeHandler {
    store: Arc<dyn NoticeStore>,
}

impl GetNoticeHandler {
    pub fn new(store: Arc<dyn NoticeStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RequestHandler<GetNoticeRequest> for GetNoticeHandler {
    async fn handle(
        &self,
        request: Validated<GetNoticeRequest>,
        cancel: &Cancellation,
    ) -> Result<Outcome<NoticeResponse>> {
        let mut repo = self.store.begin();

        cancel.checkpoint()?;
        let outcome = match repo.find_by_id(request.id, TrackingMode::NoTracking).await? {
            Some(notice) => Outcome::Ok(NoticeResponse::from_notice(&notice)),
            None => Outcome::NotFound,
        };

        Ok(outcome)
    }
}

/// Lists active notices. An empty board is `NoContent`, not an empty `Ok`.
#[derive(Clone)]
pub struct ListNoticesHandler {
    store: Arc<dyn NoticeStore>,
}

impl ListNoticesHandler {
    pub fn new(store: Arc<dyn NoticeStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RequestHandler<ListNoticesRequest> for ListNoticesHandler {
    async fn handle(
        &self,
        _request: Validated<ListNoticesRequest>,
        cancel: &Cancellation,
    ) -> Result<Outcome<Vec<NoticeResponse>>> {
        let mut repo = self.store.begin();

        cancel.checkpoint()?;
        let notices = repo.list_active().await?;
        if notices.is_empty() {
            return Ok(Outcome::NoContent);
        }

        Ok(Outcome::Ok(notices.iter().map(NoticeResponse::from_notice).collect()))
    }
}
