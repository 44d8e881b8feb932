use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

use super::notice_dto::{CreateNoticeRequest, CreateNoticeResponse, DeleteNoticeRequest, UpdateNoticeRequest};
use super::notice_models::NewNotice;
use super::notice_repository::{NoticeStore, PersistenceError, TrackingMode};
use crate::error::Result;
use crate::pipeline::{Cancellation, Outcome, RequestHandler, Validated};

#[derive(Clone)]
pub struct CreateNoticeHandler {
    store: Arc<dyn NoticeStore>,
}

impl CreateNoticeHandler {
    pub fn new(store: Arc<dyn NoticeStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RequestHandler<CreateNoticeRequest> for CreateNoticeHandler {
    async fn handle(
        &self,
        request: Validated<CreateNoticeRequest>,
        cancel: &Cancellation,
    ) -> Result<Outcome<CreateNoticeResponse>> {
        let request = request.into_inner();
        let mut repo = self.store.begin();

        cancel.checkpoint()?;
        repo.add(NewNotice::new(request.title, request.message)).await?;

        cancel.checkpoint()?;
        let notice = repo
            .commit()
            .await?
            .into_iter()
            .next()
            .ok_or(PersistenceError::MissingInsert)?;

        info!(notice_id = notice.id, "notice created");
        Ok(Outcome::Created(CreateNoticeResponse::from_notice(&notice)))
    }
}

/// Replaces the message of an existing notice. The title is never touched.
#[derive(Clone)]
pub struct UpdateNoticeHandler {
    store: Arc<dyn NoticeStore>,
}

impl UpdateNoticeHandler {
    pub fn new(store: Arc<dyn NoticeStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RequestHandler<UpdateNoticeRequest> for UpdateNoticeHandler {
    async fn handle(
        &self,
        request: Validated<UpdateNoticeRequest>,
        cancel: &Cancellation,
    ) -> Result<Outcome<()>> {
        let request = request.into_inner();
        let mut repo = self.store.begin();

        cancel.checkpoint()?;
        let Some(mut notice) = repo.find_by_id(request.id, TrackingMode::Tracked).await? else {
            return Ok(Outcome::NotFound);
        };

        notice.message = request.message;
        notice.updated_at = Some(Utc::now());

        cancel.checkpoint()?;
        repo.update(notice).await?;
        cancel.checkpoint()?;
        repo.commit().await?;

        info!(notice_id = request.id, "notice updated");
        Ok(Outcome::NoContent)
    }
}

/// Soft delete: the notice is marked inactive and stays addressable by id.
/// Deleting an inactive notice again succeeds.
#[derive(Clone)]
pub struct DeleteNoticeHandler {
    store: Arc<dyn NoticeStore>,
}

impl DeleteNoticeHandler {
    pub fn new(store: Arc<dyn NoticeStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RequestHandler<DeleteNoticeRequest> for DeleteNoticeHandler {
    async fn handle(
        &self,
        request: Validated<DeleteNoticeRequest>,
        cancel: &Cancellation,
    ) -> Result<Outcome<()>> {
        let mut repo = self.store.begin();

        cancel.checkpoint()?;
        let Some(mut notice) = repo.find_by_id(request.id, TrackingMode::Tracked).await? else {
            return Ok(Outcome::NotFound);
        };

        notice.active = false;
        notice.updated_at = Some(Utc::now());

        cancel.checkpoint()?;
        repo.update(notice).await?;
        cancel.checkpoint()?;
        repo.commit().await?;

        info!(notice_id = request.id, "notice deactivated");
        Ok(Outcome::NoContent)
    }
}
