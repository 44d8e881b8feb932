use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use thiserror::Error;

use super::notice_models::{NewNotice, Notice};

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("commit did not return the inserted notice")]
    MissingInsert,

    #[error("notice {0} changed since it was read")]
    Conflict(i64),
}

pub type PersistenceResult<T> = std::result::Result<T, PersistenceError>;

/// How a lookup will be used. Both modes return the same notice; `Tracked`
/// lets the store prepare for a write-back in the same unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingMode {
    NoTracking,
    Tracked,
}

/// One unit of work over the notices table.
///
/// `add` and `update` only stage changes; nothing is visible to other units
/// of work until `commit` succeeds. Dropping a unit of work discards whatever
/// was staged.
#[async_trait]
pub trait NoticeRepository: Send {
    async fn find_by_id(&mut self, id: i64, mode: TrackingMode) -> PersistenceResult<Option<Notice>>;

    async fn add(&mut self, notice: NewNotice) -> PersistenceResult<()>;

    async fn update(&mut self, notice: Notice) -> PersistenceResult<()>;

    /// Active notices ordered by id.
    async fn list_active(&mut self) -> PersistenceResult<Vec<Notice>>;

    /// Persists staged writes atomically and returns the notices inserted by
    /// this commit, with their assigned ids, in staging order.
    async fn commit(&mut self) -> PersistenceResult<Vec<Notice>>;
}

/// Long-lived storage handle that opens a fresh unit of work per request.
pub trait NoticeStore: Send + Sync {
    fn begin(&self) -> Box<dyn NoticeRepository>;
}

#[derive(Debug, Clone)]
pub(crate) enum StagedWrite {
    Insert(NewNotice),
    Update(Notice),
}

const SELECT_BY_ID: &str = "SELECT id, active, title, message, created_at, updated_at
     FROM notices WHERE id = $1";

const SELECT_BY_ID_FOR_UPDATE: &str = "SELECT id, active, title, message, created_at, updated_at
     FROM notices WHERE id = $1 FOR UPDATE";

#[derive(Clone)]
pub struct PgNoticeStore {
    pool: PgPool,
}

impl PgNoticeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl NoticeStore for PgNoticeStore {
    fn begin(&self) -> Box<dyn NoticeRepository> {
        Box::new(PgNoticeRepository::new(self.pool.clone()))
    }
}

/// PostgreSQL unit of work. A transaction is opened lazily by the first
/// tracked lookup (which locks the row) or by `commit`.
pub struct PgNoticeRepository {
    pool: PgPool,
    tx: Option<Transaction<'static, Postgres>>,
    staged: Vec<StagedWrite>,
}

impl PgNoticeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            tx: None,
            staged: Vec::new(),
        }
    }

    async fn transaction(&mut self) -> PersistenceResult<&mut Transaction<'static, Postgres>> {
        let tx = match self.tx.take() {
            Some(tx) => tx,
            None => self.pool.begin().await?,
        };
        Ok(self.tx.insert(tx))
    }
}

#[async_trait]
impl NoticeRepository for PgNoticeRepository {
    async fn find_by_id(&mut self, id: i64, mode: TrackingMode) -> PersistenceResult<Option<Notice>> {
        let notice = match mode {
            TrackingMode::NoTracking => {
                sqlx::query_as::<_, Notice>(SELECT_BY_ID)
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await?
            }
            TrackingMode::Tracked => {
                let tx = self.transaction().await?;
                sqlx::query_as::<_, Notice>(SELECT_BY_ID_FOR_UPDATE)
                    .bind(id)
                    .fetch_optional(&mut **tx)
                    .await?
            }
        };

        Ok(notice)
    }

    async fn add(&mut self, notice: NewNotice) -> PersistenceResult<()> {
        self.staged.push(StagedWrite::Insert(notice));
        Ok(())
    }

    async fn update(&mut self, notice: Notice) -> PersistenceResult<()> {
        self.staged.push(StagedWrite::Update(notice));
        Ok(())
    }

    async fn list_active(&mut self) -> PersistenceResult<Vec<Notice>> {
        let notices = sqlx::query_as::<_, Notice>(
            "SELECT id, active, title, message, created_at, updated_at
             FROM notices WHERE active = true ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(notices)
    }

    async fn commit(&mut self) -> PersistenceResult<Vec<Notice>> {
        let mut tx = match self.tx.take() {
            Some(tx) => tx,
            None => self.pool.begin().await?,
        };

        let mut inserted = Vec::new();
        for write in std::mem::take(&mut self.staged) {
            match write {
                StagedWrite::Insert(notice) => {
                    let row = sqlx::query_as::<_, Notice>(
                        "INSERT INTO notices (active, title, message, created_at, updated_at)
                         VALUES ($1, $2, $3, $4, $5)
                         RETURNING id, active, title, message, created_at, updated_at",
                    )
                    .bind(notice.active)
                    .bind(&notice.title)
                    .bind(&notice.message)
                    .bind(notice.created_at)
                    .bind(notice.updated_at)
                    .fetch_one(&mut *tx)
                    .await?;
                    inserted.push(row);
                }
                StagedWrite::Update(notice) => {
                    sqlx::query(
                        "UPDATE notices
                         SET active = $2, title = $3, message = $4, updated_at = $5
                         WHERE id = $1",
                    )
                    .bind(notice.id)
                    .bind(notice.active)
                    .bind(&notice.title)
                    .bind(&notice.message)
                    .bind(notice.updated_at)
                    .execute(&mut *tx)
                    .await?;
                }
            }
        }

        tx.commit().await?;
        Ok(inserted)
    }
}
