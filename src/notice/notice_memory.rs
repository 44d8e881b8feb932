use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use super::notice_models::{NewNotice, Notice};
use super::notice_repository::{
    NoticeRepository, NoticeStore, PersistenceError, PersistenceResult, StagedWrite, TrackingMode,
};

#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<i64, Notice>,
    // bumped on every committed update
    versions: BTreeMap<i64, u64>,
    last_id: i64,
}

/// Process-local store used by tests and `NOTICE_STORAGE=memory`.
///
/// Ids start at 1 and are never reused. The table lock is only held inside
/// synchronous sections, never across an await. A tracked lookup remembers
/// the row version it saw, and `commit` refuses to write over a row that
/// another unit of work changed in the meantime.
#[derive(Debug, Clone, Default)]
pub struct InMemoryNoticeStore {
    table: Arc<Mutex<Table>>,
}

impl InMemoryNoticeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored notices, active or not.
    pub fn len(&self) -> usize {
        self.table.lock().map(|table| table.rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl NoticeStore for InMemoryNoticeStore {
    fn begin(&self) -> Box<dyn NoticeRepository> {
        Box::new(InMemoryNoticeRepository {
            table: Arc::clone(&self.table),
            staged: Vec::new(),
            seen: HashMap::new(),
        })
    }
}

pub struct InMemoryNoticeRepository {
    table: Arc<Mutex<Table>>,
    staged: Vec<StagedWrite>,
    seen: HashMap<i64, u64>,
}

impl InMemoryNoticeRepository {
    fn lock(&self) -> PersistenceResult<MutexGuard<'_, Table>> {
        self.table
            .lock()
            .map_err(|e| PersistenceError::Storage(format!("notice table lock poisoned: {}", e)))
    }
}

#[async_trait]
impl NoticeRepository for InMemoryNoticeRepository {
    async fn find_by_id(&mut self, id: i64, mode: TrackingMode) -> PersistenceResult<Option<Notice>> {
        let (notice, version) = {
            let table = self.lock()?;
            (table.rows.get(&id).cloned(), table.versions.get(&id).copied())
        };
        if let (TrackingMode::Tracked, Some(version)) = (mode, version) {
            self.seen.insert(id, version);
        }
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
        let table = self.lock()?;
        Ok(table.rows.values().filter(|n| n.active).cloned().collect())
    }

    async fn commit(&mut self) -> PersistenceResult<Vec<Notice>> {
        let staged = std::mem::take(&mut self.staged);
        let seen = std::mem::take(&mut self.seen);
        let mut table = self.lock()?;

        // Check every update first so a failed commit leaves the table untouched.
        for write in &staged {
            if let StagedWrite::Update(notice) = write {
                let Some(current) = table.versions.get(&notice.id) else {
                    return Err(PersistenceError::Storage(format!(
                        "notice {} does not exist",
                        notice.id
                    )));
                };
                if seen.get(&notice.id).is_some_and(|version| version != current) {
                    return Err(PersistenceError::Conflict(notice.id));
                }
            }
        }

        let mut inserted = Vec::new();
        for write in staged {
            match write {
                StagedWrite::Insert(notice) => {
                    table.last_id += 1;
                    let notice = notice.with_id(table.last_id);
                    table.versions.insert(notice.id, 0);
                    table.rows.insert(notice.id, notice.clone());
                    inserted.push(notice);
                }
                StagedWrite::Update(notice) => {
                    if let Some(row) = table.rows.get_mut(&notice.id) {
                        // id and created_at are immutable once stored
                        row.active = notice.active;
                        row.title = notice.title;
                        row.message = notice.message;
                        row.updated_at = notice.updated_at;
                    }
                    if let Some(version) = table.versions.get_mut(&notice.id) {
                        *version += 1;
                    }
                }
            }
        }

        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn test_staged_writes_are_invisible_until_commit() {
        let store = InMemoryNoticeStore::new();
        let mut writer = store.begin();
        writer.add(NewNotice::new("Hello".into(), "World".into())).await.unwrap();

        let mut reader = store.begin();
        assert!(reader.list_active().await.unwrap().is_empty());
        assert!(store.is_empty());

        let inserted = writer.commit().await.unwrap();
        assert_eq!(inserted.len(), 1);
        assert_eq!(inserted[0].id, 1);
        assert_eq!(reader.list_active().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_dropped_unit_of_work_discards_staged_writes() {
        let store = InMemoryNoticeStore::new();
        {
            let mut repo = store.begin();
            repo.add(NewNotice::new("Gone".into(), "never saved".into())).await.unwrap();
        }
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_ids_are_sequential_and_both_modes_read_the_row() {
        let store = InMemoryNoticeStore::new();
        let mut repo = store.begin();
        repo.add(NewNotice::new("A".into(), "1".into())).await.unwrap();
        repo.add(NewNotice::new("B".into(), "2".into())).await.unwrap();
        let inserted = repo.commit().await.unwrap();
        assert_eq!(inserted.iter().map(|n| n.id).collect::<Vec<_>>(), vec![1, 2]);

        let mut repo = store.begin();
        let untracked = repo.find_by_id(2, TrackingMode::NoTracking).await.unwrap();
        let tracked = repo.find_by_id(2, TrackingMode::Tracked).await.unwrap();
        assert_eq!(untracked.as_ref().map(|n| n.title.as_str()), Some("B"));
        assert_eq!(untracked, tracked);
        assert!(repo.find_by_id(3, TrackingMode::NoTracking).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_keeps_immutable_columns() {
        let store = InMemoryNoticeStore::new();
        let mut repo = store.begin();
        repo.add(NewNotice::new("A".into(), "1".into())).await.unwrap();
        let original = repo.commit().await.unwrap().remove(0);

        let mut changed = original.clone();
        changed.active = false;
        changed.created_at = Utc::now() + chrono::Duration::days(1);
        changed.updated_at = Some(Utc::now());
        let mut repo = store.begin();
        repo.update(changed).await.unwrap();
        repo.commit().await.unwrap();

        let stored = repo.find_by_id(original.id, TrackingMode::NoTracking).await.unwrap().unwrap();
        assert!(!stored.active);
        assert_eq!(stored.created_at, original.created_at);
        assert!(stored.updated_at.is_some());
        assert!(repo.list_active().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_commit_of_unknown_notice_fails_without_side_effects() {
        let store = InMemoryNoticeStore::new();
        let mut repo = store.begin();
        repo.add(NewNotice::new("A".into(), "1".into())).await.unwrap();
        repo.update(NewNotice::new("ghost".into(), "x".into()).with_id(77)).await.unwrap();

        let result = repo.commit().await;
        assert!(matches!(result, Err(PersistenceError::Storage(_))));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_stale_tracked_update_cannot_undo_a_delete() {
        let store = InMemoryNoticeStore::new();
        let mut seed = store.begin();
        seed.add(NewNotice::new("Board".into(), "old".into())).await.unwrap();
        let id = seed.commit().await.unwrap()[0].id;

        let mut updater = store.begin();
        let mut stale = updater.find_by_id(id, TrackingMode::Tracked).await.unwrap().unwrap();

        let mut deleter = store.begin();
        let mut deleted = deleter.find_by_id(id, TrackingMode::Tracked).await.unwrap().unwrap();
        deleted.active = false;
        deleted.updated_at = Some(Utc::now());
        deleter.update(deleted).await.unwrap();
        deleter.commit().await.unwrap();

        stale.message = "new".into();
        stale.updated_at = Some(Utc::now());
        updater.update(stale).await.unwrap();
        let result = updater.commit().await;
        assert!(matches!(result, Err(PersistenceError::Conflict(conflict)) if conflict == id));

        let mut reader = store.begin();
        let stored = reader.find_by_id(id, TrackingMode::NoTracking).await.unwrap().unwrap();
        assert!(!stored.active);
        assert_eq!(stored.message, "old");
        assert!(reader.list_active().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_tracked_reread_after_commit_can_write_again() {
        let store = InMemoryNoticeStore::new();
        let mut seed = store.begin();
        seed.add(NewNotice::new("Board".into(), "v1".into())).await.unwrap();
        let id = seed.commit().await.unwrap()[0].id;

        let mut repo = store.begin();
        for message in ["v2", "v3"] {
            let mut notice = repo.find_by_id(id, TrackingMode::Tracked).await.unwrap().unwrap();
            notice.message = message.into();
            repo.update(notice).await.unwrap();
            repo.commit().await.unwrap();
        }

        let stored = repo.find_by_id(id, TrackingMode::NoTracking).await.unwrap().unwrap();
        assert_eq!(stored.message, "v3");
    }
}
