use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Persisted notice. `id` is assigned by the store and never changes.
#[derive(Debug, Clone, FromRow)]
pub struct Notice {
    pub id: i64,
    pub active: bool,
    pub title: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl PartialEq for Notice {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Notice {}

impl std::hash::Hash for Notice {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// A notice that has not been persisted yet and therefore has no id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotice {
    pub active: bool,
    pub title: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl NewNotice {
    pub fn new(title: String, message: String) -> Self {
        Self {
            active: true,
            title,
            message,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    pub fn with_id(self, id: i64) -> Notice {
        Notice {
            id,
            active: self.active,
            title: self.title,
            message: self.message,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
