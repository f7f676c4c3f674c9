use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::resume::{NewResume, ResumeDocument, ResumeRecord, ResumeSummary};
use crate::store::{ResumeStore, StoreError};

/// Process-local store for tests and `RESUME_STORE=memory`.
///
/// In tests, `set_unavailable(true)` makes every call fail, standing in for a
/// dropped connection.
#[derive(Default)]
pub struct InMemoryResumeStore {
    records: RwLock<HashMap<Uuid, ResumeRecord>>,
    unavailable: AtomicBool,
}

impl InMemoryResumeStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("in-memory store switched off".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl ResumeStore for InMemoryResumeStore {
    async fn get(&self, id: Uuid) -> Result<Option<ResumeRecord>, StoreError> {
        self.check_available()?;
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn create(&self, new: NewResume) -> Result<ResumeRecord, StoreError> {
        self.check_available()?;
        let now = Utc::now();
        let record = ResumeRecord {
            id: Uuid::new_v4(),
            owner_id: new.owner_id,
            title: new.title,
            sections: new.sections,
            created_at: now,
            updated_at: now,
        };
        self.records.write().await.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        id: Uuid,
        title: &str,
        sections: &ResumeDocument,
    ) -> Result<Option<ResumeRecord>, StoreError> {
        self.check_available()?;
        let mut records = self.records.write().await;
        Ok(records.get_mut(&id).map(|record| {
            record.title = title.to_string();
            record.sections = sections.clone();
            record.updated_at = Utc::now();
            record.clone()
        }))
    }

    async fn list_for_owner(&self, owner_id: Uuid) -> Result<Vec<ResumeSummary>, StoreError> {
        self.check_available()?;
        let records = self.records.read().await;
        let mut summaries: Vec<ResumeSummary> = records
            .values()
            .filter(|r| r.owner_id == owner_id)
            .map(ResumeSummary::from)
            .collect();
        summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(summaries)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        self.check_available()?;
        Ok(self.records.write().await.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_resume(owner_id: Uuid, title: &str) -> NewResume {
        NewResume {
            owner_id,
            title: title.into(),
            sections: ResumeDocument::default(),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_distinct_ids() {
        let store = InMemoryResumeStore::new();
        let owner = Uuid::new_v4();
        let a = store.create(new_resume(owner, "a")).await.unwrap();
        let b = store.create(new_resume(owner, "b")).await.unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_update_missing_returns_none() {
        let store = InMemoryResumeStore::new();
        let out = store
            .update(Uuid::new_v4(), "t", &ResumeDocument::default())
            .await
            .unwrap();
        assert!(out.is_none());
    }

    #[tokio::test]
    async fn test_list_is_scoped_to_owner() {
        let store = InMemoryResumeStore::new();
        let owner = Uuid::new_v4();
        store.create(new_resume(owner, "mine")).await.unwrap();
        store.create(new_resume(Uuid::new_v4(), "theirs")).await.unwrap();

        let listed = store.list_for_owner(owner).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "mine");
    }

    #[tokio::test]
    async fn test_unavailable_store_fails_every_call() {
        let store = InMemoryResumeStore::new();
        store.set_unavailable(true);
        assert!(matches!(
            store.get(Uuid::new_v4()).await,
            Err(StoreError::Unavailable(_))
        ));
        assert!(store.create(new_resume(Uuid::new_v4(), "x")).await.is_err());
    }
}
