//! Persistence gateway: load, save, list and delete on behalf of the signed-in user.
//!
//! The gateway only ever borrows or receives snapshots of a document; it
//! never holds one past the call. Saves are last-writer-wins: there is no
//! version check against what is currently stored.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::{
    NewResume, ResumeDocument, ResumeRecord, ResumeSummary, DEFAULT_TITLE,
};
use crate::models::user::CurrentUser;
use crate::store::ResumeStore;

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

/// A save of the whole document. No `id` creates a record; an `id` updates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveRequest {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub sections: ResumeDocument,
}

// ────────────────────────────────────────────────────────────────────────────
// In-flight save registry
// ────────────────────────────────────────────────────────────────────────────

/// Tracks record ids with a save currently running. A second save for the
/// same id is turned away until the first one's ticket is dropped.
#[derive(Clone, Default)]
pub struct SaveGuard {
    in_flight: Arc<Mutex<HashSet<Uuid>>>,
}

pub struct SaveTicket {
    id: Uuid,
    in_flight: Arc<Mutex<HashSet<Uuid>>>,
}

impl SaveGuard {
    pub fn try_acquire(&self, id: Uuid) -> Option<SaveTicket> {
        let mut set = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        set.insert(id).then(|| SaveTicket {
            id,
            in_flight: Arc::clone(&self.in_flight),
        })
    }
}

impl Drop for SaveTicket {
    fn drop(&mut self) {
        let mut set = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        set.remove(&self.id);
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Gateway
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct ResumeGateway {
    store: Arc<dyn ResumeStore>,
    saves: SaveGuard,
}

impl ResumeGateway {
    pub fn new(store: Arc<dyn ResumeStore>) -> Self {
        Self {
            store,
            saves: SaveGuard::default(),
        }
    }

    /// Loads a record owned by `user`. Sections come back normalized.
    pub async fn load(&self, id: Uuid, user: &CurrentUser) -> Result<ResumeRecord, AppError> {
        let mut record = self.owned(id, user).await?;
        record.sections = record.sections.normalized();
        Ok(record)
    }

    /// Creates or overwrites a record. On update only `title` and `sections`
    /// change; `id` and `owner_id` are fixed at creation.
    pub async fn save(
        &self,
        request: SaveRequest,
        user: &CurrentUser,
    ) -> Result<ResumeRecord, AppError> {
        let SaveRequest { id, title, sections } = request;
        let sections = sections.normalized();

        let Some(id) = id else {
            let record = self
                .store
                .create(NewResume {
                    owner_id: user.id,
                    title,
                    sections,
                })
                .await?;
            info!("Saved new resume {} for user {}", record.id, user.id);
            return Ok(record);
        };

        let _ticket = self
            .saves
            .try_acquire(id)
            .ok_or(AppError::SaveInProgress(id))?;

        self.owned(id, user).await?;
        let record = self
            .store
            .update(id, &title, &sections)
            .await?
            .ok_or_else(|| not_found(id))?;
        info!("Updated resume {id} for user {}", user.id);
        Ok(record)
    }

    pub async fn list(&self, user: &CurrentUser) -> Result<Vec<ResumeSummary>, AppError> {
        Ok(self.store.list_for_owner(user.id).await?)
    }

    pub async fn delete(&self, id: Uuid, user: &CurrentUser) -> Result<(), AppError> {
        self.owned(id, user).await?;
        if !self.store.delete(id).await? {
            return Err(not_found(id));
        }
        info!("Deleted resume {id} for user {}", user.id);
        Ok(())
    }

    #[cfg(test)]
    pub fn save_guard(&self) -> &SaveGuard {
        &self.saves
    }

    /// Fetches `id` and checks ownership. Foreign records read as missing so
    /// that ids of other users are not disclosed.
    async fn owned(&self, id: Uuid, user: &CurrentUser) -> Result<ResumeRecord, AppError> {
        let record = self.store.get(id).await?.ok_or_else(|| not_found(id))?;
        if record.owner_id != user.id {
            warn!("User {} requested resume {id} owned by someone else", user.id);
            return Err(not_found(id));
        }
        Ok(record)
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Resume {id} not found"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::ExperienceEntry;
    use crate::store::InMemoryResumeStore;

    fn user() -> CurrentUser {
        CurrentUser {
            id: Uuid::new_v4(),
            email: Some("ada@example.com".into()),
        }
    }

    fn sample_document() -> ResumeDocument {
        let mut doc = ResumeDocument::default();
        doc.personal_info.full_name = "Ada Lovelace".into();
        doc.experience = vec![ExperienceEntry {
            title: "Analyst".into(),
            company: "Engine Co".into(),
            duration: "1842".into(),
            description: "Wrote the first program".into(),
        }];
        doc.skills = vec!["Mathematics".into()];
        doc
    }

    fn gateway() -> (ResumeGateway, Arc<InMemoryResumeStore>) {
        let store = Arc::new(InMemoryResumeStore::new());
        (ResumeGateway::new(store.clone()), store)
    }

    #[tokio::test]
    async fn test_save_round_trip() {
        let (gateway, store) = gateway();
        let user = user();

        let created = gateway
            .save(
                SaveRequest {
                    id: None,
                    title: "CV".into(),
                    sections: sample_document(),
                },
                &user,
            )
            .await
            .unwrap();
        assert_eq!(created.owner_id, user.id);

        let loaded = gateway.load(created.id, &user).await.unwrap();
        assert_eq!(loaded.sections, sample_document());

        let mut changed = sample_document();
        changed.skills.push("Poetry".into());
        let updated = gateway
            .save(
                SaveRequest {
                    id: Some(created.id),
                    title: "CV v2".into(),
                    sections: changed.clone(),
                },
                &user,
            )
            .await
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.title, "CV v2");
        assert_eq!(updated.sections, changed);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_load_missing_is_not_found() {
        let (gateway, _) = gateway();
        let err = gateway.load(Uuid::new_v4(), &user()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_foreign_record_reads_as_missing() {
        let (gateway, _) = gateway();
        let owner = user();
        let record = gateway
            .save(
                SaveRequest {
                    id: None,
                    title: "Mine".into(),
                    sections: ResumeDocument::default(),
                },
                &owner,
            )
            .await
            .unwrap();

        let stranger = user();
        assert!(matches!(
            gateway.load(record.id, &stranger).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            gateway.delete(record.id, &stranger).await,
            Err(AppError::NotFound(_))
        ));
        assert!(gateway.load(record.id, &owner).await.is_ok());
    }

    #[tokio::test]
    async fn test_save_with_unknown_id_is_not_found() {
        let (gateway, store) = gateway();
        let err = gateway
            .save(
                SaveRequest {
                    id: Some(Uuid::new_v4()),
                    title: "x".into(),
                    sections: ResumeDocument::default(),
                },
                &user(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_store_failure_is_persistence_error() {
        let (gateway, store) = gateway();
        store.set_unavailable(true);
        let err = gateway
            .save(
                SaveRequest {
                    id: None,
                    title: "x".into(),
                    sections: sample_document(),
                },
                &user(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Persistence(_)));
    }

    #[tokio::test]
    async fn test_save_normalizes_sections() {
        let (gateway, _) = gateway();
        let mut doc = ResumeDocument::default();
        doc.education.clear();
        let record = gateway
            .save(
                SaveRequest {
                    id: None,
                    title: "x".into(),
                    sections: doc,
                },
                &user(),
            )
            .await
            .unwrap();
        assert_eq!(record.sections.education.len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_save_same_id_is_rejected() {
        let (gateway, _) = gateway();
        let user = user();
        let record = gateway
            .save(
                SaveRequest {
                    id: None,
                    title: "x".into(),
                    sections: ResumeDocument::default(),
                },
                &user,
            )
            .await
            .unwrap();

        let held = gateway.save_guard().try_acquire(record.id).unwrap();
        let err = gateway
            .save(
                SaveRequest {
                    id: Some(record.id),
                    title: "y".into(),
                    sections: ResumeDocument::default(),
                },
                &user,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::SaveInProgress(id) if id == record.id));

        drop(held);
        assert!(gateway
            .save(
                SaveRequest {
                    id: Some(record.id),
                    title: "y".into(),
                    sections: ResumeDocument::default(),
                },
                &user,
            )
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_list_and_delete() {
        let (gateway, _) = gateway();
        let user = user();
        for title in ["one", "two"] {
            gateway
                .save(
                    SaveRequest {
                        id: None,
                        title: title.into(),
                        sections: ResumeDocument::default(),
                    },
                    &user,
                )
                .await
                .unwrap();
        }
        let listed = gateway.list(&user).await.unwrap();
        assert_eq!(listed.len(), 2);

        gateway.delete(listed[0].id, &user).await.unwrap();
        assert_eq!(gateway.list(&user).await.unwrap().len(), 1);
        assert!(matches!(
            gateway.load(listed[0].id, &user).await,
            Err(AppError::NotFound(_))
        ));
    }
}
