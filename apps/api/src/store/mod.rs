// Persistence: the record store seam plus the gateway the handlers talk to.
// Backends are swapped at startup via RESUME_STORE; handlers only see the gateway.

pub mod gateway;
pub mod handlers;
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::resume::{NewResume, ResumeDocument, ResumeRecord, ResumeSummary};

pub use gateway::{ResumeGateway, SaveRequest};
pub use memory::InMemoryResumeStore;
pub use postgres::PgResumeStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Record store collaborator. Records are keyed by id and scoped by owner.
///
/// Carried in `AppState` (through [`ResumeGateway`]) as `Arc<dyn ResumeStore>`.
#[async_trait]
pub trait ResumeStore: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<ResumeRecord>, StoreError>;

    /// Inserts a new record; the store assigns the id.
    async fn create(&self, new: NewResume) -> Result<ResumeRecord, StoreError>;

    /// Overwrites `title` and `sections` of an existing record. Returns `None`
    /// when no record has that id.
    async fn update(
        &self,
        id: Uuid,
        title: &str,
        sections: &ResumeDocument,
    ) -> Result<Option<ResumeRecord>, StoreError>;

    /// Newest first.
    async fn list_for_owner(&self, owner_id: Uuid) -> Result<Vec<ResumeSummary>, StoreError>;

    /// Returns whether a record was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
}
