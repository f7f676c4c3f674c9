use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::resume::{NewResume, ResumeDocument, ResumeRecord, ResumeRow, ResumeSummary};
use crate::store::{ResumeStore, StoreError};

/// PostgreSQL-backed store. `sections` lives in a JSONB column and is always
/// written whole.
#[derive(Clone)]
pub struct PgResumeStore {
    pool: PgPool,
}

impl PgResumeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResumeStore for PgResumeStore {
    async fn get(&self, id: Uuid) -> Result<Option<ResumeRecord>, StoreError> {
        let row = sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(ResumeRecord::from))
    }

    async fn create(&self, new: NewResume) -> Result<ResumeRecord, StoreError> {
        let id = Uuid::new_v4();
        let row = sqlx::query_as::<_, ResumeRow>(
            r#"
            INSERT INTO resumes (id, owner_id, title, sections)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(new.owner_id)
        .bind(&new.title)
        .bind(Json(&new.sections))
        .fetch_one(&self.pool)
        .await?;

        info!("Created resume {id} for owner {}", new.owner_id);
        Ok(row.into())
    }

    async fn update(
        &self,
        id: Uuid,
        title: &str,
        sections: &ResumeDocument,
    ) -> Result<Option<ResumeRecord>, StoreError> {
        // Last writer wins: no version column is consulted.
        let row = sqlx::query_as::<_, ResumeRow>(
            r#"
            UPDATE resumes
            SET title = $2, sections = $3, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(Json(sections))
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(ResumeRecord::from))
    }

    async fn list_for_owner(&self, owner_id: Uuid) -> Result<Vec<ResumeSummary>, StoreError> {
        Ok(sqlx::query_as::<_, ResumeSummary>(
            "SELECT id, title, updated_at FROM resumes WHERE owner_id = $1 ORDER BY updated_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM resumes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
