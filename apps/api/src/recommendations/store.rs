//! Profile Store Adapter — the only module that touches durable storage.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::models::profile::Profile;
use crate::models::recommendation::{Recommendation, RecommendationRow};
use crate::models::user::UserId;

/// Number of entries that make up a user's current recommendation set.
pub const CURRENT_SET_SIZE: i64 = 3;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("discovery_data could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Storage seam for the recommendation pipeline.
///
/// Carried in the pipeline as `Arc<dyn ProfileStore>` so tests can swap in a fake.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// `Ok(None)` when the user has no profile or no discovery data yet.
    async fn fetch_profile(&self, user_id: &UserId) -> Result<Option<Profile>, StoreError>;

    /// Up to the three most recent entries, newest first. Empty when none exist.
    async fn fetch_cached_recommendations(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Recommendation>, StoreError>;

    /// Appends one entry. Existing entries are never updated.
    async fn persist_recommendation(
        &self,
        user_id: &UserId,
        recommendation: &Recommendation,
    ) -> Result<(), StoreError>;
}

/// Postgres-backed store over the `profiles` and `role_recommendations` tables.
#[derive(Clone)]
pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn fetch_profile(&self, user_id: &UserId) -> Result<Option<Profile>, StoreError> {
        let discovery_data: Option<Option<Value>> =
            sqlx::query_scalar("SELECT discovery_data FROM profiles WHERE user_id = $1")
                .bind(user_id.as_str())
                .fetch_optional(&self.pool)
                .await?;

        decode_discovery_data(discovery_data.flatten())
    }

    async fn fetch_cached_recommendations(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Recommendation>, StoreError> {
        let rows = sqlx::query_as::<_, RecommendationRow>(
            r#"
            SELECT id, user_id, role_title, description,
                   why_it_fits_professionally, why_it_fits_personally, created_at
            FROM role_recommendations
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(user_id.as_str())
        .bind(CURRENT_SET_SIZE)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Recommendation::from).collect())
    }

    async fn persist_recommendation(
        &self,
        user_id: &UserId,
        recommendation: &Recommendation,
    ) -> Result<(), StoreError> {
        // Append-only: INSERT a new row, never UPDATE
        sqlx::query(
            r#"
            INSERT INTO role_recommendations
                (id, user_id, role_title, description,
                 why_it_fits_professionally, why_it_fits_personally)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id.as_str())
        .bind(&recommendation.role_title)
        .bind(&recommendation.description)
        .bind(&recommendation.why_it_fits_professionally)
        .bind(&recommendation.why_it_fits_personally)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

/// A missing row and a JSON `null` column both mean "no discovery data".
fn decode_discovery_data(value: Option<Value>) -> Result<Option<Profile>, StoreError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
    }
}
