use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One suggested role. All four fields are always present; empty strings
/// stand in for anything the model left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub role_title: String,
    pub description: String,
    pub why_it_fits_professionally: String,
    pub why_it_fits_personally: String,
}

/// A persisted recommendation. Rows are append-only.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RecommendationRow {
    pub id: Uuid,
    pub user_id: String,
    pub role_title: String,
    pub description: String,
    pub why_it_fits_professionally: String,
    pub why_it_fits_personally: String,
    pub created_at: DateTime<Utc>,
}

impl From<RecommendationRow> for Recommendation {
    fn from(row: RecommendationRow) -> Self {
        Recommendation {
            role_title: row.role_title,
            description: row.description,
            why_it_fits_professionally: row.why_it_fits_professionally,
            why_it_fits_personally: row.why_it_fits_personally,
        }
    }
}
