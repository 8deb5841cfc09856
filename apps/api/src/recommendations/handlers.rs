//! Axum route handler for the Recommendations API.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderName, HeaderValue},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::models::recommendation::Recommendation;
use crate::models::user::UserId;
use crate::state::AppState;

/// Response header naming where the recommendations came from.
pub const SOURCE_HEADER: &str = "x-recommendations-source";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub recommendations: Vec<Recommendation>,
}

/// POST /api/v1/recommendations
///
/// 400 when `userId` is absent or blank. Every other case is a 200 carrying
/// cached, generated, or fallback recommendations.
pub async fn handle_recommendations(
    State(state): State<AppState>,
    payload: Result<Json<RecommendationRequest>, JsonRejection>,
) -> Result<([(HeaderName, HeaderValue); 1], Json<RecommendationsResponse>), AppError> {
    let Json(request) =
        payload.map_err(|e| AppError::Validation(format!("invalid request body: {e}")))?;
    let user_id = UserId::parse(request.user_id)?;

    // Fire-and-forget: any background write is left to finish on its own.
    let outcome = state.pipeline.run(&user_id).await;
    info!(
        %user_id,
        source = %outcome.source,
        count = outcome.recommendations.len(),
        "recommendations served"
    );

    Ok((
        [(
            HeaderName::from_static(SOURCE_HEADER),
            HeaderValue::from_static(outcome.source.as_str()),
        )],
        Json(RecommendationsResponse {
            recommendations: outcome.recommendations,
        }),
    ))
}
