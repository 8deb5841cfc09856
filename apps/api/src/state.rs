use crate::recommendations::pipeline::RecommendationPipeline;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Carries the store and model capabilities; cheap to clone per request.
    pub pipeline: RecommendationPipeline,
}
