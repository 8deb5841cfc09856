//! Pipeline Orchestrator — sequences lookup, cache, generation and persistence.
//!
//! States: Start → ProfileLookup → {CacheCheck | UseFallback} →
//!         {ReturnCached | Generate} → Persist → Respond
//!
//! `run` is infallible: every path ends in cached, generated, or fallback
//! recommendations. Each degraded path is logged with the user id and reason.

use std::fmt;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::llm_client::ChatModel;
use crate::models::recommendation::Recommendation;
use crate::models::user::UserId;
use crate::recommendations::fallback::default_recommendations;
use crate::recommendations::invoker::{invoke, InvocationParams};
use crate::recommendations::normalizer::normalize;
use crate::recommendations::prompts::build_prompt;
use crate::recommendations::store::ProfileStore;

/// Where a response's recommendations came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Cache,
    Generated,
    Fallback,
}

impl Source {
    pub fn as_str(self) -> &'static str {
        match self {
            Source::Cache => "cache",
            Source::Generated => "generated",
            Source::Fallback => "fallback",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one pipeline run.
#[derive(Debug)]
pub struct PipelineOutcome {
    pub recommendations: Vec<Recommendation>,
    pub source: Source,
    /// Background write of freshly generated entries. Resolves to the number
    /// of entries stored. The HTTP path never awaits it.
    pub persistence: Option<JoinHandle<usize>>,
}

impl PipelineOutcome {
    fn fallback() -> Self {
        Self {
            recommendations: default_recommendations(),
            source: Source::Fallback,
            persistence: None,
        }
    }
}

/// The recommendation pipeline with its injected capabilities.
#[derive(Clone)]
pub struct RecommendationPipeline {
    store: Arc<dyn ProfileStore>,
    model: Arc<dyn ChatModel>,
    params: InvocationParams,
}

impl RecommendationPipeline {
    pub fn new(
        store: Arc<dyn ProfileStore>,
        model: Arc<dyn ChatModel>,
        params: InvocationParams,
    ) -> Self {
        Self {
            store,
            model,
            params,
        }
    }

    /// Produces recommendations for a user. Never fails.
    pub async fn run(&self, user_id: &UserId) -> PipelineOutcome {
        // ProfileLookup
        let profile = match self.store.fetch_profile(user_id).await {
            Ok(Some(profile)) => profile,
            Ok(None) => {
                warn!(%user_id, reason = "no_discovery_data", "serving fallback recommendations");
                return PipelineOutcome::fallback();
            }
            Err(e) => {
                warn!(%user_id, reason = "profile_lookup_failed", error = %e, "serving fallback recommendations");
                return PipelineOutcome::fallback();
            }
        };

        // CacheCheck. A failed read is treated as a miss.
        match self.store.fetch_cached_recommendations(user_id).await {
            Ok(cached) if !cached.is_empty() => {
                info!(%user_id, count = cached.len(), "returning cached recommendations");
                return PipelineOutcome {
                    recommendations: cached,
                    source: Source::Cache,
                    persistence: None,
                };
            }
            Ok(_) => {}
            Err(e) => {
                warn!(%user_id, error = %e, "cache lookup failed; generating fresh recommendations");
            }
        }

        // Generate
        let prompt = build_prompt(&profile);
        let reply = match invoke(self.model.as_ref(), &prompt, &self.params).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(%user_id, reason = "model_invocation_failed", error = %e, "serving fallback recommendations");
                return PipelineOutcome::fallback();
            }
        };

        let recommendations = match normalize(&reply) {
            Ok(recommendations) => recommendations,
            Err(e) => {
                warn!(
                    %user_id,
                    reason = "parse_failure",
                    error = %e,
                    reply_chars = reply.chars().count(),
                    "serving fallback recommendations"
                );
                return PipelineOutcome::fallback();
            }
        };

        info!(%user_id, count = recommendations.len(), "generated recommendations");

        // Persist, without holding up the response
        let persistence = self.spawn_persist(user_id.clone(), recommendations.clone());

        PipelineOutcome {
            recommendations,
            source: Source::Generated,
            persistence: Some(persistence),
        }
    }

    fn spawn_persist(
        &self,
        user_id: UserId,
        recommendations: Vec<Recommendation>,
    ) -> JoinHandle<usize> {
        let store = Arc::clone(&self.store);
        tokio::spawn(async move {
            let mut stored = 0;
            // Newest-first cache reads must return the generated order.
            for recommendation in recommendations.iter().rev() {
                match store.persist_recommendation(&user_id, recommendation).await {
                    Ok(()) => stored += 1,
                    Err(e) => error!(
                        %user_id,
                        role_title = %recommendation.role_title,
                        error = %e,
                        "failed to persist recommendation"
                    ),
                }
            }
            stored
        })
    }
}
