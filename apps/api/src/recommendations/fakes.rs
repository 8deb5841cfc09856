//! In-memory stand-ins for the store and model seams.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::llm_client::{ChatModel, CompletionRequest, LlmError};
use crate::models::profile::Profile;
use crate::models::recommendation::Recommendation;
use crate::models::user::UserId;
use crate::recommendations::store::{ProfileStore, StoreError, CURRENT_SET_SIZE};

#[derive(Default)]
pub struct InMemoryStore {
    profiles: Mutex<Vec<(String, Profile)>>,
    /// Append order is creation order.
    entries: Mutex<Vec<(String, Recommendation)>>,
    persisted: Mutex<Vec<(String, Recommendation)>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    calls: Mutex<usize>,
}

impl InMemoryStore {
    pub fn insert_profile(&self, user_id: &str, profile: Profile) {
        self.profiles
            .lock()
            .unwrap()
            .push((user_id.to_string(), profile));
    }

    /// Seeds an entry as if an earlier run had stored it.
    pub fn push_existing(&self, user_id: &str, recommendation: Recommendation) {
        self.entries
            .lock()
            .unwrap()
            .push((user_id.to_string(), recommendation));
    }

    pub fn fail_reads(&self) {
        self.fail_reads.store(true, Ordering::SeqCst);
    }

    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    /// Entries written through `persist_recommendation`, in write order.
    pub fn persisted(&self) -> Vec<(String, Recommendation)> {
        self.persisted.lock().unwrap().clone()
    }

    /// Total number of store calls of any kind.
    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }

    fn record_call(&self) {
        *self.calls.lock().unwrap() += 1;
    }

    fn unavailable() -> StoreError {
        StoreError::Database(sqlx::Error::PoolTimedOut)
    }
}

#[async_trait]
impl ProfileStore for InMemoryStore {
    async fn fetch_profile(&self, user_id: &UserId) -> Result<Option<Profile>, StoreError> {
        self.record_call();
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        Ok(self
            .profiles
            .lock()
            .unwrap()
            .iter()
            .find(|(id, _)| id == user_id.as_str())
            .map(|(_, profile)| profile.clone()))
    }

    async fn fetch_cached_recommendations(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Recommendation>, StoreError> {
        self.record_call();
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        Ok(self
            .entries
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|(id, _)| id == user_id.as_str())
            .take(CURRENT_SET_SIZE as usize)
            .map(|(_, rec)| rec.clone())
            .collect())
    }

    async fn persist_recommendation(
        &self,
        user_id: &UserId,
        recommendation: &Recommendation,
    ) -> Result<(), StoreError> {
        self.record_call();
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        let entry = (user_id.as_str().to_string(), recommendation.clone());
        self.entries.lock().unwrap().push(entry.clone());
        self.persisted.lock().unwrap().push(entry);
        Ok(())
    }
}

enum Behavior {
    Reply(String),
    Stall(Duration),
    Fail(fn() -> LlmError),
}

/// A chat model that follows a fixed script and records what it was asked.
pub struct ScriptedModel {
    behavior: Behavior,
    requests: Mutex<Vec<CompletionRequest>>,
    tokens: Mutex<Vec<CancellationToken>>,
}

impl ScriptedModel {
    fn with(behavior: Behavior) -> Self {
        Self {
            behavior,
            requests: Mutex::new(Vec::new()),
            tokens: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(text: &str) -> Self {
        Self::with(Behavior::Reply(text.to_string()))
    }

    /// Replies only after `delay`, unless cancelled first.
    pub fn stalling(delay: Duration) -> Self {
        Self::with(Behavior::Stall(delay))
    }

    pub fn failing(error: fn() -> LlmError) -> Self {
        Self::with(Behavior::Fail(error))
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// True if any token handed to this model has been cancelled.
    pub fn saw_cancellation(&self) -> bool {
        self.tokens
            .lock()
            .unwrap()
            .iter()
            .any(CancellationToken::is_cancelled)
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn complete(
        &self,
        request: &CompletionRequest,
        cancel: CancellationToken,
    ) -> Result<String, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        self.tokens.lock().unwrap().push(cancel.clone());

        match &self.behavior {
            Behavior::Reply(text) => Ok(text.clone()),
            Behavior::Fail(error) => Err(error()),
            Behavior::Stall(delay) => {
                tokio::select! {
                    _ = cancel.cancelled() => Err(LlmError::Cancelled),
                    _ = tokio::time::sleep(*delay) => Ok("[]".to_string()),
                }
            }
        }
    }
}
