// Career role recommendations.
// Flow: profile lookup → cache check → prompt → bounded model call →
// normalization → background persistence. Every failure below request
// validation degrades to the fallback set.

pub mod fallback;
pub mod handlers;
pub mod invoker;
pub mod normalizer;
pub mod pipeline;
pub mod prompts;
pub mod store;

#[cfg(test)]
pub(crate) mod fakes;
