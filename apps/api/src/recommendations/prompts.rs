//! Prompt Builder — projects a profile into the fixed instruction/context pair.
//!
//! Only the selected tags of each facet are sent. Free-text elaboration stays
//! out of the prompt to keep the payload and latency bounded.

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::models::profile::{Facet, Profile};

/// Fixed system-level directive for role generation.
pub const RECOMMENDATION_INSTRUCTION: &str = "You are a career advisor. \
    Based on the user's skills, values, and interests, produce exactly 3 role recommendations \
    as a JSON array of objects, each with the fields \
    {\"role_title\", \"description\", \"why_it_fits_professionally\", \"why_it_fits_personally\"}. \
    Be concise: one or two sentences per field.";

/// The two strings sent to the model: a system instruction and a user context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub instruction: String,
    pub context: String,
}

/// Builds the prompt for a profile. Missing facets render as empty lists so the
/// context always names all three facets.
pub fn build_prompt(profile: &Profile) -> Prompt {
    let context = format!(
        "Skills: {}\nValues: {}\nInterests: {}",
        join_tags(&profile.skills),
        join_tags(&profile.values),
        join_tags(&profile.interests),
    );

    Prompt {
        instruction: format!("{RECOMMENDATION_INSTRUCTION} {JSON_ONLY_SYSTEM}"),
        context,
    }
}

fn join_tags(facet: &Facet) -> String {
    facet
        .selected
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}
