//! Default recommendations served whenever generation cannot complete.
//!
//! Identical for every user and every failure type.

use crate::models::recommendation::Recommendation;

const DEFAULTS: [(&str, &str, &str, &str); 3] = [
    (
        "Project Coordinator",
        "Keeps projects on track by organizing timelines, resources, and communication across a team.",
        "Draws on planning, organization, and communication skills that transfer across industries.",
        "Suits people who enjoy bringing order to complex work and seeing a team succeed together.",
    ),
    (
        "Data Analyst",
        "Collects and interprets data to help organizations make better decisions.",
        "Builds on problem-solving and attention to detail, with strong demand in almost every sector.",
        "A good match if you are curious and like finding clear answers in messy information.",
    ),
    (
        "Customer Success Specialist",
        "Helps customers get the most out of a product or service and turns their feedback into improvements.",
        "Combines communication, empathy, and product knowledge into a role with clear growth paths.",
        "Rewarding for people who value helping others and building lasting relationships.",
    ),
];

/// Returns the fixed fallback set of three recommendations.
pub fn default_recommendations() -> Vec<Recommendation> {
    DEFAULTS
        .iter()
        .map(
            |&(role_title, description, professionally, personally)| Recommendation {
                role_title: role_title.to_string(),
                description: description.to_string(),
                why_it_fits_professionally: professionally.to_string(),
                why_it_fits_personally: personally.to_string(),
            },
        )
        .collect()
}
