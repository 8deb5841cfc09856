//! Response Normalizer — coerces free-form model text into recommendations.
//!
//! Steps, each skipped when it does not apply:
//! 1. trim whitespace
//! 2. strip a leading code fence (with or without a language tag) and its closing fence
//! 3. narrow to the first `[ { ... } ]` span, dropping surrounding prose
//! 4. strict JSON parse
//! 5. wrap a lone object in a one-element list
//!
//! The normalizer is total: every input yields recommendations or a
//! `ParseFailure`. It never retries and never repairs JSON beyond the steps above.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::recommendation::Recommendation;

const FENCE: &str = "```";

#[derive(Debug, Error)]
pub enum ParseFailure {
    #[error("reply contained no JSON")]
    NoJson,

    #[error("reply was not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("reply parsed to {0}, expected an object or array")]
    UnexpectedShape(&'static str),

    #[error("reply held no recommendation objects")]
    Empty,
}

/// Normalizes a raw model reply.
///
/// Missing or `null` fields become empty strings and non-string scalars are
/// rendered as text. Array elements that are not objects are dropped.
pub fn normalize(raw: &str) -> Result<Vec<Recommendation>, ParseFailure> {
    let text = raw.trim();
    let text = strip_code_fence(text);
    let text = extract_object_array(text).unwrap_or(text);

    if text.is_empty() {
        return Err(ParseFailure::NoJson);
    }

    let items = match serde_json::from_str::<Value>(text)? {
        Value::Array(items) => items,
        object @ Value::Object(_) => vec![object],
        other => return Err(ParseFailure::UnexpectedShape(kind(&other))),
    };

    let recommendations: Vec<Recommendation> = items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(fields) => Some(from_fields(&fields)),
            _ => None,
        })
        .collect();

    if recommendations.is_empty() {
        return Err(ParseFailure::Empty);
    }

    Ok(recommendations)
}

/// Removes an opening fence line (e.g. "```json") and a trailing fence.
/// Text that does not start with a fence is returned unchanged.
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix(FENCE) else {
        return text;
    };

    // The opening line may carry a language tag; content starts after it.
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
    };

    let body = body.trim_end();
    body.strip_suffix(FENCE).unwrap_or(body).trim()
}

/// Returns the span from the first `[` that opens onto an object to the last
/// `]` that closes one, if both exist in that order.
fn extract_object_array(text: &str) -> Option<&str> {
    let start = text
        .char_indices()
        .filter(|&(_, c)| c == '[')
        .map(|(i, _)| i)
        .find(|&i| text[i + 1..].trim_start().starts_with('{'))?;

    let end = text
        .char_indices()
        .rev()
        .filter(|&(_, c)| c == ']')
        .map(|(i, _)| i)
        .find(|&i| i > start && text[..i].trim_end().ends_with('}'))?;

    Some(&text[start..=end])
}

fn from_fields(fields: &Map<String, Value>) -> Recommendation {
    Recommendation {
        role_title: field(fields, "role_title"),
        description: field(fields, "description"),
        why_it_fits_professionally: field(fields, "why_it_fits_professionally"),
        why_it_fits_personally: field(fields, "why_it_fits_personally"),
    }
}

fn field(fields: &Map<String, Value>, key: &str) -> String {
    match fields.get(key) {
        Some(Value::String(s)) => s.clone(),
        None | Some(Value::Null) => String::new(),
        Some(other) => other.to_string(),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THREE: &str = r#"[
  {"role_title": "Data Analyst", "description": "Turns data into decisions.", "why_it_fits_professionally": "Uses your coding.", "why_it_fits_personally": "You value impact."},
  {"role_title": "ML Engineer", "description": "Ships models.", "why_it_fits_professionally": "Coding plus data.", "why_it_fits_personally": "Curiosity."},
  {"role_title": "Policy Researcher", "description": "Studies outcomes.", "why_it_fits_professionally": "Analytical.", "why_it_fits_personally": "Public impact."}
]"#;

    #[test]
    fn test_bare_array_parses() {
        let recs = normalize(THREE).unwrap();
        assert_eq!(recs.len(), 3);
        assert_eq!(recs[0].role_title, "Data Analyst");
        assert_eq!(recs[2].why_it_fits_personally, "Public impact.");
    }

    #[test]
    fn test_strict_json_is_unchanged_by_cleanup_steps() {
        let trimmed = THREE.trim();
        assert_eq!(strip_code_fence(trimmed), trimmed);
        assert_eq!(extract_object_array(trimmed), Some(trimmed));

        let direct: Vec<Recommendation> = serde_json::from_str(THREE).unwrap();
        assert_eq!(normalize(THREE).unwrap(), direct);
    }

    #[test]
    fn test_prose_and_fence_match_bare_array() {
        let wrapped = format!("Here you go:\n```json\n{THREE}\n```");
        assert_eq!(normalize(&wrapped).unwrap(), normalize(THREE).unwrap());
    }

    #[test]
    fn test_leading_fence_without_tag() {
        let wrapped = format!("```\n{THREE}\n```");
        assert_eq!(normalize(&wrapped).unwrap().len(), 3);
    }

    #[test]
    fn test_leading_fence_with_other_tag_and_no_closing_fence() {
        let wrapped = format!("```javascript\n{THREE}");
        assert_eq!(normalize(&wrapped).unwrap().len(), 3);
    }

    #[test]
    fn test_trailing_prose_is_dropped() {
        let wrapped = format!("{THREE}\n\nLet me know if you want [more] options!");
        assert_eq!(normalize(&wrapped).unwrap().len(), 3);
    }

    #[test]
    fn test_single_object_is_wrapped() {
        let recs = normalize(
            r#"{"role_title": "Archivist", "description": "d", "why_it_fits_professionally": "p", "why_it_fits_personally": "q"}"#,
        )
        .unwrap();
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].role_title, "Archivist");
    }

    #[test]
    fn test_missing_fields_become_empty_strings() {
        let recs = normalize(r#"[{"role_title": "Nurse", "description": null, "salary": 5}]"#).unwrap();
        assert_eq!(recs[0].role_title, "Nurse");
        assert_eq!(recs[0].description, "");
        assert_eq!(recs[0].why_it_fits_professionally, "");
        assert_eq!(recs[0].why_it_fits_personally, "");
    }

    #[test]
    fn test_non_string_scalars_are_stringified() {
        let recs = normalize(r#"[{"role_title": 42, "description": true}]"#).unwrap();
        assert_eq!(recs[0].role_title, "42");
        assert_eq!(recs[0].description, "true");
    }

    #[test]
    fn test_other_counts_pass_through() {
        let five = r#"[{"role_title":"a"},{"role_title":"b"},{"role_title":"c"},{"role_title":"d"},{"role_title":"e"}]"#;
        assert_eq!(normalize(five).unwrap().len(), 5);
    }

    #[test]
    fn test_non_object_elements_are_dropped() {
        let recs = normalize(r#"[{"role_title": "a"}, "stray", 3]"#).unwrap();
        assert_eq!(recs.len(), 1);
    }

    #[test]
    fn test_failures() {
        assert!(matches!(normalize(""), Err(ParseFailure::NoJson)));
        assert!(matches!(normalize("```json\n```"), Err(ParseFailure::NoJson)));
        assert!(matches!(
            normalize("Sorry, I cannot help with that."),
            Err(ParseFailure::Malformed(_))
        ));
        assert!(matches!(
            normalize(r#"[{"role_title": "cut off"#),
            Err(ParseFailure::Malformed(_))
        ));
        assert!(matches!(
            normalize(r#""just a string""#),
            Err(ParseFailure::UnexpectedShape("a string"))
        ));
        assert!(matches!(normalize("[]"), Err(ParseFailure::Empty)));
        assert!(matches!(normalize(r#"["a", "b"]"#), Err(ParseFailure::Empty)));
    }
}
