use std::fmt;

use serde::Serialize;

use crate::errors::AppError;

/// A non-empty user identifier as received at the request boundary.
///
/// Only constructed through [`UserId::parse`], so every pipeline run starts
/// from a validated id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Rejects absent or blank identifiers as a bad request.
    pub fn parse(raw: Option<String>) -> Result<Self, AppError> {
        match raw {
            Some(id) if !id.trim().is_empty() => Ok(UserId(id.trim().to_string())),
            _ => Err(AppError::Validation("userId is required".to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_and_trims() {
        let id = UserId::parse(Some("  user-42 ".to_string())).unwrap();
        assert_eq!(id.as_str(), "user-42");
    }

    #[test]
    fn test_parse_rejects_missing_and_blank() {
        assert!(matches!(UserId::parse(None), Err(AppError::Validation(_))));
        assert!(matches!(
            UserId::parse(Some("   ".to_string())),
            Err(AppError::Validation(_))
        ));
    }
}
