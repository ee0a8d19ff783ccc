//! Errors raised while fetching and parsing the Bot API description.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("catalog request failed with HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("catalog request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("catalog document is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("catalog entry '{entity}' is missing '{field}'")]
    MissingField { entity: String, field: String },

    #[error("catalog document is missing '{0}'")]
    MissingSection(&'static str),

    #[error("duplicate {kind} name '{name}' in catalog")]
    DuplicateName { kind: &'static str, name: String },

    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),
}

impl CatalogError {
    /// Whether a failed fetch is worth another attempt.
    ///
    /// Network errors, HTTP 429 and server errors are transient; anything
    /// else (client errors, malformed documents) will fail again.
    pub fn is_transient(&self) -> bool {
        match self {
            CatalogError::Network(_) => true,
            CatalogError::Http { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    pub(crate) fn missing(entity: &str, field: &str) -> Self {
        CatalogError::MissingField {
            entity: entity.to_string(),
            field: field.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_and_server_errors_are_transient() {
        for status in [429, 500, 502, 503] {
            let err = CatalogError::Http {
                status,
                body: String::new(),
            };
            assert!(err.is_transient(), "status {} should retry", status);
        }
    }

    #[test]
    fn test_client_errors_are_permanent() {
        for status in [400, 401, 403, 404] {
            let err = CatalogError::Http {
                status,
                body: String::new(),
            };
            assert!(!err.is_transient(), "status {} should not retry", status);
        }
    }

    #[test]
    fn test_parse_errors_are_permanent() {
        assert!(!CatalogError::missing("sendMessage", "description").is_transient());
        assert!(!CatalogError::MissingSection("paths").is_transient());
    }

    #[test]
    fn test_missing_field_message() {
        let err = CatalogError::missing("User", "externalDocs.url");
        assert_eq!(
            err.to_string(),
            "catalog entry 'User' is missing 'externalDocs.url'"
        );
    }
}
