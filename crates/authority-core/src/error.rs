//! Authority error types.

use thiserror::Error;

/// Errors raised while loading or serving privileges.
#[derive(Debug, Error)]
pub enum AuthorityError {
    /// A catalog query could not be executed.
    #[error("data access error on instance {instance}: {message}")]
    DataAccess {
        /// Instance the query was sent to.
        instance: String,
        /// Failure reported by the execution layer.
        message: String,
    },

    /// A catalog row did not have the expected shape.
    #[error("cannot decode {catalog}.{column}: {message}")]
    Decode {
        /// Catalog table being decoded.
        catalog: String,
        /// Offending column.
        column: String,
        /// What was wrong with it.
        message: String,
    },

    /// A privilege name is not a known privilege type.
    #[error("unknown privilege: {0}")]
    UnknownPrivilege(String),

    /// A grantee could not be built.
    #[error("invalid grantee: {0}")]
    InvalidGrantee(String),

    /// No provider is registered under the requested type.
    #[error("unknown authority provider type: {0}")]
    UnknownProvider(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AuthorityError {
    /// Build a data access error for an instance.
    pub fn data_access(instance: impl Into<String>, message: impl ToString) -> Self {
        AuthorityError::DataAccess {
            instance: instance.into(),
            message: message.to_string(),
        }
    }

    /// Build a decode error for a catalog column.
    pub fn decode(
        catalog: impl Into<String>,
        column: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        AuthorityError::Decode {
            catalog: catalog.into(),
            column: column.into(),
            message: message.into(),
        }
    }
}

/// Result type for authority operations.
pub type AuthorityResult<T> = Result<T, AuthorityError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AuthorityError::data_access("127.0.0.1:3306", "connection refused");
        assert!(err.to_string().contains("127.0.0.1:3306"));
        assert!(err.to_string().contains("connection refused"));

        let err = AuthorityError::decode("mysql.user", "Super_priv", "column not found");
        assert_eq!(
            err.to_string(),
            "cannot decode mysql.user.Super_priv: column not found"
        );
    }

    #[test]
    fn test_authority_result() {
        let ok: AuthorityResult<i32> = Ok(42);
        assert_eq!(ok.unwrap(), 42);

        let err: AuthorityResult<i32> = Err(AuthorityError::UnknownProvider("LDAP".into()));
        assert!(err.is_err());
    }
}
