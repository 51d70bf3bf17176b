use std::fmt;

/// Result type for product store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Error types for product store operations
///
/// The `Display` text is what the search tool forwards to the model after its
/// `Database Error: ` prefix, so every variant renders as a single line.
#[derive(Debug)]
pub enum StoreError {
    /// Missing or malformed store settings (endpoint URL, access key)
    Configuration(String),

    /// Store unreachable: DNS, refused connection, TLS, timeout
    Connection(String),

    /// The store answered with a non-success status
    Remote { status: u16, message: String },

    /// The store answered with a body that is not a list of rows
    Decode(String),

    /// SQL errors from the Postgres backend
    Database(String),

    /// Connection pool issues
    Pool(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Configuration(msg) => write!(f, "Store not configured: {}", single_line(msg)),
            StoreError::Connection(msg) => write!(f, "Connection error: {}", single_line(msg)),
            StoreError::Remote { status, message } => {
                write!(f, "Store returned status {}: {}", status, single_line(message))
            }
            StoreError::Decode(msg) => write!(f, "Unexpected store response: {}", single_line(msg)),
            StoreError::Database(msg) => f.write_str(&single_line(msg)),
            StoreError::Pool(msg) => write!(f, "Pool error: {}", single_line(msg)),
        }
    }
}

/// Collapse every whitespace run, newlines included, into one space
pub(crate) fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl std::error::Error for StoreError {}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return StoreError::Decode(err.to_string());
        }
        match err.status() {
            Some(status) => StoreError::Remote {
                status: status.as_u16(),
                message: err.to_string(),
            },
            None => StoreError::Connection(err.to_string()),
        }
    }
}

impl From<tokio_postgres::Error> for StoreError {
    fn from(err: tokio_postgres::Error) -> Self {
        if let Some(db_error) = err.as_db_error() {
            return StoreError::Database(format!(
                "{}: {}",
                db_error.code().code(),
                db_error.message()
            ));
        }

        if err.is_closed() {
            return StoreError::Connection(err.to_string());
        }

        StoreError::Database(err.to_string())
    }
}

impl From<deadpool_postgres::PoolError> for StoreError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        match err {
            // Failing to open a fresh connection is a connectivity fault
            deadpool_postgres::PoolError::Backend(e) => StoreError::Connection(e.to_string()),
            other => StoreError::Pool(other.to_string()),
        }
    }
}

impl From<deadpool_postgres::BuildError> for StoreError {
    fn from(err: deadpool_postgres::BuildError) -> Self {
        StoreError::Configuration(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multi_line_messages_render_on_one_line() {
        let detail = "42601: syntax error at or near \"FROM\"\nLINE 1: SELECT FROM\n               ^";
        let errors = vec![
            StoreError::Configuration("endpoint\nis not set".to_string()),
            StoreError::Connection("error sending request\r\ncaused by: refused".to_string()),
            StoreError::Remote {
                status: 400,
                message: "failed to parse filter\n  (ilike.*a*)".to_string(),
            },
            StoreError::Decode("expected a JSON array\n".to_string()),
            StoreError::Database(detail.to_string()),
            StoreError::Pool("Timeout\noccurred".to_string()),
        ];

        for err in errors {
            assert!(!err.to_string().contains(['\n', '\r']), "{:?}", err);
        }

        assert_eq!(
            StoreError::Database(detail.to_string()).to_string(),
            "42601: syntax error at or near \"FROM\" LINE 1: SELECT FROM ^"
        );
    }

    #[test]
    fn test_remote_display() {
        let err = StoreError::Remote {
            status: 404,
            message: "relation does not exist".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Store returned status 404: relation does not exist"
        );
    }
}
