use thiserror::Error;
use tokio_postgres::error::SqlState;

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, DbError>;

#[derive(Debug, Error)]
pub enum DbError {
    /// A unique constraint rejected the write; carries the constraint name
    #[error("Unique constraint violated: {0}")]
    Conflict(String),

    /// The server refused a value, e.g. longer than its column allows
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Invalid connection settings or unreachable server
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Pool error: {0}")]
    Pool(String),

    /// SQL errors and other constraint violations
    #[error("Database error: {0}")]
    Database(String),
}

impl From<tokio_postgres::Error> for DbError {
    fn from(err: tokio_postgres::Error) -> Self {
        if let Some(db_error) = err.as_db_error() {
            if db_error.code() == &SqlState::UNIQUE_VIOLATION {
                let constraint = db_error.constraint().unwrap_or("unknown").to_string();
                return DbError::Conflict(constraint);
            }
            if db_error.code() == &SqlState::STRING_DATA_RIGHT_TRUNCATION {
                return DbError::InvalidInput(db_error.message().to_string());
            }
            return DbError::Database(format!(
                "{}: {}",
                db_error.code().code(),
                db_error.message()
            ));
        }

        DbError::Database(format!("{:?}", err))
    }
}

impl From<deadpool_postgres::PoolError> for DbError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        DbError::Pool(err.to_string())
    }
}

impl From<deadpool_postgres::BuildError> for DbError {
    fn from(err: deadpool_postgres::BuildError) -> Self {
        DbError::Connection(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            DbError::Conflict("users_email_key".to_string()).to_string(),
            "Unique constraint violated: users_email_key"
        );
        assert_eq!(
            DbError::InvalidInput("value too long".to_string()).to_string(),
            "Invalid input: value too long"
        );
    }
}
