use sea_orm::{DbErr, SqlErr};
use studia_utils::store::error::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Not permitted: {0}")]
    Auth(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(DbErr),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Credential error: {0}")]
    Credential(String),
}

impl From<DbErr> for CoreError {
    fn from(error: DbErr) -> Self {
        match error {
            DbErr::RecordNotFound(message) => CoreError::NotFound(message),
            DbErr::RecordNotUpdated => CoreError::NotFound("record not updated".to_string()),
            error => match error.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(message)) => {
                    CoreError::Validation(format!("duplicate entry: {message}"))
                }
                Some(SqlErr::ForeignKeyConstraintViolation(message)) => {
                    CoreError::Validation(format!("unknown reference: {message}"))
                }
                _ => CoreError::Database(error),
            },
        }
    }
}

pub(crate) fn validation(message: impl Into<String>) -> CoreError {
    CoreError::Validation(message.into())
}

pub(crate) fn not_found(what: &str, id: i32) -> CoreError {
    CoreError::NotFound(format!("{what} {id} not found"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_records_map_to_not_found() {
        let error = CoreError::from(DbErr::RecordNotFound("course 3 not found".to_string()));
        assert!(matches!(error, CoreError::NotFound(message) if message == "course 3 not found"));
        assert!(matches!(CoreError::from(DbErr::RecordNotUpdated), CoreError::NotFound(_)));
    }

    #[test]
    fn other_errors_stay_database_errors() {
        let error = CoreError::from(DbErr::Custom("boom".to_string()));
        assert!(matches!(error, CoreError::Database(DbErr::Custom(_))));
    }
}
