use sea_orm::{DbErr, TransactionError};
use std::error::Error;

pub trait FlattenTransactionResultExt<T> {
    fn flatten_res(self) -> T;
}

impl<T, E> FlattenTransactionResultExt<Result<T, E>> for Result<T, TransactionError<E>>
where
    E: From<DbErr> + Error,
{
    fn flatten_res(self) -> Result<T, E> {
        self.map_err(|err| match err {
            TransactionError::Connection(err) => err.into(),
            TransactionError::Transaction(err) => err,
        })
    }
}

pub trait RequireRecord<T> {
    fn require(self) -> Result<T, DbErr>;
}

impl<T> RequireRecord<T> for Result<Option<T>, DbErr> {
    fn require(self) -> Result<T, DbErr> {
        self?.ok_or_else(|| DbErr::RecordNotFound("record not found".to_string()))
    }
}

/// Current time as stored in every `created_at`-like column.
#[must_use]
pub fn now() -> chrono::NaiveDateTime {
    chrono::Utc::now().naive_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug)]
    struct Failed;

    impl fmt::Display for Failed {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("failed")
        }
    }

    impl Error for Failed {}

    impl From<DbErr> for Failed {
        fn from(_: DbErr) -> Self {
            Failed
        }
    }

    #[test]
    fn require_maps_missing_record() {
        let missing: Result<Option<i32>, DbErr> = Ok(None);
        assert!(matches!(missing.require(), Err(DbErr::RecordNotFound(_))));

        let present: Result<Option<i32>, DbErr> = Ok(Some(3));
        assert_eq!(present.require().unwrap(), 3);
    }

    #[test]
    fn flatten_keeps_transaction_error() {
        let res: Result<(), TransactionError<Failed>> = Err(TransactionError::Transaction(Failed));
        assert!(matches!(res.flatten_res(), Err(Failed)));

        let res: Result<(), TransactionError<Failed>> =
            Err(TransactionError::Connection(DbErr::Custom("closed".to_string())));
        assert!(matches!(res.flatten_res(), Err(Failed)));
    }
}
