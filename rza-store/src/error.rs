use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint rejected the write. For users this is a taken
    /// email, for bookings a second reservation for the same contact
    /// identity and visit date.
    #[error("a row with this identity already exists")]
    Duplicate,
    #[error("stored ticket details could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
    #[error(transparent)]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        let is_unique = err
            .as_database_error()
            .is_some_and(|db| db.is_unique_violation());

        if is_unique {
            StoreError::Duplicate
        } else {
            StoreError::Database(err)
        }
    }
}
