use sea_orm::{ConnectionTrait, DbBackend, DbErr};

const SQLITE_SCHEMA: &str = include_str!("schema/sqlite.sql");

/// Creates every table if it does not exist yet.
pub async fn setup_schema<C: ConnectionTrait>(conn: &C) -> Result<(), DbErr> {
    let schema = match conn.get_database_backend() {
        DbBackend::Sqlite => SQLITE_SCHEMA,
        backend => {
            return Err(DbErr::Custom(format!("unsupported database backend: {backend:?}")));
        }
    };

    tracing::debug!("setting up schema");
    conn.execute_unprepared(schema).await.inspect_err(|error| {
        tracing::error!(error = error as &dyn std::error::Error, "failed to set up schema");
    })?;
    Ok(())
}
