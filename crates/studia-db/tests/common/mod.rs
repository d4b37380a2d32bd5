pub mod user;

use sea_orm::{Database, DatabaseConnection};
use studia_db::schema::setup_schema;

pub async fn setup_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    setup_schema(&db).await.unwrap();
    db
}
