use sea_orm::DatabaseConnection;
use studia_db::user;
use studia_entity::user::{Model as UserModel, Role};

#[allow(dead_code)]
pub async fn create_test_user(db: &DatabaseConnection, username: &str, role: Role) -> UserModel {
    user::Mutation::create_user(db, username.to_owned(), "hash".to_owned(), role)
        .await
        .unwrap()
}
