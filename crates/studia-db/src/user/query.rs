use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder};
use std::error::Error;
use studia_entity::user::{Column, Entity as UserEntity, Model as User, Role};

pub struct Query;

impl Query {
    pub async fn find_user_by_id<C: ConnectionTrait>(conn: &C, id: i32) -> Result<Option<User>, DbErr> {
        UserEntity::find_by_id(id).one(conn).await.inspect_err(|error| {
            tracing::error!(error = error as &dyn Error, "error loading user");
        })
    }

    pub async fn find_by_username<C: ConnectionTrait>(conn: &C, username: &str) -> Result<Option<User>, DbErr> {
        UserEntity::find()
            .filter(Column::Username.eq(username))
            .one(conn)
            .await
            .inspect_err(|error| {
                tracing::error!(error = error as &dyn Error, "error loading user by name");
            })
    }

    pub async fn list_by_role<C: ConnectionTrait>(conn: &C, role: Role) -> Result<Vec<User>, DbErr> {
        UserEntity::find()
            .filter(Column::Role.eq(role))
            .order_by_asc(Column::Username)
            .all(conn)
            .await
    }

    /// Admin with the lowest id, the fallback recipient for unaddressed messages.
    pub async fn first_admin<C: ConnectionTrait>(conn: &C) -> Result<Option<User>, DbErr> {
        UserEntity::find()
            .filter(Column::Role.eq(Role::Admin))
            .order_by_asc(Column::Id)
            .one(conn)
            .await
    }
}
