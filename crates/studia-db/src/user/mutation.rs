use crate::util::now;
use sea_orm::ActiveValue::{NotSet, Set, Unchanged};
use sea_orm::{ActiveModelTrait, ConnectionTrait, DbErr, EntityTrait};
use std::error::Error;
use studia_entity::user::{ActiveModel, Entity, Model, Role};

pub struct Mutation;

impl Mutation {
    pub async fn create_user<C: ConnectionTrait>(
        conn: &C,
        username: String,
        credential_hash: String,
        role: Role,
    ) -> Result<Model, DbErr> {
        let user = ActiveModel {
            id: NotSet,
            username: Set(username),
            role: Set(role),
            credential_hash: Set(credential_hash),
            created_at: Set(now()),
        };
        user.insert(conn).await.inspect_err(|error| {
            tracing::error!(error = error as &dyn Error, "failed to create user");
        })
    }

    pub async fn update_user_role<C: ConnectionTrait>(conn: &C, user_id: i32, role: Role) -> Result<Model, DbErr> {
        let user = ActiveModel {
            id: Unchanged(user_id),
            role: Set(role),
            ..Default::default()
        };
        user.update(conn).await
    }

    pub async fn update_credential_hash<C: ConnectionTrait>(
        conn: &C,
        user_id: i32,
        credential_hash: String,
    ) -> Result<Model, DbErr> {
        let user = ActiveModel {
            id: Unchanged(user_id),
            credential_hash: Set(credential_hash),
            ..Default::default()
        };
        user.update(conn).await
    }

    pub async fn delete<C: ConnectionTrait>(conn: &C, user_id: i32) -> Result<(), DbErr> {
        let res = Entity::delete_by_id(user_id).exec(conn).await;
        match res {
            Ok(res) if res.rows_affected == 0 => Err(DbErr::RecordNotFound(format!("user {user_id} not found"))),
            Ok(_) => Ok(()),
            Err(error) => {
                tracing::error!(error = &error as &dyn Error, "failed to delete user");
                Err(error)
            }
        }
    }
}
