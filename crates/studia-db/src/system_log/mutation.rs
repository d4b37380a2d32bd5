use crate::util::now;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{ActiveModelTrait, ConnectionTrait, DbErr};
use studia_entity::system_log::{ActiveModel, Model};

pub struct Mutation;

impl Mutation {
    pub async fn append<C: ConnectionTrait>(
        conn: &C,
        user_id: Option<i32>,
        action: String,
        ip_address: Option<String>,
    ) -> Result<Model, DbErr> {
        let entry = ActiveModel {
            id: NotSet,
            user_id: Set(user_id),
            action: Set(action),
            ip_address: Set(ip_address),
            created_at: Set(now()),
        };
        entry.insert(conn).await
    }
}
