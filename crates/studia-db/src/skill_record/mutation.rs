use crate::util::now;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{ActiveModelTrait, ConnectionTrait, DbErr};
use std::error::Error;
use studia_entity::skill_record::{ActiveModel, Model};

pub struct Mutation;

impl Mutation {
    pub async fn create_record<C: ConnectionTrait>(
        conn: &C,
        skill_id: i32,
        user_id: i32,
        content: String,
        hours: f64,
    ) -> Result<Model, DbErr> {
        let record = ActiveModel {
            id: NotSet,
            content: Set(content),
            hours: Set(hours),
            skill_id: Set(skill_id),
            user_id: Set(user_id),
            created_at: Set(now()),
        };
        record.insert(conn).await.inspect_err(|error| {
            tracing::error!(error = error as &dyn Error, "failed to create skill record");
        })
    }
}
