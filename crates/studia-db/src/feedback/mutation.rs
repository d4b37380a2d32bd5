use crate::util::now;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{ActiveModelTrait, ConnectionTrait, DbErr};
use std::error::Error;
use studia_entity::feedback::{ActiveModel, Model};

pub struct Mutation;

impl Mutation {
    pub async fn create_feedback<C: ConnectionTrait>(
        conn: &C,
        user_id: i32,
        course_id: Option<i32>,
        content: String,
    ) -> Result<Model, DbErr> {
        let feedback = ActiveModel {
            id: NotSet,
            user_id: Set(user_id),
            course_id: Set(course_id),
            content: Set(content),
            created_at: Set(now()),
        };
        feedback.insert(conn).await.inspect_err(|error| {
            tracing::error!(error = error as &dyn Error, "failed to create feedback");
        })
    }
}
