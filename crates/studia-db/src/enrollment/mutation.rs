use crate::util::now;
use sea_orm::ActiveValue::{NotSet, Set, Unchanged};
use sea_orm::{ActiveModelTrait, ConnectionTrait, DbErr, EntityTrait};
use std::error::Error;
use studia_entity::enrollment::{ActiveModel, Entity, Model};

pub struct Mutation;

impl Mutation {
    pub async fn create_enrollment<C: ConnectionTrait>(
        conn: &C,
        student_id: i32,
        course_id: i32,
    ) -> Result<Model, DbErr> {
        let enrollment = ActiveModel {
            id: NotSet,
            student_id: Set(student_id),
            course_id: Set(course_id),
            score: Set(None),
            created_at: Set(now()),
        };
        enrollment.insert(conn).await.inspect_err(|error| {
            tracing::error!(error = error as &dyn Error, "failed to create enrollment");
        })
    }

    pub async fn set_score<C: ConnectionTrait>(conn: &C, enrollment_id: i32, score: Option<f64>) -> Result<Model, DbErr> {
        let enrollment = ActiveModel {
            id: Unchanged(enrollment_id),
            score: Set(score),
            ..Default::default()
        };
        enrollment.update(conn).await
    }

    pub async fn delete<C: ConnectionTrait>(conn: &C, enrollment_id: i32) -> Result<(), DbErr> {
        let res = Entity::delete_by_id(enrollment_id).exec(conn).await?;
        if res.rows_affected == 0 {
            return Err(DbErr::RecordNotFound(format!("enrollment {enrollment_id} not found")));
        }
        Ok(())
    }
}
