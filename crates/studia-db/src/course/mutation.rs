use crate::util::now;
use sea_orm::ActiveValue::{NotSet, Set, Unchanged};
use sea_orm::{ActiveModelTrait, ConnectionTrait, DbErr, EntityTrait};
use std::error::Error;
use studia_entity::course::{ActiveModel, Entity, Model};

pub struct Mutation;

pub struct CourseChanges {
    pub name: Option<String>,
    pub credit: Option<f64>,
    pub description: Option<Option<String>>,
    pub teacher_id: Option<Option<i32>>,
}

impl Mutation {
    pub async fn create_course<C: ConnectionTrait>(
        conn: &C,
        name: String,
        credit: f64,
        description: Option<String>,
        teacher_id: Option<i32>,
    ) -> Result<Model, DbErr> {
        let course = ActiveModel {
            id: NotSet,
            name: Set(name),
            credit: Set(credit),
            description: Set(description),
            teacher_id: Set(teacher_id),
            created_at: Set(now()),
        };
        course.insert(conn).await.inspect_err(|error| {
            tracing::error!(error = error as &dyn Error, "failed to create course");
        })
    }

    pub async fn update_course<C: ConnectionTrait>(
        conn: &C,
        course_id: i32,
        changes: CourseChanges,
    ) -> Result<Model, DbErr> {
        let course = ActiveModel {
            id: Unchanged(course_id),
            name: changes.name.map_or(NotSet, Set),
            credit: changes.credit.map_or(NotSet, Set),
            description: changes.description.map_or(NotSet, Set),
            teacher_id: changes.teacher_id.map_or(NotSet, Set),
            created_at: NotSet,
        };
        course.update(conn).await
    }

    pub async fn delete<C: ConnectionTrait>(conn: &C, course_id: i32) -> Result<(), DbErr> {
        let res = Entity::delete_by_id(course_id).exec(conn).await.inspect_err(|error| {
            tracing::error!(error = error as &dyn Error, "failed to delete course");
        })?;
        if res.rows_affected == 0 {
            return Err(DbErr::RecordNotFound(format!("course {course_id} not found")));
        }
        Ok(())
    }
}
