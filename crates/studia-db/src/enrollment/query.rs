use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder};
use std::error::Error;
use studia_entity::course::{self, Model as Course};
use studia_entity::enrollment::{Column, Entity as EnrollmentEntity, Model as Enrollment};

pub struct Query;

impl Query {
    pub async fn find_by_id<C: ConnectionTrait>(conn: &C, enrollment_id: i32) -> Result<Option<Enrollment>, DbErr> {
        EnrollmentEntity::find_by_id(enrollment_id).one(conn).await
    }

    pub async fn find_for_student_and_course<C: ConnectionTrait>(
        conn: &C,
        student_id: i32,
        course_id: i32,
    ) -> Result<Option<Enrollment>, DbErr> {
        EnrollmentEntity::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::CourseId.eq(course_id))
            .one(conn)
            .await
    }

    pub async fn list_for_student<C: ConnectionTrait>(conn: &C, student_id: i32) -> Result<Vec<Enrollment>, DbErr> {
        EnrollmentEntity::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_asc(Column::Id)
            .all(conn)
            .await
    }

    pub async fn list_for_course<C: ConnectionTrait>(conn: &C, course_id: i32) -> Result<Vec<Enrollment>, DbErr> {
        EnrollmentEntity::find()
            .filter(Column::CourseId.eq(course_id))
            .order_by_asc(Column::Id)
            .all(conn)
            .await
    }

    /// Enrollments of a student joined with their course.
    pub async fn list_for_student_with_course<C: ConnectionTrait>(
        conn: &C,
        student_id: i32,
    ) -> Result<Vec<(Enrollment, Course)>, DbErr> {
        let rows = EnrollmentEntity::find()
            .find_also_related(course::Entity)
            .filter(Column::StudentId.eq(student_id))
            .order_by_asc(Column::Id)
            .all(conn)
            .await
            .inspect_err(|error| {
                tracing::error!(error = error as &dyn Error, "failed to load enrollments with course");
            })?;

        // The inner course is always present, the foreign key cascades.
        Ok(rows
            .into_iter()
            .filter_map(|(enrollment, course)| course.map(|course| (enrollment, course)))
            .collect())
    }
}
