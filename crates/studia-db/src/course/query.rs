use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder};
use studia_entity::course::{Column, Entity as CourseEntity, Model as Course};

pub struct Query;

impl Query {
    pub async fn find_by_id<C: ConnectionTrait>(conn: &C, course_id: i32) -> Result<Option<Course>, DbErr> {
        CourseEntity::find_by_id(course_id).one(conn).await
    }

    pub async fn list_all<C: ConnectionTrait>(conn: &C) -> Result<Vec<Course>, DbErr> {
        CourseEntity::find().order_by_asc(Column::Name).all(conn).await
    }

    pub async fn list_taught_by<C: ConnectionTrait>(conn: &C, teacher_id: i32) -> Result<Vec<Course>, DbErr> {
        CourseEntity::find()
            .filter(Column::TeacherId.eq(teacher_id))
            .order_by_asc(Column::Name)
            .all(conn)
            .await
    }
}
