use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter};
use studia_entity::teacher::{Column, Entity as TeacherEntity, Model as Teacher};

pub struct Query;

impl Query {
    pub async fn find_for_user<C: ConnectionTrait>(conn: &C, user_id: i32) -> Result<Option<Teacher>, DbErr> {
        TeacherEntity::find().filter(Column::UserId.eq(user_id)).one(conn).await
    }
}
