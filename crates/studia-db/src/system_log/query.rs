use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use studia_entity::system_log::{Column, Entity as SystemLogEntity, Model as SystemLog};

pub struct Query;

impl Query {
    pub async fn recent<C: ConnectionTrait>(conn: &C, limit: u64) -> Result<Vec<SystemLog>, DbErr> {
        SystemLogEntity::find()
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .limit(limit)
            .all(conn)
            .await
    }

    pub async fn list_for_user<C: ConnectionTrait>(conn: &C, user_id: i32) -> Result<Vec<SystemLog>, DbErr> {
        SystemLogEntity::find()
            .filter(Column::UserId.eq(user_id))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(conn)
            .await
    }
}
