use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder};
use studia_entity::feedback::{Column, Entity as FeedbackEntity, Model as Feedback};

pub struct Query;

impl Query {
    /// Feedback submitted by `user_id`, newest first.
    pub async fn list_for_user<C: ConnectionTrait>(conn: &C, user_id: i32) -> Result<Vec<Feedback>, DbErr> {
        FeedbackEntity::find()
            .filter(Column::UserId.eq(user_id))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(conn)
            .await
    }

    pub async fn list_all<C: ConnectionTrait>(conn: &C) -> Result<Vec<Feedback>, DbErr> {
        FeedbackEntity::find()
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(conn)
            .await
    }
}
