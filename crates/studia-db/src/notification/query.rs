use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use studia_entity::notification::{Column, Entity as NotificationEntity, Model as Notification};

pub struct Query;

impl Query {
    pub async fn find_by_id<C: ConnectionTrait>(
        conn: &C,
        notification_id: i32,
    ) -> Result<Option<Notification>, DbErr> {
        NotificationEntity::find_by_id(notification_id).one(conn).await
    }

    /// Inbox of `recipient_id`, newest first.
    pub async fn list_for_recipient<C: ConnectionTrait>(
        conn: &C,
        recipient_id: i32,
    ) -> Result<Vec<Notification>, DbErr> {
        NotificationEntity::find()
            .filter(Column::RecipientId.eq(recipient_id))
            .order_by_desc(Column::Timestamp)
            .order_by_desc(Column::Id)
            .all(conn)
            .await
    }

    pub async fn unread_count<C: ConnectionTrait>(conn: &C, recipient_id: i32) -> Result<u64, DbErr> {
        NotificationEntity::find()
            .filter(Column::RecipientId.eq(recipient_id))
            .filter(Column::IsRead.eq(false))
            .count(conn)
            .await
    }
}
