use crate::util::now;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter};
use std::error::Error;
use studia_entity::notification::{ActiveModel, Column, Entity, Model};

pub struct Mutation;

impl Mutation {
    pub async fn create_notification<C: ConnectionTrait>(
        conn: &C,
        sender_id: Option<i32>,
        recipient_id: i32,
        title: String,
        content: String,
    ) -> Result<Model, DbErr> {
        let notification = ActiveModel {
            id: NotSet,
            sender_id: Set(sender_id),
            recipient_id: Set(recipient_id),
            title: Set(title),
            content: Set(content),
            is_read: Set(false),
            timestamp: Set(now()),
        };
        notification.insert(conn).await.inspect_err(|error| {
            tracing::error!(error = error as &dyn Error, "failed to create notification");
        })
    }

    /// Sets `is_read`. Never clears it, so reading twice is a no-op.
    pub async fn mark_read<C: ConnectionTrait>(conn: &C, notification_id: i32) -> Result<u64, DbErr> {
        let res = Entity::update_many()
            .set(ActiveModel {
                is_read: Set(true),
                ..Default::default()
            })
            .filter(Column::Id.eq(notification_id))
            .filter(Column::IsRead.eq(false))
            .exec(conn)
            .await?;
        Ok(res.rows_affected)
    }

    /// Marks the unread messages of `recipient_id` read that carry `title`
    /// and mention `reference` in their content.
    pub async fn mark_read_referencing<C: ConnectionTrait>(
        conn: &C,
        recipient_id: i32,
        title: &str,
        reference: &str,
    ) -> Result<u64, DbErr> {
        let res = Entity::update_many()
            .set(ActiveModel {
                is_read: Set(true),
                ..Default::default()
            })
            .filter(Column::RecipientId.eq(recipient_id))
            .filter(Column::Title.eq(title))
            .filter(Column::Content.contains(reference))
            .filter(Column::IsRead.eq(false))
            .exec(conn)
            .await?;
        Ok(res.rows_affected)
    }

    pub async fn delete<C: ConnectionTrait>(conn: &C, notification_id: i32) -> Result<(), DbErr> {
        let res = Entity::delete_by_id(notification_id).exec(conn).await?;
        if res.rows_affected == 0 {
            return Err(DbErr::RecordNotFound(format!("notification {notification_id} not found")));
        }
        Ok(())
    }

    pub async fn delete_read_for_recipient<C: ConnectionTrait>(conn: &C, recipient_id: i32) -> Result<u64, DbErr> {
        let res = Entity::delete_many()
            .filter(Column::RecipientId.eq(recipient_id))
            .filter(Column::IsRead.eq(true))
            .exec(conn)
            .await?;
        Ok(res.rows_affected)
    }

    pub async fn delete_all_for_recipient<C: ConnectionTrait>(conn: &C, recipient_id: i32) -> Result<u64, DbErr> {
        let res = Entity::delete_many()
            .filter(Column::RecipientId.eq(recipient_id))
            .exec(conn)
            .await?;
        Ok(res.rows_affected)
    }
}
