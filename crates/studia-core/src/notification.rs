use crate::actor::Actor;
use crate::audit::AuditLog;
use crate::error::{CoreError, not_found, validation};
use sea_orm::DatabaseConnection;
use studia_db::{notification, user};
use studia_entity::notification::Model as Notification;
use tracing::instrument;

/// Mailbox of in-app messages.
///
/// Messages from other components are written through the db layer inside
/// their own transaction. This service covers direct messages and the
/// recipient's side of the mailbox.
#[derive(Clone, Debug)]
pub struct Notifications {
    db: DatabaseConnection,
    audit: AuditLog,
}

fn validate_title(title: &str) -> Result<String, CoreError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(validation("title must not be empty"));
    }
    Ok(title.to_owned())
}

impl Notifications {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        let audit = AuditLog::new(db.clone());
        Self { db, audit }
    }

    async fn require_addressed_to(&self, notification_id: i32, requester: &Actor) -> Result<Notification, CoreError> {
        let found = notification::Query::find_by_id(&self.db, notification_id)
            .await?
            .ok_or_else(|| not_found("notification", notification_id))?;
        if found.recipient_id != requester.user_id {
            return Err(CoreError::Auth(format!(
                "notification {notification_id} is not addressed to user {}",
                requester.user_id
            )));
        }
        Ok(found)
    }

    /// Sends a message in the name of `sender`. `None` sends a system
    /// message.
    #[instrument(skip_all, fields(sender_id = sender.map(|sender| sender.user_id), recipient_id = recipient_id))]
    pub async fn send(
        &self,
        sender: Option<&Actor>,
        recipient_id: i32,
        title: &str,
        content: &str,
    ) -> Result<Notification, CoreError> {
        let title = validate_title(title)?;
        user::Query::find_user_by_id(&self.db, recipient_id)
            .await?
            .ok_or_else(|| not_found("user", recipient_id))?;

        let sender_id = sender.map(|sender| sender.user_id);
        let sent =
            notification::Mutation::create_notification(&self.db, sender_id, recipient_id, title, content.to_owned())
                .await?;

        let action = format!("sent notification {} to user {recipient_id}", sent.id);
        match sender {
            Some(sender) => self.audit.record(sender, &action).await,
            None => self.audit.append(None, &action, None).await,
        }
        Ok(sent)
    }

    /// Answers a received message. Messages without a sender are answered to
    /// the first admin.
    #[instrument(skip_all, fields(user_id = actor.user_id, notification_id = notification_id))]
    pub async fn reply(&self, actor: &Actor, notification_id: i32, content: &str) -> Result<Notification, CoreError> {
        let original = self.require_addressed_to(notification_id, actor).await?;
        let recipient_id = match original.sender_id {
            Some(sender_id) => sender_id,
            None => {
                user::Query::first_admin(&self.db)
                    .await?
                    .ok_or_else(|| CoreError::NotFound("no admin to reply to".to_string()))?
                    .id
            }
        };

        let title = format!("Re: {}", original.title);
        self.send(Some(actor), recipient_id, &title, content).await
    }

    /// Marks a message read. Reading an already read message is a no-op.
    #[instrument(skip_all, fields(user_id = requester.user_id, notification_id = notification_id))]
    pub async fn mark_read(&self, notification_id: i32, requester: &Actor) -> Result<Notification, CoreError> {
        let found = self.require_addressed_to(notification_id, requester).await?;
        if found.is_read {
            return Ok(found);
        }
        notification::Mutation::mark_read(&self.db, notification_id).await?;

        self.audit
            .record(requester, &format!("read notification {notification_id}"))
            .await;
        Ok(Notification { is_read: true, ..found })
    }

    pub async fn list_for_recipient(&self, recipient_id: i32) -> Result<Vec<Notification>, CoreError> {
        Ok(notification::Query::list_for_recipient(&self.db, recipient_id).await?)
    }

    pub async fn unread_count(&self, recipient_id: i32) -> Result<u64, CoreError> {
        Ok(notification::Query::unread_count(&self.db, recipient_id).await?)
    }

    #[instrument(skip_all, fields(user_id = requester.user_id, notification_id = notification_id))]
    pub async fn delete(&self, notification_id: i32, requester: &Actor) -> Result<(), CoreError> {
        self.require_addressed_to(notification_id, requester).await?;
        notification::Mutation::delete(&self.db, notification_id).await?;

        self.audit
            .record(requester, &format!("deleted notification {notification_id}"))
            .await;
        Ok(())
    }

    /// Removes every read message of the requester, returns how many.
    #[instrument(skip_all, fields(user_id = requester.user_id))]
    pub async fn clear_read(&self, requester: &Actor) -> Result<u64, CoreError> {
        let removed = notification::Mutation::delete_read_for_recipient(&self.db, requester.user_id).await?;

        self.audit
            .record(requester, &format!("cleared {removed} read notifications"))
            .await;
        Ok(removed)
    }

    #[instrument(skip_all, fields(user_id = requester.user_id))]
    pub async fn clear_all(&self, requester: &Actor) -> Result<u64, CoreError> {
        let removed = notification::Mutation::delete_all_for_recipient(&self.db, requester.user_id).await?;

        self.audit
            .record(requester, &format!("cleared all {removed} notifications"))
            .await;
        Ok(removed)
    }
}
