use crate::actor::Actor;
use crate::audit::AuditLog;
use crate::error::{CoreError, not_found, validation};
use sea_orm::{DatabaseConnection, TransactionTrait};
use studia_db::util::{FlattenTransactionResultExt, RequireRecord};
use studia_db::{course, feedback, notification, user};
use studia_entity::feedback::Model as Feedback;
use studia_entity::user::Capability;
use tracing::instrument;

pub const MIN_ADMIN_FEEDBACK_LEN: usize = 10;
pub const MIN_COURSE_FEEDBACK_LEN: usize = 5;

fn validate_content(content: &str, min_len: usize) -> Result<String, CoreError> {
    let content = content.trim();
    if content.chars().count() < min_len {
        return Err(validation(format!("feedback needs at least {min_len} characters")));
    }
    Ok(content.to_owned())
}

/// Feedback to the administration and to course teachers.
///
/// Every submission is archived. The addressee also gets a message in
/// their mailbox.
#[derive(Clone, Debug)]
pub struct FeedbackBox {
    db: DatabaseConnection,
    audit: AuditLog,
}

impl FeedbackBox {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        let audit = AuditLog::new(db.clone());
        Self { db, audit }
    }

    /// Archives feedback and forwards it to the first admin. Without an
    /// admin the feedback is only archived.
    #[instrument(skip_all, fields(user_id = actor.user_id))]
    pub async fn submit_to_admin(&self, actor: &Actor, content: &str) -> Result<Feedback, CoreError> {
        let content = validate_content(content, MIN_ADMIN_FEEDBACK_LEN)?;
        let author_id = actor.user_id;

        let created = self
            .db
            .transaction(|txn| {
                Box::pin(async move {
                    let author = user::Query::find_user_by_id(txn, author_id).await.require()?;
                    let created = feedback::Mutation::create_feedback(txn, author_id, None, content).await?;
                    match user::Query::first_admin(txn).await? {
                        Some(admin) => {
                            notification::Mutation::create_notification(
                                txn,
                                Some(author_id),
                                admin.id,
                                format!("Feedback from {}", author.username),
                                format!("Feedback from user {author_id}:\n\n{}", created.content),
                            )
                            .await?;
                        }
                        None => tracing::warn!(feedback_id = created.id, "no admin to forward feedback to"),
                    }
                    Result::<_, CoreError>::Ok(created)
                })
            })
            .await
            .flatten_res()?;

        self.audit
            .record(actor, &format!("submitted feedback {}", created.id))
            .await;
        Ok(created)
    }

    /// Sends feedback on a course to its teacher and archives it.
    #[instrument(skip_all, fields(user_id = actor.user_id, course_id = course_id))]
    pub async fn submit_to_teacher(&self, actor: &Actor, course_id: i32, content: &str) -> Result<Feedback, CoreError> {
        let content = validate_content(content, MIN_COURSE_FEEDBACK_LEN)?;
        let author_id = actor.user_id;

        let created = self
            .db
            .transaction(|txn| {
                Box::pin(async move {
                    let author = user::Query::find_user_by_id(txn, author_id).await.require()?;
                    let found = course::Query::find_by_id(txn, course_id)
                        .await?
                        .ok_or_else(|| not_found("course", course_id))?;
                    let Some(teacher_id) = found.teacher_id else {
                        return Err(validation(format!("course {course_id} has no teacher")));
                    };
                    let created = feedback::Mutation::create_feedback(txn, author_id, Some(course_id), content).await?;
                    notification::Mutation::create_notification(
                        txn,
                        Some(author_id),
                        teacher_id,
                        format!("Course feedback from {}", author.username),
                        format!("Feedback on course \"{}\":\n{}", found.name, created.content),
                    )
                    .await?;
                    Ok(created)
                })
            })
            .await
            .flatten_res()?;

        self.audit
            .record(actor, &format!("submitted feedback {} on course {course_id}", created.id))
            .await;
        Ok(created)
    }

    /// Feedback written by `user_id`, newest first.
    pub async fn list_for_user(&self, actor: &Actor, user_id: i32) -> Result<Vec<Feedback>, CoreError> {
        actor.require_owner_or(user_id, Capability::ManageAnyRecord)?;
        Ok(feedback::Query::list_for_user(&self.db, user_id).await?)
    }

    pub async fn list_all(&self, actor: &Actor) -> Result<Vec<Feedback>, CoreError> {
        actor.require(Capability::ManageAnyRecord)?;
        Ok(feedback::Query::list_all(&self.db).await?)
    }
}
