use crate::actor::Actor;
use crate::audit::AuditLog;
use crate::error::{CoreError, not_found, validation};
use chrono::NaiveDateTime;
use sea_orm::DatabaseConnection;
use studia_db::study_plan;
use studia_entity::study_plan::{Model as StudyPlan, PlanStatus};
use tracing::instrument;

fn validate_title(title: &str) -> Result<String, CoreError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(validation("plan title must not be empty"));
    }
    Ok(title.to_owned())
}

#[derive(Clone, Debug)]
pub struct PlanningLog {
    db: DatabaseConnection,
    audit: AuditLog,
}

impl PlanningLog {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        let audit = AuditLog::new(db.clone());
        Self { db, audit }
    }

    async fn require_owned(&self, actor: &Actor, plan_id: i32) -> Result<StudyPlan, CoreError> {
        let found = study_plan::Query::find_by_id(&self.db, plan_id)
            .await?
            .ok_or_else(|| not_found("study plan", plan_id))?;
        actor.require_owner(found.user_id)?;
        Ok(found)
    }

    #[instrument(skip_all, fields(user_id = actor.user_id))]
    pub async fn create_plan(
        &self,
        actor: &Actor,
        title: &str,
        deadline: NaiveDateTime,
        content: &str,
    ) -> Result<StudyPlan, CoreError> {
        let title = validate_title(title)?;
        let created =
            study_plan::Mutation::create_plan(&self.db, actor.user_id, title, content.to_owned(), deadline).await?;

        self.audit
            .record(actor, &format!("created study plan {}", created.id))
            .await;
        Ok(created)
    }

    #[instrument(skip_all, fields(user_id = actor.user_id, plan_id = plan_id))]
    pub async fn update_plan(
        &self,
        actor: &Actor,
        plan_id: i32,
        title: &str,
        content: &str,
        deadline: NaiveDateTime,
    ) -> Result<StudyPlan, CoreError> {
        let title = validate_title(title)?;
        self.require_owned(actor, plan_id).await?;
        let updated = study_plan::Mutation::update_plan(&self.db, plan_id, title, content.to_owned(), deadline).await?;

        self.audit
            .record(actor, &format!("updated study plan {plan_id}"))
            .await;
        Ok(updated)
    }

    async fn set_status(&self, actor: &Actor, plan_id: i32, status: PlanStatus) -> Result<StudyPlan, CoreError> {
        let found = self.require_owned(actor, plan_id).await?;
        if found.status == status {
            return Ok(found);
        }
        let updated = study_plan::Mutation::set_status(&self.db, plan_id, status).await?;

        self.audit
            .record(actor, &format!("set study plan {plan_id} to {status:?}"))
            .await;
        Ok(updated)
    }

    #[instrument(skip_all, fields(user_id = actor.user_id, plan_id = plan_id))]
    pub async fn mark_done(&self, actor: &Actor, plan_id: i32) -> Result<StudyPlan, CoreError> {
        self.set_status(actor, plan_id, PlanStatus::Done).await
    }

    #[instrument(skip_all, fields(user_id = actor.user_id, plan_id = plan_id))]
    pub async fn reopen(&self, actor: &Actor, plan_id: i32) -> Result<StudyPlan, CoreError> {
        self.set_status(actor, plan_id, PlanStatus::Open).await
    }

    #[instrument(skip_all, fields(user_id = actor.user_id, plan_id = plan_id))]
    pub async fn delete_plan(&self, actor: &Actor, plan_id: i32) -> Result<(), CoreError> {
        self.require_owned(actor, plan_id).await?;
        study_plan::Mutation::delete(&self.db, plan_id).await?;

        self.audit
            .record(actor, &format!("deleted study plan {plan_id}"))
            .await;
        Ok(())
    }

    /// Open plans first, each group ordered by deadline.
    pub async fn list_for_user(&self, user_id: i32) -> Result<Vec<StudyPlan>, CoreError> {
        Ok(study_plan::Query::list_for_user(&self.db, user_id).await?)
    }

    /// The next `limit` open plans by deadline.
    pub async fn upcoming(&self, user_id: i32, limit: u64) -> Result<Vec<StudyPlan>, CoreError> {
        Ok(study_plan::Query::upcoming_for_user(&self.db, user_id, limit).await?)
    }
}
