use crate::actor::Actor;
use crate::audit::AuditLog;
use crate::error::{CoreError, not_found, validation};
use sea_orm::DatabaseConnection;
use studia_db::skill::NewSkill;
use studia_db::{skill, skill_record, user};
use studia_entity::skill::{MAX_LEVEL, MIN_LEVEL, Model as Skill};
use studia_entity::skill_record::Model as SkillRecord;
use studia_entity::user::Capability;
use tracing::instrument;

pub fn validate_level(level: i32) -> Result<i32, CoreError> {
    if (MIN_LEVEL..=MAX_LEVEL).contains(&level) {
        Ok(level)
    } else {
        Err(validation(format!("level {level} is outside of {MIN_LEVEL} to {MAX_LEVEL}")))
    }
}

fn validate_hours(hours: f64) -> Result<f64, CoreError> {
    if hours.is_finite() && hours >= 0.0 {
        Ok(hours)
    } else {
        Err(validation(format!("hours {hours} must not be negative")))
    }
}

fn validate_name(name: &str) -> Result<&str, CoreError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(validation("skill name must not be empty"));
    }
    Ok(name)
}

/// Self assessed skills and the practice logged against them.
#[derive(Clone, Debug)]
pub struct SkillTracker {
    db: DatabaseConnection,
    audit: AuditLog,
}

impl SkillTracker {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        let audit = AuditLog::new(db.clone());
        Self { db, audit }
    }

    /// Loads a skill the actor may change: their own, or any for admins.
    async fn require_mutable(&self, actor: &Actor, skill_id: i32) -> Result<Skill, CoreError> {
        let found = skill::Query::find_by_id(&self.db, skill_id)
            .await?
            .ok_or_else(|| not_found("skill", skill_id))?;
        actor.require_owner_or(found.user_id, Capability::ManageAnyRecord)?;
        Ok(found)
    }

    /// Loads a skill `viewer` may look at. Private skills are only visible
    /// to their owner and to admins.
    async fn require_visible(&self, viewer: &Actor, skill_id: i32) -> Result<Skill, CoreError> {
        let found = skill::Query::find_by_id(&self.db, skill_id)
            .await?
            .ok_or_else(|| not_found("skill", skill_id))?;
        if !found.is_public {
            viewer.require_owner_or(found.user_id, Capability::ManageAnyRecord)?;
        }
        Ok(found)
    }

    #[instrument(skip_all, fields(user_id = actor.user_id, owner_id = owner_id))]
    pub async fn create_skill(
        &self,
        actor: &Actor,
        owner_id: i32,
        name: &str,
        current_level: i32,
        target_level: i32,
        is_public: bool,
    ) -> Result<Skill, CoreError> {
        actor.require_owner_or(owner_id, Capability::ManageAnyRecord)?;
        let name = validate_name(name)?;
        let current_level = validate_level(current_level)?;
        let target_level = validate_level(target_level)?;
        user::Query::find_user_by_id(&self.db, owner_id)
            .await?
            .ok_or_else(|| not_found("user", owner_id))?;
        if skill::Query::find_by_name(&self.db, owner_id, name).await?.is_some() {
            return Err(validation(format!("skill {name} already exists")));
        }

        let created = skill::Mutation::create_skill(
            &self.db,
            NewSkill {
                user_id: owner_id,
                name: name.to_owned(),
                current_level,
                target_level,
                is_public,
            },
        )
        .await?;

        self.audit
            .record(actor, &format!("created skill {} ({})", created.name, created.id))
            .await;
        Ok(created)
    }

    /// Renames a skill. Names stay unique per owner.
    #[instrument(skip_all, fields(user_id = actor.user_id, skill_id = skill_id))]
    pub async fn rename(&self, actor: &Actor, skill_id: i32, name: &str) -> Result<Skill, CoreError> {
        let name = validate_name(name)?;
        let found = self.require_mutable(actor, skill_id).await?;
        if found.name == name {
            return Ok(found);
        }
        if skill::Query::find_by_name(&self.db, found.user_id, name).await?.is_some() {
            return Err(validation(format!("skill {name} already exists")));
        }

        let updated = skill::Mutation::update_skill_name(&self.db, found.id, name.to_owned()).await?;

        self.audit
            .record(actor, &format!("renamed skill {skill_id} from {} to {name}", found.name))
            .await;
        Ok(updated)
    }

    /// Sets the current level. Levels outside 1 to 5 are rejected.
    #[instrument(skip_all, fields(user_id = actor.user_id, skill_id = skill_id, level = level))]
    pub async fn set_level(&self, actor: &Actor, skill_id: i32, level: i32) -> Result<Skill, CoreError> {
        let level = validate_level(level)?;
        let found = self.require_mutable(actor, skill_id).await?;

        let updated = skill::Mutation::update_skill_current_level(&self.db, found.id, level).await?;

        self.audit
            .record(
                actor,
                &format!("changed level of skill {skill_id} from {} to {level}", found.current_level),
            )
            .await;
        Ok(updated)
    }

    #[instrument(skip_all, fields(user_id = actor.user_id, skill_id = skill_id, level = level))]
    pub async fn set_target_level(&self, actor: &Actor, skill_id: i32, level: i32) -> Result<Skill, CoreError> {
        let level = validate_level(level)?;
        let found = self.require_mutable(actor, skill_id).await?;

        let updated = skill::Mutation::update_skill_target_level(&self.db, found.id, level).await?;

        self.audit
            .record(actor, &format!("changed target level of skill {skill_id} to {level}"))
            .await;
        Ok(updated)
    }

    #[instrument(skip_all, fields(user_id = actor.user_id, skill_id = skill_id))]
    pub async fn set_visibility(&self, actor: &Actor, skill_id: i32, is_public: bool) -> Result<Skill, CoreError> {
        let found = self.require_mutable(actor, skill_id).await?;
        let updated = skill::Mutation::update_skill_is_public(&self.db, found.id, is_public).await?;

        let visibility = if is_public { "public" } else { "private" };
        self.audit
            .record(actor, &format!("made skill {skill_id} {visibility}"))
            .await;
        Ok(updated)
    }

    /// Deletes a skill with all its records.
    #[instrument(skip_all, fields(user_id = actor.user_id, skill_id = skill_id))]
    pub async fn delete_skill(&self, actor: &Actor, skill_id: i32) -> Result<(), CoreError> {
        let found = self.require_mutable(actor, skill_id).await?;

        skill::Mutation::delete(&self.db, skill_id).await?;

        self.audit
            .record(actor, &format!("deleted skill {} ({skill_id})", found.name))
            .await;
        Ok(())
    }

    /// Logs practice time. Levels stay untouched.
    #[instrument(skip_all, fields(user_id = actor.user_id, skill_id = skill_id))]
    pub async fn add_record(
        &self,
        actor: &Actor,
        skill_id: i32,
        content: &str,
        hours: f64,
    ) -> Result<SkillRecord, CoreError> {
        let hours = validate_hours(hours)?;
        let found = self.require_mutable(actor, skill_id).await?;

        let created =
            skill_record::Mutation::create_record(&self.db, found.id, found.user_id, content.to_owned(), hours).await?;

        self.audit
            .record(actor, &format!("logged {hours} hours on skill {skill_id}"))
            .await;
        Ok(created)
    }

    /// Skills of `owner_id` as seen by `viewer`. Others than the owner and
    /// admins only see public skills.
    pub async fn list_for_user(&self, viewer: &Actor, owner_id: i32) -> Result<Vec<Skill>, CoreError> {
        let skills = skill::Query::list_for_user(&self.db, owner_id).await?;
        if viewer.user_id == owner_id || viewer.can(Capability::ManageAnyRecord) {
            return Ok(skills);
        }
        Ok(skills.into_iter().filter(|skill| skill.is_public).collect())
    }

    /// Records of a skill, newest first. Follows the visibility of the skill.
    pub async fn list_records(&self, viewer: &Actor, skill_id: i32) -> Result<Vec<SkillRecord>, CoreError> {
        let found = self.require_visible(viewer, skill_id).await?;
        Ok(skill_record::Query::list_for_skill(&self.db, found.id).await?)
    }

    pub async fn total_hours(&self, viewer: &Actor, skill_id: i32) -> Result<f64, CoreError> {
        let found = self.require_visible(viewer, skill_id).await?;
        Ok(skill_record::Query::total_hours(&self.db, found.id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_bounds() {
        assert!(matches!(validate_level(0), Err(CoreError::Validation(_))));
        assert!(matches!(validate_level(6), Err(CoreError::Validation(_))));
        for level in 1..=5 {
            assert_eq!(validate_level(level).unwrap(), level);
        }
    }

    #[test]
    fn hours_bounds() {
        assert!(validate_hours(0.0).is_ok());
        assert!(validate_hours(-0.5).is_err());
        assert!(validate_hours(f64::NAN).is_err());
    }
}
