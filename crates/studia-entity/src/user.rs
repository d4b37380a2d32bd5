use chrono::NaiveDateTime;
use sea_orm::entity::prelude::*;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "i16", db_type = "Integer")]
pub enum Role {
    Student = 0,
    Teacher = 1,
    Admin = 2,
}

/// Operations that are not implied by owning the record they touch.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Capability {
    ManageCourses,
    RecordScores,
    ReviewCertificates,
    EnrollOthers,
    ManageUsers,
    ManageAnyRecord,
    ViewAuditLog,
}

impl Role {
    #[must_use]
    pub fn allows(self, capability: Capability) -> bool {
        match capability {
            Capability::ManageCourses | Capability::RecordScores | Capability::ReviewCertificates => {
                matches!(self, Role::Teacher | Role::Admin)
            }
            Capability::EnrollOthers
            | Capability::ManageUsers
            | Capability::ManageAnyRecord
            | Capability::ViewAuditLog => self == Role::Admin,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    pub role: Role,
    pub credential_hash: String,
    pub created_at: NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::teacher::Entity")]
    Teacher,
    #[sea_orm(has_many = "super::enrollment::Entity")]
    Enrollment,
    #[sea_orm(has_many = "super::skill::Entity")]
    Skill,
    #[sea_orm(has_many = "super::study_plan::Entity")]
    StudyPlan,
    #[sea_orm(has_many = "super::certificate::Entity")]
    Certificate,
    #[sea_orm(has_many = "super::notification::Entity")]
    Notification,
    #[sea_orm(has_many = "super::feedback::Entity")]
    Feedback,
}

impl Related<super::teacher::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teacher.def()
    }
}

impl Related<super::enrollment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollment.def()
    }
}

impl Related<super::skill::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Skill.def()
    }
}

impl Related<super::study_plan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StudyPlan.def()
    }
}

impl Related<super::certificate::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Certificate.def()
    }
}

impl Related<super::feedback::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Feedback.def()
    }
}

impl Related<super::notification::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Notification.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn students_hold_no_capability() {
        for capability in [
            Capability::ManageCourses,
            Capability::RecordScores,
            Capability::ReviewCertificates,
            Capability::EnrollOthers,
            Capability::ManageUsers,
            Capability::ManageAnyRecord,
            Capability::ViewAuditLog,
        ] {
            assert!(!Role::Student.allows(capability), "{capability:?}");
            assert!(Role::Admin.allows(capability), "{capability:?}");
        }
    }

    #[test]
    fn teachers_review_but_do_not_administrate() {
        assert!(Role::Teacher.allows(Capability::ReviewCertificates));
        assert!(Role::Teacher.allows(Capability::RecordScores));
        assert!(!Role::Teacher.allows(Capability::ManageUsers));
        assert!(!Role::Teacher.allows(Capability::ViewAuditLog));
    }
}
