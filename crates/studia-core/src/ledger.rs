use crate::actor::Actor;
use crate::audit::AuditLog;
use crate::error::{CoreError, not_found, validation};
use sea_orm::{DatabaseConnection, TransactionTrait};
use studia_db::course::CourseChanges;
use studia_db::util::FlattenTransactionResultExt;
use studia_db::{course, enrollment, user};
use studia_entity::course::Model as Course;
use studia_entity::enrollment::Model as Enrollment;
use studia_entity::user::{Capability, Role};
use tracing::instrument;

pub const PASSING_SCORE: f64 = 60.0;
pub const MAX_SCORE: f64 = 100.0;

/// Grade point of a 0-100 score: 0.0 below 60 (or without a score),
/// otherwise 1.0 at 60 rising linearly to 5.0 at 100.
#[must_use]
pub fn grade_point(score: Option<f64>) -> f64 {
    match score {
        Some(score) if score >= PASSING_SCORE => 1.0 + (score - PASSING_SCORE) * 0.1,
        _ => 0.0,
    }
}

/// Credit weighted mean grade point over `(credit, score)` pairs.
///
/// Unscored entries are skipped. Returns 0.0 when nothing is scored.
#[must_use]
pub fn weighted_gpa(entries: impl IntoIterator<Item = (f64, Option<f64>)>) -> f64 {
    let (points, credits) = entries
        .into_iter()
        .filter(|(_, score)| score.is_some())
        .fold((0.0, 0.0), |(points, credits), (credit, score)| {
            (points + credit * grade_point(score), credits + credit)
        });
    if credits > 0.0 { points / credits } else { 0.0 }
}

fn validate_score(score: f64) -> Result<f64, CoreError> {
    if (0.0..=MAX_SCORE).contains(&score) {
        Ok(score)
    } else {
        Err(validation(format!("score {score} is outside of 0 to {MAX_SCORE}")))
    }
}

fn validate_credit(credit: f64) -> Result<f64, CoreError> {
    if credit.is_finite() && credit > 0.0 {
        Ok(credit)
    } else {
        Err(validation(format!("credit {credit} must be positive")))
    }
}

fn validate_name(name: &str) -> Result<String, CoreError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(validation("course name must not be empty"));
    }
    Ok(name.to_owned())
}

#[derive(Clone, Debug, PartialEq)]
pub struct TranscriptLine {
    pub enrollment: Enrollment,
    pub course: Course,
    pub grade_point: f64,
}

/// Courses, enrollments and grades.
#[derive(Clone, Debug)]
pub struct AcademicLedger {
    db: DatabaseConnection,
    audit: AuditLog,
}

impl AcademicLedger {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        let audit = AuditLog::new(db.clone());
        Self { db, audit }
    }

    async fn require_course(&self, course_id: i32) -> Result<Course, CoreError> {
        course::Query::find_by_id(&self.db, course_id)
            .await?
            .ok_or_else(|| not_found("course", course_id))
    }

    /// Only the course's own teacher or an admin may change it.
    fn require_course_owner(actor: &Actor, course: &Course) -> Result<(), CoreError> {
        actor.require(Capability::ManageCourses)?;
        if actor.role == Role::Admin || course.teacher_id == Some(actor.user_id) {
            Ok(())
        } else {
            Err(CoreError::Auth(format!("user {} does not teach course {}", actor.user_id, course.id)))
        }
    }

    #[instrument(skip_all, fields(user_id = actor.user_id))]
    pub async fn create_course(
        &self,
        actor: &Actor,
        name: &str,
        credit: f64,
        description: Option<String>,
    ) -> Result<Course, CoreError> {
        actor.require(Capability::ManageCourses)?;
        let name = validate_name(name)?;
        let credit = validate_credit(credit)?;

        let created = course::Mutation::create_course(&self.db, name, credit, description, Some(actor.user_id)).await?;

        self.audit
            .record(actor, &format!("created course {} ({})", created.name, created.id))
            .await;
        Ok(created)
    }

    /// Applies `changes`. Reassigning the teacher is reserved to admins and
    /// the new teacher must hold the teacher role.
    #[instrument(skip_all, fields(user_id = actor.user_id, course_id = course_id))]
    pub async fn update_course(
        &self,
        actor: &Actor,
        course_id: i32,
        mut changes: CourseChanges,
    ) -> Result<Course, CoreError> {
        let existing = self.require_course(course_id).await?;
        Self::require_course_owner(actor, &existing)?;

        changes.name = changes.name.as_deref().map(validate_name).transpose()?;
        changes.credit = changes.credit.map(validate_credit).transpose()?;
        if let Some(teacher_id) = changes.teacher_id {
            actor.require(Capability::ManageUsers)?;
            if let Some(teacher_id) = teacher_id {
                let teacher = user::Query::find_user_by_id(&self.db, teacher_id)
                    .await?
                    .ok_or_else(|| not_found("user", teacher_id))?;
                if teacher.role != Role::Teacher {
                    return Err(validation(format!("user {teacher_id} is not a teacher")));
                }
            }
        }

        let updated = course::Mutation::update_course(&self.db, course_id, changes).await?;

        self.audit.record(actor, &format!("updated course {course_id}")).await;
        Ok(updated)
    }

    /// Removes a course together with its enrollments.
    #[instrument(skip_all, fields(user_id = actor.user_id, course_id = course_id))]
    pub async fn delete_course(&self, actor: &Actor, course_id: i32) -> Result<(), CoreError> {
        let existing = self.require_course(course_id).await?;
        Self::require_course_owner(actor, &existing)?;

        course::Mutation::delete(&self.db, course_id).await?;

        self.audit
            .record(actor, &format!("deleted course {} ({course_id})", existing.name))
            .await;
        Ok(())
    }

    pub async fn list_courses(&self) -> Result<Vec<Course>, CoreError> {
        Ok(course::Query::list_all(&self.db).await?)
    }

    pub async fn list_courses_taught_by(&self, teacher_id: i32) -> Result<Vec<Course>, CoreError> {
        Ok(course::Query::list_taught_by(&self.db, teacher_id).await?)
    }

    /// Enrolls `student_id` with no score. Students may only enroll themselves.
    #[instrument(skip_all, fields(user_id = actor.user_id, student_id = student_id, course_id = course_id))]
    pub async fn enroll(&self, actor: &Actor, student_id: i32, course_id: i32) -> Result<Enrollment, CoreError> {
        actor.require_owner_or(student_id, Capability::EnrollOthers)?;

        let created = self
            .db
            .transaction(|txn| {
                Box::pin(async move {
                    let student = user::Query::find_user_by_id(txn, student_id)
                        .await?
                        .ok_or_else(|| not_found("user", student_id))?;
                    if student.role != Role::Student {
                        return Err(validation(format!("user {student_id} is not a student")));
                    }
                    course::Query::find_by_id(txn, course_id)
                        .await?
                        .ok_or_else(|| not_found("course", course_id))?;
                    if enrollment::Query::find_for_student_and_course(txn, student_id, course_id)
                        .await?
                        .is_some()
                    {
                        return Err(validation(format!(
                            "student {student_id} is already enrolled in course {course_id}"
                        )));
                    }
                    Ok(enrollment::Mutation::create_enrollment(txn, student_id, course_id).await?)
                })
            })
            .await
            .flatten_res()?;

        self.audit
            .record(actor, &format!("enrolled student {student_id} in course {course_id}"))
            .await;
        Ok(created)
    }

    #[instrument(skip_all, fields(user_id = actor.user_id, enrollment_id = enrollment_id))]
    pub async fn unenroll(&self, actor: &Actor, enrollment_id: i32) -> Result<(), CoreError> {
        let existing = enrollment::Query::find_by_id(&self.db, enrollment_id)
            .await?
            .ok_or_else(|| not_found("enrollment", enrollment_id))?;
        actor.require_owner_or(existing.student_id, Capability::EnrollOthers)?;

        enrollment::Mutation::delete(&self.db, enrollment_id).await?;

        self.audit
            .record(
                actor,
                &format!("unenrolled student {} from course {}", existing.student_id, existing.course_id),
            )
            .await;
        Ok(())
    }

    /// Sets the score of an enrollment. Allowed for the course's teacher and
    /// for admins.
    #[instrument(skip_all, fields(user_id = actor.user_id, enrollment_id = enrollment_id))]
    pub async fn record_score(&self, actor: &Actor, enrollment_id: i32, score: f64) -> Result<Enrollment, CoreError> {
        actor.require(Capability::RecordScores)?;
        let score = validate_score(score)?;

        let existing = enrollment::Query::find_by_id(&self.db, enrollment_id)
            .await?
            .ok_or_else(|| not_found("enrollment", enrollment_id))?;
        let course = self.require_course(existing.course_id).await?;
        Self::require_course_owner(actor, &course)?;

        let updated = enrollment::Mutation::set_score(&self.db, enrollment_id, Some(score)).await?;

        self.audit
            .record(
                actor,
                &format!("recorded score {score} for student {} in course {}", updated.student_id, course.id),
            )
            .await;
        Ok(updated)
    }

    pub async fn compute_gpa(&self, student_id: i32) -> Result<f64, CoreError> {
        let rows = enrollment::Query::list_for_student_with_course(&self.db, student_id).await?;
        Ok(weighted_gpa(
            rows.iter().map(|(enrollment, course)| (course.credit, enrollment.score)),
        ))
    }

    pub async fn list_enrollments_for_student(&self, student_id: i32) -> Result<Vec<Enrollment>, CoreError> {
        Ok(enrollment::Query::list_for_student(&self.db, student_id).await?)
    }

    pub async fn list_enrollments_for_course(&self, course_id: i32) -> Result<Vec<Enrollment>, CoreError> {
        Ok(enrollment::Query::list_for_course(&self.db, course_id).await?)
    }

    pub async fn transcript(&self, student_id: i32) -> Result<Vec<TranscriptLine>, CoreError> {
        let rows = enrollment::Query::list_for_student_with_course(&self.db, student_id).await?;
        Ok(rows
            .into_iter()
            .map(|(enrollment, course)| TranscriptLine {
                grade_point: grade_point(enrollment.score),
                enrollment,
                course,
            })
            .collect())
    }
}
