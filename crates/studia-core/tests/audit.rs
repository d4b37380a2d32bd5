mod common;

use crate::common::{create_actor, setup_db};
use chrono::{Duration, Utc};
use sea_orm::ConnectionTrait;
use studia_core::audit::AuditLog;
use studia_core::error::CoreError;
use studia_core::ledger::AcademicLedger;
use studia_core::notification::Notifications;
use studia_core::plan::PlanningLog;
use studia_core::skill::SkillTracker;
use studia_entity::user::Role;
use test_log::test;

#[test(tokio::test)]
async fn test_mutations_are_audited() {
    let db = setup_db().await;
    let audit = AuditLog::new(db.clone());
    let ledger = AcademicLedger::new(db.clone());
    let admin = create_actor(&db, "admin", Role::Admin).await;
    let teacher = create_actor(&db, "teacher", Role::Teacher).await;
    let student = create_actor(&db, "student", Role::Student).await;

    let course = ledger.create_course(&teacher, "Compilers", 5.0, None).await.unwrap();
    let enrollment = ledger.enroll(&student, student.user_id, course.id).await.unwrap();
    ledger.record_score(&teacher, enrollment.id, 88.0).await.unwrap();

    let recent = audit.recent(&admin, 10).await.unwrap();
    assert_eq!(recent.len(), 3);
    assert!(recent[0].action.starts_with("recorded score 88"));
    assert_eq!(recent[0].user_id, Some(teacher.user_id));
    assert_eq!(recent[0].ip_address.as_deref(), Some("127.0.0.1"));

    let by_student = audit.for_user(&admin, student.user_id).await.unwrap();
    assert_eq!(by_student.len(), 1);
    assert!(by_student[0].action.starts_with("enrolled student"));

    assert_eq!(audit.recent(&admin, 1).await.unwrap().len(), 1);
    assert!(matches!(audit.recent(&teacher, 10).await, Err(CoreError::Auth(_))));
}

#[test(tokio::test)]
async fn test_audit_failure_does_not_fail_mutation() {
    let db = setup_db().await;
    let ledger = AcademicLedger::new(db.clone());
    let teacher = create_actor(&db, "teacher", Role::Teacher).await;
    let student = create_actor(&db, "student", Role::Student).await;
    let course = ledger.create_course(&teacher, "Compilers", 5.0, None).await.unwrap();

    db.execute_unprepared("DROP TABLE system_log").await.unwrap();

    let enrollment = ledger.enroll(&student, student.user_id, course.id).await.unwrap();
    assert_eq!(enrollment.course_id, course.id);
    assert_eq!(ledger.list_enrollments_for_student(student.user_id).await.unwrap().len(), 1);
}

#[test(tokio::test)]
async fn test_plan_skill_and_mailbox_changes_are_audited() {
    let db = setup_db().await;
    let audit = AuditLog::new(db.clone());
    let plans = PlanningLog::new(db.clone());
    let skills = SkillTracker::new(db.clone());
    let notifications = Notifications::new(db.clone());
    let admin = create_actor(&db, "admin", Role::Admin).await;
    let student = create_actor(&db, "student", Role::Student).await;
    let deadline = Utc::now().naive_utc() + Duration::days(3);

    let plan = plans.create_plan(&student, "Revise", deadline, "").await.unwrap();
    plans
        .update_plan(&student, plan.id, "Revise chapter 2", "", deadline)
        .await
        .unwrap();
    plans.delete_plan(&student, plan.id).await.unwrap();

    let skill = skills
        .create_skill(&student, student.user_id, "rust", 1, 3, false)
        .await
        .unwrap();
    skills.set_visibility(&student, skill.id, true).await.unwrap();

    let sent = notifications
        .send(Some(&admin), student.user_id, "Welcome", "Hello")
        .await
        .unwrap();
    notifications.reply(&student, sent.id, "Thanks").await.unwrap();
    notifications.mark_read(sent.id, &student).await.unwrap();
    notifications.clear_read(&student).await.unwrap();
    notifications.clear_all(&admin).await.unwrap();

    let actions: Vec<String> = audit
        .for_user(&admin, student.user_id)
        .await
        .unwrap()
        .into_iter()
        .map(|entry| entry.action)
        .collect();
    let expected = [
        format!("created study plan {}", plan.id),
        format!("updated study plan {}", plan.id),
        format!("deleted study plan {}", plan.id),
        format!("created skill rust ({})", skill.id),
        format!("made skill {} public", skill.id),
        format!("read notification {}", sent.id),
        "cleared 1 read notifications".to_owned(),
    ];
    for action in &expected {
        assert!(actions.contains(action), "{action} missing from {actions:?}");
    }
    assert!(actions.iter().any(|action| action.starts_with("sent notification")));

    let by_admin = audit.for_user(&admin, admin.user_id).await.unwrap();
    let sent_action = format!("sent notification {} to user {}", sent.id, student.user_id);
    assert!(by_admin.iter().any(|entry| entry.action == sent_action));
    assert!(by_admin.iter().any(|entry| entry.action == "cleared all 1 notifications"));
}
