mod common;

use crate::common::{create_actor, setup_db, stored_files, test_config};
use sea_orm::{Database, EntityTrait, PaginatorTrait};
use studia_core::actor::Actor;
use studia_core::certificate::{CertificateUpload, CertificateWorkflow, ReviewDecision};
use studia_core::error::CoreError;
use studia_db::schema::setup_schema;
use studia_db::{notification, user};
use studia_entity::certificate::{self, CertificateStatus};
use studia_entity::user::Role;
use studia_test_helpers::{SqliteDb, TestDb};
use studia_utils::store::Store;
use studia_utils::store::file_system::FileSystemStore;
use tempfile::TempDir;
use test_log::test;

fn workflow(db: &sea_orm::DatabaseConnection, dir: &TempDir) -> CertificateWorkflow {
    let store = Store::FileSystem(FileSystemStore::new(dir.path().to_path_buf()));
    CertificateWorkflow::new(db.clone(), store, test_config("file:///unused"))
}

fn pdf(name: &str) -> CertificateUpload {
    CertificateUpload {
        filename: name.to_owned(),
        description: Some("first prize".to_owned()),
        content: b"%PDF-1.7 award".to_vec(),
    }
}

#[test(tokio::test)]
async fn test_upload_creates_pending_certificate() {
    let db = setup_db().await;
    let dir = TempDir::new().unwrap();
    let workflow = workflow(&db, &dir);
    let admin = create_actor(&db, "admin", Role::Admin).await;
    let student = create_actor(&db, "student", Role::Student).await;

    let created = workflow.upload(&student, pdf("Award.PDF")).await.unwrap();

    assert_eq!(created.status, CertificateStatus::Pending);
    assert_eq!(created.filename, "Award.PDF");
    assert_eq!(created.reviewer_id, None);
    assert_eq!(created.review_time, None);
    assert!(created.file_path.starts_with(&format!("{}/", student.user_id)));
    assert!(created.file_path.ends_with(".pdf"));
    assert_ne!(created.file_path, created.filename);
    assert_eq!(stored_files(&dir), 1);

    let inbox = notification::Query::list_for_recipient(&db, admin.user_id).await.unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].sender_id, Some(student.user_id));

    let (opened, content) = workflow.open(&student, created.id).await.unwrap();
    assert_eq!(opened.id, created.id);
    assert_eq!(content, b"%PDF-1.7 award");
}

#[test(tokio::test)]
async fn test_upload_rejects_disallowed_extension() {
    let db = setup_db().await;
    let dir = TempDir::new().unwrap();
    let workflow = workflow(&db, &dir);
    let student = create_actor(&db, "student", Role::Student).await;

    for name in ["setup.exe", "noextension"] {
        let res = workflow.upload(&student, pdf(name)).await;
        assert!(matches!(res, Err(CoreError::Validation(_))), "{name}");
    }

    let empty = CertificateUpload {
        content: Vec::new(),
        ..pdf("empty.pdf")
    };
    assert!(matches!(workflow.upload(&student, empty).await, Err(CoreError::Validation(_))));

    assert_eq!(certificate::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(stored_files(&dir), 0);
}

#[test(tokio::test)]
async fn test_failed_insert_removes_blob() {
    let db = setup_db().await;
    let dir = TempDir::new().unwrap();
    let workflow = workflow(&db, &dir);
    let ghost = Actor::new(4711, Role::Student);

    let res = workflow.upload(&ghost, pdf("award.pdf")).await;

    assert!(matches!(res, Err(CoreError::NotFound(_))));
    assert_eq!(stored_files(&dir), 0);
}

#[test(tokio::test)]
async fn test_review_notifies_owner() {
    let db = setup_db().await;
    let dir = TempDir::new().unwrap();
    let workflow = workflow(&db, &dir);
    let teacher = create_actor(&db, "teacher", Role::Teacher).await;
    let student = create_actor(&db, "student", Role::Student).await;
    let created = workflow.upload(&student, pdf("award.pdf")).await.unwrap();

    let reviewed = workflow
        .review(created.id, &teacher, ReviewDecision::Approve, Some("well done".to_owned()))
        .await
        .unwrap();

    assert_eq!(reviewed.status, CertificateStatus::Approved);
    assert_eq!(reviewed.reviewer_id, Some(teacher.user_id));
    assert!(reviewed.review_time.is_some());
    assert_eq!(reviewed.review_notes.as_deref(), Some("well done"));

    let inbox = notification::Query::list_for_recipient(&db, student.user_id).await.unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].sender_id, Some(teacher.user_id));
    assert_eq!(inbox[0].content, "well done");
    assert!(!inbox[0].is_read);

    let res = workflow.review(created.id, &teacher, ReviewDecision::Reject, None).await;
    assert!(matches!(res, Err(CoreError::InvalidState(_))));

    let found = workflow.find(created.id).await.unwrap();
    assert_eq!(found.status, CertificateStatus::Approved);
    assert_eq!(notification::Query::list_for_recipient(&db, student.user_id).await.unwrap().len(), 1);
}

#[test(tokio::test)]
async fn test_rejection_without_notes_uses_generic_message() {
    let db = setup_db().await;
    let dir = TempDir::new().unwrap();
    let workflow = workflow(&db, &dir);
    let admin = create_actor(&db, "admin", Role::Admin).await;
    let student = create_actor(&db, "student", Role::Student).await;
    let created = workflow.upload(&student, pdf("award.pdf")).await.unwrap();

    let reviewed = workflow
        .review(created.id, &admin, ReviewDecision::Reject, Some("   ".to_owned()))
        .await
        .unwrap();
    assert_eq!(reviewed.status, CertificateStatus::Rejected);
    assert_eq!(reviewed.review_notes, None);

    let inbox = notification::Query::list_for_recipient(&db, student.user_id).await.unwrap();
    assert_eq!(inbox[0].title, "Certificate rejected");
    assert!(inbox[0].content.contains("award.pdf"));

    let rejected = workflow.list_by_status(CertificateStatus::Rejected).await.unwrap();
    assert_eq!(rejected.len(), 1);
    assert!(workflow.list_by_status(CertificateStatus::Pending).await.unwrap().is_empty());
}

#[test(tokio::test)]
async fn test_review_permissions() {
    let db = setup_db().await;
    let dir = TempDir::new().unwrap();
    let workflow = workflow(&db, &dir);
    let teacher = create_actor(&db, "teacher", Role::Teacher).await;
    let student = create_actor(&db, "student", Role::Student).await;
    let other = create_actor(&db, "other", Role::Student).await;
    let created = workflow.upload(&student, pdf("award.pdf")).await.unwrap();

    let res = workflow.review(created.id, &student, ReviewDecision::Approve, None).await;
    assert!(matches!(res, Err(CoreError::Auth(_))));

    let res = workflow.review(4711, &teacher, ReviewDecision::Approve, None).await;
    assert!(matches!(res, Err(CoreError::NotFound(_))));

    assert!(matches!(workflow.open(&other, created.id).await, Err(CoreError::Auth(_))));
    assert!(workflow.open(&teacher, created.id).await.is_ok());
}

#[test(tokio::test)]
async fn test_owner_cannot_review_own_certificate() {
    let db = setup_db().await;
    let dir = TempDir::new().unwrap();
    let workflow = workflow(&db, &dir);
    let teacher = create_actor(&db, "teacher", Role::Teacher).await;
    let created = workflow.upload(&teacher, pdf("mine.pdf")).await.unwrap();

    let res = workflow.review(created.id, &teacher, ReviewDecision::Approve, None).await;
    assert!(matches!(res, Err(CoreError::Auth(_))));

    let found = workflow.find(created.id).await.unwrap();
    assert_eq!(found.status, CertificateStatus::Pending);
    assert_eq!(found.reviewer_id, None);
    assert!(notification::Query::list_for_recipient(&db, teacher.user_id).await.unwrap().is_empty());
}

#[test(tokio::test)]
async fn test_review_marks_reviewers_pending_message_read() {
    let db = setup_db().await;
    let dir = TempDir::new().unwrap();
    let workflow = workflow(&db, &dir);
    let reviewer = create_actor(&db, "reviewer", Role::Admin).await;
    let other_admin = create_actor(&db, "other_admin", Role::Admin).await;
    let student = create_actor(&db, "student", Role::Student).await;
    let reviewed = workflow.upload(&student, pdf("first.pdf")).await.unwrap();
    let untouched = workflow.upload(&student, pdf("second.pdf")).await.unwrap();
    assert_eq!(notification::Query::unread_count(&db, reviewer.user_id).await.unwrap(), 2);

    workflow
        .review(reviewed.id, &reviewer, ReviewDecision::Approve, None)
        .await
        .unwrap();

    let inbox = notification::Query::list_for_recipient(&db, reviewer.user_id).await.unwrap();
    let unread: Vec<_> = inbox.iter().filter(|message| !message.is_read).collect();
    assert_eq!(unread.len(), 1);
    assert!(unread[0].content.contains("second.pdf"));
    assert_eq!(workflow.find(untouched.id).await.unwrap().status, CertificateStatus::Pending);

    assert_eq!(notification::Query::unread_count(&db, other_admin.user_id).await.unwrap(), 2);
}

#[test(tokio::test)]
async fn test_delete_removes_row_and_blob() {
    let db = setup_db().await;
    let dir = TempDir::new().unwrap();
    let workflow = workflow(&db, &dir);
    let student = create_actor(&db, "student", Role::Student).await;
    let other = create_actor(&db, "other", Role::Student).await;
    let created = workflow.upload(&student, pdf("award.pdf")).await.unwrap();

    assert!(matches!(workflow.delete(&other, created.id).await, Err(CoreError::Auth(_))));

    workflow.delete(&student, created.id).await.unwrap();

    assert!(workflow.list_for_owner(student.user_id).await.unwrap().is_empty());
    assert_eq!(stored_files(&dir), 0);
}

#[test(tokio::test)]
async fn test_concurrent_reviews_only_one_wins() {
    let test_db = SqliteDb::new().unwrap();
    let db = Database::connect(test_db.db_uri().into_owned()).await.unwrap();
    setup_schema(&db).await.unwrap();
    let dir = TempDir::new().unwrap();
    let workflow = workflow(&db, &dir);

    let first = create_actor(&db, "first", Role::Teacher).await;
    let second = create_actor(&db, "second", Role::Admin).await;
    let student = create_actor(&db, "student", Role::Student).await;
    let created = workflow.upload(&student, pdf("award.pdf")).await.unwrap();

    let (approve, reject) = tokio::join!(
        workflow.review(created.id, &first, ReviewDecision::Approve, None),
        workflow.review(created.id, &second, ReviewDecision::Reject, None),
    );

    let (winner, loser) = match (approve, reject) {
        (Ok(reviewed), Err(error)) | (Err(error), Ok(reviewed)) => (reviewed, error),
        other => panic!("expected exactly one successful review, got {other:?}"),
    };
    assert!(matches!(loser, CoreError::InvalidState(_)));

    let found = workflow.find(created.id).await.unwrap();
    assert_eq!(found.status, winner.status);
    assert_eq!(found.reviewer_id, winner.reviewer_id);
    assert!(found.review_time.is_some());

    let owner = user::Query::find_user_by_id(&db, student.user_id).await.unwrap().unwrap();
    let inbox = notification::Query::list_for_recipient(&db, owner.id).await.unwrap();
    assert_eq!(inbox.len(), 1);
}
