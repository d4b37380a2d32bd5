mod common;

use crate::common::setup_db;
use crate::common::user::create_test_user;
use studia_db::{course, feedback, user};
use studia_entity::user::Role;
use test_log::test;

#[test(tokio::test)]
async fn test_feedback_outlives_course_but_not_author() {
    let db = &setup_db().await;
    let teacher = create_test_user(db, "teacher", Role::Teacher).await;
    let student = create_test_user(db, "student", Role::Student).await;
    let created_course = course::Mutation::create_course(db, "Logic".to_owned(), 2.0, None, Some(teacher.id))
        .await
        .unwrap();

    feedback::Mutation::create_feedback(db, student.id, None, "general".to_owned())
        .await
        .unwrap();
    let about_course =
        feedback::Mutation::create_feedback(db, student.id, Some(created_course.id), "about logic".to_owned())
            .await
            .unwrap();

    let listed = feedback::Query::list_for_user(db, student.id).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, about_course.id);

    course::Mutation::delete(db, created_course.id).await.unwrap();
    let listed = feedback::Query::list_for_user(db, student.id).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert!(listed.iter().all(|entry| entry.course_id.is_none()));

    user::Mutation::delete(db, student.id).await.unwrap();
    assert!(feedback::Query::list_all(db).await.unwrap().is_empty());
}
