mod common;

use crate::common::setup_db;
use crate::common::user::create_test_user;
use paste::paste;
use studia_db::skill::NewSkill;
use studia_db::{skill, skill_record};
use studia_entity::user::Role;
use test_log::test;

fn new_skill(user_id: i32, name: &str) -> NewSkill {
    NewSkill {
        user_id,
        name: name.to_owned(),
        current_level: 1,
        target_level: 3,
        is_public: false,
    }
}

macro_rules! test_set_skill_field {
    ($i:ident, $v:expr) => {
        paste! {
            #[test(tokio::test)]
            async fn [<test_update_skill_ $i>]() {
                let db = &setup_db().await;

                let owner = create_test_user(db, "owner", Role::Student).await;
                let created = skill::Mutation::create_skill(db, new_skill(owner.id, "rust")).await.unwrap();

                skill::Mutation::[<update_skill_ $i>](db, created.id, $v).await.unwrap();

                let found = skill::Query::find_by_id(db, created.id).await.unwrap().unwrap();
                assert_eq!(found.$i, $v);
            }
        }
    };
}

test_set_skill_field!(name, "sql".to_owned());
test_set_skill_field!(current_level, 4);
test_set_skill_field!(target_level, 5);
test_set_skill_field!(is_public, true);

#[test(tokio::test)]
async fn test_level_out_of_range_is_rejected() {
    let db = &setup_db().await;

    let owner = create_test_user(db, "owner", Role::Student).await;
    let created = skill::Mutation::create_skill(db, new_skill(owner.id, "rust")).await.unwrap();

    assert!(skill::Mutation::update_skill_current_level(db, created.id, 6).await.is_err());
    assert!(skill::Mutation::update_skill_current_level(db, created.id, 0).await.is_err());
}

#[test(tokio::test)]
async fn test_skill_name_unique_per_user() {
    let db = &setup_db().await;

    let first = create_test_user(db, "first", Role::Student).await;
    let second = create_test_user(db, "second", Role::Student).await;
    skill::Mutation::create_skill(db, new_skill(first.id, "rust")).await.unwrap();

    assert!(skill::Mutation::create_skill(db, new_skill(first.id, "rust")).await.is_err());
    skill::Mutation::create_skill(db, new_skill(second.id, "rust")).await.unwrap();
}

#[test(tokio::test)]
async fn test_total_hours() {
    let db = &setup_db().await;

    let owner = create_test_user(db, "owner", Role::Student).await;
    let created = skill::Mutation::create_skill(db, new_skill(owner.id, "rust")).await.unwrap();
    skill_record::Mutation::create_record(db, created.id, owner.id, "borrowck".to_owned(), 1.5)
        .await
        .unwrap();
    skill_record::Mutation::create_record(db, created.id, owner.id, "traits".to_owned(), 2.0)
        .await
        .unwrap();

    let total = skill_record::Query::total_hours(db, created.id).await.unwrap();
    assert!((total - 3.5).abs() < f64::EPSILON);

    skill::Mutation::delete(db, created.id).await.unwrap();
    assert!(skill_record::Query::list_for_skill(db, created.id).await.unwrap().is_empty());
}
