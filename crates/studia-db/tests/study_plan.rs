mod common;

use crate::common::setup_db;
use crate::common::user::create_test_user;
use chrono::{Duration, Utc};
use studia_db::study_plan;
use studia_entity::study_plan::PlanStatus;
use studia_entity::user::Role;
use test_log::test;

#[test(tokio::test)]
async fn test_upcoming_skips_done_plans() {
    let db = &setup_db().await;

    let owner = create_test_user(db, "owner", Role::Student).await;
    let now = Utc::now().naive_utc();
    let mut ids = Vec::new();
    for days in [5, 1, 3, 2] {
        let plan = study_plan::Mutation::create_plan(
            db,
            owner.id,
            format!("in {days} days"),
            String::new(),
            now + Duration::days(days),
        )
        .await
        .unwrap();
        ids.push(plan.id);
    }
    study_plan::Mutation::set_status(db, ids[1], PlanStatus::Done).await.unwrap();

    let upcoming = study_plan::Query::upcoming_for_user(db, owner.id, 2).await.unwrap();
    let titles: Vec<_> = upcoming.iter().map(|plan| plan.title.as_str()).collect();
    assert_eq!(titles, ["in 2 days", "in 3 days"]);

    let all = study_plan::Query::list_for_user(db, owner.id).await.unwrap();
    assert_eq!(all.len(), 4);
    assert_eq!(all[3].status, PlanStatus::Done);
}
