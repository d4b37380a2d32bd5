use crate::util::now;
use chrono::NaiveDateTime;
use sea_orm::ActiveValue::{NotSet, Set, Unchanged};
use sea_orm::{ActiveModelTrait, ConnectionTrait, DbErr, EntityTrait};
use std::error::Error;
use studia_entity::study_plan::{ActiveModel, Entity, Model, PlanStatus};

pub struct Mutation;

impl Mutation {
    pub async fn create_plan<C: ConnectionTrait>(
        conn: &C,
        user_id: i32,
        title: String,
        content: String,
        deadline: NaiveDateTime,
    ) -> Result<Model, DbErr> {
        let plan = ActiveModel {
            id: NotSet,
            title: Set(title),
            content: Set(content),
            deadline: Set(deadline),
            status: Set(PlanStatus::Open),
            user_id: Set(user_id),
            created_at: Set(now()),
        };
        plan.insert(conn).await.inspect_err(|error| {
            tracing::error!(error = error as &dyn Error, "failed to create study plan");
        })
    }

    pub async fn update_plan<C: ConnectionTrait>(
        conn: &C,
        plan_id: i32,
        title: String,
        content: String,
        deadline: NaiveDateTime,
    ) -> Result<Model, DbErr> {
        let plan = ActiveModel {
            id: Unchanged(plan_id),
            title: Set(title),
            content: Set(content),
            deadline: Set(deadline),
            ..Default::default()
        };
        plan.update(conn).await
    }

    pub async fn set_status<C: ConnectionTrait>(conn: &C, plan_id: i32, status: PlanStatus) -> Result<Model, DbErr> {
        let plan = ActiveModel {
            id: Unchanged(plan_id),
            status: Set(status),
            ..Default::default()
        };
        plan.update(conn).await
    }

    pub async fn delete<C: ConnectionTrait>(conn: &C, plan_id: i32) -> Result<(), DbErr> {
        let res = Entity::delete_by_id(plan_id).exec(conn).await?;
        if res.rows_affected == 0 {
            return Err(DbErr::RecordNotFound(format!("study plan {plan_id} not found")));
        }
        Ok(())
    }
}
