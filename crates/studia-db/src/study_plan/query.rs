use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use studia_entity::study_plan::{Column, Entity as StudyPlanEntity, Model as StudyPlan, PlanStatus};

pub struct Query;

impl Query {
    pub async fn find_by_id<C: ConnectionTrait>(conn: &C, plan_id: i32) -> Result<Option<StudyPlan>, DbErr> {
        StudyPlanEntity::find_by_id(plan_id).one(conn).await
    }

    /// Open plans before done ones, each group by nearest deadline.
    pub async fn list_for_user<C: ConnectionTrait>(conn: &C, user_id: i32) -> Result<Vec<StudyPlan>, DbErr> {
        StudyPlanEntity::find()
            .filter(Column::UserId.eq(user_id))
            .order_by_asc(Column::Status)
            .order_by_asc(Column::Deadline)
            .order_by_asc(Column::Id)
            .all(conn)
            .await
    }

    pub async fn upcoming_for_user<C: ConnectionTrait>(
        conn: &C,
        user_id: i32,
        limit: u64,
    ) -> Result<Vec<StudyPlan>, DbErr> {
        StudyPlanEntity::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::Status.eq(PlanStatus::Open))
            .order_by_asc(Column::Deadline)
            .limit(limit)
            .all(conn)
            .await
    }
}
