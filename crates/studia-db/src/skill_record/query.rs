use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder};
use studia_entity::skill_record::{Column, Entity as SkillRecordEntity, Model as SkillRecord};

pub struct Query;

impl Query {
    /// Records of a skill, newest first.
    pub async fn list_for_skill<C: ConnectionTrait>(conn: &C, skill_id: i32) -> Result<Vec<SkillRecord>, DbErr> {
        SkillRecordEntity::find()
            .filter(Column::SkillId.eq(skill_id))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(conn)
            .await
    }

    pub async fn total_hours<C: ConnectionTrait>(conn: &C, skill_id: i32) -> Result<f64, DbErr> {
        let records = Self::list_for_skill(conn, skill_id).await?;
        Ok(records.iter().map(|record| record.hours).sum())
    }
}
