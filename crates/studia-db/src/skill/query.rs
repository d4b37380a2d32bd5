use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder};
use studia_entity::skill::{Column, Entity as SkillEntity, Model as Skill};

pub struct Query;

impl Query {
    pub async fn find_by_id<C: ConnectionTrait>(conn: &C, skill_id: i32) -> Result<Option<Skill>, DbErr> {
        SkillEntity::find_by_id(skill_id).one(conn).await
    }

    pub async fn find_by_name<C: ConnectionTrait>(conn: &C, user_id: i32, name: &str) -> Result<Option<Skill>, DbErr> {
        SkillEntity::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::Name.eq(name))
            .one(conn)
            .await
    }

    pub async fn list_for_user<C: ConnectionTrait>(conn: &C, user_id: i32) -> Result<Vec<Skill>, DbErr> {
        SkillEntity::find()
            .filter(Column::UserId.eq(user_id))
            .order_by_asc(Column::Id)
            .all(conn)
            .await
    }
}
