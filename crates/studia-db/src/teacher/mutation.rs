use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter};
use studia_entity::teacher::{self, ActiveModel, Column, Entity, Model};

pub struct Mutation;

impl Mutation {
    pub async fn create_for_user<C: ConnectionTrait>(
        conn: &C,
        user_id: i32,
        research_direction: Option<String>,
    ) -> Result<Model, DbErr> {
        let teacher = ActiveModel {
            id: NotSet,
            user_id: Set(user_id),
            research_direction: Set(
                research_direction.unwrap_or_else(|| teacher::DEFAULT_RESEARCH_DIRECTION.to_owned())
            ),
        };
        teacher.insert(conn).await
    }

    /// Creates the teacher profile unless the user already has one.
    pub async fn ensure_for_user<C: ConnectionTrait>(conn: &C, user_id: i32) -> Result<(), DbErr> {
        let teacher = ActiveModel {
            id: NotSet,
            user_id: Set(user_id),
            research_direction: Set(teacher::DEFAULT_RESEARCH_DIRECTION.to_owned()),
        };
        let res = Entity::insert(teacher)
            .on_conflict(OnConflict::column(Column::UserId).do_nothing().to_owned())
            .exec_without_returning(conn)
            .await?;
        tracing::trace!(inserted = res, user_id, "ensured teacher profile");
        Ok(())
    }

    pub async fn update_research_direction<C: ConnectionTrait>(
        conn: &C,
        user_id: i32,
        research_direction: String,
    ) -> Result<(), DbErr> {
        let teacher = ActiveModel {
            id: NotSet,
            user_id: NotSet,
            research_direction: Set(research_direction),
        };
        let res = Entity::update_many()
            .set(teacher)
            .filter(Column::UserId.eq(user_id))
            .exec(conn)
            .await?;
        if res.rows_affected == 0 {
            return Err(DbErr::RecordNotFound("Teacher profile not found".to_string()));
        }
        Ok(())
    }
}
