use crate::util::now;
use paste::paste;
use sea_orm::ActiveValue::{NotSet, Set, Unchanged};
use sea_orm::{ActiveModelTrait, ConnectionTrait, DbErr, EntityTrait};
use std::error::Error;
use studia_entity::skill::{ActiveModel, Entity, Model};

pub struct Mutation;

macro_rules! update_skill_field {
    ($i:ident, $t:ty) => {
        paste! {
            pub async fn [<update_skill_ $i>]<C: ConnectionTrait>(conn: &C, skill_id: i32, $i: $t) -> Result<Model, DbErr> {
                let skill = ActiveModel {
                    id: Unchanged(skill_id),
                    $i: Set($i),
                    ..Default::default()
                };
                skill.update(conn).await
            }
        }
    };
}

pub struct NewSkill {
    pub user_id: i32,
    pub name: String,
    pub current_level: i32,
    pub target_level: i32,
    pub is_public: bool,
}

impl Mutation {
    pub async fn create_skill<C: ConnectionTrait>(conn: &C, skill: NewSkill) -> Result<Model, DbErr> {
        let skill = ActiveModel {
            id: NotSet,
            name: Set(skill.name),
            current_level: Set(skill.current_level),
            target_level: Set(skill.target_level),
            user_id: Set(skill.user_id),
            is_public: Set(skill.is_public),
            created_at: Set(now()),
        };
        skill.insert(conn).await.inspect_err(|error| {
            tracing::error!(error = error as &dyn Error, "failed to create skill");
        })
    }

    update_skill_field!(name, String);
    update_skill_field!(current_level, i32);
    update_skill_field!(target_level, i32);
    update_skill_field!(is_public, bool);

    pub async fn delete<C: ConnectionTrait>(conn: &C, skill_id: i32) -> Result<(), DbErr> {
        let res = Entity::delete_by_id(skill_id).exec(conn).await?;
        if res.rows_affected == 0 {
            return Err(DbErr::RecordNotFound(format!("skill {skill_id} not found")));
        }
        Ok(())
    }
}
