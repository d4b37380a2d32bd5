use crate::util::now;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter};
use std::error::Error;
use studia_entity::certificate::{ActiveModel, CertificateStatus, Column, Entity, Model};

pub struct Mutation;

impl Mutation {
    pub async fn create_certificate<C: ConnectionTrait>(
        conn: &C,
        user_id: i32,
        filename: String,
        file_path: String,
        description: Option<String>,
    ) -> Result<Model, DbErr> {
        let certificate = ActiveModel {
            id: NotSet,
            user_id: Set(user_id),
            description: Set(description),
            filename: Set(filename),
            file_path: Set(file_path),
            upload_time: Set(now()),
            status: Set(CertificateStatus::Pending),
            reviewer_id: Set(None),
            review_time: Set(None),
            review_notes: Set(None),
        };
        certificate.insert(conn).await.inspect_err(|error| {
            tracing::error!(error = error as &dyn Error, "failed to create certificate");
        })
    }

    /// Moves a pending certificate into `status`.
    ///
    /// The update only matches rows that are still pending, so of two
    /// concurrent reviews at most one affects a row. Returns the number of
    /// affected rows.
    pub async fn review_pending<C: ConnectionTrait>(
        conn: &C,
        certificate_id: i32,
        reviewer_id: i32,
        status: CertificateStatus,
        review_notes: Option<String>,
    ) -> Result<u64, DbErr> {
        let res = Entity::update_many()
            .set(ActiveModel {
                status: Set(status),
                reviewer_id: Set(Some(reviewer_id)),
                review_time: Set(Some(now())),
                review_notes: Set(review_notes),
                ..Default::default()
            })
            .filter(Column::Id.eq(certificate_id))
            .filter(Column::Status.eq(CertificateStatus::Pending))
            .exec(conn)
            .await
            .inspect_err(|error| {
                tracing::error!(error = error as &dyn Error, "failed to review certificate");
            })?;
        Ok(res.rows_affected)
    }

    pub async fn delete<C: ConnectionTrait>(conn: &C, certificate_id: i32) -> Result<(), DbErr> {
        let res = Entity::delete_by_id(certificate_id).exec(conn).await?;
        if res.rows_affected == 0 {
            return Err(DbErr::RecordNotFound(format!("certificate {certificate_id} not found")));
        }
        Ok(())
    }
}
