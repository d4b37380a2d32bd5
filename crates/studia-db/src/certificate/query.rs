use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder};
use studia_entity::certificate::{CertificateStatus, Column, Entity as CertificateEntity, Model as Certificate};

pub struct Query;

impl Query {
    pub async fn find_by_id<C: ConnectionTrait>(conn: &C, certificate_id: i32) -> Result<Option<Certificate>, DbErr> {
        CertificateEntity::find_by_id(certificate_id).one(conn).await
    }

    /// Certificates in `status`, newest upload first.
    pub async fn list_by_status<C: ConnectionTrait>(
        conn: &C,
        status: CertificateStatus,
    ) -> Result<Vec<Certificate>, DbErr> {
        CertificateEntity::find()
            .filter(Column::Status.eq(status))
            .order_by_desc(Column::UploadTime)
            .order_by_desc(Column::Id)
            .all(conn)
            .await
    }

    pub async fn list_for_owner<C: ConnectionTrait>(conn: &C, user_id: i32) -> Result<Vec<Certificate>, DbErr> {
        CertificateEntity::find()
            .filter(Column::UserId.eq(user_id))
            .order_by_desc(Column::UploadTime)
            .order_by_desc(Column::Id)
            .all(conn)
            .await
    }

    pub async fn list_file_paths_for_owner<C: ConnectionTrait>(conn: &C, user_id: i32) -> Result<Vec<String>, DbErr> {
        Ok(Self::list_for_owner(conn, user_id)
            .await?
            .into_iter()
            .map(|certificate| certificate.file_path)
            .collect())
    }
}
