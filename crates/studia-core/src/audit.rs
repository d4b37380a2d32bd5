use crate::actor::Actor;
use crate::error::CoreError;
use sea_orm::DatabaseConnection;
use std::error::Error;
use studia_db::system_log;
use studia_entity::system_log::Model as SystemLog;
use studia_entity::user::Capability;
use tracing::instrument;

/// Append-only trail of mutating operations.
///
/// Writes are best-effort. They run after the operation they describe has
/// committed and a failure only produces an error event.
#[derive(Clone, Debug)]
pub struct AuditLog {
    db: DatabaseConnection,
}

impl AuditLog {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn append(&self, user_id: Option<i32>, action: &str, ip_address: Option<&str>) {
        let res = system_log::Mutation::append(
            &self.db,
            user_id,
            action.to_owned(),
            ip_address.map(ToOwned::to_owned),
        )
        .await;
        if let Err(error) = res {
            tracing::error!(error = &error as &dyn Error, ?user_id, action, "failed to write audit log");
        }
    }

    pub async fn record(&self, actor: &Actor, action: &str) {
        self.append(Some(actor.user_id), action, actor.ip_address.as_deref())
            .await;
    }

    #[instrument(skip_all, fields(user_id = actor.user_id))]
    pub async fn recent(&self, actor: &Actor, limit: u64) -> Result<Vec<SystemLog>, CoreError> {
        actor.require(Capability::ViewAuditLog)?;
        Ok(system_log::Query::recent(&self.db, limit).await?)
    }

    /// Entries about `user_id`, newest first. Works for deleted users too.
    #[instrument(skip_all, fields(user_id = actor.user_id))]
    pub async fn for_user(&self, actor: &Actor, user_id: i32) -> Result<Vec<SystemLog>, CoreError> {
        actor.require(Capability::ViewAuditLog)?;
        Ok(system_log::Query::list_for_user(&self.db, user_id).await?)
    }
}
