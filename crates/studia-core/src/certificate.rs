use crate::actor::Actor;
use crate::audit::AuditLog;
use crate::error::{CoreError, not_found, validation};
use sea_orm::{DatabaseConnection, TransactionTrait};
use std::error::Error;
use std::sync::Arc;
use studia_config::StudiaConfig;
use studia_db::util::{FlattenTransactionResultExt, RequireRecord};
use studia_db::{certificate, notification, user};
use studia_entity::certificate::{CertificateStatus, Model as Certificate};
use studia_entity::user::{Capability, Role};
use studia_utils::store::{Store, StoreTrait};
use tracing::instrument;
use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct CertificateUpload {
    /// Name shown to users, never used to address the stored blob.
    pub filename: String,
    pub description: Option<String>,
    pub content: Vec<u8>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ReviewDecision {
    Approve,
    Reject,
}

impl ReviewDecision {
    fn status(self) -> CertificateStatus {
        match self {
            ReviewDecision::Approve => CertificateStatus::Approved,
            ReviewDecision::Reject => CertificateStatus::Rejected,
        }
    }

    fn verb(self) -> &'static str {
        match self {
            ReviewDecision::Approve => "approved",
            ReviewDecision::Reject => "rejected",
        }
    }
}

/// Display name of an upload: the last path segment, trimmed.
fn display_name(filename: &str) -> &str {
    filename.rsplit(['/', '\\']).next().unwrap_or(filename).trim()
}

const PENDING_REVIEW_TITLE: &str = "Certificate pending review";

/// Marker in the pending review message that ties it to its certificate.
fn review_reference(certificate_id: i32) -> String {
    format!("[certificate #{certificate_id}]")
}

/// Lower-cased extension after the last dot.
fn extension(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, extension)| extension.to_ascii_lowercase())
        .filter(|extension| !extension.is_empty())
}

/// Upload, review and retrieval of certificates.
///
/// Certificates start out pending and are moved to approved or rejected
/// exactly once. Blobs live in the store under generated keys.
pub struct CertificateWorkflow<S = Store> {
    db: DatabaseConnection,
    audit: AuditLog,
    store: S,
    config: Arc<StudiaConfig>,
}

impl<S: StoreTrait> CertificateWorkflow<S> {
    #[must_use]
    pub fn new(db: DatabaseConnection, store: S, config: Arc<StudiaConfig>) -> Self {
        let audit = AuditLog::new(db.clone());
        Self {
            db,
            audit,
            store,
            config,
        }
    }

    async fn discard_blob(&self, key: &str) {
        if let Err(error) = self.store.delete_file(key).await {
            tracing::error!(error = &error as &dyn Error, key, "failed to remove certificate file");
        }
    }

    /// Stores the file and creates a pending certificate. Admins are told
    /// about it when configured.
    #[instrument(skip_all, fields(user_id = actor.user_id))]
    pub async fn upload(&self, actor: &Actor, upload: CertificateUpload) -> Result<Certificate, CoreError> {
        let uploads = self.config.uploads();
        let filename = display_name(&upload.filename).to_owned();
        let extension = extension(&filename).ok_or_else(|| validation(format!("{filename} has no extension")))?;
        if !uploads.allows_extension(&extension) {
            return Err(validation(format!("files of type {extension} are not accepted")));
        }
        if upload.content.is_empty() {
            return Err(validation("file is empty"));
        }
        if upload.content.len() as u64 > uploads.max_file_size {
            return Err(validation(format!("file is larger than {} bytes", uploads.max_file_size)));
        }

        let key = format!("{}/{}.{extension}", actor.user_id, Uuid::new_v4());
        self.store.store_file(&key, &upload.content).await?;

        let owner_id = actor.user_id;
        let notify_admins = uploads.notify_admins;
        let file_path = key.clone();
        let res = self
            .db
            .transaction(|txn| {
                Box::pin(async move {
                    let owner = user::Query::find_user_by_id(txn, owner_id).await.require()?;
                    let created = certificate::Mutation::create_certificate(
                        txn,
                        owner_id,
                        filename,
                        file_path,
                        upload.description,
                    )
                    .await?;
                    if notify_admins {
                        for admin in user::Query::list_by_role(txn, Role::Admin).await? {
                            notification::Mutation::create_notification(
                                txn,
                                Some(owner_id),
                                admin.id,
                                PENDING_REVIEW_TITLE.to_owned(),
                                format!(
                                    "{} uploaded \"{}\" for review {}.",
                                    owner.username,
                                    created.filename,
                                    review_reference(created.id)
                                ),
                            )
                            .await?;
                        }
                    }
                    Result::<_, CoreError>::Ok(created)
                })
            })
            .await
            .flatten_res();

        let created = match res {
            Ok(created) => created,
            Err(error) => {
                self.discard_blob(&key).await;
                return Err(error);
            }
        };

        self.audit
            .record(actor, &format!("uploaded certificate {}", created.id))
            .await;
        Ok(created)
    }

    /// Moves a pending certificate to approved or rejected and notifies its
    /// owner in the same transaction. The reviewer's own pending review
    /// message for it is marked read. Owners cannot review their own
    /// certificates.
    ///
    /// Of two racing reviews exactly one succeeds, the other fails with
    /// [`CoreError::InvalidState`].
    #[instrument(skip_all, fields(user_id = reviewer.user_id, certificate_id = certificate_id, decision = ?decision))]
    pub async fn review(
        &self,
        certificate_id: i32,
        reviewer: &Actor,
        decision: ReviewDecision,
        notes: Option<String>,
    ) -> Result<Certificate, CoreError> {
        reviewer.require(Capability::ReviewCertificates)?;
        if self.find(certificate_id).await?.user_id == reviewer.user_id {
            return Err(CoreError::Auth(format!(
                "user {} cannot review their own certificate",
                reviewer.user_id
            )));
        }
        let notes = notes.map(|notes| notes.trim().to_owned()).filter(|notes| !notes.is_empty());
        let reviewer_id = reviewer.user_id;

        let reviewed = self
            .db
            .transaction(|txn| {
                Box::pin(async move {
                    let affected =
                        certificate::Mutation::review_pending(txn, certificate_id, reviewer_id, decision.status(), notes)
                            .await?;
                    let reviewed = certificate::Query::find_by_id(txn, certificate_id)
                        .await?
                        .ok_or_else(|| not_found("certificate", certificate_id))?;
                    if affected == 0 {
                        return Err(CoreError::InvalidState(format!(
                            "certificate {certificate_id} is {:?}, not pending",
                            reviewed.status
                        )));
                    }

                    let content = reviewed.review_notes.clone().unwrap_or_else(|| {
                        format!("Your certificate \"{}\" has been {}.", reviewed.filename, decision.verb())
                    });
                    notification::Mutation::create_notification(
                        txn,
                        Some(reviewer_id),
                        reviewed.user_id,
                        format!("Certificate {}", decision.verb()),
                        content,
                    )
                    .await?;
                    notification::Mutation::mark_read_referencing(
                        txn,
                        reviewer_id,
                        PENDING_REVIEW_TITLE,
                        &review_reference(certificate_id),
                    )
                    .await?;
                    Ok(reviewed)
                })
            })
            .await
            .flatten_res()?;

        self.audit
            .record(reviewer, &format!("{} certificate {certificate_id}", decision.verb()))
            .await;
        Ok(reviewed)
    }

    pub async fn find(&self, certificate_id: i32) -> Result<Certificate, CoreError> {
        certificate::Query::find_by_id(&self.db, certificate_id)
            .await?
            .ok_or_else(|| not_found("certificate", certificate_id))
    }

    pub async fn list_by_status(&self, status: CertificateStatus) -> Result<Vec<Certificate>, CoreError> {
        Ok(certificate::Query::list_by_status(&self.db, status).await?)
    }

    pub async fn list_for_owner(&self, owner_id: i32) -> Result<Vec<Certificate>, CoreError> {
        Ok(certificate::Query::list_for_owner(&self.db, owner_id).await?)
    }

    /// Loads the stored file. Owners and reviewers may open a certificate.
    #[instrument(skip_all, fields(user_id = actor.user_id, certificate_id = certificate_id))]
    pub async fn open(&self, actor: &Actor, certificate_id: i32) -> Result<(Certificate, Vec<u8>), CoreError> {
        let found = self.find(certificate_id).await?;
        actor.require_owner_or(found.user_id, Capability::ReviewCertificates)?;
        let file = self.store.load_file(&found.file_path).await?;
        Ok((found, file.content))
    }

    /// Deletes the row, then the blob. A blob that cannot be removed is
    /// only logged.
    #[instrument(skip_all, fields(user_id = actor.user_id, certificate_id = certificate_id))]
    pub async fn delete(&self, actor: &Actor, certificate_id: i32) -> Result<(), CoreError> {
        let found = self.find(certificate_id).await?;
        actor.require_owner_or(found.user_id, Capability::ManageAnyRecord)?;

        certificate::Mutation::delete(&self.db, certificate_id).await?;
        self.discard_blob(&found.file_path).await;

        self.audit
            .record(actor, &format!("deleted certificate {certificate_id}"))
            .await;
        Ok(())
    }
}
