use crate::actor::Actor;
use crate::audit::AuditLog;
use crate::error::{CoreError, not_found, validation};
use sea_orm::{DatabaseConnection, TransactionTrait};
use std::error::Error;
use studia_db::util::{FlattenTransactionResultExt, RequireRecord};
use studia_db::{certificate, teacher, user};
use studia_entity::teacher::Model as Teacher;
use studia_entity::user::{Capability, Model as User, Role};
use studia_utils::store::{Store, StoreTrait};
use tracing::instrument;

pub mod credential;

pub use credential::{Argon2Verifier, CredentialVerifier};

const MAX_USERNAME_LEN: usize = 50;

/// User accounts, teacher profiles and credential checks.
///
/// The store holds the certificate files of the accounts, which are
/// removed together with them.
pub struct IdentityStore<V = Argon2Verifier, S = Store> {
    db: DatabaseConnection,
    audit: AuditLog,
    verifier: V,
    store: S,
}

fn validate_username(username: &str) -> Result<&str, CoreError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(validation("username must not be empty"));
    }
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(validation(format!("username is longer than {MAX_USERNAME_LEN} characters")));
    }
    Ok(username)
}

impl<V: CredentialVerifier, S: StoreTrait> IdentityStore<V, S> {
    #[must_use]
    pub fn new(db: DatabaseConnection, verifier: V, store: S) -> Self {
        let audit = AuditLog::new(db.clone());
        Self {
            db,
            audit,
            verifier,
            store,
        }
    }

    /// Creates an account. Teachers also get their profile row.
    #[instrument(skip_all, fields(role = ?role))]
    pub async fn create_user(&self, username: &str, secret: &str, role: Role) -> Result<User, CoreError> {
        let username = validate_username(username)?.to_owned();
        if secret.is_empty() {
            return Err(validation("secret must not be empty"));
        }
        if user::Query::find_by_username(&self.db, &username).await?.is_some() {
            return Err(validation(format!("username {username} is taken")));
        }
        let credential_hash = self.verifier.hash(secret)?;

        let created = self
            .db
            .transaction(|txn| {
                Box::pin(async move {
                    let created = user::Mutation::create_user(txn, username, credential_hash, role).await?;
                    if role == Role::Teacher {
                        teacher::Mutation::create_for_user(txn, created.id, None).await?;
                    }
                    Result::<_, CoreError>::Ok(created)
                })
            })
            .await
            .flatten_res()?;

        tracing::info!(user_id = created.id, "created user");
        self.audit
            .append(Some(created.id), &format!("created user {}", created.username), None)
            .await;
        Ok(created)
    }

    /// Self service sign-up, always as a student.
    pub async fn register(&self, username: &str, secret: &str) -> Result<User, CoreError> {
        self.create_user(username, secret, Role::Student).await
    }

    /// Unknown users and wrong secrets fail with the same error.
    #[instrument(skip_all)]
    pub async fn verify_credentials(
        &self,
        username: &str,
        secret: &str,
        ip_address: Option<&str>,
    ) -> Result<User, CoreError> {
        let rejected = || CoreError::Auth("invalid username or secret".to_string());

        let Some(found) = user::Query::find_by_username(&self.db, username.trim()).await? else {
            return Err(rejected());
        };
        if !self.verifier.verify(secret, &found.credential_hash)? {
            tracing::debug!(user_id = found.id, "rejected credentials");
            return Err(rejected());
        }

        self.audit.append(Some(found.id), "login", ip_address).await;
        Ok(found)
    }

    #[instrument(skip_all, fields(user_id = actor.user_id))]
    pub async fn change_secret(&self, actor: &Actor, current: &str, new_secret: &str) -> Result<(), CoreError> {
        if new_secret.is_empty() {
            return Err(validation("secret must not be empty"));
        }
        let found = user::Query::find_user_by_id(&self.db, actor.user_id).await.require()?;
        if !self.verifier.verify(current, &found.credential_hash)? {
            return Err(CoreError::Auth("current secret does not match".to_string()));
        }
        let credential_hash = self.verifier.hash(new_secret)?;
        user::Mutation::update_credential_hash(&self.db, found.id, credential_hash).await?;

        self.audit.record(actor, "changed secret").await;
        Ok(())
    }

    #[instrument(skip_all, fields(user_id = actor.user_id, target = user_id, role = ?role))]
    pub async fn set_role(&self, actor: &Actor, user_id: i32, role: Role) -> Result<User, CoreError> {
        actor.require(Capability::ManageUsers)?;

        let updated = self
            .db
            .transaction(|txn| {
                Box::pin(async move {
                    user::Query::find_user_by_id(txn, user_id)
                        .await?
                        .ok_or_else(|| not_found("user", user_id))?;
                    let updated = user::Mutation::update_user_role(txn, user_id, role).await?;
                    if role == Role::Teacher {
                        teacher::Mutation::ensure_for_user(txn, user_id).await?;
                    }
                    Result::<_, CoreError>::Ok(updated)
                })
            })
            .await
            .flatten_res()?;

        self.audit
            .record(actor, &format!("set role of user {user_id} to {role:?}"))
            .await;
        Ok(updated)
    }

    /// Removes an account with everything it owns, including stored
    /// certificate files. Files that cannot be removed are only logged.
    /// Admin accounts, including the caller's own, cannot be deleted.
    #[instrument(skip_all, fields(user_id = actor.user_id, target = user_id))]
    pub async fn delete_user(&self, actor: &Actor, user_id: i32) -> Result<(), CoreError> {
        actor.require(Capability::ManageUsers)?;
        if actor.user_id == user_id {
            return Err(CoreError::Auth("admins cannot delete themselves".to_string()));
        }
        let target = user::Query::find_user_by_id(&self.db, user_id)
            .await?
            .ok_or_else(|| not_found("user", user_id))?;
        if target.role == Role::Admin {
            return Err(CoreError::Auth("admin accounts cannot be deleted".to_string()));
        }

        let file_paths = certificate::Query::list_file_paths_for_owner(&self.db, user_id).await?;
        user::Mutation::delete(&self.db, user_id).await?;

        for key in &file_paths {
            if let Err(error) = self.store.delete_file(key).await {
                tracing::error!(error = &error as &dyn Error, key, "failed to remove certificate file");
            }
        }

        self.audit
            .record(actor, &format!("deleted user {} ({user_id})", target.username))
            .await;
        Ok(())
    }

    #[instrument(skip_all, fields(user_id = actor.user_id))]
    pub async fn update_research_direction(&self, actor: &Actor, direction: &str) -> Result<Teacher, CoreError> {
        if actor.role != Role::Teacher {
            return Err(CoreError::Auth("only teachers have a research direction".to_string()));
        }
        let direction = direction.trim();
        if direction.is_empty() {
            return Err(validation("research direction must not be empty"));
        }
        teacher::Mutation::update_research_direction(&self.db, actor.user_id, direction.to_owned()).await?;

        self.audit.record(actor, "updated research direction").await;
        Ok(teacher::Query::find_for_user(&self.db, actor.user_id).await.require()?)
    }

    pub async fn find(&self, user_id: i32) -> Result<User, CoreError> {
        user::Query::find_user_by_id(&self.db, user_id)
            .await?
            .ok_or_else(|| not_found("user", user_id))
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, CoreError> {
        Ok(user::Query::find_by_username(&self.db, username).await?)
    }

    pub async fn list_by_role(&self, role: Role) -> Result<Vec<User>, CoreError> {
        Ok(user::Query::list_by_role(&self.db, role).await?)
    }

    pub async fn teacher_profile(&self, user_id: i32) -> Result<Option<Teacher>, CoreError> {
        Ok(teacher::Query::find_for_user(&self.db, user_id).await?)
    }
}
