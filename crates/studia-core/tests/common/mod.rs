#![allow(dead_code)]

use sea_orm::{Database, DatabaseConnection};
use std::sync::Arc;
use studia_config::{DatabaseConfig, StudiaConfig, UploadConfig};
use studia_core::actor::Actor;
use studia_core::identity::{Argon2Verifier, IdentityStore};
use studia_db::schema::setup_schema;
use studia_db::{teacher, user};
use studia_entity::user::Role;
use studia_utils::store::file_system::FileSystemStore;
use tempfile::TempDir;

pub async fn setup_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    setup_schema(&db).await.unwrap();
    db
}

/// Identity store with cheap hashing parameters, storing files in `dir`.
pub fn identity(db: &DatabaseConnection, dir: &TempDir) -> IdentityStore<Argon2Verifier, FileSystemStore> {
    IdentityStore::new(
        db.clone(),
        Argon2Verifier::with_params(1024, 1, 1).unwrap(),
        FileSystemStore::new(dir.path().to_path_buf()),
    )
}

/// Number of files below `dir`.
pub fn stored_files(dir: &TempDir) -> usize {
    walk(dir.path())
}

fn walk(path: &std::path::Path) -> usize {
    std::fs::read_dir(path)
        .unwrap()
        .map(|entry| {
            let entry = entry.unwrap();
            if entry.file_type().unwrap().is_dir() {
                walk(&entry.path())
            } else {
                1
            }
        })
        .sum()
}

pub async fn create_actor(db: &DatabaseConnection, username: &str, role: Role) -> Actor {
    let created = user::Mutation::create_user(db, username.to_owned(), "unused".to_owned(), role)
        .await
        .unwrap();
    if role == Role::Teacher {
        teacher::Mutation::create_for_user(db, created.id, None).await.unwrap();
    }
    Actor::new(created.id, role).with_ip_address("127.0.0.1")
}

pub fn test_config(location: &str) -> Arc<StudiaConfig> {
    Arc::new(StudiaConfig {
        database: DatabaseConfig {
            url: "sqlite::memory:".to_owned(),
        },
        uploads: UploadConfig {
            location: location.to_owned(),
            ..UploadConfig::default()
        },
    })
}
