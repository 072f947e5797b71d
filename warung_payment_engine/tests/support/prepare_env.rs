use std::env;

use log::*;
use sqlx::{migrate::MigrateDatabase, Sqlite};
use warung_payment_engine::SqliteDatabase;

/// A unique sqlite URL in the system temp directory, so parallel tests never share a store.
pub fn random_db_path() -> String {
    format!("sqlite://{}/wpg_test_store_{}.db", env::temp_dir().display(), rand::random::<u64>())
}

pub async fn prepare_test_env(url: &str) {
    dotenvy::from_filename(".env.test").ok();
    let _ = env_logger::try_init();
    debug!("🚀️ Logging initialised");
    create_database(url).await;
}

pub async fn create_database(url: &str) {
    if let Err(e) = Sqlite::drop_database(url).await {
        warn!("Error dropping database {url}: {e:?}");
    }
    Sqlite::create_database(url).await.expect("Error creating database");
    info!("Created Sqlite database {url}");
}

/// Creates, migrates and returns a fresh test database.
pub async fn new_test_database() -> SqliteDatabase {
    let url = random_db_path();
    prepare_test_env(&url).await;
    let db = SqliteDatabase::new_with_url(&url, 5).await.expect("Error creating connection to database");
    db.migrate().await.expect("Error running DB migrations");
    db
}
