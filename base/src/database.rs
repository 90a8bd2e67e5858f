use async_once_cell::OnceCell;
use lazy_static::lazy_static;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use super::setting::{get_settings, SettingsError};

lazy_static! {
    pub static ref DATABASE: Arc<OnceCell<DatabaseConnection>> = Arc::new(OnceCell::new());
}

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database global store is uninitialized")]
    Uninitialized,

    #[error("Could not load settings: {0}")]
    Settings(#[from] SettingsError),

    #[error("Error while connecting to the database: {0}")]
    Database(#[from] DbErr),
}

pub fn get_database() -> Result<&'static DatabaseConnection, DatabaseError> {
    DATABASE.get().ok_or(DatabaseError::Uninitialized)
}

pub async fn open_database() -> Result<DatabaseConnection, DatabaseError> {
    let url = &get_settings()?.db;
    tracing::info! {%url, "Connecting to database"};
    let mut options = ConnectOptions::new(url.to_owned());
    options
        .max_connections(16)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .sqlx_logging(true);
    Ok(Database::connect(options).await?)
}
