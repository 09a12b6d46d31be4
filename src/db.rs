use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use url::Url;

use crate::entities::collection;
use crate::error::AppError;

pub const DATA_DIR_ENV: &str = "HABITUAL_HOME";
const DEFAULT_DIR_NAME: &str = ".habitual";

pub fn resolve_data_dir(flag: Option<PathBuf>) -> Result<PathBuf, AppError> {
    if let Some(path) = flag {
        if path.as_os_str().to_string_lossy().trim().is_empty() {
            return Err(AppError::InvalidInput("--data-dir is empty".to_string()));
        }
        return Ok(path);
    }

    if let Ok(value) = std::env::var(DATA_DIR_ENV) {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value));
        }
    }

    if let Ok(home) = std::env::var("HOME") {
        if !home.trim().is_empty() {
            return Ok(PathBuf::from(home).join(DEFAULT_DIR_NAME));
        }
    }

    Err(AppError::InvalidInput(format!(
        "unable to resolve data directory; pass --data-dir or set {DATA_DIR_ENV}"
    )))
}

pub fn resolve_db_path(data_dir: &Path) -> PathBuf {
    data_dir.join("habitual.db")
}

pub fn ensure_parent_dir(path: &Path) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

pub fn open_lock(path: &Path) -> Result<fd_lock::RwLock<File>, AppError> {
    let lock_path = path.with_extension("lock");
    let file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .read(true)
        .write(true)
        .open(lock_path)?;
    Ok(fd_lock::RwLock::new(file))
}

pub async fn connect(path: &Path) -> Result<DatabaseConnection, AppError> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };
    let mut url = Url::from_file_path(&absolute).map_err(|_| {
        AppError::InvalidInput(format!("invalid sqlite path: {}", absolute.display()))
    })?;
    url.set_query(Some("mode=rwc"));
    let sqlite_url = url.as_str().replacen("file://", "sqlite://", 1);
    Ok(Database::connect(&sqlite_url).await?)
}

pub async fn ensure_schema(db: &DatabaseConnection) -> Result<(), AppError> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut collection_stmt = schema.create_table_from_entity(collection::Entity);
    collection_stmt.if_not_exists();
    db.execute(builder.build(&collection_stmt)).await?;

    Ok(())
}
