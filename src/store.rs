use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, EntityTrait, Set};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::entities::collection;
use crate::error::AppError;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum StoreKey {
    UserProfile,
    IsOnboarded,
    Habits,
    Achievements,
    Goals,
    AppSettings,
}

impl StoreKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserProfile => "userProfile",
            Self::IsOnboarded => "isOnboarded",
            Self::Habits => "habits",
            Self::Achievements => "achievements",
            Self::Goals => "goals",
            Self::AppSettings => "appSettings",
        }
    }
}

#[async_trait]
pub trait Store: Send + Sync {
    async fn load(&self, key: StoreKey) -> Result<Option<String>, AppError>;
    async fn save(&self, key: StoreKey, payload: String) -> Result<(), AppError>;
}

pub trait Persisted: Serialize + DeserializeOwned + Default {
    const KEY: StoreKey;
}

pub fn encode<T: Serialize>(value: &T) -> Result<String, AppError> {
    Ok(serde_json::to_string(value)?)
}

pub fn decode<T: Persisted>(payload: Option<&str>) -> T {
    let Some(raw) = payload else {
        return T::default();
    };
    match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(err) => {
            warn!(key = T::KEY.as_str(), error = %err, "discarding unreadable collection");
            T::default()
        }
    }
}

pub async fn load<T: Persisted>(store: &dyn Store) -> Result<T, AppError> {
    let payload = store.load(T::KEY).await?;
    Ok(decode(payload.as_deref()))
}

pub async fn save<T: Persisted>(store: &dyn Store, value: &T) -> Result<(), AppError> {
    let payload = encode(value)?;
    debug!(key = T::KEY.as_str(), bytes = payload.len(), "saving collection");
    store.save(T::KEY, payload).await
}

pub struct SqliteStore {
    db: DatabaseConnection,
}

impl SqliteStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn load(&self, key: StoreKey) -> Result<Option<String>, AppError> {
        let row = collection::Entity::find_by_id(key.as_str().to_string())
            .one(&self.db)
            .await?;
        Ok(row.map(|model| model.payload))
    }

    async fn save(&self, key: StoreKey, payload: String) -> Result<(), AppError> {
        let active = collection::ActiveModel {
            key: Set(key.as_str().to_string()),
            payload: Set(payload),
            updated_at: Set(Utc::now()),
        };
        collection::Entity::insert(active)
            .on_conflict(
                OnConflict::column(collection::Column::Key)
                    .update_columns([collection::Column::Payload, collection::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::testing::MemoryStore;
    use super::*;
    use crate::db;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    #[serde(transparent)]
    struct Names(Vec<String>);

    impl Persisted for Names {
        const KEY: StoreKey = StoreKey::Goals;
    }

    async fn sqlite_store() -> (TempDir, SqliteStore) {
        let dir = TempDir::new().expect("temp dir");
        let db_path = db::resolve_db_path(dir.path());
        db::ensure_parent_dir(&db_path).expect("ensure parent");
        let conn = db::connect(&db_path).await.expect("connect db");
        db::ensure_schema(&conn).await.expect("ensure schema");
        (dir, SqliteStore::new(conn))
    }

    #[test]
    fn decode_missing_payload_is_default() {
        let names: Names = decode(None);
        assert_eq!(names, Names::default());
    }

    #[test]
    fn decode_corrupt_payload_is_default() {
        let names: Names = decode(Some("{not json"));
        assert_eq!(names, Names::default());
    }

    #[tokio::test]
    async fn memory_store_round_trips_collections() {
        let store = MemoryStore::default();
        save(&store, &Names(vec!["a".to_string()])).await.expect("save");
        let loaded: Names = load(&store).await.expect("load");
        assert_eq!(loaded, Names(vec!["a".to_string()]));
    }

    #[tokio::test]
    async fn sqlite_store_overwrites_existing_key() {
        let (_dir, store) = sqlite_store().await;
        assert!(store.load(StoreKey::Habits).await.expect("load").is_none());

        store
            .save(StoreKey::Habits, "[1]".to_string())
            .await
            .expect("first save");
        store
            .save(StoreKey::Habits, "[1,2]".to_string())
            .await
            .expect("second save");

        let payload = store.load(StoreKey::Habits).await.expect("load");
        assert_eq!(payload.as_deref(), Some("[1,2]"));
        assert!(store.load(StoreKey::Goals).await.expect("load").is_none());
    }

    #[tokio::test]
    async fn sqlite_store_survives_reconnect() {
        let (dir, store) = sqlite_store().await;
        save(&store, &Names(vec!["kept".to_string()]))
            .await
            .expect("save");
        drop(store);

        let conn = db::connect(&db::resolve_db_path(dir.path()))
            .await
            .expect("reconnect");
        db::ensure_schema(&conn).await.expect("ensure schema");
        let reopened = SqliteStore::new(conn);
        let loaded: Names = load(&reopened).await.expect("load");
        assert_eq!(loaded, Names(vec!["kept".to_string()]));
    }
}
