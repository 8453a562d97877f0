use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{debug, info};
use tokio::fs;
use tokio::sync::Mutex;

use super::Goal;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("Invalid user id: \"{0}\"")]
    InvalidUserId(String),
    #[error("Goal storage failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Stored goals are unreadable: {0}")]
    Serde(#[from] serde_json::Error),
}

fn check_user_id(user_id: &str) -> Result<(), StoreError> {
    let valid = !user_id.is_empty()
        && user_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidUserId(user_id.to_owned()))
    }
}

#[rocket::async_trait]
pub trait GoalStore: Send + Sync {
    /// A user without saved goals has an empty list.
    async fn load(&self, user_id: &str) -> Result<Vec<Goal>, StoreError>;
    /// Replaces every goal of the user.
    async fn save(&self, user_id: &str, goals: Vec<Goal>) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
pub struct MemoryGoalStore(Mutex<HashMap<String, Vec<Goal>>>);

#[rocket::async_trait]
impl GoalStore for MemoryGoalStore {
    async fn load(&self, user_id: &str) -> Result<Vec<Goal>, StoreError> {
        check_user_id(user_id)?;
        Ok(self.0.lock().await.get(user_id).cloned().unwrap_or_default())
    }

    async fn save(&self, user_id: &str, goals: Vec<Goal>) -> Result<(), StoreError> {
        check_user_id(user_id)?;
        self.0.lock().await.insert(user_id.to_owned(), goals);
        Ok(())
    }
}

/// One pretty-printed JSON file per user under `dir`.
#[derive(Debug, Clone)]
pub struct JsonFileGoalStore {
    dir: PathBuf,
}

impl JsonFileGoalStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        info!("Storing goals in {}", dir.display());
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, user_id: &str) -> Result<PathBuf, StoreError> {
        check_user_id(user_id)?;
        Ok(self.dir.join(format!("{user_id}.json")))
    }
}

#[rocket::async_trait]
impl GoalStore for JsonFileGoalStore {
    async fn load(&self, user_id: &str) -> Result<Vec<Goal>, StoreError> {
        let path = self.path(user_id)?;
        match fs::read(&path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(vec![]),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, user_id: &str, goals: Vec<Goal>) -> Result<(), StoreError> {
        let path = self.path(user_id)?;
        let bytes = serde_json::to_vec_pretty(&goals)?;
        fs::create_dir_all(&self.dir).await?;
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, bytes).await?;
        fs::rename(&staging, &path).await?;
        debug!("Saved {} goals for {user_id}", goals.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goals::tests::goal;
    use crate::goals::GoalTarget;

    fn goals() -> Vec<Goal> {
        vec![
            goal("a", GoalTarget::BreakScore { score: 80 }),
            goal("b", GoalTarget::RoundsPlayed { rounds: 12 }),
        ]
    }

    #[test]
    fn user_ids() {
        assert!(check_user_id("7b9f-2c_a1").is_ok());
        assert!(check_user_id("").is_err());
        assert!(check_user_id("../etc/passwd").is_err());
        assert!(check_user_id("a b").is_err());
    }

    #[tokio::test]
    async fn memory_store() {
        let store = MemoryGoalStore::default();
        assert_eq!(store.load("u1").await.unwrap(), vec![]);
        store.save("u1", goals()).await.unwrap();
        assert_eq!(store.load("u1").await.unwrap(), goals());
        assert_eq!(store.load("u2").await.unwrap(), vec![]);
        store.save("u1", vec![]).await.unwrap();
        assert_eq!(store.load("u1").await.unwrap(), vec![]);
    }

    #[tokio::test]
    async fn json_file_store() {
        let dir = std::env::temp_dir().join(format!("pgc-goals-{}", rand::random::<u64>()));
        let store = JsonFileGoalStore::new(&dir);
        assert_eq!(store.load("u1").await.unwrap(), vec![]);
        store.save("u1", goals()).await.unwrap();
        assert_eq!(store.load("u1").await.unwrap(), goals());
        assert!(dir.join("u1.json").exists());
        assert!(!dir.join("u1.json.tmp").exists());

        assert!(matches!(
            store.load("../u1").await,
            Err(StoreError::InvalidUserId(_))
        ));

        std::fs::write(dir.join("u2.json"), "not json").unwrap();
        assert!(matches!(store.load("u2").await, Err(StoreError::Serde(_))));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
