use crate::{
    domain::{Piste, PisteId, Skier, SkierId, TypeSubscription},
    ports::{
        piste::{self, PistePort},
        skier::{self, SkierPort},
    },
};
use serde::{Deserialize, Serialize};
use std::{
    collections::{btree_map::Entry, BTreeMap},
    io::Write,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};

#[derive(Clone, Debug, Default)]
pub struct MemoryDatabase {
    state: Arc<Mutex<Snapshot>>,
}

/// Full content of a [`MemoryDatabase`]
///
/// Records are keyed by identifier, so store order is ascending identifier order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Last identifier handed out to a skier
    #[serde(default)]
    last_skier_id: SkierId,
    #[serde(default)]
    skiers: BTreeMap<SkierId, Skier>,
    #[serde(default)]
    last_piste_id: PisteId,
    #[serde(default)]
    pistes: BTreeMap<PisteId, Piste>,
}

impl Snapshot {
    /// Read a snapshot from a JSON file
    ///
    /// A missing file is an empty store.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!(path = %path.display(), "store not found, starting empty");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(serde_json::from_str(&content)?)
    }

    /// Write the snapshot as JSON
    ///
    /// The content goes to a temporary file in the same directory first, which then replaces
    /// `path`, so an interrupted write leaves the previous store intact.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        let path = path.as_ref();
        let io_error = |source: std::io::Error| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        };
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut file = tempfile::NamedTempFile::new_in(dir).map_err(io_error)?;
        serde_json::to_writer_pretty(&mut file, self)?;
        file.flush().map_err(io_error)?;
        file.persist(path).map_err(|err| io_error(err.error))?;
        tracing::debug!(path = %path.display(), "store saved");

        Ok(())
    }

    /// Make sure the identifier counters are past every stored record
    fn with_consistent_ids(mut self) -> Self {
        let max_skier_id = self.skiers.keys().next_back().copied().unwrap_or(0);
        self.last_skier_id = self.last_skier_id.max(max_skier_id);
        let max_piste_id = self.pistes.keys().next_back().copied().unwrap_or(0);
        self.last_piste_id = self.last_piste_id.max(max_piste_id);
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("cannot access store {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid store content: {0}")]
    Json(#[from] serde_json::Error),
}

impl MemoryDatabase {
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            state: Arc::new(Mutex::new(snapshot.with_consistent_ids())),
        }
    }

    /// Copy of the current content, e.g. to persist it elsewhere
    pub fn snapshot(&self) -> Result<Snapshot, ErasedPoisonError> {
        Ok(self.state.lock()?.clone())
    }

    /// Store a new piste and return it with its assigned identifier
    pub fn insert_piste(&self, mut piste: Piste) -> Result<Piste, piste::Error> {
        let mut state = self.state.lock()?;
        state.last_piste_id += 1;
        let piste_id = state.last_piste_id;
        piste.piste_id = Some(piste_id);
        state.pistes.insert(piste_id, piste.clone());
        tracing::debug!(piste_id, "piste inserted");

        Ok(piste)
    }
}

#[async_trait::async_trait]
impl SkierPort for MemoryDatabase {
    async fn find_all(&self) -> Result<Vec<Skier>, skier::Error> {
        let skiers: Vec<Skier> = self.state.lock()?.skiers.values().cloned().collect();
        tracing::debug!(count = skiers.len(), "found skiers");

        Ok(skiers)
    }

    async fn find_by_id(&self, skier_id: SkierId) -> Result<Skier, skier::Error> {
        let skier = self.state.lock()?.skiers.get(&skier_id).cloned();

        skier.ok_or_else(|| {
            tracing::warn!(skier_id, "skier not found");
            skier::Error::SkierDoesNotExist(skier_id)
        })
    }

    async fn find_by_subscription_type(
        &self,
        type_sub: TypeSubscription,
    ) -> Result<Vec<Skier>, skier::Error> {
        let skiers = self
            .state
            .lock()?
            .skiers
            .values()
            .filter(|skier| skier.has_subscription_type(type_sub))
            .cloned()
            .collect();

        Ok(skiers)
    }

    async fn save(&self, mut skier: Skier) -> Result<Skier, skier::Error> {
        let mut state = self.state.lock()?;
        match skier.skier_id {
            // Update of an existing skier
            Some(skier_id) => match state.skiers.entry(skier_id) {
                Entry::Occupied(mut entry) => {
                    entry.insert(skier.clone());
                }
                Entry::Vacant(_) => {
                    tracing::warn!(skier_id, "cannot update missing skier");
                    return Err(skier::Error::SkierDoesNotExist(skier_id));
                }
            },
            // New skier
            None => {
                state.last_skier_id += 1;
                let skier_id = state.last_skier_id;
                skier.skier_id = Some(skier_id);
                state.skiers.insert(skier_id, skier.clone());
            }
        }
        tracing::debug!(skier_id = ?skier.skier_id, "skier saved");

        Ok(skier)
    }

    async fn delete_by_id(&self, skier_id: SkierId) -> Result<(), skier::Error> {
        match self.state.lock()?.skiers.remove(&skier_id) {
            Some(_) => Ok(()),
            None => {
                tracing::warn!(skier_id, "cannot delete missing skier");
                Err(skier::Error::SkierDoesNotExist(skier_id))
            }
        }
    }
}

#[async_trait::async_trait]
impl PistePort for MemoryDatabase {
    async fn find_by_id(&self, piste_id: PisteId) -> Result<Piste, piste::Error> {
        let piste = self.state.lock()?.pistes.get(&piste_id).cloned();

        piste.ok_or_else(|| {
            tracing::warn!(piste_id, "piste not found");
            piste::Error::PisteDoesNotExist(piste_id)
        })
    }
}

/// Erased [`PoisonError`]
///
/// `PoisonError` keeps the `MutexGuard` internally, which is not send. Thus we erase the error
/// and only keep the string representation instead.
#[derive(Debug, thiserror::Error)]
#[error("poison error: {0}")]
pub struct ErasedPoisonError(String);

impl<T> From<PoisonError<T>> for ErasedPoisonError {
    fn from(err: PoisonError<T>) -> Self {
        Self(err.to_string())
    }
}

impl<T> From<PoisonError<T>> for skier::Error {
    fn from(err: PoisonError<T>) -> Self {
        Self::Adapter(Box::new(ErasedPoisonError::from(err)))
    }
}

impl<T> From<PoisonError<T>> for piste::Error {
    fn from(err: PoisonError<T>) -> Self {
        Self::Adapter(Box::new(ErasedPoisonError::from(err)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Color, Subscription};
    use chrono::NaiveDate;
    use speculoos::prelude::*;

    fn skier(first_name: &str, last_name: &str) -> Skier {
        Skier::new(
            first_name,
            last_name,
            NaiveDate::from_ymd_opt(1993, 5, 15).unwrap(),
            "New York",
        )
    }

    #[tokio::test]
    async fn test_save_assigns_ids() {
        let database = MemoryDatabase::default();

        let res = database.save(skier("John", "Doe")).await;
        assert_that!(res)
            .is_ok()
            .matches(|stored| stored.skier_id == Some(1) && stored.first_name == "John");

        let res = database.save(skier("Jane", "Smith")).await;
        assert_that!(res)
            .is_ok()
            .matches(|stored| stored.skier_id == Some(2));

        // Records come back in identifier order
        let res = database.find_all().await;
        assert_that!(res).is_ok().matches(|skiers| {
            skiers.len() == 2 && skiers[0].first_name == "John" && skiers[1].last_name == "Smith"
        });
    }

    #[tokio::test]
    async fn test_save_updates_existing() {
        let database = MemoryDatabase::default();
        let mut stored = database.save(skier("John", "Doe")).await.unwrap();

        stored.city = "Denver".to_string();
        let res = database.save(stored.clone()).await;
        assert_that!(res).is_ok().is_equal_to(stored.clone());

        let res = SkierPort::find_by_id(&database, 1).await;
        assert_that!(res)
            .is_ok()
            .matches(|skier| skier.city == "Denver");
        assert_that!(database.find_all().await).is_ok().has_length(1);
    }

    #[tokio::test]
    async fn test_save_unknown_id() {
        let database = MemoryDatabase::default();
        let mut unknown = skier("John", "Doe");
        unknown.skier_id = Some(42);

        let res = database.save(unknown).await;
        assert_that!(res)
            .is_err()
            .matches(|err| matches!(err, skier::Error::SkierDoesNotExist(42)));
    }

    #[tokio::test]
    async fn test_delete() {
        let database = MemoryDatabase::default();
        database.save(skier("John", "Doe")).await.unwrap();

        assert_that!(database.delete_by_id(1).await).is_ok();
        let res = SkierPort::find_by_id(&database, 1).await;
        assert_that!(res)
            .is_err()
            .matches(|err| matches!(err, skier::Error::SkierDoesNotExist(1)));

        // Deleting again reports the missing skier
        let res = database.delete_by_id(1).await;
        assert_that!(res)
            .is_err()
            .matches(|err| matches!(err, skier::Error::SkierDoesNotExist(1)));
    }

    #[tokio::test]
    async fn test_find_by_subscription_type() {
        let database = MemoryDatabase::default();
        let start_date = NaiveDate::from_ymd_opt(2023, 11, 1).unwrap();
        database
            .save(
                skier("John", "Doe")
                    .with_subscription(Subscription::new(start_date, TypeSubscription::Annual)),
            )
            .await
            .unwrap();
        database
            .save(
                skier("Jane", "Smith")
                    .with_subscription(Subscription::new(start_date, TypeSubscription::Monthly)),
            )
            .await
            .unwrap();
        database.save(skier("Jim", "Beam")).await.unwrap();

        let res = database
            .find_by_subscription_type(TypeSubscription::Monthly)
            .await;
        assert_that!(res)
            .is_ok()
            .matches(|skiers| skiers.len() == 1 && skiers[0].first_name == "Jane");
    }

    #[tokio::test]
    async fn test_pistes() {
        let database = MemoryDatabase::default();
        let piste = database
            .insert_piste(Piste {
                piste_id: None,
                name: "Blue Lagoon".to_string(),
                color: Color::Blue,
                length: 800,
                slope: 12,
            })
            .unwrap();
        assert_that!(piste.piste_id).is_equal_to(Some(1));

        let res = PistePort::find_by_id(&database, 1).await;
        assert_that!(res).is_ok().is_equal_to(piste);

        let res = PistePort::find_by_id(&database, 2).await;
        assert_that!(res)
            .is_err()
            .matches(|err| matches!(err, piste::Error::PisteDoesNotExist(2)));
    }

    #[tokio::test]
    async fn test_restore_without_counters() {
        // GIVEN a stored snapshot that lacks the identifier counters
        let json = r#"{
            "skiers": {
                "3": {
                    "skier_id": 3,
                    "first_name": "John",
                    "last_name": "Doe",
                    "date_of_birth": "1993-05-15",
                    "city": "New York"
                }
            },
            "pistes": {
                "2": { "piste_id": 2, "name": "Sarenne", "color": "BLACK", "length": 16000, "slope": 25 }
            }
        }"#;
        let database = MemoryDatabase::from_snapshot(serde_json::from_str(json).unwrap());

        // WHEN saving a new skier and inserting a new piste
        let res = database.save(skier("Jane", "Smith")).await;
        let piste = database
            .insert_piste(Piste {
                piste_id: None,
                name: "Blue Lagoon".to_string(),
                color: Color::Blue,
                length: 800,
                slope: 12,
            })
            .unwrap();

        // THEN
        // * new records get fresh identifiers
        // * existing records are left untouched
        assert_that!(res)
            .is_ok()
            .matches(|stored| stored.skier_id == Some(4));
        assert_that!(piste.piste_id).is_equal_to(Some(3));
        let res = database.find_all().await;
        assert_that!(res).is_ok().matches(|skiers| {
            skiers.len() == 2 && skiers[0].first_name == "John" && skiers[1].first_name == "Jane"
        });
        let res = PistePort::find_by_id(&database, 2).await;
        assert_that!(res)
            .is_ok()
            .matches(|piste| piste.name == "Sarenne");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();

        let res = Snapshot::load(dir.path().join("skiers.json"));

        assert_that!(res).is_ok().is_equal_to(Snapshot::default());
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skiers.json");
        std::fs::write(&path, "not json").unwrap();

        let res = Snapshot::load(&path);

        assert_that!(res)
            .is_err()
            .matches(|err| matches!(err, SnapshotError::Json(_)));
    }

    #[tokio::test]
    async fn test_save_load_file() {
        // GIVEN a store file that already holds older content
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skiers.json");
        std::fs::write(&path, "{}").unwrap();
        let database = MemoryDatabase::default();
        database.save(skier("John", "Doe")).await.unwrap();

        // WHEN saving the snapshot and loading it back
        let snapshot = database.snapshot().unwrap();
        snapshot.save(&path).unwrap();
        let res = Snapshot::load(&path);

        // THEN
        // * the content is replaced
        // * no temporary file is left behind
        assert_that!(res).is_ok().is_equal_to(snapshot);
        assert_that!(std::fs::read_dir(dir.path()).unwrap().count()).is_equal_to(1);
    }

    #[tokio::test]
    async fn test_snapshot_restore() {
        let database = MemoryDatabase::default();
        database.save(skier("John", "Doe")).await.unwrap();
        let snapshot = database.snapshot().unwrap();

        let json = serde_json::to_string(&snapshot).unwrap();
        let restored = MemoryDatabase::from_snapshot(serde_json::from_str(&json).unwrap());

        // Identifiers keep increasing after a restore
        let res = restored.save(skier("Jane", "Smith")).await;
        assert_that!(res)
            .is_ok()
            .matches(|stored| stored.skier_id == Some(2));
        assert_that!(restored.find_all().await).is_ok().has_length(2);
    }
}
