//! Generic JSON-file repository
//!
//! Every entity file is a JSON array of records. The repository keeps an
//! in-memory map guarded by an `RwLock`, and writes the whole file back
//! atomically on `save`.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;
use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::LedgerError;

use super::file_io::{read_json, write_json_atomic};

/// A persisted entity
pub trait Record: Clone + Serialize + DeserializeOwned {
    type Id: Copy + Eq + Hash + Display;

    /// Human-readable entity name used in errors
    const ENTITY: &'static str;

    fn id(&self) -> Self::Id;

    /// Listing order
    fn compare(&self, other: &Self) -> Ordering;

    /// Applied to every record read from disk
    fn normalize(self) -> Self {
        self
    }
}

/// Repository for one entity type
pub struct Repository<T: Record> {
    path: PathBuf,
    data: RwLock<HashMap<T::Id, T>>,
}

impl<T: Record> Repository<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<T::Id, T>>, LedgerError> {
        self.data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<T::Id, T>>, LedgerError> {
        self.data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    /// Load records from disk, replacing what is in memory
    pub fn load(&self) -> Result<(), LedgerError> {
        let records: Vec<T> = read_json(&self.path)?;
        let mut data = self.write()?;

        data.clear();
        for record in records {
            let record = record.normalize();
            data.insert(record.id(), record);
        }

        tracing::debug!(entity = T::ENTITY, count = data.len(), "loaded records");
        Ok(())
    }

    /// Save records to disk in listing order
    pub fn save(&self) -> Result<(), LedgerError> {
        let records = self.get_all()?;
        write_json_atomic(&self.path, &records)
    }

    pub fn get(&self, id: T::Id) -> Result<Option<T>, LedgerError> {
        Ok(self.read()?.get(&id).cloned())
    }

    /// Get a record or fail with a not-found error
    pub fn require(&self, id: T::Id) -> Result<T, LedgerError> {
        self.get(id)?.ok_or_else(|| LedgerError::NotFound {
            entity_type: T::ENTITY,
            identifier: id.to_string(),
        })
    }

    /// All records in listing order
    pub fn get_all(&self) -> Result<Vec<T>, LedgerError> {
        let mut records: Vec<T> = self.read()?.values().cloned().collect();
        records.sort_by(|a, b| a.compare(b));
        Ok(records)
    }

    /// Records matching a predicate, in listing order
    pub fn filter<F>(&self, predicate: F) -> Result<Vec<T>, LedgerError>
    where
        F: Fn(&T) -> bool,
    {
        let mut records: Vec<T> = self
            .read()?
            .values()
            .filter(|r| predicate(r))
            .cloned()
            .collect();
        records.sort_by(|a, b| a.compare(b));
        Ok(records)
    }

    /// First record in listing order matching a predicate
    pub fn find<F>(&self, predicate: F) -> Result<Option<T>, LedgerError>
    where
        F: Fn(&T) -> bool,
    {
        Ok(self.filter(predicate)?.into_iter().next())
    }

    pub fn upsert(&self, record: T) -> Result<(), LedgerError> {
        self.write()?.insert(record.id(), record);
        Ok(())
    }

    /// Delete a record, returning whether it existed
    pub fn delete(&self, id: T::Id) -> Result<bool, LedgerError> {
        Ok(self.write()?.remove(&id).is_some())
    }

    pub fn count(&self) -> Result<usize, LedgerError> {
        Ok(self.read()?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Account, AccountType};
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, Repository<Account>) {
        let temp_dir = TempDir::new().unwrap();
        let repo = Repository::new(temp_dir.path().join("accounts.json"));
        (temp_dir, repo)
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_upsert_get_delete() {
        let (_temp_dir, repo) = create_test_repo();
        let account = Account::new("Nubank", AccountType::Checking);
        let id = account.id;

        repo.upsert(account).unwrap();
        assert_eq!(repo.get(id).unwrap().unwrap().name, "Nubank");

        assert!(repo.delete(id).unwrap());
        assert!(!repo.delete(id).unwrap());
        assert!(repo.require(id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_save_and_reload_sorted() {
        let (temp_dir, repo) = create_test_repo();
        repo.upsert(Account::new("Zeta", AccountType::Savings)).unwrap();
        repo.upsert(Account::new("alpha", AccountType::Checking)).unwrap();
        repo.save().unwrap();

        let repo2: Repository<Account> = Repository::new(temp_dir.path().join("accounts.json"));
        repo2.load().unwrap();

        let names: Vec<_> = repo2.get_all().unwrap().into_iter().map(|a| a.name).collect();
        assert_eq!(names, vec!["alpha", "Zeta"]);
    }
}
