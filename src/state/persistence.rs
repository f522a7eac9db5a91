use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::Result;
use crate::models::SavedFood;

/// Slot holding the [`crate::models::Profile`] snapshot.
pub const SLOT_PROFILE: &str = "profile";
/// Slot holding the [`crate::models::Goals`] snapshot.
pub const SLOT_GOALS: &str = "goals";
/// Slot holding the [`crate::models::DailyLedger`] snapshot.
pub const SLOT_DAILY: &str = "daily";
/// Slot holding the saved-foods list.
pub const SLOT_SAVED_FOODS: &str = "savedFoods";
/// Slot holding the last-active [`crate::models::Screen`].
pub const SLOT_CURRENT_SCREEN: &str = "currentScreen";

/// Named-slot string storage. Every `set` replaces the whole value.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// One `<slot>.json` file per slot inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `dir`.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.slot_path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    /// Write to a temp file beside the target, then rename over it,
    /// so readers see either the old snapshot or the new one.
    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(value.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(self.slot_path(key))?;
        debug!(slot = key, bytes = value.len(), "snapshot written");
        Ok(())
    }
}

/// In-process store, mainly for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.slots
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}

/// Load a slot, treating a missing or unreadable snapshot as absent.
///
/// A snapshot that fails to parse is discarded whole rather than patched.
pub fn load_slot<T, S>(store: &S, key: &str) -> Option<T>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!(slot = key, error = %e, "could not read snapshot, using defaults");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(slot = key, error = %e, "corrupt snapshot discarded");
            None
        }
    }
}

/// Serialize `value` and replace the slot.
pub fn save_slot<T, S>(store: &S, key: &str, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let json = serde_json::to_string_pretty(value)?;
    store.set(key, &json)
}

/// Load saved foods.
///
/// Deduplicates by id (last occurrence wins), keeping first-seen order.
pub fn load_foods<S: KeyValueStore + ?Sized>(store: &S) -> Vec<SavedFood> {
    let foods: Vec<SavedFood> = load_slot(store, SLOT_SAVED_FOODS).unwrap_or_default();
    dedupe_by_id(foods)
}

/// Save foods, deduplicating by id first.
pub fn save_foods<S: KeyValueStore + ?Sized>(store: &S, foods: &[SavedFood]) -> Result<()> {
    let deduped = dedupe_by_id(foods.to_vec());
    save_slot(store, SLOT_SAVED_FOODS, &deduped)
}

fn dedupe_by_id(foods: Vec<SavedFood>) -> Vec<SavedFood> {
    let mut order: Vec<u64> = Vec::new();
    let mut seen: HashMap<u64, SavedFood> = HashMap::new();
    for food in foods {
        if seen.insert(food.id, food.clone()).is_none() {
            order.push(food.id);
        }
    }
    order
        .into_iter()
        .filter_map(|id| seen.remove(&id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_store_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        assert!(store.get("daily").unwrap().is_none());
        store.set("daily", "{\"a\": 1}").unwrap();
        assert_eq!(store.get("daily").unwrap().as_deref(), Some("{\"a\": 1}"));
        assert!(dir.path().join("daily.json").exists());

        store.set("daily", "{}").unwrap();
        assert_eq!(store.get("daily").unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn test_load_slot_discards_corrupt_json() {
        let store = MemoryStore::new();
        store.set(SLOT_GOALS, "{not json").unwrap();
        let goals: Option<crate::models::Goals> = load_slot(&store, SLOT_GOALS);
        assert!(goals.is_none());
    }

    #[test]
    fn test_food_deduplication() {
        let json = r#"[
            {"id": 1, "name": "Apple", "calories": 95, "protein": 0.5},
            {"id": 2, "name": "Egg", "calories": 70, "protein": 6},
            {"id": 1, "name": "Apple", "calories": 100, "protein": 1}
        ]"#;

        let store = MemoryStore::new();
        store.set(SLOT_SAVED_FOODS, json).unwrap();

        let foods = load_foods(&store);
        assert_eq!(foods.len(), 2);
        assert_eq!(foods[0].name, "Apple");
        // Last occurrence wins
        assert_eq!(foods[0].calories, 100.0);
        assert_eq!(foods[1].name, "Egg");
    }
}
