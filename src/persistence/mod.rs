use std::{
    collections::HashMap,
    fs,
    path::PathBuf,
};

use chrono::NaiveDate;
use serde::{
    Deserialize,
    Serialize,
};

use crate::core::ShiziError;

const APP_NAME: &str = "shizi";

pub const STORE_FILE: &str = "study_data.json";

/// Store keys for the fields the scheduler persists.
pub mod keys {
    pub const DAILY_GOAL: &str = "daily_goal";
    pub const DAILY_PROGRESS: &str = "daily_progress";
    pub const STREAK_DAYS: &str = "streak_days";
    pub const LAST_ACTIVE_DATE: &str = "last_active_date";
    pub const GOAL_MET_TODAY: &str = "goal_met_today";
    pub const PERFORMANCE: &str = "performance";
    pub const ACTIVE_POOL: &str = "active_pool";
    pub const MASTERED_POOL: &str = "mastered_pool";
    pub const TOTAL_SCORE: &str = "total_score";
}

pub fn get_app_data_dir() -> PathBuf {
    if let Some(data_dir) = dirs::data_local_dir() {
        let app_dir = data_dir.join(APP_NAME);
        let _ = fs::create_dir_all(&app_dir);
        app_dir
    } else {
        PathBuf::from(".")
    }
}

pub fn get_data_file_path(filename: &str) -> PathBuf {
    get_app_data_dir().join(filename)
}

pub fn save_json<T: Serialize>(data: &T, path: &PathBuf) -> Result<(), ShiziError> {
    let json = serde_json::to_string_pretty(data)?;
    fs::write(path, json)?;
    Ok(())
}

pub fn load_json_or_default<T: for<'de> Deserialize<'de> + Default>(path: &PathBuf) -> T {
    if !path.exists() {
        return T::default();
    }

    match fs::read_to_string(path) {
        Ok(json) => match serde_json::from_str(&json) {
            Ok(data) => data,
            Err(e) => {
                eprintln!("[Persistence] Failed to parse {}: {}. Using defaults.", path.display(), e);
                T::default()
            }
        },
        Err(e) => {
            eprintln!("[Persistence] Failed to read {}: {}. Using defaults.", path.display(), e);
            T::default()
        }
    }
}

/// Durable synchronous string-keyed store backing the whole app.
///
/// Everything lives in one pretty-printed JSON document in the app data
/// dir, written after each mutation. Typed getters decode leniently: a
/// missing or garbled value becomes the caller's default instead of an
/// error, so a damaged file never bricks a session.
#[derive(Debug)]
pub struct StudyStore {
    values: HashMap<String, String>,
    file_path: Option<PathBuf>,
}

impl StudyStore {
    pub fn load() -> Self {
        Self::at_path(get_data_file_path(STORE_FILE))
    }

    pub fn at_path(path: PathBuf) -> Self {
        let values = load_json_or_default::<HashMap<String, String>>(&path);
        Self { values, file_path: Some(path) }
    }

    /// In-memory store for tests; saves are no-ops.
    pub fn ephemeral() -> Self {
        Self { values: HashMap::new(), file_path: None }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn get_u32(&self, key: &str, default: u32) -> u32 {
        self.get(key).and_then(|value| value.trim().parse().ok()).unwrap_or(default)
    }

    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.get(key).and_then(|value| value.trim().parse().ok()).unwrap_or(default)
    }

    pub fn get_date(&self, key: &str, default: NaiveDate) -> NaiveDate {
        self.get(key)
            .and_then(|value| NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok())
            .unwrap_or(default)
    }

    pub fn set(&mut self, key: &str, value: String) -> Result<(), ShiziError> {
        self.values.insert(key.to_string(), value);
        self.save()
    }

    /// Write a group of fields with a single disk flush, used where one
    /// user action updates several keys at once.
    pub fn set_many(&mut self, entries: &[(&str, String)]) -> Result<(), ShiziError> {
        for (key, value) in entries {
            self.values.insert((*key).to_string(), value.clone());
        }
        self.save()
    }

    fn save(&self) -> Result<(), ShiziError> {
        let Some(path) = &self.file_path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ShiziError::Custom(format!("Failed to create data dir: {}", e)))?;
        }
        save_json(&self.values, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn typed_getters_fall_back_on_garbage() {
        let mut store = StudyStore::ephemeral();
        store.set(keys::DAILY_GOAL, "not a number".to_string()).unwrap();
        store.set(keys::GOAL_MET_TODAY, "maybe".to_string()).unwrap();
        store.set(keys::LAST_ACTIVE_DATE, "03/01/2026".to_string()).unwrap();

        assert_eq!(store.get_u32(keys::DAILY_GOAL, 10), 10);
        assert!(!store.get_bool(keys::GOAL_MET_TODAY, false));
        assert_eq!(store.get_date(keys::LAST_ACTIVE_DATE, date(2026, 3, 1)), date(2026, 3, 1));
    }

    #[test]
    fn typed_getters_parse_well_formed_values() {
        let mut store = StudyStore::ephemeral();
        store
            .set_many(&[
                (keys::STREAK_DAYS, "7".to_string()),
                (keys::GOAL_MET_TODAY, "true".to_string()),
                (keys::LAST_ACTIVE_DATE, "2026-03-05".to_string()),
            ])
            .unwrap();

        assert_eq!(store.get_u32(keys::STREAK_DAYS, 0), 7);
        assert!(store.get_bool(keys::GOAL_MET_TODAY, false));
        assert_eq!(store.get_date(keys::LAST_ACTIVE_DATE, date(2026, 1, 1)), date(2026, 3, 5));
    }

    #[test]
    fn missing_keys_yield_defaults() {
        let store = StudyStore::ephemeral();
        assert!(store.get(keys::ACTIVE_POOL).is_none());
        assert_eq!(store.get_u32(keys::TOTAL_SCORE, 0), 0);
    }
}
