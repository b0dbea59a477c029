use std::collections::HashMap;

use chrono::{
    NaiveDate,
    Utc,
};
use serde::{
    Deserialize,
    Serialize,
};

use crate::{
    core::ShiziError,
    persistence::{
        keys,
        StudyStore,
    },
    scheduler::PerformanceRecord,
};

pub const BACKUP_VERSION: u32 = 1;

/// Full snapshot of the persisted study state. Field names match the
/// export format of earlier releases, hence camelCase.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupData {
    /// Active pool, `char:word` lines.
    pub input: String,
    /// Mastered pool, `char:word` lines.
    pub learned: String,
    pub stats: HashMap<String, PerformanceRecord>,
    pub total_score: u32,
    pub streak: u32,
    pub daily_goal: u32,
    pub daily_progress: u32,
    /// `YYYY-MM-DD`.
    pub last_date: String,
    pub goal_met: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupDocument {
    pub version: u32,
    pub timestamp: String,
    pub data: BackupData,
}

/// Snapshot the store into a backup document.
pub fn export(store: &StudyStore) -> BackupDocument {
    let stats: HashMap<String, PerformanceRecord> = store
        .get(keys::PERFORMANCE)
        .and_then(|json| serde_json::from_str(json).ok())
        .unwrap_or_default();

    BackupDocument {
        version: BACKUP_VERSION,
        timestamp: Utc::now().to_rfc3339(),
        data: BackupData {
            input: store.get(keys::ACTIVE_POOL).unwrap_or_default().to_string(),
            learned: store.get(keys::MASTERED_POOL).unwrap_or_default().to_string(),
            stats,
            total_score: store.get_u32(keys::TOTAL_SCORE, 0),
            streak: store.get_u32(keys::STREAK_DAYS, 0),
            daily_goal: store.get_u32(keys::DAILY_GOAL, crate::progress::DEFAULT_DAILY_GOAL),
            daily_progress: store.get_u32(keys::DAILY_PROGRESS, 0),
            last_date: store
                .get(keys::LAST_ACTIVE_DATE)
                .unwrap_or_default()
                .to_string(),
            goal_met: store.get_bool(keys::GOAL_MET_TODAY, false),
        },
    }
}

pub fn export_json(store: &StudyStore) -> Result<String, ShiziError> {
    Ok(serde_json::to_string_pretty(&export(store))?)
}

/// Restore a backup into the store.
///
/// The whole payload is validated before any field is written: a payload
/// that fails structural or semantic checks leaves the store untouched,
/// and a payload that passes is applied in one flush. The caller reloads
/// content, ledger, and progress afterwards.
pub fn import_json(json: &str, store: &mut StudyStore) -> Result<(), ShiziError> {
    let document: BackupDocument = serde_json::from_str(json)
        .map_err(|e| ShiziError::MalformedBackup(e.to_string()))?;

    if document.version == 0 || document.version > BACKUP_VERSION {
        return Err(ShiziError::MalformedBackup(format!(
            "unsupported version {}",
            document.version
        )));
    }

    let data = document.data;

    if !data.last_date.is_empty()
        && NaiveDate::parse_from_str(data.last_date.trim(), "%Y-%m-%d").is_err()
    {
        return Err(ShiziError::MalformedBackup(format!(
            "bad last_date {:?}",
            data.last_date
        )));
    }

    let stats_json = serde_json::to_string(&data.stats)?;

    store.set_many(&[
        (keys::ACTIVE_POOL, data.input),
        (keys::MASTERED_POOL, data.learned),
        (keys::PERFORMANCE, stats_json),
        (keys::TOTAL_SCORE, data.total_score.to_string()),
        (keys::STREAK_DAYS, data.streak.to_string()),
        (keys::DAILY_GOAL, data.daily_goal.to_string()),
        (keys::DAILY_PROGRESS, data.daily_progress.to_string()),
        (keys::LAST_ACTIVE_DATE, data.last_date),
        (keys::GOAL_MET_TODAY, data.goal_met.to_string()),
    ])?;

    Ok(())
}
