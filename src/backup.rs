use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::models::MatchConfig;
use crate::state::{Innings, MatchState};
use crate::stats;

/// Everything a store needs to pick up where it left off, minus undo.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct PersistedStore {
    pub config: MatchConfig,
    #[serde(default)]
    pub state: MatchState,
    #[serde(default)]
    pub history: Vec<MatchState>,
}

pub fn export(store: &PersistedStore) -> Result<String> {
    serde_json::to_string_pretty(store)
        .map_err(|err| Error::Backup(format!("failed to encode backup: {}", err)))
}

pub fn import(json: &str) -> Result<PersistedStore> {
    let persisted: PersistedStore = serde_json::from_str(json)
        .map_err(|err| Error::Backup(format!("failed to parse backup: {}", err)))?;
    verify_match(&persisted.state)?;
    for completed in &persisted.history {
        verify_match(completed)?;
    }
    Ok(persisted)
}

fn verify_match(state: &MatchState) -> Result<()> {
    for which in [Innings::First, Innings::Second] {
        stats::verify(state.innings(which), which)?;
    }
    Ok(())
}

pub fn save_to_path(path: &Path, store: &PersistedStore) -> Result<()> {
    let json = export(store)?;
    fs::write(path, json).map_err(|err| {
        Error::Backup(format!(
            "failed to write backup '{}': {}",
            path.display(),
            err
        ))
    })
}

pub fn load_from_path(path: &Path) -> Result<PersistedStore> {
    let contents = fs::read_to_string(path).map_err(|err| {
        Error::Backup(format!(
            "failed to read backup '{}': {}",
            path.display(),
            err
        ))
    })?;
    import(&contents)
}

/// Appends matches not already present, keyed by both batting teams and the
/// completion time. Returns how many were added.
pub fn merge_history(history: &mut Vec<MatchState>, incoming: Vec<MatchState>) -> usize {
    let mut added = 0;
    for candidate in incoming {
        if history.iter().any(|existing| same_match(existing, &candidate)) {
            continue;
        }
        history.push(candidate);
        added += 1;
    }
    added
}

fn same_match(left: &MatchState, right: &MatchState) -> bool {
    left.completed_at == right.completed_at
        && left.innings[0].batting_team == right.innings[0].batting_team
        && left.innings[1].batting_team == right.innings[1].batting_team
}
