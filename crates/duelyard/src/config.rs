//! Loading and saving Duelyard's JSON files.
//!
//! Arena files hold one [`ArenaData`] each and are named after their
//! arena (`arenas/duel1.json` → arena `duel1`). The shared config holds
//! the hunger flag and the kit table; a standalone kit file is just the
//! kit table.

use std::fs;
use std::path::{Path, PathBuf};

use duelyard_arena::{ArenaData, KitTable, SharedConfig};
use serde::de::DeserializeOwned;

use crate::DuelyardError;

/// File extension of arena files.
pub const ARENA_FILE_EXTENSION: &str = "json";

fn read(path: &Path) -> Result<String, DuelyardError> {
    fs::read_to_string(path).map_err(|source| DuelyardError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn load<T: DeserializeOwned>(path: &Path) -> Result<T, DuelyardError> {
    let text = read(path)?;
    Ok(serde_json::from_str(&text)?)
}

pub fn parse_arena_data(json: &str) -> Result<ArenaData, DuelyardError> {
    Ok(serde_json::from_str(json)?)
}

pub fn parse_shared_config(json: &str) -> Result<SharedConfig, DuelyardError> {
    Ok(serde_json::from_str(json)?)
}

/// Reads one arena file. Missing fields take their defaults.
pub fn load_arena_file(path: impl AsRef<Path>) -> Result<ArenaData, DuelyardError> {
    load(path.as_ref())
}

/// Writes `data` as pretty-printed JSON, replacing the file.
pub fn save_arena_file(path: impl AsRef<Path>, data: &ArenaData) -> Result<(), DuelyardError> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(data)?;
    fs::write(path, json).map_err(|source| DuelyardError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads every `*.json` file in `dir` as an arena, sorted by arena name.
///
/// Files that fail to parse are logged and skipped so one broken arena
/// doesn't keep the others from loading. Only a missing or unreadable
/// directory is an error.
pub fn load_arena_dir(dir: impl AsRef<Path>) -> Result<Vec<(String, ArenaData)>, DuelyardError> {
    let dir = dir.as_ref();
    let entries = fs::read_dir(dir).map_err(|source| DuelyardError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == ARENA_FILE_EXTENSION))
        .collect();
    paths.sort();

    let mut arenas = Vec::with_capacity(paths.len());
    for path in paths {
        let Some(name) = arena_name(&path) else {
            continue;
        };
        match load_arena_file(&path) {
            Ok(data) => arenas.push((name, data)),
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "skipping arena file"),
        }
    }
    tracing::info!(dir = %dir.display(), count = arenas.len(), "arena files loaded");
    Ok(arenas)
}

/// Arena name for an arena file: its stem.
pub fn arena_name(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_owned)
}

/// Reads the shared config (`{ "hunger": bool, "kits": { ... } }`).
pub fn load_shared_config(path: impl AsRef<Path>) -> Result<SharedConfig, DuelyardError> {
    let config: SharedConfig = load(path.as_ref())?;
    if config.kits.is_empty() {
        tracing::warn!("no kits configured, arenas will hand out the fallback kit");
    }
    Ok(config)
}

/// Reads a standalone kit table (`{ "name": { kit }, ... }`).
pub fn load_kit_table(path: impl AsRef<Path>) -> Result<KitTable, DuelyardError> {
    load(path.as_ref())
}
