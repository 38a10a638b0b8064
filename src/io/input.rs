use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::models::{ProtocolRecord, RosterTables};

/// Parse a protocol record JSON file
pub fn load_protocol_file(path: &Path) -> Result<ProtocolRecord> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))?;
    parse_protocol_json(&content).with_context(|| format!("Failed to parse protocol {:?}", path))
}

/// Parse a protocol record from a JSON string
pub fn parse_protocol_json(json: &str) -> Result<ProtocolRecord> {
    serde_json::from_str(json).context("Failed to parse protocol JSON")
}

/// Parse the roster tables (master data and terms) from a JSON file
pub fn load_roster_file(path: &Path) -> Result<RosterTables> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse roster {:?}", path))
}

/// Protocol files to process: the file itself, or every `.json` file in a
/// directory, in sorted order
pub fn list_protocol_files(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files: Vec<PathBuf> = std::fs::read_dir(path)
        .with_context(|| format!("Failed to read directory: {:?}", path))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    Ok(files)
}
