//! JSON and report persistence
//!
//! Thin async helpers over `tokio::fs`. JSON writes go through a sibling
//! temp file and a rename so readers never observe a partially written file.

use crate::error::StoreError;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Read a file holding a JSON object
///
/// # Errors
/// - `StoreError::Io` if the file cannot be read
/// - `StoreError::Parse` if it is not valid JSON
/// - `StoreError::NotAnObject` if the JSON root is not an object
pub async fn read_json(path: &Path) -> Result<Map<String, Value>, StoreError> {
    let raw = fs::read(path).await.map_err(|e| StoreError::io(path, e))?;
    let value: Value = serde_json::from_slice(&raw).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(StoreError::NotAnObject {
            path: path.to_path_buf(),
        }),
    }
}

/// Write a JSON object, pretty-printed, replacing any existing file
///
/// Parent directories are created as needed.
///
/// # Errors
/// `StoreError::Io` or `StoreError::Serialize` on failure; the target is left
/// untouched in that case.
pub async fn write_json(path: &Path, value: &Map<String, Value>) -> Result<(), StoreError> {
    let mut body = serde_json::to_vec_pretty(value)?;
    body.push(b'\n');

    create_parent(path).await?;
    let staging = staging_path(path);
    fs::write(&staging, &body)
        .await
        .map_err(|e| StoreError::io(&staging, e))?;

    if let Err(e) = fs::rename(&staging, path).await {
        let _ = fs::remove_file(&staging).await;
        return Err(StoreError::io(path, e));
    }
    Ok(())
}

/// Write text verbatim as UTF-8, creating parent directories
///
/// # Errors
/// `StoreError::Io` on failure.
pub async fn write_text(path: &Path, text: &str) -> Result<(), StoreError> {
    create_parent(path).await?;
    fs::write(path, text.as_bytes())
        .await
        .map_err(|e| StoreError::io(path, e))
}

/// Whether a path exists; unreadable metadata counts as absent
pub async fn exists(path: &Path) -> bool {
    fs::try_exists(path).await.unwrap_or(false)
}

async fn create_parent(path: &Path) -> Result<(), StoreError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)
            .await
            .map_err(|e| StoreError::io(parent, e)),
        _ => Ok(()),
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.{}.tmp", uuid::Uuid::new_v4().simple()))
}
