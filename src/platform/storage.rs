//! Key/value storage for small JSON documents

use crate::persistence::PersistenceError;

/// LocalStorage on the web
#[cfg(target_arch = "wasm32")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten()
}

#[cfg(target_arch = "wasm32")]
pub fn read(key: &str) -> Option<String> {
    local_storage()?.get_item(key).ok().flatten()
}

#[cfg(target_arch = "wasm32")]
pub fn write(key: &str, value: &str) -> Result<(), PersistenceError> {
    let storage = local_storage()
        .ok_or_else(|| PersistenceError::Storage("LocalStorage unavailable".into()))?;
    storage
        .set_item(key, value)
        .map_err(|e| PersistenceError::Storage(format!("{:?}", e)))
}

/// Directory holding native key files (`SPEED_MATH_DATA_DIR`, default cwd)
#[cfg(not(target_arch = "wasm32"))]
pub fn data_dir() -> std::path::PathBuf {
    std::env::var_os("SPEED_MATH_DATA_DIR")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|| std::path::PathBuf::from("."))
}

#[cfg(not(target_arch = "wasm32"))]
fn key_path(key: &str) -> std::path::PathBuf {
    data_dir().join(format!("{key}.json"))
}

#[cfg(not(target_arch = "wasm32"))]
pub fn read(key: &str) -> Option<String> {
    std::fs::read_to_string(key_path(key)).ok()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn write(key: &str, value: &str) -> Result<(), PersistenceError> {
    write_atomic(&key_path(key), value)
}

/// Write via a sibling temp file and rename over the target
#[cfg(not(target_arch = "wasm32"))]
pub fn write_atomic(path: &std::path::Path, contents: &str) -> Result<(), PersistenceError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, contents)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}
