use std::env::var;
use std::fs::create_dir_all;
use std::path::PathBuf;

use crate::error::{Error, Result};

const DATA_DIR: &str = "XDG_DATA_HOME";
const HOME_DIR: &str = "HOME";

pub const RECENT_FILE: &str = "recent.json";

/// where the recent-projects history is persisted
pub fn get_store_path() -> Result<PathBuf> {
    Ok(get_data_dir()?.join(RECENT_FILE))
}

/// user-scoped data directory, created on demand
pub fn get_data_dir() -> Result<PathBuf> {
    // For linux systems
    if let Ok(data_dir) = var(DATA_DIR) {
        let path = PathBuf::from(data_dir).join("servr");
        create_dir_all(&path)?;
        return Ok(path);
    }

    if let Ok(home_dir) = var(HOME_DIR) {
        let path = PathBuf::from(home_dir).join(".servr");
        create_dir_all(&path)?;
        return Ok(path);
    }

    Err(Error::Custom(
        "Could not determine data directory: neither XDG_DATA_HOME nor HOME are set".to_string(),
    ))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_get_data_dir() {
        let dir = get_data_dir().unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn test_store_path_is_user_scoped() {
        let path = get_store_path().unwrap();
        assert!(path.ends_with(RECENT_FILE));
        assert!(path.parent().unwrap().is_dir());
    }
}
