use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::Result;
use crate::paths;

/// Usage-ranked history of served directories, persisted as a
/// human-readable JSON mapping of path -> use count.
///
/// The store is the sole writer of its file; no locking, single
/// process by construction.
#[derive(Debug)]
pub struct ProjectStore {
    path: PathBuf,
    projects: HashMap<String, u64>,
}

impl ProjectStore {
    /// opens the store at its user-scoped default location
    pub fn open_default() -> Result<Self> {
        Ok(Self::open(paths::get_store_path()?))
    }

    /// a missing or malformed file loads as an empty history, never an error
    pub fn open(path: PathBuf) -> Self {
        let projects = fs::read_to_string(&path)
            .ok()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();
        Self { path, projects }
    }

    /// records one use of `project`, creating its entry at 1
    pub fn add(&mut self, project: impl Into<String>) {
        *self.projects.entry(project.into()).or_insert(0) += 1;
        self.save();
    }

    /// Up to `n` entries, most used first; equal counts order by path.
    /// Entries whose directory no longer exists are dropped here, and the
    /// file is rewritten if anything was dropped.
    pub fn top_n(&mut self, n: usize) -> Vec<(String, u64)> {
        let before = self.projects.len();
        self.projects.retain(|project, _| Path::new(project).exists());
        if self.projects.len() != before {
            self.save();
        }

        let mut ranked: Vec<(String, u64)> = self
            .projects
            .iter()
            .map(|(project, count)| (project.clone(), *count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(n);
        ranked
    }

    pub fn clear(&mut self) {
        self.projects.clear();
        self.save();
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn file_path(&self) -> &Path {
        &self.path
    }

    /// save failures are logged and swallowed: a broken history file
    /// must never block the server controls
    fn save(&self) {
        let raw = match serde_json::to_string_pretty(&self.projects) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("could not serialize recent projects: {e}");
                return;
            }
        };
        if let Err(e) = fs::write(&self.path, raw) {
            warn!(path = ?self.path, "could not save recent projects: {e}");
        }
    }
}

#[cfg(test)]
mod test {
    use tempfile::tempdir;

    use super::*;

    fn store_in(dir: &Path) -> ProjectStore {
        ProjectStore::open(dir.join("recent.json"))
    }

    #[test]
    fn counts_rank_most_used_first() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        fs::create_dir(&a).unwrap();
        fs::create_dir(&b).unwrap();

        let mut store = store_in(dir.path());
        for _ in 0..3 {
            store.add(a.to_string_lossy());
        }
        store.add(b.to_string_lossy());

        let ranked = store.top_n(10);
        assert_eq!(
            ranked,
            vec![
                (a.to_string_lossy().into_owned(), 3),
                (b.to_string_lossy().into_owned(), 1),
            ]
        );
    }

    #[test]
    fn equal_counts_order_by_path() {
        let dir = tempdir().unwrap();
        let x = dir.path().join("x");
        let m = dir.path().join("m");
        fs::create_dir(&x).unwrap();
        fs::create_dir(&m).unwrap();

        let mut store = store_in(dir.path());
        store.add(x.to_string_lossy());
        store.add(m.to_string_lossy());

        let ranked = store.top_n(10);
        assert_eq!(ranked[0].0, m.to_string_lossy());
        assert_eq!(ranked[1].0, x.to_string_lossy());
    }

    #[test]
    fn top_n_truncates() {
        let dir = tempdir().unwrap();
        let mut store = store_in(dir.path());
        for name in ["one", "two", "three"] {
            let project = dir.path().join(name);
            fs::create_dir(&project).unwrap();
            store.add(project.to_string_lossy());
        }

        assert_eq!(store.top_n(2).len(), 2);
    }

    #[test]
    fn dead_paths_are_pruned_and_persisted() {
        let dir = tempdir().unwrap();
        let alive = dir.path().join("alive");
        let gone = dir.path().join("gone");
        fs::create_dir(&alive).unwrap();
        fs::create_dir(&gone).unwrap();

        let mut store = store_in(dir.path());
        store.add(alive.to_string_lossy());
        store.add(gone.to_string_lossy());
        fs::remove_dir(&gone).unwrap();

        let ranked = store.top_n(10);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].0, alive.to_string_lossy());

        // the rewrite is visible to a fresh load
        let mut reloaded = store_in(dir.path());
        assert_eq!(reloaded.top_n(10).len(), 1);
    }

    #[test]
    fn clear_empties_store_and_file() {
        let dir = tempdir().unwrap();
        let project = dir.path().join("project");
        fs::create_dir(&project).unwrap();

        let mut store = store_in(dir.path());
        store.add(project.to_string_lossy());
        store.clear();

        assert!(store.top_n(10).is_empty());
        let raw = fs::read_to_string(store.file_path()).unwrap();
        let parsed: HashMap<String, u64> = serde_json::from_str(&raw).unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());
        assert!(store.is_empty());
    }

    #[test]
    fn corrupt_file_loads_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("recent.json");
        fs::write(&path, "{ not json").unwrap();

        let store = ProjectStore::open(path);
        assert!(store.is_empty());
    }

    #[test]
    fn counts_survive_reopen() {
        let dir = tempdir().unwrap();
        let project = dir.path().join("project");
        fs::create_dir(&project).unwrap();

        let mut store = store_in(dir.path());
        store.add(project.to_string_lossy());
        store.add(project.to_string_lossy());
        drop(store);

        let mut reloaded = store_in(dir.path());
        assert_eq!(reloaded.top_n(10), vec![(project.to_string_lossy().into_owned(), 2)]);
    }
}
