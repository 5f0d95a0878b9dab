use std::fs;
use std::net::TcpListener;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// conventional index filenames, tried in order
const INDEX_CANDIDATES: [&str; 4] = ["index.html", "index.htm", "default.html", "home.html"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    Directory,
    File,
}

/// one row of the file explorer listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderEntry {
    pub name: String,
    pub kind: EntryKind,
}

impl FolderEntry {
    /// decorative marker only, never drives behavior
    pub fn marker(&self) -> &'static str {
        match self.kind {
            EntryKind::Directory => "▸",
            EntryKind::File => file_marker(&self.name),
        }
    }

    pub fn label(&self) -> String {
        match self.kind {
            EntryKind::Directory => format!("▸ {}/", self.name),
            EntryKind::File => format!("{} {}", self.marker(), self.name),
        }
    }
}

fn file_marker(name: &str) -> &'static str {
    let Some(ext) = Path::new(name).extension().and_then(|e| e.to_str()) else {
        return "▢";
    };
    match ext.to_ascii_lowercase().as_str() {
        "html" | "htm" => "◯",
        "css" | "scss" | "sass" | "less" => "◆",
        "js" | "ts" | "tsx" => "◈",
        "json" | "xml" => "▣",
        "png" | "jpg" | "jpeg" | "gif" | "ico" | "zip" | "tar" | "gz" => "▦",
        "svg" | "vue" => "◇",
        "md" | "txt" => "▤",
        "py" => "◐",
        "php" => "◑",
        _ => "▢",
    }
}

/// distinct failures for "missing" and "exists but is not a directory"
pub fn validate_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(Error::DirectoryMissing(path.to_path_buf()));
    }
    if !path.is_dir() {
        return Err(Error::NotADirectory(path.to_path_buf()));
    }
    Ok(())
}

/// full listing of a directory, sorted lexicographically by name
pub fn list_contents(path: &Path) -> Result<Vec<FolderEntry>> {
    validate_dir(path)?;

    let mut entries = Vec::new();
    for entry in fs::read_dir(path)? {
        let entry = entry?;
        let kind = if entry.file_type()?.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        };
        entries.push(FolderEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            kind,
        });
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

/// the file the browser should land on once the server is up:
/// a conventional index name if one exists, otherwise the
/// alphabetically first HTML-like file, otherwise nothing
pub fn find_index_file(directory: &Path) -> Option<String> {
    for candidate in INDEX_CANDIDATES {
        if directory.join(candidate).exists() {
            return Some(candidate.to_string());
        }
    }

    let mut html_files: Vec<String> = fs::read_dir(directory)
        .ok()?
        .filter_map(|entry| Some(entry.ok()?.file_name().to_string_lossy().into_owned()))
        .filter(|name| is_html_like(name))
        .collect();
    html_files.sort();
    html_files.into_iter().next()
}

fn is_html_like(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower.ends_with(".html") || lower.ends_with(".htm")
}

/// transient bind-and-release probe on the loopback interface.
/// Racy against the real bind that follows; the consequence of losing
/// that race is a visible start failure, nothing worse.
pub fn is_port_available(port: u16) -> bool {
    TcpListener::bind(("127.0.0.1", port)).is_ok()
}

#[cfg(test)]
mod test {
    use std::fs::File;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn validate_distinguishes_missing_from_not_a_directory() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("page.html");
        File::create(&file).unwrap();

        assert!(validate_dir(dir.path()).is_ok());
        assert!(matches!(
            validate_dir(&dir.path().join("gone")),
            Err(Error::DirectoryMissing(_))
        ));
        assert!(matches!(validate_dir(&file), Err(Error::NotADirectory(_))));
    }

    #[test]
    fn listing_is_sorted_and_typed() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("assets")).unwrap();
        File::create(dir.path().join("zeta.js")).unwrap();
        File::create(dir.path().join("alpha.html")).unwrap();

        let entries = list_contents(dir.path()).unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["alpha.html", "assets", "zeta.js"]);
        assert_eq!(entries[0].kind, EntryKind::File);
        assert_eq!(entries[1].kind, EntryKind::Directory);
    }

    #[test]
    fn listing_a_file_fails() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("page.html");
        File::create(&file).unwrap();
        assert!(list_contents(&file).is_err());
    }

    #[test]
    fn entry_labels_carry_markers() {
        let dir = FolderEntry {
            name: "assets".into(),
            kind: EntryKind::Directory,
        };
        assert_eq!(dir.label(), "▸ assets/");

        let page = FolderEntry {
            name: "page.HTML".into(),
            kind: EntryKind::File,
        };
        assert_eq!(page.label(), "◯ page.HTML");

        let readme = FolderEntry {
            name: "README".into(),
            kind: EntryKind::File,
        };
        assert_eq!(readme.marker(), "▢");
    }

    #[test]
    fn index_candidates_win_in_priority_order() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("home.html")).unwrap();
        File::create(dir.path().join("index.htm")).unwrap();

        assert_eq!(find_index_file(dir.path()), Some("index.htm".to_string()));
    }

    #[test]
    fn falls_back_to_first_html_like_file() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("zzz.htm")).unwrap();
        File::create(dir.path().join("about.html")).unwrap();
        File::create(dir.path().join("app.js")).unwrap();

        assert_eq!(find_index_file(dir.path()), Some("about.html".to_string()));
    }

    #[test]
    fn no_candidate_means_none() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("app.js")).unwrap();

        assert_eq!(find_index_file(dir.path()), None);
    }

    #[test]
    fn probe_reflects_bind_state() {
        let listener = TcpListener::bind(("127.0.0.1", 0)).unwrap();
        let port = listener.local_addr().unwrap().port();

        assert!(!is_port_available(port));
        drop(listener);
        assert!(is_port_available(port));
    }
}
