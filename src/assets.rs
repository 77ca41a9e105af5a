//! Icon asset catalog
//!
//! Scans the user icon directory for GIF animations and resolves the
//! persisted selection. The catalog always begins with the built-in entry,
//! so the selection menu is never empty.

use std::path::{Path, PathBuf};

use crate::settings::Settings;

/// Menu label of the compiled-in default entry
pub const BUILTIN_NAME: &str = "Pulse (built-in)";

/// A selectable icon animation source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconAsset {
    /// Procedurally drawn default animation
    Builtin,
    /// A GIF discovered in the icon directory
    File { name: String, path: PathBuf },
}

impl IconAsset {
    /// Menu label for this asset
    pub fn display_name(&self) -> &str {
        match self {
            IconAsset::Builtin => BUILTIN_NAME,
            IconAsset::File { name, .. } => name,
        }
    }

    /// Value stored in the settings file; `None` for the builtin entry
    pub fn preference_value(&self) -> Option<&str> {
        match self {
            IconAsset::Builtin => None,
            IconAsset::File { name, .. } => Some(name),
        }
    }
}

/// The list of selectable icon assets, builtin first
#[derive(Debug, Clone)]
pub struct IconCatalog {
    entries: Vec<IconAsset>,
}

impl IconCatalog {
    /// Scan `dir` for GIF animations. A missing or unreadable directory is
    /// treated as empty; the result always contains at least the builtin
    /// entry.
    pub fn scan(dir: &Path) -> Self {
        let mut files = Vec::new();
        if let Ok(read_dir) = std::fs::read_dir(dir) {
            for entry in read_dir.flatten() {
                let path = entry.path();
                if !path.is_file() {
                    continue;
                }
                let is_gif = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(|e| e.eq_ignore_ascii_case("gif"))
                    .unwrap_or(false);
                if !is_gif {
                    continue;
                }
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    files.push((name.to_string(), path.clone()));
                }
            }
        }
        // Lexicographic order keeps the menu stable across rebuilds
        files.sort_by(|a, b| a.0.cmp(&b.0));

        let mut entries = vec![IconAsset::Builtin];
        entries.extend(
            files
                .into_iter()
                .map(|(name, path)| IconAsset::File { name, path }),
        );
        Self { entries }
    }

    /// Scan the user icon directory
    pub fn scan_user_dir() -> Self {
        match Settings::icons_dir() {
            Some(dir) => Self::scan(&dir),
            None => Self {
                entries: vec![IconAsset::Builtin],
            },
        }
    }

    pub fn entries(&self) -> &[IconAsset] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&IconAsset> {
        self.entries.get(index)
    }

    /// Resolve a persisted selection to a catalog index. Unknown names fall
    /// back to the builtin entry at index 0.
    pub fn resolve(&self, selected: Option<&str>) -> usize {
        let Some(name) = selected else {
            return 0;
        };
        match self
            .entries
            .iter()
            .position(|a| a.preference_value() == Some(name))
        {
            Some(index) => index,
            None => {
                tracing::warn!("selected icon asset {:?} not found, using default", name);
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        std::fs::write(path, b"x").unwrap();
    }

    #[test]
    fn test_scan_empty_dir_yields_builtin_only() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = IconCatalog::scan(dir.path());
        assert_eq!(catalog.entries(), &[IconAsset::Builtin]);
    }

    #[test]
    fn test_scan_missing_dir_yields_builtin_only() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = IconCatalog::scan(&dir.path().join("missing"));
        assert_eq!(catalog.entries(), &[IconAsset::Builtin]);
    }

    #[test]
    fn test_scan_sorts_gifs_and_ignores_other_files() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("b.gif"));
        touch(&dir.path().join("a.gif"));
        touch(&dir.path().join("notes.txt"));
        touch(&dir.path().join("c.png"));

        let catalog = IconCatalog::scan(dir.path());
        let names: Vec<_> = catalog.entries().iter().map(|a| a.display_name()).collect();
        assert_eq!(names, vec![BUILTIN_NAME, "a.gif", "b.gif"]);
    }

    #[test]
    fn test_resolve_none_is_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = IconCatalog::scan(dir.path());
        assert_eq!(catalog.resolve(None), 0);
    }

    #[test]
    fn test_resolve_known_name() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.gif"));
        touch(&dir.path().join("b.gif"));

        let catalog = IconCatalog::scan(dir.path());
        let index = catalog.resolve(Some("b.gif"));
        assert_eq!(catalog.get(index).unwrap().display_name(), "b.gif");
    }

    #[test]
    fn test_resolve_unknown_name_falls_back_to_builtin() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.gif"));

        let catalog = IconCatalog::scan(dir.path());
        assert_eq!(catalog.resolve(Some("gone.gif")), 0);
    }
}
