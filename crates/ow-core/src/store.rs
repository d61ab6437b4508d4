//! Flat-file script store
//!
//! One `<name>.lua` file per script in a single directory. Names are used
//! verbatim as file stems, so anything that could leave the directory is
//! rejected.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::StoreError;
use crate::traits::ScriptStore;

/// Extension given to stored scripts
pub const SCRIPT_EXTENSION: &str = "lua";

/// Script store backed by a directory
#[derive(Debug, Clone)]
pub struct FsScriptStore {
    dir: PathBuf,
}

impl FsScriptStore {
    /// Create a store rooted at `dir`; the directory is created on first save
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the scripts
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path a script with this name is stored at
    pub fn path_for(&self, name: &str) -> Result<PathBuf, StoreError> {
        validate_name(name)?;
        Ok(self.dir.join(format!("{}.{}", name, SCRIPT_EXTENSION)))
    }
}

fn validate_name(name: &str) -> Result<(), StoreError> {
    let invalid = name.trim().is_empty()
        || name == "."
        || name.contains("..")
        || name.contains(['/', '\\', '\0']);
    if invalid {
        return Err(StoreError::InvalidName(name.to_string()));
    }
    Ok(())
}

fn not_found(name: &str, err: io::Error) -> StoreError {
    if err.kind() == io::ErrorKind::NotFound {
        StoreError::NotFound(name.to_string())
    } else {
        StoreError::Io(err)
    }
}

impl ScriptStore for FsScriptStore {
    fn save(&self, name: &str, content: &str) -> Result<(), StoreError> {
        let path = self.path_for(name)?;
        fs::create_dir_all(&self.dir)?;
        fs::write(&path, content)?;
        tracing::debug!("Saved script {:?} to {:?}", name, path);
        Ok(())
    }

    fn load(&self, name: &str) -> Result<String, StoreError> {
        let path = self.path_for(name)?;
        fs::read_to_string(&path).map_err(|e| not_found(name, e))
    }

    fn list(&self) -> Result<Vec<String>, StoreError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) != Some(SCRIPT_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn delete(&self, name: &str) -> Result<(), StoreError> {
        let path = self.path_for(name)?;
        fs::remove_file(&path).map_err(|e| not_found(name, e))?;
        tracing::debug!("Deleted script {:?}", name);
        Ok(())
    }
}

/// A script read from an arbitrary file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedScript {
    /// Suggested store name
    pub name: String,
    /// File body
    pub content: String,
}

/// Read a script file, deriving a store name from its base name
///
/// `.lua` is stripped from the name; other extensions are kept.
pub fn import_file(path: &Path) -> Result<ImportedScript, StoreError> {
    let content = fs::read_to_string(path)?;

    let is_lua = path.extension().and_then(|e| e.to_str()) == Some(SCRIPT_EXTENSION);
    let name = if is_lua {
        path.file_stem()
    } else {
        path.file_name()
    }
    .and_then(|n| n.to_str())
    .ok_or_else(|| StoreError::InvalidName(path.display().to_string()))?
    .to_string();

    Ok(ImportedScript { name, content })
}
