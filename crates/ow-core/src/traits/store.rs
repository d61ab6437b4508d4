//! Script storage trait

use crate::error::StoreError;

/// Named script storage
///
/// Single-user local access is assumed; implementations need no locking.
pub trait ScriptStore {
    /// Create or overwrite a script
    fn save(&self, name: &str, content: &str) -> Result<(), StoreError>;

    /// Read a script's body
    fn load(&self, name: &str) -> Result<String, StoreError>;

    /// Names of all stored scripts, sorted
    fn list(&self) -> Result<Vec<String>, StoreError>;

    /// Remove a script
    fn delete(&self, name: &str) -> Result<(), StoreError>;

    /// Whether a script exists
    fn contains(&self, name: &str) -> Result<bool, StoreError> {
        Ok(self.list()?.iter().any(|n| n == name))
    }
}
