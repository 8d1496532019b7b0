//! Batch file loading
//!
//! An import batch is a TOML file carrying the goals and todos to create,
//! plus an optional project-to-goal mapping table:
//!
//! ```toml
//! [goal_map]
//! "Machine Learning" = "Machine Learning Study"
//! "Health" = "Athletics & Health"
//!
//! [[goals]]
//! title = "Machine Learning Study"
//! category = "Learning"
//! priority = "High"
//!
//! [[todos]]
//! title = "Review transformer notes"
//! priority = "High"
//! project = "Machine Learning"
//! ```

use crate::error::{SyncError, SyncResult};
use crate::import::ImportItem;
use crate::model::GoalDraft;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct BatchFile {
    #[serde(default)]
    pub goals: Vec<GoalDraft>,
    #[serde(default)]
    pub todos: Vec<ImportItem>,
    #[serde(default)]
    pub goal_map: HashMap<String, String>,
}

impl BatchFile {
    pub fn load(path: impl AsRef<Path>) -> SyncResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|err| {
            SyncError::Config(format!("cannot read batch file {}: {}", path.display(), err))
        })?;
        toml::from_str(&content).map_err(|err| {
            SyncError::Config(format!("invalid batch file {}: {}", path.display(), err))
        })
    }
}
