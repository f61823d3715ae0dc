use std::{io::ErrorKind, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::sheet::Selection;

const SESSION_FILE: &str = "session.json";

/// What the GUI kept in memory between interactions: which week the sheet
/// shows and which row is selected. Persisted in framesheet's own state
/// directory so consecutive invocations continue where the last one left
/// off.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub week_offset: u32,
    pub selection: Option<Selection>,
}

/// A missing or unreadable session is not an error, it just means the
/// default view. The file is framesheet's own, unlike the frames file, so
/// nothing is lost by starting over.
pub fn load_session(state_dir: &Path) -> Session {
    let path = state_dir.join(SESSION_FILE);
    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Session::default(),
        Err(e) => {
            warn!("Couldn't read session file {path:?}: {e}");
            return Session::default();
        }
    };
    match serde_json::from_str(&content) {
        Ok(session) => session,
        Err(e) => {
            warn!("Session file {path:?} is corrupt, starting from the current week: {e}");
            Session::default()
        }
    }
}

pub fn save_session(state_dir: &Path, session: &Session) -> Result<()> {
    let path = state_dir.join(SESSION_FILE);
    let content = serde_json::to_string(session)?;
    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write session file {path:?}"))
}
