//! Session context
//!
//! Supplies the base history path and this session's id, and derives the
//! on-disk names that hang off them: the master bank, the per-session bank
//! (`<path>_<id>`), and the aliveness marker (`<path>_<id>~`).

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Identity of one shell session against one history database
#[derive(Debug, Clone)]
pub struct SessionContext {
    history_path: PathBuf,
    session_id: u32,
}

impl SessionContext {
    pub fn new(history_path: impl Into<PathBuf>, session_id: u32) -> Self {
        Self {
            history_path: history_path.into(),
            session_id,
        }
    }

    /// This session's integer id (typically the process id)
    pub fn session_id(&self) -> u32 {
        self.session_id
    }

    /// Path of the shared master bank
    pub fn master_path(&self) -> &Path {
        &self.history_path
    }

    /// Path of this session's bank: `<history_path>_<id>`
    pub fn session_path(&self) -> PathBuf {
        self.session_path_for(self.session_id)
    }

    /// Path of the session bank owned by an arbitrary session id
    pub fn session_path_for(&self, id: u32) -> PathBuf {
        let mut name: OsString = self.history_path.clone().into_os_string();
        name.push(format!("_{}", id));
        PathBuf::from(name)
    }

    /// Path of this session's aliveness marker: `<history_path>_<id>~`
    pub fn marker_path(&self) -> PathBuf {
        Self::marker_path_of(&self.session_path())
    }

    /// The marker that guards an arbitrary session bank path
    pub fn marker_path_of(session_path: &Path) -> PathBuf {
        let mut name: OsString = session_path.to_path_buf().into_os_string();
        name.push("~");
        PathBuf::from(name)
    }
}
