//! Session persistence
//!
//! The signed-in session (token pair plus account snapshot) is stored as a
//! JSON file in the data directory so a restart lands back in the feed
//! without a fresh login.

use std::path::PathBuf;

use color_eyre::eyre::{Result, WrapErr};

use crate::domain::session::Session;
use crate::utils;

const SESSION_FILE: &str = "session.json";

#[derive(Clone, Debug)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn from_data_dir() -> Self {
        Self::new(utils::paths::get_data_dir())
    }

    fn path(&self) -> PathBuf {
        self.dir.join(SESSION_FILE)
    }

    /// Load the persisted session, if any. A corrupt file is treated as
    /// no session rather than a fatal error.
    pub fn load(&self) -> Option<Session> {
        let raw = std::fs::read_to_string(self.path()).ok()?;
        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(error) => {
                log::warn!("discarding unreadable session file: {error}");
                None
            }
        }
    }

    /// Persist the session. Writes to a temporary file and renames it so a
    /// crash mid-write never leaves a truncated session behind.
    pub fn store(&self, session: &Session) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .wrap_err("failed to create session data directory")?;
        let tmp = self.dir.join(format!("{SESSION_FILE}.tmp"));
        let raw = serde_json::to_string_pretty(session)?;
        std::fs::write(&tmp, raw).wrap_err("failed to write session file")?;
        std::fs::rename(&tmp, self.path()).wrap_err("failed to move session file into place")?;
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(self.path()) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error).wrap_err("failed to remove session file"),
        }
    }
}
