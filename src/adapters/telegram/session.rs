//! Session management. Load/save the grammers session file.
//!
//! Authorization state is kept in a session file next to the working
//! directory so logins survive application restarts.

use anyhow::Context;
use grammers_client::Client;
use grammers_session::Session;
use std::path::Path;
use tracing::warn;

/// Loads the session at `path`, creating an empty one if the file does not
/// exist yet. Parent directories are created as needed.
pub fn load_or_create(path: &Path) -> anyhow::Result<Session> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create session directory {}", parent.display()))?;
        }
    }
    Session::load_file_or_create(path)
        .with_context(|| format!("load session file {}", path.display()))
}

/// Persists the client's current session state to `path`.
///
/// Failure to save is logged rather than propagated: the session file going
/// stale costs a re-login, not correctness of the command that just ran.
pub fn persist(client: &Client, path: &Path) {
    if let Err(e) = client.session().save_to_file(path) {
        warn!(path = %path.display(), error = %e, "failed to save session file");
    }
}
