//! Canonical paths for persisted client state.
//!
//! Single source of truth - import this instead of hardcoding paths.
//!
//! | File | Purpose |
//! |------|---------|
//! | `session` | Bearer token of the signed-in user |
//! | `theme` | Light/dark preference, independent of the session |

use std::path::{Path, PathBuf};

use anyhow::Result;

pub const SESSION_FILE: &str = "session";
pub const THEME_FILE: &str = "theme";

/// Session token file under a given home
pub fn session_file_in(home: &Path) -> PathBuf {
    home.join(SESSION_FILE)
}

/// Theme preference file under a given home
pub fn theme_file_in(home: &Path) -> PathBuf {
    home.join(THEME_FILE)
}

/// Session token file (~/.second-brain/session)
pub fn session_file() -> Result<PathBuf> {
    Ok(session_file_in(&crate::config::brain_home()?))
}

/// Theme preference file (~/.second-brain/theme)
pub fn theme_file() -> Result<PathBuf> {
    Ok(theme_file_in(&crate::config::brain_home()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_files_live_under_home() {
        let home = PathBuf::from("/test/.second-brain");
        assert_eq!(
            session_file_in(&home),
            PathBuf::from("/test/.second-brain/session")
        );
        assert_eq!(
            theme_file_in(&home),
            PathBuf::from("/test/.second-brain/theme")
        );
    }
}
