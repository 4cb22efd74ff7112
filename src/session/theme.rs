//! Light/dark theme preference, persisted separately from the session.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => anyhow::bail!("Unknown theme: {}", s),
        }
    }
}

/// File-backed theme preference
#[derive(Debug, Clone)]
pub struct ThemeStore {
    path: PathBuf,
}

impl ThemeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Saved preference, dark when nothing (valid) is saved
    pub fn load(&self) -> Theme {
        std::fs::read_to_string(&self.path)
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    pub fn save(&self, theme: Theme) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(&self.path, theme.to_string())
            .with_context(|| format!("Failed to write theme file: {}", self.path.display()))
    }

    /// Flip and persist, returning the new theme
    pub fn toggle(&self) -> Result<Theme> {
        let next = self.load().toggled();
        self.save(next)?;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_to_dark() {
        let temp = TempDir::new().unwrap();
        let store = ThemeStore::new(temp.path().join("theme"));
        assert_eq!(store.load(), Theme::Dark);
    }

    #[test]
    fn test_toggle_persists() {
        let temp = TempDir::new().unwrap();
        let store = ThemeStore::new(temp.path().join("theme"));

        assert_eq!(store.toggle().unwrap(), Theme::Light);
        assert_eq!(store.load(), Theme::Light);
        assert_eq!(store.toggle().unwrap(), Theme::Dark);
    }

    #[test]
    fn test_garbage_falls_back_to_default() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("theme");
        std::fs::write(&path, "sepia").unwrap();
        assert_eq!(ThemeStore::new(path).load(), Theme::Dark);
    }
}
