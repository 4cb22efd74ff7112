//! Session context.
//!
//! A [`Session`] is created once at startup from persisted storage and handed
//! to whoever needs it. Only [`Session::login`] and [`Session::logout`]
//! change it; logout also happens when the backend answers 401.

pub mod store;
pub mod theme;

use anyhow::Result;
use tracing::{info, warn};

pub use store::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use theme::{Theme, ThemeStore};

/// Authenticated-user state backed by a token store
pub struct Session {
    store: Box<dyn TokenStore>,
    token: Option<String>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

impl Session {
    /// Restore the session from storage
    ///
    /// An unreadable store is cleared and treated as signed out.
    pub fn initialize(store: impl TokenStore + 'static) -> Self {
        let token = match store.load() {
            Ok(token) => token,
            Err(e) => {
                warn!("Failed to restore session, signing out: {:#}", e);
                if let Err(e) = store.clear() {
                    warn!("Failed to clear session store: {:#}", e);
                }
                None
            }
        };

        Self {
            store: Box::new(store),
            token,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Persist a freshly issued token
    pub fn login(&mut self, token: impl Into<String>) -> Result<()> {
        let token = token.into();
        self.store.save(&token)?;
        self.token = Some(token);
        info!("Signed in");
        Ok(())
    }

    /// Drop the token from memory and storage
    pub fn logout(&mut self) -> Result<()> {
        self.token = None;
        self.store.clear()?;
        info!("Signed out");
        Ok(())
    }
}
