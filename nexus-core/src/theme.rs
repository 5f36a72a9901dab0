//! Theme preference, persisted alongside the session keys

use std::fmt;

use crate::storage::{KeyStore, THEME_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Load the saved preference; unknown or missing values fall back
    /// to dark.
    pub fn load(store: &dyn KeyStore) -> Self {
        match store.get(THEME_KEY).as_deref() {
            Some("light") => Theme::Light,
            _ => Theme::Dark,
        }
    }

    /// Flip the theme and write the new choice through
    pub fn toggle(self, store: &dyn KeyStore) -> Self {
        let next = match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        };
        store.set(THEME_KEY, next.as_str());
        next
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
