//! Light/dark preference

use std::fmt;
use std::str::FromStr;

use crate::session::{KeyValueStore, StoreResult, THEME_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggle(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Toggle button label
    pub fn label(&self) -> &'static str {
        match self {
            Theme::Light => "☀️ Light",
            Theme::Dark => "🌙 Dark",
        }
    }

    /// Stored preference; light when unset or unreadable
    pub async fn load(store: &dyn KeyValueStore) -> StoreResult<Self> {
        let stored = store.get(THEME_KEY).await?;
        Ok(stored.and_then(|s| s.parse().ok()).unwrap_or_default())
    }

    pub async fn save(self, store: &dyn KeyValueStore) -> StoreResult<()> {
        store.set(THEME_KEY, self.as_str()).await
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("Unknown theme: {}", other)),
        }
    }
}
