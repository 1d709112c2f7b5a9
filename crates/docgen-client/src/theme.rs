//! Light/dark preference, persisted under [`THEME_KEY`].

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{ApiError, Result};
use crate::storage::{StateStore, THEME_KEY};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn is_dark(&self) -> bool {
        matches!(self, Theme::Dark)
    }
}

impl FromStr for Theme {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(ApiError::Configuration(format!(
                "invalid theme '{}', use \"light\" or \"dark\"",
                other
            ))),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current theme plus its persistence.
pub struct ThemePreference {
    store: Arc<dyn StateStore>,
    current: Theme,
}

impl ThemePreference {
    /// Read the saved preference; anything unreadable means light.
    pub fn load(store: Arc<dyn StateStore>) -> Self {
        let current = match store.get(THEME_KEY) {
            Ok(Some(saved)) => saved.parse().unwrap_or_else(|_| {
                tracing::warn!(saved = %saved, "Ignoring invalid saved theme");
                Theme::Light
            }),
            Ok(None) => Theme::Light,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read theme preference");
                Theme::Light
            }
        };
        Self { store, current }
    }

    pub fn current(&self) -> Theme {
        self.current
    }

    pub fn toggle(&mut self) -> Result<Theme> {
        self.apply(self.current.toggled())
    }

    /// Accepts only `light` or `dark`; anything else is rejected and nothing changes.
    pub fn set(&mut self, value: &str) -> Result<Theme> {
        let theme = value.parse().map_err(|e| {
            tracing::warn!(value, "Invalid theme mode");
            e
        })?;
        self.apply(theme)
    }

    fn apply(&mut self, theme: Theme) -> Result<Theme> {
        self.store.set(THEME_KEY, theme.as_str())?;
        self.current = theme;
        Ok(theme)
    }
}
