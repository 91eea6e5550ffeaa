//! Light/dark theme resolution, persistence and application.
//!
//! The theme is resolved once at startup:
//!
//! 1. The persisted `theme` key, when it holds `"light"` or `"dark"`.
//! 2. Otherwise the environment's dark-mode signal (`prefers-color-scheme`).
//!
//! The resolved value is applied to a [`DocumentRoot`] as a `data-theme`
//! attribute plus a `color-scheme` hint. After that only [`ThemeManager::toggle`]
//! changes it, and every change is persisted and re-applied in the same call,
//! so the root attributes and the stored value always mirror `current()`.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Storage key for the persisted preference.
pub const THEME_KEY: &str = "theme";

/// Attribute on the document root that stylesheets key off.
pub const THEME_ATTRIBUTE: &str = "data-theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemePreference {
    #[default]
    Light,
    Dark,
}

impl ThemePreference {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemePreference::Light => "light",
            ThemePreference::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemePreference::Light => ThemePreference::Dark,
            ThemePreference::Dark => ThemePreference::Light,
        }
    }

    /// Value for the CSS `color-scheme` property.
    pub fn color_scheme(self) -> &'static str {
        self.as_str()
    }

    /// Label of the toggle button: names the theme it switches *to*.
    pub fn toggle_label(self) -> &'static str {
        match self {
            ThemePreference::Light => "Dark",
            ThemePreference::Dark => "Light",
        }
    }

    pub fn toggle_aria_label(self) -> &'static str {
        match self {
            ThemePreference::Light => "Switch to dark mode",
            ThemePreference::Dark => "Switch to light mode",
        }
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown theme '{0}' (expected \"light\" or \"dark\")")]
pub struct UnknownTheme(pub String);

impl FromStr for ThemePreference {
    type Err = UnknownTheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(ThemePreference::Light),
            "dark" => Ok(ThemePreference::Dark),
            other => Err(UnknownTheme(other.to_string())),
        }
    }
}

/// Durable per-origin key-value slot (`localStorage` on the page).
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// In-memory [`PreferenceStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.set(key, value);
        store
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}

/// Document-level presentation surface the theme is applied to.
pub trait DocumentRoot {
    fn set_attribute(&mut self, name: &str, value: &str);
    fn set_color_scheme(&mut self, scheme: &str);
}

/// Collected root attributes, rendered onto `<html>` by the generator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RootAttributes {
    pub attributes: BTreeMap<String, String>,
    pub color_scheme: Option<String>,
}

impl RootAttributes {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Inline `style` value carrying the color-scheme hint, if any.
    pub fn style(&self) -> Option<String> {
        self.color_scheme
            .as_ref()
            .map(|scheme| format!("color-scheme: {scheme};"))
    }
}

impl DocumentRoot for RootAttributes {
    fn set_attribute(&mut self, name: &str, value: &str) {
        self.attributes.insert(name.to_string(), value.to_string());
    }

    fn set_color_scheme(&mut self, scheme: &str) {
        self.color_scheme = Some(scheme.to_string());
    }
}

pub struct ThemeManager<S, D> {
    store: S,
    root: D,
    current: ThemePreference,
}

impl<S: PreferenceStore, D: DocumentRoot> ThemeManager<S, D> {
    /// Resolve the initial theme and apply it to `root`.
    ///
    /// A stored value that is not a known theme is treated as absent.
    pub fn init(store: S, root: D, prefers_dark: bool) -> Self {
        let stored = store.get(THEME_KEY).and_then(|raw| {
            raw.parse::<ThemePreference>()
                .map_err(|e| tracing::warn!(error = %e, "ignoring stored theme"))
                .ok()
        });
        let current = stored.unwrap_or(if prefers_dark {
            ThemePreference::Dark
        } else {
            ThemePreference::Light
        });
        tracing::debug!(theme = %current, from_store = stored.is_some(), "theme resolved");

        let mut manager = Self {
            store,
            root,
            current,
        };
        manager.apply();
        manager
    }

    pub fn current(&self) -> ThemePreference {
        self.current
    }

    /// Flip the theme, persist it and re-apply it. Returns the new theme.
    pub fn toggle(&mut self) -> ThemePreference {
        self.current = self.current.toggled();
        self.store.set(THEME_KEY, self.current.as_str());
        self.apply();
        tracing::debug!(theme = %self.current, "theme toggled");
        self.current
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn root(&self) -> &D {
        &self.root
    }

    pub fn into_parts(self) -> (S, D) {
        (self.store, self.root)
    }

    fn apply(&mut self) {
        self.root
            .set_attribute(THEME_ATTRIBUTE, self.current.as_str());
        self.root.set_color_scheme(self.current.color_scheme());
    }
}
