//! Site configuration module.
//!
//! Handles loading, validating and merging `config.toml`. Stock defaults are
//! the base layer; the user's `content/config.toml` is merged on top of them
//! key by key, so a config file only needs the values it changes.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [theme]
//! default = "system"        # "system", "light" or "dark"
//!
//! [sections]
//! about = true
//! now = true
//! research = false          # projects grid
//! publications = true
//! contact = true
//! research_anchor = "research"   # or "projects"
//! research_heading = "Research & Projects"
//!
//! [contact]
//! endpoint = "https://formsubmit.co/you@example.org"
//! subject = "New message from portfolio"
//! captcha = false
//! next = ""
//!
//! [resume]
//! path = "resume.pdf"
//!
//! [analytics]
//! # plausible_domain = "you.github.io"
//! script_src = "https://plausible.io/js/script.js"
//!
//! [colors.light]
//! background = "#f6f4ef"
//! surface = "#ffffff"
//! text = "#1c1b19"
//! text_muted = "#5f5b53"
//! border = "#e2ddd2"
//! accent = "#1f5f8b"
//! accent_contrast = "#ffffff"
//!
//! [colors.dark]
//! background = "#121417"
//! surface = "#1a1d21"
//! text = "#ecebe8"
//! text_muted = "#a29f98"
//! border = "#2c3036"
//! accent = "#7fb8e0"
//! accent_contrast = "#0b1620"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::controller::contact::HiddenFields;
use crate::controller::theme::ThemePreference;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Color schemes for light and dark modes.
    pub colors: ColorConfig,
    /// Initial theme before the visitor's stored preference is read.
    pub theme: ThemeConfig,
    /// Which page sections are rendered.
    pub sections: SectionsConfig,
    /// Contact form relay settings.
    pub contact: ContactConfig,
    /// Resume document linked from the page.
    pub resume: ResumeConfig,
    /// Optional Plausible analytics.
    pub analytics: AnalyticsConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sections.contact {
            let endpoint = self.contact.endpoint.as_str();
            if !(endpoint.starts_with("https://") || endpoint.starts_with("http://")) {
                return Err(ConfigError::Validation(
                    "contact.endpoint must be an http(s) URL".into(),
                ));
            }
        }
        let anchor = self.sections.research_anchor.as_str();
        if anchor.is_empty()
            || !anchor
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(ConfigError::Validation(
                "sections.research_anchor must be a non-empty [a-z0-9-] id".into(),
            ));
        }
        if RESERVED_ANCHORS.contains(&anchor) {
            return Err(ConfigError::Validation(format!(
                "sections.research_anchor '{anchor}' collides with another section"
            )));
        }
        if let Some(path) = &self.resume.path {
            let escapes = Path::new(path).components().any(|c| {
                matches!(
                    c,
                    Component::ParentDir | Component::RootDir | Component::Prefix(_)
                )
            });
            if path.is_empty() || escapes {
                return Err(ConfigError::Validation(
                    "resume.path must be a relative path inside the content root".into(),
                ));
            }
        }
        Ok(())
    }
}

/// Section ids that are always taken.
const RESERVED_ANCHORS: &[&str] = &["home", "about", "now", "publications", "contact"];

/// Initial theme rendered on `<html>`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultTheme {
    /// Start light; the page script switches to the OS preference on load.
    #[default]
    System,
    Light,
    Dark,
}

impl DefaultTheme {
    /// The theme to persist as if the visitor had chosen it, if any.
    pub fn forced(self) -> Option<ThemePreference> {
        match self {
            DefaultTheme::System => None,
            DefaultTheme::Light => Some(ThemePreference::Light),
            DefaultTheme::Dark => Some(ThemePreference::Dark),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    pub default: DefaultTheme,
}

/// Section toggles. One template covers every variant of the page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SectionsConfig {
    pub about: bool,
    pub now: bool,
    /// Projects grid.
    pub research: bool,
    pub publications: bool,
    pub contact: bool,
    /// Anchor id of the projects section (`research` or `projects`).
    pub research_anchor: String,
    pub research_heading: String,
}

impl Default for SectionsConfig {
    fn default() -> Self {
        Self {
            about: true,
            now: true,
            research: false,
            publications: true,
            contact: true,
            research_anchor: "research".to_string(),
            research_heading: "Research & Projects".to_string(),
        }
    }
}

/// Contact form relay settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContactConfig {
    /// Form relay URL the page posts to.
    pub endpoint: String,
    /// `_subject` of the relayed email.
    pub subject: String,
    /// `_captcha`: whether the relay shows its captcha page.
    pub captcha: bool,
    /// `_next`: where the relay redirects non-JS submissions.
    pub next: String,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://formsubmit.co/you@example.org".to_string(),
            subject: "New message from portfolio".to_string(),
            captcha: false,
            next: String::new(),
        }
    }
}

impl ContactConfig {
    pub fn hidden_fields(&self) -> HiddenFields {
        HiddenFields {
            subject: self.subject.clone(),
            captcha: self.captcha,
            next: self.next.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResumeConfig {
    /// Path relative to the content root; copied to the output root.
    /// Absent disables every resume link.
    pub path: Option<String>,
}

impl Default for ResumeConfig {
    fn default() -> Self {
        Self {
            path: Some("resume.pdf".to_string()),
        }
    }
}

impl ResumeConfig {
    /// Site-root URL the resume is published at.
    pub fn href(&self) -> Option<String> {
        self.path.as_ref().and_then(|p| {
            Path::new(p)
                .file_name()
                .map(|name| format!("/{}", name.to_string_lossy()))
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalyticsConfig {
    /// Site domain registered with Plausible. Absent disables analytics.
    pub plausible_domain: Option<String>,
    pub script_src: String,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            plausible_domain: None,
            script_src: "https://plausible.io/js/script.js".to_string(),
        }
    }
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    /// Light mode color scheme.
    pub light: ColorScheme,
    /// Dark mode color scheme.
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

/// Individual color scheme (light or dark).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    /// Page background.
    pub background: String,
    /// Panel and card background.
    pub surface: String,
    /// Primary text color.
    pub text: String,
    /// Secondary text (eyebrow, captions, notes).
    pub text_muted: String,
    pub border: String,
    /// Links and primary buttons.
    pub accent: String,
    /// Text on accent-colored backgrounds.
    pub accent_contrast: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#f6f4ef".to_string(),
            surface: "#ffffff".to_string(),
            text: "#1c1b19".to_string(),
            text_muted: "#5f5b53".to_string(),
            border: "#e2ddd2".to_string(),
            accent: "#1f5f8b".to_string(),
            accent_contrast: "#ffffff".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#121417".to_string(),
            surface: "#1a1d21".to_string(),
            text: "#ecebe8".to_string(),
            text_muted: "#a29f98".to_string(),
            border: "#2c3036".to_string(),
            accent: "#7fb8e0".to_string(),
            accent_contrast: "#0b1620".to_string(),
        }
    }

    fn css_vars(&self, indent: &str) -> String {
        [
            ("--color-bg", &self.background),
            ("--color-surface", &self.surface),
            ("--color-text", &self.text),
            ("--color-text-muted", &self.text_muted),
            ("--color-border", &self.border),
            ("--color-accent", &self.accent),
            ("--color-accent-contrast", &self.accent_contrast),
        ]
        .iter()
        .map(|(name, value)| format!("{indent}{name}: {value};"))
        .collect::<Vec<_>>()
        .join("\n")
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(SiteConfig::default())
        .map_err(|e| ConfigError::Validation(format!("stock defaults: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(root)?;
    let config = resolve_config(base, overlay)?;
    tracing::debug!(root = %root.display(), "config loaded");
    Ok(config)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Folio Configuration
# ===================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Theme
# ---------------------------------------------------------------------------
[theme]
# Theme rendered before the visitor's stored choice is read:
# "system" follows prefers-color-scheme, "light"/"dark" force a default.
default = "system"

# ---------------------------------------------------------------------------
# Sections (one template, many variants)
# ---------------------------------------------------------------------------
[sections]
about = true
now = true
# Projects grid, read from projects.toml.
research = false
# Publication list, read from publications.toml.
publications = true
contact = true
# Anchor id of the projects section: "research" or "projects".
research_anchor = "research"
research_heading = "Research & Projects"

# ---------------------------------------------------------------------------
# Contact form relay
# ---------------------------------------------------------------------------
[contact]
# The form posts here with Accept: application/json.
endpoint = "https://formsubmit.co/you@example.org"
subject = "New message from portfolio"
captcha = false
# Redirect target for visitors without JavaScript.
next = ""

# ---------------------------------------------------------------------------
# Resume
# ---------------------------------------------------------------------------
[resume]
# Relative to the content root; copied to the site root.
# Remove to hide every resume link.
path = "resume.pdf"

# ---------------------------------------------------------------------------
# Analytics
# ---------------------------------------------------------------------------
[analytics]
# Plausible site domain. Omit to disable analytics entirely.
# plausible_domain = "you.github.io"
script_src = "https://plausible.io/js/script.js"

# ---------------------------------------------------------------------------
# Colors - Light theme
# ---------------------------------------------------------------------------
[colors.light]
background = "#f6f4ef"
surface = "#ffffff"
text = "#1c1b19"
text_muted = "#5f5b53"
border = "#e2ddd2"
accent = "#1f5f8b"
accent_contrast = "#ffffff"

# ---------------------------------------------------------------------------
# Colors - Dark theme
# ---------------------------------------------------------------------------
[colors.dark]
background = "#121417"
surface = "#1a1d21"
text = "#ecebe8"
text_muted = "#a29f98"
border = "#2c3036"
accent = "#7fb8e0"
accent_contrast = "#0b1620"
"##
}

/// Generate CSS custom properties from color config.
///
/// An explicit `data-theme` wins; without one (script disabled) the OS
/// preference picks the scheme.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root,
:root[data-theme="light"] {{
{light}
}}

:root[data-theme="dark"] {{
{dark}
}}

@media (prefers-color-scheme: dark) {{
    :root:not([data-theme]) {{
{dark_nested}
    }}
}}"#,
        light = colors.light.css_vars("    "),
        dark = colors.dark.css_vars("    "),
        dark_nested = colors.dark.css_vars("        "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_has_colors() {
        let config = SiteConfig::default();
        assert_eq!(config.colors.light.background, "#f6f4ef");
        assert_eq!(config.colors.dark.background, "#121417");
    }

    #[test]
    fn default_config_is_valid() {
        SiteConfig::default().validate().unwrap();
    }

    #[test]
    fn default_sections_match_publications_variant() {
        let sections = SectionsConfig::default();
        assert!(sections.about && sections.now && sections.publications && sections.contact);
        assert!(!sections.research);
        assert_eq!(sections.research_anchor, "research");
    }

    #[test]
    fn parse_partial_config() {
        let toml = r##"
[colors.light]
background = "#fafafa"
"##;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        // Overridden value
        assert_eq!(config.colors.light.background, "#fafafa");
        // Default values preserved
        assert_eq!(config.colors.light.text, "#1c1b19");
        assert_eq!(config.colors.dark.background, "#121417");
        assert_eq!(config.contact.subject, "New message from portfolio");
    }

    #[test]
    fn parse_projects_variant() {
        let toml = r##"
[sections]
research = true
publications = false
research_anchor = "projects"
"##;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert!(config.sections.research);
        assert!(!config.sections.publications);
        assert_eq!(config.sections.research_anchor, "projects");
        assert!(config.sections.about);
    }

    #[test]
    fn parse_default_theme() {
        let config: SiteConfig = toml::from_str("[theme]\ndefault = \"dark\"\n").unwrap();
        assert_eq!(config.theme.default, DefaultTheme::Dark);
        assert_eq!(config.theme.default.forced(), Some(ThemePreference::Dark));
        assert_eq!(DefaultTheme::System.forced(), None);
    }

    #[test]
    fn unknown_keys_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str("[sections]\nblog = true\n");
        assert!(result.is_err());
    }

    #[test]
    fn contact_endpoint_must_be_http() {
        let mut config = SiteConfig::default();
        config.contact.endpoint = "mailto:me@example.org".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        config.sections.contact = false;
        config.validate().unwrap();
    }

    #[test]
    fn research_anchor_validated() {
        let mut config = SiteConfig::default();
        config.sections.research_anchor = "About Me".to_string();
        assert!(config.validate().is_err());

        config.sections.research_anchor = "contact".to_string();
        assert!(config.validate().is_err());

        config.sections.research_anchor = "projects".to_string();
        config.validate().unwrap();
    }

    #[test]
    fn resume_path_must_stay_inside_content() {
        let mut config = SiteConfig::default();
        config.resume.path = Some("../secret.pdf".to_string());
        assert!(config.validate().is_err());
        config.resume.path = Some("docs/../../secret.pdf".to_string());
        assert!(config.validate().is_err());
        config.resume.path = Some("/etc/resume.pdf".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn resume_file_name_may_contain_double_dots() {
        let mut config = SiteConfig::default();
        config.resume.path = Some("cv..final.pdf".to_string());
        config.validate().unwrap();
        config.resume.path = Some("docs/v2..draft/cv.pdf".to_string());
        config.validate().unwrap();
    }

    #[test]
    fn resume_href_uses_file_name() {
        let resume = ResumeConfig {
            path: Some("docs/cv-2025.pdf".to_string()),
        };
        assert_eq!(resume.href().as_deref(), Some("/cv-2025.pdf"));
        assert_eq!(ResumeConfig { path: None }.href(), None);
    }

    #[test]
    fn hidden_fields_from_contact_config() {
        let contact = ContactConfig {
            next: "https://me.example/#contact".to_string(),
            ..ContactConfig::default()
        };
        let hidden = contact.hidden_fields();
        assert_eq!(hidden.subject, "New message from portfolio");
        assert!(!hidden.captcha);
        assert_eq!(hidden.next, "https://me.example/#contact");
    }

    #[test]
    fn generate_css_uses_config_colors() {
        let mut colors = ColorConfig::default();
        colors.light.background = "#f0f0f0".to_string();
        colors.dark.background = "#1a1a1a".to_string();

        let css = generate_color_css(&colors);
        assert!(css.contains("--color-bg: #f0f0f0"));
        assert!(css.contains("--color-bg: #1a1a1a"));
        assert!(css.contains(r#":root[data-theme="dark"]"#));
        assert!(css.contains(":root:not([data-theme])"));
    }

    #[test]
    fn stock_config_parses_to_defaults() {
        let config: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = SiteConfig::default();
        assert_eq!(config.colors.dark.accent, defaults.colors.dark.accent);
        assert_eq!(config.contact.endpoint, defaults.contact.endpoint);
        assert_eq!(config.resume.path, defaults.resume.path);
        assert_eq!(config.analytics.plausible_domain, None);
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_overlay_replaces_leaf_and_keeps_siblings() {
        let base: toml::Value = toml::from_str("[a]\nx = 1\ny = 2\n").unwrap();
        let overlay: toml::Value = toml::from_str("[a]\ny = 3\n").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["a"]["x"].as_integer(), Some(1));
        assert_eq!(merged["a"]["y"].as_integer(), Some(3));
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();

        assert_eq!(config.colors.light.background, "#f6f4ef");
        assert_eq!(config.resume.path.as_deref(), Some("resume.pdf"));
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r##"
[contact]
endpoint = "https://formsubmit.co/ada@example.org"
next = "https://ada.example/#contact"

[analytics]
plausible_domain = "ada.example"
"##,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.contact.endpoint, "https://formsubmit.co/ada@example.org");
        assert_eq!(config.contact.subject, "New message from portfolio");
        assert_eq!(config.analytics.plausible_domain.as_deref(), Some("ada.example"));
        assert_eq!(config.analytics.script_src, "https://plausible.io/js/script.js");
    }

    #[test]
    fn load_config_rejects_invalid_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            "[sections]\nresearch_anchor = \"\"\n",
        )
        .unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn load_config_reports_bad_toml() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "[contact\n").unwrap();
        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Toml(_))));
    }
}
