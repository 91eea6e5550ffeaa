//! Content directory loading.
//!
//! Stage 1 of the build. Reads the content directory into a [`SiteContent`]
//! that generation consumes.
//!
//! ## Directory Structure
//!
//! ```text
//! content/
//! ├── config.toml          # Site configuration (optional)
//! ├── profile.toml         # Identity, hero copy, links, "now" list (required)
//! ├── about.md             # About section body (optional)
//! ├── publications.toml    # [[publication]] entries
//! ├── projects.toml        # [[project]] entries
//! ├── resume.pdf           # Resume, location set by [resume] path
//! └── assets/              # Copied verbatim to the output root
//! ```
//!
//! ## Validation
//!
//! Malformed files are errors. Content that is merely missing for an enabled
//! section (no publications, no resume file) is reported as a warning and the
//! build carries on without it.

use crate::config::{self, SiteConfig};
use crate::types::{NavItem, Profile, Project, Publication};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

pub const PROFILE_FILE: &str = "profile.toml";
pub const ABOUT_FILE: &str = "about.md";
pub const PUBLICATIONS_FILE: &str = "publications.toml";
pub const PROJECTS_FILE: &str = "projects.toml";
pub const ASSETS_DIR: &str = "assets";

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Content directory not found: {0}")]
    NotADirectory(PathBuf),
    #[error("Missing profile.toml in {0}")]
    MissingProfile(PathBuf),
    #[error("Invalid {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Walking assets failed: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Everything the generator needs, loaded once.
#[derive(Debug)]
pub struct SiteContent {
    /// The content directory this was loaded from.
    pub root: PathBuf,
    pub config: SiteConfig,
    pub profile: Profile,
    /// Raw markdown of `about.md`.
    pub about: Option<String>,
    pub publications: Vec<Publication>,
    pub projects: Vec<Project>,
    /// Source path of the resume, when configured and present.
    pub resume: Option<PathBuf>,
    /// Files under `assets/`, relative to it, sorted.
    pub assets: Vec<PathBuf>,
    pub warnings: Vec<String>,
}

impl SiteContent {
    /// Top bar entries for the enabled sections, in page order.
    pub fn navigation(&self) -> Vec<NavItem> {
        let s = &self.config.sections;
        [
            (s.about, "About", "about"),
            (s.now && !self.profile.now.is_empty(), "Now", "now"),
            (s.research, "Research", s.research_anchor.as_str()),
            (s.publications, "Publications", "publications"),
            (s.contact, "Contact", "contact"),
        ]
        .into_iter()
        .filter(|(enabled, _, _)| *enabled)
        .map(|(_, title, anchor)| NavItem {
            title: title.to_string(),
            anchor: anchor.to_string(),
        })
        .collect()
    }

    pub fn asset_source(&self, rel: &Path) -> PathBuf {
        self.root.join(ASSETS_DIR).join(rel)
    }

    /// Site-root URL of the resume, if one will be published.
    pub fn resume_href(&self) -> Option<String> {
        self.resume.as_ref().and(self.config.resume.href())
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct PublicationsFile {
    #[serde(default)]
    publication: Vec<Publication>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ProjectsFile {
    #[serde(default)]
    project: Vec<Project>,
}

/// Load the content directory at `root`.
pub fn load(root: &Path) -> Result<SiteContent, ContentError> {
    if !root.is_dir() {
        return Err(ContentError::NotADirectory(root.to_path_buf()));
    }
    let config = config::load_config(root)?;
    let mut warnings = Vec::new();

    let profile_path = root.join(PROFILE_FILE);
    if !profile_path.exists() {
        return Err(ContentError::MissingProfile(root.to_path_buf()));
    }
    let profile: Profile = read_toml(&profile_path)?;

    let about_path = root.join(ABOUT_FILE);
    let about = if about_path.exists() {
        Some(fs::read_to_string(&about_path)?)
    } else {
        None
    };
    if config.sections.about && about.is_none() && profile.description.is_none() {
        warnings.push(format!(
            "about section enabled but {ABOUT_FILE} is missing and profile has no description"
        ));
    }

    let publications = read_optional::<PublicationsFile>(&root.join(PUBLICATIONS_FILE))?
        .map(|f| f.publication)
        .unwrap_or_default();
    if config.sections.publications && publications.is_empty() {
        warnings.push(format!(
            "publications section enabled but {PUBLICATIONS_FILE} has no entries"
        ));
    }

    let projects = read_optional::<ProjectsFile>(&root.join(PROJECTS_FILE))?
        .map(|f| f.project)
        .unwrap_or_default();
    if config.sections.research && projects.is_empty() {
        warnings.push(format!(
            "research section enabled but {PROJECTS_FILE} has no entries"
        ));
    }

    let resume = match &config.resume.path {
        Some(rel) => {
            let path = root.join(rel);
            if path.is_file() {
                Some(path)
            } else {
                warnings.push(format!("resume configured but {rel} not found"));
                None
            }
        }
        None => None,
    };

    let assets = list_assets(&root.join(ASSETS_DIR))?;

    for warning in &warnings {
        tracing::warn!("{warning}");
    }
    tracing::debug!(
        publications = publications.len(),
        projects = projects.len(),
        assets = assets.len(),
        "content loaded"
    );

    Ok(SiteContent {
        root: root.to_path_buf(),
        config,
        profile,
        about,
        publications,
        projects,
        resume,
        assets,
        warnings,
    })
}

fn read_toml<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, ContentError> {
    let text = fs::read_to_string(path)?;
    toml::from_str(&text).map_err(|source| ContentError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn read_optional<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Option<T>, ContentError> {
    if path.exists() {
        read_toml(path).map(Some)
    } else {
        Ok(None)
    }
}

fn list_assets(dir: &Path) -> Result<Vec<PathBuf>, ContentError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = entry?;
        if entry.file_type().is_file() {
            if let Ok(rel) = entry.path().strip_prefix(dir) {
                files.push(rel.to_path_buf());
            }
        }
    }
    files.sort();
    Ok(files)
}
