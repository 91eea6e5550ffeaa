//! Content records shared by loading, generation and CLI output.
//!
//! Everything here is read once at build time and never mutated.

use serde::{Deserialize, Serialize};

/// Identity and hero copy, from `profile.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Profile {
    /// Full name, used in the title and footer.
    pub name: String,
    /// Short wordmark in the top bar.
    pub brand: String,
    pub email: String,
    /// Small line above the headline.
    #[serde(default)]
    pub eyebrow: Option<String>,
    pub headline: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub hero_image: Option<HeroImage>,
    /// Topics shown as a dotted strip under the hero buttons.
    #[serde(default)]
    pub interests: Vec<String>,
    /// Compact links next to the brand (Scholar, LinkedIn, ...).
    #[serde(default)]
    pub profile_links: Vec<ProfileLink>,
    /// Publication profile linked at the top of the publications section.
    #[serde(default)]
    pub scholar_url: Option<String>,
    /// Bullet list for the "Now" section.
    #[serde(default)]
    pub now: Vec<String>,
    /// Paragraph shown under the contact form.
    #[serde(default)]
    pub contact_blurb: Option<String>,
    /// Extra links listed under the contact form.
    #[serde(default)]
    pub contact_links: Vec<ContactLink>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeroImage {
    pub src: String,
    pub alt: String,
    /// Inline markdown, typically the attribution.
    #[serde(default)]
    pub caption: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileLink {
    /// Visible text, e.g. `GS` or `in`.
    pub label: String,
    /// Accessible name, e.g. `Google Scholar`.
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContactLink {
    pub label: String,
    pub url: String,
}

/// A publication list entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Publication {
    pub citation: String,
    #[serde(default)]
    pub doi: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Where a publication entry points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicationLink {
    Doi { href: String, label: String },
    Article { href: String },
    Pending,
}

impl Publication {
    /// A DOI wins over a plain URL; neither yields [`PublicationLink::Pending`].
    /// Blank values count as absent.
    pub fn link(&self) -> PublicationLink {
        let non_blank = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        if let Some(doi) = non_blank(&self.doi) {
            PublicationLink::Doi {
                href: format!("https://doi.org/{doi}"),
                label: format!("DOI: {doi}"),
            }
        } else if let Some(url) = non_blank(&self.url) {
            PublicationLink::Article { href: url }
        } else {
            PublicationLink::Pending
        }
    }
}

/// A research/project card.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Project {
    pub title: String,
    pub description: String,
    #[serde(default = "default_project_link")]
    pub link: String,
    #[serde(default = "default_project_label")]
    pub label: String,
}

fn default_project_link() -> String {
    "#".to_string()
}

fn default_project_label() -> String {
    "Details".to_string()
}

/// One entry of the top bar navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub title: String,
    /// In-page anchor id, without the `#`.
    pub anchor: String,
}
