//! HTML site generation.
//!
//! Stage 2 of the build. Takes the loaded [`SiteContent`] and writes the
//! final static site.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html      # The whole portfolio, CSS and script inlined
//! ├── resume.pdf      # Copied from [resume] path, if present
//! └── favicon.svg     # Everything under content/assets/, verbatim
//! ```
//!
//! ## Page Layout
//!
//! One template covers every variant of the site. `[sections]` decides which
//! of About, Now, Research/Projects, Publications and Contact are rendered,
//! and the top bar navigation is derived from the same flags.
//!
//! ## CSS and JavaScript
//!
//! Static assets are embedded at compile time:
//! - `static/style.css`: Base styles (colors injected from config)
//! - `static/controller.js`: Theme toggle, scroll reveals, contact form
//!
//! The script reads its messages, storage key and reveal threshold from a
//! JSON block built from [`ScriptSettings`], so it cannot drift from the
//! Rust controller.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Templates are type-safe Rust code with automatic XSS escaping.

use crate::config::{self, ThemeConfig};
use crate::content::SiteContent;
use crate::controller::ScriptSettings;
use crate::controller::analytics::ResumeLocation;
use crate::controller::contact::SUBMIT_LABEL;
use crate::controller::theme::{
    MemoryStore, RootAttributes, THEME_ATTRIBUTE, THEME_KEY, ThemeManager, ThemePreference,
};
use crate::types::{NavItem, Profile, Project, Publication, PublicationLink};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Parser, html as md_html};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

const CSS_STATIC: &str = include_str!("../static/style.css");
const JS: &str = include_str!("../static/controller.js");

const NOSCRIPT_CSS: &str = ".page-shell, .reveal { opacity: 1; transform: none; }";

/// What a generate run wrote, for CLI output.
#[derive(Debug, Default)]
pub struct GenerateReport {
    pub sections: Vec<NavItem>,
    pub publications: usize,
    pub projects: usize,
    /// Output-relative paths of every file written.
    pub files: Vec<PathBuf>,
}

pub fn generate(content: &SiteContent, output_dir: &Path) -> Result<GenerateReport, GenerateError> {
    fs::create_dir_all(output_dir)?;
    let mut report = GenerateReport {
        sections: content.navigation(),
        publications: if content.config.sections.publications {
            content.publications.len()
        } else {
            0
        },
        projects: if content.config.sections.research {
            content.projects.len()
        } else {
            0
        },
        files: Vec::new(),
    };

    for rel in &content.assets {
        let dst = output_dir.join(rel);
        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(content.asset_source(rel), &dst)?;
        report.files.push(rel.clone());
    }

    if let Some(src) = &content.resume {
        if let Some(name) = src.file_name() {
            fs::copy(src, output_dir.join(name))?;
            report.files.push(PathBuf::from(name));
        }
    }

    let page = render_page(content)?;
    fs::write(output_dir.join("index.html"), page.into_string())?;
    report.files.push(PathBuf::from("index.html"));
    tracing::info!(output = %output_dir.display(), files = report.files.len(), "site generated");

    Ok(report)
}

/// Root attributes rendered on `<html>` before the script runs.
///
/// A forced default is resolved exactly as a stored preference would be.
/// With `system`, nothing is set and the stylesheet follows the OS until the
/// script applies the visitor's choice.
pub fn initial_root(theme: &ThemeConfig) -> RootAttributes {
    match theme.default.forced() {
        Some(forced) => {
            let store = MemoryStore::with_entry(THEME_KEY, forced.as_str());
            let manager = ThemeManager::init(store, RootAttributes::default(), false);
            manager.into_parts().1
        }
        None => RootAttributes::default(),
    }
}

fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new(markdown);
    let mut out = String::new();
    md_html::push_html(&mut out, parser);
    out
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the full page.
pub fn render_page(content: &SiteContent) -> Result<Markup, GenerateError> {
    let cfg = &content.config;
    let analytics = cfg.analytics.plausible_domain.is_some();
    let settings = ScriptSettings::new(analytics).to_json()?;
    let css = format!(
        "{}\n\n{}",
        config::generate_color_css(&cfg.colors),
        CSS_STATIC
    );
    let root = initial_root(&cfg.theme);
    let theme = root
        .get(THEME_ATTRIBUTE)
        .and_then(|t| t.parse().ok())
        .unwrap_or(ThemePreference::Light);
    let resume = content.resume_href();
    let profile = &content.profile;

    let body = html! {
        div.page-shell {
            a.skip-link href="#home" { "Skip to content" }
            div.noise {}
            (topbar(profile, &content.navigation(), resume.as_deref(), theme))
            main id="home" {
                (hero(content, resume.as_deref()))
                @if cfg.sections.about {
                    (about_section(content, resume.as_deref()))
                }
                @if cfg.sections.now && !profile.now.is_empty() {
                    (now_section(&profile.now))
                }
                @if cfg.sections.research {
                    (research_section(
                        &cfg.sections.research_anchor,
                        &cfg.sections.research_heading,
                        &content.projects,
                    ))
                }
                @if cfg.sections.publications {
                    (publications_section(profile, &content.publications))
                }
                @if cfg.sections.contact {
                    (contact_section(content, resume.as_deref()))
                }
            }
            footer {
                p { "© " span data-year {} " " (profile.name) }
            }
        }
        script type="application/json" id="folio-settings" { (PreEscaped(settings)) }
        script { (PreEscaped(JS)) }
    };

    Ok(html! {
        (DOCTYPE)
        html lang="en"
            data-theme=[root.get(THEME_ATTRIBUTE)]
            data-theme-default=[cfg.theme.default.forced().map(ThemePreference::as_str)]
            style=[root.style()] {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (profile.name) }
                @if let Some(desc) = profile.description.as_ref().or(profile.subtitle.as_ref()) {
                    meta name="description" content=(desc);
                }
                @if let Some(domain) = &cfg.analytics.plausible_domain {
                    script defer data-domain=(domain) src=(cfg.analytics.script_src) {}
                }
                style { (PreEscaped(css)) }
                noscript { style { (PreEscaped(NOSCRIPT_CSS)) } }
            }
            body {
                (body)
            }
        }
    })
}

fn external_link(href: &str, text: &str) -> Markup {
    html! {
        a href=(href) target="_blank" rel="noreferrer" { (text) }
    }
}

fn resume_link(href: &str, text: &str, location: ResumeLocation, class: Option<&str>) -> Markup {
    html! {
        a class=[class] href=(href) target="_blank" rel="noreferrer" data-resume-location=(location.as_str()) {
            (text)
        }
    }
}

/// Renders the sticky top bar: brand, profile links, navigation, theme toggle.
fn topbar(
    profile: &Profile,
    nav: &[NavItem],
    resume: Option<&str>,
    theme: ThemePreference,
) -> Markup {
    html! {
        header.topbar {
            div.brand-wrap {
                a.brand href="#home" { (profile.brand) }
                @if !profile.profile_links.is_empty() {
                    div.profile-links aria-label="Profile links" {
                        @for link in &profile.profile_links {
                            a href=(link.url) target="_blank" rel="noreferrer" aria-label=(link.title) {
                                (link.label)
                            }
                        }
                    }
                }
            }
            (render_nav(nav, resume, theme))
        }
    }
}

/// Renders the in-page navigation.
pub fn render_nav(items: &[NavItem], resume: Option<&str>, theme: ThemePreference) -> Markup {
    html! {
        nav aria-label="Main navigation" {
            @for item in items {
                a href={ "#" (item.anchor) } { (item.title) }
            }
            @if let Some(href) = resume {
                (resume_link(href, "Resume", ResumeLocation::Nav, None))
            }
            button.theme-toggle type="button" aria-label=(theme.toggle_aria_label()) {
                (theme.toggle_label())
            }
        }
    }
}

fn hero(content: &SiteContent, resume: Option<&str>) -> Markup {
    let profile = &content.profile;
    let sections = &content.config.sections;
    let primary = if sections.publications {
        Some(("#publications".to_string(), "View Publications"))
    } else if sections.research {
        Some((format!("#{}", sections.research_anchor), "View Projects"))
    } else {
        None
    };

    html! {
        section.hero.reveal {
            @if let Some(eyebrow) = &profile.eyebrow {
                p.eyebrow { (eyebrow) }
            }
            h1 { (profile.headline) }
            @if let Some(subtitle) = &profile.subtitle {
                p.subtitle { (subtitle) }
            }
            @if let Some(image) = &profile.hero_image {
                figure.hero-media {
                    img src=(image.src) alt=(image.alt) loading="lazy";
                    @if let Some(caption) = &image.caption {
                        figcaption { (PreEscaped(markdown_to_html(caption))) }
                    }
                }
            }
            div.cta-row {
                @if let Some((href, label)) = &primary {
                    a.btn.primary href=(href) { (*label) }
                }
                @if sections.contact {
                    a.btn.ghost href="#contact" { "Contact Me" }
                }
                @if let Some(href) = resume {
                    (resume_link(href, "View Resume", ResumeLocation::Hero, Some("btn ghost")))
                }
            }
            @if !profile.interests.is_empty() {
                div.interest-strip aria-label="Research interests" {
                    (profile.interests.join(" · "))
                }
            }
        }
    }
}

fn about_section(content: &SiteContent, resume: Option<&str>) -> Markup {
    let profile = &content.profile;
    let body = content
        .about
        .as_deref()
        .or(profile.description.as_deref())
        .map(markdown_to_html);

    html! {
        section.panel.reveal id="about" {
            h2 { "About Me" }
            @if let Some(body) = body {
                (PreEscaped(body))
            }
            p {
                "Email: "
                a href={ "mailto:" (profile.email) } { (profile.email) }
            }
            @if let Some(href) = resume {
                p {
                    "CV: "
                    (resume_link(href, "Open Resume (PDF)", ResumeLocation::About, None))
                }
            }
        }
    }
}

fn now_section(items: &[String]) -> Markup {
    html! {
        section.panel.reveal id="now" {
            h2 { "Now" }
            ul.now-list {
                @for item in items {
                    li { (item) }
                }
            }
        }
    }
}

fn research_section(anchor: &str, heading: &str, projects: &[Project]) -> Markup {
    html! {
        section.panel.reveal id=(anchor) {
            h2 { (heading) }
            div.grid {
                @for project in projects {
                    article.card {
                        h3 { (project.title) }
                        p { (project.description) }
                        a href=(project.link) { (project.label) }
                    }
                }
            }
        }
    }
}

fn publication_item(publication: &Publication) -> Markup {
    html! {
        li {
            span { (publication.citation) }
            @match publication.link() {
                PublicationLink::Doi { href, label } => {
                    (external_link(&href, &label))
                }
                PublicationLink::Article { href } => {
                    (external_link(&href, "Published Article"))
                }
                PublicationLink::Pending => {
                    span.pub-note { "DOI pending" }
                }
            }
        }
    }
}

fn publications_section(profile: &Profile, publications: &[Publication]) -> Markup {
    html! {
        section.panel.reveal id="publications" {
            h2 { "Publications" }
            @if let Some(url) = &profile.scholar_url {
                p {
                    "Google Scholar: "
                    (external_link(url, "View profile"))
                }
            }
            ol.pub-list {
                @for publication in publications {
                    (publication_item(publication))
                }
            }
        }
    }
}

fn contact_section(content: &SiteContent, resume: Option<&str>) -> Markup {
    let profile = &content.profile;
    let contact = &content.config.contact;

    html! {
        section.panel.reveal id="contact" {
            h2 { "Contact" }
            p { "Send me a message directly from this page:" }
            form.contact-form action=(contact.endpoint) method="POST" aria-label="Contact form" novalidate {
                input type="hidden" name="_subject" value=(contact.subject);
                input type="hidden" name="_captcha" value=(if contact.captcha { "true" } else { "false" });
                input type="hidden" name="_next" value=(contact.next);
                label for="name" { "Name" }
                input id="name" name="name" type="text" autocomplete="name" required;
                label for="email" { "Email" }
                input id="email" name="email" type="email" autocomplete="email" required;
                label for="message" { "Message" }
                textarea id="message" name="message" rows="5" required {}
                button.btn.primary type="submit" { (SUBMIT_LABEL) }
                p.form-status.idle role="status" aria-live="polite" {}
            }
            @if let Some(blurb) = &profile.contact_blurb {
                p { (blurb) }
            }
            p { "Or reach out here:" }
            ul.contact-list {
                li { a href={ "mailto:" (profile.email) } { (profile.email) } }
                @for link in &profile.contact_links {
                    li { a href=(link.url) { (link.label) } }
                }
                @if let Some(href) = resume {
                    li { (resume_link(href, "Resume (PDF)", ResumeLocation::Contact, None)) }
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
