//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Output leads with what the visitor will see (sections, entry counts,
//! status messages) and shows source files as indented `Source:` context.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Ada Lovelace (adalovelace)
//!
//! Sections
//! 001 About → #about
//!     Source: about.md
//! 002 Now → #now (2 items)
//! 003 Publications → #publications (3 entries)
//!     Source: publications.toml
//! 004 Contact → #contact
//!     Endpoint: https://formsubmit.co/ada@example.org
//!
//! Files
//!     resume.pdf → /resume.pdf
//!     assets/favicon.svg
//! ```
//!
//! ## Generate
//!
//! ```text
//! Home → index.html (4 sections, 3 publications)
//!     resume.pdf
//!     favicon.svg
//! ```
//!
//! ## Send
//!
//! ```text
//! success: Message sent successfully. I will get back to you as soon as possible.
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::content::{ABOUT_FILE, ASSETS_DIR, PROJECTS_FILE, PUBLICATIONS_FILE, SiteContent};
use crate::controller::contact::FormState;
use crate::generate::GenerateReport;
use std::path::PathBuf;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

// ============================================================================
// Check
// ============================================================================

/// Format the loaded content inventory.
pub fn format_content_output(content: &SiteContent) -> Vec<String> {
    let mut lines = Vec::new();
    let profile = &content.profile;
    lines.push(format!("{} ({})", profile.name, profile.brand));
    lines.push(format!("    {}", truncate_desc(&profile.headline, 60)));

    lines.push(String::new());
    lines.push("Sections".to_string());
    let sections = &content.config.sections;
    for (i, item) in content.navigation().iter().enumerate() {
        let header = format!("{} {} → #{}", format_index(i + 1), item.title, item.anchor);
        match item.anchor.as_str() {
            "about" => {
                lines.push(header);
                if content.about.is_some() {
                    lines.push(format!("    Source: {ABOUT_FILE}"));
                }
            }
            "now" => {
                lines.push(format!(
                    "{header} ({})",
                    plural(profile.now.len(), "item", "items")
                ));
            }
            "publications" => {
                lines.push(format!(
                    "{header} ({})",
                    plural(content.publications.len(), "entry", "entries")
                ));
                lines.push(format!("    Source: {PUBLICATIONS_FILE}"));
            }
            "contact" => {
                lines.push(header);
                lines.push(format!("    Endpoint: {}", content.config.contact.endpoint));
            }
            anchor if anchor == sections.research_anchor => {
                lines.push(format!(
                    "{header} ({})",
                    plural(content.projects.len(), "project", "projects")
                ));
                lines.push(format!("    Source: {PROJECTS_FILE}"));
            }
            _ => lines.push(header),
        }
    }

    let has_files = content.resume.is_some() || !content.assets.is_empty();
    if has_files {
        lines.push(String::new());
        lines.push("Files".to_string());
        if let (Some(rel), Some(href)) = (&content.config.resume.path, content.resume_href()) {
            lines.push(format!("    {rel} → {href}"));
        }
        for asset in &content.assets {
            let path = PathBuf::from(ASSETS_DIR).join(asset);
            lines.push(format!("    {}", path.display()));
        }
    }

    if !content.warnings.is_empty() {
        lines.push(String::new());
        lines.push("Warnings".to_string());
        for warning in &content.warnings {
            lines.push(format!("    {warning}"));
        }
    }

    lines
}

/// Print content inventory to stdout.
pub fn print_content_output(content: &SiteContent) {
    for line in format_content_output(content) {
        println!("{}", line);
    }
}

// ============================================================================
// Generate
// ============================================================================

/// Format generate stage output.
pub fn format_generate_output(report: &GenerateReport) -> Vec<String> {
    let mut detail = vec![plural(report.sections.len(), "section", "sections")];
    if report.publications > 0 {
        detail.push(plural(report.publications, "publication", "publications"));
    }
    if report.projects > 0 {
        detail.push(plural(report.projects, "project", "projects"));
    }

    let mut lines = vec![format!("Home → index.html ({})", detail.join(", "))];
    for file in report
        .files
        .iter()
        .filter(|f| f.as_os_str() != "index.html")
    {
        lines.push(format!("    {}", file.display()));
    }
    lines
}

/// Print generate output to stdout.
pub fn print_generate_output(report: &GenerateReport) {
    for line in format_generate_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Send
// ============================================================================

/// Format the final state of a contact form submission.
pub fn format_submit_output(state: &FormState) -> String {
    format!("{}: {}", state.status.as_str(), state.message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content;
    use crate::controller::contact::{NETWORK_MESSAGE, SubmissionStatus};
    use crate::test_helpers::*;
    use crate::types::NavItem;

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
    }

    #[test]
    fn truncate_is_char_safe() {
        assert_eq!(truncate_desc("short", 60), "short");
        assert_eq!(truncate_desc("ééééé", 2), "éé...");
    }

    #[test]
    fn content_output_lists_sections_in_order() {
        let tmp = setup_fixtures();
        let content = content::load(tmp.path()).unwrap();
        let lines = format_content_output(&content);

        assert_eq!(lines[0], "Ada Lovelace (adalovelace)");
        let sections: Vec<&String> = lines.iter().filter(|l| l.starts_with("00")).collect();
        assert_eq!(sections.len(), 4);
        assert_eq!(sections[0], "001 About → #about");
        assert_eq!(sections[1], "002 Now → #now (2 items)");
        assert_eq!(sections[2], "003 Publications → #publications (3 entries)");
        assert!(lines.contains(&"    Source: about.md".to_string()));
        assert!(lines.contains(&"    resume.pdf → /resume.pdf".to_string()));
        assert!(lines.contains(&"    assets/favicon.svg".to_string()));
        assert!(!lines.contains(&"Warnings".to_string()));
    }

    #[test]
    fn content_output_shows_warnings() {
        let tmp = setup_fixtures();
        std::fs::remove_file(tmp.path().join("resume.pdf")).unwrap();
        let content = content::load(tmp.path()).unwrap();
        let lines = format_content_output(&content);
        assert!(lines.contains(&"Warnings".to_string()));
        assert!(lines.iter().any(|l| l.contains("resume.pdf not found")));
    }

    #[test]
    fn generate_output_summarizes_files() {
        let report = GenerateReport {
            sections: vec![NavItem {
                title: "About".into(),
                anchor: "about".into(),
            }],
            publications: 1,
            projects: 0,
            files: vec![PathBuf::from("resume.pdf"), PathBuf::from("index.html")],
        };
        let lines = format_generate_output(&report);
        assert_eq!(
            lines,
            vec![
                "Home → index.html (1 section, 1 publication)".to_string(),
                "    resume.pdf".to_string(),
            ]
        );
    }

    #[test]
    fn submit_output_shows_status_and_message() {
        let state = FormState {
            status: SubmissionStatus::Error,
            message: NETWORK_MESSAGE.to_string(),
        };
        assert_eq!(
            format_submit_output(&state),
            "error: Network error while sending. Please retry or contact me via email."
        );
    }
}
