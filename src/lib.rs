//! # Folio
//!
//! A static generator for single-page academic portfolios. A content
//! directory of TOML and markdown becomes one `index.html` with a theme
//! toggle, scroll-reveal sections and an AJAX contact form.
//!
//! # Architecture: Two Stages and a Controller
//!
//! ```text
//! 1. Load      content/     →  SiteContent   (files → typed records + warnings)
//! 2. Generate  SiteContent  →  dist/         (index.html, resume, assets)
//! ```
//!
//! The page's client-side behavior lives in [`controller`]: theme
//! resolution, reveal-on-scroll bookkeeping and the contact form state
//! machine are plain Rust types behind small traits for the browser pieces
//! (storage, root element, intersection observer, HTTP). The generator
//! renders the initial state with those same types and embeds their
//! constants as JSON for the bundled script, so the page and the tests agree
//! on every label, threshold and message.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `config.toml` loading over stock defaults, validation, CSS color generation |
//! | [`content`] | Stage 1: reads the content directory into [`content::SiteContent`] |
//! | [`generate`] | Stage 2: renders the page with Maud and writes the output directory |
//! | [`controller`] | Theme, reveal and contact form controllers plus analytics hooks |
//! | [`types`] | Content records (`Profile`, `Publication`, `Project`, `NavItem`) |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/). Malformed markup
//! is a compile error and all interpolation is escaped, which matters here
//! because citations and captions come straight from user files.
//!
//! ## No Flash of the Wrong Theme
//!
//! When `[theme] default` forces a scheme, `data-theme` and `color-scheme`
//! are written on `<html>` at build time. With `system`, the stylesheet's
//! `prefers-color-scheme` block covers the first paint until the script
//! applies a stored preference.
//!
//! ## Works Without JavaScript
//!
//! A `<noscript>` stylesheet shows every reveal section, and the contact form
//! is a real `<form method="post">` so it still submits without the script.

pub mod config;
pub mod content;
pub mod controller;
pub mod generate;
pub mod output;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
