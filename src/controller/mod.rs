//! The page controller: theme, scroll reveals and the contact form.
//!
//! The generated page runs a small script (`static/controller.js`) with the
//! same contract as the types here. The script does not hard-code its
//! messages or thresholds: [`ScriptSettings`] is serialized into the page so
//! both sides are driven by the constants in this module tree.
//!
//! | Module | Role |
//! |--------|------|
//! | [`theme`] | Resolve, persist and apply the light/dark preference |
//! | [`reveal`] | One-way pending → visible transitions on scroll |
//! | [`contact`] | Submission state machine over an async [`contact::Transport`] |
//! | [`analytics`] | Optional, best-effort event hook |

pub mod analytics;
pub mod contact;
pub mod reveal;
pub mod theme;

use serde::Serialize;
use std::hash::Hash;

use contact::{FormSubmitter, Transport};
use reveal::{IntersectionWatcher, RevealObserver};
use theme::{DocumentRoot, PreferenceStore, ThemeManager};

/// One controller per page load.
pub struct PageController<S, D, K, W, T>
where
    S: PreferenceStore,
    D: DocumentRoot,
    K: Eq + Hash + Clone,
    W: IntersectionWatcher<K>,
    T: Transport,
{
    pub theme: ThemeManager<S, D>,
    pub reveal: RevealObserver<K, W>,
    pub contact: FormSubmitter<T>,
}

impl<S, D, K, W, T> PageController<S, D, K, W, T>
where
    S: PreferenceStore,
    D: DocumentRoot,
    K: Eq + Hash + Clone,
    W: IntersectionWatcher<K>,
    T: Transport,
{
    pub fn mount(
        theme: ThemeManager<S, D>,
        targets: impl IntoIterator<Item = K>,
        watcher: W,
        contact: FormSubmitter<T>,
    ) -> Self {
        Self {
            theme,
            reveal: RevealObserver::mount(targets, watcher),
            contact,
        }
    }

    pub fn unmount(&mut self) {
        self.reveal.unmount();
    }
}

/// Settings consumed by the embedded page script.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScriptSettings {
    pub storage_key: &'static str,
    pub theme_attribute: &'static str,
    pub reveal_threshold: f64,
    pub reveal_class: &'static str,
    pub visible_class: &'static str,
    pub messages: ScriptMessages,
    pub events: ScriptEvents,
    pub analytics: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScriptMessages {
    pub sending: &'static str,
    pub success: &'static str,
    pub failure: &'static str,
    pub network: &'static str,
    pub submit: &'static str,
    pub submitting: &'static str,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScriptEvents {
    pub submit_attempt: &'static str,
    pub submit_success: &'static str,
    pub submit_error: &'static str,
    pub resume_click: &'static str,
    pub resume_location_prop: &'static str,
}

impl ScriptSettings {
    /// `analytics` tells the script whether an analytics hook is installed.
    pub fn new(analytics: bool) -> Self {
        Self {
            storage_key: theme::THEME_KEY,
            theme_attribute: theme::THEME_ATTRIBUTE,
            reveal_threshold: reveal::VISIBILITY_THRESHOLD,
            reveal_class: reveal::REVEAL_CLASS,
            visible_class: reveal::VISIBLE_CLASS,
            messages: ScriptMessages {
                sending: contact::SENDING_MESSAGE,
                success: contact::SUCCESS_MESSAGE,
                failure: contact::FAILURE_MESSAGE,
                network: contact::NETWORK_MESSAGE,
                submit: contact::SUBMIT_LABEL,
                submitting: contact::SUBMITTING_LABEL,
            },
            events: ScriptEvents {
                submit_attempt: analytics::SUBMIT_ATTEMPT,
                submit_success: analytics::SUBMIT_SUCCESS,
                submit_error: analytics::SUBMIT_ERROR,
                resume_click: analytics::RESUME_CLICK,
                resume_location_prop: analytics::RESUME_LOCATION_PROP,
            },
            analytics,
        }
    }

    /// JSON for an inline `<script type="application/json">` block.
    ///
    /// `<` is escaped so no value can close the surrounding script element.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        Ok(serde_json::to_string(self)?.replace('<', "\\u003c"))
    }
}
