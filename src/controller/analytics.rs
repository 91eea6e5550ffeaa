//! Best-effort analytics events.
//!
//! The hook is optional. Tracking with no hook installed does nothing and
//! never fails.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

pub const SUBMIT_ATTEMPT: &str = "Contact Form Submit Attempt";
pub const SUBMIT_SUCCESS: &str = "Contact Form Submit Success";
pub const SUBMIT_ERROR: &str = "Contact Form Submit Error";
pub const RESUME_CLICK: &str = "Resume Click";

pub type EventProps = BTreeMap<String, String>;

type Hook = dyn Fn(&str, &EventProps) + Send + Sync;

#[derive(Clone, Default)]
pub struct Analytics {
    hook: Option<Arc<Hook>>,
}

impl Analytics {
    /// Analytics with no hook: every event is dropped.
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn with_hook<F>(hook: F) -> Self
    where
        F: Fn(&str, &EventProps) + Send + Sync + 'static,
    {
        Self {
            hook: Some(Arc::new(hook)),
        }
    }

    /// Hook that records every event as a `tracing` event.
    pub fn tracing() -> Self {
        Self::with_hook(|name, props| {
            tracing::info!(event = name, ?props, "analytics");
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.hook.is_some()
    }

    pub fn track(&self, name: &str) {
        self.track_with(name, &EventProps::new());
    }

    pub fn track_with(&self, name: &str, props: &EventProps) {
        if let Some(hook) = &self.hook {
            hook(name, props);
        }
    }
}

impl fmt::Debug for Analytics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Analytics")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

/// Prop naming where a [`RESUME_CLICK`] came from.
pub const RESUME_LOCATION_PROP: &str = "location";

/// Places on the page that link the resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeLocation {
    Nav,
    Hero,
    About,
    Contact,
}

impl ResumeLocation {
    pub fn as_str(self) -> &'static str {
        match self {
            ResumeLocation::Nav => "nav",
            ResumeLocation::Hero => "hero",
            ResumeLocation::About => "about",
            ResumeLocation::Contact => "contact",
        }
    }
}
