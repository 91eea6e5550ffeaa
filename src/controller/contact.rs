//! Contact form submission.
//!
//! ```text
//!            submit                 2xx
//!  Idle ───────────────► Submitting ─────► Success
//!                          │    ▲
//!            non-2xx /     │    │ submit
//!            transport err ▼    │
//!                          Error ┘   (Success ──submit──► Submitting too)
//! ```
//!
//! `Idle` is only the initial state. While `Submitting`, the submit control is
//! disabled and further submits are ignored, which is the only guard against
//! duplicate posts. There is no timeout and no automatic retry: a failed
//! attempt stays failed until the visitor submits again.

use super::analytics::{self, Analytics};
use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard, PoisonError};

pub const SENDING_MESSAGE: &str = "Sending your message...";
pub const SUCCESS_MESSAGE: &str =
    "Message sent successfully. I will get back to you as soon as possible.";
pub const FAILURE_MESSAGE: &str =
    "Message could not be sent right now. Please try again, or email me directly.";
pub const NETWORK_MESSAGE: &str =
    "Network error while sending. Please retry or contact me via email.";

pub const SUBMIT_LABEL: &str = "Send Message";
pub const SUBMITTING_LABEL: &str = "Sending...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Submitting,
    Success,
    Error,
}

impl SubmissionStatus {
    /// Class name applied to the status element.
    pub fn as_str(self) -> &'static str {
        match self {
            SubmissionStatus::Idle => "idle",
            SubmissionStatus::Submitting => "submitting",
            SubmissionStatus::Success => "success",
            SubmissionStatus::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormState {
    pub status: SubmissionStatus,
    pub message: String,
}

impl FormState {
    fn new(status: SubmissionStatus, message: &str) -> Self {
        Self {
            status,
            message: message.to_string(),
        }
    }
}

/// Fields the visitor types.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFields {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactFields {
    pub fn new(name: &str, email: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            message: message.to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.email.is_empty() && self.message.is_empty()
    }
}

/// Relay directives sent alongside the visitor's fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HiddenFields {
    pub subject: String,
    pub captcha: bool,
    pub next: String,
}

/// Form-encoded body, in the order the relay documents them.
pub fn encode_fields(hidden: &HiddenFields, fields: &ContactFields) -> Vec<(String, String)> {
    [
        ("_subject", hidden.subject.as_str()),
        ("_captcha", if hidden.captcha { "true" } else { "false" }),
        ("_next", hidden.next.as_str()),
        ("name", fields.name.as_str()),
        ("email", fields.email.as_str()),
        ("message", fields.message.as_str()),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),
    #[error("request did not complete: {0}")]
    Request(String),
}

/// Posts a form and reports the HTTP status code.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_form(
        &self,
        endpoint: &str,
        fields: &[(String, String)],
    ) -> Result<u16, TransportError>;
}

/// [`Transport`] over reqwest. The response body is never read.
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("folio/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::ClientBuild(e.to_string()))?;
        Ok(Self { http })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_form(
        &self,
        endpoint: &str,
        fields: &[(String, String)],
    ) -> Result<u16, TransportError> {
        let response = self
            .http
            .post(endpoint)
            .header(reqwest::header::ACCEPT, "application/json")
            .form(fields)
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;
        Ok(response.status().as_u16())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A submission was already in flight; nothing happened.
    Ignored,
    Completed(FormState),
}

struct Inner {
    state: FormState,
    fields: ContactFields,
}

pub struct FormSubmitter<T> {
    endpoint: String,
    hidden: HiddenFields,
    transport: T,
    analytics: Analytics,
    inner: Mutex<Inner>,
}

impl<T: Transport> FormSubmitter<T> {
    pub fn new(
        endpoint: impl Into<String>,
        hidden: HiddenFields,
        transport: T,
        analytics: Analytics,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            hidden,
            transport,
            analytics,
            inner: Mutex::new(Inner {
                state: FormState::default(),
                fields: ContactFields::default(),
            }),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn state(&self) -> FormState {
        self.lock().state.clone()
    }

    pub fn fields(&self) -> ContactFields {
        self.lock().fields.clone()
    }

    pub fn set_fields(&self, fields: ContactFields) {
        self.lock().fields = fields;
    }

    pub fn submit_enabled(&self) -> bool {
        self.lock().state.status != SubmissionStatus::Submitting
    }

    pub fn submit_label(&self) -> &'static str {
        if self.submit_enabled() {
            SUBMIT_LABEL
        } else {
            SUBMITTING_LABEL
        }
    }

    /// Run one submission to completion.
    ///
    /// Returns [`SubmitOutcome::Ignored`] without side effects when a
    /// submission is already in flight.
    pub async fn submit(&self) -> SubmitOutcome {
        let body = {
            let mut inner = self.lock();
            if inner.state.status == SubmissionStatus::Submitting {
                tracing::debug!("submit ignored: already submitting");
                return SubmitOutcome::Ignored;
            }
            inner.state = FormState::new(SubmissionStatus::Submitting, SENDING_MESSAGE);
            encode_fields(&self.hidden, &inner.fields)
        };
        self.analytics.track(analytics::SUBMIT_ATTEMPT);
        tracing::info!(endpoint = %self.endpoint, "submitting contact form");

        let result = self.transport.post_form(&self.endpoint, &body).await;

        let state = {
            let mut inner = self.lock();
            let next = match &result {
                Ok(status) if (200..300).contains(status) => {
                    inner.fields = ContactFields::default();
                    FormState::new(SubmissionStatus::Success, SUCCESS_MESSAGE)
                }
                Ok(status) => {
                    tracing::warn!(status, "contact endpoint rejected submission");
                    FormState::new(SubmissionStatus::Error, FAILURE_MESSAGE)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "contact submission failed in transport");
                    FormState::new(SubmissionStatus::Error, NETWORK_MESSAGE)
                }
            };
            inner.state = next.clone();
            next
        };

        match state.status {
            SubmissionStatus::Success => self.analytics.track(analytics::SUBMIT_SUCCESS),
            _ => self.analytics.track(analytics::SUBMIT_ERROR),
        }
        SubmitOutcome::Completed(state)
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    const ENDPOINT: &str = "https://relay.example/inbox@example.org";

    fn hidden() -> HiddenFields {
        HiddenFields {
            subject: "New message from portfolio".to_string(),
            captcha: false,
            next: "https://example.org/#contact".to_string(),
        }
    }

    fn filled() -> ContactFields {
        ContactFields::new("Ada", "ada@example.org", "Hello there")
    }

    /// Answers every post with a fixed result and records what was sent.
    struct Scripted {
        status: Option<u16>,
        sent: Mutex<Vec<(String, Vec<(String, String)>)>>,
    }

    impl Scripted {
        fn status(status: u16) -> Self {
            Self {
                status: Some(status),
                sent: Mutex::new(Vec::new()),
            }
        }

        fn unreachable() -> Self {
            Self {
                status: None,
                sent: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Transport for Scripted {
        async fn post_form(
            &self,
            endpoint: &str,
            fields: &[(String, String)],
        ) -> Result<u16, TransportError> {
            self.sent
                .lock()
                .unwrap()
                .push((endpoint.to_string(), fields.to_vec()));
            self.status
                .ok_or_else(|| TransportError::Request("connection refused".into()))
        }
    }

    /// Holds every post until released.
    struct Gated {
        gate: Arc<Notify>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Transport for Gated {
        async fn post_form(
            &self,
            _endpoint: &str,
            _fields: &[(String, String)],
        ) -> Result<u16, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.gate.notified().await;
            Ok(200)
        }
    }

    fn recording_analytics() -> (Analytics, Arc<Mutex<Vec<String>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let analytics = Analytics::with_hook(move |name, _| {
            sink.lock().unwrap().push(name.to_string());
        });
        (analytics, events)
    }

    fn submitter<T: Transport>(transport: T, analytics: Analytics) -> FormSubmitter<T> {
        let s = FormSubmitter::new(ENDPOINT, hidden(), transport, analytics);
        s.set_fields(filled());
        s
    }

    #[test]
    fn starts_idle_and_enabled() {
        let s = submitter(Scripted::status(200), Analytics::disabled());
        assert_eq!(s.state().status, SubmissionStatus::Idle);
        assert!(s.state().message.is_empty());
        assert!(s.submit_enabled());
        assert_eq!(s.submit_label(), "Send Message");
    }

    #[test]
    fn encodes_all_relay_fields_in_order() {
        let body = encode_fields(&hidden(), &filled());
        let keys: Vec<&str> = body.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            keys,
            vec!["_subject", "_captcha", "_next", "name", "email", "message"]
        );
        assert_eq!(body[1].1, "false");
        assert_eq!(body[4].1, "ada@example.org");
    }

    #[tokio::test]
    async fn success_clears_fields_and_reports_confirmation() {
        let (analytics, events) = recording_analytics();
        let s = submitter(Scripted::status(200), analytics);

        let outcome = s.submit().await;

        let expected = FormState {
            status: SubmissionStatus::Success,
            message: "Message sent successfully. I will get back to you as soon as possible."
                .to_string(),
        };
        assert_eq!(outcome, SubmitOutcome::Completed(expected.clone()));
        assert_eq!(s.state(), expected);
        assert!(s.fields().is_empty());
        assert_eq!(
            *events.lock().unwrap(),
            vec![
                "Contact Form Submit Attempt".to_string(),
                "Contact Form Submit Success".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn posts_to_configured_endpoint() {
        let s = submitter(Scripted::status(204), Analytics::disabled());
        s.submit().await;
        let sent = s.transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, ENDPOINT);
        assert!(sent[0].1.contains(&("name".to_string(), "Ada".to_string())));
    }

    #[tokio::test]
    async fn server_error_keeps_fields_and_reports_retry_guidance() {
        let (analytics, events) = recording_analytics();
        let s = submitter(Scripted::status(500), analytics);

        s.submit().await;

        let state = s.state();
        assert_eq!(state.status, SubmissionStatus::Error);
        assert_eq!(
            state.message,
            "Message could not be sent right now. Please try again, or email me directly."
        );
        assert_eq!(s.fields(), filled());
        assert_eq!(
            events.lock().unwrap().last().map(String::as_str),
            Some("Contact Form Submit Error")
        );
    }

    #[tokio::test]
    async fn validation_rejection_uses_the_same_message() {
        let s = submitter(Scripted::status(422), Analytics::disabled());
        s.submit().await;
        assert_eq!(s.state().message, FAILURE_MESSAGE);
    }

    #[tokio::test]
    async fn transport_failure_reports_network_error() {
        let (analytics, events) = recording_analytics();
        let s = submitter(Scripted::unreachable(), analytics);

        s.submit().await;

        let state = s.state();
        assert_eq!(state.status, SubmissionStatus::Error);
        assert_eq!(
            state.message,
            "Network error while sending. Please retry or contact me via email."
        );
        assert_eq!(s.fields(), filled());
        assert_eq!(events.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn resubmit_after_error_goes_straight_to_submitting() {
        let s = submitter(Scripted::status(500), Analytics::disabled());
        s.submit().await;
        assert_eq!(s.state().status, SubmissionStatus::Error);

        let outcome = s.submit().await;
        assert!(matches!(outcome, SubmitOutcome::Completed(_)));
        assert_eq!(s.transport.sent.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn submit_while_submitting_is_ignored() {
        let gate = Arc::new(Notify::new());
        let transport = Gated {
            gate: gate.clone(),
            calls: AtomicUsize::new(0),
        };
        let s = submitter(transport, Analytics::disabled());

        let (first, second) = tokio::join!(s.submit(), async {
            assert_eq!(s.state().status, SubmissionStatus::Submitting);
            assert_eq!(s.state().message, "Sending your message...");
            assert!(!s.submit_enabled());
            assert_eq!(s.submit_label(), "Sending...");
            let second = s.submit().await;
            gate.notify_one();
            second
        });

        assert_eq!(second, SubmitOutcome::Ignored);
        assert!(matches!(first, SubmitOutcome::Completed(ref st) if st.status == SubmissionStatus::Success));
        assert_eq!(s.transport.calls.load(Ordering::SeqCst), 1);
        assert!(s.submit_enabled());
    }

    #[tokio::test]
    async fn missing_analytics_hook_is_silent() {
        let s = submitter(Scripted::unreachable(), Analytics::disabled());
        let outcome = s.submit().await;
        assert!(matches!(outcome, SubmitOutcome::Completed(_)));
    }
}
