#![forbid(unsafe_code)]

//! Contact form submission.
//!
//! Submitting swaps the button for a spinner, disables it, and arms a
//! completion timer. When the timer fires the collected fields go to a
//! [`SubmitTransport`]; the caller turns the result into a toast. The default
//! transport is a simulation that always succeeds.
//!
//! # State machine
//!
//! ```text
//! Idle --submit--> Sending --timer/Ok--> Idle (form reset)
//!                          --timer/Err-> Idle (fields kept)
//! ```
//!
//! A submit while `Sending` is ignored.

use std::fmt;

use tracing::{debug, info, warn};

use crate::config::FormConfig;
use crate::page::FormElements;
use crate::surface::ViewSurface;
use crate::timers::{TimerAction, Timers};

/// Style sheet key for the spinner.
pub const SPINNER_SHEET: &str = "folio-spinner";

/// Spinner rules injected on first submit.
pub const SPINNER_CSS: &str = "\
.spinner {
    width: 20px;
    height: 20px;
    border: 2px solid white;
    border-top-color: transparent;
    border-radius: 50%;
    animation: spin 1s linear infinite;
    display: inline-block;
}
@keyframes spin {
    to { transform: rotate(360deg); }
}
";

/// The named field values captured when the form was submitted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Submission {
    pub fields: Vec<(String, String)>,
}

impl Submission {
    /// Value of the first field called `name`.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// A transport refused or failed to deliver a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitError {
    message: String,
}

impl SubmitError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for SubmitError {}

/// Delivers a submission.
pub trait SubmitTransport {
    fn submit(&mut self, submission: &Submission) -> Result<(), SubmitError>;
}

/// Transport that accepts everything without sending anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedTransport;

impl SubmitTransport for SimulatedTransport {
    fn submit(&mut self, submission: &Submission) -> Result<(), SubmitError> {
        debug!(fields = submission.fields.len(), "simulated submit");
        Ok(())
    }
}

impl<T: SubmitTransport + ?Sized> SubmitTransport for Box<T> {
    fn submit(&mut self, submission: &Submission) -> Result<(), SubmitError> {
        (**self).submit(submission)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
enum FormState {
    #[default]
    Idle,
    Sending {
        original_label: String,
        submission: Submission,
    },
}

/// Contact form controller.
#[derive(Debug, Clone, Default)]
pub struct ContactForm {
    state: FormState,
}

impl ContactForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_sending(&self) -> bool {
        matches!(self.state, FormState::Sending { .. })
    }

    /// Start a submission. Returns `false` when ignored (no form, or one
    /// already in flight).
    pub fn submit<S: ViewSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        elements: Option<&FormElements>,
        config: &FormConfig,
        timers: &mut Timers,
    ) -> bool {
        let Some(elements) = elements else {
            debug!("submit without a contact form");
            return false;
        };
        if self.is_sending() {
            debug!("submission already in flight");
            return false;
        }
        let submission = Submission {
            fields: surface.form_fields(elements.form),
        };
        let original_label = match elements.submit {
            Some(button) => {
                let label = surface.inner_html(button).unwrap_or_default();
                surface.set_inner_html(button, &config.sending_label_html);
                surface.set_disabled(button, true);
                label
            }
            None => String::new(),
        };
        surface.inject_style_sheet(SPINNER_SHEET, SPINNER_CSS);
        timers.after(config.delay(), TimerAction::CompleteSubmit);
        debug!(fields = submission.fields.len(), "submission started");
        self.state = FormState::Sending {
            original_label,
            submission,
        };
        true
    }

    /// Finish the in-flight submission through `transport`.
    ///
    /// Returns `None` when nothing was in flight. On success the form is
    /// reset; in both cases the button is restored.
    pub fn complete<S, T>(
        &mut self,
        surface: &mut S,
        elements: Option<&FormElements>,
        transport: &mut T,
    ) -> Option<Result<(), SubmitError>>
    where
        S: ViewSurface + ?Sized,
        T: SubmitTransport + ?Sized,
    {
        let FormState::Sending {
            original_label,
            submission,
        } = std::mem::take(&mut self.state)
        else {
            return None;
        };
        let result = transport.submit(&submission);
        if let Some(elements) = elements {
            if result.is_ok() {
                surface.reset_form(elements.form);
            }
            if let Some(button) = elements.submit {
                surface.set_inner_html(button, &original_label);
                surface.set_disabled(button, false);
            }
        }
        match &result {
            Ok(()) => info!("contact form submitted"),
            Err(e) => warn!(error = %e, "contact form submission failed"),
        }
        Some(result)
    }
}
