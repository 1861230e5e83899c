//! Contact form submission gate
//!
//! Screens contact-form submissions before they reach the email collaborator:
//! a hidden honeypot field catches naive bots, a minimum fill time catches
//! forms completed implausibly fast, and an in-flight flag prevents duplicate
//! sends while a delivery is pending. Rejections are outcomes, never errors;
//! the bot cases produce nothing a caller could use to tell they were caught.
//!
//! Clearing the form and issuing a fresh start timestamp after a successful
//! send is the presentation layer's job; the gate only decides and forwards.

pub mod email;

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};

pub use email::{EmailError, EmailMessage, EmailSender, OutboxSender, SUCCESS_STATUS};

/// Minimum time between the form being issued and a believable submission
pub const MIN_FILL_TIME_MS: i64 = 2000;

/// A contact form submission attempt
#[derive(Debug, Clone)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
    /// Hidden field legitimate users never fill
    pub honeypot: String,
    /// When the form instance was issued
    pub started_at: DateTime<Utc>,
}

impl ContactSubmission {
    /// Screen a submission without side effects.
    ///
    /// Honeypot takes precedence over the fill-time check; a submission at
    /// exactly [`MIN_FILL_TIME_MS`] passes.
    pub fn screen(&self, now: DateTime<Utc>) -> Screening {
        if !self.honeypot.is_empty() {
            return Screening::DropSilently;
        }
        if (now - self.started_at).num_milliseconds() < MIN_FILL_TIME_MS {
            return Screening::TooFast;
        }
        Screening::Forward
    }

    /// The message this submission would hand to the email collaborator
    pub fn to_message(&self) -> EmailMessage {
        EmailMessage {
            from_name: self.name.clone(),
            reply_to: self.email.clone(),
            message: self.message.clone(),
        }
    }
}

/// Result of screening a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screening {
    /// Hand the submission to the email collaborator
    Forward,
    /// Bot signature: drop without any user-visible feedback
    DropSilently,
    /// Filled too fast: reject with an advisory
    TooFast,
}

/// Outcome of a submission attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Dropped without user-visible feedback (in-flight duplicate or bot)
    Ignored,
    /// Rejected with an advisory asking the user to slow down
    TooFast,
    /// Forwarded and acknowledged by the sender
    Sent,
    /// Forwarding failed; the form should keep its fields for a retry
    Failed(String),
}

/// Gate between the contact form and the email collaborator.
///
/// Holds the single in-flight flag, so one gate instance serves the whole
/// site. At most one delivery is pending at any time; attempts made while
/// one is pending are ignored rather than queued.
pub struct ContactGate<S> {
    sender: S,
    in_flight: AtomicBool,
}

impl<S: EmailSender> ContactGate<S> {
    /// Create a gate forwarding accepted submissions to `sender`
    pub fn new(sender: S) -> Self {
        Self {
            sender,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Decide on a submission and forward it if it passes.
    ///
    /// Checks run in order: in-flight duplicate, honeypot, fill time. An
    /// accepted submission produces exactly one call to the sender.
    pub async fn submit(&self, submission: &ContactSubmission, now: DateTime<Utc>) -> SubmitOutcome {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("Contact submission ignored: another send is in flight");
            return SubmitOutcome::Ignored;
        }

        let outcome = match submission.screen(now) {
            Screening::DropSilently => {
                tracing::debug!("Contact submission dropped by honeypot");
                SubmitOutcome::Ignored
            }
            Screening::TooFast => SubmitOutcome::TooFast,
            Screening::Forward => match self.sender.send(&submission.to_message()).await {
                Ok(status) if status == SUCCESS_STATUS => SubmitOutcome::Sent,
                Ok(status) => {
                    SubmitOutcome::Failed(format!("delivery failed with status {}", status))
                }
                Err(e) => SubmitOutcome::Failed(e.to_string()),
            },
        };

        self.in_flight.store(false, Ordering::Release);
        outcome
    }
}
