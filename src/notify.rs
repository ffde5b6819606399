//! User-notification sink
//!
//! Failures the user should hear about (a full store, a finished bulk run)
//! are pushed through a [`Notifier`] rather than printed from library code.
//! The CLI installs [`ConsoleNotifier`]; library consumers default to
//! [`LogNotifier`].

use colored::Colorize;

/// Message shown whenever a write is rejected by the storage quota
pub const QUOTA_MESSAGE: &str = "Maximum storage quota reached! Clear your cache to free up space.";

/// How loudly a notification should be shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

/// A message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
}

impl Notification {
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Info,
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Error,
        }
    }

    /// The storage-full notification
    #[must_use]
    pub fn quota_exceeded() -> Self {
        Self::error(QUOTA_MESSAGE)
    }
}

/// Destination for user-facing notifications
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Forwards notifications to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        match notification.severity {
            Severity::Info => tracing::info!(target: "notify", "{}", notification.message),
            Severity::Error => tracing::error!(target: "notify", "{}", notification.message),
        }
    }
}

/// Prints notifications to stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier {
    /// Suppress informational notifications; errors are always shown
    pub quiet: bool,
}

impl ConsoleNotifier {
    #[must_use]
    pub const fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        match notification.severity {
            Severity::Info if !self.quiet => eprintln!("{}", notification.message.cyan()),
            Severity::Info => {}
            Severity::Error => eprintln!("{} {}", "✗".red(), notification.message.red()),
        }
    }
}
