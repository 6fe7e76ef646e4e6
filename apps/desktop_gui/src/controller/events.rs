//! UI/backend events and error modeling for the desktop controller.

use std::path::PathBuf;

use client_core::DashboardSnapshot;
use shared::{
    dashboard::{AnalyticsData, DealDetail},
    domain::AnalysisReport,
};

pub enum UiEvent {
    Info(String),
    Error(UiError),
    AnalysisCompleted(Box<AnalysisReport>),
    ReportPdfSaved(PathBuf),
    DashboardAuthOk,
    DashboardLoaded(Box<DashboardSnapshot>),
    AnalyticsLoaded(Box<AnalyticsData>),
    DealDetailLoaded(Box<DealDetail>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Auth,
    Transport,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Analyze,
    DownloadPdf,
    DashboardLogin,
    DashboardLoad,
    DealDetail,
    General,
}

/// Turns a raw login failure into the message shown on the key prompt.
pub fn classify_login_failure(message: &str) -> String {
    let lower = message.to_ascii_lowercase();
    if lower.contains("backend worker startup failure") {
        "Backend worker startup failure; verify local app environment and retry.".to_string()
    } else if lower.contains("invalid dashboard key") {
        "That key was not accepted. Check it and try again.".to_string()
    } else if lower.contains("failed to connect")
        || lower.contains("connection refused")
        || lower.contains("dns")
        || lower.contains("timed out")
    {
        "Dashboard service unreachable; check the API URL/network and retry.".to_string()
    } else {
        format!("Dashboard login error: {message}")
    }
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("401")
            || message_lower.contains("403")
            || message_lower.contains("unauthorized")
            || message_lower.contains("forbidden")
            || message_lower.contains("invalid dashboard key")
        {
            UiErrorCategory::Auth
        } else if message_lower.contains("invalid")
            || message_lower.contains("missing")
            || message_lower.contains("malformed")
            || message_lower.contains("unsupported")
        {
            UiErrorCategory::Validation
        } else if message_lower.contains("timeout")
            || message_lower.contains("timed out")
            || message_lower.contains("connection")
            || message_lower.contains("network")
            || message_lower.contains("transport")
            || message_lower.contains("unavailable")
            || message_lower.contains("disconnect")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    /// Auth errors on dashboard calls mean the key stopped working; the UI
    /// drops back to the key prompt.
    pub fn requires_reauth(&self) -> bool {
        self.category == UiErrorCategory::Auth
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_key_is_an_auth_error() {
        let err = UiError::from_message(UiErrorContext::DashboardLogin, "invalid dashboard key");
        assert_eq!(err.category(), UiErrorCategory::Auth);
        assert!(err.requires_reauth());
    }

    #[test]
    fn connection_problems_classify_as_transport() {
        let err = UiError::from_message(
            UiErrorContext::DashboardLoad,
            "request failed: connection refused",
        );
        assert_eq!(err.category(), UiErrorCategory::Transport);
        assert!(!err.requires_reauth());
    }

    #[test]
    fn unsupported_file_type_classifies_as_validation() {
        let err = UiError::from_message(
            UiErrorContext::Analyze,
            "unsupported contract file type `notes.txt`",
        );
        assert_eq!(err.category(), UiErrorCategory::Validation);
    }

    #[test]
    fn login_failure_messages_stay_actionable() {
        assert!(classify_login_failure("invalid dashboard key").contains("not accepted"));
        assert!(classify_login_failure("error trying to connect: connection refused")
            .contains("unreachable"));
        assert!(classify_login_failure("weird").starts_with("Dashboard login error"));
    }
}
