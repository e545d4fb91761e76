use serde::Serialize;
use sharefare_application::{FailureKind, LedgerServiceError};

/// Error body a request layer can return alongside [`LedgerServiceError::status_code`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ErrorView {
    pub status: u16,
    pub kind: &'static str,
    pub message: String,
}

pub fn error_view(error: &LedgerServiceError) -> ErrorView {
    ErrorView {
        status: error.status_code(),
        kind: kind_label(error.kind()),
        message: error.to_string(),
    }
}

pub fn format_service_error(error: &LedgerServiceError) -> String {
    match error.kind() {
        FailureKind::BadInput => format!("invalid input: {error}"),
        FailureKind::NotFound => error.to_string(),
        FailureKind::Internal => format!("internal error: {error}"),
    }
}

fn kind_label(kind: FailureKind) -> &'static str {
    match kind {
        FailureKind::BadInput => "bad_input",
        FailureKind::NotFound => "not_found",
        FailureKind::Internal => "internal",
    }
}
