use tonic::Status;

use crate::server::request_validation::RequestError;
use crate::server::structured_error::StructuredError;
use crate::store::{ErrorKind, StoreError};

/// Trait for mapping domain errors to structured error codes and optional tips.
pub trait ToStructuredError {
    fn error_code_and_tip(&self) -> (&str, Option<&str>);
}

// ── StoreError ─────────────────────────────────────────────────────────────────
impl ToStructuredError for StoreError {
    fn error_code_and_tip(&self) -> (&str, Option<&str>) {
        match self.kind() {
            ErrorKind::NotFound => ("ITEM_NOT_FOUND", None),
            ErrorKind::Validation => ("VALIDATION_ERROR", None),
        }
    }
}

// ── RequestError ───────────────────────────────────────────────────────────────
impl ToStructuredError for RequestError {
    fn error_code_and_tip(&self) -> (&str, Option<&str>) {
        match self {
            RequestError::InvalidPage(_) => ("INVALID_PAGE", Some("Pages are numbered from 1")),
            RequestError::InvalidLimit { .. } => (
                "INVALID_LIMIT",
                Some("Use a page size between 1 and 100"),
            ),
            RequestError::SearchTooLong { .. } => ("SEARCH_TOO_LONG", None),
            RequestError::InvalidSearchCharacters => ("INVALID_SEARCH", None),
        }
    }
}

/// gRPC status for a store error; the message is the structured JSON error.
pub fn store_error_status(err: &StoreError) -> Status {
    let message = StructuredError::from_error(err).to_json();
    match err.kind() {
        ErrorKind::NotFound => Status::not_found(message),
        ErrorKind::Validation => Status::invalid_argument(message),
    }
}

/// gRPC status for a rejected request.
pub fn request_error_status(err: &RequestError) -> Status {
    Status::invalid_argument(StructuredError::from_error(err).to_json())
}
